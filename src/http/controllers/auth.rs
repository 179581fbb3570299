use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use url::Url;

use crate::http::{jwt, Error, Session};
use crate::models::id::UserId;
use crate::models::User;
use crate::types;
use crate::App;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    pub token: String,
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
}

/// What the provider's user API reports about the authenticated user.
/// `name` is the display name and may be unset; `login` always exists.
#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: i64,
    login: String,
    name: Option<String>,
}

#[derive(Debug, ThisError)]
#[error("OAuth code exchange with the provider failed")]
struct ExchangeFailed;

/// Starts the login flow by bouncing the browser to the provider's
/// authorize page with a signed anti-forgery `state`.
#[tracing::instrument(skip_all)]
pub async fn login(app: web::Data<App>) -> Result<HttpResponse, Error> {
    let auth = &app.config.auth;

    let state = jwt::issue_state(auth).map_err(|r| Error::from_report(types::Error::Internal, r))?;
    let redirect_uri = format!(
        "{}/auth/github/callback",
        app.config.base_url.trim_end_matches('/')
    );

    let url = Url::parse_with_params(
        &auth.authorize_url,
        &[
            ("client_id", auth.client_id.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("scope", "read:user"),
            ("state", state.as_str()),
        ],
    )
    .map_err(|e| Error::from_context(types::Error::Internal, e))?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url.to_string()))
        .finish())
}

/// Completes the flow: verifies `state`, exchanges the code for an
/// access token, resolves the provider identity and hands out a session
/// token for the (possibly just created) local user.
#[tracing::instrument(skip_all)]
pub async fn callback(
    app: web::Data<App>,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse, Error> {
    let auth = &app.config.auth;

    jwt::verify_state(auth, &query.state)
        .map_err(|r| Error::from_report(types::Error::Unauthorized, r))?;

    let response = app
        .http_client
        .post(&auth.token_url)
        .header(header::ACCEPT.as_str(), "application/json")
        .form(&[
            ("client_id", auth.client_id.as_str()),
            ("client_secret", auth.client_secret.as_str()),
            ("code", query.code.as_str()),
        ])
        .send()
        .await
        .map_err(|e| Error::from_context(types::Error::Upstream, e))?;

    if !response.status().is_success() {
        return Err(Error::from_context(types::Error::Upstream, ExchangeFailed));
    }

    let token = response
        .json::<AccessTokenResponse>()
        .await
        .map_err(|e| Error::from_context(types::Error::Upstream, e))?;

    // the provider answers 200 with an error body when the code is
    // stale, so a missing token means a bad code rather than an outage
    let Some(access_token) = token.access_token else {
        return Err(Error::from_context(
            types::Error::Unauthorized,
            ExchangeFailed,
        ));
    };

    let response = app
        .http_client
        .get(&auth.user_api_url)
        .bearer_auth(&access_token)
        .header(header::ACCEPT.as_str(), "application/vnd.github+json")
        .send()
        .await
        .map_err(|e| Error::from_context(types::Error::Upstream, e))?;

    if !response.status().is_success() {
        return Err(Error::from_context(types::Error::Upstream, ExchangeFailed));
    }

    let provider_user = response
        .json::<ProviderUser>()
        .await
        .map_err(|e| Error::from_context(types::Error::Upstream, e))?;

    let provider_id = format!("github:{}", provider_user.id);
    let name = provider_user.name.unwrap_or(provider_user.login);

    let mut conn = app.db_write().await?;
    let user = User::upsert_from_provider(&mut conn, &provider_id, Some(&name)).await?;

    let token = Session::issue(auth, user.id)
        .map_err(|r| Error::from_report(types::Error::Internal, r))?;

    Ok(HttpResponse::Ok().json(CallbackResponse {
        token,
        user_id: user.id,
    }))
}
