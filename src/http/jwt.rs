use chrono::Utc;
use error_stack::{Report, Result, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::models::id::UserId;

const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 30;
const STATE_TTL_SECS: i64 = 60 * 10;

#[derive(Debug, Error)]
#[error("failed to issue token")]
pub struct IssueError;

#[derive(Debug, Error)]
#[error("invalid or expired token")]
pub struct VerifyError;

/// Bearer session handed out after the OAuth callback. The provider
/// stays the identity source; this token only pins the resolved user id
/// between requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct Session {
    pub sub: UserId,
    pub iat: i64,
    pub exp: i64,
}

impl Session {
    #[tracing::instrument(skip_all)]
    pub fn issue(auth: &config::Auth, user_id: UserId) -> Result<String, IssueError> {
        let now = Utc::now().timestamp();
        let claims = Self {
            sub: user_id,
            iat: now,
            exp: now + SESSION_TTL_SECS,
        };

        let header = Header::new(Algorithm::HS512);
        let key = EncodingKey::from_secret(auth.jwt_secret.as_str().as_bytes());
        jsonwebtoken::encode(&header, &claims, &key).change_context(IssueError)
    }

    #[tracing::instrument(skip_all)]
    pub fn verify(auth: &config::Auth, token: &str) -> Result<Self, VerifyError> {
        let key = DecodingKey::from_secret(auth.jwt_secret.as_str().as_bytes());
        let validation = Validation::new(Algorithm::HS512);

        jsonwebtoken::decode::<Self>(token, &key, &validation)
            .map(|data| data.claims)
            .change_context(VerifyError)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    purpose: String,
    iat: i64,
    exp: i64,
}

/// Anti-forgery token round-tripped through the OAuth provider as the
/// `state` parameter. Signed rather than stored, so the callback needs
/// no session state of its own.
#[tracing::instrument(skip_all)]
pub fn issue_state(auth: &config::Auth) -> Result<String, IssueError> {
    let now = Utc::now().timestamp();
    let claims = StateClaims {
        purpose: "oauth_state".to_string(),
        iat: now,
        exp: now + STATE_TTL_SECS,
    };

    let header = Header::new(Algorithm::HS512);
    let key = EncodingKey::from_secret(auth.jwt_secret.as_str().as_bytes());
    jsonwebtoken::encode(&header, &claims, &key).change_context(IssueError)
}

#[tracing::instrument(skip_all)]
pub fn verify_state(auth: &config::Auth, token: &str) -> Result<(), VerifyError> {
    let key = DecodingKey::from_secret(auth.jwt_secret.as_str().as_bytes());
    let validation = Validation::new(Algorithm::HS512);

    let data = jsonwebtoken::decode::<StateClaims>(token, &key, &validation)
        .change_context(VerifyError)?;

    if data.claims.purpose == "oauth_state" {
        Ok(())
    } else {
        Err(Report::new(VerifyError))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_auth(secret: &str) -> config::Auth {
        config::Auth {
            client_id: "client-id".into(),
            client_secret: "client-secret".into(),
            jwt_secret: secret.into(),
            authorize_url: "https://github.com/login/oauth/authorize".into(),
            token_url: "https://github.com/login/oauth/access_token".into(),
            user_api_url: "https://api.github.com/user".into(),
        }
    }

    #[test]
    fn session_round_trip() {
        let auth = test_auth("a-very-long-session-secret");
        let token = Session::issue(&auth, UserId(42)).unwrap();

        let session = Session::verify(&auth, &token).unwrap();
        assert_eq!(session.sub, UserId(42));
        assert!(session.exp > session.iat);
    }

    #[test]
    fn session_rejects_foreign_secret() {
        let auth = test_auth("a-very-long-session-secret");
        let token = Session::issue(&auth, UserId(42)).unwrap();

        let other = test_auth("a-completely-different-secret");
        assert!(Session::verify(&other, &token).is_err());
    }

    #[test]
    fn state_round_trip() {
        let auth = test_auth("a-very-long-session-secret");
        let state = issue_state(&auth).unwrap();
        assert!(verify_state(&auth, &state).is_ok());
    }

    #[test]
    fn state_rejects_session_tokens() {
        let auth = test_auth("a-very-long-session-secret");
        let token = Session::issue(&auth, UserId(42)).unwrap();
        assert!(verify_state(&auth, &token).is_err());
    }
}
