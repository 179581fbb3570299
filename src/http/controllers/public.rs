use actix_web::{web, HttpResponse};
use thiserror::Error as ThisError;

use crate::http::Error;
use crate::services;
use crate::types;
use crate::App;

#[derive(Debug, ThisError)]
#[error("no published profile under this handle")]
struct NotVisible;

/// Public profile page. Unknown handles and unpublished profiles get
/// the same not-found answer so visibility cannot be probed.
#[tracing::instrument(skip(app))]
pub async fn page(app: web::Data<App>, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let handle = path.into_inner();

    match services::public::lookup(&app, &handle).await? {
        Some(profile) => {
            let meta = profile.meta(&app.config.base_url);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "profile": profile,
                "meta": meta,
            })))
        }
        None => Err(Error::from_context(types::Error::NotFound, NotVisible)),
    }
}
