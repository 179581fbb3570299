use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::http::Error;
use crate::models::User;
use crate::services;
use crate::App;

#[tracing::instrument(skip_all)]
pub async fn sitemap(app: web::Data<App>) -> Result<HttpResponse, Error> {
    let mut conn = app.db_read().await?;
    let entries = User::published_handles(&mut conn).await?;

    let body =
        services::seo::render_sitemap(&app.config.base_url, Utc::now().date_naive(), &entries);

    Ok(HttpResponse::Ok()
        .content_type("application/xml")
        .body(body))
}

#[tracing::instrument(skip_all)]
pub async fn robots(app: web::Data<App>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain")
        .body(services::seo::render_robots(&app.config.base_url))
}
