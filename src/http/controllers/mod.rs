use actix_web::web;

pub mod auth;
pub mod jobs;
pub mod profile;
pub mod public;
pub mod seo;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth/github")
            .route("", web::get().to(auth::login))
            .route("/callback", web::get().to(auth::callback)),
    )
    .service(
        web::scope("/api")
            .service(
                web::resource("/profile")
                    .route(web::get().to(profile::get))
                    .route(web::post().to(profile::save)),
            )
            .route("/profile/publish", web::post().to(profile::publish))
            .route("/profile/unpublish", web::post().to(profile::unpublish))
            .route("/jobs/suggestions", web::get().to(jobs::suggestions))
            .route("/jobs/cover-letter", web::post().to(jobs::cover_letter)),
    )
    .route("/u/{handle}", web::get().to(public::page))
    .route("/sitemap.xml", web::get().to(seo::sitemap))
    .route("/robots.txt", web::get().to(seo::robots));
}
