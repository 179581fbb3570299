use actix_web::middleware::ErrorHandlers;
use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use std::process::ExitCode;
use thiserror::Error;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use devfolio::http::controllers;
use devfolio::http::util::{handle_actix_web_error, QuieterRootSpanBuilder};
use devfolio::{config, App};

#[derive(Debug, Error)]
#[error("Could not start the devfolio HTTP server")]
struct StartError;

async fn start_server() -> Result<(), StartError> {
    let config = config::Server::load().change_context(StartError)?;

    let ip = config.ip;
    let port = config.port;
    let workers = config.workers;

    let app = App::new(config).await.change_context(StartError)?;
    app.primary_db
        .run_pending_migrations()
        .await
        .change_context(StartError)?;

    info!("devfolio HTTP server is listening at http://{ip}:{port} with {workers} workers");

    HttpServer::new(move || {
        actix_web::App::new()
            .app_data(web::Data::new(app.clone()))
            .wrap(TracingLogger::<QuieterRootSpanBuilder>::new())
            .wrap(ErrorHandlers::new().default_handler(handle_actix_web_error))
            .configure(controllers::configure)
    })
    .workers(workers)
    .bind((ip, port))
    .change_context(StartError)
    .attach_printable("could not bind server with address and port")?
    .run()
    .await
    .change_context(StartError)?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(error) = start_server().await {
        eprintln!("{error:?}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
