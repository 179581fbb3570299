use actix_web::{web, HttpResponse};

use crate::http::{Actor, Error};
use crate::services;
use crate::types::form::ProfileInput;
use crate::App;

#[tracing::instrument(skip_all)]
pub async fn get(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    let record = services::profile::get_or_create(&app, user.id).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[tracing::instrument(skip_all)]
pub async fn save(
    app: web::Data<App>,
    actor: Actor,
    input: web::Json<ProfileInput>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    let record = services::profile::save(&app, user.id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[tracing::instrument(skip_all)]
pub async fn publish(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    let record = services::profile::set_visibility(&app, user.id, true).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[tracing::instrument(skip_all)]
pub async fn unpublish(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    let record = services::profile::set_visibility(&app, user.id, false).await?;
    Ok(HttpResponse::Ok().json(record))
}
