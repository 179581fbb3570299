use actix_web::{web, HttpResponse};
use serde::Deserialize;
use thiserror::Error as ThisError;
use validator::Validate;

use crate::http::{Actor, Error};
use crate::services::{self, cover_letter::CoverLetterParams};
use crate::types;
use crate::util::validation;
use crate::App;

#[tracing::instrument(skip_all)]
pub async fn suggestions(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    let jobs =
        services::jobs::fetch_suggestions(&app.http_client, &app.config.jobs, user.id).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    #[validate(length(min = 1, message = "jobTitle must not be empty"))]
    pub job_title: String,
    #[validate(length(min = 1, message = "company must not be empty"))]
    pub company: String,
    #[serde(default)]
    pub job_description: Option<String>,
    /// When set, the drafted letter is also mailed to this address.
    #[serde(default)]
    #[validate(email(message = "sendTo must be a valid email address"))]
    pub send_to: Option<String>,
}

#[derive(Debug, ThisError)]
#[error("cover letter request was rejected")]
struct RejectedRequest;

#[tracing::instrument(skip_all)]
pub async fn cover_letter(
    app: web::Data<App>,
    actor: Actor,
    request: web::Json<CoverLetterRequest>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;

    let request = request.into_inner();
    request.validate().map_err(|errors| {
        Error::from_context(
            types::Error::invalid_form(validation::collect_issues(&errors)),
            RejectedRequest,
        )
    })?;

    let record = services::profile::get_or_create(&app, user.id).await?;
    let profile = &record.user.profile;

    let summary = if !profile.bio.is_empty() {
        profile.bio.clone()
    } else if !profile.headline.is_empty() {
        profile.headline.clone()
    } else {
        "I am a software developer.".to_string()
    };
    let skills: Vec<String> = profile.skills.iter().map(|s| s.name.clone()).collect();

    let letter = services::cover_letter::generate(&CoverLetterParams {
        job_title: &request.job_title,
        company: &request.company,
        job_description: request.job_description.as_deref(),
        profile_summary: &summary,
        skills: &skills,
    });

    let mut email_sent = false;
    if let Some(send_to) = request.send_to.as_deref() {
        let subject = format!(
            "Application for {} at {}",
            request.job_title, request.company
        );
        email_sent = services::email::send_application_email(
            app.config.smtp.as_ref(),
            send_to,
            &subject,
            &letter,
        )
        .await?;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "coverLetter": letter,
        "emailSent": email_sent,
    })))
}
