use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error as ThisError;

use crate::config;
use crate::http::Error;
use crate::types::{self, error::FieldIssue};

#[derive(Debug, ThisError)]
#[error("failed to build the outgoing message")]
struct BuildFailed;

/// Sends the drafted letter over SMTP. Returns whether a message was
/// actually handed off; a missing SMTP section downgrades the send to a
/// logged no-op so the drafting flow works without mail infrastructure.
#[tracing::instrument(skip(smtp, body))]
pub async fn send_application_email(
    smtp: Option<&config::Smtp>,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<bool, Error> {
    let Some(smtp) = smtp else {
        tracing::warn!("SMTP is not configured, skipping email delivery");
        return Ok(false);
    };

    let from: Mailbox = smtp
        .from
        .parse()
        .map_err(|e: lettre::address::AddressError| {
            Error::from_context(types::Error::Internal, e)
        })?;

    let to: Mailbox = to.parse().map_err(|e: lettre::address::AddressError| {
        Error::from_context(
            types::Error::invalid_form(vec![FieldIssue::new(
                "sendTo",
                "must be a valid email address",
            )]),
            e,
        )
    })?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .body(body.to_string())
        .map_err(|e| Error::from_context(types::Error::Internal, e))?;

    let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
        .map_err(|e| Error::from_context(types::Error::Internal, e))?
        .port(smtp.port);

    if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
        builder = builder.credentials(Credentials::new(
            username.clone(),
            password.as_str().to_owned(),
        ));
    }

    builder
        .build()
        .send(message)
        .await
        .map_err(|e| Error::from_context(types::Error::Upstream, e))?;

    tracing::info!("application email handed off to the SMTP relay");
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_smtp_config_skips_the_send() {
        let sent = send_application_email(None, "someone@example.com", "Hello", "Body")
            .await
            .unwrap();
        assert!(!sent);
    }

    #[tokio::test]
    async fn bad_recipient_is_a_form_error() {
        let smtp = config::Smtp {
            host: "smtp.example.com".into(),
            port: 587,
            username: None,
            password: None,
            from: "no-reply@example.com".into(),
        };

        let error = send_application_email(Some(&smtp), "not-an-address", "Hello", "Body")
            .await
            .unwrap_err();
        assert!(matches!(
            error.as_type(),
            types::Error::InvalidFormBody { .. }
        ));
    }
}
