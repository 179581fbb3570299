use error_stack::Report;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::config;
use crate::http::Error;
use crate::models::id::UserId;
use crate::types;

/// One suggested opening from the external matching webhook (or the
/// built-in demo record when no webhook is configured).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedJob {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub url: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

#[derive(Debug, ThisError)]
#[error("job suggestion webhook failed")]
struct WebhookFailed;

pub fn demo_suggestion() -> SuggestedJob {
    SuggestedJob {
        id: "demo-1".into(),
        title: "Full-stack TypeScript Engineer".into(),
        company: "Example Corp".into(),
        location: Some("Remote".into()),
        url: "https://example.com/jobs/1".into(),
        source: "demo".into(),
        match_score: Some(0.9),
    }
}

/// Fetches suggestions for a user. An unconfigured webhook is not an
/// error; the demo record stands in so the surrounding flow can still
/// be exercised end to end.
#[tracing::instrument(skip(client, jobs))]
pub async fn fetch_suggestions(
    client: &reqwest::Client,
    jobs: &config::Jobs,
    user_id: UserId,
) -> Result<Vec<SuggestedJob>, Error> {
    let Some(webhook_url) = jobs.webhook_url.as_deref() else {
        tracing::debug!("job webhook not configured, serving the demo suggestion");
        return Ok(vec![demo_suggestion()]);
    };

    let response = client
        .post(webhook_url)
        .json(&serde_json::json!({ "userId": user_id }))
        .send()
        .await
        .map_err(|e| Error::from_context(types::Error::Upstream, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::from_report(
            types::Error::Upstream,
            Report::new(WebhookFailed)
                .attach_printable(format!("webhook responded with status {status}")),
        ));
    }

    response
        .json::<Vec<SuggestedJob>>()
        .await
        .map_err(|e| Error::from_context(types::Error::Upstream, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client() -> reqwest::Client {
        reqwest::Client::new()
    }

    #[tokio::test]
    async fn unconfigured_webhook_serves_demo_data() {
        let jobs = config::Jobs { webhook_url: None };

        let suggestions = fetch_suggestions(&client(), &jobs, UserId(7)).await.unwrap();
        assert_eq!(suggestions, vec![demo_suggestion()]);
    }

    #[tokio::test]
    async fn forwards_the_user_id_to_the_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/match"))
            .and(body_partial_json(serde_json::json!({ "userId": 7 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": "job-1",
                "title": "Rust Engineer",
                "company": "Ferrous Metals",
                "location": "Berlin",
                "url": "https://example.org/jobs/1",
                "source": "webhook",
                "matchScore": 0.75,
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let jobs = config::Jobs {
            webhook_url: Some(format!("{}/match", server.uri())),
        };

        let suggestions = fetch_suggestions(&client(), &jobs, UserId(7)).await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "Rust Engineer");
        assert_eq!(suggestions[0].source, "webhook");
        assert_eq!(suggestions[0].match_score, Some(0.75));
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let jobs = config::Jobs {
            webhook_url: Some(server.uri()),
        };

        let error = fetch_suggestions(&client(), &jobs, UserId(7))
            .await
            .unwrap_err();
        assert!(matches!(error.as_type(), types::Error::Upstream));
    }

    #[tokio::test]
    async fn malformed_webhook_body_maps_to_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "not": "a list" })),
            )
            .mount(&server)
            .await;

        let jobs = config::Jobs {
            webhook_url: Some(server.uri()),
        };

        let error = fetch_suggestions(&client(), &jobs, UserId(7))
            .await
            .unwrap_err();
        assert!(matches!(error.as_type(), types::Error::Upstream));
    }
}
