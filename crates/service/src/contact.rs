//! Email-forwarding form relay.
//!
//! `submit` never fails: configuration problems, transport errors and
//! rejections by the relay all come back as `RelayOutcome { success: false }`.

use std::time::Duration;

use configs::RelayConfig;
use indexmap::IndexMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

pub const DEFAULT_SUBJECT: &str = "New message from the adoption website";

/// Form fields as submitted, plus an optional subject line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RelayOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()) }
    }
}

pub struct ContactRelay {
    url: String,
    access_key: Option<String>,
    http: Client,
}

impl ContactRelay {
    pub fn new(cfg: &RelayConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(Duration::from_secs(20)).build()?;
        Ok(Self { url: cfg.url.clone(), access_key: cfg.access_key.clone(), http })
    }

    /// Request body: `access_key`, then the form fields, then `subject`.
    pub fn payload(access_key: &str, form: &ContactForm) -> Value {
        let mut body = Map::new();
        body.insert("access_key".into(), Value::String(access_key.to_string()));
        for (k, v) in &form.fields {
            if k != "access_key" && k != "subject" {
                body.insert(k.clone(), v.clone());
            }
        }
        let subject = form
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUBJECT);
        body.insert("subject".into(), Value::String(subject.to_string()));
        Value::Object(body)
    }

    #[instrument(skip(self, form), fields(fields = form.fields.len()))]
    pub async fn submit(&self, form: ContactForm) -> RelayOutcome {
        let Some(key) = self.access_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            warn!("relay access key missing; submission not sent");
            return RelayOutcome::failure("Form relay is not configured");
        };

        let resp = match self.http.post(&self.url).json(&Self::payload(key, &form)).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "relay request failed");
                return RelayOutcome::failure(format!("Network error: {e}"));
            }
        };
        let status = resp.status();
        let outcome = match resp.json::<RelayOutcome>().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(%status, error = %e, "relay returned an unreadable response");
                return RelayOutcome::failure(format!("Unexpected relay response ({status})"));
            }
        };
        if outcome.success {
            info!("contact_form_relayed");
            outcome
        } else {
            let message = outcome.message.unwrap_or_else(|| "Submission rejected".to_string());
            warn!(%status, %message, "relay rejected submission");
            RelayOutcome::failure(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn form() -> ContactForm {
        serde_json::from_value(json!({
            "name": "Mali",
            "email": "mali@example.com",
            "message": "Found a kitten",
            "subject": "Stray report"
        }))
        .unwrap()
    }

    fn relay(url: String, key: Option<&str>) -> ContactRelay {
        ContactRelay::new(&RelayConfig { url, access_key: key.map(str::to_string) }).unwrap()
    }

    #[test]
    fn payload_order_and_default_subject() {
        let body = ContactRelay::payload("k", &form());
        let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["access_key", "name", "email", "message", "subject"]);
        assert_eq!(body["subject"], "Stray report");

        let bare = ContactRelay::payload("k", &ContactForm::default());
        assert_eq!(bare["subject"], DEFAULT_SUBJECT);
    }

    #[tokio::test]
    async fn success_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(body_json(json!({
                "access_key": "secret",
                "name": "Mali",
                "email": "mali@example.com",
                "message": "Found a kitten",
                "subject": "Stray report"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "Email sent"})))
            .expect(1)
            .mount(&server)
            .await;

        let out = relay(format!("{}/submit", server.uri()), Some("secret")).submit(form()).await;
        assert_eq!(out, RelayOutcome { success: true, message: Some("Email sent".into()) });
    }

    #[tokio::test]
    async fn rejection_becomes_structured_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"success": false, "message": "Invalid access key"})))
            .mount(&server)
            .await;
        let out = relay(server.uri(), Some("bad")).submit(form()).await;
        assert_eq!(out, RelayOutcome::failure("Invalid access key"));
    }

    #[tokio::test]
    async fn missing_key_skips_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let out = relay(server.uri(), None).submit(form()).await;
        assert!(!out.success);
        assert!(out.message.is_some());
        let out = relay(server.uri(), Some("   ")).submit(form()).await;
        assert!(!out.success);
    }

    #[tokio::test]
    async fn transport_failure_becomes_structured_failure() {
        let out = relay("http://127.0.0.1:9/submit".into(), Some("k")).submit(form()).await;
        assert!(!out.success);
        assert!(out.message.unwrap().starts_with("Network error"));
    }

    #[tokio::test]
    async fn non_json_body_becomes_structured_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;
        let out = relay(server.uri(), Some("k")).submit(form()).await;
        assert!(!out.success);
    }
}
