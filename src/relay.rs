//! Mail-relay integration for the contact form.
//!
//! Messages are delivered through a hosted transactional-email API (EmailJS)
//! so the site needs no backend. The integration is driven by three opaque
//! values, all of which must be present:
//!
//! | Key | Environment | `relay.toml` |
//! |-----|-------------|--------------|
//! | service id | `EMAILJS_SERVICE_ID` | `service_id` |
//! | template id | `EMAILJS_TEMPLATE_ID` | `template_id` |
//! | public key | `EMAILJS_PUBLIC_KEY` | `public_key` |
//!
//! Environment variables override the optional `relay.toml` in the content
//! directory. When any value is missing the relay is disabled and the contact
//! form falls back to a `mailto:` link.

use async_trait::async_trait;
use confique::Config;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Relay rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Relay not configured, missing: {}", .0.join(", "))]
    NotConfigured(Vec<&'static str>),
}

/// Relay settings, layered from the environment over `relay.toml`.
#[derive(Debug, Clone, Config)]
pub struct RelayConfig {
    #[config(env = "EMAILJS_SERVICE_ID")]
    pub service_id: Option<String>,
    #[config(env = "EMAILJS_TEMPLATE_ID")]
    pub template_id: Option<String>,
    /// Embedded in the generated page when the relay is configured.
    #[config(env = "EMAILJS_PUBLIC_KEY")]
    pub public_key: Option<String>,
    #[config(env = "EMAILJS_ENDPOINT", default = "https://api.emailjs.com/api/v1.0/email/send")]
    pub endpoint: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            service_id: None,
            template_id: None,
            public_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RelayConfig {
    /// Load from the environment, then `source/relay.toml` if it exists.
    pub fn load(source: &Path) -> Result<Self, confique::Error> {
        RelayConfig::builder()
            .env()
            .file(source.join("relay.toml"))
            .load()
    }

    /// Environment variable names of every missing value.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if present(&self.service_id).is_none() {
            missing.push("EMAILJS_SERVICE_ID");
        }
        if present(&self.template_id).is_none() {
            missing.push("EMAILJS_TEMPLATE_ID");
        }
        if present(&self.public_key).is_none() {
            missing.push("EMAILJS_PUBLIC_KEY");
        }
        missing
    }

    pub fn is_configured(&self) -> bool {
        self.missing_keys().is_empty()
    }

    /// Trimmed service id, template id and public key, or `None` unless all
    /// three are present.
    pub fn credentials(&self) -> Option<RelayCredentials<'_>> {
        Some(RelayCredentials {
            service_id: present(&self.service_id)?,
            template_id: present(&self.template_id)?,
            public_key: present(&self.public_key)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayCredentials<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub public_key: &'a str,
}

/// Template parameters sent with every message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayMessage {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    /// Recipient display name (the portfolio owner).
    pub to_name: String,
    pub reply_to: String,
    pub sent_time: String,
}

#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, message: &RelayMessage) -> Result<(), RelayError>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a RelayMessage,
}

/// EmailJS REST client.
///
/// No request timeout is set; the transport defaults apply.
#[derive(Debug, Clone)]
pub struct EmailJsRelay {
    client: Client,
    endpoint: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

impl EmailJsRelay {
    pub fn new(
        endpoint: impl Into<String>,
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key: public_key.into(),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        let creds = config
            .credentials()
            .ok_or_else(|| RelayError::NotConfigured(config.missing_keys()))?;
        Ok(Self::new(
            config.endpoint.trim(),
            creds.service_id,
            creds.template_id,
            creds.public_key,
        ))
    }
}

#[async_trait]
impl MailRelay for EmailJsRelay {
    async fn send(&self, message: &RelayMessage) -> Result<(), RelayError> {
        let request = SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: message,
        };
        tracing::debug!(endpoint = %self.endpoint, "sending contact message");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(RelayError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Build the production relay, or `None` (with a warning) when unconfigured.
pub fn relay_from_config(config: &RelayConfig) -> Option<Arc<dyn MailRelay>> {
    match EmailJsRelay::from_config(config) {
        Ok(relay) => Some(Arc::new(relay)),
        Err(err) => {
            tracing::warn!("{err}; contact form will use the mailto: fallback");
            None
        }
    }
}
