//! Transactional email
//!
//! Notifications go out through the Resend HTTP API when a key is
//! configured. Callers treat delivery as best-effort: a failure is logged and
//! reported as `emailSent: false`, never as a request error.

pub mod templates;

use crate::config::MailConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Kinds of notification email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    AccountCreated,
    HodAccountCreated,
    FormSubmitted,
    FormApproved,
    FormRejected,
    FormRevisionRequested,
    Reminder,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::AccountCreated => "account_created",
            NotificationType::HodAccountCreated => "hod_account_created",
            NotificationType::FormSubmitted => "form_submitted",
            NotificationType::FormApproved => "form_approved",
            NotificationType::FormRejected => "form_rejected",
            NotificationType::FormRevisionRequested => "form_revision_requested",
            NotificationType::Reminder => "reminder",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|_| s.to_string())
    }
}

/// A rendered message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Trait for email delivery backends
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Whether sending can succeed at all
    fn is_configured(&self) -> bool;

    async fn send(&self, email: Email) -> Result<()>;
}

/// Resend HTTP API client
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    from: String,
}

impl ResendMailer {
    pub fn new(config: &MailConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.resend_api_base.trim_end_matches('/').to_string(),
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, email: Email) -> Result<()> {
        let url = format!("{}/emails", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": email.to,
                "subject": email.subject,
                "html": email.html,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                message: format!("Resend error {}: {}", status, body),
            });
        }

        Ok(())
    }
}

/// Used when no API key is configured; every send fails
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    fn is_configured(&self) -> bool {
        false
    }

    async fn send(&self, _email: Email) -> Result<()> {
        Err(AppError::Configuration {
            message: "email sending is not configured".to_string(),
        })
    }
}

/// Build the mailer for a config
pub fn from_config(config: &MailConfig) -> Result<std::sync::Arc<dyn Mailer>> {
    match config.resend_api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => Ok(std::sync::Arc::new(ResendMailer::new(config, key.to_string())?)),
        None => Ok(std::sync::Arc::new(DisabledMailer)),
    }
}

/// Send and swallow the error. Returns whether the message went out.
pub async fn deliver(mailer: &dyn Mailer, email: Email) -> bool {
    if !mailer.is_configured() {
        return false;
    }

    let to = email.to.clone();
    match mailer.send(email).await {
        Ok(()) => {
            crate::metrics::record_email(true);
            tracing::info!(to = %to, "Email sent");
            true
        }
        Err(e) => {
            crate::metrics::record_email(false);
            tracing::warn!(to = %to, error = %e, "Email sending failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_parse() {
        assert_eq!(
            "form_revision_requested".parse::<NotificationType>(),
            Ok(NotificationType::FormRevisionRequested)
        );
        assert_eq!(NotificationType::HodAccountCreated.as_str(), "hod_account_created");
        assert!("birthday".parse::<NotificationType>().is_err());
    }

    #[tokio::test]
    async fn test_disabled_mailer_reports_not_sent() {
        let email = Email {
            to: "a@b.edu".into(),
            subject: "s".into(),
            html: "<p>x</p>".into(),
        };
        assert!(!deliver(&DisabledMailer, email).await);
    }

    #[test]
    fn test_from_config_without_key_is_disabled() {
        let mailer = from_config(&MailConfig::default()).unwrap();
        assert!(!mailer.is_configured());
    }
}
