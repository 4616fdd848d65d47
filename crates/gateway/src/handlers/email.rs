//! Notification and password-reset email

use axum::extract::State;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::extract::Json;
use crate::{handlers::users::missing_fields, AppState};
use sarthi_common::{
    auth::AuthContext,
    db::models::User,
    errors::{AppError, Result},
    mail::{self, templates, Email, NotificationType},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub recipient_email: Option<String>,
    pub recipient_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PasswordResetRequest {
    pub email: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailResponse {
    pub success: bool,
    pub message: String,
    pub email_sent: bool,
}

/// Render and send a notification to a stored user
pub(crate) async fn notify(
    state: &AppState,
    recipient: &User,
    kind: NotificationType,
    data: &HashMap<String, String>,
) -> bool {
    let email = Email {
        to: recipient.email.clone(),
        subject: templates::subject(kind).to_string(),
        html: templates::render_notification(kind, &recipient.name, data, &state.config.mail.app_url),
    };
    mail::deliver(state.mailer.as_ref(), email).await
}

/// Reviewers only; faculty are notified through status changes
pub async fn send_notification(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<NotificationRequest>,
) -> Result<Json<EmailResponse>> {
    auth.require_reviewer()?;

    let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

    let (Some(to), Some(name), Some(kind)) = (
        present(&request.recipient_email),
        present(&request.recipient_name),
        present(&request.kind),
    ) else {
        return Err(missing_fields(&[
            ("recipientEmail", &request.recipient_email),
            ("recipientName", &request.recipient_name),
            ("type", &request.kind),
        ]));
    };
    let kind: NotificationType = kind
        .parse()
        .map_err(|_| AppError::validation(format!("Unknown notification type: {}", kind)))?;

    let email = Email {
        to: to.clone(),
        subject: templates::subject(kind).to_string(),
        html: templates::render_notification(kind, &name, &request.data, &state.config.mail.app_url),
    };
    let email_sent = mail::deliver(state.mailer.as_ref(), email).await;

    tracing::info!(
        kind = %kind,
        to = %to,
        sent = email_sent,
        requested_by = %auth.user_id,
        "Notification processed"
    );

    Ok(Json(EmailResponse {
        success: true,
        message: if email_sent {
            "Email sent successfully"
        } else {
            "Email service not configured"
        }
        .to_string(),
        email_sent,
    }))
}

/// Informational reset email, sent only to known accounts
pub async fn password_reset(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<Json<EmailResponse>> {
    let email = request
        .email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::validation("Email is required"))?;

    let known = state.store.find_user_by_email(&email).await?.is_some();
    let email_sent = if known {
        let message = Email {
            to: email.clone(),
            subject: templates::PASSWORD_RESET_SUBJECT.to_string(),
            html: templates::render_password_reset(&state.config.mail.app_url),
        };
        mail::deliver(state.mailer.as_ref(), message).await
    } else {
        false
    };

    tracing::info!(known, sent = email_sent, "Password reset requested");

    Ok(Json(EmailResponse {
        success: true,
        message: "If the account exists, password reset instructions have been sent".to_string(),
        email_sent,
    }))
}
