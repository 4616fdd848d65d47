//! HTML email bodies

use super::NotificationType;
use crate::report::escape_html;
use std::collections::HashMap;

struct Style {
    subject: &'static str,
    icon: &'static str,
    color: &'static str,
}

fn style(kind: NotificationType) -> Style {
    use NotificationType::*;
    match kind {
        AccountCreated => Style { subject: "Welcome to Shikshak Sarthi!", icon: "👋", color: "#10b981" },
        HodAccountCreated => Style { subject: "HOD Account Created - Shikshak Sarthi", icon: "👑", color: "#f59e0b" },
        FormSubmitted => Style { subject: "PBAS Form Submitted Successfully", icon: "📋", color: "#3b82f6" },
        FormApproved => Style { subject: "PBAS Form Approved!", icon: "✅", color: "#10b981" },
        FormRejected => Style { subject: "PBAS Form Requires Attention", icon: "⚠️", color: "#ef4444" },
        FormRevisionRequested => Style { subject: "Revision Requested for PBAS Form", icon: "📝", color: "#f59e0b" },
        Reminder => Style { subject: "Reminder: PBAS Form Submission", icon: "⏰", color: "#6366f1" },
    }
}

fn content(kind: NotificationType, data: &HashMap<String, String>) -> String {
    use NotificationType::*;
    match kind {
        AccountCreated => "Your faculty account has been created successfully. You can now log in with your credentials.".to_string(),
        HodAccountCreated => {
            let dept = data
                .get("department")
                .filter(|d| !d.is_empty())
                .map(|d| format!(" for {}", escape_html(d)))
                .unwrap_or_default();
            format!("You have been assigned as Head of Department{}. You now have access to review and manage faculty appraisals.", dept)
        }
        FormSubmitted => "Your PBAS form has been submitted and is now pending review by your HOD.".to_string(),
        FormApproved => "Congratulations! Your PBAS form has been approved.".to_string(),
        FormRejected => "Your PBAS form requires revision. Please check the comments and resubmit.".to_string(),
        FormRevisionRequested => "Your HOD has requested revisions to your PBAS form. Please review the feedback and update accordingly.".to_string(),
        Reminder => "This is a reminder to submit your PBAS form before the deadline.".to_string(),
    }
}

pub fn subject(kind: NotificationType) -> &'static str {
    style(kind).subject
}

fn frame(header: &str, body: &str, app_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="margin: 0; padding: 0; background-color: #f8fafc; font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;">
  <table role="presentation" width="100%" cellspacing="0" cellpadding="0" style="background-color: #f8fafc;">
    <tr>
      <td align="center" style="padding: 40px 20px;">
        <table role="presentation" width="600" cellspacing="0" cellpadding="0" style="background-color: #ffffff; border-radius: 16px; overflow: hidden;">
          <tr>
            <td style="background: linear-gradient(135deg, #2b2d42 0%, #1a1a2e 100%); padding: 40px; text-align: center;">
              {header}
            </td>
          </tr>
          <tr>
            <td style="padding: 40px;">
              {body}
              <hr style="border: none; border-top: 1px solid #e2e8f0; margin: 24px 0;">
              <p style="color: #94a3b8; font-size: 12px; text-align: center;">
                &copy; Shikshak Sarthi - Faculty Appraisal System<br>
                <a href="{app_url}/help" style="color: #64748b;">Need help?</a>
              </p>
            </td>
          </tr>
        </table>
      </td>
    </tr>
  </table>
</body>
</html>
"#
    )
}

/// Notification email. `data` may carry `department` and `tempPassword`.
pub fn render_notification(
    kind: NotificationType,
    recipient_name: &str,
    data: &HashMap<String, String>,
    app_url: &str,
) -> String {
    let style = style(kind);
    let app_url = escape_html(app_url);

    let header = format!(
        r#"<div style="font-size: 48px; margin-bottom: 16px;">{}</div>
              <h1 style="color: #ffffff; font-size: 24px; margin: 0;">Shikshak Sarthi</h1>
              <p style="color: #8d99ae; margin: 8px 0 0;">Faculty Appraisal System</p>"#,
        style.icon
    );

    let password = data
        .get("tempPassword")
        .filter(|p| !p.is_empty())
        .map(|p| {
            format!(
                r#"<div style="background-color: #f1f5f9; border-radius: 12px; padding: 24px; margin: 24px 0;">
                <p style="color: #475569; font-size: 14px; margin: 0 0 12px;"><strong>Your temporary password:</strong></p>
                <code style="background-color: #e2e8f0; padding: 8px 16px; border-radius: 6px; font-size: 18px; color: #1e293b;">{}</code>
                <p style="color: #64748b; font-size: 12px; margin: 16px 0 0;">Please change this password after your first login.</p>
              </div>"#,
                escape_html(p)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<h2 style="color: #1e293b; font-size: 22px; margin: 0 0 16px;">Hello, {name}!</h2>
              <p style="color: #64748b; font-size: 16px; line-height: 1.6;">{content}</p>
              {password}
              <div style="text-align: center; margin: 32px 0;">
                <a href="{app_url}/auth/login" style="display: inline-block; background-color: {color}; color: #ffffff; padding: 14px 32px; border-radius: 8px; text-decoration: none; font-weight: 600;">Go to Dashboard</a>
              </div>"#,
        name = escape_html(recipient_name),
        content = content(kind, data),
        password = password,
        app_url = app_url,
        color = style.color,
    );

    frame(&header, &body, &app_url)
}

pub const PASSWORD_RESET_SUBJECT: &str = "Password Reset Request - Shikshak Sarthi";

pub fn render_password_reset(app_url: &str) -> String {
    let app_url = escape_html(app_url);
    let header = r#"<h1 style="color: #ffffff; font-size: 24px; margin: 0;">🔐 Password Reset</h1>
              <p style="color: #8d99ae; margin: 8px 0 0;">Shikshak Sarthi</p>"#;
    let body = format!(
        r#"<h2 style="color: #1e293b; font-size: 22px; margin: 0 0 16px; text-align: center;">Password Reset Requested</h2>
              <p style="color: #64748b; font-size: 16px; line-height: 1.6; text-align: center;">
                We received a request to reset your password. Contact your administrator or sign in at
                <a href="{app_url}/auth/login">{app_url}/auth/login</a> to continue.
              </p>
              <div style="background-color: #fef3c7; border-radius: 8px; padding: 16px; margin: 24px 0;">
                <p style="color: #92400e; font-size: 14px; margin: 0;">If you didn't request this, please ignore this email.</p>
              </div>"#
    );

    frame(header, &body, &app_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_escapes_name() {
        let html = render_notification(
            NotificationType::AccountCreated,
            "<script>alert(1)</script>",
            &HashMap::new(),
            "http://localhost:3000",
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("temporary password"));
    }

    #[test]
    fn test_temp_password_block() {
        let mut data = HashMap::new();
        data.insert("tempPassword".to_string(), "Abc123!@".to_string());
        let html = render_notification(NotificationType::AccountCreated, "Asha", &data, "https://app");
        assert!(html.contains("Your temporary password"));
        assert!(html.contains("Abc123!@"));
        assert!(html.contains("https://app/auth/login"));
    }

    #[test]
    fn test_hod_department_interpolated() {
        let mut data = HashMap::new();
        data.insert("department".to_string(), "Physics".to_string());
        let html = render_notification(NotificationType::HodAccountCreated, "R", &data, "x");
        assert!(html.contains("Head of Department for Physics"));
        assert_eq!(subject(NotificationType::HodAccountCreated), "HOD Account Created - Shikshak Sarthi");
    }
}
