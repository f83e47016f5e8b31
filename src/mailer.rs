use axum::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::info;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Error, Debug)]
pub enum MailError {
    #[error("email API returned an error: {message} (Status: {status})")]
    Api { status: u16, message: String },

    #[error("email request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl From<MailError> for crate::error::ApiError {
    fn from(err: MailError) -> Self {
        crate::error::ApiError::internal("Server error", err.into())
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_email(&self, to: &str, code: &str) -> Result<(), MailError>;
    async fn send_welcome_email(&self, to: &str, name: &str) -> Result<(), MailError>;
    async fn send_password_reset_email(&self, to: &str, reset_url: &str) -> Result<(), MailError>;
    async fn send_reset_success_email(&self, to: &str) -> Result<(), MailError>;
}

/// Transactional email via the SendGrid v3 API.
#[derive(Clone)]
pub struct SendgridMailer {
    http: reqwest::Client,
    api_key: String,
    from_email: String,
    from_name: String,
}

impl SendgridMailer {
    pub fn new(
        api_key: impl Into<String>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            from_email: from_email.into(),
            from_name: from_name.into(),
        }
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.from_email, "name": self.from_name },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html }],
        });

        let resp = self
            .http
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }
        info!(%to, subject, "email sent");
        Ok(())
    }
}

#[async_trait]
impl Mailer for SendgridMailer {
    async fn send_verification_email(&self, to: &str, code: &str) -> Result<(), MailError> {
        let html = templates::VERIFICATION_EMAIL.replace("{verificationCode}", code);
        self.send(to, "Verify your email", &html).await
    }

    async fn send_welcome_email(&self, to: &str, name: &str) -> Result<(), MailError> {
        let html = templates::WELCOME_EMAIL.replace("{name}", name);
        self.send(to, "Welcome to StudyONE", &html).await
    }

    async fn send_password_reset_email(&self, to: &str, reset_url: &str) -> Result<(), MailError> {
        let html = templates::PASSWORD_RESET_REQUEST.replace("{resetURL}", reset_url);
        self.send(to, "Reset your password", &html).await
    }

    async fn send_reset_success_email(&self, to: &str) -> Result<(), MailError> {
        self.send(to, "Password Reset Successful", templates::PASSWORD_RESET_SUCCESS)
            .await
    }
}

mod templates {
    pub const VERIFICATION_EMAIL: &str = r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Verify your email</h2>
  <p>Thanks for signing up for StudyONE. Your verification code is:</p>
  <p style="font-size: 32px; font-weight: bold; letter-spacing: 6px;">{verificationCode}</p>
  <p>Enter this code on the verification page. The code expires in 24 hours.</p>
  <p>If you didn't create an account, you can ignore this email.</p>
</div>"#;

    pub const WELCOME_EMAIL: &str = r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Welcome to StudyONE, {name}!</h2>
  <p>Your email is verified and your account is ready.</p>
  <p>Set your first alarm, practice an interview with the chatbot, or turn a
  lecture recording into study notes.</p>
</div>"#;

    pub const PASSWORD_RESET_REQUEST: &str = r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Reset your password</h2>
  <p>We received a request to reset your StudyONE password. Click the button
  below to choose a new one:</p>
  <p><a href="{resetURL}" style="background: #4caf50; color: #fff; padding: 12px 24px; text-decoration: none; border-radius: 4px;">Reset Password</a></p>
  <p>This link expires in 1 hour. If you didn't request a reset, you can
  ignore this email.</p>
</div>"#;

    pub const PASSWORD_RESET_SUCCESS: &str = r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Password reset successful</h2>
  <p>Your StudyONE password has been changed. If this wasn't you, contact
  support immediately.</p>
</div>"#;
}
