//! Email service for delivering download links after a purchase.
//!
//! Supports multiple email providers:
//! - `console`: Logs emails to console (development)
//! - `smtp`: Sends via SMTP server
//! - `sendgrid`: Uses SendGrid API

use lettre::message::{header::ContentType, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use domain::services::download::order_number;

use crate::config::{EmailConfig, StorefrontConfig};

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
}

/// One purchased file in the download e-mail.
#[derive(Debug, Clone)]
pub struct DownloadLink {
    pub product_name: String,
    pub url: String,
}

/// Sends the post-purchase e-mail.
#[async_trait::async_trait]
pub trait DownloadMailer: Send + Sync {
    async fn send_download_links(
        &self,
        to: &str,
        order_id: Uuid,
        links: &[DownloadLink],
    ) -> Result<(), EmailError>;
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    store_name: String,
    link_validity_days: u32,
    http: reqwest::Client,
    smtp: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl EmailService {
    /// Creates the service. The SMTP transport is built once here.
    pub fn new(config: &EmailConfig, storefront: &StorefrontConfig) -> Result<Self, EmailError> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmailError::ProviderError(e.to_string()))?;

        let smtp = if config.enabled && config.provider == "smtp" {
            Some(build_smtp_transport(config, timeout)?)
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config.clone()),
            store_name: storefront.name.clone(),
            link_validity_days: storefront.link_validity_days,
            http,
            smtp,
        })
    }

    /// Check if email service is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "smtp" => self.send_smtp(message).await,
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Builds the download e-mail without sending it.
    pub fn download_message(&self, to: &str, order_id: Uuid, links: &[DownloadLink]) -> EmailMessage {
        let order_ref = order_number(order_id).to_uppercase();
        let customer = customer_name(to);
        let subject = format!("Your {} Purchase - Order #{}", self.store_name, order_ref);

        let text_links: String = links
            .iter()
            .map(|l| format!("- {}: {}\n", l.product_name, l.url))
            .collect();

        let body_text = format!(
            r#"Hi {name},

Thank you for your purchase! Your order #{order} has been confirmed.

Download your files:

{links}
Links will remain active for {days} days.

Best regards,
The {store} Team"#,
            name = customer,
            order = order_ref,
            links = text_links,
            days = self.link_validity_days,
            store = self.store_name,
        );

        let html_links: String = links
            .iter()
            .map(|l| {
                format!(
                    r#"        <div style="margin: 16px 0;">
            <p style="margin: 0 0 8px 0; font-weight: bold;">{name}</p>
            <a href="{url}" style="background: #10b981; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; font-weight: bold; display: inline-block;">Download</a>
        </div>
"#,
                    name = escape_html(&l.product_name),
                    url = escape_html(&l.url),
                )
            })
            .collect();

        let body_html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Your purchase</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: #111827; padding: 30px; border-radius: 10px 10px 0 0;">
        <h1 style="color: #10b981; margin: 0; font-size: 24px;">{store}</h1>
    </div>
    <div style="background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px;">
        <h2 style="color: #333; margin-top: 0;">Thank you for your purchase!</h2>
        <p>Hi {name},</p>
        <p>Your order <strong>#{order}</strong> has been confirmed. Your files are ready:</p>
{links}        <p style="color: #666; font-size: 14px;">Links will remain active for {days} days.</p>
        <hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">
        <p style="color: #999; font-size: 12px;">Each file is licensed to {email} and watermarked with your order number.</p>
    </div>
</body>
</html>"#,
            store = escape_html(&self.store_name),
            name = escape_html(&customer),
            order = order_ref,
            links = html_links,
            days = self.link_validity_days,
            email = escape_html(to),
        );

        EmailMessage {
            to: to.to_string(),
            to_name: Some(customer),
            subject,
            body_text,
            body_html: Some(body_html),
        }
    }

    /// Console provider - logs email to console (for development).
    async fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            subject = %message.subject,
            from = %self.config.sender_email,
            "Email (console provider)"
        );
        info!(body_text = %message.body_text, "Email body (plain text)");

        if let Some(html) = &message.body_html {
            debug!(body_html_length = html.len(), "Email body (HTML)");
        }

        Ok(())
    }

    /// SMTP provider - sends via SMTP server.
    async fn send_smtp(&self, message: EmailMessage) -> Result<(), EmailError> {
        let transport = self.smtp.as_ref().ok_or(EmailError::NotConfigured)?;

        let from = mailbox(&self.config.sender_email, Some(&self.config.sender_name))?;
        let to = mailbox(&message.to, message.to_name.as_deref())?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone());

        let email = match message.body_html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.body_text,
                html,
            )),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.body_text),
        }
        .map_err(|e| EmailError::SendFailed(format!("Failed to build message: {}", e)))?;

        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendFailed(format!("SMTP send failed: {}", e)))?;

        info!(to = %message.to, subject = %message.subject, "Email sent via SMTP");
        Ok(())
    }

    /// SendGrid provider - sends via SendGrid API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let mut to = serde_json::json!({ "email": message.to });
        if let Some(name) = &message.to_name {
            to["name"] = serde_json::json!(name);
        }

        let mut content = vec![serde_json::json!({
            "type": "text/plain",
            "value": message.body_text
        })];
        if let Some(html) = &message.body_html {
            content.push(serde_json::json!({
                "type": "text/html",
                "value": html
            }));
        }

        let body = serde_json::json!({
            "personalizations": [{ "to": [to] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": content
        });

        let response = self
            .http
            .post(SENDGRID_URL)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(to = %message.to, subject = %message.subject, "Email sent via SendGrid");
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_body, "SendGrid API error");
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}

#[async_trait::async_trait]
impl DownloadMailer for EmailService {
    async fn send_download_links(
        &self,
        to: &str,
        order_id: Uuid,
        links: &[DownloadLink],
    ) -> Result<(), EmailError> {
        let message = self.download_message(to, order_id, links);
        self.send(message).await
    }
}

fn build_smtp_transport(
    config: &EmailConfig,
    timeout: Duration,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
    if config.smtp_host.is_empty() {
        return Err(EmailError::NotConfigured);
    }

    let builder = if !config.smtp_use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    } else if config.smtp_port == 465 {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| EmailError::ProviderError(e.to_string()))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| EmailError::ProviderError(e.to_string()))?
    };

    let mut builder = builder.port(config.smtp_port).timeout(Some(timeout));
    if !config.smtp_username.is_empty() {
        builder = builder.credentials(Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        ));
    }

    Ok(builder.build())
}

fn mailbox(address: &str, name: Option<&str>) -> Result<Mailbox, EmailError> {
    let address = address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))?;
    Ok(Mailbox::new(name.map(str::to_string), address))
}

/// Greeting name derived from the local part of an address.
pub fn customer_name(email: &str) -> String {
    match email.split('@').next() {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => "there".to_string(),
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
