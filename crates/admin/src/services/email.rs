//! Email service for order notifications.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. The
//! rendered message is returned to the caller so the dispatch can be
//! recorded in the email audit log exactly as sent.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use soundhaus_core::{OrderId, OrderStatus};

use crate::config::EmailConfig;

/// HTML template for order status emails.
#[derive(Template)]
#[template(path = "email/order_status.html")]
struct OrderStatusEmailHtml<'a> {
    customer_name: &'a str,
    order_id: OrderId,
    status: String,
}

/// Plain text template for order status emails.
#[derive(Template)]
#[template(path = "email/order_status.txt")]
struct OrderStatusEmailText<'a> {
    customer_name: &'a str,
    order_id: OrderId,
    status: String,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A fully rendered outbound email.
///
/// `text` is what gets recorded in the audit log.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub text: String,
    /// HTML body.
    pub html: String,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send an order status notification.
    ///
    /// Returns the rendered message on success so the caller can append it
    /// to the audit log.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to render or send.
    pub async fn send_order_status(
        &self,
        to: &str,
        order_id: OrderId,
        customer_name: &str,
        status: OrderStatus,
    ) -> Result<RenderedEmail, EmailError> {
        let rendered = render_order_status(order_id, customer_name, status)?;
        self.send_multipart_email(to, &rendered.subject, &rendered.text, &rendered.html)
            .await?;
        Ok(rendered)
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

/// Render the status notification without sending it.
fn render_order_status(
    order_id: OrderId,
    customer_name: &str,
    status: OrderStatus,
) -> Result<RenderedEmail, EmailError> {
    let html = OrderStatusEmailHtml {
        customer_name,
        order_id,
        status: status.to_string(),
    }
    .render()?;
    let text = OrderStatusEmailText {
        customer_name,
        order_id,
        status: status.to_string(),
    }
    .render()?;

    Ok(RenderedEmail {
        subject: format!("Your Soundhaus order #{order_id} is now {status}"),
        text,
        html,
    })
}
