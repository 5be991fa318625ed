//! Customer email notifications.
//!
//! ```text
//! service (after commit) ──► dispatch(notifier, payload)
//!                                  │ tokio::spawn, never awaited
//!                                  ▼
//!                         Notifier::send ──► SmtpNotifier (lettre)
//!                                  │
//!                                  └─ failure: logged, request unaffected
//! ```
//!
//! Notifications are off unless `EMAIL_NOTIFICATIONS` is set; the services
//! then hold no notifier at all.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::SmtpConfig;
use shelf_core::{OrderReceipt, OrderTotals};

/// One outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPayload {
    pub to: String,
    pub subject: String,

    /// HTML body
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// Something that can deliver an [`EmailPayload`].
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, payload: EmailPayload) -> Result<(), NotifyError>;
}

/// Sends `payload` in the background. Errors are logged, never returned.
pub fn dispatch(notifier: Arc<dyn Notifier>, payload: EmailPayload) {
    tokio::spawn(async move {
        let to = payload.to.clone();
        let subject = payload.subject.clone();

        match notifier.send(payload).await {
            Ok(()) => info!(%to, %subject, "Notification sent"),
            Err(e) => warn!(%to, %subject, error = %e, "Notification failed"),
        }
    });
}

// =============================================================================
// SMTP
// =============================================================================

/// [`Notifier`] backed by an SMTP relay (STARTTLS).
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(SmtpNotifier {
            transport,
            from: config.from.clone(),
        })
    }
}

fn parse_mailbox(address: &str) -> Result<lettre::message::Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| NotifyError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, payload: EmailPayload) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .to(parse_mailbox(&payload.to)?)
            .subject(payload.subject)
            .header(ContentType::TEXT_HTML)
            .body(payload.body)
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(())
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Escapes text interpolated into the HTML bodies.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Sent once after registration.
pub fn welcome_email(email: &str, username: &str) -> EmailPayload {
    let username = escape_html(username);
    EmailPayload {
        to: email.to_string(),
        subject: "Welcome to Shelf".to_string(),
        body: format!(
            "<p>Dear {username},</p>\n\
             <p>Welcome to our online bookstore!</p>\n\
             <p>Your account has been successfully created.</p>\n\
             <p>Start exploring our collection of books and enjoy shopping with us!</p>\n\
             <p>Best regards,</p>\n\
             <p>The Bookstore Team</p>\n"
        ),
    }
}

/// Sent after an order commits.
pub fn order_confirmation(email: &str, receipt: &OrderReceipt, totals: &OrderTotals) -> EmailPayload {
    EmailPayload {
        to: email.to_string(),
        subject: "Order Confirmation".to_string(),
        body: format!(
            "<p>Dear {email},</p>\n\
             <p>Thank you for your order!</p>\n\
             <p>Order ID: {order_id}</p>\n\
             <p>Total items: {total_item}</p>\n\
             <p>Total price: {total_price}</p>\n\
             <p>Customer reference: {reference}</p>\n\
             <p>Order date: {order_date}</p>\n\
             <p>Tracking number: {tracking}</p>\n\
             <p>Best regards,</p>\n\
             <p>The Bookstore Team</p>\n",
            email = escape_html(email),
            order_id = receipt.order_id,
            total_item = totals.total_item,
            total_price = totals.total_price,
            reference = escape_html(&receipt.customer_reference),
            order_date = escape_html(&receipt.order_date),
            tracking = escape_html(&receipt.tracking_number),
        ),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tokio::sync::Mutex;

    /// Keeps every payload instead of sending it.
    #[derive(Default)]
    pub struct RecordingNotifier {
        sent: Mutex<Vec<EmailPayload>>,
    }

    impl RecordingNotifier {
        pub async fn sent(&self) -> Vec<EmailPayload> {
            self.sent.lock().await.clone()
        }

        /// Polls until `count` payloads arrived (dispatch is fire-and-forget).
        pub async fn wait_for(&self, count: usize) -> Vec<EmailPayload> {
            for _ in 0..100 {
                let sent = self.sent().await;
                if sent.len() >= count {
                    return sent;
                }
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
            self.sent().await
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, payload: EmailPayload) -> Result<(), NotifyError> {
            self.sent.lock().await.push(payload);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;
    use shelf_core::Money;

    #[test]
    fn test_welcome_email() {
        let payload = welcome_email("reader@example.com", "reader");

        assert_eq!(payload.to, "reader@example.com");
        assert!(payload.body.contains("Dear reader,"));
        assert!(payload.body.contains("Welcome to our online bookstore!"));
    }

    #[test]
    fn test_order_confirmation() {
        let receipt = OrderReceipt {
            order_id: 12,
            customer_reference: "AbC123xY".to_string(),
            tracking_number: "JNE-0123456789".to_string(),
            order_date: "2024-03-01T12:30:00+00:00".to_string(),
        };
        let mut totals = OrderTotals::default();
        totals.add_line(Money::from_cents(1000), 5).unwrap();

        let payload = order_confirmation("reader@example.com", &receipt, &totals);

        assert_eq!(payload.subject, "Order Confirmation");
        assert!(payload.body.contains("Order ID: 12"));
        assert!(payload.body.contains("Total price: 50.00"));
        assert!(payload.body.contains("JNE-0123456789"));
    }

    #[test]
    fn test_interpolated_values_are_escaped() {
        let payload = welcome_email("reader@example.com", "<b>x</b>");
        assert!(payload.body.contains("Dear &lt;b&gt;x&lt;/b&gt;,"));
        assert!(!payload.body.contains("<b>x"));

        let receipt = OrderReceipt {
            order_id: 1,
            customer_reference: "AbC123xY".to_string(),
            tracking_number: "A&B-0123456789".to_string(),
            order_date: "2024-03-01T12:30:00+00:00".to_string(),
        };
        let payload = order_confirmation("o'neil@example.com", &receipt, &OrderTotals::default());
        assert!(payload.body.contains("Dear o&#39;neil@example.com,"));
        assert!(payload.body.contains("A&amp;B-0123456789"));
        assert_eq!(payload.to, "o'neil@example.com");
    }

    #[test]
    fn test_invalid_mailbox() {
        assert!(matches!(
            parse_mailbox("not an address"),
            Err(NotifyError::Address { .. })
        ));
        assert!(parse_mailbox("Shelf <no-reply@example.com>").is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_delivers_in_background() {
        let notifier = Arc::new(RecordingNotifier::default());
        dispatch(notifier.clone(), welcome_email("reader@example.com", "reader"));

        let sent = notifier.wait_for(1).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "reader@example.com");
    }
}
