//! Messaging handoff.
//!
//! The final checkout step hands the rendered order message to the shop's
//! messaging channel. The handoff is fire-and-forget: once the channel
//! accepts the message, delivery and any reply happen outside this app.

use mockall::automock;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

/// Characters left bare in the message query parameter. Everything else,
/// including each byte of multi-byte UTF-8 sequences, is percent-encoded.
const MESSAGE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Errors from the messaging handoff.
#[derive(Debug, Error)]
pub enum HandoffError {
    /// The channel could not be opened.
    #[error("messaging channel unavailable: {0}")]
    Unavailable(String),
}

/// Narrow interface to the shop's messaging channel.
#[automock]
pub trait MessagingHandoff: Send + Sync {
    /// Hand a rendered order message to the channel.
    fn open(&self, message: &str) -> Result<(), HandoffError>;
}

/// Handoff via a `wa.me` deep link to the shop's WhatsApp number.
#[derive(Debug, Clone)]
pub struct WhatsAppLink {
    recipient: String,
}

impl WhatsAppLink {
    /// Build a handoff for the given recipient number (digits only,
    /// including country code).
    #[must_use]
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }

    /// The deep link carrying `message` as its prefilled text.
    #[must_use]
    pub fn link(&self, message: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.recipient,
            utf8_percent_encode(message, MESSAGE_ENCODE_SET),
        )
    }
}

impl MessagingHandoff for WhatsAppLink {
    fn open(&self, message: &str) -> Result<(), HandoffError> {
        let link = self.link(message);

        tracing::info!(recipient = %self.recipient, %link, "order message handed to whatsapp");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_targets_the_recipient_number() {
        let handoff = WhatsAppLink::new("5599984680391");

        assert!(
            handoff
                .link("Olá")
                .starts_with("https://wa.me/5599984680391?text=")
        );
    }

    #[test]
    fn spaces_and_newlines_are_percent_encoded() {
        let handoff = WhatsAppLink::new("5599984680391");

        assert_eq!(
            handoff.link("a b\nc"),
            "https://wa.me/5599984680391?text=a%20b%0Ac"
        );
    }

    #[test]
    fn message_markup_characters_pass_through_bare() {
        let handoff = WhatsAppLink::new("5599984680391");

        let link = handoff.link("*Total: R$ 10.00*");

        assert!(link.contains("*Total"), "got {link}");
        assert!(link.contains("%24%2010.00*"), "got {link}");
    }

    #[test]
    fn multibyte_text_is_encoded_per_byte() {
        let handoff = WhatsAppLink::new("5599984680391");

        assert_eq!(
            handoff.link("Tênis"),
            "https://wa.me/5599984680391?text=T%C3%AAnis"
        );
    }
}
