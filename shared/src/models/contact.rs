//! Contact form message

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Contact form submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactMessage {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"), length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_message_validation() {
        let msg = ContactMessage {
            name: "Jo".into(),
            email: "jo@example.com".into(),
            message: "Hello there".into(),
        };
        assert!(msg.validate().is_ok());

        let empty_message = ContactMessage {
            message: String::new(),
            ..msg.clone()
        };
        assert!(empty_message.validate().is_err());

        let bad_email = ContactMessage {
            email: "nope".into(),
            ..msg
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_contact_message_length_limit() {
        let msg = ContactMessage {
            name: "Jo".into(),
            email: "jo@example.com".into(),
            message: "x".repeat(5001),
        };
        assert!(msg.validate().is_err());
    }
}
