//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: String,

    /// Subject line for confirmation mails
    #[serde(default = "default_subject")]
    pub confirmation_subject: String,
}

impl EmailConfig {
    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resend_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("RESEND_API_KEY"));
        }
        if !self.resend_api_key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: String::new(),
            confirmation_subject: default_subject(),
        }
    }
}

fn default_subject() -> String {
    "Your exam session is confirmed".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_or_malformed_key() {
        assert!(EmailConfig::default().validate().is_err());
        let bad = EmailConfig {
            resend_api_key: "sk_live_xxx".to_string(),
            ..EmailConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn accepts_resend_key() {
        let config = EmailConfig {
            resend_api_key: "re_123".to_string(),
            ..EmailConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
