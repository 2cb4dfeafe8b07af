//! Resend implementation of ConfirmationNotifier.
//!
//! Each calendar sends from its own address with its own subject line,
//! so the confirmation mail matches the brand the booker saw.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{CalendarKey, DomainError, ErrorCode};
use crate::ports::{BookingConfirmation, ConfirmationNotifier};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Per-calendar sender identity.
#[derive(Debug, Clone)]
pub struct SenderProfile {
    /// Formatted sender, e.g. `Examdesk <noreply@examdesk.example>`.
    pub from: String,
    /// Subject line for confirmation mails.
    pub subject: String,
}

/// Resend implementation of ConfirmationNotifier.
pub struct ResendNotifier {
    client: reqwest::Client,
    api_key: String,
    senders: HashMap<CalendarKey, SenderProfile>,
}

impl ResendNotifier {
    /// Creates a notifier with one sender profile per calendar.
    pub fn new(api_key: impl Into<String>, senders: HashMap<CalendarKey, SenderProfile>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            senders,
        }
    }
}

#[async_trait]
impl ConfirmationNotifier for ResendNotifier {
    async fn send_booking_confirmation(
        &self,
        confirmation: &BookingConfirmation,
    ) -> Result<(), DomainError> {
        let sender = self.senders.get(&confirmation.calendar).ok_or_else(|| {
            DomainError::new(
                ErrorCode::NotificationError,
                format!("No sender configured for calendar {}", confirmation.calendar),
            )
        })?;

        let body = json!({
            "from": sender.from,
            "to": [confirmation.recipient_email],
            "subject": sender.subject,
            "html": render_html(confirmation),
        });

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::NotificationError,
                    format!("Failed to reach notification API: {}", e),
                )
            })?;

        if !response.status().is_success() {
            return Err(DomainError::new(
                ErrorCode::NotificationError,
                format!("Notification API returned {}", response.status()),
            ));
        }

        Ok(())
    }
}

fn render_html(confirmation: &BookingConfirmation) -> String {
    let course_line = if confirmation.course_name.is_empty() {
        String::new()
    } else {
        format!("<p>Course: {}</p>", confirmation.course_name)
    };

    format!(
        "<p>Hello {name},</p>\
         <p>Your exam session is confirmed for <strong>{date}</strong> at <strong>{time}</strong>.</p>\
         {course_line}\
         <p>Please arrive ten minutes early with a valid ID.</p>",
        name = confirmation.recipient_name,
        date = confirmation.slot_start.format("%A %d %B %Y"),
        time = confirmation.slot_start.format("%H:%M"),
        course_line = course_line,
    )
}
