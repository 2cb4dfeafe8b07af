//! Confirmation notifier port.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::{CalendarKey, DomainError};

/// Everything the notification channel needs to confirm a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub calendar: CalendarKey,
    pub recipient_email: String,
    pub recipient_name: String,
    pub course_name: String,
    pub slot_start: NaiveDateTime,
}

/// Sends booking confirmations.
///
/// Strictly best-effort from the caller's point of view: a booking is
/// durable before this port is invoked and stays valid if it fails.
#[async_trait]
pub trait ConfirmationNotifier: Send + Sync {
    /// Dispatch a confirmation for a freshly booked slot.
    ///
    /// # Errors
    ///
    /// - `NotificationError` when the channel rejects or times out
    async fn send_booking_confirmation(
        &self,
        confirmation: &BookingConfirmation,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_notifier_is_object_safe() {
        fn _accepts_dyn(_notifier: &dyn ConfirmationNotifier) {}
    }
}
