//! Outcome of a booking attempt.
//!
//! The booking itself either succeeds or fails; its side effects
//! (profile sync, confirmation mail) are reported separately so a
//! failed side effect never masquerades as a failed booking.

use chrono::NaiveDateTime;

/// Result of one best-effort side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffectOutcome {
    Completed,
    Failed,
}

impl SideEffectOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SideEffectOutcome::Completed)
    }
}

/// A durable booking together with its side-effect outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReceipt {
    pub session_id: i64,
    pub slot_start: NaiveDateTime,
    pub profile_sync: SideEffectOutcome,
    pub confirmation: SideEffectOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_effect_outcome_reports_completion() {
        assert!(SideEffectOutcome::Completed.is_completed());
        assert!(!SideEffectOutcome::Failed.is_completed());
    }
}
