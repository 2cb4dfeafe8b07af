//! Session store port (one per calendar).
//!
//! Each calendar has its own session storage, but occupancy is shared:
//! availability and booking always consult both stores through this
//! contract.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::booking::{NewBooking, Session, SessionTimes};
use crate::domain::DomainError;

/// Persistence contract for booked sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Timestamps of every session whose exam or rehearsal falls in
    /// `[from, to)`. Used for busy-interval aggregation; pure read.
    async fn times_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<SessionTimes>, DomainError>;

    /// Whether a session with this exact exam timestamp exists.
    ///
    /// Narrower than the interval overlap test: the duplicate-start
    /// guard needs the exact timestamp, not the widened occupancy.
    async fn exists_at(&self, exam_at: NaiveDateTime) -> Result<bool, DomainError>;

    /// Insert a session and its reservation in one transaction,
    /// returning the new session id.
    ///
    /// # Errors
    ///
    /// - `SlotTaken` when a concurrent insert won the same exam
    ///   timestamp
    /// - `DatabaseError` on any other persistence failure
    async fn insert_booking(&self, booking: &NewBooking) -> Result<i64, DomainError>;

    /// Fetch a session by id. Returns `None` if not found.
    async fn find_by_id(&self, id: i64) -> Result<Option<Session>, DomainError>;

    /// Record that the confirmation notification went out.
    async fn mark_confirmation_sent(&self, id: i64) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }
}
