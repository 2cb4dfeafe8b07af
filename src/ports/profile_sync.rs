//! Profile sync port.
//!
//! Pushes a denormalized copy of a user's contact data into the
//! calendar's own storage so reporting and invoicing there never have
//! to reach back into the collaborator store.

use async_trait::async_trait;

use crate::domain::DomainError;

use super::directory::UserRecord;

/// Upserts the denormalized profile row for a user.
///
/// Implementations discover which optional columns their storage
/// actually has and skip the rest; a calendar without a phone column
/// simply never receives phone numbers.
#[async_trait]
pub trait ProfileSync: Send + Sync {
    /// Insert or update the profile row for this user.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure. Callers on the
    ///   booking path treat this as best-effort and must not propagate
    ///   it.
    async fn sync(&self, user: &UserRecord) -> Result<(), DomainError>;
}
