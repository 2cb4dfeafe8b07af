//! Directory port: read access to the external user/course store.
//!
//! Users and courses are owned by a collaborator system; this core
//! only ever reads them, and only by id.

use async_trait::async_trait;

use crate::domain::DomainError;

/// A user as the collaborator store records it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub fiscal_code: Option<String>,
    pub phone: Option<String>,
}

impl UserRecord {
    /// Display name for confirmation pages and notifications.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// A course as the collaborator store records it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub id: i64,
    pub name: String,
}

/// Read-only lookups against the user/course store.
#[async_trait]
pub trait DirectoryReader: Send + Sync {
    /// Find a user by id. Returns `None` if not found.
    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>, DomainError>;

    /// Find a course by id. Returns `None` if not found.
    async fn find_course(&self, id: i64) -> Result<Option<CourseRecord>, DomainError>;
}
