//! PostgreSQL implementation of DirectoryReader.
//!
//! Reads the collaborator-owned user and course tables. The optional
//! contact columns are not guaranteed to exist in every legacy
//! database, so they are read tolerantly from the full row.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::{DomainError, ErrorCode};
use crate::ports::{CourseRecord, DirectoryReader, UserRecord};

/// PostgreSQL implementation of DirectoryReader, one per calendar.
#[derive(Clone)]
pub struct PostgresDirectoryReader {
    pool: PgPool,
}

impl PostgresDirectoryReader {
    /// Creates a new PostgresDirectoryReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryReader for PostgresDirectoryReader {
    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>, DomainError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch user: {}", e),
                )
            })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let required = |name: &str| -> Result<String, DomainError> {
            row.try_get::<String, _>(name).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to get {}: {}", name, e),
                )
            })
        };

        Ok(Some(UserRecord {
            id,
            first_name: required("first_name")?,
            last_name: required("last_name")?,
            email: required("email")?,
            // Optional legacy columns; absent in some installations.
            fiscal_code: row.try_get::<Option<String>, _>("fiscal_code").ok().flatten(),
            phone: row.try_get::<Option<String>, _>("phone").ok().flatten(),
        }))
    }

    async fn find_course(&self, id: i64) -> Result<Option<CourseRecord>, DomainError> {
        let row = sqlx::query("SELECT id, name FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch course: {}", e),
                )
            })?;

        match row {
            Some(row) => {
                let name: String = row.try_get("name").map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to get name: {}", e),
                    )
                })?;
                Ok(Some(CourseRecord { id, name }))
            }
            None => Ok(None),
        }
    }
}
