//! PostgreSQL implementation of SessionStore.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Row};

use crate::domain::booking::{NewBooking, Session, SessionTimes};
use crate::domain::{DomainError, ErrorCode};
use crate::ports::SessionStore;

/// PostgreSQL implementation of SessionStore, one per calendar.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a new PostgresSessionStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn times_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<SessionTimes>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT exam_at, rehearsal_at
            FROM sessions
            WHERE (exam_at >= $1 AND exam_at < $2)
               OR (rehearsal_at >= $1 AND rehearsal_at < $2)
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch session times: {}", e),
            )
        })?;

        rows.into_iter()
            .map(|row| {
                let exam_at: Option<NaiveDateTime> = row.try_get("exam_at").map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to get exam_at: {}", e),
                    )
                })?;
                let rehearsal_at: Option<NaiveDateTime> =
                    row.try_get("rehearsal_at").map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Failed to get rehearsal_at: {}", e),
                        )
                    })?;
                Ok(SessionTimes {
                    exam_at,
                    rehearsal_at,
                })
            })
            .collect()
    }

    async fn exists_at(&self, exam_at: NaiveDateTime) -> Result<bool, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE exam_at = $1")
            .bind(exam_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to check session existence: {}", e),
                )
            })?;

        Ok(result.0 > 0)
    }

    async fn insert_booking(&self, booking: &NewBooking) -> Result<i64, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;

        let row = sqlx::query(
            r#"
            INSERT INTO sessions (capacity, exam_at, rehearsal_at, note, confirmation_sent)
            VALUES ($1, $2, $3, $4, false)
            RETURNING id
            "#,
        )
        .bind(booking.capacity)
        .bind(booking.exam_at)
        .bind(booking.rehearsal_at)
        .bind(&booking.note)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::new(ErrorCode::SlotTaken, "Slot already taken")
            } else {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert session: {}", e),
                )
            }
        })?;

        let session_id: i64 = row.try_get("id").map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to get session id: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO reservations (session_id, user_id, course_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(session_id)
        .bind(booking.user_id)
        .bind(booking.course_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert reservation: {}", e),
            )
        })?;

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit booking: {}", e),
            )
        })?;

        Ok(session_id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, capacity, exam_at, rehearsal_at, note, confirmation_sent
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch session: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row_to_session(row)?)),
            None => Ok(None),
        }
    }

    async fn mark_confirmation_sent(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE sessions SET confirmation_sent = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to update confirmation flag: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Session not found: {}", id),
            ));
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

/// Unique-index violation on (exam_at): a concurrent booker won the
/// race after our pre-insert checks passed.
fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, DomainError> {
    let field = |e: sqlx::Error, name: &str| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", name, e),
        )
    };

    let exam_at: NaiveDateTime = row.try_get("exam_at").map_err(|e| field(e, "exam_at"))?;
    // Legacy rows may carry no rehearsal timestamp.
    let rehearsal_at: Option<NaiveDateTime> = row
        .try_get("rehearsal_at")
        .map_err(|e| field(e, "rehearsal_at"))?;

    Ok(Session {
        id: row.try_get("id").map_err(|e| field(e, "id"))?,
        capacity: row.try_get("capacity").map_err(|e| field(e, "capacity"))?,
        exam_at,
        rehearsal_at: rehearsal_at.unwrap_or(exam_at),
        note: row.try_get("note").map_err(|e| field(e, "note"))?,
        confirmation_sent: row
            .try_get("confirmation_sent")
            .map_err(|e| field(e, "confirmation_sent"))?,
    })
}
