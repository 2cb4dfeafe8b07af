//! PostgreSQL implementation of ProfileSync.
//!
//! The denormalized profile table differs between the two legacy
//! databases: the optional contact columns exist in some installations
//! and not in others. The actual column set is discovered once per
//! process from `information_schema` and reused for every upsert.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::sync::OnceCell;

use crate::domain::{DomainError, ErrorCode};
use crate::ports::{ProfileSync, UserRecord};

/// Logical profile fields this core knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileField {
    Id,
    FirstName,
    LastName,
    Email,
    FiscalCode,
    Phone,
}

/// Logical field, physical column name, required flag.
const LOGICAL_FIELDS: [(ProfileField, &str, bool); 6] = [
    (ProfileField::Id, "id", true),
    (ProfileField::FirstName, "first_name", true),
    (ProfileField::LastName, "last_name", true),
    (ProfileField::Email, "email", true),
    (ProfileField::FiscalCode, "fiscal_code", false),
    (ProfileField::Phone, "phone", false),
];

/// The columns actually present in one calendar's profile table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProfileSchema {
    columns: Vec<(ProfileField, &'static str)>,
}

impl ProfileSchema {
    /// Resolves logical fields against the discovered column set.
    /// Absent optional columns are skipped; an absent required column
    /// is a hard error.
    fn resolve(available: &HashSet<String>) -> Result<Self, DomainError> {
        let mut columns = Vec::new();
        for (field, name, required) in LOGICAL_FIELDS {
            if available.contains(name) {
                columns.push((field, name));
            } else if required {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Profile table missing required column: {}", name),
                ));
            } else {
                tracing::debug!(column = name, "Optional profile column absent, skipped");
            }
        }
        Ok(Self { columns })
    }

    /// Builds the upsert statement over the resolved columns only.
    fn upsert_sql(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(|(_, name)| *name).collect();
        let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("${}", i)).collect();
        let updates: Vec<String> = names
            .iter()
            .filter(|name| **name != "id")
            .map(|name| format!("{} = EXCLUDED.{}", name, name))
            .collect();

        format!(
            "INSERT INTO profiles ({}) VALUES ({}) ON CONFLICT (id) DO UPDATE SET {}",
            names.join(", "),
            placeholders.join(", "),
            updates.join(", ")
        )
    }
}

/// Stringifies a field value defensively: trimmed, and empty rather
/// than null when the source has nothing.
fn field_value(field: ProfileField, user: &UserRecord) -> String {
    let raw = match field {
        ProfileField::Id => return user.id.to_string(),
        ProfileField::FirstName => user.first_name.clone(),
        ProfileField::LastName => user.last_name.clone(),
        ProfileField::Email => user.email.clone(),
        ProfileField::FiscalCode => user.fiscal_code.clone().unwrap_or_default(),
        ProfileField::Phone => user.phone.clone().unwrap_or_default(),
    };
    raw.trim().to_string()
}

/// PostgreSQL implementation of ProfileSync, one per calendar.
pub struct PostgresProfileSync {
    pool: PgPool,
    schema: OnceCell<ProfileSchema>,
}

impl PostgresProfileSync {
    /// Creates a new PostgresProfileSync. The schema is discovered on
    /// first use and cached for the life of the process.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    async fn schema(&self) -> Result<&ProfileSchema, DomainError> {
        self.schema
            .get_or_try_init(|| introspect(&self.pool))
            .await
    }
}

async fn introspect(pool: &PgPool) -> Result<ProfileSchema, DomainError> {
    let rows = sqlx::query(
        r#"
        SELECT column_name
        FROM information_schema.columns
        WHERE table_schema = 'public' AND table_name = 'profiles'
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to introspect profile schema: {}", e),
        )
    })?;

    let mut available = HashSet::new();
    for row in rows {
        let name: String = row.try_get("column_name").map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to get column_name: {}", e),
            )
        })?;
        available.insert(name);
    }

    ProfileSchema::resolve(&available)
}

#[async_trait]
impl ProfileSync for PostgresProfileSync {
    async fn sync(&self, user: &UserRecord) -> Result<(), DomainError> {
        let schema = self.schema().await?;
        let sql = schema.upsert_sql();

        let mut query = sqlx::query(&sql);
        for (field, _) in &schema.columns {
            query = match field {
                ProfileField::Id => query.bind(user.id),
                _ => query.bind(field_value(*field, user)),
            };
        }

        query.execute(&self.pool).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to upsert profile: {}", e),
            )
        })?;

        Ok(())
    }
}
