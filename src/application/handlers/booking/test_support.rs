//! In-memory port implementations shared by handler tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::application::config_store::CalendarConfigStore;
use crate::application::registry::{CalendarContext, CalendarRegistry};
use crate::domain::booking::{NewBooking, Session, SessionTimes};
use crate::domain::scheduling::{CalendarConfig, CalendarConfigData};
use crate::domain::{CalendarKey, DomainError, ErrorCode};
use crate::ports::{
    BookingConfirmation, ConfirmationNotifier, CourseRecord, DirectoryReader, ProfileSync,
    SessionStore, SettingsStore, UserRecord,
};

/// Failure knobs for a booking fixture.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureOptions {
    pub fail_profile_sync: bool,
    pub fail_notifier: bool,
    pub missing_user: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Session store
// ════════════════════════════════════════════════════════════════════════════

struct StoredBooking {
    id: i64,
    booking: NewBooking,
    confirmation_sent: bool,
}

/// Vec-backed session store mirroring the storage contract, including
/// the duplicate-start conflict on insert.
pub struct InMemorySessionStore {
    bookings: Mutex<Vec<StoredBooking>>,
    next_id: AtomicI64,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Inserts a booking directly, bypassing the conflict checks.
    pub fn seed_booking(&self, exam_at: NaiveDateTime) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.bookings.lock().unwrap().push(StoredBooking {
            id,
            booking: NewBooking::self_service(exam_at, 1, 1, String::new()),
            confirmation_sent: false,
        });
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }

    pub fn stored(&self, id: i64) -> Option<Session> {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .map(to_session)
    }
}

fn to_session(stored: &StoredBooking) -> Session {
    Session {
        id: stored.id,
        capacity: stored.booking.capacity,
        exam_at: stored.booking.exam_at,
        rehearsal_at: stored.booking.rehearsal_at,
        note: stored.booking.note.clone(),
        confirmation_sent: stored.confirmation_sent,
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn times_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<SessionTimes>, DomainError> {
        let in_range = |t: NaiveDateTime| t >= from && t < to;
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| in_range(b.booking.exam_at) || in_range(b.booking.rehearsal_at))
            .map(|b| SessionTimes {
                exam_at: Some(b.booking.exam_at),
                rehearsal_at: Some(b.booking.rehearsal_at),
            })
            .collect())
    }

    async fn exists_at(&self, exam_at: NaiveDateTime) -> Result<bool, DomainError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.booking.exam_at == exam_at))
    }

    async fn insert_booking(&self, booking: &NewBooking) -> Result<i64, DomainError> {
        let mut bookings = self.bookings.lock().unwrap();
        if bookings.iter().any(|b| b.booking.exam_at == booking.exam_at) {
            return Err(DomainError::new(ErrorCode::SlotTaken, "Slot already taken"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        bookings.push(StoredBooking {
            id,
            booking: booking.clone(),
            confirmation_sent: false,
        });
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Session>, DomainError> {
        Ok(self.stored(id))
    }

    async fn mark_confirmation_sent(&self, id: i64) -> Result<(), DomainError> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.iter_mut().find(|b| b.id == id) {
            Some(stored) => {
                stored.confirmation_sent = true;
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Session not found: {}", id),
            )),
        }
    }
}

/// A session store pre-seeded with bookings at the given starts.
pub fn seeded_session_store(starts: &[NaiveDateTime]) -> Arc<InMemorySessionStore> {
    let store = InMemorySessionStore::new();
    for start in starts {
        store.seed_booking(*start);
    }
    Arc::new(store)
}

// ════════════════════════════════════════════════════════════════════════════
// Settings store
// ════════════════════════════════════════════════════════════════════════════

struct StaticSettingsStore {
    rows: Mutex<std::collections::HashMap<CalendarKey, String>>,
}

#[async_trait]
impl SettingsStore for StaticSettingsStore {
    async fn fetch(&self, calendar: CalendarKey) -> Result<Option<String>, DomainError> {
        Ok(self.rows.lock().unwrap().get(&calendar).cloned())
    }

    async fn upsert(&self, calendar: CalendarKey, payload: &str) -> Result<(), DomainError> {
        self.rows
            .lock()
            .unwrap()
            .insert(calendar, payload.to_string());
        Ok(())
    }
}

/// A config store serving the same configuration for both calendars.
pub fn settings_store_with(config: CalendarConfig) -> CalendarConfigStore {
    let payload = serde_json::to_string(&CalendarConfigData::from_config(&config)).unwrap();
    let mut rows = std::collections::HashMap::new();
    for key in CalendarKey::ALL {
        rows.insert(key, payload.clone());
    }
    CalendarConfigStore::new(Arc::new(StaticSettingsStore {
        rows: Mutex::new(rows),
    }))
}

// ════════════════════════════════════════════════════════════════════════════
// Directory, profile sync, notifier
// ════════════════════════════════════════════════════════════════════════════

struct StaticDirectory {
    missing_user: bool,
}

#[async_trait]
impl DirectoryReader for StaticDirectory {
    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>, DomainError> {
        if self.missing_user {
            return Ok(None);
        }
        Ok(Some(UserRecord {
            id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            fiscal_code: Some("LVLDAA15L41H501X".to_string()),
            phone: None,
        }))
    }

    async fn find_course(&self, id: i64) -> Result<Option<CourseRecord>, DomainError> {
        Ok(Some(CourseRecord {
            id,
            name: "Theory exam".to_string(),
        }))
    }
}

struct RecordingProfileSync {
    fail: bool,
    synced: Mutex<Vec<i64>>,
}

#[async_trait]
impl ProfileSync for RecordingProfileSync {
    async fn sync(&self, user: &UserRecord) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::new(ErrorCode::DatabaseError, "sync failed"));
        }
        self.synced.lock().unwrap().push(user.id);
        Ok(())
    }
}

/// Notifier that records what it sent, optionally failing every send.
pub struct RecordingNotifier {
    fail: bool,
    sent: Mutex<Vec<BookingConfirmation>>,
}

impl RecordingNotifier {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfirmationNotifier for RecordingNotifier {
    async fn send_booking_confirmation(
        &self,
        confirmation: &BookingConfirmation,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::new(
                ErrorCode::NotificationError,
                "notification failed",
            ));
        }
        self.sent.lock().unwrap().push(confirmation.clone());
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Registry
// ════════════════════════════════════════════════════════════════════════════

/// Registry over two in-memory stores with the fixture's failure knobs.
pub fn registry_with(
    primary: Arc<InMemorySessionStore>,
    partner: Arc<InMemorySessionStore>,
    options: FixtureOptions,
) -> CalendarRegistry {
    let context = |key: CalendarKey, sessions: Arc<InMemorySessionStore>| {
        CalendarContext::new(
            key,
            key.as_str(),
            sessions,
            Arc::new(StaticDirectory {
                missing_user: options.missing_user,
            }),
            Arc::new(RecordingProfileSync {
                fail: options.fail_profile_sync,
                synced: Mutex::new(Vec::new()),
            }),
        )
    };
    CalendarRegistry::new(
        context(CalendarKey::Primary, primary),
        context(CalendarKey::Partner, partner),
    )
}
