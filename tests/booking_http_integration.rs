//! Integration tests for the booking HTTP surface.
//!
//! These tests wire the full router over in-memory port
//! implementations and drive it with real HTTP requests:
//! 1. Tenancy guards reject unknown origins before any work
//! 2. Availability, context, booking and settings round-trip end to end
//! 3. Conflicts surface as 409, validation failures as 400

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Local, NaiveDateTime};
use serde_json::{json, Value};
use tower::ServiceExt;

use examdesk::adapters::http::tenancy::TenancyTable;
use examdesk::adapters::http::{
    api_router, AvailabilityHandlers, BookingHandlers, SettingsHandlers,
};
use examdesk::application::handlers::availability::{
    GetBookingContextHandler, ListAvailabilityHandler,
};
use examdesk::application::handlers::booking::BookSlotHandler;
use examdesk::application::handlers::settings::{GetSettingsHandler, UpdateSettingsHandler};
use examdesk::application::{
    BusyIntervalAggregator, CalendarConfigStore, CalendarContext, CalendarRegistry,
};
use examdesk::domain::booking::{NewBooking, Session, SessionTimes};
use examdesk::domain::{CalendarKey, DomainError, ErrorCode};
use examdesk::ports::{
    BookingConfirmation, ConfirmationNotifier, CourseRecord, DirectoryReader, ProfileSync,
    SessionStore, SettingsStore, UserRecord,
};

const PRIMARY_HOST: &str = "www.drivingschool.example";
const PARTNER_HOST: &str = "booking.boatlicense.example";

// =============================================================================
// Test Infrastructure
// =============================================================================

struct MockSessionStore {
    bookings: Mutex<Vec<(i64, NewBooking)>>,
    next_id: AtomicI64,
}

impl MockSessionStore {
    fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
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
            .filter(|(_, b)| in_range(b.exam_at) || in_range(b.rehearsal_at))
            .map(|(_, b)| SessionTimes {
                exam_at: Some(b.exam_at),
                rehearsal_at: Some(b.rehearsal_at),
            })
            .collect())
    }

    async fn exists_at(&self, exam_at: NaiveDateTime) -> Result<bool, DomainError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .any(|(_, b)| b.exam_at == exam_at))
    }

    async fn insert_booking(&self, booking: &NewBooking) -> Result<i64, DomainError> {
        let mut bookings = self.bookings.lock().unwrap();
        if bookings.iter().any(|(_, b)| b.exam_at == booking.exam_at) {
            return Err(DomainError::new(ErrorCode::SlotTaken, "Slot already taken"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        bookings.push((id, booking.clone()));
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Session>, DomainError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|(stored_id, _)| *stored_id == id)
            .map(|(stored_id, b)| Session {
                id: *stored_id,
                capacity: b.capacity,
                exam_at: b.exam_at,
                rehearsal_at: b.rehearsal_at,
                note: b.note.clone(),
                confirmation_sent: false,
            }))
    }

    async fn mark_confirmation_sent(&self, _id: i64) -> Result<(), DomainError> {
        Ok(())
    }
}

struct MockSettingsStore {
    rows: Mutex<HashMap<CalendarKey, String>>,
}

#[async_trait]
impl SettingsStore for MockSettingsStore {
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

struct MockDirectory;

#[async_trait]
impl DirectoryReader for MockDirectory {
    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>, DomainError> {
        if id != 7 {
            return Ok(None);
        }
        Ok(Some(UserRecord {
            id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            fiscal_code: None,
            phone: None,
        }))
    }

    async fn find_course(&self, id: i64) -> Result<Option<CourseRecord>, DomainError> {
        if id != 3 {
            return Ok(None);
        }
        Ok(Some(CourseRecord {
            id,
            name: "Theory exam".to_string(),
        }))
    }
}

struct MockProfileSync;

#[async_trait]
impl ProfileSync for MockProfileSync {
    async fn sync(&self, _user: &UserRecord) -> Result<(), DomainError> {
        Ok(())
    }
}

struct MockNotifier;

#[async_trait]
impl ConfirmationNotifier for MockNotifier {
    async fn send_booking_confirmation(
        &self,
        _confirmation: &BookingConfirmation,
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

// =============================================================================
// Wiring
// =============================================================================

/// Opening hours every day of the week, so the tests hold whatever the
/// real current date is.
fn config_payload() -> String {
    let windows = json!([{ "start": "08:00", "end": "20:00" }]);
    let days: serde_json::Map<String, Value> = [
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    ]
    .iter()
    .map(|day| (day.to_string(), windows.clone()))
    .collect();
    json!({
        "slot_minutes": 60,
        "weeks_ahead": 2,
        "days": days,
        "closed_days": []
    })
    .to_string()
}

fn app() -> Router {
    let primary = Arc::new(MockSessionStore::new());
    let partner = Arc::new(MockSessionStore::new());

    let mut rows = HashMap::new();
    for key in CalendarKey::ALL {
        rows.insert(key, config_payload());
    }
    let config_store = Arc::new(CalendarConfigStore::new(Arc::new(MockSettingsStore {
        rows: Mutex::new(rows),
    })));

    let context = |key: CalendarKey, sessions: Arc<MockSessionStore>| {
        CalendarContext::new(
            key,
            key.as_str(),
            sessions,
            Arc::new(MockDirectory),
            Arc::new(MockProfileSync),
        )
    };
    let registry = Arc::new(CalendarRegistry::new(
        context(CalendarKey::Primary, Arc::clone(&primary)),
        context(CalendarKey::Partner, Arc::clone(&partner)),
    ));

    let aggregator = Arc::new(BusyIntervalAggregator::new(registry.session_stores()));
    let tenancy = Arc::new(TenancyTable::new(
        vec!["drivingschool.example".to_string()],
        vec!["boatlicense.example".to_string()],
    ));

    let availability = AvailabilityHandlers::new(
        Arc::new(ListAvailabilityHandler::new(
            Arc::clone(&config_store),
            Arc::clone(&aggregator),
        )),
        Arc::new(GetBookingContextHandler::new(Arc::clone(&registry))),
        Arc::clone(&tenancy),
    );
    let booking = BookingHandlers::new(
        Arc::new(BookSlotHandler::new(
            registry,
            Arc::clone(&config_store),
            aggregator,
            Arc::new(MockNotifier),
        )),
        tenancy,
    );
    let settings = SettingsHandlers::new(
        Arc::new(GetSettingsHandler::new(Arc::clone(&config_store))),
        Arc::new(UpdateSettingsHandler::new(config_store)),
    );

    api_router(availability, booking, settings)
}

/// An aligned, in-window slot comfortably in the future.
fn future_slot() -> NaiveDateTime {
    let today = Local::now().naive_local().date();
    (today + Duration::days(2)).and_hms_opt(10, 0, 0).unwrap()
}

fn get(uri: &str, host: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("host", host)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, host: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", host)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn book_body(slot_start: &str) -> Value {
    json!({
        "slot_start": slot_start,
        "iduser": 7,
        "idcourse": 3,
        "note": "first attempt"
    })
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn unknown_origin_is_rejected_before_any_work() {
    let app = app();

    let response = app
        .clone()
        .oneshot(get("/api/availability", "evil.example"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(post_json(
            "/api/book",
            "evil.example",
            book_body("2025-03-10T10:00"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn availability_lists_open_slots_for_the_callers_calendar() {
    let response = app()
        .oneshot(get("/api/availability", PRIMARY_HOST))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["calendar"], "primary");
    assert_eq!(body["slot_minutes"], 60);
    assert_eq!(body["weeks_ahead"], 2);
    let slots = body["slots"].as_array().unwrap();
    assert!(!slots.is_empty());
    assert!(slots[0]["id"].is_string());
    assert!(slots[0]["label"].is_string());
}

#[tokio::test]
async fn booking_a_slot_succeeds_then_conflicts() {
    let app = app();
    let slot = future_slot().format("%Y-%m-%dT%H:%M").to_string();

    let response = app
        .clone()
        .oneshot(post_json("/api/book", PRIMARY_HOST, book_body(&slot)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["session_id"], 1);
    assert_eq!(body["slot_start"], slot);

    let response = app
        .oneshot(post_json("/api/book", PRIMARY_HOST, book_body(&slot)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn capacity_is_shared_across_the_two_calendars() {
    let app = app();
    let slot = future_slot().format("%Y-%m-%dT%H:%M").to_string();

    let response = app
        .clone()
        .oneshot(post_json("/api/book", PARTNER_HOST, book_body(&slot)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The same physical slot is now gone from the primary calendar too.
    let response = app
        .clone()
        .oneshot(post_json("/api/book", PRIMARY_HOST, book_body(&slot)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(get("/api/availability", PRIMARY_HOST))
        .await
        .unwrap();
    let body = body_json(response).await;
    let starts: Vec<&str> = body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["start"].as_str().unwrap())
        .collect();
    assert!(!starts.contains(&slot.as_str()));
}

#[tokio::test]
async fn off_grid_and_malformed_bookings_are_rejected() {
    let app = app();
    let off_grid = (future_slot() + Duration::minutes(1))
        .format("%Y-%m-%dT%H:%M")
        .to_string();

    let response = app
        .clone()
        .oneshot(post_json("/api/book", PRIMARY_HOST, book_body(&off_grid)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/book",
            PRIMARY_HOST,
            book_body("next tuesday"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing iduser.
    let slot = future_slot().format("%Y-%m-%dT%H:%M").to_string();
    let response = app
        .oneshot(post_json(
            "/api/book",
            PRIMARY_HOST,
            json!({ "slot_start": slot, "idcourse": 3 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn context_returns_display_names_and_validates_ids() {
    let app = app();

    let response = app
        .clone()
        .oneshot(get("/api/context?iduser=7&idcourse=3", PRIMARY_HOST))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user_name"], "Ada Lovelace");
    assert_eq!(body["course_name"], "Theory exam");

    let response = app
        .clone()
        .oneshot(get("/api/context?iduser=abc&idcourse=3", PRIMARY_HOST))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/api/context?iduser=99&idcourse=3", PRIMARY_HOST))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn settings_update_round_trips_with_clamping() {
    let app = app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/settings")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "calendar": "primary",
                        "config": { "slot_minutes": 500, "weeks_ahead": 99 }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["config"]["slot_minutes"], 240);
    assert_eq!(body["config"]["weeks_ahead"], 12);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/settings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["primary"]["slot_minutes"], 240);
    assert_eq!(body["partner"]["slot_minutes"], 60);
}

#[tokio::test]
async fn health_endpoint_answers_without_tenancy() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
