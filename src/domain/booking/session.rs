//! Session and reservation records.

use chrono::NaiveDateTime;

/// A booked exam session as persisted.
///
/// Created exactly once per booking. The only field this core ever
/// updates afterwards is `confirmation_sent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: i64,
    /// Seats in the session. Always 1 for self-service bookings.
    pub capacity: i32,
    /// When the exam takes place.
    pub exam_at: NaiveDateTime,
    /// Secondary rehearsal timestamp. Equal to `exam_at` for
    /// self-service bookings; the admin flow may move it.
    pub rehearsal_at: NaiveDateTime,
    pub note: String,
    pub confirmation_sent: bool,
}

/// Links a user and a course to a session. Inserted in the same
/// transaction as the session itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub session_id: i64,
    pub user_id: i64,
    pub course_id: i64,
}

/// Input for the atomic session + reservation insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub exam_at: NaiveDateTime,
    pub rehearsal_at: NaiveDateTime,
    pub capacity: i32,
    pub note: String,
    pub user_id: i64,
    pub course_id: i64,
}

impl NewBooking {
    /// Builds the self-service booking for a validated slot start:
    /// one seat, rehearsal equal to the exam.
    pub fn self_service(slot_start: NaiveDateTime, user_id: i64, course_id: i64, note: String) -> Self {
        Self {
            exam_at: slot_start,
            rehearsal_at: slot_start,
            capacity: 1,
            note,
            user_id,
            course_id,
        }
    }
}

/// The timestamps of a stored session, as read back for occupancy
/// aggregation. Either may be missing on legacy rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimes {
    pub exam_at: Option<NaiveDateTime>,
    pub rehearsal_at: Option<NaiveDateTime>,
}
