//! HTTP DTOs for availability endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::availability::{AvailabilityView, BookingContextView};
use crate::domain::scheduling::Slot;
use crate::domain::CalendarKey;

// ════════════════════════════════════════════════════════════════════════════
// Query parameters
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters for the availability listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityParams {
    #[serde(default)]
    pub calendar: Option<String>,
}

/// Query parameters for the booking context lookup.
///
/// The ids arrive as strings so a non-numeric value produces a
/// specific 400 instead of a generic deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextParams {
    #[serde(default)]
    pub calendar: Option<String>,
    #[serde(default)]
    pub iduser: Option<String>,
    #[serde(default)]
    pub idcourse: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One bookable slot as the embedded page renders it.
#[derive(Debug, Clone, Serialize)]
pub struct SlotResponse {
    pub id: String,
    pub start: String,
    pub end: String,
    pub day: String,
    pub label: String,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id(),
            start: slot.start.format("%Y-%m-%dT%H:%M").to_string(),
            end: slot.end.format("%Y-%m-%dT%H:%M").to_string(),
            day: slot.day().format("%Y-%m-%d").to_string(),
            label: slot.label(),
        }
    }
}

/// Availability listing response.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub calendar: CalendarKey,
    pub slot_minutes: u32,
    pub weeks_ahead: u32,
    pub closed_days: Vec<String>,
    pub slots: Vec<SlotResponse>,
}

impl From<AvailabilityView> for AvailabilityResponse {
    fn from(view: AvailabilityView) -> Self {
        Self {
            calendar: view.calendar,
            slot_minutes: view.slot_minutes,
            weeks_ahead: view.weeks_ahead,
            closed_days: view
                .closed_days
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect(),
            slots: view.slots.into_iter().map(SlotResponse::from).collect(),
        }
    }
}

/// Booking context response.
#[derive(Debug, Clone, Serialize)]
pub struct ContextResponse {
    pub user_name: String,
    pub course_name: String,
}

impl From<BookingContextView> for ContextResponse {
    fn from(view: BookingContextView) -> Self {
        Self {
            user_name: view.user_name,
            course_name: view.course_name,
        }
    }
}
