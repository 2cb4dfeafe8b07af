//! HTTP DTOs for the booking endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingReceipt;

/// Request to book a slot.
///
/// Every field is optional at the serde level so a missing value maps
/// to a specific 400 rather than a generic body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct BookRequest {
    #[serde(default)]
    pub calendar: Option<String>,
    #[serde(default)]
    pub slot_start: Option<String>,
    #[serde(default)]
    pub iduser: Option<i64>,
    #[serde(default)]
    pub idcourse: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Successful booking response.
#[derive(Debug, Clone, Serialize)]
pub struct BookResponse {
    pub session_id: i64,
    pub slot_start: String,
}

impl From<BookingReceipt> for BookResponse {
    fn from(receipt: BookingReceipt) -> Self {
        Self {
            session_id: receipt.session_id,
            slot_start: receipt.slot_start.format("%Y-%m-%dT%H:%M").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_request_tolerates_missing_fields() {
        let request: BookRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.calendar.is_none());
        assert!(request.slot_start.is_none());
        assert!(request.iduser.is_none());
    }

    #[test]
    fn book_request_deserializes_full_payload() {
        let request: BookRequest = serde_json::from_value(json!({
            "calendar": "primary",
            "slot_start": "2025-03-10T10:00",
            "iduser": 7,
            "idcourse": 3,
            "note": "first attempt"
        }))
        .unwrap();
        assert_eq!(request.calendar.as_deref(), Some("primary"));
        assert_eq!(request.iduser, Some(7));
        assert_eq!(request.note.as_deref(), Some("first attempt"));
    }
}
