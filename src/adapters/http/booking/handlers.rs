//! HTTP handlers for the booking endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;

use crate::adapters::http::error::{bad_request, error_response};
use crate::adapters::http::tenancy::{parse_calendar_param, resolve_public, TenancyTable};
use crate::application::handlers::booking::{BookSlotCommand, BookSlotHandler};

use super::dto::{BookRequest, BookResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct BookingHandlers {
    book_handler: Arc<BookSlotHandler>,
    tenancy: Arc<TenancyTable>,
}

impl BookingHandlers {
    pub fn new(book_handler: Arc<BookSlotHandler>, tenancy: Arc<TenancyTable>) -> Self {
        Self {
            book_handler,
            tenancy,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/book - book one slot
pub async fn book_slot(
    State(handlers): State<BookingHandlers>,
    headers: HeaderMap,
    Json(request): Json<BookRequest>,
) -> Response {
    let explicit = match parse_calendar_param(request.calendar.as_deref()) {
        Ok(explicit) => explicit,
        Err(e) => return error_response(&e),
    };
    let calendar = match resolve_public(&headers, explicit, &handlers.tenancy) {
        Ok(calendar) => calendar,
        Err(e) => return error_response(&e),
    };

    let slot_start = match parse_slot_start(request.slot_start.as_deref()) {
        Ok(start) => start,
        Err(response) => return response,
    };
    let Some(user_id) = request.iduser else {
        return bad_request("iduser is required");
    };
    let Some(course_id) = request.idcourse else {
        return bad_request("idcourse is required");
    };

    let cmd = BookSlotCommand {
        calendar,
        slot_start,
        user_id,
        course_id,
        note: request.note.unwrap_or_default(),
    };

    match handlers.book_handler.handle(cmd).await {
        Ok(receipt) => (StatusCode::OK, Json(BookResponse::from(receipt))).into_response(),
        Err(e) => error_response(&e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Parameter parsing
// ════════════════════════════════════════════════════════════════════════════

fn parse_slot_start(value: Option<&str>) -> Result<NaiveDateTime, Response> {
    let Some(value) = value else {
        return Err(bad_request("slot_start is required"));
    };
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| bad_request("slot_start must be an ISO timestamp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parse_slot_start_accepts_minute_and_second_precision() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(parse_slot_start(Some("2025-03-10T10:00")).unwrap(), expected);
        assert_eq!(
            parse_slot_start(Some("2025-03-10T10:00:00")).unwrap(),
            expected
        );
    }

    #[test]
    fn parse_slot_start_rejects_missing_or_garbage_values() {
        assert_eq!(
            parse_slot_start(None).unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            parse_slot_start(Some("next tuesday")).unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
