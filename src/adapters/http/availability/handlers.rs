//! HTTP handlers for availability endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{bad_request, error_response};
use crate::adapters::http::tenancy::{parse_calendar_param, resolve_public, TenancyTable};
use crate::application::handlers::availability::{
    AvailabilityQuery, BookingContextQuery, GetBookingContextHandler, ListAvailabilityHandler,
};

use super::dto::{AvailabilityParams, AvailabilityResponse, ContextParams, ContextResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AvailabilityHandlers {
    list_handler: Arc<ListAvailabilityHandler>,
    context_handler: Arc<GetBookingContextHandler>,
    tenancy: Arc<TenancyTable>,
}

impl AvailabilityHandlers {
    pub fn new(
        list_handler: Arc<ListAvailabilityHandler>,
        context_handler: Arc<GetBookingContextHandler>,
        tenancy: Arc<TenancyTable>,
    ) -> Self {
        Self {
            list_handler,
            context_handler,
            tenancy,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/availability - open slots for the caller's calendar
pub async fn get_availability(
    State(handlers): State<AvailabilityHandlers>,
    headers: HeaderMap,
    Query(params): Query<AvailabilityParams>,
) -> Response {
    let explicit = match parse_calendar_param(params.calendar.as_deref()) {
        Ok(explicit) => explicit,
        Err(e) => return error_response(&e),
    };
    let calendar = match resolve_public(&headers, explicit, &handlers.tenancy) {
        Ok(calendar) => calendar,
        Err(e) => return error_response(&e),
    };

    match handlers
        .list_handler
        .handle(AvailabilityQuery { calendar })
        .await
    {
        Ok(view) => (StatusCode::OK, Json(AvailabilityResponse::from(view))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /api/context - user and course display names for the page header
pub async fn get_booking_context(
    State(handlers): State<AvailabilityHandlers>,
    headers: HeaderMap,
    Query(params): Query<ContextParams>,
) -> Response {
    let explicit = match parse_calendar_param(params.calendar.as_deref()) {
        Ok(explicit) => explicit,
        Err(e) => return error_response(&e),
    };
    let calendar = match resolve_public(&headers, explicit, &handlers.tenancy) {
        Ok(calendar) => calendar,
        Err(e) => return error_response(&e),
    };

    let user_id = match parse_id(params.iduser.as_deref(), "iduser") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let course_id = match parse_id(params.idcourse.as_deref(), "idcourse") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = BookingContextQuery {
        calendar,
        user_id,
        course_id,
    };

    match handlers.context_handler.handle(query).await {
        Ok(view) => (StatusCode::OK, Json(ContextResponse::from(view))).into_response(),
        Err(e) => error_response(&e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Parameter parsing
// ════════════════════════════════════════════════════════════════════════════

fn parse_id(value: Option<&str>, field: &str) -> Result<i64, Response> {
    let Some(value) = value else {
        return Err(bad_request(format!("{} is required", field)));
    };
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| bad_request(format!("{} must be an integer", field)))
}
