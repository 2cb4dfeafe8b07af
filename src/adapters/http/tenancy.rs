//! Host-based tenancy classification.
//!
//! The booking page is embedded on the two brands' public sites; the
//! request's effective host decides which calendar it may talk to.
//! Classification is a pure function over header values and a
//! configured pattern table, so it is testable without any network
//! machinery.

use axum::http::HeaderMap;

use crate::domain::{CalendarKey, DomainError, ErrorCode};

/// Which host substrings authorize which calendar. The two sets are
/// expected to be disjoint; the primary set wins ties.
#[derive(Debug, Clone, Default)]
pub struct TenancyTable {
    primary_patterns: Vec<String>,
    partner_patterns: Vec<String>,
}

impl TenancyTable {
    pub fn new(primary_patterns: Vec<String>, partner_patterns: Vec<String>) -> Self {
        let lower = |patterns: Vec<String>| -> Vec<String> {
            patterns
                .into_iter()
                .map(|p| p.trim().to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect()
        };
        Self {
            primary_patterns: lower(primary_patterns),
            partner_patterns: lower(partner_patterns),
        }
    }
}

/// Classifies an effective host against the pattern table.
///
/// The forwarded host is preferred (the service normally sits behind a
/// proxy), then the host header, then the origin.
pub fn classify(
    forwarded_host: Option<&str>,
    host: Option<&str>,
    origin: Option<&str>,
    table: &TenancyTable,
) -> Option<CalendarKey> {
    let effective = forwarded_host.or(host).or(origin)?.to_ascii_lowercase();

    if table.primary_patterns.iter().any(|p| effective.contains(p)) {
        return Some(CalendarKey::Primary);
    }
    if table.partner_patterns.iter().any(|p| effective.contains(p)) {
        return Some(CalendarKey::Partner);
    }
    None
}

/// Resolves the calendar for a public endpoint.
///
/// The host must classify to some calendar or the request is rejected
/// outright. An explicit `calendar` parameter (admin embedding) only
/// overrides which context is used, never the authorization itself.
pub fn resolve_public(
    headers: &HeaderMap,
    explicit: Option<CalendarKey>,
    table: &TenancyTable,
) -> Result<CalendarKey, DomainError> {
    let classified = classify(
        header(headers, "x-forwarded-host"),
        header(headers, "host"),
        header(headers, "origin"),
        table,
    )
    .ok_or_else(DomainError::unauthorized_origin)?;

    Ok(explicit.unwrap_or(classified))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Parses the optional in-band calendar override parameter.
pub fn parse_calendar_param(value: Option<&str>) -> Result<Option<CalendarKey>, DomainError> {
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .parse::<CalendarKey>()
            .map(Some)
            .map_err(|e| DomainError::new(ErrorCode::InvalidFormat, e.to_string())),
    }
}
