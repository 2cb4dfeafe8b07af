//! Per-calendar booking configuration.
//!
//! A configuration is never rejected on read: whatever was persisted is
//! normalized into something usable (invalid windows dropped, numeric
//! fields clamped) so the public booking page keeps working even when a
//! stored row is stale or hand-edited.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Slot length bounds, in minutes.
pub const MIN_SLOT_MINUTES: u32 = 15;
pub const MAX_SLOT_MINUTES: u32 = 240;

/// Look-ahead horizon bounds, in weeks.
pub const MIN_WEEKS_AHEAD: u32 = 1;
pub const MAX_WEEKS_AHEAD: u32 = 12;

/// An opening window within a day, `[start, end)` at minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Window {
    /// Creates a window; returns `None` when the bounds are inverted or
    /// zero-length.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }
}

/// Opening windows per weekday.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeeklyHours {
    pub monday: Vec<Window>,
    pub tuesday: Vec<Window>,
    pub wednesday: Vec<Window>,
    pub thursday: Vec<Window>,
    pub friday: Vec<Window>,
    pub saturday: Vec<Window>,
    pub sunday: Vec<Window>,
}

impl WeeklyHours {
    /// Returns the windows configured for a weekday.
    pub fn for_weekday(&self, weekday: Weekday) -> &[Window] {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    fn days_mut(&mut self) -> [&mut Vec<Window>; 7] {
        [
            &mut self.monday,
            &mut self.tuesday,
            &mut self.wednesday,
            &mut self.thursday,
            &mut self.friday,
            &mut self.saturday,
            &mut self.sunday,
        ]
    }
}

/// Full configuration of one calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    /// Length of a bookable slot, in minutes.
    pub slot_minutes: u32,
    /// Rolling look-ahead horizon, in weeks.
    pub weeks_ahead: u32,
    /// Recurring weekly opening hours.
    pub week: WeeklyHours,
    /// Dates on which the calendar is fully closed.
    pub closed_dates: BTreeSet<NaiveDate>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        let weekday = vec![
            window(9, 0, 13, 0),
            window(14, 0, 18, 0),
        ];
        Self {
            slot_minutes: 60,
            weeks_ahead: 4,
            week: WeeklyHours {
                monday: weekday.clone(),
                tuesday: weekday.clone(),
                wednesday: weekday.clone(),
                thursday: weekday.clone(),
                friday: weekday,
                saturday: Vec::new(),
                sunday: Vec::new(),
            },
            closed_dates: BTreeSet::new(),
        }
    }
}

impl CalendarConfig {
    /// Clamps numeric fields into range and drops windows that are
    /// inverted or overlap an earlier window of the same day.
    ///
    /// Applied on every load and before every save, so downstream code
    /// can assume the invariants hold.
    pub fn normalized(mut self) -> Self {
        self.slot_minutes = self.slot_minutes.clamp(MIN_SLOT_MINUTES, MAX_SLOT_MINUTES);
        self.weeks_ahead = self.weeks_ahead.clamp(MIN_WEEKS_AHEAD, MAX_WEEKS_AHEAD);
        for day in self.week.days_mut() {
            day.retain(|w| w.start < w.end);
            day.sort_by_key(|w| w.start);
            let mut last_end: Option<NaiveTime> = None;
            day.retain(|w| {
                let keeps = last_end.map_or(true, |end| w.start >= end);
                if keeps {
                    last_end = Some(w.end);
                }
                keeps
            });
        }
        self
    }
}

fn window(sh: u32, sm: u32, eh: u32, em: u32) -> Window {
    Window {
        start: NaiveTime::from_hms_opt(sh, sm, 0).expect("valid time"),
        end: NaiveTime::from_hms_opt(eh, em, 0).expect("valid time"),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire/storage form
// ════════════════════════════════════════════════════════════════════════════

/// A window as it appears in persisted settings rows and API payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWindow {
    pub start: String,
    pub end: String,
}

/// Serialized form of [`CalendarConfig`], shared by the settings row and
/// the settings API.
///
/// Every field is optional or lenient: conversion to the domain type
/// never fails, it only discards what cannot be understood.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfigData {
    pub slot_minutes: u32,
    pub weeks_ahead: u32,
    pub days: serde_json::Map<String, serde_json::Value>,
    pub closed_days: Vec<String>,
}

impl Default for CalendarConfigData {
    fn default() -> Self {
        CalendarConfigData::from_config(&CalendarConfig::default())
    }
}

impl CalendarConfigData {
    /// Converts the wire form into a normalized domain configuration.
    ///
    /// Unparseable time strings drop the window; unparseable dates drop
    /// the date. Unknown day names are ignored.
    pub fn into_config(self) -> CalendarConfig {
        let mut week = WeeklyHours::default();
        for (name, value) in &self.days {
            let windows = parse_windows(value);
            match name.to_ascii_lowercase().as_str() {
                "monday" => week.monday = windows,
                "tuesday" => week.tuesday = windows,
                "wednesday" => week.wednesday = windows,
                "thursday" => week.thursday = windows,
                "friday" => week.friday = windows,
                "saturday" => week.saturday = windows,
                "sunday" => week.sunday = windows,
                _ => {}
            }
        }

        let closed_dates = self
            .closed_days
            .iter()
            .filter_map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            .collect();

        CalendarConfig {
            slot_minutes: self.slot_minutes,
            weeks_ahead: self.weeks_ahead,
            week,
            closed_dates,
        }
        .normalized()
    }

    /// Converts a domain configuration into its wire form.
    pub fn from_config(config: &CalendarConfig) -> Self {
        let mut days = serde_json::Map::new();
        let named = [
            ("monday", &config.week.monday),
            ("tuesday", &config.week.tuesday),
            ("wednesday", &config.week.wednesday),
            ("thursday", &config.week.thursday),
            ("friday", &config.week.friday),
            ("saturday", &config.week.saturday),
            ("sunday", &config.week.sunday),
        ];
        for (name, windows) in named {
            let raw: Vec<RawWindow> = windows
                .iter()
                .map(|w| RawWindow {
                    start: w.start.format("%H:%M").to_string(),
                    end: w.end.format("%H:%M").to_string(),
                })
                .collect();
            days.insert(
                name.to_string(),
                serde_json::to_value(raw).unwrap_or(serde_json::Value::Array(Vec::new())),
            );
        }

        Self {
            slot_minutes: config.slot_minutes,
            weeks_ahead: config.weeks_ahead,
            days,
            closed_days: config
                .closed_dates
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect(),
        }
    }
}

fn parse_windows(value: &serde_json::Value) -> Vec<Window> {
    let raw: Vec<RawWindow> = match serde_json::from_value(value.clone()) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    raw.iter()
        .filter_map(|w| {
            let start = parse_hhmm(&w.start)?;
            let end = parse_hhmm(&w.end)?;
            Window::new(start, end)
        })
        .collect()
}

/// Parses a time-of-day string, tolerating legacy `HH:MM:SS` values.
fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}
