//! Independent validation of a client-supplied slot start.
//!
//! The booking endpoint must not trust a previously generated slot
//! list: the client may hold a stale cache, or fabricate a start time
//! altogether. Legality is re-derived here from the configuration
//! alone.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};

use super::config::CalendarConfig;

/// Returns whether `start` is a legal slot start for this
/// configuration, at minute granularity.
///
/// Checks in order: the weekday has windows, the date is not closed,
/// the start is not in the past, and some window both contains the
/// full slot and has the start on an integer multiple of the slot
/// length from its own start. Off-grid times are rejected even when
/// the slot would fit.
pub fn is_bookable_start(config: &CalendarConfig, start: NaiveDateTime, now: NaiveDateTime) -> bool {
    let start = truncate_to_minute(start);
    let now = truncate_to_minute(now);

    let windows = config.week.for_weekday(start.date().weekday());
    if windows.is_empty() {
        return false;
    }
    if config.closed_dates.contains(&start.date()) {
        return false;
    }
    if start < now {
        return false;
    }

    let slot = Duration::minutes(i64::from(config.slot_minutes));
    windows.iter().any(|window| {
        let window_start = start.date().and_time(window.start);
        let window_end = start.date().and_time(window.end);
        window_start <= start
            && start + slot <= window_end
            && (start - window_start).num_minutes() % i64::from(config.slot_minutes) == 0
    })
}

fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduling::config::{CalendarConfig, Window};
    use crate::domain::scheduling::slots::generate_slots;
    use chrono::{NaiveDate, NaiveTime};
    use proptest::prelude::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn hourly_monday_config() -> CalendarConfig {
        let mut config = CalendarConfig {
            slot_minutes: 60,
            weeks_ahead: 2,
            ..CalendarConfig::default()
        };
        config.week = Default::default();
        config.week.monday = vec![Window { start: time(9, 0), end: time(13, 0) }];
        config
    }

    #[test]
    fn accepts_an_aligned_future_start() {
        let config = hourly_monday_config();
        let now = monday().and_time(time(8, 0));
        assert!(is_bookable_start(&config, monday().and_time(time(10, 0)), now));
    }

    #[test]
    fn rejects_weekday_without_windows() {
        let config = hourly_monday_config();
        let tuesday = monday() + Duration::days(1);
        let now = monday().and_time(time(8, 0));
        assert!(!is_bookable_start(&config, tuesday.and_time(time(10, 0)), now));
    }

    #[test]
    fn rejects_closed_date() {
        let mut config = hourly_monday_config();
        config.closed_dates.insert(monday());
        let now = monday().and_time(time(8, 0));
        assert!(!is_bookable_start(&config, monday().and_time(time(10, 0)), now));
    }

    #[test]
    fn rejects_past_start_but_accepts_exactly_now() {
        let config = hourly_monday_config();
        let now = monday().and_time(time(10, 0));
        assert!(!is_bookable_start(&config, monday().and_time(time(9, 0)), now));
        // Unlike listing, re-validation tolerates a start equal to now:
        // the caller picked it while it was still in the future.
        assert!(is_bookable_start(&config, monday().and_time(time(10, 0)), now));
    }

    #[test]
    fn rejects_off_grid_start_even_when_it_fits() {
        let config = hourly_monday_config();
        let now = monday().and_time(time(8, 0));
        // 10:01 fits inside 09:00-13:00 with an hour to spare, but is
        // not reachable from the window start on the hourly grid.
        assert!(!is_bookable_start(&config, monday().and_time(time(10, 1)), now));
        assert!(!is_bookable_start(&config, monday().and_time(time(10, 30)), now));
    }

    #[test]
    fn rejects_slot_that_would_overrun_the_window() {
        let config = hourly_monday_config();
        let now = monday().and_time(time(8, 0));
        // Last full slot is 12:00-13:00.
        assert!(is_bookable_start(&config, monday().and_time(time(12, 0)), now));
        assert!(!is_bookable_start(&config, monday().and_time(time(13, 0)), now));
    }

    #[test]
    fn second_precision_input_is_truncated() {
        let config = hourly_monday_config();
        let now = monday().and_time(NaiveTime::from_hms_opt(8, 0, 42).unwrap());
        let start = monday().and_time(NaiveTime::from_hms_opt(10, 0, 59).unwrap());
        assert!(is_bookable_start(&config, start, now));
    }

    proptest! {
        /// Every slot the engine generates must pass validation with the
        /// same configuration and instant.
        #[test]
        fn accepts_every_generated_slot(
            slot_minutes in prop::sample::select(vec![15u32, 30, 45, 60, 90, 120]),
            now_minute in 0u32..(24 * 60),
        ) {
            let config = CalendarConfig {
                slot_minutes,
                weeks_ahead: 1,
                ..CalendarConfig::default()
            };
            let now = monday().and_time(
                NaiveTime::from_num_seconds_from_midnight_opt(now_minute * 60, 0).unwrap(),
            );
            for slot in generate_slots(&config, &[], now) {
                prop_assert!(
                    is_bookable_start(&config, slot.start, now),
                    "generated slot {} rejected", slot.start
                );
            }
        }

        /// A start offset from the grid by any non-multiple number of
        /// minutes is rejected.
        #[test]
        fn rejects_unaligned_offsets(offset in 1i64..60) {
            prop_assume!(offset % 60 != 0);
            let config = hourly_monday_config();
            let now = monday().and_time(time(8, 0));
            let start = monday().and_time(time(9, 0)) + Duration::minutes(offset);
            prop_assert!(!is_bookable_start(&config, start, now));
        }
    }
}
