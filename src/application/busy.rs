//! Busy-interval aggregation across both calendars.
//!
//! The two calendars book the same physical room, so occupancy is
//! always computed over both session stores, whichever calendar the
//! request targets.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::scheduling::BusyInterval;
use crate::domain::DomainError;
use crate::ports::SessionStore;

pub struct BusyIntervalAggregator {
    stores: Vec<Arc<dyn SessionStore>>,
}

impl BusyIntervalAggregator {
    /// Builds the aggregator over every calendar's session store.
    pub fn new(stores: Vec<Arc<dyn SessionStore>>) -> Self {
        Self { stores }
    }

    /// Occupied intervals for `[from, to)`: one per non-null exam or
    /// rehearsal timestamp of every matching session, widened to the
    /// conservative occupancy duration.
    pub async fn busy_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        slot_minutes: u32,
    ) -> Result<Vec<BusyInterval>, DomainError> {
        let mut intervals = Vec::new();
        for store in &self.stores {
            for times in store.times_between(from, to).await? {
                if let Some(exam_at) = times.exam_at {
                    intervals.push(BusyInterval::from_start(exam_at, slot_minutes));
                }
                if let Some(rehearsal_at) = times.rehearsal_at {
                    intervals.push(BusyInterval::from_start(rehearsal_at, slot_minutes));
                }
            }
        }
        Ok(intervals)
    }
}
