//! ListAvailabilityHandler - forward-looking open slots for one calendar.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::application::busy::BusyIntervalAggregator;
use crate::application::config_store::CalendarConfigStore;
use crate::domain::scheduling::{generate_slots, Slot};
use crate::domain::{CalendarKey, DomainError};

/// Query for the open slots of one calendar.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityQuery {
    pub calendar: CalendarKey,
}

/// Everything the embedded page needs to render the slot picker.
#[derive(Debug, Clone)]
pub struct AvailabilityView {
    pub calendar: CalendarKey,
    pub slot_minutes: u32,
    pub weeks_ahead: u32,
    pub closed_days: Vec<NaiveDate>,
    pub slots: Vec<Slot>,
}

/// Handler for availability listing.
pub struct ListAvailabilityHandler {
    config_store: Arc<CalendarConfigStore>,
    aggregator: Arc<BusyIntervalAggregator>,
}

impl ListAvailabilityHandler {
    pub fn new(
        config_store: Arc<CalendarConfigStore>,
        aggregator: Arc<BusyIntervalAggregator>,
    ) -> Self {
        Self {
            config_store,
            aggregator,
        }
    }

    pub async fn handle(&self, query: AvailabilityQuery) -> Result<AvailabilityView, DomainError> {
        self.handle_at(query, Local::now().naive_local()).await
    }

    /// Same as [`handle`](Self::handle) with an explicit current instant.
    pub async fn handle_at(
        &self,
        query: AvailabilityQuery,
        now: NaiveDateTime,
    ) -> Result<AvailabilityView, DomainError> {
        let config = self.config_store.load(query.calendar).await;

        let from = now.date().and_time(NaiveTime::MIN);
        let to = from + Duration::days(i64::from(config.weeks_ahead) * 7 + 1);
        let busy = self
            .aggregator
            .busy_between(from, to, config.slot_minutes)
            .await?;

        let slots = generate_slots(&config, &busy, now);

        Ok(AvailabilityView {
            calendar: query.calendar,
            slot_minutes: config.slot_minutes,
            weeks_ahead: config.weeks_ahead,
            closed_days: config.closed_dates.iter().copied().collect(),
            slots,
        })
    }
}
