//! BookSlotHandler - the booking transaction and its side effects.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};

use crate::application::busy::BusyIntervalAggregator;
use crate::application::config_store::CalendarConfigStore;
use crate::application::registry::CalendarRegistry;
use crate::domain::booking::{BookingReceipt, NewBooking, SideEffectOutcome};
use crate::domain::scheduling::is_bookable_start;
use crate::domain::{CalendarKey, DomainError, ErrorCode};
use crate::ports::{BookingConfirmation, ConfirmationNotifier, UserRecord};

/// Command to book one slot for one user and course.
#[derive(Debug, Clone)]
pub struct BookSlotCommand {
    pub calendar: CalendarKey,
    pub slot_start: NaiveDateTime,
    pub user_id: i64,
    pub course_id: i64,
    pub note: String,
}

/// Handler for self-service slot booking.
///
/// Ordering matters: the slot is validated and re-checked against
/// fresh occupancy immediately before the insert, which narrows (but
/// does not close) the race window between two simultaneous bookers.
/// Everything after the insert is best-effort and never fails the
/// booking.
pub struct BookSlotHandler {
    registry: Arc<CalendarRegistry>,
    config_store: Arc<CalendarConfigStore>,
    aggregator: Arc<BusyIntervalAggregator>,
    notifier: Arc<dyn ConfirmationNotifier>,
}

impl BookSlotHandler {
    pub fn new(
        registry: Arc<CalendarRegistry>,
        config_store: Arc<CalendarConfigStore>,
        aggregator: Arc<BusyIntervalAggregator>,
        notifier: Arc<dyn ConfirmationNotifier>,
    ) -> Self {
        Self {
            registry,
            config_store,
            aggregator,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: BookSlotCommand) -> Result<BookingReceipt, DomainError> {
        self.handle_at(cmd, Local::now().naive_local()).await
    }

    /// Same as [`handle`](Self::handle) with an explicit current instant.
    pub async fn handle_at(
        &self,
        cmd: BookSlotCommand,
        now: NaiveDateTime,
    ) -> Result<BookingReceipt, DomainError> {
        let context = self.registry.context(cmd.calendar);

        // 1-2. Re-derive slot legality from configuration alone.
        let config = self.config_store.load(cmd.calendar).await;
        if !is_bookable_start(&config, cmd.slot_start, now) {
            return Err(DomainError::new(
                ErrorCode::SlotUnavailable,
                "Slot not available",
            ));
        }

        // 3. Fresh occupancy re-check over the slot's day, both calendars.
        let day_start = cmd.slot_start.date().and_time(NaiveTime::MIN);
        let day_end = day_start + Duration::days(1);
        let busy = self
            .aggregator
            .busy_between(day_start, day_end, config.slot_minutes)
            .await?;
        let slot_end = cmd.slot_start + Duration::minutes(i64::from(config.slot_minutes));
        if busy.iter().any(|b| b.overlaps(cmd.slot_start, slot_end)) {
            return Err(DomainError::new(ErrorCode::SlotTaken, "Slot already taken"));
        }

        // 4. Exact duplicate-start guard on the target calendar. The
        // interval test above is wider than a timestamp match, so this
        // check is independent of it.
        if context.sessions.exists_at(cmd.slot_start).await? {
            return Err(DomainError::new(ErrorCode::SlotTaken, "Slot already taken"));
        }

        // 5. Durable part: session + reservation in one transaction.
        let booking =
            NewBooking::self_service(cmd.slot_start, cmd.user_id, cmd.course_id, cmd.note.clone());
        let session_id = context.sessions.insert_booking(&booking).await?;
        tracing::info!(
            calendar = %cmd.calendar,
            session_id,
            slot_start = %cmd.slot_start,
            user_id = cmd.user_id,
            "Slot booked"
        );

        // 6-7. Best-effort side effects.
        let user = self.load_user_for_side_effects(cmd.calendar, cmd.user_id).await;
        let profile_sync = self.sync_profile(cmd.calendar, user.as_ref()).await;
        let confirmation = self
            .send_confirmation(&cmd, session_id, user.as_ref())
            .await;

        Ok(BookingReceipt {
            session_id,
            slot_start: cmd.slot_start,
            profile_sync,
            confirmation,
        })
    }

    async fn load_user_for_side_effects(
        &self,
        calendar: CalendarKey,
        user_id: i64,
    ) -> Option<UserRecord> {
        let context = self.registry.context(calendar);
        match context.directory.find_user(user_id).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                tracing::warn!(user_id, "User record missing, booking side effects skipped");
                None
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "User lookup failed, booking side effects skipped");
                None
            }
        }
    }

    async fn sync_profile(
        &self,
        calendar: CalendarKey,
        user: Option<&UserRecord>,
    ) -> SideEffectOutcome {
        let Some(user) = user else {
            return SideEffectOutcome::Failed;
        };
        let context = self.registry.context(calendar);
        match context.profiles.sync(user).await {
            Ok(()) => SideEffectOutcome::Completed,
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "Profile sync failed after booking");
                SideEffectOutcome::Failed
            }
        }
    }

    async fn send_confirmation(
        &self,
        cmd: &BookSlotCommand,
        session_id: i64,
        user: Option<&UserRecord>,
    ) -> SideEffectOutcome {
        let Some(user) = user else {
            return SideEffectOutcome::Failed;
        };
        let context = self.registry.context(cmd.calendar);

        let course_name = match context.directory.find_course(cmd.course_id).await {
            Ok(Some(course)) => course.name,
            Ok(None) | Err(_) => String::new(),
        };

        let confirmation = BookingConfirmation {
            calendar: cmd.calendar,
            recipient_email: user.email.clone(),
            recipient_name: user.display_name(),
            course_name,
            slot_start: cmd.slot_start,
        };

        match self.notifier.send_booking_confirmation(&confirmation).await {
            Ok(()) => {
                if let Err(e) = context.sessions.mark_confirmation_sent(session_id).await {
                    tracing::warn!(session_id, error = %e, "Could not record confirmation flag");
                }
                SideEffectOutcome::Completed
            }
            Err(e) => {
                tracing::warn!(session_id, error = %e, "Confirmation notification failed");
                SideEffectOutcome::Failed
            }
        }
    }
}
