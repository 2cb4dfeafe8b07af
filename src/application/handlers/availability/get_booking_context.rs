//! GetBookingContextHandler - display names for the embedded booking page.

use std::sync::Arc;

use crate::application::registry::CalendarRegistry;
use crate::domain::{CalendarKey, DomainError, ErrorCode};

/// Query for the names shown on the booking page.
#[derive(Debug, Clone, Copy)]
pub struct BookingContextQuery {
    pub calendar: CalendarKey,
    pub user_id: i64,
    pub course_id: i64,
}

/// Display names sourced from the collaborator store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingContextView {
    pub user_name: String,
    pub course_name: String,
}

/// Handler resolving user and course display names.
pub struct GetBookingContextHandler {
    registry: Arc<CalendarRegistry>,
}

impl GetBookingContextHandler {
    pub fn new(registry: Arc<CalendarRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(
        &self,
        query: BookingContextQuery,
    ) -> Result<BookingContextView, DomainError> {
        let context = self.registry.context(query.calendar);

        let user = context
            .directory
            .find_user(query.user_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::UserNotFound,
                    format!("User not found: {}", query.user_id),
                )
            })?;

        let course = context
            .directory
            .find_course(query.course_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::CourseNotFound,
                    format!("Course not found: {}", query.course_id),
                )
            })?;

        Ok(BookingContextView {
            user_name: user.display_name(),
            course_name: course.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::test_support::{
        registry_with, seeded_session_store, FixtureOptions,
    };

    fn handler(options: FixtureOptions) -> GetBookingContextHandler {
        let registry = registry_with(
            seeded_session_store(&[]),
            seeded_session_store(&[]),
            options,
        );
        GetBookingContextHandler::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn returns_display_names() {
        let handler = handler(FixtureOptions::default());
        let view = handler
            .handle(BookingContextQuery {
                calendar: CalendarKey::Primary,
                user_id: 7,
                course_id: 3,
            })
            .await
            .unwrap();
        assert_eq!(view.user_name, "Ada Lovelace");
        assert_eq!(view.course_name, "Theory exam");
    }

    #[tokio::test]
    async fn missing_user_maps_to_user_not_found() {
        let handler = handler(FixtureOptions {
            missing_user: true,
            ..Default::default()
        });
        let err = handler
            .handle(BookingContextQuery {
                calendar: CalendarKey::Primary,
                user_id: 99,
                course_id: 3,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UserNotFound);
    }
}
