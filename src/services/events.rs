use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::models::{EventInput, Operator, VenueEvent};

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event not found or not owned by this operator")]
    NotOwned,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

fn opt(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Saves an event. The first save (no id yet) inserts a new row owned by
/// the operator; later saves update it through the ownership filter and
/// keep the same id. Returns the stored row either way.
pub fn save_event(
    conn: &Connection,
    venue_id: &str,
    operator: &Operator,
    event_id: Option<&str>,
    input: &EventInput,
) -> Result<VenueEvent, EventError> {
    match event_id {
        Some(id) => {
            let touched = queries::update_event(conn, id, &operator.id, input)?;
            if !touched {
                return Err(EventError::NotOwned);
            }
            queries::get_event_by_id(conn, id)?.ok_or(EventError::NotOwned)
        }
        None => {
            let event = VenueEvent {
                id: Uuid::new_v4().to_string(),
                venue_id: venue_id.to_string(),
                title: opt(&input.title),
                description: opt(&input.description),
                event_time: opt(&input.event_time),
                event_frequency: opt(&input.event_frequency),
                is_published: input.is_published,
                created_by_operator_id: operator.id.clone(),
                updated_by_operator_id: operator.id.clone(),
                created_at: String::new(),
                updated_at: String::new(),
            };
            queries::insert_event(conn, &event)?;

            queries::get_event_by_id(conn, &event.id)?.ok_or_else(|| {
                EventError::Store(anyhow::anyhow!("inserted event row is not visible"))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::VenueDetails;
    use crate::services::venues;

    fn setup() -> (Connection, Operator, String) {
        let conn = db::init_db(":memory:").unwrap();
        let operator = queries::insert_operator(&conn, "owner@example.com").unwrap();
        let venue = venues::create_venue(
            &conn,
            &operator,
            &VenueDetails {
                name: "Anchor".to_string(),
                ..VenueDetails::default()
            },
        )
        .unwrap();
        (conn, operator, venue.id)
    }

    #[test]
    fn test_first_save_inserts_then_updates() {
        let (conn, operator, venue_id) = setup();

        let input = EventInput {
            title: "Trivia Night".to_string(),
            event_frequency: "Every Tuesday".to_string(),
            ..EventInput::default()
        };
        let created = save_event(&conn, &venue_id, &operator, None, &input).unwrap();
        assert_eq!(created.title.as_deref(), Some("Trivia Night"));
        assert!(created.description.is_none());
        assert!(!created.is_published);

        let updated_input = EventInput {
            title: "Trivia Night".to_string(),
            event_frequency: "Every Tuesday".to_string(),
            event_time: "7:00 PM".to_string(),
            is_published: true,
            ..EventInput::default()
        };
        let updated =
            save_event(&conn, &venue_id, &operator, Some(&created.id), &updated_input).unwrap();

        assert_eq!(updated.id, created.id);
        assert!(updated.is_published);
        assert_eq!(updated.event_time.as_deref(), Some("7:00 PM"));
        assert_eq!(queries::events_for_venue(&conn, &venue_id).unwrap().len(), 1);
    }

    #[test]
    fn test_update_checks_ownership() {
        let (conn, operator, venue_id) = setup();
        let created =
            save_event(&conn, &venue_id, &operator, None, &EventInput::default()).unwrap();

        let stranger = queries::insert_operator(&conn, "other@example.com").unwrap();
        let result = save_event(
            &conn,
            &venue_id,
            &stranger,
            Some(&created.id),
            &EventInput {
                title: "Hijacked".to_string(),
                ..EventInput::default()
            },
        );
        assert!(matches!(result, Err(EventError::NotOwned)));

        let stored = queries::get_event_by_id(&conn, &created.id).unwrap().unwrap();
        assert!(stored.title.is_none());
    }
}
