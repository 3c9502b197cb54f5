use serde::{Deserialize, Serialize};

/// A row from the `events` table. All display fields are nullable; drafts
/// with nothing but ownership are valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueEvent {
    pub id: String,
    pub venue_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_time: Option<String>,
    pub event_frequency: Option<String>,
    pub is_published: bool,
    pub created_by_operator_id: String,
    pub updated_by_operator_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Editable event fields; empty strings are stored as NULL.
#[derive(Debug, Clone, Default)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub event_time: String,
    pub event_frequency: String,
    pub is_published: bool,
}
