use std::collections::BTreeMap;

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::models::special::normalize_specials;
use crate::models::venue::generate_slug;
use crate::models::{
    BusinessHours, Day, DayInput, HhItem, ItemInput, Operator, SpecialsError, SpecialsKind, Venue,
    VenueDetails, WeeklySchedule,
};

/// Longest tagline the happy hour page will display.
pub const MAX_TAGLINE_LEN: usize = 80;

#[derive(Debug, thiserror::Error)]
pub enum VenueError {
    #[error("venue name is required")]
    NameRequired,

    #[error("tagline is longer than 80 characters")]
    TaglineTooLong,

    /// Per-day validation failures, with the attempted hours kept so the
    /// editor can redisplay them.
    #[error("invalid hours for {} day(s)", .errors.len())]
    InvalidHours {
        errors: BTreeMap<Day, String>,
        attempted: BusinessHours,
    },

    #[error(transparent)]
    InvalidSpecials(#[from] SpecialsError),

    /// The update touched no row: the venue does not exist or belongs to a
    /// different operator. Both look the same on purpose.
    #[error("venue not found or not owned by this operator")]
    NotOwned,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

fn opt(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Creates a venue owned by the operator. Only the name is required; the
/// slug is derived from it once and stays stable afterwards. Ownership
/// columns always come from the resolved operator row, never the caller.
pub fn create_venue(
    conn: &Connection,
    operator: &Operator,
    details: &VenueDetails,
) -> Result<Venue, VenueError> {
    let name = details.name.trim();
    if name.is_empty() {
        return Err(VenueError::NameRequired);
    }

    let venue = Venue {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        slug: generate_slug(name),
        address_line1: opt(&details.address_line1),
        city: opt(&details.city),
        region: opt(&details.region),
        postal_code: opt(&details.postal_code),
        country: opt(&details.country),
        phone: opt(&details.phone),
        website_url: opt(&details.website_url),
        menu_url: None,
        latitude: details.latitude,
        longitude: details.longitude,
        payment_types: vec![],
        hh_tagline: None,
        hh_times: None,
        hh_food_details: vec![],
        hh_drink_details: vec![],
        business_hours: None,
        is_published: false,
        created_by_operator_id: operator.id.clone(),
        updated_by_operator_id: operator.id.clone(),
        created_at: String::new(),
        updated_at: String::new(),
    };
    queries::insert_venue(conn, &venue)?;

    // Read back so timestamps reflect what the store actually wrote.
    queries::get_venue_by_id(conn, &venue.id)?
        .ok_or_else(|| VenueError::Store(anyhow::anyhow!("inserted venue row is not visible")))
}

pub fn update_details(
    conn: &Connection,
    venue_id: &str,
    operator: &Operator,
    details: &VenueDetails,
) -> Result<(), VenueError> {
    if details.name.trim().is_empty() {
        return Err(VenueError::NameRequired);
    }

    let touched = queries::update_venue_details(conn, venue_id, &operator.id, details)?;
    if !touched {
        return Err(VenueError::NotOwned);
    }
    Ok(())
}

pub fn update_links(
    conn: &Connection,
    venue_id: &str,
    operator: &Operator,
    website_url: &str,
    menu_url: &str,
) -> Result<(), VenueError> {
    let touched = queries::update_venue_links(conn, venue_id, &operator.id, website_url, menu_url)?;
    if !touched {
        return Err(VenueError::NotOwned);
    }
    Ok(())
}

pub fn update_payment_types(
    conn: &Connection,
    venue_id: &str,
    operator: &Operator,
    selected: &[String],
) -> Result<(), VenueError> {
    let touched = queries::update_payment_types(conn, venue_id, &operator.id, selected)?;
    if !touched {
        return Err(VenueError::NotOwned);
    }
    Ok(())
}

/// Validates and stores a week of business hours. Validation failures
/// return every per-day error at once, alongside the attempted values;
/// nothing is written in that case.
pub fn save_business_hours(
    conn: &Connection,
    venue_id: &str,
    operator: &Operator,
    inputs: &[(Day, DayInput)],
) -> Result<BusinessHours, VenueError> {
    let resolved = BusinessHours::resolve_week(inputs);
    if !resolved.is_valid() {
        return Err(VenueError::InvalidHours {
            errors: resolved.errors,
            attempted: resolved.hours,
        });
    }

    let touched = queries::update_business_hours(conn, venue_id, &operator.id, &resolved.hours)?;
    if !touched {
        return Err(VenueError::NotOwned);
    }
    Ok(resolved.hours)
}

/// Persists the weekly happy hour schedule in its canonical text form and
/// returns the stored text.
pub fn save_hh_times(
    conn: &Connection,
    venue_id: &str,
    operator: &Operator,
    schedule: &WeeklySchedule,
) -> Result<String, VenueError> {
    let text = schedule.to_text();
    let touched = queries::update_hh_times(conn, venue_id, &operator.id, &text)?;
    if !touched {
        return Err(VenueError::NotOwned);
    }
    Ok(text)
}

pub fn save_tagline(
    conn: &Connection,
    venue_id: &str,
    operator: &Operator,
    tagline: &str,
) -> Result<(), VenueError> {
    let tagline = tagline.trim();
    if tagline.chars().count() > MAX_TAGLINE_LEN {
        return Err(VenueError::TaglineTooLong);
    }

    let touched = queries::update_hh_tagline(
        conn,
        venue_id,
        &operator.id,
        (!tagline.is_empty()).then_some(tagline),
    )?;
    if !touched {
        return Err(VenueError::NotOwned);
    }
    Ok(())
}

pub fn save_specials(
    conn: &Connection,
    venue_id: &str,
    operator: &Operator,
    kind: SpecialsKind,
    rows: &[ItemInput],
) -> Result<Vec<HhItem>, VenueError> {
    let items = normalize_specials(rows)?;

    let touched = queries::update_specials(conn, venue_id, &operator.id, kind, &items)?;
    if !touched {
        return Err(VenueError::NotOwned);
    }
    Ok(items)
}
