use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{
    BusinessHours, EventInput, HhItem, Operator, SpecialsKind, Venue, VenueDetails, VenueEvent,
};

fn null_if_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// ── Operators ──

const OPERATOR_COLUMNS: &str = "id, email, name, is_approved, role, created_at, updated_at";

pub fn find_operator_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Operator>, StoreError> {
    let sql = format!("SELECT {OPERATOR_COLUMNS} FROM operators WHERE email = ?1");
    let result = conn.query_row(&sql, params![email], |row| {
        Ok(Operator {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            is_approved: row.get::<_, i32>(3)? != 0,
            role: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    });

    match result {
        Ok(operator) => Ok(Some(operator)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Inserts an operator row with only the identity set; every other column
/// takes its schema default. Returns the stored row, defaults included.
pub fn insert_operator(conn: &Connection, email: &str) -> Result<Operator, StoreError> {
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO operators (id, email) VALUES (?1, ?2)",
        params![id, email],
    )?;

    find_operator_by_email(conn, email)?
        .ok_or_else(|| StoreError::Query("inserted operator row is not visible".to_string()))
}

// ── Venues ──

const VENUE_COLUMNS: &str = "id, name, slug, address_line1, city, region, postal_code, country, \
     phone, website_url, menu_url, latitude, longitude, payment_types, hh_tagline, hh_times, \
     hh_food_details, hh_drink_details, business_hours, is_published, created_by_operator_id, \
     updated_by_operator_id, created_at, updated_at";

pub fn insert_venue(conn: &Connection, venue: &Venue) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO venues (id, name, slug, address_line1, city, region, postal_code, country,
            phone, website_url, menu_url, latitude, longitude, payment_types, hh_tagline,
            hh_times, hh_food_details, hh_drink_details, business_hours, is_published,
            created_by_operator_id, updated_by_operator_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
            ?18, ?19, ?20, ?21, ?22)",
        params![
            venue.id,
            venue.name,
            venue.slug,
            venue.address_line1,
            venue.city,
            venue.region,
            venue.postal_code,
            venue.country,
            venue.phone,
            venue.website_url,
            venue.menu_url,
            venue.latitude,
            venue.longitude,
            serde_json::to_string(&venue.payment_types)?,
            venue.hh_tagline,
            venue.hh_times,
            serde_json::to_string(&venue.hh_food_details)?,
            serde_json::to_string(&venue.hh_drink_details)?,
            venue
                .business_hours
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            venue.is_published as i32,
            venue.created_by_operator_id,
            venue.updated_by_operator_id,
        ],
    )?;
    Ok(())
}

pub fn get_venue_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Venue>> {
    let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_venue_row(row)));

    match result {
        Ok(venue) => Ok(Some(venue?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_venue_row(row: &rusqlite::Row) -> anyhow::Result<Venue> {
    let payment_types_json: Option<String> = row.get(13)?;
    let hh_food_json: Option<String> = row.get(16)?;
    let hh_drink_json: Option<String> = row.get(17)?;
    let business_hours_json: Option<String> = row.get(18)?;

    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        address_line1: row.get(3)?,
        city: row.get(4)?,
        region: row.get(5)?,
        postal_code: row.get(6)?,
        country: row.get(7)?,
        phone: row.get(8)?,
        website_url: row.get(9)?,
        menu_url: row.get(10)?,
        latitude: row.get(11)?,
        longitude: row.get(12)?,
        payment_types: parse_json_column(payment_types_json.as_deref()),
        hh_tagline: row.get(14)?,
        hh_times: row.get(15)?,
        hh_food_details: parse_json_column(hh_food_json.as_deref()),
        hh_drink_details: parse_json_column(hh_drink_json.as_deref()),
        business_hours: business_hours_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok()),
        is_published: row.get::<_, i32>(19)? != 0,
        created_by_operator_id: row.get(20)?,
        updated_by_operator_id: row.get(21)?,
        created_at: row.get(22)?,
        updated_at: row.get(23)?,
    })
}

/// Stored JSON arrays are read tolerantly: a missing or unreadable column
/// becomes an empty list rather than a row-level failure.
fn parse_json_column<T: serde::de::DeserializeOwned + Default>(json: Option<&str>) -> T {
    json.and_then(|s| serde_json::from_str(s).ok()).unwrap_or_default()
}

pub struct VenueSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub is_published: bool,
}

/// Venues owned by an operator, for the dashboard list. Ownership is the
/// `created_by_operator_id` column.
pub fn venues_for_operator(
    conn: &Connection,
    operator_id: &str,
) -> anyhow::Result<Vec<VenueSummary>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, slug, city, region, is_published
         FROM venues WHERE created_by_operator_id = ?1 ORDER BY name ASC",
    )?;

    let rows = stmt.query_map(params![operator_id], |row| {
        Ok(VenueSummary {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            city: row.get(3)?,
            region: row.get(4)?,
            is_published: row.get::<_, i32>(5)? != 0,
        })
    })?;

    let mut venues = vec![];
    for row in rows {
        venues.push(row?);
    }
    Ok(venues)
}

// Every venue update below filters by BOTH id AND created_by_operator_id
// and reports whether a row was touched; 0 rows means not-found or
// not-owned, which callers treat the same. The slug is never updated.

pub fn update_venue_details(
    conn: &Connection,
    venue_id: &str,
    operator_id: &str,
    details: &VenueDetails,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE venues SET name = ?1, address_line1 = ?2, city = ?3, region = ?4,
            postal_code = ?5, country = ?6, phone = ?7, website_url = ?8,
            latitude = ?9, longitude = ?10,
            updated_by_operator_id = ?11, updated_at = datetime('now')
         WHERE id = ?12 AND created_by_operator_id = ?11",
        params![
            details.name.trim(),
            null_if_empty(&details.address_line1),
            null_if_empty(&details.city),
            null_if_empty(&details.region),
            null_if_empty(&details.postal_code),
            null_if_empty(&details.country),
            null_if_empty(&details.phone),
            null_if_empty(&details.website_url),
            details.latitude,
            details.longitude,
            operator_id,
            venue_id,
        ],
    )?;
    Ok(count > 0)
}

pub fn update_venue_links(
    conn: &Connection,
    venue_id: &str,
    operator_id: &str,
    website_url: &str,
    menu_url: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE venues SET website_url = ?1, menu_url = ?2,
            updated_by_operator_id = ?3, updated_at = datetime('now')
         WHERE id = ?4 AND created_by_operator_id = ?3",
        params![
            null_if_empty(website_url),
            null_if_empty(menu_url),
            operator_id,
            venue_id,
        ],
    )?;
    Ok(count > 0)
}

pub fn update_payment_types(
    conn: &Connection,
    venue_id: &str,
    operator_id: &str,
    selected: &[String],
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE venues SET payment_types = ?1,
            updated_by_operator_id = ?2, updated_at = datetime('now')
         WHERE id = ?3 AND created_by_operator_id = ?2",
        params![serde_json::to_string(selected)?, operator_id, venue_id],
    )?;
    Ok(count > 0)
}

pub fn update_business_hours(
    conn: &Connection,
    venue_id: &str,
    operator_id: &str,
    hours: &BusinessHours,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE venues SET business_hours = ?1,
            updated_by_operator_id = ?2, updated_at = datetime('now')
         WHERE id = ?3 AND created_by_operator_id = ?2",
        params![serde_json::to_string(hours)?, operator_id, venue_id],
    )?;
    Ok(count > 0)
}

pub fn update_hh_times(
    conn: &Connection,
    venue_id: &str,
    operator_id: &str,
    hh_times: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE venues SET hh_times = ?1,
            updated_by_operator_id = ?2, updated_at = datetime('now')
         WHERE id = ?3 AND created_by_operator_id = ?2",
        params![hh_times, operator_id, venue_id],
    )?;
    Ok(count > 0)
}

pub fn update_hh_tagline(
    conn: &Connection,
    venue_id: &str,
    operator_id: &str,
    tagline: Option<&str>,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE venues SET hh_tagline = ?1,
            updated_by_operator_id = ?2, updated_at = datetime('now')
         WHERE id = ?3 AND created_by_operator_id = ?2",
        params![tagline, operator_id, venue_id],
    )?;
    Ok(count > 0)
}

pub fn update_specials(
    conn: &Connection,
    venue_id: &str,
    operator_id: &str,
    kind: SpecialsKind,
    items: &[HhItem],
) -> anyhow::Result<bool> {
    let sql = format!(
        "UPDATE venues SET {} = ?1,
            updated_by_operator_id = ?2, updated_at = datetime('now')
         WHERE id = ?3 AND created_by_operator_id = ?2",
        kind.column()
    );
    let count = conn.execute(
        &sql,
        params![serde_json::to_string(items)?, operator_id, venue_id],
    )?;
    Ok(count > 0)
}

// ── Events ──

const EVENT_COLUMNS: &str = "id, venue_id, title, description, event_time, event_frequency, \
     is_published, created_by_operator_id, updated_by_operator_id, created_at, updated_at";

pub fn insert_event(conn: &Connection, event: &VenueEvent) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO events (id, venue_id, title, description, event_time, event_frequency,
            is_published, created_by_operator_id, updated_by_operator_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            event.id,
            event.venue_id,
            event.title,
            event.description,
            event.event_time,
            event.event_frequency,
            event.is_published as i32,
            event.created_by_operator_id,
            event.updated_by_operator_id,
        ],
    )?;
    Ok(())
}

pub fn get_event_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<VenueEvent>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], parse_event_row);

    match result {
        Ok(event) => Ok(Some(event)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn events_for_venue(conn: &Connection, venue_id: &str) -> anyhow::Result<Vec<VenueEvent>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE venue_id = ?1 ORDER BY created_at ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![venue_id], parse_event_row)?;

    let mut events = vec![];
    for row in rows {
        events.push(row?);
    }
    Ok(events)
}

pub fn update_event(
    conn: &Connection,
    event_id: &str,
    operator_id: &str,
    input: &EventInput,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE events SET title = ?1, description = ?2, event_time = ?3,
            event_frequency = ?4, is_published = ?5,
            updated_by_operator_id = ?6, updated_at = datetime('now')
         WHERE id = ?7 AND created_by_operator_id = ?6",
        params![
            null_if_empty(&input.title),
            null_if_empty(&input.description),
            null_if_empty(&input.event_time),
            null_if_empty(&input.event_frequency),
            input.is_published as i32,
            operator_id,
            event_id,
        ],
    )?;
    Ok(count > 0)
}

fn parse_event_row(row: &rusqlite::Row) -> Result<VenueEvent, rusqlite::Error> {
    Ok(VenueEvent {
        id: row.get(0)?,
        venue_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        event_time: row.get(4)?,
        event_frequency: row.get(5)?,
        is_published: row.get::<_, i32>(6)? != 0,
        created_by_operator_id: row.get(7)?,
        updated_by_operator_id: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}
