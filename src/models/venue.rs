use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::hours::BusinessHours;
use crate::models::special::HhItem;

/// A row from the `venues` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    /// URL-safe identifier, set at creation and never updated.
    pub slug: String,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub website_url: Option<String>,
    pub menu_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub payment_types: Vec<String>,
    pub hh_tagline: Option<String>,
    /// Weekly happy hour schedule in the `models::schedule` text format.
    pub hh_times: Option<String>,
    pub hh_food_details: Vec<HhItem>,
    pub hh_drink_details: Vec<HhItem>,
    pub business_hours: Option<BusinessHours>,
    pub is_published: bool,
    pub created_by_operator_id: String,
    pub updated_by_operator_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Editable business-detail fields as submitted by the details form.
/// Empty strings are stored as NULL.
#[derive(Debug, Clone, Default)]
pub struct VenueDetails {
    pub name: String,
    pub address_line1: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub website_url: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Converts a string into a URL-safe slug: lowercased, runs of
/// non-alphanumerics collapsed to a single dash, outer dashes stripped.
/// e.g. "Tuesday Trivia Night!" → "tuesday-trivia-night"
pub fn slugify(input: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;

    for c in input.trim().chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Slug for a new venue: the slugified name capped at 50 chars plus a
/// short random suffix so collisions against the UNIQUE constraint are
/// virtually impossible. e.g. "The Rusty Anchor!" → "the-rusty-anchor-x7k2m"
pub fn generate_slug(name: &str) -> String {
    let base: String = slugify(name).chars().take(50).collect();
    let id = Uuid::new_v4().simple().to_string();
    let suffix = &id[..5];

    if base.is_empty() {
        format!("venue-{suffix}")
    } else {
        format!("{base}-{suffix}")
    }
}
