use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use hhcompass::db::store::SqliteStore;
use hhcompass::db::{self, queries};
use hhcompass::errors::StoreError;
use hhcompass::models::{
    Clock12, Day, DayInput, EventInput, ItemInput, Meridiem, Operator, SpecialsKind, VenueDetails,
    WeeklySchedule,
};
use hhcompass::services::provision::{ensure_operator, OperatorStore, ProvisionError};
use hhcompass::services::{events, venues};

// ── Helpers ──

fn test_store() -> SqliteStore {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("hhcompass=debug")
        .with_test_writer()
        .try_init();

    let conn = db::init_db(":memory:").unwrap();
    SqliteStore::new(conn)
}

fn operator_count(store: &SqliteStore, email: &str) -> i64 {
    store.with_conn(|conn| {
        conn.query_row(
            "SELECT COUNT(*) FROM operators WHERE email = ?1",
            [email],
            |row| row.get(0),
        )
        .unwrap()
    })
}

/// Wraps the real store but reports "no row" on the first lookup, the
/// window a concurrent caller slips through: our read saw nothing, their
/// insert committed, our insert now hits the live unique index.
struct StaleReadStore {
    inner: SqliteStore,
    first_lookup_done: AtomicBool,
}

#[async_trait]
impl OperatorStore for StaleReadStore {
    async fn operator_by_email(&self, email: &str) -> Result<Option<Operator>, StoreError> {
        if !self.first_lookup_done.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.operator_by_email(email).await
    }

    async fn create_operator(&self, email: &str) -> Result<Operator, StoreError> {
        self.inner.create_operator(email).await
    }
}

// ── Provisioning ──

#[tokio::test]
async fn test_first_call_creates_with_defaults() {
    let store = test_store();

    let operator = ensure_operator(&store, "amy@example.com").await.unwrap();
    assert_eq!(operator.email, "amy@example.com");
    assert!(!operator.is_approved);
    assert_eq!(operator.role, "operator");
    assert!(operator.name.is_none());
    assert!(!operator.created_at.is_empty());
    assert_eq!(operator_count(&store, "amy@example.com"), 1);
}

#[tokio::test]
async fn test_repeat_calls_return_same_row() {
    let store = test_store();

    let first = ensure_operator(&store, "amy@example.com").await.unwrap();
    let second = ensure_operator(&store, "amy@example.com").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(operator_count(&store, "amy@example.com"), 1);
}

#[tokio::test]
async fn test_race_recovers_through_real_unique_index() {
    let store = test_store();

    // The concurrent "winner" commits first.
    let winner = store.with_conn(|conn| queries::insert_operator(conn, "amy@example.com").unwrap());

    // Our caller read before that commit, so its lookup sees nothing and
    // its insert collides with the live unique index on email.
    let racing = StaleReadStore {
        inner: store.clone(),
        first_lookup_done: AtomicBool::new(false),
    };
    let recovered = ensure_operator(&racing, "amy@example.com").await.unwrap();

    assert_eq!(recovered.id, winner.id);
    assert_eq!(operator_count(&store, "amy@example.com"), 1);
}

#[tokio::test]
async fn test_concurrent_first_time_calls_create_one_row() {
    let store = test_store();

    let (a, b) = tokio::join!(
        ensure_operator(&store, "amy@example.com"),
        ensure_operator(&store, "amy@example.com"),
    );

    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.id, b.id);
    assert_eq!(operator_count(&store, "amy@example.com"), 1);
}

#[tokio::test]
async fn test_distinct_identities_get_distinct_rows() {
    let store = test_store();

    let amy = ensure_operator(&store, "amy@example.com").await.unwrap();
    let bob = ensure_operator(&store, "bob@example.com").await.unwrap();

    assert_ne!(amy.id, bob.id);
}

#[tokio::test]
async fn test_missing_email_is_an_error() {
    let store = test_store();
    let err = ensure_operator(&store, "").await.unwrap_err();
    assert!(matches!(err, ProvisionError::MissingEmail));
}

// ── Venue lifecycle ──

#[tokio::test]
async fn test_full_venue_editing_flow() {
    let store = test_store();
    let operator = ensure_operator(&store, "owner@example.com").await.unwrap();

    let venue = store.with_conn(|conn| {
        venues::create_venue(
            conn,
            &operator,
            &VenueDetails {
                name: "The Rusty Anchor".to_string(),
                city: "Portland".to_string(),
                ..VenueDetails::default()
            },
        )
        .unwrap()
    });
    assert!(venue.slug.starts_with("the-rusty-anchor-"));

    store.with_conn(|conn| {
        venues::update_links(conn, &venue.id, &operator, "https://anchor.example", "").unwrap();
        venues::update_payment_types(
            conn,
            &venue.id,
            &operator,
            &["cash".to_string(), "card".to_string()],
        )
        .unwrap();
        venues::save_tagline(conn, &venue.id, &operator, "Half-price apps, every weekday!")
            .unwrap();

        venues::save_business_hours(
            conn,
            &venue.id,
            &operator,
            &[
                (
                    Day::Monday,
                    DayInput::Open {
                        open: Clock12::new(11, 0, Meridiem::Am),
                        close: Clock12::new(11, 0, Meridiem::Pm),
                    },
                ),
                // Overnight window, legal as-is.
                (
                    Day::Friday,
                    DayInput::Open {
                        open: Clock12::new(10, 0, Meridiem::Pm),
                        close: Clock12::new(2, 0, Meridiem::Am),
                    },
                ),
                (Day::Sunday, DayInput::Closed),
            ],
        )
        .unwrap();

        venues::save_specials(
            conn,
            &venue.id,
            &operator,
            SpecialsKind::Food,
            &[ItemInput {
                name: "Smash Burger".to_string(),
                price: "13".to_string(),
                notes: "GF".to_string(),
            }],
        )
        .unwrap();
    });

    let stored = store.with_conn(|conn| queries::get_venue_by_id(conn, &venue.id).unwrap().unwrap());
    assert_eq!(stored.website_url.as_deref(), Some("https://anchor.example"));
    assert!(stored.menu_url.is_none());
    assert_eq!(stored.payment_types, vec!["cash", "card"]);
    assert_eq!(
        stored.hh_tagline.as_deref(),
        Some("Half-price apps, every weekday!")
    );
    assert_eq!(stored.hh_food_details[0].name, "Smash Burger");

    let hours = stored.business_hours.unwrap();
    assert_eq!(hours.hours_for(Day::Monday).unwrap().open, "11:00");
    assert_eq!(hours.hours_for(Day::Friday).unwrap().close, "02:00");
    assert!(hours.hours_for(Day::Sunday).is_none());
}

#[tokio::test]
async fn test_schedule_text_round_trips_through_store() {
    let store = test_store();
    let operator = ensure_operator(&store, "owner@example.com").await.unwrap();
    let venue = store.with_conn(|conn| {
        venues::create_venue(
            conn,
            &operator,
            &VenueDetails {
                name: "Anchor".to_string(),
                ..VenueDetails::default()
            },
        )
        .unwrap()
    });

    // Hand-typed input: hyphens, lowercase meridiems, a "close" token.
    let typed = "Tuesday: 4 pm - 6 pm\nFriday: 4 PM-6 PM, 9 PM-close";
    let saved = store.with_conn(|conn| {
        venues::save_hh_times(conn, &venue.id, &operator, &WeeklySchedule::parse(typed)).unwrap()
    });

    let stored = store.with_conn(|conn| queries::get_venue_by_id(conn, &venue.id).unwrap().unwrap());
    let text = stored.hh_times.unwrap();
    assert_eq!(text, saved);
    assert!(text.contains("Tuesday: 4 PM\u{2013}6 PM"));
    assert!(text.contains("Friday: 4 PM\u{2013}6 PM, 9 PM\u{2013}11 PM"));
    assert!(text.contains("Monday: No happy hour"));

    // Canonical text is a fixed point of the codec.
    assert_eq!(WeeklySchedule::parse(&text).to_text(), text);
}

#[tokio::test]
async fn test_cross_operator_writes_rejected() {
    let store = test_store();
    let owner = ensure_operator(&store, "owner@example.com").await.unwrap();
    let stranger = ensure_operator(&store, "stranger@example.com").await.unwrap();

    let venue = store.with_conn(|conn| {
        venues::create_venue(
            conn,
            &owner,
            &VenueDetails {
                name: "Anchor".to_string(),
                ..VenueDetails::default()
            },
        )
        .unwrap()
    });

    store.with_conn(|conn| {
        let result = venues::save_tagline(conn, &venue.id, &stranger, "mine now");
        assert!(matches!(result, Err(venues::VenueError::NotOwned)));

        let listed = queries::venues_for_operator(conn, &stranger.id).unwrap();
        assert!(listed.is_empty());
    });
}

#[tokio::test]
async fn test_event_lifecycle() {
    let store = test_store();
    let operator = ensure_operator(&store, "owner@example.com").await.unwrap();
    let venue = store.with_conn(|conn| {
        venues::create_venue(
            conn,
            &operator,
            &VenueDetails {
                name: "Anchor".to_string(),
                ..VenueDetails::default()
            },
        )
        .unwrap()
    });

    let created = store.with_conn(|conn| {
        events::save_event(
            conn,
            &venue.id,
            &operator,
            None,
            &EventInput {
                title: "Trivia Night".to_string(),
                event_frequency: "Every Tuesday".to_string(),
                ..EventInput::default()
            },
        )
        .unwrap()
    });

    let updated = store.with_conn(|conn| {
        events::save_event(
            conn,
            &venue.id,
            &operator,
            Some(&created.id),
            &EventInput {
                title: "Trivia Night".to_string(),
                event_frequency: "Every Tuesday".to_string(),
                event_time: "7:00 PM".to_string(),
                is_published: true,
                ..EventInput::default()
            },
        )
        .unwrap()
    });

    assert_eq!(updated.id, created.id);
    assert!(updated.is_published);
    let all = store.with_conn(|conn| queries::events_for_venue(conn, &venue.id).unwrap());
    assert_eq!(all.len(), 1);
}
