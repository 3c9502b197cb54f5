pub mod queries;
pub mod store;

use anyhow::Context;
use rusqlite::Connection;

/// Opens (or creates) the directory database and applies the schema.
pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    apply_schema(&conn)?;

    tracing::info!("database ready at {path}");
    Ok(conn)
}

fn apply_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS operators (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            is_approved INTEGER NOT NULL DEFAULT 0,
            role TEXT NOT NULL DEFAULT 'operator',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS venues (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            address_line1 TEXT,
            city TEXT,
            region TEXT,
            postal_code TEXT,
            country TEXT,
            phone TEXT,
            website_url TEXT,
            menu_url TEXT,
            latitude REAL,
            longitude REAL,
            payment_types TEXT,
            hh_tagline TEXT,
            hh_times TEXT,
            hh_food_details TEXT,
            hh_drink_details TEXT,
            business_hours TEXT,
            is_published INTEGER NOT NULL DEFAULT 0,
            created_by_operator_id TEXT NOT NULL REFERENCES operators(id),
            updated_by_operator_id TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            venue_id TEXT NOT NULL REFERENCES venues(id),
            title TEXT,
            description TEXT,
            event_time TEXT,
            event_frequency TEXT,
            is_published INTEGER NOT NULL DEFAULT 0,
            created_by_operator_id TEXT NOT NULL,
            updated_by_operator_id TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to apply schema")?;
    Ok(())
}
