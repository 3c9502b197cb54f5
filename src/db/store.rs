use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::StoreError;
use crate::models::Operator;
use crate::services::provision::OperatorStore;

/// Shared-connection handle to the directory database. Cheap to clone;
/// all access serializes through the inner mutex.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs a closure against the locked connection, for callers that use
    /// the query layer directly.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let conn = self.conn.lock().unwrap();
        f(&conn)
    }
}

#[async_trait]
impl OperatorStore for SqliteStore {
    async fn operator_by_email(&self, email: &str) -> Result<Option<Operator>, StoreError> {
        let conn = self.conn.lock().unwrap();
        queries::find_operator_by_email(&conn, email)
    }

    async fn create_operator(&self, email: &str) -> Result<Operator, StoreError> {
        let conn = self.conn.lock().unwrap();
        queries::insert_operator(&conn, email)
    }
}
