use std::env;

/// Store configuration, resolved from the environment with defaults.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub database_url: String,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "hhcompass.db".to_string()),
        }
    }
}
