//! Application state
//!
//! Built once in `main` and cloned into handlers. Holds the only database
//! handle the process owns.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    pool: PgPool,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connection pool, cheap to clone
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
