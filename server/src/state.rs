//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool and the user that requests without an
//! `x-user-id` header act as. Handlers share nothing else.

use sqlx::PgPool;
use uuid::Uuid;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; `PgPool` is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub default_user_id: Uuid,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, default_user_id: Uuid) -> Self {
        Self { pool, default_user_id }
    }
}

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;
