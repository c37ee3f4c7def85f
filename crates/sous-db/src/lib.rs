//! # sous-db
//!
//! PostgreSQL database layer for the sous recipe service.
//!
//! This crate provides:
//! - Connection pool management
//! - Recipe repository (CRUD, match candidate fetch, embedding storage,
//!   pgvector similarity search)
//! - User repository (CRUD, profile updates, soft delete)
//!
//! ## Example
//!
//! ```rust,ignore
//! use sous_db::Database;
//! use sous_core::RecipeRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/sous").await?;
//!     let recipe = db.recipes.fetch(some_id).await?;
//!     println!("{}", recipe.title);
//!     Ok(())
//! }
//! ```

pub mod pool;
pub mod recipes;
pub mod users;

// Re-export core types
pub use sous_core::*;

pub use pool::PoolConfig;
pub use recipes::PgRecipeRepository;
pub use users::PgUserRepository;

use std::sync::Arc;

/// Combined database context with all repositories.
///
/// Constructed once at startup and passed by reference wherever storage
/// access is needed; there is no global handle.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Recipe repository.
    pub recipes: Arc<PgRecipeRepository>,
    /// User repository.
    pub users: Arc<PgUserRepository>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            recipes: Arc::new(PgRecipeRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            pool,
        }
    }

    /// Connect using pool configuration from the environment.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with_config(database_url, PoolConfig::from_env()).await
    }

    /// Connect with an explicit pool configuration.
    pub async fn connect_with_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = config.connect(database_url).await?;
        Ok(Self::new(pool))
    }
}
