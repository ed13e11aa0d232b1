//! SQLite persistence layer for Conserje.
//!
//! This crate provides async database operations for buildings, residents,
//! units, conversations, messages, maintenance requests, knowledge entries,
//! and admin notifications using SQLx with SQLite.
//!
//! Every operation that touches tenant data takes a building id; queries
//! without a building filter are a defect.
//!
//! # Example
//!
//! ```no_run
//! use database::{building, models::Building, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:conserje.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let b = Building {
//!         id: "b1".to_string(),
//!         name: "Torre del Mar".to_string(),
//!         whatsapp_number: Some("+15550001111".to_string()),
//!         sms_number: None,
//!         admin_email: None,
//!         language: "es".to_string(),
//!         tier: "basic".to_string(),
//!         created_at: String::new(),
//!     };
//!     building::create_building(db.pool(), &b).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod building;
pub mod conversation;
pub mod error;
pub mod knowledge;
pub mod maintenance;
pub mod message;
pub mod models;
pub mod notification;
pub mod resident;
pub mod unit;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use maintenance::NewMaintenanceRequest;
pub use models::{
    AdminNotification, Building, Conversation, KnowledgeEntry, MaintenanceRequest, Message,
    NewMessage, Resident, Unit,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to handle concurrent webhook invocations.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
