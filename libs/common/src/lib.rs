//! Common library for the BlueMoon residence backend
//!
//! This crate provides shared functionality used by the auth and api
//! services: database connectivity and migrations, error types, resident
//! records and roles, token claims and service settings.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     println!("Database health check: {}", health_check(&pool).await?);
//!     Ok(())
//! }
//! ```

pub mod claims;
pub mod database;
pub mod error;
pub mod resident;
pub mod role;
pub mod settings;

pub use claims::{AuthUser, Claims};
pub use resident::{Resident, ResidentRepository, ResidentStore, ResidentSummary};
pub use role::Role;
