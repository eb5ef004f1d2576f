//! # luna-db: Database Layer for Luna Dine
//!
//! This crate provides database access for the Luna Dine ordering backend.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Luna Dine Data Flow                              │
//! │                                                                         │
//! │  POST /api/orders                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     luna-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (repository/) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ CatalogRepo   │    │ 001_initial_ │  │   │
//! │  │   │ Connection    │◄───│ OrderRepo     │    │ schema.sql   │  │   │
//! │  │   │ Management    │    │ OrderService  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (lunadine.db)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`placement`] - The order placement transaction
//! - [`seed`] - Sample dataset
//!
//! ## Usage
//!
//! ```rust,ignore
//! use luna_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("lunadine.db")).await?;
//!
//! let menu = db.catalog().menu(1).await?;
//! let placed = db.order_service().place_order(cmd).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod placement;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use placement::{OrderService, PlacedOrder};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::feedback::FeedbackRepository;
pub use repository::order::{generate_order_uid, NewOrder, OrderRepository};
pub use repository::promo::PromoRepository;
pub use repository::service_request::ServiceRequestRepository;
