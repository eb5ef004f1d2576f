//! # Repository Module
//!
//! Database repository implementations for Luna Dine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.catalog().menu(branch_id)                            │
//! │       ▼                                                                 │
//! │  CatalogRepository                                                     │
//! │  ├── list_branches(&self)                                              │
//! │  ├── branch_settings(&self, branch_id)                                 │
//! │  ├── menu(&self, branch_id)                                            │
//! │  └── list_tables(&self, branch_id)                                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Lookups the order transaction also needs are free functions over      │
//! │  `&mut SqliteConnection`; the repository methods wrap them.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Branches, menus, tables
//! - [`PromoRepository`](promo::PromoRepository) - Promo code lookup
//! - [`OrderRepository`](order::OrderRepository) - Stored orders and status changes
//! - [`FeedbackRepository`](feedback::FeedbackRepository) - Guest ratings
//! - [`ServiceRequestRepository`](service_request::ServiceRequestRepository) - Calls for staff

pub mod catalog;
pub mod feedback;
pub mod order;
pub mod promo;
pub mod service_request;
