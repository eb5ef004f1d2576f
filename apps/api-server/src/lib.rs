//! # Luna Dine API
//!
//! JSON-over-HTTP API for the QR-code digital menu.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Server                                       │
//! │                                                                         │
//! │  Browser ──► CorsLayer ──► TraceLayer ──► Router ──► handler           │
//! │                                              │           │              │
//! │                              unknown path ───┤           ▼              │
//! │                              404 {error}     │      luna-db (SQLite)    │
//! │                                              │                          │
//! │                              wrong method ───┘                          │
//! │                              405 {error}                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;

use axum::http::{header, Method};
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handlers::{catalog, feedback, orders, promo, service_request};
use luna_db::Database;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Builds the full application: routes, fallbacks and middleware.
pub fn router(state: AppState) -> Router {
    let routes = [
        ("/api/branches", get(catalog::list_branches)),
        ("/api/settings", get(catalog::settings)),
        ("/api/menu", get(catalog::menu)),
        ("/api/tables", get(catalog::tables)),
        ("/api/order_status", get(orders::order_status)),
        ("/api/orders", post(orders::create_order)),
        ("/api/promocode", post(promo::lookup)),
        ("/api/feedback", post(feedback::create)),
        ("/api/service_request", post(service_request::create)),
    ];

    routes
        .into_iter()
        .fold(Router::new(), |router, (path, handler)| {
            route_with_trailing_slash(router, path, handler)
        })
        .fallback(endpoint_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

/// Registers `path` and `path/` with the same handler.
fn route_with_trailing_slash(
    router: Router<AppState>,
    path: &str,
    handler: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, handler.clone())
        .route(&format!("{path}/"), handler)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn endpoint_not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
