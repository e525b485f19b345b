//! # Pressman
//!
//! A multi-tenant blog engine, usable both as a standalone binary and as a
//! library embedded in a larger platform.
//!
//! The core pieces:
//!
//! - [`store`]: tenant-scoped page storage and the versioned site bundle
//!   history (append-only revisions, a movable "current" pointer, and
//!   bounded retention).
//! - [`render`]: wiki-link resolution (`[[id]]` → current slug, looked up
//!   at render time) and GFM markdown rendering.
//! - [`server`]: the axum router mapping paths to page lookups, plus a JSON
//!   admin surface for editing pages and the site shell.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pressman::server::{AppState, create_router};
//! use pressman::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/pressman.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), None, String::new()));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod server;
pub mod store;
pub mod types;
