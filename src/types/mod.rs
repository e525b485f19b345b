mod kind;
mod models;

pub use kind::PageKind;
pub use models::*;

/// Sentinel tenant id used in single-user (self-hosted) mode.
pub const DEFAULT_TENANT_ID: &str = "_default";
