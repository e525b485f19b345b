mod admin;
pub mod dto;
pub mod layout;
mod public;
pub mod response;
mod router;
pub mod validation;

pub use admin::admin_router;
pub use router::{AppState, create_router};
