pub mod config;
pub mod resource;
pub mod types;

pub use config::AppscaleConfig;
pub use resource::{ResourceError, ResourceRef};
pub use types::*;
