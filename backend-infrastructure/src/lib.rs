pub mod artifacts;
pub mod config;
pub mod repositories;
pub mod services;

pub use artifacts::*;
pub use config::*;
pub use repositories::*;
pub use services::*;
