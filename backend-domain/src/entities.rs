// Domain entities

pub mod dataset;
pub mod query;
pub mod record_layout;
pub mod runtime_config;
pub mod scoring;
pub mod transaction;

pub use dataset::*;
pub use query::*;
pub use record_layout::*;
pub use runtime_config::*;
pub use scoring::*;
pub use transaction::*;
