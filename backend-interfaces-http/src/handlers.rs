pub mod ops_handlers;
pub mod scoring_handlers;
pub mod transaction_handlers;

pub use ops_handlers::*;
pub use scoring_handlers::*;
pub use transaction_handlers::*;
