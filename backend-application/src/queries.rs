pub mod health_queries;
pub mod transaction_queries;

pub use health_queries::*;
pub use transaction_queries::*;
