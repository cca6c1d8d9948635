// Domain services: the three stages of the scoring pipeline and their composition

pub mod anomaly_scorer;
pub mod feature_preparer;
pub mod pipeline;
pub mod result_assembler;

pub use anomaly_scorer::*;
pub use feature_preparer::*;
pub use pipeline::*;
pub use result_assembler::*;
