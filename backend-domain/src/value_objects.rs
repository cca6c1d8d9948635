// Domain value objects
pub mod feature_matrix;
pub mod outlier_label;
pub mod unknown_category_policy;

pub use feature_matrix::*;
pub use outlier_label::*;
pub use unknown_category_policy::*;
