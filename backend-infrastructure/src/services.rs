pub mod scoring_backend;

pub use scoring_backend::*;
