pub mod scoring_commands;

pub use scoring_commands::*;
