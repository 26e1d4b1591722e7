//! Schema module - Configuration and result types for chain evolution runs.

mod config;
mod evolution;

pub use config::*;
pub use evolution::*;
