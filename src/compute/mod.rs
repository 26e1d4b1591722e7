//! Compute module - Chain geometry and the evolutionary search.

pub mod evolution;
mod geometry;

pub use geometry::*;
