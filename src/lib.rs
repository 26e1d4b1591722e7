//! Chain Evolver - A genetic algorithm that steers a chain of segments to a target.
//!
//! Every organism is a binary chromosome of 12-bit genes. Each gene is a
//! heading in tenths of a degree; walking a fixed step along each heading
//! from a start point traces a chain. Fitness rewards chains that end near
//! the target and penalizes sharp turns between consecutive segments. Each
//! generation is rendered to a PNG frame and the frames can be assembled
//! into a video.
//!
//! # Architecture
//!
//! The crate is split into three main modules:
//!
//! - `schema`: Configuration and result types for runs
//! - `compute`: Chain geometry and the genetic algorithm
//! - `render`: Frame drawing and video assembly
//!
//! # Example
//!
//! ```rust,no_run
//! use chain_evolver::{EvolutionEngine, FrameRecorder, RunConfig};
//!
//! let config = RunConfig {
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//! let mut recorder = FrameRecorder::new(config.render.clone()).unwrap();
//! let mut engine = EvolutionEngine::new(config).unwrap();
//! let result = engine.run(&mut recorder).unwrap();
//!
//! println!("Best fitness after {} generations: {}",
//!     result.stats.generations, result.best_fitness);
//! ```

pub mod compute;
pub mod render;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{EvolutionEngine, EvolutionError, Landscape, Organism};
pub use render::{FfmpegEncoder, FrameRecorder, FrameSink, NullSink, VideoEncoder};
pub use schema::{EvolutionResult, RenderConfig, RunConfig};
