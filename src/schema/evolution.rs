//! Progress and result types reported by the evolution engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::compute::Point;

/// Phase of the generational loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvolutionPhase {
    /// Building the first, random population.
    #[default]
    Seeding,
    /// Breeding generations from survivors.
    Evolving,
    /// Generation limit reached.
    Done,
}

/// Generation counter and phase, owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunState {
    /// Current generation, starting at 1 once the population is seeded.
    pub generation: usize,
    pub phase: EvolutionPhase,
}

/// Per-generation summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: u64,
    pub mean_fitness: f64,
    pub worst_fitness: u64,
    /// Mean Hamming distance between each organism and the best one.
    pub mean_distance_from_best: f64,
}

/// Progress reported after every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    pub generation: usize,
    pub total_generations: usize,
    pub phase: EvolutionPhase,
    pub best_fitness: u64,
    pub mean_fitness: f64,
}

/// Serializable copy of an organism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismSnapshot {
    pub chromosome: String,
    /// Decoded turning angles in radians.
    pub rotations: Vec<f64>,
    pub points: Vec<Point>,
    pub fitness: u64,
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Generations evaluated.
    pub generations: usize,
    /// Organisms built and scored.
    pub total_evaluations: u64,
    /// Wall-clock time in seconds.
    pub elapsed_seconds: f64,
}

/// Final result of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Best organism of the last evaluated generation.
    pub best: OrganismSnapshot,
    /// Fitness of `best`; names the output video.
    pub best_fitness: u64,
    /// One entry per generation, in order.
    pub history: Vec<GenerationStats>,
    pub stats: EvolutionStats,
    /// Frames written, in generation order.
    pub frames: Vec<PathBuf>,
    /// Generations whose frame could not be rendered.
    pub skipped_frames: Vec<usize>,
}

impl EvolutionResult {
    /// Best fitness per generation, in order.
    pub fn best_series(&self) -> impl Iterator<Item = u64> + '_ {
        self.history.iter().map(|g| g.best_fitness)
    }
}
