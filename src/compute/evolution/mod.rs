//! Genetic algorithm for evolving chains of fixed-length segments.
//!
//! # Overview
//!
//! - **Genome** (`genome`): binary chromosomes, decoding, crossover, mutation
//! - **Fitness** (`fitness`): end-point distance plus turn penalty
//! - **Organisms** (`organism`): evaluated, immutable candidates
//! - **Search** (`search`): the generational loop
//!
//! # Example
//!
//! ```rust,no_run
//! use chain_evolver::compute::evolution::EvolutionEngine;
//! use chain_evolver::render::NullSink;
//! use chain_evolver::schema::RunConfig;
//!
//! let mut engine = EvolutionEngine::new(RunConfig::default()).unwrap();
//! let result = engine
//!     .run_with_callback(&mut NullSink, |progress| {
//!         println!("Generation {}: best fitness = {}",
//!             progress.generation, progress.best_fitness);
//!     })
//!     .unwrap();
//!
//! println!("Best fitness: {}", result.best_fitness);
//! ```

mod fitness;
mod genome;
mod organism;
mod search;

pub use fitness::{Landscape, endpoint_cost, smoothness_cost, total_fitness};
pub use genome::{
    Chromosome, DecodeError, GENE_WIDTH, GenomeRng, MAX_GENE_VALUE, create_chromosome, crossover,
    decode, gene_angle, hamming_distance, mutate,
};
pub use organism::{Breeding, Organism};
pub use search::{EvolutionEngine, EvolutionError};
