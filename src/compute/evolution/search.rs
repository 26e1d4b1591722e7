//! Generational loop: seeding, truncation selection and breeding.

use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info, warn};
use rand::seq::SliceRandom;

use crate::render::FrameSink;
use crate::schema::{
    ConfigError, EvolutionPhase, EvolutionProgress, EvolutionResult, EvolutionStats,
    GenerationStats, RunConfig, RunState,
};

use super::fitness::Landscape;
use super::genome::{DecodeError, GenomeRng, create_chromosome, hamming_distance};
use super::organism::{Breeding, Organism};

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Corrupted chromosome: {0}")]
    Decode(#[from] DecodeError),
    #[error("Population is empty")]
    EmptyPopulation,
}

/// Evolution engine that owns the population and the generation counter.
#[derive(Clone)]
pub struct EvolutionEngine {
    config: RunConfig,
    landscape: Landscape,
    rng: GenomeRng,
    population: Vec<Organism>,
    state: RunState,
    history: Vec<GenerationStats>,
    evaluations: u64,
}

impl EvolutionEngine {
    /// Create a new evolution engine from a validated configuration.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.random_seed.unwrap_or_else(rand::random);
        info!("Random seed: {seed}");

        Ok(Self {
            landscape: config.landscape(),
            rng: GenomeRng::new(seed),
            population: Vec::with_capacity(config.population_size),
            state: RunState::default(),
            history: Vec::with_capacity(config.max_generations),
            evaluations: 0,
            config,
        })
    }

    /// Replace the random source.
    pub fn with_rng(mut self, rng: GenomeRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Current population, best first.
    pub fn population(&self) -> &[Organism] {
        &self.population
    }

    pub fn best(&self) -> Option<&Organism> {
        self.population.first()
    }

    /// Summaries of every generation so far.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Build generation 1 from random chromosomes.
    pub fn seed_population(&mut self) -> Result<(), EvolutionError> {
        let size = self.config.population_size;
        debug!(
            "Seeding {size} organisms with {} genes (gene values 0..={})",
            self.config.genes, self.config.initial_gene_max
        );

        let mut population = Vec::with_capacity(size);
        for _ in 0..size {
            let chromosome =
                create_chromosome(self.config.genes, self.config.initial_gene_max, &mut self.rng);
            population.push(Organism::from_chromosome(chromosome, &self.landscape)?);
        }
        self.evaluations += size as u64;

        self.install(population, 1, EvolutionPhase::Seeding);
        Ok(())
    }

    /// Breed the next generation from the current one.
    pub fn step_generation(&mut self) -> Result<(), EvolutionError> {
        if self.population.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }

        // Truncation selection; survivors are cloned so parents never alias
        let keep = self.config.decimation.min(self.population.len());
        let survivors = self.population[..keep].to_vec();
        debug!(
            "Generation {}: {keep} survivors, worst survivor fitness {}",
            self.state.generation + 1,
            survivors[keep - 1].fitness()
        );

        let mut children = Vec::with_capacity(self.config.children_per_generation());
        self.breed(
            &survivors,
            self.config.crossover_children,
            Breeding::Crossover,
            &mut children,
        )?;
        self.breed(
            &survivors,
            self.config.mutated_children,
            Breeding::Mutated {
                severity: self.config.mutation_severity,
            },
            &mut children,
        )?;

        let mut population = survivors;
        population.append(&mut children);
        self.install(population, self.state.generation + 1, EvolutionPhase::Evolving);
        Ok(())
    }

    /// Append `count` children, each from two survivors drawn with replacement.
    fn breed(
        &mut self,
        survivors: &[Organism],
        count: usize,
        breeding: Breeding,
        out: &mut Vec<Organism>,
    ) -> Result<(), EvolutionError> {
        for _ in 0..count {
            let (Some(parent_a), Some(parent_b)) = (
                survivors.choose(&mut self.rng),
                survivors.choose(&mut self.rng),
            ) else {
                return Err(EvolutionError::EmptyPopulation);
            };
            out.push(Organism::from_parents(
                parent_a,
                parent_b,
                &self.landscape,
                breeding,
                &mut self.rng,
            )?);
        }
        self.evaluations += count as u64;
        Ok(())
    }

    /// Sort ascending by fitness and make `population` current.
    fn install(&mut self, mut population: Vec<Organism>, generation: usize, phase: EvolutionPhase) {
        // Stable: ties keep survivors ahead of children
        population.sort_by_key(Organism::fitness);
        self.population = population;
        self.state = RunState { generation, phase };

        let stats = self.generation_stats();
        info!(
            "Generation {generation}: best={} mean={:.1} worst={}",
            stats.best_fitness, stats.mean_fitness, stats.worst_fitness
        );
        self.history.push(stats);
    }

    fn generation_stats(&self) -> GenerationStats {
        let len = self.population.len().max(1) as f64;
        let best = self.population.first();
        let mean_fitness = self
            .population
            .iter()
            .map(|o| o.fitness() as f64)
            .sum::<f64>()
            / len;
        let mean_distance_from_best = best.map_or(0.0, |best| {
            self.population
                .iter()
                .map(|o| hamming_distance(best.chromosome(), o.chromosome()) as f64)
                .sum::<f64>()
                / len
        });

        GenerationStats {
            generation: self.state.generation,
            best_fitness: best.map_or(0, Organism::fitness),
            mean_fitness,
            worst_fitness: self.population.last().map_or(0, Organism::fitness),
            mean_distance_from_best,
        }
    }

    /// Get current progress.
    pub fn progress(&self) -> EvolutionProgress {
        let latest = self.history.last();
        EvolutionProgress {
            generation: self.state.generation,
            total_generations: self.config.max_generations,
            phase: self.state.phase,
            best_fitness: latest.map_or(u64::MAX, |s| s.best_fitness),
            mean_fitness: latest.map_or(0.0, |s| s.mean_fitness),
        }
    }

    /// Hand the current generation to the sink. Render failures skip the frame.
    fn emit_frame<S: FrameSink + ?Sized>(
        &self,
        sink: &mut S,
        frames: &mut Vec<PathBuf>,
        skipped: &mut Vec<usize>,
    ) {
        let generation = self.state.generation;
        match sink.record(generation, &self.population, &self.landscape) {
            Ok(Some(path)) => frames.push(path),
            Ok(None) => {}
            Err(e) => {
                warn!("Skipping frame for generation {generation}: {e}");
                skipped.push(generation);
            }
        }
    }

    /// Run all generations, emitting a frame and reporting progress after each.
    ///
    /// Exactly `max_generations` generations are evaluated and emitted; the
    /// recorded best fitness belongs to the last of them.
    pub fn run_with_callback<S, F>(
        &mut self,
        sink: &mut S,
        mut callback: F,
    ) -> Result<EvolutionResult, EvolutionError>
    where
        S: FrameSink + ?Sized,
        F: FnMut(&EvolutionProgress),
    {
        let start_time = Instant::now();

        self.population.clear();
        self.history.clear();
        self.state = RunState::default();
        self.evaluations = 0;

        let mut frames = Vec::with_capacity(self.config.max_generations);
        let mut skipped = Vec::new();

        self.seed_population()?;
        self.emit_frame(sink, &mut frames, &mut skipped);
        callback(&self.progress());

        for _ in 1..self.config.max_generations {
            self.step_generation()?;
            self.emit_frame(sink, &mut frames, &mut skipped);
            callback(&self.progress());
        }

        self.state.phase = EvolutionPhase::Done;
        let best = self.best().ok_or(EvolutionError::EmptyPopulation)?;
        let elapsed = start_time.elapsed().as_secs_f64();
        info!(
            "Finished {} generations in {elapsed:.2}s, best fitness {}",
            self.state.generation,
            best.fitness()
        );

        Ok(EvolutionResult {
            best: best.to_snapshot(),
            best_fitness: best.fitness(),
            history: self.history.clone(),
            stats: EvolutionStats {
                generations: self.state.generation,
                total_evaluations: self.evaluations,
                elapsed_seconds: elapsed,
            },
            frames,
            skipped_frames: skipped,
        })
    }

    /// Run evolution (blocking).
    pub fn run<S: FrameSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(sink, |_| {})
    }
}
