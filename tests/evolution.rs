//! End-to-end runs of the evolution engine.

use std::path::PathBuf;

use chain_evolver::{
    EvolutionEngine, FrameRecorder, Landscape, NullSink, Organism, RenderConfig, RunConfig,
    compute::Point,
    compute::evolution::{Chromosome, decode},
    schema::EvolutionPhase,
};
use tempfile::tempdir;

fn small_config(seed: u64) -> RunConfig {
    RunConfig {
        population_size: 40,
        decimation: 8,
        crossover_children: 8,
        mutated_children: 24,
        max_generations: 8,
        random_seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn test_same_seed_same_run() {
    let mut engine_a = EvolutionEngine::new(small_config(3)).unwrap();
    let mut engine_b = EvolutionEngine::new(small_config(3)).unwrap();
    let a = engine_a.run(&mut NullSink).unwrap();
    let b = engine_b.run(&mut NullSink).unwrap();

    assert_eq!(a.best, b.best);
    assert_eq!(a.history, b.history);
    // Same chromosomes, same fitness values, same order
    assert_eq!(engine_a.population(), engine_b.population());
    assert_eq!(engine_a.population().len(), 40);
}

#[test]
fn test_population_size_constant() {
    let mut engine = EvolutionEngine::new(small_config(11)).unwrap();
    engine.seed_population().unwrap();
    for _ in 0..5 {
        assert_eq!(engine.population().len(), 40);
        engine.step_generation().unwrap();
    }
    assert_eq!(engine.population().len(), 40);
}

#[test]
fn test_best_never_worsens() {
    let result = EvolutionEngine::new(small_config(5))
        .unwrap()
        .run(&mut NullSink)
        .unwrap();

    let series: Vec<u64> = result.best_series().collect();
    assert_eq!(series.len(), 8);
    assert!(series.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(result.best_fitness, *series.last().unwrap());
}

#[test]
fn test_exact_generation_count() {
    let mut engine = EvolutionEngine::new(small_config(9)).unwrap();
    let mut generations = Vec::new();
    let result = engine
        .run_with_callback(&mut NullSink, |p| generations.push(p.generation))
        .unwrap();

    assert_eq!(generations, (1..=8).collect::<Vec<_>>());
    assert_eq!(result.stats.generations, 8);
    assert_eq!(result.stats.total_evaluations, 40 + 7 * 32);
    assert_eq!(engine.state().phase, EvolutionPhase::Done);
}

#[test]
fn test_straight_chain_fitness() {
    let organism =
        Organism::from_chromosome(Chromosome::from_genes(&[0; 25]).unwrap(), &Landscape::default())
            .unwrap();
    // Ends at (2625, 100): 725^2 + 1800^2, no turns
    assert_eq!(organism.fitness(), 3_765_625);
}

#[test]
fn test_decode_known_genes() {
    let bits = format!("{:012b}{:012b}{:012b}", 0, 3600, 4095);
    let angles = decode(&bits, 12).unwrap();

    assert_eq!(angles.len(), 3);
    assert_eq!(angles[0], 0.0);
    assert!((angles[1] - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    assert!((angles[2] - 409.5f64.to_radians()).abs() < 1e-12);
}

#[test]
fn test_run_writes_frames() {
    let dir = tempdir().unwrap();
    let config = RunConfig {
        max_generations: 3,
        render: RenderConfig {
            output_dir: dir.path().to_path_buf(),
            canvas_size: 100,
            marker_half_size: 2,
            label_position: (10, 10),
            ..Default::default()
        },
        start: Point::new(10.0, 10.0),
        target: Point::new(90.0, 90.0),
        step_length: 5.0,
        ..small_config(2)
    };

    let mut recorder = FrameRecorder::new(config.render.clone()).unwrap();
    let result = EvolutionEngine::new(config)
        .unwrap()
        .run(&mut recorder)
        .unwrap();

    let expected: Vec<PathBuf> = (1..=3)
        .map(|g| dir.path().join(format!("frame-{g:03}.png")))
        .collect();
    assert_eq!(result.frames, expected);
    assert!(result.skipped_frames.is_empty());
    assert!(expected.iter().all(|p| p.exists()));
    assert_eq!(recorder.frames_written(), 3);
}

#[test]
fn test_result_serializes() {
    let result = EvolutionEngine::new(small_config(4))
        .unwrap()
        .run(&mut NullSink)
        .unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let parsed: chain_evolver::EvolutionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.best_fitness, result.best_fitness);
    assert_eq!(parsed.history.len(), result.history.len());
}
