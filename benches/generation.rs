//! Benchmarks for the chain evolution loop.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use chain_evolver::{
    EvolutionEngine, Landscape, RunConfig,
    compute::evolution::{GenomeRng, create_chromosome},
};

fn bench_step_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_generation");

    for genes in [10, 25, 100] {
        let config = RunConfig {
            genes,
            random_seed: Some(42),
            ..Default::default()
        };

        let mut seeded = EvolutionEngine::new(config).unwrap();
        seeded.seed_population().unwrap();

        // Each iteration steps a fresh copy of generation 1
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_genes", genes)),
            &genes,
            |b, _| {
                b.iter_batched(
                    || seeded.clone(),
                    |mut engine| {
                        engine.step_generation().unwrap();
                        black_box(engine.best().map(|o| o.fitness()))
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let landscape = Landscape::default();
    let chromosome = create_chromosome(25, 3600, &mut GenomeRng::new(7));

    c.bench_function("evaluate_25_genes", |b| {
        b.iter(|| {
            let angles = black_box(&chromosome).decode().unwrap();
            black_box(landscape.evaluate(&angles))
        });
    });
}

criterion_group!(benches, bench_step_generation, bench_evaluate);
criterion_main!(benches);
