//! Chain Evolver CLI - Evolve a chain toward its target and render the run.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chain_evolver::{
    EvolutionEngine, FfmpegEncoder, FrameRecorder, FrameSink, NullSink, RunConfig, VideoEncoder,
    render::{VideoError, video_path},
};

/// Run summary file written next to the frames.
const SUMMARY_FILE: &str = "run.json";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("chain-evolver", String::as_str);

    let mut config_path: Option<PathBuf> = None;
    let mut encode_video = true;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--example" => {
                print_example_config();
                return;
            }
            "--no-video" => encode_video = false,
            "-h" | "--help" => {
                print_usage(program);
                return;
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown option: {other}");
                print_usage(program);
                std::process::exit(1);
            }
            other => config_path = Some(PathBuf::from(other)),
        }
    }

    // Load configuration
    let config = match &config_path {
        Some(path) => RunConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading config {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => RunConfig::default(),
    };

    let mut engine = EvolutionEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });
    let config = engine.config();

    println!("Chain Evolver");
    println!("=============");
    println!(
        "Population: {} ({} survivors, {} crossover, {} mutated)",
        config.population_size,
        config.decimation,
        config.crossover_children,
        config.mutated_children
    );
    println!(
        "Chain: {} segments of {} from ({}, {}) to ({}, {})",
        config.genes,
        config.step_length,
        config.start.x,
        config.start.y,
        config.target.x,
        config.target.y
    );
    println!("Generations: {}", config.max_generations);
    println!();

    let render = config.render.clone();
    let mut sink: Box<dyn FrameSink> = if render.enabled {
        match FrameRecorder::new(render.clone()) {
            Ok(recorder) => Box::new(recorder),
            Err(e) => {
                eprintln!("Error preparing frame output: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Box::new(NullSink)
    };

    // Run evolution
    println!("Running evolution...");
    let start = Instant::now();
    let result = engine
        .run_with_callback(sink.as_mut(), |progress| {
            println!(
                "  Generation {}/{}: best={}, mean={:.1}",
                progress.generation,
                progress.total_generations,
                progress.best_fitness,
                progress.mean_fitness
            );
        })
        .unwrap_or_else(|e| {
            eprintln!("Evolution failed: {}", e);
            std::process::exit(1);
        });
    let elapsed = start.elapsed();

    println!();
    println!("Best fitness: {}", result.best_fitness);
    println!("Best chromosome: {}", result.best.chromosome);
    if let Some(end) = result.best.points.last() {
        println!("Best chain ends at ({:.1}, {:.1})", end.x, end.y);
    }
    println!(
        "Time: {:.2}s ({} evaluations)",
        elapsed.as_secs_f32(),
        result.stats.total_evaluations
    );
    if !result.skipped_frames.is_empty() {
        println!("Skipped frames: {:?}", result.skipped_frames);
    }

    if !render.enabled {
        return;
    }

    let summary_path = render.output_dir.join(SUMMARY_FILE);
    match serde_json::to_string_pretty(&result) {
        Ok(json) => match fs::write(&summary_path, json) {
            Ok(()) => println!("Summary: {}", summary_path.display()),
            Err(e) => eprintln!("Error writing {}: {}", summary_path.display(), e),
        },
        Err(e) => eprintln!("Error serializing summary: {}", e),
    }

    if !encode_video {
        return;
    }

    let output = video_path(&render.output_dir, result.best_fitness);
    match FfmpegEncoder::default().encode(&result.frames, render.frame_rate, &output) {
        Ok(()) => println!("Video: {}", output.display()),
        Err(VideoError::EncoderNotFound) => {
            println!("Skipping video export (ffmpeg not installed)");
        }
        Err(e) => {
            eprintln!("Video export failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [config.json] [--no-video]", program);
    eprintln!();
    eprintln!("Evolve a chain of segments toward a target, one frame per generation.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Run configuration (default: built-in settings)");
    eprintln!("  --no-video   Write frames but do not assemble a video");
    eprintln!("  --example    Print an example configuration and exit");
}

fn print_example_config() {
    let config = RunConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
