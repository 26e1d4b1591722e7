//! Configuration types for a chain evolution run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::compute::Point;
use crate::compute::evolution::{Landscape, MAX_GENE_VALUE};

/// Top-level run configuration.
///
/// Every field has a default, so a JSON file only needs to name the values it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Organisms per generation.
    pub population_size: usize,
    /// Survivors kept unchanged after truncation selection.
    pub decimation: usize,
    /// Children produced by crossover alone.
    pub crossover_children: usize,
    /// Children produced by crossover followed by point mutation.
    pub mutated_children: usize,
    /// Bit flips applied to each mutated child.
    pub mutation_severity: usize,
    /// Generations evaluated (and rendered) before the run stops.
    pub max_generations: usize,
    /// Angle genes per chromosome in the seeded population.
    pub genes: usize,
    /// Inclusive upper bound for seeded gene values.
    pub initial_gene_max: u16,
    /// Length of every chain segment.
    pub step_length: f64,
    /// Multiplier applied to the turn penalty.
    pub rotation_weight: u64,
    /// Where every chain starts.
    pub start: Point,
    /// Where chains should end.
    pub target: Point,
    /// Random seed for reproducibility.
    pub random_seed: Option<u64>,
    /// Frame rendering and video settings.
    pub render: RenderConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            population_size: 400,
            decimation: 60,
            crossover_children: 40,
            mutated_children: 300,
            mutation_severity: 4,
            max_generations: 50,
            genes: 25,
            initial_gene_max: 3600,
            step_length: 101.0,
            rotation_weight: 100,
            start: Point::new(100.0, 100.0),
            target: Point::new(1900.0, 1900.0),
            random_seed: None,
            render: RenderConfig::default(),
        }
    }
}

impl RunConfig {
    /// Fitness landscape described by this configuration.
    pub fn landscape(&self) -> Landscape {
        Landscape {
            start: self.start,
            target: self.target,
            step_length: self.step_length,
            rotation_weight: self.rotation_weight,
        }
    }

    /// Children bred per generation.
    #[inline]
    pub fn children_per_generation(&self) -> usize {
        self.crossover_children + self.mutated_children
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.genes == 0 {
            return Err(ConfigError::NoGenes);
        }
        if self.decimation == 0 {
            return Err(ConfigError::NoSurvivors);
        }
        let total = self.decimation + self.children_per_generation();
        if total != self.population_size {
            return Err(ConfigError::QuotaMismatch {
                population: self.population_size,
                survivors: self.decimation,
                crossover: self.crossover_children,
                mutated: self.mutated_children,
            });
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if !(self.step_length.is_finite() && self.step_length > 0.0) {
            return Err(ConfigError::InvalidStepLength(self.step_length));
        }
        if self.initial_gene_max > MAX_GENE_VALUE {
            return Err(ConfigError::GeneRangeTooWide(self.initial_gene_max));
        }
        if !self.start.is_finite() || !self.target.is_finite() {
            return Err(ConfigError::NonFiniteAnchor);
        }
        self.render.validate()
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("frames")
}

fn default_enabled() -> bool {
    true
}

/// Frame and video output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Write a frame per generation.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Directory receiving frames, the run summary and the video.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Side length of the square canvas in pixels.
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,
    /// Half the side length of the start/target markers.
    #[serde(default = "default_marker_half_size")]
    pub marker_half_size: u32,
    /// Top-left corner of the generation label.
    #[serde(default = "default_label_position")]
    pub label_position: (i32, i32),
    /// Video frame rate.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

fn default_canvas_size() -> u32 {
    2000
}
fn default_marker_half_size() -> u32 {
    25
}
fn default_label_position() -> (i32, i32) {
    (1600, 50)
}
fn default_frame_rate() -> u32 {
    20
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            output_dir: default_output_dir(),
            canvas_size: default_canvas_size(),
            marker_half_size: default_marker_half_size(),
            label_position: default_label_position(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl RenderConfig {
    /// Validate render settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_size == 0 {
            return Err(ConfigError::InvalidCanvas);
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Gene count must be non-zero")]
    NoGenes,
    #[error("Decimation must keep at least one survivor")]
    NoSurvivors,
    #[error(
        "Population size {population} does not match {survivors} survivors + {crossover} crossover children + {mutated} mutated children"
    )]
    QuotaMismatch {
        population: usize,
        survivors: usize,
        crossover: usize,
        mutated: usize,
    },
    #[error("Generation count must be non-zero")]
    NoGenerations,
    #[error("Step length must be positive and finite, got {0}")]
    InvalidStepLength(f64),
    #[error("Initial gene max {0} exceeds the 12-bit gene range")]
    GeneRangeTooWide(u16),
    #[error("Start and target coordinates must be finite")]
    NonFiniteAnchor,
    #[error("Canvas size must be non-zero")]
    InvalidCanvas,
    #[error("Frame rate must be non-zero")]
    InvalidFrameRate,
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RunConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}
