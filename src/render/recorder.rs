//! Frame recorder that writes one PNG per generation.

use std::fs;
use std::path::PathBuf;

use log::debug;

use super::canvas::{BACKGROUND, BEST_COLOR, Canvas, INK, POPULATION_COLOR};
use super::{FrameSink, RenderError};
use crate::compute::PixelPoint;
use crate::compute::evolution::{Landscape, Organism};
use crate::schema::RenderConfig;

/// File name prefix for frames.
pub const FRAME_PREFIX: &str = "frame-";

/// Label glyph scale; 7-row glyphs come out 28 pixels tall.
const LABEL_SCALE: u32 = 4;

/// Renders generations to `<output_dir>/frame-NNN.png`.
///
/// Usage:
/// ```ignore
/// let mut recorder = FrameRecorder::new(config.render.clone())?;
/// let result = engine.run(&mut recorder)?;
/// ```
pub struct FrameRecorder {
    config: RenderConfig,
    frames_written: u64,
}

impl FrameRecorder {
    /// Create a recorder, creating the output directory if needed.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        fs::create_dir_all(&config.output_dir).map_err(|source| RenderError::Io {
            path: config.output_dir.clone(),
            source,
        })?;

        Ok(Self {
            config,
            frames_written: 0,
        })
    }

    /// Path of the frame for `generation`.
    pub fn frame_path(&self, generation: usize) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{FRAME_PREFIX}{generation:03}.png"))
    }

    /// Draw one generation. `population` is sorted best first.
    pub fn render(
        &self,
        generation: usize,
        population: &[Organism],
        landscape: &Landscape,
    ) -> Canvas {
        let mut canvas = Canvas::new(self.config.canvas_size, BACKGROUND);

        for organism in population {
            canvas.draw_polyline(organism.drawing(), POPULATION_COLOR);
        }
        if let Some(best) = population.first() {
            canvas.draw_polyline(best.drawing(), BEST_COLOR);
        }

        let half = self.config.marker_half_size as i32;
        for anchor in [landscape.start, landscape.target] {
            let center = anchor.truncated();
            canvas.fill_rect(
                PixelPoint {
                    x: center.x - half,
                    y: center.y - half,
                },
                PixelPoint {
                    x: center.x + half,
                    y: center.y + half,
                },
                INK,
            );
        }

        let (x, y) = self.config.label_position;
        canvas.draw_text(
            PixelPoint { x, y },
            &format!("GENERATION {generation}"),
            LABEL_SCALE,
            INK,
        );

        canvas
    }

    /// Get number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl FrameSink for FrameRecorder {
    fn record(
        &mut self,
        generation: usize,
        population: &[Organism],
        landscape: &Landscape,
    ) -> Result<Option<PathBuf>, RenderError> {
        let path = self.frame_path(generation);
        self.render(generation, population, landscape).save(&path)?;
        self.frames_written += 1;
        debug!("Wrote {}", path.display());
        Ok(Some(path))
    }
}
