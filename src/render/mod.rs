//! Frame rendering and video assembly for evolution runs.
//!
//! The evolution engine only knows the [`FrameSink`] trait. This module
//! provides the PNG implementation used by the binary and an `ffmpeg`-backed
//! [`VideoEncoder`].
//!
//! # Frame Layout
//!
//! ```text
//! Canvas: canvas_size x canvas_size, white
//!   every organism, back to front in fitness order   #dddddd
//!   best organism                                    #ff0000
//!   start and target markers (2 * half_size square)  #000000
//!   "GENERATION <n>" label at label_position         #000000
//!
//! File: <output_dir>/frame-<generation, 3 digits>.png
//! ```

mod canvas;
mod font;
mod recorder;
mod video;

use std::io;
use std::path::PathBuf;

use crate::compute::evolution::{Landscape, Organism};

pub use canvas::{BACKGROUND, BEST_COLOR, Canvas, INK, POPULATION_COLOR};
pub use recorder::{FRAME_PREFIX, FrameRecorder};
pub use video::{FfmpegEncoder, VideoEncoder, VideoError, video_path};

/// Receives each generation, in order, as it is completed.
pub trait FrameSink {
    /// Render `generation`. `population` is sorted best first.
    ///
    /// Returns the path written, if any.
    fn record(
        &mut self,
        generation: usize,
        population: &[Organism],
        landscape: &Landscape,
    ) -> Result<Option<PathBuf>, RenderError>;
}

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn record(
        &mut self,
        _generation: usize,
        _population: &[Organism],
        _landscape: &Landscape,
    ) -> Result<Option<PathBuf>, RenderError> {
        Ok(None)
    }
}

/// Frame rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("I/O error at {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to encode frame {}: {}", .path.display(), .source)]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
