//! Video assembly from rendered frames.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use log::{debug, info};

/// Errors from video encoding.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("Video encoder not found on PATH")]
    EncoderNotFound,
    #[error("No frames to encode")]
    NoFrames,
    #[error("Encoder exited with {status}: {stderr}")]
    EncoderFailed { status: ExitStatus, stderr: String },
    #[error("Video I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Turns an ordered frame list into a video file.
pub trait VideoEncoder {
    fn encode(&self, frames: &[PathBuf], frame_rate: u32, output: &Path)
    -> Result<(), VideoError>;
}

/// Video file for a run: `<output_dir>/<best_fitness>.mp4`.
pub fn video_path(output_dir: &Path, best_fitness: u64) -> PathBuf {
    output_dir.join(format!("{best_fitness}.mp4"))
}

/// Encodes through an external `ffmpeg` using its concat demuxer.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Concat demuxer script showing each frame for `1 / frame_rate` seconds.
    ///
    /// The last file is listed twice so its duration is honored.
    pub fn concat_list(frames: &[PathBuf], frame_rate: u32) -> String {
        let duration = 1.0 / f64::from(frame_rate.max(1));
        let mut list = String::from("ffconcat version 1.0\n");
        for frame in frames {
            let _ = writeln!(list, "file '{}'", escape(frame));
            let _ = writeln!(list, "duration {duration}");
        }
        if let Some(last) = frames.last() {
            let _ = writeln!(list, "file '{}'", escape(last));
        }
        list
    }
}

/// Quote for the concat script: `'` becomes `'\''`.
fn escape(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

impl VideoEncoder for FfmpegEncoder {
    fn encode(
        &self,
        frames: &[PathBuf],
        frame_rate: u32,
        output: &Path,
    ) -> Result<(), VideoError> {
        if frames.is_empty() {
            return Err(VideoError::NoFrames);
        }

        // Entries resolve against the script's own directory
        let frames = frames
            .iter()
            .map(std::path::absolute)
            .collect::<io::Result<Vec<_>>>()?;
        let list_path = output.with_extension("ffconcat");
        fs::write(&list_path, Self::concat_list(&frames, frame_rate))?;
        debug!("Wrote concat list {}", list_path.display());

        let result = Command::new(&self.program)
            .args(["-y", "-loglevel", "error", "-f", "concat", "-safe", "0", "-i"])
            .arg(&list_path)
            .arg("-r")
            .arg(frame_rate.to_string())
            .args(["-pix_fmt", "yuv420p"])
            .arg(output)
            .output();
        let _ = fs::remove_file(&list_path);

        let result = match result {
            Ok(result) => result,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(VideoError::EncoderNotFound);
            }
            Err(e) => return Err(e.into()),
        };
        if !result.status.success() {
            return Err(VideoError::EncoderFailed {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        info!("Encoded {} frames into {}", frames.len(), output.display());
        Ok(())
    }
}
