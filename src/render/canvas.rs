//! Minimal raster canvas: clipped lines, filled rectangles and bitmap text.

use std::path::Path;

use image::{Rgb, RgbImage};

use super::RenderError;
use super::font::{GLYPH_HEIGHT, GLYPH_WIDTH, glyph};
use crate::compute::PixelPoint;

pub const BACKGROUND: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
pub const POPULATION_COLOR: Rgb<u8> = Rgb([0xdd, 0xdd, 0xdd]);
pub const BEST_COLOR: Rgb<u8> = Rgb([0xff, 0x00, 0x00]);
pub const INK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);

/// An RGB drawing surface. Anything outside the image is silently clipped.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Create a square canvas filled with `background`.
    pub fn new(size: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(size, size, background),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Color at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb<u8>> {
        let (x, y) = self.index(x, y)?;
        Some(*self.image.get_pixel(x, y))
    }

    fn index(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < self.image.width() && y < self.image.height()).then_some((x, y))
    }

    /// Set one pixel if it lies on the canvas.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if let Some((x, y)) = self.index(x, y) {
            self.image.put_pixel(x, y, color);
        }
    }

    /// Bresenham line, both endpoints included. The segment is clipped to
    /// the canvas first, so off-canvas lengths cost nothing.
    pub fn draw_line(&mut self, from: PixelPoint, to: PixelPoint, color: Rgb<u8>) {
        let Some(((mut x, mut y), (x1, y1))) = self.clip(from, to) else {
            return;
        };
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            // Clipped coordinates lie on the canvas
            self.put(x as i32, y as i32, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Liang-Barsky clip of `from..to` against the canvas bounds.
    fn clip(&self, from: PixelPoint, to: PixelPoint) -> Option<((i64, i64), (i64, i64))> {
        let max_x = f64::from(self.image.width().checked_sub(1)?);
        let max_y = f64::from(self.image.height().checked_sub(1)?);
        let (x0, y0) = (f64::from(from.x), f64::from(from.y));
        let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);

        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        for (p, q) in [(-dx, x0), (dx, max_x - x0), (-dy, y0), (dy, max_y - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let at = |t: f64| ((x0 + t * dx).round() as i64, (y0 + t * dy).round() as i64);
        Some((at(t0), at(t1)))
    }

    /// Connect consecutive points.
    pub fn draw_polyline(&mut self, points: &[PixelPoint], color: Rgb<u8>) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color);
        }
    }

    /// Fill the rectangle spanning `min..=max`.
    pub fn fill_rect(&mut self, min: PixelPoint, max: PixelPoint, color: Rgb<u8>) {
        let x0 = min.x.max(0);
        let y0 = min.y.max(0);
        let x1 = max.x.min(self.image.width().saturating_sub(1) as i32);
        let y1 = max.y.min(self.image.height().saturating_sub(1) as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put(x, y, color);
            }
        }
    }

    /// Draw `text` with its top-left corner at `origin`, each font pixel
    /// scaled to a `scale` x `scale` block. Unknown characters leave a gap.
    pub fn draw_text(&mut self, origin: PixelPoint, text: &str, scale: u32, color: Rgb<u8>) {
        let scale = scale.max(1) as i32;
        let advance = (GLYPH_WIDTH as i32 + 1) * scale;

        for (i, c) in text.chars().enumerate() {
            let Some(rows) = glyph(c) else { continue };
            let left = origin.x + i as i32 * advance;
            for (row, bits) in rows.iter().enumerate().take(GLYPH_HEIGHT) {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    let top_left = PixelPoint {
                        x: left + col as i32 * scale,
                        y: origin.y + row as i32 * scale,
                    };
                    let bottom_right = PixelPoint {
                        x: top_left.x + scale - 1,
                        y: top_left.y + scale - 1,
                    };
                    self.fill_rect(top_left, bottom_right, color);
                }
            }
        }
    }

    /// Encode to a file; the format follows the extension.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        self.image.save(path).map_err(|source| RenderError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}
