//! Drawing targets for the wave renderer.
//!
//! The renderer only needs three operations: size the surface, flood it
//! with the background, stroke an open polyline. [`DisplayList`] records
//! those calls for hosts that replay them (the terminal canvas), and
//! [`PixelSurface`] rasterises them into an RGB buffer.

use std::io::{self, Write};

use crate::color::{Rgb, Rgba};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D drawing target.
pub trait Surface {
    /// Match the surface to new viewport dimensions.
    fn resize(&mut self, width: f64, height: f64);

    /// Paint the whole surface with `color`.
    fn fill(&mut self, color: Rgb);

    /// Stroke an open path through `points`.
    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, line_width: f64);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn resize(&mut self, width: f64, height: f64) {
        (**self).resize(width, height);
    }

    fn fill(&mut self, color: Rgb) {
        (**self).fill(color);
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, line_width: f64) {
        (**self).stroke_polyline(points, color, line_width);
    }
}

// ---------------------------------------------------------------------------
// Display list
// ---------------------------------------------------------------------------

/// One stroked path from the last frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: Rgba,
    pub line_width: f64,
}

/// Records the most recent frame. `fill` starts a new frame.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    width: f64,
    height: f64,
    background: Option<Rgb>,
    strokes: Vec<Stroke>,
    resizes: usize,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn background(&self) -> Option<Rgb> {
        self.background
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// How many times the surface was resized.
    pub fn resize_count(&self) -> usize {
        self.resizes
    }
}

impl Surface for DisplayList {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.resizes += 1;
    }

    fn fill(&mut self, color: Rgb) {
        self.background = Some(color);
        self.strokes.clear();
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, line_width: f64) {
        self.strokes.push(Stroke {
            points: points.to_vec(),
            color,
            line_width,
        });
    }
}

// ---------------------------------------------------------------------------
// Pixel surface
// ---------------------------------------------------------------------------

/// RGB framebuffer with alpha-blended one-pixel line drawing.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = color.rgb.blend_over(self.pixels[idx], color.alpha);
    }

    /// DDA line; each pixel on the segment is blended once.
    fn draw_segment(&mut self, a: Point, b: Point, color: Rgba, skip_first: bool) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let steps = dx.abs().max(dy.abs()).round().max(1.0) as i64;
        let start = if skip_first { 1 } else { 0 };
        for i in start..=steps {
            let t = i as f64 / steps as f64;
            let x = (a.x + dx * t).round() as i64;
            let y = (a.y + dy * t).round() as i64;
            self.blend(x, y, color);
        }
    }

    /// Write the buffer as a binary PPM (P6).
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            bytes.extend_from_slice(&[p.r, p.g, p.b]);
        }
        out.write_all(&bytes)
    }
}

impl Surface for PixelSurface {
    fn resize(&mut self, width: f64, height: f64) {
        let w = width.max(0.0) as usize;
        let h = height.max(0.0) as usize;
        if w != self.width || h != self.height {
            *self = Self::new(w, h);
        }
    }

    fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, _line_width: f64) {
        for (i, pair) in points.windows(2).enumerate() {
            self.draw_segment(pair[0], pair[1], color, i > 0);
        }
    }
}
