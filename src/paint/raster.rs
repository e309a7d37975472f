// RGBA8 pixel buffer backing the paint canvas, plus the shape rasterizers and
// whole-image transforms that operate on it.

use super::color::Color;
use crate::state::geometry::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// A raster filled with `fill`
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let pixels = width as usize * height as usize;
        let data = fill.to_array().repeat(pixels);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let i = self.offset(x as u32, y as u32);
        Some(Color::from_slice(&self.data[i..i + 4]))
    }

    /// Set a pixel; out-of-bounds writes are clipped
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = self.offset(x as u32, y as u32);
        self.data[i..i + 4].copy_from_slice(&color.to_array());
    }

    pub fn fill(&mut self, color: Color) {
        let px = color.to_array();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Stamp a round brush of diameter `width` centred on (cx, cy)
    pub fn stamp(&mut self, cx: i32, cy: i32, width: u32, color: Color) {
        if width <= 1 {
            self.set_pixel(cx, cy, color);
            return;
        }
        let radius = width as f64 / 2.0;
        let reach = radius.ceil() as i32;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if ((dx * dx + dy * dy) as f64) <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Line with round caps and joins: a brush stamp at every Bresenham step
    pub fn draw_line(&mut self, from: Position, to: Position, width: u32, color: Color) {
        let (mut x, mut y) = (from.x, from.y);
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x, y, width, color);
            if x == to.x && y == to.y {
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

    /// Rectangle outline spanning two opposite corners
    pub fn stroke_rect(&mut self, a: Position, b: Position, width: u32, color: Color) {
        let top_right = Position::new(b.x, a.y);
        let bottom_left = Position::new(a.x, b.y);
        self.draw_line(a, top_right, width, color);
        self.draw_line(top_right, b, width, color);
        self.draw_line(b, bottom_left, width, color);
        self.draw_line(bottom_left, a, width, color);
    }

    /// Ellipse outline inscribed in the box spanned by two opposite corners
    pub fn stroke_ellipse(&mut self, a: Position, b: Position, width: u32, color: Color) {
        let cx = (a.x + b.x) as f64 / 2.0;
        let cy = (a.y + b.y) as f64 / 2.0;
        let rx = (b.x - a.x).abs() as f64 / 2.0;
        let ry = (b.y - a.y).abs() as f64 / 2.0;

        if rx < 0.5 || ry < 0.5 {
            // Degenerate box collapses to a straight stroke
            self.draw_line(a, b, width, color);
            return;
        }

        let steps = ((std::f64::consts::TAU * rx.max(ry)).ceil() as usize).max(16);
        let point_at = |i: usize| {
            let t = std::f64::consts::TAU * i as f64 / steps as f64;
            Position::new(
                (cx + rx * t.cos()).round() as i32,
                (cy + ry * t.sin()).round() as i32,
            )
        };

        let mut prev = point_at(0);
        for i in 1..=steps {
            let next = point_at(i);
            self.draw_line(prev, next, width, color);
            prev = next;
        }
    }

    /// Copy of this raster at a new size: white background, old pixels kept at
    /// the top-left origin without scaling
    pub fn resized(&self, width: u32, height: u32) -> Raster {
        let mut out = Raster::new(width, height, Color::WHITE);
        let copy_w = self.width.min(width) as usize * 4;
        for y in 0..self.height.min(height) {
            let src = self.offset(0, y);
            let dst = out.offset(0, y);
            out.data[dst..dst + copy_w].copy_from_slice(&self.data[src..src + copy_w]);
        }
        out
    }

    /// Build a same-sized raster where each pixel is pulled from `source(x, y)`;
    /// a None source pixel becomes white
    fn remap(&self, source: impl Fn(i32, i32) -> Option<(i32, i32)>) -> Raster {
        let mut out = Raster::new(self.width, self.height, Color::WHITE);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if let Some(color) = source(x, y).and_then(|(sx, sy)| self.pixel(sx, sy)) {
                    out.set_pixel(x, y, color);
                }
            }
        }
        out
    }

    pub fn flip_horizontal(&mut self) {
        let w = self.width as i32;
        *self = self.remap(|x, y| Some((w - 1 - x, y)));
    }

    pub fn flip_vertical(&mut self) {
        let h = self.height as i32;
        *self = self.remap(|x, y| Some((x, h - 1 - y)));
    }

    /// Rotate a quarter turn clockwise about the centre, keeping the raster's
    /// dimensions. Areas uncovered by the rotated image turn white.
    pub fn rotate_90_cw(&mut self) {
        let cx = self.width as f64 / 2.0;
        let cy = self.height as f64 / 2.0;
        *self = self.remap(|x, y| {
            let rel_x = x as f64 + 0.5 - cx;
            let rel_y = y as f64 + 0.5 - cy;
            Some(((cx + rel_y).floor() as i32, (cy - rel_x).floor() as i32))
        });
    }

    pub fn rotate_180(&mut self) {
        let (w, h) = (self.width as i32, self.height as i32);
        *self = self.remap(|x, y| Some((w - 1 - x, h - 1 - y)));
    }

    /// Invert RGB, keep alpha
    pub fn invert(&mut self) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = 255 - px[0];
            px[1] = 255 - px[1];
            px[2] = 255 - px[2];
        }
    }
}
