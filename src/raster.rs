// Copyright (c) 2026 rezky_nightky

//! Software rasterizer behind the terminal host.
//!
//! The scene draws in logical pixels; each canvas pixel covers
//! `scale x scale` of them. Shapes are sampled at pixel centers.

use std::f32::consts::PI;
use std::ops::Range;

use crate::cell::Cell;
use crate::color::{Rgb, Rgba};
use crate::frame::Frame;
use crate::palette::quantize;
use crate::runtime::ColorMode;
use crate::surface::{Paint, Point, Rect, Surface, Viewport};

#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    scale: f32,
    pixels: Vec<[f32; 3]>,
}

impl Canvas {
    /// A canvas for a `cols x rows` terminal: two pixels per cell vertically.
    pub fn for_terminal(cols: u16, rows: u16, scale: f32) -> Self {
        Self::new(cols as usize, rows as usize * 2, scale)
    }

    pub fn new(width: usize, height: usize, scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            width,
            height,
            scale,
            pixels: vec![[0.0; 3]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, c: Rgb) {
        self.pixels.fill([c.r as f32, c.g as f32, c.b as f32]);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b] = self.pixels[y * self.width + x];
        let ch = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Some(Rgb::new(ch(r), ch(g), ch(b)))
    }

    /// Copies the canvas into `frame` as upper-half-block cells.
    pub fn present(&self, frame: &mut Frame, mode: ColorMode) {
        let black = Rgb::new(0, 0, 0);
        for row in 0..frame.height {
            for col in 0..frame.width {
                let (x, y) = (col as usize, row as usize * 2);
                let top = self.pixel(x, y).unwrap_or(black);
                let bottom = self.pixel(x, y + 1).unwrap_or(black);
                let cell = Cell::half_block(quantize(top, mode), quantize(bottom, mode));
                frame.set(col, row, cell);
            }
        }
    }

    fn center(&self, px: usize, py: usize) -> (f32, f32) {
        (
            (px as f32 + 0.5) * self.scale,
            (py as f32 + 0.5) * self.scale,
        )
    }

    /// Pixels whose centers fall in the logical interval `[lo, hi)`.
    fn span(&self, lo: f32, hi: f32, limit: usize) -> Range<usize> {
        if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
            return 0..0;
        }
        let first = (lo / self.scale - 0.5).ceil().max(0.0);
        let end = (hi / self.scale - 0.5).ceil().max(0.0);
        let first = (first as usize).min(limit);
        let end = (end as usize).min(limit);
        first..end
    }

    fn blend(&mut self, px: usize, py: usize, c: Rgba, coverage: f32) {
        let a = (c.a * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[py * self.width + px];
        let src = [c.r as f32, c.g as f32, c.b as f32];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s * a + *d * (1.0 - a);
        }
    }
}

/// Even-odd rule.
fn contains(points: &[Point], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > y) != (b.y > y) {
            let cross = (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x;
            if x < cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

impl Surface for Canvas {
    fn viewport(&self) -> Viewport {
        Viewport::new(
            self.width as f32 * self.scale,
            self.height as f32 * self.scale,
        )
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let (x0, x1) = (rect.x.min(rect.x + rect.w), rect.x.max(rect.x + rect.w));
        let (y0, y1) = (rect.y.min(rect.y + rect.h), rect.y.max(rect.y + rect.h));
        for py in self.span(y0, y1, self.height) {
            for px in self.span(x0, x1, self.width) {
                let (cx, cy) = self.center(px, py);
                self.blend(px, py, paint.sample(cx, cy), 1.0);
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let (mut x0, mut y0) = (f32::INFINITY, f32::INFINITY);
        let (mut x1, mut y1) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in points {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        for py in self.span(y0, y1, self.height) {
            for px in self.span(x0, x1, self.width) {
                let (cx, cy) = self.center(px, py);
                if contains(points, cx, cy) {
                    self.blend(px, py, paint.sample(cx, cy), 1.0);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        if radius.is_nan() || radius <= 0.0 || !center.x.is_finite() || !center.y.is_finite() {
            return;
        }

        // Smaller than a pixel: fold the whole disk into the pixel under it.
        if radius < self.scale * 0.5 {
            if center.x < 0.0 || center.y < 0.0 {
                return;
            }
            let px = (center.x / self.scale) as usize;
            let py = (center.y / self.scale) as usize;
            if px < self.width && py < self.height {
                let coverage = PI * radius * radius / (self.scale * self.scale);
                self.blend(px, py, paint.sample(center.x, center.y), coverage);
            }
            return;
        }

        let r2 = radius * radius;
        for py in self.span(center.y - radius, center.y + radius, self.height) {
            for px in self.span(center.x - radius, center.x + radius, self.width) {
                let (cx, cy) = self.center(px, py);
                let (dx, dy) = (cx - center.x, cy - center.y);
                if dx * dx + dy * dy <= r2 {
                    self.blend(px, py, paint.sample(cx, cy), 1.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(r: u8, g: u8, b: u8) -> Paint {
        Paint::Solid(Rgba::opaque(r, g, b))
    }

    #[test]
    fn viewport_is_logical_size() {
        let c = Canvas::for_terminal(80, 24, 8.0);
        assert_eq!((c.width(), c.height()), (80, 48));
        assert_eq!(c.viewport(), Viewport::new(640.0, 384.0));
    }

    #[test]
    fn rect_covers_pixels_by_center() {
        let mut c = Canvas::new(4, 4, 10.0);
        c.fill_rect(Rect::new(10.0, 0.0, 20.0, 40.0), &solid(255, 0, 0));
        assert_eq!(c.pixel(0, 0), Some(Rgb::new(0, 0, 0)));
        assert_eq!(c.pixel(1, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(c.pixel(2, 3), Some(Rgb::new(255, 0, 0)));
        assert_eq!(c.pixel(3, 0), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn later_fills_cover_earlier_ones() {
        let mut c = Canvas::new(2, 2, 1.0);
        c.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &solid(0, 0, 255));
        c.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &solid(0, 255, 0));
        assert_eq!(c.pixel(0, 0), Some(Rgb::new(0, 255, 0)));
        assert_eq!(c.pixel(1, 1), Some(Rgb::new(0, 0, 255)));
    }

    #[test]
    fn translucent_paint_blends() {
        let mut c = Canvas::new(1, 1, 1.0);
        c.clear(Rgb::new(0, 0, 0));
        c.fill_rect(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            &Paint::Solid(Rgba::new(200, 100, 0, 0.5)),
        );
        assert_eq!(c.pixel(0, 0), Some(Rgb::new(100, 50, 0)));
    }

    #[test]
    fn triangle_fills_its_inside_only() {
        let mut c = Canvas::new(10, 10, 1.0);
        let tri = [
            Point::new(5.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
        ];
        c.fill_polygon(&tri, &solid(0, 255, 0));
        assert_eq!(c.pixel(5, 8), Some(Rgb::new(0, 255, 0)));
        assert_eq!(c.pixel(0, 0), Some(Rgb::new(0, 0, 0)));
        assert_eq!(c.pixel(9, 1), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn tiny_circle_leaves_a_faint_mark() {
        let mut c = Canvas::new(4, 4, 8.0);
        c.fill_circle(Point::new(12.0, 12.0), 2.0, &solid(255, 255, 255));
        let p = c.pixel(1, 1).unwrap();
        assert!(p.r > 0 && p.r < 255, "r = {}", p.r);
        assert_eq!(c.pixel(0, 0), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn shapes_off_canvas_are_ignored() {
        let mut c = Canvas::new(4, 4, 1.0);
        c.fill_rect(Rect::new(-50.0, -50.0, 10.0, 10.0), &solid(255, 0, 0));
        c.fill_circle(Point::new(100.0, 100.0), 5.0, &solid(255, 0, 0));
        c.fill_circle(Point::new(-1.0, -1.0), 0.1, &solid(255, 0, 0));
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(c.pixel(x, y), Some(Rgb::new(0, 0, 0)));
            }
        }
    }

    #[test]
    fn present_packs_two_pixels_per_cell() {
        let mut c = Canvas::for_terminal(1, 1, 1.0);
        c.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &solid(255, 0, 0));
        c.fill_rect(Rect::new(0.0, 1.0, 1.0, 1.0), &solid(0, 0, 255));
        let mut frame = Frame::new(1, 1);
        c.present(&mut frame, ColorMode::TrueColor);
        let cell = frame.cell_at_index(0);
        assert_eq!(cell.ch, crate::cell::UPPER_HALF);
        assert_eq!(
            cell.fg,
            Some(crossterm::style::Color::Rgb { r: 255, g: 0, b: 0 })
        );
        assert_eq!(
            cell.bg,
            Some(crossterm::style::Color::Rgb { r: 0, g: 0, b: 255 })
        );
    }
}
