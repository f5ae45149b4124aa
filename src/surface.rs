// Copyright (c) 2026 rezky_nightky

//! The drawing capability the scene paints into.
//!
//! Everything the scene knows about the host is on this page: the viewport
//! size and four filled primitives. Calls are order-significant; later fills
//! cover earlier ones.

use crate::color::Rgba;

/// Viewport size in logical pixels. Never smaller than 1x1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let norm = |v: f32| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
        let vp = Self {
            width: norm(width),
            height: norm(height),
        };
        if vp.width != width || vp.height != height {
            log::debug!(
                "viewport {}x{} normalized to {}x{}",
                width,
                height,
                vp.width,
                vp.height
            );
        }
        vp
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Color at `t` along ordered stops. Outside the stop range the end colors
/// extend.
pub fn sample_stops(stops: &[ColorStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::new(0, 0, 0, 0.0);
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= f32::EPSILON {
                return b.color;
            }
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub from: Point,
    pub to: Point,
    pub stops: Vec<ColorStop>,
}

/// Radial gradient between two concentric circles.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Paint {
    /// Color of this paint at logical position `(x, y)`.
    pub fn sample(&self, x: f32, y: f32) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear(g) => {
                let dx = g.to.x - g.from.x;
                let dy = g.to.y - g.from.y;
                let len2 = dx * dx + dy * dy;
                let t = if len2 <= f32::EPSILON {
                    0.0
                } else {
                    ((x - g.from.x) * dx + (y - g.from.y) * dy) / len2
                };
                sample_stops(&g.stops, t)
            }
            Paint::Radial(g) => {
                let d = ((x - g.center.x).powi(2) + (y - g.center.y).powi(2)).sqrt();
                let span = g.outer_radius - g.inner_radius;
                let t = if span <= f32::EPSILON {
                    if d <= g.inner_radius {
                        0.0
                    } else {
                        1.0
                    }
                } else {
                    (d - g.inner_radius) / span
                };
                sample_stops(&g.stops, t)
            }
        }
    }
}

pub trait Surface {
    fn viewport(&self) -> Viewport;
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);
    /// Fills a closed polygon; the last point connects back to the first.
    fn fill_polygon(&mut self, points: &[Point], paint: &Paint);
    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);
}

#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawCall {
        Rect(Rect, Paint),
        Polygon(Vec<Point>, Paint),
        Circle(Point, f32, Paint),
    }

    impl DrawCall {
        pub fn paint(&self) -> &Paint {
            match self {
                DrawCall::Rect(_, p) | DrawCall::Polygon(_, p) | DrawCall::Circle(_, _, p) => p,
            }
        }
    }

    /// Surface double that keeps every call in order.
    pub struct RecordingSurface {
        pub viewport: Viewport,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(width: f32, height: f32) -> Self {
            Self {
                viewport: Viewport::new(width, height),
                calls: Vec::new(),
            }
        }

        pub fn circles(&self) -> Vec<(Point, f32, &Paint)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::Circle(p, r, paint) => Some((*p, *r, paint)),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
            self.calls.push(DrawCall::Rect(rect, paint.clone()));
        }

        fn fill_polygon(&mut self, points: &[Point], paint: &Paint) {
            self.calls.push(DrawCall::Polygon(points.to_vec(), paint.clone()));
        }

        fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
            self.calls.push(DrawCall::Circle(center, radius, paint.clone()));
        }
    }
}
