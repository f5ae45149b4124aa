// Copyright (c) 2026 rezky_nightky

//! One running scene: clock, layout, fireflies and the per-frame driver.

use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::clock::{progress, SceneClock};
use crate::color::{
    ground_color, is_night, sky_color, Rgb, Rgba, SKY_MID_STOP_NIGHT, SKY_MID_STOP_SUNSET,
};
use crate::firefly::{FireflySwarm, SwarmConfig};
use crate::geometry::{generate_stars, generate_trees, Tree};
use crate::surface::{
    ColorStop, LinearGradient, Paint, Point, RadialGradient, Rect, Surface, Viewport,
};

pub const SUNSET_DURATION: Duration = Duration::from_millis(8_000);
pub const FIREFLY_START_DELAY: Duration = Duration::from_millis(9_000);
pub const FIREFLY_BUILDUP: Duration = Duration::from_millis(20_000);
pub const TREE_COUNT: usize = 80;
pub const STAR_COUNT: usize = 150;

/// Top of the ground as a share of the viewport height.
pub const HORIZON: f32 = 0.7;
pub const SUN_RADIUS: f32 = 60.0;
/// Extra drop below the horizon for the nearest trees.
const TREE_PARALLAX_DROP: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    pub sunset_duration: Duration,
    pub firefly_start_delay: Duration,
    pub tree_count: usize,
    pub star_count: usize,
    pub swarm: SwarmConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sunset_duration: SUNSET_DURATION,
            firefly_start_delay: FIREFLY_START_DELAY,
            tree_count: TREE_COUNT,
            star_count: STAR_COUNT,
            swarm: SwarmConfig {
                buildup: FIREFLY_BUILDUP,
                ..SwarmConfig::default()
            },
        }
    }
}

/// What one call to [`SceneSession::step`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub elapsed: Duration,
    pub delta: Duration,
    pub sunset_progress: f32,
    pub firefly_progress: f32,
    pub fireflies: usize,
    pub active_fireflies: usize,
}

pub struct SceneSession {
    config: SceneConfig,
    clock: SceneClock,
    trees: Vec<Tree>,
    swarm: FireflySwarm,
    night_logged: bool,
}

impl SceneSession {
    /// Lays out the forest for `viewport`. The same seed gives the same
    /// forest and the same firefly flights.
    pub fn new(config: SceneConfig, viewport: Viewport, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let trees = generate_trees(&mut rng, config.tree_count, viewport);
        let swarm = FireflySwarm::new(config.swarm, rng.random());

        log::info!(
            "scene start: {}x{} seed {} sunset {:?} fireflies after {:?} (max {}, buildup {:?})",
            viewport.width(),
            viewport.height(),
            seed,
            config.sunset_duration,
            config.firefly_start_delay,
            swarm.config().max_fireflies,
            config.swarm.buildup
        );

        Self {
            config,
            clock: SceneClock::new(),
            trees,
            swarm,
            night_logged: false,
        }
    }

    #[allow(dead_code)]
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    #[allow(dead_code)]
    pub fn swarm(&self) -> &FireflySwarm {
        &self.swarm
    }

    /// Runs one frame at `now` and paints it back to front. The caller
    /// decides when the next frame happens.
    pub fn step<S: Surface + ?Sized>(&mut self, now: Instant, surface: &mut S) -> FrameReport {
        let tick = self.clock.tick(now);
        let viewport = surface.viewport();
        let sunset = progress(tick.elapsed, self.config.sunset_duration);

        if is_night(sunset) && !self.night_logged {
            self.night_logged = true;
            log::info!("night has fallen after {:?}", tick.elapsed);
        }

        draw_sky(surface, viewport, sunset, self.config.star_count);
        draw_sun(surface, viewport, sunset);
        draw_ground(surface, viewport, sunset);
        draw_trees(surface, viewport, &self.trees, sunset);

        let mut firefly_progress = 0.0;
        if tick.elapsed > self.config.firefly_start_delay {
            let since = tick.elapsed - self.config.firefly_start_delay;
            firefly_progress = progress(since, self.config.swarm.buildup) as f32;
            self.swarm.update(since, tick.delta, viewport, surface);
        }

        FrameReport {
            elapsed: tick.elapsed,
            delta: tick.delta,
            sunset_progress: sunset as f32,
            firefly_progress,
            fireflies: self.swarm.len(),
            active_fireflies: self.swarm.active_count(),
        }
    }
}

fn stop(offset: f32, c: Rgb) -> ColorStop {
    ColorStop::new(offset, c.with_alpha(1.0))
}

pub fn draw_sky<S: Surface + ?Sized>(
    surface: &mut S,
    viewport: Viewport,
    sunset: f64,
    star_count: usize,
) {
    let (w, h) = (viewport.width(), viewport.height());
    let colors = sky_color(sunset);
    let mid = if is_night(sunset) {
        SKY_MID_STOP_NIGHT
    } else {
        SKY_MID_STOP_SUNSET
    };
    let paint = Paint::Linear(LinearGradient {
        from: Point::new(0.0, 0.0),
        to: Point::new(0.0, h),
        stops: vec![
            stop(0.0, colors.top),
            stop(mid, colors.mid),
            stop(1.0, colors.bottom),
        ],
    });
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), &paint);

    if sunset <= 0.5 {
        return;
    }
    let opacity = (((sunset - 0.5) * 2.0).min(1.0) * 0.8) as f32;
    let paint = Paint::Solid(Rgba::new(255, 255, 255, opacity));
    for star in generate_stars(star_count, viewport) {
        surface.fill_circle(Point::new(star.x, star.y), star.size * 1.5, &paint);
    }
}

/// Sinks and fades with progress; gone once it is night.
pub fn draw_sun<S: Surface + ?Sized>(surface: &mut S, viewport: Viewport, sunset: f64) {
    if is_night(sunset) {
        return;
    }
    let sunset = sunset.max(0.0) as f32;
    let center = Point::new(
        viewport.width() * 0.5,
        viewport.height() * (0.3 + sunset * 0.5),
    );
    let o = 1.0 - sunset;

    let glow = Paint::Radial(RadialGradient {
        center,
        inner_radius: SUN_RADIUS * 0.5,
        outer_radius: SUN_RADIUS * 3.0,
        stops: vec![
            ColorStop::new(0.0, Rgba::new(255, 220, 150, o * 0.6)),
            ColorStop::new(0.5, Rgba::new(255, 150, 100, o * 0.3)),
            ColorStop::new(1.0, Rgba::new(255, 100, 50, 0.0)),
        ],
    });
    surface.fill_circle(center, SUN_RADIUS * 3.0, &glow);

    let disk = Paint::Radial(RadialGradient {
        center,
        inner_radius: 0.0,
        outer_radius: SUN_RADIUS,
        stops: vec![
            ColorStop::new(0.0, Rgba::new(255, 240, 200, o)),
            ColorStop::new(1.0, Rgba::new(255, 150, 80, o * 0.8)),
        ],
    });
    surface.fill_circle(center, SUN_RADIUS, &disk);
}

pub fn draw_ground<S: Surface + ?Sized>(surface: &mut S, viewport: Viewport, sunset: f64) {
    let (w, h) = (viewport.width(), viewport.height());
    let colors = ground_color(sunset);
    let top = h * HORIZON;
    let paint = Paint::Linear(LinearGradient {
        from: Point::new(0.0, top),
        to: Point::new(0.0, h),
        stops: vec![stop(0.0, colors.top), stop(1.0, colors.bottom)],
    });
    surface.fill_rect(Rect::new(0.0, top, w, h - top), &paint);
}

/// Tree opacity: silhouettes firm up as the light goes.
pub fn tree_alpha(sunset: f64) -> f32 {
    if is_night(sunset) {
        1.0
    } else {
        0.3 + sunset.max(0.0) as f32 * 0.7
    }
}

/// Paints `trees` in slice order, so pass them farthest-first.
pub fn draw_trees<S: Surface + ?Sized>(
    surface: &mut S,
    viewport: Viewport,
    trees: &[Tree],
    sunset: f64,
) {
    let alpha = tree_alpha(sunset);
    let trunk = Paint::Solid(Rgba::new(40, 30, 20, alpha));
    let foliage = Paint::Solid(Rgba::new(20, 40, 20, alpha));
    let inner = Paint::Solid(Rgba::new(15, 30, 15, alpha * 0.8));

    for tree in trees {
        let base = viewport.height() * HORIZON + tree.depth * TREE_PARALLAX_DROP;
        let scale = 0.5 + tree.depth * 0.5;
        let th = tree.height * scale;
        let tw = tree.width * scale;
        let x = tree.x;

        surface.fill_rect(
            Rect::new(x - tw * 0.1, base - th * 0.3, tw * 0.2, th * 0.3),
            &trunk,
        );
        surface.fill_polygon(
            &[
                Point::new(x, base - th),
                Point::new(x - tw, base - th * 0.3),
                Point::new(x + tw, base - th * 0.3),
            ],
            &foliage,
        );
        surface.fill_polygon(
            &[
                Point::new(x, base - th * 0.6),
                Point::new(x - tw * 0.8, base - th * 0.1),
                Point::new(x + tw * 0.8, base - th * 0.1),
            ],
            &inner,
        );
    }
}
