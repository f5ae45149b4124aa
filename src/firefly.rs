// Copyright (c) 2026 rezky_nightky

//! Firefly particles and the swarm that grows them.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::clock::progress;
use crate::color::Rgba;
use crate::surface::{ColorStop, Paint, Point, RadialGradient, Surface, Viewport};

/// Hard upper bound on the swarm size.
pub const MAX_FIREFLIES: usize = 200;
pub const MAX_SPEED: f32 = 1.0;
/// Chance per active update that a firefly changes course.
pub const WANDER_CHANCE: f64 = 0.02;
/// Largest per-axis velocity nudge when a firefly changes course.
pub const WANDER_STEP: f32 = 0.05;
/// Upper bound (exclusive) of the per-particle dormancy, in milliseconds.
pub const MAX_SPAWN_DELAY_MS: f32 = 2000.0;
/// Population curve exponent; below 1 the swarm fills in fast, then slowly.
pub const GROWTH_EXPONENT: f32 = 0.7;
/// Glow radius in multiples of the core size.
pub const GLOW_SCALE: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FireflyState {
    Dormant,
    Active,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Firefly {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub brightness: f32,
    pub max_brightness: f32,
    pub phase: f32,
    pub frequency: f32,
    pub size: f32,
    /// Milliseconds.
    pub spawn_delay: f32,
    /// Milliseconds.
    pub age: f32,
}

impl Firefly {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, x: f32, y: f32, spawn_delay: f32) -> Self {
        Self {
            x,
            y,
            vx: rng.random_range(-0.25..0.25),
            vy: rng.random_range(-0.25..0.25),
            brightness: 0.0,
            max_brightness: rng.random_range(0.5..1.0),
            phase: rng.random_range(0.0..TAU),
            frequency: rng.random_range(0.01..0.03),
            size: rng.random_range(1.5..3.5),
            spawn_delay,
            age: 0.0,
        }
    }

    pub fn state(&self) -> FireflyState {
        if self.age < self.spawn_delay {
            FireflyState::Dormant
        } else {
            FireflyState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == FireflyState::Active
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

pub fn brightness_at(phase: f32, max_brightness: f32) -> f32 {
    (phase.sin() * 0.5 + 0.5) * max_brightness
}

fn wrap(v: f32, extent: f32) -> f32 {
    let w = v.rem_euclid(extent);
    // rem_euclid can round up to exactly `extent` for tiny negatives
    if w >= extent {
        0.0
    } else {
        w
    }
}

/// Advances one firefly by one frame. `delta_ms` only ages it; motion and
/// blinking step once per active call.
pub fn update_firefly<R: Rng + ?Sized>(
    f: &mut Firefly,
    delta_ms: f32,
    viewport: Viewport,
    rng: &mut R,
) {
    f.age += delta_ms.max(0.0);
    if !f.is_active() {
        return;
    }

    f.x += f.vx;
    f.y += f.vy;

    if rng.random_bool(WANDER_CHANCE) {
        f.vx += rng.random_range(-WANDER_STEP..WANDER_STEP);
        f.vy += rng.random_range(-WANDER_STEP..WANDER_STEP);
    }

    let speed = f.speed();
    if speed > MAX_SPEED {
        f.vx = f.vx / speed * MAX_SPEED;
        f.vy = f.vy / speed * MAX_SPEED;
    }

    f.x = wrap(f.x, viewport.width());
    f.y = wrap(f.y, viewport.height());

    // kept in one turn so f32 steps stay finer than the frequency
    f.phase = (f.phase + f.frequency).rem_euclid(TAU);
    f.brightness = brightness_at(f.phase, f.max_brightness);
}

pub fn draw_firefly<S: Surface + ?Sized>(f: &Firefly, surface: &mut S) {
    if !f.is_active() {
        return;
    }

    let i = f.brightness;
    let center = Point::new(f.x, f.y);
    let glow_radius = f.size * GLOW_SCALE;

    let glow = Paint::Radial(RadialGradient {
        center,
        inner_radius: 0.0,
        outer_radius: glow_radius,
        stops: vec![
            ColorStop::new(0.0, Rgba::new(255, 255, 150, i * 0.9)),
            ColorStop::new(0.2, Rgba::new(255, 255, 100, i * 0.5)),
            ColorStop::new(0.5, Rgba::new(200, 255, 100, i * 0.2)),
            ColorStop::new(1.0, Rgba::new(150, 255, 100, 0.0)),
        ],
    });
    surface.fill_circle(center, glow_radius, &glow);
    surface.fill_circle(center, f.size, &Paint::Solid(Rgba::new(255, 255, 200, i)));
}

/// Vertical spawn band as fractions of the viewport height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnBand {
    pub low: f32,
    pub high: f32,
}

impl Default for SpawnBand {
    fn default() -> Self {
        Self {
            low: 0.3,
            high: 0.8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwarmConfig {
    pub max_fireflies: usize,
    pub buildup: Duration,
    pub spawn_band: SpawnBand,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            max_fireflies: MAX_FIREFLIES,
            buildup: Duration::from_millis(20_000),
            spawn_band: SpawnBand::default(),
        }
    }
}

/// Population size the swarm is heading for at `buildup_progress`.
pub fn target_count(max_fireflies: usize, buildup_progress: f32) -> usize {
    let p = buildup_progress.clamp(0.0, 1.0);
    let n = (max_fireflies as f32 * p.powf(GROWTH_EXPONENT)).floor() as usize;
    n.min(max_fireflies)
}

/// Every firefly ever spawned, in spawn order. The swarm only grows.
pub struct FireflySwarm {
    config: SwarmConfig,
    fireflies: Vec<Firefly>,
    rng: StdRng,
    full_logged: bool,
}

impl FireflySwarm {
    pub fn new(mut config: SwarmConfig, seed: u64) -> Self {
        config.max_fireflies = config.max_fireflies.min(MAX_FIREFLIES);
        Self {
            fireflies: Vec::with_capacity(config.max_fireflies),
            config,
            rng: StdRng::seed_from_u64(seed),
            full_logged: false,
        }
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    #[allow(dead_code)]
    pub fn fireflies(&self) -> &[Firefly] {
        &self.fireflies
    }

    pub fn len(&self) -> usize {
        self.fireflies.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.fireflies.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.fireflies.iter().filter(|f| f.is_active()).count()
    }

    /// Grows the population toward its target for `since_start`, then
    /// updates and draws every firefly in spawn order.
    pub fn update<S: Surface + ?Sized>(
        &mut self,
        since_start: Duration,
        delta: Duration,
        viewport: Viewport,
        surface: &mut S,
    ) {
        if since_start.is_zero() {
            return;
        }

        let buildup_progress = progress(since_start, self.config.buildup) as f32;
        let target = target_count(self.config.max_fireflies, buildup_progress);
        self.grow_to(target, viewport);

        let delta_ms = delta.as_secs_f32() * 1000.0;
        for f in &mut self.fireflies {
            update_firefly(f, delta_ms, viewport, &mut self.rng);
            draw_firefly(f, surface);
        }
    }

    fn grow_to(&mut self, target: usize, viewport: Viewport) {
        let before = self.fireflies.len();
        if before >= target {
            return;
        }

        let band = self.config.spawn_band;
        let y_lo = viewport.height() * band.low;
        let y_hi = viewport.height() * band.high;
        while self.fireflies.len() < target {
            let x = self.rng.random_range(0.0..viewport.width());
            let y = if y_hi > y_lo {
                self.rng.random_range(y_lo..y_hi)
            } else {
                y_lo
            };
            let delay = self.rng.random_range(0.0..MAX_SPAWN_DELAY_MS);
            let f = Firefly::spawn(&mut self.rng, x, y, delay);
            self.fireflies.push(f);
        }

        log::debug!("spawned {} fireflies (now {})", target - before, target);
        if target == self.config.max_fireflies && !self.full_logged {
            self.full_logged = true;
            log::info!("firefly swarm complete at {} fireflies", target);
        }
    }
}
