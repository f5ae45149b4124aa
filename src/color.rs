// Copyright (c) 2026 rezky_nightky

//! Day-to-night color ramps for the sky and the ground.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

/// Straight (non-premultiplied) color with an opacity in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[allow(dead_code)]
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    #[allow(dead_code)]
    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Component-wise blend towards `other`; `t` is clamped to `0..=1`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let ch = |a: u8, b: u8| {
            let a = a as f32;
            let b = b as f32;
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkyColors {
    pub top: Rgb,
    pub mid: Rgb,
    pub bottom: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroundColors {
    pub top: Rgb,
    pub bottom: Rgb,
}

pub const DAY_SKY: SkyColors = SkyColors {
    top: Rgb::new(135, 206, 235),
    mid: Rgb::new(255, 179, 71),
    bottom: Rgb::new(255, 94, 77),
};

/// Where the sunset ramp heads. Never rendered as-is: at full progress the
/// scene switches to [`NIGHT_SKY`].
pub const DUSK_SKY: SkyColors = SkyColors {
    top: Rgb::new(20, 24, 60),
    mid: Rgb::new(139, 69, 19),
    bottom: Rgb::new(15, 15, 25),
};

pub const NIGHT_SKY: SkyColors = SkyColors {
    top: Rgb::new(10, 15, 35),
    mid: Rgb::new(15, 20, 40),
    bottom: Rgb::new(5, 10, 20),
};

pub const DAY_GROUND: GroundColors = GroundColors {
    top: Rgb::new(34, 139, 34),
    bottom: Rgb::new(20, 80, 20),
};

pub const DUSK_GROUND: GroundColors = GroundColors {
    top: Rgb::new(10, 40, 10),
    bottom: Rgb::new(5, 20, 5),
};

pub const NIGHT_GROUND: GroundColors = GroundColors {
    top: Rgb::new(5, 20, 5),
    bottom: Rgb::new(2, 10, 2),
};

/// Offset of the middle sky stop while the sun is going down.
pub const SKY_MID_STOP_SUNSET: f32 = 0.4;
/// Offset of the middle sky stop once it is night.
pub const SKY_MID_STOP_NIGHT: f32 = 0.5;

fn lerp_floor(day: u8, dusk: u8, t: f64) -> u8 {
    let day = day as f64;
    let dusk = dusk as f64;
    (day + (dusk - day) * t).floor().clamp(0.0, 255.0) as u8
}

fn lerp_rgb(day: Rgb, dusk: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp_floor(day.r, dusk.r, t),
        lerp_floor(day.g, dusk.g, t),
        lerp_floor(day.b, dusk.b, t),
    )
}

fn sanitize(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.max(0.0)
    }
}

pub fn is_night(progress: f64) -> bool {
    sanitize(progress) >= 1.0
}

pub fn sky_color(progress: f64) -> SkyColors {
    let t = sanitize(progress);
    if t >= 1.0 {
        return NIGHT_SKY;
    }
    SkyColors {
        top: lerp_rgb(DAY_SKY.top, DUSK_SKY.top, t),
        mid: lerp_rgb(DAY_SKY.mid, DUSK_SKY.mid, t),
        bottom: lerp_rgb(DAY_SKY.bottom, DUSK_SKY.bottom, t),
    }
}

pub fn ground_color(progress: f64) -> GroundColors {
    let t = sanitize(progress);
    if t >= 1.0 {
        return NIGHT_GROUND;
    }
    GroundColors {
        top: lerp_rgb(DAY_GROUND.top, DUSK_GROUND.top, t),
        bottom: lerp_rgb(DAY_GROUND.bottom, DUSK_GROUND.bottom, t),
    }
}
