// Copyright (c) 2026 rezky_nightky

//! Maps scene colors onto what the terminal can show.

use crossterm::style::Color;

use crate::color::Rgb;
use crate::runtime::ColorMode;

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

const ANSI16: [(Color, Rgb); 16] = [
    (Color::Black, Rgb::new(0, 0, 0)),
    (Color::DarkGrey, Rgb::new(128, 128, 128)),
    (Color::Grey, Rgb::new(192, 192, 192)),
    (Color::White, Rgb::new(255, 255, 255)),
    (Color::DarkRed, Rgb::new(128, 0, 0)),
    (Color::Red, Rgb::new(255, 0, 0)),
    (Color::DarkGreen, Rgb::new(0, 128, 0)),
    (Color::Green, Rgb::new(0, 255, 0)),
    (Color::DarkBlue, Rgb::new(0, 0, 128)),
    (Color::Blue, Rgb::new(0, 0, 255)),
    (Color::DarkCyan, Rgb::new(0, 128, 128)),
    (Color::Cyan, Rgb::new(0, 255, 255)),
    (Color::DarkMagenta, Rgb::new(128, 0, 128)),
    (Color::Magenta, Rgb::new(255, 0, 255)),
    (Color::DarkYellow, Rgb::new(128, 128, 0)),
    (Color::Yellow, Rgb::new(255, 255, 0)),
];

fn dist2(a: Rgb, b: Rgb) -> i32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    dr * dr + dg * dg + db * db
}

/// Closest entry of the xterm 256-color cube or gray ramp.
pub fn rgb_to_ansi256(c: Rgb) -> u8 {
    let level = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (level(c.r), level(c.g), level(c.b));
    let cube = Rgb::new(
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((c.r as u16 + c.g as u16 + c.b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, Rgb::new(0, 0, 0)),
        239..=255 => (231, Rgb::new(255, 255, 255)),
        _ => {
            let step = (avg - 8) / 10;
            let v = 8 + 10 * step;
            (232 + step, Rgb::new(v, v, v))
        }
    };

    if dist2(c, gray) < dist2(c, cube) {
        gray_idx
    } else {
        cube_idx
    }
}

pub fn rgb_to_color16(c: Rgb) -> Color {
    ANSI16
        .iter()
        .min_by_key(|(_, rgb)| dist2(c, *rgb))
        .map(|(color, _)| *color)
        .unwrap_or(Color::White)
}

pub fn quantize(c: Rgb, mode: ColorMode) -> Color {
    match mode {
        ColorMode::TrueColor => Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        },
        ColorMode::Color256 => Color::AnsiValue(rgb_to_ansi256(c)),
        ColorMode::Color16 => rgb_to_color16(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truecolor_passes_through() {
        assert_eq!(
            quantize(Rgb::new(1, 2, 3), ColorMode::TrueColor),
            Color::Rgb { r: 1, g: 2, b: 3 }
        );
    }

    #[test]
    fn ansi256_hits_cube_corners_and_grays() {
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 0, 0)), 196);
        assert_eq!(rgb_to_ansi256(Rgb::new(0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 255, 255)), 231);
        assert_eq!(rgb_to_ansi256(Rgb::new(128, 128, 128)), 244);
    }

    #[test]
    fn color16_picks_nearest() {
        assert_eq!(rgb_to_color16(Rgb::new(250, 250, 10)), Color::Yellow);
        assert_eq!(rgb_to_color16(Rgb::new(10, 15, 35)), Color::Black);
        assert_eq!(rgb_to_color16(Rgb::new(20, 120, 20)), Color::DarkGreen);
    }
}
