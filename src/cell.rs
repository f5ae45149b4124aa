// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

/// Upper half block: the foreground paints the top pixel of a cell, the
/// background the bottom one.
pub const UPPER_HALF: char = '\u{2580}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Cell {
    pub fn blank() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
        }
    }

    pub fn half_block(top: Color, bottom: Color) -> Self {
        Self {
            ch: UPPER_HALF,
            fg: Some(top),
            bg: Some(bottom),
        }
    }
}
