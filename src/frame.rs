// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;

/// Cell grid with change tracking, so the terminal only rewrites what moved.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::blank(); len],
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn has_changes(&self) -> bool {
        self.dirty_all || !self.dirty.is_empty()
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
        } else {
            for &i in &self.dirty {
                self.dirty_map[i] = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells.get(i).copied().unwrap_or_else(Cell::blank)
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::style::Color;

    use super::*;

    fn red() -> Cell {
        Cell::half_block(Color::Red, Color::Red)
    }

    #[test]
    fn new_frame_needs_a_full_redraw() {
        let mut f = Frame::new(3, 2);
        assert!(f.is_dirty_all());
        f.clear_dirty();
        assert!(!f.has_changes());
    }

    #[test]
    fn set_tracks_each_changed_cell_once() {
        let mut f = Frame::new(3, 2);
        f.clear_dirty();
        f.set(1, 1, red());
        f.set(1, 1, Cell::half_block(Color::Blue, Color::Red));
        f.set(0, 0, Cell::blank());
        assert_eq!(f.dirty_indices(), &[4]);
        assert_eq!(f.get(1, 1).unwrap().fg, Some(Color::Blue));
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut f = Frame::new(2, 2);
        f.clear_dirty();
        f.set(2, 0, red());
        f.set(0, 9, red());
        assert!(!f.has_changes());
        assert!(f.get(2, 0).is_none());
    }
}
