// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

/// What is on screen right now.
struct Shown {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Shown {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(); width as usize * height as usize],
        }
    }
}

/// Colors and cursor position the terminal currently holds.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    pos: Option<(u16, u16)>,
}

impl Pen {
    fn apply(&mut self, out: &mut Stdout, fg: Option<Color>, bg: Option<Color>) -> Result<()> {
        if fg != self.fg {
            out.queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
            self.fg = fg;
        }
        if bg != self.bg {
            out.queue(SetBackgroundColor(bg.unwrap_or(Color::Reset)))?;
            self.bg = bg;
        }
        Ok(())
    }
}

pub struct Terminal {
    stdout: Stdout,
    shown: Option<Shown>,
    run_buf: String,
    rows: Vec<Vec<usize>>,
    touched_rows: Vec<u16>,
}

fn leave(out: &mut Stdout) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let entered: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()
        })();
        if let Err(e) = entered {
            leave(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            shown: None,
            run_buf: String::with_capacity(256),
            rows: Vec::new(),
            touched_rows: Vec::new(),
        })
    }

    /// Terminal size in cells, never zero in either direction.
    pub fn size(&self) -> Result<(u16, u16)> {
        let (w, h) = terminal::size()?;
        Ok((w.max(1), h.max(1)))
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let size_changed = self
            .shown
            .as_ref()
            .map(|s| s.width != frame.width || s.height != frame.height)
            .unwrap_or(true);
        if size_changed {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.shown = Some(Shown::new(frame.width, frame.height));
        }

        let total = frame.width as usize * frame.height as usize;
        let mostly_dirty = total > 0 && frame.dirty_indices().len() >= total / 3;
        if size_changed || frame.is_dirty_all() || mostly_dirty {
            self.redraw_all(frame)?;
        } else {
            self.redraw_dirty(frame)?;
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }

    fn redraw_all(&mut self, frame: &Frame) -> Result<()> {
        let Some(shown) = self.shown.as_mut() else {
            return Ok(());
        };
        let mut pen = Pen::default();
        for y in 0..frame.height {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width {
                let idx = y as usize * frame.width as usize + x as usize;
                let cell = frame.cell_at_index(idx);
                pen.apply(&mut self.stdout, cell.fg, cell.bg)?;
                self.stdout.queue(Print(cell.ch))?;
                shown.cells[idx] = cell;
            }
        }
        Ok(())
    }

    /// Rewrites changed cells, batching horizontal runs that share colors.
    fn redraw_dirty(&mut self, frame: &Frame) -> Result<()> {
        let Some(shown) = self.shown.as_mut() else {
            return Ok(());
        };
        let width = frame.width as usize;

        if self.rows.len() != frame.height as usize {
            self.rows = vec![Vec::new(); frame.height as usize];
        }
        self.touched_rows.clear();
        for &idx in frame.dirty_indices() {
            let y = idx / width;
            let Some(row) = self.rows.get_mut(y) else {
                continue;
            };
            if row.is_empty() {
                self.touched_rows.push(y as u16);
            }
            row.push(idx);
        }
        self.touched_rows.sort_unstable();

        let mut pen = Pen::default();
        for &y in &self.touched_rows {
            let row = &mut self.rows[y as usize];
            row.sort_unstable();

            let mut i = 0;
            while i < row.len() {
                let start = row[i];
                let head = frame.cell_at_index(start);
                i += 1;
                if shown.cells[start] == head {
                    continue;
                }
                shown.cells[start] = head;

                self.run_buf.clear();
                self.run_buf.push(head.ch);
                let mut len: u16 = 1;
                let mut prev = start;
                while i < row.len() && row[i] == prev + 1 {
                    let cell = frame.cell_at_index(row[i]);
                    if shown.cells[row[i]] == cell || cell.fg != head.fg || cell.bg != head.bg {
                        break;
                    }
                    shown.cells[row[i]] = cell;
                    self.run_buf.push(cell.ch);
                    len = len.saturating_add(1);
                    prev = row[i];
                    i += 1;
                }

                let x = (start % width) as u16;
                if pen.pos != Some((x, y)) {
                    self.stdout.queue(cursor::MoveTo(x, y))?;
                }
                pen.apply(&mut self.stdout, head.fg, head.bg)?;
                self.stdout.queue(Print(self.run_buf.as_str()))?;
                let next_x = x.saturating_add(len);
                pen.pos = (next_x < frame.width).then_some((next_x, y));
            }
            row.clear();
        }
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        leave(&mut self.stdout);
    }
}

pub fn restore_terminal_best_effort() {
    leave(&mut stdout());
}
