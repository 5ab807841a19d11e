// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A display built out of the terminal.
//!
//! The alternate screen is the surface.  Each character cell shows two
//! vertically stacked pixels using the upper half block, foreground for
//! the top and background for the bottom, so a terminal of `cols` x
//! `rows` cells shows a `cols` x `2 * rows` thumbnail of the frame.
//! Key presses arrive as control events and the pixel count goes in
//! the window title.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use crossterm::{cursor, execute, queue};
use log::{warn, LevelFilter};
use std::io::{self, BufWriter, Stdout, Write};
use std::time::Duration;

use crate::error::Result;
use crate::raster::BYTES_PER_PIXEL;
use crate::scheduler::{ControlEvent, ControlSource, DiagnosticsSink, Display};

/// Nearest-neighbour downsample of a 4-byte-per-pixel frame to a
/// `columns` x `lines` grid of gray levels, read from the first
/// channel of each pixel.
pub fn downsample(pixels: &[u8], pitch: usize, columns: usize, lines: usize) -> Vec<u8> {
    if pitch == 0 || columns == 0 || lines == 0 {
        return vec![];
    }
    let width = pitch / BYTES_PER_PIXEL;
    let height = pixels.len() / pitch;
    let mut grid = Vec::with_capacity(columns * lines);
    for line in 0..lines {
        let y = line * height / lines;
        for column in 0..columns {
            let x = column * width / columns;
            grid.push(pixels[pitch * y + x * BYTES_PER_PIXEL]);
        }
    }
    grid
}

fn gray(level: u8) -> Color {
    Color::Rgb {
        r: level,
        g: level,
        b: level,
    }
}

/// Holds logging at `error` and above for as long as it lives, then
/// puts the previous level back.  Anything written to stderr while the
/// alternate screen is up lands on top of the frame.
#[derive(Debug)]
pub struct QuietLog(LevelFilter);

impl QuietLog {
    /// Lower the ceiling, remembering the current one.
    pub fn hold() -> Self {
        let saved = log::max_level();
        log::set_max_level(saved.min(LevelFilter::Error));
        QuietLog(saved)
    }
}

impl Drop for QuietLog {
    fn drop(&mut self) {
        log::set_max_level(self.0);
    }
}

/// The terminal surface.  Acquiring it switches the terminal into raw
/// mode on the alternate screen; dropping it puts everything back.
pub struct TerminalSurface {
    out: BufWriter<Stdout>,
    grid: Vec<u8>,
    columns: usize,
    rows: usize,
    quiet: Option<QuietLog>,
}

impl TerminalSurface {
    /// Take over the terminal.
    pub fn open() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = BufWriter::new(io::stdout());
        if let Err(err) = execute!(out, EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err.into());
        }
        Ok(TerminalSurface {
            out,
            grid: vec![],
            columns: 0,
            rows: 0,
            quiet: Some(QuietLog::hold()),
        })
    }
}

impl Display for TerminalSurface {
    fn update(&mut self, pixels: &[u8], pitch: usize) -> Result<()> {
        let (columns, rows) = terminal::size()?;
        self.columns = columns as usize;
        self.rows = rows as usize;
        self.grid = downsample(pixels, pitch, self.columns, self.rows * 2);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        if self.grid.len() < self.columns * self.rows * 2 {
            return Ok(());
        }
        for row in 0..self.rows {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            let top = (row * 2) * self.columns;
            let bottom = top + self.columns;
            for column in 0..self.columns {
                queue!(
                    self.out,
                    SetForegroundColor(gray(self.grid[top + column])),
                    SetBackgroundColor(gray(self.grid[bottom + column])),
                    Print('\u{2580}')
                )?;
            }
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let restored = execute!(self.out, ResetColor, cursor::Show, LeaveAlternateScreen)
            .and_then(|_| terminal::disable_raw_mode());
        self.quiet.take();
        if let Err(err) = restored {
            warn!("Could not restore the terminal: {}", err);
        }
    }
}

/// Control events read from the terminal input queue.
#[derive(Debug, Default)]
pub struct TerminalEvents;

impl ControlSource for TerminalEvents {
    fn poll_event(&mut self) -> Result<Option<ControlEvent>> {
        if !event::poll(Duration::from_secs(0))? {
            return Ok(None);
        }
        let event = match event::read()? {
            Event::Key(key) => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    ControlEvent::Quit
                } else {
                    match key.kind {
                        // Most terminals never report releases, so a
                        // press stands in for one.
                        KeyEventKind::Press | KeyEventKind::Release => ControlEvent::KeyRelease,
                        KeyEventKind::Repeat => ControlEvent::Other,
                    }
                }
            }
            _ => ControlEvent::Other,
        };
        Ok(Some(event))
    }
}

/// Puts the running pixel count in the terminal title.
#[derive(Debug, Default)]
pub struct TitleDiagnostics;

impl DiagnosticsSink for TitleDiagnostics {
    fn report(&mut self, pixels: u64) {
        let title = format!("mandelflow: {} pixels", pixels);
        if let Err(err) = execute!(io::stdout(), SetTitle(title)) {
            warn!("Could not update the title: {}", err);
        }
    }
}
