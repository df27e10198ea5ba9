#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal rendering and input backend built on crossterm.
//!
//! Owns the terminal for the lifetime of a [`TermSurface`]: raw mode plus the
//! alternate screen on entry, restored on drop even when the session ends
//! with an error.

use std::io::{Stdout, Write as _};
use std::time::Duration;

use anyhow::{Context, Result as AnyResult};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    queue,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use grid_skirmish_core::{Direction, InputState};
use grid_skirmish_rendering::Surface;

/// Horizontal scale factor; one grid column spans two terminal columns so
/// cells render roughly square.
const COLUMN_SCALE: i32 = 2;

/// Crossterm-backed drawing surface.
#[derive(Debug)]
pub struct TermSurface {
    out: Stdout,
    status_row: u16,
}

impl TermSurface {
    /// Takes over the terminal and prepares an empty alternate screen.
    ///
    /// `grid_rows` positions the status line one row below the grid.
    pub fn new(grid_rows: u16) -> AnyResult<Self> {
        enable_raw_mode().context("enabling terminal raw mode")?;
        let mut out = std::io::stdout();
        queue!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))
            .context("preparing the alternate screen")?;
        out.flush().context("flushing terminal setup")?;
        Ok(Self {
            out,
            status_row: grid_rows.saturating_add(1),
        })
    }
}

impl Surface for TermSurface {
    fn draw_glyph(&mut self, row: i32, col: i32, glyph: char) -> AnyResult<()> {
        // The world clips its own writes; anything negative here would be a
        // stale record and is skipped rather than wrapped.
        if row < 0 || col < 0 {
            return Ok(());
        }
        let scaled_col = col.saturating_mul(COLUMN_SCALE);
        if row > u16::MAX as i32 || scaled_col > u16::MAX as i32 {
            return Ok(());
        }
        queue!(
            self.out,
            MoveTo(scaled_col as u16, row as u16),
            Print(glyph)
        )
        .context("drawing a glyph")?;
        Ok(())
    }

    fn draw_status(&mut self, line: &str) -> AnyResult<()> {
        queue!(
            self.out,
            MoveTo(0, self.status_row),
            Clear(ClearType::CurrentLine),
            Print(line)
        )
        .context("drawing the status line")?;
        Ok(())
    }

    fn present(&mut self) -> AnyResult<()> {
        self.out.flush().context("presenting the frame")?;
        Ok(())
    }
}

impl Drop for TermSurface {
    fn drop(&mut self) {
        // Restoration is best effort; the terminal may already be gone.
        let _ = queue!(self.out, LeaveAlternateScreen, Show);
        let _ = self.out.flush();
        let _ = disable_raw_mode();
    }
}

/// One frame's worth of keyboard state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PolledInput {
    /// Direction and fire keys translated for the engine.
    pub state: InputState,
    /// Whether the player asked to quit the session.
    pub quit: bool,
}

/// Drains every pending keyboard event without blocking.
///
/// Later presses win within a frame, matching how a held key repeats.
pub fn poll_input() -> AnyResult<PolledInput> {
    let mut polled = PolledInput::default();
    while event::poll(Duration::ZERO).context("polling terminal events")? {
        let Event::Key(key) = event::read().context("reading a terminal event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Up => polled.state.direction = Some(Direction::Up),
            KeyCode::Down => polled.state.direction = Some(Direction::Down),
            KeyCode::Right => polled.state.direction = Some(Direction::Right),
            KeyCode::Left => polled.state.direction = Some(Direction::Left),
            KeyCode::Char(' ') => polled.state.fire = true,
            KeyCode::Esc | KeyCode::Char('q') => polled.quit = true,
            _ => {}
        }
    }
    Ok(polled)
}
