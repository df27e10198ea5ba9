#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Skirmish adapters.
//!
//! The world never draws; it emits ordered change records. This crate maps
//! those records onto an abstract glyph [`Surface`], so terminal and test
//! backends share one incremental-repaint routine and never rescan the grid.

use anyhow::Result as AnyResult;
use grid_skirmish_core::{Cell, EntityKind, PositionChange, StatusChange};

/// Glyph drawn when a cell is cleared or vacated.
pub const BLANK_GLYPH: char = ' ';

/// Maps a cell state to its display glyph.
///
/// `Consider` has a glyph for completeness but is never emitted by the world.
#[must_use]
pub const fn glyph(cell: Cell) -> char {
    match cell {
        Cell::Empty => BLANK_GLYPH,
        Cell::Border => '#',
        Cell::Brick => 'B',
        Cell::Iron => 'I',
        Cell::Trail => '.',
        Cell::Consider => '?',
        Cell::Marked => '*',
        Cell::Hero => 'T',
        Cell::Enemy => 'O',
        Cell::Bullet => 'x',
    }
}

/// Drawing backend capable of presenting Grid Skirmish frames.
///
/// Coordinates are grid row and column indices; backends own the mapping to
/// their native units.
pub trait Surface {
    /// Draws one glyph at a grid position.
    fn draw_glyph(&mut self, row: i32, col: i32, glyph: char) -> AnyResult<()>;

    /// Replaces the status line below the grid.
    fn draw_status(&mut self, line: &str) -> AnyResult<()>;

    /// Flushes buffered drawing to the viewer.
    fn present(&mut self) -> AnyResult<()>;
}

/// Applies one batch of grid changes to a surface, in emission order.
///
/// A move record erases the vacated cell before drawing the new one, so the
/// pair stays atomic from the viewer's perspective.
pub fn apply_changes<S: Surface>(surface: &mut S, changes: &[PositionChange]) -> AnyResult<()> {
    for change in changes {
        if let Some(from) = change.from {
            surface.draw_glyph(from.row(), from.col(), BLANK_GLYPH)?;
        }
        surface.draw_glyph(change.at.row(), change.at.col(), glyph(change.value))?;
    }
    Ok(())
}

/// Folds status records into the HUD and redraws the status line when any
/// counter actually changed.
pub fn apply_statuses<S: Surface>(
    surface: &mut S,
    hud: &mut HudState,
    statuses: &[StatusChange],
) -> AnyResult<()> {
    if hud.absorb(statuses) {
        surface.draw_status(&hud.line())?;
    }
    Ok(())
}

/// Last-written-wins HUD counters accumulated from status records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudState {
    /// Hero score shown on the status line.
    pub points: u32,
    /// Hero lives shown on the status line.
    pub lives: u32,
}

impl HudState {
    /// Folds a batch of status records into the counters.
    ///
    /// Returns `true` when any counter changed, so callers skip redundant
    /// status-line redraws.
    pub fn absorb(&mut self, statuses: &[StatusChange]) -> bool {
        let before = *self;
        for status in statuses {
            match *status {
                StatusChange::Points {
                    kind: EntityKind::Hero,
                    value,
                } => self.points = value,
                StatusChange::Lives {
                    kind: EntityKind::Hero,
                    value,
                } => self.lives = value,
                _ => {}
            }
        }
        *self != before
    }

    /// Renders the counters as the status line.
    #[must_use]
    pub fn line(&self) -> String {
        format!("points: {}  lives: {}", self.points, self.lives)
    }
}
