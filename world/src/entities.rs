//! Value-like records for the controllable, autonomous, and projectile
//! entities.
//!
//! An entity's position always equals the position of its occupancy marker in
//! the grid, except inside the single tick where a move is applied.

use grid_skirmish_core::{Direction, GridPoint, Owner};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Hero {
    pub(crate) pos: GridPoint,
    pub(crate) direction: Option<Direction>,
    pub(crate) lives: u32,
    pub(crate) points: u32,
    pub(crate) drawing_trail: bool,
}

impl Hero {
    pub(crate) const fn new(pos: GridPoint, lives: u32) -> Self {
        Self {
            pos,
            direction: None,
            lives,
            points: 0,
            drawing_trail: false,
        }
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.lives > 0
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Enemy {
    pub(crate) pos: GridPoint,
    pub(crate) direction: Option<Direction>,
    pub(crate) lives: u32,
    pub(crate) steps_left: u32,
}

impl Enemy {
    pub(crate) const fn new(pos: GridPoint, lives: u32) -> Self {
        Self {
            pos,
            direction: None,
            lives,
            steps_left: 0,
        }
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.lives > 0
    }
}

/// A bullet is destroyed the tick its direction becomes `None`; every
/// resolution rule that stops a bullet sets exactly that.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bullet {
    pub(crate) pos: GridPoint,
    pub(crate) direction: Option<Direction>,
    pub(crate) owner: Owner,
}

impl Bullet {
    pub(crate) const fn new(pos: GridPoint, direction: Direction, owner: Owner) -> Self {
        Self {
            pos,
            direction: Some(direction),
            owner,
        }
    }
}
