#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Skirmish engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The driver submits [`Command`]
//! values describing one engine operation each, the world executes them via
//! its `apply` entry point, and every grid mutation is reported back as an
//! ordered [`PositionChange`]/[`StatusChange`] record collected in a
//! [`ChangeBatch`] for the renderer to apply incrementally.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when a session boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Skirmish.";

/// Canonical cell the hero spawns at and respawns to after losing a life.
pub const HERO_SPAWN: GridPoint = GridPoint::new(1, 1);

/// Enumerated state of a single grid position.
///
/// Exactly one state occupies a cell at a time. The entity-occupied states
/// are a rendering-and-collision projection of entity positions, not
/// independently persisted state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Plain traversable cell.
    Empty,
    /// Static perimeter wall, impassable and indestructible.
    Border,
    /// Static obstacle that bullets destroy.
    Brick,
    /// Static obstacle that nothing destroys.
    Iron,
    /// Temporary cell owned by the hero's current border-to-border crossing.
    Trail,
    /// Transient flood-fill marker; never survives an engine operation.
    Consider,
    /// Permanently enclosed territory.
    Marked,
    /// Cell projected from the hero's position.
    Hero,
    /// Cell projected from a live enemy's position.
    Enemy,
    /// Cell projected from an in-flight bullet's position.
    Bullet,
}

impl Cell {
    /// Converts a map-file integer into its cell value.
    ///
    /// Map files seed static terrain only, so entity and transient states
    /// have no integer form.
    #[must_use]
    pub const fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Empty),
            1 => Some(Self::Border),
            2 => Some(Self::Brick),
            3 => Some(Self::Iron),
            4 => Some(Self::Marked),
            _ => None,
        }
    }

    /// Reports whether the cell refuses hero and bullet traversal.
    ///
    /// Trail cells block so the hero can never cross its own trail.
    #[must_use]
    pub const fn blocks_movement(&self) -> bool {
        matches!(
            self,
            Self::Border | Self::Brick | Self::Iron | Self::Marked | Self::Trail
        )
    }

    /// Reports whether a bullet strike destroys the cell.
    ///
    /// Bricks crumble; iron and the perimeter never do.
    #[must_use]
    pub const fn is_destructible(&self) -> bool {
        matches!(self, Self::Brick)
    }
}

/// Cardinal movement directions available to entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// All four cardinal directions in a fixed sampling order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Right, Self::Left];

    /// Coordinate delta `(row, col)` applied by one step in this direction.
    #[must_use]
    pub const fn delta(&self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Right => (0, 1),
            Self::Left => (0, -1),
        }
    }
}

/// Location of a single grid cell expressed as signed row and column indices.
///
/// Coordinates are signed so candidate-cell arithmetic at the grid edge never
/// wraps; the grid treats any out-of-range point as a safe sentinel lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    row: i32,
    col: i32,
}

impl GridPoint {
    /// Creates a new grid point.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the point.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the point.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Candidate point one step away in the provided direction.
    #[must_use]
    pub const fn offset(&self, direction: Direction) -> Self {
        let (row_delta, col_delta) = direction.delta();
        Self {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// Computes the Manhattan distance between two grid points.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Closed set of entity kinds hosted by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player-controlled entity.
    Hero,
    /// An autonomous enemy entity.
    Enemy,
    /// A short-lived projectile entity.
    Bullet,
}

impl EntityKind {
    /// Occupancy marker projected onto the grid for this entity kind.
    #[must_use]
    pub const fn marker(&self) -> Cell {
        match self {
            Self::Hero => Cell::Hero,
            Self::Enemy => Cell::Enemy,
            Self::Bullet => Cell::Bullet,
        }
    }
}

/// Side that fired a bullet, gating the friendly-fire collision rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// Fired by the hero.
    Hero,
    /// Fired by an enemy.
    Enemy,
}

/// Concrete configurations of the generalized engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Destructible terrain, lives, and scoring; no territory capture.
    TankBattle,
    /// Trail drawing and territory enclosure; winning traps every enemy.
    TrailEnclosure,
}

/// A single emitted grid mutation record.
///
/// A change carrying a previous position represents an atomic move: the
/// renderer erases the stale glyph at `from` and then draws `value` at `at`
/// without a second lookup. Changes from one operation are ordered and later
/// writes may legitimately overwrite earlier ones to the same cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionChange {
    /// Target cell of the write.
    pub at: GridPoint,
    /// New state written at the target cell.
    pub value: Cell,
    /// Vacated cell when the change represents a move rather than a point
    /// mutation.
    pub from: Option<GridPoint>,
}

impl PositionChange {
    /// Creates a point mutation without a vacated cell.
    #[must_use]
    pub const fn point(at: GridPoint, value: Cell) -> Self {
        Self {
            at,
            value,
            from: None,
        }
    }

    /// Creates a move change that vacates `from` and writes `value` at `at`.
    #[must_use]
    pub const fn moved(at: GridPoint, value: Cell, from: GridPoint) -> Self {
        Self {
            at,
            value,
            from: Some(from),
        }
    }
}

/// A non-positional record consumed by a HUD, independent of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusChange {
    /// Updated accumulated score for the named entity kind.
    Points {
        /// Entity kind the score belongs to.
        kind: EntityKind,
        /// New score value.
        value: u32,
    },
    /// Updated remaining-lives counter for the named entity kind.
    Lives {
        /// Entity kind the counter belongs to.
        kind: EntityKind,
        /// New remaining-lives value.
        value: u32,
    },
}

/// Ordered change records produced by one engine operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    /// Grid mutations in emission order.
    pub positions: Vec<PositionChange>,
    /// Score and lives updates in emission order.
    pub statuses: Vec<StatusChange>,
}

impl ChangeBatch {
    /// Creates an empty change batch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            statuses: Vec::new(),
        }
    }

    /// Removes every accumulated record.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.statuses.clear();
    }

    /// Reports whether the batch carries no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.statuses.is_empty()
    }
}

/// Discrete input state injected into each hero-input tick.
///
/// Owned by the driver and read once per tick, replacing any notion of a
/// shared mutable last-pressed-key value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    /// Requested hero motion, `None` when no direction key is held.
    pub direction: Option<Direction>,
    /// Whether the fire key is held.
    pub fire: bool,
}

/// Commands that express all permissible engine operations.
///
/// Exactly one command mutates the world at a time; external timers drive
/// one command per tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Seeds static terrain from a rectangular map and places the entities.
    Initialize {
        /// Rectangular array of static terrain cells, row-major.
        map: Vec<Vec<Cell>>,
    },
    /// Advances the hero one cell in the requested direction.
    MoveHero {
        /// Requested motion, `None` to stay put.
        direction: Option<Direction>,
    },
    /// Advances every live enemy one cell along its current heading.
    AdvanceEnemies,
    /// Spawns due bullets and advances every live bullet one cell.
    Fire {
        /// Whether the hero requested a shot this tick.
        hero_trigger: bool,
    },
}

/// Normal game-end conditions raised out of a mutating operation.
///
/// Both leave the grid in a consistent, fully-applied state for the changes
/// emitted up to the raise point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GameEnd {
    /// The hero's lives are exhausted.
    #[error("the hero has no remaining lives")]
    Loss,
    /// Every live enemy is sealed inside border or marked territory.
    #[error("every enemy is trapped by marked territory")]
    Win,
}

#[cfg(test)]
mod tests {
    use super::{Cell, Direction, GameEnd, GridPoint, PositionChange, StatusChange};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn delta_table_matches_cardinal_steps() {
        assert_eq!(Direction::Up.delta(), (-1, 0));
        assert_eq!(Direction::Down.delta(), (1, 0));
        assert_eq!(Direction::Right.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (0, -1));
    }

    #[test]
    fn offset_applies_delta_from_point() {
        let origin = GridPoint::new(2, 2);
        assert_eq!(origin.offset(Direction::Up), GridPoint::new(1, 2));
        assert_eq!(origin.offset(Direction::Left), GridPoint::new(2, 1));
    }

    #[test]
    fn offset_leaves_the_grid_without_wrapping() {
        let corner = GridPoint::new(0, 0);
        assert_eq!(corner.offset(Direction::Up), GridPoint::new(-1, 0));
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = GridPoint::new(1, 1);
        let destination = GridPoint::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn static_obstacles_block_movement() {
        assert!(Cell::Border.blocks_movement());
        assert!(Cell::Brick.blocks_movement());
        assert!(Cell::Iron.blocks_movement());
        assert!(Cell::Marked.blocks_movement());
        assert!(Cell::Trail.blocks_movement());
        assert!(!Cell::Empty.blocks_movement());
    }

    #[test]
    fn only_bricks_are_destructible() {
        assert!(Cell::Brick.is_destructible());
        assert!(!Cell::Iron.is_destructible());
        assert!(!Cell::Border.is_destructible());
    }

    #[test]
    fn raw_values_cover_static_terrain_only() {
        assert_eq!(Cell::from_raw(0), Some(Cell::Empty));
        assert_eq!(Cell::from_raw(1), Some(Cell::Border));
        assert_eq!(Cell::from_raw(2), Some(Cell::Brick));
        assert_eq!(Cell::from_raw(3), Some(Cell::Iron));
        assert_eq!(Cell::from_raw(4), Some(Cell::Marked));
        assert_eq!(Cell::from_raw(9), None);
    }

    #[test]
    fn game_end_messages_describe_the_outcome() {
        assert_eq!(
            GameEnd::Loss.to_string(),
            "the hero has no remaining lives"
        );
        assert_eq!(
            GameEnd::Win.to_string(),
            "every enemy is trapped by marked territory"
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn position_change_round_trips_through_bincode() {
        let change = PositionChange::moved(GridPoint::new(1, 2), Cell::Hero, GridPoint::new(1, 1));
        assert_round_trip(&change);
    }

    #[test]
    fn status_change_round_trips_through_bincode() {
        let change = StatusChange::Points {
            kind: super::EntityKind::Hero,
            value: 7,
        };
        assert_round_trip(&change);
    }
}
