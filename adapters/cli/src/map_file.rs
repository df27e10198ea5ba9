//! Map loading from JSON cell-code files, plus generated fallback maps.
//!
//! A map file is a JSON array of equal-length rows of integer cell codes
//! covering static terrain only; entity placement always belongs to the
//! engine.

use std::path::{Path, PathBuf};
use std::{error::Error, fmt, fs, io};

use grid_skirmish_core::{Cell, Variant, HERO_SPAWN};

/// Smallest playable side length: one interior cell inside the border ring.
const MIN_SIDE: usize = 3;

/// Reads and validates a map file.
pub(crate) fn load(path: &Path) -> Result<Vec<Vec<Cell>>, MapFileError> {
    let bytes = fs::read(path).map_err(|source| MapFileError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse(&bytes)
}

fn parse(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, MapFileError> {
    let raw: Vec<Vec<u8>> = serde_json::from_slice(bytes).map_err(MapFileError::Parse)?;

    let rows = raw.len();
    let columns = raw.first().map_or(0, Vec::len);
    if rows < MIN_SIDE || columns < MIN_SIDE {
        return Err(MapFileError::TooSmall { rows, columns });
    }

    let mut map = Vec::with_capacity(rows);
    for (row, codes) in raw.iter().enumerate() {
        if codes.len() != columns {
            return Err(MapFileError::NotRectangular {
                row,
                expected: columns,
                found: codes.len(),
            });
        }
        let mut cells = Vec::with_capacity(columns);
        for (col, code) in codes.iter().enumerate() {
            let cell = Cell::from_raw(*code).ok_or(MapFileError::UnknownCell {
                row,
                col,
                value: *code,
            })?;
            cells.push(cell);
        }
        map.push(cells);
    }

    if map[HERO_SPAWN.row() as usize][HERO_SPAWN.col() as usize] != Cell::Empty {
        return Err(MapFileError::BlockedSpawn);
    }

    Ok(map)
}

/// Generates a default map: a border ring, plus brick clusters for the
/// tank-battle variant.
pub(crate) fn fallback(variant: Variant, rows: usize, columns: usize) -> Vec<Vec<Cell>> {
    let rows = rows.max(MIN_SIDE);
    let columns = columns.max(MIN_SIDE);
    (0..rows)
        .map(|row| {
            (0..columns)
                .map(|col| {
                    if row == 0 || row == rows - 1 || col == 0 || col == columns - 1 {
                        Cell::Border
                    } else if variant == Variant::TankBattle && brick_at(row, col) {
                        Cell::Brick
                    } else {
                        Cell::Empty
                    }
                })
                .collect()
        })
        .collect()
}

/// Brick clusters every few rows, leaving the spawn corner clear.
fn brick_at(row: usize, col: usize) -> bool {
    if row < 4 && col < 4 {
        return false;
    }
    row % 4 == 2 && col % 6 < 3
}

/// Errors that can occur while loading a map file.
#[derive(Debug)]
pub(crate) enum MapFileError {
    /// The file could not be read from disk.
    Read {
        /// Path the read was attempted against.
        path: PathBuf,
        /// Underlying IO failure.
        source: io::Error,
    },
    /// The file was not a JSON array of integer rows.
    Parse(serde_json::Error),
    /// The map is smaller than the playable minimum.
    TooSmall {
        /// Number of rows found.
        rows: usize,
        /// Number of columns found in the first row.
        columns: usize,
    },
    /// A row's length differs from the first row's.
    NotRectangular {
        /// Zero-based index of the offending row.
        row: usize,
        /// Column count established by the first row.
        expected: usize,
        /// Column count found in the offending row.
        found: usize,
    },
    /// A cell code has no static-terrain meaning.
    UnknownCell {
        /// Zero-based row of the offending code.
        row: usize,
        /// Zero-based column of the offending code.
        col: usize,
        /// The code that failed validation.
        value: u8,
    },
    /// The hero spawn cell is not empty terrain.
    BlockedSpawn,
}

impl fmt::Display for MapFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, .. } => write!(f, "failed to read map file {}", path.display()),
            Self::Parse(_) => write!(f, "map file is not a JSON array of integer rows"),
            Self::TooSmall { rows, columns } => write!(
                f,
                "map must be at least {MIN_SIDE}x{MIN_SIDE}, found {rows}x{columns}"
            ),
            Self::NotRectangular {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} holds {found} cells but the map is {expected} wide"
            ),
            Self::UnknownCell { row, col, value } => {
                write!(f, "unknown cell code {value} at row {row}, column {col}")
            }
            Self::BlockedSpawn => write!(
                f,
                "the hero spawn cell at row {}, column {} must be empty",
                HERO_SPAWN.row(),
                HERO_SPAWN.col()
            ),
        }
    }
}

impl Error for MapFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(source) => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_valid_map_parses_into_cells() {
        let map = parse(b"[[1,1,1],[1,0,1],[1,1,1]]").expect("valid map");
        assert_eq!(map.len(), 3);
        assert_eq!(map[0][0], Cell::Border);
        assert_eq!(map[1][1], Cell::Empty);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = parse(b"[[1,1,1],[1,0],[1,1,1]]").expect_err("ragged map");
        assert!(matches!(
            error,
            MapFileError::NotRectangular {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn unknown_cell_codes_are_rejected() {
        let error = parse(b"[[1,1,1],[1,9,1],[1,1,1]]").expect_err("bad code");
        assert!(matches!(
            error,
            MapFileError::UnknownCell {
                row: 1,
                col: 1,
                value: 9
            }
        ));
    }

    #[test]
    fn a_blocked_spawn_cell_is_rejected() {
        let error = parse(b"[[1,1,1],[1,2,1],[1,1,1]]").expect_err("blocked spawn");
        assert!(matches!(error, MapFileError::BlockedSpawn));
    }

    #[test]
    fn tiny_maps_are_rejected() {
        let error = parse(b"[[1,1],[1,1]]").expect_err("too small");
        assert!(matches!(
            error,
            MapFileError::TooSmall {
                rows: 2,
                columns: 2
            }
        ));
    }

    #[test]
    fn fallback_maps_keep_the_border_and_the_spawn_clear() {
        for variant in [Variant::TankBattle, Variant::TrailEnclosure] {
            let map = fallback(variant, 12, 16);
            assert_eq!(map.len(), 12);
            assert!(map.iter().all(|row| row.len() == 16));
            assert!(map[0].iter().all(|cell| *cell == Cell::Border));
            assert!(map[11].iter().all(|cell| *cell == Cell::Border));
            assert_eq!(map[1][1], Cell::Empty);
        }
    }

    #[test]
    fn only_the_tank_variant_gets_bricks() {
        let with_bricks = fallback(Variant::TankBattle, 12, 16);
        let open = fallback(Variant::TrailEnclosure, 12, 16);
        assert!(with_bricks
            .iter()
            .flatten()
            .any(|cell| *cell == Cell::Brick));
        assert!(open.iter().flatten().all(|cell| *cell != Cell::Brick));
    }
}
