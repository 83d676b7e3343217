use thiserror::Error;

use crate::grid::Point;
use crate::walls::Axis;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MazeError {
    /// Fewer than two wall lines along an axis. `threshold` is the black pixel
    /// count a line had to exceed when the lines came from wall detection.
    #[error(
        "malformed input: found {found} wall {axis}, at least 2 are needed{}",
        density_hint(.threshold)
    )]
    MalformedInput {
        axis: Axis,
        found: usize,
        threshold: Option<f64>,
    },

    #[error("wall {axis} coordinates must be strictly increasing")]
    UnorderedWalls { axis: Axis },

    #[error("wall {axis} coordinate {coordinate} lies outside the image (limit {limit})")]
    WallOutOfBounds {
        axis: Axis,
        coordinate: usize,
        limit: usize,
    },

    #[error("a {rows}x{columns} grid needs {} cells, got {found}", .rows * .columns)]
    CellCountMismatch {
        rows: usize,
        columns: usize,
        found: usize,
    },

    #[error("cells {a} and {b} disagree about the wall between them")]
    InconsistentAdjacency { a: Point, b: Point },
}

fn density_hint(threshold: &Option<f64>) -> String {
    match threshold {
        Some(threshold) => format!(" (a line must contain more than {threshold:.1} black pixels)"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, MazeError>;
