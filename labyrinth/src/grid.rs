use std::fmt::Display;

use image::RgbImage;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::pixels::{is_black, is_white};
use crate::walls::{Axis, WallGrid};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Position of this direction in a cell's connection array
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// (row, column) offset of the neighbor in this direction
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Down => "down",
                Direction::Left => "left",
                Direction::Right => "right",
            }
        )
    }
}

/// One compartment of the maze: four connection flags and a start/finish marker.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    connections: [bool; 4],
    pub special: bool,
}

impl Cell {
    /// A cell without walls, the state every cell starts from before sampling
    pub fn all_open() -> Self {
        Self {
            connections: [true; 4],
            special: false,
        }
    }

    pub fn closed() -> Self {
        Self::default()
    }

    /// Returns a copy of this cell with the connection towards `direction` opened
    pub fn with_open(mut self, direction: Direction) -> Self {
        self.connections[direction.index()] = true;
        self
    }

    pub fn with_special(mut self) -> Self {
        self.special = true;
        self
    }

    pub fn is_open(&self, direction: Direction) -> bool {
        self.connections[direction.index()]
    }

    /// Closes the connection towards `direction`, returns whether it was open
    pub fn close(&mut self, direction: Direction) -> bool {
        std::mem::replace(&mut self.connections[direction.index()], false)
    }

    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_open(*direction))
    }

    /// Number of open connections, optionally counting the special marker as one more
    pub fn exits(&self, count_special: bool) -> usize {
        let open = self.connections.iter().filter(|open| **open).count();
        open + usize::from(count_special && self.special)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.special {
            return write!(f, "●");
        }
        write!(
            f,
            "{}",
            match self.connections {
                // [up, down, left, right]
                [false, false, false, false] => " ",
                [true, false, false, false] => "╵",
                [false, true, false, false] => "╷",
                [false, false, true, false] => "╴",
                [false, false, false, true] => "╶",
                [true, true, false, false] => "│",
                [false, false, true, true] => "─",
                [false, true, false, true] => "┌",
                [false, true, true, false] => "┐",
                [true, false, false, true] => "└",
                [true, false, true, false] => "┘",
                [true, true, false, true] => "├",
                [true, true, true, false] => "┤",
                [false, true, true, true] => "┬",
                [true, false, true, true] => "┴",
                [true, true, true, true] => "┼",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A rectangular grid of cells stored in one row-major vector.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MazeCells")]
pub struct MazeGrid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct MazeCells {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl TryFrom<MazeCells> for MazeGrid {
    type Error = MazeError;

    fn try_from(maze: MazeCells) -> Result<Self> {
        MazeGrid::from_cells(maze.rows, maze.columns, maze.cells)
    }
}

impl MazeGrid {
    pub fn new(rows: usize, columns: usize, cell: Cell) -> Self {
        Self {
            rows,
            columns,
            cells: vec![cell; rows * columns],
        }
    }

    /// Wraps row-major cells as they are, without reconciling neighbors.
    pub fn from_cells(rows: usize, columns: usize, cells: Vec<Cell>) -> Result<Self> {
        if cells.len() != rows * columns {
            return Err(MazeError::CellCountMismatch {
                rows,
                columns,
                found: cells.len(),
            });
        }

        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_valid(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    pub fn index(&self, point: Point) -> usize {
        point.row * self.columns + point.col
    }

    pub fn point(&self, index: usize) -> Point {
        Point {
            row: index / self.columns,
            col: index % self.columns,
        }
    }

    pub fn get(&self, point: Point) -> Cell {
        self.cells[self.index(point)]
    }

    pub fn get_mut(&mut self, point: Point) -> &mut Cell {
        let index = self.index(point);
        &mut self.cells[index]
    }

    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Index of the neighbor of `index` in `direction`, if it lies inside the grid
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        let point = self.point(index);
        let (d_row, d_col) = direction.delta();
        let row = point.row.checked_add_signed(d_row)?;
        let col = point.col.checked_add_signed(d_col)?;
        let neighbor = Point { row, col };
        self.is_valid(neighbor).then(|| self.index(neighbor))
    }

    /// Opens the border of `point` towards `direction` on both sides.
    /// On the perimeter only the cell itself is opened.
    pub fn connect(&mut self, point: Point, direction: Direction) {
        let index = self.index(point);
        self.cells[index].connections[direction.index()] = true;
        if let Some(neighbor) = self.neighbor(index, direction) {
            self.cells[neighbor].connections[direction.opposite().index()] = true;
        }
    }

    /// Closes the border of `index` towards `direction` on both sides and
    /// returns the neighbor whose mirrored connection was closed.
    pub fn disconnect(&mut self, index: usize, direction: Direction) -> Option<usize> {
        self.cells[index].close(direction);
        let neighbor = self.neighbor(index, direction)?;
        self.cells[neighbor]
            .close(direction.opposite())
            .then_some(neighbor)
    }

    /// Removes every special marker, returns how many there were
    pub fn clear_specials(&mut self) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.special) {
            cell.special = false;
            cleared += 1;
        }
        cleared
    }

    pub fn total_exits(&self, count_special: bool) -> usize {
        self.cells.iter().map(|cell| cell.exits(count_special)).sum()
    }

    /// Points of all cells that still have at least one open connection
    pub fn open_cells(&self) -> Vec<Point> {
        (0..self.cells.len())
            .filter(|&index| self.cells[index].exits(false) > 0)
            .map(|index| self.point(index))
            .collect()
    }

    /// Makes every pair of neighbors agree on the border between them.
    ///
    /// A border that is closed on either side becomes closed on both. With
    /// `strict` set, the first disagreement is returned as an error instead.
    /// Returns the number of borders that were closed.
    pub fn reconcile(&mut self, strict: bool) -> Result<usize> {
        let mut closed = 0;
        for index in 0..self.cells.len() {
            // every shared border is visited once, from its upper or left cell
            for direction in [Direction::Down, Direction::Right] {
                let Some(neighbor) = self.neighbor(index, direction) else {
                    continue;
                };
                let here = self.cells[index].is_open(direction);
                let there = self.cells[neighbor].is_open(direction.opposite());
                if here == there {
                    continue;
                }
                if strict {
                    return Err(MazeError::InconsistentAdjacency {
                        a: self.point(index),
                        b: self.point(neighbor),
                    });
                }
                warn!(
                    "Cells {} and {} disagree about their border, treating it as a wall",
                    self.point(index),
                    self.point(neighbor)
                );
                self.disconnect(index, direction);
                closed += 1;
            }
        }
        Ok(closed)
    }
}

impl Display for MazeGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns.max(1)) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

fn check_bounds(coords: &[usize], axis: Axis, limit: u32) -> Result<()> {
    match coords.last() {
        Some(&coordinate) if coordinate >= limit as usize => Err(MazeError::WallOutOfBounds {
            axis,
            coordinate,
            limit: limit as usize,
        }),
        _ => Ok(()),
    }
}

/// Builds the cell grid of a binarized maze picture from its wall lines.
///
/// Every cell starts without walls. The midpoint of each of its four borders
/// is sampled and a black sample closes that side. A center pixel that is
/// neither black nor white marks the cell as special. Midpoints truncate
/// towards the lower wall coordinate.
pub fn build_maze(img: &RgbImage, walls: &WallGrid, strict: bool) -> Result<MazeGrid> {
    check_bounds(walls.rows(), Axis::Rows, img.height())?;
    check_bounds(walls.cols(), Axis::Columns, img.width())?;

    let black_at = |x: usize, y: usize| is_black(img.get_pixel(x as u32, y as u32));

    let mut cells = Vec::with_capacity(walls.height() * walls.width());
    for bounds_y in walls.rows().windows(2) {
        let (y, yn) = (bounds_y[0], bounds_y[1]);
        let mid_y = (y + yn) / 2;

        for bounds_x in walls.cols().windows(2) {
            let (x, xn) = (bounds_x[0], bounds_x[1]);
            let mid_x = (x + xn) / 2;

            let mut cell = Cell::all_open();
            for (direction, sx, sy) in [
                (Direction::Up, mid_x, y),
                (Direction::Down, mid_x, yn),
                (Direction::Left, x, mid_y),
                (Direction::Right, xn, mid_y),
            ] {
                if black_at(sx, sy) {
                    cell.close(direction);
                }
            }

            let center = img.get_pixel(mid_x as u32, mid_y as u32);
            cell.special = !is_black(center) && !is_white(center);

            cells.push(cell);
        }
    }

    let mut maze = MazeGrid::from_cells(walls.height(), walls.width(), cells)?;
    maze.reconcile(strict)?;

    debug!(
        "Built a {}x{} maze with {} special cells",
        maze.rows(),
        maze.columns(),
        maze.cells().iter().filter(|cell| cell.special).count()
    );

    Ok(maze)
}
