//! Synthetic maze pictures and grids shared by the unit tests.

use image::{Rgb, RgbImage};

use crate::grid::{Cell, Direction, MazeGrid, Point};
use crate::pixels::{BLACK, WHITE};

pub const MARKER: Rgb<u8> = Rgb([255, 0, 0]);

pub fn p(row: usize, col: usize) -> Point {
    Point { row, col }
}

/// Draws a `rows` x `cols` maze with 1px black walls every `pitch` pixels.
/// Each opening whitens the wall segment between a cell and its neighbor,
/// each special cell gets a red center pixel.
pub fn draw_maze(
    rows: usize,
    cols: usize,
    pitch: usize,
    openings: &[(Point, Direction)],
    specials: &[Point],
) -> RgbImage {
    let width = (cols * pitch + 1) as u32;
    let height = (rows * pitch + 1) as u32;
    let mut img = RgbImage::from_pixel(width, height, WHITE);

    for r in 0..=rows {
        for x in 0..width {
            img.put_pixel(x, (r * pitch) as u32, BLACK);
        }
    }
    for c in 0..=cols {
        for y in 0..height {
            img.put_pixel((c * pitch) as u32, y, BLACK);
        }
    }

    for (point, direction) in openings {
        let top = point.row * pitch;
        let left = point.col * pitch;
        let segment: Vec<(usize, usize)> = match direction {
            Direction::Up => (1..pitch).map(|i| (left + i, top)).collect(),
            Direction::Down => (1..pitch).map(|i| (left + i, top + pitch)).collect(),
            Direction::Left => (1..pitch).map(|i| (left, top + i)).collect(),
            Direction::Right => (1..pitch).map(|i| (left + pitch, top + i)).collect(),
        };
        for (x, y) in segment {
            img.put_pixel(x as u32, y as u32, WHITE);
        }
    }

    for point in specials {
        img.put_pixel(
            (point.col * pitch + pitch / 2) as u32,
            (point.row * pitch + pitch / 2) as u32,
            MARKER,
        );
    }

    img
}

/// Adds a white margin around a picture.
pub fn with_margin(img: &RgbImage, top: u32, bottom: u32, left: u32, right: u32) -> RgbImage {
    let mut out = RgbImage::from_pixel(
        img.width() + left + right,
        img.height() + top + bottom,
        WHITE,
    );
    image::imageops::replace(&mut out, img, left as i64, top as i64);
    out
}

/// Spanning tree over a 3x3 grid, at most two openings per wall line:
///
/// ```text
/// (0,0)-(0,1)-(0,2)
///   |           |
/// (1,0) (1,1)-(1,2)
///         |     |
/// (2,0)-(2,1) (2,2)
/// ```
pub fn perfect_maze_openings() -> Vec<(Point, Direction)> {
    vec![
        (p(0, 0), Direction::Down),
        (p(0, 2), Direction::Down),
        (p(1, 1), Direction::Down),
        (p(1, 2), Direction::Down),
        (p(0, 0), Direction::Right),
        (p(2, 0), Direction::Right),
        (p(1, 1), Direction::Right),
        (p(0, 1), Direction::Right),
    ]
}

/// Cells on the unique path between the specials (1,0) and (2,2) of the perfect maze
pub fn perfect_maze_path() -> Vec<Point> {
    vec![p(0, 0), p(0, 1), p(0, 2), p(1, 0), p(1, 2), p(2, 2)]
}

/// A 4x4 maze with a loop in its top left corner and a branch without specials
/// on the right, at most two openings per wall line:
///
/// ```text
/// (0,0)-(0,1)-(0,2)-(0,3)
///   |     |
/// (1,0)-(1,1) (1,2)-(1,3)
///         |           |
/// (2,0) (2,1) (2,2) (2,3)
///         |           |
/// (3,0) (3,1)-(3,2) (3,3)
/// ```
pub fn looped_maze_openings() -> Vec<(Point, Direction)> {
    vec![
        (p(0, 0), Direction::Down),
        (p(0, 1), Direction::Down),
        (p(1, 1), Direction::Down),
        (p(1, 3), Direction::Down),
        (p(2, 1), Direction::Down),
        (p(2, 3), Direction::Down),
        (p(0, 0), Direction::Right),
        (p(1, 0), Direction::Right),
        (p(0, 1), Direction::Right),
        (p(3, 1), Direction::Right),
        (p(0, 2), Direction::Right),
        (p(1, 2), Direction::Right),
    ]
}

pub fn grid_from_openings(
    rows: usize,
    cols: usize,
    openings: &[(Point, Direction)],
    specials: &[Point],
) -> MazeGrid {
    let mut maze = MazeGrid::new(rows, cols, Cell::closed());
    for (point, direction) in openings {
        maze.connect(*point, *direction);
    }
    for point in specials {
        maze.get_mut(*point).special = true;
    }
    maze
}
