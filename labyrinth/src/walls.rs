//! Detection of the wall line coordinates of a rectangular maze picture.

use std::fmt::Display;

use image::RgbImage;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::pixels::is_black;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Axis {
    Rows,
    Columns,
}

impl Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Axis::Rows => "rows",
                Axis::Columns => "columns",
            }
        )
    }
}

/// Pixel coordinates of the horizontal (`rows`) and vertical (`cols`) wall lines.
///
/// Both lists are strictly increasing and hold at least two entries, so
/// `rows.len() - 1` by `cols.len() - 1` cells fit between them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WallLines")]
pub struct WallGrid {
    rows: Vec<usize>,
    cols: Vec<usize>,
}

/// Unchecked wall coordinates as they appear in serialized form
#[derive(Deserialize)]
struct WallLines {
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl TryFrom<WallLines> for WallGrid {
    type Error = MazeError;

    fn try_from(lines: WallLines) -> Result<Self> {
        WallGrid::new(lines.rows, lines.cols)
    }
}

impl WallGrid {
    pub fn new(rows: Vec<usize>, cols: Vec<usize>) -> Result<Self> {
        check_axis(&rows, Axis::Rows)?;
        check_axis(&cols, Axis::Columns)?;
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Number of cell rows between the horizontal walls
    pub fn height(&self) -> usize {
        self.rows.len() - 1
    }

    /// Number of cell columns between the vertical walls
    pub fn width(&self) -> usize {
        self.cols.len() - 1
    }
}

fn check_axis(coords: &[usize], axis: Axis) -> Result<()> {
    if coords.len() < 2 {
        return Err(MazeError::MalformedInput {
            axis,
            found: coords.len(),
            threshold: None,
        });
    }
    if coords.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(MazeError::UnorderedWalls { axis });
    }
    Ok(())
}

/// Number of black pixels in every row of the image
pub fn black_pixels_per_row(img: &RgbImage) -> Vec<usize> {
    let mut counts = vec![0; img.height() as usize];
    for (_, y, pixel) in img.enumerate_pixels() {
        if is_black(pixel) {
            counts[y as usize] += 1;
        }
    }
    counts
}

/// Number of black pixels in every column of the image
pub fn black_pixels_per_col(img: &RgbImage) -> Vec<usize> {
    let mut counts = vec![0; img.width() as usize];
    for (x, _, pixel) in img.enumerate_pixels() {
        if is_black(pixel) {
            counts[x as usize] += 1;
        }
    }
    counts
}

fn dense_lines(counts: &[usize], threshold: f64) -> Vec<usize> {
    counts
        .iter()
        .enumerate()
        .filter(|(_, &amount)| amount as f64 > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Finds the wall grid of a cropped, binarized maze picture.
///
/// A row is a wall line when its black pixel count exceeds `density` times the
/// image width, a column when its count exceeds `density` times the height.
/// The density is a heuristic: a maze crafted so that its open lines are
/// dense enough will fool it.
pub fn find_walls(img: &RgbImage, density: f64) -> Result<WallGrid> {
    let (width, height) = img.dimensions();

    let row_threshold = width as f64 * density;
    let rows = dense_lines(&black_pixels_per_row(img), row_threshold);
    if rows.len() < 2 {
        return Err(MazeError::MalformedInput {
            axis: Axis::Rows,
            found: rows.len(),
            threshold: Some(row_threshold),
        });
    }

    let col_threshold = height as f64 * density;
    let cols = dense_lines(&black_pixels_per_col(img), col_threshold);
    if cols.len() < 2 {
        return Err(MazeError::MalformedInput {
            axis: Axis::Columns,
            found: cols.len(),
            threshold: Some(col_threshold),
        });
    }

    info!(
        "Detected {} wall rows and {} wall columns",
        rows.len(),
        cols.len()
    );
    debug!("wall rows: {:?}", rows);
    debug!("wall columns: {:?}", cols);

    Ok(WallGrid { rows, cols })
}
