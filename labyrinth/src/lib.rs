//! Reconstructs the cell grid of a rendered rectangular maze and solves it by
//! repeatedly eliminating dead ends.
//!
//! The pipeline runs strictly forward:
//! binarize → strip white border → detect wall lines → build cells →
//! eliminate dead ends (start/finish protected) → clear markers →
//! eliminate again → anything left over is a cycle.

pub mod config;
pub mod error;
pub mod grid;
pub mod pixels;
pub mod solve;
pub mod util;
pub mod walls;

#[cfg(test)]
mod fixtures;

use image::RgbImage;
use log::info;
use serde::Serialize;

pub use config::Config;
pub use error::{MazeError, Result};
pub use grid::{build_maze, Cell, Direction, MazeGrid, Point};
pub use pixels::Border;
pub use solve::{DeadEndEliminator, EliminationReport, EliminationState, RoundReport};
pub use walls::{find_walls, Axis, WallGrid};

/// Intermediate pictures produced before the maze grid exists
pub struct Preprocessed {
    pub binarized: RgbImage,
    pub border: Border,
    pub cropped: RgbImage,
}

/// Thresholds the picture and strips its white margin.
pub fn preprocess(img: &RgbImage, config: &Config) -> Preprocessed {
    let binarized = pixels::binarize(img, config.binarize_threshold);
    let border = pixels::find_white_border(&binarized);
    info!("White border detected: {}", border);
    let cropped = pixels::crop_border(&binarized, &border);

    Preprocessed {
        binarized,
        border,
        cropped,
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Solution {
    pub border: Border,
    pub walls: WallGrid,
    /// The grid after the first pass: only the path between special cells is left
    pub solved: MazeGrid,
    /// The grid after the second pass: only cycles are left
    pub residual: MazeGrid,
    pub first_pass: EliminationReport,
    pub second_pass: EliminationReport,
    pub has_cycle: bool,
}

impl Solution {
    /// Cells on the solution path, in row-major order
    pub fn path(&self) -> Vec<Point> {
        self.solved.open_cells()
    }

    pub fn cycle_cells(&self) -> Vec<Point> {
        solve::cycle_cells(&self.residual)
    }
}

/// Runs the grid reconstruction and both solver passes on preprocessed pictures.
pub fn solve_preprocessed(pre: &Preprocessed, config: &Config) -> Result<Solution> {
    let walls = find_walls(&pre.cropped, config.wall_density)?;
    let mut maze = build_maze(&pre.cropped, &walls, config.strict_adjacency)?;

    let first_pass = solve::eliminate_dead_ends(&mut maze, config.count_special_as_exit);
    info!(
        "First pass: {} dead ends eliminated in {} rounds",
        first_pass.eliminated(),
        first_pass.rounds.len()
    );
    let solved = maze.clone();

    maze.clear_specials();
    let second_pass = solve::eliminate_dead_ends(&mut maze, false);
    info!(
        "Second pass: {} dead ends eliminated in {} rounds",
        second_pass.eliminated(),
        second_pass.rounds.len()
    );
    let has_cycle = solve::has_cycle(&maze);

    Ok(Solution {
        border: pre.border,
        walls,
        solved,
        residual: maze,
        first_pass,
        second_pass,
        has_cycle,
    })
}

/// Reconstructs and solves the maze shown in an RGB picture.
pub fn solve(img: &RgbImage, config: &Config) -> Result<Solution> {
    solve_preprocessed(&preprocess(img, config), config)
}
