use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grid::{MazeGrid, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationState {
    Eliminating,
    Done,
}

impl EliminationState {
    pub fn is_done(&self) -> bool {
        matches!(self, EliminationState::Done)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// 1-based round number
    pub round: usize,
    /// Dead ends processed during this round
    pub eliminated: usize,
    /// Exits left in the whole grid once the round is over
    pub remaining_exits: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationReport {
    pub rounds: Vec<RoundReport>,
}

impl EliminationReport {
    pub fn eliminated(&self) -> usize {
        self.rounds.iter().map(|round| round.eliminated).sum()
    }
}

/// Removes dead ends (cells with exactly one exit) from a maze until none are left.
///
/// Every round closes all open connections of the dead ends found so far, on
/// both sides of each border. Neighbors that are left with a single exit
/// become the dead ends of the next round. Connections only ever close, so
/// the process always reaches a fixed point.
///
/// With `count_special` set, special cells count one extra exit and therefore
/// survive with a single connection: what remains is the path between them.
#[derive(Debug)]
pub struct DeadEndEliminator {
    count_special: bool,
    queue: VecDeque<usize>,
    remaining_exits: usize,
    rounds: Vec<RoundReport>,
    state: EliminationState,
}

impl DeadEndEliminator {
    pub fn new(maze: &MazeGrid, count_special: bool) -> Self {
        let queue: VecDeque<usize> = (0..maze.cells().len())
            .filter(|&index| maze.cell(index).exits(count_special) == 1)
            .collect();

        let state = if queue.is_empty() {
            EliminationState::Done
        } else {
            EliminationState::Eliminating
        };

        Self {
            count_special,
            queue,
            remaining_exits: maze.total_exits(count_special),
            rounds: Vec::new(),
            state,
        }
    }

    pub fn finish(mut self, maze: &mut MazeGrid) -> EliminationReport {
        while !self.step(maze).is_done() {}

        EliminationReport {
            rounds: self.rounds,
        }
    }

    /// Processes every dead end queued so far, one round.
    pub fn step(&mut self, maze: &mut MazeGrid) -> EliminationState {
        if self.state.is_done() {
            return self.state;
        }

        let round = std::mem::take(&mut self.queue);
        for &index in &round {
            let cell = maze.cell(index);
            for direction in cell.open_directions() {
                self.remaining_exits -= 1;

                if let Some(neighbor) = maze.disconnect(index, direction) {
                    self.remaining_exits -= 1;

                    if maze.cell(neighbor).exits(self.count_special) == 1 {
                        self.queue.push_back(neighbor);
                    }
                }
            }
        }

        let report = RoundReport {
            round: self.rounds.len() + 1,
            eliminated: round.len(),
            remaining_exits: self.remaining_exits,
        };
        debug!(
            "Round {}: eliminated {} dead ends, {} exits left",
            report.round, report.eliminated, report.remaining_exits
        );
        self.rounds.push(report);

        if self.queue.is_empty() {
            self.state = EliminationState::Done;
        }

        self.state
    }

    pub fn state(&self) -> EliminationState {
        self.state
    }

    /// Dead ends waiting for the next round
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn rounds(&self) -> &[RoundReport] {
        &self.rounds
    }
}

/// Runs the eliminator on `maze` until no dead end is left.
pub fn eliminate_dead_ends(maze: &mut MazeGrid, count_special: bool) -> EliminationReport {
    DeadEndEliminator::new(maze, count_special).finish(maze)
}

/// Whether any cell of an eliminated maze still has an open connection.
///
/// After special markers are cleared and dead ends are eliminated, only cells
/// on a closed loop can keep connections.
pub fn has_cycle(maze: &MazeGrid) -> bool {
    maze.cells().iter().any(|cell| cell.exits(false) > 0)
}

/// Cells that still have open connections, i.e. the loops left after elimination
pub fn cycle_cells(maze: &MazeGrid) -> Vec<Point> {
    maze.open_cells()
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::fixtures::{grid_from_openings, p, perfect_maze_openings, perfect_maze_path};
    use crate::grid::{Cell, Direction};

    fn perfect_maze() -> MazeGrid {
        grid_from_openings(3, 3, &perfect_maze_openings(), &[p(1, 0), p(2, 2)])
    }

    fn maze_with_loop() -> MazeGrid {
        let mut openings = perfect_maze_openings();
        // closes (1,0)-(0,0)-(0,1)-(0,2)-(1,2)-(1,1)-(1,0)
        openings.push((p(1, 0), Direction::Right));
        grid_from_openings(3, 3, &openings, &[p(1, 0), p(2, 2)])
    }

    #[test]
    fn test_first_pass_keeps_path() {
        let mut maze = perfect_maze();

        let report = eliminate_dead_ends(&mut maze, true);

        assert_eq!(maze.open_cells(), perfect_maze_path());
        // (2,0), then (2,1), then (1,1)
        assert_eq!(report.rounds.len(), 3);
        assert_eq!(report.eliminated(), 3);
        assert!(maze.get(p(1, 0)).special);
        assert_eq!(maze.get(p(1, 0)).exits(true), 2);
        assert_eq!(maze.get(p(0, 1)).exits(true), 2);
    }

    #[test]
    fn test_second_pass_collapses_perfect_maze() {
        let mut maze = perfect_maze();
        eliminate_dead_ends(&mut maze, true);

        assert_eq!(maze.clear_specials(), 2);
        eliminate_dead_ends(&mut maze, false);

        assert_eq!(maze.total_exits(true), 0);
        assert!(!has_cycle(&maze));
        assert!(cycle_cells(&maze).is_empty());
    }

    #[test]
    fn test_loop_survives_second_pass() {
        let mut maze = maze_with_loop();
        eliminate_dead_ends(&mut maze, true);
        maze.clear_specials();
        eliminate_dead_ends(&mut maze, false);

        assert!(has_cycle(&maze));
        assert_eq!(
            cycle_cells(&maze),
            vec![p(0, 0), p(0, 1), p(0, 2), p(1, 0), p(1, 1), p(1, 2)]
        );
        for point in cycle_cells(&maze) {
            assert!(maze.get(point).exits(false) >= 2);
        }
    }

    #[test]
    fn test_pure_loop_has_no_dead_ends() {
        let mut maze = grid_from_openings(
            2,
            2,
            &[
                (p(0, 0), Direction::Right),
                (p(0, 0), Direction::Down),
                (p(1, 1), Direction::Up),
                (p(1, 1), Direction::Left),
            ],
            &[],
        );

        let eliminator = DeadEndEliminator::new(&maze, false);
        assert!(eliminator.state().is_done());

        let report = eliminator.finish(&mut maze);
        assert!(report.rounds.is_empty());
        assert_eq!(maze.total_exits(false), 8);
        assert!(has_cycle(&maze));
    }

    #[test]
    fn test_closed_single_cell_is_terminal() {
        let mut maze = MazeGrid::new(1, 1, Cell::closed());

        let eliminator = DeadEndEliminator::new(&maze, true);
        assert_eq!(eliminator.pending(), 0);

        let report = eliminator.finish(&mut maze);
        assert!(report.rounds.is_empty());
        assert!(!has_cycle(&maze));
    }

    #[test]
    fn test_special_without_connections_is_a_dead_end() {
        let mut maze = MazeGrid::new(1, 1, Cell::closed().with_special());

        let report = eliminate_dead_ends(&mut maze, true);

        assert_eq!(report.rounds.len(), 1);
        assert!(maze.get(p(0, 0)).special);
        assert_eq!(maze.total_exits(false), 0);
    }

    #[test]
    fn test_perimeter_opening_is_closed_with_its_dead_end() {
        // a corridor leaving the grid through the left wall of (0,0)
        let mut maze = grid_from_openings(
            1,
            2,
            &[(p(0, 0), Direction::Left), (p(0, 0), Direction::Right)],
            &[],
        );

        eliminate_dead_ends(&mut maze, false);

        assert_eq!(maze.total_exits(false), 0);
    }

    #[test]
    fn test_rounds_are_monotonic() {
        let mut maze = maze_with_loop();
        maze.clear_specials();

        let mut eliminator = DeadEndEliminator::new(&maze, false);
        let mut previous = maze.clone();

        loop {
            let state = eliminator.step(&mut maze);

            for (before, after) in previous.cells().iter().zip(maze.cells()) {
                for direction in Direction::ALL {
                    // connections never reopen
                    assert!(before.is_open(direction) || !after.is_open(direction));
                }
            }
            let exits = maze.total_exits(false);
            assert!(exits <= previous.total_exits(false));
            assert_eq!(eliminator.rounds().last().unwrap().remaining_exits, exits);

            if state.is_done() {
                break;
            }
            previous = maze.clone();
        }

        assert_eq!(eliminator.rounds().len(), 2);
    }
}
