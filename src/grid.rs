use crate::error::{LightningError, Result};

/// Smallest accepted size (forced up to a side of 3)
pub const MIN_SIZE: u32 = 2;
/// Largest accepted size (forced up to a side of 16385)
pub const MAX_SIZE: u32 = 16384;

/// Share of the half-side covered by the empty disc
const DISC_RATIO: f64 = 0.95;

/// Moore neighbourhood used for the sticking test
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    /// Walkable background inside the disc
    #[default]
    Empty,
    /// Part of the frozen aggregate
    Filled,
}

/// Square canvas holding the aggregate.
///
/// The side is always odd so the grid has a single center cell. Cells closer
/// to the center than `radius` start empty, everything else starts filled.
#[derive(Debug, Clone)]
pub struct Grid {
    side: u32,
    center: u32,
    radius: u32,
    cells: Vec<CellState>,
    filled: usize,
}

impl Grid {
    pub fn new(size: u32) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(LightningError::InvalidSize(size));
        }
        let side = if size % 2 == 0 { size + 1 } else { size };
        let center = (side - 1) / 2;
        let radius = ((side / 2) as f64 * DISC_RATIO) as u32;
        let radius_sq = radius as i64 * radius as i64;

        let mut cells = Vec::with_capacity(side as usize * side as usize);
        let mut filled = 0;
        for y in 0..side as i64 {
            for x in 0..side as i64 {
                let dx = x - center as i64;
                let dy = y - center as i64;
                if dx * dx + dy * dy < radius_sq {
                    cells.push(CellState::Empty);
                } else {
                    cells.push(CellState::Filled);
                    filled += 1;
                }
            }
        }

        Ok(Self {
            side,
            center,
            radius,
            cells,
            filled,
        })
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    /// Center coordinate, shared by both axes
    pub fn center(&self) -> u32 {
        self.center
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Number of filled cells, seed ring included
    pub fn filled_count(&self) -> usize {
        self.filled
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        let side = self.side as i64;
        (0..side).contains(&x) && (0..side).contains(&y)
    }

    fn index(&self, x: i64, y: i64) -> Result<usize> {
        if self.contains(x, y) {
            Ok(y as usize * self.side as usize + x as usize)
        } else {
            Err(LightningError::OutOfBounds {
                x,
                y,
                side: self.side,
            })
        }
    }

    pub fn get(&self, x: i64, y: i64) -> Result<CellState> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Off-grid coordinates read as empty
    pub fn is_filled(&self, x: i64, y: i64) -> bool {
        matches!(self.get(x, y), Ok(CellState::Filled))
    }

    /// Mark a cell as filled. Returns false if it already was.
    pub fn set_filled(&mut self, x: i64, y: i64) -> Result<bool> {
        let idx = self.index(x, y)?;
        if self.cells[idx] == CellState::Filled {
            return Ok(false);
        }
        self.cells[idx] = CellState::Filled;
        self.filled += 1;
        Ok(true)
    }

    /// True if any of the 8 surrounding cells is filled
    pub fn has_filled_neighbor(&self, x: i64, y: i64) -> bool {
        NEIGHBOR_OFFSETS
            .iter()
            .any(|&(dx, dy)| self.is_filled(x + dx, y + dy))
    }

    /// Iterate over every cell in row-major order as (x, y, state)
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, CellState)> + '_ {
        let side = self.side as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &state)| ((idx % side) as u32, (idx / side) as u32, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_cells(grid: &Grid) -> Vec<(u32, u32)> {
        grid.cells()
            .filter(|&(_, _, state)| state == CellState::Empty)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_side_is_forced_odd() {
        for size in [3, 5, 7, 99, 1001] {
            assert_eq!(Grid::new(size).unwrap().side(), size);
        }
        for size in [2, 4, 10, 1000] {
            assert_eq!(Grid::new(size).unwrap().side(), size + 1);
        }
    }

    #[test]
    fn test_unusable_sizes_rejected() {
        assert!(matches!(Grid::new(0), Err(LightningError::InvalidSize(0))));
        assert!(matches!(Grid::new(1), Err(LightningError::InvalidSize(1))));
        assert!(matches!(
            Grid::new(MAX_SIZE + 1),
            Err(LightningError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_initial_disc_matches_distance_rule() {
        for size in [5, 7, 21, 64] {
            let grid = Grid::new(size).unwrap();
            let c = grid.center() as i64;
            let r = grid.radius() as i64;
            for (x, y, _) in grid.cells() {
                let dx = x as i64 - c;
                let dy = y as i64 - c;
                assert_eq!(
                    grid.is_filled(x as i64, y as i64),
                    dx * dx + dy * dy >= r * r,
                    "cell ({}, {}) of side {}",
                    x,
                    y,
                    grid.side()
                );
            }
        }
    }

    #[test]
    fn test_side_five_only_center_empty() {
        let grid = Grid::new(5).unwrap();
        assert_eq!(grid.center(), 2);
        assert_eq!(grid.radius(), 1);
        assert_eq!(empty_cells(&grid), vec![(2, 2)]);
        assert_eq!(grid.filled_count(), 24);
    }

    #[test]
    fn test_side_seven_membership() {
        let grid = Grid::new(7).unwrap();
        assert_eq!(grid.center(), 3);
        assert_eq!(grid.radius(), 2);

        // dist² of 1 and 2 are inside, dist² of 4 is not
        let mut expected = Vec::new();
        for y in 2..=4 {
            for x in 2..=4 {
                expected.push((x, y));
            }
        }
        assert_eq!(empty_cells(&grid), expected);
        assert!(grid.is_filled(1, 3));
        assert!(grid.is_filled(3, 5));
    }

    #[test]
    fn test_set_filled_is_idempotent() {
        let mut grid = Grid::new(21).unwrap();
        let c = grid.center() as i64;
        let before = grid.filled_count();

        assert!(grid.set_filled(c + 1, c).unwrap());
        let once = grid.clone();
        assert!(!grid.set_filled(c + 1, c).unwrap());

        assert_eq!(grid.filled_count(), before + 1);
        assert_eq!(grid.filled_count(), once.filled_count());
        assert_eq!(grid.get(c + 1, c).unwrap(), CellState::Filled);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut grid = Grid::new(7).unwrap();
        assert!(matches!(
            grid.get(-1, 0),
            Err(LightningError::OutOfBounds { x: -1, y: 0, side: 7 })
        ));
        assert!(grid.get(0, 7).is_err());
        assert!(grid.set_filled(7, 7).is_err());
        assert!(!grid.is_filled(-1, -1));
        assert!(!grid.is_filled(100, 3));
    }

    #[test]
    fn test_neighbor_check_reads_off_grid_as_empty() {
        let grid = Grid::new(7).unwrap();
        assert!(!grid.has_filled_neighbor(3, 3));
        assert!(grid.has_filled_neighbor(4, 3));
        // (0, 0) is the only on-grid neighbour here
        assert!(grid.has_filled_neighbor(-1, -1));
        assert!(!grid.has_filled_neighbor(-5, 20));
    }
}
