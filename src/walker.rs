use crate::error::{LightningError, Result};
use crate::grid::Grid;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Displacement for each direction code
const OFFSETS: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
];

/// One of the 8 lattice moves, in sampling-code order.
/// Screen coordinates: y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
    South,
    North,
    SouthEast,
    NorthWest,
    SouthWest,
    NorthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
        Direction::SouthEast,
        Direction::NorthWest,
        Direction::SouthWest,
        Direction::NorthEast,
    ];

    /// Map a raw sample to a direction, rejecting anything outside 0..=7
    pub fn from_sample(sample: u32) -> Result<Self> {
        Self::ALL
            .get(sample as usize)
            .copied()
            .ok_or(LightningError::InvalidDirectionSample(sample))
    }

    pub fn code(self) -> usize {
        self as usize
    }

    pub fn offset(self) -> (i64, i64) {
        OFFSETS[self.code()]
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Direction::East => "E",
            Direction::West => "W",
            Direction::South => "S",
            Direction::North => "N",
            Direction::SouthEast => "SE",
            Direction::NorthWest => "NW",
            Direction::SouthWest => "SW",
            Direction::NorthEast => "NE",
        }
    }
}

/// How many times each direction was drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectionTally {
    counts: [u64; 8],
}

impl DirectionTally {
    pub fn record(&mut self, direction: Direction) {
        self.counts[direction.code()] += 1;
    }

    pub fn count(&self, direction: Direction) -> u64 {
        self.counts[direction.code()]
    }

    pub fn counts(&self) -> &[u64; 8] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Source of raw direction codes.
///
/// Implementations should yield values in 0..=7; anything else is turned into
/// `InvalidDirectionSample` by `next_direction`.
pub trait DirectionSource {
    fn sample(&mut self) -> u32;

    fn next_direction(&mut self) -> Result<Direction> {
        Direction::from_sample(self.sample())
    }
}

/// Uniform sampler over the 8 direction codes
pub struct RandomDirections<R: Rng> {
    rng: R,
    dist: Uniform<u32>,
}

impl<R: Rng> RandomDirections<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            dist: Uniform::new(0, 8),
        }
    }
}

impl RandomDirections<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> DirectionSource for RandomDirections<R> {
    fn sample(&mut self) -> u32 {
        self.dist.sample(&mut self.rng)
    }
}

/// Result of probing the walker's surroundings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Walking,
    Stuck,
}

/// The single active particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walker {
    x: i64,
    y: i64,
}

impl Walker {
    pub fn spawn(grid: &Grid) -> Self {
        let c = grid.center() as i64;
        Self { x: c, y: c }
    }

    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    pub fn is_at_center(&self, grid: &Grid) -> bool {
        let c = grid.center() as i64;
        self.x == c && self.y == c
    }

    pub fn probe(&self, grid: &Grid) -> WalkState {
        if grid.has_filled_neighbor(self.x, self.y) {
            WalkState::Stuck
        } else {
            WalkState::Walking
        }
    }

    pub fn advance(&mut self, direction: Direction) {
        let (dx, dy) = direction.offset();
        self.x += dx;
        self.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_table() {
        let expected = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (-1, -1),
            (-1, 1),
            (1, -1),
        ];
        for (code, offset) in expected.iter().enumerate() {
            let dir = Direction::from_sample(code as u32).unwrap();
            assert_eq!(dir.code(), code);
            assert_eq!(dir.offset(), *offset);
        }
    }

    #[test]
    fn test_out_of_range_sample_rejected() {
        assert!(matches!(
            Direction::from_sample(8),
            Err(LightningError::InvalidDirectionSample(8))
        ));
        assert!(Direction::from_sample(u32::MAX).is_err());
    }

    #[test]
    fn test_broken_source_surfaces_error() {
        struct Broken;
        impl DirectionSource for Broken {
            fn sample(&mut self) -> u32 {
                9
            }
        }
        assert!(matches!(
            Broken.next_direction(),
            Err(LightningError::InvalidDirectionSample(9))
        ));
    }

    #[test]
    fn test_random_directions_cover_all_codes() {
        let mut source = RandomDirections::seeded(7);
        let mut tally = DirectionTally::default();
        for _ in 0..4000 {
            tally.record(source.next_direction().unwrap());
        }
        assert_eq!(tally.total(), 4000);
        for dir in Direction::ALL {
            assert!(tally.count(dir) > 300, "{:?} drawn {} times", dir, tally.count(dir));
        }
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = RandomDirections::seeded(42);
        let mut b = RandomDirections::seeded(42);
        let first: Vec<u32> = (0..64).map(|_| a.sample()).collect();
        let second: Vec<u32> = (0..64).map(|_| b.sample()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_walker_probe_and_advance() {
        let grid = Grid::new(7).unwrap();
        let mut walker = Walker::spawn(&grid);
        assert_eq!(walker.position(), (3, 3));
        assert!(walker.is_at_center(&grid));
        assert_eq!(walker.probe(&grid), WalkState::Walking);

        walker.advance(Direction::East);
        assert_eq!(walker.position(), (4, 3));
        assert_eq!(walker.probe(&grid), WalkState::Stuck);

        walker.advance(Direction::NorthWest);
        assert_eq!(walker.position(), (3, 2));
        assert!(!walker.is_at_center(&grid));
    }
}
