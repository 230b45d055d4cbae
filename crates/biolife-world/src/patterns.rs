//! Named starting patterns and random seeding.

use crate::grid::Grid;
use biolife_core::{CellKind, Error, Position, Result, SeedConfig};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

pub struct Pattern {
    pub name: &'static str,
    /// Live cells relative to the pattern's top-left corner
    pub cells: &'static [(usize, usize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "block",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
    },
    Pattern {
        name: "blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "glider",
        cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
    },
];

/// Look up a pattern by name, ignoring case
pub fn find(name: &str) -> Result<&'static Pattern> {
    PATTERNS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownPattern(name.to_string()))
}

impl Pattern {
    /// (rows, cols) of the pattern's bounding box
    pub fn extent(&self) -> (usize, usize) {
        let rows = self.cells.iter().map(|&(r, _)| r + 1).max().unwrap_or(0);
        let cols = self.cells.iter().map(|&(_, c)| c + 1).max().unwrap_or(0);
        (rows, cols)
    }

    /// Place this pattern's cells as fresh `kind` cells with `origin` as the
    /// top-left corner.
    ///
    /// The bounding box is checked first; on error the grid is unchanged.
    pub fn stamp(&self, grid: &mut Grid, origin: Position, kind: CellKind) -> Result<()> {
        let dims = grid.dimensions();
        let target = |r: usize, c: usize| {
            origin.offset(r, c).ok_or(Error::OutOfBounds {
                row: origin.row.saturating_add(r),
                col: origin.col.saturating_add(c),
                rows: dims.rows(),
                cols: dims.cols(),
            })
        };

        let (rows, cols) = self.extent();
        if rows > 0 && cols > 0 {
            dims.index_of(target(rows - 1, cols - 1)?)?;
        }

        for &(r, c) in self.cells {
            grid.place_cell(target(r, c)?, kind, true)?;
        }
        Ok(())
    }
}

/// Randomly populate the grid. Each cell rolls once against the wall, plant
/// and animal densities in that order; cells that miss all three are left as
/// they are. Returns the number of cells placed.
pub fn seed_random(grid: &mut Grid, config: &SeedConfig, rng: &mut ChaCha8Rng) -> Result<usize> {
    let wall_cutoff = config.wall_density;
    let plant_cutoff = wall_cutoff + config.plant_density;
    let animal_cutoff = plant_cutoff + config.animal_density;

    let positions: Vec<Position> = grid.dimensions().positions().collect();
    let mut placed = 0;
    for pos in positions {
        let roll = rng.gen::<f32>();

        let kind = if roll < wall_cutoff {
            CellKind::Wall
        } else if roll < plant_cutoff {
            CellKind::Plant
        } else if roll < animal_cutoff {
            CellKind::Animal
        } else {
            continue;
        };

        grid.place_cell(pos, kind, true)?;
        placed += 1;
    }

    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_find_pattern() {
        assert_eq!(find("Glider").unwrap().name, "glider");
        assert_eq!(find("BLOCK").unwrap().cells.len(), 4);
        assert!(matches!(find("spaceship"), Err(Error::UnknownPattern(_))));
    }

    #[test]
    fn test_extent() {
        assert_eq!(find("blinker").unwrap().extent(), (1, 3));
        assert_eq!(find("beacon").unwrap().extent(), (4, 4));
    }

    #[test]
    fn test_stamp() {
        let mut grid = Grid::new(6, 6).unwrap();
        find("glider")
            .unwrap()
            .stamp(&mut grid, Position::new(1, 2), CellKind::Animal)
            .unwrap();

        assert_eq!(grid.census().living(), 5);
        assert!(grid.is_alive((1, 3)).unwrap());
        assert!(grid.is_alive((3, 2)).unwrap());
    }

    #[test]
    fn test_stamp_out_of_bounds_leaves_grid_unchanged() {
        let mut grid = Grid::new(4, 4).unwrap();
        let result = find("beacon")
            .unwrap()
            .stamp(&mut grid, Position::new(1, 1), CellKind::Plant);

        assert!(matches!(result, Err(Error::OutOfBounds { .. })));
        assert_eq!(grid.census().living(), 0);
        assert_eq!(grid.census().plants.total, 0);
    }

    #[test]
    fn test_stamp_rejects_overflowing_origin() {
        let mut grid = Grid::new(4, 4).unwrap();
        let glider = find("glider").unwrap();

        let result = glider.stamp(&mut grid, Position::new(0, usize::MAX), CellKind::Animal);
        assert!(matches!(
            result,
            Err(Error::OutOfBounds { col: usize::MAX, rows: 4, cols: 4, .. })
        ));

        let result = glider.stamp(&mut grid, Position::new(usize::MAX - 1, 0), CellKind::Animal);
        assert!(matches!(result, Err(Error::OutOfBounds { .. })));
        assert_eq!(grid.census().living(), 0);
    }

    #[test]
    fn test_stamped_patterns_behave() {
        let mut grid = Grid::new(6, 6).unwrap();
        find("toad")
            .unwrap()
            .stamp(&mut grid, Position::new(2, 1), CellKind::Animal)
            .unwrap();
        let start = grid.state_hash();

        grid.advance_generation();
        assert_ne!(grid.state_hash(), start);
        grid.advance_generation();
        assert_eq!(grid.state_hash(), start);
    }

    #[test]
    fn test_seed_random_is_reproducible() {
        let config = SeedConfig {
            seed: 7,
            animal_density: 0.3,
            plant_density: 0.1,
            wall_density: 0.05,
        };

        let mut a = Grid::new(20, 20).unwrap();
        let mut b = Grid::new(20, 20).unwrap();
        let placed_a = seed_random(&mut a, &config, &mut ChaCha8Rng::seed_from_u64(config.seed)).unwrap();
        let placed_b = seed_random(&mut b, &config, &mut ChaCha8Rng::seed_from_u64(config.seed)).unwrap();

        assert_eq!(placed_a, placed_b);
        assert_eq!(a.state_hash(), b.state_hash());

        let census = a.census();
        assert!(census.animals.living > 0);
        assert!(census.plants.living > 0);
        assert!(census.walls.total > 0);
        assert_eq!(census.walls.living, 0);
    }

    #[test]
    fn test_seed_random_empty_config() {
        let mut grid = Grid::new(5, 5).unwrap();
        let placed = seed_random(&mut grid, &SeedConfig::default(), &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(placed, 0);
        assert_eq!(grid.census().living(), 0);
    }
}
