//! Rejection-sampling placement of apples and obstacles onto free cells.

use rand::Rng;
use std::collections::HashSet;

use super::grid::Grid;
use super::state::Position;

/// Pick a uniformly random cell that is not in `exclude`.
///
/// Samples the whole grid and rejects occupied cells, giving up after
/// `attempts` samples. A full or nearly full grid therefore yields `None`.
pub fn place_random<R: Rng + ?Sized>(
    rng: &mut R,
    grid: &Grid,
    exclude: &HashSet<Position>,
    attempts: usize,
) -> Option<Position> {
    for _ in 0..attempts {
        let x = rng.gen_range(0..grid.cols) as i32;
        let y = rng.gen_range(0..grid.rows) as i32;
        let pos = Position::new(x, y);

        if !exclude.contains(&pos) {
            return Some(pos);
        }
    }

    tracing::warn!(
        attempts,
        occupied = exclude.len(),
        "No free cell found for placement"
    );
    None
}

/// Place up to `count` obstacles, each avoiding `occupied` and the ones before it
pub fn place_obstacles<R: Rng + ?Sized>(
    rng: &mut R,
    grid: &Grid,
    occupied: &HashSet<Position>,
    count: usize,
    attempts: usize,
) -> Vec<Position> {
    let mut exclude = occupied.clone();
    let mut obstacles = Vec::with_capacity(count);

    for _ in 0..count {
        if let Some(pos) = place_random(rng, grid, &exclude, attempts) {
            exclude.insert(pos);
            obstacles.push(pos);
        }
    }

    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const RNG_SEED: u64 = 0x5EED_CAFE;

    #[test]
    fn test_never_returns_excluded_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
        let grid = Grid::new(8, 6);

        // Exclude every cell on even columns
        let exclude: HashSet<Position> = (0..8)
            .step_by(2)
            .flat_map(|x| (0..6).map(move |y| Position::new(x, y)))
            .collect();

        for _ in 0..1000 {
            let pos = place_random(&mut rng, &grid, &exclude, 500).unwrap();
            assert!(grid.contains(pos));
            assert!(!exclude.contains(&pos));
        }
    }

    #[test]
    fn test_full_grid_gives_up() {
        let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
        let grid = Grid::new(3, 3);
        let exclude: HashSet<Position> = (0..3)
            .flat_map(|x| (0..3).map(move |y| Position::new(x, y)))
            .collect();

        assert_eq!(place_random(&mut rng, &grid, &exclude, 500), None);
    }

    #[test]
    fn test_single_free_cell_is_found() {
        let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
        let grid = Grid::new(3, 3);
        let exclude: HashSet<Position> = (0..3)
            .flat_map(|x| (0..3).map(move |y| Position::new(x, y)))
            .filter(|&p| p != Position::new(1, 2))
            .collect();

        assert_eq!(
            place_random(&mut rng, &grid, &exclude, 500),
            Some(Position::new(1, 2))
        );
    }

    #[test]
    fn test_obstacles_are_distinct_and_free() {
        let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
        let grid = Grid::new(10, 10);
        let occupied: HashSet<Position> = (0..5).map(|x| Position::new(x, 5)).collect();

        let obstacles = place_obstacles(&mut rng, &grid, &occupied, 20, 500);

        assert_eq!(obstacles.len(), 20);
        let unique: HashSet<Position> = obstacles.iter().copied().collect();
        assert_eq!(unique.len(), 20);
        assert!(obstacles.iter().all(|p| !occupied.contains(p)));
    }

    #[test]
    fn test_obstacles_stop_when_grid_is_full() {
        let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
        let grid = Grid::new(2, 2);

        let obstacles = place_obstacles(&mut rng, &grid, &HashSet::new(), 10, 500);
        assert_eq!(obstacles.len(), 4);
    }
}
