//! Continuous-position scene built from the discrete game state.
//!
//! The simulation only knows whole cells plus `move_progress`. This module
//! turns that into smooth positions on the drawing surface, so motion looks
//! continuous regardless of how often discrete steps happen.

use crate::game::{GameState, Grid, ParticlePool, Phase, Point, Snake, Surface, Tuning};

/// Fraction of a cell covered by the head segment
const HEAD_SIZE: f64 = 0.8;
/// How much smaller the last segment is than the head, as a fraction of a cell
const TAPER: f64 = 0.45;
const HEAD_OUTLINE: f64 = 0.7;
const OBSTACLE_SIZE: f64 = 0.8;
const APPLE_RADIUS: f64 = 0.33;
const APPLE_PULSE: f64 = 0.08;
/// Spacing of the diagonal backdrop lines, in cells
const DIAGONAL_GAP: f64 = 3.2;

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSprite {
    pub center: Point,
    /// Side length in pixels
    pub size: f64,
    /// Glow strength after fading along the body
    pub glow: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppleSprite {
    pub center: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSprite {
    pub center: Point,
    pub radius: f64,
    pub alpha: f64,
}

/// Straight line between two surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSprite {
    pub from: Point,
    pub to: Point,
}

/// Everything needed to draw one frame, in surface pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub surface: Surface,
    pub cell_size: f64,
    /// Faint lines along every cell boundary of the board
    pub grid_lines: Vec<LineSprite>,
    /// 45 degree accent lines behind the board
    pub diagonals: Vec<LineSprite>,
    /// Snake segments, head first
    pub segments: Vec<SegmentSprite>,
    pub head_outline: SegmentSprite,
    /// Obstacle centers; every obstacle is `obstacle_size` wide
    pub obstacles: Vec<Point>,
    pub obstacle_size: f64,
    pub apple: Option<AppleSprite>,
    pub particles: Vec<ParticleSprite>,
    pub glow: f64,
    pub score: u32,
    pub multiplier: u32,
    pub phase: Phase,
}

impl Scene {
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

/// Interpolated position of every segment in cell units, head first.
///
/// The head slides from its previous cell toward its current one; every other
/// segment slides toward the segment ahead of it. `move_progress` is the
/// interpolation factor.
pub fn interpolate_snake(snake: &Snake, grid: &Grid) -> Vec<Point> {
    let t = snake.move_progress.clamp(0.0, 1.0);
    let (dx, dy) = snake.direction.delta();

    snake
        .body
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let (ox, oy) = if i == 0 {
                (-(dx as f64) * (1.0 - t), -(dy as f64) * (1.0 - t))
            } else {
                let (px, py) = grid.toroidal_delta(*segment, snake.body[i - 1]);
                (px as f64 * t, py as f64 * t)
            };
            Point::new(segment.x as f64 + ox, segment.y as f64 + oy)
        })
        .collect()
}

/// Advance particles by `dt` and compose the frame.
///
/// Game state is only read; particles are the one thing a frame moves.
pub fn render_frame(
    state: &GameState,
    particles: &mut ParticlePool,
    tuning: &Tuning,
    surface: Surface,
    dt: f64,
) -> Scene {
    particles.tick(dt);
    compose(state, particles, tuning, surface)
}

/// Build the scene for the current state without advancing anything
pub fn compose(
    state: &GameState,
    particles: &ParticlePool,
    tuning: &Tuning,
    surface: Surface,
) -> Scene {
    let grid = &state.grid;
    let cell = surface.cell_size(grid);
    let glow = tuning.glow();
    let len = state.snake.body.len() as f64;

    let positions = interpolate_snake(&state.snake, grid);
    let segments: Vec<SegmentSprite> = positions
        .iter()
        .enumerate()
        .map(|(i, pos)| {
            let fade = i as f64 / len;
            SegmentSprite {
                center: cell_center(*pos, cell),
                size: cell * (HEAD_SIZE - fade * TAPER),
                glow: glow * (1.0 - fade),
                alpha: 0.18 + (1.0 - fade) * 0.5,
            }
        })
        .collect();

    let head_outline = SegmentSprite {
        center: segments[0].center,
        size: cell * HEAD_OUTLINE,
        glow,
        alpha: 0.95,
    };

    let obstacles = state
        .obstacles
        .iter()
        .map(|o| grid.to_pixel(*o, Point::ZERO, cell))
        .collect();

    let apple = state.apple.map(|apple| {
        let age = (state.elapsed - apple.spawned_at).max(0.0);
        AppleSprite {
            center: grid.to_pixel(apple.position, Point::ZERO, cell),
            radius: cell * APPLE_RADIUS * (1.0 + APPLE_PULSE * (age * 6.0).sin()),
        }
    });

    let particles = particles
        .iter()
        .map(|p| {
            let alpha = p.life.clamp(0.0, 1.0);
            ParticleSprite {
                center: grid.cells_to_pixels(p.position, cell),
                radius: (3.0 * alpha).max(1.0),
                alpha,
            }
        })
        .collect();

    let (grid_lines, diagonals) = backdrop(grid, cell);

    Scene {
        surface,
        cell_size: cell,
        grid_lines,
        diagonals,
        segments,
        head_outline,
        obstacles,
        obstacle_size: cell * OBSTACLE_SIZE,
        apple,
        particles,
        glow,
        score: state.score.points,
        multiplier: state.score.multiplier,
        phase: state.phase,
    }
}

/// Cell boundary lines and diagonal accents covering the board
fn backdrop(grid: &Grid, cell: f64) -> (Vec<LineSprite>, Vec<LineSprite>) {
    if cell <= 0.0 {
        return (Vec::new(), Vec::new());
    }
    let width = grid.cols as f64 * cell;
    let height = grid.rows as f64 * cell;

    let columns = (0..=grid.cols).map(|i| {
        let x = i as f64 * cell;
        LineSprite {
            from: Point::new(x, 0.0),
            to: Point::new(x, height),
        }
    });
    let rows = (0..=grid.rows).map(|i| {
        let y = i as f64 * cell;
        LineSprite {
            from: Point::new(0.0, y),
            to: Point::new(width, y),
        }
    });
    let grid_lines = columns.chain(rows).collect();

    let gap = DIAGONAL_GAP * cell;
    let mut diagonals = Vec::new();
    let mut x = -height;
    while x < width {
        diagonals.push(LineSprite {
            from: Point::new(x, 0.0),
            to: Point::new(x + height, height),
        });
        x += gap;
    }

    (grid_lines, diagonals)
}

fn cell_center(pos: Point, cell: f64) -> Point {
    Point::new((pos.x + 0.5) * cell, (pos.y + 0.5) * cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Apple, Direction, Particle, Position};

    fn state_with(body: &[(i32, i32)], direction: Direction, progress: f64) -> GameState {
        let mut snake = Snake::new(Position::new(body[0].0, body[0].1), direction, 1);
        snake.body = body.iter().map(|&(x, y)| Position::new(x, y)).collect();
        snake.move_progress = progress;
        GameState::new(snake, Grid::new(10, 10))
    }

    #[test]
    fn test_interpolation_at_start_of_step() {
        let state = state_with(&[(5, 5), (4, 5), (3, 5)], Direction::Right, 0.0);
        let points = interpolate_snake(&state.snake, &state.grid);

        // Head is drawn where it came from, the rest sit on their cells
        assert_eq!(points[0], Point::new(4.0, 5.0));
        assert_eq!(points[1], Point::new(4.0, 5.0));
        assert_eq!(points[2], Point::new(3.0, 5.0));
    }

    #[test]
    fn test_interpolation_halfway() {
        let state = state_with(&[(5, 5), (5, 6), (4, 6)], Direction::Up, 0.5);
        let points = interpolate_snake(&state.snake, &state.grid);

        assert_eq!(points[0], Point::new(5.0, 5.5));
        assert_eq!(points[1], Point::new(5.0, 5.5));
        assert_eq!(points[2], Point::new(4.5, 6.0));
    }

    #[test]
    fn test_interpolation_across_wrap() {
        let state = state_with(&[(0, 4), (9, 4), (8, 4)], Direction::Right, 0.5);
        let points = interpolate_snake(&state.snake, &state.grid);

        assert_eq!(points[0], Point::new(-0.5, 4.0));
        // Slides off the right edge instead of sweeping back across the board
        assert_eq!(points[1], Point::new(9.5, 4.0));
        assert_eq!(points[2], Point::new(8.5, 4.0));
    }

    #[test]
    fn test_compose_maps_to_pixels() {
        let mut state = state_with(&[(5, 5), (4, 5), (3, 5)], Direction::Right, 0.5);
        state.obstacles = vec![Position::new(1, 1)];
        state.apple = Some(Apple {
            position: Position::new(7, 2),
            spawned_at: 0.0,
        });
        let tuning = Tuning::default();

        let scene = compose(&state, &ParticlePool::new(), &tuning, Surface::new(200.0, 240.0));

        assert_eq!(scene.cell_size, 20.0);
        assert_eq!(scene.segments.len(), 3);
        assert_eq!(scene.segments[0].center, Point::new(100.0, 110.0));
        assert_eq!(scene.segments[0].size, 16.0);
        assert!(scene.segments[2].size < scene.segments[1].size);
        assert_eq!(scene.segments[0].glow, tuning.glow());
        assert!(scene.segments[2].glow < scene.segments[0].glow);
        assert_eq!(scene.head_outline.center, scene.segments[0].center);
        assert_eq!(scene.obstacles, vec![Point::new(30.0, 30.0)]);

        let apple = scene.apple.expect("apple sprite");
        assert_eq!(apple.center, Point::new(150.0, 50.0));
        assert!((apple.radius - 6.6).abs() < 1e-9);
    }

    #[test]
    fn test_compose_follows_surface_size() {
        let state = state_with(&[(5, 5), (4, 5)], Direction::Right, 0.0);
        let tuning = Tuning::default();
        let particles = ParticlePool::new();

        let small = compose(&state, &particles, &tuning, Surface::new(100.0, 100.0));
        let large = compose(&state, &particles, &tuning, Surface::new(300.0, 300.0));

        assert_eq!(small.cell_size, 10.0);
        assert_eq!(large.cell_size, 30.0);
        assert_eq!(large.segments[1].center.x, small.segments[1].center.x * 3.0);
    }

    #[test]
    fn test_backdrop_follows_cell_boundaries() {
        let state = state_with(&[(5, 5), (4, 5)], Direction::Right, 0.0);
        let scene = compose(
            &state,
            &ParticlePool::new(),
            &Tuning::default(),
            Surface::new(100.0, 120.0),
        );

        // 11 vertical plus 11 horizontal boundaries of a 10x10 board
        assert_eq!(scene.grid_lines.len(), 22);
        assert_eq!(
            scene.grid_lines[0],
            LineSprite {
                from: Point::new(0.0, 0.0),
                to: Point::new(0.0, 100.0),
            }
        );
        assert_eq!(scene.grid_lines[10].from.x, 100.0);
        assert_eq!(scene.grid_lines[21].from.y, 100.0);

        assert!(!scene.diagonals.is_empty());
        for line in &scene.diagonals {
            assert_eq!(line.to.x - line.from.x, line.to.y - line.from.y);
        }
    }

    #[test]
    fn test_backdrop_empty_without_room() {
        let state = state_with(&[(5, 5), (4, 5)], Direction::Right, 0.0);
        let scene = compose(
            &state,
            &ParticlePool::new(),
            &Tuning::default(),
            Surface::new(5.0, 5.0),
        );

        assert_eq!(scene.cell_size, 0.0);
        assert!(scene.grid_lines.is_empty());
        assert!(scene.diagonals.is_empty());
    }

    #[test]
    fn test_render_frame_ticks_particles_only() {
        let mut state = state_with(&[(5, 5), (4, 5)], Direction::Right, 0.25);
        state.phase = Phase::GameOver;
        let before = state.clone();

        let mut particles = ParticlePool::new();
        particles.push(Particle {
            position: Point::new(2.5, 2.5),
            velocity: Point::new(1.0, 0.0),
            life: 0.5,
        });
        particles.push(Particle {
            position: Point::new(2.5, 2.5),
            velocity: Point::ZERO,
            life: 0.01,
        });

        let scene = render_frame(
            &state,
            &mut particles,
            &Tuning::default(),
            Surface::new(100.0, 100.0),
            0.02,
        );

        assert_eq!(state, before);
        assert!(scene.is_game_over());
        assert_eq!(particles.len(), 1);
        assert_eq!(scene.particles.len(), 1);
        assert!((scene.particles[0].center.x - 25.2).abs() < 1e-9);
        assert!((scene.particles[0].radius - 1.44).abs() < 1e-9);
    }
}
