use super::{
    action::{Command, Direction},
    config::{CRASH_BURST, EAT_BURST, GameConfig, Tuning},
    grid::Grid,
    particles::ParticlePool,
    placement::{place_obstacles, place_random},
    state::{Apple, CollisionType, GameState, Phase, Position, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Information about a single discrete step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate the apple this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of feeding elapsed time to the simulation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepResult {
    /// Discrete steps attempted, including a crashing one
    pub moves: u32,
    /// Apples eaten during this call
    pub apples_eaten: u32,
    /// Collision that ended the game, if any
    pub collision: Option<CollisionType>,
    /// Whether the game is over after this call
    pub terminated: bool,
}

/// The game engine that handles all game logic
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    tuning: Tuning,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create a new game engine seeded from system entropy
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose random choices replay for the same seed
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create a new game engine drawing randomness from `rng`.
    ///
    /// Out-of-range config fields are clamped rather than rejected.
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        if let Err(err) = config.validate() {
            warn!(%err, "Clamping game config");
        }
        let config = config.sanitized();
        let tuning = config.tuning();
        Self {
            config,
            tuning,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Live parameters; changes apply from the next `advance`
    pub fn tuning_mut(&mut self) -> &mut Tuning {
        &mut self.tuning
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let grid = Grid::new(self.config.grid_width, self.config.grid_height);
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let mut snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );
        for segment in &mut snake.body {
            *segment = grid.wrap(*segment);
        }

        let mut state = GameState::new(snake, grid);

        let occupied: HashSet<Position> = state.snake.body.iter().copied().collect();
        state.obstacles = place_obstacles(
            &mut self.rng,
            &grid,
            &occupied,
            self.config.obstacle_count,
            self.config.placement_attempts,
        );
        state.apple = self.spawn_apple(&state);

        info!(
            width = grid.cols,
            height = grid.rows,
            obstacles = state.obstacles.len(),
            "Game reset"
        );
        state
    }

    /// Apply an input command. Returns true if it changed anything.
    ///
    /// A game that is over only responds to `Command::Reset`.
    pub fn apply(
        &mut self,
        state: &mut GameState,
        particles: &mut ParticlePool,
        command: Command,
    ) -> bool {
        let next = match (command, state.phase) {
            (Command::Reset, _) => {
                *state = self.reset();
                particles.clear();
                return true;
            }
            (_, Phase::GameOver) => return false,
            (Command::Steer(direction), _) => return state.snake.steer(direction),
            (Command::Start, Phase::Idle | Phase::Paused) => Phase::Running,
            (Command::Pause, Phase::Running) => Phase::Paused,
            (Command::TogglePause, Phase::Running) => Phase::Paused,
            (Command::TogglePause, Phase::Idle | Phase::Paused) => Phase::Running,
            _ => return false,
        };

        info!(from = ?state.phase, to = ?next, "Phase change");
        state.phase = next;
        true
    }

    /// Feed elapsed seconds to the simulation.
    ///
    /// Progress accumulates at the current speed and every whole cell of
    /// progress is one discrete step. Several steps can run in one call; the
    /// first crash ends the call and discards the leftover progress.
    pub fn advance(
        &mut self,
        state: &mut GameState,
        particles: &mut ParticlePool,
        elapsed_seconds: f64,
    ) -> StepResult {
        let mut result = StepResult::default();

        if !state.is_running() {
            result.terminated = state.is_game_over();
            return result;
        }

        let dt = if elapsed_seconds.is_finite() {
            elapsed_seconds.max(0.0)
        } else {
            0.0
        };
        state.elapsed += dt;
        state.snake.move_progress += dt * self.tuning.speed();

        while state.snake.move_progress >= 1.0 {
            state.snake.move_progress -= 1.0;

            let info = self.step(state, particles);
            result.moves += 1;

            if info.ate_food {
                result.apples_eaten += 1;
            }

            if let Some(collision) = info.collision_type {
                state.snake.move_progress = 0.0;
                result.collision = Some(collision);
                result.terminated = true;
                break;
            }
        }

        result
    }

    /// Execute one discrete step of the game
    fn step(&mut self, state: &mut GameState, particles: &mut ParticlePool) -> StepInfo {
        // Lock in the latched direction
        state.snake.direction = state.snake.pending_direction;

        let new_head = state.grid.step(state.snake.head(), state.snake.direction);

        if let Some(collision_type) = self.check_collision(state, new_head) {
            self.crash(state, particles, new_head, collision_type);
            return StepInfo {
                ate_food: false,
                collision_type: Some(collision_type),
            };
        }

        let ate_food = state.is_apple(new_head);

        // Move snake (grow if ate food)
        state.snake.advance_to(new_head, ate_food);
        state.steps += 1;

        if ate_food {
            let gained = state.score.on_apple();
            particles.spawn_burst(&mut self.rng, new_head, EAT_BURST);
            state.apple = self.spawn_apple(state);
            debug!(
                gained,
                score = state.score.points,
                combo = state.score.combo,
                length = state.snake.body.len(),
                "Apple eaten"
            );
        } else {
            state.score.on_move();
        }

        StepInfo {
            ate_food,
            collision_type: None,
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        // The tail has not moved yet, so entering its cell is a crash
        if state.snake.collides_with_body(pos) {
            return Some(CollisionType::SelfCollision);
        }

        if state.is_obstacle(pos) {
            return Some(CollisionType::Obstacle);
        }

        None
    }

    fn crash(
        &mut self,
        state: &mut GameState,
        particles: &mut ParticlePool,
        at: Position,
        collision_type: CollisionType,
    ) {
        particles.spawn_burst(&mut self.rng, at, CRASH_BURST);
        state.score.on_crash();
        state.collision = Some(collision_type);
        state.phase = Phase::GameOver;

        info!(
            score = state.score.points,
            steps = state.steps,
            length = state.snake.body.len(),
            collision = ?collision_type,
            "Game over"
        );
    }

    /// Spawn the apple on a random cell free of snake and obstacles
    fn spawn_apple(&mut self, state: &GameState) -> Option<Apple> {
        let occupied: HashSet<Position> = state
            .snake
            .body
            .iter()
            .chain(state.obstacles.iter())
            .copied()
            .collect();

        place_random(
            &mut self.rng,
            &state.grid,
            &occupied,
            self.config.placement_attempts,
        )
        .map(|position| Apple {
            position,
            spawned_at: state.elapsed,
        })
    }
}
