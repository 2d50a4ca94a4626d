use super::action::Direction;
use super::config::{APPLE_POINTS, COMBO_DECAY, COMBO_PER_LEVEL, CRASH_PENALTY, MAX_MULTIPLIER};
use super::grid::Grid;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction locked in by the last discrete step
    pub direction: Direction,
    /// Direction requested by input, applied at the next discrete step
    pub pending_direction: Direction,
    /// Fractional progress toward the next cell, in `[0, 1)` between steps
    pub move_progress: f64,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self {
            body,
            direction,
            pending_direction: direction,
            move_progress: 0.0,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head).
    ///
    /// The tail counts: it is only vacated after the move is committed.
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Request a turn. Reversing onto the locked-in direction is ignored.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Commit a new head, dropping the tail unless the snake grows
    pub fn advance_to(&mut self, new_head: Position, should_grow: bool) {
        self.body.insert(0, new_head);

        if !should_grow {
            self.body.pop();
        }
    }
}

/// The apple and the simulated time it appeared at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Apple {
    pub position: Position,
    pub spawned_at: f64,
}

/// Type of collision that ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit an obstacle
    Obstacle,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle of a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Freshly reset, waiting for a start command
    Idle,
    Running,
    /// Frozen mid-game, progress is kept
    Paused,
    /// Terminal until reset
    GameOver,
}

/// Score, combo and the multiplier derived from the combo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub points: u32,
    pub combo: f64,
    pub multiplier: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self {
            points: 0,
            combo: 0.0,
            multiplier: 1,
        }
    }
}

impl Score {
    /// Apple eaten: combo grows and points are awarded at the capped multiplier.
    /// Returns the points gained.
    pub fn on_apple(&mut self) -> u32 {
        self.combo += 1.0;
        self.multiplier = (1 + (self.combo / COMBO_PER_LEVEL).floor() as u32).min(MAX_MULTIPLIER);
        let gained = APPLE_POINTS * self.multiplier;
        self.points += gained;
        gained
    }

    /// Plain move: the combo decays toward zero
    pub fn on_move(&mut self) {
        self.combo = (self.combo - COMBO_DECAY).max(0.0);
        self.multiplier = ((1.0 + self.combo / COMBO_PER_LEVEL).floor() as u32).max(1);
    }

    pub fn on_crash(&mut self) {
        self.points = self.points.saturating_sub(CRASH_PENALTY);
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub apple: Option<Apple>,
    pub obstacles: Vec<Position>,
    pub score: Score,
    pub phase: Phase,
    /// Discrete steps taken this game
    pub steps: u32,
    /// Simulated seconds spent running
    pub elapsed: f64,
    pub collision: Option<CollisionType>,
}

impl GameState {
    /// Create a new idle game state
    pub fn new(snake: Snake, grid: Grid) -> Self {
        Self {
            grid,
            snake,
            apple: None,
            obstacles: Vec::new(),
            score: Score::default(),
            phase: Phase::Idle,
            steps: 0,
            elapsed: 0.0,
            collision: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    pub fn is_apple(&self, pos: Position) -> bool {
        self.apple.is_some_and(|apple| apple.position == pos)
    }
}
