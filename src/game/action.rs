/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Direction for a unit delta, `None` for anything that is not a unit axis step
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// Direction pointing from an origin toward an offset `(dx, dy)`.
    ///
    /// The dominant axis wins; ties go to the vertical axis. A zero offset
    /// has no direction.
    pub fn toward(dx: f64, dy: f64) -> Option<Direction> {
        if dx.abs() > dy.abs() {
            Self::from_delta(sign(dx), 0)
        } else {
            Self::from_delta(0, sign(dy))
        }
    }
}

/// -1, 0 or 1; NaN counts as zero
fn sign(value: f64) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Command sent to the game by the outside world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Latch a new direction for the next discrete step
    Steer(Direction),
    /// Begin or resume the simulation
    Start,
    /// Freeze the simulation without discarding state
    Pause,
    /// Start when idle or paused, pause when running
    TogglePause,
    /// Rebuild all entities and return to idle
    Reset,
}
