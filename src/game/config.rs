use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

/// Default movement speed in cells per second
pub const DEFAULT_SPEED: f64 = 9.0;
/// Default glow intensity
pub const DEFAULT_GLOW: f64 = 16.0;
/// Accepted movement speeds in cells per second
pub const SPEED_RANGE: RangeInclusive<f64> = 1.0..=30.0;
/// Accepted glow intensities
pub const GLOW_RANGE: RangeInclusive<f64> = 0.0..=40.0;

/// Points for an apple before the multiplier is applied
pub const APPLE_POINTS: u32 = 10;
/// Points taken away on a crash
pub const CRASH_PENALTY: u32 = 20;
/// Combo lost on every plain move
pub const COMBO_DECAY: f64 = 0.15;
/// Apples per multiplier level
pub const COMBO_PER_LEVEL: f64 = 3.0;
/// Multiplier ceiling applied when an apple is eaten
pub const MAX_MULTIPLIER: u32 = 6;
/// Particles spawned when an apple is eaten
pub const EAT_BURST: usize = 8;
/// Particles spawned when the head crashes
pub const CRASH_BURST: usize = 24;
/// Fewest samples a random placement may draw before giving up
pub const MIN_PLACEMENT_ATTEMPTS: usize = 500;

/// Invalid game configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("initial snake length must be between 1 and the grid width {width}, got {length}")]
    SnakeLength { length: usize, width: usize },
    #[error("placement_attempts must be at least {min}, got {attempts}")]
    TooFewPlacementAttempts { attempts: usize, min: usize },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Number of static obstacles placed at reset
    pub obstacle_count: usize,
    /// Starting movement speed in cells per second
    pub speed: f64,
    /// Starting glow intensity
    pub glow: f64,
    /// Samples drawn before a random placement gives up
    pub placement_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 36,
            grid_height: 27,
            initial_snake_length: 6,
            obstacle_count: 8,
            speed: DEFAULT_SPEED,
            glow: DEFAULT_GLOW,
            placement_attempts: MIN_PLACEMENT_ATTEMPTS,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small obstacle-free grid for testing
    pub fn small() -> Self {
        Self {
            obstacle_count: 0,
            initial_snake_length: 3,
            ..Self::new(10, 10)
        }
    }

    /// Check that the grid can hold the starting snake
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.initial_snake_length == 0 || self.initial_snake_length > self.grid_width {
            return Err(ConfigError::SnakeLength {
                length: self.initial_snake_length,
                width: self.grid_width,
            });
        }
        if self.placement_attempts < MIN_PLACEMENT_ATTEMPTS {
            return Err(ConfigError::TooFewPlacementAttempts {
                attempts: self.placement_attempts,
                min: MIN_PLACEMENT_ATTEMPTS,
            });
        }
        Ok(())
    }

    /// Clamp every field into the range `validate` accepts
    pub fn sanitized(self) -> Self {
        let grid_width = self.grid_width.max(1);
        Self {
            grid_width,
            grid_height: self.grid_height.max(1),
            initial_snake_length: self.initial_snake_length.clamp(1, grid_width),
            placement_attempts: self.placement_attempts.max(MIN_PLACEMENT_ATTEMPTS),
            ..self
        }
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize config")?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    /// Live tuning seeded from this configuration
    pub fn tuning(&self) -> Tuning {
        let mut tuning = Tuning::default();
        tuning.set_speed(self.speed);
        tuning.set_glow(self.glow);
        tuning
    }
}

/// Parameters that can change while a game is running.
///
/// Values are clamped on write so the simulation never sees a speed that
/// would stall or explode the move accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    speed: f64,
    glow: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            glow: DEFAULT_GLOW,
        }
    }
}

impl Tuning {
    /// Movement speed in cells per second
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn glow(&self) -> f64 {
        self.glow
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = sanitize(speed, DEFAULT_SPEED, &SPEED_RANGE);
    }

    pub fn set_glow(&mut self, glow: f64) {
        self.glow = sanitize(glow, DEFAULT_GLOW, &GLOW_RANGE);
    }

    pub fn adjust_speed(&mut self, delta: f64) {
        self.set_speed(self.speed + delta);
    }

    pub fn adjust_glow(&mut self, delta: f64) {
        self.set_glow(self.glow + delta);
    }
}

fn sanitize(value: f64, default: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        default
    }
}
