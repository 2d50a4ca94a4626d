//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Time is fed in explicitly and randomness is injected, so every rule can be
//! driven step by step from tests.

pub mod action;
pub mod clock;
pub mod config;
pub mod engine;
pub mod grid;
pub mod particles;
pub mod placement;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use clock::{FrameClock, MAX_FRAME_DELTA};
pub use config::{ConfigError, GameConfig, Tuning};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use grid::{Grid, Point, Surface};
pub use particles::{Particle, ParticlePool};
pub use state::{Apple, CollisionType, GameState, Phase, Position, Score, Snake};
