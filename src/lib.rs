//! Neon Snake - a grid Snake with smooth interpolated motion
//!
//! This library provides:
//! - Core game logic: fixed-step grid simulation, combos, obstacles and particles (game module)
//! - Continuous-position scene composition and ratatui rendering (render module)
//! - Keyboard and mouse input mapping (input module)
//! - Session statistics (metrics module)
//! - The interactive frame driver (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
