//! Turning game state into frames.
//!
//! `scene` is pure geometry and has no terminal dependencies; `renderer`
//! paints a scene with ratatui.

pub mod renderer;
pub mod scene;

pub use renderer::{FrameLayout, Renderer};
pub use scene::{Scene, compose, interpolate_snake, render_frame};
