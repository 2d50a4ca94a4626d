use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::game::{Command, Direction, Point};

/// Speed change per key press, in cells per second
pub const SPEED_STEP: f64 = 1.0;
/// Glow change per key press
pub const GLOW_STEP: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Game(Command),
    /// Change movement speed by this many cells per second
    AdjustSpeed(f64),
    AdjustGlow(f64),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Game(Command::Steer(Direction::Up)),
            KeyCode::Down => KeyAction::Game(Command::Steer(Direction::Down)),
            KeyCode::Left => KeyAction::Game(Command::Steer(Direction::Left)),
            KeyCode::Right => KeyAction::Game(Command::Steer(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::Game(Command::Steer(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::Game(Command::Steer(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::Game(Command::Steer(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::Game(Command::Steer(Direction::Right))
            }

            // Game flow
            KeyCode::Enter => KeyAction::Game(Command::Start),
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
                KeyAction::Game(Command::TogglePause)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Game(Command::Reset),

            // Live tuning
            KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::AdjustSpeed(SPEED_STEP),
            KeyCode::Char('-') | KeyCode::Char('_') => KeyAction::AdjustSpeed(-SPEED_STEP),
            KeyCode::Char(']') => KeyAction::AdjustGlow(GLOW_STEP),
            KeyCode::Char('[') => KeyAction::AdjustGlow(-GLOW_STEP),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    /// Terminal cell of a left click, if this event is one
    pub fn handle_mouse_event(&self, mouse: MouseEvent) -> Option<(u16, u16)> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some((mouse.column, mouse.row)),
            _ => None,
        }
    }

    /// Steer toward a pointer position, both in surface pixels
    pub fn steer_toward(&self, pointer: Point, head: Point) -> Option<Command> {
        Direction::toward(pointer.x - head.x, pointer.y - head.y).map(Command::Steer)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
