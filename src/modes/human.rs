use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseEvent,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::game::{
    Command, FrameClock, GameConfig, GameEngine, GameState, ParticlePool, Phase, Point,
};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{FrameLayout, Renderer, render_frame};

/// Display refresh cadence of the driver loop
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Interactive play: one frame per tick, simulation then render
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    particles: ParticlePool,
    clock: FrameClock,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    layout: Option<FrameLayout>,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let mut engine = match seed {
            Some(seed) => GameEngine::seeded(config, seed),
            None => GameEngine::new(config),
        };
        let state = engine.reset();

        Self {
            engine,
            state,
            particles: ParticlePool::new(),
            clock: FrameClock::new(),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            layout: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Entering game loop");

        loop {
            tokio::select! {
                // Handle terminal events; raw mode delivers Ctrl+C as a key
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // One display refresh
                _ = frame_timer.tick() => {
                    self.frame(terminal)?;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            games = self.metrics.games_played,
            high_score = self.metrics.high_score,
            apples = self.metrics.apples_eaten,
            longest = self.metrics.longest_snake,
            "Leaving game loop"
        );
        Ok(())
    }

    /// Advance the simulation if it is running, then draw
    fn frame(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let dt = self.clock.tick(Instant::now());

        if self.state.is_running() {
            let result = self.engine.advance(&mut self.state, &mut self.particles, dt);
            self.metrics.record(&self.state, &result);
        }

        let Self {
            engine,
            state,
            particles,
            metrics,
            renderer,
            layout,
            ..
        } = self;
        let tuning = *engine.tuning();

        terminal
            .draw(|frame| {
                let frame_layout = renderer.layout(frame.area(), &state.grid);
                let scene = render_frame(state, particles, &tuning, frame_layout.surface(), dt);
                renderer.render(frame, &frame_layout, &scene, &tuning, metrics);
                *layout = Some(frame_layout);
            })
            .context("Failed to draw frame")?;

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::Game(command) => self.apply(command),
                    KeyAction::AdjustSpeed(delta) => self.engine.tuning_mut().adjust_speed(delta),
                    KeyAction::AdjustGlow(delta) => self.engine.tuning_mut().adjust_glow(delta),
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::None => {}
                }
            }
            Event::Mouse(mouse) => self.handle_pointer(mouse),
            _ => {}
        }
    }

    /// Steer toward a click, relative to the head's pixel center
    fn handle_pointer(&mut self, mouse: MouseEvent) {
        let Some((column, row)) = self.input_handler.handle_mouse_event(mouse) else {
            return;
        };
        let Some(layout) = self.layout else {
            return;
        };
        let Some(pointer) = layout.pointer_to_surface(column, row) else {
            return;
        };

        let grid = self.state.grid;
        let cell = layout.surface().cell_size(&grid);
        let head = grid.to_pixel(self.state.snake.head(), Point::ZERO, cell);

        if let Some(command) = self.input_handler.steer_toward(pointer, head) {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        let was = self.state.phase;
        self.engine
            .apply(&mut self.state, &mut self.particles, command);

        match (was, self.state.phase) {
            // Do not count the paused interval as frame time
            (Phase::Idle | Phase::Paused, Phase::Running) => self.clock.rebase(Instant::now()),
            (_, Phase::Idle) if command == Command::Reset => self.metrics.on_game_start(),
            _ => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
