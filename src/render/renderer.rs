use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Paragraph,
        canvas::{Canvas, Context, Line as CanvasLine, Points, Rectangle},
    },
};

use super::scene::{LineSprite, Scene, SegmentSprite};
use crate::game::{Grid, Phase, Point, Surface, Tuning};
use crate::metrics::GameMetrics;

/// Braille dots per terminal cell, horizontally and vertically
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;
/// Glow value that renders at full brightness
const FULL_GLOW: f64 = 40.0;

const BACKGROUND: Color = Color::Rgb(4, 6, 14);
const GRID_LINE: Color = Color::Rgb(14, 18, 32);
const DIAGONAL: Color = Color::Rgb(16, 14, 36);
const SNAKE_RGB: (u8, u8, u8) = (8, 255, 200);
const HEAD_RGB: (u8, u8, u8) = (124, 92, 255);
const OBSTACLE_RGB: (u8, u8, u8) = (110, 110, 120);
const APPLE_RGB: (u8, u8, u8) = (255, 120, 150);
const SPARK_RGB: (u8, u8, u8) = (255, 180, 140);

/// Screen regions for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub header: Rect,
    /// Bordered board, shrunk to fit the grid
    pub board: Rect,
    /// Drawable part of the board
    pub board_inner: Rect,
    pub footer: Rect,
}

impl FrameLayout {
    /// Pixel size of the drawing surface inside the board
    pub fn surface(&self) -> Surface {
        Surface::new(
            self.board_inner.width as f64 * DOTS_X,
            self.board_inner.height as f64 * DOTS_Y,
        )
    }

    /// Surface pixel under a terminal cell, if the cell is on the board
    pub fn pointer_to_surface(&self, column: u16, row: u16) -> Option<Point> {
        let inner = self.board_inner;
        if column < inner.x
            || row < inner.y
            || column >= inner.x + inner.width
            || row >= inner.y + inner.height
        {
            return None;
        }
        Some(Point::new(
            (column - inner.x) as f64 * DOTS_X + DOTS_X / 2.0,
            (row - inner.y) as f64 * DOTS_Y + DOTS_Y / 2.0,
        ))
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Split the frame and size the board to the largest whole cell that fits
    pub fn layout(&self, area: Rect, grid: &Grid) -> FrameLayout {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(area);

        let available = chunks[1];
        let inner = Block::default().borders(Borders::ALL).inner(available);
        let cell = Surface::new(inner.width as f64 * DOTS_X, inner.height as f64 * DOTS_Y)
            .cell_size(grid);

        let board = if cell > 0.0 {
            let width = ((grid.cols as f64 * cell) / DOTS_X).ceil() as u16 + 2;
            let height = ((grid.rows as f64 * cell) / DOTS_Y).ceil() as u16 + 2;
            let width = width.min(available.width);
            let height = height.min(available.height);
            Rect::new(
                available.x + (available.width - width) / 2,
                available.y + (available.height - height) / 2,
                width,
                height,
            )
        } else {
            available
        };

        FrameLayout {
            header: chunks[0],
            board,
            board_inner: Block::default().borders(Borders::ALL).inner(board),
            footer: chunks[2],
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        layout: &FrameLayout,
        scene: &Scene,
        tuning: &Tuning,
        metrics: &GameMetrics,
    ) {
        // Render header with basic stats
        let stats = self.render_stats(scene, tuning, metrics);
        frame.render_widget(stats, layout.header);

        let board = self.render_board(scene);
        frame.render_widget(board, layout.board);

        if let Some(overlay) = self.render_overlay(scene) {
            let area = centered(layout.board, 34, 7);
            frame.render_widget(Clear, area);
            frame.render_widget(overlay, area);
        }

        // Render footer with controls
        let controls = self.render_controls();
        frame.render_widget(controls, layout.footer);
    }

    fn render_board<'a>(&self, scene: &'a Scene) -> Canvas<'a, impl Fn(&mut Context) + 'a> {
        let Surface { width, height } = scene.surface;
        let glow = scene.glow / FULL_GLOW;

        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Rgb(47, 58, 96)))
                    .title(" Neon Snake "),
            )
            .marker(Marker::Braille)
            .background_color(BACKGROUND)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(move |ctx| {
                for line in &scene.diagonals {
                    ctx.draw(&canvas_line(line, DIAGONAL, height));
                }
                for line in &scene.grid_lines {
                    ctx.draw(&canvas_line(line, GRID_LINE, height));
                }

                ctx.layer();
                // Tail first so the head ends up on top
                for segment in scene.segments.iter().rev() {
                    let k = segment.alpha * (0.6 + 0.4 * glow * segment.glow / scene.glow.max(1.0));
                    ctx.draw(&Points {
                        coords: &fill_square(segment, height),
                        color: shade(SNAKE_RGB, k),
                    });
                }

                let head = &scene.head_outline;
                ctx.draw(&Rectangle {
                    x: head.center.x - head.size / 2.0,
                    y: height - head.center.y - head.size / 2.0,
                    width: head.size,
                    height: head.size,
                    color: shade(HEAD_RGB, head.alpha),
                });

                ctx.layer();
                for obstacle in &scene.obstacles {
                    let sprite = SegmentSprite {
                        center: *obstacle,
                        size: scene.obstacle_size,
                        glow: 0.0,
                        alpha: 0.8,
                    };
                    ctx.draw(&Points {
                        coords: &fill_square(&sprite, height),
                        color: shade(OBSTACLE_RGB, sprite.alpha),
                    });
                }

                if let Some(apple) = &scene.apple {
                    ctx.draw(&Points {
                        coords: &fill_disc(apple.center, apple.radius, height),
                        color: shade(APPLE_RGB, 0.7 + 0.3 * glow),
                    });
                }

                ctx.layer();
                for particle in &scene.particles {
                    ctx.draw(&Points {
                        coords: &fill_disc(particle.center, particle.radius / 2.0, height),
                        color: shade(SPARK_RGB, particle.alpha),
                    });
                }

                if scene.multiplier > 1 {
                    ctx.print(
                        2.0,
                        height - DOTS_Y,
                        Span::styled(
                            format!("x{}", scene.multiplier),
                            Style::default()
                                .fg(Color::Rgb(255, 216, 122))
                                .add_modifier(Modifier::BOLD),
                        ),
                    );
                }
            })
    }

    fn render_stats(&self, scene: &Scene, tuning: &Tuning, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                scene.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{:.0}", tuning.speed()), value),
            Span::raw("    "),
            Span::styled("Glow: ", label),
            Span::styled(format!("{:.0}", tuning.glow()), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
    }

    fn render_overlay(&self, scene: &Scene) -> Option<Paragraph<'_>> {
        let (title, color, hint) = match scene.phase {
            Phase::Running => return None,
            Phase::GameOver => ("GAME OVER", Color::Rgb(255, 107, 107), "Press R to play again"),
            Phase::Paused => ("PAUSED", Color::Yellow, "Press P to resume"),
            Phase::Idle => ("READY", Color::Cyan, "Press Enter to start"),
        };

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ];
        if scene.is_game_over() {
            text.push(Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    scene.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        } else {
            text.push(Line::from(""));
        }
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::Rgb(223, 233, 255)),
        )));

        Some(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let key = Style::default().fg(Color::Cyan);
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", key),
            Span::raw("/"),
            Span::styled("WASD", key),
            Span::raw("/click move | "),
            Span::styled("Enter", key),
            Span::raw(" start | "),
            Span::styled("P", key),
            Span::raw(" pause | "),
            Span::styled("R", key),
            Span::raw(" reset | "),
            Span::styled("+-", key),
            Span::raw(" speed | "),
            Span::styled("[]", key),
            Span::raw(" glow | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn shade((r, g, b): (u8, u8, u8), k: f64) -> Color {
    let k = k.clamp(0.0, 1.0);
    Color::Rgb(
        (r as f64 * k) as u8,
        (g as f64 * k) as u8,
        (b as f64 * k) as u8,
    )
}

fn canvas_line(line: &LineSprite, color: Color, height: f64) -> CanvasLine {
    CanvasLine {
        x1: line.from.x,
        y1: height - line.from.y,
        x2: line.to.x,
        y2: height - line.to.y,
        color,
    }
}

/// Dot coordinates covering a square sprite, flipped into canvas space
fn fill_square(sprite: &SegmentSprite, height: f64) -> Vec<(f64, f64)> {
    let half = sprite.size / 2.0;
    let mut coords = Vec::new();
    let mut y = sprite.center.y - half;
    while y <= sprite.center.y + half {
        let mut x = sprite.center.x - half;
        while x <= sprite.center.x + half {
            coords.push((x, height - y));
            x += 1.0;
        }
        y += 1.0;
    }
    coords
}

/// Dot coordinates covering a disc, flipped into canvas space
fn fill_disc(center: Point, radius: f64, height: f64) -> Vec<(f64, f64)> {
    let r = radius.max(0.5);
    let mut coords = Vec::new();
    let mut dy = -r;
    while dy <= r {
        let mut dx = -r;
        while dx <= r {
            if dx * dx + dy * dy <= r * r {
                coords.push((center.x + dx, height - (center.y + dy)));
            }
            dx += 1.0;
        }
        dy += 1.0;
    }
    coords
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine, ParticlePool};
    use crate::render::scene::compose;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_layout_fits_grid() {
        let renderer = Renderer::new();
        let grid = Grid::new(36, 27);
        let layout = renderer.layout(Rect::new(0, 0, 120, 40), &grid);

        let surface = layout.surface();
        let cell = surface.cell_size(&grid);
        assert!(cell >= 1.0);
        assert!(grid.cols as f64 * cell <= surface.width);
        assert!(grid.rows as f64 * cell <= surface.height);
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.footer.height, 3);
    }

    #[test]
    fn test_pointer_mapping() {
        let layout = FrameLayout {
            header: Rect::new(0, 0, 10, 3),
            board: Rect::new(4, 3, 12, 12),
            board_inner: Rect::new(5, 4, 10, 10),
            footer: Rect::new(0, 15, 10, 3),
        };

        assert_eq!(layout.pointer_to_surface(5, 4), Some(Point::new(1.0, 2.0)));
        assert_eq!(layout.pointer_to_surface(7, 5), Some(Point::new(5.0, 6.0)));
        assert_eq!(layout.pointer_to_surface(4, 4), None);
        assert_eq!(layout.pointer_to_surface(15, 4), None);
    }

    #[test]
    fn test_fill_square_flips_y() {
        let sprite = SegmentSprite {
            center: Point::new(10.0, 10.0),
            size: 2.0,
            glow: 0.0,
            alpha: 1.0,
        };
        let coords = fill_square(&sprite, 100.0);
        assert_eq!(coords.len(), 9);
        assert!(coords.contains(&(9.0, 91.0)));
        assert!(coords.contains(&(11.0, 89.0)));
    }

    #[test]
    fn test_canvas_line_flips_y() {
        let line = LineSprite {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, 40.0),
        };
        let drawn = canvas_line(&line, GRID_LINE, 100.0);
        assert_eq!((drawn.x1, drawn.y1), (0.0, 100.0));
        assert_eq!((drawn.x2, drawn.y2), (0.0, 60.0));
        assert_eq!(drawn.color, GRID_LINE);
    }

    #[test]
    fn test_renders_board_and_game_over() {
        let mut engine = GameEngine::with_rng(GameConfig::default(), ChaCha8Rng::seed_from_u64(1));
        let mut state = engine.reset();
        let renderer = Renderer::new();
        let metrics = GameMetrics::new();
        let tuning = *engine.tuning();
        let particles = ParticlePool::new();

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| {
                let layout = renderer.layout(frame.area(), &state.grid);
                let scene = compose(&state, &particles, &tuning, layout.surface());
                renderer.render(frame, &layout, &scene, &tuning, &metrics);
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Score"));
        assert!(text.contains("READY"));

        state.phase = Phase::GameOver;
        terminal
            .draw(|frame| {
                let layout = renderer.layout(frame.area(), &state.grid);
                let scene = compose(&state, &particles, &tuning, layout.surface());
                renderer.render(frame, &layout, &scene, &tuning, &metrics);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("GAME OVER"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut engine = GameEngine::with_rng(GameConfig::default(), ChaCha8Rng::seed_from_u64(1));
        let state = engine.reset();
        let renderer = Renderer::new();
        let tuning = *engine.tuning();

        let mut terminal = Terminal::new(TestBackend::new(10, 8)).unwrap();
        terminal
            .draw(|frame| {
                let layout = renderer.layout(frame.area(), &state.grid);
                let scene = compose(&state, &ParticlePool::new(), &tuning, layout.surface());
                renderer.render(frame, &layout, &scene, &tuning, &GameMetrics::new());
            })
            .unwrap();
    }
}
