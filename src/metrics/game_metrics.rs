use crate::game::{GameState, StepResult};

/// Per-session statistics shown alongside the board
pub struct GameMetrics {
    /// Simulated seconds of the current game
    pub play_time: f64,
    pub high_score: u32,
    pub games_played: u32,
    /// Apples eaten across every game this session
    pub apples_eaten: u32,
    pub longest_snake: usize,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            play_time: 0.0,
            high_score: 0,
            games_played: 0,
            apples_eaten: 0,
            longest_snake: 0,
        }
    }

    /// Fold one `advance` call into the session stats
    pub fn record(&mut self, state: &GameState, result: &StepResult) {
        self.play_time = state.elapsed;
        self.apples_eaten += result.apples_eaten;
        self.longest_snake = self.longest_snake.max(state.snake.body.len());

        if result.collision.is_some() {
            self.on_game_over(state.score.points);
        }
    }

    pub fn on_game_start(&mut self) {
        self.play_time = 0.0;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.play_time.max(0.0) as u64;
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
