use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use neon_snake::game::GameConfig;
use neon_snake::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "neon_snake")]
#[command(version, about = "Snake with smooth motion, combos and particle bursts")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON file with a game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Movement speed in cells per second
    #[arg(long)]
    speed: Option<f64>,

    /// Glow intensity
    #[arg(long)]
    glow: Option<f64>,

    /// Number of obstacles
    #[arg(long)]
    obstacles: Option<usize>,

    /// Seed for a reproducible board
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective configuration to this JSON file before playing
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Where to write logs; the terminal belongs to the game
    #[arg(long, default_value = "neon_snake.log")]
    log_file: PathBuf,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard and mouse controls
    Human,
}

impl Cli {
    /// Config file (or defaults) with command line overrides applied
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(glow) = self.glow {
            config.glow = glow;
        }
        if let Some(obstacles) = self.obstacles {
            config.obstacle_count = obstacles;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = cli.game_config()?;
    tracing::info!(?config, seed = ?cli.seed, "Starting neon_snake");

    if let Some(path) = &cli.save_config {
        config.save(path)?;
        tracing::info!(path = %path.display(), "Saved config");
    }

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config, cli.seed);
            human_mode.run().await?;
        }
    }

    Ok(())
}
