mod app;
mod autoplay;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cognify_core::TaskKind;
use cognify_engine::SessionConfig;
use cognify_engine::config::nback_level;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use app::App;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Task {
    Nback,
    Flanker,
    Stroop,
}

impl From<Task> for TaskKind {
    fn from(task: Task) -> Self {
        match task {
            Task::Nback => TaskKind::NBack,
            Task::Flanker => TaskKind::Flanker,
            Task::Stroop => TaskKind::Stroop,
        }
    }
}

/// Run one cognitive-task session in the terminal.
#[derive(Parser, Debug)]
#[command(name = "cognify")]
#[command(version)]
struct Args {
    /// Task preset to run
    #[arg(short, long, value_enum, default_value = "flanker")]
    task: Task,

    /// Session config in TOML; overrides --task and --level
    #[arg(short, long, env = "COGNIFY_CONFIG")]
    config: Option<PathBuf>,

    /// n-back level; picked at random from 2 and 3 when omitted
    #[arg(short, long)]
    level: Option<usize>,

    /// Seed for the stimulus sequence
    #[arg(short, long, env = "COGNIFY_SEED")]
    seed: Option<u64>,

    /// Let a simulated participant play the session instantly
    #[arg(long)]
    autoplay: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => SessionConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => match TaskKind::from(args.task) {
            TaskKind::NBack => {
                SessionConfig::nback(args.level.unwrap_or_else(|| nback_level(&mut rng)))
            }
            kind => SessionConfig::preset(kind),
        },
    };
    info!(task = %config.kind(), trials = config.total_trials, seed, "session configured");

    let result = if args.autoplay {
        Some(autoplay::run(config, &mut rng)?)
    } else {
        App::new(config, &mut rng)?.run()?
    };

    if let Some(result) = result {
        app::report(&result)?;
    }
    Ok(())
}
