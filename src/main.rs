use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use drawguess::core::vocabulary::Vocabulary;
use drawguess::core::word_bank::{WordBank, DEFAULT_ROUND_SIZE};
use drawguess::recognizer::CommandSource;
use drawguess::{EnsembleConfig, GuessConfig, GuessRequest, Guesser, SourceKind};

#[derive(Parser, Debug)]
#[command(name = "drawguess")]
#[command(version, about = "Guess which word a drawing shows by combining image recognizers", long_about = None)]
struct Cli {
    /// Log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Guess the word depicted by a drawing
    Guess {
        /// Drawing to recognize (PNG or any format the recognizers accept)
        #[arg(short, long)]
        image: PathBuf,

        /// Candidate words, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        words: Vec<String>,

        /// Label classifier command
        #[arg(long, env = "DRAWGUESS_CLASSIFIER_CMD")]
        classifier_cmd: Option<String>,

        /// Object detector command
        #[arg(long, env = "DRAWGUESS_DETECTOR_CMD")]
        detector_cmd: Option<String>,

        /// Text-image matcher command
        #[arg(long, env = "DRAWGUESS_MATCHER_CMD")]
        matcher_cmd: Option<String>,

        /// Per-recognizer timeout in milliseconds (0 disables it)
        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,

        /// JSON file overriding ensemble weights and limits
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for the fallback guess
        #[arg(long)]
        seed: Option<u64>,

        /// Include predictions and source failures in the output
        #[arg(short, long)]
        debug: bool,
    },

    /// Pick a category and candidate words for a new round
    NewRound {
        /// Category key (random when omitted)
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short = 'n', long, default_value_t = DEFAULT_ROUND_SIZE)]
        count: usize,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the canonical matching term for a word
    Translate { term: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Guess {
            image,
            words,
            classifier_cmd,
            detector_cmd,
            matcher_cmd,
            timeout_ms,
            config,
            seed,
            debug,
        } => {
            let commands = [
                (SourceKind::Classification, classifier_cmd),
                (SourceKind::Detection, detector_cmd),
                (SourceKind::TextMatch, matcher_cmd),
            ];
            run_guess(image, words, commands, timeout_ms, config, seed, debug).await
        }
        Commands::NewRound {
            category,
            count,
            seed,
        } => new_round(category, count, seed),
        Commands::Translate { term } => {
            println!("{}", Vocabulary::global().translate(&term));
            Ok(())
        }
    }
}

async fn run_guess(
    image: PathBuf,
    words: Vec<String>,
    commands: [(SourceKind, Option<String>); 3],
    timeout_ms: u64,
    config: Option<PathBuf>,
    seed: Option<u64>,
    debug: bool,
) -> Result<()> {
    let ensemble = match config {
        Some(path) => EnsembleConfig::from_json(&path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EnsembleConfig::default(),
    };
    let timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

    let bytes = std::fs::read(&image)
        .with_context(|| format!("Failed to read image: {}", image.display()))?;
    let words: Vec<String> = words.into_iter().map(|w| w.trim().to_string()).collect();
    let request = GuessRequest::new(bytes, words);

    let mut guesser = Guesser::new(GuessConfig::new(ensemble, timeout, debug));
    for (kind, line) in commands {
        if let Some(source) = line.and_then(|l| CommandSource::from_command_line(kind, &l)) {
            info!(source = %kind, program = source.program(), "recognizer configured");
            guesser = guesser.with_source(Box::new(source));
        }
    }
    info!(sources = guesser.source_count(), "guessing");

    let result = match seed {
        Some(seed) => guesser.guess_seeded(&request, seed).await,
        None => guesser.guess(&request).await,
    }
    .with_context(|| "Failed to guess drawing")?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn new_round(category: Option<String>, count: usize, seed: Option<u64>) -> Result<()> {
    if count == 0 {
        anyhow::bail!("count must be at least 1");
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let round = WordBank::builtin().new_round(category.as_deref(), count, &mut rng);
    println!("{}", serde_json::to_string_pretty(&round)?);
    Ok(())
}
