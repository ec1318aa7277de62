mod terminal;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use sort_visualiser_core::{
    Algorithm, AppConfig, MuteSwitch, NullRenderer, Renderer, RunController, RunOutcome,
    SequenceGenerator, SynthEmitter, ToneOutput, ToneTrack,
};
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalRenderer;

#[tokio::main(flavor = "current_thread")]
async fn main() -> sort_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_sort(args).await,
        Commands::Algorithms => {
            list_algorithms();
            Ok(())
        }
    }
}

async fn run_sort(args: RunArgs) -> sort_visualiser_core::Result<()> {
    let config = load_config(&args)?;
    tracing::info!(
        algorithm = %args.algorithm,
        size = config.array.size,
        speed = config.playback.speed,
        muted = config.audio.muted,
        "starting run"
    );

    let generator = match args.seed {
        Some(seed) => SequenceGenerator::with_seed(&config.array, seed),
        None => SequenceGenerator::from_entropy(&config.array),
    };
    let synth = SynthEmitter::new(&config.audio);
    let track = synth.track();
    let tones = ToneOutput::new(Box::new(synth), MuteSwitch::new(config.audio.muted));
    let renderer: Box<dyn Renderer + Send> = if args.quiet {
        Box::new(NullRenderer)
    } else {
        Box::new(TerminalRenderer::new(std::io::stderr()))
    };

    let mut controller = RunController::new(config, generator, renderer, tones)?;
    controller.start(args.algorithm)?;

    let finished = tokio::select! {
        outcome = controller.wait() => outcome?,
        interrupt = tokio::signal::ctrl_c() => {
            interrupt?;
            None
        }
    };
    if !args.quiet {
        eprintln!();
    }

    let Some(outcome) = finished else {
        tracing::info!("interrupted, cancelling run");
        controller.cancel_and_reset().await?;
        return Ok(());
    };

    report(&outcome, args.json)?;
    if let Some(path) = args.tones.as_deref() {
        export_tones(&track, path)?;
    }
    Ok(())
}

fn load_config(args: &RunArgs) -> sort_visualiser_core::Result<AppConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(size) = args.size {
        config.array.size = size;
    }
    if let Some(speed) = args.speed {
        config.playback.speed = speed;
    }
    if args.mute {
        config.audio.muted = true;
    }

    let clamped = config.clamped();
    if clamped != config {
        tracing::warn!("configuration values out of range were clamped");
    }
    Ok(clamped)
}

fn report(outcome: &RunOutcome, json: bool) -> sort_visualiser_core::Result<()> {
    if json {
        let document = serde_json::json!({
            "algorithm": outcome.algorithm,
            "state": format!("{:?}", outcome.state).to_lowercase(),
            "stats": outcome.stats,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        let stats = outcome.stats;
        println!(
            "{}: {:?} after {} comparisons and {} swaps in {} ms",
            outcome.algorithm.info().name,
            outcome.state,
            stats.comparisons,
            stats.swaps,
            stats.elapsed_ms
        );
    }
    Ok(())
}

fn export_tones(track: &ToneTrack, path: &Path) -> sort_visualiser_core::Result<()> {
    track.write_pcm(path)?;
    tracing::info!(?path, samples = track.len()?, "wrote tone track");
    Ok(())
}

fn list_algorithms() {
    for algorithm in Algorithm::ALL {
        let info = algorithm.info();
        println!("{:<10} {}", algorithm.id(), info.name);
        println!("           {}", info.description);
        println!("           time {} | space {}", info.time, info.space);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated sorting algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Animate one algorithm over a freshly generated sequence.
    Run(RunArgs),
    /// List the available algorithms and their complexity.
    Algorithms,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Algorithm to animate: bubble, selection, insertion, merge or quick.
    #[arg(short, long)]
    algorithm: Algorithm,
    /// Number of bars (5 to 200).
    #[arg(short, long)]
    size: Option<usize>,
    /// Animation speed from 0 (slowest) to 100 (fastest).
    #[arg(long)]
    speed: Option<u8>,
    /// Disable tone synthesis.
    #[arg(long)]
    mute: bool,
    /// Seed for a reproducible sequence.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON configuration file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the synthesised tones to this file as raw f32le PCM.
    #[arg(long)]
    tones: Option<PathBuf>,
    /// Print the final statistics as JSON.
    #[arg(long)]
    json: bool,
    /// Skip drawing the bars.
    #[arg(short, long)]
    quiet: bool,
}
