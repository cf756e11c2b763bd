//! CLI frontend for the Lost Pig agent: replay transcripts, check and verify
//! commands, and run scripted episodes.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(
    name = "lp",
    about = "Lost Pig agent tooling: belief state, constraints, and scripted play",
    version,
    propagate_version = true
)]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a transcript through the belief state and score it
    Replay {
        /// Transcript JSON file ({intro, turns: [{action, observation}]})
        transcript: PathBuf,

        /// Print the belief state as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Check an action against the constraint rules
    Check {
        /// Command to check, e.g. "go cave"
        action: String,

        /// Transcript to build the belief state from (default: fresh game)
        #[arg(short, long)]
        transcript: Option<PathBuf>,
    },

    /// Check commands against the command grammar
    Verify {
        /// One or more commands
        #[arg(required = true)]
        actions: Vec<String>,
    },

    /// Print the constraint rules and the prompt text built from them
    Rules {
        /// Transcript to build the belief state from (default: fresh game)
        #[arg(short, long)]
        transcript: Option<PathBuf>,
    },

    /// Run the agent with scripted generator output against a transcript
    Play {
        /// Transcript the environment plays back
        #[arg(long)]
        transcript: PathBuf,

        /// Generator responses, one per line
        #[arg(long)]
        script: PathBuf,

        /// Agent config JSON (partial files are fine)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Send cleaned generator output without verification or constraints
        #[arg(long)]
        baseline: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Replay { transcript, json } => commands::replay::run(&transcript, json),
        Commands::Check { action, transcript } => {
            commands::check::run(&action, transcript.as_deref())
        }
        Commands::Verify { actions } => commands::verify::run(&actions),
        Commands::Rules { transcript } => commands::rules::run(transcript.as_deref()),
        Commands::Play {
            transcript,
            script,
            config,
            baseline,
        } => commands::play::run(&transcript, &script, config.as_deref(), baseline),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
