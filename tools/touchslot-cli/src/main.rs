//! touchslot CLI: run raw multi-touch streams through the contact engine.
//!
//! Usage:
//!   touchslot replay <INPUT>     Replay a recorded JSONL stream
//!   touchslot watch [DEVICE]     Track a live evdev device
//!   touchslot check              Validate the device configuration
//!   touchslot solve <MATRIX>     Solve an assignment problem from a JSON cost matrix

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "touchslot",
    about = "Multi-touch contact tracking and protocol normalization",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/touchslot/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Jsonl,
    Text,
}

impl From<Format> for touchslot_replay::OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Jsonl => Self::Jsonl,
            Format::Text => Self::Text,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded raw stream through the engine
    Replay {
        /// JSONL stream, one event per line
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "jsonl")]
        format: Format,

        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,

        /// Re-match contacts across frames
        #[arg(long)]
        track: bool,

        /// Do not regenerate single-touch events
        #[arg(long)]
        no_compat: bool,
    },

    /// Track a live evdev device
    Watch {
        /// Device node; the first touch device found when omitted
        device: Option<PathBuf>,

        /// List touch devices and exit
        #[arg(long)]
        list: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,

        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,
    },

    /// Validate the device configuration
    Check {
        /// Write the validated configuration to the standard location
        #[arg(long)]
        save: bool,
    },

    /// Solve a minimum-cost assignment problem
    Solve {
        /// JSON array of cost rows
        matrix: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = commands::load_config(cli.config.as_deref())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    touchslot_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Replay {
            input,
            output,
            format,
            frames,
            track,
            no_compat,
        } => {
            if track {
                config.device.track = true;
            }
            if no_compat {
                config.device.st_compat = false;
            }
            commands::replay::run(config, input, output, format.into(), frames)
        }
        Commands::Watch {
            device,
            list,
            output,
            format,
            frames,
        } => {
            if list {
                commands::watch::list()
            } else {
                commands::watch::run(config, device, output, format.into(), frames)
            }
        }
        Commands::Check { save } => commands::check::run(config, save),
        Commands::Solve { matrix } => commands::solve::run(matrix),
    }
}
