//! jitinfo CLI: query what the back end reports for a target.

mod commands;

use std::process;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jitinfo", version, about = "Target info for the jitinfo back end")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with target descriptions
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },
    /// Ask the C driver what the local CPU is
    Probe {
        /// C compiler driver to query
        #[arg(long, default_value = "cc")]
        driver: String,
        /// ABI width passed to x86 drivers (32 or 64)
        #[arg(long, default_value_t = 64)]
        bits: u32,
    },
    /// Run one request's registration phase and print the target info
    Info {
        /// Preset name or path to a .target.toml (default: host preset)
        #[arg(long)]
        target: Option<String>,
        /// Output format (default: human-readable, "json" for JSON)
        #[arg(long)]
        format: Option<String>,
        /// Skip the CPU probe
        #[arg(long)]
        no_probe: bool,
    },
    /// Resolve built-in signatures for a target
    Builtins {
        /// Preset name or path to a .target.toml (default: host preset)
        #[arg(long)]
        target: Option<String>,
        /// Resolve only this built-in
        #[arg(long)]
        name: Option<String>,
        /// Output format (default: human-readable, "json" for JSON)
        #[arg(long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
enum TargetAction {
    /// List built-in presets and targets/ in the current directory
    List,
    /// Show details of a target
    Describe {
        /// Preset name or path to a .target.toml
        name: String,
        /// Output format (default: human-readable, "toml" for TOML)
        #[arg(long)]
        format: Option<String>,
    },
    /// Validate a target description
    Validate {
        /// Preset name or path to a .target.toml
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Target { action } => {
            let cwd = std::env::current_dir()?;
            match action {
                TargetAction::List => commands::target::list(Some(&cwd)),
                TargetAction::Describe { name, format } => {
                    commands::target::describe(&name, format.as_deref())
                }
                TargetAction::Validate { name } => commands::target::validate(&name),
            }
        }
        Commands::Probe { driver, bits } => commands::probe::run(&driver, bits),
        Commands::Info {
            target,
            format,
            no_probe,
        } => commands::info::run(target.as_deref(), format.as_deref(), no_probe),
        Commands::Builtins {
            target,
            name,
            format,
        } => commands::builtins::run(target.as_deref(), name.as_deref(), format.as_deref()),
    }
}
