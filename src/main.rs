use build_report::cmd;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

/// Human-oriented build reports for module bundlers
///
/// build-report snapshots gzip sizes of a build folder, runs your build, and
/// prints what changed: asset sizes with deltas, the first error, warnings.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a build and report on its output
    Run {
        /// Build output folder
        #[arg(short, long, value_name = "DIR")]
        output_path: PathBuf,

        /// Stats JSON written by the build
        #[arg(short, long, value_name = "FILE")]
        stats: PathBuf,

        /// Compiler name shown in the report
        #[arg(short, long)]
        name: Option<String>,

        /// Options file (.json or .toml); defaults to ./.build-report.toml
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Build command to run between snapshot and report
        #[arg(last = true, value_name = "BUILD_COMMAND")]
        build_command: Vec<String>,
    },

    /// Print the gzip sizes of a build folder
    Measure {
        /// Build output folder
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let result = match cli.command {
        Commands::Run {
            output_path,
            stats,
            name,
            config,
            build_command,
        } => cmd::cmd_run(&cmd::RunArgs {
            output_path,
            stats,
            name,
            config,
            build_command,
        }),
        Commands::Measure { dir } => cmd::cmd_measure(&dir),
    };

    if let Err(e) = result {
        use build_report::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
