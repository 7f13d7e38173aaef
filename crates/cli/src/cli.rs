use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{check_command, list_command, run_command, watch_command};

#[derive(Parser, Debug)]
#[command(name = "cmake-targets")]
#[command(version, about = "Discover and run CMake build targets", long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the project lives and how to reach CMake.
/// Flags override the nearest `.cmake-targets.json`.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// CMake source directory (defaults to the current directory)
    pub source: Option<PathBuf>,

    /// Suffix appended to the source directory to form the build directory
    #[arg(long)]
    pub suffix: Option<String>,

    /// CMake generator used by the generate target
    #[arg(short = 'G', long)]
    pub generator: Option<String>,

    /// Path or name of the cmake executable
    #[arg(long)]
    pub executable: Option<String>,

    /// Explicit config file instead of searching upwards from the source
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the targets of a CMake project
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print targets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report eligibility, cache state and configuration problems
    Check {
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Run a single target
    #[command(visible_alias = "r")]
    Run {
        /// Target name, e.g. `all`, `clean` or `generate`
        target: String,

        #[command(flatten)]
        project: ProjectArgs,

        /// Print the command without executing it
        #[arg(short, long)]
        dry_run: bool,
    },
    /// List targets and list again whenever configuration or the cache changes
    Watch {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print targets as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::List { project, json } => list_command(&project, json),
            Commands::Check { project } => check_command(&project),
            Commands::Run {
                target,
                project,
                dry_run,
            } => run_command(&target, &project, dry_run),
            Commands::Watch { project, json } => watch_command(&project, json),
        }
    }
}
