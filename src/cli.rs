// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands, their arguments, and the global output flags.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ebdeploy")]
#[command(about = "Deploy application bundles to AWS Elastic Beanstalk")]
#[command(version)]
pub struct Cli {
    /// Print debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Selects the configuration file and target.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Target defined under `targets:` in the configuration
    #[arg(short, long)]
    pub target: Option<String>,

    /// Configuration file (default: ebdeploy.yml in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new ebdeploy.yml configuration file
    Init {
        /// Application name
        #[arg(short, long)]
        application: Option<String>,

        /// Public CNAME of the environment to deploy to
        #[arg(long)]
        cname: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Upload the bundle and deploy it to the environment
    Deploy {
        #[command(flatten)]
        config: ConfigArgs,

        /// Version label (overrides the configuration)
        #[arg(long)]
        version_label: Option<String>,

        /// inPlace or swapToNew (overrides the configuration)
        #[arg(long)]
        deploy_type: Option<String>,
    },

    /// Show status, health and running version of the environment
    Status {
        #[command(flatten)]
        config: ConfigArgs,
    },
}
