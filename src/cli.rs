use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moovprobe")]
#[command(author, version, about = "Read MP4 durations using HTTP range requests")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the duration of one or more MP4 files or URLs
    Duration {
        /// URLs (http/https) or local paths
        #[arg(required = true)]
        locators: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Check that moov starts with a version 0 mvhd
        #[arg(long)]
        verify_mvhd: bool,

        /// Maximum number of top-level boxes to read per file
        #[arg(long)]
        max_boxes: Option<usize>,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file to validate
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}
