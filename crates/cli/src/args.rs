//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "proflog",
    about = "Inspect profiler logs (.prof)",
    after_help = "\
EXAMPLES:
    proflog summary capture.prof             Threads and block counts
    proflog tree capture.prof --thread 4121  Call tree of one thread
    proflog generate test.prof --threads 4   Write a synthetic trace"
)]
pub struct Args {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print threads, block counts and nesting depth
    Summary {
        file: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Skip gathering per-name statistics
        #[arg(long)]
        no_stats: bool,
    },
    /// Print the block tree
    Tree {
        file: PathBuf,
        /// Only this thread
        #[arg(short, long)]
        thread: Option<u32>,
        /// Stop descending below this depth
        #[arg(long)]
        max_depth: Option<u32>,
    },
    /// Print per-name statistics
    Stats {
        file: PathBuf,
        /// Only this thread
        #[arg(short, long)]
        thread: Option<u32>,
    },
    /// Write a synthetic trace
    Generate {
        out: PathBuf,
        #[arg(long)]
        threads: Option<u32>,
        #[arg(long)]
        frames: Option<u32>,
        #[arg(long)]
        depth: Option<u32>,
        #[arg(long)]
        children: Option<u32>,
    },
}
