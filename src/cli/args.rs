use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::translation::Formality;

#[derive(Parser, Debug)]
#[command(name = "lingo")]
#[command(about = "Resilient, cached translation CLI")]
#[command(version)]
pub struct Args {
    /// File to translate (reads from stdin if not provided)
    pub file: Option<String>,

    /// Target language code; comma-separate for multiple (e.g., de,fr,ja)
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// Source language code (auto-detected if not provided)
    #[arg(long = "from")]
    pub from: Option<String>,

    /// Formality preference
    #[arg(long, value_enum)]
    pub formality: Option<Formality>,

    /// Disable cache
    #[arg(short = 'n', long)]
    pub no_cache: bool,

    /// Suppress status output on stderr
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate many files with bounded concurrency
    Batch {
        /// Files to translate
        paths: Vec<PathBuf>,

        /// Translate all supported files under this directory instead
        #[arg(short = 'd', long, conflicts_with = "paths")]
        dir: Option<PathBuf>,

        /// Target language code
        #[arg(short = 't', long = "to")]
        to: Option<String>,

        /// Source language code (auto-detected if not provided)
        #[arg(long = "from")]
        from: Option<String>,

        /// Formality preference
        #[arg(long, value_enum)]
        formality: Option<Formality>,

        /// Recurse into subdirectories (with --dir)
        #[arg(short = 'r', long)]
        recursive: bool,

        /// Wildcard file-name filter, e.g. 'chapter-*.md' (with --dir)
        #[arg(short = 'p', long)]
        pattern: Option<String>,

        /// Directory to write translated files into
        #[arg(short = 'o', long)]
        output_dir: Option<PathBuf>,

        /// Output file-name template with {name}, {lang}, {ext} placeholders
        #[arg(long)]
        output_template: Option<String>,

        /// Maximum files translated simultaneously (1-100)
        #[arg(short = 'c', long)]
        concurrency: Option<usize>,

        /// Disable cache
        #[arg(short = 'n', long)]
        no_cache: bool,
    },
    /// List supported target languages
    Languages {
        /// Print the built-in list instead of querying the service
        #[arg(long)]
        local: bool,
    },
    /// Show account character usage
    Usage,
    /// Inspect or clear the translation cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Configure lingo settings
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show entry count and size usage
    Stats,
    /// Delete every cached translation
    Clear,
}
