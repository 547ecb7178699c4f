//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use sharer_core::SortMode;

/// Tool Sharer - Host, publish and rank HTML tools
#[derive(Parser, Debug)]
#[command(name = "sharer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options that locate the store
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Tool store file (overrides store.path from the config)
    #[arg(long, global = true, env = "SHARER_STORE")]
    pub store: Option<PathBuf>,

    /// Config file (defaults to ./sharer.toml when present)
    #[arg(long, global = true, env = "SHARER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Host a tool from a share link
    ///
    /// The link carries Base64-encoded HTML after a '#'.
    ///
    /// Examples:
    ///   sharer import 'https://example.com/#PGgxPmhpPC9oMT4='
    Import {
        /// Share link or any text containing '#<base64>'
        reference: String,
    },

    /// Publish a tool to the gallery
    ///
    /// Examples:
    ///   sharer publish -p "Pomodoro timer" --code '<button>start</button>'
    ///   sharer publish -p "Unit converter" -f converter.html
    Publish {
        /// What the tool was made for
        #[arg(short, long)]
        prompt: String,

        /// Inline HTML
        #[arg(long, conflicts_with = "file")]
        code: Option<String>,

        /// Read HTML from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print a tool's HTML
    View {
        /// Tool id
        id: String,
    },

    /// List gallery tools
    ///
    /// Examples:
    ///   sharer gallery --sort trending
    ///   sharer gallery --search cat --json
    Gallery {
        /// Case-insensitive filter on the prompt
        #[arg(short, long, default_value = "")]
        search: String,

        /// newest, most-liked or trending (defaults to gallery.default_sort)
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortMode>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Like a tool
    Like {
        /// Tool id
        id: String,
    },

    /// Build a share link for an HTML file
    Encode {
        /// HTML file to encode
        file: PathBuf,

        /// Text placed before the '#'
        #[arg(long, default_value = "")]
        base: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_sort(s: &str) -> Result<SortMode, String> {
    s.parse().map_err(|e: sharer_core::Error| e.to_string())
}
