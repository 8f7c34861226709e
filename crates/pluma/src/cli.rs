use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pluma: load shared-library plugins and instantiate the classes they export
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Simple ping command for testing
    #[arg(long)]
    pub ping: bool,

    /// Configuration file (JSON, YAML or TOML). Defaults to ./pluma.toml if present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra plugin directory, searched after the configured ones
    #[arg(short = 'L', long = "plugin-dir", value_name = "DIR")]
    pub plugin_dirs: Vec<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a plugin and print its name, version and classes
    Info {
        /// Plugin name, without prefix or extension
        plugin: String,
        /// Print the metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// List plugin files found in the search paths
    List,
    /// Instantiate a class and print the interface it implements
    Create { plugin: String, class: String },
    /// Instantiate a math function and evaluate it at `x`
    Eval {
        plugin: String,
        class: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
    },
}
