//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// papis - Inspect and edit the layered papis configuration
#[derive(Parser, Debug)]
#[command(name = "papis")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read this configuration file instead of the discovered one
    #[arg(short, long, global = true, env = "PAPIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Library to use instead of the default library
    #[arg(short, long, global = true)]
    pub lib: Option<String>,

    /// Override a setting for this run (KEY may be written as section.key)
    #[arg(long = "set", num_args = 2, value_names = ["KEY", "VALUE"], global = true)]
    pub set: Vec<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// `--set` overrides as `(key, value)` pairs, in command-line order.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.set
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved value of settings
    ///
    /// Without keys the loaded configuration is printed.
    ///
    /// Examples:
    ///   papis config editor             # General setting
    ///   papis config tui.editmode       # Setting of the tui section
    ///   papis config -s tui editmode    # Same, with an explicit section
    Config {
        /// Keys to resolve, as section.key when no --section is given
        keys: Vec<String>,

        /// Section the keys belong to
        #[arg(short, long)]
        section: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the configured libraries
    Libs {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the registered default settings
    Defaults {
        /// Only show this section
        #[arg(short, long)]
        section: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Write the configuration, including --set overrides, to disk
    Save,
}
