//! CLI module for the semantic cache
//!
//! Every command builds the cache from configuration, runs one operation
//! and prints the result as JSON on stdout. With the in-memory backend the
//! cache only lives for one invocation; use the redis backend to keep
//! entries between runs.

mod commands;

pub use commands::run;

use clap::{Parser, Subcommand};

/// PMP Semantic Cache - replay LLM responses for prompts close in meaning
#[derive(Parser)]
#[command(name = "pmp-semantic-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Override the configured namespace prefix
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Look up a prompt
    Query { prompt: String },

    /// Store a response for a prompt
    Save {
        prompt: String,
        response: String,
        /// JSON object stored alongside the entry
        #[arg(long)]
        metadata: Option<String>,
    },

    /// Show entry statistics
    Stats,

    /// Delete every entry in the namespace
    Clear,

    /// Delete the entry stored for exactly this prompt
    Invalidate { prompt: String },

    /// Delete expired entries
    Cleanup,

    /// Load the embedding model and report its state
    Preload,
}
