//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Soundboard - manage and fetch sounds through the metadata cache
#[derive(Parser, Debug)]
#[command(name = "soundboard")]
#[command(about = "Manage and fetch soundboard sounds through the metadata cache", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Extra configuration file, applied after the default locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every sound
    List,

    /// Show the sound with this exact name
    Find {
        /// Sound name (case-sensitive)
        name: String,
    },

    /// Download a sound's audio and print the local path
    Fetch {
        /// Sound name (case-sensitive)
        name: String,
    },

    /// Upload an audio file as a new sound
    Add {
        /// Display name for the sound
        name: String,

        /// Audio file to upload; its file name becomes the blob key
        file: PathBuf,

        /// MIME type, guessed from the file extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Delete a sound and its audio
    Delete {
        /// Sound name (case-sensitive)
        name: String,
    },

    /// Suggest sound names containing a fragment
    Search {
        /// Case-insensitive fragment; empty matches everything
        #[arg(default_value = "")]
        partial: String,
    },

    /// Drop the metadata snapshot so the next read queries the service
    Invalidate,
}
