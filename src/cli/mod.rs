use clap::{Parser, Subcommand};

use crate::config::Transport;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "youtube-transcript-mcp",
    about = "YouTube Transcript MCP - Serve YouTube video transcripts to LLM tool-calling clients",
    version,
    long_about = "An MCP server that extracts transcripts from YouTube videos. Run `serve` to expose the transcript tools over stdio or HTTP, or use `transcript` and `languages` to query a video directly."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server
    Serve {
        /// Transport to serve on (overrides MCP_TRANSPORT and the config file)
        #[arg(short, long, value_enum)]
        transport: Option<Transport>,

        /// Bind address for the HTTP transport
        #[arg(long, value_name = "HOST")]
        host: Option<String>,

        /// Port for the HTTP transport
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,
    },

    /// Fetch the transcript of a video
    Transcript {
        /// YouTube URL or 11-character video ID
        #[arg(value_name = "URL_OR_ID")]
        input: String,

        /// Preferred transcript language code (falls back to English, then the first available)
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List the transcript languages available for a video
    Languages {
        /// YouTube URL or 11-character video ID
        #[arg(value_name = "URL_OR_ID")]
        input: String,
    },

    /// Show or initialise the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the current configuration to the config file
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },
}
