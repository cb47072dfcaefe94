use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use youtube_transcript_mcp::output::render_language_listing;
use youtube_transcript_mcp::server;
use youtube_transcript_mcp::source::youtube::YoutubeTranscriptSource;
use youtube_transcript_mcp::{Cli, Commands, Config, TranscriptError, TranscriptPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let mut config = Config::load().await?;

    match cli.command {
        Commands::Serve {
            transport,
            host,
            port,
        } => {
            if let Some(transport) = transport {
                config.server.transport = transport;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let pipeline = build_pipeline(&config)?;
            server::serve(&config, pipeline).await?;
        }
        Commands::Transcript {
            input,
            language,
            format,
        } => {
            let pipeline = build_pipeline(&config)?;
            let format = format.map(|f| f.to_string());

            let progress = spinner("Fetching transcript...");
            let result = pipeline
                .get_transcript_from_url(&input, language.as_deref(), format.as_deref())
                .await;
            progress.finish_and_clear();

            match result {
                Ok(transcript) => println!("{}", transcript.render()),
                Err(e) => exit_with(e),
            }
        }
        Commands::Languages { input } => {
            let pipeline = build_pipeline(&config)?;

            let progress = spinner("Listing transcripts...");
            let result = pipeline.list_available_transcripts(&input).await;
            progress.finish_and_clear();

            match result {
                Ok(listing) => println!("{}", render_language_listing(&listing)),
                Err(e) => exit_with(e),
            }
        }
        Commands::Config { show, init } => {
            if init {
                let path = config.save().await?;
                println!("Configuration written to: {}", path.display());
            } else if show {
                config.display();
            } else {
                config.display();
                println!();
                println!("Edit the config file to change these settings:");
                println!("  {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so the stdio transport keeps stdout for protocol messages
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "youtube_transcript_mcp=debug"
    } else {
        "youtube_transcript_mcp=info"
    };

    let (json_layer, text_layer) = if json {
        (Some(fmt::layer().json().with_writer(std::io::stderr)), None)
    } else {
        (None, Some(fmt::layer().with_writer(std::io::stderr)))
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn build_pipeline(config: &Config) -> Result<Arc<TranscriptPipeline>> {
    let source = YoutubeTranscriptSource::new(config.source.preserve_formatting)?;
    Ok(Arc::new(TranscriptPipeline::new(
        Arc::new(source),
        config.transcripts.clone(),
    )))
}

fn spinner(message: &'static str) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(progress_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        progress.set_style(progress_style);
    }
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn exit_with(error: TranscriptError) -> ! {
    eprintln!("{}", style(error.caller_message()).red());
    if error.is_retryable() {
        eprintln!("{}", style("This error is temporary, try again later.").dim());
    }
    std::process::exit(1);
}
