use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use feedmixer::{FeedMixer, MixerConfig};

#[derive(Parser, Debug)]
#[command(name = "feedmixer", version, about = "Mixes syndication feeds into a single Atom, RSS, or JSON feed")]
struct Args {
    /// Feed URLs to mix (overrides the feeds list in the config file)
    #[arg(value_name = "URL")]
    feeds: Vec<String>,

    /// Path of the TOML config file
    #[arg(long, value_name = "FILE", default_value = "feedmixer.toml")]
    config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Atom)]
    format: Format,

    /// Title of the mixed feed
    #[arg(long)]
    title: Option<String>,

    /// Link advertised by the mixed feed
    #[arg(long)]
    link: Option<String>,

    /// Description (Atom subtitle) of the mixed feed
    #[arg(long)]
    description: Option<String>,

    /// Entries to keep per feed; negative keeps everything
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    num_keep: Option<i64>,

    /// Upper bound on simultaneous feed fetches
    #[arg(long, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Hard cap on the number of feeds per mix
    #[arg(long, value_name = "N")]
    max_feeds: Option<usize>,

    /// Cache database path (":memory:" disables persistence)
    #[arg(long, value_name = "FILE")]
    cache: Option<String>,

    /// Seconds before a cached feed goes stale
    #[arg(long, value_name = "SECS")]
    cache_ttl_secs: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Atom,
    Rss,
    Json,
}

/// Layer command-line overrides on top of the config file.
fn build_config(args: &Args) -> Result<MixerConfig> {
    let mut config = MixerConfig::load(&args.config).context("Failed to load configuration")?;

    if !args.feeds.is_empty() {
        config.feeds = args.feeds.clone();
    }
    if let Some(title) = &args.title {
        config.title = title.clone();
    }
    if let Some(link) = &args.link {
        config.link = link.clone();
    }
    if let Some(description) = &args.description {
        config.description = description.clone();
    }
    if let Some(num_keep) = args.num_keep {
        config.num_keep = num_keep;
    }
    if let Some(max_concurrency) = args.max_concurrency {
        config.max_concurrency = max_concurrency;
    }
    if let Some(max_feeds) = args.max_feeds {
        config.max_feeds = max_feeds;
    }
    if let Some(cache) = &args.cache {
        config.cache_path = cache.clone();
    }
    if let Some(ttl) = args.cache_ttl_secs {
        config.cache_ttl_seconds = Some(ttl);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the serialized feed.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let mut mixer = FeedMixer::open(config).await?;

    let output = match args.format {
        Format::Atom => mixer
            .atom_feed()
            .await
            .context("Failed to render Atom output")?,
        Format::Rss => mixer
            .rss_feed()
            .await
            .context("Failed to render RSS output")?,
        Format::Json => mixer
            .json_feed()
            .await
            .context("Failed to render JSON output")?,
    };

    for (url, err) in mixer.errors() {
        tracing::warn!(feed = %url, error = %err, "Feed left out of the mix");
    }

    println!("{output}");
    Ok(())
}
