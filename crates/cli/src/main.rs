use anyhow::Result;
use clap::{Parser, Subcommand};
use market_intel_core::{AppConfig, ConfigLoader, DEFAULT_CONFIG_PATH};

mod commands;

use commands::{AnalyzeArgs, ProcessArgs, RunArgs, ScrapeArgs};

#[derive(Parser)]
#[command(name = "market-intel")]
#[command(about = "Hashtag market intelligence: scrape, clean and score social posts", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Config profile layered over the base file (Config.{profile}.toml)
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Optional log file path (appends to file instead of stderr)
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape, process and analyze in one pass
    Run(RunArgs),
    /// Scrape posts and save the raw JSON snapshot
    Scrape(ScrapeArgs),
    /// Clean, normalize and dedupe a raw snapshot into Parquet
    Process(ProcessArgs),
    /// Compute and render the signal for a processed Parquet file
    Analyze(AnalyzeArgs),
}

/// Opens `path` for appending, creating it and its parent directories.
fn open_log_file(path: &str) -> Result<std::fs::File> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(file)
}

fn init_logging(log_file: Option<&str>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

fn load_config(path: &str, profile: Option<&str>) -> Result<AppConfig> {
    let config = match profile {
        Some(profile) => ConfigLoader::load_with_profile(path, profile)?,
        None => ConfigLoader::load_from(path)?,
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;

    let config = load_config(&cli.config, cli.profile.as_deref())?;

    match cli.command {
        Commands::Run(args) => commands::run_pipeline(args, &config).await?,
        Commands::Scrape(args) => commands::run_scrape(args, &config).await?,
        Commands::Process(args) => commands::run_process(args, &config)?,
        Commands::Analyze(args) => commands::run_analyze(args, &config)?,
    }

    Ok(())
}
