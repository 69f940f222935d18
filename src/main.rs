//! Main entry point for the LibreTranslate CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libre_translator::cli::commands::{self, Commands};
use libre_translator::core::preferences::{Preferences, LIBRE_TRANSLATE_SERVER_URL};

/// LibreTranslate machine-translation client
#[derive(Parser, Debug)]
#[command(name = "libre-translator", version, about, long_about = None)]
struct Args {
    /// Preferences file (default: user config directory)
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Server URL for this run only; not saved
    #[arg(long)]
    url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Subcommand; interactive translation when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .ok()
                .filter(|_| !args.verbose)
                .unwrap_or_else(|| format!("libre_translator={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let prefs_path = match args.prefs {
        Some(path) => path,
        None => Preferences::default_path()?,
    };
    let mut prefs = Preferences::load(&prefs_path)?;

    // Execute command
    match args.command {
        Some(Commands::Translate {
            text,
            source_lang,
            target_lang,
        }) => {
            if let Some(url) = args.url {
                prefs.set_preference(LIBRE_TRANSLATE_SERVER_URL, url);
            }
            commands::handle_translate(&prefs, text, source_lang, target_lang).await?;
        }
        Some(Commands::File {
            file,
            output,
            source_lang,
            target_lang,
        }) => {
            if let Some(url) = args.url {
                prefs.set_preference(LIBRE_TRANSLATE_SERVER_URL, url);
            }
            commands::handle_file(&prefs, file, output, source_lang, target_lang).await?;
        }
        Some(Commands::Configure { url }) => {
            commands::handle_configure(prefs, url).await?;
        }
        Some(Commands::Enable { disable }) => {
            commands::handle_enable(prefs, disable).await?;
        }
        Some(Commands::Show) => {
            commands::handle_show(&prefs).await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
