//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::cache::CachedTranslator;
use crate::core::client::{LibreTranslate, ENGINE_NAME};
use crate::core::config::TranslatorConfig;
use crate::core::engine::MachineTranslator;
use crate::core::errors::TranslationError;
use crate::core::models::Language;
use crate::core::preferences::{Preferences, ALLOW_LIBRE_TRANSLATE, LIBRE_TRANSLATE_SERVER_URL};
use crate::core::registry::{load_plugins, EngineRegistry};

/// Commands for the LibreTranslate CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a single segment
    Translate {
        /// Text to translate
        text: String,

        /// Source language (default: en)
        #[arg(short, long, default_value = "en")]
        source_lang: String,

        /// Target language
        #[arg(short, long)]
        target_lang: String,
    },

    /// Translate a text file, one segment per line
    File {
        /// Input file (required)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source language (default: en)
        #[arg(short, long, default_value = "en")]
        source_lang: String,

        /// Target language
        #[arg(short, long)]
        target_lang: String,
    },

    /// Set the server URL, interactively unless --url is given
    Configure {
        /// New server URL; empty resets to the public endpoint
        #[arg(long)]
        url: Option<String>,
    },

    /// Enable the engine (or disable it with --disable)
    Enable {
        /// Turn the engine off instead
        #[arg(long)]
        disable: bool,
    },

    /// Print the resolved configuration
    Show,
}

/// Build the cached LibreTranslate engine through the registry
fn build_translator(prefs: &Preferences) -> anyhow::Result<CachedTranslator> {
    let mut registry = EngineRegistry::new();
    load_plugins(&mut registry);

    let engine = registry
        .create(ENGINE_NAME, prefs)
        .ok_or_else(|| anyhow::anyhow!("{} is not registered", ENGINE_NAME))??;

    let translator = CachedTranslator::from_preferences(engine, prefs);
    if !translator.is_enabled() {
        return Err(TranslationError::Disabled {
            name: format!("{} (run `enable` first)", ENGINE_NAME),
        }
        .into());
    }
    Ok(translator)
}

/// Handle single segment translation
pub async fn handle_translate(
    prefs: &Preferences,
    text: String,
    source_lang: String,
    target_lang: String,
) -> anyhow::Result<()> {
    let translator = build_translator(prefs)?;
    let source = Language::new(source_lang);
    let target = Language::new(target_lang);

    info!("Translating {} -> {}", source, target);

    match translator.get_translation(&source, &target, &text).await? {
        Some(translation) => println!("{}", translation),
        None => eprintln!("Server returned no translation"),
    }

    Ok(())
}

/// `<stem>.translated.<ext>` next to the input
fn default_output(file: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let name = match file.extension() {
        Some(ext) => format!("{}_translated.{}", stem, ext.to_string_lossy()),
        None => format!("{}_translated", stem),
    };
    file.with_file_name(name)
}

/// Handle file translation command
pub async fn handle_file(
    prefs: &Preferences,
    file: PathBuf,
    output: Option<PathBuf>,
    source_lang: String,
    target_lang: String,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;

    let start_time = Instant::now();
    let output = output.unwrap_or_else(|| default_output(&file));

    info!("Input: {}", file.display());
    info!("Output: {}", output.display());

    let translator = build_translator(prefs)?;
    let source = Language::new(source_lang);
    let target = Language::new(target_lang);

    let content = std::fs::read_to_string(&file)?;
    let lines: Vec<&str> = content.lines().collect();

    let pb = ProgressBar::new(lines.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("=>-"),
    );

    let mut translated = Vec::with_capacity(lines.len());
    let mut processed = 0;
    let mut failed = 0;

    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            translated.push(line.to_string());
            pb.inc(1);
            continue;
        }

        match translator.get_translation(&source, &target, line).await {
            Ok(Some(text)) => {
                processed += 1;
                translated.push(text);
            }
            Ok(None) => {
                warn!("Line {}: empty translation, keeping source", index + 1);
                failed += 1;
                translated.push(line.to_string());
            }
            Err(e) => {
                failed += 1;
                pb.set_message(format!("Failed: line {} - {}", index + 1, e));
                warn!("Line {}: {}", index + 1, e);
                translated.push(line.to_string());
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Completed");

    let mut result = translated.join("\n");
    if content.ends_with('\n') {
        result.push('\n');
    }
    std::fs::write(&output, result)?;

    let duration = start_time.elapsed();
    info!(
        "Completed: {} translated, {} failed, {} cached in {:?}",
        processed,
        failed,
        translator.len().await,
        duration
    );

    println!("\n✅ Translation completed!");
    println!("   Translated: {}", processed);
    println!("   Failed: {}", failed);
    println!("   Output: {}", output.display());
    println!("   Time: {:?}", duration);

    Ok(())
}

/// Handle configure command
pub async fn handle_configure(mut prefs: Preferences, url: Option<String>) -> anyhow::Result<()> {
    if let Some(url) = url {
        let url = url.trim().to_string();
        if !url.is_empty() {
            TranslatorConfig::with_url(url.as_str()).validate()?;
        }
        prefs.set_preference(LIBRE_TRANSLATE_SERVER_URL, url);
        prefs.save()?;
        println!("✅ Server URL saved");
        return Ok(());
    }

    let engine = match LibreTranslate::from_preferences(&prefs) {
        Ok(engine) => engine,
        Err(e) => {
            warn!("Current configuration is invalid ({}), editing anyway", e);
            LibreTranslate::new(TranslatorConfig::default())?
        }
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    engine.show_configuration_ui(&mut prefs, &mut stdin.lock(), &mut stdout.lock())?;

    Ok(())
}

/// Handle enable command
pub async fn handle_enable(mut prefs: Preferences, disable: bool) -> anyhow::Result<()> {
    prefs.set_preference(ALLOW_LIBRE_TRANSLATE, !disable);
    prefs.save()?;

    if disable {
        println!("⏸  {} disabled", ENGINE_NAME);
    } else {
        println!("✅ {} enabled", ENGINE_NAME);
    }
    Ok(())
}

/// Handle show command
pub async fn handle_show(prefs: &Preferences) -> anyhow::Result<()> {
    let config = TranslatorConfig::load(prefs)?;

    match prefs.path() {
        Some(path) => println!("Preferences: {}", path.display()),
        None => println!("Preferences: (in memory)"),
    }
    println!("Enabled: {}", prefs.is_preference(ALLOW_LIBRE_TRANSLATE));
    println!("Stored: {}", serde_json::to_string_pretty(&prefs.to_json())?);
    println!("Resolved: {}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("/tmp/segments.txt")),
            PathBuf::from("/tmp/segments_translated.txt")
        );
        assert_eq!(
            default_output(Path::new("notes")),
            PathBuf::from("notes_translated")
        );
    }

    #[test]
    fn test_disabled_engine_is_refused() {
        let prefs = Preferences::in_memory();
        let err = build_translator(&prefs).err().unwrap();
        assert!(err.to_string().contains("Engine disabled"));
    }

    #[tokio::test]
    async fn test_configure_with_url_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        handle_configure(Preferences::load(&path).unwrap(), Some("http://localhost:5000/translate".into()))
            .await
            .unwrap();
        handle_enable(Preferences::load(&path).unwrap(), false).await.unwrap();

        let prefs = Preferences::load(&path).unwrap();
        assert_eq!(
            prefs.get_preference(LIBRE_TRANSLATE_SERVER_URL),
            "http://localhost:5000/translate"
        );
        assert!(build_translator(&prefs).is_ok());
    }

    #[tokio::test]
    async fn test_configure_rejects_bad_url() {
        let prefs = Preferences::in_memory();
        assert!(handle_configure(prefs, Some("localhost".into())).await.is_err());
    }

    #[tokio::test]
    async fn test_file_translation_reuses_cache() {
        use serde_json::json;
        use wiremock::matchers::{body_string_contains, method};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("q=Hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "translatedText": "Hola" })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("segments.txt");
        std::fs::write(&input, "Hello\n\nHello\n").unwrap();

        let mut prefs = Preferences::in_memory();
        prefs.set_preference(ALLOW_LIBRE_TRANSLATE, true);
        prefs.set_preference(LIBRE_TRANSLATE_SERVER_URL, server.uri());

        handle_file(&prefs, input.clone(), None, "en".into(), "es".into())
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("segments_translated.txt")).unwrap();
        assert_eq!(written, "Hola\n\nHola\n");
    }
}
