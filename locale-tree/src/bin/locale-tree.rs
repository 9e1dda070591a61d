use clap::{Arg, Command};
use locale_tree::{
    GoogleTranslateProvider, MachineTranslator, MockMode, MockTranslator, TranslateOptions,
    TreeTranslator, google_translate::API_KEY_ENV,
};
use std::env;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("locale-tree")
        .version("0.1.0")
        .about("Machine translate the \"translated\" fields of a JSON localization file")
        .arg(
            Arg::new("input")
                .help("JSON file to translate, or - for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target-locale")
                .help("Target language code (e.g., fr, es, de)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("source-locale")
                .long("source")
                .short('s')
                .help("Source language code (default: en)")
                .default_value("en"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the translated JSON here instead of stdout"),
        )
        .arg(
            Arg::new("concurrency")
                .long("concurrency")
                .short('c')
                .help("Maximum translation requests in flight")
                .value_parser(clap::value_parser!(usize))
                .default_value("8"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Keep the input text when the provider loses a markup placeholder")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock translator instead of Google Translate")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every leaf as it is translated")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Required and defaulted arguments are always present
    let input = matches.get_one::<String>("input").unwrap();
    let target_locale = matches.get_one::<String>("target-locale").unwrap();
    let source_locale = matches.get_one::<String>("source-locale").unwrap();
    let concurrency = *matches.get_one::<usize>("concurrency").unwrap();
    let output = matches.get_one::<String>("output");
    let strict = matches.get_flag("strict");
    let use_mock = matches.get_flag("mock");
    let verbose = matches.get_flag("verbose");

    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let source = if input == "-" {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        buffer
    } else {
        tokio::fs::read_to_string(input)
            .await
            .map_err(|e| format!("Failed to read '{}': {}", input, e))?
    };

    let provider: Arc<dyn MachineTranslator> = if use_mock {
        Arc::new(MockTranslator::new(MockMode::Suffix))
    } else {
        if env::var(API_KEY_ENV).is_err() {
            eprintln!("❌ {} environment variable not set", API_KEY_ENV);
            eprintln!("   Set it with: export {}=your_api_key", API_KEY_ENV);
            eprintln!("   Or use --mock to use mock translator");
            return Err("Missing API key".into());
        }
        Arc::new(GoogleTranslateProvider::from_env()?)
    };

    let options = TranslateOptions::default()
        .with_source_locale(source_locale)
        .with_concurrency(concurrency)
        .with_strict_placeholders(strict);
    let translator = TreeTranslator::new(provider).with_options(options);

    tracing::info!(
        provider = translator.provider_name(),
        "Translating {} from {} to {}",
        input,
        source_locale,
        target_locale
    );

    let result = match translator.translate_json(&source, target_locale).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("❌ Failed to translate: {}", e);
            return Err(e.into());
        }
    };

    for failure in &result.failures {
        eprintln!("⚠️  {} left untranslated: {}", failure.path, failure.error);
    }

    let rendered = serde_json::to_string_pretty(&result.document.into_value())?;
    match output {
        Some(path) => {
            tokio::fs::write(path, format!("{}\n", rendered)).await?;
            eprintln!(
                "✅ {} translated, {} failed → {}",
                result.translated,
                result.failures.len(),
                path
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
