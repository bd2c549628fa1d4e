//! Krishi CLI - multilingual farming advice from the command line
//!
//! Each subcommand is one advisory task run through the model fallback
//! gateway. Answers go to stdout, logs to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use krishi_mitra::{
    gemini_controller, Advice, AdvisorySession, GatewayConfig, GeminiClient, Generation,
    ImageAttachment, Language,
};
use std::io::{self, Read};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "krishi")]
#[command(version)]
#[command(about = "Krishi Mitra: AI farming advice in your language", long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a farming question
    Ask {
        /// Question text (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Answer language (detected from the question if not provided)
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Detect the language of some text
    DetectLanguage {
        /// Text to analyze (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Diagnose a crop photo (jpg, jpeg or png, up to 10 MB)
    AnalyzeImage {
        /// Path to the image
        path: std::path::PathBuf,

        /// What the farmer noticed
        #[arg(short, long, default_value = "")]
        context: String,

        /// Answer language (detected from the context if not provided)
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Lifecycle, season and economics guide for a crop
    Knowledge {
        /// Crop name
        crop: String,

        /// Answer language (detected from the crop name if not provided)
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Look up government agriculture schemes
    Scheme {
        /// Scheme question (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Answer language (detected from the query if not provided)
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Show the model roster
    Models {
        /// Ask the provider which models support generateContent
        #[arg(long)]
        remote: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON output with metadata
    Json,
}

fn read_input(input: Option<String>) -> Result<String> {
    match input {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read from stdin")?;
            Ok(buffer.trim().to_string())
        }
    }
}

/// Print an answer; returns whether a model actually answered.
fn emit(advice: &Advice, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Text => {
            println!("{}", advice.generation.render());
            eprintln!();
            eprintln!("---");
            eprintln!("Language: {} ({})", advice.language.name(), advice.language);
            match &advice.generation {
                Generation::Answer { model, .. } => eprintln!("Model: {}", model),
                Generation::Exhausted { attempts } => {
                    for attempt in attempts {
                        eprintln!(
                            "Failed: {} [{}] {}",
                            attempt.model, attempt.kind, attempt.detail
                        );
                    }
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(advice)?);
        }
    }
    Ok(advice.generation.is_answer())
}

async fn resolve_language(
    session: &mut AdvisorySession,
    language: Option<Language>,
    text: &str,
) -> Language {
    match language {
        Some(lang) => lang,
        None => session.detect_language(text).await,
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let config = GatewayConfig::from_env().context("invalid gateway configuration")?;

    if let Commands::Models { remote } = cli.command {
        let models = if remote {
            GeminiClient::from_config(&config)?
                .list_models()
                .await
                .context("failed to list provider models")?
        } else {
            config.models.clone()
        };
        match cli.format {
            OutputFormat::Text => models.iter().for_each(|m| println!("{}", m)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&models)?),
        }
        return Ok(true);
    }

    let controller = Arc::new(gemini_controller(&config)?);
    let mut session = AdvisorySession::new(controller, config.roster()?);

    let advice = match cli.command {
        Commands::Ask { input, language } => {
            let query = read_input(input)?;
            let language = resolve_language(&mut session, language, &query).await;
            Advice {
                language,
                generation: session.farming_answer(&query, language).await,
            }
        }

        Commands::DetectLanguage { input } => {
            let text = read_input(input)?;
            let language = session.detect_language(&text).await;
            match cli.format {
                OutputFormat::Text => println!("{}", language),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "code": language.code(), "name": language.name() })
                ),
            }
            return Ok(true);
        }

        Commands::AnalyzeImage {
            path,
            context,
            language,
        } => {
            let image = ImageAttachment::from_path(&path)
                .with_context(|| format!("cannot use image {}", path.display()))?;
            let language = resolve_language(&mut session, language, &context).await;
            Advice {
                language,
                generation: session.analyze_crop_image(image, &context, language).await,
            }
        }

        Commands::Knowledge { crop, language } => {
            let language = resolve_language(&mut session, language, &crop).await;
            Advice {
                language,
                generation: session.crop_knowledge(&crop, language).await,
            }
        }

        Commands::Scheme { input, language } => {
            let query = read_input(input)?;
            let language = resolve_language(&mut session, language, &query).await;
            Advice {
                language,
                generation: session.scheme_info(&query, language).await,
            }
        }

        Commands::Models { .. } => return Ok(true),
    };

    emit(&advice, cli.format)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
