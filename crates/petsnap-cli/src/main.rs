//! PetSnap CLI
//!
//! Classifies pet photos as cat or dog from the command line, using the
//! same classifier service the app embeds.

use anyhow::Result;
use clap::{Parser, Subcommand};
use petsnap_classifier::{CancellationToken, FileImageSizeProvider, PetClassifier};
use petsnap_core::{ClassificationResult, Error};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

mod config;

use config::{CliConfig, OutputFormat};

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_CANCELLED: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "petsnap")]
#[command(about = "Classify pet photos as cat or dog", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "petsnap.yaml", global = true)]
    config: String,

    /// Simulated inference latency in milliseconds
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one or more images
    Classify {
        /// Image paths or file:// URIs
        #[arg(required = true)]
        images: Vec<String>,
    },

    /// Initialize the backend and report whether it is ready
    Warmup,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    let config = CliConfig::load(&cli.config, &cli)?;
    info!(
        auto_initialize = config.classifier.auto_initialize,
        backend = ?config.classifier.backend,
        "configuration loaded"
    );

    let classifier = Arc::new(PetClassifier::from_config(
        &config.classifier,
        Arc::new(FileImageSizeProvider::new()),
    ));

    // Ctrl-C / SIGTERM cancels whatever is in flight
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            warn!("shutdown signal received, cancelling");
            cancel.cancel();
        });
    }

    let code = match cli.command {
        Command::Classify { images } => {
            classify_all(&classifier, &images, config.output, &cancel).await
        }
        Command::Warmup => warmup(&classifier).await,
    };

    let snapshot = classifier.metrics().snapshot();
    info!(
        requests = snapshot.total_requests,
        successes = snapshot.successes,
        failures = snapshot.failures,
        avg_latency_us = snapshot.avg_latency_us(),
        "done"
    );

    Ok(ExitCode::from(code))
}

async fn classify_all(
    classifier: &PetClassifier,
    images: &[String],
    output: OutputFormat,
    cancel: &CancellationToken,
) -> u8 {
    let mut failed = 0usize;

    for image in images {
        let outcome = classifier.classify_with_cancel(image, cancel).await;
        print_outcome(image, &outcome, output);

        match outcome {
            Ok(_) => {}
            Err(Error::Cancelled) => return EXIT_CANCELLED,
            Err(_) => failed += 1,
        }
    }

    if failed == 0 {
        EXIT_SUCCESS
    } else {
        warn!(failed, total = images.len(), "some images could not be classified");
        EXIT_FAILURE
    }
}

async fn warmup(classifier: &PetClassifier) -> u8 {
    if classifier.load_model().await {
        println!("{}: {}", classifier.backend_name(), classifier.state());
        EXIT_SUCCESS
    } else {
        eprintln!("{}: {}", classifier.backend_name(), classifier.state());
        EXIT_FAILURE
    }
}

fn print_outcome(
    image: &str,
    outcome: &petsnap_core::Result<ClassificationResult>,
    output: OutputFormat,
) {
    match (output, outcome) {
        (OutputFormat::Text, Ok(result)) => {
            println!("{}\t{}\t{:.2}%", image, result.label, result.confidence)
        }
        (OutputFormat::Text, Err(e)) => eprintln!("{}\terror: {}", image, e),
        (OutputFormat::Json, Ok(result)) => println!(
            "{}",
            serde_json::json!({
                "image": image,
                "label": result.label,
                "confidence": result.confidence,
                "backend": result.backend,
                "latency_us": result.latency_us,
            })
        ),
        (OutputFormat::Json, Err(e)) => println!(
            "{}",
            serde_json::json!({
                "image": image,
                "error": e.to_string(),
                "kind": e.kind(),
            })
        ),
    }
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("petsnap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("petsnap=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
