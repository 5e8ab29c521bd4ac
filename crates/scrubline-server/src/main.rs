//! Scrubline - secret and PII sanitization service
//!
//! Runs the sanitization engine as an HTTP service or as one-shot commands.
//!
//! Usage:
//! ```bash
//! # Start the server (default command)
//! scrubline --config scrubline.yaml
//!
//! # Sanitize a file, masking matches
//! scrubline sanitize --file notes.txt --mode mask
//!
//! # Gate a commit message
//! git log -1 --format=%B | scrubline validate
//! ```
//!
//! Test with:
//! ```bash
//! curl http://localhost:8088/v1/sanitize \
//!   -H "Content-Type: application/json" \
//!   -d '{"text": "Contact me at john.doe@example.com", "redaction_mode": "mask"}'
//! ```

mod api;
mod commands;
mod config;

use anyhow::{Context, Result};
use api::{AppState, ServiceReadiness};
use clap::{Parser, Subcommand};
use commands::{InputArgs, OverrideArgs};
use config::ScrublineConfig;
use scrubline_observability::{HealthState, Metrics, health_router};
use scrubline_sanitizer::{PatternRegistry, Sanitizer, Severity};
use scrubline_storage::{AuditStore, JsonFileSnapshot};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Scrubline - find and redact secrets in free-form text
#[derive(Parser)]
#[command(name = "scrubline")]
#[command(about = "Secret and PII sanitization service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "SCRUBLINE_CONFIG",
        global = true
    )]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default if no command specified)
    Serve,
    /// List detected spans without redacting
    Scan {
        #[command(flatten)]
        input: InputArgs,

        /// Skip detectors below this severity
        #[arg(long, value_name = "SEVERITY")]
        min_severity: Option<Severity>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the redacted text; report lines go to stderr
    Sanitize {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        overrides: OverrideArgs,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Exit non-zero if anything detectable remains
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Skip detectors below this severity
        #[arg(long, value_name = "SEVERITY")]
        min_severity: Option<Severity>,

        /// Print JSON instead of one line per residual match
        #[arg(long)]
        json: bool,
    },
    /// Run the pipeline over built-in example strings
    Demo,
    /// List the registered detectors
    Patterns {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(config_path) => {
            let path = shellexpand::tilde(config_path).to_string();
            ScrublineConfig::from_file(&path)
                .with_context(|| format!("Failed to load configuration from {}", path))?
        }
        None => ScrublineConfig::default(),
    };

    // Environment variables override the config file
    config.merge_env();
    config.validate()?;

    init_tracing(&config.logging.level)?;
    match &cli.config {
        Some(path) => info!("📁 Loaded configuration from: {}", path),
        None => info!("📁 Using default configuration"),
    }

    // A malformed detector is fatal here, before any text is handled
    let registry = PatternRegistry::builtin().context("Failed to compile built-in detectors")?;
    let sanitizer = Sanitizer::new(Arc::new(registry), config.sanitization.clone());

    match cli.command {
        Some(Commands::Serve) | None => {
            serve(config, sanitizer).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Scan {
            input,
            min_severity,
            json,
        }) => commands::scan(&sanitizer, &input, min_severity, json),
        Some(Commands::Sanitize {
            input,
            overrides,
            json,
        }) => commands::sanitize(&sanitizer, &input, &overrides, json),
        Some(Commands::Validate {
            input,
            min_severity,
            json,
        }) => commands::validate(&sanitizer, &input, min_severity, json),
        Some(Commands::Demo) => commands::demo(&sanitizer),
        Some(Commands::Patterns { json }) => commands::patterns(&sanitizer, json),
    }
}

/// Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
/// takes precedence over the configured level.
fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn serve(config: ScrublineConfig, sanitizer: Sanitizer) -> Result<()> {
    info!("🚀 Initializing Scrubline");
    info!(
        "   Detectors: {} (mode: {}, min severity: {})",
        sanitizer.registry().len(),
        config.sanitization.redaction_mode,
        config.sanitization.min_severity
    );

    let metrics = Arc::new(Metrics::new()?);

    let audit = if config.audit.enabled {
        let path = config.audit.resolved_path();
        let mut store = AuditStore::open(JsonFileSnapshot::new(&path))
            .await
            .with_context(|| format!("Failed to open audit store at {}", path.display()))?;
        if let Some(max_records) = config.audit.max_records {
            store = store.with_capacity(max_records);
        }
        info!("📝 Audit trail: {} ({} records)", path.display(), store.len().await);
        Some(Arc::new(store))
    } else {
        None
    };

    let auto_flush = audit.as_ref().map(|store| {
        Arc::clone(store).start_auto_flush(Duration::from_secs(config.audit.flush_interval_secs))
    });

    let state = AppState {
        sanitizer: sanitizer.clone(),
        metrics: metrics.clone(),
        audit: audit.clone(),
        max_input_bytes: config.server.max_input_bytes,
    };
    let readiness = Arc::new(ServiceReadiness {
        sanitizer,
        audit: audit.clone(),
    });
    let health_state = HealthState::with_readiness_checker(metrics, readiness);

    let app = api::router(state).merge(health_router(health_state));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("");
    info!("✅ Scrubline listening on http://{}", addr);
    info!("   API endpoints:");
    info!("   - Scan:      http://{}/v1/scan", addr);
    info!("   - Sanitize:  http://{}/v1/sanitize", addr);
    info!("   - Validate:  http://{}/v1/validate", addr);
    info!("   - Patterns:  http://{}/v1/patterns", addr);
    info!("   Observability:");
    info!("   - Health check:       http://{}/healthz", addr);
    info!("   - Readiness check:    http://{}/readyz", addr);
    info!("   - Prometheus metrics: http://{}/metrics", addr);
    info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = auto_flush {
        handle.abort();
    }
    if let Some(store) = audit {
        store.flush().await.context("Failed to flush audit trail")?;
        info!("📝 Flushed {} audit records", store.len().await);
    }

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received");
}
