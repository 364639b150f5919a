//! Transformer inspection service binary
//!
//! Commands for writing, validating and serving a configuration.

mod storage;

use anyhow::{Context, Result};
use cli::{Cli, Commands, LogFormatArg, StorageBackend};
use config::{generate_default_config, load_config, save_config, validate_config};
use inspection::api::{inspection_routes, InspectionApiState};
use inspection::InspectionManager;
use observability::{init_logging, init_metrics, LogFormat};
use server::{
    health_routes, validate_ports_available, HealthState, HttpServer, Server, ServerConfig,
    ShutdownController,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start {
            config,
            http,
            storage,
        } => start_service(cli.log_format, config, http, storage).await,
        Commands::Validate { config } => {
            init_logging("inspectd", resolve_log_format(cli.log_format, None))?;
            validate_command(config)
        }
        Commands::Init { output } => {
            init_logging("inspectd", resolve_log_format(cli.log_format, None))?;
            init_command(output)
        }
    }
}

/// The command-line flag wins over the config file; unknown names fall
/// back to pretty.
fn resolve_log_format(flag: Option<LogFormatArg>, configured: Option<&str>) -> LogFormat {
    flag.map(|f| f.as_str())
        .or(configured)
        .and_then(LogFormat::parse)
        .unwrap_or_default()
}

async fn start_service<P: AsRef<Path>>(
    log_format: Option<LogFormatArg>,
    config_path: P,
    http_override: Option<u16>,
    storage_override: Option<StorageBackend>,
) -> Result<()> {
    let mut config = load_config(config_path.as_ref())?;
    let configured_format = config.logging().format;
    init_logging(
        &config.service.name,
        resolve_log_format(log_format, Some(&configured_format)),
    )?;

    if let Some(port) = http_override {
        debug!(port, "Overriding HTTP port");
        config.server.http_port = port;
    }
    if let Some(backend) = storage_override {
        debug!(backend = backend.as_str(), "Overriding storage backend");
        config.storage.storage_type = backend.as_str().to_string();
    }

    let report = validate_config(&config);

    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start service due to configuration errors");
    }

    let monitoring = config.monitoring();
    if monitoring.metrics_enabled {
        init_metrics(monitoring.metrics_port)?;
    }

    info!(
        service = %config.service.name,
        version = %config.service.version,
        storage = %config.storage.storage_type,
        http_port = config.server.http_port,
        "Starting service"
    );

    let shutdown = ShutdownController::with_ctrl_c();
    let backends = storage::build_storage(&config.storage, &shutdown).await?;

    let manager = Arc::new(InspectionManager::new(
        backends.transformers,
        backends.inspections,
    ));

    let mut health = HealthState::new(&config.service.name, &config.service.version);
    if let Some(probe) = backends.probe {
        health = health.with_probe(probe);
    }

    let router = inspection_routes(Arc::new(InspectionApiState::new(manager)))
        .merge(health_routes(Arc::new(health)));

    let server_config = ServerConfig::new(config.server.host.clone(), config.server.http_port);
    validate_ports_available(&server_config).await?;

    HttpServer::new(server_config, router)
        .run(shutdown.token())
        .await?;

    info!("Service stopped");
    Ok(())
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {} {}", config.service.name, config.service.version);
    println!("HTTP: {}", config.server.http_address());
    println!("Storage: {}", config.storage.storage_type);
    println!("Seed transformers: {}", config.storage.seed_transformers.len());
    println!("Log format: {}", config.logging().format);

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Set DB_HOST, DB_USER and DB_PASSWORD, or switch storage.type to memory");
    println!(
        "  2. Run 'inspectd validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'inspectd start --config {:?}' to start the service",
        output_path
    );

    Ok(())
}
