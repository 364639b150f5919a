use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());
    parse_config(&content)
}

/// Parse configuration text after environment variable substitution
pub fn parse_config(content: &str) -> Result<MasterConfig> {
    let substituted = substitution::substitute_env_vars(content)?;

    let config: MasterConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!(service = %config.service.name, storage = %config.storage.storage_type, "Configuration loaded");
    Ok(config)
}

#[instrument]
pub fn generate_default_config() -> MasterConfig {
    MasterConfig {
        service: ServiceConfig {
            name: "inspection-service".to_string(),
            version: "1.0.0".to_string(),
        },
        server: ServerSettings::default(),
        storage: StorageConfig {
            storage_type: STORAGE_POSTGRES.to_string(),
            run_migrations: default_run_migrations(),
            postgres: Some(PostgresConfig {
                host: "${DB_HOST}".to_string(),
                port: default_postgres_port(),
                database: "inspections".to_string(),
                user: "${DB_USER}".to_string(),
                password: "${DB_PASSWORD}".to_string(),
                ssl_mode: default_ssl_mode(),
                max_connections: default_max_connections(),
                connection_timeout_seconds: default_connection_timeout(),
                idle_timeout_seconds: default_idle_timeout(),
            }),
            seed_transformers: Vec::new(),
        },
        logging: Some(LoggingConfig::default()),
        monitoring: Some(MonitoringConfig::default()),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MasterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}
