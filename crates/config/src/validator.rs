use crate::*;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Service name is required")]
    MissingServiceName,

    #[error("Invalid version format: {0}. Must be in format X.Y.Z (e.g., 1.0.0)")]
    InvalidVersionFormat(String),

    #[error("{field} must be a positive integer")]
    InvalidPort { field: String },

    #[error("Storage: {message}")]
    InvalidStorage { message: String },

    #[error("Environment variable placeholder in '{field}' is unresolved: {value}")]
    UnresolvedEnvVar { field: String, value: String },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("metrics_port {0} conflicts with the HTTP port")]
    MetricsPortConflict(u16),
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_service(&config.service, &mut report);
    validate_server(&config.server, &mut report);
    validate_storage(&config.storage, &mut report);

    match config.logging {
        Some(ref logging) => validate_logging(logging, &mut report),
        None => report.add_default("logging.format", &default_log_format()),
    }

    match config.monitoring {
        Some(ref monitoring) => validate_monitoring(monitoring, &config.server, &mut report),
        None => report.add_default("monitoring.metrics_enabled", "false"),
    }

    report
}

fn validate_service(service: &ServiceConfig, report: &mut ValidationReport) {
    if service.name.trim().is_empty() {
        report.add_error(ValidationError::MissingServiceName);
    }

    let version_ok = Regex::new(r"^\d+\.\d+\.\d+$")
        .map_or(false, |re| re.is_match(&service.version));
    if !version_ok {
        report.add_error(ValidationError::InvalidVersionFormat(service.version.clone()));
    }
}

fn validate_server(server: &ServerSettings, report: &mut ValidationReport) {
    if server.http_port == 0 {
        report.add_error(ValidationError::InvalidPort {
            field: "server.http_port".to_string(),
        });
    }
}

fn validate_storage(storage: &StorageConfig, report: &mut ValidationReport) {
    let valid_types = [STORAGE_POSTGRES, STORAGE_MEMORY];
    if !valid_types.contains(&storage.storage_type.as_str()) {
        report.add_error(ValidationError::InvalidStorage {
            message: format!(
                "Invalid storage type '{}'. Must be one of: postgres, memory",
                storage.storage_type
            ),
        });
    }

    if storage.is_postgres() {
        if let Some(ref pg) = storage.postgres {
            validate_postgres_config(pg, report);
        } else {
            report.add_error(ValidationError::InvalidStorage {
                message: "Storage type is 'postgres' but postgres configuration is missing".to_string(),
            });
        }

        if !storage.seed_transformers.is_empty() && !storage.run_migrations {
            report.add_warning(
                "storage.seed_transformers",
                "Seeding with run_migrations disabled requires the transformers table to exist",
            );
        }
    }

    if storage.is_memory() && storage.seed_transformers.is_empty() {
        report.add_warning(
            "storage.seed_transformers",
            "Memory backend has no transformers; every request will return not found",
        );
    }
}

fn validate_postgres_config(pg: &PostgresConfig, report: &mut ValidationReport) {
    for (field, value) in [
        ("storage.postgres.host", &pg.host),
        ("storage.postgres.database", &pg.database),
        ("storage.postgres.user", &pg.user),
    ] {
        if value.trim().is_empty() {
            report.add_error(ValidationError::InvalidStorage {
                message: format!("{} is required", field),
            });
        }
    }

    for (field, value) in [
        ("storage.postgres.host", &pg.host),
        ("storage.postgres.database", &pg.database),
        ("storage.postgres.user", &pg.user),
    ] {
        if has_unresolved_env_vars(value) {
            report.add_error(ValidationError::UnresolvedEnvVar {
                field: field.to_string(),
                value: value.clone(),
            });
        }
    }

    // Passwords may contain a literal `$`
    if has_unresolved_braced_env_vars(&pg.password) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: "storage.postgres.password".to_string(),
            value: pg.password.clone(),
        });
    }

    if pg.port == 0 {
        report.add_error(ValidationError::InvalidPort {
            field: "storage.postgres.port".to_string(),
        });
    }

    if pg.max_connections == 0 {
        report.add_error(ValidationError::InvalidStorage {
            message: "max_connections must be a positive integer".to_string(),
        });
    }

    if pg.ssl_mode == "disable" {
        report.add_warning(
            "storage.postgres.ssl_mode",
            "TLS is disabled for the database connection",
        );
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    if !LOG_FORMATS.contains(&logging.format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }
}

fn validate_monitoring(
    monitoring: &MonitoringConfig,
    server: &ServerSettings,
    report: &mut ValidationReport,
) {
    if !monitoring.metrics_enabled {
        return;
    }

    if monitoring.metrics_port == 0 {
        report.add_error(ValidationError::InvalidPort {
            field: "monitoring.metrics_port".to_string(),
        });
    } else if monitoring.metrics_port == server.http_port {
        report.add_error(ValidationError::MetricsPortConflict(monitoring.metrics_port));
    }
}
