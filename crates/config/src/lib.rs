use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub name: String,
    pub version: String,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(rename = "http_port")]
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl ServerSettings {
    /// Get the full HTTP address (host:http_port)
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub storage_type: String,
    #[serde(rename = "run_migrations")]
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
    #[serde(default)]
    pub postgres: Option<PostgresConfig>,
    /// Transformer numbers registered at startup
    #[serde(rename = "seed_transformers")]
    #[serde(default)]
    pub seed_transformers: Vec<String>,
}

impl StorageConfig {
    pub fn is_memory(&self) -> bool {
        self.storage_type == STORAGE_MEMORY
    }

    pub fn is_postgres(&self) -> bool {
        self.storage_type == STORAGE_POSTGRES
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostgresConfig {
    pub host: String,
    #[serde(default = "default_postgres_port")]
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    #[serde(rename = "ssl_mode")]
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    #[serde(rename = "max_connections")]
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(rename = "connection_timeout_seconds")]
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,
    #[serde(rename = "idle_timeout_seconds")]
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitoringConfig {
    #[serde(rename = "metrics_enabled")]
    #[serde(default)]
    pub metrics_enabled: bool,
    #[serde(rename = "metrics_port")]
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_port: default_metrics_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MasterConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub server: ServerSettings,
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub monitoring: Option<MonitoringConfig>,
}

impl MasterConfig {
    /// Logging section, falling back to defaults when omitted
    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }

    /// Monitoring section, falling back to defaults when omitted
    pub fn monitoring(&self) -> MonitoringConfig {
        self.monitoring.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
service:
  name: inspection-service
  version: 1.0.0
server:
  host: 127.0.0.1
  http_port: 8088
storage:
  type: postgres
  postgres:
    host: db.internal
    database: inspections
    user: inspector
    password: secret
logging:
  format: json
"#;

    #[test]
    fn test_parse_sample_config() {
        let cfg: MasterConfig = serde_yaml::from_str(SAMPLE).unwrap();

        assert_eq!(cfg.service.name, "inspection-service");
        assert_eq!(cfg.server.http_address(), "127.0.0.1:8088");
        assert!(cfg.storage.is_postgres());
        assert!(cfg.storage.run_migrations);
        assert!(cfg.storage.seed_transformers.is_empty());

        let pg = cfg.storage.postgres.as_ref().unwrap();
        assert_eq!(pg.port, 5432);
        assert_eq!(pg.ssl_mode, "prefer");
        assert_eq!(pg.max_connections, 20);
        assert_eq!(pg.connection_timeout_seconds, 30);
        assert_eq!(pg.idle_timeout_seconds, 600);

        assert_eq!(cfg.logging().format, "json");
        assert!(cfg.monitoring.is_none());
        assert!(!cfg.monitoring().metrics_enabled);
        assert_eq!(cfg.monitoring().metrics_port, 9090);
    }

    #[test]
    fn test_server_section_defaults() {
        let yaml = r#"
service:
  name: svc
  version: 0.1.0
storage:
  type: memory
  seed_transformers: [TX-1, TX-2]
"#;
        let cfg: MasterConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.server.http_address(), "0.0.0.0:8080");
        assert!(cfg.storage.is_memory());
        assert_eq!(cfg.storage.seed_transformers, vec!["TX-1", "TX-2"]);
        assert_eq!(cfg.logging().format, "pretty");
    }

    #[test]
    fn test_missing_storage_type_fails() {
        let yaml = r#"
service:
  name: svc
  version: 0.1.0
storage:
  run_migrations: false
"#;
        assert!(serde_yaml::from_str::<MasterConfig>(yaml).is_err());
    }
}
