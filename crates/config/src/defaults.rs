pub const STORAGE_POSTGRES: &str = "postgres";
pub const STORAGE_MEMORY: &str = "memory";

pub const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    8080
}

pub fn default_run_migrations() -> bool {
    true
}

pub fn default_postgres_port() -> u16 {
    5432
}

pub fn default_ssl_mode() -> String {
    "prefer".to_string()
}

pub fn default_max_connections() -> u32 {
    20
}

pub fn default_connection_timeout() -> u64 {
    30
}

pub fn default_idle_timeout() -> u64 {
    600
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}
