use std::net::IpAddr;

use axum::http::HeaderValue;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub cors_origins: Vec<HeaderValue>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let db_max_connections: u32 = env_or("TAREFAS_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid TAREFAS_DB_MAX_CONNECTIONS: {e}"))?;

        let host: IpAddr = env_or("TAREFAS_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid TAREFAS_HOST: {e}"))?;

        let port: u16 = env_or("TAREFAS_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid TAREFAS_PORT: {e}"))?;

        let max_body_size: usize = env_or("TAREFAS_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid TAREFAS_MAX_BODY_SIZE: {e}"))?;

        let cors_origins = parse_origins(&env_or("TAREFAS_CORS_ORIGINS", ""))?;

        let log_level = env_or("TAREFAS_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            db_max_connections,
            host,
            port,
            max_body_size,
            cors_origins,
            log_level,
        })
    }
}

/// Parse a comma separated list of allowed CORS origins.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            HeaderValue::from_str(s)
                .map_err(|e| format!("Invalid TAREFAS_CORS_ORIGINS entry '{s}': {e}"))
        })
        .collect()
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
