use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: String,
    pub database_url: String,
    pub request_timeout: Duration,
    pub db_max_connections: u32,
}

/// Per-service fallbacks for unset variables.
#[derive(Debug, Clone, Copy)]
pub struct Defaults {
    pub server_port: &'static str,
    pub database_url: &'static str,
}

impl Defaults {
    pub const CUSTOMERS: Defaults = Defaults {
        server_port: "8081",
        database_url: "sqlite://customers.db",
    };
    pub const ORDERS: Defaults = Defaults {
        server_port: "8080",
        database_url: "sqlite://orders.db",
    };
}

impl Config {
    pub fn from_env(defaults: Defaults) -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| defaults.server_port.into());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| defaults.database_url.into());
        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(v.parse()?),
            Err(_) => Duration::from_secs(30),
        };
        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v.parse()?,
            Err(_) => 5,
        };
        Ok(Self {
            server_port,
            database_url,
            request_timeout,
            db_max_connections,
        })
    }
}
