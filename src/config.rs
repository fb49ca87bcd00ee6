use std::env;

/// Which authentication profile the server runs under.
///
/// `Required` is the multi-user deployment: task routes demand a bearer
/// token and every task is scoped to its owner. `Open` is the single-list
/// deployment: task routes are public and tasks carry no owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Required,
    Open,
}

impl AuthMode {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "open" => AuthMode::Open,
            _ => AuthMode::Required,
        }
    }
}

pub struct Config {
    /// Optional; when absent the server falls back to the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub auth_mode: AuthMode,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok(),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            auth_mode: env::var("AUTH_MODE")
                .map(|v| AuthMode::parse(&v))
                .unwrap_or(AuthMode::Required),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
