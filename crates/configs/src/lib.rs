use std::{io, str::FromStr, time::Duration};

use anyhow::{anyhow, Context, Result};
use common::{env, types::ServiceKind};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub ports: ServicePorts,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: String::new(), ports: ServicePorts::default(), worker_threads: None }
    }
}

/// Listen port per service; unset entries come from `<KIND>_SERVICE_PORT`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServicePorts {
    pub create: Option<u16>,
    pub read: Option<u16>,
    pub update: Option<u16>,
    pub delete: Option<u16>,
}

impl ServicePorts {
    fn slot(&mut self, kind: ServiceKind) -> &mut Option<u16> {
        match kind {
            ServiceKind::Create => &mut self.create,
            ServiceKind::Read => &mut self.read,
            ServiceKind::Update => &mut self.update,
            ServiceKind::Delete => &mut self.delete,
        }
    }

    pub fn get(&self, kind: ServiceKind) -> Option<u16> {
        match kind {
            ServiceKind::Create => self.create,
            ServiceKind::Read => self.read,
            ServiceKind::Update => self.update,
            ServiceKind::Delete => self.delete,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection string; when set the individual parts are ignored.
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_secs: u64,
    /// Per-call limit; unset falls back to `MONGO_OP_TIMEOUT_SECS`, then 10s.
    #[serde(default)]
    pub op_timeout_secs: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            username: String::new(),
            password: String::new(),
            host: String::new(),
            port: None,
            name: String::new(),
            connect_timeout_secs: default_connect_timeout(),
            ping_timeout_secs: default_ping_timeout(),
            op_timeout_secs: None,
        }
    }
}

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_MONGO_PORT: u16 = 27017;
pub const DEFAULT_DATABASE: &str = "parcialdb";
const DEFAULT_OP_TIMEOUT_SECS: u64 = 10;

fn default_connect_timeout() -> u64 { 10 }
fn default_ping_timeout() -> u64 { 5 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file_or_default(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("cannot read config file {path}"))?;
    parse_config(&content, path)
}

/// Like `load_from_file`, but a missing file yields the defaults. Any other failure is returned.
pub fn load_from_file_or_default(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content, path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("cannot read config file {path}: {e}")),
    }
}

fn parse_config(content: &str, path: &str) -> Result<AppConfig> {
    toml::from_str(content).with_context(|| format!("invalid config file {path}"))
}

impl AppConfig {
    /// Config file if present, otherwise defaults; env fills whatever the file left blank.
    pub fn load_and_validate(kind: ServiceKind) -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate(kind)?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self, kind: ServiceKind) -> Result<()> {
        self.server.normalize(kind)?;
        self.database.normalize_from_env()?;
        self.database.validate()?;
        Ok(())
    }

    /// Bind address for `kind`. Call after `normalize_and_validate`.
    pub fn bind_addr(&self, kind: ServiceKind) -> String {
        let port = self.server.ports.get(kind).unwrap_or_else(|| kind.default_port());
        format!("{}:{}", self.server.host, port)
    }
}

impl ServerConfig {
    fn normalize(&mut self, kind: ServiceKind) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = env::var_or("SERVER_HOST", DEFAULT_HOST);
        }
        let port = self.ports.slot(kind);
        if port.is_none() {
            *port = Some(parse_env(kind.port_var())?.unwrap_or_else(|| kind.default_port()));
        }
        if *port == Some(0) {
            return Err(anyhow!("{} port must be in 1..=65535", kind));
        }
        match self.worker_threads {
            Some(0) => self.worker_threads = None,
            Some(_) => {}
            None => self.worker_threads = parse_env("TOKIO_WORKER_THREADS")?,
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Fill blank fields from `MONGO_*` variables, then apply defaults.
    pub fn normalize_from_env(&mut self) -> Result<()> {
        fill(&mut self.uri, "MONGO_URI");
        fill(&mut self.username, "MONGO_ROOT_USERNAME");
        fill(&mut self.password, "MONGO_ROOT_PASSWORD");
        fill(&mut self.host, "MONGO_HOST");
        fill(&mut self.name, "MONGO_DB");
        if self.name.is_empty() {
            self.name = DEFAULT_DATABASE.to_string();
        }
        if self.port.is_none() {
            self.port = Some(parse_env("MONGO_PORT")?.unwrap_or(DEFAULT_MONGO_PORT));
        }
        if self.op_timeout_secs.is_none() {
            self.op_timeout_secs = Some(parse_env("MONGO_OP_TIMEOUT_SECS")?.unwrap_or(DEFAULT_OP_TIMEOUT_SECS));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            if self.username.is_empty() || self.password.is_empty() || self.host.is_empty() {
                return Err(anyhow!(
                    "missing MongoDB settings: set MONGO_URI or MONGO_ROOT_USERNAME, MONGO_ROOT_PASSWORD and MONGO_HOST"
                ));
            }
        } else {
            let lower = self.uri.to_lowercase();
            if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
                return Err(anyhow!("database.uri must start with mongodb:// or mongodb+srv://"));
            }
        }
        if self.connect_timeout_secs == 0 || self.ping_timeout_secs == 0 || self.op_timeout_secs == Some(0) {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }

    /// Connection string, built from parts unless `uri` is set.
    pub fn connection_uri(&self) -> String {
        if !self.uri.trim().is_empty() {
            return self.uri.clone();
        }
        format!(
            "mongodb://{}:{}@{}:{}/?authSource=admin",
            self.username,
            self.password,
            self.host,
            self.port.unwrap_or(DEFAULT_MONGO_PORT)
        )
    }

    pub fn connect_timeout(&self) -> Duration { Duration::from_secs(self.connect_timeout_secs) }

    pub fn ping_timeout(&self) -> Duration { Duration::from_secs(self.ping_timeout_secs) }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_secs(self.op_timeout_secs.unwrap_or(DEFAULT_OP_TIMEOUT_SECS))
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>> {
    env::parse_var(key).map_err(anyhow::Error::msg)
}

fn fill(slot: &mut String, key: &str) {
    if slot.trim().is_empty() {
        if let Some(v) = env::var_opt(key) {
            *slot = v;
        }
    }
}
