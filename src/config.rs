//! Server configuration.
//!
//! Defaults, optionally overlaid by a YAML file named in `BASTION_CONFIG`,
//! then by individual environment variables:
//!
//! | variable            | field                          |
//! |---------------------|--------------------------------|
//! | `LISTEN`            | `server.listen_addr`           |
//! | `SERVER_ROOT`       | `server.root`                  |
//! | `SILENT`            | `server.silent`                |
//! | `TOKEN_SIGNING_KEY` | `auth.signing_key`             |
//! | `TOKEN_EXPIRATION`  | `auth.token_lifetime_secs`     |

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::auth::Credentials;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Directory static files are served from.
    pub root: PathBuf,
    /// Per-receive deadline; 0 disables it.
    pub read_timeout_secs: u64,
    pub max_body_bytes: usize,
    /// Serve `/index.html` for static paths that are missing or name a
    /// directory.
    pub html5_fallback: bool,
    /// Only log warnings and errors.
    pub silent: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            root: PathBuf::from("."),
            read_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
            html5_fallback: false,
            silent: false,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_secs > 0).then(|| Duration::from_secs(self.read_timeout_secs))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub signing_key: String,
    pub token_lifetime_secs: i64,
    pub store_capacity: usize,
    pub username: String,
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let creds = Credentials::default();
        Self {
            signing_key: "change-me".to_string(),
            token_lifetime_secs: 24 * 60 * 60,
            store_capacity: crate::auth::store::DEFAULT_CAPACITY,
            username: creds.username,
            password: creds.password,
        }
    }
}

impl AuthConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("BASTION_CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                Self::from_yaml(&text).with_context(|| format!("parsing config file {}", path))?
            }
            Err(_) => Self::default(),
        };

        cfg.apply_env()?;
        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(addr) = std::env::var("LISTEN") {
            self.server.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("SERVER_ROOT") {
            self.server.root = PathBuf::from(root);
        }
        if let Ok(silent) = std::env::var("SILENT") {
            self.server.silent = matches!(silent.as_str(), "1" | "true" | "yes");
        }
        if let Ok(key) = std::env::var("TOKEN_SIGNING_KEY") {
            self.auth.signing_key = key;
        }
        if let Ok(secs) = std::env::var("TOKEN_EXPIRATION") {
            self.auth.token_lifetime_secs = secs
                .parse()
                .with_context(|| format!("TOKEN_EXPIRATION is not a number: {}", secs))?;
        }
        Ok(())
    }
}
