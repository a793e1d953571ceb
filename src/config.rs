use std::net::SocketAddr;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::auth::Authenticator;
use crate::database::DatabaseConfig;
use crate::error::{ApplicationError, ConfigLoadSnafu};
use crate::model::VideoDefaults;
use crate::prelude::*;

/// Process configuration, read from the environment (and a `.env` file, if present).
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address", default = "default_host")]
    pub host: SocketAddr,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// JSON fixtures loaded into the database on startup.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
    #[serde(flatten)]
    pub database: DatabaseConfig,
    #[serde(flatten)]
    pub auth: AuthConfig,
    #[serde(flatten)]
    pub videos: VideoDefaults,
}

impl Config {
    pub fn from_env() -> Result<Config, ApplicationError> {
        envy::from_env::<Config>().context(ConfigLoadSnafu)
    }

    pub fn authenticator(&self) -> Authenticator {
        Authenticator::new(SecretString::new(self.auth.secret.clone()))
    }
}

#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(rename = "jwt_secret")]
    secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

fn default_host() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
