//! Service settings shared by the binaries

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::SettingsError;

/// Listen address of a service
///
/// Loaded from `<PREFIX>_HOST` and `<PREFIX>_PORT`, falling back to
/// `0.0.0.0` and the service's default port.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn load(prefix: &str, default_port: u16) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .add_source(Environment::with_prefix(prefix))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read a PEM key from the environment variable `name`.
///
/// The value is either the PEM itself or a path to a file holding it. Paths
/// are tried relative to the working directory, then to `manifest_dir`.
pub fn read_pem(name: &'static str, manifest_dir: &str) -> Result<String, SettingsError> {
    let value = std::env::var(name).map_err(|_| SettingsError::Missing(name))?;

    if value.starts_with("-----BEGIN") {
        return Ok(value);
    }

    std::fs::read_to_string(&value)
        .or_else(|_| {
            let mut path = std::path::PathBuf::from(manifest_dir);
            path.push(&value);
            std::fs::read_to_string(path)
        })
        .map(|pem| pem.trim().to_string())
        .map_err(|e| SettingsError::Invalid {
            name,
            reason: format!("failed to read key file {value}: {e}"),
        })
}
