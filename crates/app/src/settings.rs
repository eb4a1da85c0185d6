//! Handles settings for the application. Configuration is written in
//! `romana.toml`; every section is optional and the binary falls back to
//! defaults when the file is absent.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level passed to the tracing env filter.
    pub level: String,
    /// Display name framed as "you" in created groups.
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: Option<App>,
    pub storage: Option<Storage>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("romana").required(false))
            .build()?;

        settings.try_deserialize()
    }
}
