use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum IslandConfigError {
    #[error("Cargo.toml not found in package root")]
    ConfigNotFound,
    #[error("package.metadata.island section missing from Cargo.toml")]
    ConfigSectionNotFound,
    #[error("Failed to read island environment: {0}")]
    EnvVarError(String),
    #[error("Config Error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for IslandConfigError {
    fn from(e: config::ConfigError) -> Self {
        Self::ConfigError(e.to_string())
    }
}
