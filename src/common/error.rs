use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML write failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read access token from '{}': {source}", path.display())]
    Credential {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error creating directory '{}': {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScraperError>;
