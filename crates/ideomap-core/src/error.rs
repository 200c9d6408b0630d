use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdeomapError {
    #[error("Malformed category definition '{key}': {reason}")]
    MalformedDefinition { key: String, reason: String },

    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },

    #[error("Definition file does not exist: {path}")]
    DefinitionsNotFound { path: PathBuf },

    #[error("Unknown axis: '{name}' - expected economic, culture or authority")]
    InvalidAxis { name: String },

    #[error("Invalid classification mode: '{name}' - expected first-match or nearest")]
    InvalidMode { name: String },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, IdeomapError>;

impl IdeomapError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CategoryNotFound { .. } => 2,
            Self::DefinitionsNotFound { .. } => 3,
            Self::MalformedDefinition { .. } => 4,
            Self::InvalidAxis { .. } | Self::InvalidMode { .. } => 5,
            Self::ConfigParse { .. } | Self::ConfigKeyNotFound { .. } => 6,
            _ => 1,
        }
    }

    pub(crate) fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
