use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO / Parsing
    //-------------------------------------------------------------------------
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    //-------------------------------------------------------------------------
    // Resource mappings
    //-------------------------------------------------------------------------
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPathPattern { pattern: String, reason: String },

    #[error("resource mappings are enabled but no static locations are configured")]
    EmptyStaticLocations,

    //-------------------------------------------------------------------------
    // Chain / strategies
    //-------------------------------------------------------------------------
    #[error("fixed version strategy is enabled but no version is configured")]
    FixedVersionMissingVersion,

    #[error("strategy path '{path}' must start with '/'")]
    InvalidStrategyPath { path: String },

    #[error("invalid strategy path pattern '{pattern}': {source}")]
    InvalidStrategyPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
