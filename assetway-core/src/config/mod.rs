mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Pattern for the bundled third-party asset mapping. Registered before the
/// configurable static pattern so vendor assets keep working when the static
/// pattern is remapped.
pub const VENDOR_PATH_PATTERN: &str = "/vendor/**";

/// Directory backing [`VENDOR_PATH_PATTERN`].
pub const VENDOR_LOCATION: &str = "assets/vendor";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AssetwayConfig {
    #[serde(default)]
    pub resources: ResourceMappingConfig,

    #[serde(default)]
    pub chain: ChainConfig,
}

impl AssetwayConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let cfg: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::parse(path, e))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resources.validate()?;
        self.chain.validate()?;
        Ok(())
    }
}

impl FromStr for AssetwayConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cfg: Self = toml::from_str(s).map_err(|e| ConfigError::parse("<inline>", e))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceMappingConfig {
    /// Register the default handler mappings at all. When false the registry
    /// is left untouched.
    #[serde(default = "default_true")]
    pub add_mappings: bool,

    /// Cache period applied to every built registration, in seconds.
    /// Absent means no Cache-Control header.
    #[serde(default)]
    pub cache_period_secs: Option<u64>,

    /// Pattern served from `static_locations` (longest-prefix semantics,
    /// trailing `/**`).
    #[serde(default = "default_static_path_pattern")]
    pub static_path_pattern: String,

    /// Ordered lookup roots. The first location containing a requested file
    /// wins.
    #[serde(default = "default_static_locations")]
    pub static_locations: Vec<PathBuf>,
}

impl Default for ResourceMappingConfig {
    fn default() -> Self {
        Self {
            add_mappings: true,
            cache_period_secs: None,
            static_path_pattern: default_static_path_pattern(),
            static_locations: default_static_locations(),
        }
    }
}

impl ResourceMappingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.static_path_pattern.starts_with('/') {
            return Err(ConfigError::InvalidPathPattern {
                pattern: self.static_path_pattern.clone(),
                reason: "must start with '/'".to_string(),
            });
        }
        if self.add_mappings && self.static_locations.is_empty() {
            return Err(ConfigError::EmptyStaticLocations);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    /// Explicit switch for the resolver/transformer chain. Left unset, the
    /// chain activates when either version strategy is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Memoize chain resolutions per registration.
    #[serde(default = "default_true")]
    pub cache: bool,

    /// Look for precompressed `.gz` siblings of resolved files.
    #[serde(default)]
    pub gzip: bool,

    /// Rewrite HTML5 app-cache manifests through the chain.
    #[serde(default)]
    pub html_app_cache: bool,

    #[serde(default)]
    pub strategy: VersionStrategyConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            cache: true,
            gzip: false,
            html_app_cache: false,
            strategy: VersionStrategyConfig::default(),
        }
    }
}

impl ChainConfig {
    /// Resolved once at startup; there is no runtime re-probing.
    pub fn is_active(&self) -> bool {
        match self.enabled {
            Some(enabled) => enabled,
            None => self.strategy.fixed.enabled || self.strategy.content.enabled,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy.fixed.enabled && self.strategy.fixed.version.is_empty() {
            return Err(ConfigError::FixedVersionMissingVersion);
        }
        for path in self
            .strategy
            .fixed
            .paths
            .iter()
            .chain(self.strategy.content.paths.iter())
        {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidStrategyPath { path: path.clone() });
            }
            glob::Pattern::new(path).map_err(|e| ConfigError::InvalidStrategyPattern {
                pattern: path.clone(),
                source: e,
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VersionStrategyConfig {
    #[serde(default)]
    pub fixed: FixedVersionConfig,

    #[serde(default)]
    pub content: ContentVersionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FixedVersionConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Version token embedded as the leading path segment of asset URLs.
    #[serde(default)]
    pub version: String,

    #[serde(default = "default_strategy_paths")]
    pub paths: Vec<String>,
}

impl Default for FixedVersionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            version: String::new(),
            paths: default_strategy_paths(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentVersionConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_strategy_paths")]
    pub paths: Vec<String>,
}

impl Default for ContentVersionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            paths: default_strategy_paths(),
        }
    }
}

/// Rendered as `Cache-Control: max-age=N`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CachePolicy {
    pub max_age_secs: u64,
}

impl CachePolicy {
    pub fn max_age(secs: u64) -> Self {
        Self { max_age_secs: secs }
    }

    pub fn header_value(&self) -> String {
        format!("max-age={}", self.max_age_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_static_path_pattern() -> String {
    "/**".to_string()
}

fn default_static_locations() -> Vec<PathBuf> {
    ["resources", "static", "public"]
        .into_iter()
        .map(PathBuf::from)
        .collect()
}

fn default_strategy_paths() -> Vec<String> {
    vec!["/**".to_string()]
}
