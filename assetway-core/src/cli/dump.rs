use crate::builder::build_default_registry;
use crate::chain::{ResolverKind, TransformerKind};
use crate::config::AssetwayConfig;
use crate::registry::{HandlerRegistry, ResourceHandlerRegistration};
use serde::Serialize;
use std::path::PathBuf;

pub fn dump(path: PathBuf) -> anyhow::Result<()> {
    let cfg = AssetwayConfig::from_file(&path)?;
    let registry = build_default_registry(&cfg)?;

    let plan = RegistrationPlan::from_registry(&registry);
    println!("{}", serde_json::to_string_pretty(&plan)?);

    Ok(())
}

/// Serializable view of a built registry, for operator inspection.
#[derive(Debug, Serialize)]
pub struct RegistrationPlan {
    pub registrations: Vec<RegistrationSummary>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationSummary {
    pub pattern: String,
    pub locations: Vec<PathBuf>,
    pub cache_control: Option<String>,
    pub chain_cache: Option<bool>,
    pub resolvers: Vec<String>,
    pub transformers: Vec<String>,
}

impl RegistrationPlan {
    pub fn from_registry(registry: &HandlerRegistry) -> Self {
        Self {
            registrations: registry.registrations().iter().map(summarize).collect(),
        }
    }
}

fn summarize(registration: &ResourceHandlerRegistration) -> RegistrationSummary {
    let chain = registration.chain();

    RegistrationSummary {
        pattern: registration.path_pattern().to_string(),
        locations: registration.locations().to_vec(),
        cache_control: registration
            .cache_policy()
            .map(|policy| policy.header_value()),
        chain_cache: chain.map(|c| c.caches_resolutions()),
        resolvers: chain
            .map(|c| {
                c.resolvers()
                    .iter()
                    .map(|r| {
                        match r {
                            ResolverKind::Version(_) => "version",
                            ResolverKind::Gzip(_) => "gzip",
                        }
                        .to_string()
                    })
                    .collect()
            })
            .unwrap_or_default(),
        transformers: chain
            .map(|c| {
                c.transformers()
                    .iter()
                    .map(|t| {
                        match t {
                            TransformerKind::AppCacheManifest(_) => "app_cache_manifest",
                        }
                        .to_string()
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}
