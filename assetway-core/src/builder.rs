use crate::chain::{
    AppCacheManifestTransformer, GzipResourceResolver, ResolverKind, TransformerKind,
    VersionResourceResolver,
};
use crate::config::{
    AssetwayConfig, CachePolicy, ChainConfig, ConfigError, VENDOR_LOCATION, VENDOR_PATH_PATTERN,
};
use crate::registry::{HandlerRegistry, ResourceHandlerRegistration};
use glob::Pattern;
use std::path::PathBuf;
use tracing::{debug, info};

/// Hook invoked once per built registration, after default decoration.
/// At most one customizer runs per process.
pub trait RegistrationCustomizer {
    fn customize(&self, registration: &mut ResourceHandlerRegistration);
}

/// Registers the default resource handler mappings: the vendor pattern first,
/// then the configured static pattern. Patterns already present in the
/// registry are left to their first registration.
pub fn build_registrations(
    config: &AssetwayConfig,
    registry: &mut HandlerRegistry,
    customizer: Option<&dyn RegistrationCustomizer>,
) {
    let resources = &config.resources;

    if !resources.add_mappings {
        debug!("default resource handling disabled");
        return;
    }

    let cache_policy = resources.cache_period_secs.map(CachePolicy::max_age);

    register(
        registry,
        VENDOR_PATH_PATTERN,
        vec![PathBuf::from(VENDOR_LOCATION)],
        cache_policy.as_ref(),
        customizer,
    );
    register(
        registry,
        &resources.static_path_pattern,
        resources.static_locations.clone(),
        cache_policy.as_ref(),
        customizer,
    );
}

/// Builds a fresh registry from the config, wiring in the chain customizer
/// when the chain is active.
pub fn build_default_registry(config: &AssetwayConfig) -> Result<HandlerRegistry, ConfigError> {
    let mut registry = HandlerRegistry::new();

    let customizer = config
        .chain
        .is_active()
        .then(|| ChainCustomizer::new(&config.chain))
        .transpose()?;

    build_registrations(
        config,
        &mut registry,
        customizer
            .as_ref()
            .map(|c| c as &dyn RegistrationCustomizer),
    );

    Ok(registry)
}

fn register(
    registry: &mut HandlerRegistry,
    pattern: &str,
    locations: Vec<PathBuf>,
    cache_policy: Option<&CachePolicy>,
    customizer: Option<&dyn RegistrationCustomizer>,
) {
    if registry.has_mapping_for_pattern(pattern) {
        debug!(pattern, "pattern already mapped, skipping");
        return;
    }

    let registration = registry.add_resource_handler(pattern);
    registration.add_resource_locations(locations);

    if let Some(policy) = cache_policy {
        registration.cache_control(policy.clone());
    }

    if let Some(customizer) = customizer {
        customizer.customize(registration);
    }

    info!(pattern, "registered resource handler");
}

/// Decorates registrations with the resolver/transformer chain described by
/// the chain config. Order is fixed: version resolver (fixed sub-strategy
/// before content), then gzip resolver; the app-cache transformer is
/// appended independently.
pub struct ChainCustomizer {
    chain: ChainConfig,
    version_resolver: Option<VersionResourceResolver>,
}

impl ChainCustomizer {
    pub fn new(chain: &ChainConfig) -> Result<Self, ConfigError> {
        let strategy = &chain.strategy;

        let version_resolver = (strategy.fixed.enabled || strategy.content.enabled)
            .then(|| -> Result<VersionResourceResolver, ConfigError> {
                let mut resolver = VersionResourceResolver::new();
                if strategy.fixed.enabled {
                    resolver.add_fixed_version_strategy(
                        strategy.fixed.version.clone(),
                        compile_patterns(&strategy.fixed.paths)?,
                    );
                }
                if strategy.content.enabled {
                    resolver.add_content_version_strategy(compile_patterns(&strategy.content.paths)?);
                }
                Ok(resolver)
            })
            .transpose()?;

        Ok(Self {
            chain: chain.clone(),
            version_resolver,
        })
    }
}

impl RegistrationCustomizer for ChainCustomizer {
    fn customize(&self, registration: &mut ResourceHandlerRegistration) {
        let chain = registration.resource_chain(self.chain.cache);

        if let Some(resolver) = &self.version_resolver {
            chain.add_resolver(ResolverKind::Version(resolver.clone()));
        }
        if self.chain.gzip {
            chain.add_resolver(ResolverKind::Gzip(GzipResourceResolver::new()));
        }
        if self.chain.html_app_cache {
            chain.add_transformer(TransformerKind::AppCacheManifest(
                AppCacheManifestTransformer::new(),
            ));
        }
    }
}

fn compile_patterns(paths: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    paths
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| ConfigError::InvalidStrategyPattern {
                pattern: p.clone(),
                source: e,
            })
        })
        .collect()
}
