use assetway_core::builder::{
    RegistrationCustomizer, build_default_registry, build_registrations,
};
use assetway_core::chain::ResolverKind;
use assetway_core::config::{AssetwayConfig, CachePolicy, VENDOR_PATH_PATTERN};
use assetway_core::registry::{HandlerRegistry, ResourceHandlerRegistration};
use pretty_assertions::assert_eq;
use std::cell::Cell;

/// A full configuration produces the vendor and static registrations, in
/// that order, fully decorated.
#[test]
fn full_config_builds_a_decorated_plan() {
    let cfg: AssetwayConfig = r#"
[resources]
cache_period_secs = 600
static_path_pattern = "/assets/**"

[chain]
gzip = true
html_app_cache = true

[chain.strategy.fixed]
enabled = true
version = "v3"
paths = ["/js/**"]

[chain.strategy.content]
enabled = true
"#
    .parse()
    .unwrap();

    let registry = build_default_registry(&cfg).unwrap();

    let patterns: Vec<_> = registry
        .registrations()
        .iter()
        .map(|r| r.path_pattern())
        .collect();
    assert_eq!(patterns, vec![VENDOR_PATH_PATTERN, "/assets/**"]);

    for registration in registry.registrations() {
        assert_eq!(registration.cache_policy(), Some(&CachePolicy::max_age(600)));

        let chain = registration.chain().expect("chain should be configured");
        assert!(chain.caches_resolutions());
        assert_eq!(chain.resolvers().len(), 2);
        assert!(matches!(chain.resolvers()[0], ResolverKind::Version(_)));
        assert!(matches!(chain.resolvers()[1], ResolverKind::Gzip(_)));
        assert_eq!(chain.transformers().len(), 1);
    }
}

#[test]
fn disabled_mappings_produce_an_empty_plan() {
    let cfg: AssetwayConfig = r#"
[resources]
add_mappings = false

[chain]
gzip = true
"#
    .parse()
    .unwrap();

    let registry = build_default_registry(&cfg).unwrap();

    assert!(registry.is_empty());
}

#[test]
fn preexisting_static_pattern_is_left_alone() {
    let cfg: AssetwayConfig = "".parse().unwrap();
    let mut registry = HandlerRegistry::new();
    registry
        .add_resource_handler("/**")
        .add_resource_locations(["already-configured".into()]);

    build_registrations(&cfg, &mut registry, None);

    // The vendor pattern was still added; the static one kept its first
    // registration.
    assert_eq!(registry.len(), 2);
    let existing = registry
        .registrations()
        .iter()
        .find(|r| r.path_pattern() == "/**")
        .unwrap();
    assert_eq!(existing.locations(), &[std::path::PathBuf::from("already-configured")]);
}

struct CountingCustomizer {
    calls: Cell<usize>,
}

impl RegistrationCustomizer for CountingCustomizer {
    fn customize(&self, registration: &mut ResourceHandlerRegistration) {
        self.calls.set(self.calls.get() + 1);
        registration.cache_control(CachePolicy::max_age(31_536_000));
    }
}

/// The customizer hook runs once per built registration, after default
/// decoration, and can override it.
#[test]
fn customizer_runs_once_per_registration() {
    let cfg: AssetwayConfig = r#"
[resources]
cache_period_secs = 60
"#
    .parse()
    .unwrap();
    let customizer = CountingCustomizer {
        calls: Cell::new(0),
    };
    let mut registry = HandlerRegistry::new();

    build_registrations(&cfg, &mut registry, Some(&customizer));

    assert_eq!(customizer.calls.get(), 2);
    for registration in registry.registrations() {
        assert_eq!(
            registration.cache_policy(),
            Some(&CachePolicy::max_age(31_536_000))
        );
    }
}
