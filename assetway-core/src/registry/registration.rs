use crate::chain::ResourceChain;
use crate::config::CachePolicy;
use crate::registry::pattern_matches;
use std::path::PathBuf;

/// One path-pattern → locations mapping, plus its optional decorations.
/// Built once at startup and handed to the request-routing layer; nothing
/// mutates it after that.
#[derive(Debug)]
pub struct ResourceHandlerRegistration {
    path_pattern: String,
    locations: Vec<PathBuf>,
    cache_policy: Option<CachePolicy>,
    chain: Option<ResourceChain>,
}

impl ResourceHandlerRegistration {
    pub(crate) fn new(pattern: &str) -> Self {
        Self {
            path_pattern: pattern.to_string(),
            locations: Vec::new(),
            cache_policy: None,
            chain: None,
        }
    }

    pub fn add_resource_locations(
        &mut self,
        locations: impl IntoIterator<Item = PathBuf>,
    ) -> &mut Self {
        self.locations.extend(locations);
        self
    }

    pub fn cache_control(&mut self, policy: CachePolicy) -> &mut Self {
        self.cache_policy = Some(policy);
        self
    }

    /// Returns the registration's resolver/transformer chain, creating it on
    /// first use. The cache flag only takes effect on creation.
    pub fn resource_chain(&mut self, cache: bool) -> &mut ResourceChain {
        self.chain.get_or_insert_with(|| ResourceChain::new(cache))
    }

    pub fn path_pattern(&self) -> &str {
        &self.path_pattern
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    pub fn cache_policy(&self) -> Option<&CachePolicy> {
        self.cache_policy.as_ref()
    }

    pub fn chain(&self) -> Option<&ResourceChain> {
        self.chain.as_ref()
    }

    pub fn matches(&self, request_path: &str) -> bool {
        pattern_matches(&self.path_pattern, request_path)
    }

    /// The lookup path relative to this registration's locations, or None if
    /// the request does not match the pattern.
    pub fn relative_request_path<'a>(&self, request_path: &'a str) -> Option<&'a str> {
        if !self.matches(request_path) {
            return None;
        }
        let rel = match self.path_pattern.strip_suffix("/**") {
            Some(prefix) => &request_path[prefix.len()..],
            None => request_path,
        };
        Some(rel.trim_start_matches('/'))
    }

    /// Length of the literal prefix, used to pick the most specific pattern.
    pub(crate) fn specificity(&self) -> usize {
        self.path_pattern
            .strip_suffix("/**")
            .unwrap_or(&self.path_pattern)
            .len()
    }
}
