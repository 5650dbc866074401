use crate::registry::ResourceHandlerRegistration;
use tracing::debug;

/// The registration sink: an ordered collection of resource handler
/// registrations, at most one per distinct path pattern.
#[derive(Debug)]
pub struct HandlerRegistry {
    registrations: Vec<ResourceHandlerRegistration>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Adds a registration for the pattern and returns it for decoration.
    /// A duplicate pattern returns the first registration unchanged.
    pub fn add_resource_handler(&mut self, pattern: &str) -> &mut ResourceHandlerRegistration {
        if let Some(idx) = self
            .registrations
            .iter()
            .position(|r| r.path_pattern() == pattern)
        {
            debug!(pattern, "pattern already registered, first registration wins");
            return &mut self.registrations[idx];
        }

        self.registrations
            .push(ResourceHandlerRegistration::new(pattern));
        self.registrations.last_mut().unwrap()
    }

    pub fn has_mapping_for_pattern(&self, pattern: &str) -> bool {
        self.registrations
            .iter()
            .any(|r| r.path_pattern() == pattern)
    }

    /// The most specific matching registration wins; ties go to the earlier
    /// registration.
    pub fn match_request(&self, request_path: &str) -> Option<&ResourceHandlerRegistration> {
        let mut best: Option<&ResourceHandlerRegistration> = None;
        for registration in &self.registrations {
            if !registration.matches(request_path) {
                continue;
            }
            match best {
                Some(b) if registration.specificity() <= b.specificity() => {}
                _ => best = Some(registration),
            }
        }
        best
    }

    /// Registrations in the order they were added.
    pub fn registrations(&self) -> &[ResourceHandlerRegistration] {
        &self.registrations
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

/// Matches exact patterns and trailing `/**` prefix patterns. A `/**`
/// pattern matches its literal prefix and anything below it.
pub(crate) fn pattern_matches(pattern: &str, request_path: &str) -> bool {
    match pattern.strip_suffix("/**") {
        Some("") => request_path.starts_with('/'),
        Some(prefix) => {
            request_path == prefix
                || (request_path.starts_with(prefix)
                    && request_path
                        .as_bytes()
                        .get(prefix.len())
                        .map(|b| *b == b'/')
                        .unwrap_or(false))
        }
        None => pattern == request_path,
    }
}
