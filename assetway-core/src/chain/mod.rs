mod appcache;
mod gzip;
mod path;
mod version;

pub use appcache::AppCacheManifestTransformer;
pub use gzip::GzipResourceResolver;
pub(crate) use gzip::gz_sibling;
pub use path::{ResolveError, resolve_in_locations};
pub use version::{VersionResourceResolver, VersionStrategy};

use dashmap::DashMap;
use std::path::PathBuf;
use thiserror::Error;

/// What a chain resolution produces: a concrete file, plus the content
/// encoding when a precompressed variant was substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub path: PathBuf,
    pub encoding: Option<&'static str>,
}

impl ResolvedAsset {
    pub(crate) fn plain(path: PathBuf) -> Self {
        Self {
            path,
            encoding: None,
        }
    }
}

/// The slice of the request that resolvers may consult.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub accept_encoding: Option<String>,
}

impl RequestContext {
    pub fn accepts_gzip(&self) -> bool {
        self.accept_encoding
            .as_deref()
            .map(|ae| gzip::accepts_encoding(ae, "gzip").is_some())
            .unwrap_or(false)
    }
}

#[derive(Debug)]
pub enum ResolverKind {
    Version(VersionResourceResolver),
    Gzip(GzipResourceResolver),
}

#[derive(Debug)]
pub enum TransformerKind {
    AppCacheManifest(AppCacheManifestTransformer),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("manifest is not valid UTF-8")]
    NonUtf8Manifest,
}

/// Ordered resolvers and transformers attached to one registration. Plain
/// location lookup is the implicit tail of the resolver sequence, so an
/// empty chain still resolves files.
#[derive(Debug)]
pub struct ResourceChain {
    cache_resolutions: bool,
    resolvers: Vec<ResolverKind>,
    transformers: Vec<TransformerKind>,
    memo: DashMap<(String, bool), Result<ResolvedAsset, ResolveError>, ahash::RandomState>,
}

impl ResourceChain {
    pub(crate) fn new(cache_resolutions: bool) -> Self {
        Self {
            cache_resolutions,
            resolvers: Vec::new(),
            transformers: Vec::new(),
            memo: DashMap::default(),
        }
    }

    pub fn add_resolver(&mut self, resolver: ResolverKind) -> &mut Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn add_transformer(&mut self, transformer: TransformerKind) -> &mut Self {
        self.transformers.push(transformer);
        self
    }

    pub fn resolvers(&self) -> &[ResolverKind] {
        &self.resolvers
    }

    pub fn transformers(&self) -> &[TransformerKind] {
        &self.transformers
    }

    pub fn caches_resolutions(&self) -> bool {
        self.cache_resolutions
    }

    pub fn has_gzip_resolver(&self) -> bool {
        self.resolvers
            .iter()
            .any(|r| matches!(r, ResolverKind::Gzip(_)))
    }

    pub fn resolve(
        &self,
        ctx: &RequestContext,
        rel_path: &str,
        locations: &[PathBuf],
    ) -> Result<ResolvedAsset, ResolveError> {
        if !self.cache_resolutions {
            return resolve_seq(&self.resolvers, ctx, rel_path, locations);
        }

        // Gzip acceptance is the only request detail that changes the outcome,
        // so it is part of the memo key.
        let key = (rel_path.to_string(), ctx.accepts_gzip());
        if let Some(hit) = self.memo.get(&key) {
            return hit.value().clone();
        }
        let result = resolve_seq(&self.resolvers, ctx, rel_path, locations);
        self.memo.insert(key, result.clone());
        result
    }

    /// Forward mapping: the public URL path for an internal location-relative
    /// path, with version tokens applied. Used by transformers.
    pub fn resolve_url_path(&self, internal_path: &str, locations: &[PathBuf]) -> Option<String> {
        resolve_url_seq(&self.resolvers, internal_path, locations)
    }

    /// Runs every transformer over the content, in registration order.
    pub fn transform(
        &self,
        public_path: &str,
        locations: &[PathBuf],
        content: Vec<u8>,
    ) -> Result<Vec<u8>, TransformError> {
        let mut content = content;
        for transformer in &self.transformers {
            content = match transformer {
                TransformerKind::AppCacheManifest(t) => {
                    t.transform(self, public_path, locations, content)?
                }
            };
        }
        Ok(content)
    }
}

pub(crate) fn resolve_seq(
    resolvers: &[ResolverKind],
    ctx: &RequestContext,
    rel_path: &str,
    locations: &[PathBuf],
) -> Result<ResolvedAsset, ResolveError> {
    match resolvers.split_first() {
        Some((head, rest)) => match head {
            ResolverKind::Version(r) => r.resolve(ctx, rel_path, locations, rest),
            ResolverKind::Gzip(r) => r.resolve(ctx, rel_path, locations, rest),
        },
        None => resolve_in_locations(rel_path, locations).map(ResolvedAsset::plain),
    }
}

pub(crate) fn resolve_url_seq(
    resolvers: &[ResolverKind],
    internal_path: &str,
    locations: &[PathBuf],
) -> Option<String> {
    match resolvers.split_first() {
        Some((head, rest)) => match head {
            ResolverKind::Version(r) => r.resolve_url_path(internal_path, locations, rest),
            ResolverKind::Gzip(r) => r.resolve_url_path(internal_path, locations, rest),
        },
        None => resolve_in_locations(internal_path, locations)
            .ok()
            .map(|_| internal_path.to_string()),
    }
}
