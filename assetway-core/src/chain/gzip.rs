use crate::chain::path::ResolveError;
use crate::chain::{RequestContext, ResolvedAsset, ResolverKind, resolve_seq, resolve_url_seq};
use std::path::{Path, PathBuf};

/// Substitutes a precompressed `<file>.gz` sibling when the client accepts
/// gzip. Variants are produced offline (see the precompress module); nothing
/// is compressed on the fly.
#[derive(Debug, Clone, Default)]
pub struct GzipResourceResolver;

impl GzipResourceResolver {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn resolve(
        &self,
        ctx: &RequestContext,
        rel_path: &str,
        locations: &[PathBuf],
        next: &[ResolverKind],
    ) -> Result<ResolvedAsset, ResolveError> {
        let resolved = resolve_seq(next, ctx, rel_path, locations)?;

        if !ctx.accepts_gzip() || resolved.encoding.is_some() {
            return Ok(resolved);
        }

        let variant = gz_sibling(&resolved.path);
        if variant.is_file() {
            return Ok(ResolvedAsset {
                path: variant,
                encoding: Some("gzip"),
            });
        }

        Ok(resolved)
    }

    pub(crate) fn resolve_url_path(
        &self,
        internal_path: &str,
        locations: &[PathBuf],
        next: &[ResolverKind],
    ) -> Option<String> {
        resolve_url_seq(next, internal_path, locations)
    }
}

pub(crate) fn gz_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

/// Parse quality value from Accept-Encoding part (e.g., "gzip;q=0.5" -> 0.5)
fn parse_quality(part: &str) -> f32 {
    part.split(';')
        .nth(1)
        .and_then(|s| s.trim().strip_prefix("q="))
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(1.0)
}

/// Check if the client accepts a specific encoding and return its quality value
pub(crate) fn accepts_encoding(accept_encoding: &str, encoding_name: &str) -> Option<f32> {
    for part in accept_encoding.split(',') {
        let encoding = part.split(';').next().unwrap_or("").trim();
        if encoding.eq_ignore_ascii_case(encoding_name) || encoding == "*" {
            let q = parse_quality(part);
            if q == 0.0 {
                return None; // q=0 means "not acceptable"
            }
            return Some(q);
        }
    }
    None
}
