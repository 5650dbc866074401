use crate::chain::{ResourceChain, TransformError};
use std::path::PathBuf;

const MANIFEST_HEADER: &str = "CACHE MANIFEST";
const SECTION_HEADERS: [&str; 4] = ["CACHE:", "NETWORK:", "FALLBACK:", "SETTINGS:"];

/// Rewrites HTML5 app-cache manifests so the URLs they list carry the
/// chain's version tokens, and appends a digest of the rewritten content so
/// the manifest itself changes whenever any listed asset does.
#[derive(Debug, Clone, Default)]
pub struct AppCacheManifestTransformer;

impl AppCacheManifestTransformer {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn transform(
        &self,
        chain: &ResourceChain,
        public_path: &str,
        locations: &[PathBuf],
        content: Vec<u8>,
    ) -> Result<Vec<u8>, TransformError> {
        if !is_manifest_path(public_path) {
            return Ok(content);
        }

        let text = String::from_utf8(content).map_err(|_| TransformError::NonUtf8Manifest)?;

        let mut out = String::with_capacity(text.len());
        for line in text.lines() {
            let trimmed = line.trim();
            if is_passthrough_line(trimmed) {
                out.push_str(line);
            } else {
                match chain.resolve_url_path(trimmed, locations) {
                    Some(url) => out.push_str(&url),
                    // Unresolvable entries (e.g. network wildcards) stay as-is.
                    None => out.push_str(line),
                }
            }
            out.push('\n');
        }

        let digest = md5::compute(out.as_bytes());
        out.push_str(&format!("# Hash: {digest:x}\n"));

        Ok(out.into_bytes())
    }
}

pub(crate) fn is_manifest_path(path: &str) -> bool {
    path.ends_with(".appcache") || path.ends_with(".manifest")
}

fn is_passthrough_line(trimmed: &str) -> bool {
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed == MANIFEST_HEADER
        || SECTION_HEADERS.contains(&trimmed)
        || trimmed.contains("://")
        || trimmed.starts_with('/')
}
