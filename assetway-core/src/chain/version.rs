use crate::chain::path::{ResolveError, resolve_in_locations};
use crate::chain::{RequestContext, ResolvedAsset, ResolverKind, resolve_seq, resolve_url_seq};
use glob::Pattern;
use std::fs;
use std::path::PathBuf;

/// Strips cache-busting version tokens from request paths and validates them
/// against the configured scheme. Strategies are consulted in registration
/// order; the first one whose path glob matches wins.
#[derive(Debug, Clone, Default)]
pub struct VersionResourceResolver {
    strategies: Vec<(Pattern, VersionStrategy)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStrategy {
    /// URLs carry a configured leading path segment, e.g. `/v12/css/app.css`.
    Fixed { version: String },

    /// URLs carry the md5 digest of the file before the extension,
    /// e.g. `/css/app-e36d2e05253c6c7085a91522ce43a0b4.css`.
    Content,
}

impl VersionResourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fixed_version_strategy(
        &mut self,
        version: impl Into<String>,
        paths: impl IntoIterator<Item = Pattern>,
    ) -> &mut Self {
        let version = version.into();
        for pattern in paths {
            self.strategies
                .push((pattern, VersionStrategy::Fixed {
                    version: version.clone(),
                }));
        }
        self
    }

    pub fn add_content_version_strategy(
        &mut self,
        paths: impl IntoIterator<Item = Pattern>,
    ) -> &mut Self {
        for pattern in paths {
            self.strategies.push((pattern, VersionStrategy::Content));
        }
        self
    }

    pub fn strategies(&self) -> impl Iterator<Item = &VersionStrategy> {
        self.strategies.iter().map(|(_, s)| s)
    }

    fn strategy_for(&self, rel_path: &str) -> Option<&VersionStrategy> {
        let lookup = format!("/{rel_path}");
        self.strategies
            .iter()
            .find(|(pattern, _)| pattern.matches(&lookup))
            .map(|(_, strategy)| strategy)
    }

    pub(crate) fn resolve(
        &self,
        ctx: &RequestContext,
        rel_path: &str,
        locations: &[PathBuf],
        next: &[ResolverKind],
    ) -> Result<ResolvedAsset, ResolveError> {
        // Unversioned URLs resolve as-is.
        match resolve_seq(next, ctx, rel_path, locations) {
            Ok(asset) => return Ok(asset),
            Err(ResolveError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let strategy = self.strategy_for(rel_path).ok_or(ResolveError::NotFound)?;
        let version = strategy
            .extract_version(rel_path)
            .ok_or(ResolveError::NotFound)?;
        let simple = strategy.remove_version(rel_path, &version);

        let asset = resolve_seq(next, ctx, &simple, locations)?;

        // Verification runs against the uncompressed source file, not
        // whichever encoded variant the rest of the chain substituted.
        if !strategy.verify(&version, &simple, locations) {
            return Err(ResolveError::NotFound);
        }

        Ok(asset)
    }

    pub(crate) fn resolve_url_path(
        &self,
        internal_path: &str,
        locations: &[PathBuf],
        next: &[ResolverKind],
    ) -> Option<String> {
        let base = resolve_url_seq(next, internal_path, locations)?;
        match self.strategy_for(&base) {
            Some(strategy) => strategy.add_version(&base, locations),
            None => Some(base),
        }
    }
}

impl VersionStrategy {
    fn extract_version(&self, rel_path: &str) -> Option<String> {
        match self {
            Self::Fixed { version } => rel_path
                .strip_prefix(version.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
                .then(|| version.clone()),
            Self::Content => {
                let (_, file_name) = split_file_name(rel_path);
                let stem = file_name.split('.').next().unwrap_or(file_name);
                let candidate = stem.rsplit_once('-')?.1;
                is_md5_hex(candidate).then(|| candidate.to_string())
            }
        }
    }

    fn remove_version(&self, rel_path: &str, version: &str) -> String {
        match self {
            Self::Fixed { .. } => rel_path
                .strip_prefix(&format!("{version}/"))
                .unwrap_or(rel_path)
                .to_string(),
            Self::Content => {
                let (dir, file_name) = split_file_name(rel_path);
                let simple_name = file_name.replacen(&format!("-{version}"), "", 1);
                format!("{dir}{simple_name}")
            }
        }
    }

    fn verify(&self, version: &str, simple_rel: &str, locations: &[PathBuf]) -> bool {
        match self {
            Self::Fixed { version: configured } => version == configured,
            Self::Content => resolve_in_locations(simple_rel, locations)
                .ok()
                .and_then(|path| fs::read(path).ok())
                .map(|bytes| format!("{:x}", md5::compute(&bytes)) == version)
                .unwrap_or(false),
        }
    }

    fn add_version(&self, rel_path: &str, locations: &[PathBuf]) -> Option<String> {
        match self {
            Self::Fixed { version } => Some(format!("{version}/{rel_path}")),
            Self::Content => {
                let file = resolve_in_locations(rel_path, locations).ok()?;
                let bytes = fs::read(file).ok()?;
                let digest = format!("{:x}", md5::compute(&bytes));
                let (dir, file_name) = split_file_name(rel_path);
                let versioned_name = match file_name.split_once('.') {
                    Some((stem, ext)) => format!("{stem}-{digest}.{ext}"),
                    None => format!("{file_name}-{digest}"),
                };
                Some(format!("{dir}{versioned_name}"))
            }
        }
    }
}

/// Splits "css/app.css" into ("css/", "app.css"); paths without a directory
/// part yield ("", name).
fn split_file_name(rel_path: &str) -> (&str, &str) {
    match rel_path.rfind('/') {
        Some(idx) => rel_path.split_at(idx + 1),
        None => ("", rel_path),
    }
}

fn is_md5_hex(candidate: &str) -> bool {
    candidate.len() == 32 && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn patterns(paths: &[&str]) -> Vec<Pattern> {
        paths.iter().map(|p| Pattern::new(p).unwrap()).collect()
    }

    #[test]
    fn fixed_strategy_extracts_only_the_configured_version() {
        let strategy = VersionStrategy::Fixed {
            version: "v12".to_string(),
        };

        assert_eq!(
            strategy.extract_version("v12/css/app.css"),
            Some("v12".to_string())
        );
        assert_eq!(strategy.extract_version("v13/css/app.css"), None);
        assert_eq!(strategy.extract_version("css/app.css"), None);
    }

    #[test]
    fn content_strategy_extracts_md5_suffixes_only() {
        let strategy = VersionStrategy::Content;
        let hash = "e36d2e05253c6c7085a91522ce43a0b4";

        assert_eq!(
            strategy.extract_version(&format!("css/app-{hash}.css")),
            Some(hash.to_string())
        );
        // Hyphenated names without a digest are left alone.
        assert_eq!(strategy.extract_version("css/app-dark.css"), None);
    }

    #[test]
    fn remove_version_only_touches_the_file_name() {
        let strategy = VersionStrategy::Content;
        let hash = "e36d2e05253c6c7085a91522ce43a0b4";

        assert_eq!(
            strategy.remove_version(&format!("css-{hash}/app-{hash}.css"), hash),
            format!("css-{hash}/app.css")
        );
    }

    #[test]
    fn first_matching_strategy_wins() {
        let mut resolver = VersionResourceResolver::new();
        resolver.add_fixed_version_strategy("v1", patterns(&["/js/**"]));
        resolver.add_content_version_strategy(patterns(&["/**"]));

        assert_eq!(
            resolver.strategy_for("js/app.js"),
            Some(&VersionStrategy::Fixed {
                version: "v1".to_string()
            })
        );
        assert_eq!(
            resolver.strategy_for("css/app.css"),
            Some(&VersionStrategy::Content)
        );
    }

    #[test]
    fn content_verification_rejects_stale_hashes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.css"), "body {}").unwrap();
        let locations = [dir.path().to_path_buf()];
        let good = format!("{:x}", md5::compute(b"body {}"));

        let strategy = VersionStrategy::Content;

        assert!(strategy.verify(&good, "app.css", &locations));
        assert!(!strategy.verify("0bee89b07a248e27c83fc3d5951213c1", "app.css", &locations));
    }

    #[test]
    fn url_paths_gain_the_version_token() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/app.css"), "body {}").unwrap();
        let locations = [dir.path().to_path_buf()];
        let hash = format!("{:x}", md5::compute(b"body {}"));

        let mut resolver = VersionResourceResolver::new();
        resolver.add_content_version_strategy(patterns(&["/**"]));

        let url = resolver
            .resolve_url_path("css/app.css", &locations, &[])
            .unwrap();
        assert_eq!(url, format!("css/app-{hash}.css"));
    }
}
