use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ResolveError {
    #[error("asset not found")]
    NotFound,

    #[error("asset path escapes the configured locations")]
    Forbidden,

    #[error("malformed asset path")]
    BadPath,
}

/// Terminal resolution step: looks the path up in each location in order.
/// The first location containing the file wins.
pub fn resolve_in_locations(
    rel_path: &str,
    locations: &[PathBuf],
) -> Result<PathBuf, ResolveError> {
    let relative = sanitize_rel_path(rel_path)?;

    for base in locations {
        match resolve_under(base, &relative) {
            Ok(path) => return Ok(path),
            Err(ResolveError::NotFound) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(ResolveError::NotFound)
}

fn sanitize_rel_path(rel_path: &str) -> Result<PathBuf, ResolveError> {
    // Percent-decode ONCE
    let decoded = percent_encoding::percent_decode_str(rel_path)
        .decode_utf8()
        .map_err(|_| ResolveError::BadPath)?;

    let decoded = decoded.trim_start_matches('/');
    if decoded.is_empty() {
        return Err(ResolveError::NotFound);
    }

    let relative = PathBuf::from(decoded);

    // Path component validation (no traversal, no absolute paths)
    for component in relative.components() {
        match component {
            Component::Normal(_) => {}
            Component::CurDir => {}
            _ => {
                // ParentDir, RootDir, Prefix (Windows) — all forbidden
                return Err(ResolveError::Forbidden);
            }
        }
    }

    Ok(relative)
}

fn resolve_under(base: &Path, relative: &Path) -> Result<PathBuf, ResolveError> {
    // A location that does not exist is skipped, not an error.
    let base_canon = base.canonicalize().map_err(|_| ResolveError::NotFound)?;

    let target_canon = base_canon
        .join(relative)
        .canonicalize()
        .map_err(|_| ResolveError::NotFound)?;

    // Enforce containment
    if !target_canon.starts_with(&base_canon) {
        return Err(ResolveError::Forbidden);
    }

    if !target_canon.is_file() {
        return Err(ResolveError::NotFound);
    }

    Ok(target_canon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn first_location_containing_the_file_wins() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(first.join("app.css"), "first").unwrap();
        fs::write(second.join("app.css"), "second").unwrap();

        let resolved = resolve_in_locations("app.css", &[first.clone(), second]).unwrap();

        assert_eq!(fs::read_to_string(resolved).unwrap(), "first");
    }

    #[test]
    fn missing_locations_are_skipped() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("present");
        fs::create_dir_all(&present).unwrap();
        fs::write(present.join("app.js"), "js").unwrap();

        let locations = [dir.path().join("missing"), present];
        assert!(resolve_in_locations("app.js", &locations).is_ok());
    }

    #[test]
    fn parent_dir_components_are_forbidden() {
        let dir = tempdir().unwrap();

        let err = resolve_in_locations("../secret", &[dir.path().to_path_buf()]).unwrap_err();

        assert_eq!(err, ResolveError::Forbidden);
    }

    #[test]
    fn percent_encoded_traversal_is_forbidden() {
        let dir = tempdir().unwrap();

        let err = resolve_in_locations("%2e%2e/secret", &[dir.path().to_path_buf()]).unwrap_err();

        assert_eq!(err, ResolveError::Forbidden);
    }

    #[test]
    fn invalid_utf8_percent_encoding_is_a_bad_path() {
        let dir = tempdir().unwrap();

        let err = resolve_in_locations("%ff%fe", &[dir.path().to_path_buf()]).unwrap_err();

        assert_eq!(err, ResolveError::BadPath);
    }

    #[test]
    fn directories_do_not_resolve() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();

        let err = resolve_in_locations("css", &[dir.path().to_path_buf()]).unwrap_err();

        assert_eq!(err, ResolveError::NotFound);
    }
}
