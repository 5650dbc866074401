use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Throwaway on-disk asset tree for end-to-end tests. Paths are created
/// relative to a tempdir that lives as long as the tree value.
pub struct AssetTree {
    root: TempDir,
}

impl Default for AssetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetTree {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create tempdir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn location(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.location(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&path, contents).expect("failed to write fixture");
        path
    }

    /// Writes `contents` gzip-compressed to `rel` (which should carry the
    /// `.gz` extension).
    pub fn write_gz(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(contents).expect("gzip write failed");
        let compressed = encoder.finish().expect("gzip finish failed");
        self.write(rel, &compressed)
    }
}

pub fn md5_hex(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}
