use crate::chain::gz_sibling;
use anyhow::Context;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Files smaller than this rarely shrink enough to be worth a variant.
pub const DEFAULT_MIN_SIZE: u64 = 1024;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PrecompressSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Walks every location and writes a `.gz` sibling for each compressible
/// file of at least `min_size` bytes. Variants that are up to date or that
/// would not shrink the file are skipped.
pub fn precompress_locations(
    locations: &[PathBuf],
    min_size: u64,
) -> anyhow::Result<PrecompressSummary> {
    let mut summary = PrecompressSummary::default();

    for location in locations {
        if !location.is_dir() {
            continue;
        }
        for entry in WalkDir::new(location) {
            let entry =
                entry.with_context(|| format!("walking location {}", location.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if precompress_file(entry.path(), min_size)? {
                summary.written += 1;
            } else {
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

fn precompress_file(path: &Path, min_size: u64) -> anyhow::Result<bool> {
    if path.extension().is_some_and(|ext| ext == "gz") {
        return Ok(false);
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if !is_compressible_mime(&mime) {
        return Ok(false);
    }

    let metadata =
        fs::metadata(path).with_context(|| format!("reading metadata of {}", path.display()))?;
    if metadata.len() < min_size {
        return Ok(false);
    }

    let variant = gz_sibling(path);
    if variant_up_to_date(&variant, &metadata) {
        return Ok(false);
    }

    let source = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let compressed = gzip_compress(&source)
        .with_context(|| format!("compressing {}", path.display()))?;

    // Only keep the variant if it actually shrinks the file.
    if compressed.len() as u64 >= metadata.len() {
        return Ok(false);
    }

    fs::write(&variant, compressed)
        .with_context(|| format!("writing {}", variant.display()))?;
    debug!(path = %path.display(), "wrote precompressed variant");

    Ok(true)
}

fn variant_up_to_date(variant: &Path, source_metadata: &fs::Metadata) -> bool {
    let variant_mtime = match fs::metadata(variant).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };
    match source_metadata.modified() {
        Ok(source_mtime) => variant_mtime >= source_mtime,
        Err(_) => false,
    }
}

/// Check if a MIME type is compressible (text-based or common web formats)
pub(crate) fn is_compressible_mime(mime: &mime_guess::Mime) -> bool {
    let type_ = mime.type_();
    let subtype = mime.subtype();

    // Text types are always compressible
    if type_ == "text" {
        return true;
    }

    // Application types that are text-based
    if type_ == "application" {
        let subtype_str = subtype.as_str();
        return matches!(
            subtype_str,
            "json"
                | "javascript"
                | "x-javascript"
                | "xml"
                | "xhtml+xml"
                | "rss+xml"
                | "atom+xml"
                | "svg+xml"
                | "x-www-form-urlencoded"
                | "wasm"
        );
    }

    // SVG images
    if type_ == "image" && subtype == "svg+xml" {
        return true;
    }

    false
}

/// Compress data using gzip
fn gzip_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
