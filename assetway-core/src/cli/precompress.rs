use crate::config::{AssetwayConfig, VENDOR_LOCATION};
use crate::precompress::precompress_locations;
use std::path::PathBuf;

pub fn precompress(path: PathBuf, min_size: u64) -> anyhow::Result<()> {
    let cfg = AssetwayConfig::from_file(&path)?;

    let mut locations = vec![PathBuf::from(VENDOR_LOCATION)];
    locations.extend(cfg.resources.static_locations.iter().cloned());

    let summary = precompress_locations(&locations, min_size)?;

    println!("✔ {} variant(s) written", summary.written);
    println!("✔ {} file(s) skipped", summary.skipped);

    Ok(())
}
