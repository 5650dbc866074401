use std::fs;
use std::path::PathBuf;

const CONFIG_TEMPLATE: &str = r#"# Assetway configuration.

[resources]
# Set to false to register no default handler mappings at all.
add_mappings = true

# Cache-Control max-age applied to every registration, in seconds.
# Remove the line to send no Cache-Control header.
cache_period_secs = 3600

# Pattern served from the static locations below.
static_path_pattern = "/**"

# Lookup roots, in order. The first location containing a file wins.
static_locations = ["resources", "static", "public"]

[chain]
# The resolver/transformer chain activates automatically when a version
# strategy below is enabled; set this to force it on or off.
# enabled = true

# Memoize chain resolutions.
cache = true

# Serve precompressed .gz siblings (generate them with `assetway precompress`).
gzip = false

# Rewrite HTML5 app-cache manifests through the chain.
html_app_cache = false

[chain.strategy.fixed]
enabled = false
version = ""
paths = ["/**"]

[chain.strategy.content]
enabled = false
paths = ["/**"]
"#;

pub fn init(path: PathBuf) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing config: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(&path, CONFIG_TEMPLATE)?;
    println!("wrote {}", path.display());

    Ok(())
}
