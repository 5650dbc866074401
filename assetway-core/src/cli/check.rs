use crate::builder::build_default_registry;
use crate::config::{AssetwayConfig, ConfigError};
use std::path::PathBuf;

pub fn check(path: PathBuf) -> anyhow::Result<()> {
    let cfg = match AssetwayConfig::from_file(&path) {
        Ok(cfg) => cfg,
        Err(err) => {
            print_config_error(err);
            std::process::exit(1);
        }
    };

    let registry = match build_default_registry(&cfg) {
        Ok(registry) => registry,
        Err(err) => {
            print_config_error(err);
            std::process::exit(1);
        }
    };

    println!("✔ Config loaded successfully");
    println!("✔ {} resource handler(s)", registry.len());
    println!(
        "✔ {} static location(s)",
        cfg.resources.static_locations.len()
    );
    println!(
        "✔ chain {}",
        if cfg.chain.is_active() {
            "active"
        } else {
            "inactive"
        }
    );

    Ok(())
}

fn print_config_error(err: ConfigError) {
    let hint = config_error_hint(&err);
    eprintln!("{err}");
    if let Some(hint) = hint {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        //---------------------------------------------------------------------
        // Resource mapping errors
        //---------------------------------------------------------------------
        ConfigError::EmptyStaticLocations => Some(
            "Resource mappings need at least one location to serve from.\n\
             \n\
             Example:\n\
             \n\
             [resources]\n\
             static_locations = [\"static\", \"public\"]",
        ),

        ConfigError::InvalidPathPattern { .. } => Some(
            "Path patterns are absolute: an exact path, or a prefix followed by `/**`.\n\
             \n\
             Example:\n\
             \n\
             [resources]\n\
             static_path_pattern = \"/assets/**\"",
        ),

        //---------------------------------------------------------------------
        // Chain / strategy errors
        //---------------------------------------------------------------------
        ConfigError::FixedVersionMissingVersion => Some(
            "The fixed version strategy embeds a configured token in asset URLs.\n\
             \n\
             Example:\n\
             \n\
             [chain.strategy.fixed]\n\
             enabled = true\n\
             version = \"v12\"",
        ),

        ConfigError::InvalidStrategyPath { .. } => Some(
            "Strategy paths are URL patterns and must start with '/'.\n\
             \n\
             Example:\n\
             \n\
             [chain.strategy.content]\n\
             enabled = true\n\
             paths = [\"/**/*.css\", \"/**/*.js\"]",
        ),

        //---------------------------------------------------------------------
        // Everything else: no hint
        //---------------------------------------------------------------------
        _ => None,
    }
}
