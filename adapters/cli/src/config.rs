//! Loads the session configuration from TOML and command-line overrides.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use token_grid_core::{GameConfig, StorePolicy};

/// Values supplied on the command line that take precedence over the file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) store_policy: Option<StorePolicy>,
    pub(crate) interaction_radius: Option<u32>,
    pub(crate) victory_value: Option<u32>,
    pub(crate) window_margin: Option<u32>,
}

impl Overrides {
    fn apply(self, config: &mut GameConfig) {
        if let Some(policy) = self.store_policy {
            config.store_policy = policy;
        }
        if let Some(radius) = self.interaction_radius {
            config.interaction_radius = radius;
        }
        if let Some(value) = self.victory_value {
            config.victory_value = value;
        }
        if let Some(margin) = self.window_margin {
            config.window_margin = margin;
        }
    }
}

/// Reads `path` when present, applies `overrides`, and validates the result.
pub(crate) fn load(path: Option<&Path>, overrides: Overrides) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read game configuration at {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("invalid game configuration in {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    overrides.apply(&mut config);
    config.validate().context("invalid game configuration")?;
    log::debug!("loaded configuration {config:?}");
    Ok(config)
}

fn parse(contents: &str) -> Result<GameConfig> {
    toml::from_str(contents).context("failed to parse game configuration toml contents")
}
