//! Manifest discovery, layering and environment overrides

use std::collections::HashMap;

use camino::Utf8PathBuf;
use dsolve_core::error::DsolveError;
use dsolve_core::DependencyError;
use tracing::debug;

use crate::toml::{GraphManifest, ItemSpec};
use crate::ConfigResult;

/// Manifest file names, in lookup priority
pub const TOML_MANIFEST: &str = "dsolve.toml";
pub const JSON_MANIFEST: &str = "dsolve.json";

/// Environment variable overriding the selection strategy
pub const STRATEGY_ENV: &str = "DSOLVE_STRATEGY";

/// Main manifest loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

/// Manifest layering and merging
pub struct ConfigLayering;

/// Manifest source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Project dsolve.toml file
    ProjectToml(Utf8PathBuf),
    /// Project dsolve.json file (fallback)
    ProjectJson(Utf8PathBuf),
}

impl ConfigLoader {
    /// Create a new manifest loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Load the project manifest, preferring TOML over JSON
    pub async fn load_project_manifest(&self) -> ConfigResult<(GraphManifest, ConfigSource)> {
        if let Some(path) = self.find_config_path(TOML_MANIFEST) {
            debug!(path = %path, "loading TOML manifest");
            let manifest = crate::toml::load_from_file(&path).await?;
            return Ok((manifest, ConfigSource::ProjectToml(path)));
        }

        if let Some(path) = self.find_config_path(JSON_MANIFEST) {
            debug!(path = %path, "loading JSON manifest");
            let manifest = crate::json::load_from_file(&path).await?;
            return Ok((manifest, ConfigSource::ProjectJson(path)));
        }

        Err(DsolveError::validation(
            "manifest",
            format!(
                "No {} or {} found in {} or parent directories",
                TOML_MANIFEST, JSON_MANIFEST, self.cwd
            ),
        ))
    }

    /// Find a manifest file in the project (walks up directory tree)
    pub fn find_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        let mut current = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(filename);
            if config_path.exists() {
                return Some(config_path);
            }
            current = dir.parent();
        }

        None
    }
}

impl ConfigLayering {
    /// Merge overlays onto a base manifest, then apply environment overrides
    ///
    /// Items are combined by name: dependency lists are unioned in order and
    /// an overlay without an explicit value keeps the base value. Two
    /// different explicit values for one item are a duplicate key.
    pub fn merge(
        base: GraphManifest,
        overlays: impl IntoIterator<Item = GraphManifest>,
        env_overrides: &HashMap<String, String>,
    ) -> ConfigResult<GraphManifest> {
        let mut merged = base;

        for overlay in overlays {
            Self::merge_layer(&mut merged, overlay)?;
        }

        Self::apply_env_overrides(&mut merged, env_overrides)?;

        Ok(merged)
    }

    /// Collect the `DSOLVE_*` variables of the current process
    pub fn env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with("DSOLVE_"))
            .collect()
    }

    fn merge_layer(merged: &mut GraphManifest, overlay: GraphManifest) -> ConfigResult<()> {
        if overlay.resolver.strategy.is_some() {
            merged.resolver.strategy = overlay.resolver.strategy;
        }

        for (name, spec) in overlay.items {
            if !merged.items.contains_key(&name) {
                merged.items.insert(name, spec);
                continue;
            }
            let existing = &mut merged.items[&name];

            let value = match (existing.explicit_value(), spec.explicit_value()) {
                (Some(old), Some(new)) if old != new => {
                    return Err(DependencyError::DuplicateKey {
                        key: name,
                        old: old.to_string(),
                        new: new.to_string(),
                    }
                    .into());
                },
                (old, new) => old.or(new).map(str::to_string),
            };

            let mut dependencies = existing.dependencies().to_vec();
            for dependency in spec.dependencies() {
                if !dependencies.contains(dependency) {
                    dependencies.push(dependency.clone());
                }
            }

            *existing = ItemSpec::Detailed { value, dependencies };
        }

        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(
        manifest: &mut GraphManifest,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        if let Some(strategy) = overrides.get(STRATEGY_ENV) {
            let strategy = strategy.parse().map_err(|_| {
                DsolveError::validation(
                    STRATEGY_ENV,
                    format!("Invalid selection strategy '{}'", strategy),
                )
            })?;
            debug!(strategy = %strategy, "strategy overridden from environment");
            manifest.resolver.strategy = Some(strategy);
        }

        Ok(())
    }
}
