//! dsolve.toml graph manifest parsing and serialization

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use dsolve_core::error::DsolveError;
use dsolve_resolver::{Resolver, SelectionStrategy};
use tracing::debug;

use crate::ConfigResult;

/// Complete dependency graph manifest
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphManifest {
    /// Resolver settings
    #[serde(default)]
    pub resolver: ResolverSection,

    /// Items keyed by name, in file order
    #[serde(default)]
    pub items: IndexMap<String, ItemSpec>,
}

/// Resolver settings section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolverSection {
    /// Node selection strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<SelectionStrategy>,
}

/// Item specification (bare dependency list or detailed table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemSpec {
    /// Only the names this item depends on
    Dependencies(Vec<String>),

    /// Detailed item specification
    Detailed {
        /// Payload handed to the resolution callback; defaults to the item name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,

        /// Names this item depends on
        #[serde(default)]
        dependencies: Vec<String>,
    },
}

impl ItemSpec {
    /// Explicit payload, if the item declares one
    pub fn explicit_value(&self) -> Option<&str> {
        match self {
            ItemSpec::Dependencies(_) => None,
            ItemSpec::Detailed { value, .. } => value.as_deref(),
        }
    }

    /// Payload of the item registered as `name`
    pub fn value(&self, name: &str) -> String {
        self.explicit_value().unwrap_or(name).to_string()
    }

    pub fn dependencies(&self) -> &[String] {
        match self {
            ItemSpec::Dependencies(dependencies) => dependencies,
            ItemSpec::Detailed { dependencies, .. } => dependencies,
        }
    }
}

impl GraphManifest {
    /// Selection strategy, falling back to the resolver default
    pub fn strategy(&self) -> SelectionStrategy {
        self.resolver.strategy.unwrap_or_default()
    }

    /// Register every item, in manifest order, into a fresh resolver
    pub fn into_resolver(&self) -> ConfigResult<Resolver<String, String>> {
        let mut resolver = Resolver::with_strategy(self.strategy());

        for (name, spec) in &self.items {
            resolver.register(
                name.clone(),
                spec.value(name),
                spec.dependencies().iter().cloned(),
            )?;
        }

        debug!(
            items = self.items.len(),
            unregistered = resolver.unregistered().len(),
            "loaded manifest into resolver"
        );
        Ok(resolver)
    }
}

/// Parse TOML string to GraphManifest
pub fn parse_manifest_toml(content: &str) -> ConfigResult<GraphManifest> {
    // First try with toml_edit for better error reporting
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| DsolveError::TomlParse {
            message: format!("TOML syntax error: {}", e),
        })?;

    // Then parse with serde for type safety
    let manifest: GraphManifest = toml::from_str(content).map_err(|e| DsolveError::TomlParse {
        message: format!("TOML parsing error: {}", e),
    })?;

    validate_manifest(&manifest)?;

    Ok(manifest)
}

/// Serialize GraphManifest to TOML string
pub fn serialize_manifest_toml(manifest: &GraphManifest) -> ConfigResult<String> {
    toml::to_string_pretty(manifest).map_err(|e| DsolveError::TomlParse {
        message: format!("TOML serialization error: {}", e),
    })
}

/// Validate item and dependency names
pub fn validate_manifest(manifest: &GraphManifest) -> ConfigResult<()> {
    for (name, spec) in &manifest.items {
        if !is_valid_item_name(name) {
            return Err(DsolveError::validation(
                format!("items.{}", name),
                format!(
                    "Invalid item name '{}'. Item names must be non-empty and may not contain whitespace or control characters",
                    name
                ),
            ));
        }

        for dependency in spec.dependencies() {
            if !is_valid_item_name(dependency) {
                return Err(DsolveError::validation(
                    format!("items.{}.dependencies", name),
                    format!("Invalid dependency name '{}'", dependency),
                ));
            }

            if dependency == name {
                return Err(DsolveError::validation(
                    format!("items.{}.dependencies", name),
                    format!("Item '{}' cannot depend on itself", name),
                ));
            }
        }
    }

    Ok(())
}

/// Load and parse dsolve.toml from file path
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<GraphManifest> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DsolveError::io(format!("Failed to read {}", path), e))?;

    parse_manifest_toml(&content).map_err(|e| match e {
        DsolveError::TomlParse { message } => DsolveError::TomlParse {
            message: format!("In file {}: {}", path, message),
        },
        DsolveError::ConfigValidation { field, reason } => DsolveError::ConfigValidation {
            field,
            reason: format!("In file {}: {}", path, reason),
        },
        other => other,
    })
}

/// Check if an item name is usable as a graph key
pub(crate) fn is_valid_item_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c.is_control())
}
