//! dsolve.json graph manifest parsing
//!
//! The JSON form mirrors the TOML manifest field for field, so both parse
//! into the same [`GraphManifest`].

use dsolve_core::error::DsolveError;

use crate::toml::{validate_manifest, GraphManifest};
use crate::ConfigResult;

/// Parse JSON string to GraphManifest
pub fn parse_manifest_json(content: &str) -> ConfigResult<GraphManifest> {
    let manifest: GraphManifest =
        serde_json::from_str(content).map_err(|e| DsolveError::JsonParse {
            message: format!("line {}, column {}: {}", e.line(), e.column(), e),
        })?;

    validate_manifest(&manifest)?;

    Ok(manifest)
}

/// Serialize GraphManifest to pretty-printed JSON
pub fn serialize_manifest_json(manifest: &GraphManifest) -> ConfigResult<String> {
    serde_json::to_string_pretty(manifest).map_err(|e| DsolveError::JsonParse {
        message: format!("JSON serialization error: {}", e),
    })
}

/// Load and parse dsolve.json from file path
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<GraphManifest> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DsolveError::io(format!("Failed to read {}", path), e))?;

    parse_manifest_json(&content).map_err(|e| match e {
        DsolveError::JsonParse { message } => DsolveError::JsonParse {
            message: format!("In file {}: {}", path, message),
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toml::ItemSpec;
    use dsolve_resolver::SelectionStrategy;

    #[test]
    fn test_parse_manifest_json() {
        let json = r#"{
            "resolver": { "strategy": "least-outstanding" },
            "items": {
                "app": { "value": "start app", "dependencies": ["db"] },
                "db": [],
                "worker": ["db"]
            }
        }"#;

        let manifest = parse_manifest_json(json).unwrap();
        assert_eq!(manifest.strategy(), SelectionStrategy::LeastOutstanding);
        assert_eq!(
            manifest.items.keys().collect::<Vec<_>>(),
            vec!["app", "db", "worker"]
        );
        assert_eq!(manifest.items["app"].value("app"), "start app");
        assert!(matches!(manifest.items["worker"], ItemSpec::Dependencies(_)));
    }

    #[test]
    fn test_empty_object() {
        let manifest = parse_manifest_json("{}").unwrap();
        assert!(manifest.items.is_empty());
    }

    #[test]
    fn test_syntax_error_has_location() {
        let err = parse_manifest_json("{\n  \"items\": {").unwrap_err();
        assert!(matches!(err, DsolveError::JsonParse { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_json_matches_toml() {
        let json = r#"{ "items": { "app": { "value": "start app", "dependencies": ["db"] }, "db": { "value": "start db" } } }"#;
        let toml = r#"
[items.app]
value = "start app"
dependencies = ["db"]

[items.db]
value = "start db"
"#;

        assert_eq!(
            parse_manifest_json(json).unwrap(),
            crate::toml::parse_manifest_toml(toml).unwrap()
        );
    }

    #[test]
    fn test_round_trip_serialization() {
        let json = r#"{ "items": { "app": ["db"], "db": { "value": "start db" } } }"#;

        let manifest = parse_manifest_json(json).unwrap();
        let serialized = serialize_manifest_json(&manifest).unwrap();
        assert_eq!(parse_manifest_json(&serialized).unwrap(), manifest);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::try_from(dir.path().join("dsolve.json")).unwrap();
        tokio::fs::write(&path, r#"{ "items": { "app": [] } }"#).await.unwrap();

        let manifest = load_from_file(&path).await.unwrap();
        assert!(manifest.items.contains_key("app"));
    }
}
