//! Builds the application model from a LUIS application export.
//!
//! Two schema families are supported:
//! - before 6.0.0: flat entity lists plus a separate `composites` list
//! - 6.0.0 and later: machine-learned entity trees
//!
//! 5.x exports are rejected.

mod legacy;
pub mod luis;
mod v6;

use std::path::Path;

use crate::diagnostic::CompilerError;
use crate::ir::{normalize_name, ApplicationModel};
use luis::LuisApp;

/// Parses a LUIS export from its JSON text.
pub fn parse_app(content: &str, path: &Path) -> Result<LuisApp, CompilerError> {
    serde_json::from_str(content).map_err(|e| CompilerError::InvalidJson {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Builds the application model for any supported schema version.
pub fn build(app: &LuisApp) -> Result<ApplicationModel, CompilerError> {
    let model = match SchemaFamily::detect(&app.luis_schema_version)? {
        SchemaFamily::Legacy => legacy::build(app),
        SchemaFamily::V6 => v6::build(app),
    };

    tracing::debug!(
        schema = %app.luis_schema_version,
        intents = model.intents.len(),
        composites = model.composites.len(),
        "built application model"
    );

    Ok(model)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaFamily {
    Legacy,
    V6,
}

impl SchemaFamily {
    fn detect(version: &str) -> Result<Self, CompilerError> {
        let major = version
            .trim()
            .split('.')
            .next()
            .and_then(|major| major.parse::<u32>().ok());

        match major {
            Some(major) if major < 5 => Ok(Self::Legacy),
            Some(major) if major >= 6 => Ok(Self::V6),
            _ => Err(CompilerError::UnsupportedSchemaVersion {
                version: version.to_string(),
            }),
        }
    }
}

fn intent_names(app: &LuisApp) -> Vec<String> {
    app.intents
        .iter()
        .map(|intent| normalize_name(&intent.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_family() {
        assert_eq!(SchemaFamily::detect("3.2.0").unwrap(), SchemaFamily::Legacy);
        assert_eq!(SchemaFamily::detect("4.0.0").unwrap(), SchemaFamily::Legacy);
        assert_eq!(SchemaFamily::detect("6.0.0").unwrap(), SchemaFamily::V6);
        assert_eq!(SchemaFamily::detect("7.0.0").unwrap(), SchemaFamily::V6);
        assert!(matches!(
            SchemaFamily::detect("5.0.0"),
            Err(CompilerError::UnsupportedSchemaVersion { .. })
        ));
        assert!(SchemaFamily::detect("latest").is_err());
    }

    #[test]
    fn test_intent_names_normalized() {
        let app = parse_app(
            r#"{
                "luis_schema_version": "4.0.0",
                "intents": [{"name": "Calendar.Add"}, {"name": "Say hello"}, {"name": "None"}]
            }"#,
            Path::new("app.json"),
        )
        .unwrap();

        let model = build(&app).unwrap();
        assert_eq!(model.intents, vec!["Calendar_Add", "Say_hello", "None"]);
    }

    #[test]
    fn test_parse_app_reports_path() {
        let err = parse_app("{", Path::new("broken.json")).unwrap_err();
        match err {
            CompilerError::InvalidJson { path, .. } => assert_eq!(path, Path::new("broken.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
