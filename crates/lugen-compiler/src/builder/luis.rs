//! Serde types for the parts of a LUIS application export the builder reads.
//!
//! Everything else in the export (utterances, patterns, features, ...) is
//! ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LuisApp {
    pub luis_schema_version: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub intents: Vec<LuisIntent>,
    #[serde(default)]
    pub entities: Vec<LuisEntity>,
    #[serde(default, rename = "prebuiltEntities")]
    pub prebuilt_entities: Vec<LuisEntity>,
    #[serde(default, rename = "closedLists")]
    pub closed_lists: Vec<LuisEntity>,
    #[serde(default)]
    pub regex_entities: Vec<LuisEntity>,
    #[serde(default, rename = "patternAnyEntities")]
    pub pattern_any_entities: Vec<LuisEntity>,
    /// Only present in schemas before 6.0.0.
    #[serde(default)]
    pub composites: Vec<LuisComposite>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LuisIntent {
    pub name: String,
}

/// An entity of any list. In 6.x schemas machine-learned entities nest
/// their children here.
#[derive(Debug, Clone, Deserialize)]
pub struct LuisEntity {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, rename = "instanceOf")]
    pub instance_of: Option<String>,
    #[serde(default)]
    pub children: Vec<LuisEntity>,
}

impl LuisEntity {
    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }

    /// Roles in lexical order.
    pub fn sorted_roles(&self) -> Vec<String> {
        let mut roles = self.roles.clone();
        roles.sort();
        roles
    }
}

/// A pre-6.0 composite entity; children are entity names.
#[derive(Debug, Clone, Deserialize)]
pub struct LuisComposite {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub children: Vec<String>,
}
