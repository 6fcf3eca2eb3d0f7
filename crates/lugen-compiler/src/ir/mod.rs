//! Language-agnostic application model.
//!
//! This model is produced by the builder (or read from a model document) and
//! consumed by the code generators. Every entity is already resolved into an
//! [`EntityRef`], so emission never inspects raw JSON shapes.

mod entity;

pub use entity::{EntityDescriptor, EntityKind, EntityRef};

use serde::Deserialize;

use crate::diagnostic::CompilerError;

/// Prebuilt entities that share one built-in type.
#[derive(Debug, Clone, PartialEq)]
pub struct PrebuiltGroup {
    /// Built-in type name (`number`, `datetimeV2`, ...).
    pub builtin: String,
    pub entities: Vec<EntityRef>,
}

/// A composite entity and its attributes, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeDef {
    pub name: String,
    pub attributes: Vec<EntityRef>,
}

/// The complete application model for one generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationModel {
    /// Application name, used to derive a default class name.
    pub app_name: Option<String>,
    pub intents: Vec<String>,
    pub entities: Vec<EntityRef>,
    pub prebuilt_entities: Vec<PrebuiltGroup>,
    pub closed_lists: Vec<EntityRef>,
    pub regex_entities: Vec<EntityRef>,
    pub pattern_any_entities: Vec<EntityRef>,
    pub composites: Vec<CompositeDef>,
}

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelStats {
    pub intents: usize,
    pub entities: usize,
    pub composites: usize,
}

impl ApplicationModel {
    /// Names of every entity that carries `$instance` span metadata, in
    /// group order: simple, prebuilt, lists, regex, pattern.any, then each
    /// composite followed by its attributes. May contain duplicates.
    pub fn instance_fields(&self) -> Vec<&str> {
        let prebuilt = self
            .prebuilt_entities
            .iter()
            .flat_map(|group| group.entities.iter());

        let composites = self.composites.iter().flat_map(|composite| {
            std::iter::once(composite.name.as_str())
                .chain(composite.attributes.iter().map(EntityRef::name))
        });

        self.entities
            .iter()
            .chain(prebuilt)
            .chain(&self.closed_lists)
            .chain(&self.regex_entities)
            .chain(&self.pattern_any_entities)
            .map(EntityRef::name)
            .chain(composites)
            .collect()
    }

    pub fn is_closed_list(&self, name: &str) -> bool {
        self.closed_lists.iter().any(|entity| entity.name() == name)
    }

    /// Type tag applied to a bare-name composite attribute: `list` for closed
    /// lists, the built-in type for prebuilt entities, otherwise the name.
    pub fn attribute_tag<'a>(&'a self, name: &'a str) -> &'a str {
        if self.is_closed_list(name) {
            return "list";
        }

        self.prebuilt_entities
            .iter()
            .find(|group| group.entities.iter().any(|entity| entity.name() == name))
            .map(|group| group.builtin.as_str())
            .unwrap_or(name)
    }

    pub fn stats(&self) -> ModelStats {
        let prebuilt: usize = self
            .prebuilt_entities
            .iter()
            .map(|group| group.entities.len())
            .sum();

        ModelStats {
            intents: self.intents.len(),
            entities: self.entities.len()
                + prebuilt
                + self.closed_lists.len()
                + self.regex_entities.len()
                + self.pattern_any_entities.len(),
            composites: self.composites.len(),
        }
    }

    /// Builds a model from an already-assembled model document, resolving
    /// every entity descriptor.
    pub fn from_document(doc: ModelDocument) -> Result<Self, CompilerError> {
        let prebuilt_entities = doc
            .prebuilt_entities
            .into_iter()
            .map(|group| -> Result<PrebuiltGroup, CompilerError> {
                Ok(PrebuiltGroup {
                    builtin: group.builtin,
                    entities: resolve_all(group.entities)?,
                })
            })
            .collect::<Result<_, _>>()?;

        let composites = doc
            .composites
            .into_iter()
            .map(|composite| -> Result<CompositeDef, CompilerError> {
                Ok(CompositeDef {
                    name: composite.composite_name,
                    attributes: resolve_all(composite.attributes)?,
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            app_name: doc.name,
            intents: doc.intents,
            entities: resolve_all(doc.entities)?,
            prebuilt_entities,
            closed_lists: resolve_all(doc.closed_lists)?,
            regex_entities: resolve_all(doc.regex_entities)?,
            pattern_any_entities: resolve_all(doc.pattern_any_entities)?,
            composites,
        })
    }
}

fn resolve_all(descriptors: Vec<EntityDescriptor>) -> Result<Vec<EntityRef>, CompilerError> {
    descriptors.into_iter().map(EntityDescriptor::resolve).collect()
}

/// Replaces characters LUIS allows in names but identifiers do not.
pub fn normalize_name(name: &str) -> String {
    name.replace(['.', ' '], "_")
}

/// Serialized form of an application model.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub intents: Vec<String>,
    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,
    #[serde(default)]
    pub prebuilt_entities: Vec<PrebuiltGroupDocument>,
    #[serde(default)]
    pub closed_lists: Vec<EntityDescriptor>,
    #[serde(default, alias = "regex_entities")]
    pub regex_entities: Vec<EntityDescriptor>,
    #[serde(default)]
    pub pattern_any_entities: Vec<EntityDescriptor>,
    #[serde(default)]
    pub composites: Vec<CompositeDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrebuiltGroupDocument {
    #[serde(rename = "type")]
    pub builtin: String,
    pub entities: Vec<EntityDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeDocument {
    pub composite_name: String,
    #[serde(default)]
    pub attributes: Vec<EntityDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_model() -> ApplicationModel {
        ApplicationModel {
            intents: vec!["Book".to_string(), "None".to_string()],
            entities: vec![EntityRef::from("city")],
            prebuilt_entities: vec![PrebuiltGroup {
                builtin: "number".to_string(),
                entities: vec![EntityRef::from("amount")],
            }],
            closed_lists: vec![EntityRef::from("airline")],
            composites: vec![CompositeDef {
                name: "Booking".to_string(),
                attributes: vec![EntityRef::from("city"), EntityRef::from("amount")],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_instance_fields_order() {
        let model = booking_model();
        assert_eq!(
            model.instance_fields(),
            vec!["city", "amount", "airline", "Booking", "city", "amount"]
        );
    }

    #[test]
    fn test_attribute_tag() {
        let model = booking_model();
        assert_eq!(model.attribute_tag("airline"), "list");
        assert_eq!(model.attribute_tag("amount"), "number");
        assert_eq!(model.attribute_tag("number"), "number");
        assert_eq!(model.attribute_tag("city"), "city");
    }

    #[test]
    fn test_stats() {
        let stats = booking_model().stats();
        assert_eq!(
            stats,
            ModelStats {
                intents: 2,
                entities: 3,
                composites: 1,
            }
        );
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Calendar.Add event"), "Calendar_Add_event");
    }

    #[test]
    fn test_from_document() {
        let doc: ModelDocument = serde_json::from_str(
            r#"{
                "intents": ["Greeting", "None"],
                "entities": ["city", {"name": "when", "instanceOf": "datetimeV2"}],
                "prebuiltEntities": [{"type": "number", "entities": ["amount"]}],
                "closedLists": ["airline"],
                "regex_entities": ["code"],
                "composites": [
                    {"compositeName": "Trip", "attributes": [{"name": "Leg", "compositeInstanceOf": true}]}
                ]
            }"#,
        )
        .unwrap();

        let model = ApplicationModel::from_document(doc).unwrap();
        assert_eq!(model.intents, vec!["Greeting", "None"]);
        assert_eq!(model.entities.len(), 2);
        assert_eq!(model.prebuilt_entities[0].builtin, "number");
        assert_eq!(model.regex_entities, vec![EntityRef::from("code")]);
        assert_eq!(
            model.composites[0].attributes,
            vec![EntityRef::Composite { name: "Leg".to_string() }]
        );
    }

    #[test]
    fn test_from_document_rejects_malformed_descriptor() {
        let doc: ModelDocument = serde_json::from_str(
            r#"{"intents": ["None"], "patternAnyEntities": [{"name": "x"}]}"#,
        )
        .unwrap();

        let err = ApplicationModel::from_document(doc).unwrap_err();
        assert!(matches!(err, CompilerError::InvalidEntityDescriptor { .. }));
    }
}
