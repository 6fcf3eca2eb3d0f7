//! Model building for schemas before 6.0.0.
//!
//! Entities are flat lists of names; roles become sibling fields. Composites
//! list their children by name.

use super::luis::{LuisApp, LuisEntity};
use crate::ir::{normalize_name, ApplicationModel, CompositeDef, EntityRef, PrebuiltGroup};

pub fn build(app: &LuisApp) -> ApplicationModel {
    let prebuilt_entities = app
        .prebuilt_entities
        .iter()
        .map(|entity| PrebuiltGroup {
            builtin: entity.name.clone(),
            entities: with_roles(entity),
        })
        .collect();

    let composites = app
        .composites
        .iter()
        .map(|composite| {
            let mut roles = composite.roles.clone();
            roles.sort();

            CompositeDef {
                name: normalize_name(&composite.name),
                attributes: roles
                    .iter()
                    .chain(&composite.children)
                    .map(|name| EntityRef::Name(name.clone()))
                    .collect(),
            }
        })
        .collect();

    ApplicationModel {
        app_name: app.name.clone(),
        intents: super::intent_names(app),
        entities: flatten(&app.entities),
        prebuilt_entities,
        closed_lists: flatten(&app.closed_lists),
        regex_entities: flatten(&app.regex_entities),
        pattern_any_entities: flatten(&app.pattern_any_entities),
        composites,
    }
}

/// The entity name followed by its sorted roles.
fn with_roles(entity: &LuisEntity) -> Vec<EntityRef> {
    std::iter::once(entity.name.clone())
        .chain(entity.sorted_roles())
        .map(EntityRef::Name)
        .collect()
}

fn flatten(entities: &[LuisEntity]) -> Vec<EntityRef> {
    entities.iter().flat_map(with_roles).collect()
}
