//! Model building for 6.x schemas.
//!
//! Machine-learned entities form trees: a node with children is a composite,
//! a leaf is a simple entity whose `instanceOf` may point at another simple
//! entity, a prebuilt, or a closed list.

use std::collections::{HashMap, HashSet};

use super::luis::{LuisApp, LuisEntity};
use crate::ir::{normalize_name, ApplicationModel, CompositeDef, EntityRef, PrebuiltGroup};

pub fn build(app: &LuisApp) -> ApplicationModel {
    let types = LeafTypes::collect(app);

    let mut tree = Tree::default();
    for entity in &app.entities {
        tree.walk(entity, &types);
    }

    let prebuilt_entities = app
        .prebuilt_entities
        .iter()
        .map(|entity| PrebuiltGroup {
            builtin: entity.name.clone(),
            entities: std::iter::once(entity.name.clone())
                .chain(entity.sorted_roles())
                .map(EntityRef::Name)
                .collect(),
        })
        .collect();

    ApplicationModel {
        app_name: app.name.clone(),
        intents: super::intent_names(app),
        entities: tree.entities,
        prebuilt_entities,
        closed_lists: names(&app.closed_lists),
        regex_entities: names(&app.regex_entities),
        pattern_any_entities: names(&app.pattern_any_entities),
        composites: tree.composites,
    }
}

/// Leaves and composites collected from the entity trees. A name is
/// recorded once; later occurrences of the same leaf or composite are
/// attributes of their parents only.
#[derive(Default)]
struct Tree {
    entities: Vec<EntityRef>,
    composites: Vec<CompositeDef>,
    leaves: HashSet<String>,
    composite_names: HashSet<String>,
}

impl Tree {
    /// Depth-first. Leaves are listed in document order; a composite is
    /// recorded after the composites nested in it.
    fn walk(&mut self, entity: &LuisEntity, types: &LeafTypes) {
        if !entity.is_composite() {
            if self.leaves.insert(entity.name.clone()) {
                self.entities.push(types.typed(&entity.name));
            }
            return;
        }

        for child in &entity.children {
            self.walk(child, types);
        }

        let name = normalize_name(&entity.name);
        if !self.composite_names.insert(name.clone()) {
            return;
        }

        self.composites.push(CompositeDef {
            name,
            attributes: entity
                .children
                .iter()
                .map(|child| {
                    if child.is_composite() {
                        EntityRef::Composite {
                            name: child.name.clone(),
                        }
                    } else {
                        types.typed(&child.name)
                    }
                })
                .collect(),
        });
    }
}

fn names(entities: &[LuisEntity]) -> Vec<EntityRef> {
    entities
        .iter()
        .flat_map(|entity| std::iter::once(entity.name.clone()).chain(entity.sorted_roles()))
        .map(EntityRef::Name)
        .collect()
}

/// Resolved type tag of every leaf entity.
struct LeafTypes {
    resolved: HashMap<String, Option<String>>,
}

impl LeafTypes {
    fn collect(app: &LuisApp) -> Self {
        let mut declared = HashMap::new();
        let mut stack: Vec<&LuisEntity> = app.entities.iter().collect();
        while let Some(entity) = stack.pop() {
            if entity.is_composite() {
                stack.extend(entity.children.iter());
            } else {
                declared.insert(entity.name.clone(), entity.instance_of.clone());
            }
        }

        let closed_lists: HashSet<&str> =
            app.closed_lists.iter().map(|list| list.name.as_str()).collect();

        let resolved = declared
            .keys()
            .map(|name| {
                let tag = resolve_chain(&declared, name).map(|tag| {
                    if closed_lists.contains(tag.as_str()) {
                        "list".to_string()
                    } else {
                        tag
                    }
                });
                (name.clone(), tag)
            })
            .collect();

        Self { resolved }
    }

    fn typed(&self, name: &str) -> EntityRef {
        EntityRef::Typed {
            name: name.to_string(),
            kind_tag: self.resolved.get(name).cloned().flatten(),
        }
    }
}

/// Follows `instanceOf` through other simple entities until it reaches a
/// type that is not itself a typed simple entity.
fn resolve_chain(declared: &HashMap<String, Option<String>>, name: &str) -> Option<String> {
    let mut seen = HashSet::from([name.to_string()]);
    let mut current = declared.get(name).cloned().flatten()?;

    while let Some(Some(next)) = declared.get(&current) {
        if !seen.insert(current.clone()) {
            break;
        }
        current = next.clone();
    }

    Some(current)
}
