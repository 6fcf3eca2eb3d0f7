//! Entity references and the semantic entity kinds they map to.

use serde::{Deserialize, Deserializer};

use crate::diagnostic::CompilerError;

/// Semantic kind of an entity, derived from its type tag.
///
/// Targets map each kind to a concrete field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Age,
    DateTime,
    Dimension,
    Geography,
    List,
    Money,
    Ordinal,
    Temperature,
    /// `number`, `ordinal` and `percentage` all resolve to a plain number.
    Number,
    /// Anything unrecognized, and untagged entities.
    Text,
}

impl EntityKind {
    /// Looks up a type tag. Unknown or absent tags are [`EntityKind::Text`].
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("age") => Self::Age,
            Some("datetimeV2") => Self::DateTime,
            Some("dimension") => Self::Dimension,
            Some("geographyV2") => Self::Geography,
            Some("list") => Self::List,
            Some("money") => Self::Money,
            Some("ordinalV2") => Self::Ordinal,
            Some("temperature") => Self::Temperature,
            Some("number") | Some("ordinal") | Some("percentage") => Self::Number,
            _ => Self::Text,
        }
    }
}

/// A resolved reference to an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    /// A bare name; its type comes from the group it is listed in.
    Name(String),
    /// A name with its own type tag, which takes precedence over the group's.
    Typed {
        name: String,
        kind_tag: Option<String>,
    },
    /// Another composite entity, bound as an array of its value-holder class.
    Composite { name: String },
}

impl EntityRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Typed { name, .. } | Self::Composite { name } => name,
        }
    }

    /// The tag used for the field-type lookup, given the tag of the
    /// enclosing group. `None` for composites, which bypass the lookup.
    pub fn effective_tag<'a>(&'a self, explicit: Option<&'a str>) -> Option<Option<&'a str>> {
        match self {
            Self::Name(_) => Some(explicit),
            Self::Typed { kind_tag, .. } => Some(kind_tag.as_deref()),
            Self::Composite { .. } => None,
        }
    }
}

impl From<&str> for EntityRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// An entity as it appears in a model document, before resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntityDescriptor {
    Name(String),
    Object {
        name: String,
        /// Outer `Some` when the key is present, even if its value is `null`.
        #[serde(rename = "instanceOf", default, deserialize_with = "present")]
        instance_of: Option<Option<String>>,
        #[serde(rename = "compositeInstanceOf", default)]
        composite_instance_of: Option<bool>,
    },
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl EntityDescriptor {
    /// Resolves the descriptor into an [`EntityRef`].
    ///
    /// `instanceOf` wins over `compositeInstanceOf`. An object carrying
    /// neither is rejected.
    pub fn resolve(self) -> Result<EntityRef, CompilerError> {
        match self {
            Self::Name(name) => Ok(EntityRef::Name(name)),
            Self::Object {
                name,
                instance_of: Some(kind_tag),
                ..
            } => Ok(EntityRef::Typed { name, kind_tag }),
            Self::Object {
                name,
                composite_instance_of: Some(true),
                ..
            } => Ok(EntityRef::Composite { name }),
            Self::Object { name, .. } => Err(CompilerError::InvalidEntityDescriptor { name }),
        }
    }
}
