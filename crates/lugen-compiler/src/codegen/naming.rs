//! Identifier normalization for generated code.

use crate::ir::normalize_name;

/// Turns LUIS entity names into identifiers of the target language.
pub trait Naming {
    /// Field identifier for an entity.
    fn property_name(&self, raw: &str) -> String;

    /// Prefix for the types generated for a composite (`{prefix}Class`,
    /// `_Instance{prefix}`).
    fn type_prefix(&self, raw: &str) -> String;

    /// Member of the intent enumeration.
    fn enum_member(&self, raw: &str) -> String;
}

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// C# naming: JSON property names become fields, keywords get `@`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpNaming;

impl Naming for CSharpNaming {
    fn property_name(&self, raw: &str) -> String {
        escape_keyword(identifier(&json_property_name(raw)))
    }

    fn type_prefix(&self, raw: &str) -> String {
        upper_first(&identifier(&json_property_name(raw)))
    }

    fn enum_member(&self, raw: &str) -> String {
        escape_keyword(identifier(&normalize_name(raw)))
    }
}

fn escape_keyword(name: String) -> String {
    if CSHARP_KEYWORDS.contains(&name.as_str()) {
        format!("@{}", name)
    } else {
        name
    }
}

/// Whether `name` can be used as-is as a C# type or namespace segment.
pub fn is_csharp_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');

    starts_well
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !CSHARP_KEYWORDS.contains(&name)
}

/// The property a recognizer result uses for an entity: roles
/// (`type:role`) keep only the role, and `V2` built-ins drop the suffix
/// except for `geographyV2` and `ordinalV2`.
pub fn json_property_name(raw: &str) -> String {
    let name = raw.rsplit(':').next().unwrap_or(raw);
    let name = match name.strip_suffix("V2") {
        Some(stripped) if !name.starts_with("geographyV2") && !name.starts_with("ordinalV2") => {
            stripped
        }
        _ => name,
    };
    normalize_name(name)
}

/// Replaces characters that cannot appear in an identifier.
fn identifier(name: &str) -> String {
    let mut result: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Converts an application name like "my flight-booker" to PascalCase.
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .map(upper_first)
        .collect()
}
