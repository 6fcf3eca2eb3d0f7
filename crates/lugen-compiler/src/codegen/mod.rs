//! Code generation from the application model.
//!
//! Each target language implements [`Target`]. The emitters write through a
//! [`CodeWriter`], so every opened scope is closed, and take their
//! identifiers from a [`Naming`] implementation.

pub mod csharp;
pub mod naming;
mod writer;

pub use naming::Naming;
pub use writer::CodeWriter;

use crate::diagnostic::CompilerError;
use crate::ir::ApplicationModel;
use naming::{is_csharp_identifier, to_pascal_case};

/// Trait for target languages.
pub trait Target {
    /// Returns the language name (e.g., "cs").
    fn language(&self) -> &str;

    /// File extension of generated sources, without the dot.
    fn extension(&self) -> &str;

    /// Generates the source of one recognizer class.
    fn generate(&self, model: &ApplicationModel, class: &ClassName) -> Result<String, CompilerError>;
}

/// Creates the target for the given language.
pub fn create_target(language: &str) -> Result<Box<dyn Target>, CompilerError> {
    match language.to_ascii_lowercase().as_str() {
        "cs" | "csharp" | "c#" => Ok(Box::new(csharp::CSharpTarget::default())),
        _ => Err(CompilerError::UnsupportedLanguage {
            language: language.to_string(),
        }),
    }
}

/// Namespace and name of the generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassName {
    pub namespace: String,
    pub name: String,
}

impl ClassName {
    pub const DEFAULT_NAMESPACE: &'static str = "Luis";
    pub const FALLBACK_NAME: &'static str = "LuisApp";

    /// Splits `Contoso.Bot.Recognizer` into namespace `Contoso.Bot` and
    /// class `Recognizer`. Unqualified names land in [`Self::DEFAULT_NAMESPACE`].
    ///
    /// Every segment must be a plain identifier.
    pub fn parse(qualified: &str) -> Result<Self, CompilerError> {
        let (namespace, name) = qualified
            .rsplit_once('.')
            .unwrap_or((Self::DEFAULT_NAMESPACE, qualified));

        if !namespace.split('.').chain([name]).all(is_csharp_identifier) {
            return Err(CompilerError::InvalidClassName {
                name: qualified.to_string(),
            });
        }

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    /// Derives the class name from the application name.
    pub fn from_app_name(app_name: Option<&str>) -> Self {
        let name = app_name.map(to_pascal_case).unwrap_or_default();
        let name = if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("{}{}", Self::FALLBACK_NAME, name)
        } else {
            name
        };

        Self {
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
            name,
        }
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}
