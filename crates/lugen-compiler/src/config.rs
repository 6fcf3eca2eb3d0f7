//! Compiler configuration.

use std::path::PathBuf;

/// Shape of the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// A LUIS application export (`luis_schema_version`, `intents`, ...).
    #[default]
    Luis,
    /// An already-built application model (see [`crate::ir::ModelDocument`]).
    Model,
}

/// Configuration for the lugen compiler.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Input JSON document.
    pub input: PathBuf,

    /// Output file, or a directory to place `<ClassName>.<ext>` in.
    pub out_path: PathBuf,

    /// Class name, optionally qualified with a namespace (`Contoso.Bot.Luis`).
    /// Derived from the application name when absent.
    pub class_name: Option<String>,

    /// How to read `input`.
    pub input_format: InputFormat,

    /// Target language (default: "cs").
    pub language: String,

    /// Overwrite an existing output file.
    pub force: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("luis.json"),
            out_path: PathBuf::from("."),
            class_name: None,
            input_format: InputFormat::Luis,
            language: "cs".to_string(),
            force: false,
        }
    }
}
