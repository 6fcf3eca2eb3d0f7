//! Compiler error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while generating a recognizer class.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum CompilerError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to read file '{}': {message}", path.display())]
    #[diagnostic(code(lugen::io::read_error))]
    IoError {
        path: PathBuf,
        message: String,
    },

    #[error("Output file already exists: {}", path.display())]
    #[diagnostic(
        code(lugen::io::output_exists),
        help("Pass --force to overwrite the existing file")
    )]
    OutputExists {
        path: PathBuf,
    },

    #[error("Failed to write output '{}': {message}", path.display())]
    #[diagnostic(code(lugen::io::output_sink))]
    OutputSink {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Invalid LUIS JSON in '{}': {message}", path.display())]
    #[diagnostic(
        code(lugen::input::invalid_json),
        help("Export the application from the LUIS portal as JSON and pass that file")
    )]
    InvalidJson {
        path: PathBuf,
        message: String,
    },

    #[error("Unsupported luis_schema_version '{version}'")]
    #[diagnostic(
        code(lugen::input::unsupported_schema_version),
        help("Supported schema versions are 4.x and below, and 6.0.0 and above")
    )]
    UnsupportedSchemaVersion {
        version: String,
    },

    // =========================================================================
    // Generation Errors
    // =========================================================================
    #[error("Invalid entity descriptor '{name}': expected instanceOf or compositeInstanceOf")]
    #[diagnostic(
        code(lugen::codegen::invalid_entity_descriptor),
        help("Object entity descriptors must carry either 'instanceOf' or 'compositeInstanceOf: true'")
    )]
    InvalidEntityDescriptor {
        name: String,
    },

    #[error("Duplicate identifier '{identifier}' in {scope}")]
    #[diagnostic(
        code(lugen::codegen::duplicate_identifier),
        help("Two entity or intent names normalize to the same identifier; rename one of them in the LUIS application")
    )]
    DuplicateIdentifier {
        identifier: String,
        scope: String,
    },

    #[error("Unbalanced scope in generated code: {depth} scope(s) left open")]
    #[diagnostic(code(lugen::codegen::unbalanced_scope))]
    UnbalancedScope {
        depth: usize,
    },

    // =========================================================================
    // Target Errors
    // =========================================================================
    #[error("Invalid class name '{name}'")]
    #[diagnostic(
        code(lugen::target::invalid_class_name),
        help("Use identifiers separated by '.', e.g. Contoso.Bot.FlightBooking")
    )]
    InvalidClassName {
        name: String,
    },

    #[error("Unsupported target language: {language}")]
    #[diagnostic(
        code(lugen::target::unsupported_language),
        help("Supported targets: cs")
    )]
    UnsupportedLanguage {
        language: String,
    },
}

impl CompilerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an output sink error.
    pub fn sink(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OutputSink {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error comes from a malformed application model.
    pub fn is_generation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEntityDescriptor { .. }
                | Self::DuplicateIdentifier { .. }
                | Self::UnbalancedScope { .. }
        )
    }
}
