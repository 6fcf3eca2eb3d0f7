//! # lugen Compiler
//!
//! This crate turns a LUIS application export into a strongly typed class
//! that recognizer results can be deserialized into. Target languages are
//! pluggable; C# is built in.
//!
//! ## Architecture
//!
//! ```text
//! LUIS JSON / model document
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Builder    │  Schema-version specific
//! │ (JSON → IR)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │      IR      │  Resolved application model
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Target emitter + scoped writer
//! │  (IR → C#)   │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Output    │  Async sink, no partial files
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lugen_compiler::{Compiler, CompilerConfig};
//!
//! let config = CompilerConfig {
//!     input: "FlightBooking.json".into(),
//!     out_path: "Generated".into(),
//!     class_name: Some("Contoso.FlightBooking".to_string()),
//!     ..Default::default()
//! };
//!
//! let result = Compiler::new(config).generate().await?;
//! println!("wrote {}", result.out_path.display());
//! ```

pub mod builder;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod ir;
pub mod output;

use std::path::PathBuf;

pub use codegen::ClassName;
pub use config::{CompilerConfig, InputFormat};
pub use diagnostic::CompilerError;
pub use ir::{ApplicationModel, ModelStats};

/// The main compiler struct that orchestrates the generation pipeline.
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Creates a new compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Generates the recognizer class and writes it out.
    ///
    /// This runs the full pipeline:
    /// 1. Create the target for the configured language
    /// 2. Read the input and build the application model
    /// 3. Resolve the class name
    /// 4. Emit the class into memory
    /// 5. Write it through the output sink
    ///
    /// Nothing is written unless steps 1-4 succeed.
    pub async fn generate(&self) -> Result<GenerateResult, CompilerError> {
        // Phase 1: Create target
        let target = codegen::create_target(&self.config.language)?;

        // Phase 2: Build model
        let model = self.load_model().await?;

        // Phase 3: Class name
        let class = self.class_name(&model)?;

        // Phase 4: Emit
        let code = target.generate(&model, &class)?;
        tracing::debug!(class = %class.qualified(), bytes = code.len(), "emitted class");

        // Phase 5: Write output
        let out_path = self.resolve_out_path(&class, target.extension()).await;
        let out_path = output::write_output(&out_path, &code, self.config.force).await?;
        tracing::info!(path = %out_path.display(), "wrote generated class");

        Ok(GenerateResult {
            class_name: class.qualified(),
            out_path,
            stats: model.stats(),
        })
    }

    /// Builds the model and emits the class without writing anything.
    pub async fn check(&self) -> Result<ModelStats, CompilerError> {
        let target = codegen::create_target(&self.config.language)?;
        let model = self.load_model().await?;
        let class = self.class_name(&model)?;
        target.generate(&model, &class)?;
        Ok(model.stats())
    }

    /// Reads the input document and builds the application model.
    pub async fn load_model(&self) -> Result<ApplicationModel, CompilerError> {
        let path = &self.config.input;
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CompilerError::io(path, e.to_string()))?;

        tracing::debug!(path = %path.display(), format = ?self.config.input_format, "loading model");

        match self.config.input_format {
            InputFormat::Luis => {
                let app = builder::parse_app(&content, path)?;
                builder::build(&app)
            }
            InputFormat::Model => {
                let doc: ir::ModelDocument =
                    serde_json::from_str(&content).map_err(|e| CompilerError::InvalidJson {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                ApplicationModel::from_document(doc)
            }
        }
    }

    fn class_name(&self, model: &ApplicationModel) -> Result<ClassName, CompilerError> {
        match &self.config.class_name {
            Some(qualified) => ClassName::parse(qualified),
            None => Ok(ClassName::from_app_name(model.app_name.as_deref())),
        }
    }

    /// An existing directory, or a path ending in a separator, receives
    /// `<ClassName>.<ext>`; anything else is used as the file path.
    async fn resolve_out_path(&self, class: &ClassName, extension: &str) -> PathBuf {
        let out = &self.config.out_path;
        let is_dir = out.to_string_lossy().ends_with(['/', '\\'])
            || tokio::fs::metadata(out)
                .await
                .map(|meta| meta.is_dir())
                .unwrap_or(false);

        if is_dir {
            out.join(format!("{}.{}", class.name, extension))
        } else {
            out.clone()
        }
    }
}

/// Result of a successful generation.
#[derive(Debug)]
pub struct GenerateResult {
    /// Namespace-qualified name of the generated class.
    pub class_name: String,
    /// File the class was written to.
    pub out_path: PathBuf,
    pub stats: ModelStats,
}
