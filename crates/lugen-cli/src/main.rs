//! lugen CLI.
//!
//! Generates strongly typed recognizer classes from LUIS application exports.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use lugen_compiler::{Compiler, CompilerConfig, InputFormat};

mod ui;

#[derive(Parser)]
#[command(name = "lugen")]
#[command(about = "Generate strongly typed recognizer classes from LUIS models")]
#[command(version)]
struct Cli {
    /// Log pipeline details (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a recognizer class from a LUIS model
    Generate {
        /// Input JSON file
        #[arg(short, long = "in", value_name = "FILE")]
        input: PathBuf,

        /// Output file, or a directory to place <ClassName>.cs in
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Class name, optionally namespace-qualified (Contoso.Bot.Booking)
        #[arg(short, long)]
        class_name: Option<String>,

        /// Input document format
        #[arg(short, long, value_enum, default_value_t = Format::Luis)]
        format: Format,

        /// Target language
        #[arg(short, long, default_value = "cs")]
        language: String,

        /// Overwrite an existing output file
        #[arg(long)]
        force: bool,
    },

    /// Build the model and emit in memory without writing anything
    Check {
        /// Input JSON file
        #[arg(short, long = "in", value_name = "FILE")]
        input: PathBuf,

        /// Input document format
        #[arg(short, long, value_enum, default_value_t = Format::Luis)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// LUIS application export
    Luis,
    /// Pre-built application model
    Model,
}

impl From<Format> for InputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Luis => InputFormat::Luis,
            Format::Model => InputFormat::Model,
        }
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            input,
            out,
            class_name,
            format,
            language,
            force,
        } => {
            let config = CompilerConfig {
                input,
                out_path: out,
                class_name,
                input_format: format.into(),
                language,
                force,
            };
            generate(config).await?;
        }

        Commands::Check { input, format } => {
            let config = CompilerConfig {
                input,
                input_format: format.into(),
                ..Default::default()
            };
            check(config).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn generate(config: CompilerConfig) -> miette::Result<()> {
    let start = Instant::now();
    let input = config.input.display().to_string();
    let spinner = ui::spinner(&format!("Generating from {}...", input));

    let result = match Compiler::new(config).generate().await {
        Ok(result) => result,
        Err(e) => {
            spinner.finish_and_clear();
            ui::failed_header("Generation failed.");
            return Err(e.into());
        }
    };

    spinner.finish_and_clear();
    ui::success(&format!(
        "Wrote {} to {}",
        result.class_name,
        result.out_path.display()
    ));
    ui::dim(&ui::stats_line(
        result.stats.intents,
        result.stats.entities,
        result.stats.composites,
    ));
    ui::timing("Done", start.elapsed().as_millis());

    Ok(())
}

async fn check(config: CompilerConfig) -> miette::Result<()> {
    let input = config.input.display().to_string();
    let spinner = ui::spinner(&format!("Checking {}...", input));

    match Compiler::new(config).check().await {
        Ok(stats) => {
            spinner.finish_and_clear();
            ui::success("Looking good.");
            ui::info(&ui::stats_line(stats.intents, stats.entities, stats.composites));
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::failed_header("Check failed.");
            Err(e.into())
        }
    }
}
