//! wrapgen CLI
//!
//! Two steps, run separately: `stubs` extracts signatures from a header and
//! writes editable stubs, `wrapper` turns every stub written so far into one
//! interception library source.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wrapgen_codegen::WrapperGenerator;
use wrapgen_core::Config;
use wrapgen_parser::{read_function_list, CompilerPreprocessor, DeclarationExtractor};
use wrapgen_store::SignatureStore;

#[derive(Parser)]
#[command(name = "wrapgen")]
#[command(author, version, about = "Wrapper library generator", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a header for functions and generate (overwrite) their stubs
    Stubs {
        /// Header to preprocess
        #[arg(value_name = "HEADER")]
        header: PathBuf,

        /// File listing one function name per line
        #[arg(value_name = "FUNCTIONS")]
        functions: PathBuf,

        /// Stub directory
        #[arg(value_name = "STUB_PATH")]
        stub_path: PathBuf,

        #[command(flatten)]
        preprocessor: PreprocessorArgs,
    },

    /// Read generated stubs and create (overwrite) the wrapper source
    Wrapper {
        /// Wrapper source to write
        #[arg(value_name = "WRAPPER_PATH")]
        wrapper_path: PathBuf,

        /// Stub directory
        #[arg(value_name = "STUB_PATH")]
        stub_path: PathBuf,
    },
}

#[derive(Args)]
struct PreprocessorArgs {
    /// Compiler to use for preprocessing the header
    #[arg(long, value_name = "PATH")]
    compiler: Option<PathBuf>,

    /// Include directive passed to the preprocessor (repeatable)
    #[arg(long = "includes", value_name = "ARG", allow_hyphen_values = true)]
    includes: Vec<String>,

    /// Macro definition NAME or NAME=VALUE (repeatable)
    #[arg(short = 'D', long = "define", value_name = "MACRO")]
    defines: Vec<String>,
}

impl PreprocessorArgs {
    /// Command-line values take precedence over the configuration file
    fn apply(self, config: &mut Config) {
        if let Some(compiler) = self.compiler {
            config.preprocessor.compiler = compiler;
        }
        if !self.includes.is_empty() {
            config.preprocessor.includes = self.includes;
        }
        config.preprocessor.defines.extend(self.defines);
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::from_yaml_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Stubs {
            header,
            functions,
            stub_path,
            preprocessor,
        } => {
            preprocessor.apply(&mut config);
            cmd_stubs(&config, &header, &functions, &stub_path)?;
        }
        Commands::Wrapper {
            wrapper_path,
            stub_path,
        } => {
            cmd_wrapper(&config, &wrapper_path, &stub_path)?;
        }
    }

    Ok(())
}

fn cmd_stubs(config: &Config, header: &Path, functions: &Path, stub_path: &Path) -> Result<()> {
    println!("📂 Extracting from: {}", header.display());

    let requested = read_function_list(functions)?;
    debug!("Requested functions: {:?}", requested);

    let preprocessor = CompilerPreprocessor::from_config(&config.preprocessor)?;
    let extractor = DeclarationExtractor::new(preprocessor);
    let extraction = extractor.extract_header(header, requested.clone())?;

    println!("   Found {} of {} functions", extraction.signatures.len(), requested.len());

    let header_name = header.to_string_lossy();
    let store = SignatureStore::create(stub_path, &config.store.stub_extension)?;
    store.record_extraction(&header_name, &extraction.signatures)?;

    let missing = store.missing(&requested)?;
    if missing.is_empty() {
        println!("All stubs generated.");
    } else {
        println!("Functions missing stub files: ");
        println!("{}", missing.join(", "));
        println!(
            "Perhaps functions are defined in multiple headers. \
             Generate more stubs using different headers to complete the stub set."
        );
    }

    Ok(())
}

fn cmd_wrapper(config: &Config, wrapper_path: &Path, stub_path: &Path) -> Result<()> {
    let generator = WrapperGenerator::new();
    match generator.generate(stub_path, &config.store.stub_extension, wrapper_path) {
        Ok(count) => {
            println!("📝 Wrote {} ({} functions)", wrapper_path.display(), count);
            Ok(())
        }
        Err(e) if e.is_not_initialized() => {
            eprintln!("Stub generation incomplete. Please regenerate stubs before generating wrapper.");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
