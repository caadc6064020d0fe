use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use sxml::{compile_schema, parse_with_config, Element, ParserConfig, MAX_DEPTH};

#[derive(Debug, Parser)]
#[command(
    name = "sxml",
    version,
    about = "Parse, validate and convert sxml documents"
)]
struct Args {
    /// Maximum element nesting depth (1 to 256)
    #[arg(
        long,
        global = true,
        value_name = "N",
        default_value_t = ParserConfig::default().max_depth,
        value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_DEPTH))
    )]
    max_depth: u16,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a file and report whether it is well formed
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Validate a file against a schema
    Validate {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,
    },
    /// Convert a file to html, xml, sxml or json
    Generate {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
        #[arg(value_name = "FORMAT")]
        format: String,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Print the document tree
    Dump {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print version information
    Version,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = ParserConfig::new(args.max_depth);
    debug!(command = ?args.command, max_depth = args.max_depth, "running");

    match args.command {
        Command::Parse { file } => {
            let doc = load(&file, config)?;
            let report = format!("{}: ok (root '{}')\n", file.display(), doc.name);
            write_output(None, report.as_bytes())
        }
        Command::Validate { source, schema } => {
            let schema_doc = load(&schema, config)?;
            let schema_rules = compile_schema(&schema_doc)
                .map_err(|e| failure(&schema, e.into()))?;
            let doc = load(&source, config)?;
            schema_rules
                .validate(&doc)
                .map_err(|e| failure(&source, e.into()))?;
            let report = format!("{}: valid\n", source.display());
            write_output(None, report.as_bytes())
        }
        Command::Generate {
            source,
            format,
            output,
        } => {
            let doc = load(&source, config)?;
            let text = sxml::generate(&doc, &format).map_err(|e| failure(&source, e.into()))?;
            write_output(output.as_deref(), text.as_bytes())
        }
        Command::Dump { file } => {
            let doc = load(&file, config)?;
            write_output(None, sxml::dump(&doc).as_bytes())
        }
        Command::Version => {
            let text = format!("sxml {}\n", env!("CARGO_PKG_VERSION"));
            write_output(None, text.as_bytes())
        }
    }
}

fn load(path: &Path, config: ParserConfig) -> Result<Element> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    parse_with_config(&source, config).map_err(|e| failure(path, e))
}

/// Error naming the failure kind and the file; lexer and parser errors
/// also carry their `offset:line:col`
fn failure(path: &Path, err: sxml::Error) -> anyhow::Error {
    anyhow!("{} in {}: {}", err.kind_name(), path.display(), err)
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
