//! The `filekit` command tree
//!
//! A root group with two commands, `clean` and `extract`. The root handler
//! loads an optional TOML configuration into the shared context before either
//! command runs.

use super::filenames::{CleanOptions, SourceKind, clean_filename, extract_filenames};
use crate::command::{Command, CommandNode, Group, Invocation};
use crate::context::RuntimeContext;
use crate::error::{CliError, CliResult, DefinitionError};
use crate::param::Parameter;
use crate::parser::{FromArgs, ParsedArgs};
use anyhow::Context as _;
use log::{debug, info};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Context key holding the effective `--verbose` setting
pub const VERBOSE_KEY: &str = "verbose";
/// Context key that makes `clean` keep digits by default
pub const KEEP_NUMBERS_KEY: &str = "keep_numbers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

crate::choice_enum!(OutputFormat {
    Text => "text",
    Json => "json",
});

struct CleanArgs {
    names: Vec<String>,
    keep_numbers: bool,
    underscores: bool,
    format: OutputFormat,
}

impl FromArgs for CleanArgs {
    fn from_args(args: &ParsedArgs) -> CliResult<Self> {
        Ok(CleanArgs {
            names: args.get("names")?,
            keep_numbers: args.get("keep_numbers")?,
            underscores: args.get("underscores")?,
            format: args.choice("format")?.unwrap_or(OutputFormat::Text),
        })
    }
}

struct ExtractArgs {
    source: PathBuf,
    kind: SourceKind,
    limit: Option<i64>,
    format: OutputFormat,
}

impl FromArgs for ExtractArgs {
    fn from_args(args: &ParsedArgs) -> CliResult<Self> {
        Ok(ExtractArgs {
            source: args.get("source")?,
            kind: args.choice("kind")?.unwrap_or(SourceKind::Text),
            limit: args.get("limit")?,
            format: args.choice("format")?.unwrap_or(OutputFormat::Text),
        })
    }
}

#[derive(Serialize)]
struct CleanedName<'a> {
    original: &'a str,
    cleaned: String,
}

#[derive(Serialize)]
struct Extraction<'a> {
    source: String,
    kind: &'a str,
    count: usize,
    names: &'a [String],
}

/// Builds the `filekit` tree
pub fn build_cli() -> Result<CommandNode, DefinitionError> {
    let root = Group::builder("filekit")
        .about("Clean up and collect filenames.")
        .version(env!("CARGO_PKG_VERSION"))
        .param(
            "config",
            Parameter::file()
                .short("-c")
                .long("--config")
                .exists(true)
                .help("TOML file merged into the shared context"),
        )
        .param(
            "verbose",
            Parameter::boolean()
                .short("-v")
                .long("--verbose")
                .help("Report what each command did on stderr"),
        )
        .context_param()
        .handler(configure)
        .command(clean_command()?)
        .command(extract_command()?)
        .build()?;
    Ok(root.into())
}

fn format_param() -> Parameter {
    Parameter::choice_by_flag::<OutputFormat>()
        .default_choice(OutputFormat::Text)
        .help("Output format")
}

fn clean_command() -> Result<Command, DefinitionError> {
    Command::builder("clean")
        .about("Clean filenames.\n\nStrips numbering and special characters and title-cases the rest.")
        .param(
            "names",
            Parameter::string_list()
                .short("-n")
                .long("--name")
                .help("Filename to clean; repeat for more"),
        )
        .param("keep_numbers", Parameter::boolean().help("Keep digits inside names"))
        .param("underscores", Parameter::boolean().help("Turn underscores into spaces"))
        .param("format", format_param())
        .handler(clean)
        .build()
}

fn extract_command() -> Result<Command, DefinitionError> {
    Command::builder("extract")
        .about("Extract filenames from a text file, a listing or a CSV file.")
        .param(
            "source",
            Parameter::file().exists(true).help("File to read names from"),
        )
        .param(
            "kind",
            Parameter::choice::<SourceKind>()
                .long("--kind")
                .default_choice(SourceKind::Text)
                .help("How to read the source"),
        )
        .param(
            "limit",
            Parameter::integer()
                .long("--limit")
                .help("Keep at most this many names"),
        )
        .param("format", format_param())
        .handler(extract)
        .build()
}

fn configure(inv: &mut Invocation<'_>) -> anyhow::Result<()> {
    let context: RuntimeContext = inv.get("context")?;
    let config: Option<PathBuf> = inv.get("config")?;
    if let Some(path) = config {
        let merged = context.load_toml(&path)?;
        debug!("merged {} key(s) from {}", merged, path.display());
    }

    let verbose = inv.get::<bool>("verbose")? || context.get_or(VERBOSE_KEY, false);
    context.set(VERBOSE_KEY, verbose)?;
    Ok(())
}

fn verbose(inv: &Invocation<'_>) -> bool {
    inv.context().get_or(VERBOSE_KEY, false)
}

fn clean(inv: &mut Invocation<'_>) -> anyhow::Result<()> {
    let args: CleanArgs = inv.args()?;
    if args.names.is_empty() {
        return Err(CliError::arguments_missing("Missing value for flag `-n`").into());
    }

    let options = CleanOptions {
        keep_numbers: args.keep_numbers || inv.context().get_or(KEEP_NUMBERS_KEY, false),
        underscores_to_spaces: args.underscores,
    };
    let cleaned: Vec<CleanedName<'_>> = args
        .names
        .iter()
        .map(|name| CleanedName {
            original: name,
            cleaned: clean_filename(name, options),
        })
        .collect();

    match args.format {
        OutputFormat::Json => writeln!(inv.out(), "{}", serde_json::to_string_pretty(&cleaned)?)?,
        OutputFormat::Text => {
            for name in &cleaned {
                writeln!(inv.out(), "{}", name.cleaned)?;
            }
        }
    }

    info!("cleaned {} name(s)", cleaned.len());
    if verbose(inv) {
        writeln!(inv.err(), "cleaned {} name(s)", cleaned.len())?;
    }
    Ok(())
}

fn extract(inv: &mut Invocation<'_>) -> anyhow::Result<()> {
    let args: ExtractArgs = inv.args()?;
    let content = std::fs::read_to_string(&args.source)
        .with_context(|| format!("Failed to read {}", args.source.display()))?;

    let mut names = extract_filenames(&content, args.kind);
    if let Some(limit) = args.limit {
        let limit = usize::try_from(limit).map_err(|_| {
            CliError::parsing(format!("Invalid value for --limit: {} is negative", limit))
        })?;
        names.truncate(limit);
    }

    match args.format {
        OutputFormat::Json => {
            let extraction = Extraction {
                source: args.source.display().to_string(),
                kind: crate::ChoiceEnum::value(args.kind),
                count: names.len(),
                names: &names,
            };
            writeln!(inv.out(), "{}", serde_json::to_string_pretty(&extraction)?)?;
        }
        OutputFormat::Text => {
            for name in &names {
                writeln!(inv.out(), "{}", name)?;
            }
        }
    }

    info!("extracted {} name(s) from {}", names.len(), args.source.display());
    if verbose(inv) {
        writeln!(inv.err(), "extracted {} name(s)", names.len())?;
    }
    Ok(())
}
