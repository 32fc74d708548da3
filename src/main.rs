//! jdelta command-line interface.
//!
//! This is the main entry point for the jdelta CLI tool. It uses clap for
//! argument parsing and wires together the library modules to diff, patch
//! and merge structured data files.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use jdelta::{
    apply_merge_patch, apply_patch_document, compute_diff, filter_diff, format_diff,
    format_value, parse_file, parse_stdin, DiffConfig, FilterConfig, FormatHint, JdeltaError,
    JsonValue, OutputFormat, OutputOptions, PathStyle,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

/// jdelta - structural diff, JSON Patch and JSON Merge Patch
///
/// Compares JSON, YAML and TOML documents structurally, and applies RFC 6902
/// patches and RFC 7396 merge patches to them.
#[derive(Parser)]
#[command(name = "jdelta")]
#[command(version)]
#[command(about = "Structural diff and patching for JSON-shaped data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the differences between two documents (exit 1 if they differ)
    Diff(DiffArgs),
    /// Apply an RFC 6902 JSON Patch to a document (exit 1 if the patch fails)
    Patch {
        /// Document to patch ("-" for stdin)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,
        /// Patch document: an array of operations
        #[arg(value_name = "PATCH")]
        patch: PathBuf,
    },
    /// Apply an RFC 7396 JSON Merge Patch to a document
    Merge {
        /// Document to merge into ("-" for stdin)
        #[arg(value_name = "TARGET")]
        target: PathBuf,
        /// Merge patch document
        #[arg(value_name = "PATCH")]
        patch: PathBuf,
    },
}

#[derive(Args)]
struct DiffArgs {
    /// Original document ("-" for stdin)
    #[arg(value_name = "OLD")]
    old: PathBuf,

    /// Updated document
    #[arg(value_name = "NEW")]
    new: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Write paths as $.a.b[0] instead of /a/b/0
    #[arg(long)]
    dotted: bool,

    /// Show full values instead of previews
    #[arg(long)]
    show_values: bool,

    /// Maximum length for displayed values
    #[arg(long, default_value = "80")]
    max_value_length: usize,

    /// Ignore whitespace differences in strings
    #[arg(long)]
    ignore_whitespace: bool,

    /// Hide changes under paths matching this pattern (e.g. "/**/timestamp")
    #[arg(long, value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Only show changes under paths matching this pattern
    #[arg(long, value_name = "PATTERN")]
    only: Vec<String>,

    /// Quiet mode (only show changes, suppress summary)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output (plain when stdout is not a terminal)
    Terminal,
    /// JSON report
    Json,
    /// Plain text (no colors)
    Plain,
    /// RFC 6902 patch document
    Patch,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
            OutputFormatArg::Patch => OutputFormat::Patch,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "jdelta=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Diff(args) => run_diff(args),
        Command::Patch { document, patch } => run_patch(&document, &patch),
        Command::Merge { target, patch } => run_merge(&target, &patch),
    }
}

fn run_diff(args: DiffArgs) -> Result<i32> {
    let old = load(&args.old).context("Failed to parse first file")?;
    let new = load(&args.new).context("Failed to parse second file")?;

    let diff_config = DiffConfig {
        ignore_whitespace: args.ignore_whitespace,
    };
    let diff = compute_diff(&old, &new, &diff_config);

    let filter = args
        .ignore
        .iter()
        .fold(FilterConfig::new(), |config, pattern| config.ignore(pattern));
    let filter = args
        .only
        .iter()
        .fold(filter, |config, pattern| config.only(pattern));
    let diff = filter_diff(&diff, &filter);
    tracing::debug!(entries = diff.entries.len(), "diff computed");

    let output_options = OutputOptions {
        show_values: args.show_values,
        max_value_length: args.max_value_length,
        path_style: if args.dotted {
            PathStyle::Dotted
        } else {
            PathStyle::Pointer
        },
    };

    let mut output_format: OutputFormat = args.format.into();
    if output_format == OutputFormat::Terminal && !std::io::stdout().is_terminal() {
        output_format = OutputFormat::Plain;
    }
    let output = format_diff(&diff, &output_format, &output_options)
        .context("Failed to format diff output")?;

    if args.quiet {
        for line in output.lines() {
            if !line.starts_with("Summary:") && !line.trim().is_empty() {
                println!("{}", line);
            }
        }
    } else {
        println!("{}", output);
    }

    Ok(if diff.is_empty() { 0 } else { 1 })
}

fn run_patch(document: &Path, patch: &Path) -> Result<i32> {
    let doc = load(document).context("Failed to parse document")?;
    let patch = load(patch).context("Failed to parse patch")?;

    match apply_patch_document(&doc, &patch) {
        Ok(patched) => {
            println!("{}", format_value(&patched)?);
            Ok(0)
        }
        Err(err) => {
            eprintln!("Error: {}", JdeltaError::from(err));
            Ok(1)
        }
    }
}

fn run_merge(target: &Path, patch: &Path) -> Result<i32> {
    let target = load(target).context("Failed to parse target")?;
    let patch = load(patch).context("Failed to parse merge patch")?;

    println!("{}", format_value(&apply_merge_patch(&target, &patch))?);
    Ok(0)
}

fn load(path: &Path) -> Result<JsonValue> {
    let value = if path == Path::new("-") {
        parse_stdin(FormatHint::Auto)?
    } else {
        parse_file(path)?
    };
    Ok(value)
}
