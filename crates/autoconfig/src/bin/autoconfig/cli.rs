//! autoconfig cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; autoconfig ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a document as loaded
    Show(ShowCommand),

    /// Print a single value
    Get(GetCommand),

    /// Compare two documents
    Diff(DiffCommand),

    /// Write a starter document for this tool's own `show` options
    Template(TemplateCommand),
}

#[derive(Parser, Debug)]
pub struct ShowCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct GetCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,

    /// Dotted path of the value, e.g. train.lr
    pub path: String,
}

#[derive(Parser, Debug)]
pub struct DiffCommand {
    /// Document A
    pub a: PathBuf,

    /// Document B
    pub b: PathBuf,
}

#[derive(Parser, Debug)]
pub struct TemplateCommand {
    /// Existing directory to write config.yaml into
    pub destination: PathBuf,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Document to load
    pub file: PathBuf,

    /// Only load this top-level section
    #[clap(short = 's', long = "subset")]
    pub subset: Option<String>,

    /// Merge nested sections into their parent
    #[clap(short = 'l', long = "local")]
    pub local: bool,

    /// Fill in ${...} references
    #[clap(short = 'r', long = "reuse")]
    pub reuse: bool,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    /// Indented block document, as written by save
    #[default]
    Document,
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Document => f.write_str("document"),
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
