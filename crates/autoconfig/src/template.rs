//! Starter documents from command-line argument definitions
//!
//! Every argument becomes a `name: default` line with its help text as an aligned comment,
//! followed by the allowed values, if any:
//!
//! ```yaml
//! learning_rate: 0.1  # step size
//! optimizer: adam     # which optimizer
//! # optimizer choices:
//!   # adam
//!   # sgd
//! ```
use std::path::{Path, PathBuf};

pub const TEMPLATE_FILE_NAME: &str = "config.yaml";

/// One command-line argument
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct ArgumentSpec {
    #[new(into)]
    pub name: String,
    #[new(default)]
    pub default: Option<String>,
    #[new(default)]
    pub help: Option<String>,
    #[new(default)]
    pub choices: Option<Vec<String>>,
}

impl ArgumentSpec {
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    fn entry(&self) -> String {
        format!("{}: {}", self.name, self.default.as_deref().unwrap_or("null"))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("Destination directory {} does not exist", .0.display())]
    DestinationNotFound(PathBuf),
    #[error("IO error")]
    IoError(#[from] std::io::Error),
}

/// Argument specs for every argument of `command`
///
/// Help and version flags are skipped. Choices are only listed for arguments taking a value.
pub fn specs_from_command(command: &clap::Command) -> Vec<ArgumentSpec> {
    use clap::ArgAction;

    // building fills in implied defaults such as `false` for flags
    let mut command = command.clone();
    command.build();

    command
        .get_arguments()
        .filter(|arg| {
            !matches!(
                arg.get_action(),
                ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version
            )
        })
        .map(|arg| {
            let defaults: Vec<String> = arg
                .get_default_values()
                .iter()
                .map(|value| value.to_string_lossy().into_owned())
                .collect();

            let choices: Vec<String> = if arg.get_action().takes_values() {
                arg.get_possible_values()
                    .iter()
                    .map(|value| value.get_name().to_string())
                    .collect()
            } else {
                vec![]
            };

            ArgumentSpec {
                name: arg.get_id().to_string(),
                default: match defaults.len() {
                    0 => None,
                    1 => defaults.into_iter().next(),
                    _ => Some(format!("[{}]", defaults.join(", "))),
                },
                help: arg.get_help().map(ToString::to_string),
                choices: (!choices.is_empty()).then_some(choices),
            }
        })
        .collect()
}

pub fn render_template(specs: &[ArgumentSpec]) -> String {
    let column = specs
        .iter()
        .map(|spec| spec.entry().len())
        .max()
        .unwrap_or_default()
        + 2;

    let mut out = String::new();
    for spec in specs {
        let entry = spec.entry();
        match &spec.help {
            Some(help) => out.push_str(&format!("{entry:<column$}# {help}\n")),
            None => out.push_str(&format!("{entry}\n")),
        }

        if let Some(choices) = &spec.choices {
            out.push_str(&format!("# {} choices:\n", spec.name));
            for choice in choices {
                out.push_str(&format!("  # {choice}\n"));
            }
        }
    }

    out
}

/// Write a starter document named [TEMPLATE_FILE_NAME] into `destination`
pub fn export_template(
    specs: &[ArgumentSpec],
    destination: impl AsRef<Path>,
) -> Result<PathBuf, ExportError> {
    export_template_as(specs, destination, TEMPLATE_FILE_NAME)
}

pub fn export_template_as(
    specs: &[ArgumentSpec],
    destination: impl AsRef<Path>,
    file_name: &str,
) -> Result<PathBuf, ExportError> {
    let destination = destination.as_ref();
    if !destination.is_dir() {
        return Err(ExportError::DestinationNotFound(destination.to_path_buf()));
    }

    let path = destination.join(file_name);
    std::fs::write(&path, render_template(specs))?;
    tracing::info!(path=%path.display(), "template written");

    Ok(path)
}
