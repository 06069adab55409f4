use serde::Deserialize;
use strata::logger::LogSettings;
use strata::tree::{ConfigTree, TreeError};

/// Settings of the `strata` binary, read from `strata.*` or `--config` and overridden by
/// `STRATA__*` variables (`STRATA__OUTPUT=json`, `STRATA__LOG__LEVEL=debug`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    pub log: LogSettings,
    /// Format used when a subcommand is not given `--format`.
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// # Errors
    /// Returns [`TreeError`] if the tree holds a value the format cannot represent.
    pub fn render(self, tree: &ConfigTree) -> Result<String, TreeError> {
        match self {
            Self::Yaml => tree.to_yaml(),
            Self::Json => tree.to_json(),
        }
    }
}
