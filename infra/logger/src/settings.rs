use crate::error::LoggerError;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Logging section of a settings file.
///
/// ```toml
/// [log]
/// level = "debug"
/// directory = "logs"
/// json = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    pub console: bool,
    /// Write JSON lines instead of the compact text format.
    pub json: bool,
    /// Enables rolling daily log files in this directory.
    pub directory: Option<PathBuf>,
    pub max_files: usize,
    /// Extra `EnvFilter` directives, e.g. `strata_kernel=debug`.
    pub filter: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            console: true,
            json: false,
            directory: None,
            max_files: crate::DEFAULT_MAX_FILES,
            filter: None,
        }
    }
}

impl LogSettings {
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] if `level` is not a level name.
    pub fn level_filter(&self) -> Result<LevelFilter, LoggerError> {
        LevelFilter::from_str(self.level.trim()).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid level '{}': {e}", self.level).into(),
            context: None,
        })
    }

    /// Raises the configured level by one step per `verbose`, up to `trace`.
    ///
    /// # Errors
    /// As [`LogSettings::level_filter`].
    pub fn level_with_verbosity(&self, verbose: u8) -> Result<LevelFilter, LoggerError> {
        const LADDER: [LevelFilter; 6] = [
            LevelFilter::OFF,
            LevelFilter::ERROR,
            LevelFilter::WARN,
            LevelFilter::INFO,
            LevelFilter::DEBUG,
            LevelFilter::TRACE,
        ];
        let base = self.level_filter()?;
        let index = LADDER.iter().position(|level| *level == base).unwrap_or(2);
        Ok(LADDER[(index + usize::from(verbose)).min(LADDER.len() - 1)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_quiet_console_logging() {
        let settings = LogSettings::default();
        assert!(settings.console);
        assert_eq!(settings.level_filter().unwrap(), LevelFilter::WARN);
        assert!(settings.directory.is_none());
    }

    #[test]
    fn deserializes_partial_sections() {
        let settings: LogSettings =
            serde_json::from_str(r#"{ "level": "debug", "directory": "logs" }"#).unwrap();
        assert_eq!(settings.level_filter().unwrap(), LevelFilter::DEBUG);
        assert_eq!(settings.directory, Some(PathBuf::from("logs")));
        assert_eq!(settings.max_files, crate::DEFAULT_MAX_FILES);
    }

    #[test]
    fn verbosity_climbs_the_ladder() {
        let settings = LogSettings::default();
        assert_eq!(settings.level_with_verbosity(0).unwrap(), LevelFilter::WARN);
        assert_eq!(settings.level_with_verbosity(2).unwrap(), LevelFilter::DEBUG);
        assert_eq!(settings.level_with_verbosity(9).unwrap(), LevelFilter::TRACE);
    }

    #[test]
    fn rejects_unknown_levels() {
        let settings = LogSettings { level: "loud".to_owned(), ..LogSettings::default() };
        let err = settings.level_filter().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
