//! # Logger
//!
//! Installs the process-wide `tracing` subscriber of strata tools.
//!
//! Console lines go to stderr, so documents a tool prints on stdout stay parseable.
//! Rolling log files are optional and written by a background thread; both outputs can
//! switch to JSON lines. Filtering starts from a level, takes `RUST_LOG` into account and
//! accepts extra directives such as `strata_kernel=debug`.
//!
//! Tools usually start from a [`LogSettings`] section of their settings file:
//!
//! ```rust
//! use strata_logger::{LogSettings, Logger};
//!
//! let settings = LogSettings { level: "info".to_owned(), ..LogSettings::default() };
//! let _logger = Logger::from_settings("strata", &settings, 0).unwrap();
//! tracing::info!("ready");
//! ```

mod builder;
mod error;
mod layers;
mod settings;

pub use crate::builder::{FileOutput, LoggerBuilder, Named, Unnamed};
pub use crate::error::{LoggerError, LoggerErrorExt};
pub use crate::settings::LogSettings;
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use tracing_appender::non_blocking::WorkerGuard;

pub(crate) const DEFAULT_MAX_FILES: usize = 10;

/// Keeps the installed subscriber's file writer running.
///
/// Buffered file lines are flushed when this is dropped, so hold it until `main` returns.
#[must_use = "Dropping the logger stops its file writer."]
#[derive(Debug)]
pub struct Logger {
    file_writer: Option<WorkerGuard>,
}

impl Logger {
    /// Starts configuring the global subscriber.
    ///
    /// ```rust
    /// use strata_logger::{FileOutput, LevelFilter, Logger};
    ///
    /// # let dir = tempfile::tempdir().unwrap();
    /// let _logger = Logger::builder()
    ///     .name("strata")
    ///     .level(LevelFilter::DEBUG)
    ///     .files(FileOutput::new(dir.path()).max_files(3))
    ///     .init()
    ///     .unwrap();
    /// ```
    pub fn builder() -> LoggerBuilder<Unnamed> {
        LoggerBuilder::new()
    }

    /// Installs the global subscriber described by `settings`, raising its level one step
    /// per `verbose`.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an unknown level, malformed directives or
    /// no enabled output, and otherwise as [`LoggerBuilder::init`].
    pub fn from_settings(
        name: impl Into<String>,
        settings: &LogSettings,
        verbose: u8,
    ) -> Result<Self, LoggerError> {
        let mut builder = Self::builder()
            .name(name)
            .level(settings.level_with_verbosity(verbose)?)
            .console(settings.console)
            .json(settings.json);
        if let Some(directory) = &settings.directory {
            builder = builder.files(FileOutput::new(directory).max_files(settings.max_files));
        }
        if let Some(filter) = &settings.filter {
            builder = builder.directive(filter.clone());
        }
        builder.init()
    }

    /// Whether lines are also written to rolling files.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.file_writer.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.writes_files() {
            tracing::debug!("Flushing log files");
        }
    }
}
