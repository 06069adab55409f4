use crate::error::LoggerError;
use crate::{DEFAULT_MAX_FILES, Logger, layers};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod sealed {
    pub trait NameState {}
}

/// Builder state until [`LoggerBuilder::name`] is called.
#[derive(Debug)]
pub struct Unnamed;

/// Builder state once the logger has a name, which prefixes its log files.
#[derive(Debug)]
pub struct Named(String);

impl sealed::NameState for Unnamed {}
impl sealed::NameState for Named {}

/// Rolling log files, written by a background thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutput {
    pub(crate) directory: PathBuf,
    pub(crate) rotation: Rotation,
    pub(crate) max_files: usize,
}

impl FileOutput {
    /// Daily files in `directory`, which is created when missing.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into(), rotation: Rotation::DAILY, max_files: DEFAULT_MAX_FILES }
    }

    #[must_use]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Older files beyond this count are deleted on rotation.
    #[must_use]
    pub const fn max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }
}

#[derive(Debug)]
struct Plan {
    level: LevelFilter,
    console: bool,
    json: bool,
    files: Option<FileOutput>,
    directives: Vec<String>,
}

/// Configures the global subscriber. Only a named builder can be initialized.
#[must_use = "A logger builder does nothing until `init` is called."]
#[derive(Debug)]
pub struct LoggerBuilder<N: sealed::NameState = Unnamed> {
    name: N,
    plan: Plan,
}

impl LoggerBuilder<Unnamed> {
    pub(crate) const fn new() -> Self {
        Self {
            name: Unnamed,
            plan: Plan {
                level: LevelFilter::WARN,
                console: true,
                json: false,
                files: None,
                directives: Vec::new(),
            },
        }
    }

    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named> {
        LoggerBuilder { name: Named(name.into()), plan: self.plan }
    }
}

impl<N: sealed::NameState> LoggerBuilder<N> {
    /// Level applied to every target without a more specific directive. Defaults to `WARN`.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.plan.level = level;
        self
    }

    /// Console output on stderr, enabled by default.
    pub const fn console(mut self, enabled: bool) -> Self {
        self.plan.console = enabled;
        self
    }

    /// JSON lines instead of text, for every output.
    pub const fn json(mut self, enabled: bool) -> Self {
        self.plan.json = enabled;
        self
    }

    pub fn files(mut self, files: FileOutput) -> Self {
        self.plan.files = Some(files);
        self
    }

    /// Adds an `EnvFilter` directive such as `strata_kernel=debug`. Once any directive is
    /// given, `RUST_LOG` is no longer read.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.plan.directives.push(directive.into());
        self
    }
}

impl LoggerBuilder<Named> {
    /// Installs the subscriber for the whole process.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for a blank name, no enabled output, zero
    /// retained files or malformed directives; [`LoggerError::Appender`] or
    /// [`LoggerError::Internal`] if the log directory is unusable;
    /// [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { name: Named(name), plan } = self;
        plan.validate(&name)?;

        let filter = layers::env_filter(plan.level, &plan.directives)?;
        let mut outputs = Vec::with_capacity(2);
        if plan.console {
            outputs.push(layers::console(plan.json));
        }
        let file_writer = match &plan.files {
            Some(files) => {
                let (layer, writer) = layers::rolling_file(&name, files, plan.json)?;
                outputs.push(layer);
                Some(writer)
            },
            None => None,
        };

        tracing_subscriber::registry().with(outputs).with(filter).try_init()?;
        Ok(Logger { file_writer })
    }
}

impl Plan {
    fn validate(&self, name: &str) -> Result<(), LoggerError> {
        let problem = if name.trim().is_empty() {
            Some("the logger name is blank")
        } else if !self.console && self.files.is_none() {
            Some("neither console nor file output is enabled")
        } else if self.files.as_ref().is_some_and(|files| files.max_files == 0) {
            Some("at least one log file must be kept")
        } else {
            None
        };

        match problem {
            Some(problem) => Err(LoggerError::InvalidConfiguration {
                message: problem.into(),
                context: Some(format!("Logger '{name}'").into()),
            }),
            None => Ok(()),
        }
    }
}
