use crate::builder::FileOutput;
use crate::error::{LoggerError, LoggerErrorExt};
use std::{fs, io};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub(crate) type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

const LOG_FILE_SUFFIX: &str = "log";

pub(crate) fn console(json: bool) -> BoxedLayer {
    let layer = fmt::layer().with_writer(io::stderr).with_target(false);
    if json { layer.json().boxed() } else { layer.compact().boxed() }
}

/// A file layer plus the guard of its background writer.
pub(crate) fn rolling_file(
    name: &str,
    files: &FileOutput,
    json: bool,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    let directory = &files.directory;
    fs::create_dir_all(directory).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Creating log directory {}", directory.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(files.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(files.max_files)
        .build(directory)
        .context(format!("Log directory {}", directory.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = if json { layer.json().boxed() } else { layer.boxed() };
    Ok((layer, guard))
}

/// `level` for every target, refined by `directives`, or by `RUST_LOG` when there are none.
pub(crate) fn env_filter(level: LevelFilter, directives: &[String]) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(level.into());
    if directives.is_empty() {
        return Ok(builder.from_env_lossy());
    }

    let joined = directives.join(",");
    builder.parse(&joined).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("'{joined}': {e}").into(),
        context: Some("Parsing filter directives".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_refine_the_default_level() {
        let filter = env_filter(LevelFilter::WARN, &["strata_kernel=debug".to_owned()]).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("strata_kernel=debug"));
        assert!(rendered.contains("warn"));
    }

    #[test]
    fn rolling_files_create_their_directory() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileOutput::new(dir.path().join("nested/logs"));
        let (_layer, _guard) = rolling_file("strata-test", &files, false).unwrap();
        assert!(files.directory.is_dir());
    }
}
