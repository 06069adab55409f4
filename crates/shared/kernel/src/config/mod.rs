use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Base name of the settings file looked up when no path is given.
pub const DEFAULT_SETTINGS: &str = "strata";

/// Prefix of environment overrides, e.g. `STRATA__LOG__LEVEL`.
pub const ENV_PREFIX: &str = "STRATA";

#[strata_derive::strata_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads settings from an optional file overlaid with environment overrides.
///
/// 1. **File**: `path` if given, which must then exist. Otherwise a `strata.*` file in the
///    working directory is used when present (any format the `config` crate reads).
/// 2. **Environment**: variables prefixed with `STRATA__`, nested with `__`
///    (`STRATA__LOG__LEVEL` maps to `log.level`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing or malformed, or the
/// merged values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use strata_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     #[serde(default)]
///     output: Option<String>,
/// }
///
/// let settings: Settings = load_config(None::<&str>).unwrap_or_default();
/// # let _ = settings.output;
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_SETTINGS), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading settings");

    let settings = builder
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<T>()
        .context("Failed to deserialize settings")?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Settings {
        output: String,
        #[serde(default)]
        depth: u32,
    }

    #[test]
    fn reads_an_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "output = \"json\"\ndepth = 2").unwrap();

        let settings: Settings = load_config(Some(file.path())).unwrap();
        assert_eq!(settings, Settings { output: "json".into(), depth: 2 });
    }

    #[test]
    fn an_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config::<Settings>(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to build settings"));
    }
}
