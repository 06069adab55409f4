//! # CLI Argument Definitions
//!
//! Command-line structure of the `strata` binary, declared with `clap`'s derive API.

use crate::settings::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use strata::tree::Value;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "strata")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Extract, prune and construct configurations of the demo renderer catalog")]
pub struct Cli {
    /// Settings file; `./strata.*` is used when present
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Raise the log level one step per occurrence (-v, -vv, ...)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: AppCommands,
}

/// Enumeration of available subcommands.
#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// List replaceable namespaces with their implementations, and every catalog entry
    List {
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Print the default argument tree of a class or callable
    Defaults {
        /// Catalog entry, e.g. `GenericModel` or `RayNormalColoringNetwork`
        class: String,
        /// Drop the argument subtrees of unselected implementations
        #[arg(long)]
        prune: bool,
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Construct a class from its defaults, a tree file and overrides, then print the result
    Build {
        /// Catalog class, e.g. `MeshRenderer`
        class: String,
        /// YAML (or `.json`) tree merged over the defaults
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
        /// Dotted-path override with a YAML value, e.g. `renderer_class_type=LSTMRenderer`
        #[arg(short, long, value_name = "KEY=VALUE", value_parser = parse_override)]
        set: Vec<(String, Value)>,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// Splits `key=value` at the first `=` and parses the value as YAML.
///
/// # Errors
/// Returns a message if there is no `=`, the key is empty, or the value is not YAML.
pub fn parse_override(text: &str) -> Result<(String, Value), String> {
    let (key, value) =
        text.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got '{text}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{text}'"));
    }
    let value = Value::parse(value.trim()).map_err(|e| e.to_string())?;
    Ok((key.to_owned(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_parse_yaml_values() {
        assert_eq!(
            parse_override("renderer_LSTMRenderer_args.hidden_size=32").unwrap(),
            ("renderer_LSTMRenderer_args.hidden_size".to_owned(), Value::Int(32))
        );
        assert_eq!(parse_override("bg_color=[0.5, 0.5]").unwrap().1, Value::from(vec![0.5, 0.5]));
        assert_eq!(parse_override("mode=idr").unwrap().1, Value::from("idr"));
        assert_eq!(parse_override("expr=a=b").unwrap().1, Value::from("a=b"));
    }

    #[test]
    fn overrides_need_a_key() {
        assert!(parse_override("hidden_size").is_err());
        assert!(parse_override("=3").is_err());
    }

    #[test]
    fn verbosity_and_subcommand_arguments() {
        let cli = Cli::try_parse_from([
            "strata", "-vv", "build", "MeshRenderer", "--set", "shader_class_type=HardFlatShader",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            AppCommands::Build { class, set, file, .. } => {
                assert_eq!(class, "MeshRenderer");
                assert!(file.is_none());
                assert_eq!(set, [("shader_class_type".to_owned(), Value::from("HardFlatShader"))]);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }
}
