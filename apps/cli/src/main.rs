#![allow(clippy::print_stdout)]

use anyhow::Context;
use clap::Parser;
use strata::kernel::config::load_config;
use strata::logger::Logger;
use strata_cli::handlers::{build, defaults, list};
use strata_cli::models::args::{AppCommands, Cli};
use strata_cli::{Catalog, CliSettings};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings: CliSettings =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    let _log = Logger::from_settings("strata", &settings.log, cli.verbose)?;

    let catalog = Catalog::demo().context("Failed to register the demo catalog")?;

    let output = match cli.command {
        AppCommands::List { format } => list::list(&catalog, format.unwrap_or(settings.output))?,
        AppCommands::Defaults { class, prune, format } => {
            defaults::defaults(&catalog, &class, prune, format.unwrap_or(settings.output))?
        },
        AppCommands::Build { class, file, set, format } => build::build(
            &catalog,
            &class,
            file.as_deref(),
            &set,
            format.unwrap_or(settings.output),
        )?,
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}
