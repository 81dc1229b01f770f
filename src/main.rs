//! fs-inventory - Dynamic inventory from host definition files
//!
//! This is the main entry point for the fs-inventory CLI. It prints inventory
//! data on stdout; logging goes to stderr.

mod cli;

use anyhow::Result;
use cli::{Cli, Mode, OutputFormat};
use fs_inventory::diagnostics::TracingSink;
use fs_inventory::inventory::GroupTree;
use fs_inventory::{InventoryError, InventoryGenerator};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            e.downcast_ref::<InventoryError>()
                .map_or(1, InventoryError::exit_code)
        }
    };

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 3),
        )
        .with(env_filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let generator = InventoryGenerator::from_config(&config, Arc::new(TracingSink))?;
    let output = generator.generate(&cli.generate_options())?;

    match cli.mode() {
        Mode::List => print_data(&output, cli),
        Mode::Host(name) => {
            let record = output
                .host_vars(&name)
                .ok_or_else(|| InventoryError::HostNotFound(name.clone()))?;
            print_data(record, cli)
        }
        Mode::Graph => {
            let tree = GroupTree::from_output(&output, &config.root_group);
            print!("{}", tree.render_graph(&config.root_group));
            Ok(())
        }
    }
}

fn print_data<T: Serialize>(data: &T, cli: &Cli) -> Result<()> {
    let rendered = match cli.output {
        OutputFormat::Json if cli.pretty => serde_json::to_string_pretty(data)?,
        OutputFormat::Json => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
