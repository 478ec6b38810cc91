//! `causeway`: inspect a declarative domain model.
//!
//! # Usage
//!
//! ```
//! causeway validate --model model.json
//! causeway layout --model model.json demo.Customer --prefix compact
//! causeway xsd
//! ```

use std::{path::PathBuf, process::ExitCode};

use causeway_cli::{
  CliConfig, build_metamodel, load_model, render_layout, render_xsd,
};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Causeway metamodel tools")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "causeway.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Build the metamodel and print its validation report.
  Validate {
    /// JSON array of type descriptors.
    #[arg(long)]
    model: PathBuf,
  },
  /// Print the normalised layout of one type.
  Layout {
    #[arg(long)]
    model:        PathBuf,
    logical_type: String,
    /// Alternative layout to load, e.g. `compact`.
    #[arg(long)]
    prefix:       Option<String>,
  },
  /// Print the grid schemas.
  Xsd,
}

fn main() -> anyhow::Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let config = CliConfig::load(&cli.config)?;

  match cli.command {
    Command::Validate { model } => {
      let loader = build_metamodel(&load_model(&model)?, &config);
      println!("{}", loader.validation_report());
      if !loader.is_valid() {
        return Ok(ExitCode::FAILURE);
      }
    }
    Command::Layout {
      model,
      logical_type,
      prefix,
    } => {
      let loader = build_metamodel(&load_model(&model)?, &config);
      println!(
        "{}",
        render_layout(&loader, &logical_type, prefix.as_deref())?
      );
    }
    Command::Xsd => print!("{}", render_xsd(config.schemas)),
  }
  Ok(ExitCode::SUCCESS)
}
