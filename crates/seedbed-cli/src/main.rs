//! seedbed CLI
//!
//! Loads fixture documents into a database.
//!
//! ## Usage
//!
//! ```bash
//! seedbed loaddata --database-url postgres://localhost/app fixtures/users.yaml fixtures/posts.yaml
//! seedbed loaddata --database-url sqlite://app.db --no-dump-sql -v fixtures/*.json
//! seedbed loaddata --database-url mysql://root@localhost/app --config seedbed.toml fixtures/seed.yml
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use seedbed_backends::DatabaseError;
use seedbed_fixtures::commands::{LoadDataArgs, LoadDataCommand, LoadDataOptions};
use seedbed_fixtures::fixtures::{Driver, LoadOptions};
use seedbed_fixtures::FixtureError;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seedbed")]
#[command(about = "Declarative SQL fixture loader", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Verbosity level (can be repeated)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Install the named fixture file(s) in the database as one transaction
	Loaddata {
		/// Fixture files, loaded in the order given
		#[arg(value_name = "FIXTURE", required = true)]
		fixtures: Vec<PathBuf>,

		/// Database URL (postgres://, mysql://, sqlite:)
		#[arg(long, env = "DATABASE_URL", value_name = "URL")]
		database_url: String,

		/// Statement dialect: generic, postgres or mysql (defaults to the URL's engine)
		#[arg(long, value_name = "DRIVER")]
		driver: Option<Driver>,

		/// TOML file with a [fixtures] table of loader options
		#[arg(long, value_name = "PATH")]
		config: Option<PathBuf>,

		/// Do not log statements before running them
		#[arg(long)]
		no_dump_sql: bool,

		/// Also write ON_UPDATE_NOW() columns on INSERT
		#[arg(long)]
		set_updated_at_on_insert: bool,
	},
}

#[derive(Debug, Error)]
enum CliError {
	#[error(transparent)]
	Database(#[from] DatabaseError),

	#[error(transparent)]
	Fixture(#[from] FixtureError),
}

/// Loader options from the optional config file, overridden by flags.
fn resolve_options(
	config: Option<&PathBuf>,
	driver: Option<Driver>,
	no_dump_sql: bool,
	set_updated_at_on_insert: bool,
) -> Result<LoadOptions, FixtureError> {
	let mut options = match config {
		Some(path) => LoadOptions::from_toml_file(path)?,
		None => LoadOptions::default(),
	};
	if let Some(driver) = driver {
		options.driver = Some(driver);
	}
	if no_dump_sql {
		options.dump_sql = false;
	}
	if set_updated_at_on_insert {
		options.set_updated_at_on_insert = true;
	}
	Ok(options)
}

fn init_tracing(verbosity: u8) {
	let fallback = match verbosity {
		0 => "warn,seedbed::sql=info",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init();
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbosity);

	let result = match cli.command {
		Commands::Loaddata {
			fixtures,
			database_url,
			driver,
			config,
			no_dump_sql,
			set_updated_at_on_insert,
		} => {
			run_loaddata(
				fixtures,
				&database_url,
				resolve_options(
					config.as_ref(),
					driver,
					no_dump_sql,
					set_updated_at_on_insert,
				),
				cli.verbosity,
			)
			.await
		}
	};

	if let Err(e) = result {
		eprintln!("Error: {}", e);
		process::exit(1);
	}
}

async fn run_loaddata(
	fixtures: Vec<PathBuf>,
	database_url: &str,
	options: Result<LoadOptions, FixtureError>,
	verbosity: u8,
) -> Result<(), CliError> {
	let load_options = options?;
	let backend = seedbed_backends::connect(database_url).await?;
	tracing::debug!(database = %backend.database_type(), "connected");

	let command = LoadDataCommand::new();
	let args = LoadDataArgs {
		fixture_paths: fixtures,
	};
	let options = LoadDataOptions::new()
		.with_load_options(load_options)
		.with_verbosity(verbosity.max(1));
	command.execute(backend.as_ref(), args, options).await?;
	Ok(())
}
