use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use percentile_bars::algorithm::{reference_bands, ReferenceSpec};
use percentile_bars::config::Settings;
use percentile_bars::schemas::{DataBase, Entity, InequalityKind, RawDataset};
use percentile_bars::wrangling::{complete_dataset, dataset_from_csv};

#[derive(Parser, Debug)]
#[command(
    name = "percentile-bars",
    about = "Place inequality percentile bands on a cumulative axis for bar charts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a raw dataset on stdin, print the normalized database
    Normalize {
        #[arg(long = "kind")]
        kind: Option<InequalityKind>,
    },

    /// Read a raw dataset on stdin, print it with implied bands filled in
    Complete {},

    /// Read the tabular CSV export on stdin, print it as a raw dataset
    Wrangle {},

    /// Print the bands of a percent bar
    Reference { spec: Option<String> },

    /// Read a normalized database on stdin, print the chart rows of one year
    View {
        #[arg(long = "year")]
        year: String,

        entities: Vec<String>,
    },
}

fn read_stdin<T: serde::de::DeserializeOwned>() -> Result<T> {
    let mut buffer = String::new();

    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    serde_json::from_str(&buffer).context("Failed to parse JSON from stdin")
}

fn write_stdout<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();

    serde_json::to_writer_pretty(&mut stdout, value).context("Failed to write JSON")?;
    writeln!(stdout)?;
    Ok(())
}

fn main() -> Result<()> {
    // @NOTE: logging and configuration
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Commands::Normalize { kind } => {
            let raw = read_stdin::<RawDataset>()?;
            let db = DataBase::from_raw(kind, &raw, &settings);

            info!("Normalized {} years", db.years.len());
            write_stdout(&db)
        }

        Commands::Complete {} => write_stdout(&complete_dataset(&read_stdin::<RawDataset>()?)),

        Commands::Wrangle {} => write_stdout(&dataset_from_csv(io::stdin().lock())?),

        Commands::Reference { spec } => {
            let spec = spec.unwrap_or_else(|| settings.reference.clone());
            let spec = ReferenceSpec::parse(&spec)?;

            write_stdout(&reference_bands(&spec))
        }

        Commands::View { year, entities } => {
            let db = read_stdin::<DataBase>()?;
            let mut entities = entities
                .iter()
                .map(|name| Entity::parse(name))
                .collect::<Result<Vec<_>, _>>()?;

            // @NOTE: the first row is the percent bar every country is matched against
            if !entities.iter().any(Entity::is_reference) {
                entities.insert(0, Entity::parse(&settings.reference)?);
            }

            let rows = db.view(&year, &entities);

            info!(
                "{} of {} rows in {} have no data",
                rows.iter().filter(|row| row.bands.is_no_data()).count(),
                rows.len(),
                year
            );
            write_stdout(&rows)
        }
    }
}
