use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tip_data::CountryLoader;

/// Validate a country table CSV and print its contents.
///
/// The CSV file should have the following columns:
/// - name: The country name (unique)
/// - tip_percentage: The customary tip as a percentage (e.g., 12.5)
/// - time_zone: The IANA time zone used to auto-select it (e.g., Europe/Paris)
///
/// Without `--file` the bundled table is checked.
#[derive(Parser, Debug)]
#[command(name = "country-table")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing country data
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Only list countries whose name contains this text
    #[arg(short, long)]
    search: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let table = match &args.file {
        Some(path) => CountryLoader::load_from_path(path)
            .with_context(|| format!("Failed to load countries from: {}", path.display()))?,
        None => CountryLoader::bundled().context("Bundled country table is invalid")?,
    };

    let matches = table.search(args.search.as_deref().unwrap_or(""));
    for country in &matches {
        println!(
            "{:<24} {:>6}%  {}",
            country.name, country.tip_percentage, country.time_zone
        );
    }
    println!("{} of {} countries", matches.len(), table.len());

    Ok(())
}
