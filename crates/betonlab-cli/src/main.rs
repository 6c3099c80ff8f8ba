mod commands;
mod logging;
mod output;
mod store;

use betonlab_core::editor::QuickEntry;
use betonlab_core::parsing::parse_measurement;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "betonlab",
    version,
    about = "Concrete specimen tracking: packs, results, crushing schedule and PV/RP reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show specimens overdue, due today or due tomorrow
    Tasks {
        /// JSON file holding the array of tests
        corpus: PathBuf,

        /// Reference day (YYYY-MM-DD), defaults to the local date
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Build the PV (provisional) or RP (final) report view of one test
    Report {
        corpus: PathBuf,
        test_id: String,

        /// provisional|pv or final|rp
        #[arg(short, long, default_value = "final")]
        variant: String,

        /// JSON engine options file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Cast a new pack of specimens on a test
    Pack {
        corpus: PathBuf,
        test_id: String,

        /// Target age in days
        #[arg(long)]
        age: u32,

        /// Number of specimens
        #[arg(long, allow_negative_numbers = true)]
        count: i64,

        /// Dimension preset (see `betonlab presets`)
        #[arg(long)]
        preset: String,
    },
    /// Record a weight and/or force reading ("-" clears it)
    Edit {
        corpus: PathBuf,
        test_id: String,
        number: u32,

        /// Mass in g
        #[arg(long, allow_hyphen_values = true)]
        weight: Option<String>,

        /// Failure load in kN
        #[arg(long, allow_hyphen_values = true)]
        force: Option<String>,
    },
    /// Enter results for the specimens crushed on one day
    QuickEntry {
        corpus: PathBuf,
        test_id: String,

        /// Crushing day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,

        /// NUMBER:WEIGHT:FORCE, empty fields leave the reading unset
        #[arg(long = "entry", value_parser = parse_entry, required = true)]
        entries: Vec<QuickEntry>,
    },
    /// Remove a specimen and renumber the rest
    Remove {
        corpus: PathBuf,
        test_id: String,
        number: u32,
    },
    /// Move the sampling date and reschedule every specimen
    Resample {
        corpus: PathBuf,
        test_id: String,

        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Consistency class of a slump measurement in mm
    Slump { value: String },
    /// List dimension presets
    Presets,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    betonlab_core::dates::parse_day(s).ok_or_else(|| format!("invalid date '{s}'"))
}

fn parse_entry(s: &str) -> Result<QuickEntry, String> {
    let mut parts = s.splitn(3, ':');
    let number = parts
        .next()
        .and_then(|n| n.trim().parse::<u32>().ok())
        .ok_or_else(|| format!("invalid entry '{s}': expected NUMBER:WEIGHT:FORCE"))?;
    Ok(QuickEntry {
        number,
        weight: parts.next().and_then(parse_measurement),
        force: parts.next().and_then(parse_measurement),
    })
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tasks {
            corpus,
            today,
            output,
        } => commands::tasks::run(corpus, today, &output),
        Commands::Report {
            corpus,
            test_id,
            variant,
            config,
            output,
        } => commands::report::run(corpus, &test_id, &variant, config, &output),
        Commands::Pack {
            corpus,
            test_id,
            age,
            count,
            preset,
        } => commands::specimens::pack(corpus, &test_id, age, count, &preset),
        Commands::Edit {
            corpus,
            test_id,
            number,
            weight,
            force,
        } => commands::specimens::edit(corpus, &test_id, number, weight, force),
        Commands::QuickEntry {
            corpus,
            test_id,
            date,
            entries,
        } => commands::specimens::quick_entry(corpus, &test_id, date, &entries),
        Commands::Remove {
            corpus,
            test_id,
            number,
        } => commands::specimens::remove(corpus, &test_id, number),
        Commands::Resample {
            corpus,
            test_id,
            date,
        } => commands::specimens::resample(corpus, &test_id, date),
        Commands::Slump { value } => commands::reference::slump(&value),
        Commands::Presets => commands::reference::presets(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
