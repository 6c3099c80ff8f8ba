use betonlab_core::config::{self, EngineConfig};
use betonlab_core::error::LabError;
use betonlab_core::report::ReportVariant;
use std::path::PathBuf;

use crate::output;
use crate::store::JsonFileStore;

pub fn run(
    corpus: PathBuf,
    test_id: &str,
    variant: &str,
    config_file: Option<PathBuf>,
    output_format: &str,
) -> Result<(), LabError> {
    let variant: ReportVariant = variant.parse()?;
    let config = match config_file {
        Some(path) => config::load_config(&path)?,
        None => EngineConfig::default(),
    };

    let store = JsonFileStore::new(corpus);
    let report = betonlab_core::test_report(&store, test_id, variant, &config)?;

    match output_format {
        "json" => output::json::print(&report)?,
        _ => output::table::print_report(&report, &config),
    }
    Ok(())
}
