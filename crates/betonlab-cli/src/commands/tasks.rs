use betonlab_core::error::LabError;
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::output;
use crate::store::JsonFileStore;

pub fn run(corpus: PathBuf, today: Option<NaiveDate>, output_format: &str) -> Result<(), LabError> {
    let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let store = JsonFileStore::new(corpus);
    let tasks = betonlab_core::scheduled_tasks(&store, today)?;

    match output_format {
        "json" => output::json::print(&tasks)?,
        _ => output::table::print_tasks(&tasks, today),
    }
    Ok(())
}
