pub mod calc;
pub mod config;
pub mod dates;
pub mod editor;
pub mod error;
pub mod model;
pub mod pack;
pub mod parsing;
pub mod report;
pub mod schedule;
pub mod store;

use chrono::NaiveDate;
use config::EngineConfig;
use error::LabError;
use model::Specimen;
use pack::PackRequest;
use report::{ReportVariant, SpecimenReport};
use schedule::NotificationTask;
use store::TestStore;
use tracing::instrument;

/// Main API entry point for the task view: load the corpus and build the
/// prioritized work queue for `today`.
#[instrument(skip(store), fields(backend = store.backend_name()))]
pub fn scheduled_tasks(
    store: &dyn TestStore,
    today: NaiveDate,
) -> Result<Vec<NotificationTask>, LabError> {
    let tests = store.load_all()?;
    Ok(schedule::schedule_tasks(&tests, today))
}

/// Report view of one stored test.
pub fn test_report(
    store: &dyn TestStore,
    test_id: &str,
    variant: ReportVariant,
    config: &EngineConfig,
) -> Result<SpecimenReport, LabError> {
    let tests = store.load_all()?;
    let test = store::find_test(&tests, test_id)?;
    Ok(report::build_report(test, variant, config))
}

/// Append a pack to a stored test and persist it. Returns the new specimens.
pub fn add_pack(
    store: &dyn TestStore,
    test_id: &str,
    request: &PackRequest,
) -> Result<Vec<Specimen>, LabError> {
    store::update_test(store, test_id, |t| {
        let pack = pack::build_pack(&t.specimens, request)?;
        t.specimens.extend(pack.iter().cloned());
        Ok(pack)
    })
}
