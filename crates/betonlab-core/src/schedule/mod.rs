pub mod classifier;
pub mod consolidate;
pub mod task;

pub use classifier::{classify_pending, classify_specimen};
pub use consolidate::consolidate;
pub use task::{ClassifiedSpecimen, NotificationTask, UrgencyClass};

use crate::model::ConcreteTest;
use chrono::NaiveDate;
use tracing::{info, instrument};

/// Build the operator's work queue from the whole corpus.
///
/// Reads a snapshot only; safe to call on every load of the task view.
#[instrument(skip(tests), fields(tests = tests.len()))]
pub fn schedule_tasks(tests: &[ConcreteTest], today: NaiveDate) -> Vec<NotificationTask> {
    let pending = classify_pending(tests, today);
    let tasks = consolidate(&pending);
    info!(
        pending = pending.len(),
        tasks = tasks.len(),
        "scheduling pass complete"
    );
    tasks
}
