use crate::error::LabError;
use crate::model::{ConcreteTest, Specimen};
use tracing::warn;

/// Persistence boundary for concrete tests.
///
/// Writes replace the whole specimen array of one test; there is no merge,
/// so the last writer wins.
pub trait TestStore: Send + Sync {
    /// Fetch every test visible to the caller, specimens embedded.
    fn load_all(&self) -> Result<Vec<ConcreteTest>, LabError>;

    /// Replace the stored specimens of `test_id`.
    fn replace_specimens(&self, test_id: &str, specimens: &[Specimen]) -> Result<(), LabError>;

    /// Replace the whole stored document of `test.id`.
    fn save_test(&self, test: &ConcreteTest) -> Result<(), LabError>;

    /// Name of this storage backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Load one test, apply a mutation optimistically and persist it.
pub fn update_test<T, F>(store: &dyn TestStore, test_id: &str, mutation: F) -> Result<T, LabError>
where
    F: FnOnce(&mut ConcreteTest) -> Result<T, LabError>,
{
    let tests = store.load_all()?;
    let mut test = find_test(&tests, test_id)?.clone();
    apply_optimistic(&mut test, store, mutation)
}

/// Find one test in a loaded corpus.
pub fn find_test<'a>(tests: &'a [ConcreteTest], id: &str) -> Result<&'a ConcreteTest, LabError> {
    tests
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| LabError::TestNotFound(id.to_string()))
}

/// Apply a mutation to the local copy, then persist it.
///
/// Only the specimens are written unless the sampling date moved, in which
/// case the whole document is saved. If the mutation or the write fails, the
/// local copy is restored to its state before the call and the error is
/// returned.
pub fn apply_optimistic<T, F>(
    test: &mut ConcreteTest,
    store: &dyn TestStore,
    mutation: F,
) -> Result<T, LabError>
where
    F: FnOnce(&mut ConcreteTest) -> Result<T, LabError>,
{
    let snapshot = test.specimens.clone();
    let snapshot_sampling_date = test.sampling_date;

    let result = match mutation(&mut *test) {
        Ok(value) => persist(test, store, test.sampling_date != snapshot_sampling_date)
            .map(|()| value),
        Err(e) => Err(e),
    };

    if let Err(ref e) = result {
        warn!(
            test = %test.id,
            backend = store.backend_name(),
            error = %e,
            "rolling back specimen changes"
        );
        test.specimens = snapshot;
        test.sampling_date = snapshot_sampling_date;
    }
    result
}

fn persist(test: &ConcreteTest, store: &dyn TestStore, whole_document: bool) -> Result<(), LabError> {
    if whole_document {
        store.save_test(test)
    } else {
        store.replace_specimens(&test.id, &test.specimens)
    }
}
