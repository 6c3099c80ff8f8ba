use betonlab_core::error::LabError;
use betonlab_core::model::{ConcreteTest, Specimen};
use betonlab_core::store::TestStore;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A corpus kept as one JSON array of tests on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, tests: &[ConcreteTest]) -> Result<(), LabError> {
        let json = serde_json::to_string_pretty(tests)?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), tests = tests.len(), "corpus written");
        Ok(())
    }

    fn persistence_error(&self, test_id: &str, e: LabError) -> LabError {
        LabError::Persistence {
            test_id: test_id.to_string(),
            reason: format!("{}: {e}", self.path.display()),
        }
    }
}

impl TestStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<ConcreteTest>, LabError> {
        let bytes = std::fs::read(&self.path)?;
        let tests: Vec<ConcreteTest> = serde_json::from_slice(&bytes)?;
        Ok(tests)
    }

    fn replace_specimens(&self, test_id: &str, specimens: &[Specimen]) -> Result<(), LabError> {
        let mut tests = self.load_all()?;
        let test = tests
            .iter_mut()
            .find(|t| t.id == test_id)
            .ok_or_else(|| LabError::TestNotFound(test_id.to_string()))?;
        test.specimens = specimens.to_vec();
        self.write_all(&tests)
            .map_err(|e| self.persistence_error(test_id, e))
    }

    fn save_test(&self, test: &ConcreteTest) -> Result<(), LabError> {
        let mut tests = self.load_all()?;
        match tests.iter_mut().find(|t| t.id == test.id) {
            Some(existing) => *existing = test.clone(),
            None => tests.push(test.clone()),
        }
        self.write_all(&tests)
            .map_err(|e| self.persistence_error(&test.id, e))
    }

    fn backend_name(&self) -> &str {
        "json-file"
    }
}
