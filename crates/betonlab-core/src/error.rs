use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LabError {
    #[error("invalid pack request: {0}")]
    InvalidPackRequest(String),

    #[error("unknown dimension preset '{0}'. Available: cyl-160x320, cyl-110x220, cube-150, cube-100, cube:<side>, cylinder:<d>x<h>")]
    UnknownPreset(String),

    #[error("specimen #{number} not found in test '{test_id}'")]
    SpecimenNotFound { test_id: String, number: u32 },

    #[error("specimen #{number} is not scheduled for crushing on {date}")]
    SpecimenNotDue { number: u32, date: NaiveDate },

    #[error("unknown report variant '{0}' (expected provisional/pv or final/rp)")]
    UnknownVariant(String),

    #[error("test '{0}' not found")]
    TestNotFound(String),

    #[error("failed to persist specimens of test '{test_id}': {reason}")]
    Persistence { test_id: String, reason: String },

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
