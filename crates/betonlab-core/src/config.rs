use crate::error::LabError;
use crate::pack::SURFACE_DECIMALS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Oldest age (days) shown on a provisional report.
pub const DEFAULT_PROVISIONAL_MAX_AGE: u32 = 7;

/// Engine options that vary between laboratories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Specimens up to this age appear on provisional (PV) reports.
    pub provisional_max_age: u32,
    /// Decimal places used when printing surfaces. Defaults to the precision
    /// surfaces are stored with.
    pub surface_decimals: u32,
    /// Text shown in report cells with no measurement.
    pub placeholder: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provisional_max_age: DEFAULT_PROVISIONAL_MAX_AGE,
            surface_decimals: SURFACE_DECIMALS,
            placeholder: "-".to_string(),
        }
    }
}

/// Load engine options from a JSON file.
pub fn load_config(path: &Path) -> Result<EngineConfig, LabError> {
    let content = std::fs::read_to_string(path).map_err(|e| LabError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: EngineConfig =
        serde_json::from_str(&content).map_err(|e| LabError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse engine options from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<EngineConfig, LabError> {
    let config: EngineConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &EngineConfig) -> Result<(), LabError> {
    if config.surface_decimals > 6 {
        return Err(LabError::ConfigInvalid(format!(
            "surfaceDecimals must be at most 6, got {}",
            config.surface_decimals
        )));
    }
    if config.placeholder.trim().is_empty() {
        return Err(LabError::ConfigInvalid(
            "placeholder must not be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = parse_config_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.provisional_max_age, 7);
        assert_eq!(config.surface_decimals, SURFACE_DECIMALS);
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config_str(r#"{"provisionalMaxAge": 14}"#).unwrap();
        assert_eq!(config.provisional_max_age, 14);
        assert_eq!(config.placeholder, "-");
    }

    #[test]
    fn test_too_many_decimals_rejected() {
        assert!(matches!(
            parse_config_str(r#"{"surfaceDecimals": 9}"#),
            Err(LabError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_blank_placeholder_rejected() {
        assert!(parse_config_str(r#"{"placeholder": "  "}"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/betonlab.json")).unwrap_err();
        assert!(matches!(err, LabError::ConfigLoad { .. }));
    }
}
