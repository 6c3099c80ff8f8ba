use crate::calc::ConsistencyClass;
use crate::config::EngineConfig;
use crate::error::LabError;
use crate::model::{ConcreteTest, Specimen, SpecimenShape};
use crate::parsing::lenient;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const STRESS_DECIMALS: u32 = 2;
const DENSITY_DECIMALS: u32 = 0;

/// PV (provisional, early ages) or RP (final, full history).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportVariant {
    Provisional,
    Final,
}

impl ReportVariant {
    pub fn includes(&self, specimen: &Specimen, provisional_max_age: u32) -> bool {
        match self {
            ReportVariant::Provisional => specimen
                .age
                .is_some_and(|age| age <= provisional_max_age),
            ReportVariant::Final => true,
        }
    }
}

impl fmt::Display for ReportVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportVariant::Provisional => write!(f, "provisional"),
            ReportVariant::Final => write!(f, "final"),
        }
    }
}

impl FromStr for ReportVariant {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "provisional" | "pv" => Ok(ReportVariant::Provisional),
            "final" | "rp" => Ok(ReportVariant::Final),
            _ => Err(LabError::UnknownVariant(s.to_string())),
        }
    }
}

/// One specimen line, formatted for a report template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crushing_date: Option<NaiveDate>,
    pub specimen_type: SpecimenShape,
    pub dimensions: String,
    pub surface: String,
    pub weight: String,
    pub force: String,
    pub stress: String,
    pub density: String,
    pub tested: bool,
}

/// Results of all selected specimens of one age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeSummary {
    pub age: u32,
    pub specimens: usize,
    pub measured: usize,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mean_stress: Option<Decimal>,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mean_density: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenReport {
    pub variant: ReportVariant,
    pub test_id: String,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency_class: Option<ConsistencyClass>,
    pub rows: Vec<ReportRow>,
    pub summaries: Vec<AgeSummary>,
}

/// Pick the specimens a report variant shows, ascending by number.
///
/// Specimens without results stay in the list so gaps are visible.
pub fn select_specimens(
    specimens: &[Specimen],
    variant: ReportVariant,
    provisional_max_age: u32,
) -> Vec<&Specimen> {
    let mut selected: Vec<&Specimen> = specimens
        .iter()
        .filter(|s| variant.includes(s, provisional_max_age))
        .collect();
    selected.sort_by_key(|s| s.number);
    selected
}

/// Materialize the report view of one test.
pub fn build_report(
    test: &ConcreteTest,
    variant: ReportVariant,
    config: &EngineConfig,
) -> SpecimenReport {
    let selected = select_specimens(&test.specimens, variant, config.provisional_max_age);

    let rows = selected.iter().map(|s| format_row(s, config)).collect();

    SpecimenReport {
        variant,
        test_id: test.id.clone(),
        reference: test.display_reference().to_string(),
        project_name: test.project_name.clone(),
        structure: test.structure.clone(),
        element: test.element.clone(),
        sampling_date: test.sampling_date,
        strength_class: test.strength_class.clone(),
        consistency_class: test.consistency_class(),
        rows,
        summaries: summarize_by_age(&selected),
    }
}

/// Format a measurement cell with a fixed number of decimals, or the
/// configured placeholder when there is no value.
pub fn format_decimal(value: Option<Decimal>, decimals: u32, config: &EngineConfig) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals as usize, v.round_dp(decimals)),
        None => config.placeholder.clone(),
    }
}

/// Format one specimen the way report rows show it.
pub fn format_row(specimen: &Specimen, config: &EngineConfig) -> ReportRow {
    let cell = |value: Option<Decimal>, decimals: u32| format_decimal(value, decimals, config);

    let dimensions = match (specimen.diameter, specimen.height) {
        (Some(d), Some(h)) => match specimen.specimen_type {
            SpecimenShape::Cylindrical => format!("Ø{d}x{h}"),
            SpecimenShape::Cubic | SpecimenShape::Unknown => format!("{d}x{h}"),
        },
        _ => config.placeholder.clone(),
    };

    ReportRow {
        number: specimen.number,
        age: specimen.age,
        crushing_date: specimen.crushing_date,
        specimen_type: specimen.specimen_type,
        dimensions,
        surface: cell(specimen.surface, config.surface_decimals),
        weight: cell(specimen.weight, 0),
        force: cell(specimen.force, 1),
        stress: cell(specimen.stress, STRESS_DECIMALS),
        density: cell(specimen.density, DENSITY_DECIMALS),
        tested: specimen.is_tested(),
    }
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len()))
}

fn summarize_by_age(selected: &[&Specimen]) -> Vec<AgeSummary> {
    let mut by_age: BTreeMap<u32, Vec<&Specimen>> = BTreeMap::new();
    for s in selected {
        if let Some(age) = s.age {
            by_age.entry(age).or_default().push(*s);
        }
    }

    by_age
        .into_iter()
        .map(|(age, group)| {
            let stresses: Vec<Decimal> = group.iter().filter_map(|s| s.stress).collect();
            let densities: Vec<Decimal> = group.iter().filter_map(|s| s.density).collect();
            AgeSummary {
                age,
                specimens: group.len(),
                measured: stresses.len(),
                mean_stress: mean(&stresses).map(|m| m.round_dp(STRESS_DECIMALS)),
                mean_density: mean(&densities).map(|m| m.round_dp(DENSITY_DECIMALS)),
            }
        })
        .collect()
}
