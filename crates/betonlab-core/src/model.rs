use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::calc::{self, ConsistencyClass};
use crate::dates;
use crate::parsing::{lenient, lenient_u32};

/// Geometry family of a specimen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecimenShape {
    Cubic,
    #[default]
    Cylindrical,
    /// Stored label that names neither family. No surface can be derived.
    Unknown,
}

impl SpecimenShape {
    /// Read a stored type label such as `cubic`, `cube 15x15` or `Cylindre`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label.starts_with("cub") {
            SpecimenShape::Cubic
        } else if label.starts_with("cyl") {
            SpecimenShape::Cylindrical
        } else {
            SpecimenShape::Unknown
        }
    }
}

impl<'de> Deserialize<'de> for SpecimenShape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            None => SpecimenShape::default(),
            Some(Value::String(label)) => SpecimenShape::from_label(&label),
            Some(_) => SpecimenShape::Unknown,
        })
    }
}

impl fmt::Display for SpecimenShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecimenShape::Cubic => write!(f, "cubic"),
            SpecimenShape::Cylindrical => write!(f, "cylindrical"),
            SpecimenShape::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single cast test piece.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specimen {
    /// 1-based position within the parent test.
    #[serde(default, deserialize_with = "lenient_u32::deserialize_or_default")]
    pub number: u32,
    /// Days from casting to scheduled crushing. A specimen without a usable
    /// age cannot be scheduled.
    #[serde(default, with = "lenient_u32", skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, with = "dates::day", skip_serializing_if = "Option::is_none")]
    pub casting_date: Option<NaiveDate>,
    #[serde(default, with = "dates::day", skip_serializing_if = "Option::is_none")]
    pub crushing_date: Option<NaiveDate>,
    #[serde(default)]
    pub specimen_type: SpecimenShape,
    /// Diameter for cylinders, side length for cubes (mm).
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub diameter: Option<Decimal>,
    /// mm
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub height: Option<Decimal>,
    /// Cross-section in mm², derived from the geometry.
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub surface: Option<Decimal>,
    /// Measured mass in g.
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
    /// Measured failure load in kN.
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub force: Option<Decimal>,
    /// Compressive strength in MPa, present iff force > 0.
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub stress: Option<Decimal>,
    /// kg/m³, present iff weight > 0.
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub density: Option<Decimal>,
}

impl Specimen {
    /// A specimen counts as tested once a stress value exists, zero included.
    pub fn is_tested(&self) -> bool {
        self.stress.is_some()
    }

    /// Re-derive casting and crushing dates from a sampling date, keeping the age.
    ///
    /// The crushing date is left empty when the age is missing or the date
    /// would fall outside the calendar.
    pub fn reschedule(&mut self, sampling_date: Option<NaiveDate>) {
        self.casting_date = sampling_date;
        self.crushing_date = crushing_date_for(sampling_date, self.age);
    }
}

/// Crushing date of a specimen of `age` days cast on `casting_date`.
pub fn crushing_date_for(casting_date: Option<NaiveDate>, age: Option<u32>) -> Option<NaiveDate> {
    dates::add_days(casting_date?, i64::from(age?))
}

/// Read a specimen array one entry at a time, dropping entries that are not
/// specimen objects instead of failing the whole document.
fn specimen_list<'de, D>(deserializer: D) -> Result<Vec<Specimen>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Array(entries)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Specimen>(entry) {
            Ok(specimen) => Some(specimen),
            Err(e) => {
                warn!(index, error = %e, "dropping unreadable specimen");
                None
            }
        })
        .collect())
}

/// One sampling event ("fiche de prélèvement") with its embedded specimens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcreteTest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(default, with = "dates::day", skip_serializing_if = "Option::is_none")]
    pub reception_date: Option<NaiveDate>,
    #[serde(default, with = "dates::day", skip_serializing_if = "Option::is_none")]
    pub sampling_date: Option<NaiveDate>,
    /// Slump in mm.
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub slump: Option<Decimal>,
    /// m³
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub concrete_temperature: Option<Decimal>,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ambient_temperature: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mix_design: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "specimen_list")]
    pub specimens: Vec<Specimen>,
}

impl ConcreteTest {
    pub fn consistency_class(&self) -> Option<ConsistencyClass> {
        calc::consistency_class(self.slump)
    }

    pub fn specimen(&self, number: u32) -> Option<&Specimen> {
        self.specimens.iter().find(|s| s.number == number)
    }

    pub fn specimen_mut(&mut self, number: u32) -> Option<&mut Specimen> {
        self.specimens.iter_mut().find(|s| s.number == number)
    }

    /// Display name of the test for task lists and reports.
    pub fn display_reference(&self) -> &str {
        if self.reference.is_empty() {
            &self.id
        } else {
            &self.reference
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_document_with_datetimes() {
        let json = r#"{
            "id": "t1",
            "reference": "PRV-2024-001",
            "samplingDate": "2024-05-01T00:00:00.000Z",
            "slump": "120",
            "specimens": [
                {
                    "number": 1,
                    "age": 7,
                    "castingDate": "2024-05-01T00:00:00.000Z",
                    "crushingDate": "2024-05-08T00:00:00.000Z",
                    "specimenType": "cylindrical",
                    "diameter": 160,
                    "height": 320,
                    "surface": 20106.19,
                    "force": "",
                    "weight": "13,2"
                }
            ]
        }"#;
        let test: ConcreteTest = serde_json::from_str(json).unwrap();
        assert_eq!(test.sampling_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(test.slump, Some(dec!(120)));
        let s = &test.specimens[0];
        assert_eq!(s.crushing_date, NaiveDate::from_ymd_opt(2024, 5, 8));
        assert_eq!(s.specimen_type, SpecimenShape::Cylindrical);
        assert!(s.force.is_none());
        assert_eq!(s.weight, Some(dec!(13.2)));
    }

    #[test]
    fn test_absent_results_are_omitted() {
        let specimen = Specimen {
            number: 1,
            age: Some(28),
            ..Default::default()
        };
        let json = serde_json::to_string(&specimen).unwrap();
        assert!(!json.contains("stress"));
        assert!(!json.contains("density"));
    }

    #[test]
    fn test_zero_stress_counts_as_tested() {
        let specimen = Specimen {
            stress: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(specimen.is_tested());
        assert!(!Specimen::default().is_tested());
    }

    #[test]
    fn test_reschedule_keeps_age() {
        let mut specimen = Specimen {
            number: 1,
            age: Some(28),
            ..Default::default()
        };
        specimen.reschedule(NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(specimen.casting_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(specimen.crushing_date, NaiveDate::from_ymd_opt(2024, 2, 7));
        specimen.reschedule(None);
        assert!(specimen.crushing_date.is_none());
    }

    #[test]
    fn test_display_reference_falls_back_to_id() {
        let test = ConcreteTest {
            id: "abc".into(),
            ..Default::default()
        };
        assert_eq!(test.display_reference(), "abc");
    }

    #[test]
    fn test_reschedule_without_age_leaves_no_crushing_date() {
        let mut specimen = Specimen::default();
        specimen.reschedule(NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(specimen.casting_date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert!(specimen.crushing_date.is_none());
    }

    #[test]
    fn test_reschedule_out_of_calendar_leaves_no_crushing_date() {
        let mut specimen = Specimen {
            age: Some(u32::MAX),
            ..Default::default()
        };
        specimen.reschedule(NaiveDate::from_ymd_opt(2024, 1, 10));
        assert!(specimen.crushing_date.is_none());
    }

    #[test]
    fn test_shape_labels() {
        assert_eq!(SpecimenShape::from_label("cubic"), SpecimenShape::Cubic);
        assert_eq!(SpecimenShape::from_label("cube 15x15"), SpecimenShape::Cubic);
        assert_eq!(SpecimenShape::from_label(" Cylindre "), SpecimenShape::Cylindrical);
        assert_eq!(SpecimenShape::from_label("prism"), SpecimenShape::Unknown);
    }

    #[test]
    fn test_loose_specimen_fields_are_tolerated() {
        let json = r#"{
            "id": "t1",
            "specimens": [
                { "number": "2", "age": "28", "specimenType": "cube 15x15" },
                { "number": null, "age": null, "specimenType": 4 },
                "not a specimen",
                { "number": 3, "age": 7.5, "specimenType": null }
            ]
        }"#;
        let test: ConcreteTest = serde_json::from_str(json).unwrap();
        assert_eq!(test.specimens.len(), 3);
        assert_eq!(test.specimens[0].number, 2);
        assert_eq!(test.specimens[0].age, Some(28));
        assert_eq!(test.specimens[0].specimen_type, SpecimenShape::Cubic);
        assert_eq!(test.specimens[1].number, 0);
        assert_eq!(test.specimens[1].age, None);
        assert_eq!(test.specimens[1].specimen_type, SpecimenShape::Unknown);
        assert_eq!(test.specimens[2].age, None);
        assert_eq!(test.specimens[2].specimen_type, SpecimenShape::Cylindrical);
    }
}
