pub mod preset;

pub use preset::{DimensionPreset, PRESETS};

use crate::calc;
use crate::dates;
use crate::error::LabError;
use crate::model::{crushing_date_for, ConcreteTest, Specimen};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Surfaces are stored rounded so that reports and recomputations agree.
pub const SURFACE_DECIMALS: u32 = 2;

/// Request to cast a batch of specimens from one sampling event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRequest {
    pub age: u32,
    /// Signed so that non-positive requests can be rejected explicitly.
    pub count: i64,
    pub dimension_preset: DimensionPreset,
    #[serde(default, with = "dates::day", skip_serializing_if = "Option::is_none")]
    pub sampling_date: Option<NaiveDate>,
}

/// Build `count` new specimens numbered after the highest number in `existing`.
///
/// Measurements are left empty; dates stay empty when no sampling date is known.
#[instrument(skip(existing, request), fields(age = request.age, count = request.count))]
pub fn build_pack(existing: &[Specimen], request: &PackRequest) -> Result<Vec<Specimen>, LabError> {
    if request.count <= 0 {
        return Err(LabError::InvalidPackRequest(format!(
            "count must be at least 1, got {}",
            request.count
        )));
    }
    let count = u32::try_from(request.count).map_err(|_| {
        LabError::InvalidPackRequest(format!("count {} is too large", request.count))
    })?;
    let first = existing
        .iter()
        .map(|s| s.number)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .filter(|first| first.checked_add(count - 1).is_some())
        .ok_or_else(|| LabError::InvalidPackRequest("too many specimens".into()))?;

    let age = Some(request.age);
    let crushing_date = crushing_date_for(request.sampling_date, age);
    if request.sampling_date.is_some() && crushing_date.is_none() {
        return Err(LabError::InvalidPackRequest(format!(
            "age {} puts the crushing date outside the calendar",
            request.age
        )));
    }

    let shape = request.dimension_preset.shape();
    let (diameter, height) = request.dimension_preset.dimensions();
    let surface = calc::surface_area(shape, Some(diameter))
        .map(|s| s.round_dp(SURFACE_DECIMALS))
        .ok_or_else(|| {
            LabError::InvalidPackRequest(format!(
                "no surface can be computed for {}",
                request.dimension_preset
            ))
        })?;

    let specimens: Vec<Specimen> = (0..count)
        .map(|i| Specimen {
            number: first + i,
            age,
            casting_date: request.sampling_date,
            crushing_date,
            specimen_type: shape,
            diameter: Some(diameter),
            height: Some(height),
            surface: Some(surface),
            ..Default::default()
        })
        .collect();

    debug!(
        first = first,
        preset = %request.dimension_preset,
        "built pack"
    );
    Ok(specimens)
}

impl ConcreteTest {
    /// Append a pack cast on this test's sampling date. Returns the new specimens.
    pub fn add_pack(
        &mut self,
        age: u32,
        count: i64,
        preset: DimensionPreset,
    ) -> Result<&[Specimen], LabError> {
        let request = PackRequest {
            age,
            count,
            dimension_preset: preset,
            sampling_date: self.sampling_date,
        };
        let pack = build_pack(&self.specimens, &request)?;
        let start = self.specimens.len();
        self.specimens.extend(pack);
        Ok(&self.specimens[start..])
    }

    /// Remove a whole specimen and renumber the rest contiguously.
    pub fn remove_specimen(&mut self, number: u32) -> Result<Specimen, LabError> {
        let index = self
            .specimens
            .iter()
            .position(|s| s.number == number)
            .ok_or_else(|| LabError::SpecimenNotFound {
                test_id: self.id.clone(),
                number,
            })?;
        let removed = self.specimens.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Restore the 1..N numbering in current order.
    pub fn renumber(&mut self) {
        for (i, specimen) in self.specimens.iter_mut().enumerate() {
            specimen.number = i as u32 + 1;
        }
    }

    /// Change the sampling date and cascade it to every specimen's dates.
    ///
    /// A specimen whose crushing date cannot be derived is left without one.
    pub fn set_sampling_date(&mut self, date: Option<NaiveDate>) {
        self.sampling_date = date;
        for specimen in &mut self.specimens {
            specimen.reschedule(date);
        }
        debug!(test = %self.id, specimens = self.specimens.len(), "rescheduled specimens");
    }

    /// Change one specimen's target age and move its crushing date accordingly.
    pub fn set_specimen_age(&mut self, number: u32, age: u32) -> Result<(), LabError> {
        let sampling_date = self.sampling_date;
        let test_id = self.id.clone();
        let specimen = self
            .specimen_mut(number)
            .ok_or(LabError::SpecimenNotFound { test_id, number })?;
        let casting_date = specimen.casting_date.or(sampling_date);
        if casting_date.is_some() && crushing_date_for(casting_date, Some(age)).is_none() {
            return Err(LabError::InvalidPackRequest(format!(
                "age {age} puts the crushing date outside the calendar"
            )));
        }
        specimen.age = Some(age);
        specimen.reschedule(casting_date);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(count: i64) -> PackRequest {
        PackRequest {
            age: 28,
            count,
            dimension_preset: DimensionPreset::Cube150,
            sampling_date: Some(date(2024, 3, 1)),
        }
    }

    fn sampled_test() -> ConcreteTest {
        ConcreteTest {
            id: "t1".into(),
            sampling_date: Some(date(2024, 3, 1)),
            ..Default::default()
        }
    }

    fn numbered(numbers: &[u32]) -> Vec<Specimen> {
        numbers
            .iter()
            .map(|&number| Specimen {
                number,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_numbering_continues_after_existing() {
        let pack = build_pack(&numbered(&[1, 2]), &request(3)).unwrap();
        let numbers: Vec<u32> = pack.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![3, 4, 5]);
    }

    #[test]
    fn test_numbering_skips_past_gaps_and_unnumbered() {
        let pack = build_pack(&numbered(&[1, 4, 0, 0]), &request(2)).unwrap();
        let numbers: Vec<u32> = pack.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![5, 6]);
    }

    #[test]
    fn test_numbering_overflow_rejected() {
        assert!(matches!(
            build_pack(&numbered(&[u32::MAX - 1]), &request(2)),
            Err(LabError::InvalidPackRequest(_))
        ));
        assert!(build_pack(&numbered(&[u32::MAX - 1]), &request(1)).is_ok());
    }

    #[test]
    fn test_age_beyond_calendar_rejected() {
        let mut req = request(1);
        req.age = u32::MAX;
        assert!(matches!(
            build_pack(&[], &req),
            Err(LabError::InvalidPackRequest(_))
        ));
        req.sampling_date = None;
        assert!(build_pack(&[], &req).is_ok());
    }

    #[test]
    fn test_oversized_custom_preset_rejected() {
        let mut req = request(1);
        req.dimension_preset = "cube:1000000000000000".parse().unwrap();
        assert!(matches!(
            build_pack(&[], &req),
            Err(LabError::InvalidPackRequest(_))
        ));
    }

    #[test]
    fn test_pack_dates_and_geometry() {
        let pack = build_pack(&[], &request(1)).unwrap();
        let s = &pack[0];
        assert_eq!(s.casting_date, Some(date(2024, 3, 1)));
        assert_eq!(s.crushing_date, Some(date(2024, 3, 29)));
        assert_eq!(s.diameter, Some(dec!(150)));
        assert_eq!(s.height, Some(dec!(150)));
        assert_eq!(s.surface, Some(dec!(22500)));
        assert!(s.weight.is_none() && s.force.is_none());
        assert!(s.stress.is_none() && s.density.is_none());
    }

    #[test]
    fn test_cylinder_surface_rounded() {
        let mut req = request(1);
        req.dimension_preset = DimensionPreset::Cylinder160x320;
        let pack = build_pack(&[], &req).unwrap();
        assert_eq!(pack[0].surface, Some(dec!(20106.19)));
    }

    #[test]
    fn test_non_positive_count_rejected() {
        assert!(matches!(
            build_pack(&[], &request(0)),
            Err(LabError::InvalidPackRequest(_))
        ));
        assert!(matches!(
            build_pack(&[], &request(-2)),
            Err(LabError::InvalidPackRequest(_))
        ));
    }

    #[test]
    fn test_rejected_pack_leaves_test_untouched() {
        let mut test = sampled_test();
        test.add_pack(7, 2, DimensionPreset::Cube150).unwrap();
        assert!(test.add_pack(28, 0, DimensionPreset::Cube150).is_err());
        assert_eq!(test.specimens.len(), 2);
    }

    #[test]
    fn test_no_sampling_date_leaves_dates_empty() {
        let mut req = request(1);
        req.sampling_date = None;
        let pack = build_pack(&[], &req).unwrap();
        assert!(pack[0].casting_date.is_none());
        assert!(pack[0].crushing_date.is_none());
    }

    #[test]
    fn test_add_pack_returns_new_specimens() {
        let mut test = sampled_test();
        test.add_pack(7, 2, DimensionPreset::Cube150).unwrap();
        let added = test.add_pack(28, 3, DimensionPreset::Cube150).unwrap();
        assert_eq!(added.len(), 3);
        assert_eq!(added[0].number, 3);
        assert_eq!(test.specimens.len(), 5);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut test = sampled_test();
        test.add_pack(28, 5, DimensionPreset::Cube150).unwrap();
        let removed = test.remove_specimen(2).unwrap();
        assert_eq!(removed.number, 2);
        let numbers: Vec<u32> = test.specimens.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_unknown_specimen() {
        let mut test = sampled_test();
        test.add_pack(28, 2, DimensionPreset::Cube150).unwrap();
        assert!(matches!(
            test.remove_specimen(9),
            Err(LabError::SpecimenNotFound { number: 9, .. })
        ));
        assert_eq!(test.specimens.len(), 2);
    }

    #[test]
    fn test_sampling_date_cascade_keeps_ages() {
        let mut test = sampled_test();
        test.add_pack(7, 1, DimensionPreset::Cube150).unwrap();
        test.add_pack(28, 1, DimensionPreset::Cube150).unwrap();

        test.set_sampling_date(Some(date(2024, 3, 10)));

        assert_eq!(test.specimens[0].age, Some(7));
        assert_eq!(test.specimens[0].casting_date, Some(date(2024, 3, 10)));
        assert_eq!(test.specimens[0].crushing_date, Some(date(2024, 3, 17)));
        assert_eq!(test.specimens[1].age, Some(28));
        assert_eq!(test.specimens[1].crushing_date, Some(date(2024, 4, 7)));
    }

    #[test]
    fn test_set_specimen_age() {
        let mut test = sampled_test();
        test.add_pack(7, 2, DimensionPreset::Cube150).unwrap();
        test.set_specimen_age(2, 14).unwrap();
        assert_eq!(test.specimens[1].crushing_date, Some(date(2024, 3, 15)));
        assert_eq!(test.specimens[0].crushing_date, Some(date(2024, 3, 8)));
        assert!(test.set_specimen_age(3, 14).is_err());
    }

    #[test]
    fn test_set_specimen_age_beyond_calendar_keeps_specimen() {
        let mut test = sampled_test();
        test.add_pack(7, 1, DimensionPreset::Cube150).unwrap();
        let before = test.clone();
        assert!(matches!(
            test.set_specimen_age(1, u32::MAX),
            Err(LabError::InvalidPackRequest(_))
        ));
        assert_eq!(test, before);
    }

    #[test]
    fn test_add_pack_after_gap_keeps_numbers_unique() {
        let mut test = sampled_test();
        test.specimens = numbered(&[1, 3]);
        let added = test.add_pack(28, 1, DimensionPreset::Cube150).unwrap();
        assert_eq!(added[0].number, 4);
    }

    #[test]
    fn test_pack_request_json() {
        let req: PackRequest = serde_json::from_str(
            r#"{"age": 7, "count": 3, "dimensionPreset": "16x32", "samplingDate": "2024-03-01"}"#,
        )
        .unwrap();
        assert_eq!(req.dimension_preset, DimensionPreset::Cylinder160x320);
        assert!(serde_json::from_str::<PackRequest>(
            r#"{"age": 7, "count": 3, "dimensionPreset": "bogus"}"#
        )
        .is_err());
    }
}
