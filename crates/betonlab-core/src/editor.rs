//! Measurement entry for specimens.
//!
//! Every entry point (row edit, detail view, quick entry) goes through
//! [`apply_edit`] so derived values are computed one way only.

use crate::calc;
use crate::error::LabError;
use crate::model::{ConcreteTest, Specimen};
use crate::parsing::lenient;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A change to one raw measurement. `None` clears the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "field", content = "value")]
pub enum MeasurementEdit {
    Weight(#[serde(with = "lenient")] Option<Decimal>),
    Force(#[serde(with = "lenient")] Option<Decimal>),
}

/// One line of a quick-entry batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickEntry {
    pub number: u32,
    #[serde(default, with = "lenient")]
    pub weight: Option<Decimal>,
    #[serde(default, with = "lenient")]
    pub force: Option<Decimal>,
}

/// Recompute stress and density from the current raw fields.
pub fn recompute_derived(specimen: &mut Specimen) {
    specimen.stress = calc::stress(specimen.force, specimen.surface);
    specimen.density = calc::density(specimen.weight, specimen.surface, specimen.height);
}

/// Set one raw field and refresh the derived values.
pub fn apply_edit(specimen: &mut Specimen, edit: MeasurementEdit) {
    match edit {
        MeasurementEdit::Weight(v) => specimen.weight = v,
        MeasurementEdit::Force(v) => specimen.force = v,
    }
    recompute_derived(specimen);
    debug!(
        number = specimen.number,
        stress = ?specimen.stress,
        density = ?specimen.density,
        "specimen updated"
    );
}

fn find_mut<'a>(test: &'a mut ConcreteTest, number: u32) -> Result<&'a mut Specimen, LabError> {
    let test_id = test.id.clone();
    test.specimen_mut(number)
        .ok_or(LabError::SpecimenNotFound { test_id, number })
}

/// Row-level quick edit of a single field.
pub fn edit_inline(
    test: &mut ConcreteTest,
    number: u32,
    edit: MeasurementEdit,
) -> Result<&Specimen, LabError> {
    let specimen = find_mut(test, number)?;
    apply_edit(specimen, edit);
    Ok(&*specimen)
}

/// Detail-view edit: both readings are submitted together.
pub fn edit_detail(
    test: &mut ConcreteTest,
    number: u32,
    weight: Option<Decimal>,
    force: Option<Decimal>,
) -> Result<&Specimen, LabError> {
    let specimen = find_mut(test, number)?;
    apply_edit(specimen, MeasurementEdit::Weight(weight));
    apply_edit(specimen, MeasurementEdit::Force(force));
    Ok(&*specimen)
}

/// Numbers of the specimens scheduled for crushing on `date`.
pub fn specimens_due_on(test: &ConcreteTest, date: NaiveDate) -> Vec<u32> {
    test.specimens
        .iter()
        .filter(|s| s.crushing_date == Some(date))
        .map(|s| s.number)
        .collect()
}

/// Batch entry for the specimens crushed on one day.
///
/// Every entry is checked before anything is written, so a bad line leaves
/// the test untouched. Returns the number of specimens updated.
pub fn quick_entry(
    test: &mut ConcreteTest,
    target_date: NaiveDate,
    entries: &[QuickEntry],
) -> Result<usize, LabError> {
    let due = specimens_due_on(test, target_date);
    for entry in entries {
        if test.specimen(entry.number).is_none() {
            return Err(LabError::SpecimenNotFound {
                test_id: test.id.clone(),
                number: entry.number,
            });
        }
        if !due.contains(&entry.number) {
            return Err(LabError::SpecimenNotDue {
                number: entry.number,
                date: target_date,
            });
        }
    }

    for entry in entries {
        edit_detail(test, entry.number, entry.weight, entry.force)?;
    }
    Ok(entries.len())
}
