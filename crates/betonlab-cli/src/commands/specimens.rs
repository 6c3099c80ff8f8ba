use betonlab_core::config::EngineConfig;
use betonlab_core::editor::{self, MeasurementEdit, QuickEntry};
use betonlab_core::error::LabError;
use betonlab_core::pack::{DimensionPreset, PackRequest};
use betonlab_core::parsing::parse_measurement;
use betonlab_core::store::{find_test, update_test, TestStore};
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::output;
use crate::store::JsonFileStore;

pub fn pack(
    corpus: PathBuf,
    test_id: &str,
    age: u32,
    count: i64,
    preset: &str,
) -> Result<(), LabError> {
    let dimension_preset: DimensionPreset = preset.parse()?;
    let store = JsonFileStore::new(corpus);
    let tests = store.load_all()?;
    let sampling_date = find_test(&tests, test_id)?.sampling_date;

    let added = betonlab_core::add_pack(
        &store,
        test_id,
        &PackRequest {
            age,
            count,
            dimension_preset,
            sampling_date,
        },
    )?;

    eprintln!(
        "Added {} specimen(s) to {}, written to {}",
        added.len(),
        test_id,
        store.path().display()
    );
    output::table::print_specimens(&added, &EngineConfig::default());
    Ok(())
}

pub fn edit(
    corpus: PathBuf,
    test_id: &str,
    number: u32,
    weight: Option<String>,
    force: Option<String>,
) -> Result<(), LabError> {
    let store = JsonFileStore::new(corpus);
    let specimen = update_test(&store, test_id, |t| {
        if let Some(w) = weight.as_deref() {
            editor::edit_inline(t, number, MeasurementEdit::Weight(parse_measurement(w)))?;
        }
        if let Some(f) = force.as_deref() {
            editor::edit_inline(t, number, MeasurementEdit::Force(parse_measurement(f)))?;
        }
        t.specimen(number)
            .cloned()
            .ok_or_else(|| LabError::SpecimenNotFound {
                test_id: t.id.clone(),
                number,
            })
    })?;

    output::table::print_specimens(
        std::slice::from_ref(&specimen),
        &EngineConfig::default(),
    );
    Ok(())
}

pub fn quick_entry(
    corpus: PathBuf,
    test_id: &str,
    date: NaiveDate,
    entries: &[QuickEntry],
) -> Result<(), LabError> {
    let store = JsonFileStore::new(corpus);
    let updated = update_test(&store, test_id, |t| {
        editor::quick_entry(t, date, entries)?;
        let due = editor::specimens_due_on(t, date);
        Ok(t.specimens
            .iter()
            .filter(|s| due.contains(&s.number))
            .cloned()
            .collect::<Vec<_>>())
    })?;

    eprintln!("Recorded {} result(s) for {}", entries.len(), date);
    output::table::print_specimens(&updated, &EngineConfig::default());
    Ok(())
}

pub fn remove(corpus: PathBuf, test_id: &str, number: u32) -> Result<(), LabError> {
    let store = JsonFileStore::new(corpus);
    let remaining = update_test(&store, test_id, |t| {
        t.remove_specimen(number)?;
        Ok(t.specimens.clone())
    })?;

    eprintln!("Removed specimen #{number} from {test_id}");
    output::table::print_specimens(&remaining, &EngineConfig::default());
    Ok(())
}

pub fn resample(corpus: PathBuf, test_id: &str, date: NaiveDate) -> Result<(), LabError> {
    let store = JsonFileStore::new(corpus);
    let specimens = update_test(&store, test_id, |t| {
        t.set_sampling_date(Some(date));
        Ok(t.specimens.clone())
    })?;

    eprintln!("Sampling date of {test_id} set to {date}");
    output::table::print_specimens(&specimens, &EngineConfig::default());
    Ok(())
}
