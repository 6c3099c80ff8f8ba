use crate::dates;
use crate::model::{ConcreteTest, Specimen};
use crate::schedule::task::{ClassifiedSpecimen, UrgencyClass};
use chrono::NaiveDate;
use tracing::{debug, instrument};

/// Bucket one specimen relative to `today`.
///
/// `None` when the specimen is already tested, cannot be scheduled (no
/// crushing date or no age), or is due more than one day ahead.
pub fn classify_specimen(specimen: &Specimen, today: NaiveDate) -> Option<UrgencyClass> {
    if specimen.is_tested() || specimen.age.is_none() {
        return None;
    }
    let crushing_date = specimen.crushing_date?;
    match dates::days_between(today, crushing_date) {
        d if d < 0 => Some(UrgencyClass::Overdue),
        0 => Some(UrgencyClass::Today),
        1 => Some(UrgencyClass::Upcoming),
        _ => None,
    }
}

/// Scan every test and keep the untested specimens inside the two-day window,
/// in corpus order.
#[instrument(skip(tests), fields(tests = tests.len()))]
pub fn classify_pending(tests: &[ConcreteTest], today: NaiveDate) -> Vec<ClassifiedSpecimen> {
    let mut pending = Vec::new();

    for test in tests {
        for specimen in &test.specimens {
            if specimen.is_tested() {
                continue;
            }
            let (Some(crushing_date), Some(age)) = (specimen.crushing_date, specimen.age) else {
                debug!(
                    test = %test.id,
                    number = specimen.number,
                    "skipping unschedulable specimen"
                );
                continue;
            };
            let Some(urgency) = classify_specimen(specimen, today) else {
                continue;
            };
            pending.push(ClassifiedSpecimen {
                test_id: test.id.clone(),
                test_reference: test.display_reference().to_string(),
                project_name: test.project_name.clone(),
                number: specimen.number,
                age,
                crushing_date,
                urgency,
            });
        }
    }

    pending
}
