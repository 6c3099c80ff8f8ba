use crate::schedule::task::{ClassifiedSpecimen, NotificationTask};
use std::collections::HashMap;

/// Merge classified specimens into one task per (test, day).
///
/// Groups keep the order in which they were first met; the only re-ordering
/// is a stable sort on urgency (overdue, then today, then upcoming).
pub fn consolidate(pending: &[ClassifiedSpecimen]) -> Vec<NotificationTask> {
    let mut tasks: Vec<NotificationTask> = Vec::new();
    let mut index: HashMap<(&str, chrono::NaiveDate), usize> = HashMap::new();

    for entry in pending {
        let key = (entry.test_id.as_str(), entry.crushing_date);
        match index.get(&key) {
            Some(&i) => tasks[i].specimen_count += 1,
            None => {
                index.insert(key, tasks.len());
                tasks.push(NotificationTask {
                    test_id: entry.test_id.clone(),
                    test_reference: entry.test_reference.clone(),
                    project_name: entry.project_name.clone(),
                    target_date: entry.crushing_date,
                    urgency_class: entry.urgency,
                    specimen_count: 1,
                    representative_age: entry.age,
                });
            }
        }
    }

    tasks.sort_by_key(|t| t.urgency_class);
    tasks
}
