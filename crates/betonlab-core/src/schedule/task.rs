use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Short-horizon bucket of a pending specimen. Ordered by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyClass {
    Overdue,
    Today,
    Upcoming,
}

impl fmt::Display for UrgencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyClass::Overdue => write!(f, "overdue"),
            UrgencyClass::Today => write!(f, "today"),
            UrgencyClass::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// An untested specimen that falls inside the look-ahead window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSpecimen {
    pub test_id: String,
    pub test_reference: String,
    pub project_name: Option<String>,
    pub number: u32,
    pub age: u32,
    pub crushing_date: NaiveDate,
    pub urgency: UrgencyClass,
}

/// One actionable line of the work queue: the specimens of one test due on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTask {
    pub test_id: String,
    pub test_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub target_date: NaiveDate,
    pub urgency_class: UrgencyClass,
    pub specimen_count: usize,
    pub representative_age: u32,
}
