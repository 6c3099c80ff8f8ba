use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slump class of fresh concrete (EN 206 S1..S5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConsistencyClass {
    #[serde(rename = "indeterminate")]
    Indeterminate,
    S1,
    S2,
    S3,
    S4,
    S5,
}

impl fmt::Display for ConsistencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyClass::Indeterminate => write!(f, "indeterminate"),
            ConsistencyClass::S1 => write!(f, "S1"),
            ConsistencyClass::S2 => write!(f, "S2"),
            ConsistencyClass::S3 => write!(f, "S3"),
            ConsistencyClass::S4 => write!(f, "S4"),
            ConsistencyClass::S5 => write!(f, "S5"),
        }
    }
}

/// Upper bound (inclusive, mm) of each class, lowest first.
const BANDS: &[(u32, ConsistencyClass)] = &[
    (40, ConsistencyClass::S1),
    (90, ConsistencyClass::S2),
    (150, ConsistencyClass::S3),
    (210, ConsistencyClass::S4),
];

/// Classify a slump measurement in mm. `None` only when no slump was measured.
pub fn consistency_class(slump_mm: Option<Decimal>) -> Option<ConsistencyClass> {
    let slump = slump_mm?;
    if slump < Decimal::TEN {
        return Some(ConsistencyClass::Indeterminate);
    }
    let class = BANDS
        .iter()
        .find(|(upper, _)| slump <= Decimal::from(*upper))
        .map(|(_, class)| *class)
        .unwrap_or(ConsistencyClass::S5);
    Some(class)
}
