pub mod reference;
pub mod report;
pub mod specimens;
pub mod tasks;
