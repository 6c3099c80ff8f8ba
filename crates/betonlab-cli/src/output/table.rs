use betonlab_core::config::EngineConfig;
use betonlab_core::model::Specimen;
use betonlab_core::report::{self, ReportVariant, SpecimenReport};
use betonlab_core::schedule::{NotificationTask, UrgencyClass};
use chrono::NaiveDate;
use std::fmt::Display;

fn cell<T: Display>(value: Option<T>, config: &EngineConfig) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| config.placeholder.clone())
}

pub fn print_tasks(tasks: &[NotificationTask], today: NaiveDate) {
    if tasks.is_empty() {
        println!("Nothing to crush around {today}.");
        return;
    }

    let max_ref = tasks
        .iter()
        .map(|t| t.test_reference.len())
        .max()
        .unwrap_or(10)
        .max(9);

    let mut current: Option<UrgencyClass> = None;
    for task in tasks {
        if current != Some(task.urgency_class) {
            if current.is_some() {
                println!();
            }
            let heading = match task.urgency_class {
                UrgencyClass::Overdue => "Overdue",
                UrgencyClass::Today => "Today",
                UrgencyClass::Upcoming => "Tomorrow",
            };
            println!("=== {heading} ===\n");
            current = Some(task.urgency_class);
        }

        println!(
            "  {:<width$}  {}  {:>2} specimen(s)  {:>3} d  {}",
            task.test_reference,
            task.target_date,
            task.specimen_count,
            task.representative_age,
            task.project_name.as_deref().unwrap_or(""),
            width = max_ref
        );
    }
}

pub fn print_specimens(specimens: &[Specimen], config: &EngineConfig) {
    println!(
        "  {:>3}  {:>4}  {:<10}  {:<11}  {:>10}  {:>7}  {:>7}  {:>7}  {:>6}",
        "#", "age", "crushing", "type", "surface", "weight", "force", "stress", "dens."
    );
    for s in specimens {
        let row = report::format_row(s, config);
        println!(
            "  {:>3}  {:>4}  {:<10}  {:<11}  {:>10}  {:>7}  {:>7}  {:>7}  {:>6}",
            row.number,
            cell(row.age, config),
            cell(row.crushing_date, config),
            row.specimen_type.to_string(),
            row.surface,
            row.weight,
            row.force,
            row.stress,
            row.density,
        );
    }
}

pub fn print_report(report: &SpecimenReport, config: &EngineConfig) {
    let title = match report.variant {
        ReportVariant::Provisional => "Provisional report (PV)",
        ReportVariant::Final => "Final report (RP)",
    };
    println!("=== {title}: {} ===\n", report.reference);

    if let Some(ref project) = report.project_name {
        println!("  Project:      {project}");
    }
    if let Some(ref structure) = report.structure {
        println!("  Structure:    {structure}");
    }
    if let Some(ref element) = report.element {
        println!("  Element:      {element}");
    }
    println!("  Sampled:      {}", cell(report.sampling_date, config));
    if let Some(ref class) = report.strength_class {
        println!("  Class:        {class}");
    }
    if let Some(consistency) = report.consistency_class {
        println!("  Consistency:  {consistency}");
    }
    println!();

    if report.rows.is_empty() {
        println!("  No specimens for this report.");
        return;
    }

    println!(
        "  {:>3}  {:>4}  {:<10}  {:<10}  {:>10}  {:>7}  {:>7}  {:>7}  {:>6}",
        "#", "age", "crushing", "dims", "surface", "weight", "force", "stress", "dens."
    );
    for row in &report.rows {
        println!(
            "  {:>3}  {:>4}  {:<10}  {:<10}  {:>10}  {:>7}  {:>7}  {:>7}  {:>6}",
            row.number,
            cell(row.age, config),
            cell(row.crushing_date, config),
            row.dimensions,
            row.surface,
            row.weight,
            row.force,
            row.stress,
            row.density,
        );
    }
    println!();

    for summary in &report.summaries {
        let mean = summary
            .mean_stress
            .map(|m| format!("{m} MPa"))
            .unwrap_or_else(|| "no result".to_string());
        println!(
            "  {:>3} d: {}/{} measured, mean {}",
            summary.age, summary.measured, summary.specimens, mean
        );
    }
}
