use betonlab_core::calc;
use betonlab_core::error::LabError;
use betonlab_core::pack::{DimensionPreset, PRESETS};
use betonlab_core::parsing::parse_measurement;

pub fn slump(value: &str) -> Result<(), LabError> {
    match calc::consistency_class(parse_measurement(value)) {
        Some(class) => println!("{class}"),
        None => println!("no slump measured"),
    }
    Ok(())
}

pub fn presets() -> Result<(), LabError> {
    println!("Available dimension presets:\n");
    for name in PRESETS {
        let preset: DimensionPreset = name.parse()?;
        println!("  {:<12} {}", name, preset.description());
    }
    println!();
    println!("Custom geometry: cube:<side> or cylinder:<diameter>x<height> (mm)");
    Ok(())
}
