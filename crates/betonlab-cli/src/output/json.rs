use betonlab_core::error::LabError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), LabError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
