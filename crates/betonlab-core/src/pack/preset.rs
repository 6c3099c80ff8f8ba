use crate::error::LabError;
use crate::model::SpecimenShape;
use crate::parsing::parse_measurement;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named presets, in the order they are offered to operators.
pub const PRESETS: &[&str] = &["cyl-160x320", "cyl-110x220", "cube-150", "cube-100"];

/// Geometry a pack of specimens is cast in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DimensionPreset {
    Cylinder160x320,
    Cylinder110x220,
    Cube150,
    Cube100,
    Custom {
        shape: SpecimenShape,
        /// Diameter, or side for cubes (mm).
        diameter: Decimal,
        height: Decimal,
    },
}

impl DimensionPreset {
    pub fn shape(&self) -> SpecimenShape {
        match self {
            DimensionPreset::Cylinder160x320 | DimensionPreset::Cylinder110x220 => {
                SpecimenShape::Cylindrical
            }
            DimensionPreset::Cube150 | DimensionPreset::Cube100 => SpecimenShape::Cubic,
            DimensionPreset::Custom { shape, .. } => *shape,
        }
    }

    /// (diameter or side, height) in mm.
    pub fn dimensions(&self) -> (Decimal, Decimal) {
        match self {
            DimensionPreset::Cylinder160x320 => (Decimal::from(160), Decimal::from(320)),
            DimensionPreset::Cylinder110x220 => (Decimal::from(110), Decimal::from(220)),
            DimensionPreset::Cube150 => (Decimal::from(150), Decimal::from(150)),
            DimensionPreset::Cube100 => (Decimal::from(100), Decimal::from(100)),
            DimensionPreset::Custom {
                diameter, height, ..
            } => (*diameter, *height),
        }
    }

    pub fn description(&self) -> String {
        let (d, h) = self.dimensions();
        match self.shape() {
            SpecimenShape::Cubic => format!("cube {d}x{h} mm"),
            SpecimenShape::Cylindrical => format!("cylinder Ø{d}x{h} mm"),
            SpecimenShape::Unknown => format!("{d}x{h} mm"),
        }
    }
}

impl FromStr for DimensionPreset {
    type Err = LabError;

    /// Accepts the named presets (and their cm shorthands such as `16x32`),
    /// `cube:<side>` and `cylinder:<d>x<h>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "cyl-160x320" | "16x32" => return Ok(DimensionPreset::Cylinder160x320),
            "cyl-110x220" | "11x22" => return Ok(DimensionPreset::Cylinder110x220),
            "cube-150" | "15x15" => return Ok(DimensionPreset::Cube150),
            "cube-100" | "10x10" => return Ok(DimensionPreset::Cube100),
            _ => {}
        }

        let unknown = || LabError::UnknownPreset(s.to_string());
        let positive = |v: &str| parse_measurement(v).filter(|d| *d > Decimal::ZERO);

        if let Some(side) = key.strip_prefix("cube:") {
            let side = positive(side).ok_or_else(unknown)?;
            return Ok(DimensionPreset::Custom {
                shape: SpecimenShape::Cubic,
                diameter: side,
                height: side,
            });
        }

        if let Some(dims) = key.strip_prefix("cylinder:") {
            let (d, h) = dims.split_once('x').ok_or_else(unknown)?;
            return Ok(DimensionPreset::Custom {
                shape: SpecimenShape::Cylindrical,
                diameter: positive(d).ok_or_else(unknown)?,
                height: positive(h).ok_or_else(unknown)?,
            });
        }

        Err(unknown())
    }
}

impl fmt::Display for DimensionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionPreset::Cylinder160x320 => write!(f, "cyl-160x320"),
            DimensionPreset::Cylinder110x220 => write!(f, "cyl-110x220"),
            DimensionPreset::Cube150 => write!(f, "cube-150"),
            DimensionPreset::Cube100 => write!(f, "cube-100"),
            DimensionPreset::Custom {
                shape: SpecimenShape::Cubic,
                diameter,
                ..
            } => write!(f, "cube:{diameter}"),
            DimensionPreset::Custom {
                diameter, height, ..
            } => write!(f, "cylinder:{diameter}x{height}"),
        }
    }
}

impl TryFrom<String> for DimensionPreset {
    type Error = LabError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DimensionPreset> for String {
    fn from(value: DimensionPreset) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_named_presets() {
        for name in PRESETS {
            let preset: DimensionPreset = name.parse().unwrap();
            assert_eq!(preset.to_string(), *name);
        }
    }

    #[test]
    fn test_cm_shorthand() {
        assert_eq!(
            "16x32".parse::<DimensionPreset>().unwrap(),
            DimensionPreset::Cylinder160x320
        );
        assert_eq!(
            " 15X15 ".parse::<DimensionPreset>().unwrap(),
            DimensionPreset::Cube150
        );
    }

    #[test]
    fn test_cube_geometry() {
        let p = DimensionPreset::Cube150;
        assert_eq!(p.shape(), SpecimenShape::Cubic);
        assert_eq!(p.dimensions(), (dec!(150), dec!(150)));
    }

    #[test]
    fn test_custom_cylinder() {
        let p: DimensionPreset = "cylinder:150x300".parse().unwrap();
        assert_eq!(p.shape(), SpecimenShape::Cylindrical);
        assert_eq!(p.dimensions(), (dec!(150), dec!(300)));
        assert_eq!(p.to_string(), "cylinder:150x300");
    }

    #[test]
    fn test_custom_cube() {
        let p: DimensionPreset = "cube:70,7".parse().unwrap();
        assert_eq!(p.dimensions(), (dec!(70.7), dec!(70.7)));
    }

    #[test]
    fn test_unknown_preset_fails_closed() {
        assert!(matches!(
            "hexagon".parse::<DimensionPreset>(),
            Err(LabError::UnknownPreset(_))
        ));
        assert!("cylinder:150".parse::<DimensionPreset>().is_err());
        assert!("cube:0".parse::<DimensionPreset>().is_err());
        assert!("cube:abc".parse::<DimensionPreset>().is_err());
        assert!("".parse::<DimensionPreset>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let p: DimensionPreset = serde_json::from_str(r#""cube-150""#).unwrap();
        assert_eq!(p, DimensionPreset::Cube150);
        assert!(serde_json::from_str::<DimensionPreset>(r#""pyramid""#).is_err());
    }
}
