pub mod consistency;

pub use consistency::{consistency_class, ConsistencyClass};

use crate::model::SpecimenShape;
use rust_decimal::Decimal;

const KN_TO_N: Decimal = Decimal::ONE_THOUSAND;
/// g/mm³ -> kg/m³
const G_PER_MM3_TO_KG_PER_M3: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Loaded cross-section in mm².
///
/// Cubes use side², cylinders π·(d/2)². The height is not involved; it only
/// matters for the volume used by [`density`]. Absent for an unknown shape
/// or a size too large to represent.
pub fn surface_area(shape: SpecimenShape, diameter: Option<Decimal>) -> Option<Decimal> {
    let d = diameter?;
    match shape {
        SpecimenShape::Cubic => d.checked_mul(d),
        SpecimenShape::Cylindrical => {
            let r = d / Decimal::TWO;
            Decimal::PI.checked_mul(r)?.checked_mul(r)
        }
        SpecimenShape::Unknown => None,
    }
}

/// Compressive stress in MPa from a failure load in kN.
///
/// Absent when the load is absent or not positive, or when the surface is
/// absent or zero.
pub fn stress(force_kn: Option<Decimal>, surface_mm2: Option<Decimal>) -> Option<Decimal> {
    let force = force_kn.filter(|f| f.is_sign_positive() && !f.is_zero())?;
    let surface = surface_mm2.filter(|s| !s.is_zero())?;
    force.checked_mul(KN_TO_N)?.checked_div(surface)
}

/// Density in kg/m³ from a mass in g and the specimen volume.
///
/// Absent when the mass is absent or not positive, or the volume is zero.
pub fn density(
    weight_g: Option<Decimal>,
    surface_mm2: Option<Decimal>,
    height_mm: Option<Decimal>,
) -> Option<Decimal> {
    let weight = weight_g.filter(|w| w.is_sign_positive() && !w.is_zero())?;
    let volume = surface_mm2?.checked_mul(height_mm?)?;
    if volume.is_zero() {
        return None;
    }
    weight
        .checked_div(volume)?
        .checked_mul(G_PER_MM3_TO_KG_PER_M3)
}
