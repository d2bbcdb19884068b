// src/kernel/mod.rs

//! Numerical primitives shared by the geometry and serialization layers.

use nalgebra::{Point3, Vector3};

// Type aliases for clarity throughout the generator.
pub type Point = Point3<f64>;
pub type Extents = Vector3<f64>;

/// Axis labels, indexed the same way as `Point`/`Extents` components.
pub const AXES: [char; 3] = ['x', 'y', 'z'];

/// Component-wise division that refuses a zero divisor.
///
/// Returns the index of the first zero divisor on failure.
pub fn checked_component_div(numerators: &Extents, divisors: [u32; 3]) -> Result<Extents, usize> {
    if let Some(axis) = divisors.iter().position(|&d| d == 0) {
        return Err(axis);
    }
    Ok(Extents::new(
        numerators.x / f64::from(divisors[0]),
        numerators.y / f64::from(divisors[1]),
        numerators.z / f64::from(divisors[2]),
    ))
}
