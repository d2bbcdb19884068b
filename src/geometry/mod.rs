// src/geometry/mod.rs

//! Box geometry: vertices, cell spacing and the cubic-cell check.

use crate::kernel::{checked_component_div, Extents, Point, AXES};
use crate::GeneratorError;
use std::fmt;

/// Default tolerance for deciding whether cells are cubic.
pub const UNIFORMITY_TOLERANCE: f64 = 1e-6;

/// An axis-aligned box with a per-axis cell count.
///
/// Rebuilt from the raw form strings on every request; never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGeometry {
    pub origin: Point,
    pub extents: Extents,
    pub cells: [u32; 3],
}

impl BoxGeometry {
    pub fn new(origin: Point, extents: Extents, cells: [u32; 3]) -> Self {
        BoxGeometry { origin, extents, cells }
    }

    /// The corner opposite `origin`.
    pub fn opposite_corner(&self) -> Point {
        self.origin + self.extents
    }

    pub fn vertices(&self) -> [Point; 8] {
        compute_vertices(&self.origin, &self.extents)
    }

    pub fn spacing(&self) -> Result<Extents, GeneratorError> {
        compute_spacing(&self.extents, self.cells)
    }
}

/// Returns the eight box corners in hex-block order.
///
/// Vertices 0-3 walk the z-min face counter-clockwise starting at `origin`,
/// vertices 4-7 repeat the same (x, y) walk on the z-max face. The face
/// quads in `boundary::Face::vertex_indices` depend on this order.
pub fn compute_vertices(origin: &Point, extents: &Extents) -> [Point; 8] {
    let min = *origin;
    let max = *origin + *extents;
    [
        Point::new(min.x, min.y, min.z),
        Point::new(max.x, min.y, min.z),
        Point::new(max.x, max.y, min.z),
        Point::new(min.x, max.y, min.z),
        Point::new(min.x, min.y, max.z),
        Point::new(max.x, min.y, max.z),
        Point::new(max.x, max.y, max.z),
        Point::new(min.x, max.y, max.z),
    ]
}

/// Cell size along each axis, `extents[i] / cells[i]`.
pub fn compute_spacing(extents: &Extents, cells: [u32; 3]) -> Result<Extents, GeneratorError> {
    checked_component_div(extents, cells).map_err(|axis| GeneratorError::Division { axis: AXES[axis] })
}

/// Whether the cells are cubes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniformity {
    Uniform,
    NonUniform,
}

/// Classifies spacing as cubic when `|dx - dy|` and `|dy - dz|` are both under `tolerance`.
///
/// Advisory only: generation never depends on the result.
pub fn classify_uniformity(spacing: &Extents, tolerance: f64) -> Uniformity {
    if (spacing.x - spacing.y).abs() < tolerance && (spacing.y - spacing.z).abs() < tolerance {
        Uniformity::Uniform
    } else {
        Uniformity::NonUniform
    }
}

/// Cell size summary shown to the user before generating.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStats {
    pub spacing: Extents,
    pub uniformity: Uniformity,
    pub unit_label: String,
}

impl CellStats {
    pub fn new(geometry: &BoxGeometry, unit_label: &str, tolerance: f64) -> Result<Self, GeneratorError> {
        let spacing = geometry.spacing()?;
        Ok(CellStats {
            uniformity: classify_uniformity(&spacing, tolerance),
            spacing,
            unit_label: unit_label.to_string(),
        })
    }

    /// "Cubic." or "Non-Cubic."
    pub fn form(&self) -> &'static str {
        match self.uniformity {
            Uniformity::Uniform => "Cubic.",
            Uniformity::NonUniform => "Non-Cubic.",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self.uniformity {
            Uniformity::Uniform => "This is Optimal",
            Uniformity::NonUniform => "Proceed with precaution.",
        }
    }
}

impl fmt::Display for CellStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Cell Dimensions: {:.3} x {:.3} x {:.3} ({})",
            self.spacing.x, self.spacing.y, self.spacing.z, self.unit_label
        )?;
        writeln!(f, "Geometry form: {}", self.form())?;
        write!(f, "{}", self.advice())
    }
}
