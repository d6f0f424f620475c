//! Cross-section value type.
//!
//! A [`CrossSection`] describes the structural properties of one axial
//! interval. Circular and rectangular members share every non-geometric field;
//! only the outer dimensions and the area/inertia formulas differ, so the shape
//! is a tagged variant rather than a trait object.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::{GHOST_PROPERTY, GHOST_STIFFNESS_SCALE};
use crate::material::SectionMaterial;

/// Outer dimensions of a section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SectionShape {
    Circular { diameter: f64 },
    Rectangular { side_a: f64, side_b: f64 },
}

impl SectionShape {
    /// Smallest outer dimension.
    pub fn min_dimension(&self) -> f64 {
        match *self {
            SectionShape::Circular { diameter } => diameter,
            SectionShape::Rectangular { side_a, side_b } => side_a.min(side_b),
        }
    }

    /// Radius of the smallest circle enclosing the outline in its principal directions.
    pub fn rigid_radius(&self) -> f64 {
        match *self {
            SectionShape::Circular { diameter } => 0.5 * diameter,
            SectionShape::Rectangular { side_a, side_b } => 0.5 * side_a.max(side_b),
        }
    }

    fn ghost(&self) -> Self {
        match self {
            SectionShape::Circular { .. } => SectionShape::Circular {
                diameter: GHOST_PROPERTY,
            },
            SectionShape::Rectangular { .. } => SectionShape::Rectangular {
                side_a: GHOST_PROPERTY,
                side_b: GHOST_PROPERTY,
            },
        }
    }
}

/// Which overlay produced a section. Used to report overwritten features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Shell,
    Bulkhead,
    RingStiffener,
    Ghost,
}

/// Area and second moments of an outline, independent of material.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaProperties {
    pub area: f64,
    pub shear_area_x: f64,
    pub shear_area_y: f64,
    pub ixx: f64,
    pub iyy: f64,
    pub j0: f64,
    pub torsion_constant: f64,
}

impl AreaProperties {
    /// Thin or thick circular tube of outer diameter `d` and wall `t`.
    ///
    /// `t = d / 2` gives a solid disk.
    pub fn tube(d: f64, t: f64) -> Self {
        let ro = 0.5 * d;
        let ri = (ro - t).max(0.0);
        let area = PI * (ro * ro - ri * ri);
        let ixx = 0.25 * PI * (ro.powi(4) - ri.powi(4));
        let j0 = 2.0 * ixx;
        // Timoshenko shear area of a hollow circle.
        let q = if ro > 0.0 { ri / ro } else { 0.0 };
        let shear = area / (0.54414 + 2.97294 * q - 1.51899 * q * q);
        Self {
            area,
            shear_area_x: shear,
            shear_area_y: shear,
            ixx,
            iyy: ixx,
            j0,
            torsion_constant: if ro > 0.0 { j0 / ro } else { 0.0 },
        }
    }

    /// Rectangular box of outer sides `a` (along x) and `b` (along y) with wall `t`.
    ///
    /// `t >= min(a, b) / 2` gives a solid plate.
    pub fn rectangle(a: f64, b: f64, t: f64) -> Self {
        let ai = (a - 2.0 * t).max(0.0);
        let bi = (b - 2.0 * t).max(0.0);
        let area = a * b - ai * bi;
        let ixx = (a * b.powi(3) - ai * bi.powi(3)) / 12.0;
        let iyy = (b * a.powi(3) - bi * ai.powi(3)) / 12.0;
        let tw = t.min(0.5 * a.min(b));
        let am = (a - tw) * (b - tw);
        let torsion = if ai > 0.0 && bi > 0.0 {
            4.0 * am * am * tw / (2.0 * (a - tw) + 2.0 * (b - tw))
        } else {
            // Solid section: Saint-Venant approximation.
            let (long, short) = if a >= b { (a, b) } else { (b, a) };
            long * short.powi(3) * (1.0 / 3.0 - 0.21 * short / long * (1.0 - short.powi(4) / (12.0 * long.powi(4))))
        };
        Self {
            area,
            shear_area_x: (2.0 * a * tw).min(area),
            shear_area_y: (2.0 * b * tw).min(area),
            ixx,
            iyy,
            j0: ixx + iyy,
            torsion_constant: torsion,
        }
    }

    /// Outline properties for `shape` with wall thickness `t`.
    pub fn for_shape(shape: SectionShape, t: f64) -> Self {
        match shape {
            SectionShape::Circular { diameter } => Self::tube(diameter, t),
            SectionShape::Rectangular { side_a, side_b } => Self::rectangle(side_a, side_b, t),
        }
    }

    /// Sum of two outlines, keeping the first one's torsion constant.
    pub fn combine(self, other: Self) -> Self {
        Self {
            area: self.area + other.area,
            shear_area_x: self.shear_area_x + other.shear_area_x,
            shear_area_y: self.shear_area_y + other.shear_area_y,
            ixx: self.ixx + other.ixx,
            iyy: self.iyy + other.iyy,
            j0: self.j0 + other.j0,
            torsion_constant: self.torsion_constant,
        }
    }

    /// Every property multiplied by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            area: self.area * factor,
            shear_area_x: self.shear_area_x * factor,
            shear_area_y: self.shear_area_y * factor,
            ixx: self.ixx * factor,
            iyy: self.iyy * factor,
            j0: self.j0 * factor,
            torsion_constant: self.torsion_constant * factor,
        }
    }
}

/// Structural properties of one axial interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub shape: SectionShape,
    pub kind: SectionKind,
    /// Wall thickness (m).
    pub t: f64,
    #[serde(flatten)]
    pub properties: AreaProperties,
    /// Young's modulus (Pa).
    pub e: f64,
    /// Shear modulus (Pa).
    pub g: f64,
    /// Density (kg/m^3).
    pub rho: f64,
    /// Yield stress (Pa).
    pub sigma_y: f64,
}

impl CrossSection {
    /// Assemble a section from an outline and a material.
    pub fn new(
        shape: SectionShape,
        kind: SectionKind,
        t: f64,
        properties: AreaProperties,
        material: &SectionMaterial,
    ) -> Self {
        Self {
            shape,
            kind,
            t,
            properties,
            e: material.e,
            g: material.g,
            rho: material.rho,
            sigma_y: material.sigma_y,
        }
    }

    /// Hollow shell section of `shape` with wall `t`.
    pub fn shell(shape: SectionShape, t: f64, material: &SectionMaterial) -> Self {
        Self::new(
            shape,
            SectionKind::Shell,
            t,
            AreaProperties::for_shape(shape, t),
            material,
        )
    }

    /// Solid disk (circular) or solid plate (rectangular) filling the outline.
    pub fn solid(shape: SectionShape, kind: SectionKind, material: &SectionMaterial) -> Self {
        let t = match shape {
            SectionShape::Circular { diameter } => 0.5 * diameter,
            SectionShape::Rectangular { side_a, side_b } => 0.5 * side_a.min(side_b),
        };
        Self::new(shape, kind, t, AreaProperties::for_shape(shape, t), material)
    }

    pub fn area(&self) -> f64 {
        self.properties.area
    }

    pub fn is_ghost(&self) -> bool {
        self.kind == SectionKind::Ghost
    }

    /// Near-inert placeholder with the same shape variant.
    ///
    /// Geometry and density collapse to [`GHOST_PROPERTY`] while modulus and
    /// yield stress grow by [`GHOST_STIFFNESS_SCALE`].
    pub fn ghost(&self) -> Self {
        Self {
            shape: self.shape.ghost(),
            kind: SectionKind::Ghost,
            t: GHOST_PROPERTY,
            properties: AreaProperties {
                area: GHOST_PROPERTY,
                shear_area_x: GHOST_PROPERTY,
                shear_area_y: GHOST_PROPERTY,
                ixx: GHOST_PROPERTY,
                iyy: GHOST_PROPERTY,
                j0: GHOST_PROPERTY,
                torsion_constant: self.properties.torsion_constant,
            },
            e: self.e * GHOST_STIFFNESS_SCALE,
            g: self.g * GHOST_STIFFNESS_SCALE,
            rho: GHOST_PROPERTY,
            sigma_y: self.sigma_y * GHOST_STIFFNESS_SCALE,
        }
    }
}
