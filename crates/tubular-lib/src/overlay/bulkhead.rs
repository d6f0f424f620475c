//! Transverse bulkheads: solid plates closing the member at given positions.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{FILLET_WELD_DIFFICULTY, NODE_TOLERANCE};
use crate::error::{Error, Result};
use crate::grid::MemberGrid;
use crate::inertia::Inertia;
use crate::integrator::ComponentMass;
use crate::manufacturing::{plasma_cutting_minutes, welding_minutes, CostRates, WeldKind};
use crate::material::SectionMaterial;
use crate::overlay::ghost::GhostRegion;
use crate::registry::SectionRegistry;
use crate::section::{CrossSection, SectionKind, SectionShape};

/// One bulkhead request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulkheadSpec {
    /// Axial position of the plate centre.
    pub position: f64,
    /// Plate thickness (m).
    pub thickness: f64,
}

/// A bulkhead after clamping and placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedBulkhead {
    pub s: f64,
    pub s0: f64,
    pub s1: f64,
    pub thickness: f64,
    /// Outline at the bulkhead position.
    pub shape: SectionShape,
    /// Shell wall thickness at the bulkhead.
    pub wall: f64,
    #[serde(skip)]
    pub material: SectionMaterial,
    #[serde(skip)]
    pub outfitting: f64,
    /// Axial distance from the member base.
    pub z: f64,
}

impl PlacedBulkhead {
    /// Plate outline inside the shell wall.
    fn inner(&self) -> SectionShape {
        match self.shape {
            SectionShape::Circular { diameter } => SectionShape::Circular {
                diameter: (diameter - 2.0 * self.wall).max(0.0),
            },
            SectionShape::Rectangular { side_a, side_b } => SectionShape::Rectangular {
                side_a: (side_a - 2.0 * self.wall).max(0.0),
                side_b: (side_b - 2.0 * self.wall).max(0.0),
            },
        }
    }

    fn plate_area(&self) -> f64 {
        match self.inner() {
            SectionShape::Circular { diameter } => 0.25 * PI * diameter * diameter,
            SectionShape::Rectangular { side_a, side_b } => side_a * side_b,
        }
    }

    /// Length of the plate edge welded to the shell.
    fn perimeter(&self) -> f64 {
        match self.inner() {
            SectionShape::Circular { diameter } => PI * diameter,
            SectionShape::Rectangular { side_a, side_b } => 2.0 * (side_a + side_b),
        }
    }

    pub fn mass(&self) -> f64 {
        self.outfitting * self.material.rho * self.plate_area() * self.thickness
    }

    /// Thin-plate inertia about the plate centroid.
    fn inertia_cg(&self) -> Inertia {
        let m = self.mass();
        match self.inner() {
            SectionShape::Circular { diameter } => {
                let r = 0.5 * diameter;
                let j0 = 0.5 * m * r * r;
                Inertia::diagonal(0.5 * j0, 0.5 * j0, j0)
            }
            SectionShape::Rectangular { side_a, side_b } => {
                let ixx = m * side_b * side_b / 12.0;
                let iyy = m * side_a * side_a / 12.0;
                Inertia::diagonal(ixx, iyy, ixx + iyy)
            }
        }
    }
}

/// All bulkheads placed on a member.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkheadLayout {
    pub bulkheads: Vec<PlacedBulkhead>,
}

impl BulkheadLayout {
    pub fn positions(&self) -> Vec<f64> {
        self.bulkheads.iter().map(|b| b.s).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bulkheads.is_empty()
    }

    /// Mass, cost and inertia of the plates.
    ///
    /// Welding assembly time depends on the mass of the shell each plate is
    /// fitted into, so the shell must be integrated first.
    pub fn mass_properties(&self, shell_mass: f64, rates: &CostRates) -> ComponentMass {
        let count = self.bulkheads.len();
        let mut material_cost = 0.0;
        let mut minutes = 0.0;
        let mut painted_area = 0.0;

        let parts: Vec<(f64, f64, Inertia)> = self
            .bulkheads
            .iter()
            .map(|b| {
                let m = b.mass();
                material_cost += b.material.unit_cost * m;
                minutes += plasma_cutting_minutes(b.perimeter(), b.thickness);
                minutes += welding_minutes(
                    WeldKind::Fillet,
                    FILLET_WELD_DIFFICULTY,
                    count,
                    m + shell_mass,
                    [(b.perimeter(), b.thickness)],
                );
                painted_area += 2.0 * b.plate_area();
                (m, b.z, b.inertia_cg().transported_axially(m, b.z))
            })
            .collect();

        let cost = material_cost + rates.labor * minutes + rates.painting * painted_area;
        ComponentMass::from_parts(parts, cost)
    }
}

/// Insert bulkhead sections into `registry`.
///
/// Positions are clamped into the structural part of the member, and plates
/// touching a ghost boundary are shifted inward so they lie entirely inside.
pub fn place_bulkheads(
    registry: &mut SectionRegistry,
    grid: &MemberGrid,
    specs: &[BulkheadSpec],
    ghost: &GhostRegion,
) -> Result<BulkheadLayout> {
    let mut requests = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        if !(0.0..=1.0).contains(&spec.position) {
            return Err(Error::OutOfRange {
                position: spec.position,
                message: format!("bulkhead {index} lies outside the member"),
            });
        }
        if !spec.thickness.is_finite() || spec.thickness <= 0.0 {
            return Err(Error::InvalidGeometry {
                index,
                message: "bulkhead thickness must be greater than zero".to_string(),
            });
        }
        let s = ghost.clamp(spec.position);
        if (s - spec.position).abs() > NODE_TOLERANCE {
            warn!(
                requested = spec.position,
                placed = s,
                "bulkhead moved inside the structural region"
            );
        }
        requests.push((s, spec.thickness));
    }

    requests.sort_by(|a, b| a.0.total_cmp(&b.0));
    requests.dedup_by(|next, kept| {
        let duplicate = (next.0 - kept.0).abs() <= NODE_TOLERANCE;
        if duplicate {
            warn!(position = kept.0, "duplicate bulkhead ignored");
        }
        duplicate
    });

    let mut layout = BulkheadLayout::default();
    for (s, thickness) in requests {
        let half = 0.5 * thickness / grid.height;
        if 2.0 * half > ghost.end - ghost.start {
            return Err(Error::OutOfRange {
                position: s,
                message: "bulkhead is thicker than the structural region".to_string(),
            });
        }
        let (mut s0, mut s1) = (s - half, s + half);
        if s0 < ghost.start {
            s0 = ghost.start;
            s1 = ghost.start + 2.0 * half;
        }
        if s1 > ghost.end {
            s1 = ghost.end;
            s0 = ghost.end - 2.0 * half;
        }
        let s = 0.5 * (s0 + s1);

        let shape = grid.shape_at(s);
        let outfitting = grid.outfitting_at(s);
        let material = grid.material_at(s);
        let mut dense = material;
        dense.rho *= outfitting;
        registry.insert_section(s0, s1, CrossSection::solid(shape, SectionKind::Bulkhead, &dense))?;

        layout.bulkheads.push(PlacedBulkhead {
            s,
            s0,
            s1,
            thickness,
            shape,
            wall: grid.thickness_at(s),
            material,
            outfitting,
            z: grid.z_at(s),
        });
    }

    debug!(count = layout.bulkheads.len(), "placed bulkheads");
    Ok(layout)
}
