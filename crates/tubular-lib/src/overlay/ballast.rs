//! Permanent and variable ballast held inside the shell cavity.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{BALLAST_POINTS, EPSILON, NODE_TOLERANCE};
use crate::error::{Error, Result};
use crate::frustum::{circular_solid, rectangular_solid, FrustumMoments};
use crate::grid::MemberGrid;
use crate::inertia::Inertia;
use crate::integrator::ComponentMass;
use crate::interp::{interp, linspace};
use crate::material::MaterialCatalog;
use crate::overlay::ghost::GhostRegion;
use crate::registry::SectionRegistry;
use crate::section::SectionShape;

/// A ballast compartment between two axial positions.
///
/// Positions are measured from the start of the structural region. A zero
/// `volume` marks the compartment as variable (pumped) ballast, for which only
/// the capacity curve is reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallastSpec {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub material: String,
    /// Fixed ballast volume (m^3).
    #[serde(default)]
    pub volume: f64,
}

/// What one compartment ended up holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BallastSegment {
    pub start: f64,
    pub end: f64,
    /// Top of the fill; equal to `start` for variable ballast.
    pub fill_end: f64,
    pub material: String,
    pub density: f64,
    pub volume: f64,
    /// Cavity volume between `start` and `end`.
    pub capacity: f64,
    /// Requested over available volume; above one the request does not fit.
    pub capacity_ratio: f64,
    pub mass: f64,
    pub z_cg: f64,
    pub variable: bool,
    /// Cumulative cavity volume at each point of `position_curve`.
    pub volume_curve: Vec<f64>,
    pub position_curve: Vec<f64>,
}

impl BallastSegment {
    /// Axial extent of the fill.
    pub fn fill_height(&self) -> f64 {
        self.fill_end - self.start
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BallastReport {
    pub segments: Vec<BallastSegment>,
    pub component: ComponentMass,
}

impl BallastReport {
    pub fn max_capacity_ratio(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.capacity_ratio)
            .fold(0.0, f64::max)
    }

    /// Total cavity volume available to variable ballast.
    pub fn variable_capacity(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.variable)
            .map(|s| s.capacity)
            .sum()
    }
}

/// Outline of the cavity inside the wall at `s`.
fn cavity(grid: &MemberGrid, s: f64) -> SectionShape {
    let t = grid.thickness_at(s);
    match grid.shape_at(s) {
        SectionShape::Circular { diameter } => SectionShape::Circular {
            diameter: (diameter - 2.0 * t).max(0.0),
        },
        SectionShape::Rectangular { side_a, side_b } => SectionShape::Rectangular {
            side_a: (side_a - 2.0 * t).max(0.0),
            side_b: (side_b - 2.0 * t).max(0.0),
        },
    }
}

fn cavity_between(grid: &MemberGrid, sa: f64, sb: f64) -> FrustumMoments {
    let dz = grid.z_at(sb) - grid.z_at(sa);
    match (cavity(grid, sa), cavity(grid, sb)) {
        (SectionShape::Circular { diameter: da }, SectionShape::Circular { diameter: db }) => {
            circular_solid(0.5 * da, 0.5 * db, dz)
        }
        (
            SectionShape::Rectangular {
                side_a: aa,
                side_b: ba,
            },
            SectionShape::Rectangular {
                side_a: ab,
                side_b: bb,
            },
        ) => rectangular_solid(aa, ba, ab, bb, dz),
        _ => FrustumMoments::default(),
    }
}

fn cumulative_volume(grid: &MemberGrid, points: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    let mut curve = Vec::with_capacity(points.len());
    curve.push(0.0);
    for pair in points.windows(2) {
        total += cavity_between(grid, pair[0], pair[1]).volume;
        curve.push(total);
    }
    curve
}

fn validate(spec: &BallastSpec, index: usize) -> Result<()> {
    if !(0.0..=1.0).contains(&spec.start) || !(0.0..=1.0).contains(&spec.end) {
        return Err(Error::OutOfRange {
            position: if (0.0..=1.0).contains(&spec.start) {
                spec.end
            } else {
                spec.start
            },
            message: format!("ballast segment {index} lies outside the member"),
        });
    }
    if spec.end <= spec.start {
        return Err(Error::OutOfRange {
            position: spec.end,
            message: format!("ballast segment {index} ends before it starts"),
        });
    }
    if !spec.volume.is_finite() || spec.volume < 0.0 {
        return Err(Error::MemberDefinition {
            message: format!("ballast segment {index} volume must be non-negative"),
        });
    }
    Ok(())
}

/// Fill the ballast compartments and return a registry with the ballast mass
/// smeared into the section densities.
///
/// The input registry is left untouched and no boundaries are added: only
/// intervals lying wholly inside a compartment carry its density. Fixed
/// ballast fills its compartment from the bottom; a request larger than the
/// cavity is reported through [`BallastSegment::capacity_ratio`] rather than
/// rejected.
pub fn apply_ballast(
    registry: &SectionRegistry,
    grid: &MemberGrid,
    specs: &[BallastSpec],
    catalog: &MaterialCatalog,
    water_density: f64,
    ghost: &GhostRegion,
) -> Result<(SectionRegistry, BallastReport)> {
    let mut ballasted = registry.clone();
    let mut report = BallastReport::default();
    let mut parts = Vec::with_capacity(specs.len());
    let mut cost = 0.0;

    for (index, spec) in specs.iter().enumerate() {
        validate(spec, index)?;
        let (density, unit_cost) = catalog.ballast_properties(&spec.material, water_density)?;

        let s0 = (spec.start + ghost.start).min(ghost.end);
        let s1 = (spec.end + ghost.start).min(ghost.end);
        let points = linspace(s0, s1, BALLAST_POINTS);
        let curve = cumulative_volume(grid, &points);
        let capacity = curve.last().copied().unwrap_or(0.0);

        if spec.volume <= 0.0 {
            report.segments.push(BallastSegment {
                start: s0,
                end: s1,
                fill_end: s0,
                material: spec.material.clone(),
                density,
                volume: 0.0,
                capacity,
                capacity_ratio: 0.0,
                mass: 0.0,
                z_cg: grid.z_at(s0),
                variable: true,
                volume_curve: curve,
                position_curve: points,
            });
            continue;
        }

        let capacity_ratio = spec.volume / capacity.max(EPSILON);
        if capacity_ratio > 1.0 {
            warn!(
                segment = index,
                requested = spec.volume,
                capacity,
                "ballast volume exceeds compartment capacity"
            );
        }
        let fill_end = if spec.volume >= capacity {
            s1
        } else {
            interp(spec.volume, &curve, &points)
        };

        let mass = density * spec.volume;
        let fill_points = linspace(s0, fill_end, BALLAST_POINTS);
        let slices: Vec<(f64, FrustumMoments)> = fill_points
            .windows(2)
            .filter(|pair| pair[1] - pair[0] > NODE_TOLERANCE)
            .map(|pair| (grid.z_at(pair[0]), cavity_between(grid, pair[0], pair[1])))
            .collect();
        let filled: f64 = slices.iter().map(|(_, f)| f.volume).sum();

        let (z_cg, inertia) = if filled > 0.0 {
            let moment: f64 = slices.iter().map(|(z, f)| f.volume * (z + f.z_cg)).sum();
            let inertia: Inertia = slices
                .iter()
                .map(|(z, f)| {
                    Inertia::diagonal(f.ixx, f.iyy, f.izz)
                        .scaled(density)
                        .transported_axially(density * f.volume, z + f.z_cg)
                })
                .sum();
            (moment / filled, inertia.scaled(spec.volume / filled))
        } else {
            let z = grid.z_at(s0);
            (z, Inertia::default().transported_axially(mass, z))
        };

        // Smear the mass over the intervals already inside the compartment.
        let height = grid.z_at(s1) - grid.z_at(s0);
        if height > 0.0 {
            let touched = ballasted.update_within(s0, s1, |section| {
                if !section.is_ghost() && section.area() > 0.0 {
                    section.rho += mass / (section.area() * height);
                }
            });
            if touched == 0 {
                debug!(
                    segment = index,
                    "no section lies inside the ballast compartment"
                );
            }
        }

        cost += unit_cost * mass;
        parts.push((mass, z_cg, inertia));
        report.segments.push(BallastSegment {
            start: s0,
            end: s1,
            fill_end,
            material: spec.material.clone(),
            density,
            volume: spec.volume,
            capacity,
            capacity_ratio,
            mass,
            z_cg,
            variable: false,
            volume_curve: curve,
            position_curve: points,
        });
    }

    report.component = ComponentMass::from_parts(parts, cost);
    debug!(
        segments = report.segments.len(),
        mass = report.component.mass,
        "applied ballast"
    );
    Ok((ballasted, report))
}
