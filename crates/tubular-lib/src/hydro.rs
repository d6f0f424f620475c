//! Hydrostatic properties and added mass of the submerged part of a member.
//!
//! The still water plane is global `z = 0`. Only the structural part of the
//! member (outside any ghost region) displaces water.

use std::f64::consts::PI;

use serde::Serialize;
use tracing::debug;

use crate::constants::{
    ADDED_MASS_ASPECT_RATIO, ADDED_MASS_COEFFICIENT, ADDED_MASS_POINTS, GRAVITY, NODE_TOLERANCE,
};
use crate::frustum::{circular_solid, rectangular_solid, FrustumMoments};
use crate::grid::MemberGrid;
use crate::interp::{linspace, trapz, AkimaSpline};
use crate::overlay::ghost::GhostRegion;
use crate::section::SectionShape;

/// Hydrostatic summary. All zeros when the member is entirely above water.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Hydrostatics {
    /// Submerged axial range.
    pub s_under: [f64; 2],
    pub displacement: f64,
    pub buoyancy_force: f64,
    /// Centre of buoyancy along the axis, from the base joint.
    pub z_cb: f64,
    pub center_of_buoyancy: [f64; 3],
    /// Grid node closest to the centre of buoyancy.
    pub idx_cb: usize,
    pub waterplane_area: f64,
    pub waterplane_inertia: [f64; 2],
    /// Where the axis pierces the water plane, if it does.
    pub waterline_centroid: Option<[f64; 3]>,
    /// Surge, sway, heave, roll, pitch, yaw.
    pub added_mass: [f64; 6],
}

/// Axial range below the water plane, clipped to the structural region.
fn submerged_range(grid: &MemberGrid, ghost: &GhostRegion) -> Option<(f64, f64, Option<f64>)> {
    let z1 = grid.joint1[2];
    let z2 = grid.joint2[2];
    let dz = z2 - z1;

    let (lo, hi, crossing) = if dz.abs() <= f64::EPSILON {
        if z1 >= 0.0 {
            return None;
        }
        (0.0, 1.0, None)
    } else {
        let s_wl = -z1 / dz;
        let crossing = (0.0..=1.0).contains(&s_wl).then_some(s_wl);
        if dz > 0.0 {
            (0.0, s_wl.min(1.0), crossing)
        } else {
            (s_wl.max(0.0), 1.0, crossing)
        }
    };

    let lo = lo.max(ghost.start);
    let hi = hi.min(ghost.end);
    if hi - lo <= NODE_TOLERANCE {
        return None;
    }
    let crossing = crossing.filter(|&s| ghost.contains(s));
    Some((lo, hi, crossing))
}

fn outer_between(grid: &MemberGrid, sa: f64, sb: f64) -> FrustumMoments {
    let dz = grid.z_at(sb) - grid.z_at(sa);
    match (grid.shape_at(sa), grid.shape_at(sb)) {
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

/// Displacement, buoyancy, waterplane and added mass of `grid` in water of
/// `water_density`.
pub fn compute_hydrostatics(
    grid: &MemberGrid,
    ghost: &GhostRegion,
    water_density: f64,
) -> Hydrostatics {
    let Some((lo, hi, crossing)) = submerged_range(grid, ghost) else {
        return Hydrostatics::default();
    };

    let mut points = vec![lo];
    points.extend(
        grid.s
            .iter()
            .copied()
            .filter(|&s| s > lo + NODE_TOLERANCE && s < hi - NODE_TOLERANCE),
    );
    points.push(hi);

    let mut displacement = 0.0;
    let mut moment = 0.0;
    for pair in points.windows(2) {
        let f = outer_between(grid, pair[0], pair[1]);
        displacement += f.volume;
        moment += f.volume * (grid.z_at(pair[0]) + f.z_cg);
    }
    let z_cb = if displacement > 0.0 {
        moment / displacement
    } else {
        grid.z_at(0.5 * (lo + hi))
    };
    let idx_cb = grid
        .z
        .iter()
        .enumerate()
        .min_by(|a, b| (a.1 - z_cb).abs().total_cmp(&(b.1 - z_cb).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let (waterplane_area, waterplane_inertia) = match crossing.map(|s| grid.shape_at(s)) {
        Some(SectionShape::Circular { diameter }) => {
            let r = 0.5 * diameter;
            let i = 0.25 * PI * r.powi(4);
            (PI * r * r, [i, i])
        }
        Some(SectionShape::Rectangular { side_a, side_b }) => (
            side_a * side_b,
            [side_a * side_b.powi(3) / 12.0, side_b * side_a.powi(3) / 12.0],
        ),
        None => (0.0, [0.0, 0.0]),
    };

    let samples = linspace(lo, hi, ADDED_MASS_POINTS);
    let z: Vec<f64> = samples.iter().map(|&s| grid.z_at(s)).collect();
    let shapes: Vec<SectionShape> = samples.iter().map(|&s| grid.shape_at(s)).collect();
    let rho = water_density;

    let added_mass = if grid.is_circular() {
        let r: Vec<f64> = shapes.iter().map(SectionShape::rigid_radius).collect();
        let lever: Vec<f64> = z
            .iter()
            .zip(&r)
            .map(|(zi, ri)| (zi - z_cb).powi(2) * ri * ri)
            .collect();
        let rotation = PI * rho * trapz(&lever, &z);
        // Waterline diameter, or the widest submerged one when fully under.
        let heave_diameter = match crossing {
            Some(s) => 2.0 * grid.shape_at(s).rigid_radius(),
            None => 2.0 * r.iter().copied().fold(0.0, f64::max),
        };
        [
            rho * displacement,
            rho * displacement,
            rho * heave_diameter.powi(3) / 6.0,
            rotation,
            rotation,
            0.0,
        ]
    } else {
        // Added mass coefficient against the section aspect ratio.
        let spline = AkimaSpline::new(&ADDED_MASS_ASPECT_RATIO, &ADDED_MASS_COEFFICIENT);
        let sides: Vec<(f64, f64)> = shapes
            .iter()
            .map(|shape| match *shape {
                SectionShape::Rectangular { side_a, side_b } => (side_a, side_b),
                SectionShape::Circular { diameter } => (diameter, diameter),
            })
            .collect();
        let per_length = |f: &dyn Fn(f64, f64, f64) -> f64| -> f64 {
            let values: Vec<f64> = sides.iter().zip(&z).map(|(&(a, b), &zi)| f(a, b, zi)).collect();
            trapz(&values, &z)
        };
        let surge = per_length(&|a, b, _| {
            rho * spline.eval(a / b) * 0.25 * PI * b * b
        });
        let sway = per_length(&|a, b, _| {
            rho * spline.eval(b / a) * 0.25 * PI * a * a
        });
        let rotation = per_length(&|a, b, zi| rho * (zi - z_cb).powi(2) * a * b);
        let yaw = per_length(&|a, b, _| rho * PI * (a * a - b * b).powi(2) / 8.0);
        [surge, sway, 0.0, rotation, rotation, yaw]
    };

    debug!(displacement, z_cb, "computed hydrostatics");

    Hydrostatics {
        s_under: [lo, hi],
        displacement,
        buoyancy_force: rho * GRAVITY * displacement,
        z_cb,
        center_of_buoyancy: grid.point_at(z_cb / grid.height),
        idx_cb,
        waterplane_area,
        waterplane_inertia,
        waterline_centroid: crossing.map(|s| grid.point_at(s)),
        added_mass,
    }
}
