//! Mass, cost and inertia integration.
//!
//! The shell is integrated interval by interval over the final registry
//! keys, using the refined grid for the outer profile and wall so that
//! feature sections (bulkheads, rings) do not double count shell steel. The
//! roll-up then combines the shell with the feature components.

use std::f64::consts::PI;

use serde::Serialize;
use tracing::debug;

use crate::constants::{BUTT_WELD_DIFFICULTY, FILLET_WELD_DIFFICULTY};
use crate::error::Result;
use crate::frustum::{circular_shell, rectangular_shell};
use crate::grid::MemberGrid;
use crate::inertia::Inertia;
use crate::manufacturing::{
    plasma_cutting_minutes, rolling_difficulty, rolling_minutes, welding_minutes, CostBreakdown,
    CostRates, WeldKind,
};
use crate::overlay::shell::{AxialStiffenerSpec, SmearedStiffeners};
use crate::registry::SectionRegistry;
use crate::section::SectionShape;

/// Mass, cost, centre of gravity and base inertia of a group of parts.
///
/// `z_cg` is measured from the member base along the axis and
/// `inertia_base` is taken about the base joint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ComponentMass {
    pub mass: f64,
    pub cost: f64,
    pub z_cg: f64,
    pub inertia_base: Inertia,
}

impl ComponentMass {
    /// Combine `(mass, z_cg, inertia about the base)` parts.
    pub fn from_parts<I>(parts: I, cost: f64) -> Self
    where
        I: IntoIterator<Item = (f64, f64, Inertia)>,
    {
        let mut mass = 0.0;
        let mut moment = 0.0;
        let mut inertia_base = Inertia::default();
        for (m, z, inertia) in parts {
            mass += m;
            moment += m * z;
            inertia_base += inertia;
        }
        Self {
            mass,
            cost,
            z_cg: if mass > 0.0 { moment / mass } else { 0.0 },
            inertia_base,
        }
    }

    /// Scale mass and inertia, keeping cost and centre of gravity.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            mass: self.mass * factor,
            inertia_base: self.inertia_base.scaled(factor),
            ..self
        }
    }
}

/// Integrated shell with its fabrication estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShellReport {
    pub component: ComponentMass,
    pub costs: CostBreakdown,
    pub labor_hours: f64,
    /// Mass carried by ghost intervals.
    pub ghost_mass: f64,
    /// Factor applied to match a user-supplied shell mass (1 when none).
    pub mass_scale: f64,
}

#[derive(Default)]
struct Fabrication {
    bare_mass: Vec<f64>,
    cutting: f64,
    rolling: f64,
    long_seams: Vec<(f64, f64)>,
    circumferential_seams: Vec<(f64, f64)>,
    painted_area: f64,
}

/// Integrate shell mass, inertia and fabrication cost over `registry`.
///
/// Ghost intervals contribute their placeholder mass as point masses and no
/// fabrication cost. `shell_mass_user`, when positive, rescales the
/// integrated mass and inertia.
pub fn integrate_shell(
    grid: &MemberGrid,
    registry: &SectionRegistry,
    axial: Option<&AxialStiffenerSpec>,
    rates: &CostRates,
    shell_mass_user: Option<f64>,
) -> Result<ShellReport> {
    let mut parts = Vec::with_capacity(registry.interval_count());
    let mut costs = CostBreakdown::default();
    let mut fab = Fabrication::default();
    let mut ghost_mass = 0.0;

    for (k, (s0, s1, section)) in registry.intervals().enumerate() {
        let z0 = grid.z_at(s0);
        let h = grid.z_at(s1) - z0;
        let mid = 0.5 * (s0 + s1);

        if section.is_ghost() {
            let m = section.rho * section.area() * h;
            let z = z0 + 0.5 * h;
            ghost_mass += m;
            parts.push((m, z, Inertia::default().transported_axially(m, z)));
            continue;
        }

        let t = grid.thickness_at(mid);
        let material = grid.material_at(mid);
        let coeff = grid.outfitting_at(mid);
        let density = coeff * material.rho;

        let (frustum, smeared) = match grid.shape_at(s0) {
            SectionShape::Circular { diameter: d0 } => {
                let d1 = grid.shape_at(s1).min_dimension();
                let (rb, rt) = (0.5 * d0, 0.5 * d1);
                let r_ave = 0.5 * (rb + rt);
                let smeared = match axial {
                    Some(spec) => spec.smeared(r_ave, t, k)?,
                    None => SmearedStiffeners::default(),
                };

                let cut = 2.0 * ((rt - rb).powi(2) + h * h).sqrt();
                let taper = rb.min(rt) / rb.max(rt);
                fab.cutting += plasma_cutting_minutes(cut, t);
                fab.rolling += rolling_minutes(rolling_difficulty(taper), r_ave, t);
                fab.long_seams.push((cut, t));
                if !fab.bare_mass.is_empty() {
                    fab.circumferential_seams.push((2.0 * PI * rb, t));
                }
                fab.painted_area += 2.0 * PI * r_ave * h;
                (circular_shell(rb, rt, t, h), smeared)
            }
            SectionShape::Rectangular {
                side_a: a0,
                side_b: b0,
            } => {
                let (a1, b1) = match grid.shape_at(s1) {
                    SectionShape::Rectangular { side_a, side_b } => (side_a, side_b),
                    SectionShape::Circular { diameter } => (diameter, diameter),
                };
                let cut = 8.0 * ((0.5 * (a0 - a1)).powi(2) + (0.5 * (b0 - b1)).powi(2) + h * h).sqrt();
                fab.cutting += plasma_cutting_minutes(cut, t);
                fab.long_seams.push((2.0 * cut, t));
                if !fab.bare_mass.is_empty() {
                    fab.circumferential_seams.push((2.0 * (a0 + b0), t));
                }
                fab.painted_area += (a0 + a1 + b0 + b1) * h;
                (
                    rectangular_shell(a0, b0, a1, b1, t, h),
                    SmearedStiffeners::default(),
                )
            }
        };

        let bare = material.rho * frustum.volume;
        fab.bare_mass.push(bare);
        costs.add_section(bare, material.unit_cost, coeff);

        let mass = density * (frustum.volume + smeared.area * h);
        let stiffener_bending = h * smeared.ixx;
        let inertia_cg = Inertia::diagonal(
            frustum.ixx + stiffener_bending,
            frustum.iyy + stiffener_bending,
            frustum.izz + h * smeared.izz,
        )
        .scaled(density);
        let z = z0 + frustum.z_cg;
        parts.push((mass, z, inertia_cg.transported_axially(mass, z)));
    }

    let pieces = fab.bare_mass.len();
    let steel: f64 = fab.bare_mass.iter().sum();
    let mut minutes = fab.cutting + fab.rolling;
    minutes += if grid.is_circular() {
        welding_minutes(WeldKind::Butt, BUTT_WELD_DIFFICULTY, pieces, steel, fab.long_seams)
    } else {
        welding_minutes(WeldKind::Fillet, FILLET_WELD_DIFFICULTY, pieces, steel, fab.long_seams)
    };
    minutes += welding_minutes(
        WeldKind::Butt,
        BUTT_WELD_DIFFICULTY,
        pieces,
        steel,
        fab.circumferential_seams,
    );

    costs.labor = rates.labor * minutes;
    // Inside and outside, two coats.
    costs.painting = rates.painting * 2.0 * 2.0 * fab.painted_area;
    let costs = costs.with_capital_share();

    let mut component = ComponentMass::from_parts(parts, costs.total());
    let mut mass_scale = 1.0;
    if let Some(target) = shell_mass_user.filter(|m| *m > 0.0) {
        if component.mass > 0.0 {
            mass_scale = target / component.mass;
            component = component.scaled(mass_scale);
        }
    }

    debug!(
        mass = component.mass,
        cost = component.cost,
        minutes,
        "integrated shell"
    );

    Ok(ShellReport {
        component,
        costs,
        labor_hours: minutes / 60.0,
        ghost_mass,
        mass_scale,
    })
}

/// Member totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MassSummary {
    pub shell: ComponentMass,
    pub bulkheads: ComponentMass,
    pub ring_stiffeners: ComponentMass,
    pub ballast: ComponentMass,
    pub total_mass: f64,
    pub total_cost: f64,
    /// Everything except ballast.
    pub structural_mass: f64,
    pub structural_cost: f64,
    /// Centre of gravity along the axis, from the base joint.
    pub z_cg: f64,
    /// Centre of gravity in global coordinates.
    pub center_of_mass: [f64; 3],
    pub inertia_base: Inertia,
    /// Inertia about the centre of gravity.
    pub inertia_total: Inertia,
    /// Factor applied to match a user-supplied total mass (1 when none).
    pub mass_scale: f64,
}

/// Combine the components into member totals.
///
/// A positive `total_mass_user` rescales every component's mass and inertia
/// so the total matches it.
pub fn roll_up(
    grid: &MemberGrid,
    shell: ComponentMass,
    bulkheads: ComponentMass,
    ring_stiffeners: ComponentMass,
    ballast: ComponentMass,
    total_mass_user: Option<f64>,
) -> MassSummary {
    let mut components = [shell, bulkheads, ring_stiffeners, ballast];
    let raw_mass: f64 = components.iter().map(|c| c.mass).sum();

    let mut mass_scale = 1.0;
    if let Some(target) = total_mass_user.filter(|m| *m > 0.0) {
        if raw_mass > 0.0 {
            mass_scale = target / raw_mass;
            components = components.map(|c| c.scaled(mass_scale));
        }
    }

    let combined = ComponentMass::from_parts(
        components.iter().map(|c| (c.mass, c.z_cg, c.inertia_base)),
        components.iter().map(|c| c.cost).sum(),
    );
    let z_cg = combined.z_cg;
    let mut inertia_total = combined.inertia_base;
    inertia_total.xx -= combined.mass * z_cg * z_cg;
    inertia_total.yy -= combined.mass * z_cg * z_cg;

    let [shell, bulkheads, ring_stiffeners, ballast] = components;
    MassSummary {
        shell,
        bulkheads,
        ring_stiffeners,
        ballast,
        total_mass: combined.mass,
        total_cost: combined.cost,
        structural_mass: combined.mass - ballast.mass,
        structural_cost: combined.cost - ballast.cost,
        z_cg,
        center_of_mass: grid.point_at(z_cg / grid.height),
        inertia_base: combined.inertia_base,
        inertia_total,
        mass_scale,
    }
}
