//! Ring stiffeners: T-section frames welded inside circular shells.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{FILLET_WELD_DIFFICULTY, MAX_SECTIONS, NULL_SENTINEL};
use crate::error::{Error, Result};
use crate::grid::MemberGrid;
use crate::inertia::Inertia;
use crate::integrator::ComponentMass;
use crate::manufacturing::{plasma_cutting_minutes, welding_minutes, CostRates, WeldKind};
use crate::material::SectionMaterial;
use crate::overlay::ghost::GhostRegion;
use crate::registry::SectionRegistry;
use crate::section::{AreaProperties, CrossSection, SectionKind, SectionShape};

/// Ring stiffener geometry, repeated at a constant pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingStiffenerSpec {
    pub web_height: f64,
    pub web_thickness: f64,
    pub flange_width: f64,
    pub flange_thickness: f64,
    /// Non-dimensional pitch along the member.
    pub spacing: f64,
}

impl RingStiffenerSpec {
    fn validate(&self) -> Result<()> {
        let fields = [
            (self.web_height, "web_height"),
            (self.web_thickness, "web_thickness"),
            (self.flange_width, "flange_width"),
            (self.flange_thickness, "flange_thickness"),
        ];
        for (value, field) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::MemberDefinition {
                    message: format!("ring stiffener {field} must be greater than zero"),
                });
            }
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 || self.spacing > 1.0 {
            return Err(Error::OutOfRange {
                position: self.spacing,
                message: "ring stiffener spacing must lie in (0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

/// One ring at its final position, with its frame radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedRing {
    pub s: f64,
    pub s0: f64,
    pub s1: f64,
    pub z: f64,
    pub outer_radius: f64,
    pub wall: f64,
    pub r_web_outer: f64,
    pub r_web_inner: f64,
    pub r_flange_outer: f64,
    pub r_flange_inner: f64,
    #[serde(skip)]
    pub material: SectionMaterial,
}

impl PlacedRing {
    fn web_volume(&self, spec: &RingStiffenerSpec) -> f64 {
        PI * (self.r_web_outer.powi(2) - self.r_web_inner.powi(2)) * spec.web_thickness
    }

    fn flange_volume(&self, spec: &RingStiffenerSpec) -> f64 {
        PI * (self.r_flange_outer.powi(2) - self.r_flange_inner.powi(2)) * spec.flange_width
    }

    /// Centroidal inertia of the frame, web and flange taken as separate
    /// annular cylinders.
    pub fn inertia(&self, spec: &RingStiffenerSpec) -> Inertia {
        let rho = self.material.rho;
        annulus_inertia(
            self.r_web_inner,
            self.r_web_outer,
            spec.web_thickness,
            rho * self.web_volume(spec),
        ) + annulus_inertia(
            self.r_flange_inner,
            self.r_flange_outer,
            spec.flange_width,
            rho * self.flange_volume(spec),
        )
    }

    fn painted_area(&self, spec: &RingStiffenerSpec) -> f64 {
        2.0 * 2.0
            * PI
            * (self.r_web_outer.powi(2) - self.r_web_inner.powi(2)
                + 0.5
                    * (self.r_flange_outer + self.r_flange_inner)
                    * (2.0 * spec.flange_width + 2.0 * spec.flange_thickness)
                - self.r_flange_outer * spec.web_thickness)
    }
}

/// Thick annular cylinder of height `h` about its own centroid.
fn annulus_inertia(ri: f64, ro: f64, h: f64, m: f64) -> Inertia {
    let radial = ri * ri + ro * ro;
    let bending = m / 12.0 * (3.0 * radial + h * h);
    Inertia::diagonal(bending, bending, 0.5 * m * radial)
}

/// Buckling and proportion checks on the ring geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StiffenerConstraints {
    /// Flange width over half the ring spacing.
    pub flange_spacing_ratio: f64,
    /// Frame depth over outer radius per ring, padded with the null sentinel.
    pub stiffener_radius_ratio: Vec<f64>,
    pub flange_compactness: f64,
    pub web_compactness: f64,
}

impl Default for StiffenerConstraints {
    fn default() -> Self {
        Self {
            flange_spacing_ratio: 0.0,
            stiffener_radius_ratio: vec![NULL_SENTINEL; MAX_SECTIONS],
            flange_compactness: 0.0,
            web_compactness: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RingLayout {
    pub spec: Option<RingStiffenerSpec>,
    pub rings: Vec<PlacedRing>,
    pub constraints: StiffenerConstraints,
}

impl RingLayout {
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Mass, cost and inertia of the frames.
    pub fn mass_properties(&self, shell_mass: f64, rates: &CostRates) -> ComponentMass {
        let Some(spec) = self.spec else {
            return ComponentMass::default();
        };

        let mut material_cost = 0.0;
        let mut minutes = 0.0;
        let mut painted_area = 0.0;
        let mut web_cut = 0.0;
        let mut flange_cut = 0.0;

        let parts: Vec<(f64, f64, Inertia)> = self
            .rings
            .iter()
            .map(|ring| {
                let m = ring.material.rho * (ring.web_volume(&spec) + ring.flange_volume(&spec));
                material_cost += ring.material.unit_cost * m;
                web_cut += PI * (ring.r_web_outer + ring.r_web_inner);
                flange_cut += 2.0 * PI * ring.r_flange_outer;
                // Flange to web, then frame to shell.
                minutes += welding_minutes(
                    WeldKind::Fillet,
                    FILLET_WELD_DIFFICULTY,
                    1,
                    m,
                    [(2.0 * PI * ring.r_flange_outer, spec.web_thickness)],
                );
                minutes += welding_minutes(
                    WeldKind::Fillet,
                    FILLET_WELD_DIFFICULTY,
                    1,
                    m + shell_mass,
                    [(2.0 * PI * ring.r_web_outer, spec.web_thickness)],
                );
                painted_area += ring.painted_area(&spec);

                (m, ring.z, ring.inertia(&spec).transported_axially(m, ring.z))
            })
            .collect();

        minutes += plasma_cutting_minutes(web_cut, spec.web_thickness);
        minutes += plasma_cutting_minutes(flange_cut, spec.flange_thickness);
        let cost = material_cost + rates.labor * minutes + rates.painting * painted_area;
        ComponentMass::from_parts(parts, cost)
    }
}

/// Insert ring stiffener sections at a regular pitch.
///
/// Rings that would land on a bulkhead are moved towards the base until they
/// clear it. Only circular members carry rings.
pub fn place_ring_stiffeners(
    registry: &mut SectionRegistry,
    grid: &MemberGrid,
    spec: &RingStiffenerSpec,
    bulkheads: &[f64],
    ghost: &GhostRegion,
) -> Result<RingLayout> {
    spec.validate()?;
    if !grid.is_circular() {
        warn!("ring stiffeners are only supported on circular members; ignoring them");
        return Ok(RingLayout::default());
    }

    let width = spec.flange_width / grid.height;
    let count = (1.0 / spec.spacing).floor() as usize;
    let mut layout = RingLayout {
        spec: Some(*spec),
        ..RingLayout::default()
    };

    let candidates = (0..count)
        .map(|k| (k as f64 + 0.5) * spec.spacing)
        .filter(|&s| s > ghost.start && s < ghost.end);

    for (index, nominal) in candidates.enumerate() {
        let mut s = nominal;
        while s > width && bulkheads.iter().any(|&b| (b - s).abs() <= width) {
            s -= width;
        }
        if s != nominal {
            warn!(nominal, placed = s, "ring stiffener moved off a bulkhead");
        }

        let (mut s0, mut s1) = (s - 0.5 * width, s + 0.5 * width);
        if s0 < 0.0 {
            s0 = 0.0;
            s1 = width;
        }
        if s1 > 1.0 {
            s1 = 1.0;
            s0 = 1.0 - width;
        }

        let outer_radius = grid.shape_at(s).rigid_radius();
        let wall = grid.thickness_at(s);
        let r_web_outer = outer_radius - wall;
        let r_web_inner = r_web_outer - spec.web_height;
        let r_flange_outer = r_web_inner;
        let r_flange_inner = r_flange_outer - spec.flange_thickness;
        if r_flange_inner <= 0.0 {
            return Err(Error::InvalidGeometry {
                index,
                message: "ring stiffener reaches past the member axis".to_string(),
            });
        }

        let material = grid.material_at(s);
        let properties = AreaProperties::tube(2.0 * outer_radius, wall)
            .combine(AreaProperties::tube(2.0 * r_flange_outer, spec.flange_thickness))
            .combine(
                AreaProperties::tube(2.0 * r_web_outer, spec.web_height)
                    .scale(spec.web_thickness / spec.flange_width),
            );
        let solid = outer_radius * outer_radius - properties.area / PI;
        let t_eff = outer_radius - solid.max(0.0).sqrt();
        let mut dense = material;
        dense.rho *= grid.outfitting_at(s);
        let section = CrossSection::new(
            SectionShape::Circular {
                diameter: 2.0 * outer_radius,
            },
            SectionKind::RingStiffener,
            t_eff,
            properties,
            &dense,
        );
        registry.insert_section(s0, s1, section)?;

        let ratio = layout
            .constraints
            .stiffener_radius_ratio
            .get_mut(index)
            .ok_or(Error::CapacityExceeded {
                count: index + 1,
                capacity: MAX_SECTIONS,
            })?;
        *ratio = (spec.web_height + spec.flange_thickness + wall) / outer_radius;
        layout.rings.push(PlacedRing {
            s,
            s0,
            s1,
            z: grid.z_at(s),
            outer_radius,
            wall,
            r_web_outer,
            r_web_inner,
            r_flange_outer,
            r_flange_inner,
            material,
        });
    }

    let fact = grid.min_slenderness_factor();
    layout.constraints.flange_spacing_ratio =
        spec.flange_width / (0.5 * spec.spacing * grid.height);
    layout.constraints.flange_compactness =
        0.375 * (spec.flange_thickness / (0.5 * spec.flange_width)) * fact;
    layout.constraints.web_compactness = (spec.web_thickness / spec.web_height) * fact;

    debug!(count = layout.rings.len(), "placed ring stiffeners");
    Ok(layout)
}
