//! Axial grid construction, validation and refinement.
//!
//! A member is described at a handful of control points along its
//! non-dimensional axis `s` (0 at the base joint, 1 at the top joint). The
//! [`ControlGrid`] validates that description and refines it into a
//! [`MemberGrid`] where nodal fields (outer dimensions, coordinates) are
//! linearly interpolated and sectional fields (thickness, material) are
//! carried over piecewise constant.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::NODE_TOLERANCE;
use crate::error::{Error, Result};
use crate::interp::{interp, interval_index, linspace, midpoints, nodal_to_sectional};
use crate::material::{Layup, SectionMaterial};
use crate::section::{AreaProperties, SectionShape};

/// Strictly increasing axial positions spanning `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisGrid {
    positions: Vec<f64>,
}

impl AxisGrid {
    /// Validate and wrap a set of positions.
    ///
    /// The first and last positions must be 0 and 1 (within
    /// [`NODE_TOLERANCE`]) and consecutive positions must be distinct.
    pub fn new(mut positions: Vec<f64>) -> Result<Self> {
        if positions.len() < 2 {
            return Err(Error::InvalidGeometry {
                index: 0,
                message: format!(
                    "axial grid needs at least two positions, got {}",
                    positions.len()
                ),
            });
        }

        let last = positions.len() - 1;
        if positions[0].abs() > NODE_TOLERANCE {
            return Err(Error::OutOfRange {
                position: positions[0],
                message: "axial grid must start at s = 0".to_string(),
            });
        }
        if (positions[last] - 1.0).abs() > NODE_TOLERANCE {
            return Err(Error::OutOfRange {
                position: positions[last],
                message: "axial grid must end at s = 1".to_string(),
            });
        }
        positions[0] = 0.0;
        positions[last] = 1.0;

        for (index, pair) in positions.windows(2).enumerate() {
            if !pair[0].is_finite() || pair[1] - pair[0] <= NODE_TOLERANCE {
                return Err(Error::InvalidGeometry {
                    index,
                    message: format!(
                        "zero or negative section height between s = {} and s = {}",
                        pair[0], pair[1]
                    ),
                });
            }
        }

        Ok(Self { positions })
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn section_count(&self) -> usize {
        self.positions.len() - 1
    }

    /// Split every interval into `n_refine` equal parts, keeping every
    /// original position exactly.
    pub fn refine(&self, n_refine: usize) -> Result<Self> {
        if n_refine == 0 {
            return Err(Error::MemberDefinition {
                message: "refinement factor must be at least 1".to_string(),
            });
        }
        let mut refined = Vec::with_capacity(self.section_count() * n_refine + 1);
        for pair in self.positions.windows(2) {
            let sub = linspace(pair[0], pair[1], n_refine + 1);
            refined.extend_from_slice(&sub[..n_refine]);
        }
        refined.push(1.0);
        refined.dedup_by(|a, b| (*a - *b).abs() <= NODE_TOLERANCE);
        Self::new(refined)
    }
}

/// Outer dimensions at each control point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum OuterProfile {
    Circular { diameter: Vec<f64> },
    Rectangular { side_a: Vec<f64>, side_b: Vec<f64> },
}

impl OuterProfile {
    pub fn node_count(&self) -> usize {
        match self {
            OuterProfile::Circular { diameter } => diameter.len(),
            OuterProfile::Rectangular { side_a, .. } => side_a.len(),
        }
    }

    pub fn is_circular(&self) -> bool {
        matches!(self, OuterProfile::Circular { .. })
    }

    fn validate(&self, node_count: usize) -> Result<()> {
        let columns: Vec<(&str, &Vec<f64>)> = match self {
            OuterProfile::Circular { diameter } => vec![("diameter", diameter)],
            OuterProfile::Rectangular { side_a, side_b } => {
                vec![("side_a", side_a), ("side_b", side_b)]
            }
        };
        for (name, values) in columns {
            if values.len() != node_count {
                return Err(Error::MemberDefinition {
                    message: format!(
                        "{name} has {} values, expected one per grid position ({node_count})",
                        values.len()
                    ),
                });
            }
            if let Some(index) = values.iter().position(|v| !v.is_finite() || *v <= 0.0) {
                return Err(Error::InvalidGeometry {
                    index,
                    message: format!("{name} must be greater than zero"),
                });
            }
        }
        Ok(())
    }

    /// Outline at node `index`.
    pub fn shape_at_node(&self, index: usize) -> SectionShape {
        match self {
            OuterProfile::Circular { diameter } => SectionShape::Circular {
                diameter: diameter[index],
            },
            OuterProfile::Rectangular { side_a, side_b } => SectionShape::Rectangular {
                side_a: side_a[index],
                side_b: side_b[index],
            },
        }
    }

    /// Outline linearly interpolated at `s` over the profile's `nodes`.
    pub fn shape_at(&self, s: f64, nodes: &[f64]) -> SectionShape {
        match self {
            OuterProfile::Circular { diameter } => SectionShape::Circular {
                diameter: interp(s, nodes, diameter),
            },
            OuterProfile::Rectangular { side_a, side_b } => SectionShape::Rectangular {
                side_a: interp(s, nodes, side_a),
                side_b: interp(s, nodes, side_b),
            },
        }
    }

    /// Outline averaged over the interval `k`.
    pub fn shape_of_section(&self, k: usize) -> SectionShape {
        match self {
            OuterProfile::Circular { diameter } => SectionShape::Circular {
                diameter: 0.5 * (diameter[k] + diameter[k + 1]),
            },
            OuterProfile::Rectangular { side_a, side_b } => SectionShape::Rectangular {
                side_a: 0.5 * (side_a[k] + side_a[k + 1]),
                side_b: 0.5 * (side_b[k] + side_b[k + 1]),
            },
        }
    }

    fn resample(&self, targets: &[f64], nodes: &[f64]) -> Self {
        let sample = |values: &Vec<f64>| -> Vec<f64> {
            targets.iter().map(|&s| interp(s, nodes, values)).collect()
        };
        match self {
            OuterProfile::Circular { diameter } => OuterProfile::Circular {
                diameter: sample(diameter),
            },
            OuterProfile::Rectangular { side_a, side_b } => OuterProfile::Rectangular {
                side_a: sample(side_a),
                side_b: sample(side_b),
            },
        }
    }
}

/// Distributed beam properties of one control section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeamProperties {
    /// Section midpoint.
    pub s: f64,
    /// Mass per unit length, outfitting included (kg/m).
    pub mass_density: f64,
    pub foreaft_inertia: f64,
    pub sideside_inertia: f64,
    pub foreaft_stiffness: f64,
    pub sideside_stiffness: f64,
    pub torsional_stiffness: f64,
    pub axial_stiffness: f64,
}

/// Outfitting factor applied to the structural density: one value for the
/// whole member or one per control section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outfitting {
    Uniform(f64),
    PerSection(Vec<f64>),
}

impl Default for Outfitting {
    fn default() -> Self {
        Outfitting::Uniform(1.0)
    }
}

impl From<f64> for Outfitting {
    fn from(value: f64) -> Self {
        Outfitting::Uniform(value)
    }
}

impl From<Vec<f64>> for Outfitting {
    fn from(values: Vec<f64>) -> Self {
        Outfitting::PerSection(values)
    }
}

impl Outfitting {
    /// Factor for each of `sections` control sections.
    pub fn per_section(&self, sections: usize) -> Result<Vec<f64>> {
        let values = match self {
            Outfitting::Uniform(value) => vec![*value; sections],
            Outfitting::PerSection(values) if values.len() == sections => values.clone(),
            Outfitting::PerSection(values) => {
                return Err(Error::MemberDefinition {
                    message: format!(
                        "outfitting factor has {} sections, expected {sections}",
                        values.len()
                    ),
                })
            }
        };
        if let Some((index, value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 1.0)
        {
            return Err(Error::MemberDefinition {
                message: format!(
                    "outfitting factor must be at least 1, got {value} in section {index}"
                ),
            });
        }
        Ok(values)
    }
}

/// Validated member description at its control points.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlGrid {
    axis: AxisGrid,
    joint1: [f64; 3],
    joint2: [f64; 3],
    height: f64,
    profile: OuterProfile,
    layup: Layup,
    outfitting: Vec<f64>,
}

impl ControlGrid {
    pub fn new(
        axis: AxisGrid,
        joint1: [f64; 3],
        joint2: [f64; 3],
        profile: OuterProfile,
        layup: Layup,
        outfitting: impl Into<Outfitting>,
    ) -> Result<Self> {
        let height = distance(joint1, joint2);
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::InvalidGeometry {
                index: 0,
                message: format!("member height must be greater than zero, got {height}"),
            });
        }
        profile.validate(axis.node_count())?;

        if layup.thickness.len() != axis.section_count() {
            return Err(Error::MemberDefinition {
                message: format!(
                    "wall layup has {} sections, expected {}",
                    layup.thickness.len(),
                    axis.section_count()
                ),
            });
        }
        for (index, &t) in layup.thickness.iter().enumerate() {
            if !t.is_finite() || t <= 0.0 {
                return Err(Error::InvalidGeometry {
                    index,
                    message: "wall thickness must be greater than zero".to_string(),
                });
            }
            let limit = 0.5
                * profile
                    .shape_at_node(index)
                    .min_dimension()
                    .min(profile.shape_at_node(index + 1).min_dimension());
            if t >= limit {
                return Err(Error::InvalidGeometry {
                    index,
                    message: format!("wall thickness {t} closes the section (limit {limit})"),
                });
            }
        }

        let outfitting = outfitting.into().per_section(axis.section_count())?;

        Ok(Self {
            axis,
            joint1,
            joint2,
            height,
            profile,
            layup,
            outfitting,
        })
    }

    pub fn axis(&self) -> &AxisGrid {
        &self.axis
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn profile(&self) -> &OuterProfile {
        &self.profile
    }

    pub fn layup(&self) -> &Layup {
        &self.layup
    }

    /// Per-section beam properties for aeroelastic consumers.
    pub fn beam_properties(&self) -> Vec<BeamProperties> {
        let mids = midpoints(self.axis.positions());
        (0..self.axis.section_count())
            .map(|k| {
                let p = AreaProperties::for_shape(
                    self.profile.shape_of_section(k),
                    self.layup.thickness[k],
                );
                let m = &self.layup.materials[k];
                let coeff = self.outfitting[k];
                BeamProperties {
                    s: mids[k],
                    mass_density: coeff * m.rho * p.area,
                    foreaft_inertia: coeff * m.rho * p.ixx,
                    sideside_inertia: coeff * m.rho * p.iyy,
                    foreaft_stiffness: m.e * p.ixx,
                    sideside_stiffness: m.e * p.iyy,
                    torsional_stiffness: m.g * p.j0,
                    axial_stiffness: m.e * p.area,
                }
            })
            .collect()
    }

    /// Refine into the full evaluation grid.
    pub fn refine(&self, n_refine: usize) -> Result<MemberGrid> {
        let coarse = self.axis.positions();
        let axis = self.axis.refine(n_refine)?;
        let s = axis.positions().to_vec();
        let mids = midpoints(&s);

        let thickness: Vec<f64> = mids
            .iter()
            .map(|&m| self.layup.thickness[interval_index(m, coarse)])
            .collect();
        let materials: Vec<SectionMaterial> = mids
            .iter()
            .map(|&m| self.layup.materials[interval_index(m, coarse)])
            .collect();
        let poisson = materials.iter().map(|m| 0.5 * m.e / m.g - 1.0).collect();
        let profile = self.profile.resample(&s, coarse);

        let dxyz = sub(self.joint2, self.joint1);
        let nodes_xyz = s
            .iter()
            .map(|&si| add(self.joint1, scale(dxyz, si)))
            .collect();
        let nodes_r = (0..s.len())
            .map(|i| profile.shape_at_node(i).rigid_radius())
            .collect();

        debug!(
            control_nodes = coarse.len(),
            refined_nodes = s.len(),
            n_refine,
            "refined member grid"
        );

        Ok(MemberGrid {
            z: s.iter().map(|&si| si * self.height).collect(),
            outfitting: mids
                .iter()
                .map(|&m| self.outfitting[interval_index(m, coarse)])
                .collect(),
            s,
            height: self.height,
            joint1: self.joint1,
            joint2: self.joint2,
            profile,
            thickness,
            materials,
            poisson,
            nodes_xyz,
            nodes_r,
        })
    }
}

/// Refined evaluation grid with nodal and sectional fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberGrid {
    pub s: Vec<f64>,
    /// Axial distance from the base joint at each node.
    pub z: Vec<f64>,
    pub height: f64,
    pub joint1: [f64; 3],
    pub joint2: [f64; 3],
    pub profile: OuterProfile,
    pub thickness: Vec<f64>,
    pub materials: Vec<SectionMaterial>,
    pub outfitting: Vec<f64>,
    pub poisson: Vec<f64>,
    pub nodes_xyz: Vec<[f64; 3]>,
    pub nodes_r: Vec<f64>,
}

impl MemberGrid {
    pub fn section_count(&self) -> usize {
        self.s.len() - 1
    }

    pub fn is_circular(&self) -> bool {
        self.profile.is_circular()
    }

    pub fn shape_at(&self, s: f64) -> SectionShape {
        self.profile.shape_at(s, &self.s)
    }

    pub fn thickness_at(&self, s: f64) -> f64 {
        self.thickness[interval_index(s, &self.s)]
    }

    pub fn material_at(&self, s: f64) -> SectionMaterial {
        self.materials[interval_index(s, &self.s)]
    }

    pub fn outfitting_at(&self, s: f64) -> f64 {
        self.outfitting[interval_index(s, &self.s)]
    }

    pub fn z_at(&self, s: f64) -> f64 {
        interp(s, &self.s, &self.z)
    }

    /// Member axis vector from joint1 to joint2.
    pub fn axis_vector(&self) -> [f64; 3] {
        sub(self.joint2, self.joint1)
    }

    /// Global coordinates of axial position `s`.
    pub fn point_at(&self, s: f64) -> [f64; 3] {
        add(self.joint1, scale(self.axis_vector(), s))
    }

    /// Smallest `sqrt(E / sigma_y)` over all sections.
    pub fn min_slenderness_factor(&self) -> f64 {
        self.materials
            .iter()
            .map(|m| (m.e / m.sigma_y).sqrt())
            .fold(f64::INFINITY, f64::min)
    }

    /// Section wall thicknesses averaged to the nodes.
    pub fn nodal_thickness(&self) -> Vec<f64> {
        let mut nodal = Vec::with_capacity(self.s.len());
        nodal.push(self.thickness[0]);
        nodal.extend(nodal_to_sectional(&self.thickness));
        nodal.push(self.thickness[self.thickness.len() - 1]);
        nodal
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn scale(a: [f64; 3], k: f64) -> [f64; 3] {
    [a[0] * k, a[1] * k, a[2] * k]
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let d = sub(b, a);
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}
