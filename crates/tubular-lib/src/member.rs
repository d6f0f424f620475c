//! Member definitions and the single-evaluation pipeline.
//!
//! A [`MemberDefinition`] is the serialized description of one member. The
//! pipeline builds a fresh registry from it on every call, applies the
//! overlays in a fixed order (shell, bulkheads, ring stiffeners, ballast,
//! ghost region, axial joints), integrates the result and discards the
//! registry once the outputs are assembled.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{MAX_SECTIONS, NULL_SENTINEL, WATER_DENSITY};
use crate::error::{Error, Result};
use crate::grid::{AxisGrid, BeamProperties, ControlGrid, MemberGrid, OuterProfile, Outfitting};
use crate::hydro::{compute_hydrostatics, Hydrostatics};
use crate::integrator::{integrate_shell, roll_up, MassSummary, ShellReport};
use crate::loads::{to_member_loads, GlobalLoads, MemberLoads};
use crate::manufacturing::CostRates;
use crate::material::{homogenize_layers, Layer, MaterialCatalog};
use crate::overlay::{
    apply_ballast, apply_ghost_region, place_bulkheads, place_main_sections,
    place_ring_stiffeners, AxialStiffenerSpec, BallastReport, BallastSpec, BulkheadLayout,
    BulkheadSpec, GhostRegion, RingLayout, RingStiffenerSpec,
};
use crate::registry::SectionTable;

fn default_refine() -> usize {
    1
}

fn default_water_density() -> f64 {
    WATER_DENSITY
}

/// Extra named node inserted into the exported section table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxialJoint {
    pub name: String,
    pub position: f64,
}

/// Serialized description of one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDefinition {
    #[serde(default)]
    pub name: String,
    /// Base joint in global coordinates (m).
    pub joint1: [f64; 3],
    /// Top joint in global coordinates (m).
    pub joint2: [f64; 3],
    /// Control point positions along the axis, 0 to 1.
    pub grid: Vec<f64>,
    pub outer: OuterProfile,
    pub layers: Vec<Layer>,
    #[serde(default = "default_refine")]
    pub n_refine: usize,
    /// A single factor or one per control section.
    #[serde(default)]
    pub outfitting_factor: Outfitting,
    #[serde(default)]
    pub modulus_override: Option<f64>,
    #[serde(default)]
    pub ghost: GhostRegion,
    #[serde(default)]
    pub bulkheads: Vec<BulkheadSpec>,
    #[serde(default)]
    pub ring_stiffeners: Option<RingStiffenerSpec>,
    #[serde(default)]
    pub axial_stiffeners: Option<AxialStiffenerSpec>,
    #[serde(default)]
    pub ballast: Vec<BallastSpec>,
    #[serde(default)]
    pub axial_joints: Vec<AxialJoint>,
    #[serde(default)]
    pub shell_mass_user: Option<f64>,
    #[serde(default)]
    pub total_mass_user: Option<f64>,
    #[serde(default)]
    pub costs: CostRates,
    #[serde(default = "default_water_density")]
    pub water_density: f64,
    #[serde(default)]
    pub loads: Option<GlobalLoads>,
}

impl MemberDefinition {
    /// Load a definition from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Validate the control-point description and homogenize the wall.
    pub fn control_grid(&self, catalog: &MaterialCatalog) -> Result<ControlGrid> {
        let axis = AxisGrid::new(self.grid.clone())?;
        let layup = homogenize_layers(
            &self.layers,
            catalog,
            self.modulus_override,
            axis.node_count(),
        )?;
        ControlGrid::new(
            axis,
            self.joint1,
            self.joint2,
            self.outer.clone(),
            layup,
            self.outfitting_factor.clone(),
        )
    }
}

/// Global node coordinates and rigid radii of the exported nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeExport {
    pub xyz: Vec<[f64; 3]>,
    pub r: Vec<f64>,
}

impl NodeExport {
    fn new(grid: &MemberGrid, positions: &[f64], capacity: usize) -> Result<Self> {
        if positions.len() > capacity {
            return Err(Error::CapacityExceeded {
                count: positions.len(),
                capacity,
            });
        }
        let mut xyz = vec![[NULL_SENTINEL; 3]; capacity];
        let mut r = vec![NULL_SENTINEL; capacity];
        for (i, &s) in positions.iter().enumerate() {
            xyz[i] = grid.point_at(s);
            r[i] = grid.shape_at(s).rigid_radius();
        }
        Ok(Self { xyz, r })
    }
}

/// Everything a single evaluation produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberProperties {
    pub name: String,
    pub height: f64,
    /// Number of exported intervals.
    pub section_count: usize,
    pub mass: MassSummary,
    pub shell: ShellReport,
    pub bulkheads: BulkheadLayout,
    pub ring_stiffeners: RingLayout,
    pub ballast: BallastReport,
    pub hydrostatics: Hydrostatics,
    pub sections: SectionTable,
    pub nodes: NodeExport,
    pub beam: Vec<BeamProperties>,
    pub poisson: Vec<f64>,
    pub axial_joints: Vec<AxialJoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loads: Option<MemberLoads>,
}

impl MemberProperties {
    pub fn total_mass(&self) -> f64 {
        self.mass.total_mass
    }

    pub fn total_cost(&self) -> f64 {
        self.mass.total_cost
    }
}

/// Run the full pipeline for one member.
pub fn evaluate_member(
    definition: &MemberDefinition,
    catalog: &MaterialCatalog,
) -> Result<MemberProperties> {
    definition.ghost.validate()?;
    let control = definition.control_grid(catalog)?;
    let grid = control.refine(definition.n_refine)?;
    let ghost = &definition.ghost;

    let mut registry = place_main_sections(&grid, definition.axial_stiffeners.as_ref())?;
    let bulkheads = place_bulkheads(&mut registry, &grid, &definition.bulkheads, ghost)?;
    let rings = match &definition.ring_stiffeners {
        Some(spec) => {
            place_ring_stiffeners(&mut registry, &grid, spec, &bulkheads.positions(), ghost)?
        }
        None => RingLayout::default(),
    };
    let (mut registry, ballast) = apply_ballast(
        &registry,
        &grid,
        &definition.ballast,
        catalog,
        definition.water_density,
        ghost,
    )?;
    apply_ghost_region(&mut registry, ghost)?;
    for joint in &definition.axial_joints {
        if !(0.0..=1.0).contains(&joint.position) {
            return Err(Error::OutOfRange {
                position: joint.position,
                message: format!("axial joint '{}' lies outside the member", joint.name),
            });
        }
        registry.add_node(joint.position)?;
    }
    debug!(
        keys = registry.len(),
        "registry complete"
    );

    let shell = integrate_shell(
        &grid,
        &registry,
        definition.axial_stiffeners.as_ref(),
        &definition.costs,
        definition.shell_mass_user,
    )?;
    let bulkhead_mass = bulkheads.mass_properties(shell.component.mass, &definition.costs);
    let ring_mass = rings.mass_properties(shell.component.mass, &definition.costs);
    let mass = roll_up(
        &grid,
        shell.component,
        bulkhead_mass,
        ring_mass,
        ballast.component,
        definition.total_mass_user,
    );

    let sections = registry.to_table(MAX_SECTIONS)?;
    let nodes = NodeExport::new(&grid, registry.positions(), MAX_SECTIONS)?;
    let loads = definition
        .loads
        .as_ref()
        .map(|l| to_member_loads(l, &grid, registry.positions(), MAX_SECTIONS))
        .transpose()?;
    let hydrostatics = compute_hydrostatics(&grid, ghost, definition.water_density);

    info!(
        member = %definition.name,
        mass = mass.total_mass,
        cost = mass.total_cost,
        sections = registry.interval_count(),
        "evaluated member"
    );

    Ok(MemberProperties {
        name: definition.name.clone(),
        height: grid.height,
        section_count: registry.interval_count(),
        mass,
        shell,
        bulkheads,
        ring_stiffeners: rings,
        ballast,
        hydrostatics,
        sections,
        nodes,
        beam: control.beam_properties(),
        poisson: grid.poisson.clone(),
        axial_joints: definition.axial_joints.clone(),
        loads,
    })
}
