//! Section assembly and mass properties for slender tubular members.
//!
//! This crate turns a member description (joints, outer profile, layered
//! wall and structural features) into the per-interval section table a frame
//! solver consumes, together with mass, cost, inertia and hydrostatic
//! properties. Consumers (the CLI, optimization drivers) should go through
//! [`evaluate_member`] and the types re-exported here.
//!

#![deny(warnings)]

pub mod constants;
pub mod error;
pub mod frustum;
pub mod grid;
pub mod hydro;
pub mod inertia;
pub mod integrator;
pub mod interp;
pub mod loads;
pub mod manufacturing;
pub mod material;
pub mod member;
pub mod output;
pub mod overlay;
pub mod registry;
pub mod section;

pub use error::{Error, Result};
pub use grid::{AxisGrid, BeamProperties, ControlGrid, MemberGrid, OuterProfile, Outfitting};
pub use hydro::{compute_hydrostatics, Hydrostatics};
pub use inertia::Inertia;
pub use integrator::{integrate_shell, roll_up, ComponentMass, MassSummary, ShellReport};
pub use loads::{to_member_loads, GlobalLoads, MemberLoads};
pub use manufacturing::{CostBreakdown, CostRates};
pub use material::{homogenize_layers, Layer, Layup, Material, MaterialCatalog, SectionMaterial};
pub use member::{evaluate_member, AxialJoint, MemberDefinition, MemberProperties, NodeExport};
pub use output::{render_materials, RenderMode};
pub use overlay::{
    apply_ballast, apply_ghost_region, place_bulkheads, place_main_sections,
    place_ring_stiffeners, AxialStiffenerSpec, BallastReport, BallastSpec, BulkheadLayout,
    BulkheadSpec, GhostRegion, RingLayout, RingStiffenerSpec,
};
pub use registry::{SectionRegistry, SectionTable};
pub use section::{AreaProperties, CrossSection, SectionKind, SectionShape};
