//! Feature overlays applied on top of the shell partition.
//!
//! Each overlay edits the [`SectionRegistry`](crate::registry::SectionRegistry)
//! and returns a layout describing what it placed. Mass and cost of the
//! placed parts are computed afterwards from the layout, once the shell mass
//! they depend on is known.

pub mod ballast;
pub mod bulkhead;
pub mod ghost;
pub mod ring_stiffener;
pub mod shell;

pub use ballast::{apply_ballast, BallastReport, BallastSegment, BallastSpec};
pub use bulkhead::{place_bulkheads, BulkheadLayout, BulkheadSpec, PlacedBulkhead};
pub use ghost::{apply_ghost_region, GhostRegion};
pub use ring_stiffener::{
    place_ring_stiffeners, PlacedRing, RingLayout, RingStiffenerSpec, StiffenerConstraints,
};
pub use shell::{place_main_sections, AxialStiffenerSpec, SmearedStiffeners};
