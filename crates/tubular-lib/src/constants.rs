//! Physical and bookkeeping constants shared by the section, integration and
//! hydrostatics modules.

/// Sentinel written into unused slots of the fixed-capacity section table.
pub const NULL_SENTINEL: f64 = -9999.0;

/// Capacity of the exported section table (nodes per member).
pub const MAX_SECTIONS: usize = 200;

/// Two axial positions closer than this are the same node.
pub const NODE_TOLERANCE: f64 = 1e-6;

/// Value that ghosted sections collapse thickness, area, inertia and density to.
pub const GHOST_PROPERTY: f64 = 1e-2;

/// Multiplier applied to modulus and yield stress of ghosted sections.
pub const GHOST_STIFFNESS_SCALE: f64 = 1e2;

/// Standard gravity in m/s^2.
pub const GRAVITY: f64 = 9.80633;

/// Small positive guard for ratios whose denominator may legitimately be zero.
pub const EPSILON: f64 = 1e-5;

/// Default sea water density in kg/m^3.
pub const WATER_DENSITY: f64 = 1025.0;

/// Sub-points used to integrate each ballast segment.
pub const BALLAST_POINTS: usize = 10;

/// Sample count for the added-mass strip integrals.
pub const ADDED_MASS_POINTS: usize = 200;

/// Share of capital cost in the total manufacturing cost.
pub const CAPITAL_COST_SHARE: f64 = 0.118;

/// Electricity price in USD/kWh.
pub const ELECTRICITY_PRICE: f64 = 0.064;
/// Electricity consumed per kg of steel processed (kWh/kg).
pub const STEEL_ELECTRICITY_USE: f64 = 15.9;
/// Electricity consumed per kg of outfitting (kWh/kg).
pub const OUTFITTING_ELECTRICITY_USE: f64 = 26.9;

/// Scrap and waste allowance applied to raw material cost.
pub const MATERIAL_WASTE_FACTOR: f64 = 1.21;

/// Outfitting is priced at this multiple of the base material cost rate.
pub const OUTFITTING_COST_FACTOR: f64 = 1.5;

/// Weld difficulty factor for butt welds along shell seams.
pub const BUTT_WELD_DIFFICULTY: f64 = 2.0;

/// Weld difficulty factor for fillet welds (bulkheads, stiffeners, box corners).
pub const FILLET_WELD_DIFFICULTY: f64 = 3.0;

/// Aspect ratio table (long side over short side) for rectangular added mass.
pub const ADDED_MASS_ASPECT_RATIO: [f64; 9] =
    [0.0, 0.025, 0.111, 0.298, 0.676, 1.478, 3.555, 9.007, 40.03];

/// Added-mass coefficients matching [`ADDED_MASS_ASPECT_RATIO`].
pub const ADDED_MASS_COEFFICIENT: [f64; 9] = [1.0, 1.05, 1.16, 1.29, 1.42, 1.65, 2.0, 2.5, 3.5];
