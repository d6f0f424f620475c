//! Fabrication time and cost heuristics for welded steel members.
//!
//! Times follow the Farkas-Jarmai model for plate cutting, rolling and
//! GMAW-C welding. Inputs are in metres and kilograms; the fitted curves
//! work in millimetres internally. All times are in minutes.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CAPITAL_COST_SHARE, ELECTRICITY_PRICE, MATERIAL_WASTE_FACTOR, OUTFITTING_COST_FACTOR,
    OUTFITTING_ELECTRICITY_USE, STEEL_ELECTRICITY_USE,
};

/// Slowest plasma cutting speed considered (m/min), reached on very thick plate.
const MIN_CUTTING_SPEED: f64 = 0.05;

/// Labor and painting rates applied to fabrication estimates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostRates {
    /// Labor cost (USD/min).
    #[serde(default)]
    pub labor: f64,
    /// Painting cost (USD/m^2).
    #[serde(default)]
    pub painting: f64,
}

/// Weld joint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeldKind {
    Butt,
    Fillet,
}

/// Plasma cutting time for a cut of `length` through plate of `thickness`.
pub fn plasma_cutting_minutes(length: f64, thickness: f64) -> f64 {
    let t_mm = 1e3 * thickness;
    if t_mm <= 0.0 {
        return 0.0;
    }
    let speed = (41.038_152_15 / t_mm - 0.180_150_943).max(MIN_CUTTING_SPEED);
    length / speed
}

/// Time to roll one plate of `thickness` to `radius`, scaled by difficulty `theta`.
pub fn rolling_minutes(theta: f64, radius: f64, thickness: f64) -> f64 {
    let t_mm = 1e3 * thickness;
    if t_mm <= 0.0 {
        return 0.0;
    }
    let d_mm = 2e3 * radius.max(0.0);
    theta * (6.858_251_3 - 4.527_217 / t_mm.sqrt() + 0.009_541_996 * d_mm.sqrt()).exp()
}

/// Welding time for a structure of `n_pieces` parts totalling `mass`, with the
/// listed `(length, thickness)` seams.
///
/// The first term is the assembly/tacking time of the structure, the second
/// the deposition time of every seam.
pub fn welding_minutes<I>(kind: WeldKind, theta: f64, n_pieces: usize, mass: f64, seams: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let assembly = theta * (n_pieces as f64 * mass.max(0.0)).sqrt();
    let deposition: f64 = seams
        .into_iter()
        .map(|(length, thickness)| {
            let l_mm = 1e3 * length;
            let t_mm = 1e3 * thickness.max(0.0);
            match kind {
                WeldKind::Butt => 0.152e-3 * l_mm * t_mm.powf(1.9358),
                WeldKind::Fillet => 0.3394e-3 * l_mm * t_mm * t_mm,
            }
        })
        .sum();
    assembly + deposition
}

/// Rolling difficulty from the taper ratio (small over large radius). A
/// cylinder scores about 1.7, a strongly tapered cone approaches 4.
pub fn rolling_difficulty(taper: f64) -> f64 {
    4.0 - 3.0 / (1.0 + (-5.0 * (taper - 0.75)).exp())
}

/// Itemized fabrication cost of a shell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CostBreakdown {
    pub material: f64,
    pub labor: f64,
    pub painting: f64,
    pub outfitting: f64,
    pub electricity: f64,
    pub capital: f64,
}

impl CostBreakdown {
    /// Material, outfitting and electricity terms for one section of bare
    /// `mass` at `unit_cost` with outfitting factor `coeff`.
    pub fn add_section(&mut self, mass: f64, unit_cost: f64, coeff: f64) {
        let outfit = (coeff - 1.0).max(0.0) * mass;
        self.material += MATERIAL_WASTE_FACTOR * unit_cost * mass;
        self.outfitting += OUTFITTING_COST_FACTOR * unit_cost * outfit;
        self.electricity +=
            ELECTRICITY_PRICE * (STEEL_ELECTRICITY_USE * mass + OUTFITTING_ELECTRICITY_USE * outfit);
    }

    /// Fill in the capital-share overhead on top of the direct costs.
    pub fn with_capital_share(mut self) -> Self {
        let direct = self.direct();
        self.capital = CAPITAL_COST_SHARE * direct / (1.0 - CAPITAL_COST_SHARE);
        self
    }

    fn direct(&self) -> f64 {
        self.material + self.labor + self.painting + self.outfitting + self.electricity
    }

    pub fn total(&self) -> f64 {
        self.direct() + self.capital
    }
}
