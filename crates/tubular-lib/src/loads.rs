//! Transformation of distributed environmental loads into member axes.
//!
//! Loads arrive as force-per-length vectors in global coordinates sampled
//! along the member. They are rotated so the local x axis runs from joint1
//! to joint2 and resampled onto the exported registry nodes.

use serde::{Deserialize, Serialize};

use crate::constants::NULL_SENTINEL;
use crate::error::{Error, Result};
use crate::grid::MemberGrid;
use crate::interp::interp;

/// Force per unit length (N/m) and dynamic pressure (Pa) in global axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalLoads {
    pub s: Vec<f64>,
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    pub pz: Vec<f64>,
    #[serde(default)]
    pub qdyn: Vec<f64>,
}

impl GlobalLoads {
    fn validate(&self) -> Result<()> {
        let n = self.s.len();
        if n == 0 {
            return Err(Error::MemberDefinition {
                message: "load samples are empty".to_string(),
            });
        }
        let columns = [("px", &self.px), ("py", &self.py), ("pz", &self.pz)];
        for (name, column) in columns {
            if column.len() != n {
                return Err(Error::MemberDefinition {
                    message: format!("load column {name} has {} values, expected {n}", column.len()),
                });
            }
        }
        if !self.qdyn.is_empty() && self.qdyn.len() != n {
            return Err(Error::MemberDefinition {
                message: format!("load column qdyn has {} values, expected {n}", self.qdyn.len()),
            });
        }
        if self.s.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::MemberDefinition {
                message: "load sample positions must be non-decreasing".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads in member axes at the exported nodes, sentinel padded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberLoads {
    pub s: Vec<f64>,
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    pub pz: Vec<f64>,
    pub qdyn: Vec<f64>,
}

/// Rotation matrix taking the direction of `axis` onto global x.
pub fn rotation_to_local(axis: [f64; 3]) -> [[f64; 3]; 3] {
    let norm = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    if norm == 0.0 {
        return [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    }
    let u = [axis[0] / norm, axis[1] / norm, axis[2] / norm];
    let c = u[0];
    if 1.0 + c <= 1e-12 {
        // Antiparallel: half turn about z.
        return [[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]];
    }

    // Rodrigues with v = u x e_x.
    let v = [0.0, u[2], -u[1]];
    let k = [[0.0, -v[2], v[1]], [v[2], 0.0, -v[0]], [-v[1], v[0], 0.0]];
    std::array::from_fn(|i| {
        std::array::from_fn(|j| {
            let kk: f64 = (0..3).map(|m| k[i][m] * k[m][j]).sum();
            let identity = if i == j { 1.0 } else { 0.0 };
            identity + k[i][j] + kk / (1.0 + c)
        })
    })
}

fn apply(r: &[[f64; 3]; 3], p: [f64; 3]) -> [f64; 3] {
    std::array::from_fn(|i| r[i][0] * p[0] + r[i][1] * p[1] + r[i][2] * p[2])
}

/// Rotate `loads` into member axes and resample them at `positions`.
pub fn to_member_loads(
    loads: &GlobalLoads,
    grid: &MemberGrid,
    positions: &[f64],
    capacity: usize,
) -> Result<MemberLoads> {
    loads.validate()?;
    if positions.len() > capacity {
        return Err(Error::CapacityExceeded {
            count: positions.len(),
            capacity,
        });
    }

    let r = rotation_to_local(grid.axis_vector());
    let rotated: Vec<[f64; 3]> = loads
        .px
        .iter()
        .zip(&loads.py)
        .zip(&loads.pz)
        .map(|((&px, &py), &pz)| apply(&r, [px, py, pz]))
        .collect();
    let local = |axis: usize| -> Vec<f64> { rotated.iter().map(|p| p[axis]).collect() };
    let qdyn = if loads.qdyn.is_empty() {
        vec![0.0; loads.s.len()]
    } else {
        loads.qdyn.clone()
    };

    let pad = |values: &[f64]| -> Vec<f64> {
        let mut column = vec![NULL_SENTINEL; capacity];
        for (slot, &s) in column.iter_mut().zip(positions) {
            *slot = interp(s, &loads.s, values);
        }
        column
    };
    let mut s = vec![NULL_SENTINEL; capacity];
    s[..positions.len()].copy_from_slice(positions);

    Ok(MemberLoads {
        s,
        px: pad(&local(0)),
        py: pad(&local(1)),
        pz: pad(&local(2)),
        qdyn: pad(&qdyn),
    })
}
