//! Mass moment of inertia bookkeeping.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Symmetric inertia tensor stored as its six independent components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Inertia {
    pub xx: f64,
    pub yy: f64,
    pub zz: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

impl Inertia {
    /// Diagonal tensor.
    pub fn diagonal(xx: f64, yy: f64, zz: f64) -> Self {
        Self {
            xx,
            yy,
            zz,
            ..Self::default()
        }
    }

    /// Components in `[xx, yy, zz, xy, xz, yz]` order.
    pub fn to_array(self) -> [f64; 6] {
        [self.xx, self.yy, self.zz, self.xy, self.xz, self.yz]
    }

    pub fn from_array(c: [f64; 6]) -> Self {
        Self {
            xx: c[0],
            yy: c[1],
            zz: c[2],
            xy: c[3],
            xz: c[4],
            yz: c[5],
        }
    }

    /// Full 3x3 matrix.
    pub fn to_matrix(self) -> [[f64; 3]; 3] {
        [
            [self.xx, self.xy, self.xz],
            [self.xy, self.yy, self.yz],
            [self.xz, self.yz, self.zz],
        ]
    }

    /// Upper triangle of a symmetric 3x3 matrix.
    pub fn from_matrix(m: [[f64; 3]; 3]) -> Self {
        Self {
            xx: m[0][0],
            yy: m[1][1],
            zz: m[2][2],
            xy: m[0][1],
            xz: m[0][2],
            yz: m[1][2],
        }
    }

    /// Transport a centroidal tensor of a body with `mass` to a point offset
    /// by `r` from its centroid: `I + m (|r|^2 I3 - r r^T)`.
    pub fn transported(self, mass: f64, r: [f64; 3]) -> Self {
        let r2 = r[0] * r[0] + r[1] * r[1] + r[2] * r[2];
        let mut m = self.to_matrix();
        for (i, row) in m.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                let delta = if i == j { r2 } else { 0.0 };
                *value += mass * (delta - r[i] * r[j]);
            }
        }
        Self::from_matrix(m)
    }

    /// Transport along the member axis by `dz`.
    pub fn transported_axially(self, mass: f64, dz: f64) -> Self {
        self.transported(mass, [0.0, 0.0, dz])
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::from_array(self.to_array().map(|c| c * factor))
    }
}

impl Add for Inertia {
    type Output = Inertia;

    fn add(self, rhs: Self) -> Self::Output {
        let a = self.to_array();
        let b = rhs.to_array();
        Self::from_array(std::array::from_fn(|i| a[i] + b[i]))
    }
}

impl AddAssign for Inertia {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Inertia {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, i| acc + i)
    }
}
