//! Closed-form volume, centroid and second moments of frustum segments.
//!
//! All results are per unit density: multiply by the material density to get
//! mass and mass moments. Centroids are measured from the segment base and
//! second moments are taken about the segment's own centroid, with `z` along
//! the member axis.

use std::f64::consts::PI;

use serde::Serialize;

/// Volume properties of one frustum segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FrustumMoments {
    pub volume: f64,
    /// Centroid height above the segment base.
    pub z_cg: f64,
    /// Second moment about the x axis through the centroid.
    pub ixx: f64,
    /// Second moment about the y axis through the centroid.
    pub iyy: f64,
    /// Second moment about the member axis.
    pub izz: f64,
}

/// Moments referenced to the base plane, which subtract cleanly.
#[derive(Debug, Clone, Copy)]
struct BaseMoments {
    volume: f64,
    first_moment: f64,
    ixx: f64,
    iyy: f64,
    izz: f64,
    height: f64,
}

impl BaseMoments {
    fn minus(self, inner: Self) -> Self {
        Self {
            volume: self.volume - inner.volume,
            first_moment: self.first_moment - inner.first_moment,
            ixx: self.ixx - inner.ixx,
            iyy: self.iyy - inner.iyy,
            izz: self.izz - inner.izz,
            height: self.height,
        }
    }

    fn centroidal(self) -> FrustumMoments {
        if self.volume <= 0.0 {
            return FrustumMoments {
                z_cg: 0.5 * self.height,
                ..FrustumMoments::default()
            };
        }
        let z_cg = self.first_moment / self.volume;
        let shift = self.volume * z_cg * z_cg;
        FrustumMoments {
            volume: self.volume,
            z_cg,
            ixx: self.ixx - shift,
            iyy: self.iyy - shift,
            izz: self.izz,
        }
    }
}

fn circular_base(rb: f64, rt: f64, h: f64) -> BaseMoments {
    let rb = rb.max(0.0);
    let rt = rt.max(0.0);
    let r2 = rb * rb + rb * rt + rt * rt;
    let r4 = rb.powi(4) + rb.powi(3) * rt + rb * rb * rt * rt + rb * rt.powi(3) + rt.powi(4);
    let volume = PI * h / 3.0 * r2;
    let first_moment = PI * h * h / 12.0 * (rb * rb + 2.0 * rb * rt + 3.0 * rt * rt);
    let radial = PI * h / 20.0 * r4;
    let axial = PI * h.powi(3) / 30.0 * (rb * rb + 3.0 * rb * rt + 6.0 * rt * rt);
    BaseMoments {
        volume,
        first_moment,
        ixx: radial + axial,
        iyy: radial + axial,
        izz: 2.0 * radial,
        height: h,
    }
}

/// Solid circular frustum with base radius `rb`, top radius `rt` and height `h`.
pub fn circular_solid(rb: f64, rt: f64, h: f64) -> FrustumMoments {
    circular_base(rb, rt, h).centroidal()
}

/// Circular frustum shell of outer radii `rb`, `rt` and wall thickness `t`.
pub fn circular_shell(rb: f64, rt: f64, t: f64, h: f64) -> FrustumMoments {
    circular_base(rb, rt, h)
        .minus(circular_base(rb - t, rt - t, h))
        .centroidal()
}

// Three-point Gauss-Legendre on [0, 1]; exact for the quintic integrands below.
const GAUSS_NODES: [f64; 3] = [
    0.112_701_665_379_258_3,
    0.5,
    0.887_298_334_620_741_7,
];
const GAUSS_WEIGHTS: [f64; 3] = [5.0 / 18.0, 8.0 / 18.0, 5.0 / 18.0];

fn rectangular_base(ab: f64, bb: f64, at: f64, bt: f64, h: f64) -> BaseMoments {
    let mut m = BaseMoments {
        volume: 0.0,
        first_moment: 0.0,
        ixx: 0.0,
        iyy: 0.0,
        izz: 0.0,
        height: h,
    };
    for (x, w) in GAUSS_NODES.iter().zip(GAUSS_WEIGHTS.iter()) {
        let z = x * h;
        let a = (ab + (at - ab) * x).max(0.0);
        let b = (bb + (bt - bb) * x).max(0.0);
        let area = a * b;
        let weight = w * h;
        m.volume += weight * area;
        m.first_moment += weight * area * z;
        m.ixx += weight * (a * b.powi(3) / 12.0 + area * z * z);
        m.iyy += weight * (b * a.powi(3) / 12.0 + area * z * z);
        m.izz += weight * area * (a * a + b * b) / 12.0;
    }
    m
}

/// Solid rectangular frustum with base sides `ab`, `bb` and top sides `at`, `bt`.
pub fn rectangular_solid(ab: f64, bb: f64, at: f64, bt: f64, h: f64) -> FrustumMoments {
    rectangular_base(ab, bb, at, bt, h).centroidal()
}

/// Rectangular frustum shell with wall thickness `t`.
pub fn rectangular_shell(ab: f64, bb: f64, at: f64, bt: f64, t: f64, h: f64) -> FrustumMoments {
    let inner = rectangular_base(ab - 2.0 * t, bb - 2.0 * t, at - 2.0 * t, bt - 2.0 * t, h);
    rectangular_base(ab, bb, at, bt, h).minus(inner).centroidal()
}
