//! Interpolation helpers over the non-dimensional member axis.
//!
//! Nodal fields (outer dimensions, z) are interpolated linearly; sectional
//! fields (thickness, material) are piecewise constant over each interval.

/// Piecewise-linear interpolation, clamped to the end values outside `xp`.
///
/// `xp` must be non-decreasing and the same length as `fp`.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    let n = xp.len();
    if n == 0 {
        return 0.0;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    let hi = xp.partition_point(|&v| v <= x).min(n - 1);
    let lo = hi - 1;
    let dx = xp[hi] - xp[lo];
    if dx <= 0.0 {
        return fp[hi];
    }
    fp[lo] + (fp[hi] - fp[lo]) * (x - xp[lo]) / dx
}

/// Index of the interval of `nodes` containing `x`, clamped to the valid range.
pub fn interval_index(x: f64, nodes: &[f64]) -> usize {
    let sections = nodes.len().saturating_sub(1);
    if sections == 0 {
        return 0;
    }
    nodes
        .partition_point(|&v| v <= x)
        .saturating_sub(1)
        .min(sections - 1)
}

/// Evaluates a sectional (per-interval) field at `x`.
///
/// `values` has one entry per interval of `nodes`.
pub fn sectional_interp(x: f64, nodes: &[f64], values: &[f64]) -> f64 {
    debug_assert_eq!(nodes.len(), values.len() + 1);
    values[interval_index(x, nodes)]
}

/// Averages a nodal field onto the intervals between consecutive nodes.
pub fn nodal_to_sectional(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

/// Midpoints of consecutive positions.
pub fn midpoints(nodes: &[f64]) -> Vec<f64> {
    nodal_to_sectional(nodes)
}

/// `n` evenly spaced samples from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Trapezoidal integral of `y` over `x`.
pub fn trapz(y: &[f64], x: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum()
}

/// Akima spline through fixed control points, clamped outside the data range.
#[derive(Debug, Clone)]
pub struct AkimaSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    slopes: Vec<f64>,
}

impl AkimaSpline {
    /// Builds the spline. Requires at least two strictly increasing abscissae.
    pub fn new(x: &[f64], y: &[f64]) -> Self {
        debug_assert_eq!(x.len(), y.len());
        let n = x.len();
        if n < 2 {
            return Self {
                x: x.to_vec(),
                y: y.to_vec(),
                slopes: vec![0.0; n],
            };
        }

        // Secant slopes padded with two extrapolated values on each side.
        let mut m = vec![0.0; n + 3];
        for i in 0..n - 1 {
            m[i + 2] = (y[i + 1] - y[i]) / (x[i + 1] - x[i]);
        }
        m[1] = 2.0 * m[2] - m[3.min(n)];
        m[0] = 2.0 * m[1] - m[2];
        m[n + 1] = 2.0 * m[n] - m[n - 1];
        m[n + 2] = 2.0 * m[n + 1] - m[n];

        let slopes = (0..n)
            .map(|i| {
                let w1 = (m[i + 3] - m[i + 2]).abs();
                let w2 = (m[i + 1] - m[i]).abs();
                if w1 + w2 < f64::EPSILON {
                    0.5 * (m[i + 1] + m[i + 2])
                } else {
                    (w1 * m[i + 1] + w2 * m[i + 2]) / (w1 + w2)
                }
            })
            .collect();

        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            slopes,
        }
    }

    /// Evaluates the spline at `xi`.
    pub fn eval(&self, xi: f64) -> f64 {
        let n = self.x.len();
        match n {
            0 => return 0.0,
            1 => return self.y[0],
            _ => {}
        }
        if xi <= self.x[0] {
            return self.y[0];
        }
        if xi >= self.x[n - 1] {
            return self.y[n - 1];
        }

        let i = interval_index(xi, &self.x);
        let h = self.x[i + 1] - self.x[i];
        let t = (xi - self.x[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        h00 * self.y[i] + h10 * h * self.slopes[i] + h01 * self.y[i + 1] + h11 * h * self.slopes[i + 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interp_clamps_and_blends() {
        let xp = [0.0, 0.5, 1.0];
        let fp = [2.0, 4.0, 8.0];
        assert_eq!(interp(-1.0, &xp, &fp), 2.0);
        assert_eq!(interp(2.0, &xp, &fp), 8.0);
        assert!((interp(0.25, &xp, &fp) - 3.0).abs() < 1e-12);
        assert!((interp(0.75, &xp, &fp) - 6.0).abs() < 1e-12);
        assert_eq!(interp(0.5, &xp, &fp), 4.0);
    }

    #[test]
    fn sectional_values_are_piecewise_constant() {
        let nodes = [0.0, 0.4, 1.0];
        let values = [10.0, 20.0];
        assert_eq!(sectional_interp(0.0, &nodes, &values), 10.0);
        assert_eq!(sectional_interp(0.39, &nodes, &values), 10.0);
        assert_eq!(sectional_interp(0.4, &nodes, &values), 20.0);
        assert_eq!(sectional_interp(1.0, &nodes, &values), 20.0);
        assert_eq!(sectional_interp(-5.0, &nodes, &values), 10.0);
    }

    #[test]
    fn linspace_hits_both_ends() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v.len(), 5);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[4], 1.0);
        assert!((v[1] - 0.25).abs() < 1e-15);
    }

    #[test]
    fn trapz_integrates_linear_exactly() {
        let x = linspace(0.0, 2.0, 11);
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v).collect();
        assert!((trapz(&y, &x) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn akima_passes_through_control_points() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.5];
        let y = [1.0, 2.0, 1.5, 3.0, 3.2];
        let spline = AkimaSpline::new(&x, &y);
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert!((spline.eval(*xi) - yi).abs() < 1e-12);
        }
        assert_eq!(spline.eval(10.0), 3.2);
    }

    #[test]
    fn akima_reproduces_straight_lines() {
        let x = [0.0, 1.0, 2.0, 4.0];
        let y = [0.0, 2.0, 4.0, 8.0];
        let spline = AkimaSpline::new(&x, &y);
        assert!((spline.eval(3.0) - 6.0).abs() < 1e-12);
        assert!((spline.eval(0.5) - 1.0).abs() < 1e-12);
    }
}
