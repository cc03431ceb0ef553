//! One-dimensional search space: an interval under scalar cuts.

use crate::cutting_plane::CutStatus;

/// Interval `[xc − r, xc + r]` shrunk by scalar cuts `gᵀ(x − xc) + β ≤ 0`.
#[must_use]
#[derive(Clone, Copy, Debug)]
pub struct Ell1d {
    r: f64,
    xc: f64,
}

impl Ell1d {
    /// Interval `[l, u]`.
    pub fn new(l: f64, u: f64) -> Self {
        let r = (u - l) / 2.0;
        Self { r, xc: l + r }
    }

    /// Midpoint of the interval.
    #[inline]
    #[must_use]
    pub fn xc(&self) -> f64 {
        self.xc
    }

    /// Move the midpoint.
    #[inline]
    pub fn set_xc(&mut self, xc: f64) {
        self.xc = xc;
    }

    /// Half-width of the interval.
    #[inline]
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.r
    }

    /// Apply the cut `(g, beta)`; returns the status and τ².
    pub fn update(&mut self, g: f64, beta: f64) -> (CutStatus, f64) {
        let tau = (self.r * g).abs();
        let tsq = tau * tau;

        if beta == 0.0 {
            self.r /= 2.0;
            self.xc += if g > 0.0 { -self.r } else { self.r };
            return (CutStatus::Success, tsq);
        }
        if beta > tau {
            return (CutStatus::NoSoln, tsq);
        }
        if beta < -tau {
            return (CutStatus::NoEffect, tsq);
        }

        let bound = self.xc - beta / g;
        let (l, u) = if g > 0.0 {
            (self.xc - self.r, bound)
        } else {
            (bound, self.xc + self.r)
        };
        self.r = (u - l) / 2.0;
        self.xc = l + self.r;
        (CutStatus::Success, tsq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    #[test]
    fn central_cut_halves_the_interval() {
        let mut e = Ell1d::new(0.0, 4.0);
        let (status, tsq) = e.update(1.0, 0.0);
        assert_eq!(status, CutStatus::Success);
        assert_abs_diff_eq!(tsq, 4.0, epsilon = 0.0);
        assert_abs_diff_eq!(e.radius(), 1.0, epsilon = 0.0);
        assert_abs_diff_eq!(e.xc(), 1.0, epsilon = 0.0);
    }

    #[test]
    fn deep_cut_clamps_at_the_sharp_bound() {
        let mut e = Ell1d::new(0.0, 4.0);
        // Feasible set within x <= 1: g = 1, beta = xc - 1 = 1.
        let (status, _) = e.update(1.0, 1.0);
        assert_eq!(status, CutStatus::Success);
        assert_abs_diff_eq!(e.xc(), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(e.radius(), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn negative_gradient_keeps_the_upper_part() {
        let mut e = Ell1d::new(0.0, 4.0);
        // Feasible set within x >= 3: g = -1, beta = 3 - xc = 1.
        let (status, _) = e.update(-1.0, 1.0);
        assert_eq!(status, CutStatus::Success);
        assert_abs_diff_eq!(e.xc(), 3.5, epsilon = 1e-15);
        assert_abs_diff_eq!(e.radius(), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn terminal_statuses() {
        let mut e = Ell1d::new(0.0, 4.0);
        assert_eq!(e.update(1.0, 3.0).0, CutStatus::NoSoln);
        assert_eq!(e.update(1.0, -3.0).0, CutStatus::NoEffect);
    }
}
