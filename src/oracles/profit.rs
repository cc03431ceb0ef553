//! Oracles for a Cobb-Douglas profit maximization problem.
//!
//! The problem maximizes `p·A·x₀^α₀·x₁^α₁ − v₀x₀ − v₁x₁` subject to
//! `x₀ ≤ k`, posed in the log domain `y = ln x` where it is convex.

use crate::cutting_plane::{Beta, Cut, OracleOptim, OracleQ};
use crate::vector::Vector;

/// Oracle maximizing the Cobb-Douglas profit in the log domain.
#[must_use]
pub struct ProfitOracle {
    log_p_scale: f64,
    log_k: f64,
    a: Vector,
    v: Vector,
}

impl ProfitOracle {
    /// New oracle from the market price `p`, production scale `scale`, the
    /// capacity bound `k`, output elasticities `a`, and input prices `v`.
    ///
    /// # Panics
    /// Panics if `a` and `v` differ in length.
    pub fn new(p: f64, scale: f64, k: f64, a: Vector, v: Vector) -> Self {
        assert_eq!(a.len(), v.len(), "ProfitOracle: dimension mismatch");
        Self {
            log_p_scale: (p * scale).ln(),
            log_k: k.ln(),
            a,
            v,
        }
    }
}

impl OracleOptim for ProfitOracle {
    fn assess_optim(&mut self, y: &Vector, t: f64) -> (Cut, f64) {
        let n = y.len();

        // Capacity constraint on the first input.
        let fj = y[0] - self.log_k;
        if fj > 0.0 {
            let mut g = Vector::zeros(n);
            g[0] = 1.0;
            return (Cut::new(g, Beta::Deep(fj)), t);
        }

        let log_cobb = self.log_p_scale + self.a.dot(y);
        let x: Vec<f64> = y.iter().map(|y_i| y_i.exp()).collect();
        let mut vx = 0.0;
        for (v_i, x_i) in self.v.iter().zip(&x) {
            vx += v_i * x_i;
        }

        let mut t_new = t;
        let mut te = t + vx;
        let mut fj = te.ln() - log_cobb;
        if fj < 0.0 {
            // The candidate beats the bound; tighten it.
            te = log_cobb.exp();
            t_new = te - vx;
            fj = 0.0;
        }
        let mut g = Vector::zeros(n);
        for i in 0..n {
            g[i] = self.v[i] * x[i] / te - self.a[i];
        }
        (Cut::new(g, Beta::Deep(fj)), t_new)
    }
}

/// Robust variant: elasticities and prices carry interval uncertainty, and
/// each query evaluates the worst case for the sign of `y`.
#[must_use]
pub struct ProfitRbOracle {
    uie: Vector,
    a: Vector,
    base: ProfitOracle,
}

impl ProfitRbOracle {
    /// New robust oracle; `e` is the elasticity uncertainty and `e3` the
    /// uncertainty on price, capacity, and input prices.
    pub fn new(p: f64, scale: f64, k: f64, a: Vector, v: Vector, e: Vector, e3: f64) -> Self {
        let mut v_rb = v;
        for v_i in v_rb.as_mut_slice() {
            *v_i += e3;
        }
        Self {
            uie: e,
            base: ProfitOracle::new(p - e3, scale, k - e3, a.clone(), v_rb),
            a,
        }
    }
}

impl OracleOptim for ProfitRbOracle {
    fn assess_optim(&mut self, y: &Vector, t: f64) -> (Cut, f64) {
        let mut a_rb = self.a.clone();
        for i in 0..a_rb.len() {
            a_rb[i] += if y[i] > 0.0 { -self.uie[i] } else { self.uie[i] };
        }
        self.base.a = a_rb;
        self.base.assess_optim(y, t)
    }
}

/// Discrete variant: rounds `exp(y)` to integer quantities and always
/// offers the cut at the snapped point.
#[must_use]
pub struct ProfitQOracle {
    base: ProfitOracle,
}

impl ProfitQOracle {
    /// New discrete oracle over the same parameters as [`ProfitOracle`].
    pub fn new(p: f64, scale: f64, k: f64, a: Vector, v: Vector) -> Self {
        Self {
            base: ProfitOracle::new(p, scale, k, a, v),
        }
    }
}

impl OracleQ for ProfitQOracle {
    fn assess_q(&mut self, y: &Vector, t: f64, _retry: bool) -> (Cut, f64, Vector, bool) {
        let mut x: Vec<f64> = y.iter().map(|y_i| y_i.exp().round()).collect();
        for x_i in &mut x {
            if *x_i == 0.0 {
                *x_i = 1.0;
            }
        }
        let yd = Vector::from(x.iter().map(|x_i| x_i.ln()).collect::<Vec<_>>());
        let (cut, t1) = self.base.assess_optim(&yd, t);
        (cut, t1, yd, true)
    }
}
