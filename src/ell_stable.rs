//! N-dimensional ellipsoid search space keeping `Q` in factored form.
//!
//! Same contract as [`crate::Ell`], but the shape matrix is never stored
//! explicitly: a single `n × n` buffer holds the LDLᵀ factors of `Q⁻¹`
//! (strict upper triangle `Lᵀ`, diagonal `D⁻¹`, strict lower triangle
//! scratch reused inside `update`), so `Q = L⁻ᵀ·D⁻¹·L⁻¹` stays symmetric
//! positive definite under every cut.

use crate::cutting_plane::{Cut, CutStatus, SearchSpace};
use crate::ell::calc_cut;
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Ellipsoid search space with `Q⁻¹` maintained as LDLᵀ factors.
#[must_use]
#[derive(Clone, Debug)]
pub struct EllStable {
    /// Exploit two-sided cuts when the oracle provides them.
    pub use_parallel_cut: bool,
    /// Fold κ into the factors after every update.
    pub no_defer_trick: bool,

    n: usize,
    c1: f64,
    kappa: f64,
    xc: Vector,
    // Factors of Q⁻¹: diag = D⁻¹, strict upper = Lᵀ, strict lower = scratch.
    q: Matrix,
}

impl EllStable {
    /// Ball of squared radius `kappa` centered at `xc`.
    ///
    /// # Panics
    /// Panics if the dimension is less than 2 or `kappa` is not positive.
    pub fn new(kappa: f64, xc: Vector) -> Self {
        let n = xc.len();
        Self::with_factors(kappa, Matrix::identity(n), xc)
    }

    /// Axis-aligned ellipsoid with the given squared semi-axes.
    ///
    /// # Panics
    /// Panics as for [`Self::new`], or if `val.len() != xc.len()`.
    pub fn with_diag(val: &[f64], xc: Vector) -> Self {
        assert_eq!(val.len(), xc.len(), "with_diag: dimension mismatch");
        Self::with_factors(1.0, Matrix::diag(val), xc)
    }

    fn with_factors(kappa: f64, q: Matrix, xc: Vector) -> Self {
        let n = xc.len();
        assert!(n >= 2, "EllStable requires dimension >= 2");
        assert!(kappa > 0.0, "EllStable requires a positive scale");
        #[allow(clippy::cast_precision_loss)]
        let nf = n as f64;
        Self {
            use_parallel_cut: true,
            no_defer_trick: false,
            n,
            c1: nf * nf / (nf * nf - 1.0),
            kappa,
            xc,
            q,
        }
    }

    /// Dimension of the search space.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Deferred scale κ.
    #[inline]
    #[must_use]
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Materialize the shape matrix (κ still deferred), mainly for
    /// diagnostics and tests. Cost is O(n³).
    #[must_use]
    pub fn dense_q(&self) -> Matrix {
        let n = self.n;
        let mut out = Matrix::zeros(n, n);
        let mut y = vec![0.0; n];
        for k in 0..n {
            y.fill(0.0);
            y[k] = 1.0;
            // Forward solve L y = e_k; L[i][j] lives at q[(j, i)].
            for i in k + 1..n {
                let mut s = y[i];
                for (j, y_j) in y.iter().enumerate().take(i).skip(k) {
                    s -= self.q[(j, i)] * y_j;
                }
                y[i] = s;
            }
            for (i, y_i) in y.iter_mut().enumerate() {
                *y_i *= self.q[(i, i)];
            }
            // Back solve Lᵀ u = z.
            for i in (0..n.saturating_sub(1)).rev() {
                let mut s = y[i];
                for j in i + 1..n {
                    s -= self.q[(i, j)] * y[j];
                }
                y[i] = s;
            }
            for r in 0..n {
                out[(r, k)] = y[r];
            }
        }
        out
    }

    #[allow(clippy::cast_precision_loss)]
    fn nf(&self) -> f64 {
        self.n as f64
    }
}

impl SearchSpace for EllStable {
    fn xc(&self) -> Vector {
        self.xc.clone()
    }

    fn set_xc(&mut self, xc: Vector) {
        assert_eq!(xc.len(), self.n, "set_xc: dimension mismatch");
        self.xc = xc;
    }

    fn update(&mut self, cut: Cut) -> (CutStatus, f64) {
        let g = cut.grad;
        assert_eq!(g.len(), self.n, "update: gradient dimension mismatch");
        let n = self.n;

        // Forward substitution: inv(L)·g, stashing L[i][j]·y[j] in the
        // strict lower triangle for the rank-one update below.
        let mut inv_lg = g.clone();
        for i in 1..n {
            for j in 0..i {
                let s = self.q[(j, i)] * inv_lg[j];
                self.q[(i, j)] = s;
                inv_lg[i] -= s;
            }
        }

        // inv(D)·inv(L)·g and ω = gᵀ·Q·g.
        let mut inv_d_inv_lg = inv_lg.clone();
        let mut omega = 0.0;
        for i in 0..n {
            inv_d_inv_lg[i] *= self.q[(i, i)];
            omega += inv_lg[i] * inv_d_inv_lg[i];
        }

        let tsq = self.kappa * omega;
        let params = match calc_cut(&cut.beta, tsq, self.nf(), self.c1, self.use_parallel_cut) {
            Ok(params) => params,
            Err(status) => return (status, tsq),
        };

        // Back substitution: Q·g = inv(Lᵀ)·inv(D)·inv(L)·g.
        let mut qg = inv_d_inv_lg;
        for i in (0..n.saturating_sub(1)).rev() {
            let mut s = qg[i];
            for j in i + 1..n {
                s -= self.q[(i, j)] * qg[j];
            }
            qg[i] = s;
        }

        let tau = tsq.sqrt();
        self.xc.axpy(-(params.rho * tau / omega), &qg);

        // Rank-one update of the factors: Q⁻¹ ← Q⁻¹ + μ·g·gᵀ.
        let r = params.sigma / omega;
        let mu = r / (1.0 - params.sigma);
        let mut w = g;
        let mut oldt = 1.0;
        for j in 0..n {
            let p = w[j];
            let mup = mu * p;
            let t = oldt + mup * p * self.q[(j, j)];
            self.q[(j, j)] /= t;
            let beta = mup * self.q[(j, j)];
            self.q[(j, j)] *= oldt;
            for l in j + 1..n {
                let s = self.q[(l, j)];
                w[l] -= s;
                self.q[(j, l)] += beta * w[l];
            }
            oldt = t;
        }

        self.kappa *= params.delta;
        if self.no_defer_trick {
            for i in 0..n {
                self.q[(i, i)] *= self.kappa;
            }
            self.kappa = 1.0;
        }
        (CutStatus::Success, tsq)
    }
}
