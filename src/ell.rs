//! N-dimensional ellipsoid search space with an explicit shape matrix.

use crate::cutting_plane::{Beta, Cut, CutStatus, SearchSpace};
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Shrink coefficients for one cut, in normalized units (`α = β/τ`).
#[derive(Clone, Copy, Debug)]
pub(crate) struct CutCalc {
    pub rho: f64,
    pub sigma: f64,
    pub delta: f64,
}

fn calc_central(n: f64, c1: f64) -> CutCalc {
    let rho = 1.0 / (n + 1.0);
    CutCalc {
        rho,
        sigma: 2.0 * rho,
        delta: c1,
    }
}

fn calc_deep(alpha: f64, n: f64, c1: f64) -> Result<CutCalc, CutStatus> {
    if alpha == 0.0 {
        return Ok(calc_central(n, c1));
    }
    if alpha > 1.0 {
        return Err(CutStatus::NoSoln);
    }
    if n * alpha < -1.0 {
        return Err(CutStatus::NoEffect);
    }
    let rho = (1.0 + n * alpha) / (n + 1.0);
    let sigma = 2.0 * rho / (1.0 + alpha);
    let delta = c1 * (1.0 - alpha * alpha);
    Ok(CutCalc { rho, sigma, delta })
}

fn calc_parallel(a0: f64, a1: f64, n: f64, c1: f64) -> Result<CutCalc, CutStatus> {
    if a1 >= 1.0 {
        // The outer half-space misses the ellipsoid; only the inner one cuts.
        return calc_deep(a0, n, c1);
    }
    if a0 > a1 {
        return Err(CutStatus::NoSoln);
    }
    let aprod = a0 * a1;
    if n * aprod < -1.0 {
        return Err(CutStatus::NoEffect);
    }
    let asq0 = a0 * a0;
    let asq1 = a1 * a1;
    let asqdiff = asq1 - asq0;
    let asum = a0 + a1;
    let xi = (4.0 * (1.0 - asq0) * (1.0 - asq1) + n * n * asqdiff * asqdiff).sqrt();
    let sigma = (n + 2.0 * (1.0 + aprod - xi / 2.0) / (asum * asum)) / (n + 1.0);
    let rho = asum * sigma / 2.0;
    let delta = c1 * (1.0 - (asq0 + asq1 - xi / n) / 2.0);
    Ok(CutCalc { rho, sigma, delta })
}

/// Dispatch a cut to the central/deep/parallel calculus.
pub(crate) fn calc_cut(
    beta: &Beta,
    tsq: f64,
    n: f64,
    c1: f64,
    use_parallel_cut: bool,
) -> Result<CutCalc, CutStatus> {
    let tau = tsq.sqrt();
    match *beta {
        Beta::Central => Ok(calc_central(n, c1)),
        Beta::Deep(b) => calc_deep(b / tau, n, c1),
        Beta::Parallel(b0, b1) => {
            if use_parallel_cut {
                calc_parallel(b0 / tau, b1 / tau, n, c1)
            } else {
                calc_deep(b0 / tau, n, c1)
            }
        }
    }
}

/// Ellipsoid search space `{ x | (x − xc)ᵀ (κQ)⁻¹ (x − xc) ≤ 1 }`.
///
/// The scalar κ is kept apart from `Q` so that the per-cut `δ` scaling is
/// O(1) instead of O(n²); readers of [`Self::q`] must fold
/// [`Self::kappa`] back in. Setting `no_defer_trick` folds κ into `Q`
/// after every update instead.
#[must_use]
#[derive(Clone, Debug)]
pub struct Ell {
    /// Exploit two-sided cuts when the oracle provides them.
    pub use_parallel_cut: bool,
    /// Fold κ into `Q` after every update.
    pub no_defer_trick: bool,

    n: usize,
    c1: f64,
    kappa: f64,
    xc: Vector,
    q: Matrix,
}

impl Ell {
    /// Ball of squared radius `kappa` centered at `xc`.
    ///
    /// # Panics
    /// Panics if the dimension is less than 2 (use [`crate::Ell1d`] for the
    /// 1-D case) or `kappa` is not positive.
    pub fn new(kappa: f64, xc: Vector) -> Self {
        let n = xc.len();
        Self::with_shape(kappa, Matrix::identity(n), xc)
    }

    /// Axis-aligned ellipsoid with the given squared semi-axes.
    ///
    /// # Panics
    /// Panics as for [`Self::new`], or if `val.len() != xc.len()`.
    pub fn with_diag(val: &[f64], xc: Vector) -> Self {
        assert_eq!(val.len(), xc.len(), "with_diag: dimension mismatch");
        Self::with_shape(1.0, Matrix::diag(val), xc)
    }

    fn with_shape(kappa: f64, q: Matrix, xc: Vector) -> Self {
        let n = xc.len();
        assert!(n >= 2, "Ell requires dimension >= 2");
        assert!(kappa > 0.0, "Ell requires a positive scale");
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

    /// Shape matrix with κ still deferred; the effective matrix is `κ·Q`.
    #[inline]
    #[must_use]
    pub fn q(&self) -> &Matrix {
        &self.q
    }

    #[allow(clippy::cast_precision_loss)]
    fn nf(&self) -> f64 {
        self.n as f64
    }
}

impl SearchSpace for Ell {
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

        let qg = self.q.mul_vec(&g);
        let omega = g.dot(&qg);
        let tsq = self.kappa * omega;

        let params = match calc_cut(&cut.beta, tsq, self.nf(), self.c1, self.use_parallel_cut) {
            Ok(params) => params,
            Err(status) => return (status, tsq),
        };

        let tau = tsq.sqrt();
        self.xc.axpy(-(params.rho * tau / omega), &qg);

        // Symmetric rank-one downdate, lower cost thanks to the deferred δ.
        let r = params.sigma / omega;
        for i in 0..self.n {
            let r_qg_i = r * qg[i];
            for j in i..self.n {
                let val = self.q[(i, j)] - r_qg_i * qg[j];
                self.q[(i, j)] = val;
                self.q[(j, i)] = val;
            }
        }
        self.kappa *= params.delta;

        if self.no_defer_trick {
            self.q.scale(self.kappa);
            self.kappa = 1.0;
        }
        (CutStatus::Success, tsq)
    }
}
