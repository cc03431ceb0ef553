//! Oracle for quadratic matrix inequalities.

use crate::cutting_plane::{Beta, Cut, OracleFeas, ParametricOracle};
use crate::ldlt::LdltExt;
use crate::matrix::Matrix;
use crate::vector::{Vector, slice_dot};

/// Oracle for the feasibility problem `t·I − F(x)·F(x)ᵀ ⪰ 0` with
/// `F(x) = F₀ − Σ Fᵢ·xᵢ`.
///
/// The Gram matrix is never materialized: its entries are dot products of
/// rows of `F(x)`, which are computed on demand and memoized up to the row
/// currently being factored. The parameter `t` is installed through
/// [`ParametricOracle::update`], so the oracle plugs into
/// [`crate::BsearchAdaptor`].
#[must_use]
pub struct QmiOracle {
    t: f64,
    count: usize,
    f: Vec<Matrix>,
    f0: Matrix,
    fx: Matrix,
    ldlt: LdltExt,
}

impl QmiOracle {
    /// New oracle from the coefficient matrices `f` and the offset `f0`
    /// (all of the same `m × p` shape).
    ///
    /// # Panics
    /// Panics if the shapes disagree.
    pub fn new(f: Vec<Matrix>, f0: Matrix) -> Self {
        let (m, p) = (f0.nrows(), f0.ncols());
        for fk in &f {
            assert_eq!(fk.nrows(), m, "QmiOracle: shape mismatch");
            assert_eq!(fk.ncols(), p, "QmiOracle: shape mismatch");
        }
        Self {
            t: 0.0,
            count: 0,
            f,
            f0,
            fx: Matrix::zeros(m, p),
            ldlt: LdltExt::new(m),
        }
    }
}

impl ParametricOracle for QmiOracle {
    fn update(&mut self, t: f64) {
        self.t = t;
    }
}

impl OracleFeas for QmiOracle {
    fn assess_feas(&mut self, x: &Vector) -> Option<Cut> {
        let nx = x.len();
        assert_eq!(nx, self.f.len(), "QmiOracle: variable count mismatch");

        self.count = 0;
        let Self {
            t,
            count,
            f,
            f0,
            fx,
            ldlt,
        } = self;

        let spd = ldlt.factor(|i, j| {
            if *count < i + 1 {
                // Row i of F(x) becomes needed for the first time.
                *count = i + 1;
                let row = fx.row_mut(i);
                row.copy_from_slice(f0.row(i));
                for (fk, xk) in f.iter().zip(x.iter()) {
                    for (dst, src) in row.iter_mut().zip(fk.row(i)) {
                        *dst -= src * xk;
                    }
                }
            }
            let mut a = -slice_dot(fx.row(i), fx.row(j));
            if i == j {
                a += *t;
            }
            a
        });
        if spd {
            return None;
        }

        let ep = ldlt.witness();
        let (start, stop) = ldlt.witness_range();
        let v = ldlt.witness_vector();
        let p = f0.ncols();

        // av = vᵀ·F(x) over the witness window.
        let mut av = vec![0.0; p];
        for i in start..stop {
            let vi = v[i];
            for (a, src) in av.iter_mut().zip(fx.row(i)) {
                *a += vi * src;
            }
        }

        let mut g = Vector::zeros(nx);
        for (k, fk) in f.iter().enumerate() {
            let mut vfk = vec![0.0; p];
            for i in start..stop {
                let vi = v[i];
                for (a, src) in vfk.iter_mut().zip(fk.row(i)) {
                    *a += vi * src;
                }
            }
            g[k] = -2.0 * slice_dot(&vfk, &av);
        }
        Some(Cut::new(g, Beta::Deep(ep)))
    }
}
