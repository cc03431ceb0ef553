//! Oracles for linear matrix inequalities.

use crate::cutting_plane::{Beta, Cut, OracleFeas};
use crate::ldlt::LdltExt;
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Oracle for the feasibility problem `B − Σ Fᵢ·xᵢ ⪰ 0`.
///
/// Each query factors the constraint matrix lazily; on failure the witness
/// vector turns into a deep cut with gradient `gᵢ = vᵀFᵢv`.
#[must_use]
pub struct LmiOracle {
    f: Vec<Matrix>,
    f0: Matrix,
    ldlt: LdltExt,
}

impl LmiOracle {
    /// New oracle from the coefficient matrices `f` and the offset `b`.
    ///
    /// # Panics
    /// Panics if the matrices are not square of equal order.
    pub fn new(f: Vec<Matrix>, b: Matrix) -> Self {
        let m = b.nrows();
        assert_eq!(b.ncols(), m, "LmiOracle: offset matrix must be square");
        for fk in &f {
            assert_eq!(fk.nrows(), m, "LmiOracle: order mismatch");
            assert_eq!(fk.ncols(), m, "LmiOracle: order mismatch");
        }
        Self {
            f,
            f0: b,
            ldlt: LdltExt::new(m),
        }
    }
}

impl OracleFeas for LmiOracle {
    fn assess_feas(&mut self, x: &Vector) -> Option<Cut> {
        let Self { f, f0, ldlt } = self;
        assert_eq!(x.len(), f.len(), "LmiOracle: variable count mismatch");

        let spd = ldlt.factor(|i, j| {
            let mut a = f0[(i, j)];
            for (fk, xk) in f.iter().zip(x.iter()) {
                a -= fk[(i, j)] * xk;
            }
            a
        });
        if spd {
            return None;
        }
        let ep = ldlt.witness();
        let mut g = Vector::zeros(x.len());
        for (k, fk) in f.iter().enumerate() {
            g[k] = ldlt.sym_quad(fk);
        }
        Some(Cut::new(g, Beta::Deep(ep)))
    }
}

/// Oracle for the homogeneous variant `Σ Fᵢ·xᵢ ⪰ 0`.
#[must_use]
pub struct Lmi0Oracle {
    f: Vec<Matrix>,
    ldlt: LdltExt,
}

impl Lmi0Oracle {
    /// New oracle from the coefficient matrices.
    ///
    /// # Panics
    /// Panics if the matrices are not square of equal order, or `f` is
    /// empty.
    pub fn new(f: Vec<Matrix>) -> Self {
        let m = f.first().expect("Lmi0Oracle: no matrices").nrows();
        for fk in &f {
            assert_eq!(fk.nrows(), m, "Lmi0Oracle: order mismatch");
            assert_eq!(fk.ncols(), m, "Lmi0Oracle: order mismatch");
        }
        Self {
            f,
            ldlt: LdltExt::new(m),
        }
    }
}

impl OracleFeas for Lmi0Oracle {
    fn assess_feas(&mut self, x: &Vector) -> Option<Cut> {
        let Self { f, ldlt } = self;
        assert_eq!(x.len(), f.len(), "Lmi0Oracle: variable count mismatch");

        let spd = ldlt.factor(|i, j| {
            let mut a = 0.0;
            for (fk, xk) in f.iter().zip(x.iter()) {
                a += fk[(i, j)] * xk;
            }
            a
        });
        if spd {
            return None;
        }
        let ep = ldlt.witness();
        let mut g = Vector::zeros(x.len());
        for (k, fk) in f.iter().enumerate() {
            g[k] = -ldlt.sym_quad(fk);
        }
        Some(Cut::new(g, Beta::Deep(ep)))
    }
}
