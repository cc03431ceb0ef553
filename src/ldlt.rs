//! Square-root-free LDLᵀ factorization with an indefiniteness witness.
//!
//! [`LdltExt`] either certifies that a symmetric matrix is positive
//! (semi-)definite or reports the smallest leading principal window
//! `[start, stop)` that is not, together with a vector `v` proving it
//! (`vᵀ A[start:stop, start:stop] v < 0`). The matrix may be supplied
//! lazily through an element accessor, so oracles can factor constraint
//! matrices without materializing them; the factorization stops at the
//! first bad pivot, which keeps the per-query cost proportional to the
//! failing window rather than the full order.

use crate::matrix::Matrix;
use crate::vector::Vector;

/// Incremental LDLᵀ factorization state.
///
/// The scratch matrix `T` double-duties: the strict lower triangle holds the
/// multipliers of `L`, the diagonal holds the pivots of `D`, and the strict
/// upper triangle is working storage for the row recurrence. `T` and the
/// witness vector are allocated once at construction and reused across
/// factorizations.
///
/// # Examples
/// ```
/// use ellcut::{LdltExt, Matrix};
///
/// let a = Matrix::from_rows(&[&[25.0, 15.0, -5.0], &[15.0, 18.0, 0.0], &[-5.0, 0.0, 11.0]]);
/// let mut ldlt = LdltExt::new(3);
/// assert!(ldlt.factorize(&a));
/// ```
#[must_use]
#[derive(Debug)]
pub struct LdltExt {
    n: usize,
    t: Matrix,
    p: (usize, usize),
    v: Vector,
}

impl LdltExt {
    /// New factorization state for matrices of order `n`.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            t: Matrix::zeros(n, n),
            p: (0, 0),
            v: Vector::zeros(n),
        }
    }

    /// Order of the matrices this state factors.
    #[inline]
    #[must_use]
    pub fn order(&self) -> usize {
        self.n
    }

    /// Factor a materialized symmetric matrix.
    ///
    /// Returns `true` when the matrix is positive definite.
    ///
    /// # Panics
    /// Panics if `a` is not `n × n`.
    pub fn factorize(&mut self, a: &Matrix) -> bool {
        assert_eq!(a.nrows(), self.n, "factorize: order mismatch");
        assert_eq!(a.ncols(), self.n, "factorize: order mismatch");
        self.factor(|i, j| a[(i, j)])
    }

    /// Factor a symmetric matrix supplied through an element accessor.
    ///
    /// `get_a(i, j)` is only ever called with `j <= i`. Returns `true` when
    /// the matrix is positive definite; otherwise [`Self::witness_range`]
    /// describes the offending window.
    pub fn factor<F>(&mut self, get_a: F) -> bool
    where
        F: FnMut(usize, usize) -> f64,
    {
        self.factor_impl(get_a, false)
    }

    /// Like [`Self::factor`], but a zero pivot restarts the factorization at
    /// the next row instead of failing, so positive *semi*-definite matrices
    /// are accepted.
    pub fn factor_with_allow_semidefinite<F>(&mut self, get_a: F) -> bool
    where
        F: FnMut(usize, usize) -> f64,
    {
        self.factor_impl(get_a, true)
    }

    fn factor_impl<F>(&mut self, mut get_a: F, allow_semidefinite: bool) -> bool
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut start = 0usize;
        let mut stop = 0usize;

        for i in 0..self.n {
            let mut d = get_a(i, start);
            for j in start..i {
                self.t[(j, i)] = d;
                self.t[(i, j)] = d / self.t[(j, j)];
                let s = j + 1;
                d = get_a(i, s);
                for k in start..s {
                    d -= self.t[(i, k)] * self.t[(k, s)];
                }
            }
            self.t[(i, i)] = d;

            if allow_semidefinite {
                if d < 0.0 {
                    stop = i + 1;
                    break;
                }
                if d == 0.0 {
                    // Restart past the semidefinite block.
                    start = i + 1;
                }
            } else if d <= 0.0 {
                stop = i + 1;
                break;
            }
        }

        self.p = (start, stop);
        self.is_spd()
    }

    /// Whether the last factorization certified positive definiteness
    /// (semi-definiteness in the allow-semidefinite mode).
    #[inline]
    #[must_use]
    pub fn is_spd(&self) -> bool {
        self.p.1 == 0
    }

    /// The half-open row window `[start, stop)` where the factorization
    /// stopped. `stop == 0` means it ran to completion.
    #[inline]
    #[must_use]
    pub fn witness_range(&self) -> (usize, usize) {
        self.p
    }

    /// Build the witness vector and return the certificate value
    /// `-T[m][m] >= 0`, where `m = stop - 1`.
    ///
    /// After this call, `vᵀ A[start:stop, start:stop] v` equals minus the
    /// returned value (and is negative, or zero for a zero pivot).
    ///
    /// # Panics
    /// Panics if the last factorization succeeded — asking for a witness of
    /// a positive definite matrix is a programming error.
    pub fn witness(&mut self) -> f64 {
        assert!(
            !self.is_spd(),
            "witness() called on a positive definite matrix"
        );
        let (start, stop) = self.p;
        let m = stop - 1;
        self.v[m] = 1.0;
        for i in (start + 1..=m).rev() {
            let mut s = 0.0;
            for k in i..stop {
                s += self.t[(k, i - 1)] * self.v[k];
            }
            self.v[i - 1] = -s;
        }
        -self.t[(m, m)]
    }

    /// The witness vector; meaningful on `[start, stop)` after a call to
    /// [`Self::witness`].
    #[inline]
    #[must_use]
    pub fn witness_vector(&self) -> &[f64] {
        self.v.as_slice()
    }

    /// Evaluate `vᵀ B[start:stop, start:stop] v` for a symmetric `B` of the
    /// same order, exploiting symmetry to halve the work. Oracles use this
    /// to turn the witness into constraint gradients.
    ///
    /// # Panics
    /// Panics if `b` is not `n × n`.
    #[must_use]
    pub fn sym_quad(&self, b: &Matrix) -> f64 {
        assert_eq!(b.nrows(), self.n, "sym_quad: order mismatch");
        assert_eq!(b.ncols(), self.n, "sym_quad: order mismatch");
        let (start, stop) = self.p;
        let mut res = 0.0;
        for i in start..stop {
            let mut s = 0.0;
            for j in i + 1..stop {
                s += b[(i, j)] * self.v[j];
            }
            res += self.v[i] * (b[(i, i)] * self.v[i] + 2.0 * s);
        }
        res
    }

    /// Upper-triangular `R` with `RᵀR = A` for the last factored matrix.
    ///
    /// # Panics
    /// Panics if the last factorization did not certify positive
    /// definiteness — a square root of an indefinite matrix is a
    /// programming error.
    #[must_use]
    pub fn sqrt(&self) -> Matrix {
        assert!(self.is_spd(), "sqrt() called on an indefinite matrix");
        let mut r = Matrix::zeros(self.n, self.n);
        for i in 0..self.n {
            let d_sqrt = self.t[(i, i)].sqrt();
            r[(i, i)] = d_sqrt;
            for j in i + 1..self.n {
                r[(i, j)] = self.t[(j, i)] * d_sqrt;
            }
        }
        r
    }
}
