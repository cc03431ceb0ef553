//! Oracle for low-pass FIR filter design via spectral factorization.
//!
//! The design problem ("FIR Filter Design via Spectral Factorization and
//! Convex Optimization", Wu, Boyd, Vandenberghe) minimizes the maximum
//! stopband energy of the squared magnitude response `R(ω)` subject to
//! ripple bounds in the passband and `R(ω) ≥ 0` everywhere, over the
//! autocorrelation coefficients of the filter. After sampling the frequency
//! axis every constraint is linear in the coefficients, so one violated
//! sample row yields a cut — usually a parallel one, since the band
//! constraints are two-sided.

use std::f64::consts::PI;

use crate::cutting_plane::{Beta, Cut, OracleOptim};
use crate::matrix::Matrix;
use crate::vector::Vector;

fn submatrix_rows(a: &Matrix, lo: usize, hi: usize) -> Matrix {
    let mut out = Matrix::zeros(hi - lo, a.ncols());
    for r in lo..hi {
        out.row_mut(r - lo).copy_from_slice(a.row(r));
    }
    out
}

/// Separation oracle for the sampled low-pass design problem.
///
/// The oracle is deliberately stateful: each constraint family keeps a
/// round-robin index so that consecutive queries resume scanning where the
/// previous violation was found instead of rescanning from row zero. Two
/// queries at the same point may therefore return different (equally valid)
/// cuts.
#[must_use]
pub struct LowpassOracle {
    pass_band: Matrix,
    stop_band: Matrix,
    trans_band: Matrix,
    lp_sq: f64,
    up_sq: f64,
    i_pass: usize,
    i_stop: usize,
    i_trans: usize,
}

impl LowpassOracle {
    /// Build the sampled design problem for a filter with `n` taps.
    ///
    /// `wpass` and `wstop` are the band edges as fractions of π;
    /// `delta0_pass` and `delta0_stop` the allowed passband ripple and
    /// stopband attenuation. Returns the oracle and the initial stopband
    /// energy bound to start the minimization from.
    pub fn create(
        n: usize,
        wpass: f64,
        wstop: f64,
        delta0_pass: f64,
        delta0_stop: f64,
    ) -> (Self, f64) {
        // Rule-of-thumb discretization of [0, π].
        let m = 15 * n;
        let delta = 20.0 * (1.0 + delta0_pass).log10();
        let delta2 = 20.0 * delta0_stop.log10();

        #[allow(clippy::cast_precision_loss)]
        let w: Vec<f64> = (0..m)
            .map(|i| i as f64 * PI / (m - 1) as f64)
            .collect();

        // Spectrum matrix: row ω is [1, 2cos(ω), ..., 2cos((n-1)ω)].
        let mut a = Matrix::zeros(m, n);
        for (r, &wr) in w.iter().enumerate() {
            let row = a.row_mut(r);
            row[0] = 1.0;
            for (c, entry) in row.iter_mut().enumerate().skip(1) {
                #[allow(clippy::cast_precision_loss)]
                let harmonics = wr * c as f64;
                *entry = 2.0 * harmonics.cos();
            }
        }

        let wpass = wpass * PI;
        let wstop = wstop * PI;
        let n_pass = w.iter().filter(|&&x| x <= wpass).count();
        let stop_from = w
            .iter()
            .position(|&x| wstop <= x)
            .expect("stopband edge beyond the sampled grid");

        let lp = 10f64.powf(-delta / 20.0);
        let up = 10f64.powf(delta / 20.0);
        let sp = 10f64.powf(delta2 / 20.0);

        let oracle = Self {
            pass_band: submatrix_rows(&a, 0, n_pass),
            stop_band: submatrix_rows(&a, stop_from, m),
            // Transition block: the rows strictly between the bands.
            trans_band: submatrix_rows(&a, n_pass, stop_from),
            lp_sq: lp * lp,
            up_sq: up * up,
            i_pass: 0,
            i_stop: 0,
            i_trans: 0,
        };
        (oracle, sp * sp)
    }
}

impl OracleOptim for LowpassOracle {
    fn assess_optim(&mut self, x: &Vector, spsq: f64) -> (Cut, f64) {
        let n = x.len();

        // Zeroth autocorrelation coefficient must stay nonnegative.
        if x[0] < 0.0 {
            let mut g = Vector::zeros(n);
            g[0] = -1.0;
            return (Cut::new(g, Beta::Deep(-x[0])), spsq);
        }

        // Passband ripple, both sides.
        let rows = self.pass_band.nrows();
        let mut k = self.i_pass;
        for _ in 0..rows {
            if k == rows {
                k = 0;
            }
            let v = self.pass_band.row_dot(k, x);
            if v > self.up_sq {
                let g = Vector::from(self.pass_band.row(k));
                self.i_pass = k + 1;
                return (
                    Cut::new(g, Beta::Parallel(v - self.up_sq, v - self.lp_sq)),
                    spsq,
                );
            }
            if v < self.lp_sq {
                let mut g = Vector::from(self.pass_band.row(k));
                g.scale(-1.0);
                self.i_pass = k + 1;
                return (
                    Cut::new(g, Beta::Parallel(-v + self.lp_sq, -v + self.up_sq)),
                    spsq,
                );
            }
            k += 1;
        }

        // Stopband energy; remember the worst sample for the objective.
        let rows = self.stop_band.nrows();
        let mut fmax = f64::MIN_POSITIVE;
        let mut imax = 0;
        let mut k = self.i_stop;
        for _ in 0..rows {
            if k == rows {
                k = 0;
            }
            let v = self.stop_band.row_dot(k, x);
            if v > spsq {
                let g = Vector::from(self.stop_band.row(k));
                self.i_stop = k + 1;
                return (Cut::new(g, Beta::Parallel(v - spsq, v)), spsq);
            }
            if v < 0.0 {
                let mut g = Vector::from(self.stop_band.row(k));
                g.scale(-1.0);
                self.i_stop = k + 1;
                return (Cut::new(g, Beta::Parallel(-v, -v + spsq)), spsq);
            }
            if v > fmax {
                fmax = v;
                imax = k;
            }
            k += 1;
        }

        // Nonnegativity across the transition block.
        let rows = self.trans_band.nrows();
        let mut k = self.i_trans;
        for _ in 0..rows {
            if k == rows {
                k = 0;
            }
            let v = self.trans_band.row_dot(k, x);
            if v < 0.0 {
                let mut g = Vector::from(self.trans_band.row(k));
                g.scale(-1.0);
                self.i_trans = k + 1;
                return (Cut::new(g, Beta::Deep(-v)), spsq);
            }
            k += 1;
        }

        // All constraints hold: the worst stopband sample becomes the new
        // best-so-far bound and the objective cut.
        let g = Vector::from(self.stop_band.row(imax));
        (Cut::new(g, Beta::Parallel(0.0, fmax)), fmax)
    }
}
