//! Cutting-plane drivers and the oracle / search-space contract.
//!
//! A driver owns nothing: it borrows a separation oracle and a search space
//! for the duration of one solve and shuttles cuts from the former into the
//! latter until the oracle certifies feasibility, the space reports that no
//! feasible point can remain, or the squared step size τ² falls below the
//! tolerance.

use crate::vector::Vector;

/// Offset part of a cut.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Beta {
    /// Cut through the centroid.
    Central,
    /// Single cut shifted toward the feasible region by β.
    Deep(f64),
    /// Two-sided cut bounding a slab, `β₀ ≤ β₁`.
    Parallel(f64, f64),
}

/// Separating half-space `gᵀ(x − xc) + β ≤ 0` guaranteed to contain the
/// feasible set.
#[must_use]
#[derive(Clone, Debug)]
pub struct Cut {
    /// Hyperplane normal.
    pub grad: Vector,
    /// Offset(s).
    pub beta: Beta,
}

impl Cut {
    /// Bundle a gradient with its offset.
    #[inline]
    pub fn new(grad: Vector, beta: Beta) -> Self {
        Self { grad, beta }
    }
}

/// Outcome of absorbing one cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutStatus {
    /// Cut absorbed; the ellipsoid shrank.
    Success,
    /// The cut excludes the whole ellipsoid; the problem is infeasible.
    NoSoln,
    /// τ² fell below the tolerance.
    SmallEnough,
    /// The cut does not shrink the ellipsoid; recoverable.
    NoEffect,
}

/// Iteration bound and tolerance for one solve.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Maximum number of iterations.
    pub max_it: usize,
    /// Tolerance on the squared step size τ².
    pub tol: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_it: 2000,
            tol: 1e-8,
        }
    }
}

/// What a driver reports back.
#[derive(Clone, Copy, Debug)]
pub struct SolverInfo {
    /// Whether a feasible point (or an objective improvement) was found.
    pub feasible: bool,
    /// Iterations performed.
    pub num_iters: usize,
    /// Status of the final cut.
    pub status: CutStatus,
    /// Best objective value, where the driver tracks one.
    pub value: f64,
}

/// Search space shrunk by cuts; implemented by [`crate::Ell`] and
/// [`crate::EllStable`].
pub trait SearchSpace {
    /// Current centroid (owned copy).
    fn xc(&self) -> Vector;
    /// Move the centroid.
    fn set_xc(&mut self, xc: Vector);
    /// Absorb a cut; returns the status and τ².
    fn update(&mut self, cut: Cut) -> (CutStatus, f64);
}

/// Feasibility oracle: `None` certifies membership, otherwise a separating
/// cut.
pub trait OracleFeas {
    /// Assess the candidate point.
    fn assess_feas(&mut self, x: &Vector) -> Option<Cut>;
}

/// Optimization oracle: returns a cut and the possibly improved best-so-far
/// objective value (returned unchanged when the candidate brings no
/// improvement).
pub trait OracleOptim {
    /// Assess the candidate point against the best-so-far value `t`.
    fn assess_optim(&mut self, x: &Vector, t: f64) -> (Cut, f64);
}

/// Discrete-optimization oracle: also returns the snapped point `x₀` and
/// whether a cut was produced at all (`false` on an exhausted retry).
pub trait OracleQ {
    /// Assess the candidate; `retry` signals that the previous cut had no
    /// effect and an alternative is wanted.
    fn assess_q(&mut self, x: &Vector, t: f64, retry: bool) -> (Cut, f64, Vector, bool);
}

/// Boolean oracle for [`bsearch`].
pub trait OracleBs {
    /// Whether the scalar parameter `t` is achievable.
    fn assess_bs(&mut self, t: f64) -> bool;
}

/// Feasibility oracle parameterized by a scalar; re-targeted by
/// [`BsearchAdaptor`] before each probe.
pub trait ParametricOracle: OracleFeas {
    /// Install the parameter ahead of the next feasibility probe.
    fn update(&mut self, t: f64);
}

/// Find a point of a convex set described by a separation oracle.
pub fn cutting_plane_feas<O, S>(omega: &mut O, space: &mut S, options: &Options) -> SolverInfo
where
    O: OracleFeas + ?Sized,
    S: SearchSpace,
{
    let mut feasible = false;
    let mut status = CutStatus::Success;
    let mut num_iters = options.max_it;

    for niter in 1..=options.max_it {
        let Some(cut) = omega.assess_feas(&space.xc()) else {
            feasible = true;
            num_iters = niter;
            break;
        };
        let (st, tsq) = space.update(cut);
        status = st;
        if st != CutStatus::Success {
            num_iters = niter;
            break;
        }
        if tsq < options.tol {
            status = CutStatus::SmallEnough;
            num_iters = niter;
            break;
        }
    }
    SolverInfo {
        feasible,
        num_iters,
        status,
        value: 0.0,
    }
}

/// Minimize over a convex set: the oracle folds the objective into its cuts
/// and reports improved values of `t`.
///
/// Returns the best centroid seen and the solve report (`value` is the final
/// `t`; `feasible` means `t` improved at least once).
pub fn cutting_plane_dc<O, S>(
    omega: &mut O,
    space: &mut S,
    t: f64,
    options: &Options,
) -> (Vector, SolverInfo)
where
    O: OracleOptim + ?Sized,
    S: SearchSpace,
{
    let t_orig = t;
    let mut t = t;
    let mut x_best = space.xc();
    let mut status = CutStatus::Success;
    let mut num_iters = options.max_it;

    for niter in 1..=options.max_it {
        let (cut, t1) = omega.assess_optim(&space.xc(), t);
        if t1 != t {
            t = t1;
            x_best = space.xc();
        }
        let (st, tsq) = space.update(cut);
        status = st;
        if st == CutStatus::NoSoln {
            num_iters = niter;
            break;
        }
        if tsq < options.tol {
            status = CutStatus::SmallEnough;
            num_iters = niter;
            break;
        }
    }
    let info = SolverInfo {
        feasible: t != t_orig,
        num_iters,
        status,
        value: t,
    };
    (x_best, info)
}

/// Consecutive no-effect responses tolerated by [`cutting_plane_q`].
const Q_RETRY_BUDGET: usize = 20;

/// Discrete-optimization variant of [`cutting_plane_dc`].
///
/// When an update has no effect the oracle is asked for an alternative cut;
/// a snapped candidate `x₀` shifts the cut offset by `gᵀ(x₀ − xc)`.
pub fn cutting_plane_q<O, S>(
    omega: &mut O,
    space: &mut S,
    t: f64,
    options: &Options,
) -> (Vector, SolverInfo)
where
    O: OracleQ + ?Sized,
    S: SearchSpace,
{
    let t_orig = t;
    let mut t = t;
    let mut x_best = space.xc();
    let mut status = CutStatus::Success;
    let mut retries = Q_RETRY_BUDGET;
    let mut num_iters = options.max_it;

    for niter in 1..=options.max_it {
        let retry = status == CutStatus::NoEffect;
        let xc = space.xc();
        let (mut cut, t1, x0, snapped) = omega.assess_q(&xc, t, retry);
        if retry && !snapped {
            // No alternative cut left.
            num_iters = niter;
            break;
        }
        if snapped {
            let mut adj = 0.0;
            for i in 0..xc.len() {
                adj += cut.grad[i] * (x0[i] - xc[i]);
            }
            cut.beta = match cut.beta {
                Beta::Central => Beta::Deep(adj),
                Beta::Deep(b) => Beta::Deep(b + adj),
                Beta::Parallel(b0, b1) => Beta::Parallel(b0 + adj, b1 + adj),
            };
        }
        if t1 != t {
            t = t1;
            x_best = x0;
        }
        let (st, tsq) = space.update(cut);
        status = st;
        match st {
            CutStatus::NoSoln => {
                num_iters = niter;
                break;
            }
            CutStatus::NoEffect => {
                retries -= 1;
                if retries == 0 {
                    num_iters = niter;
                    break;
                }
            }
            _ => {
                if tsq < options.tol {
                    status = CutStatus::SmallEnough;
                    num_iters = niter;
                    break;
                }
                retries = Q_RETRY_BUDGET;
            }
        }
    }
    let info = SolverInfo {
        feasible: t != t_orig,
        num_iters,
        status,
        value: t,
    };
    (x_best, info)
}

/// Monotone binary search on a scalar parameter over `[l, u]`.
///
/// `value` is the final upper bound; `feasible` means it moved.
pub fn bsearch<O>(omega: &mut O, intvl: (f64, f64), options: &Options) -> SolverInfo
where
    O: OracleBs + ?Sized,
{
    let (mut l, mut u) = intvl;
    let u_orig = u;
    let mut num_iters = options.max_it;

    for niter in 1..=options.max_it {
        let t = l + (u - l) / 2.0;
        if omega.assess_bs(t) {
            u = t;
        } else {
            l = t;
        }
        if (u - l) / 2.0 < options.tol {
            num_iters = niter;
            break;
        }
    }
    SolverInfo {
        feasible: u != u_orig,
        num_iters,
        status: CutStatus::Success,
        value: u,
    }
}

/// Presents a parameterized feasibility problem as a boolean query for
/// [`bsearch`]: each probe runs [`cutting_plane_feas`] on a scratch copy of
/// the search space and commits the centroid back only on success.
#[must_use]
pub struct BsearchAdaptor<'a, O, S> {
    oracle: &'a mut O,
    space: &'a mut S,
    options: Options,
}

impl<'a, O, S> BsearchAdaptor<'a, O, S>
where
    O: ParametricOracle,
    S: SearchSpace + Clone,
{
    /// Wrap an oracle and the search space its probes run in.
    pub fn new(oracle: &'a mut O, space: &'a mut S, options: Options) -> Self {
        Self {
            oracle,
            space,
            options,
        }
    }

    /// Centroid of the last successful probe.
    #[must_use]
    pub fn x_best(&self) -> Vector {
        self.space.xc()
    }
}

impl<O, S> OracleBs for BsearchAdaptor<'_, O, S>
where
    O: ParametricOracle,
    S: SearchSpace + Clone,
{
    fn assess_bs(&mut self, t: f64) -> bool {
        let mut scratch = self.space.clone();
        self.oracle.update(t);
        let info = cutting_plane_feas(&mut *self.oracle, &mut scratch, &self.options);
        if info.feasible {
            self.space.set_xc(scratch.xc());
            return true;
        }
        false
    }
}
