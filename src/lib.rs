#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Convex optimization by the ellipsoid method with separation oracles.
//!
//! The caller supplies a *separation oracle*: a black box that, given a
//! candidate point, either certifies membership in the feasible region or
//! returns a hyperplane cutting the point off from it. The drivers in this
//! crate repeatedly shrink an enclosing ellipsoid under such cuts until the
//! ellipsoid is small enough (feasibility) or no further improvement of the
//! objective is possible (optimization).
//!
//! The crate is built from three tightly coupled pieces:
//! - ellipsoid search spaces ([`Ell`], [`EllStable`], [`Ell1d`]) supporting
//!   central, deep, and parallel cuts;
//! - cutting-plane drivers ([`cutting_plane_feas`], [`cutting_plane_dc`],
//!   [`cutting_plane_q`], [`bsearch`]) orchestrating oracle queries and
//!   updates;
//! - an incremental positive-definiteness certificate ([`LdltExt`]) that
//!   either factors a symmetric matrix or produces a witness vector, the
//!   computational heart of the matrix-inequality oracles in [`oracles`].
//!
//! # Examples
//! ```
//! use ellcut::{cutting_plane_feas, Beta, Cut, Ell, Options, OracleFeas, Vector};
//!
//! // Find a point with x0 + x1 >= 1 inside a ball around the origin.
//! struct HalfPlane;
//!
//! impl OracleFeas for HalfPlane {
//!     fn assess_feas(&mut self, x: &Vector) -> Option<Cut> {
//!         let f = 1.0 - (x[0] + x[1]);
//!         if f <= 0.0 {
//!             return None;
//!         }
//!         Some(Cut::new(Vector::from(vec![-1.0, -1.0]), Beta::Deep(f)))
//!     }
//! }
//!
//! let mut oracle = HalfPlane;
//! let mut ell = Ell::new(4.0, Vector::zeros(2));
//! let info = cutting_plane_feas(&mut oracle, &mut ell, &Options::default());
//! assert!(info.feasible);
//! ```

mod cutting_plane;
mod ell;
mod ell1d;
mod ell_stable;
mod ldlt;
mod matrix;
pub mod oracles;
mod vector;

pub use cutting_plane::{
    Beta, BsearchAdaptor, Cut, CutStatus, Options, OracleBs, OracleFeas, OracleOptim, OracleQ,
    ParametricOracle, SearchSpace, SolverInfo, bsearch, cutting_plane_dc, cutting_plane_feas,
    cutting_plane_q,
};
pub use ell::Ell;
pub use ell1d::Ell1d;
pub use ell_stable::EllStable;
pub use ldlt::LdltExt;
pub use matrix::Matrix;
pub use vector::Vector;
