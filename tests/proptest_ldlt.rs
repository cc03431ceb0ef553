//! Property-based tests for the LDLᵀ-ext factorization.
//!
//! Instances are constructed from known factors `A = L·diag(d)·Lᵀ` so the
//! expected outcome (definite or not, and where the first bad window sits)
//! is controlled by the chosen diagonal.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use ellcut::{LdltExt, Matrix};

const N: usize = 5;

fn small_factor_entry() -> impl Strategy<Value = f64> {
    // Keep entries small so constructed matrices are reasonably conditioned.
    (-50i16..=50i16).prop_map(|x| f64::from(x) / 100.0)
}

fn positive_diag_entry() -> impl Strategy<Value = f64> {
    (1i16..=20i16).prop_map(|x| f64::from(x) / 10.0)
}

fn symmetric_entry() -> impl Strategy<Value = f64> {
    (-100i16..=100i16).prop_map(|x| f64::from(x) / 10.0)
}

/// `A = L·diag(d)·Lᵀ` with unit-lower-triangular `L` taken from `l_raw`.
fn build_from_factors(l_raw: &[[f64; N]; N], d: &[f64; N]) -> Matrix {
    let mut l = [[0.0f64; N]; N];
    for (i, row) in l.iter_mut().enumerate() {
        for (j, entry) in row.iter_mut().enumerate() {
            *entry = match i.cmp(&j) {
                std::cmp::Ordering::Equal => 1.0,
                std::cmp::Ordering::Greater => l_raw[i][j],
                std::cmp::Ordering::Less => 0.0,
            };
        }
    }
    let mut a = Matrix::zeros(N, N);
    for i in 0..N {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..=j {
                sum += l[i][k] * d[k] * l[j][k];
            }
            a[(i, j)] = sum;
            a[(j, i)] = sum;
        }
    }
    a
}

fn build_symmetric(raw: &[[f64; N]; N]) -> Matrix {
    let mut b = Matrix::zeros(N, N);
    for i in 0..N {
        for j in 0..=i {
            b[(i, j)] = raw[i][j];
            b[(j, i)] = raw[i][j];
        }
    }
    b
}

/// `vᵀ·A[start:stop, start:stop]·v` the straightforward way.
fn quad_over_window(v: &[f64], a: &Matrix, start: usize, stop: usize) -> f64 {
    let mut res = 0.0;
    for i in start..stop {
        for j in start..stop {
            res += v[i] * a[(i, j)] * v[j];
        }
    }
    res
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn spd_matrices_factor_and_sqrt_reconstructs(
        l_raw in proptest::array::uniform5(proptest::array::uniform5(small_factor_entry())),
        d in proptest::array::uniform5(positive_diag_entry()),
    ) {
        let a = build_from_factors(&l_raw, &d);
        let mut ldlt = LdltExt::new(N);
        prop_assert!(ldlt.factorize(&a));
        prop_assert_eq!(ldlt.witness_range(), (0, 0));

        let r = ldlt.sqrt();
        for i in 0..N {
            for j in 0..N {
                let mut rtr = 0.0;
                for k in 0..N {
                    rtr += r[(k, i)] * r[(k, j)];
                }
                assert_abs_diff_eq!(rtr, a[(i, j)], epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn witness_certifies_indefiniteness(
        l_raw in proptest::array::uniform5(proptest::array::uniform5(small_factor_entry())),
        mut d in proptest::array::uniform5(positive_diag_entry()),
        bad in 0usize..N,
    ) {
        // Flip one pivot negative: the factorization must stop there.
        d[bad] = -d[bad];
        let a = build_from_factors(&l_raw, &d);
        let mut ldlt = LdltExt::new(N);
        prop_assert!(!ldlt.factorize(&a));

        let (start, stop) = ldlt.witness_range();
        prop_assert_eq!(start, 0);
        prop_assert_eq!(stop, bad + 1);

        let ep = ldlt.witness();
        prop_assert!(ep >= 0.0);
        let v = ldlt.witness_vector().to_vec();
        let quad = quad_over_window(&v, &a, start, stop);
        prop_assert!(quad < 1e-12);
        assert_abs_diff_eq!(quad, -ep, epsilon = 1e-7 * ep.abs().max(1.0));
        // sym_quad agrees with the straightforward evaluation on A itself.
        assert_abs_diff_eq!(ldlt.sym_quad(&a), quad, epsilon = 1e-7 * quad.abs().max(1.0));
    }

    #[test]
    fn sym_quad_matches_naive_quadratic_form(
        l_raw in proptest::array::uniform5(proptest::array::uniform5(small_factor_entry())),
        mut d in proptest::array::uniform5(positive_diag_entry()),
        bad in 1usize..N,
        b_raw in proptest::array::uniform5(proptest::array::uniform5(symmetric_entry())),
    ) {
        d[bad] = -d[bad];
        let a = build_from_factors(&l_raw, &d);
        let mut ldlt = LdltExt::new(N);
        prop_assert!(!ldlt.factorize(&a));
        let _ = ldlt.witness();

        let b = build_symmetric(&b_raw);
        let (start, stop) = ldlt.witness_range();
        let v = ldlt.witness_vector().to_vec();
        let expected = quad_over_window(&v, &b, start, stop);
        assert_abs_diff_eq!(
            ldlt.sym_quad(&b),
            expected,
            epsilon = 1e-7 * expected.abs().max(1.0)
        );
    }
}
