//! Benchmark comparison between the LDLᵀ-ext certificate and general-purpose
//! factorizations from other Rust linear algebra crates.
//!
//! Notes:
//! - The comparison is factor-only: LDLᵀ-ext neither pivots nor solves, it
//!   certifies definiteness, so the other sides run their cheapest
//!   factorization of the same SPD input.
//! - The witness path is benchmarked on its own; it has no counterpart in
//!   the other crates.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use ellcut::{LdltExt, Matrix};

const DIMS: [usize; 3] = [8, 16, 32];

#[allow(clippy::cast_precision_loss)]
fn spd_entry(n: usize, r: usize, c: usize) -> f64 {
    if r == c {
        // Strict diagonal dominance for stability.
        (r as f64).mul_add(1.0e-3, (n as f64) + 1.0)
    } else {
        // Small, varying off-diagonals.
        0.1 / ((r + c + 1) as f64)
    }
}

fn make_spd(n: usize) -> Matrix {
    let mut a = Matrix::zeros(n, n);
    for r in 0..n {
        for c in 0..n {
            a[(r, c)] = spd_entry(n, r.min(c), r.max(c));
        }
    }
    a
}

fn make_indefinite(n: usize) -> Matrix {
    let mut a = make_spd(n);
    // Poison a pivot midway so the factorization stops with a witness.
    let bad = n / 2;
    a[(bad, bad)] = -a[(bad, bad)];
    a
}

fn bench_factor(c: &mut Criterion) {
    for n in DIMS {
        let mut group = c.benchmark_group(format!("d{n}"));

        let a = make_spd(n);
        let indefinite = make_indefinite(n);

        let na = nalgebra::DMatrix::<f64>::from_fn(n, n, |r, c| spd_entry(n, r.min(c), r.max(c)));
        let fa = faer::Mat::<f64>::from_fn(n, n, |r, c| spd_entry(n, r.min(c), r.max(c)));

        group.bench_function("ellcut_ldlt_factor", |bencher| {
            let mut ldlt = LdltExt::new(n);
            bencher.iter(|| {
                let spd = ldlt.factorize(black_box(&a));
                black_box(spd);
            });
        });

        group.bench_function("ellcut_ldlt_witness", |bencher| {
            let mut ldlt = LdltExt::new(n);
            bencher.iter(|| {
                let spd = ldlt.factorize(black_box(&indefinite));
                assert!(!spd);
                black_box(ldlt.witness());
            });
        });

        group.bench_function("nalgebra_cholesky", |bencher| {
            bencher.iter(|| {
                let chol = black_box(na.clone())
                    .cholesky()
                    .expect("matrix should be positive definite");
                black_box(chol);
            });
        });

        group.bench_function("faer_partial_piv_lu", |bencher| {
            bencher.iter(|| {
                let lu = black_box(&fa).partial_piv_lu();
                black_box(lu);
            });
        });

        group.finish();
    }
}

criterion_group!(benches, bench_factor);
criterion_main!(benches);
