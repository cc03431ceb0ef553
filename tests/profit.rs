//! End-to-end profit maximization: base, robust, and discrete variants.

use ellcut::oracles::{ProfitOracle, ProfitQOracle, ProfitRbOracle};
use ellcut::{Ell, Options, Vector, cutting_plane_dc, cutting_plane_q};

const P: f64 = 20.0;
const SCALE: f64 = 40.0;
const K: f64 = 30.5;

fn elasticity() -> Vector {
    Vector::from(vec![0.1, 0.4])
}

fn prices() -> Vector {
    Vector::from(vec![10.0, 35.0])
}

#[test]
fn base_variant_respects_the_capacity_bound() {
    let mut oracle = ProfitOracle::new(P, SCALE, K, elasticity(), prices());
    let mut ell = Ell::new(100.0, Vector::zeros(2));
    let (y, info) = cutting_plane_dc(&mut oracle, &mut ell, 0.0, &Options::default());
    assert!(info.feasible);
    assert!(y[0] <= K.ln());
    assert!(info.value > 0.0);
    assert!(
        (25..=55).contains(&info.num_iters),
        "unexpected iteration count {}",
        info.num_iters
    );
}

#[test]
fn robust_variant_converges_close_to_the_nominal_solution() {
    let mut nominal = ProfitOracle::new(P, SCALE, K, elasticity(), prices());
    let mut ell = Ell::new(100.0, Vector::zeros(2));
    let (_, nominal_info) = cutting_plane_dc(&mut nominal, &mut ell, 0.0, &Options::default());

    let mut oracle = ProfitRbOracle::new(
        P,
        SCALE,
        K,
        elasticity(),
        prices(),
        Vector::from(vec![0.003, 0.007]),
        1.0,
    );
    let mut ell = Ell::new(100.0, Vector::zeros(2));
    let (y, info) = cutting_plane_dc(&mut oracle, &mut ell, 0.0, &Options::default());
    assert!(info.feasible);
    assert!(y[0] <= K.ln());
    assert!(
        (30..=60).contains(&info.num_iters),
        "unexpected iteration count {}",
        info.num_iters
    );
    // Robustness costs profit, but not much at these uncertainty levels.
    assert!(info.value <= nominal_info.value);
    assert!(info.value > 0.8 * nominal_info.value);
}

#[test]
fn discrete_variant_lands_on_integer_quantities() {
    let mut oracle = ProfitQOracle::new(P, SCALE, K, elasticity(), prices());
    let mut ell = Ell::new(100.0, Vector::from(vec![2.0, 0.0]));
    let (y, info) = cutting_plane_q(&mut oracle, &mut ell, 0.0, &Options::default());
    assert!(info.feasible);
    assert!(y[0] <= K.ln());
    assert!(
        (15..=45).contains(&info.num_iters),
        "unexpected iteration count {}",
        info.num_iters
    );
    // The reported point is a rounded log-quantity vector.
    for y_i in y.iter() {
        let q = y_i.exp();
        assert!((q - q.round()).abs() < 1e-9);
    }
    // Discreteness can only lose profit against the continuous optimum.
    let mut continuous = ProfitOracle::new(P, SCALE, K, elasticity(), prices());
    let mut ell = Ell::new(100.0, Vector::zeros(2));
    let (_, cont_info) = cutting_plane_dc(&mut continuous, &mut ell, 0.0, &Options::default());
    assert!(info.value <= cont_info.value + 1e-6);
}
