//! Vectores de rechazo del constructor: cada uno viola exactamente una de
//! las comprobaciones de SEC1 §3.1.1.2.1.

use num_bigint::BigUint;
use weierstrass_core::prelude::*;

fn u(n: u32) -> BigUint {
    BigUint::from(n)
}

#[test]
fn rejects_even_modulus() {
    let result = EC::new(u(12), u(1), u(5), u(0), u(4), u(11), u(1), 0, true);
    assert!(matches!(result, Err(CurveError::Validation(_))));
}

#[test]
fn rejects_composite_modulus() {
    // 15 = 3*5 is not prime.
    let result = EC::new(u(15), u(1), u(5), u(0), u(4), u(11), u(1), 0, true);
    assert!(matches!(result, Err(CurveError::Validation(_))));
}

#[test]
fn rejects_zero_discriminant() {
    // a = 0, b = 0 gives 4*0 + 27*0 = 0: singular curve. all_checks = false
    // isolates this from the (unrelated) Hasse/MOV rejections a toy-sized
    // n would otherwise trip first.
    let result = EC::new(u(11), u(0), u(0), u(1), u(1), u(11), u(1), 0, false);
    assert!(matches!(result, Err(CurveError::Validation(_))));
}

#[test]
fn rejects_generator_not_on_curve() {
    // (0, 4) is on y^2 = x^3 + x + 5 mod 11 but (0, 5) is not.
    let result = EC::new(u(11), u(1), u(5), u(0), u(5), u(11), u(1), 0, false);
    assert!(matches!(result, Err(CurveError::Validation(_))));
}

#[test]
fn rejects_wrong_cofactor() {
    // p=11, a=1, b=5, G=(0,4), n=11: the true cofactor is h=1 (brute-force
    // verified); the expected-cofactor equality check runs unconditionally
    // regardless of all_checks, so h=2 is rejected even with all_checks =
    // false.
    let result = EC::new(u(11), u(1), u(5), u(0), u(4), u(11), u(2), 0, false);
    assert!(matches!(result, Err(CurveError::WeakCurve(_))));
}

#[test]
fn rejects_n_equal_to_p_anomalous_curve() {
    // This toy curve's true group order happens to equal p itself (11),
    // an anomalous curve by definition. With all_checks = false the Hasse
    // and MOV guards are skipped, isolating the n != p check as the one
    // that trips (the cofactor equality check passes first, since h=1 is
    // genuinely this curve's cofactor).
    let result = EC::new(u(11), u(1), u(5), u(0), u(4), u(11), u(1), 0, false);
    assert!(matches!(result, Err(CurveError::WeakCurve(_))));
}

#[test]
fn rejects_security_level_mismatched_with_bit_length() {
    // t=80 requires p to be exactly 192 bits; this toy p=11 is nowhere
    // close, so the security-level check trips before anything else runs.
    let result = EC::new(u(11), u(1), u(5), u(0), u(4), u(11), u(1), 80, true);
    assert!(matches!(result, Err(CurveError::WeakCurve(_))));
}

#[test]
fn rejects_unrecognized_security_level() {
    // t=100 is not one of SEC1 v.2's six recognized levels.
    let result = EC::new(u(11), u(1), u(5), u(0), u(4), u(11), u(1), 100, true);
    assert!(matches!(result, Err(CurveError::WeakCurve(_))));
}

#[test]
fn small_order_curve_is_accepted_when_all_checks_disabled() {
    // p=13, a=0, b=2, G=(1,4), n=19, h=1: a brute-force-verified toy curve.
    // 13^18 = 1 (mod 19), so it is anomalous under the p^i mod n MOV guard
    // and is rejected once all_checks = true brings that guard in, but
    // accepted once it (and the Hasse check) are skipped; the unconditional
    // cofactor equality check passes either way since h=1 is this curve's
    // genuine cofactor.
    let strict = EC::new(u(13), u(0), u(2), u(1), u(4), u(19), u(1), 0, true);
    assert!(matches!(strict, Err(CurveError::WeakCurve(_))));

    let lenient = EC::new(u(13), u(0), u(2), u(1), u(4), u(19), u(1), 0, false);
    assert!(lenient.is_ok());
}

#[test]
fn rejects_out_of_range_y_during_on_curve_check() {
    let ec = EC::new(u(13), u(0), u(2), u(1), u(4), u(19), u(1), 0, false).unwrap();
    // y = 13 is outside [0, p), must be rejected as InvalidInput rather
    // than silently wrapping.
    let bad_point = AffinePoint::new(u(1), u(13));
    assert!(matches!(
        ec.is_on_curve(&bad_point),
        Err(CurveError::InvalidInput(_))
    ));
}

#[test]
fn point_with_y_zero_is_treated_as_infinity() {
    let ec = EC::new(u(13), u(0), u(2), u(1), u(4), u(19), u(1), 0, false).unwrap();
    let zero_y_point = AffinePoint::new(u(7), u(0));
    assert!(matches!(ec.is_on_curve(&zero_y_point), Ok(true)));
}
