//! Primitivas de aritmética modular sobre enteros de precisión arbitraria.
//!
//! Estas tres funciones son la base de todo lo demás en este motor: la
//! inversión modular alimenta la ley de grupo afín y la recuperación de
//! claves; la raíz cuadrada modular alimenta la recuperación de la
//! coordenada y; el símbolo de Legendre desempata la variante de residuo
//! cuadrático.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};

use crate::errors::CurveError;

/// Inversa modular de `a` respecto de `m` mediante Euclides extendido.
///
/// # Errors
/// `CurveError::InvalidInput` si `gcd(a, m) != 1` (incluyendo `a = 0`).
pub fn mod_inv(a: &BigUint, m: &BigUint) -> Result<BigUint, CurveError> {
    if m.is_zero() {
        return Err(CurveError::InvalidInput("modulus must be nonzero".into()));
    }
    let m_signed = BigInt::from_biguint(Sign::Plus, m.clone());
    let mut old_r = BigInt::from_biguint(Sign::Plus, a % m);
    let mut r = m_signed.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let new_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, new_r);
        let new_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, new_s);
    }

    if old_r != BigInt::one() && old_r != -BigInt::one() {
        return Err(CurveError::InvalidInput(
            "value is not invertible modulo m (gcd != 1)".into(),
        ));
    }

    let mut result = old_s % &m_signed;
    if result.is_negative() {
        result += &m_signed;
    }
    Ok(result.to_biguint().expect("reduced modulo a positive modulus"))
}

/// Símbolo de Legendre `a^((p-1)/2) mod p`, en `{0, 1, p-1}`.
///
/// El llamador interpreta `p - 1` como "-1" (no residuo cuadrático).
pub fn legendre_symbol(a: &BigUint, p: &BigUint) -> BigUint {
    if a.is_zero() {
        return BigUint::zero();
    }
    let exponent = (p - BigUint::one()) >> 1;
    a.modpow(&exponent, p)
}

/// Raíz cuadrada modular mediante Tonelli-Shanks.
///
/// Usa el camino rápido `a^((p+1)/4) mod p` cuando `p \u{2261} 3 (mod 4)`,
/// verificando el resultado por elevación al cuadrado antes de devolverlo.
///
/// # Errors
/// `CurveError::NoSquareRoot` si `a` no es un residuo cuadrático módulo `p`.
pub fn mod_sqrt(a: &BigUint, p: &BigUint) -> Result<BigUint, CurveError> {
    let a = a % p;
    if a.is_zero() {
        return Ok(BigUint::zero());
    }

    let three = BigUint::from(3u8);
    let four = BigUint::from(4u8);
    if p % &four == three {
        let exponent = (p + BigUint::one()) >> 2;
        let candidate = a.modpow(&exponent, p);
        return if (&candidate * &candidate) % p == a {
            Ok(candidate)
        } else {
            Err(CurveError::NoSquareRoot)
        };
    }

    tonelli_shanks(&a, p)
}

/// Caso general de Tonelli-Shanks, usado cuando `p` no es `3 (mod 4)`.
fn tonelli_shanks(a: &BigUint, p: &BigUint) -> Result<BigUint, CurveError> {
    let one = BigUint::one();
    if legendre_symbol(a, p) != one {
        return Err(CurveError::NoSquareRoot);
    }

    // Factoriza p - 1 = q * 2^s con q impar.
    let mut q = p - &one;
    let mut s = 0u32;
    while (&q & &one).is_zero() {
        q >>= 1;
        s += 1;
    }

    // Busca un no-residuo cuadrático z.
    let mut z = BigUint::from(2u8);
    while legendre_symbol(&z, p) != p - &one {
        z += &one;
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = a.modpow(&q, p);
    let mut r = a.modpow(&((&q + &one) >> 1), p);

    loop {
        if t == one {
            return Ok(r);
        }
        let mut i = 0u32;
        let mut t_pow = t.clone();
        while t_pow != one {
            t_pow = (&t_pow * &t_pow) % p;
            i += 1;
            if i == m {
                return Err(CurveError::NoSquareRoot);
            }
        }
        let shift = m - i - 1;
        let mut b = c.clone();
        for _ in 0..shift {
            b = (&b * &b) % p;
        }
        m = i;
        c = (&b * &b) % p;
        t = (&t * &c) % p;
        r = (&r * &b) % p;
    }
}

/// Test de primalidad probabilística de Fermat en base 2, tal como exige la
/// especificación para la validación de `p` y de `n`.
#[must_use]
pub fn is_probable_prime_fermat(candidate: &BigUint) -> bool {
    let two = BigUint::from(2u8);
    if *candidate < two {
        return false;
    }
    if *candidate == two {
        return true;
    }
    if (candidate & &BigUint::one()).is_zero() {
        return false;
    }
    let exponent = candidate - BigUint::one();
    two.modpow(&exponent, candidate) == BigUint::one()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_inv_round_trips() {
        let p = BigUint::from(11u32);
        for a in 1u32..11 {
            let a = BigUint::from(a);
            let inv = mod_inv(&a, &p).unwrap();
            assert_eq!((&a * &inv) % &p, BigUint::one());
        }
    }

    #[test]
    fn mod_inv_rejects_non_coprime() {
        let p = BigUint::from(12u32);
        let a = BigUint::from(4u32);
        assert!(mod_inv(&a, &p).is_err());
    }

    #[test]
    fn mod_sqrt_fast_path_p_three_mod_four() {
        let p = BigUint::from(11u32); // 11 mod 4 == 3
        let x = BigUint::from(5u32);
        let y2 = (&x * &x) % &p;
        let root = mod_sqrt(&y2, &p).unwrap();
        assert_eq!((&root * &root) % &p, y2);
    }

    #[test]
    fn mod_sqrt_general_path() {
        let p = BigUint::from(17u32); // 17 mod 4 == 1, general Tonelli-Shanks
        let x = BigUint::from(6u32);
        let y2 = (&x * &x) % &p;
        let root = mod_sqrt(&y2, &p).unwrap();
        assert_eq!((&root * &root) % &p, y2);
    }

    #[test]
    fn mod_sqrt_rejects_non_residue() {
        let p = BigUint::from(11u32);
        // Quadratic residues mod 11 are {1,3,4,5,9}; 2 is not one of them.
        let non_residue = BigUint::from(2u32);
        assert!(mod_sqrt(&non_residue, &p).is_err());
    }

    #[test]
    fn legendre_symbol_values() {
        let p = BigUint::from(11u32);
        assert_eq!(legendre_symbol(&BigUint::from(4u32), &p), BigUint::one());
        assert_eq!(
            legendre_symbol(&BigUint::from(2u32), &p),
            &p - BigUint::one()
        );
        assert_eq!(legendre_symbol(&BigUint::zero(), &p), BigUint::zero());
    }

    #[test]
    fn fermat_primality() {
        assert!(is_probable_prime_fermat(&BigUint::from(17u32)));
        assert!(!is_probable_prime_fermat(&BigUint::from(15u32)));
    }
}
