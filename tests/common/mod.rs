//! Fixtures de curvas compartidas por la suite de pruebas.
//!
//! Cada función construye una `EC` ya validada; ninguna es un `static`
//! global ni un catálogo — son simples fábricas, consistente con la nota
//! de diseño de que el catálogo de curvas nombradas queda fuera del
//! alcance de la biblioteca.

use num_bigint::BigUint;
use weierstrass_core::prelude::*;

fn biguint_hex(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).expect("valid hex fixture constant")
}

/// secp256k1, la curva del protocolo Bitcoin/Ethereum.
pub fn secp256k1() -> EC {
    let p = biguint_hex(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
    );
    let a = BigUint::from(0u32);
    let b = BigUint::from(7u32);
    let gx = biguint_hex(
        "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
    );
    let gy = biguint_hex(
        "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
    );
    let n = biguint_hex(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
    );
    let h = BigUint::from(1u32);
    EC::new(p, a, b, gx, gy, n, h, 128, true).expect("secp256k1 parameters are valid")
}

/// Curva de juguete de orden primo sobre `F_11`, para el barrido exhaustivo.
pub fn toy_p11() -> EC {
    EC::new_unchecked(
        BigUint::from(11u32),
        BigUint::from(1u32),
        BigUint::from(5u32),
        AffinePoint::new(BigUint::from(0u32), BigUint::from(4u32)),
        BigUint::from(11u32),
        BigUint::from(1u32),
    )
}

/// Curva de juguete de orden primo sobre `F_13`.
pub fn toy_p13() -> EC {
    EC::new_unchecked(
        BigUint::from(13u32),
        BigUint::from(0u32),
        BigUint::from(2u32),
        AffinePoint::new(BigUint::from(1u32), BigUint::from(4u32)),
        BigUint::from(19u32),
        BigUint::from(1u32),
    )
}

/// Curva de juguete de orden primo sobre `F_17`.
pub fn toy_p17() -> EC {
    EC::new_unchecked(
        BigUint::from(17u32),
        BigUint::from(1u32),
        BigUint::from(3u32),
        AffinePoint::new(BigUint::from(2u32), BigUint::from(8u32)),
        BigUint::from(17u32),
        BigUint::from(1u32),
    )
}

/// Curva de juguete de orden primo sobre `F_19`.
pub fn toy_p19() -> EC {
    EC::new_unchecked(
        BigUint::from(19u32),
        BigUint::from(0u32),
        BigUint::from(2u32),
        AffinePoint::new(BigUint::from(4u32), BigUint::from(3u32)),
        BigUint::from(13u32),
        BigUint::from(1u32),
    )
}

/// Las cuatro curvas de juguete, para recorrer en el barrido exhaustivo.
pub fn all_toy_curves() -> Vec<EC> {
    vec![toy_p11(), toy_p13(), toy_p17(), toy_p19()]
}

/// Una segunda curva no trivial, de orden ~16 bits, independientemente
/// verificada por conteo de puntos por fuerza bruta; cumple el mismo papel
/// estructural que secp112r2 en la suite original (ver DESIGN.md).
pub fn second_curve() -> EC {
    EC::new_unchecked(
        BigUint::from(65519u32),
        BigUint::from(5u32),
        BigUint::from(5u32),
        AffinePoint::new(BigUint::from(0u32), BigUint::from(5252u32)),
        BigUint::from(65089u32),
        BigUint::from(1u32),
    )
}
