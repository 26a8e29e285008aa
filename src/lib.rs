//! # weierstrass_core
//!
//! Motor de curvas elípticas de Weierstrass corta sobre cuerpos primos de
//! tamaño arbitrario, y la capa ECDSA (firma, verificación, recuperación de
//! clave pública) construida sobre él.
//!
//! El motor no asume ningún primo concreto: una misma `EC` sirve tanto para
//! una curva de juguete de cuatro bits como para secp256k1 o una curva de
//! 521 bits, porque toda la aritmética de cuerpo y de escalar se apoya en
//! enteros de precisión arbitraria (`num_bigint::BigUint`/`BigInt`) en vez
//! de limbs de ancho fijo.
//!
//! No hay estado global mutable: una `EC` se construye una vez (validando
//! sus parámetros por SEC1 §3.1.1.2.1) y a partir de ahí es un valor
//! inmutable que se comparte libremente entre hilos.

#![deny(missing_docs)]
#![allow(clippy::many_single_char_names)]

pub mod arithmetic;
pub mod curve;
pub mod ecdsa;
pub mod encoding;
pub mod errors;
pub mod nonce;
pub mod point;

/// Re-exporta la superficie pública que un consumidor típico necesita con
/// un único `use weierstrass_core::prelude::*;`.
pub mod prelude {
    pub use crate::arithmetic::{is_probable_prime_fermat, legendre_symbol, mod_inv, mod_sqrt};
    pub use crate::curve::EC;
    pub use crate::ecdsa::{
        ecdsa_pubkey_recovery, ecdsa_sign, ecdsa_verify, raw_pubkey_recovery, raw_sign,
        raw_verify,
    };
    pub use crate::encoding::{bits2int, decode_der_pair, encode_der_pair, int2octets, octets2int};
    pub use crate::errors::CurveError;
    pub use crate::point::{AffinePoint, JacobianPoint};
}
