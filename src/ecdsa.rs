//! El protocolo ECDSA: firma, verificación y recuperación de clave pública,
//! construido sobre el motor de curvas de `curve.rs`.
//!
//! Cada operación de alto nivel (`ecdsa_sign`, `ecdsa_verify`,
//! `ecdsa_pubkey_recovery`) hashea el mensaje y deriva el nonce por RFC
//! 6979. Las variantes de bajo nivel (`raw_sign`, `raw_verify`) toman el
//! hash entero `e` y, en el caso de la firma, un nonce `k` explícito,
//! evitando por completo el hashing y el DRBG — son el punto de entrada que
//! usa el barrido exhaustivo sobre curvas de cardinalidad pequeña, donde
//! `k` se recorre a mano sobre todo `Z_n`.

use digest::Digest;
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::instrument;

use crate::curve::EC;
use crate::encoding::bits2int;
use crate::errors::CurveError;
use crate::nonce::rfc6979_nonce;
use crate::point::AffinePoint;

/// Un máximo razonable de reintentos de nonce antes de admitir que la
/// derivación está rota; en la práctica `r = 0` o `s = 0` tiene
/// probabilidad despreciable para cualquier `n` criptográficamente
/// relevante.
const MAX_NONCE_RETRIES: u32 = 16;

/// Firma `msg` bajo la clave privada `d`, derivando el nonce por RFC 6979
/// con el hash `D` y reintentando de forma transparente si un candidato de
/// nonce produce `r = 0` o `s = 0`.
///
/// # Errors
/// `CurveError::InvalidInput` si `d` no está en `[1, n-1]`, o
/// `CurveError::NonceRetry` si se agotan los reintentos.
#[instrument(level = "trace", skip(ec, msg, d))]
pub fn ecdsa_sign<D>(ec: &EC, msg: &[u8], d: &BigUint) -> Result<(BigUint, BigUint), CurveError>
where
    D: Digest + Clone,
    Hmac<D>: Mac,
{
    if d.is_zero() || d >= &ec.n {
        return Err(CurveError::InvalidInput("d must be in [1, n-1]".into()));
    }
    let digest = D::digest(msg);
    let e = bits2int(&digest, ec.n.bits());

    for attempt in 0..MAX_NONCE_RETRIES {
        let k = rfc6979_nonce::<D>(&ec.n, d, &e, attempt);
        match raw_sign(ec, &e, d, &k) {
            Ok(sig) => return Ok(sig),
            Err(CurveError::NonceRetry) => continue,
            Err(other) => return Err(other),
        }
    }
    Err(CurveError::NonceRetry)
}

/// Firma de bajo nivel: toma el hash entero `e` y un nonce `k` explícitos,
/// sin hashear ni derivar nada.
///
/// # Errors
/// `CurveError::InvalidInput` si `d = 0` o `k = 0`;
/// `CurveError::NonceRetry` si el `k` dado produce `r = 0` o `s = 0`.
#[instrument(level = "trace", skip(ec))]
pub fn raw_sign(
    ec: &EC,
    e: &BigUint,
    d: &BigUint,
    k: &BigUint,
) -> Result<(BigUint, BigUint), CurveError> {
    if d.is_zero() {
        return Err(CurveError::InvalidInput("d must be nonzero".into()));
    }
    if k.is_zero() {
        return Err(CurveError::InvalidInput("k must be nonzero".into()));
    }

    let r_point = ec.point_mult(k, &ec.g)?;
    let r = match r_point.coords() {
        None => return Err(CurveError::NonceRetry),
        Some((x, _)) => x % &ec.n,
    };
    if r.is_zero() {
        return Err(CurveError::NonceRetry);
    }

    let k_inv = crate::arithmetic::mod_inv(&(k % &ec.n), &ec.n)?;
    let s = (&k_inv * ((e + &r * d) % &ec.n)) % &ec.n;
    if s.is_zero() {
        return Err(CurveError::NonceRetry);
    }

    Ok((r, s))
}

/// Verifica `(r, s)` contra la clave pública `q` y el mensaje `msg`,
/// hasheando con `D`.
///
/// # Errors
/// `CurveError::InvalidInput` si `r` o `s` no están en `[1, n-1]`.
#[instrument(level = "trace", skip(ec, msg, q, sig))]
pub fn ecdsa_verify<D>(
    ec: &EC,
    msg: &[u8],
    q: &AffinePoint,
    sig: &(BigUint, BigUint),
) -> Result<bool, CurveError>
where
    D: Digest,
{
    let digest = D::digest(msg);
    let e = bits2int(&digest, ec.n.bits());
    raw_verify(ec, &e, q, sig)
}

/// Verificación de bajo nivel contra el hash entero `e` ya calculado.
///
/// # Errors
/// `CurveError::InvalidInput` si `r` o `s` no están en `[1, n-1]`.
#[instrument(level = "trace", skip(ec, q, sig))]
pub fn raw_verify(
    ec: &EC,
    e: &BigUint,
    q: &AffinePoint,
    sig: &(BigUint, BigUint),
) -> Result<bool, CurveError> {
    let (r, s) = sig;
    if r.is_zero() || r >= &ec.n || s.is_zero() || s >= &ec.n {
        return Err(CurveError::InvalidInput(
            "r and s must both be in [1, n-1]".into(),
        ));
    }
    Ok(verify_helper(ec, e, q, sig))
}

/// Ayudante de verificación laxo: calcula el punto candidato y compara sin
/// exigir que `r`/`s` ya estén acotados (usado internamente y por el test
/// de firmas forjadas, que construye `(r, s)` a partir de un punto elegido
/// a mano en lugar de una firma real).
#[must_use]
pub fn verify_helper(ec: &EC, e: &BigUint, q: &AffinePoint, sig: &(BigUint, BigUint)) -> bool {
    let (r, s) = sig;
    if r.is_zero() || s.is_zero() {
        return false;
    }
    let s_inv = match crate::arithmetic::mod_inv(&(s % &ec.n), &ec.n) {
        Ok(inv) => inv,
        Err(_) => return false,
    };
    let u1 = (e * &s_inv) % &ec.n;
    let u2 = (r * &s_inv) % &ec.n;
    let point = match ec.dbl_scalar_mult(&u1, &ec.g, &u2, q) {
        Ok(p) => p,
        Err(_) => return false,
    };
    match point.coords() {
        None => false,
        Some((x, _)) => x % &ec.n == *r,
    }
}

/// Recupera las claves públicas candidatas consistentes con `(r, s)` y
/// `msg`, siguiendo SEC1 §4.1.6.
///
/// Para curvas de cofactor 1 (el único caso que este motor cubre) solo
/// `j = 0` es válido, y ambas paridades de `y` se prueban; el resultado
/// filtra los candidatos que no están sobre la curva o que no re-verifican.
///
/// # Errors
/// `CurveError::InvalidInput` si `r` o `s` no están en `[1, n-1]`.
#[instrument(level = "trace", skip(ec, msg, sig))]
pub fn ecdsa_pubkey_recovery<D>(
    ec: &EC,
    msg: &[u8],
    sig: &(BigUint, BigUint),
) -> Result<Vec<AffinePoint>, CurveError>
where
    D: Digest,
{
    let digest = D::digest(msg);
    let e = bits2int(&digest, ec.n.bits());
    raw_pubkey_recovery(ec, &e, sig)
}

/// Recuperación de bajo nivel contra el hash entero `e` ya calculado.
///
/// # Errors
/// `CurveError::InvalidInput` si `r` o `s` no están en `[1, n-1]`.
pub fn raw_pubkey_recovery(
    ec: &EC,
    e: &BigUint,
    sig: &(BigUint, BigUint),
) -> Result<Vec<AffinePoint>, CurveError> {
    let (r, s) = sig;
    if r.is_zero() || r >= &ec.n || s.is_zero() || s >= &ec.n {
        return Err(CurveError::InvalidInput(
            "r and s must both be in [1, n-1]".into(),
        ));
    }

    let r_inv = crate::arithmetic::mod_inv(&(r % &ec.n), &ec.n)?;
    let mut candidates = Vec::new();

    for y_parity_odd in [false, true] {
        let y = match ec.y(r) {
            Ok(root) => root,
            Err(_) => continue,
        };
        let y = if y.bit(0) == y_parity_odd { y } else { &ec.p - &y };
        let r_point = AffinePoint::new(r.clone(), y);
        if !matches!(ec.is_on_curve(&r_point), Ok(true)) {
            continue;
        }

        let sr = ec.point_mult(s, &r_point)?;
        let e_neg = (&ec.n - (e % &ec.n)) % &ec.n;
        let eg = ec.point_mult(&e_neg, &ec.g)?;
        let sum = ec.add(&sr, &eg)?;
        if sum.is_infinity() {
            continue;
        }
        let q = ec.point_mult(&r_inv, &sum)?;
        if q.is_infinity() {
            continue;
        }

        if !matches!(ec.is_on_curve(&q), Ok(true)) {
            continue;
        }
        if !verify_helper(ec, e, &q, sig) {
            continue;
        }
        if !candidates.contains(&q) {
            candidates.push(q);
        }
    }

    Ok(candidates)
}
