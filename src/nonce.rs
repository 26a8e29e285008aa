//! Generación determinista del nonce de firma (RFC 6979) vía HMAC-DRBG.
//!
//! Genérico sobre cualquier `digest::Digest`, de modo que el mismo DRBG
//! sirve tanto al `Sha256` que ya usaba el motor de hashing heredado como a
//! cualquier otra función resumen que un llamador prefiera.

use digest::Digest;
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::encoding::bits2int;

/// Deriva el nonce determinista `k` para `ecdsa_sign`, siguiendo RFC 6979
/// §3.2 pasos a-h.
///
/// `skip` salta los primeros `skip` candidatos válidos encontrados por el
/// paso h, reanudando el mismo DRBG sin reiniciarlo — así es como RFC 6979
/// expresa el reintento cuando una firma anterior produjo `r = 0` o `s = 0`
/// para el candidato previo.
pub fn rfc6979_nonce<D>(
    n: &BigUint,
    private_key: &BigUint,
    hashed_message: &BigUint,
    skip: u32,
) -> BigUint
where
    D: Digest + Clone,
    Hmac<D>: Mac,
{
    let qlen_bits = n.bits();
    let rolen = qlen_bits.div_ceil(8) as usize;

    let x_bytes = biguint_to_be_bytes_padded(private_key, rolen);
    let h1_bytes = biguint_to_be_bytes_padded(&bits2int_mod(hashed_message, n), rolen);

    let mut k = vec![0x00u8; D::output_size()];
    let mut v = vec![0x01u8; D::output_size()];

    // Paso d: K = HMAC_K(V || 0x00 || x || h1)
    let mut mac = <Hmac<D> as Mac>::new_from_slice(&k).expect("HMAC accepts any key length");
    mac.update(&v);
    mac.update(&[0x00]);
    mac.update(&x_bytes);
    mac.update(&h1_bytes);
    k = mac.finalize().into_bytes().to_vec();

    // Paso e: V = HMAC_K(V)
    let mut mac = <Hmac<D> as Mac>::new_from_slice(&k).expect("HMAC accepts any key length");
    mac.update(&v);
    v = mac.finalize().into_bytes().to_vec();

    // Paso f: K = HMAC_K(V || 0x01 || x || h1)
    let mut mac = <Hmac<D> as Mac>::new_from_slice(&k).expect("HMAC accepts any key length");
    mac.update(&v);
    mac.update(&[0x01]);
    mac.update(&x_bytes);
    mac.update(&h1_bytes);
    k = mac.finalize().into_bytes().to_vec();

    // Paso g: V = HMAC_K(V)
    let mut mac = <Hmac<D> as Mac>::new_from_slice(&k).expect("HMAC accepts any key length");
    mac.update(&v);
    v = mac.finalize().into_bytes().to_vec();

    // Paso h: genera candidatos T hasta obtener uno en [1, n-1],
    // descartando los primeros `skip` candidatos válidos ya consumidos por
    // un intento de firma anterior.
    let mut remaining_skip = skip;
    loop {
        let mut t: Vec<u8> = Vec::new();
        while t.len() < rolen {
            let mut mac =
                <Hmac<D> as Mac>::new_from_slice(&k).expect("HMAC accepts any key length");
            mac.update(&v);
            v = mac.finalize().into_bytes().to_vec();
            t.extend_from_slice(&v);
        }
        t.truncate(rolen);
        let candidate = bits2int(&t, qlen_bits);
        if !candidate.is_zero() && &candidate < n {
            if remaining_skip == 0 {
                return candidate;
            }
            remaining_skip -= 1;
        }

        // Candidato fuera de rango (o ya descartado por `skip`):
        // K = HMAC_K(V || 0x00), V = HMAC_K(V), reintenta.
        let mut mac =
            <Hmac<D> as Mac>::new_from_slice(&k).expect("HMAC accepts any key length");
        mac.update(&v);
        mac.update(&[0x00]);
        k = mac.finalize().into_bytes().to_vec();

        let mut mac =
            <Hmac<D> as Mac>::new_from_slice(&k).expect("HMAC accepts any key length");
        mac.update(&v);
        v = mac.finalize().into_bytes().to_vec();
    }
}

fn bits2int_mod(h: &BigUint, n: &BigUint) -> BigUint {
    h % n
}

fn biguint_to_be_bytes_padded(value: &BigUint, len: usize) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    if bytes.len() < len {
        let mut padded = vec![0u8; len - bytes.len()];
        padded.append(&mut bytes);
        padded
    } else {
        bytes
    }
}
