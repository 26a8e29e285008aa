//! Ayudantes de codificación: `bits2int`, round-trip de octetos y un
//! codificador DER mínimo para el par `(r, s)`.
//!
//! El alcance es deliberadamente estrecho: ni catálogo de curvas, ni
//! codificación de puntos SEC1, ni análisis de certificados — solo lo que
//! la capa ECDSA necesita para mover escalares dentro y fuera de bytes.

use num_bigint::BigUint;

use crate::errors::CurveError;

/// RFC 6979 §2.3.2 / SEC1 `bits2int`: interpreta `data` como entero
/// big-endian y lo recorta (nunca lo alarga) a `qlen` bits por la derecha.
#[must_use]
pub fn bits2int(data: &[u8], qlen: u64) -> BigUint {
    let value = BigUint::from_bytes_be(data);
    let vlen = data.len() as u64 * 8;
    if vlen > qlen {
        value >> (vlen - qlen)
    } else {
        value
    }
}

/// Codifica un escalar como octetos big-endian de longitud exacta `len`.
///
/// # Errors
/// `CurveError::InvalidInput` si `value` no cabe en `len` bytes.
pub fn int2octets(value: &BigUint, len: usize) -> Result<Vec<u8>, CurveError> {
    let mut bytes = value.to_bytes_be();
    if bytes.len() > len {
        return Err(CurveError::InvalidInput(format!(
            "value does not fit in {len} bytes"
        )));
    }
    if bytes.len() < len {
        let mut padded = vec![0u8; len - bytes.len()];
        padded.append(&mut bytes);
        return Ok(padded);
    }
    Ok(bytes)
}

/// Decodifica octetos big-endian en un escalar.
#[must_use]
pub fn octets2int(data: &[u8]) -> BigUint {
    BigUint::from_bytes_be(data)
}

/// Codifica un par de enteros no negativos como una secuencia DER mínima
/// de dos `INTEGER`s — exactamente la forma que necesita una firma ECDSA,
/// sin catálogo de OIDs ni soporte de certificados.
#[must_use]
pub fn encode_der_pair(r: &BigUint, s: &BigUint) -> Vec<u8> {
    let r_enc = encode_der_integer(r);
    let s_enc = encode_der_integer(s);
    let mut body = Vec::with_capacity(r_enc.len() + s_enc.len());
    body.extend_from_slice(&r_enc);
    body.extend_from_slice(&s_enc);

    let mut out = vec![0x30u8];
    push_der_length(&mut out, body.len());
    out.extend_from_slice(&body);
    out
}

/// Decodifica una secuencia DER de dos `INTEGER`s producida por
/// [`encode_der_pair`].
///
/// # Errors
/// `CurveError::InvalidInput` si la estructura no es una secuencia bien
/// formada de dos enteros.
pub fn decode_der_pair(data: &[u8]) -> Result<(BigUint, BigUint), CurveError> {
    let bad = || CurveError::InvalidInput("malformed DER (r, s) sequence".into());

    if data.first() != Some(&0x30) {
        return Err(bad());
    }
    let (seq_len, mut offset) = read_der_length(data, 1).ok_or_else(bad)?;
    if data.len() < offset + seq_len {
        return Err(bad());
    }

    let (r, consumed) = read_der_integer(&data[offset..offset + seq_len]).ok_or_else(bad)?;
    offset += consumed;
    let end = 1 + der_length_header_size(seq_len) + seq_len;
    let (s, _) = read_der_integer(&data[offset..end]).ok_or_else(bad)?;

    Ok((r, s))
}

fn encode_der_integer(value: &BigUint) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    if bytes.is_empty() {
        bytes.push(0);
    }
    // Un INTEGER DER con el bit alto puesto necesita un 0x00 de relleno
    // para no leerse como negativo.
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }
    let mut out = vec![0x02u8];
    push_der_length(&mut out, bytes.len());
    out.extend_from_slice(&bytes);
    out
}

fn push_der_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let len_bytes = len.to_be_bytes();
        let first_nonzero = len_bytes.iter().position(|&b| b != 0).unwrap_or(len_bytes.len() - 1);
        let trimmed = &len_bytes[first_nonzero..];
        out.push(0x80 | trimmed.len() as u8);
        out.extend_from_slice(trimmed);
    }
}

fn der_length_header_size(len: usize) -> usize {
    if len < 0x80 {
        1
    } else {
        1 + ((usize::BITS as usize - len.leading_zeros() as usize).div_ceil(8))
    }
}

fn read_der_length(data: &[u8], at: usize) -> Option<(usize, usize)> {
    let first = *data.get(at)?;
    if first & 0x80 == 0 {
        Some((first as usize, at + 1))
    } else {
        let n_bytes = (first & 0x7F) as usize;
        if n_bytes == 0 || at + 1 + n_bytes > data.len() {
            return None;
        }
        let mut len = 0usize;
        for &b in &data[at + 1..at + 1 + n_bytes] {
            len = (len << 8) | b as usize;
        }
        Some((len, at + 1 + n_bytes))
    }
}

fn read_der_integer(data: &[u8]) -> Option<(BigUint, usize)> {
    if data.first() != Some(&0x02) {
        return None;
    }
    let (len, offset) = read_der_length(data, 1)?;
    if offset + len > data.len() {
        return None;
    }
    let value = BigUint::from_bytes_be(&data[offset..offset + len]);
    Some((value, offset + len))
}
