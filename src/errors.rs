//! Catálogo de fallos matemáticos y criptográficos del motor de curvas.
//!
//! Un único enum cubre tanto la validación de parámetros de curva (SEC1
//! §3.1.1.2.1) como los fallos de tiempo de ejecución de la capa ECDSA.
//! Cada variante corresponde uno a uno con una fila de la tabla de errores
//! de la especificación.

use thiserror::Error;

/// Fallos que puede producir el motor de curvas y la capa ECDSA.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    /// Un parámetro de curva no cumple una comprobación de SEC1 §3.1.1.2.1.
    #[error("curve parameter validation failed: {0}")]
    Validation(String),

    /// La curva pasó la validación obligatoria pero falla una comprobación
    /// de fortaleza (nivel de seguridad, cota de Hasse, guardia MOV).
    #[error("curve does not meet the requested security posture: {0}")]
    WeakCurve(String),

    /// Un punto no satisface la ecuación de Weierstrass de la curva.
    #[error("point is not on the curve")]
    NotOnCurve,

    /// Un escalar o coordenada está fuera del rango exigido por la operación.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `r = 0` o `s = 0` durante la firma; el llamador determinista debe
    /// reintentar con el siguiente candidato de nonce.
    #[error("signing nonce produced r = 0 or s = 0, retry with the next nonce")]
    NonceRetry,

    /// `mod_sqrt` fue invocado sobre un residuo cuadrático inexistente.
    #[error("no square root exists for this field element")]
    NoSquareRoot,

    /// Se solicitó la variante de residuo cuadrático sobre un primo que no
    /// cumple `p \u{2261} 3 (mod 4)`.
    #[error("this operation requires p \u{2261} 3 (mod 4)")]
    UnsupportedPrime,

    /// Un valor tiene la forma incorrecta (p. ej. un punto sin exactamente
    /// dos coordenadas).
    #[error("value has the wrong shape: {0}")]
    TypeMismatch(String),
}
