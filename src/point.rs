//! Representaciones de puntos: afín (valor etiquetado) y Jacobiana.
//!
//! `AffinePoint` reemplaza el "punto con tupla duck-typed" de la
//! especificación por un tipo de valor etiquetado: la variante `Infinity`
//! es el punto en el infinito, nunca una coordenada (1, 0) escondida dentro
//! de una tupla genérica. `JacobianPoint` sigue siendo un struct plano de
//! tres coordenadas porque el álgebra proyectiva necesita operar sobre
//! `(X, Y, Z)` sin distinguir casos especiales en cada paso intermedio;
//! `Z == 0` es su propio sentinel de infinito.

use num_bigint::BigUint;

use crate::errors::CurveError;

/// Punto afín sobre una curva de Weierstrass: o el punto en el infinito, o
/// un par de coordenadas `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AffinePoint {
    /// El elemento neutro del grupo.
    Infinity,
    /// Un punto finito `(x, y)` sobre la curva.
    Point {
        /// Coordenada x.
        x: BigUint,
        /// Coordenada y.
        y: BigUint,
    },
}

impl AffinePoint {
    /// Construye un punto finito.
    #[must_use]
    pub fn new(x: BigUint, y: BigUint) -> Self {
        AffinePoint::Point { x, y }
    }

    /// El punto en el infinito.
    #[must_use]
    pub fn infinity() -> Self {
        AffinePoint::Infinity
    }

    /// `true` si este es el punto en el infinito.
    #[must_use]
    pub fn is_infinity(&self) -> bool {
        matches!(self, AffinePoint::Infinity)
    }

    /// Coordenadas `(x, y)`, o `None` si es el punto en el infinito.
    #[must_use]
    pub fn coords(&self) -> Option<(&BigUint, &BigUint)> {
        match self {
            AffinePoint::Infinity => None,
            AffinePoint::Point { x, y } => Some((x, y)),
        }
    }
}

/// Par crudo de coordenadas, tal como llegaría de una fuente SEC1 externa.
///
/// Aplica la regla canónica de la especificación: `y == 0` se interpreta
/// siempre como el punto en el infinito, nunca como un punto finito real con
/// ordenada cero.
impl TryFrom<(BigUint, BigUint)> for AffinePoint {
    type Error = CurveError;

    fn try_from((x, y): (BigUint, BigUint)) -> Result<Self, Self::Error> {
        use num_traits::Zero;
        if y.is_zero() {
            Ok(AffinePoint::Infinity)
        } else {
            Ok(AffinePoint::Point { x, y })
        }
    }
}

/// Punto en coordenadas Jacobianas proyectivas: `(x, y, z)` representa el
/// punto afín `(x/z^2, y/z^3)`. `z == 0` es el punto en el infinito.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JacobianPoint {
    /// Coordenada X proyectiva.
    pub x: BigUint,
    /// Coordenada Y proyectiva.
    pub y: BigUint,
    /// Coordenada Z proyectiva; cero marca el infinito.
    pub z: BigUint,
}

impl JacobianPoint {
    /// Eleva un punto afín a coordenadas Jacobianas (`z = 1` si es finito).
    #[must_use]
    pub fn from_affine(p: &AffinePoint) -> Self {
        use num_traits::{One, Zero};
        match p {
            AffinePoint::Infinity => JacobianPoint {
                x: BigUint::one(),
                y: BigUint::one(),
                z: BigUint::zero(),
            },
            AffinePoint::Point { x, y } => JacobianPoint {
                x: x.clone(),
                y: y.clone(),
                z: BigUint::one(),
            },
        }
    }

    /// El punto en el infinito en coordenadas Jacobianas.
    #[must_use]
    pub fn infinity() -> Self {
        use num_traits::{One, Zero};
        JacobianPoint {
            x: BigUint::one(),
            y: BigUint::one(),
            z: BigUint::zero(),
        }
    }

    /// `true` si `z == 0`.
    #[must_use]
    pub fn is_infinity(&self) -> bool {
        use num_traits::Zero;
        self.z.is_zero()
    }
}

impl Default for JacobianPoint {
    fn default() -> Self {
        JacobianPoint::infinity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_zero_normalizes_to_infinity() {
        let p = AffinePoint::try_from((BigUint::from(5u32), BigUint::from(0u32))).unwrap();
        assert!(p.is_infinity());
    }

    #[test]
    fn finite_point_round_trips() {
        let p = AffinePoint::try_from((BigUint::from(5u32), BigUint::from(7u32))).unwrap();
        assert_eq!(p.coords(), Some((&BigUint::from(5u32), &BigUint::from(7u32))));
    }

    #[test]
    fn affine_infinity_lifts_to_z_zero() {
        let j = JacobianPoint::from_affine(&AffinePoint::infinity());
        assert!(j.is_infinity());
    }

    #[test]
    fn affine_finite_lifts_with_z_one() {
        use num_traits::One;
        let j = JacobianPoint::from_affine(&AffinePoint::new(
            BigUint::from(3u32),
            BigUint::from(4u32),
        ));
        assert_eq!(j.z, BigUint::one());
        assert!(!j.is_infinity());
    }
}
