//! El motor de curvas: validación de parámetros (SEC1 §3.1.1.2.1), ley de
//! grupo Jacobiana/afín, y las tres variantes de recuperación de la
//! coordenada y.
//!
//! `EC` es inmutable tras la construcción: toda la superficie pública toma
//! `&self`, de modo que una sola instancia se comparte libremente entre
//! hilos sin sincronización (véase el modelo de concurrencia en
//! `SPEC_FULL.md` §5).

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::instrument;

use crate::arithmetic::{is_probable_prime_fermat, legendre_symbol, mod_inv, mod_sqrt};
use crate::errors::CurveError;
use crate::point::{AffinePoint, JacobianPoint};

/// Tabla de seguridad SEC1: nivel de seguridad `t` (bits) -> longitud mínima
/// de `n` en bits.
const SECURITY_LEVEL_TABLE: &[(u32, u32)] = &[
    (80, 192),
    (96, 192),
    (112, 224),
    (128, 256),
    (192, 384),
    (256, 521),
];

/// Una curva de Weierstrass corta `y^2 = x^3 + a*x + b` sobre `F_p`, junto
/// con su generador `G`, orden `n` y cofactor `h`.
///
/// Inmutable tras `new`/`new_unchecked`: no hay caché mutable interna.
#[derive(Debug, Clone)]
pub struct EC {
    /// Módulo del cuerpo primo.
    pub p: BigUint,
    /// Coeficiente lineal.
    pub a: BigUint,
    /// Coeficiente independiente.
    pub b: BigUint,
    /// Generador del subgrupo de orden `n`.
    pub g: AffinePoint,
    /// Orden del subgrupo generado por `G`.
    pub n: BigUint,
    /// Cofactor `h = #E(F_p) / n`.
    pub h: BigUint,
    /// Nivel de seguridad objetivo en bits, o `0` si no se exige ninguno.
    pub t: u32,
    /// Longitud de `p` en bits.
    pub p_bitlen: u64,
    /// Longitud de `p` en bytes, `ceil(p_bitlen / 8)`.
    pub byte_size: u64,
    /// `true` si `p \u{2261} 3 (mod 4)`, condición que exige
    /// `y_quadratic_residue`.
    pub p_is_three_mod_four: bool,
}

impl EC {
    /// Construye y valida una curva, aplicando las comprobaciones de SEC1
    /// §3.1.1.2.1 moduladas por `all_checks` y el nivel de seguridad
    /// objetivo `t`.
    ///
    /// Con `all_checks = false` se omiten la cota de Hasse, la guardia
    /// `p^i mod n` y la comprobación de bits de `p` frente a `t`; el resto
    /// de comprobaciones (primalidad, discriminante, `G` sobre la curva,
    /// igualdad del cofactor, `(n-1)G + G = infinito`, `n != p`) se aplican
    /// siempre. `t = 0` significa "ningún nivel de seguridad exigido" y
    /// desactiva tanto la comprobación de bits como la cota
    /// `h <= 2^(t/8)`, incluso con `all_checks = true`.
    ///
    /// # Errors
    /// `CurveError::Validation` o `CurveError::WeakCurve` según la
    /// comprobación que falle.
    #[instrument(level = "trace", skip(a, b, gx, gy, n, h))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: BigUint,
        a: BigUint,
        b: BigUint,
        gx: BigUint,
        gy: BigUint,
        n: BigUint,
        h: BigUint,
        t: u32,
        all_checks: bool,
    ) -> Result<Self, CurveError> {
        // 1. p debe ser un primo probable impar.
        if &p % 2u8 == BigUint::zero() || !is_probable_prime_fermat(&p) {
            return Err(CurveError::Validation(
                "p is not an odd probable prime".into(),
            ));
        }

        let p_bitlen = p.bits();
        let byte_size = (p_bitlen + 7) / 8;
        let p_is_three_mod_four = &p % 4u8 == BigUint::from(3u8);

        // 2. Nivel de seguridad: bitlen(p) == tabla[t], solo si t != 0.
        if all_checks && t != 0 {
            match required_bits_for_level(t) {
                None => {
                    return Err(CurveError::WeakCurve(format!(
                        "required security level t={t} is not in the allowed range {{80,96,112,128,192,256}}"
                    )));
                }
                Some(required) if u64::from(required) != p_bitlen => {
                    return Err(CurveError::WeakCurve(format!(
                        "p has {p_bitlen} bits, required security level t={t} needs exactly {required}"
                    )));
                }
                Some(_) => {}
            }
        }

        // 3. Discriminante no nulo: 4a^3 + 27b^2 != 0 (mod p).
        let four_a3 = (BigUint::from(4u8) * &a * &a * &a) % &p;
        let twenty_seven_b2 = (BigUint::from(27u8) * &b * &b) % &p;
        let discriminant = (four_a3 + twenty_seven_b2) % &p;
        if discriminant.is_zero() {
            return Err(CurveError::Validation(
                "discriminant 4a^3 + 27b^2 is zero mod p".into(),
            ));
        }

        let g = AffinePoint::try_from((gx, gy))?;

        // 4. G debe estar sobre la curva.
        let candidate = EC {
            p: p.clone(),
            a: a.clone(),
            b: b.clone(),
            g: g.clone(),
            n: n.clone(),
            h: h.clone(),
            t,
            p_bitlen,
            byte_size,
            p_is_three_mod_four,
        };
        if !candidate.is_on_curve(&g)? {
            return Err(CurveError::Validation("G is not on the curve".into()));
        }

        // floor(2*sqrt(p)), computed exactly as isqrt(4p) rather than
        // 2*isqrt(p): the two differ whenever sqrt(p) is irrational, and
        // only the former matches the Hasse bound and cofactor formula
        // below at small p.
        let two_sqrt_p_floor = isqrt(&(BigUint::from(4u8) * &p));

        // 5. Cota de Hasse: p+1-2*sqrt(p) <= n <= p+1+2*sqrt(p).
        if all_checks {
            let p_plus_one = &p + BigUint::one();
            let lower = if two_sqrt_p_floor > p_plus_one {
                BigUint::zero()
            } else {
                &p_plus_one - &two_sqrt_p_floor
            };
            let upper = &p_plus_one + &two_sqrt_p_floor;
            if n < lower || n > upper {
                return Err(CurveError::WeakCurve(
                    "n is not within the Hasse interval [p+1-2*sqrt(p), p+1+2*sqrt(p)]".into(),
                ));
            }
        }

        // 6. Cofactor: h == floor((sqrt(p)+1)^2 / n) == floor((p+1+floor(2*sqrt(p))) / n),
        //    siempre, y h <= 2^(t/8) cuando se exige un nivel de seguridad.
        let upper = &p + BigUint::one() + &two_sqrt_p_floor;
        let expected_h = &upper / &n;
        if expected_h != h {
            return Err(CurveError::WeakCurve(
                "cofactor h does not match floor((sqrt(p)+1)^2 / n)".into(),
            ));
        }
        if all_checks && t != 0 {
            let bound = BigUint::from(2u8).pow(t / 8);
            if h > bound {
                return Err(CurveError::WeakCurve(format!(
                    "cofactor h is too large for required security level t={t}"
                )));
            }
        }

        // 7. (n-1)*G + G == infinito, evitando la tautología n*G == infinito
        //    por construcción (se sabe 0*G == infinito trivialmente).
        let n_minus_one = &n - BigUint::one();
        let check_point = candidate.point_mult(&n_minus_one, &g)?;
        let should_be_infinity = candidate.add(&check_point, &g)?;
        if !should_be_infinity.is_infinity() {
            return Err(CurveError::Validation(
                "(n-1)*G + G is not the point at infinity".into(),
            ));
        }

        // 8. n != p (evita curvas anómalas triviales).
        if n == p {
            return Err(CurveError::WeakCurve("n equals p (anomalous curve)".into()));
        }

        // 9. Guardia MOV: p^i mod n != 1 para i en 1..100.
        if all_checks {
            let mut power = p.mod_floor(&n);
            let mut anomalous = power == BigUint::one();
            for _ in 1..100 {
                if anomalous {
                    break;
                }
                power = (&power * &p).mod_floor(&n);
                anomalous = power == BigUint::one();
            }
            if anomalous {
                return Err(CurveError::WeakCurve(
                    "MOV condition violated: p^i = 1 (mod n) for some i in 1..100".into(),
                ));
            }
        }

        Ok(candidate)
    }

    /// Construye una curva sin ejecutar ninguna comprobación.
    ///
    /// Reservado a las fixtures de prueba internas donde los parámetros ya
    /// han sido verificados fuera de banda. `t` queda en `0` (ningún nivel
    /// de seguridad exigido); `p_bitlen`, `byte_size` y
    /// `p_is_three_mod_four` se derivan de `p` sin validarla.
    #[must_use]
    pub fn new_unchecked(
        p: BigUint,
        a: BigUint,
        b: BigUint,
        g: AffinePoint,
        n: BigUint,
        h: BigUint,
    ) -> Self {
        let p_bitlen = p.bits();
        let byte_size = (p_bitlen + 7) / 8;
        let p_is_three_mod_four = &p % 4u8 == BigUint::from(3u8);
        EC {
            p,
            a,
            b,
            g,
            n,
            h,
            t: 0,
            p_bitlen,
            byte_size,
            p_is_three_mod_four,
        }
    }

    /// `y^2 mod p` para la `x` dada, vía la ecuación de la curva.
    #[must_use]
    pub fn y2(&self, x: &BigUint) -> BigUint {
        let x3 = (x * x * x) % &self.p;
        let ax = (&self.a * x) % &self.p;
        (x3 + ax + &self.b) % &self.p
    }

    /// `true` si el punto satisface la ecuación de Weierstrass de la curva.
    ///
    /// El infinito siempre está sobre la curva por convención.
    ///
    /// # Errors
    /// `CurveError::InvalidInput` si `y` está fuera de `[0, p)`.
    pub fn is_on_curve(&self, point: &AffinePoint) -> Result<bool, CurveError> {
        let (x, y) = match point.coords() {
            None => return Ok(true),
            Some(xy) => xy,
        };
        if y.is_zero() {
            // y = 0 denotes the point at infinity by convention, even when
            // it reaches here as a finite `AffinePoint` built via `new`.
            return Ok(true);
        }
        if y >= &self.p {
            return Err(CurveError::InvalidInput(
                "y coordinate is not in [0, p)".into(),
            ));
        }
        let lhs = (y * y) % &self.p;
        Ok(lhs == self.y2(x))
    }

    /// El opuesto aditivo `-P = (x, p - y)`; el infinito es su propio
    /// opuesto.
    #[must_use]
    pub fn opposite(&self, point: &AffinePoint) -> AffinePoint {
        match point.coords() {
            None => AffinePoint::infinity(),
            Some((x, y)) => AffinePoint::new(x.clone(), (&self.p - y) % &self.p),
        }
    }

    /// Recupera una ordenada `y` con `y^2 = x^3 + ax + b` para la `x` dada.
    ///
    /// # Errors
    /// `CurveError::NoSquareRoot` si `x` no corresponde a ningún punto de la
    /// curva.
    pub fn y(&self, x: &BigUint) -> Result<BigUint, CurveError> {
        mod_sqrt(&self.y2(x), &self.p)
    }

    /// La raíz con paridad impar entre `{y, p - y}`.
    pub fn y_odd(&self, x: &BigUint) -> Result<BigUint, CurveError> {
        let root = self.y(x)?;
        if root.is_odd() {
            Ok(root)
        } else {
            Ok((&self.p - &root) % &self.p)
        }
    }

    /// La mayor de las dos raíces `{y, p - y}`, comparada numéricamente.
    pub fn y_high(&self, x: &BigUint) -> Result<BigUint, CurveError> {
        let root = self.y(x)?;
        let other = (&self.p - &root) % &self.p;
        Ok(std::cmp::max(root, other))
    }

    /// La raíz que es residuo cuadrático módulo `p`.
    ///
    /// # Errors
    /// `CurveError::UnsupportedPrime` si `p \u{2261} 3 (mod 4)` no se
    /// cumple, ya que el símbolo de Legendre sobre la propia raíz no basta
    /// para desempatar sin esa condición.
    pub fn y_quadratic_residue(&self, x: &BigUint) -> Result<BigUint, CurveError> {
        if !self.p_is_three_mod_four {
            return Err(CurveError::UnsupportedPrime);
        }
        let root = self.y(x)?;
        if legendre_symbol(&root, &self.p) == BigUint::one() {
            Ok(root)
        } else {
            Ok((&self.p - &root) % &self.p)
        }
    }

    /// Suma de dos puntos afines, eligiendo automáticamente doblado o la
    /// fórmula general.
    #[instrument(level = "trace", skip(self))]
    pub fn add(&self, p1: &AffinePoint, p2: &AffinePoint) -> Result<AffinePoint, CurveError> {
        let j1 = JacobianPoint::from_affine(p1);
        let j2 = JacobianPoint::from_affine(p2);
        let sum = if p1 == p2 {
            self.double_jacobian(&j1)
        } else {
            self.add_jacobian(&j1, &j2)
        };
        self.affine_from_jacobian(&sum)
    }

    /// Doblado Jacobiano: `W = 3X^2 + aZ^4`, etc.
    #[instrument(level = "trace", skip(self, point))]
    pub fn double_jacobian(&self, point: &JacobianPoint) -> JacobianPoint {
        let p = &self.p;
        if point.is_infinity() || point.y.is_zero() {
            return JacobianPoint::infinity();
        }
        let z2 = (&point.z * &point.z) % p;
        let z4 = (&z2 * &z2) % p;
        let w = (BigUint::from(3u8) * &point.x * &point.x + &self.a * &z4) % p;
        let y2 = (&point.y * &point.y) % p;
        let v = (BigUint::from(4u8) * &point.x * &y2) % p;
        let x3 = (&w * &w + 2u8 * p - (2u8 * &v) % p) % p;
        let y2_sq = (&y2 * &y2) % p;
        let y3 = (&w * ((&v + p - &x3) % p) + (p - (BigUint::from(8u8) * &y2_sq) % p) % p) % p;
        let z3 = (BigUint::from(2u8) * &point.y * &point.z) % p;
        JacobianPoint {
            x: x3 % p,
            y: y3 % p,
            z: z3,
        }
    }

    /// Suma Jacobiana general (fórmulas `T, U, W, M, N, V`).
    #[instrument(level = "trace", skip(self, p1, p2))]
    pub fn add_jacobian(&self, p1: &JacobianPoint, p2: &JacobianPoint) -> JacobianPoint {
        let p = &self.p;
        if p1.is_infinity() {
            return p2.clone();
        }
        if p2.is_infinity() {
            return p1.clone();
        }

        let z1z1 = (&p1.z * &p1.z) % p;
        let z2z2 = (&p2.z * &p2.z) % p;
        let u1 = (&p1.x * &z2z2) % p;
        let u2 = (&p2.x * &z1z1) % p;
        let s1 = (&p1.y * &p2.z * &z2z2) % p;
        let s2 = (&p2.y * &p1.z * &z1z1) % p;

        if u1 == u2 {
            return if s1 != s2 {
                JacobianPoint::infinity()
            } else {
                self.double_jacobian(p1)
            };
        }

        let h = (&u2 + p - &u1) % p;
        let i = (BigUint::from(4u8) * &h * &h) % p;
        let j = (&h * &i) % p;
        let r = (BigUint::from(2u8) * ((&s2 + p - &s1) % p)) % p;
        let v = (&u1 * &i) % p;

        let x3 = (&r * &r + p - (&j + 2u8 * &v) % p) % p;
        let x3 = x3 % p;
        let y3 = (&r * ((&v + p - &x3) % p) + p - (BigUint::from(2u8) * &s1 * &j) % p) % p;
        let z3 = ((((&p1.z + &p2.z) % p) * ((&p1.z + &p2.z) % p) + p - &z1z1) % p + p - &z2z2)
            % p
            * &h
            % p;

        JacobianPoint {
            x: x3,
            y: y3 % p,
            z: z3 % p,
        }
    }

    /// Convierte un punto Jacobiano de vuelta a afín.
    ///
    /// # Errors
    /// Propaga el fallo de `mod_inv` si `z` no fuese invertible (no debería
    /// ocurrir salvo error de invariante interno).
    pub fn affine_from_jacobian(&self, point: &JacobianPoint) -> Result<AffinePoint, CurveError> {
        if point.is_infinity() {
            return Ok(AffinePoint::infinity());
        }
        let z_inv = mod_inv(&point.z, &self.p)?;
        let z_inv2 = (&z_inv * &z_inv) % &self.p;
        let z_inv3 = (&z_inv2 * &z_inv) % &self.p;
        let x = (&point.x * &z_inv2) % &self.p;
        let y = (&point.y * &z_inv3) % &self.p;
        AffinePoint::try_from((x, y))
    }

    /// Multiplicación escalar `k * point`, doblar-y-sumar de izquierda a
    /// derecha.
    #[instrument(level = "trace", skip(self, point))]
    pub fn point_mult(&self, k: &BigUint, point: &AffinePoint) -> Result<AffinePoint, CurveError> {
        if k.is_zero() || point.is_infinity() {
            return Ok(AffinePoint::infinity());
        }
        let mut result = JacobianPoint::infinity();
        let base = JacobianPoint::from_affine(point);
        for bit in bits_msb_first(k) {
            result = self.double_jacobian(&result);
            if bit {
                result = self.add_jacobian(&result, &base);
            }
        }
        self.affine_from_jacobian(&result)
    }

    /// Multiplicación doble-escalar `u*Q + v*P` por el truco de Shamir.
    #[instrument(level = "trace", skip(self, q, p2))]
    pub fn dbl_scalar_mult(
        &self,
        u: &BigUint,
        q: &AffinePoint,
        v: &BigUint,
        p2: &AffinePoint,
    ) -> Result<AffinePoint, CurveError> {
        if u.is_zero() && v.is_zero() {
            return Ok(AffinePoint::infinity());
        }
        if u.is_zero() {
            return self.point_mult(v, p2);
        }
        if v.is_zero() {
            return self.point_mult(u, q);
        }
        if q.is_infinity() {
            return self.point_mult(v, p2);
        }
        if p2.is_infinity() {
            return self.point_mult(u, q);
        }

        let sum_affine = self.add(q, p2)?;
        let jq = JacobianPoint::from_affine(q);
        let jp = JacobianPoint::from_affine(p2);
        let jsum = JacobianPoint::from_affine(&sum_affine);

        let bits_u = bits_msb_first(u);
        let bits_v = bits_msb_first(v);
        let max_len = bits_u.len().max(bits_v.len());
        let bits_u = pad_left(bits_u, max_len);
        let bits_v = pad_left(bits_v, max_len);

        let mut result = JacobianPoint::infinity();
        for (bu, bv) in bits_u.into_iter().zip(bits_v.into_iter()) {
            result = self.double_jacobian(&result);
            result = match (bu, bv) {
                (false, false) => result,
                (true, false) => self.add_jacobian(&result, &jq),
                (false, true) => self.add_jacobian(&result, &jp),
                (true, true) => self.add_jacobian(&result, &jsum),
            };
        }
        self.affine_from_jacobian(&result)
    }
}

/// Longitud de bits de `p` exigida por el nivel de seguridad `t`, o `None`
/// si `t` no es uno de los niveles reconocidos por SEC1 v.2.
fn required_bits_for_level(t: u32) -> Option<u32> {
    SECURITY_LEVEL_TABLE
        .iter()
        .find_map(|(level, bits)| (*level == t).then_some(*bits))
}

/// Raíz cuadrada entera por Newton, usada solo para la cota de Hasse.
fn isqrt(n: &BigUint) -> BigUint {
    if n.is_zero() {
        return BigUint::zero();
    }
    let mut x = BigUint::one() << ((n.bits() as usize + 1) / 2 + 1);
    loop {
        let next = (&x + n / &x) >> 1;
        if next >= x {
            return x;
        }
        x = next;
    }
}

/// Bits de `k` de MSB a LSB, sin ceros a la izquierda.
fn bits_msb_first(k: &BigUint) -> Vec<bool> {
    let bits = k.bits();
    (0..bits).rev().map(|i| k.bit(i)).collect()
}

fn pad_left(mut bits: Vec<bool>, len: usize) -> Vec<bool> {
    while bits.len() < len {
        bits.insert(0, false);
    }
    bits
}
