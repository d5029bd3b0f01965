use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Division by zero: cannot scale or normalize a degenerate vector")]
    DivisionByZero,
}

pub fn add(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a + b
}

pub fn subtract(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a - b
}

pub fn multiply(v: &Vector3<f64>, k: f64) -> Vector3<f64> {
    v * k
}

pub fn divide(v: &Vector3<f64>, k: f64) -> Result<Vector3<f64>, GeometryError> {
    if k == 0.0 {
        return Err(GeometryError::DivisionByZero);
    }
    Ok(v / k)
}

pub fn magnitude(v: &Vector3<f64>) -> f64 {
    (v.x * v.x + v.y * v.y + v.z * v.z).sqrt()
}

/// Scales `v` to unit length.
///
/// # Errors
///
/// Returns [`GeometryError::DivisionByZero`] for the zero vector, which is what two
/// atoms sharing the same coordinates produce.
pub fn normalize(v: &Vector3<f64>) -> Result<Vector3<f64>, GeometryError> {
    divide(v, magnitude(v))
}

pub fn dot(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b)
}

pub fn cross(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a.cross(b)
}

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    magnitude(&(b - a))
}

/// Computes the angle at vertex `b` formed by the rays towards `a` and `c`.
///
/// # Return
///
/// The angle in degrees, in `[0, 180]`.
///
/// # Errors
///
/// Fails with [`GeometryError::DivisionByZero`] if `a` or `c` coincides with `b`.
pub fn angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Result<f64, GeometryError> {
    let r1 = normalize(&(a - b))?;
    let r2 = normalize(&(c - b))?;

    let cosine = dot(&r1, &r2).clamp(-1.0, 1.0);
    Ok(cosine.acos().to_degrees())
}

/// Computes the signed dihedral angle around the `p2`-`p3` bond.
///
/// The sign is recovered with `atan2` from the projection of the first plane normal onto
/// the second, so mirror-image conformations give opposite signs.
///
/// # Return
///
/// The dihedral in degrees, in `(-180, 180]`. Fully eclipsed (cis) points give `0` and
/// fully staggered (anti) points give `180`.
///
/// # Errors
///
/// Fails with [`GeometryError::DivisionByZero`] if any two consecutive points coincide.
pub fn torsion(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> Result<f64, GeometryError> {
    let r1 = normalize(&(p1 - p2))?;
    let r2 = normalize(&(p2 - p3))?;
    let r3 = normalize(&(p3 - p4))?;

    let n1 = cross(&r1, &r2);
    let n2 = cross(&r2, &r3);

    let x = dot(&n1, &n2);
    let y = dot(&cross(&n1, &r2), &n2);

    let degrees = y.atan2(x).to_degrees();
    if degrees <= -180.0 {
        Ok(degrees + 360.0)
    } else {
        Ok(degrees)
    }
}
