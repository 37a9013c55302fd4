//! Collapsed Gauss-Jacobi quadrature on reference cells

use crate::element::jacobi::{jacobi, jacobi_derivatives};
use crate::quadrature::types::QuadratureRule;
use crate::traits::types::ReferenceCellType;
use crate::types::{Error, Result};
use std::f64::consts::PI;

const NEWTON_TOLERANCE: f64 = 1e-15;
const NEWTON_MAX_ITERATIONS: usize = 100;

/// The roots of `P_m^{(a,b)}` on \[-1, 1\], in increasing order
///
/// Each root is found by Newton iteration from a Chebyshev initial guess, with the roots
/// already found deflated out of the polynomial.
pub fn gauss_jacobi_points(a: f64, b: f64, m: usize) -> Vec<f64> {
    let mut x: Vec<f64> = vec![];
    for k in 0..m {
        let mut r = -((2.0 * k as f64 + 1.0) * PI / (2.0 * m as f64)).cos();
        if k > 0 {
            r = 0.5 * (r + x[k - 1]);
        }
        for _ in 0..NEWTON_MAX_ITERATIONS {
            let s: f64 = x.iter().map(|xi| 1.0 / (r - xi)).sum();
            let f = jacobi(a, b, m, r)[m];
            let fp = jacobi_derivatives(a, b, m, r)[m];
            let delta = f / (fp - f * s);
            r -= delta;
            if delta.abs() < NEWTON_TOLERANCE {
                break;
            }
        }
        x.push(r);
    }
    x
}

/// Gauss-Jacobi rule with `m` points for the weight `(1 - x)^a` on \[-1, 1\]
pub fn gauss_jacobi_rule(a: f64, m: usize) -> (Vec<f64>, Vec<f64>) {
    let x = gauss_jacobi_points(a, 0.0, m);
    let w = x
        .iter()
        .map(|xi| {
            let d = jacobi_derivatives(a, 0.0, m, *xi)[m];
            2.0_f64.powf(a + 1.0) / ((1.0 - xi * xi) * d * d)
        })
        .collect();
    (x, w)
}

/// A rule with `m` points in each direction on a reference cell
///
/// Rules on the triangle and tetrahedron are obtained by collapsing a tensor product of
/// Gauss-Jacobi rules onto the simplex.
pub fn make_quadrature(cell: ReferenceCellType, m: usize) -> Result<QuadratureRule> {
    if m == 0 && cell != ReferenceCellType::Point {
        return Err(Error::InvalidQuadrature(format!(
            "cannot create a rule with no points on {cell}"
        )));
    }
    Ok(match cell {
        ReferenceCellType::Point => QuadratureRule::degenerate(),
        ReferenceCellType::Interval => interval_rule(m),
        ReferenceCellType::Quadrilateral => interval_rule(m).product(&interval_rule(m)),
        ReferenceCellType::Hexahedron => interval_rule(m)
            .product(&interval_rule(m))
            .product(&interval_rule(m)),
        ReferenceCellType::Triangle => {
            let (px, wx) = gauss_jacobi_rule(0.0, m);
            let (py, wy) = gauss_jacobi_rule(1.0, m);
            let mut points = vec![];
            let mut weights = vec![];
            for (x, u) in px.iter().zip(&wx) {
                for (y, v) in py.iter().zip(&wy) {
                    points.push(vec![0.25 * (1.0 + x) * (1.0 - y), 0.5 * (1.0 + y)]);
                    weights.push(u * v * 0.125);
                }
            }
            QuadratureRule::new(2, points, weights)
        }
        ReferenceCellType::Tetrahedron => {
            let (px, wx) = gauss_jacobi_rule(0.0, m);
            let (py, wy) = gauss_jacobi_rule(1.0, m);
            let (pz, wz) = gauss_jacobi_rule(2.0, m);
            let mut points = vec![];
            let mut weights = vec![];
            for (x, u) in px.iter().zip(&wx) {
                for (y, v) in py.iter().zip(&wy) {
                    for (z, t) in pz.iter().zip(&wz) {
                        points.push(vec![
                            0.125 * (1.0 + x) * (1.0 - y) * (1.0 - z),
                            0.25 * (1.0 + y) * (1.0 - z),
                            0.5 * (1.0 + z),
                        ]);
                        weights.push(u * v * t * 0.015625);
                    }
                }
            }
            QuadratureRule::new(3, points, weights)
        }
    })
}

fn interval_rule(m: usize) -> QuadratureRule {
    let (x, w) = gauss_jacobi_rule(0.0, m);
    QuadratureRule::new(
        1,
        x.iter().map(|xi| vec![0.5 * (1.0 + xi)]).collect(),
        w.iter().map(|wi| 0.5 * wi).collect(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use paste::paste;

    fn get_volume(cell_type: ReferenceCellType) -> f64 {
        match cell_type {
            ReferenceCellType::Point => 1.0,
            ReferenceCellType::Interval => 1.0,
            ReferenceCellType::Triangle => 0.5,
            ReferenceCellType::Quadrilateral => 1.0,
            ReferenceCellType::Tetrahedron => 1.0 / 6.0,
            ReferenceCellType::Hexahedron => 1.0,
        }
    }

    macro_rules! test_cell {

        ($($cell:ident),+) => {

        $(
            paste! {

                #[test]
                fn [<test_volume_ $cell:lower>]() {
                    let cell_type = ReferenceCellType::[<$cell>];
                    for npoints in 1..6 {
                        let rule = make_quadrature(cell_type, npoints).unwrap();
                        let volume_actual: f64 = rule.weights.iter().sum();
                        let volume_expected = get_volume(cell_type);
                        assert_relative_eq!(volume_actual, volume_expected, max_relative=1E-14);
                        for p in &rule.points {
                            assert_eq!(p.len(), rule.dim);
                            assert!(p.iter().all(|x| *x > 0.0 && *x < 1.0));
                        }
                    }
                }

            }
        )*
        };
    }

    test_cell!(
        Interval,
        Triangle,
        Quadrilateral,
        Tetrahedron,
        Hexahedron
    );

    #[test]
    fn test_gauss_legendre() {
        let (x, w) = gauss_jacobi_rule(0.0, 2);
        assert_relative_eq!(x[0], -1.0 / 3.0_f64.sqrt(), epsilon = 1e-14);
        assert_relative_eq!(x[1], 1.0 / 3.0_f64.sqrt(), epsilon = 1e-14);
        assert_relative_eq!(w[0], 1.0, epsilon = 1e-14);
        assert_relative_eq!(w[1], 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_exactness_triangle() {
        // ∫ x^2 y over the reference triangle is 1/60
        let rule = make_quadrature(ReferenceCellType::Triangle, 2).unwrap();
        let integral: f64 = rule.iter().map(|(p, w)| w * p[0] * p[0] * p[1]).sum();
        assert_relative_eq!(integral, 1.0 / 60.0, epsilon = 1e-14);
    }

    #[test]
    fn test_exactness_tetrahedron() {
        // ∫ x y z over the reference tetrahedron is 1/720
        let rule = make_quadrature(ReferenceCellType::Tetrahedron, 2).unwrap();
        let integral: f64 = rule.iter().map(|(p, w)| w * p[0] * p[1] * p[2]).sum();
        assert_relative_eq!(integral, 1.0 / 720.0, epsilon = 1e-14);
    }

    #[test]
    fn test_no_points() {
        assert!(make_quadrature(ReferenceCellType::Triangle, 0).is_err());
        assert_eq!(make_quadrature(ReferenceCellType::Point, 0).unwrap().npoints, 1);
    }
}
