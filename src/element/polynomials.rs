//! Orthogonal polynomial expansion sets
//!
//! Polynomials are defined on the UFC reference cells. On simplices they are the collapsed
//! coordinate (Dubiner) polynomials built from Jacobi polynomials. On the interval,
//! quadrilateral and hexahedron they are (tensor products of) Legendre polynomials. Every set
//! is scaled so that `∫ψ_iψ_j = δ_ij / 2^d` on a cell of dimension `d`.

use crate::element::jacobi::{homogeneous_jacobi, jacobi, jacobi_derivatives};
use crate::element::reference_cell;
use crate::quadrature::gauss_jacobi::make_quadrature;
use crate::traits::types::ReferenceCellType;
use crate::types::{Error, Result};
use nalgebra::DMatrix;

/// The number of polynomials in the expansion set of a given degree
pub fn polynomial_count(cell_type: ReferenceCellType, degree: usize) -> usize {
    match cell_type {
        ReferenceCellType::Point => 1,
        ReferenceCellType::Interval => degree + 1,
        ReferenceCellType::Triangle => num::integer::binomial(degree + 2, 2),
        ReferenceCellType::Quadrilateral => (degree + 1) * (degree + 1),
        ReferenceCellType::Tetrahedron => num::integer::binomial(degree + 3, 3),
        ReferenceCellType::Hexahedron => (degree + 1) * (degree + 1) * (degree + 1),
    }
}

/// The total degree of each member of the expansion set
pub fn polynomial_degrees(cell_type: ReferenceCellType, degree: usize) -> Vec<usize> {
    match cell_type {
        ReferenceCellType::Point => vec![0],
        ReferenceCellType::Interval => (0..degree + 1).collect(),
        ReferenceCellType::Triangle | ReferenceCellType::Tetrahedron => {
            let tdim = reference_cell::dim(cell_type);
            (0..degree + 1)
                .flat_map(|k| {
                    let n = num::integer::binomial(k + tdim - 1, tdim - 1);
                    std::iter::repeat(k).take(n)
                })
                .collect()
        }
        ReferenceCellType::Quadrilateral => {
            let mut d = vec![];
            for i in 0..degree + 1 {
                for j in 0..degree + 1 {
                    d.push(i.max(j));
                }
            }
            d
        }
        ReferenceCellType::Hexahedron => {
            let mut d = vec![];
            for i in 0..degree + 1 {
                for j in 0..degree + 1 {
                    for k in 0..degree + 1 {
                        d.push(i.max(j).max(k));
                    }
                }
            }
            d
        }
    }
}

/// The position of each polynomial of the set of degree `degree` in the set of degree
/// `target`
pub fn embed_indices(cell_type: ReferenceCellType, degree: usize, target: usize) -> Vec<usize> {
    let (n, m) = (degree + 1, target + 1);
    match cell_type {
        ReferenceCellType::Quadrilateral => (0..n)
            .flat_map(|a| (0..n).map(move |b| a * m + b))
            .collect(),
        ReferenceCellType::Hexahedron => (0..n)
            .flat_map(|a| (0..n).flat_map(move |b| (0..n).map(move |c| (a * m + b) * m + c)))
            .collect(),
        // Simplex sets are ordered by total degree, so lower degree sets are a prefix
        _ => (0..polynomial_count(cell_type, degree)).collect(),
    }
}

fn legendre(degree: usize, x: f64) -> (Vec<f64>, Vec<f64>) {
    let p = jacobi(0.0, 0.0, degree, 2.0 * x - 1.0);
    let dp = jacobi_derivatives(0.0, 0.0, degree, 2.0 * x - 1.0);
    let scale = (0..degree + 1).map(|i| (i as f64 + 0.5).sqrt());
    let (mut v, mut d) = (vec![], vec![]);
    for ((p, dp), s) in p.iter().zip(&dp).zip(scale) {
        v.push(p * s);
        d.push(2.0 * dp * s);
    }
    (v, d)
}

fn tabulate_interval(degree: usize, point: &[f64], data: &mut [Vec<Vec<f64>>], i: usize) {
    let (v, d) = legendre(degree, point[0]);
    for p in 0..degree + 1 {
        data[0][p][i] = v[p];
        data[1][p][i] = d[p];
    }
}

fn tabulate_quadrilateral(degree: usize, point: &[f64], data: &mut [Vec<Vec<f64>>], i: usize) {
    let (vx, dx) = legendre(degree, point[0]);
    let (vy, dy) = legendre(degree, point[1]);
    for a in 0..degree + 1 {
        for b in 0..degree + 1 {
            let p = a * (degree + 1) + b;
            data[0][p][i] = vx[a] * vy[b];
            data[1][p][i] = dx[a] * vy[b];
            data[2][p][i] = vx[a] * dy[b];
        }
    }
}

fn tabulate_hexahedron(degree: usize, point: &[f64], data: &mut [Vec<Vec<f64>>], i: usize) {
    let (vx, dx) = legendre(degree, point[0]);
    let (vy, dy) = legendre(degree, point[1]);
    let (vz, dz) = legendre(degree, point[2]);
    let n = degree + 1;
    for a in 0..n {
        for b in 0..n {
            for c in 0..n {
                let p = (a * n + b) * n + c;
                data[0][p][i] = vx[a] * vy[b] * vz[c];
                data[1][p][i] = dx[a] * vy[b] * vz[c];
                data[2][p][i] = vx[a] * dy[b] * vz[c];
                data[3][p][i] = vx[a] * vy[b] * dz[c];
            }
        }
    }
}

fn tabulate_triangle(degree: usize, point: &[f64], data: &mut [Vec<Vec<f64>>], i: usize) {
    let (x, y) = (point[0], point[1]);
    let (a, at, as_) = homogeneous_jacobi(0.0, degree, 2.0 * x, 1.0 - y);
    let mut p = 0;
    for k in 0..degree + 1 {
        for j in 0..k + 1 {
            let ii = k - j;
            let jj = j;
            let alpha = 2.0 * ii as f64 + 1.0;
            let b = jacobi(alpha, 0.0, jj, 2.0 * y - 1.0)[jj];
            let db = 2.0 * jacobi_derivatives(alpha, 0.0, jj, 2.0 * y - 1.0)[jj];
            let norm = ((ii as f64 + 0.5) * (ii as f64 + jj as f64 + 1.0)).sqrt();
            data[0][p][i] = a[ii] * b * norm;
            data[1][p][i] = 2.0 * at[ii] * b * norm;
            data[2][p][i] = (-as_[ii] * b + a[ii] * db) * norm;
            p += 1;
        }
    }
}

fn tabulate_tetrahedron(degree: usize, point: &[f64], data: &mut [Vec<Vec<f64>>], i: usize) {
    let (x, y, z) = (point[0], point[1], point[2]);
    let (a, at, as_) = homogeneous_jacobi(0.0, degree, 2.0 * x, 1.0 - y - z);
    let mut p = 0;
    for k in 0..degree + 1 {
        for l in 0..k + 1 {
            for j in 0..k - l + 1 {
                let ii = k - l - j;
                let jj = j;
                let kk = l;
                let (b, bt, bs) = homogeneous_jacobi(2.0 * ii as f64 + 1.0, jj, 2.0 * y, 1.0 - z);
                let gamma = 2.0 * (ii + jj) as f64 + 2.0;
                let c = jacobi(gamma, 0.0, kk, 2.0 * z - 1.0)[kk];
                let dc = 2.0 * jacobi_derivatives(gamma, 0.0, kk, 2.0 * z - 1.0)[kk];
                let (ii, jj, kk) = (ii as f64, jj as f64, kk as f64);
                let norm = ((ii + 0.5) * (ii + jj + 1.0) * (ii + jj + kk + 1.5)).sqrt();
                let (ai, bj) = (a[ii as usize], b[jj as usize]);
                let (ati, asi) = (at[ii as usize], as_[ii as usize]);
                let (btj, bsj) = (bt[jj as usize], bs[jj as usize]);
                data[0][p][i] = ai * bj * c * norm;
                data[1][p][i] = 2.0 * ati * bj * c * norm;
                data[2][p][i] = (-asi * bj + 2.0 * ai * btj) * c * norm;
                data[3][p][i] = (-asi * bj * c - ai * bsj * c + ai * bj * dc) * norm;
                p += 1;
            }
        }
    }
}

/// Tabulate the expansion set and its first derivatives
///
/// The result is indexed by \[derivative\]\[polynomial\]\[point\], where derivative 0 is
/// the value and derivative `1 + d` is the derivative in direction `d`.
pub fn tabulate_legendre_polynomials(
    cell_type: ReferenceCellType,
    points: &[Vec<f64>],
    degree: usize,
) -> Vec<Vec<Vec<f64>>> {
    let tdim = reference_cell::dim(cell_type);
    let mut data =
        vec![vec![vec![0.0; points.len()]; polynomial_count(cell_type, degree)]; tdim + 1];
    for (i, pt) in points.iter().enumerate() {
        match cell_type {
            ReferenceCellType::Point => data[0][0][i] = 1.0,
            ReferenceCellType::Interval => tabulate_interval(degree, pt, &mut data, i),
            ReferenceCellType::Triangle => tabulate_triangle(degree, pt, &mut data, i),
            ReferenceCellType::Quadrilateral => tabulate_quadrilateral(degree, pt, &mut data, i),
            ReferenceCellType::Tetrahedron => tabulate_tetrahedron(degree, pt, &mut data, i),
            ReferenceCellType::Hexahedron => tabulate_hexahedron(degree, pt, &mut data, i),
        }
    }
    data
}

/// Derivative matrices of the expansion set
///
/// Entry `[d][(i, j)]` is the coefficient of polynomial `j` in the derivative of polynomial
/// `i` in direction `d`.
pub fn dmats(cell_type: ReferenceCellType, degree: usize) -> Result<Vec<DMatrix<f64>>> {
    let tdim = reference_cell::dim(cell_type);
    let n = polynomial_count(cell_type, degree);
    let rule = make_quadrature(cell_type, degree + 1)?;
    let table = tabulate_legendre_polynomials(cell_type, &rule.points, degree);
    let mass = DMatrix::from_fn(n, n, |i, j| {
        rule.weights
            .iter()
            .enumerate()
            .map(|(q, w)| w * table[0][i][q] * table[0][j][q])
            .sum()
    });
    let lu = mass.lu();
    let mut mats = vec![];
    for d in 0..tdim {
        // Row i of `b` integrates the derivative of polynomial i against the expansion set
        let b = DMatrix::from_fn(n, n, |i, j| {
            rule.weights
                .iter()
                .enumerate()
                .map(|(q, w)| w * table[d + 1][i][q] * table[0][j][q])
                .sum()
        });
        let x = lu.solve(&b.transpose()).ok_or_else(|| {
            Error::SingularMatrix(format!("mass matrix of degree {degree} on {cell_type}"))
        })?;
        mats.push(x.transpose());
    }
    Ok(mats)
}

/// Tabulate an arbitrary derivative of the expansion set at a set of points
///
/// The result is indexed by \[polynomial\]\[point\].
pub fn tabulate_derivative(
    cell_type: ReferenceCellType,
    degree: usize,
    derivative: &[usize],
    points: &[Vec<f64>],
) -> Result<Vec<Vec<f64>>> {
    let order: usize = derivative.iter().sum();
    let mut table = tabulate_legendre_polynomials(cell_type, points, degree);
    if order == 0 {
        return Ok(table.swap_remove(0));
    }
    let Some(d) = derivative.iter().position(|&k| k > 0) else {
        return Ok(table.swap_remove(0));
    };
    if order == 1 {
        return Ok(table.swap_remove(d + 1));
    }

    // Apply one derivative matrix to the table of the remaining derivatives
    let mut rest = derivative.to_vec();
    rest[d] -= 1;
    let inner = tabulate_derivative(cell_type, degree, &rest, points)?;
    let dmat = &dmats(cell_type, degree)?[d];
    let n = inner.len();
    Ok((0..n)
        .map(|i| {
            (0..points.len())
                .map(|q| (0..n).map(|j| dmat[(i, j)] * inner[j][q]).sum())
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use paste::paste;

    fn volume(cell: ReferenceCellType) -> f64 {
        match cell {
            ReferenceCellType::Triangle => 0.5,
            ReferenceCellType::Tetrahedron => 1.0 / 6.0,
            _ => 1.0,
        }
    }

    macro_rules! test_orthogonality {
        ($($cell:ident, $degree:expr),+) => {
        $(
            paste! {
                #[test]
                fn [<test_orthogonal_ $cell:lower>]() {
                    let cell = ReferenceCellType::[<$cell>];
                    let rule = make_quadrature(cell, $degree + 1).unwrap();
                    let data = tabulate_legendre_polynomials(cell, &rule.points, $degree);
                    assert_eq!(data[0].len(), polynomial_count(cell, $degree));
                    for i in 0..data[0].len() {
                        for j in 0..data[0].len() {
                            let mut product = 0.0;
                            for k in 0..rule.weights.len() {
                                product += data[0][i][k] * data[0][j][k] * rule.weights[k];
                            }
                            if i == j {
                                assert_relative_eq!(product, 0.5_f64.powi(reference_cell::dim(cell) as i32), epsilon = 1e-12);
                            } else {
                                assert_relative_eq!(product, 0.0, epsilon = 1e-12);
                            }
                        }
                    }
                    assert_relative_eq!(rule.weights.iter().sum::<f64>(), volume(cell), epsilon = 1e-13);
                }

                #[test]
                fn [<test_derivatives_ $cell:lower>]() {
                    let cell = ReferenceCellType::[<$cell>];
                    let tdim = reference_cell::dim(cell);
                    let h = 1e-6;
                    let point = vec![0.15, 0.2, 0.25][..tdim].to_vec();
                    let data = tabulate_legendre_polynomials(cell, &[point.clone()], $degree);
                    for d in 0..tdim {
                        let mut p0 = point.clone();
                        let mut p1 = point.clone();
                        p0[d] -= h;
                        p1[d] += h;
                        let v0 = tabulate_legendre_polynomials(cell, &[p0], $degree);
                        let v1 = tabulate_legendre_polynomials(cell, &[p1], $degree);
                        for i in 0..data[0].len() {
                            assert_relative_eq!(
                                data[d + 1][i][0],
                                (v1[0][i][0] - v0[0][i][0]) / (2.0 * h),
                                epsilon = 1e-5
                            );
                        }
                    }
                }
            }
        )*
        };
    }

    test_orthogonality!(
        Interval, 6,
        Triangle, 5,
        Quadrilateral, 4,
        Tetrahedron, 4,
        Hexahedron, 3
    );

    #[test]
    fn test_triangle_first_polynomials() {
        let data = tabulate_legendre_polynomials(ReferenceCellType::Triangle, &[vec![0.2, 0.3]], 1);
        // ψ_0 = 1 / sqrt(2), ψ_1 = sqrt(3) (2x + y - 1), ψ_2 = 3y - 1
        assert_relative_eq!(data[0][0][0], 0.5_f64.sqrt(), epsilon = 1e-14);
        assert_relative_eq!(
            data[0][1][0],
            3.0_f64.sqrt() * (2.0 * 0.2 + 0.3 - 1.0),
            epsilon = 1e-14
        );
        assert_relative_eq!(data[0][2][0], 3.0 * 0.3 - 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_second_derivative() {
        let cell = ReferenceCellType::Triangle;
        let h = 1e-4;
        let p = vec![0.3, 0.25];
        let d2 = tabulate_derivative(cell, 3, &[1, 1], &[p.clone()]).unwrap();
        let f = |x: f64, y: f64| tabulate_derivative(cell, 3, &[1, 0], &[vec![x, y]]).unwrap();
        let a = f(p[0], p[1] + h);
        let b = f(p[0], p[1] - h);
        for i in 0..d2.len() {
            assert_relative_eq!(d2[i][0], (a[i][0] - b[i][0]) / (2.0 * h), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_degrees() {
        assert_eq!(
            polynomial_degrees(ReferenceCellType::Triangle, 2),
            vec![0, 1, 1, 2, 2, 2]
        );
        assert_eq!(polynomial_degrees(ReferenceCellType::Tetrahedron, 1).len(), 4);
    }
}
