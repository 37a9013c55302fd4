//! Jacobi polynomials
//!
//! `P_k^{(a,b)}` satisfies the three term recurrence
//! `a1 P_k = (a2 + a3 x) P_{k-1} - a4 P_{k-2}`, with `P_0 = 1` and
//! `P_1 = (a - b) / 2 + (a + b + 2) x / 2`. The coefficient rows below are normalised by `a1`.

/// Coefficients of `P_1 = c0 + c1 x`
pub fn linear_coefficients(a: f64, b: f64) -> [f64; 2] {
    [0.5 * (a - b), 0.5 * (a + b + 2.0)]
}

/// Recurrence coefficients `[a2, a3, -a4]` for degrees `2..=n`
///
/// Returns `n - 1` rows; degrees 0 and 1 have closed forms and are not included.
pub fn recurrence_coefficients(a: f64, b: f64, n: usize) -> Vec<[f64; 3]> {
    let apb = a + b;
    (2..n + 1)
        .map(|k| {
            let k = k as f64;
            let a1 = 2.0 * k * (k + apb) * (2.0 * k + apb - 2.0);
            let a2 = (2.0 * k + apb - 1.0) * (a * a - b * b);
            let a3 = (2.0 * k + apb - 2.0) * (2.0 * k + apb - 1.0) * (2.0 * k + apb);
            let a4 = 2.0 * (k + a - 1.0) * (k + b - 1.0) * (2.0 * k + apb);
            [a2 / a1, a3 / a1, -a4 / a1]
        })
        .collect()
}

/// Evaluate `P_0, ..., P_n` at a point
pub fn jacobi(a: f64, b: f64, n: usize, x: f64) -> Vec<f64> {
    let mut p = vec![1.0];
    if n == 0 {
        return p;
    }
    let [c0, c1] = linear_coefficients(a, b);
    p.push(c0 + c1 * x);
    for (k, [a2, a3, m4]) in recurrence_coefficients(a, b, n).iter().enumerate() {
        let value = (a2 + a3 * x) * p[k + 1] + m4 * p[k];
        p.push(value);
    }
    p
}

/// Evaluate the derivatives of `P_0, ..., P_n` at a point
pub fn jacobi_derivatives(a: f64, b: f64, n: usize, x: f64) -> Vec<f64> {
    // d/dx P_k^{(a,b)} = (k + a + b + 1) / 2 P_{k-1}^{(a+1,b+1)}
    let mut d = vec![0.0];
    if n == 0 {
        return d;
    }
    let p = jacobi(a + 1.0, b + 1.0, n - 1, x);
    for k in 1..n + 1 {
        d.push(0.5 * (k as f64 + a + b + 1.0) * p[k - 1]);
    }
    d
}

/// Evaluate the homogenised polynomials `Q_k(t, s) = s^k P_k^{(a,0)}(t / s - 1)` and their
/// partial derivatives for `k = 0, ..., n`
///
/// These are the collapsed-coordinate factors of the simplex expansion sets. The recurrence
/// used never divides by `s`, so the values are well defined on the collapsed edge `s = 0`.
/// The result is `(q, dq/dt, dq/ds)`.
pub fn homogeneous_jacobi(a: f64, n: usize, t: f64, s: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut q = vec![1.0];
    let mut qt = vec![0.0];
    let mut qs = vec![0.0];
    if n == 0 {
        return (q, qt, qs);
    }
    let [c0, c1] = linear_coefficients(a, 0.0);
    q.push(c0 * s + c1 * (t - s));
    qt.push(c1);
    qs.push(c0 - c1);
    for (k, [a2, a3, m4]) in recurrence_coefficients(a, 0.0, n).iter().enumerate() {
        let f = a2 * s + a3 * (t - s);
        let value = f * q[k + 1] + m4 * s * s * q[k];
        let dt = a3 * q[k + 1] + f * qt[k + 1] + m4 * s * s * qt[k];
        let ds = (a2 - a3) * q[k + 1] + f * qs[k + 1] + m4 * (2.0 * s * q[k] + s * s * qs[k]);
        q.push(value);
        qt.push(dt);
        qs.push(ds);
    }
    (q, qt, qs)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_legendre_values() {
        let p = jacobi(0.0, 0.0, 3, 0.3);
        assert_relative_eq!(p[1], 0.3);
        assert_relative_eq!(p[2], 0.5 * (3.0 * 0.09 - 1.0), epsilon = 1e-14);
        assert_relative_eq!(p[3], 0.5 * (5.0 * 0.027 - 3.0 * 0.3), epsilon = 1e-14);
    }

    #[test]
    fn test_recurrence_row_count() {
        assert!(recurrence_coefficients(1.0, 0.0, 1).is_empty());
        assert_eq!(recurrence_coefficients(1.0, 0.0, 4).len(), 3);
        assert_eq!(linear_coefficients(1.0, 0.0), [0.5, 1.5]);
    }

    #[test]
    fn test_endpoint_values() {
        // P_n^{(a,0)}(1) = binomial(n + a, n)
        let p = jacobi(2.0, 0.0, 4, 1.0);
        assert_relative_eq!(p[4], 15.0, epsilon = 1e-12);
        let p = jacobi(1.0, 0.0, 3, 1.0);
        assert_relative_eq!(p[3], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivatives() {
        let h = 1e-6;
        for (a, b) in [(0.0, 0.0), (1.0, 0.0), (3.0, 0.0), (1.0, 1.0)] {
            let d = jacobi_derivatives(a, b, 5, 0.2);
            let p0 = jacobi(a, b, 5, 0.2 - h);
            let p1 = jacobi(a, b, 5, 0.2 + h);
            for k in 0..6 {
                assert_relative_eq!(d[k], (p1[k] - p0[k]) / (2.0 * h), epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_homogeneous() {
        let (t, s) = (0.4, 0.7);
        let (q, qt, qs) = homogeneous_jacobi(1.0, 4, t, s);
        let p = jacobi(1.0, 0.0, 4, t / s - 1.0);
        for k in 0..5 {
            assert_relative_eq!(q[k], s.powi(k as i32) * p[k], epsilon = 1e-13);
        }
        let h = 1e-6;
        let (qp, _, _) = homogeneous_jacobi(1.0, 4, t + h, s);
        let (qm, _, _) = homogeneous_jacobi(1.0, 4, t - h, s);
        let (qsp, _, _) = homogeneous_jacobi(1.0, 4, t, s + h);
        let (qsm, _, _) = homogeneous_jacobi(1.0, 4, t, s - h);
        for k in 0..5 {
            assert_relative_eq!(qt[k], (qp[k] - qm[k]) / (2.0 * h), epsilon = 1e-6);
            assert_relative_eq!(qs[k], (qsp[k] - qsm[k]) / (2.0 * h), epsilon = 1e-6);
        }

        // Collapsed edge
        let (q, _, _) = homogeneous_jacobi(0.0, 3, 0.0, 0.0);
        assert_relative_eq!(q[0], 1.0);
        assert_relative_eq!(q[3], 0.0);
    }
}
