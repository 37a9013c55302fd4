//! Type definitions.

/// A quadrature rule: an ordered list of points with a weight for each point
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    /// The dimension d of a single point.
    pub dim: usize,

    /// The number of points of the quadrature rule.
    pub npoints: usize,

    /// The point coordinates of the quadrature rule.
    pub points: Vec<Vec<f64>>,

    /// The weights of the quadrature rule.
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// Create a rule from points and weights
    pub fn new(dim: usize, points: Vec<Vec<f64>>, weights: Vec<f64>) -> Self {
        debug_assert_eq!(points.len(), weights.len());
        Self {
            dim,
            npoints: weights.len(),
            points,
            weights,
        }
    }

    /// The rule on a zero-dimensional cell: a single empty point with weight 1
    pub fn degenerate() -> Self {
        Self::new(0, vec![vec![]], vec![1.0])
    }

    /// The product of two rules, with points of the first rule varying slowest
    pub fn product(&self, other: &QuadratureRule) -> Self {
        let mut points = vec![];
        let mut weights = vec![];
        for (p, w) in self.points.iter().zip(&self.weights) {
            for (q, v) in other.points.iter().zip(&other.weights) {
                points.push(p.iter().chain(q.iter()).cloned().collect());
                weights.push(w * v);
            }
        }
        Self::new(self.dim + other.dim, points, weights)
    }

    /// Iterate over (point, weight) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Vec<f64>, &f64)> {
        self.points.iter().zip(self.weights.iter())
    }
}
