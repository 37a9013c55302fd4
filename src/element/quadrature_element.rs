//! Quadrature elements
//!
//! The dofs of a quadrature element are point evaluations at the points of a quadrature rule.
//! Functions in this space only have values at those points, so the element can only be
//! tabulated there.

use crate::quadrature::quadrature_rule;
use crate::traits::types::Cell;
use crate::traits::{EntityDofs, FiniteElement, MapType, Table, Tabulator};
use crate::types::{Error, Result};

const POINT_TOLERANCE: f64 = 1e-12;

/// An element whose dofs are evaluations at quadrature points
#[derive(Debug, Clone)]
pub struct QuadratureElement {
    cell: Cell,
    degree: usize,
    points: Vec<Vec<f64>>,
    weights: Vec<f64>,
    entity_dofs: EntityDofs,
}

impl QuadratureElement {
    /// Create a quadrature element that integrates polynomials of degree `degree` exactly
    pub fn new(tabulator: &impl Tabulator, cell: &Cell, degree: usize) -> Result<Self> {
        let num_points = (degree + 2) / 2;
        let rule = quadrature_rule(tabulator, cell, num_points)?;
        let mut entity_dofs: EntityDofs = cell
            .num_entities()
            .iter()
            .map(|n| vec![vec![]; *n])
            .collect();
        if let Some(interior) = entity_dofs.last_mut() {
            interior[0] = (0..rule.npoints).collect();
        }
        Ok(Self {
            cell: cell.clone(),
            degree,
            points: rule.points,
            weights: rule.weights,
            entity_dofs,
        })
    }

    /// The quadrature points
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// The quadrature weights
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn point_index(&self, point: &[f64]) -> Option<usize> {
        self.points.iter().position(|q| {
            q.len() == point.len()
                && q.iter()
                    .zip(point)
                    .all(|(a, b)| (a - b).abs() < POINT_TOLERANCE)
        })
    }
}

impl FiniteElement for QuadratureElement {
    fn family(&self) -> &str {
        "Quadrature"
    }
    fn cell(&self) -> &Cell {
        &self.cell
    }
    fn degree(&self) -> usize {
        self.degree
    }
    fn value_shape(&self) -> Vec<usize> {
        vec![]
    }
    fn space_dimension(&self) -> usize {
        self.points.len()
    }
    fn entity_dofs(&self) -> &EntityDofs {
        &self.entity_dofs
    }
    fn map_type(&self) -> MapType {
        MapType::Identity
    }
    fn tabulate(&self, derivative: &[usize], points: &[Vec<f64>]) -> Result<Table> {
        if derivative.iter().any(|d| *d > 0) {
            return Err(Error::InvalidTabulation(
                "quadrature elements have no derivatives".to_string(),
            ));
        }
        let mut table = vec![vec![vec![0.0; points.len()]]; self.points.len()];
        for (p, point) in points.iter().enumerate() {
            let i = self.point_index(point).ok_or_else(|| {
                Error::InvalidTabulation(format!(
                    "{point:?} is not a point of the quadrature element"
                ))
            })?;
            table[i][0][p] = 1.0;
        }
        Ok(table)
    }
    fn signature(&self) -> String {
        format!("FiniteElement('Quadrature', {}, {})", self.cell, self.degree)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::DefaultTabulator;
    use crate::traits::types::ReferenceCellType;

    #[test]
    fn test_quadrature_element() {
        let cell = Cell::Simple(ReferenceCellType::Triangle);
        let e = QuadratureElement::new(&DefaultTabulator, &cell, 2).unwrap();
        assert_eq!(e.space_dimension(), 4);
        assert_eq!(e.entity_dofs()[2][0], vec![0, 1, 2, 3]);
        assert!(e.entity_dofs()[0].iter().all(|d| d.is_empty()));

        let points = e.points().to_vec();
        let data = e.tabulate(&[0, 0], &points).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(data[i][0][j], if i == j { 1.0 } else { 0.0 });
            }
        }
        assert!(matches!(
            e.tabulate(&[0, 0], &[vec![0.9, 0.9]]),
            Err(Error::InvalidTabulation(_))
        ));
        assert!(e.tabulate(&[1, 0], &points).is_err());
    }

    #[test]
    fn test_extruded() {
        let cell = Cell::product(
            Cell::Simple(ReferenceCellType::Interval),
            Cell::Simple(ReferenceCellType::Interval),
        );
        let e = QuadratureElement::new(&DefaultTabulator, &cell, 3).unwrap();
        assert_eq!(e.space_dimension(), 4);
        assert_eq!(e.entity_dofs().len(), 3);
    }
}
