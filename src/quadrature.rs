//! Quadrature rules and facet geometry

pub mod facet;
pub mod gauss_jacobi;
pub mod types;

pub use facet::{boundary_regions, facet_vertices, map_facet_points, FacetKind};
pub use types::QuadratureRule;

use crate::traits::types::Cell;
use crate::traits::Tabulator;
use crate::types::Result;

/// Create a quadrature rule on a cell with `num_points` points in each direction
///
/// A zero-dimensional cell gets the degenerate rule with one empty point of weight 1,
/// whatever the number of points asked for. Rules on tensor product cells are products of
/// rules on the two factors.
pub fn quadrature_rule(
    tabulator: &impl Tabulator,
    cell: &Cell,
    num_points: usize,
) -> Result<QuadratureRule> {
    if cell.tdim() == 0 {
        return Ok(QuadratureRule::degenerate());
    }
    match cell {
        Cell::Simple(c) => tabulator.quadrature(*c, num_points),
        Cell::TensorProduct(a, b) => Ok(quadrature_rule(tabulator, a, num_points)?
            .product(&quadrature_rule(tabulator, b, num_points)?)),
    }
}
