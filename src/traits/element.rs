//! Finite element traits

use crate::element::ciarlet::CiarletElement;
use crate::quadrature::QuadratureRule;
use crate::traits::types::{Cell, ReferenceCellType};
use crate::types::Result;

/// Degrees of freedom attached to each entity, indexed by \[dimension\]\[entity\]
pub type EntityDofs = Vec<Vec<Vec<usize>>>;

/// Tabulated values, indexed by \[basis function\]\[value component\]\[point\]
pub type Table = Vec<Vec<Vec<f64>>>;

/// The map used to push basis functions forward from the reference cell
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum MapType {
    /// Identity map
    Identity = 0,
    /// Covariant Piola map, used by H(curl) elements
    CovariantPiola = 1,
    /// Contravariant Piola map, used by H(div) elements
    ContravariantPiola = 2,
}

pub trait FiniteElement {
    //! A finite element defined on a reference cell

    /// The family name
    fn family(&self) -> &str;

    /// The cell the element is defined on
    fn cell(&self) -> &Cell;

    /// The polynomial degree
    fn degree(&self) -> usize;

    /// The shape of the values of a basis function
    fn value_shape(&self) -> Vec<usize>;

    /// The number of components of the values of a basis function
    fn value_size(&self) -> usize {
        self.value_shape().iter().product()
    }

    /// The number of basis functions
    fn space_dimension(&self) -> usize;

    /// The DOFs that are associated with each subentity of the reference cell
    fn entity_dofs(&self) -> &EntityDofs;

    /// The push forward / pull back map to use for this element
    fn map_type(&self) -> MapType;

    /// Tabulate a derivative of the basis functions at a set of points
    ///
    /// `derivative` holds the number of times to differentiate in each reference direction,
    /// so `[0, 0]` gives values and `[1, 0]` gives x-derivatives on a 2D cell.
    fn tabulate(&self, derivative: &[usize], points: &[Vec<f64>]) -> Result<Table>;

    /// A string that identifies the element
    fn signature(&self) -> String;
}

pub trait Tabulator {
    //! A provider of reference elements and quadrature rules

    /// Create an element of a family on a reference cell
    fn create_element(
        &self,
        family: &str,
        cell: ReferenceCellType,
        degree: usize,
    ) -> Result<CiarletElement>;

    /// Create a quadrature rule with `num_points` points in each direction
    fn quadrature(&self, cell: ReferenceCellType, num_points: usize) -> Result<QuadratureRule>;

    /// The vertices of a reference cell
    fn vertices(&self, cell: ReferenceCellType) -> Vec<Vec<f64>> {
        crate::element::reference_cell::vertices(cell)
    }

    /// The sub-entities of each dimension of a reference cell, given by their vertices
    fn topology(&self, cell: ReferenceCellType) -> Vec<Vec<Vec<usize>>> {
        crate::element::reference_cell::topology(cell)
    }
}
