//! Cell types

use crate::types::Error;
use std::fmt;
use std::str::FromStr;

/// The type of a reference cell
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ReferenceCellType {
    /// A point
    Point = 0,
    /// A line interval
    Interval = 1,
    /// A triangle
    Triangle = 2,
    /// A quadrilateral
    Quadrilateral = 3,
    /// A tetrahedron (whose faces are all triangles)
    Tetrahedron = 4,
    /// A hexahedron (whose faces are all quadrilaterals)
    Hexahedron = 5,
}

impl ReferenceCellType {
    /// Create a reference cell type from a u8
    pub fn from(i: u8) -> Option<ReferenceCellType> {
        match i {
            0 => Some(ReferenceCellType::Point),
            1 => Some(ReferenceCellType::Interval),
            2 => Some(ReferenceCellType::Triangle),
            3 => Some(ReferenceCellType::Quadrilateral),
            4 => Some(ReferenceCellType::Tetrahedron),
            5 => Some(ReferenceCellType::Hexahedron),
            _ => None,
        }
    }

    /// The name used for this cell in element descriptors and generated code
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceCellType::Point => "vertex",
            ReferenceCellType::Interval => "interval",
            ReferenceCellType::Triangle => "triangle",
            ReferenceCellType::Quadrilateral => "quadrilateral",
            ReferenceCellType::Tetrahedron => "tetrahedron",
            ReferenceCellType::Hexahedron => "hexahedron",
        }
    }
}

impl fmt::Display for ReferenceCellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ReferenceCellType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertex" | "point" => Ok(ReferenceCellType::Point),
            "interval" => Ok(ReferenceCellType::Interval),
            "triangle" => Ok(ReferenceCellType::Triangle),
            "quadrilateral" => Ok(ReferenceCellType::Quadrilateral),
            "tetrahedron" => Ok(ReferenceCellType::Tetrahedron),
            "hexahedron" => Ok(ReferenceCellType::Hexahedron),
            _ => Err(Error::UnsupportedCell(s.to_string())),
        }
    }
}

/// A cell on which elements are defined
///
/// Tensor product cells are the extruded cells: the product of two reference cells, whose
/// facets split into horizontal (top and bottom) and vertical (side) facets.
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
pub enum Cell {
    /// A single reference cell
    Simple(ReferenceCellType),
    /// The product of two cells
    TensorProduct(Box<Cell>, Box<Cell>),
}

impl Cell {
    /// Create the product of two cells
    pub fn product(a: Cell, b: Cell) -> Self {
        Cell::TensorProduct(Box::new(a), Box::new(b))
    }

    /// The topological dimension of the cell
    pub fn tdim(&self) -> usize {
        match self {
            Cell::Simple(c) => crate::element::reference_cell::dim(*c),
            Cell::TensorProduct(a, b) => a.tdim() + b.tdim(),
        }
    }

    /// Is this a simple reference cell?
    pub fn reference_type(&self) -> Option<ReferenceCellType> {
        match self {
            Cell::Simple(c) => Some(*c),
            Cell::TensorProduct(_, _) => None,
        }
    }

    /// The number of entities of each topological dimension
    ///
    /// For a tensor product cell the counts are the polynomial product of the counts of the
    /// two factors, with the facet count set to zero: facets of a product cell are counted
    /// separately by [`Cell::num_facets`] for each facet kind.
    pub fn num_entities(&self) -> Vec<usize> {
        match self {
            Cell::Simple(c) => {
                let counts = crate::element::reference_cell::entity_counts(*c);
                counts[..crate::element::reference_cell::dim(*c) + 1].to_vec()
            }
            Cell::TensorProduct(a, b) => {
                let ca = a.num_entities();
                let cb = b.num_entities();
                let mut counts = vec![0; ca.len() + cb.len() - 1];
                for (i, x) in ca.iter().enumerate() {
                    for (j, y) in cb.iter().enumerate() {
                        counts[i + j] += x * y;
                    }
                }
                let n = counts.len();
                if n >= 2 {
                    counts[n - 2] = 0;
                }
                counts
            }
        }
    }

    /// The number of vertices of the cell
    pub fn num_vertices(&self) -> usize {
        match self {
            Cell::Simple(c) => crate::element::reference_cell::entity_counts(*c)[0],
            Cell::TensorProduct(a, b) => a.num_vertices() * b.num_vertices(),
        }
    }

    /// The vertices of the reference cell
    ///
    /// Vertices of a product cell are ordered with the vertex of the first factor varying
    /// slowest.
    pub fn vertices(&self) -> Vec<Vec<f64>> {
        match self {
            Cell::Simple(c) => crate::element::reference_cell::vertices(*c),
            Cell::TensorProduct(a, b) => {
                let mut v = vec![];
                for va in a.vertices() {
                    for vb in b.vertices() {
                        v.push(va.iter().chain(vb.iter()).cloned().collect());
                    }
                }
                v
            }
        }
    }

    /// The number of facets of a given kind
    pub fn num_facets(&self, kind: crate::quadrature::FacetKind) -> usize {
        use crate::quadrature::FacetKind;
        match (self, kind) {
            (Cell::Simple(c), FacetKind::Facet) => {
                let d = crate::element::reference_cell::dim(*c);
                if d == 0 {
                    0
                } else {
                    crate::element::reference_cell::entity_counts(*c)[d - 1]
                }
            }
            (Cell::TensorProduct(a, _), FacetKind::VertFacet) => a.num_facets(FacetKind::Facet),
            (Cell::TensorProduct(_, b), FacetKind::HorizFacet) => {
                if b.tdim() == 1 {
                    2
                } else {
                    0
                }
            }
            _ => 0,
        }
    }
}

impl From<ReferenceCellType> for Cell {
    fn from(c: ReferenceCellType) -> Self {
        Cell::Simple(c)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Simple(c) => write!(f, "{c}"),
            Cell::TensorProduct(a, b) => write!(f, "OuterProductCell({a}, {b})"),
        }
    }
}

impl FromStr for Cell {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Cell::Simple(ReferenceCellType::from_str(s)?))
    }
}

/// Number of entities of each dimension for a named cell
///
/// The generic names `cell1D`, `cell2D` and `cell3D` carry no topology and give `None`.
pub fn cell_to_num_entities(name: &str) -> Option<Vec<usize>> {
    match name {
        "cell1D" | "cell2D" | "cell3D" => None,
        _ => ReferenceCellType::from_str(name)
            .ok()
            .map(|c| Cell::Simple(c).num_entities()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn test_reference_cell_type() {
        for c in [
            ReferenceCellType::Point,
            ReferenceCellType::Interval,
            ReferenceCellType::Triangle,
            ReferenceCellType::Quadrilateral,
            ReferenceCellType::Tetrahedron,
            ReferenceCellType::Hexahedron,
        ] {
            assert_eq!(c, ReferenceCellType::from(c as u8).unwrap());
            assert_eq!(c, ReferenceCellType::from_str(c.name()).unwrap());
        }
        assert!(ReferenceCellType::from(6).is_none());
        assert!(ReferenceCellType::from_str("prism").is_err());
    }

    #[test]
    fn test_num_entities() {
        assert_eq!(cell_to_num_entities("interval").unwrap(), vec![2, 1]);
        assert_eq!(cell_to_num_entities("triangle").unwrap(), vec![3, 3, 1]);
        assert_eq!(cell_to_num_entities("tetrahedron").unwrap(), vec![4, 6, 4, 1]);
        assert_eq!(cell_to_num_entities("quadrilateral").unwrap(), vec![4, 4, 1]);
        assert_eq!(cell_to_num_entities("hexahedron").unwrap(), vec![8, 12, 6, 1]);
        assert!(cell_to_num_entities("cell2D").is_none());
    }

    #[test]
    fn test_product_cell() {
        let prism = Cell::product(
            Cell::Simple(ReferenceCellType::Triangle),
            Cell::Simple(ReferenceCellType::Interval),
        );
        assert_eq!(prism.tdim(), 3);
        // (3, 3, 1) * (2, 1) = (6, 9, 5, 1), facets zeroed
        assert_eq!(prism.num_entities(), vec![6, 9, 0, 1]);
        assert_eq!(prism.num_vertices(), 6);
        let v = prism.vertices();
        assert_eq!(v[0], vec![0.0, 0.0, 0.0]);
        assert_eq!(v[1], vec![0.0, 0.0, 1.0]);
        assert_eq!(v[5], vec![0.0, 1.0, 1.0]);

        let quad = Cell::product(
            Cell::Simple(ReferenceCellType::Interval),
            Cell::Simple(ReferenceCellType::Interval),
        );
        assert_eq!(quad.num_entities(), vec![4, 0, 1]);
        assert_eq!(format!("{quad}"), "OuterProductCell(interval, interval)");
    }
}
