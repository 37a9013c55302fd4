//! The tensor representation of a compiled form
//!
//! The element tensor of a term is the contraction `A_i = Σ_a A0_{ia} G_a` of a reference
//! tensor `A0`, which only depends on the reference element, with a geometry tensor `G`,
//! which depends on the cell and on the coefficients.

use crate::form::algebra::IntegralKind;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Mul;

/// All multi-indices `(i_0, ..., i_{n-1})` with `i_k < dims[k]`, the last index varying fastest
pub fn multi_indices(dims: &[usize]) -> Vec<Vec<usize>> {
    let mut indices = vec![vec![]];
    for d in dims {
        indices = indices
            .into_iter()
            .flat_map(|prefix| {
                (0..*d).map(move |i| {
                    let mut index = prefix.clone();
                    index.push(i);
                    index
                })
            })
            .collect();
    }
    indices
}

/// The structure of a set of tensor indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiIndex {
    /// The number of indices
    pub rank: usize,
    /// The range of each index
    pub dims: Vec<usize>,
    /// Every value of the multi-index, in row-major order
    pub indices: Vec<Vec<usize>>,
}

impl MultiIndex {
    /// Create a multi-index with the given ranges
    pub fn new(dims: Vec<usize>) -> Self {
        Self {
            rank: dims.len(),
            indices: multi_indices(&dims),
            dims,
        }
    }

    /// The number of values of the multi-index
    pub fn size(&self) -> usize {
        self.indices.len()
    }
}

/// What a secondary index of a term runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecondaryAxis {
    /// The dofs of a coefficient function
    Coefficient(usize),
    /// The reference value component of basis function `basis` of the product
    Component {
        /// Position of the basis function in the product
        basis: usize,
    },
    /// A reference direction for derivative `position` of basis function `basis`
    Derivative {
        /// Position of the basis function in the product
        basis: usize,
        /// Position of the derivative
        position: usize,
    },
}

/// A symbol that appears in a geometry tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// Entry `(i, j)` of the Jacobian of the map from the reference cell
    Jacobian(usize, usize),
    /// Entry `(i, j)` of the inverse of the Jacobian
    InverseJacobian(usize, usize),
    /// A constant
    Constant(usize),
    /// Dof `j` of coefficient function `i`
    Coefficient(usize, usize),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Jacobian(i, j) => write!(f, "J_{i}{j}"),
            Symbol::InverseJacobian(i, j) => write!(f, "K_{i}{j}"),
            Symbol::Constant(i) => write!(f, "c{i}"),
            Symbol::Coefficient(i, j) => write!(f, "w[{i}][{j}]"),
        }
    }
}

/// A product of symbols with a numeric coefficient and a power of `1 / det J`
#[derive(Debug, Clone, PartialEq)]
pub struct Monomial {
    /// The numeric coefficient
    pub coefficient: f64,
    /// The power of the inverse of the Jacobian determinant
    pub inverse_det_power: usize,
    /// The symbols, sorted
    pub symbols: Vec<Symbol>,
}

impl Monomial {
    /// The monomial 1
    pub fn one() -> Self {
        Self {
            coefficient: 1.0,
            inverse_det_power: 0,
            symbols: vec![],
        }
    }
}

impl Mul for Monomial {
    type Output = Monomial;
    fn mul(mut self, rhs: Monomial) -> Monomial {
        self.coefficient *= rhs.coefficient;
        self.inverse_det_power += rhs.inverse_det_power;
        self.symbols.extend(rhs.symbols);
        self
    }
}

/// Collect like terms of a list of monomials and drop the ones that cancel
pub fn simplify(monomials: Vec<Monomial>) -> Vec<Monomial> {
    let mut collected: BTreeMap<(usize, Vec<Symbol>), f64> = BTreeMap::new();
    for mut m in monomials {
        m.symbols.sort();
        *collected
            .entry((m.inverse_det_power, m.symbols))
            .or_insert(0.0) += m.coefficient;
    }
    collected
        .into_iter()
        .filter(|(_, c)| *c != 0.0)
        .map(|((inverse_det_power, symbols), coefficient)| Monomial {
            coefficient,
            inverse_det_power,
            symbols,
        })
        .collect()
}

/// The reference tensor of a term
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTensor {
    /// The primary indices: the dofs of the test and trial functions
    pub i: MultiIndex,
    /// The secondary indices, which are contracted with the geometry tensor
    pub a: MultiIndex,
    /// What each secondary index runs over
    pub axes: Vec<SecondaryAxis>,
    /// The entries for each integration region, indexed by \[region\]\[i\]\[a\] in row-major
    /// order of the two multi-indices
    pub values: Vec<Vec<f64>>,
}

impl ReferenceTensor {
    /// The number of integration regions: 1 for the cell, one per facet for the boundary
    pub fn num_regions(&self) -> usize {
        self.values.len()
    }

    /// An entry
    pub fn value(&self, region: usize, i: usize, a: usize) -> f64 {
        self.values[region][i * self.a.size() + a]
    }
}

/// The determinant that scales every entry of a geometry tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryScale {
    /// The determinant of the Jacobian of the cell map
    CellDeterminant,
    /// The ratio of the measure of a physical facet to the measure of the reference facet
    FacetDeterminant,
}

/// The geometry tensor of a term
///
/// Only entries that do not vanish identically are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryTensor {
    /// The determinant the entries are scaled by
    pub scale: GeometryScale,
    /// The non-zero entries, as (flat secondary index, polynomial) pairs
    pub entries: Vec<(usize, Vec<Monomial>)>,
}

/// A term of an element tensor
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// The reference tensor
    pub a0: ReferenceTensor,
    /// The geometry tensor
    pub g: GeometryTensor,
    /// The number of quadrature points in each direction used to compute the reference tensor
    pub num_points: usize,
}

/// The element tensor of one integral kind: a sum of terms
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTensor {
    /// The integral kind
    pub integral: IntegralKind,
    /// The terms
    pub terms: Vec<Term>,
}

impl ElementTensor {
    /// An element tensor with no terms
    pub fn empty(integral: IntegralKind) -> Self {
        Self {
            integral,
            terms: vec![],
        }
    }

    /// Is the tensor empty?
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_multi_indices() {
        assert_eq!(multi_indices(&[]), vec![Vec::<usize>::new()]);
        assert_eq!(
            multi_indices(&[2, 3]),
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
        assert!(multi_indices(&[2, 0]).is_empty());
        let m = MultiIndex::new(vec![3, 3]);
        assert_eq!(m.rank, 2);
        assert_eq!(m.size(), 9);
    }

    #[test]
    fn test_simplify() {
        let m = |c: f64, s: Vec<Symbol>| Monomial {
            coefficient: c,
            inverse_det_power: 0,
            symbols: s,
        };
        let k00 = Symbol::InverseJacobian(0, 0);
        let k10 = Symbol::InverseJacobian(1, 0);
        let simplified = simplify(vec![
            m(1.0, vec![k00, k10]),
            m(2.0, vec![k10, k00]),
            m(1.0, vec![k00]),
            m(-1.0, vec![k00]),
        ]);
        assert_eq!(simplified.len(), 1);
        assert_eq!(simplified[0].coefficient, 3.0);
        assert_eq!(simplified[0].symbols, vec![k00, k10]);
    }
}
