//! Symbolic descriptions of finite elements
//!
//! A descriptor is the immutable, hashable description of an element as it appears in a
//! form. The [`ElementResolver`](crate::element::ElementResolver) turns descriptors into
//! [`Element`](crate::element::Element)s and uses them as cache keys.

use crate::traits::types::Cell;
use std::fmt;

/// The part of a cell an element is restricted to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RestrictionDomain {
    /// The interior of the cell
    Interior,
    /// The sub-entities of a cell of this dimension and below
    Cell(Cell),
    /// Any other domain, which cannot be restricted to
    Other(String),
}

impl fmt::Display for RestrictionDomain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RestrictionDomain::Interior => write!(f, "interior"),
            RestrictionDomain::Cell(c) => write!(f, "{c}"),
            RestrictionDomain::Other(s) => write!(f, "{s}"),
        }
    }
}

/// A description of a finite element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementDescriptor {
    /// An element of a named family on a cell
    Simple {
        /// The family name
        family: String,
        /// The cell
        cell: Cell,
        /// The degree, if the family has one
        degree: Option<usize>,
    },
    /// The direct sum of a list of elements
    Mixed(Vec<ElementDescriptor>),
    /// An element restricted to part of the cell
    Restricted {
        /// The element being restricted
        element: Box<ElementDescriptor>,
        /// The restriction domain
        domain: RestrictionDomain,
    },
    /// The sum of the spaces spanned by two elements
    Enriched(Box<ElementDescriptor>, Box<ElementDescriptor>),
    /// The tensor product of two elements
    TensorProduct(Box<ElementDescriptor>, Box<ElementDescriptor>),
    /// A tensor product element turned into an H(div) vector field
    HDiv(Box<ElementDescriptor>),
    /// A tensor product element turned into an H(curl) vector field
    HCurl(Box<ElementDescriptor>),
    /// An element type the compiler does not know about
    Other(String),
}

/// Expand the short family names used in forms
pub fn canonical_family(family: &str) -> &str {
    match family {
        "CG" | "Q" | "P" => "Lagrange",
        "DG" | "DP" | "DQ" => "Discontinuous Lagrange",
        "CR" => "Crouzeix-Raviart",
        "RT" => "Raviart-Thomas",
        "DRT" => "Discontinuous Raviart-Thomas",
        "BDM" => "Brezzi-Douglas-Marini",
        "BDFM" => "Brezzi-Douglas-Fortin-Marini",
        "N1curl" => "Nedelec 1st kind H(curl)",
        "N2curl" => "Nedelec 2nd kind H(curl)",
        "R" => "Real",
        "B" => "Bubble",
        _ => family,
    }
}

impl ElementDescriptor {
    /// An element of a named family
    pub fn new(family: &str, cell: impl Into<Cell>, degree: usize) -> Self {
        ElementDescriptor::Simple {
            family: canonical_family(family).to_string(),
            cell: cell.into(),
            degree: Some(degree),
        }
    }

    /// A vector element: a mixed element of `dim` copies of a scalar element
    ///
    /// If `dim` is `None`, the topological dimension of the cell is used.
    pub fn vector(family: &str, cell: impl Into<Cell>, degree: usize, dim: Option<usize>) -> Self {
        let cell = cell.into();
        let dim = dim.unwrap_or_else(|| cell.tdim());
        ElementDescriptor::Mixed(vec![Self::new(family, cell, degree); dim])
    }

    /// A mixed element
    pub fn mixed(elements: Vec<ElementDescriptor>) -> Self {
        ElementDescriptor::Mixed(elements)
    }

    /// A restricted element
    pub fn restricted(element: ElementDescriptor, domain: RestrictionDomain) -> Self {
        ElementDescriptor::Restricted {
            element: Box::new(element),
            domain,
        }
    }

    /// An enriched element
    pub fn enriched(a: ElementDescriptor, b: ElementDescriptor) -> Self {
        ElementDescriptor::Enriched(Box::new(a), Box::new(b))
    }

    /// A tensor product element
    pub fn tensor_product(a: ElementDescriptor, b: ElementDescriptor) -> Self {
        ElementDescriptor::TensorProduct(Box::new(a), Box::new(b))
    }

    /// An H(div) wrapped tensor product element
    pub fn hdiv(element: ElementDescriptor) -> Self {
        ElementDescriptor::HDiv(Box::new(element))
    }

    /// An H(curl) wrapped tensor product element
    pub fn hcurl(element: ElementDescriptor) -> Self {
        ElementDescriptor::HCurl(Box::new(element))
    }

    /// The family name
    pub fn family(&self) -> &str {
        match self {
            ElementDescriptor::Simple { family, .. } => family,
            ElementDescriptor::Mixed(_) => "Mixed",
            ElementDescriptor::Restricted { element, .. } => element.family(),
            ElementDescriptor::Enriched(..) => "EnrichedElement",
            ElementDescriptor::TensorProduct(..) => "OuterProductElement",
            ElementDescriptor::HDiv(e) | ElementDescriptor::HCurl(e) => e.family(),
            ElementDescriptor::Other(name) => name,
        }
    }

    /// The degree: the highest degree of any sub-element
    pub fn degree(&self) -> Option<usize> {
        match self {
            ElementDescriptor::Simple { degree, .. } => *degree,
            ElementDescriptor::Mixed(elements) => elements.iter().filter_map(|e| e.degree()).max(),
            ElementDescriptor::Restricted { element, .. }
            | ElementDescriptor::HDiv(element)
            | ElementDescriptor::HCurl(element) => element.degree(),
            ElementDescriptor::Enriched(a, b) => a.degree().max(b.degree()),
            ElementDescriptor::TensorProduct(a, b) => match (a.degree(), b.degree()) {
                (Some(i), Some(j)) => Some(i + j),
                _ => None,
            },
            ElementDescriptor::Other(_) => None,
        }
    }

    /// The cell
    pub fn cell(&self) -> Option<Cell> {
        match self {
            ElementDescriptor::Simple { cell, .. } => Some(cell.clone()),
            ElementDescriptor::Mixed(elements) => elements.first().and_then(|e| e.cell()),
            ElementDescriptor::Restricted { element, .. }
            | ElementDescriptor::HDiv(element)
            | ElementDescriptor::HCurl(element)
            | ElementDescriptor::Enriched(element, _) => element.cell(),
            ElementDescriptor::TensorProduct(a, b) => Some(Cell::product(a.cell()?, b.cell()?)),
            ElementDescriptor::Other(_) => None,
        }
    }

    /// The sub-elements of a mixed element
    pub fn sub_elements(&self) -> &[ElementDescriptor] {
        match self {
            ElementDescriptor::Mixed(elements) => elements,
            _ => &[],
        }
    }
}

impl fmt::Display for ElementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ElementDescriptor::Simple {
                family,
                cell,
                degree: Some(degree),
            } => write!(f, "FiniteElement('{family}', {cell}, {degree})"),
            ElementDescriptor::Simple { family, cell, .. } => {
                write!(f, "FiniteElement('{family}', {cell}, None)")
            }
            ElementDescriptor::Mixed(elements) => {
                write!(f, "MixedElement(")?;
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
            ElementDescriptor::Restricted { element, domain } => write!(f, "{element}|_{{{domain}}}"),
            ElementDescriptor::Enriched(a, b) => write!(f, "EnrichedElement({a}, {b})"),
            ElementDescriptor::TensorProduct(a, b) => write!(f, "OuterProductElement({a}, {b})"),
            ElementDescriptor::HDiv(e) => write!(f, "HDiv({e})"),
            ElementDescriptor::HCurl(e) => write!(f, "HCurl({e})"),
            ElementDescriptor::Other(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::types::ReferenceCellType;

    #[test]
    fn test_aliases() {
        let e = ElementDescriptor::new("CG", ReferenceCellType::Triangle, 1);
        assert_eq!(e.family(), "Lagrange");
        assert_eq!(e, ElementDescriptor::new("Lagrange", ReferenceCellType::Triangle, 1));
        assert_eq!(
            ElementDescriptor::new("N1curl", ReferenceCellType::Tetrahedron, 1).family(),
            "Nedelec 1st kind H(curl)"
        );
    }

    #[test]
    fn test_vector() {
        let v = ElementDescriptor::vector("CG", ReferenceCellType::Tetrahedron, 2, None);
        assert_eq!(v.sub_elements().len(), 3);
        assert_eq!(v.degree(), Some(2));
        assert_eq!(v.cell(), Some(Cell::Simple(ReferenceCellType::Tetrahedron)));
    }

    #[test]
    fn test_tensor_product() {
        let a = ElementDescriptor::new("CG", ReferenceCellType::Triangle, 2);
        let b = ElementDescriptor::new("DG", ReferenceCellType::Interval, 1);
        let p = ElementDescriptor::tensor_product(a, b);
        assert_eq!(p.degree(), Some(3));
        assert_eq!(p.cell().unwrap().tdim(), 3);
        assert_eq!(p.family(), "OuterProductElement");
    }

    #[test]
    fn test_display() {
        let e = ElementDescriptor::restricted(
            ElementDescriptor::new("CG", ReferenceCellType::Triangle, 3),
            RestrictionDomain::Interior,
        );
        assert_eq!(
            e.to_string(),
            "FiniteElement('Lagrange', triangle, 3)|_{interior}"
        );
    }
}
