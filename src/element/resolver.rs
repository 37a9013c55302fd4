//! Resolution of element descriptors into elements
//!
//! The resolver turns the symbolic [`ElementDescriptor`]s found in forms into [`Element`]s.
//! Resolved elements are stored in an [`ElementCache`], so every descriptor is only
//! resolved once and all consumers share the same element.

use crate::element::descriptor::{canonical_family, ElementDescriptor, RestrictionDomain};
use crate::element::finite_element::{Element, EnrichedElement, MixedElement, RestrictedElement};
use crate::element::quadrature_element::QuadratureElement;
use crate::element::tensor_product::{SobolevSpace, TensorProductElement};
use crate::element::time::{self, TimeFamily};
use crate::traits::types::Cell;
use crate::traits::{FiniteElement, Tabulator};
use crate::types::{Error, Result};
use log::debug;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

lazy_static! {
    /// The element families the compiler supports
    pub static ref SUPPORTED_FAMILIES: HashSet<&'static str> = HashSet::from([
        "Brezzi-Douglas-Marini",
        "Brezzi-Douglas-Fortin-Marini",
        "Crouzeix-Raviart",
        "Discontinuous Lagrange",
        "Discontinuous Raviart-Thomas",
        "Lagrange",
        "Lobatto",
        "Nedelec 1st kind H(curl)",
        "Nedelec 2nd kind H(curl)",
        "Radau",
        "Raviart-Thomas",
        "Real",
        "Bubble",
        "Quadrature",
        "OuterProductElement",
        "EnrichedElement",
    ]);
}

/// A cache of resolved elements, keyed by descriptor
///
/// Lookups can run concurrently. Insertion takes a write lock and never replaces an element
/// that is already stored, so every caller sees the same element for a descriptor.
#[derive(Debug, Default)]
pub struct ElementCache {
    elements: RwLock<HashMap<ElementDescriptor, Arc<Element>>>,
}

impl ElementCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached element
    pub fn get(&self, descriptor: &ElementDescriptor) -> Option<Arc<Element>> {
        self.elements.read().get(descriptor).cloned()
    }

    /// Insert an element unless the descriptor already has one, and return the cached element
    pub fn insert(&self, descriptor: ElementDescriptor, element: Arc<Element>) -> Arc<Element> {
        self.elements
            .write()
            .entry(descriptor)
            .or_insert(element)
            .clone()
    }

    /// The number of cached elements
    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    /// Is the cache empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves element descriptors using a tabulator and a cache
pub struct ElementResolver<'a, T: Tabulator> {
    tabulator: &'a T,
    cache: &'a ElementCache,
}

impl<'a, T: Tabulator> ElementResolver<'a, T> {
    /// Create a resolver
    pub fn new(tabulator: &'a T, cache: &'a ElementCache) -> Self {
        Self { tabulator, cache }
    }

    /// The tabulator used to create elements
    pub fn tabulator(&self) -> &T {
        self.tabulator
    }

    /// Resolve a descriptor into an element
    pub fn resolve(&self, descriptor: &ElementDescriptor) -> Result<Arc<Element>> {
        if let ElementDescriptor::Simple {
            family,
            cell,
            degree,
        } = descriptor
        {
            let canonical = canonical_family(family);
            if canonical != family {
                return self.resolve(&ElementDescriptor::Simple {
                    family: canonical.to_string(),
                    cell: cell.clone(),
                    degree: *degree,
                });
            }
        }
        if let Some(element) = self.cache.get(descriptor) {
            debug!("Reusing element from cache");
            return Ok(element);
        }
        let element = match descriptor {
            ElementDescriptor::Simple { .. }
            | ElementDescriptor::Enriched(..)
            | ElementDescriptor::TensorProduct(..)
            | ElementDescriptor::HDiv(_)
            | ElementDescriptor::HCurl(_) => self.create_simple(descriptor)?,
            ElementDescriptor::Mixed(_) => {
                Element::Mixed(MixedElement::new(self.extract_elements(descriptor, None)?)?)
            }
            ElementDescriptor::Restricted { element, domain } => {
                self.create_restricted(element, domain)?
            }
            ElementDescriptor::Other(name) => {
                return Err(Error::UnsupportedElementType(name.clone()))
            }
        };
        Ok(self.cache.insert(descriptor.clone(), Arc::new(element)))
    }

    fn create_simple(&self, descriptor: &ElementDescriptor) -> Result<Element> {
        let family = descriptor.family();
        if !SUPPORTED_FAMILIES.contains(family) {
            return Err(Error::UnsupportedFamily(family.to_string()));
        }
        match descriptor {
            ElementDescriptor::Enriched(a, b) => Ok(Element::Enriched(EnrichedElement::new(
                self.resolve(a)?,
                self.resolve(b)?,
            )?)),
            ElementDescriptor::TensorProduct(a, b) => Ok(Element::TensorProduct(
                TensorProductElement::new(self.resolve(a)?, self.resolve(b)?)?,
            )),
            ElementDescriptor::HDiv(e) => self.wrap(e, SobolevSpace::HDiv),
            ElementDescriptor::HCurl(e) => self.wrap(e, SobolevSpace::HCurl),
            ElementDescriptor::Simple {
                family,
                cell,
                degree,
            } => {
                let degree = degree.unwrap_or(0);
                match family.as_str() {
                    "Real" => {
                        let dg0 = ElementDescriptor::new("Discontinuous Lagrange", cell.clone(), 0);
                        match self.create_simple(&dg0)? {
                            Element::Ciarlet(e) => Ok(Element::SpaceOfReals(e)),
                            _ => Err(Error::UnsupportedCell(format!(
                                "no constant element on {cell}"
                            ))),
                        }
                    }
                    "Lobatto" => Ok(Element::Time(time::create(TimeFamily::Lobatto, degree)?)),
                    "Radau" => Ok(Element::Time(time::create(TimeFamily::Radau, degree)?)),
                    "Quadrature" => Ok(Element::Quadrature(QuadratureElement::new(
                        self.tabulator,
                        cell,
                        degree,
                    )?)),
                    _ => match cell {
                        Cell::Simple(c) => Ok(Element::Ciarlet(
                            self.tabulator.create_element(family, *c, degree)?,
                        )),
                        Cell::TensorProduct(..) => Err(Error::UnsupportedCell(format!(
                            "{family} elements are not defined on {cell}; use a tensor product element"
                        ))),
                    },
                }
            }
            _ => Err(Error::UnsupportedElementType(descriptor.to_string())),
        }
    }

    fn wrap(&self, descriptor: &ElementDescriptor, space: SobolevSpace) -> Result<Element> {
        match &*self.resolve(descriptor)? {
            Element::TensorProduct(e) => Ok(Element::TensorProduct(e.clone().wrap(space)?)),
            other => Err(Error::IncompatibleElements(format!(
                "{space:?} can only wrap tensor product elements, not {}",
                other.signature()
            ))),
        }
    }

    fn create_restricted(
        &self,
        base: &ElementDescriptor,
        domain: &RestrictionDomain,
    ) -> Result<Element> {
        match base {
            ElementDescriptor::Simple { .. } => {
                let element = Arc::new(self.create_simple(base)?);
                let indices = select_indices(&element, domain)?;
                Ok(Element::Restricted(RestrictedElement::new(
                    element,
                    indices,
                    domain.clone(),
                )))
            }
            ElementDescriptor::Mixed(_) => Ok(Element::Mixed(MixedElement::new(
                self.extract_elements(base, Some(domain))?,
            )?)),
            _ => Err(Error::UnsupportedRestriction(base.to_string())),
        }
    }

    /// Recursively extract the flat list of sub-elements of a (possibly nested) mixed element
    ///
    /// Restrictions of nested mixed elements are pushed down onto their simple sub-elements.
    pub fn extract_elements(
        &self,
        descriptor: &ElementDescriptor,
        domain: Option<&RestrictionDomain>,
    ) -> Result<Vec<Arc<Element>>> {
        match descriptor {
            ElementDescriptor::Mixed(elements) => {
                let mut flat = vec![];
                for e in elements {
                    flat.extend(self.extract_elements(e, domain)?);
                }
                Ok(flat)
            }
            ElementDescriptor::Restricted { element, domain } => {
                self.extract_elements(element, Some(domain))
            }
            _ => match domain {
                Some(domain) => Ok(vec![self.resolve(&ElementDescriptor::restricted(
                    descriptor.clone(),
                    domain.clone(),
                ))?]),
                None => Ok(vec![self.resolve(descriptor)?]),
            },
        }
    }
}

/// The basis functions of an element that are kept by a restriction
///
/// Restricting to the interior keeps the dofs of the cell itself. Restricting to a cell of
/// dimension `d` keeps the dofs of all entities of dimension `d` and below.
pub fn select_indices(element: &Element, domain: &RestrictionDomain) -> Result<Vec<usize>> {
    let tdim = element.cell().tdim();
    match domain {
        RestrictionDomain::Interior if tdim > 0 => Ok(element.entity_dofs()[tdim][0].clone()),
        RestrictionDomain::Cell(cell) => Ok(element
            .entity_dofs()
            .iter()
            .take(cell.tdim() + 1)
            .flat_map(|entities| entities.iter().flatten().cloned())
            .collect()),
        _ => Err(Error::UnsupportedRestrictionDomain(domain.to_string())),
    }
}
