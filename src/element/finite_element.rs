//! The canonical element representation used by the compiler

use crate::element::ciarlet::CiarletElement;
use crate::element::descriptor::RestrictionDomain;
use crate::element::quadrature_element::QuadratureElement;
use crate::element::tensor_product::TensorProductElement;
use crate::traits::types::Cell;
use crate::traits::{EntityDofs, FiniteElement, MapType, SubStructure, Table};
use crate::types::{Error, Result};
use itertools::Itertools;
use std::sync::Arc;

/// A resolved finite element
///
/// Elements are created by the [`ElementResolver`](crate::element::ElementResolver), shared
/// through `Arc`s and never modified.
#[derive(Debug, Clone)]
pub enum Element {
    /// An element created by the tabulator
    Ciarlet(CiarletElement),
    /// The sum of two elements on the same cell
    Enriched(EnrichedElement),
    /// The tensor product of two elements, possibly wrapped into an H(div) or H(curl) field
    TensorProduct(TensorProductElement),
    /// The direct sum of a list of elements
    Mixed(MixedElement),
    /// A subset of the basis functions of an element
    Restricted(RestrictedElement),
    /// The space of constant functions on the cell
    SpaceOfReals(CiarletElement),
    /// A Lobatto or Radau time element
    Time(CiarletElement),
    /// Point evaluations at quadrature points
    Quadrature(QuadratureElement),
}

macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            Element::Ciarlet($e) => $body,
            Element::Enriched($e) => $body,
            Element::TensorProduct($e) => $body,
            Element::Mixed($e) => $body,
            Element::Restricted($e) => $body,
            Element::SpaceOfReals($e) => $body,
            Element::Time($e) => $body,
            Element::Quadrature($e) => $body,
        }
    };
}

impl Element {
    /// The underlying Ciarlet element, for elements with an expansion coefficient table
    pub fn as_ciarlet(&self) -> Option<&CiarletElement> {
        match self {
            Element::Ciarlet(e) | Element::SpaceOfReals(e) | Element::Time(e) => Some(e),
            Element::Enriched(e) => e.expansion(),
            _ => None,
        }
    }

    /// The sub-elements of a mixed element; other elements have none
    pub fn sub_elements(&self) -> &[Arc<Element>] {
        match self {
            Element::Mixed(e) => e.elements.as_slice(),
            _ => &[],
        }
    }

    /// The form degree of the element: the lowest dimension of an entity that has dofs
    pub fn form_degree(&self) -> usize {
        self.entity_dofs()
            .iter()
            .position(|entities| entities.iter().any(|dofs| !dofs.is_empty()))
            .unwrap_or(0)
    }
}

impl FiniteElement for Element {
    fn family(&self) -> &str {
        match self {
            Element::SpaceOfReals(_) => "Real",
            _ => dispatch!(self, e => e.family()),
        }
    }
    fn cell(&self) -> &Cell {
        dispatch!(self, e => e.cell())
    }
    fn degree(&self) -> usize {
        dispatch!(self, e => e.degree())
    }
    fn value_shape(&self) -> Vec<usize> {
        dispatch!(self, e => e.value_shape())
    }
    fn value_size(&self) -> usize {
        dispatch!(self, e => e.value_size())
    }
    fn space_dimension(&self) -> usize {
        dispatch!(self, e => e.space_dimension())
    }
    fn entity_dofs(&self) -> &EntityDofs {
        dispatch!(self, e => e.entity_dofs())
    }
    fn map_type(&self) -> MapType {
        dispatch!(self, e => e.map_type())
    }
    fn tabulate(&self, derivative: &[usize], points: &[Vec<f64>]) -> Result<Table> {
        dispatch!(self, e => e.tabulate(derivative, points))
    }
    fn signature(&self) -> String {
        match self {
            Element::SpaceOfReals(e) => format!("FiniteElement('Real', {}, 0)", e.cell()),
            _ => dispatch!(self, e => e.signature()),
        }
    }
}

impl SubStructure for Element {
    fn num_sub_structures(&self) -> usize {
        match self {
            Element::Mixed(e) => e.elements.len(),
            _ => 1,
        }
    }
    fn sub_structure(&self, i: usize) -> &Self {
        match self {
            Element::Mixed(e) => &*e.elements[i],
            _ => self,
        }
    }
}

fn empty_like(entity_dofs: &EntityDofs) -> EntityDofs {
    entity_dofs
        .iter()
        .map(|entities| vec![vec![]; entities.len()])
        .collect()
}

/// Append the entity dofs of another element, shifted by `offset`
fn merge_entity_dofs(
    target: &mut EntityDofs,
    other: &EntityDofs,
    offset: usize,
    context: &str,
) -> Result<()> {
    let compatible = target.len() == other.len()
        && target.iter().zip(other).all(|(a, b)| a.len() == b.len());
    if !compatible {
        return Err(Error::IncompatibleElements(format!(
            "{context}: sub-elements have different entity structures"
        )));
    }
    for (t, o) in target.iter_mut().zip(other) {
        for (dofs, new) in t.iter_mut().zip(o) {
            dofs.extend(new.iter().map(|d| d + offset));
        }
    }
    Ok(())
}

/// The direct sum of a list of elements
///
/// Basis functions and value components of the sub-elements are stacked in order.
#[derive(Debug, Clone)]
pub struct MixedElement {
    elements: Vec<Arc<Element>>,
    cell: Cell,
    degree: usize,
    value_size: usize,
    space_dimension: usize,
    entity_dofs: EntityDofs,
}

impl MixedElement {
    /// Create a mixed element
    pub fn new(elements: Vec<Arc<Element>>) -> Result<Self> {
        let first = elements.first().ok_or_else(|| {
            Error::IncompatibleElements("a mixed element needs at least one sub-element".to_string())
        })?;
        let cell = first.cell().clone();
        let mut entity_dofs = empty_like(first.entity_dofs());
        let mut offset = 0;
        for e in &elements {
            if e.cell() != &cell {
                return Err(Error::IncompatibleElements(format!(
                    "mixed element with sub-elements on {cell} and {}",
                    e.cell()
                )));
            }
            merge_entity_dofs(&mut entity_dofs, e.entity_dofs(), offset, "mixed element")?;
            offset += e.space_dimension();
        }
        Ok(Self {
            degree: elements.iter().map(|e| e.degree()).max().unwrap_or(0),
            value_size: elements.iter().map(|e| e.value_size()).sum(),
            space_dimension: offset,
            elements,
            cell,
            entity_dofs,
        })
    }

    /// The sub-elements
    pub fn elements(&self) -> &[Arc<Element>] {
        &self.elements
    }
}

impl FiniteElement for MixedElement {
    fn family(&self) -> &str {
        "Mixed"
    }
    fn cell(&self) -> &Cell {
        &self.cell
    }
    fn degree(&self) -> usize {
        self.degree
    }
    fn value_shape(&self) -> Vec<usize> {
        vec![self.value_size]
    }
    fn value_size(&self) -> usize {
        self.value_size
    }
    fn space_dimension(&self) -> usize {
        self.space_dimension
    }
    fn entity_dofs(&self) -> &EntityDofs {
        &self.entity_dofs
    }
    fn map_type(&self) -> MapType {
        // Each sub-element is mapped with its own map
        MapType::Identity
    }
    fn tabulate(&self, derivative: &[usize], points: &[Vec<f64>]) -> Result<Table> {
        let mut table = vec![vec![vec![0.0; points.len()]; self.value_size]; self.space_dimension];
        let mut dof_offset = 0;
        let mut value_offset = 0;
        for e in &self.elements {
            let sub = e.tabulate(derivative, points)?;
            for (i, row) in sub.into_iter().enumerate() {
                for (c, values) in row.into_iter().enumerate() {
                    table[dof_offset + i][value_offset + c] = values;
                }
            }
            dof_offset += e.space_dimension();
            value_offset += e.value_size();
        }
        Ok(table)
    }
    fn signature(&self) -> String {
        format!(
            "MixedElement({})",
            self.elements.iter().map(|e| e.signature()).join(", ")
        )
    }
}

/// An element whose basis is a subset of the basis of another element
#[derive(Debug, Clone)]
pub struct RestrictedElement {
    element: Arc<Element>,
    indices: Vec<usize>,
    domain: RestrictionDomain,
    entity_dofs: EntityDofs,
}

impl RestrictedElement {
    /// Restrict an element to the basis functions `indices`
    pub fn new(element: Arc<Element>, indices: Vec<usize>, domain: RestrictionDomain) -> Self {
        let entity_dofs = element
            .entity_dofs()
            .iter()
            .map(|entities| {
                entities
                    .iter()
                    .map(|dofs| {
                        dofs.iter()
                            .filter_map(|d| indices.iter().position(|i| i == d))
                            .collect()
                    })
                    .collect()
            })
            .collect();
        Self {
            element,
            indices,
            domain,
            entity_dofs,
        }
    }

    /// The element that is restricted
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The basis functions of the wrapped element that are kept
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl FiniteElement for RestrictedElement {
    fn family(&self) -> &str {
        self.element.family()
    }
    fn cell(&self) -> &Cell {
        self.element.cell()
    }
    fn degree(&self) -> usize {
        self.element.degree()
    }
    fn value_shape(&self) -> Vec<usize> {
        self.element.value_shape()
    }
    fn value_size(&self) -> usize {
        self.element.value_size()
    }
    fn space_dimension(&self) -> usize {
        self.indices.len()
    }
    fn entity_dofs(&self) -> &EntityDofs {
        &self.entity_dofs
    }
    fn map_type(&self) -> MapType {
        self.element.map_type()
    }
    fn tabulate(&self, derivative: &[usize], points: &[Vec<f64>]) -> Result<Table> {
        let table = self.element.tabulate(derivative, points)?;
        Ok(self.indices.iter().map(|i| table[*i].clone()).collect())
    }
    fn signature(&self) -> String {
        format!(
            "RestrictedElement({}, {})",
            self.element.signature(),
            self.domain
        )
    }
}

/// The sum of the spaces spanned by two elements
///
/// The basis is the union of the two bases, with the dofs of the second element numbered
/// after those of the first.
#[derive(Debug, Clone)]
pub struct EnrichedElement {
    a: Arc<Element>,
    b: Arc<Element>,
    entity_dofs: EntityDofs,
    expansion: Option<CiarletElement>,
}

impl EnrichedElement {
    /// Enrich one element with another
    pub fn new(a: Arc<Element>, b: Arc<Element>) -> Result<Self> {
        if a.cell() != b.cell() {
            return Err(Error::IncompatibleElements(format!(
                "cannot enrich an element on {} with an element on {}",
                a.cell(),
                b.cell()
            )));
        }
        if a.value_shape() != b.value_shape() || a.map_type() != b.map_type() {
            return Err(Error::IncompatibleElements(format!(
                "cannot enrich {} with {}: the values are mapped differently",
                a.signature(),
                b.signature()
            )));
        }
        let mut entity_dofs = a.entity_dofs().clone();
        merge_entity_dofs(&mut entity_dofs, b.entity_dofs(), a.space_dimension(), "enriched element")?;
        let expansion = match (a.as_ciarlet(), b.as_ciarlet()) {
            (Some(ea), Some(eb)) if ea.cell_type() == eb.cell_type() => {
                let embedded_degree = ea.embedded_degree().max(eb.embedded_degree());
                let mut coefficients = ea.coefficients_in_degree(embedded_degree);
                coefficients.extend(eb.coefficients_in_degree(embedded_degree));
                Some(CiarletElement::from_coefficients(
                    "EnrichedElement",
                    ea.cell_type(),
                    a.degree().max(b.degree()),
                    a.value_shape(),
                    coefficients,
                    entity_dofs.clone(),
                    a.map_type(),
                    embedded_degree,
                ))
            }
            _ => None,
        };
        Ok(Self {
            a,
            b,
            entity_dofs,
            expansion,
        })
    }

    /// Both bases in the expansion set of the higher embedded degree, if both elements have
    /// expansion coefficient tables
    ///
    /// Rows of the element with the lower degree are padded with zeros.
    pub fn expansion(&self) -> Option<&CiarletElement> {
        self.expansion.as_ref()
    }
}

impl FiniteElement for EnrichedElement {
    fn family(&self) -> &str {
        "EnrichedElement"
    }
    fn cell(&self) -> &Cell {
        self.a.cell()
    }
    fn degree(&self) -> usize {
        self.a.degree().max(self.b.degree())
    }
    fn value_shape(&self) -> Vec<usize> {
        self.a.value_shape()
    }
    fn value_size(&self) -> usize {
        self.a.value_size()
    }
    fn space_dimension(&self) -> usize {
        self.a.space_dimension() + self.b.space_dimension()
    }
    fn entity_dofs(&self) -> &EntityDofs {
        &self.entity_dofs
    }
    fn map_type(&self) -> MapType {
        self.a.map_type()
    }
    fn tabulate(&self, derivative: &[usize], points: &[Vec<f64>]) -> Result<Table> {
        let mut table = self.a.tabulate(derivative, points)?;
        table.extend(self.b.tabulate(derivative, points)?);
        Ok(table)
    }
    fn signature(&self) -> String {
        format!(
            "EnrichedElement({}, {})",
            self.a.signature(),
            self.b.signature()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::ciarlet::lagrange;
    use crate::traits::types::ReferenceCellType;
    use approx::assert_relative_eq;

    fn p(degree: usize) -> Arc<Element> {
        Arc::new(Element::Ciarlet(
            lagrange::create(ReferenceCellType::Triangle, degree, false).unwrap(),
        ))
    }

    #[test]
    fn test_mixed() {
        let e = MixedElement::new(vec![p(2), p(2), p(1)]).unwrap();
        assert_eq!(e.space_dimension(), 15);
        assert_eq!(e.value_shape(), vec![3]);
        assert_eq!(e.entity_dofs()[0][0], vec![0, 6, 12]);
        assert_eq!(e.entity_dofs()[1][0], vec![3, 9]);
        let pts = vec![vec![0.2, 0.3]];
        let data = e.tabulate(&[0, 0], &pts).unwrap();
        let sub = p(1).tabulate(&[0, 0], &pts).unwrap();
        assert_relative_eq!(data[13][2][0], sub[1][0][0]);
        assert_eq!(data[13][0][0], 0.0);
        assert_eq!(
            e.signature(),
            "MixedElement(FiniteElement('Lagrange', triangle, 2), FiniteElement('Lagrange', triangle, 2), FiniteElement('Lagrange', triangle, 1))"
        );

        let wrapped = Element::Mixed(e);
        assert_eq!(wrapped.num_sub_structures(), 3);
        assert_eq!(wrapped.sub_structure(2).space_dimension(), 3);
    }

    #[test]
    fn test_mixed_cells() {
        let interval = Arc::new(Element::Ciarlet(
            lagrange::create(ReferenceCellType::Interval, 1, false).unwrap(),
        ));
        assert!(matches!(
            MixedElement::new(vec![p(1), interval]),
            Err(Error::IncompatibleElements(_))
        ));
        assert!(MixedElement::new(vec![]).is_err());
    }

    #[test]
    fn test_restricted() {
        let base = p(3);
        let interior = base.entity_dofs()[2][0].clone();
        let e = RestrictedElement::new(base.clone(), interior.clone(), RestrictionDomain::Interior);
        assert_eq!(e.space_dimension(), 1);
        assert_eq!(e.entity_dofs()[2][0], vec![0]);
        assert!(e.entity_dofs()[0].iter().all(|d| d.is_empty()));
        let pts = vec![vec![0.25, 0.25]];
        assert_relative_eq!(
            e.tabulate(&[0, 0], &pts).unwrap()[0][0][0],
            base.tabulate(&[0, 0], &pts).unwrap()[interior[0]][0][0]
        );
    }

    #[test]
    fn test_enriched() {
        let bubble = Arc::new(Element::Ciarlet(
            lagrange::create_bubble(ReferenceCellType::Triangle, 3).unwrap(),
        ));
        let e = EnrichedElement::new(p(1), bubble).unwrap();
        assert_eq!(e.space_dimension(), 4);
        assert_eq!(e.entity_dofs()[2][0], vec![3]);
        assert_eq!(e.degree(), 3);
        let data = e.tabulate(&[0, 0], &[vec![1.0 / 3.0, 1.0 / 3.0]]).unwrap();
        assert_relative_eq!(data[3][0][0], 1.0, epsilon = 1e-12);

        let expansion = e.expansion().unwrap();
        assert_eq!(expansion.embedded_degree(), 3);
        assert_eq!(expansion.coefficients().len(), 4);
        assert!(expansion.coefficients().iter().all(|row| row[0].len() == 10));
        assert!(expansion.coefficients()[0][0][3..].iter().all(|c| *c == 0.0));
        let pts = vec![vec![0.2, 0.3], vec![0.6, 0.1]];
        let direct = e.tabulate(&[1, 0], &pts).unwrap();
        let combined = expansion.tabulate(&[1, 0], &pts).unwrap();
        for (d, c) in direct.iter().zip(&combined) {
            for (p, q) in d[0].iter().zip(&c[0]) {
                assert_relative_eq!(p, q, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_form_degree() {
        assert_eq!(p(1).form_degree(), 0);
        let dg = Element::Ciarlet(lagrange::create(ReferenceCellType::Interval, 1, true).unwrap());
        assert_eq!(dg.form_degree(), 1);
    }
}
