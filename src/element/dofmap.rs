//! Local-to-global degree of freedom maps

use crate::element::finite_element::Element;
use crate::element::reference_cell;
use crate::traits::types::Cell;
use crate::traits::{EntityDofs, FiniteElement, SubStructure};
use crate::types::{Error, Result};

/// The dof map of an element
///
/// A dof map numbers the dofs of an element globally by attaching them to mesh entities:
/// a dof associated with entity `i` of dimension `d` gets a global number from the block of
/// numbers owned by that mesh entity.
#[derive(Debug, Clone)]
pub struct DofMap {
    signature: String,
    cell: Cell,
    local_dimension: usize,
    entity_dofs: EntityDofs,
    sub_dof_maps: Vec<DofMap>,
}

impl DofMap {
    /// Create the dof map of an element, including the dof maps of its sub-elements
    pub fn new(element: &Element) -> Self {
        Self {
            signature: format!("Dof map for {}", element.signature()),
            cell: element.cell().clone(),
            local_dimension: element.space_dimension(),
            entity_dofs: element.entity_dofs().clone(),
            sub_dof_maps: element.sub_elements().iter().map(|e| Self::new(e)).collect(),
        }
    }

    /// A string that identifies the dof map
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The number of dofs on a cell
    pub fn local_dimension(&self) -> usize {
        self.local_dimension
    }

    /// The dofs associated with each entity of the reference cell
    pub fn entity_dofs(&self) -> &EntityDofs {
        &self.entity_dofs
    }

    /// The number of dofs associated with each entity of dimension `dim`
    pub fn num_entity_dofs(&self, dim: usize) -> usize {
        self.entity_dofs
            .get(dim)
            .and_then(|entities| entities.iter().map(|d| d.len()).max())
            .unwrap_or(0)
    }

    /// Does the dof map need mesh entities of dimension `dim`?
    pub fn needs_mesh_entities(&self, dim: usize) -> bool {
        self.num_entity_dofs(dim) > 0
    }

    /// The dimension of the global space
    ///
    /// `num_entities[d]` is the number of mesh entities of dimension `d`.
    pub fn global_dimension(&self, num_entities: &[usize]) -> usize {
        (0..self.entity_dofs.len())
            .map(|d| self.num_entity_dofs(d) * num_entities.get(d).copied().unwrap_or(0))
            .sum()
    }

    /// The dofs of the closure of a facet of a simplex or box cell
    pub fn tabulate_facet_dofs(&self, facet: usize) -> Result<Vec<usize>> {
        let cell_type = self.cell.reference_type().ok_or_else(|| {
            Error::UnsupportedCell(format!(
                "facet dofs are tabulated per facet kind on {}",
                self.cell
            ))
        })?;
        let tdim = reference_cell::dim(cell_type);
        let facets = reference_cell::facets(cell_type);
        let facet_vertices = facets.get(facet).ok_or_else(|| Error::InvalidFacet {
            facet,
            kind: crate::quadrature::FacetKind::Facet.to_string(),
        })?;
        let topology = reference_cell::topology(cell_type);
        let mut dofs = vec![];
        for (d, entities) in topology.iter().enumerate().take(tdim) {
            for (e, vertices) in entities.iter().enumerate() {
                if vertices.iter().all(|v| facet_vertices.contains(v)) {
                    dofs.extend(self.entity_dofs[d][e].iter().cloned());
                }
            }
        }
        Ok(dofs)
    }

    /// The number of dofs in the closure of a facet
    pub fn num_facet_dofs(&self) -> usize {
        self.tabulate_facet_dofs(0).map(|d| d.len()).unwrap_or(0)
    }

    /// The dof maps of the sub-elements
    pub fn sub_dof_maps(&self) -> &[DofMap] {
        &self.sub_dof_maps
    }
}

impl SubStructure for DofMap {
    fn num_sub_structures(&self) -> usize {
        match self.sub_dof_maps.len() {
            0 => 1,
            n => n,
        }
    }
    fn sub_structure(&self, i: usize) -> &Self {
        match self.sub_dof_maps.get(i) {
            Some(d) if self.sub_dof_maps.len() > 1 => d,
            _ => self,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::ciarlet::lagrange;
    use crate::element::finite_element::MixedElement;
    use crate::traits::types::ReferenceCellType;
    use std::sync::Arc;

    #[test]
    fn test_p2_triangle() {
        let e = Element::Ciarlet(lagrange::create(ReferenceCellType::Triangle, 2, false).unwrap());
        let d = DofMap::new(&e);
        assert_eq!(d.local_dimension(), 6);
        assert_eq!(d.signature(), "Dof map for FiniteElement('Lagrange', triangle, 2)");
        // A mesh of two triangles sharing an edge
        assert_eq!(d.global_dimension(&[4, 5, 2]), 9);
        assert!(d.needs_mesh_entities(1));
        assert!(!d.needs_mesh_entities(2));
        // Facet 0 is the edge between vertices 1 and 2
        assert_eq!(d.tabulate_facet_dofs(0).unwrap(), vec![1, 2, 3]);
        assert_eq!(d.tabulate_facet_dofs(2).unwrap(), vec![0, 1, 5]);
        assert_eq!(d.num_facet_dofs(), 3);
        assert!(d.tabulate_facet_dofs(3).is_err());
    }

    #[test]
    fn test_discontinuous() {
        let e = Element::Ciarlet(lagrange::create(ReferenceCellType::Tetrahedron, 1, true).unwrap());
        let d = DofMap::new(&e);
        assert_eq!(d.global_dimension(&[10, 20, 15, 6]), 24);
        assert!(d.tabulate_facet_dofs(1).unwrap().is_empty());
    }

    #[test]
    fn test_mixed() {
        let p2 = Arc::new(Element::Ciarlet(
            lagrange::create(ReferenceCellType::Triangle, 2, false).unwrap(),
        ));
        let p1 = Arc::new(Element::Ciarlet(
            lagrange::create(ReferenceCellType::Triangle, 1, false).unwrap(),
        ));
        let e = Element::Mixed(MixedElement::new(vec![p2.clone(), p2, p1]).unwrap());
        let d = DofMap::new(&e);
        assert_eq!(d.sub_dof_maps().len(), 3);
        assert_eq!(d.num_sub_structures(), 3);
        assert_eq!(d.sub_structure(2).local_dimension(), 3);
        assert_eq!(d.global_dimension(&[4, 5, 2]), 9 + 9 + 4);
    }
}
