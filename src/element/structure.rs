//! Flattening of nested elements and dof maps

use crate::traits::SubStructure;

/// Recursively extract the sub-structures of a nested structure
///
/// Each item is labelled by its path from the root, starting at `parent`. A node with a single
/// sub-structure is a leaf. The sub-structures of a node come before the node itself.
pub fn extract_sub_structures<'a, S: SubStructure>(
    node: &'a S,
    parent: &[usize],
) -> Vec<(Vec<usize>, &'a S)> {
    let n = node.num_sub_structures();
    if n == 1 {
        return vec![(parent.to_vec(), node)];
    }
    let mut items = vec![];
    for i in 0..n {
        let mut label = parent.to_vec();
        label.push(i);
        items.extend(extract_sub_structures(node.sub_structure(i), &label));
    }
    items.push((parent.to_vec(), node));
    items
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::ciarlet::lagrange;
    use crate::element::finite_element::MixedElement;
    use crate::element::{DofMap, Element};
    use crate::traits::types::ReferenceCellType;
    use crate::traits::FiniteElement;
    use std::sync::Arc;

    fn interval(degree: usize) -> Arc<Element> {
        Arc::new(Element::Ciarlet(
            lagrange::create(ReferenceCellType::Interval, degree, degree == 0).unwrap(),
        ))
    }

    #[test]
    fn test_flat_mixed() {
        let children = vec![interval(1), interval(2), interval(0)];
        let mixed = Element::Mixed(MixedElement::new(children.clone()).unwrap());
        let items = extract_sub_structures(&mixed, &[]);
        assert_eq!(items.len(), 4);
        for (i, child) in children.iter().enumerate() {
            assert_eq!(items[i].0, vec![i]);
            assert!(std::ptr::eq(items[i].1, &**child));
        }
        assert_eq!(
            items.iter().map(|(_, e)| e.space_dimension()).collect::<Vec<_>>(),
            vec![2, 3, 1, 6]
        );
        assert!(items[3].0.is_empty());
        assert!(std::ptr::eq(items[3].1, &mixed));
    }

    #[test]
    fn test_single_child_collapses() {
        let mixed = Element::Mixed(MixedElement::new(vec![interval(2)]).unwrap());
        let items = extract_sub_structures(&mixed, &[4]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0, vec![4]);
        assert!(std::ptr::eq(items[0].1, &mixed));
    }

    #[test]
    fn test_nested() {
        let inner = Arc::new(Element::Mixed(
            MixedElement::new(vec![interval(1), interval(1)]).unwrap(),
        ));
        let outer = Element::Mixed(MixedElement::new(vec![inner, interval(2)]).unwrap());
        let labels: Vec<Vec<usize>> = extract_sub_structures(&outer, &[0])
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        assert_eq!(
            labels,
            vec![vec![0, 0, 0], vec![0, 0, 1], vec![0, 0], vec![0, 1], vec![0]]
        );

        let dofmap = DofMap::new(&outer);
        let labels: Vec<Vec<usize>> = extract_sub_structures(&dofmap, &[0])
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[2], vec![0, 0]);
    }
}
