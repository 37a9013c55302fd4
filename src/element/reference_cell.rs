//! Reference cell geometry and topology
//!
//! Cells use the UFC numbering: vertex `i` of a simplex sits at the origin (`i = 0`) or at the
//! unit point on axis `i - 1`, and sub-entity `k` of dimension `tdim - 1` is the one opposite
//! vertex `k`.

use crate::traits::types::ReferenceCellType;

/// The topological dimension of the cell
pub fn dim(cell: ReferenceCellType) -> usize {
    match cell {
        ReferenceCellType::Point => 0,
        ReferenceCellType::Interval => 1,
        ReferenceCellType::Triangle => 2,
        ReferenceCellType::Quadrilateral => 2,
        ReferenceCellType::Tetrahedron => 3,
        ReferenceCellType::Hexahedron => 3,
    }
}

/// Is the cell a simplex?
pub fn is_simplex(cell: ReferenceCellType) -> bool {
    match cell {
        ReferenceCellType::Point => true,
        ReferenceCellType::Interval => true,
        ReferenceCellType::Triangle => true,
        ReferenceCellType::Quadrilateral => false,
        ReferenceCellType::Tetrahedron => true,
        ReferenceCellType::Hexahedron => false,
    }
}

/// The vertices of the reference cell
pub fn vertices(cell: ReferenceCellType) -> Vec<Vec<f64>> {
    match cell {
        ReferenceCellType::Point => vec![vec![]],
        ReferenceCellType::Interval => vec![vec![0.0], vec![1.0]],
        ReferenceCellType::Triangle => vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]],
        ReferenceCellType::Quadrilateral => vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
        ],
        ReferenceCellType::Tetrahedron => vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ],
        ReferenceCellType::Hexahedron => vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![0.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0],
        ],
    }
}

/// The midpoint of the cell
pub fn midpoint(cell: ReferenceCellType) -> Vec<f64> {
    let v = vertices(cell);
    let n = v.len() as f64;
    (0..dim(cell))
        .map(|i| v.iter().map(|p| p[i]).sum::<f64>() / n)
        .collect()
}

/// The edges of the reference cell
pub fn edges(cell: ReferenceCellType) -> Vec<Vec<usize>> {
    match cell {
        ReferenceCellType::Point => vec![],
        ReferenceCellType::Interval => vec![vec![0, 1]],
        ReferenceCellType::Triangle => vec![vec![1, 2], vec![0, 2], vec![0, 1]],
        ReferenceCellType::Quadrilateral => {
            vec![vec![0, 1], vec![0, 2], vec![1, 3], vec![2, 3]]
        }
        ReferenceCellType::Tetrahedron => vec![
            vec![2, 3],
            vec![1, 3],
            vec![1, 2],
            vec![0, 3],
            vec![0, 2],
            vec![0, 1],
        ],
        ReferenceCellType::Hexahedron => vec![
            vec![0, 1],
            vec![0, 2],
            vec![0, 4],
            vec![1, 3],
            vec![1, 5],
            vec![2, 3],
            vec![2, 6],
            vec![3, 7],
            vec![4, 5],
            vec![4, 6],
            vec![5, 7],
            vec![6, 7],
        ],
    }
}

/// The faces of the reference cell
pub fn faces(cell: ReferenceCellType) -> Vec<Vec<usize>> {
    match cell {
        ReferenceCellType::Point => vec![],
        ReferenceCellType::Interval => vec![],
        ReferenceCellType::Triangle => vec![vec![0, 1, 2]],
        ReferenceCellType::Quadrilateral => vec![vec![0, 1, 2, 3]],
        ReferenceCellType::Tetrahedron => {
            vec![vec![1, 2, 3], vec![0, 2, 3], vec![0, 1, 3], vec![0, 1, 2]]
        }
        ReferenceCellType::Hexahedron => vec![
            vec![0, 1, 2, 3],
            vec![0, 1, 4, 5],
            vec![0, 2, 4, 6],
            vec![1, 3, 5, 7],
            vec![2, 3, 6, 7],
            vec![4, 5, 6, 7],
        ],
    }
}

/// The number of subentities of each dimension
pub fn entity_counts(cell: ReferenceCellType) -> Vec<usize> {
    match cell {
        ReferenceCellType::Point => vec![1, 0, 0, 0],
        ReferenceCellType::Interval => vec![2, 1, 0, 0],
        ReferenceCellType::Triangle => vec![3, 3, 1, 0],
        ReferenceCellType::Quadrilateral => vec![4, 4, 1, 0],
        ReferenceCellType::Tetrahedron => vec![4, 6, 4, 1],
        ReferenceCellType::Hexahedron => vec![8, 12, 6, 1],
    }
}

/// The vertices of every sub-entity, indexed by \[dimension\]\[entity\]
pub fn topology(cell: ReferenceCellType) -> Vec<Vec<Vec<usize>>> {
    let d = dim(cell);
    let nv = entity_counts(cell)[0];
    let mut t = vec![(0..nv).map(|v| vec![v]).collect::<Vec<_>>()];
    if d >= 1 {
        t.push(edges(cell));
    }
    if d >= 2 {
        t.push(faces(cell));
    }
    if d == 3 {
        t.push(vec![(0..nv).collect()]);
    }
    t
}

/// The vertices of the facets of the cell
pub fn facets(cell: ReferenceCellType) -> Vec<Vec<usize>> {
    match dim(cell) {
        0 => vec![],
        d => topology(cell).swap_remove(d - 1),
    }
}

/// The outward unit normal to a facet of a simplex
pub fn facet_normal(cell: ReferenceCellType, facet: usize) -> Vec<f64> {
    let d = dim(cell);
    if !is_simplex(cell) || d == 0 {
        return vec![];
    }
    // Facet k is opposite vertex k
    if facet == 0 {
        let s = 1.0 / (d as f64).sqrt();
        vec![s; d]
    } else {
        let mut n = vec![0.0; d];
        n[facet - 1] = -1.0;
        n
    }
}

/// The unit tangent to an edge, pointing from its first to its second vertex
pub fn edge_tangent(cell: ReferenceCellType, edge: usize) -> Vec<f64> {
    let v = vertices(cell);
    let e = &edges(cell)[edge];
    let t: Vec<f64> = v[e[1]].iter().zip(&v[e[0]]).map(|(a, b)| a - b).collect();
    let norm = t.iter().map(|x| x * x).sum::<f64>().sqrt();
    t.iter().map(|x| x / norm).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use paste::paste;

    macro_rules! test_cell {

        ($($cell:ident),+) => {

        $(
            paste! {

                #[test]
                fn [<test_ $cell:lower>]() {
                    let v = vertices(ReferenceCellType::[<$cell>]);
                    let d = dim(ReferenceCellType::[<$cell>]);
                    let ec = entity_counts(ReferenceCellType::[<$cell>]);
                    let t = topology(ReferenceCellType::[<$cell>]);
                    assert_eq!(t.len(), d + 1);
                    for i in 0..d+1 {
                        assert_eq!(ec[i], t[i].len());
                    }
                    assert_eq!(ec[0], v.len());
                    for i in &v {
                        assert_eq!(i.len(), d);
                    }
                    for e_dim in 1..d+1 {
                        for e in &t[e_dim] {
                            assert!(e.len() > e_dim);
                            for i in e {
                                assert!(*i < ec[0]);
                            }
                        }
                    }
                    let m = midpoint(ReferenceCellType::[<$cell>]);
                    assert_eq!(m.len(), d);
                }

            }
        )*
        };
    }

    test_cell!(
        Interval,
        Triangle,
        Quadrilateral,
        Tetrahedron,
        Hexahedron
    );

    #[test]
    fn test_triangle_facets() {
        let f = facets(ReferenceCellType::Triangle);
        assert_eq!(f[2], vec![0, 1]);
        let n = facet_normal(ReferenceCellType::Triangle, 0);
        assert_relative_eq!(n[0], 0.5_f64.sqrt());
        assert_relative_eq!(n[1], 0.5_f64.sqrt());
        let n = facet_normal(ReferenceCellType::Triangle, 2);
        assert_relative_eq!(n[1], -1.0);
        let t = edge_tangent(ReferenceCellType::Triangle, 0);
        assert_relative_eq!(t[0], -(0.5_f64.sqrt()));
        assert_relative_eq!(t[1], 0.5_f64.sqrt());
    }
}
