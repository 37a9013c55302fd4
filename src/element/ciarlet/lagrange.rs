//! Lagrange elements and other scalar nodal elements

use crate::element::ciarlet::{CiarletElement, PointFunctional};
use crate::element::polynomials::polynomial_count;
use crate::element::reference_cell;
use crate::traits::types::ReferenceCellType;
use crate::traits::{EntityDofs, MapType};
use crate::types::{Error, Result};

/// Equally spaced points in the interior of a sub-entity, given by its vertices
pub(crate) fn lattice_points(vertices: &[Vec<f64>], degree: usize) -> Vec<Vec<f64>> {
    let d = degree as f64;
    let v0 = &vertices[0];
    let axis = |v: &Vec<f64>| v.iter().zip(v0).map(|(a, b)| a - b).collect::<Vec<f64>>();
    let point = |steps: &[(usize, &Vec<f64>)]| {
        let mut p = v0.clone();
        for (n, a) in steps {
            for (x, y) in p.iter_mut().zip(a.iter()) {
                *x += *n as f64 / d * y;
            }
        }
        p
    };
    let mut pts = vec![];
    match vertices.len() {
        1 => pts.push(v0.clone()),
        2 => {
            let a = axis(&vertices[1]);
            for i in 1..degree {
                pts.push(point(&[(i, &a)]));
            }
        }
        3 => {
            let (a, b) = (axis(&vertices[1]), axis(&vertices[2]));
            for j in 1..degree {
                for i in 1..degree - j {
                    pts.push(point(&[(i, &a), (j, &b)]));
                }
            }
        }
        // A quadrilateral face of a hexahedron or a quadrilateral cell: vertex 3 is opposite
        // vertex 0. Otherwise this is a tetrahedron.
        4 if v0.len() == 2 || is_parallelogram(vertices) => {
            let (a, b) = (axis(&vertices[1]), axis(&vertices[2]));
            for j in 1..degree {
                for i in 1..degree {
                    pts.push(point(&[(i, &a), (j, &b)]));
                }
            }
        }
        4 => {
            let (a, b, c) = (axis(&vertices[1]), axis(&vertices[2]), axis(&vertices[3]));
            for k in 1..degree {
                for j in 1..degree - k {
                    for i in 1..degree - j - k {
                        pts.push(point(&[(i, &a), (j, &b), (k, &c)]));
                    }
                }
            }
        }
        _ => {
            let (a, b, c) = (axis(&vertices[1]), axis(&vertices[2]), axis(&vertices[4]));
            for k in 1..degree {
                for j in 1..degree {
                    for i in 1..degree {
                        pts.push(point(&[(i, &a), (j, &b), (k, &c)]));
                    }
                }
            }
        }
    }
    pts
}

fn is_parallelogram(vertices: &[Vec<f64>]) -> bool {
    vertices[3]
        .iter()
        .zip(&vertices[0])
        .zip(vertices[1].iter().zip(&vertices[2]))
        .all(|((v3, v0), (v1, v2))| (v3 + v0 - v1 - v2).abs() < 1e-12)
}

pub(crate) fn identity_span(cell_type: ReferenceCellType, degree: usize) -> Vec<Vec<Vec<f64>>> {
    let dim = polynomial_count(cell_type, degree);
    (0..dim)
        .map(|i| {
            let mut row = vec![0.0; dim];
            row[i] = 1.0;
            vec![row]
        })
        .collect()
}

pub(crate) fn empty_entity_dofs(cell_type: ReferenceCellType) -> EntityDofs {
    let tdim = reference_cell::dim(cell_type);
    reference_cell::entity_counts(cell_type)[..tdim + 1]
        .iter()
        .map(|n| vec![vec![]; *n])
        .collect()
}

/// Create a Lagrange element
///
/// A discontinuous element has the same basis as the continuous element of the same degree,
/// with every dof associated with the interior of the cell. The discontinuous element of
/// degree 0 is the constant function with its dof at the midpoint of the cell.
pub fn create(
    cell_type: ReferenceCellType,
    degree: usize,
    discontinuous: bool,
) -> Result<CiarletElement> {
    let family = if discontinuous {
        "Discontinuous Lagrange"
    } else {
        "Lagrange"
    };
    let tdim = reference_cell::dim(cell_type);
    let mut entity_dofs = empty_entity_dofs(cell_type);
    let mut functionals = vec![];

    if degree == 0 {
        if !discontinuous {
            return Err(Error::TabulatorUnsupported {
                family: family.to_string(),
                cell: cell_type.to_string(),
                degree,
            });
        }
        functionals.push(PointFunctional::scalar(reference_cell::midpoint(cell_type)));
        entity_dofs[tdim][0] = vec![0];
    } else {
        let vertices = reference_cell::vertices(cell_type);
        for (d, entities) in reference_cell::topology(cell_type).iter().enumerate() {
            for (e, entity) in entities.iter().enumerate() {
                let entity_vertices: Vec<Vec<f64>> =
                    entity.iter().map(|v| vertices[*v].clone()).collect();
                for p in lattice_points(&entity_vertices, degree) {
                    let dof = functionals.len();
                    if discontinuous {
                        entity_dofs[tdim][0].push(dof);
                    } else {
                        entity_dofs[d][e].push(dof);
                    }
                    functionals.push(PointFunctional::scalar(p));
                }
            }
        }
    }

    CiarletElement::create(
        family,
        cell_type,
        degree,
        vec![],
        identity_span(cell_type, degree),
        &functionals,
        entity_dofs,
        MapType::Identity,
        degree,
    )
}

/// Create a Crouzeix-Raviart element, with dofs at the midpoints of the facets
pub fn create_crouzeix_raviart(cell_type: ReferenceCellType, degree: usize) -> Result<CiarletElement> {
    let family = "Crouzeix-Raviart";
    if degree != 1 || !matches!(cell_type, ReferenceCellType::Triangle | ReferenceCellType::Tetrahedron) {
        return Err(Error::TabulatorUnsupported {
            family: family.to_string(),
            cell: cell_type.to_string(),
            degree,
        });
    }
    let tdim = reference_cell::dim(cell_type);
    let vertices = reference_cell::vertices(cell_type);
    let mut entity_dofs = empty_entity_dofs(cell_type);
    let mut functionals = vec![];
    for (f, facet) in reference_cell::facets(cell_type).iter().enumerate() {
        let midpoint = (0..tdim)
            .map(|j| facet.iter().map(|v| vertices[*v][j]).sum::<f64>() / facet.len() as f64)
            .collect();
        entity_dofs[tdim - 1][f].push(functionals.len());
        functionals.push(PointFunctional::scalar(midpoint));
    }
    CiarletElement::create(
        family,
        cell_type,
        degree,
        vec![],
        identity_span(cell_type, degree),
        &functionals,
        entity_dofs,
        MapType::Identity,
        degree,
    )
}

/// Create a bubble element: the Lagrange basis functions associated with the cell interior
pub fn create_bubble(cell_type: ReferenceCellType, degree: usize) -> Result<CiarletElement> {
    let tdim = reference_cell::dim(cell_type);
    let lagrange = create(cell_type, degree, false)?;
    let interior = lagrange.entity_dofs[tdim][0].clone();
    if interior.is_empty() {
        return Err(Error::TabulatorUnsupported {
            family: "Bubble".to_string(),
            cell: cell_type.to_string(),
            degree,
        });
    }
    let mut entity_dofs = empty_entity_dofs(cell_type);
    entity_dofs[tdim][0] = (0..interior.len()).collect();
    Ok(lagrange.subset("Bubble", &interior, entity_dofs))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::ciarlet::test::check_dofs;
    use crate::traits::FiniteElement;
    use approx::assert_relative_eq;
    use paste::paste;

    macro_rules! test_lagrange {
        ($($cell:ident, $degree:literal),+) => {
        $(
            paste! {
                #[test]
                fn [<test_lagrange_ $cell:lower _ $degree>]() {
                    let cell = ReferenceCellType::[<$cell>];
                    let e = create(cell, $degree, false).unwrap();
                    assert_eq!(e.space_dimension(), polynomial_count(cell, $degree));
                    check_dofs(&e);

                    // Each basis function is one at its own node and zero at the others
                    let vertices = reference_cell::vertices(cell);
                    let mut nodes = vec![];
                    for entities in reference_cell::topology(cell) {
                        for entity in entities {
                            let v: Vec<Vec<f64>> = entity.iter().map(|i| vertices[*i].clone()).collect();
                            nodes.extend(lattice_points(&v, $degree));
                        }
                    }
                    let data = e.tabulate(&vec![0; reference_cell::dim(cell)], &nodes).unwrap();
                    for i in 0..nodes.len() {
                        for j in 0..nodes.len() {
                            assert_relative_eq!(data[i][0][j], if i == j { 1.0 } else { 0.0 }, epsilon = 1e-11);
                        }
                    }

                    let d = create(cell, $degree, true).unwrap();
                    check_dofs(&d);
                    assert_eq!(d.entity_dofs()[reference_cell::dim(cell)][0].len(), d.space_dimension());
                }
            }
        )*
        };
    }

    test_lagrange!(
        Interval, 3,
        Triangle, 3,
        Quadrilateral, 2,
        Tetrahedron, 3,
        Hexahedron, 2
    );

    #[test]
    fn test_continuous_degree_0() {
        assert!(create(ReferenceCellType::Triangle, 0, false).is_err());
        let e = create(ReferenceCellType::Tetrahedron, 0, true).unwrap();
        assert_eq!(e.space_dimension(), 1);
        assert_eq!(e.entity_dofs()[3][0], vec![0]);
    }

    #[test]
    fn test_crouzeix_raviart() {
        let e = create_crouzeix_raviart(ReferenceCellType::Triangle, 1).unwrap();
        assert_eq!(e.space_dimension(), 3);
        assert_eq!(e.entity_dofs()[1], vec![vec![0], vec![1], vec![2]]);
        let data = e.tabulate(&[0, 0], &[vec![0.5, 0.5], vec![0.0, 0.5]]).unwrap();
        assert_relative_eq!(data[0][0][0], 1.0, epsilon = 1e-13);
        assert_relative_eq!(data[1][0][0], 0.0, epsilon = 1e-13);
        assert_relative_eq!(data[1][0][1], 1.0, epsilon = 1e-13);
        check_dofs(&e);
    }

    #[test]
    fn test_bubble() {
        let e = create_bubble(ReferenceCellType::Triangle, 3).unwrap();
        assert_eq!(e.space_dimension(), 1);
        let data = e.tabulate(&[0, 0], &[vec![0.0, 0.5], vec![1.0 / 3.0, 1.0 / 3.0]]).unwrap();
        assert_relative_eq!(data[0][0][0], 0.0, epsilon = 1e-13);
        assert_relative_eq!(data[0][0][1], 1.0, epsilon = 1e-13);
        assert!(create_bubble(ReferenceCellType::Triangle, 2).is_err());
    }
}
