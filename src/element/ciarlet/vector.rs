//! H(div) and H(curl) conforming elements of the lowest order on simplices

use crate::element::ciarlet::{project, CiarletElement, PointFunctional, Span};
use crate::element::polynomials::polynomial_count;
use crate::element::reference_cell;
use crate::quadrature::{map_facet_points, FacetKind};
use crate::traits::types::ReferenceCellType;
use crate::traits::{EntityDofs, MapType};
use crate::types::{Error, Result};

/// The vector families this module can create
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum VectorFamily {
    /// Raviart-Thomas
    RaviartThomas,
    /// Nedelec (first kind) H(curl)
    NedelecFirstKind,
    /// Brezzi-Douglas-Marini
    BrezziDouglasMarini,
    /// Nedelec (second kind) H(curl)
    NedelecSecondKind,
}

impl VectorFamily {
    /// The family name
    pub fn name(&self) -> &'static str {
        match self {
            VectorFamily::RaviartThomas => "Raviart-Thomas",
            VectorFamily::NedelecFirstKind => "Nedelec 1st kind H(curl)",
            VectorFamily::BrezziDouglasMarini => "Brezzi-Douglas-Marini",
            VectorFamily::NedelecSecondKind => "Nedelec 2nd kind H(curl)",
        }
    }

    fn is_hdiv(&self) -> bool {
        matches!(
            self,
            VectorFamily::RaviartThomas | VectorFamily::BrezziDouglasMarini
        )
    }

    fn is_full_degree(&self) -> bool {
        matches!(
            self,
            VectorFamily::BrezziDouglasMarini | VectorFamily::NedelecSecondKind
        )
    }
}

fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// The outward normal to a facet scaled by the size of the facet
fn scaled_normal(cell_type: ReferenceCellType, facet: usize) -> Vec<f64> {
    let vertices = reference_cell::vertices(cell_type);
    let f = &reference_cell::facets(cell_type)[facet];
    let measure = match f.len() {
        2 => {
            let t = sub(&vertices[f[1]], &vertices[f[0]]);
            t.iter().map(|x| x * x).sum::<f64>().sqrt()
        }
        _ => {
            let a = sub(&vertices[f[1]], &vertices[f[0]]);
            let b = sub(&vertices[f[2]], &vertices[f[0]]);
            let c = [
                a[1] * b[2] - a[2] * b[1],
                a[2] * b[0] - a[0] * b[2],
                a[0] * b[1] - a[1] * b[0],
            ];
            0.5 * c.iter().map(|x| x * x).sum::<f64>().sqrt()
        }
    };
    reference_cell::facet_normal(cell_type, facet)
        .iter()
        .map(|n| n * measure)
        .collect()
}

fn span(family: VectorFamily, cell_type: ReferenceCellType) -> Result<Span> {
    let tdim = reference_cell::dim(cell_type);
    if family.is_full_degree() {
        let pdim = polynomial_count(cell_type, 1);
        let mut members = vec![];
        for c in 0..tdim {
            for k in 0..pdim {
                let mut m = vec![vec![0.0; pdim]; tdim];
                m[c][k] = 1.0;
                members.push(m);
            }
        }
        return Ok(members);
    }
    let mut members = vec![];
    for c in 0..tdim {
        members.push(project(cell_type, 1, tdim, |_| {
            let mut v = vec![0.0; tdim];
            v[c] = 1.0;
            v
        })?);
    }
    match family {
        VectorFamily::RaviartThomas => {
            members.push(project(cell_type, 1, tdim, |p| p.to_vec())?);
        }
        _ if tdim == 2 => {
            members.push(project(cell_type, 1, tdim, |p| vec![-p[1], p[0]])?);
        }
        _ => {
            // x × e_c
            members.push(project(cell_type, 1, tdim, |p| vec![0.0, p[2], -p[1]])?);
            members.push(project(cell_type, 1, tdim, |p| vec![-p[2], 0.0, p[0]])?);
            members.push(project(cell_type, 1, tdim, |p| vec![p[1], -p[0], 0.0])?);
        }
    }
    Ok(members)
}

/// Create a vector valued element of degree 1
pub fn create(
    family: VectorFamily,
    cell_type: ReferenceCellType,
    degree: usize,
) -> Result<CiarletElement> {
    if degree != 1
        || !matches!(
            cell_type,
            ReferenceCellType::Triangle | ReferenceCellType::Tetrahedron
        )
    {
        return Err(Error::TabulatorUnsupported {
            family: family.name().to_string(),
            cell: cell_type.to_string(),
            degree,
        });
    }
    let tdim = reference_cell::dim(cell_type);
    let vertices = reference_cell::vertices(cell_type);
    let mut entity_dofs: EntityDofs = reference_cell::entity_counts(cell_type)[..tdim + 1]
        .iter()
        .map(|n| vec![vec![]; *n])
        .collect();
    let mut functionals = vec![];

    // Two point Gauss-Legendre on [0, 1]
    let g = 0.5 / 3.0_f64.sqrt();
    let edge_points = [vec![0.5 - g], vec![0.5 + g]];
    let face_points = [
        vec![1.0 / 6.0, 1.0 / 6.0],
        vec![2.0 / 3.0, 1.0 / 6.0],
        vec![1.0 / 6.0, 2.0 / 3.0],
    ];

    if family.is_hdiv() {
        for f in 0..reference_cell::facets(cell_type).len() {
            let weights = scaled_normal(cell_type, f);
            let points = if !family.is_full_degree() {
                let barycentre = vec![1.0 / tdim as f64; tdim - 1];
                map_facet_points(&[barycentre], f, FacetKind::Facet)?
            } else if tdim == 2 {
                map_facet_points(&edge_points, f, FacetKind::Facet)?
            } else {
                map_facet_points(&face_points, f, FacetKind::Facet)?
            };
            for point in points {
                entity_dofs[tdim - 1][f].push(functionals.len());
                functionals.push(PointFunctional {
                    point,
                    weights: weights.clone(),
                });
            }
        }
    } else {
        for (e, edge) in reference_cell::edges(cell_type).iter().enumerate() {
            let (v0, v1) = (&vertices[edge[0]], &vertices[edge[1]]);
            let tangent = sub(v1, v0);
            let params: Vec<f64> = if family.is_full_degree() {
                edge_points.iter().map(|p| p[0]).collect()
            } else {
                vec![0.5]
            };
            for s in params {
                entity_dofs[1][e].push(functionals.len());
                functionals.push(PointFunctional {
                    point: v0.iter().zip(&tangent).map(|(a, t)| a + s * t).collect(),
                    weights: tangent.clone(),
                });
            }
        }
    }

    let map_type = if family.is_hdiv() {
        MapType::ContravariantPiola
    } else {
        MapType::CovariantPiola
    };
    CiarletElement::create(
        family.name(),
        cell_type,
        degree,
        vec![tdim],
        span(family, cell_type)?,
        &functionals,
        entity_dofs,
        map_type,
        1,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::ciarlet::test::check_dofs;
    use crate::traits::FiniteElement;
    use approx::assert_relative_eq;

    #[test]
    fn test_raviart_thomas_triangle() {
        let e = create(VectorFamily::RaviartThomas, ReferenceCellType::Triangle, 1).unwrap();
        assert_eq!(e.space_dimension(), 3);
        assert_eq!(e.value_shape(), vec![2]);
        assert_eq!(e.map_type(), MapType::ContravariantPiola);
        check_dofs(&e);

        // The normal flux of basis function i through facet j is δ_ij
        let g = 0.5 / 3.0_f64.sqrt();
        for f in 0..3 {
            let n = scaled_normal(ReferenceCellType::Triangle, f);
            let pts = map_facet_points(&[vec![0.5 - g], vec![0.5 + g]], f, FacetKind::Facet)
                .unwrap();
            let data = e.tabulate(&[0, 0], &pts).unwrap();
            for i in 0..3 {
                let flux: f64 = (0..2)
                    .map(|p| 0.5 * (data[i][0][p] * n[0] + data[i][1][p] * n[1]))
                    .sum();
                assert_relative_eq!(flux, if i == f { 1.0 } else { 0.0 }, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_nedelec_tetrahedron() {
        let e = create(VectorFamily::NedelecFirstKind, ReferenceCellType::Tetrahedron, 1).unwrap();
        assert_eq!(e.space_dimension(), 6);
        assert_eq!(e.entity_dofs()[1].len(), 6);
        check_dofs(&e);
        let e = create(VectorFamily::NedelecSecondKind, ReferenceCellType::Tetrahedron, 1).unwrap();
        assert_eq!(e.space_dimension(), 12);
        check_dofs(&e);
    }

    #[test]
    fn test_bdm() {
        let e = create(VectorFamily::BrezziDouglasMarini, ReferenceCellType::Triangle, 1).unwrap();
        assert_eq!(e.space_dimension(), 6);
        assert_eq!(e.entity_dofs()[1][0], vec![0, 1]);
        let e = create(VectorFamily::BrezziDouglasMarini, ReferenceCellType::Tetrahedron, 1).unwrap();
        assert_eq!(e.space_dimension(), 12);
        check_dofs(&e);
    }

    #[test]
    fn test_unsupported() {
        assert!(matches!(
            create(VectorFamily::RaviartThomas, ReferenceCellType::Triangle, 2),
            Err(Error::TabulatorUnsupported { .. })
        ));
        assert!(create(VectorFamily::RaviartThomas, ReferenceCellType::Quadrilateral, 1).is_err());
    }
}
