//! Mapping of points on facets into the reference cell

use crate::element::reference_cell;
use crate::traits::types::{Cell, ReferenceCellType};
use crate::types::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The kind of a facet
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum FacetKind {
    /// A facet of a simplex
    Facet,
    /// The bottom (0) or top (1) facet of a tensor product cell
    HorizFacet,
    /// A side facet of a tensor product cell
    VertFacet,
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetKind::Facet => write!(f, "facet"),
            FacetKind::HorizFacet => write!(f, "horiz_facet"),
            FacetKind::VertFacet => write!(f, "vert_facet"),
        }
    }
}

impl FromStr for FacetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "facet" => Ok(FacetKind::Facet),
            "horiz_facet" => Ok(FacetKind::HorizFacet),
            "vert_facet" => Ok(FacetKind::VertFacet),
            _ => Err(Error::UnknownFacetKind(s.to_string())),
        }
    }
}

/// Map points on a reference facet to a facet of a reference cell
///
/// For [`FacetKind::Facet`], points on the reference simplex of dimension `d - 1` are mapped
/// onto facet `facet` of the reference simplex of dimension `d`. On the interval the facet is
/// a vertex, and the single point at that vertex is returned whatever the input.
pub fn map_facet_points(
    points: &[Vec<f64>],
    facet: usize,
    kind: FacetKind,
) -> Result<Vec<Vec<f64>>> {
    match kind {
        FacetKind::Facet => map_simplex_facet_points(points, facet),
        FacetKind::HorizFacet => {
            let last = match facet {
                0 => 0.0,
                1 => 1.0,
                _ => {
                    return Err(Error::InvalidFacet {
                        facet,
                        kind: kind.to_string(),
                    })
                }
            };
            Ok(points
                .iter()
                .map(|p| p.iter().cloned().chain([last]).collect())
                .collect())
        }
        FacetKind::VertFacet => {
            let base: Vec<Vec<f64>> = points
                .iter()
                .map(|p| p[..p.len().saturating_sub(1)].to_vec())
                .collect();
            let mapped = map_simplex_facet_points(&base, facet)?;
            Ok(points
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let m = if mapped.len() == 1 {
                        &mapped[0]
                    } else {
                        &mapped[i]
                    };
                    m.iter().cloned().chain(p.last().cloned()).collect()
                })
                .collect())
        }
    }
}

/// The facets of a cell that boundary integrals run over, in order
///
/// On a tensor product cell the vertical facets come first, followed by the horizontal ones.
pub fn boundary_regions(cell: &Cell) -> Vec<(FacetKind, usize)> {
    let kinds = match cell {
        Cell::Simple(_) => vec![FacetKind::Facet],
        Cell::TensorProduct(..) => vec![FacetKind::VertFacet, FacetKind::HorizFacet],
    };
    kinds
        .into_iter()
        .flat_map(|kind| (0..cell.num_facets(kind)).map(move |f| (kind, f)))
        .collect()
}

/// The vertices of a cell that the origin and the unit points of the reference facet are
/// mapped to
///
/// The first vertex is the image of the origin; the edges from it to the other vertices are
/// the images of the reference facet axes.
pub fn facet_vertices(cell: &Cell, kind: FacetKind, facet: usize) -> Result<Vec<usize>> {
    let m = cell.tdim().saturating_sub(1);
    let mut points = vec![vec![0.0; m]];
    for k in 0..m {
        let mut p = vec![0.0; m];
        p[k] = 1.0;
        points.push(p);
    }
    let vertices = cell.vertices();
    map_facet_points(&points, facet, kind)?
        .iter()
        .map(|p| {
            vertices
                .iter()
                .position(|v| v.len() == p.len() && v.iter().zip(p).all(|(a, b)| (a - b).abs() < 1e-12))
                .ok_or_else(|| Error::InvalidFacet {
                    facet,
                    kind: kind.to_string(),
                })
        })
        .collect()
}

fn map_simplex_facet_points(points: &[Vec<f64>], facet: usize) -> Result<Vec<Vec<f64>>> {
    let dim = points.first().map(|p| p.len() + 1).unwrap_or(1);
    let cell = match dim {
        1 => {
            return match facet {
                0 => Ok(vec![vec![0.0]]),
                1 => Ok(vec![vec![1.0]]),
                _ => Err(Error::InvalidFacet {
                    facet,
                    kind: FacetKind::Facet.to_string(),
                }),
            }
        }
        2 => ReferenceCellType::Triangle,
        3 => ReferenceCellType::Tetrahedron,
        _ => {
            return Err(Error::UnsupportedCell(format!(
                "simplex of dimension {dim}"
            )))
        }
    };
    let vertices = reference_cell::vertices(cell);
    let facets = reference_cell::facets(cell);
    let Some(facet_vertices) = facets.get(facet) else {
        return Err(Error::InvalidFacet {
            facet,
            kind: FacetKind::Facet.to_string(),
        });
    };
    let coordinates: Vec<&Vec<f64>> = facet_vertices.iter().map(|v| &vertices[*v]).collect();
    Ok(points
        .iter()
        .map(|p| {
            let w: Vec<f64> = [1.0 - p.iter().sum::<f64>()]
                .into_iter()
                .chain(p.iter().cloned())
                .collect();
            (0..dim)
                .map(|j| w.iter().zip(&coordinates).map(|(wi, c)| wi * c[j]).sum())
                .collect()
        })
        .collect())
}
