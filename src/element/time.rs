//! Nodal elements on the time interval
//!
//! These are Lagrange-type elements on \[0, 1\] whose nodes are the points of a Gauss-Lobatto
//! or right Gauss-Radau rule. They are used for time stepping schemes.

use crate::element::ciarlet::lagrange::identity_span;
use crate::element::ciarlet::{CiarletElement, PointFunctional};
use crate::quadrature::gauss_jacobi::gauss_jacobi_points;
use crate::traits::types::ReferenceCellType;
use crate::traits::MapType;
use crate::types::{Error, Result};

/// Time element families
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TimeFamily {
    /// Nodes at the Gauss-Lobatto points, including both end points
    Lobatto,
    /// Nodes at the right Gauss-Radau points, including the end point 1
    Radau,
}

impl TimeFamily {
    /// The family name
    pub fn name(&self) -> &'static str {
        match self {
            TimeFamily::Lobatto => "Lobatto",
            TimeFamily::Radau => "Radau",
        }
    }
}

/// The nodes of a time element of degree `degree`, in increasing order on \[0, 1\]
pub fn nodes(family: TimeFamily, degree: usize) -> Vec<f64> {
    let interior = match family {
        // Interior Lobatto points are the roots of P'_q, which is a multiple of P_{q-1}^{(1,1)}
        TimeFamily::Lobatto => gauss_jacobi_points(1.0, 1.0, degree.saturating_sub(1)),
        TimeFamily::Radau => gauss_jacobi_points(1.0, 0.0, degree),
    };
    let mut x = vec![];
    if family == TimeFamily::Lobatto {
        x.push(-1.0);
    }
    x.extend(interior);
    x.push(1.0);
    x.iter().map(|xi| 0.5 * (xi + 1.0)).collect()
}

/// Create a time element
///
/// The Lobatto element of degree q has dofs 0 and q at the vertices of the interval and the
/// others in its interior. All dofs of the Radau element are in the interior.
pub fn create(family: TimeFamily, degree: usize) -> Result<CiarletElement> {
    if family == TimeFamily::Lobatto && degree == 0 {
        return Err(Error::TabulatorUnsupported {
            family: family.name().to_string(),
            cell: ReferenceCellType::Interval.to_string(),
            degree,
        });
    }
    let x = nodes(family, degree);
    let functionals: Vec<PointFunctional> =
        x.iter().map(|xi| PointFunctional::scalar(vec![*xi])).collect();
    let entity_dofs = match family {
        TimeFamily::Lobatto => vec![vec![vec![0], vec![degree]], vec![(1..degree).collect()]],
        TimeFamily::Radau => vec![vec![vec![], vec![]], vec![(0..degree + 1).collect()]],
    };
    CiarletElement::create(
        family.name(),
        ReferenceCellType::Interval,
        degree,
        vec![],
        identity_span(ReferenceCellType::Interval, degree),
        &functionals,
        entity_dofs,
        MapType::Identity,
        degree,
    )
}
