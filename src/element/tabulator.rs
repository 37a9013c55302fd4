//! The reference element tabulator shipped with the crate

use crate::element::ciarlet::vector::{self, VectorFamily};
use crate::element::ciarlet::{lagrange, CiarletElement};
use crate::quadrature::gauss_jacobi::make_quadrature;
use crate::quadrature::QuadratureRule;
use crate::traits::types::ReferenceCellType;
use crate::traits::Tabulator;
use crate::types::{Error, Result};

/// Tabulator that creates elements from orthonormal expansion sets on the UFC reference cells
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTabulator;

impl Tabulator for DefaultTabulator {
    fn create_element(
        &self,
        family: &str,
        cell: ReferenceCellType,
        degree: usize,
    ) -> Result<CiarletElement> {
        if cell == ReferenceCellType::Point {
            return Err(Error::UnsupportedCell(format!(
                "{family} elements cannot be created on a {cell}"
            )));
        }
        match family {
            "Lagrange" => lagrange::create(cell, degree, false),
            "Discontinuous Lagrange" => lagrange::create(cell, degree, true),
            "Crouzeix-Raviart" => lagrange::create_crouzeix_raviart(cell, degree),
            "Bubble" => lagrange::create_bubble(cell, degree),
            "Raviart-Thomas" => vector::create(VectorFamily::RaviartThomas, cell, degree),
            "Nedelec 1st kind H(curl)" => {
                vector::create(VectorFamily::NedelecFirstKind, cell, degree)
            }
            "Brezzi-Douglas-Marini" => {
                vector::create(VectorFamily::BrezziDouglasMarini, cell, degree)
            }
            "Nedelec 2nd kind H(curl)" => {
                vector::create(VectorFamily::NedelecSecondKind, cell, degree)
            }
            _ => Err(Error::TabulatorUnsupported {
                family: family.to_string(),
                cell: cell.to_string(),
                degree,
            }),
        }
    }

    fn quadrature(&self, cell: ReferenceCellType, num_points: usize) -> Result<QuadratureRule> {
        make_quadrature(cell, num_points)
    }
}
