//! Tensor product elements on tensor product cells

use crate::element::finite_element::Element;
use crate::traits::types::Cell;
use crate::traits::{EntityDofs, FiniteElement, MapType, Table};
use crate::types::{Error, Result};
use std::sync::Arc;

/// The Sobolev space a scalar tensor product element is turned into a vector field for
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SobolevSpace {
    /// Continuous normal components
    HDiv,
    /// Continuous tangential components
    HCurl,
}

/// The tensor product of two elements
///
/// Basis function `i * n_b + j` is the product of basis function `i` of the first factor and
/// basis function `j` of the second factor, where `n_b` is the dimension of the second
/// factor. The dofs of an entity that is the product of an entity of dimension `d_a` and an
/// entity of dimension `d_b` are associated with dimension `d_a + d_b`.
#[derive(Debug, Clone)]
pub struct TensorProductElement {
    a: Arc<Element>,
    b: Arc<Element>,
    cell: Cell,
    entity_dofs: EntityDofs,
    value_shape: Vec<usize>,
    wrap: Option<(SobolevSpace, usize)>,
}

impl TensorProductElement {
    /// Create the tensor product of two elements
    pub fn new(a: Arc<Element>, b: Arc<Element>) -> Result<Self> {
        let value_shape = match (a.value_size(), b.value_size()) {
            (1, 1) => vec![],
            (_, 1) => a.value_shape(),
            (1, _) => b.value_shape(),
            _ => {
                return Err(Error::IncompatibleElements(format!(
                    "tensor product of two vector valued elements {} and {}",
                    a.signature(),
                    b.signature()
                )))
            }
        };
        let cell = Cell::product(a.cell().clone(), b.cell().clone());
        let nb = b.space_dimension();
        let (ea, eb) = (a.entity_dofs(), b.entity_dofs());
        let mut entity_dofs: EntityDofs = vec![vec![]; ea.len() + eb.len() - 1];
        for (da, entities_a) in ea.iter().enumerate() {
            for (db, entities_b) in eb.iter().enumerate() {
                for dofs_a in entities_a {
                    for dofs_b in entities_b {
                        let mut dofs = vec![];
                        for i in dofs_a {
                            for j in dofs_b {
                                dofs.push(i * nb + j);
                            }
                        }
                        entity_dofs[da + db].push(dofs);
                    }
                }
            }
        }
        Ok(Self {
            a,
            b,
            cell,
            entity_dofs,
            value_shape,
            wrap: None,
        })
    }

    /// Turn a scalar tensor product element into a vector field in H(div) or H(curl)
    ///
    /// The basis functions are placed in the single component dictated by the form degrees
    /// of the two factors: the component along the first factor when the first factor is a
    /// 1D element that carries the continuity, or the last component when the second factor
    /// does.
    pub fn wrap(mut self, space: SobolevSpace) -> Result<Self> {
        if !self.value_shape.is_empty() || self.wrap.is_some() {
            return Err(Error::IncompatibleElements(format!(
                "only scalar tensor product elements can be wrapped: {}",
                self.signature()
            )));
        }
        let (da, db) = (self.a.cell().tdim(), self.b.cell().tdim());
        let (ka, kb) = (self.a.form_degree(), self.b.form_degree());
        let n = da + db;
        let component = match space {
            SobolevSpace::HDiv if ka == da && kb + 1 == db => Some(n - 1),
            SobolevSpace::HDiv if da == 1 && ka == 0 && kb == db => Some(0),
            SobolevSpace::HCurl if da == 1 && ka == 1 && kb == 0 => Some(0),
            SobolevSpace::HCurl if db == 1 && ka == 0 && kb == 1 => Some(n - 1),
            _ => None,
        }
        .ok_or_else(|| {
            Error::IncompatibleElements(format!(
                "{} cannot be turned into an {space:?} element",
                self.signature()
            ))
        })?;
        self.value_shape = vec![n];
        self.wrap = Some((space, component));
        Ok(self)
    }

    /// The two factors
    pub fn factors(&self) -> (&Element, &Element) {
        (&self.a, &self.b)
    }

    /// The Sobolev space the element has been wrapped into, if any
    pub fn sobolev_space(&self) -> Option<SobolevSpace> {
        self.wrap.map(|(s, _)| s)
    }
}

impl FiniteElement for TensorProductElement {
    fn family(&self) -> &str {
        "OuterProductElement"
    }
    fn cell(&self) -> &Cell {
        &self.cell
    }
    fn degree(&self) -> usize {
        self.a.degree() + self.b.degree()
    }
    fn value_shape(&self) -> Vec<usize> {
        self.value_shape.clone()
    }
    fn space_dimension(&self) -> usize {
        self.a.space_dimension() * self.b.space_dimension()
    }
    fn entity_dofs(&self) -> &EntityDofs {
        &self.entity_dofs
    }
    fn map_type(&self) -> MapType {
        match self.wrap {
            Some((SobolevSpace::HDiv, _)) => MapType::ContravariantPiola,
            Some((SobolevSpace::HCurl, _)) => MapType::CovariantPiola,
            None => MapType::Identity,
        }
    }
    fn tabulate(&self, derivative: &[usize], points: &[Vec<f64>]) -> Result<Table> {
        let da = self.a.cell().tdim();
        if derivative.len() != self.cell.tdim() {
            return Err(Error::InvalidTabulation(format!(
                "derivative {derivative:?} on a cell of dimension {}",
                self.cell.tdim()
            )));
        }
        let points_a: Vec<Vec<f64>> = points.iter().map(|p| p[..da].to_vec()).collect();
        let points_b: Vec<Vec<f64>> = points.iter().map(|p| p[da..].to_vec()).collect();
        let ta = self.a.tabulate(&derivative[..da], &points_a)?;
        let tb = self.b.tabulate(&derivative[da..], &points_b)?;

        let value_size = self.value_size();
        let mut table = vec![];
        for ra in &ta {
            for rb in &tb {
                let mut row = vec![vec![0.0; points.len()]; value_size];
                for (ca, va) in ra.iter().enumerate() {
                    for (cb, vb) in rb.iter().enumerate() {
                        let c = match self.wrap {
                            Some((_, component)) => component,
                            None => ca.max(cb),
                        };
                        for (p, value) in row[c].iter_mut().enumerate() {
                            *value = va[p] * vb[p];
                        }
                    }
                }
                table.push(row);
            }
        }
        Ok(table)
    }
    fn signature(&self) -> String {
        let s = format!(
            "OuterProductElement({}, {})",
            self.a.signature(),
            self.b.signature()
        );
        match self.wrap {
            Some((SobolevSpace::HDiv, _)) => format!("HDiv({s})"),
            Some((SobolevSpace::HCurl, _)) => format!("HCurl({s})"),
            None => s,
        }
    }
}
