//! Finite element definitions

use crate::element::polynomials::{polynomial_count, tabulate_derivative};
use crate::element::reference_cell;
use crate::quadrature::gauss_jacobi::make_quadrature;
use crate::traits::types::{Cell, ReferenceCellType};
use crate::traits::{EntityDofs, FiniteElement, MapType, Table};
use crate::types::{Error, Result};
use nalgebra::DMatrix;

pub mod lagrange;
pub mod vector;

/// Spanning set coefficients, indexed by \[member\]\[value component\]\[polynomial\]
pub type Span = Vec<Vec<Vec<f64>>>;

/// A functional that evaluates a weighted sum of value components at a point
#[derive(Debug, Clone, PartialEq)]
pub struct PointFunctional {
    /// The point
    pub point: Vec<f64>,
    /// The weight of each value component
    pub weights: Vec<f64>,
}

impl PointFunctional {
    /// Evaluation of a scalar at a point
    pub fn scalar(point: Vec<f64>) -> Self {
        Self {
            point,
            weights: vec![1.0],
        }
    }
}

/// A Ciarlet element
#[derive(Debug, Clone)]
pub struct CiarletElement {
    family: String,
    cell: Cell,
    cell_type: ReferenceCellType,
    degree: usize,
    embedded_degree: usize,
    map_type: MapType,
    value_shape: Vec<usize>,
    value_size: usize,
    coefficients: Vec<Vec<Vec<f64>>>,
    entity_dofs: EntityDofs,
}

impl CiarletElement {
    /// Create a Ciarlet element
    ///
    /// `span` gives the members of the polynomial space in the expansion set of degree
    /// `embedded_degree`. The dual basis is given by `functionals`, with dof `i` defined by
    /// `functionals[i]`. The basis functions are the members of the space dual to the
    /// functionals.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        family: &str,
        cell_type: ReferenceCellType,
        degree: usize,
        value_shape: Vec<usize>,
        span: Span,
        functionals: &[PointFunctional],
        entity_dofs: EntityDofs,
        map_type: MapType,
        embedded_degree: usize,
    ) -> Result<Self> {
        let dim = span.len();
        let value_size = value_shape.iter().product::<usize>();
        let pdim = polynomial_count(cell_type, embedded_degree);
        if functionals.len() != dim {
            return Err(Error::IncompatibleElements(format!(
                "{family}: {} functionals for a space of dimension {dim}",
                functionals.len()
            )));
        }
        for f in functionals {
            if f.weights.len() != value_size {
                return Err(Error::IncompatibleElements(format!(
                    "{family}: functional with {} weights for value size {value_size}",
                    f.weights.len()
                )));
            }
        }

        // Compute the dual matrix: entry (i, j) is functional i applied to member j
        let points: Vec<Vec<f64>> = functionals.iter().map(|f| f.point.clone()).collect();
        let tdim = reference_cell::dim(cell_type);
        let table = tabulate_derivative(cell_type, embedded_degree, &vec![0; tdim], &points)?;
        let d_matrix = DMatrix::from_fn(dim, dim, |i, j| {
            let mut value = 0.0;
            for (c, w) in functionals[i].weights.iter().enumerate() {
                for l in 0..pdim {
                    value += w * span[j][c][l] * table[l][i];
                }
            }
            value
        });
        let inverse = d_matrix.transpose().try_inverse().ok_or_else(|| {
            Error::SingularMatrix(format!("dual matrix of {family} of degree {degree}"))
        })?;

        let mut coefficients = vec![vec![vec![0.0; pdim]; value_size]; dim];
        for (i, row) in coefficients.iter_mut().enumerate() {
            for (j, member) in span.iter().enumerate() {
                let a = inverse[(i, j)];
                if a == 0.0 {
                    continue;
                }
                for (c, values) in row.iter_mut().enumerate() {
                    for (k, v) in values.iter_mut().enumerate() {
                        *v += a * member[c][k];
                    }
                }
            }
        }

        Ok(Self::from_coefficients(
            family,
            cell_type,
            degree,
            value_shape,
            coefficients,
            entity_dofs,
            map_type,
            embedded_degree,
        ))
    }

    /// Create an element directly from the expansion coefficients of its basis functions
    #[allow(clippy::too_many_arguments)]
    pub fn from_coefficients(
        family: &str,
        cell_type: ReferenceCellType,
        degree: usize,
        value_shape: Vec<usize>,
        coefficients: Vec<Vec<Vec<f64>>>,
        entity_dofs: EntityDofs,
        map_type: MapType,
        embedded_degree: usize,
    ) -> Self {
        let value_size = value_shape.iter().product::<usize>();
        Self {
            family: family.to_string(),
            cell: Cell::Simple(cell_type),
            cell_type,
            degree,
            embedded_degree,
            map_type,
            value_shape,
            value_size,
            coefficients,
            entity_dofs,
        }
    }

    /// The reference cell type
    pub fn cell_type(&self) -> ReferenceCellType {
        self.cell_type
    }

    /// The degree of the expansion set the coefficients refer to
    pub fn embedded_degree(&self) -> usize {
        self.embedded_degree
    }

    /// The expansion coefficients, indexed by \[dof\]\[value component\]\[polynomial\]
    pub fn coefficients(&self) -> &[Vec<Vec<f64>>] {
        &self.coefficients
    }

    /// The expansion coefficients lifted to an expansion set of a higher degree
    pub fn coefficients_in_degree(&self, degree: usize) -> Vec<Vec<Vec<f64>>> {
        let lifted = crate::element::polynomials::embed_indices(
            self.cell_type,
            self.embedded_degree,
            degree,
        );
        let pdim = polynomial_count(self.cell_type, degree);
        self.coefficients
            .iter()
            .map(|row| {
                row.iter()
                    .map(|values| {
                        let mut new = vec![0.0; pdim];
                        for (k, v) in values.iter().enumerate() {
                            new[lifted[k]] = *v;
                        }
                        new
                    })
                    .collect()
            })
            .collect()
    }

    /// Create the element whose basis is a subset of the basis of this element
    pub fn subset(&self, family: &str, dofs: &[usize], entity_dofs: EntityDofs) -> Self {
        Self::from_coefficients(
            family,
            self.cell_type,
            self.degree,
            self.value_shape.clone(),
            dofs.iter().map(|d| self.coefficients[*d].clone()).collect(),
            entity_dofs,
            self.map_type,
            self.embedded_degree,
        )
    }
}

impl FiniteElement for CiarletElement {
    fn family(&self) -> &str {
        &self.family
    }
    fn cell(&self) -> &Cell {
        &self.cell
    }
    fn degree(&self) -> usize {
        self.degree
    }
    fn value_shape(&self) -> Vec<usize> {
        self.value_shape.clone()
    }
    fn value_size(&self) -> usize {
        self.value_size
    }
    fn space_dimension(&self) -> usize {
        self.coefficients.len()
    }
    fn entity_dofs(&self) -> &EntityDofs {
        &self.entity_dofs
    }
    fn map_type(&self) -> MapType {
        self.map_type
    }
    fn tabulate(&self, derivative: &[usize], points: &[Vec<f64>]) -> Result<Table> {
        let table = tabulate_derivative(self.cell_type, self.embedded_degree, derivative, points)?;
        Ok(self
            .coefficients
            .iter()
            .map(|row| {
                row.iter()
                    .map(|values| {
                        (0..points.len())
                            .map(|p| {
                                values
                                    .iter()
                                    .zip(&table)
                                    .map(|(c, t)| c * t[p])
                                    .sum()
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect())
    }
    fn signature(&self) -> String {
        format!(
            "FiniteElement('{}', {}, {})",
            self.family, self.cell_type, self.degree
        )
    }
}

/// Coefficients of a function in the expansion set, computed by L2 projection
///
/// `f` returns the value components of the function at a point. The result is indexed by
/// \[value component\]\[polynomial\].
pub fn project(
    cell_type: ReferenceCellType,
    degree: usize,
    value_size: usize,
    f: impl Fn(&[f64]) -> Vec<f64>,
) -> Result<Vec<Vec<f64>>> {
    let tdim = reference_cell::dim(cell_type);
    let rule = make_quadrature(cell_type, degree + 2)?;
    let table = tabulate_derivative(cell_type, degree, &vec![0; tdim], &rule.points)?;
    // The expansion set is orthogonal with ∫ψ_iψ_i = 2^{-tdim}
    let scale = 2.0_f64.powi(tdim as i32);
    let mut coeffs = vec![vec![0.0; table.len()]; value_size];
    for (q, (p, w)) in rule.iter().enumerate() {
        let values = f(p);
        for (c, v) in values.iter().enumerate() {
            for (k, t) in table.iter().enumerate() {
                coeffs[c][k] += scale * w * v * t[q];
            }
        }
    }
    Ok(coeffs)
}
