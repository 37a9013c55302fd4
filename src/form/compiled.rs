//! Compiled forms

use crate::codegen::Format;
use crate::element::{DofMap, Element};
use crate::form::algebra::IntegralKind;
use crate::form::tensor::ElementTensor;
use crate::traits::types::Cell;
use crate::traits::FiniteElement;
use itertools::Itertools;
use std::sync::Arc;

/// A form compiled to tensor representation
#[derive(Debug, Clone)]
pub struct Form {
    /// The name of the form
    pub name: String,
    /// The number of arguments
    pub rank: usize,
    /// The space dimension of each argument
    pub dims: Vec<usize>,
    /// Every primary multi-index of the element tensor
    pub indices: Vec<Vec<usize>>,
    /// The element tensor of the integrals over the cell
    pub interior: ElementTensor,
    /// The element tensor of the integrals over exterior facets
    pub boundary: ElementTensor,
    /// The number of coefficient functions
    pub num_coefficients: usize,
    /// The number of constants
    pub num_constants: usize,
    /// The elements of the test and trial functions, in that order
    pub arguments: Vec<Arc<Element>>,
    /// The element of each coefficient function, if it is used
    pub coefficients: Vec<Option<Arc<Element>>>,
    /// The cell the form is defined on, if the form has any basis function
    pub cell: Option<Cell>,
    /// The output format
    pub format: Format,
}

impl Form {
    /// The element tensor of an integral kind
    pub fn tensor(&self, integral: IntegralKind) -> &ElementTensor {
        match integral {
            IntegralKind::Interior => &self.interior,
            IntegralKind::Boundary => &self.boundary,
        }
    }

    /// The elements of the arguments followed by the elements of the coefficients, with
    /// their numbers
    ///
    /// Coefficient `n` has number `arguments.len() + n`; unused coefficients are skipped.
    pub fn elements(&self) -> Vec<(usize, &Arc<Element>)> {
        let n = self.arguments.len();
        self.arguments
            .iter()
            .enumerate()
            .chain(
                self.coefficients
                    .iter()
                    .enumerate()
                    .filter_map(move |(i, e)| e.as_ref().map(|e| (n + i, e))),
            )
            .collect()
    }

    /// The dof maps of [`Form::elements`], with their numbers
    pub fn dof_maps(&self) -> Vec<(usize, DofMap)> {
        self.elements()
            .into_iter()
            .map(|(i, e)| (i, DofMap::new(e)))
            .collect()
    }

    /// A string that identifies the form
    pub fn signature(&self) -> String {
        format!(
            "Form {} of rank {} on {}",
            self.name,
            self.rank,
            self.elements()
                .iter()
                .map(|(_, e)| e.signature())
                .join(" x ")
        )
    }

    /// The number of entries of the element tensor
    pub fn tensor_size(&self) -> usize {
        self.dims.iter().product()
    }
}
