//! Finite elements

pub mod ciarlet;
pub mod descriptor;
pub mod dofmap;
pub mod finite_element;
pub mod jacobi;
pub mod polynomials;
pub mod quadrature_element;
pub mod reference_cell;
pub mod resolver;
pub mod structure;
pub mod tabulator;
pub mod tensor_product;
pub mod time;

pub use descriptor::{ElementDescriptor, RestrictionDomain};
pub use dofmap::DofMap;
pub use finite_element::Element;
pub use resolver::{ElementCache, ElementResolver};
pub use structure::extract_sub_structures;
pub use tabulator::DefaultTabulator;
