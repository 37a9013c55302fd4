//! Forms and their tensor representation

pub mod algebra;
pub mod builder;
pub mod compiled;
pub mod tensor;

pub use algebra::{Argument, BasisFunction, Constant, Index, IntegralKind, Product, Sum};
pub use builder::TensorBuilder;
pub use compiled::Form;
pub use tensor::{ElementTensor, GeometryScale, GeometryTensor, Monomial, ReferenceTensor, Term};
