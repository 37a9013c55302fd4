//! Trait definitions

mod codegen;
mod element;
mod structure;
pub mod types;

pub use codegen::CodeGenerator;
pub use element::{EntityDofs, FiniteElement, MapType, Table, Tabulator};
pub use structure::SubStructure;
