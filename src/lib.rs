//! formc
//!
//! A compiler for finite element variational forms. Forms are written as sums of products
//! of basis functions, compiled to a tensor representation and emitted as UFC conforming
//! C++ code, a LaTeX report or a plain dump of the reference tensors.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod codegen;
pub mod compiler;
pub mod element;
pub mod form;
pub mod quadrature;
pub mod traits;
pub mod types;

pub use compiler::{compile, Compiler, CompilerOptions};
pub use types::{Error, Result};
