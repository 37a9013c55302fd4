//! General type definitions
pub mod cell;

pub use cell::{cell_to_num_entities, Cell, ReferenceCellType};
