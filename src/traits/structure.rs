//! Recursively nested structures

pub trait SubStructure {
    //! A node in a tree of nested elements or dof maps

    /// The number of sub-structures. A value of 1 marks a leaf.
    fn num_sub_structures(&self) -> usize;

    /// Get a sub-structure
    fn sub_structure(&self, i: usize) -> &Self;
}
