//! A small symbolic algebra for multilinear forms
//!
//! A form is a sum of products. Each product multiplies a numeric factor, a list of constants
//! and a list of basis functions, and is integrated either over the cell or over its boundary.
//!
//! ```
//! use formc::element::ElementDescriptor;
//! use formc::form::{BasisFunction, Index, IntegralKind};
//! use formc::traits::types::ReferenceCellType;
//!
//! let element = ElementDescriptor::new("Lagrange", ReferenceCellType::Triangle, 1);
//! let v = BasisFunction::test(element.clone());
//! let u = BasisFunction::trial(element);
//! let a = v.dx(Index::Free(0)) * u.dx(Index::Free(0)) * IntegralKind::Interior;
//! assert_eq!(a.basis_functions().len(), 2);
//! ```

use crate::element::ElementDescriptor;
use std::fmt;
use std::ops::{Add, Mul};

/// The role of a basis function in a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Argument {
    /// The test function
    Test,
    /// The trial function
    Trial,
    /// A coefficient function, numbered from 0
    Function(usize),
}

/// An index into the components or derivatives of a basis function
///
/// Free indices with the same label are summed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    /// A fixed value
    Fixed(usize),
    /// A summation index
    Free(usize),
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Index::Fixed(i) => write!(f, "{i}"),
            Index::Free(i) => write!(f, "i{i}"),
        }
    }
}

/// The domain of integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegralKind {
    /// Integration over the cell
    Interior,
    /// Integration over the facets on the boundary of the domain
    Boundary,
}

impl fmt::Display for IntegralKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntegralKind::Interior => write!(f, "interior"),
            IntegralKind::Boundary => write!(f, "boundary"),
        }
    }
}

/// A basis function of a finite element space, possibly differentiated or indexed
#[derive(Debug, Clone, PartialEq)]
pub struct BasisFunction {
    element: ElementDescriptor,
    argument: Argument,
    component: Vec<Index>,
    derivatives: Vec<Index>,
}

impl BasisFunction {
    /// A basis function with a given role
    pub fn new(element: ElementDescriptor, argument: Argument) -> Self {
        Self {
            element,
            argument,
            component: vec![],
            derivatives: vec![],
        }
    }

    /// The test function
    pub fn test(element: ElementDescriptor) -> Self {
        Self::new(element, Argument::Test)
    }

    /// The trial function
    pub fn trial(element: ElementDescriptor) -> Self {
        Self::new(element, Argument::Trial)
    }

    /// Coefficient function number `n`
    pub fn function(element: ElementDescriptor, n: usize) -> Self {
        Self::new(element, Argument::Function(n))
    }

    /// Pick a value component
    pub fn component(mut self, i: Index) -> Self {
        self.component.push(i);
        self
    }

    /// Differentiate in a direction of physical space
    pub fn dx(mut self, i: Index) -> Self {
        self.derivatives.push(i);
        self
    }

    /// The element descriptor
    pub fn element(&self) -> &ElementDescriptor {
        &self.element
    }

    /// The role of the basis function
    pub fn argument(&self) -> Argument {
        self.argument
    }

    /// The component indices
    pub fn component_indices(&self) -> &[Index] {
        &self.component
    }

    /// The derivative indices
    pub fn derivative_indices(&self) -> &[Index] {
        &self.derivatives
    }

    /// All indices of the basis function
    pub fn indices(&self) -> impl Iterator<Item = &Index> {
        self.component.iter().chain(self.derivatives.iter())
    }
}

/// A constant, numbered from 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constant(pub usize);

/// A product of basis functions
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    factor: f64,
    constants: Vec<Constant>,
    basis_functions: Vec<BasisFunction>,
    integral: IntegralKind,
}

impl Product {
    /// A product of basis functions, integrated over the cell
    pub fn new(basis_functions: Vec<BasisFunction>) -> Self {
        Self {
            factor: 1.0,
            constants: vec![],
            basis_functions,
            integral: IntegralKind::Interior,
        }
    }

    /// The numeric factor
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// The constants
    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// The basis functions
    pub fn basis_functions(&self) -> &[BasisFunction] {
        &self.basis_functions
    }

    /// The domain of integration
    pub fn integral(&self) -> IntegralKind {
        self.integral
    }

    /// The test function, if there is one
    pub fn test(&self) -> Option<&BasisFunction> {
        self.basis_functions
            .iter()
            .find(|b| b.argument == Argument::Test)
    }

    /// The trial function, if there is one
    pub fn trial(&self) -> Option<&BasisFunction> {
        self.basis_functions
            .iter()
            .find(|b| b.argument == Argument::Trial)
    }

    /// The numbers of the coefficient functions used
    pub fn function_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.basis_functions.iter().filter_map(|b| match b.argument {
            Argument::Function(n) => Some(n),
            _ => None,
        })
    }

    /// The numbers of the constants used
    pub fn constant_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.constants.iter().map(|c| c.0)
    }

    /// The number of test and trial functions in the product
    pub fn rank(&self) -> usize {
        usize::from(self.test().is_some()) + usize::from(self.trial().is_some())
    }
}

impl From<BasisFunction> for Product {
    fn from(b: BasisFunction) -> Self {
        Product::new(vec![b])
    }
}

/// A sum of products
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sum {
    products: Vec<Product>,
}

impl Sum {
    /// A sum of products
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The products
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The number of coefficient functions: one more than the highest number used
    pub fn num_functions(&self) -> usize {
        self.products
            .iter()
            .flat_map(|p| p.function_indices())
            .max()
            .map_or(0, |n| n + 1)
    }

    /// The number of constants: one more than the highest number used
    pub fn num_constants(&self) -> usize {
        self.products
            .iter()
            .flat_map(|p| p.constant_indices())
            .max()
            .map_or(0, |n| n + 1)
    }

    /// The first basis function with a given role
    pub fn find(&self, argument: Argument) -> Option<&BasisFunction> {
        self.products
            .iter()
            .flat_map(|p| p.basis_functions.iter())
            .find(|b| b.argument == argument)
    }
}

impl From<Product> for Sum {
    fn from(p: Product) -> Self {
        Sum::new(vec![p])
    }
}

impl Mul<BasisFunction> for BasisFunction {
    type Output = Product;
    fn mul(self, rhs: BasisFunction) -> Product {
        Product::new(vec![self, rhs])
    }
}

impl Mul<BasisFunction> for Product {
    type Output = Product;
    fn mul(mut self, rhs: BasisFunction) -> Product {
        self.basis_functions.push(rhs);
        self
    }
}

impl Mul<Product> for Product {
    type Output = Product;
    fn mul(mut self, rhs: Product) -> Product {
        self.factor *= rhs.factor;
        self.constants.extend(rhs.constants);
        self.basis_functions.extend(rhs.basis_functions);
        self
    }
}

impl Mul<Constant> for Product {
    type Output = Product;
    fn mul(mut self, rhs: Constant) -> Product {
        self.constants.push(rhs);
        self
    }
}

impl Mul<Constant> for BasisFunction {
    type Output = Product;
    fn mul(self, rhs: Constant) -> Product {
        Product::from(self) * rhs
    }
}

impl Mul<f64> for Product {
    type Output = Product;
    fn mul(mut self, rhs: f64) -> Product {
        self.factor *= rhs;
        self
    }
}

impl Mul<Product> for f64 {
    type Output = Product;
    fn mul(self, rhs: Product) -> Product {
        rhs * self
    }
}

impl Mul<BasisFunction> for f64 {
    type Output = Product;
    fn mul(self, rhs: BasisFunction) -> Product {
        Product::from(rhs) * self
    }
}

impl Mul<IntegralKind> for BasisFunction {
    type Output = Product;
    fn mul(self, rhs: IntegralKind) -> Product {
        Product::from(self) * rhs
    }
}

impl Mul<IntegralKind> for Product {
    type Output = Product;
    fn mul(mut self, rhs: IntegralKind) -> Product {
        self.integral = rhs;
        self
    }
}

impl Mul<IntegralKind> for Sum {
    type Output = Sum;
    fn mul(self, rhs: IntegralKind) -> Sum {
        Sum::new(self.products.into_iter().map(|p| p * rhs).collect())
    }
}

impl Add<Product> for Product {
    type Output = Sum;
    fn add(self, rhs: Product) -> Sum {
        Sum::new(vec![self, rhs])
    }
}

impl Add<Product> for Sum {
    type Output = Sum;
    fn add(mut self, rhs: Product) -> Sum {
        self.products.push(rhs);
        self
    }
}

impl Add<Sum> for Sum {
    type Output = Sum;
    fn add(mut self, rhs: Sum) -> Sum {
        self.products.extend(rhs.products);
        self
    }
}
