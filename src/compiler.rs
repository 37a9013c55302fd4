//! The compiler: build forms from sums of products and write code for them

use crate::codegen::{self, CodeGenOptions, Format, DEFAULT_LICENSE};
use crate::element::{DefaultTabulator, ElementCache, ElementResolver};
use crate::form::{Form, Sum, TensorBuilder};
use crate::traits::Tabulator;
use crate::types::Result;
use log::info;
use std::path::{Path, PathBuf};

/// Options for a compiler
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// The name of the forms and of the generated file
    name: String,
    /// The output format
    format: Format,
    /// The license banner written at the top of generated files
    license: String,
    /// The number of quadrature points in each direction, if not chosen per term
    num_points: Option<usize>,
    /// The number of digits after the decimal point of floating point literals
    precision: usize,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            name: "form".to_string(),
            format: Format::default(),
            license: DEFAULT_LICENSE.to_string(),
            num_points: None,
            precision: 15,
        }
    }
}

impl CompilerOptions {
    /// Set the name of the forms and of the generated file
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the output format by name
    ///
    /// No name selects C++.
    pub fn format(mut self, format: Option<&str>) -> Result<Self> {
        self.format = Format::from_name(format)?;
        Ok(self)
    }

    /// Set the license banner
    pub fn license(mut self, license: &str) -> Self {
        self.license = license.to_string();
        self
    }

    /// Set the number of quadrature points in each direction
    pub fn num_points(mut self, num_points: Option<usize>) -> Self {
        self.num_points = num_points;
        self
    }

    /// Set the number of digits after the decimal point of floating point literals
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// The output format
    pub fn output_format(&self) -> Format {
        self.format
    }

    /// The options passed to the code generators
    pub fn codegen_options(&self) -> CodeGenOptions {
        CodeGenOptions::default()
            .name(&self.name)
            .license(&self.license)
            .precision(self.precision)
    }
}

/// A form compiler
///
/// The compiler resolves elements with a tabulator and stores them in a cache that it
/// borrows, so a cache can be shared by several compilers.
pub struct Compiler<'a, T: Tabulator> {
    tabulator: &'a T,
    cache: &'a ElementCache,
    options: CompilerOptions,
}

impl<'a, T: Tabulator> Compiler<'a, T> {
    /// Create a compiler with default options
    pub fn new(tabulator: &'a T, cache: &'a ElementCache) -> Self {
        Self {
            tabulator,
            cache,
            options: CompilerOptions::default(),
        }
    }

    /// Create a compiler
    pub fn with_options(tabulator: &'a T, cache: &'a ElementCache, options: CompilerOptions) -> Self {
        Self {
            tabulator,
            cache,
            options,
        }
    }

    /// Get the compiler options
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Get mutable compiler options
    pub fn options_mut(&mut self) -> &mut CompilerOptions {
        &mut self.options
    }

    /// Build one form for each sum
    pub fn build(&self, sums: &[Sum]) -> Result<Vec<Form>> {
        let resolver = ElementResolver::new(self.tabulator, self.cache);
        let mut forms = TensorBuilder::new(&resolver)
            .num_points(self.options.num_points)
            .build(sums, &self.options.name)?;
        for form in forms.iter_mut() {
            form.format = self.options.format;
        }
        info!(
            "Built {} forms, {} elements in cache",
            forms.len(),
            self.cache.len()
        );
        Ok(forms)
    }

    /// Build one form for each sum and write code for them into `directory`
    ///
    /// Returns the path of the generated file, or `None` if there are no forms.
    pub fn compile(&self, sums: &[Sum], directory: &Path) -> Result<Option<PathBuf>> {
        let forms = self.build(sums)?;
        codegen::write(&forms, &self.options.codegen_options(), directory)
    }
}

/// Compile sums of products with the default tabulator and a new element cache
pub fn compile(sums: &[Sum], options: CompilerOptions, directory: &Path) -> Result<Option<PathBuf>> {
    let cache = ElementCache::new();
    Compiler::with_options(&DefaultTabulator, &cache, options).compile(sums, directory)
}
