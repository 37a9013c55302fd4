//! Code generation traits

use crate::codegen::CodeGenOptions;
use crate::form::Form;
use crate::types::Result;

pub trait CodeGenerator {
    //! A backend that turns compiled forms into text

    /// The file extension of the generated file
    fn extension(&self) -> &'static str;

    /// Generate the text for a set of forms
    fn generate(&self, forms: &[Form], options: &CodeGenOptions) -> Result<String>;
}
