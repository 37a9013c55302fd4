//! Code generation backends

pub mod cpp;
pub mod evaluate_basis;
pub mod format;
pub mod latex;
pub mod raw;

pub use cpp::CppGenerator;
pub use latex::LatexGenerator;
pub use raw::RawGenerator;

use crate::form::Form;
use crate::traits::CodeGenerator;
use crate::types::{Error, Result};
use log::info;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The license banner written at the top of generated files by default
pub const DEFAULT_LICENSE: &str = "This code is released under the BSD 3-Clause license.";

/// An output format
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// A C++ header
    #[default]
    Cpp,
    /// A LaTeX report
    Latex,
    /// A plain dump of the reference tensors
    Raw,
}

impl Format {
    /// Select a format by name; no name selects C++
    pub fn from_name(name: Option<&str>) -> Result<Self> {
        name.map_or(Ok(Format::Cpp), Format::from_str)
    }

    /// The file extension of generated files
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Cpp => CppGenerator.extension(),
            Format::Latex => LatexGenerator.extension(),
            Format::Raw => RawGenerator.extension(),
        }
    }

    /// Generate the text for a set of forms with the backend of this format
    pub fn generate(&self, forms: &[Form], options: &CodeGenOptions) -> Result<String> {
        match self {
            Format::Cpp => CppGenerator.generate(forms, options),
            Format::Latex => LatexGenerator.generate(forms, options),
            Format::Raw => RawGenerator.generate(forms, options),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "C++" | "c++" => Ok(Format::Cpp),
            "LaTeX" | "latex" => Ok(Format::Latex),
            "raw" => Ok(Format::Raw),
            _ => Err(Error::UnknownTargetFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Cpp => write!(f, "C++"),
            Format::Latex => write!(f, "LaTeX"),
            Format::Raw => write!(f, "raw"),
        }
    }
}

/// Options for code generation
#[derive(Debug, Clone)]
pub struct CodeGenOptions {
    /// The name of the generated file, which defaults to the name of the first form
    name: Option<String>,
    /// The license banner
    license: String,
    /// The number of digits after the decimal point of floating point literals
    precision: usize,
}

impl Default for CodeGenOptions {
    fn default() -> Self {
        Self {
            name: None,
            license: DEFAULT_LICENSE.to_string(),
            precision: 15,
        }
    }
}

impl CodeGenOptions {
    /// Set the name of the generated file
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the license banner
    pub fn license(mut self, license: &str) -> Self {
        self.license = license.to_string();
        self
    }

    /// Set the number of digits after the decimal point of floating point literals
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// The name of the file generated for a set of forms
    pub fn file_name(&self, forms: &[Form]) -> String {
        match (&self.name, forms.first()) {
            (Some(name), _) => name.clone(),
            (None, Some(form)) => form.name.clone(),
            (None, None) => "form".to_string(),
        }
    }

    /// The license banner
    pub fn license_text(&self) -> &str {
        &self.license
    }

    /// The number of digits after the decimal point of floating point literals
    pub fn float_precision(&self) -> usize {
        self.precision
    }
}

/// Write code for a set of forms into `directory`
///
/// All forms are written in the format of the first form. Returns the path of the generated
/// file, or `None` if there are no forms.
pub fn write(
    forms: &[Form],
    options: &CodeGenOptions,
    directory: &Path,
) -> Result<Option<PathBuf>> {
    let Some(first) = forms.first() else {
        info!("No forms specified, nothing to do.");
        return Ok(None);
    };
    let format = first.format;
    let text = format.generate(forms, options)?;
    let path = directory.join(format!(
        "{}.{}",
        options.file_name(forms),
        format.extension()
    ));
    std::fs::write(&path, text)?;
    info!("Wrote {} code for {} forms to {}", format, forms.len(), path.display());
    Ok(Some(path))
}
