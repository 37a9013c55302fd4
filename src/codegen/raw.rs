//! Plain text dump of reference tensors

use crate::codegen::format::{c_float, index_string};
use crate::codegen::CodeGenOptions;
use crate::form::{Form, IntegralKind};
use crate::traits::CodeGenerator;
use crate::types::{Error, Result};
use std::fmt::Write;

/// The raw backend
///
/// Every entry of every reference tensor is written on its own line as
/// `i | a | value`, with the primary and secondary multi-indices separated by spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawGenerator;

impl CodeGenerator for RawGenerator {
    fn extension(&self) -> &'static str {
        "raw"
    }

    fn generate(&self, forms: &[Form], options: &CodeGenOptions) -> Result<String> {
        if forms.is_empty() {
            return Err(Error::EmptyFormList);
        }
        let precision = options.float_precision();
        let mut out = String::new();
        for form in forms {
            writeln!(out, "# form {} rank {}", form.name, form.rank)?;
            for kind in [IntegralKind::Interior, IntegralKind::Boundary] {
                for (t, term) in form.tensor(kind).terms.iter().enumerate() {
                    for r in 0..term.a0.num_regions() {
                        writeln!(out, "# {kind} term {t} region {r}")?;
                        for (i, index_i) in term.a0.i.indices.iter().enumerate() {
                            for (a, index_a) in term.a0.a.indices.iter().enumerate() {
                                writeln!(
                                    out,
                                    "{} | {} | {}",
                                    index_string(index_i, " "),
                                    index_string(index_a, " "),
                                    c_float(term.a0.value(r, i, a), precision)
                                )?;
                            }
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::{DefaultTabulator, ElementCache, ElementDescriptor, ElementResolver};
    use crate::form::{BasisFunction, Sum, TensorBuilder};
    use crate::traits::types::ReferenceCellType;

    #[test]
    fn test_mass_matrix() {
        let p1 = ElementDescriptor::new("Lagrange", ReferenceCellType::Interval, 1);
        let cache = ElementCache::new();
        let resolver = ElementResolver::new(&DefaultTabulator, &cache);
        let forms = TensorBuilder::new(&resolver)
            .build(
                &[Sum::from(BasisFunction::test(p1.clone()) * BasisFunction::trial(p1))],
                "mass",
            )
            .unwrap();
        let out = RawGenerator
            .generate(&forms, &CodeGenOptions::default().precision(4))
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "# form mass rank 2");
        assert_eq!(lines[1], "# interior term 0 region 0");
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[2], "0 0 |  | 3.3333e-01");
        assert_eq!(lines[3], "0 1 |  | 1.6667e-01");
    }
}
