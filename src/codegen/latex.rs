//! Generation of LaTeX reports of compiled forms

use crate::codegen::format::{c_float, index_string, monomial, ZERO_TOLERANCE};
use crate::codegen::CodeGenOptions;
use crate::form::tensor::{SecondaryAxis, Term};
use crate::form::{Form, GeometryScale, IntegralKind};
use crate::quadrature::boundary_regions;
use crate::traits::{CodeGenerator, FiniteElement};
use crate::types::{Error, Result};
use itertools::Itertools;
use log::debug;

/// The LaTeX backend
///
/// The report lists, for each form, its elements and the entries of the reference and
/// geometry tensors of every term.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatexGenerator;

impl CodeGenerator for LatexGenerator {
    fn extension(&self) -> &'static str {
        "tex"
    }

    fn generate(&self, forms: &[Form], options: &CodeGenOptions) -> Result<String> {
        if forms.is_empty() {
            return Err(Error::EmptyFormList);
        }
        let mut code = vec![
            "% This report was automatically generated by formc.".to_string(),
        ];
        code.extend(options.license_text().lines().map(|l| format!("% {l}")));
        code.extend([
            String::new(),
            "\\documentclass[a4paper]{article}".to_string(),
            "\\usepackage{amsmath}".to_string(),
            String::new(),
            format!("\\title{{{}}}", escape(&options.file_name(forms))),
            "\\begin{document}".to_string(),
            "\\maketitle".to_string(),
            String::new(),
        ]);
        for form in forms {
            code.extend(form_section(form, options.float_precision()));
        }
        code.push("\\end{document}".to_string());
        Ok(code.join("\n") + "\n")
    }
}

/// Escape the characters of a string that are special in LaTeX text
fn escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '_' | '&' | '%' | '$' | '#' | '{' | '}' => format!("\\{c}"),
            c => c.to_string(),
        })
        .collect()
}

fn form_section(form: &Form, precision: usize) -> Vec<String> {
    debug!("Generating LaTeX report for form {}", form.name);
    let mut code = vec![
        format!("\\section{{Form {}}}", escape(&form.name)),
        String::new(),
        "\\begin{itemize}".to_string(),
        format!("\\item Rank: {}", form.rank),
        format!("\\item Coefficients: {}", form.num_coefficients),
        format!("\\item Constants: {}", form.num_constants),
        format!(
            "\\item Cell: {}",
            form.cell
                .as_ref()
                .map_or("none".to_string(), |c| escape(&c.to_string()))
        ),
        format!(
            "\\item Element tensor: ${}$",
            if form.dims.is_empty() {
                "1".to_string()
            } else {
                form.dims.iter().join(" \\times ")
            }
        ),
        "\\end{itemize}".to_string(),
        String::new(),
    ];
    let elements = form.elements();
    if !elements.is_empty() {
        code.push("\\subsection*{Elements}".to_string());
        code.push(String::new());
        code.push("\\begin{enumerate}".to_string());
        code.extend(
            elements
                .iter()
                .map(|(n, e)| format!("\\item[{n}] \\texttt{{{}}}", escape(&e.signature()))),
        );
        code.push("\\end{enumerate}".to_string());
        code.push(String::new());
    }
    for kind in [IntegralKind::Interior, IntegralKind::Boundary] {
        let tensor = form.tensor(kind);
        let regions = match (&form.cell, kind) {
            (Some(cell), IntegralKind::Boundary) => boundary_regions(cell)
                .iter()
                .map(|(k, f)| format!("{k} {f}"))
                .collect(),
            _ => vec!["cell".to_string()],
        };
        for (t, term) in tensor.terms.iter().enumerate() {
            code.extend(term_section(kind, t, term, &regions, precision));
        }
    }
    code
}

fn axis_name(axis: &SecondaryAxis) -> String {
    match axis {
        SecondaryAxis::Coefficient(n) => format!("dofs of $w_{{{n}}}$"),
        SecondaryAxis::Component { basis } => format!("component of $\\phi_{{{basis}}}$"),
        SecondaryAxis::Derivative { basis, position } => {
            format!("derivative {position} of $\\phi_{{{basis}}}$")
        }
    }
}

fn term_section(
    kind: IntegralKind,
    t: usize,
    term: &Term,
    regions: &[String],
    precision: usize,
) -> Vec<String> {
    let mut code = vec![
        format!("\\subsection{{Term {t} ({kind})}}"),
        String::new(),
        format!(
            "The reference tensor has {} primary and {} secondary indices and was computed with {} quadrature points per direction.",
            term.a0.i.rank, term.a0.a.rank, term.num_points
        ),
    ];
    if !term.a0.axes.is_empty() {
        code.push(format!(
            "The secondary indices run over: {}.",
            term.a0.axes.iter().map(axis_name).join(", ")
        ));
    }
    code.push(String::new());
    code.push("\\paragraph{Geometry tensor}".to_string());
    code.push("\\begin{align*}".to_string());
    let scale = match term.g.scale {
        GeometryScale::CellDeterminant => "|\\det J|",
        GeometryScale::FacetDeterminant => "|\\det J_f|",
    };
    for (a, monomials) in &term.g.entries {
        let value = monomials
            .iter()
            .map(|m| math(&monomial(m, precision)))
            .join(" + ");
        code.push(format!(
            "G_{{{}}} &= {scale} \\left({value}\\right) \\\\",
            index_string(&term.a0.a.indices[*a], "")
        ));
    }
    code.push("\\end{align*}".to_string());
    code.push(String::new());
    for (r, region) in regions.iter().enumerate().take(term.a0.num_regions()) {
        code.push(format!(
            "\\paragraph{{Reference tensor ({})}}",
            escape(region)
        ));
        code.push("\\begin{align*}".to_string());
        for (i, index) in term.a0.i.indices.iter().enumerate() {
            for (a, _) in &term.g.entries {
                let v = term.a0.value(r, i, *a);
                if v.abs() < ZERO_TOLERANCE {
                    continue;
                }
                code.push(format!(
                    "A^0_{{{}, {}}} &= {} \\\\",
                    index_string(index, ""),
                    index_string(&term.a0.a.indices[*a], ""),
                    c_float(v, precision)
                ));
            }
        }
        code.push("\\end{align*}".to_string());
        code.push(String::new());
    }
    code
}

/// Rewrite a C expression of geometry symbols in math mode
fn math(expression: &str) -> String {
    let mut out = expression
        .replace('*', " ")
        .replace("/(detJ detJ)", " / (\\det J)^2")
        .replace("/detJ", " / \\det J");
    for (from, to) in [("J_", "J_{"), ("K_", "K_{")] {
        let mut replaced = String::new();
        let mut rest = out.as_str();
        while let Some(p) = rest.find(from) {
            replaced += &rest[..p];
            replaced += to;
            let digits = &rest[p + from.len()..];
            let n = digits.chars().take_while(|c| c.is_ascii_digit()).count();
            replaced += &digits[..n];
            replaced.push('}');
            rest = &digits[n..];
        }
        replaced += rest;
        out = replaced;
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::{DefaultTabulator, ElementCache, ElementDescriptor, ElementResolver};
    use crate::form::{BasisFunction, Index, Sum, TensorBuilder};
    use crate::traits::types::ReferenceCellType;

    fn compile(sum: Sum, name: &str) -> String {
        let cache = ElementCache::new();
        let resolver = ElementResolver::new(&DefaultTabulator, &cache);
        let forms = TensorBuilder::new(&resolver).build(&[sum], name).unwrap();
        LatexGenerator
            .generate(&forms, &CodeGenOptions::default())
            .unwrap()
    }

    fn p1() -> ElementDescriptor {
        ElementDescriptor::new("Lagrange", ReferenceCellType::Triangle, 1)
    }

    #[test]
    fn test_report() {
        let v = BasisFunction::test(p1()).dx(Index::Free(0));
        let u = BasisFunction::trial(p1()).dx(Index::Free(0));
        let code = compile(Sum::from(v * u), "my_form");
        assert!(code.contains("\\documentclass[a4paper]{article}"));
        assert!(code.contains("\\section{Form my\\_form}"));
        assert!(code.contains("\\item Element tensor: $3 \\times 3$"));
        assert!(code.contains("G_{00} &= |\\det J| \\left(K_{00} K_{00} + K_{01} K_{01}\\right) \\\\"));
        assert!(code.contains("A^0_{00, 00} &= 5.000000000000000e-01 \\\\"));
        assert!(code.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn test_boundary_regions() {
        let v = BasisFunction::test(p1());
        let u = BasisFunction::trial(p1());
        let code = compile(Sum::from(v * u * IntegralKind::Boundary), "m");
        assert!(code.contains("\\paragraph{Reference tensor (facet 0)}"));
        assert!(code.contains("\\paragraph{Reference tensor (facet 2)}"));
        assert!(code.contains("|\\det J_f|"));
    }

    #[test]
    fn test_math() {
        assert_eq!(math("J_00*K_12/(detJ*detJ)"), "J_{00} K_{12} / (\\det J)^2");
        assert_eq!(math("2.0e+00*w[0][1]"), "2.0e+00 w[0][1]");
        assert_eq!(escape("a_b%"), "a\\_b\\%");
    }
}
