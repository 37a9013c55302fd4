//! Generation of code that evaluates the basis functions of an element at run time
//!
//! Instead of tabulating basis functions at compile time, the generated code evaluates the
//! orthonormal expansion set at the given point with the Jacobi recurrences and takes the
//! dot product with the expansion coefficients of the element. The expansion set is the
//! collapsed coordinate set on the triangle, evaluated on the biunit triangle.

use crate::codegen::format::{float, LinearCombination};
use crate::element::ciarlet::CiarletElement;
use crate::element::jacobi::{linear_coefficients, recurrence_coefficients};
use crate::element::polynomials::polynomial_count;
use crate::traits::types::ReferenceCellType;
use crate::traits::FiniteElement;
use crate::types::{Error, Result};
use itertools::Itertools;

/// The body of `evaluate_basis(i, values, coordinates)` for an element on a triangle
///
/// `coordinates` is a point of the UFC reference triangle and `i` the number of the basis
/// function. The values of the components are written to `values`.
pub fn evaluate_basis(element: &CiarletElement) -> Result<Vec<String>> {
    match element.cell_type() {
        ReferenceCellType::Triangle => {}
        ReferenceCellType::Tetrahedron => {
            return Err(Error::NotImplemented(
                "evaluation of basis functions on tetrahedra".to_string(),
            ))
        }
        cell => {
            return Err(Error::UnsupportedCell(format!(
                "basis functions can only be evaluated on triangles, not on {cell}"
            )))
        }
    }
    let degree = element.embedded_degree();
    let mut code = vec![];
    code.extend(tabulate_coefficients(element));
    code.extend(generate_map());
    code.extend(compute_scalings(degree));
    code.extend(compute_psitilde_a(degree));
    code.extend(compute_psitilde_bs(degree));
    code.extend(compute_basisvalues(degree));
    code.extend(dot_product(element));
    Ok(code)
}

fn coefficient_table_name(element: &CiarletElement, component: usize) -> String {
    if element.value_size() == 1 {
        "coefficients".to_string()
    } else {
        format!("coefficients_{component}")
    }
}

fn tabulate_coefficients(element: &CiarletElement) -> Vec<String> {
    let coefficients = element.coefficients();
    let num_dofs = coefficients.len();
    let npoly = polynomial_count(element.cell_type(), element.embedded_degree());
    let mut code = vec!["// Table of coefficients".to_string()];
    for c in 0..element.value_size() {
        code.push(format!(
            "const static double {}[{num_dofs}][{npoly}] = \\",
            coefficient_table_name(element, c)
        ));
        for (i, row) in coefficients.iter().enumerate() {
            let open = if i == 0 { "{{" } else { " {" };
            let close = if i + 1 == num_dofs { "}};" } else { "}," };
            code.push(format!(
                "{open}{}{close}",
                row[c].iter().map(|v| float(*v)).join(", ")
            ));
        }
        code.push(String::new());
    }
    code
}

fn generate_map() -> Vec<String> {
    vec![
        "// Get coordinates on the biunit reference triangle".to_string(),
        "double x = 2.0*coordinates[0] - 1.0;".to_string(),
        "double y = 2.0*coordinates[1] - 1.0;".to_string(),
        String::new(),
        "// Map coordinates to the reference square".to_string(),
        "if (std::abs(y - 1.0) < DOLFIN_EPS)".to_string(),
        "  x = -1.0;".to_string(),
        "else".to_string(),
        "  x = 2.0 * (1.0 + x)/(1.0 - y) - 1.0;".to_string(),
        String::new(),
    ]
}

fn compute_scalings(degree: usize) -> Vec<String> {
    let values = ["1.0".to_string()]
        .into_iter()
        .chain((1..degree + 1).map(|i| format!("scalings[{}]*(0.5 - 0.5 * y)", i - 1)))
        .join(", ");
    vec![
        "// Generate scalings".to_string(),
        format!("const double scalings[{}] = {{{values}}};", degree + 1),
        String::new(),
    ]
}

/// The entries `P_0, ..., P_n` of a Jacobi recurrence in the variable `var`, stored in `table`
fn recurrence_entries(a: f64, n: usize, var: &str, table: &str) -> Vec<String> {
    let mut entries = vec!["1.0".to_string()];
    if n == 0 {
        return entries;
    }
    let [c0, c1] = linear_coefficients(a, 0.0);
    entries.push(
        LinearCombination::new()
            .term(c0, "{}")
            .term(c1, format!("{{}}*{var}"))
            .joined(),
    );
    for (k, [a2, a3, m4]) in recurrence_coefficients(a, 0.0, n).iter().enumerate() {
        let (previous, before) = (k + 1, k);
        entries.push(
            LinearCombination::new()
                .term(*a2, format!("{{}} * {table}[{previous}]"))
                .term(*a3, format!("{{}} * {var} * {table}[{previous}]"))
                .term(*m4, format!("{{}} * {table}[{before}]"))
                .folded(),
        );
    }
    entries
}

fn compute_psitilde_a(degree: usize) -> Vec<String> {
    vec![
        "// Compute psitilde_a".to_string(),
        format!(
            "const double psitilde_a[{}] = {{{}}};",
            degree + 1,
            recurrence_entries(0.0, degree, "x", "psitilde_a").join(", ")
        ),
        String::new(),
    ]
}

fn compute_psitilde_bs(degree: usize) -> Vec<String> {
    let mut code = vec!["// Compute psitilde_bs".to_string()];
    for i in 0..degree + 1 {
        let table = format!("psitilde_bs_{i}");
        code.push(format!(
            "const double {table}[{}] = {{{}}};",
            degree + 1 - i,
            recurrence_entries(2.0 * i as f64 + 1.0, degree - i, "y", &table).join(", ")
        ));
    }
    code.push(String::new());
    code
}

fn compute_basisvalues(degree: usize) -> Vec<String> {
    let mut values = vec![];
    for k in 0..degree + 1 {
        for j in 0..k + 1 {
            let (ii, jj) = (k - j, j);
            let factor = ((ii as f64 + 0.5) * (ii as f64 + jj as f64 + 1.0)).sqrt();
            values.push(format!(
                "psitilde_a[{ii}] * scalings[{ii}] * psitilde_bs_{ii}[{jj}]*{}",
                float(factor)
            ));
        }
    }
    vec![
        "// Compute basisvalues".to_string(),
        format!(
            "const double basisvalues[{}] = {{{}}};",
            values.len(),
            values.join(", ")
        ),
        String::new(),
    ]
}

fn dot_product(element: &CiarletElement) -> Vec<String> {
    let npoly = polynomial_count(element.cell_type(), element.embedded_degree());
    let mut code = vec!["// Compute value".to_string()];
    for c in 0..element.value_size() {
        let value = if element.value_size() == 1 {
            "*values".to_string()
        } else {
            format!("values[{c}]")
        };
        code.push(format!("{value} = 0.0;"));
        code.push(format!("for (unsigned int j = 0; j < {npoly}; j++)"));
        code.push(format!(
            "  {value} += {}[i][j]*basisvalues[j];",
            coefficient_table_name(element, c)
        ));
    }
    code
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::ciarlet::{lagrange, vector};
    use crate::element::ciarlet::vector::VectorFamily;
    use paste::paste;

    fn find<'a>(code: &'a [String], prefix: &str) -> &'a str {
        code.iter()
            .find(|line| line.starts_with(prefix))
            .map(|line| line.as_str())
            .unwrap()
    }

    macro_rules! test_table_sizes {
        ($($degree:literal),+) => {
            $(
                paste! {
                    #[test]
                    fn [<test_table_sizes_degree_ $degree>]() {
                        let e = lagrange::create(ReferenceCellType::Triangle, $degree, false).unwrap();
                        let code = evaluate_basis(&e).unwrap();
                        let n = $degree + 1;
                        assert!(find(&code, "const double scalings[")
                            .starts_with(&format!("const double scalings[{n}]")));
                        assert!(find(&code, "const double psitilde_a[")
                            .starts_with(&format!("const double psitilde_a[{n}]")));
                        for i in 0..n {
                            let line = find(&code, &format!("const double psitilde_bs_{i}["));
                            assert!(line.starts_with(&format!("const double psitilde_bs_{i}[{}]", n - i)));
                        }
                        let dim = e.space_dimension();
                        assert!(find(&code, "const double basisvalues[")
                            .starts_with(&format!("const double basisvalues[{dim}]")));
                        assert!(find(&code, "const static double coefficients[")
                            .starts_with(&format!("const static double coefficients[{dim}][{dim}]")));
                    }
                }
            )*
        };
    }

    test_table_sizes!(1, 2, 3, 4);

    #[test]
    fn test_deterministic() {
        let a = lagrange::create(ReferenceCellType::Triangle, 3, false).unwrap();
        let b = lagrange::create(ReferenceCellType::Triangle, 3, false).unwrap();
        assert_eq!(evaluate_basis(&a).unwrap(), evaluate_basis(&b).unwrap());
    }

    #[test]
    fn test_linear_tables() {
        let e = lagrange::create(ReferenceCellType::Triangle, 1, false).unwrap();
        let code = evaluate_basis(&e).unwrap();
        assert_eq!(
            find(&code, "const double scalings["),
            "const double scalings[2] = {1.0, scalings[0]*(0.5 - 0.5 * y)};"
        );
        assert_eq!(
            find(&code, "const double psitilde_a["),
            "const double psitilde_a[2] = {1.0, 1.000000000000000e+00*x};"
        );
        assert_eq!(
            find(&code, "const double psitilde_bs_0["),
            "const double psitilde_bs_0[2] = {1.0, 5.000000000000000e-01 + 1.500000000000000e+00*y};"
        );
        assert_eq!(
            find(&code, "const double psitilde_bs_1["),
            "const double psitilde_bs_1[1] = {1.0};"
        );
        assert!(find(&code, "const double basisvalues[").starts_with(
            "const double basisvalues[3] = {psitilde_a[0] * scalings[0] * psitilde_bs_0[0]*7.071067811865476e-01, "
        ));
        assert_eq!(code.last().unwrap(), "  *values += coefficients[i][j]*basisvalues[j];");
    }

    #[test]
    fn test_recurrence_row() {
        let entries = recurrence_entries(0.0, 2, "x", "psitilde_a");
        assert_eq!(
            entries[2],
            "1.500000000000000e+00 * x * psitilde_a[1]-5.000000000000000e-01 * psitilde_a[0]"
        );
    }

    #[test]
    fn test_vector_element() {
        let e = vector::create(VectorFamily::RaviartThomas, ReferenceCellType::Triangle, 1).unwrap();
        let code = evaluate_basis(&e).unwrap();
        assert!(code.iter().any(|l| l.starts_with("const static double coefficients_1[3][3]")));
        assert!(code.iter().any(|l| l == "values[1] = 0.0;"));
    }

    #[test]
    fn test_unsupported_cells() {
        let e = lagrange::create(ReferenceCellType::Tetrahedron, 1, false).unwrap();
        assert!(matches!(evaluate_basis(&e), Err(Error::NotImplemented(_))));
        let e = lagrange::create(ReferenceCellType::Quadrilateral, 1, false).unwrap();
        assert!(matches!(evaluate_basis(&e), Err(Error::UnsupportedCell(_))));
    }
}
