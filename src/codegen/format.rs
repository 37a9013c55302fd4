//! Formatting of numbers and expressions for generated code

use crate::form::tensor::Monomial;
use itertools::Itertools;

/// Coefficients smaller than this are treated as zero when emitting expressions
pub const ZERO_TOLERANCE: f64 = 1e-15;

/// Format a number like C's `%.{precision}e`, for example `1.000000000000000e+00`
pub fn c_float(value: f64, precision: usize) -> String {
    let s = format!("{value:.precision$e}");
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => s,
    }
}

/// Format a number like C's `%.15e`
pub fn float(value: f64) -> String {
    c_float(value, 15)
}

fn is_zero(value: f64) -> bool {
    value.abs() < ZERO_TOLERANCE
}

/// A linear combination of expressions, emitted with explicit sign folding
///
/// Each term is a coefficient and a template in which `{}` is replaced by the formatted
/// absolute value of the coefficient (or by the coefficient itself for the first term).
#[derive(Debug, Clone, Default)]
pub struct LinearCombination {
    terms: Vec<(f64, String)>,
}

impl LinearCombination {
    /// Create an empty combination
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term
    pub fn term(mut self, coefficient: f64, template: impl Into<String>) -> Self {
        self.terms.push((coefficient, template.into()));
        self
    }

    /// Emit the combination joined by `" + "`, or by `" "` when the last coefficient is
    /// negative, leaving every coefficient with its own sign
    ///
    /// This is the layout used for the closed-form first degree of a recurrence.
    pub fn joined(&self) -> String {
        let separator = match self.terms.last() {
            Some((c, _)) if *c < 0.0 => " ",
            _ => " + ",
        };
        self.terms
            .iter()
            .filter(|(c, _)| !is_zero(*c))
            .map(|(c, t)| t.replace("{}", &float(*c)))
            .join(separator)
    }

    /// Emit the combination with folded signs
    ///
    /// Terms with zero coefficients are dropped. The first term keeps the sign of its
    /// coefficient. Every later term is preceded by `-` if its coefficient is negative, by
    /// `+` if the coefficient of the term before it is non-zero, and by nothing otherwise,
    /// and is printed with the absolute value of its coefficient.
    pub fn folded(&self) -> String {
        let mut out = String::new();
        for (j, (c, template)) in self.terms.iter().enumerate() {
            if is_zero(*c) {
                continue;
            }
            if j == 0 {
                out += &template.replace("{}", &float(*c));
                continue;
            }
            if *c < 0.0 {
                out.push('-');
            } else if !is_zero(self.terms[j - 1].0) {
                out.push('+');
            }
            out += &template.replace("{}", &float(c.abs()));
        }
        out
    }
}

/// Emit a monomial, such as `2.000000000000000e+00*K_00*K_01/(detJ*detJ)`
pub fn monomial(m: &Monomial, precision: usize) -> String {
    let mut factors: Vec<String> = vec![];
    if m.coefficient != 1.0 || m.symbols.is_empty() {
        factors.push(c_float(m.coefficient, precision));
    }
    factors.extend(m.symbols.iter().map(|s| s.to_string()));
    let product = factors.join("*");
    match m.inverse_det_power {
        0 => product,
        1 => format!("{product}/detJ"),
        p => format!("{product}/({})", vec!["detJ"; p].join("*")),
    }
}

/// Emit a sum of monomials
pub fn polynomial(monomials: &[Monomial], precision: usize) -> String {
    if monomials.is_empty() {
        return c_float(0.0, precision);
    }
    monomials.iter().map(|m| monomial(m, precision)).join(" + ")
}

/// Join the entries of a multi-index with a separator
pub fn index_string(index: &[usize], separator: &str) -> String {
    index.iter().join(separator)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::form::tensor::Symbol;

    #[test]
    fn test_c_float() {
        assert_eq!(float(1.0), "1.000000000000000e+00");
        assert_eq!(float(-0.5), "-5.000000000000000e-01");
        assert_eq!(float(0.0), "0.000000000000000e+00");
        assert_eq!(float(1234.5), "1.234500000000000e+03");
        assert_eq!(float(1e-120), "1.000000000000000e-120");
        assert_eq!(c_float(0.25, 3), "2.500e-01");
    }

    #[test]
    fn test_joined() {
        let first = LinearCombination::new()
            .term(0.0, "{}")
            .term(1.0, "{}*x");
        assert_eq!(first.joined(), "1.000000000000000e+00*x");
        let first = LinearCombination::new()
            .term(0.5, "{}")
            .term(1.5, "{}*y");
        assert_eq!(
            first.joined(),
            "5.000000000000000e-01 + 1.500000000000000e+00*y"
        );
        let first = LinearCombination::new()
            .term(0.5, "{}")
            .term(-1.5, "{}*y");
        assert_eq!(
            first.joined(),
            "5.000000000000000e-01 -1.500000000000000e+00*y"
        );
    }

    #[test]
    fn test_folded() {
        let row = LinearCombination::new()
            .term(0.0, "{} * p[1]")
            .term(1.5, "{} * x * p[1]")
            .term(-0.5, "{} * p[0]");
        assert_eq!(
            row.folded(),
            "1.500000000000000e+00 * x * p[1]-5.000000000000000e-01 * p[0]"
        );
        let row = LinearCombination::new()
            .term(-0.25, "{} * p[1]")
            .term(2.0, "{} * y * p[1]")
            .term(-1.0, "{} * p[0]");
        assert_eq!(
            row.folded(),
            "-2.500000000000000e-01 * p[1]+2.000000000000000e+00 * y * p[1]-1.000000000000000e+00 * p[0]"
        );
    }

    #[test]
    fn test_monomials() {
        let m = Monomial {
            coefficient: 1.0,
            inverse_det_power: 2,
            symbols: vec![Symbol::Jacobian(0, 0), Symbol::Jacobian(0, 1)],
        };
        assert_eq!(monomial(&m, 15), "J_00*J_01/(detJ*detJ)");
        assert_eq!(monomial(&Monomial::one(), 3), "1.000e+00");
        let m = Monomial {
            coefficient: -2.0,
            inverse_det_power: 0,
            symbols: vec![Symbol::Coefficient(0, 1)],
        };
        assert_eq!(polynomial(&[m, Monomial::one()], 1), "-2.0e+00*w[0][1] + 1.0e+00");
        assert_eq!(polynomial(&[], 1), "0.0e+00");
    }
}
