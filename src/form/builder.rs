//! Compilation of forms into element tensors
//!
//! Every product of a form becomes a [`Term`]. The reference tensor of a term is computed by
//! quadrature on the reference cell (or on each of its facets), and the geometry tensor is a
//! polynomial in the entries of the Jacobian, constants and coefficient values that holds
//! the contribution of the cell map and of the summation indices.

use crate::codegen::Format;
use crate::element::{Element, ElementResolver};
use crate::form::algebra::{Argument, Index, IntegralKind, Product, Sum};
use crate::form::compiled::Form;
use crate::form::tensor::{
    multi_indices, simplify, ElementTensor, GeometryScale, GeometryTensor, Monomial, MultiIndex,
    ReferenceTensor, SecondaryAxis, Symbol, Term,
};
use crate::quadrature::{
    boundary_regions, map_facet_points, quadrature_rule, FacetKind, QuadratureRule,
};
use crate::traits::types::{Cell, ReferenceCellType};
use crate::traits::{FiniteElement, MapType, Table, Tabulator};
use crate::types::{Error, Result};
use itertools::Itertools;
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A range of value components that is pushed forward as a unit
#[derive(Debug, Clone, Copy)]
struct ComponentBlock {
    offset: usize,
    size: usize,
    map: MapType,
}

fn component_blocks(element: &Element, offset: usize, blocks: &mut Vec<ComponentBlock>) {
    match element {
        Element::Mixed(e) => {
            let mut offset = offset;
            for sub in e.elements() {
                component_blocks(sub, offset, blocks);
                offset += sub.value_size();
            }
        }
        _ => blocks.push(ComponentBlock {
            offset,
            size: element.value_size(),
            map: element.map_type(),
        }),
    }
}

/// The coefficient of reference component `s` in physical component `c`
fn component_factor(blocks: &[ComponentBlock], c: usize, s: usize) -> Option<Monomial> {
    let block = blocks
        .iter()
        .find(|b| c >= b.offset && c < b.offset + b.size)?;
    if s < block.offset || s >= block.offset + block.size {
        return None;
    }
    let (c, s) = (c - block.offset, s - block.offset);
    match block.map {
        MapType::Identity => (c == s).then(Monomial::one),
        MapType::ContravariantPiola => Some(Monomial {
            coefficient: 1.0,
            inverse_det_power: 1,
            symbols: vec![Symbol::Jacobian(c, s)],
        }),
        MapType::CovariantPiola => Some(Monomial {
            coefficient: 1.0,
            inverse_det_power: 0,
            symbols: vec![Symbol::InverseJacobian(s, c)],
        }),
    }
}

/// Where the dof of a basis function comes from
#[derive(Debug, Clone, Copy)]
enum DofSource {
    Primary(usize),
    Secondary(usize),
}

/// How one basis function of a product enters the tensors of a term
struct BasisPlan {
    element: Arc<Element>,
    argument: Argument,
    dof: DofSource,
    component: Option<Index>,
    component_axis: Option<usize>,
    derivatives: Vec<(Index, usize)>,
    blocks: Vec<ComponentBlock>,
}

impl BasisPlan {
    fn dof(&self, i: &[usize], a: &[usize]) -> usize {
        match self.dof {
            DofSource::Primary(p) => i[p],
            DofSource::Secondary(p) => a[p],
        }
    }

    fn reference_component(&self, a: &[usize]) -> usize {
        self.component_axis.map_or(0, |p| a[p])
    }

    fn derivative_counts(&self, a: &[usize], tdim: usize) -> Vec<usize> {
        let mut counts = vec![0; tdim];
        for (_, axis) in &self.derivatives {
            counts[a[*axis]] += 1;
        }
        counts
    }
}

/// Check an index against the range it runs over, recording the range of free labels
fn check_index(index: Index, range: usize, ranges: &mut BTreeMap<usize, usize>) -> Result<()> {
    match index {
        Index::Fixed(n) if n >= range => Err(Error::UnsupportedIntegral(format!(
            "index {n} out of range {range}"
        ))),
        Index::Fixed(_) => Ok(()),
        Index::Free(label) => match ranges.insert(label, range) {
            Some(other) if other != range => Err(Error::UnsupportedIntegral(format!(
                "index {index} runs over both {other} and {range} values"
            ))),
            _ => Ok(()),
        },
    }
}

/// The cell of the facets of a simplex
fn simplex_facet_cell(cell: ReferenceCellType) -> Result<Cell> {
    match cell {
        ReferenceCellType::Interval => Ok(Cell::Simple(ReferenceCellType::Point)),
        ReferenceCellType::Triangle => Ok(Cell::Simple(ReferenceCellType::Interval)),
        ReferenceCellType::Tetrahedron => Ok(Cell::Simple(ReferenceCellType::Triangle)),
        _ => Err(Error::UnsupportedIntegral(format!(
            "boundary integrals on {cell}"
        ))),
    }
}

fn map_rule(rule: &QuadratureRule, facet: usize, kind: FacetKind, tdim: usize) -> Result<QuadratureRule> {
    Ok(QuadratureRule::new(
        tdim,
        map_facet_points(&rule.points, facet, kind)?,
        rule.weights.clone(),
    ))
}

/// Builds [`Form`]s from sums of products
pub struct TensorBuilder<'a, T: Tabulator> {
    resolver: &'a ElementResolver<'a, T>,
    num_points: Option<usize>,
}

impl<'a, T: Tabulator> TensorBuilder<'a, T> {
    /// Create a builder that resolves elements with `resolver`
    pub fn new(resolver: &'a ElementResolver<'a, T>) -> Self {
        Self {
            resolver,
            num_points: None,
        }
    }

    /// Set the number of quadrature points in each direction
    ///
    /// By default, a term whose elements have total degree `q` uses `(q + 2) / 2` points,
    /// which integrates the product of the basis functions exactly.
    pub fn num_points(mut self, num_points: Option<usize>) -> Self {
        self.num_points = num_points;
        self
    }

    /// Build one form for each sum
    ///
    /// A single form is called `name`; a list of forms is numbered `name_0`, `name_1`, ...
    pub fn build(&self, sums: &[Sum], name: &str) -> Result<Vec<Form>> {
        match sums {
            [sum] => Ok(vec![self.build_form(sum, name)?]),
            _ => sums
                .iter()
                .enumerate()
                .map(|(i, sum)| self.build_form(sum, &format!("{name}_{i}")))
                .collect(),
        }
    }

    /// Build a form
    pub fn build_form(&self, sum: &Sum, name: &str) -> Result<Form> {
        info!("Building form {name}");
        let num_coefficients = sum.num_functions();
        let num_constants = sum.num_constants();
        let find = |argument| {
            sum.find(argument)
                .map(|b| self.resolver.resolve(b.element()))
                .transpose()
        };
        let arguments: Vec<Arc<Element>> = [find(Argument::Test)?, find(Argument::Trial)?]
            .into_iter()
            .flatten()
            .collect();
        let coefficients = (0..num_coefficients)
            .map(|n| find(Argument::Function(n)))
            .collect::<Result<Vec<_>>>()?;

        let cell = match sum.products().iter().flat_map(|p| p.basis_functions()).next() {
            Some(b) => Some(self.resolver.resolve(b.element())?.cell().clone()),
            None if sum.products().is_empty() => None,
            None => return Err(Error::NoBasisFunctions(name.to_string())),
        };

        let mut interior = ElementTensor::empty(IntegralKind::Interior);
        let mut boundary = ElementTensor::empty(IntegralKind::Boundary);
        if let Some(cell) = &cell {
            for product in sum.products() {
                let term = self.build_term(product, cell)?;
                match product.integral() {
                    IntegralKind::Interior => interior.terms.push(term),
                    IntegralKind::Boundary => boundary.terms.push(term),
                }
            }
        }
        debug!(
            "Form {name}: {} interior terms, {} boundary terms",
            interior.terms.len(),
            boundary.terms.len()
        );

        let ranks: Vec<usize> = interior
            .terms
            .iter()
            .chain(&boundary.terms)
            .map(|t| t.a0.i.rank)
            .collect();
        if !ranks.iter().all_equal() {
            return Err(Error::RankMismatch {
                form: name.to_string(),
                ranks,
            });
        }
        let (rank, dims, indices) = match interior.terms.first().or(boundary.terms.first()) {
            Some(t) => (t.a0.i.rank, t.a0.i.dims.clone(), t.a0.i.indices.clone()),
            None => (0, vec![], vec![vec![]]),
        };

        Ok(Form {
            name: name.to_string(),
            rank,
            dims,
            indices,
            interior,
            boundary,
            num_coefficients,
            num_constants,
            arguments,
            coefficients,
            cell,
            format: Format::default(),
        })
    }

    fn build_term(&self, product: &Product, cell: &Cell) -> Result<Term> {
        let tdim = cell.tdim();
        let unpaired = product
            .basis_functions()
            .iter()
            .flat_map(|bf| bf.indices())
            .filter_map(|i| match i {
                Index::Free(label) => Some(*label),
                Index::Fixed(_) => None,
            })
            .counts()
            .into_iter()
            .filter(|(_, n)| *n == 1)
            .map(|(label, _)| label)
            .min();
        if let Some(label) = unpaired {
            return Err(Error::UnpairedIndex {
                index: Index::Free(label).to_string(),
            });
        }
        let trial_position = usize::from(product.test().is_some());

        let mut primary_dims = vec![];
        let mut secondary_dims = vec![];
        let mut axes = vec![];
        let mut ranges = BTreeMap::new();
        let mut plans = vec![];
        for (b, bf) in product.basis_functions().iter().enumerate() {
            let element = self.resolver.resolve(bf.element())?;
            if element.cell() != cell {
                return Err(Error::IncompatibleElements(format!(
                    "{} is not defined on {cell}",
                    element.signature()
                )));
            }
            let dof = match bf.argument() {
                Argument::Test => DofSource::Primary(0),
                Argument::Trial => DofSource::Primary(trial_position),
                Argument::Function(n) => {
                    axes.push(SecondaryAxis::Coefficient(n));
                    secondary_dims.push(element.space_dimension());
                    DofSource::Secondary(axes.len() - 1)
                }
            };

            let value_size = element.value_size();
            let component = match bf.component_indices() {
                [] if value_size == 1 => None,
                [i] => Some(*i),
                _ => {
                    return Err(Error::UnsupportedIntegral(format!(
                        "a basis function of {} needs exactly one component index",
                        element.signature()
                    )))
                }
            };
            if let Some(i) = component {
                check_index(i, value_size, &mut ranges)?;
            }
            let component_axis = if value_size > 1 {
                axes.push(SecondaryAxis::Component { basis: b });
                secondary_dims.push(value_size);
                Some(axes.len() - 1)
            } else {
                None
            };

            let mut derivatives = vec![];
            for (position, i) in bf.derivative_indices().iter().enumerate() {
                check_index(*i, tdim, &mut ranges)?;
                axes.push(SecondaryAxis::Derivative { basis: b, position });
                secondary_dims.push(tdim);
                derivatives.push((*i, axes.len() - 1));
            }

            let mut blocks = vec![];
            component_blocks(&element, 0, &mut blocks);
            plans.push(BasisPlan {
                element,
                argument: bf.argument(),
                dof,
                component,
                component_axis,
                derivatives,
                blocks,
            });
        }
        for argument in [Argument::Test, Argument::Trial] {
            if let Some(plan) = plans.iter().find(|p| p.argument == argument) {
                primary_dims.push(plan.element.space_dimension());
            }
        }

        let num_points = self.num_points.unwrap_or_else(|| {
            (plans.iter().map(|p| p.element.degree()).sum::<usize>() + 2) / 2
        });
        let i = MultiIndex::new(primary_dims);
        let a = MultiIndex::new(secondary_dims);

        let rules = self.regions(cell, product.integral(), num_points)?;
        let values = rules
            .iter()
            .map(|rule| reference_values(&plans, &i, &a, rule, tdim))
            .collect::<Result<Vec<_>>>()?;
        let g = geometry_tensor(product, &plans, &a, &ranges);
        debug!(
            "Term of rank {} with {} secondary indices, {} regions, {} non-zero geometry entries",
            i.rank,
            a.rank,
            values.len(),
            g.entries.len()
        );

        Ok(Term {
            a0: ReferenceTensor { i, a, axes, values },
            g,
            num_points,
        })
    }

    /// The quadrature rules, mapped into the reference cell, of every integration region
    fn regions(
        &self,
        cell: &Cell,
        integral: IntegralKind,
        num_points: usize,
    ) -> Result<Vec<QuadratureRule>> {
        let tabulator = self.resolver.tabulator();
        let tdim = cell.tdim();
        match (integral, cell) {
            (IntegralKind::Interior, _) => Ok(vec![quadrature_rule(tabulator, cell, num_points)?]),
            (IntegralKind::Boundary, Cell::Simple(c)) => {
                let rule = quadrature_rule(tabulator, &simplex_facet_cell(*c)?, num_points)?;
                boundary_regions(cell)
                    .into_iter()
                    .map(|(kind, f)| map_rule(&rule, f, kind, tdim))
                    .collect()
            }
            (IntegralKind::Boundary, Cell::TensorProduct(a, b)) => {
                let base = match &**a {
                    Cell::Simple(c) if b.tdim() == 1 => simplex_facet_cell(*c)?,
                    _ => {
                        return Err(Error::UnsupportedIntegral(format!(
                            "boundary integrals on {cell}"
                        )))
                    }
                };
                let vertical =
                    quadrature_rule(tabulator, &Cell::product(base, (**b).clone()), num_points)?;
                let horizontal = quadrature_rule(tabulator, a, num_points)?;
                boundary_regions(cell)
                    .into_iter()
                    .map(|(kind, f)| match kind {
                        FacetKind::HorizFacet => map_rule(&horizontal, f, kind, tdim),
                        _ => map_rule(&vertical, f, kind, tdim),
                    })
                    .collect()
            }
        }
    }
}

/// The entries of a reference tensor on one region, indexed by \[i\]\[a\]
fn reference_values(
    plans: &[BasisPlan],
    i: &MultiIndex,
    a: &MultiIndex,
    rule: &QuadratureRule,
    tdim: usize,
) -> Result<Vec<f64>> {
    let mut tables: HashMap<(usize, Vec<usize>), Table> = HashMap::new();
    let mut values = vec![0.0; i.size() * a.size()];
    for (ai, a_index) in a.indices.iter().enumerate() {
        let counts: Vec<Vec<usize>> = plans
            .iter()
            .map(|p| p.derivative_counts(a_index, tdim))
            .collect();
        for (b, c) in counts.iter().enumerate() {
            if !tables.contains_key(&(b, c.clone())) {
                let table = plans[b].element.tabulate(c, &rule.points)?;
                tables.insert((b, c.clone()), table);
            }
        }
        let factors: Vec<&Table> = counts
            .into_iter()
            .enumerate()
            .map(|key| &tables[&key])
            .collect();
        for (ii, i_index) in i.indices.iter().enumerate() {
            let mut total = 0.0;
            for (q, w) in rule.weights.iter().enumerate() {
                let mut v = *w;
                for (plan, table) in plans.iter().zip(&factors) {
                    v *= table[plan.dof(i_index, a_index)][plan.reference_component(a_index)][q];
                }
                total += v;
            }
            values[ii * a.size() + ai] = total;
        }
    }
    Ok(values)
}

/// The geometry tensor of a product, summing over every value of the free indices
fn geometry_tensor(
    product: &Product,
    plans: &[BasisPlan],
    a: &MultiIndex,
    ranges: &BTreeMap<usize, usize>,
) -> GeometryTensor {
    let labels: Vec<usize> = ranges.keys().cloned().collect();
    let assignments = multi_indices(&ranges.values().cloned().collect::<Vec<_>>());
    let scale = match product.integral() {
        IntegralKind::Interior => GeometryScale::CellDeterminant,
        IntegralKind::Boundary => GeometryScale::FacetDeterminant,
    };

    let mut entries = vec![];
    for (ai, a_index) in a.indices.iter().enumerate() {
        let mut monomials = vec![];
        'assignment: for values in &assignments {
            let assignment: HashMap<usize, usize> =
                labels.iter().cloned().zip(values.iter().cloned()).collect();
            let value = |index: Index| match index {
                Index::Fixed(n) => n,
                Index::Free(label) => assignment[&label],
            };
            let mut m = Monomial {
                coefficient: product.factor(),
                inverse_det_power: 0,
                symbols: product.constant_indices().map(Symbol::Constant).collect(),
            };
            for plan in plans {
                if let (Argument::Function(n), DofSource::Secondary(axis)) =
                    (plan.argument, plan.dof)
                {
                    m.symbols.push(Symbol::Coefficient(n, a_index[axis]));
                }
                let c = plan.component.map_or(0, value);
                match component_factor(&plan.blocks, c, plan.reference_component(a_index)) {
                    Some(f) => m = m * f,
                    None => continue 'assignment,
                }
                for (index, axis) in &plan.derivatives {
                    m.symbols
                        .push(Symbol::InverseJacobian(a_index[*axis], value(*index)));
                }
            }
            monomials.push(m);
        }
        let monomials = simplify(monomials);
        if !monomials.is_empty() {
            entries.push((ai, monomials));
        }
    }
    GeometryTensor { scale, entries }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::{DefaultTabulator, ElementCache, ElementDescriptor};
    use crate::form::algebra::{BasisFunction, Constant};
    use approx::assert_relative_eq;

    fn p(family: &str, cell: ReferenceCellType, degree: usize) -> ElementDescriptor {
        ElementDescriptor::new(family, cell, degree)
    }

    fn p1() -> ElementDescriptor {
        p("Lagrange", ReferenceCellType::Triangle, 1)
    }

    fn build(sum: Sum) -> Result<Form> {
        let cache = ElementCache::new();
        let resolver = ElementResolver::new(&DefaultTabulator, &cache);
        TensorBuilder::new(&resolver).build_form(&sum, "a")
    }

    #[test]
    fn test_mass_matrix() {
        let v = BasisFunction::test(p1());
        let u = BasisFunction::trial(p1());
        let form = build(Sum::from(v * u)).unwrap();
        assert_eq!(form.rank, 2);
        assert_eq!(form.dims, vec![3, 3]);
        assert_eq!(form.indices.len(), 9);
        assert!(form.boundary.is_empty());

        let term = &form.interior.terms[0];
        assert_eq!(term.a0.a.size(), 1);
        assert_eq!(term.a0.num_regions(), 1);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 2.0 / 24.0 } else { 1.0 / 24.0 };
                assert_relative_eq!(term.a0.value(0, 3 * i + j, 0), expected, epsilon = 1e-14);
            }
        }
        assert_eq!(term.g.scale, GeometryScale::CellDeterminant);
        assert_eq!(term.g.entries, vec![(0, vec![Monomial::one()])]);
    }

    #[test]
    fn test_poisson() {
        let v = BasisFunction::test(p1()).dx(Index::Free(0));
        let u = BasisFunction::trial(p1()).dx(Index::Free(0));
        let form = build(Sum::from(v * u)).unwrap();
        let term = &form.interior.terms[0];
        assert_eq!(term.a0.a.dims, vec![2, 2]);
        assert_eq!(
            term.a0.axes,
            vec![
                SecondaryAxis::Derivative {
                    basis: 0,
                    position: 0
                },
                SecondaryAxis::Derivative {
                    basis: 1,
                    position: 0
                }
            ]
        );
        // Basis functions 1 - x - y, x and y
        assert_relative_eq!(term.a0.value(0, 0, 0), 0.5, epsilon = 1e-14);
        assert_relative_eq!(term.a0.value(0, 1, 0), -0.5, epsilon = 1e-14);
        assert_relative_eq!(term.a0.value(0, 4, 0), 0.5, epsilon = 1e-14);
        assert_relative_eq!(term.a0.value(0, 5, 0), 0.0, epsilon = 1e-14);
        assert_relative_eq!(term.a0.value(0, 5, 1), 0.5, epsilon = 1e-14);

        assert_eq!(term.g.entries.len(), 4);
        let (index, g00) = &term.g.entries[0];
        assert_eq!(*index, 0);
        assert_eq!(g00.len(), 2);
        assert_eq!(
            g00[0].symbols,
            vec![Symbol::InverseJacobian(0, 0), Symbol::InverseJacobian(0, 0)]
        );
        assert_eq!(
            g00[1].symbols,
            vec![Symbol::InverseJacobian(0, 1), Symbol::InverseJacobian(0, 1)]
        );
    }

    #[test]
    fn test_entries_sum_to_volume() {
        for cell in [ReferenceCellType::Triangle, ReferenceCellType::Tetrahedron] {
            let e = p("Lagrange", cell, 2);
            let form = build(Sum::from(
                BasisFunction::test(e.clone()) * BasisFunction::trial(e),
            ))
            .unwrap();
            let total: f64 = form.interior.terms[0].a0.values[0].iter().sum();
            let volume = if cell == ReferenceCellType::Triangle {
                0.5
            } else {
                1.0 / 6.0
            };
            assert_relative_eq!(total, volume, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_boundary_term() {
        let v = BasisFunction::test(p1());
        let u = BasisFunction::trial(p1());
        let form = build(Sum::from(v * u * IntegralKind::Boundary)).unwrap();
        assert!(form.interior.is_empty());
        let term = &form.boundary.terms[0];
        assert_eq!(term.a0.num_regions(), 3);
        assert_eq!(term.g.scale, GeometryScale::FacetDeterminant);
        // Facet 0 joins vertices 1 and 2
        assert_relative_eq!(term.a0.value(0, 0, 0), 0.0, epsilon = 1e-14);
        assert_relative_eq!(term.a0.value(0, 4, 0), 1.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(term.a0.value(0, 5, 0), 1.0 / 6.0, epsilon = 1e-14);
        assert_relative_eq!(term.a0.value(2, 8, 0), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_extruded_boundary() {
        let e = ElementDescriptor::tensor_product(
            p1(),
            p("Lagrange", ReferenceCellType::Interval, 1),
        );
        let form = build(Sum::from(
            BasisFunction::test(e.clone()) * BasisFunction::trial(e) * IntegralKind::Boundary,
        ))
        .unwrap();
        let term = &form.boundary.terms[0];
        assert_eq!(term.a0.num_regions(), 5);
        for region in 0..3 {
            let total: f64 = term.a0.values[region].iter().sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-13);
        }
        for region in 3..5 {
            let total: f64 = term.a0.values[region].iter().sum();
            assert_relative_eq!(total, 0.5, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_coefficients_and_constants() {
        let v = BasisFunction::test(p1());
        let f = BasisFunction::function(p1(), 0);
        let form = build(Sum::from(2.0 * (v * f) * Constant(0))).unwrap();
        assert_eq!(form.rank, 1);
        assert_eq!(form.num_coefficients, 1);
        assert_eq!(form.num_constants, 1);
        assert_eq!(form.coefficients.len(), 1);
        let term = &form.interior.terms[0];
        assert_eq!(term.a0.axes, vec![SecondaryAxis::Coefficient(0)]);
        assert_relative_eq!(term.a0.value(0, 0, 1), 1.0 / 24.0, epsilon = 1e-14);
        assert_eq!(term.g.entries.len(), 3);
        let (index, g) = &term.g.entries[2];
        assert_eq!(*index, 2);
        assert_eq!(g[0].coefficient, 2.0);
        assert_eq!(
            g[0].symbols,
            vec![Symbol::Constant(0), Symbol::Coefficient(0, 2)]
        );
    }

    #[test]
    fn test_vector_mass() {
        let e = ElementDescriptor::vector("Lagrange", ReferenceCellType::Triangle, 1, None);
        let v = BasisFunction::test(e.clone()).component(Index::Free(0));
        let u = BasisFunction::trial(e).component(Index::Free(0));
        let form = build(Sum::from(v * u)).unwrap();
        assert_eq!(form.dims, vec![6, 6]);
        let term = &form.interior.terms[0];
        assert_eq!(term.a0.a.dims, vec![2, 2]);
        let indices: Vec<usize> = term.g.entries.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 3]);
        assert_relative_eq!(term.a0.value(0, 0, 0), 1.0 / 12.0, epsilon = 1e-14);
        assert_relative_eq!(term.a0.value(0, 0, 3), 0.0, epsilon = 1e-14);
        assert_relative_eq!(term.a0.value(0, 6 * 3 + 3, 3), 1.0 / 12.0, epsilon = 1e-14);
    }

    #[test]
    fn test_piola() {
        let rt = p("RT", ReferenceCellType::Triangle, 1);
        let v = BasisFunction::test(rt.clone()).component(Index::Fixed(0));
        let u = BasisFunction::trial(rt).component(Index::Fixed(0));
        let form = build(Sum::from(v * u)).unwrap();
        let g = &form.interior.terms[0].g;
        assert_eq!(g.entries.len(), 4);
        for (_, monomials) in &g.entries {
            assert_eq!(monomials.len(), 1);
            assert_eq!(monomials[0].inverse_det_power, 2);
        }
        assert_eq!(
            g.entries[1].1[0].symbols,
            vec![Symbol::Jacobian(0, 0), Symbol::Jacobian(0, 1)]
        );

        let n1 = p("N1curl", ReferenceCellType::Triangle, 1);
        let v = BasisFunction::test(n1).component(Index::Fixed(1));
        let form = build(Sum::from(Product::from(v))).unwrap();
        let g = &form.interior.terms[0].g;
        assert_eq!(g.entries[0].1[0].symbols, vec![Symbol::InverseJacobian(0, 1)]);
        assert_eq!(g.entries[0].1[0].inverse_det_power, 0);
    }

    #[test]
    fn test_rank() {
        let v = BasisFunction::test(p1());
        let u = BasisFunction::trial(p1());
        let form = build(v.clone() * u.clone() + v.clone() * u.clone() * IntegralKind::Boundary)
            .unwrap();
        assert_eq!(form.rank, 2);
        assert_eq!(form.arguments.len(), 2);

        let err = build(v.clone() * u * IntegralKind::Interior + Product::from(v) * IntegralKind::Boundary)
            .unwrap_err();
        match err {
            Error::RankMismatch { form, ranks } => {
                assert_eq!(form, "a");
                assert_eq!(ranks, vec![2, 1]);
            }
            _ => panic!("expected a rank mismatch"),
        }

        let empty = build(Sum::default()).unwrap();
        assert_eq!(empty.rank, 0);
        assert!(empty.cell.is_none());
    }

    #[test]
    fn test_constant_integrand() {
        let constant = Product::new(vec![]) * Constant(0);
        match build(Sum::from(constant)) {
            Err(Error::NoBasisFunctions(form)) => assert_eq!(form, "a"),
            other => panic!("expected an error, got {other:?}"),
        }
    }

    #[test]
    fn test_unpaired_index() {
        let v = BasisFunction::test(p1()).dx(Index::Free(0));
        let u = BasisFunction::trial(p1()).dx(Index::Free(1));
        match build(Sum::from(v * u)) {
            Err(Error::UnpairedIndex { index }) => assert_eq!(index, "i0"),
            other => panic!("expected an error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported() {
        let vector = ElementDescriptor::vector("Lagrange", ReferenceCellType::Triangle, 1, None);
        let v = BasisFunction::test(vector);
        assert!(matches!(
            build(Sum::from(Product::from(v))),
            Err(Error::UnsupportedIntegral(_))
        ));

        let v = BasisFunction::test(p1()).dx(Index::Fixed(2));
        assert!(matches!(
            build(Sum::from(Product::from(v))),
            Err(Error::UnsupportedIntegral(_))
        ));

        let v = BasisFunction::test(p1());
        let u = BasisFunction::trial(p("Lagrange", ReferenceCellType::Tetrahedron, 1));
        assert!(matches!(
            build(Sum::from(v * u)),
            Err(Error::IncompatibleElements(_))
        ));

        let q = p("Lagrange", ReferenceCellType::Quadrilateral, 1);
        let v = BasisFunction::test(q) * IntegralKind::Boundary;
        assert!(matches!(
            build(Sum::from(v)),
            Err(Error::UnsupportedIntegral(_))
        ));
    }

    #[test]
    fn test_names_and_quadrature_override() {
        let cache = ElementCache::new();
        let resolver = ElementResolver::new(&DefaultTabulator, &cache);
        let v = BasisFunction::test(p1());
        let u = BasisFunction::trial(p1());
        let forms = TensorBuilder::new(&resolver)
            .num_points(Some(4))
            .build(&[Sum::from(v.clone() * u), Sum::from(Product::from(v))], "poisson")
            .unwrap();
        assert_eq!(forms[0].name, "poisson_0");
        assert_eq!(forms[1].name, "poisson_1");
        assert_eq!(forms[1].interior.terms[0].num_points, 4);
        assert_eq!(cache.len(), 1);
    }
}
