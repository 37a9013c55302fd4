//! Generation of UFC conforming C++ headers
//!
//! Every form becomes a set of classes: one `ufc::finite_element` and one `ufc::dof_map` per
//! element and sub-element, a `ufc::cell_integral` and a `ufc::exterior_facet_integral` if the
//! form has terms of these kinds, and a `ufc::form`. Classes for elements with the same
//! signature are only generated once and aliased with `typedef`.
//!
//! Constants are passed to `tabulate_tensor` after the coefficients: constant `n` is read
//! from `w[num_coefficients + n][0]`.

use crate::codegen::evaluate_basis::evaluate_basis;
use crate::codegen::format::{c_float, index_string, polynomial};
use crate::codegen::CodeGenOptions;
use crate::element::{extract_sub_structures, DofMap, Element};
use crate::form::tensor::{ElementTensor, GeometryTensor};
use crate::form::{Form, IntegralKind};
use crate::quadrature::{boundary_regions, facet_vertices};
use crate::traits::types::Cell;
use crate::traits::{CodeGenerator, FiniteElement, SubStructure};
use crate::types::{Error, Result};
use itertools::Itertools;
use log::debug;
use std::collections::HashMap;

/// The C++ backend
#[derive(Debug, Clone, Copy, Default)]
pub struct CppGenerator;

impl CodeGenerator for CppGenerator {
    fn extension(&self) -> &'static str {
        "h"
    }

    fn generate(&self, forms: &[Form], options: &CodeGenOptions) -> Result<String> {
        if forms.is_empty() {
            return Err(Error::EmptyFormList);
        }
        let guard = format!("__{}_H", options.file_name(forms).to_uppercase());
        let mut code = header(options);
        code.push(format!("#ifndef {guard}"));
        code.push(format!("#define {guard}"));
        code.push(String::new());
        code.push("#include <cmath>".to_string());
        code.push("#include <stdexcept>".to_string());
        code.push("#include <ufc.h>".to_string());
        code.push(String::new());
        code.push("#ifndef DOLFIN_EPS".to_string());
        code.push("#define DOLFIN_EPS 3.0e-16".to_string());
        code.push("#endif".to_string());
        code.push(String::new());
        for form in forms {
            code.extend(form_code(form, options)?);
        }
        code.push("#endif".to_string());
        Ok(code.join("\n") + "\n")
    }
}

fn header(options: &CodeGenOptions) -> Vec<String> {
    let mut code = vec![
        "// This code conforms with the UFC specification version 1.0".to_string(),
        format!(
            "// and was automatically generated by formc version {}.",
            env!("CARGO_PKG_VERSION")
        ),
    ];
    let license = options.license_text();
    if !license.is_empty() {
        code.push("//".to_string());
        code.extend(license.lines().map(|l| format!("// {l}").trim_end().to_string()));
    }
    code.push(String::new());
    code
}

/// Escape a string for use in a C string literal
fn c_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn indent(lines: Vec<String>, n: usize) -> Vec<String> {
    let prefix = " ".repeat(n);
    lines
        .into_iter()
        .map(|l| {
            if l.is_empty() {
                l
            } else {
                format!("{prefix}{}", l.replace('\n', &format!("\n{prefix}")))
            }
        })
        .collect()
}

/// The UFC name of the shape of a cell
fn ufc_shape(cell: &Cell) -> Result<&'static str> {
    match cell {
        Cell::Simple(c) => match c.name() {
            "vertex" => Err(Error::UnsupportedCell(
                "UFC has no shape for a vertex".to_string(),
            )),
            name => Ok(name),
        },
        Cell::TensorProduct(..) => match (cell.tdim(), cell.num_vertices()) {
            (2, 4) => Ok("quadrilateral"),
            (3, 8) => Ok("hexahedron"),
            (3, 6) => Ok("prism"),
            _ => Err(Error::UnsupportedCell(format!(
                "UFC has no shape for {cell}"
            ))),
        },
    }
}

fn constructor_and_destructor(name: &str, base: &str, init: &[String]) -> Vec<String> {
    let mut code = vec![
        "/// Constructor".to_string(),
        format!("{name}() : ufc::{base}()"),
        "{".to_string(),
    ];
    if init.is_empty() {
        code.push("  // Do nothing".to_string());
    } else {
        code.extend(indent(init.to_vec(), 2));
    }
    code.extend([
        "}".to_string(),
        String::new(),
        "/// Destructor".to_string(),
        format!("virtual ~{name}()"),
        "{".to_string(),
        "  // Do nothing".to_string(),
        "}".to_string(),
        String::new(),
    ]);
    code
}

/// A member function with a documentation line
fn function(doc: &str, declaration: &str, body: Vec<String>) -> Vec<String> {
    let mut code = vec![format!("/// {doc}"), declaration.to_string(), "{".to_string()];
    code.extend(indent(body, 2));
    code.push("}".to_string());
    code.push(String::new());
    code
}

/// A switch statement that returns a value for each case, falling back to `default`
fn switch_return(variable: &str, cases: &[(usize, String)], default: &str) -> Vec<String> {
    if cases.is_empty() {
        return vec![format!("return {default};")];
    }
    let mut code = vec![format!("switch ({variable})"), "{".to_string()];
    for (case, value) in cases {
        code.push(format!("case {case}:"));
        code.push(format!("  return {value};"));
        code.push("  break;".to_string());
    }
    code.push("}".to_string());
    code.push(String::new());
    code.push(format!("return {default};"));
    code
}

fn class(doc: &[&str], name: &str, base: &str, body: Vec<String>) -> Vec<String> {
    let mut code: Vec<String> = doc.iter().map(|l| format!("/// {l}")).collect();
    code.push(String::new());
    code.push(format!("class {name}: public ufc::{base}"));
    code.push("{".to_string());
    code.extend(body);
    code.push("};".to_string());
    code.push(String::new());
    code
}

fn form_code(form: &Form, options: &CodeGenOptions) -> Result<Vec<String>> {
    debug!("Generating C++ code for form {}", form.name);
    let mut code = vec![];
    code.extend(element_classes(form)?);
    code.extend(dof_map_classes(form)?);
    if !form.interior.is_empty() {
        code.extend(cell_integral(form, options)?);
    }
    if !form.boundary.is_empty() {
        code.extend(exterior_facet_integral(form, options)?);
    }
    code.extend(form_class(form));
    Ok(code)
}

fn label_name(prefix: &str, label: &[usize]) -> String {
    format!("{prefix}_{}", index_string(label, "_"))
}

fn child_names<S: SubStructure>(prefix: &str, label: &[usize], node: &S) -> Vec<String> {
    match node.num_sub_structures() {
        1 => vec![],
        n => (0..n)
            .map(|i| {
                let mut child = label.to_vec();
                child.push(i);
                label_name(prefix, &child)
            })
            .collect(),
    }
}

fn element_classes(form: &Form) -> Result<Vec<String>> {
    let prefix = format!("{}_finite_element", form.name);
    let mut generated: HashMap<String, String> = HashMap::new();
    let mut code = vec![];
    for (number, element) in form.elements() {
        for (label, sub) in extract_sub_structures(&**element, &[number]) {
            let name = label_name(&prefix, &label);
            let signature = sub.signature();
            if let Some(first) = generated.get(&signature) {
                code.push(format!("typedef {first} {name};"));
                code.push(String::new());
                continue;
            }
            let children = child_names(&prefix, &label, sub);
            code.extend(element_class(&name, sub, &children)?);
            generated.insert(signature, name);
        }
    }
    Ok(code)
}

fn evaluate_basis_body(element: &Element) -> Vec<String> {
    let generated = match element.as_ciarlet() {
        Some(e) => evaluate_basis(e),
        None => Err(Error::NotImplemented(format!(
            "evaluation of basis functions of {} elements",
            element.family()
        ))),
    };
    match generated {
        Ok(lines) => lines,
        Err(e) => vec![format!(
            "throw std::runtime_error(\"{}\");",
            c_string(&e.to_string())
        )],
    }
}

fn element_class(name: &str, element: &Element, children: &[String]) -> Result<Vec<String>> {
    let value_shape = element.value_shape();
    let sub_elements: Vec<(usize, String)> = if children.is_empty() {
        vec![(0, format!("new {name}()"))]
    } else {
        children
            .iter()
            .enumerate()
            .map(|(i, c)| (i, format!("new {c}()")))
            .collect()
    };
    let mut body = vec!["public:".to_string(), String::new()];
    let mut members = constructor_and_destructor(name, "finite_element", &[]);
    members.extend(function(
        "Return a string identifying the finite element",
        "virtual const char* signature() const",
        vec![format!("return \"{}\";", c_string(&element.signature()))],
    ));
    members.extend(function(
        "Return the cell shape",
        "virtual ufc::shape cell_shape() const",
        vec![format!("return ufc::{};", ufc_shape(element.cell())?)],
    ));
    members.extend(function(
        "Return the dimension of the finite element function space",
        "virtual unsigned int space_dimension() const",
        vec![format!("return {};", element.space_dimension())],
    ));
    members.extend(function(
        "Return the rank of the value space",
        "virtual unsigned int value_rank() const",
        vec![format!("return {};", value_shape.len())],
    ));
    members.extend(function(
        "Return the dimension of the value space for axis i",
        "virtual unsigned int value_dimension(unsigned int i) const",
        switch_return(
            "i",
            &value_shape
                .iter()
                .enumerate()
                .map(|(i, d)| (i, d.to_string()))
                .collect::<Vec<_>>(),
            if value_shape.is_empty() { "1" } else { "0" },
        ),
    ));
    members.extend(function(
        "Evaluate basis function i at the given point of the reference cell",
        "virtual void evaluate_basis(unsigned int i,\n                            double* values,\n                            const double* coordinates) const",
        evaluate_basis_body(element),
    ));
    members.extend(function(
        "Return the number of sub elements (for a mixed element)",
        "virtual unsigned int num_sub_elements() const",
        vec![format!("return {};", sub_elements.len())],
    ));
    members.extend(function(
        "Create a new finite element for sub element i (for a mixed element)",
        "virtual ufc::finite_element* create_sub_element(unsigned int i) const",
        switch_return("i", &sub_elements, "0"),
    ));
    body.extend(indent(members, 2));
    Ok(class(
        &["This class defines the interface for a finite element."],
        name,
        "finite_element",
        body,
    ))
}

fn dof_map_classes(form: &Form) -> Result<Vec<String>> {
    let prefix = format!("{}_dof_map", form.name);
    let mut generated: HashMap<String, String> = HashMap::new();
    let mut code = vec![];
    for (number, dof_map) in form.dof_maps() {
        for (label, sub) in extract_sub_structures(&dof_map, &[number]) {
            let name = label_name(&prefix, &label);
            if let Some(first) = generated.get(sub.signature()) {
                code.push(format!("typedef {first} {name};"));
                code.push(String::new());
                continue;
            }
            let children = child_names(&prefix, &label, sub);
            code.extend(dof_map_class(&name, sub, &children)?);
            generated.insert(sub.signature().to_string(), name);
        }
    }
    Ok(code)
}

fn tabulate_dofs_body(dof_map: &DofMap) -> Vec<String> {
    let mut code = vec!["unsigned int offset = 0;".to_string()];
    let entity_dofs = dof_map.entity_dofs();
    for (d, entities) in entity_dofs.iter().enumerate() {
        let n = dof_map.num_entity_dofs(d);
        if n == 0 {
            continue;
        }
        code.push(String::new());
        for (e, dofs) in entities.iter().enumerate() {
            for (k, local) in dofs.iter().enumerate() {
                code.push(format!(
                    "dofs[{local}] = offset + {n}*c.entity_indices[{d}][{e}] + {k};"
                ));
            }
        }
        code.push(format!("offset += {n}*m.num_entities[{d}];"));
    }
    code
}

fn dof_map_class(name: &str, dof_map: &DofMap, children: &[String]) -> Result<Vec<String>> {
    let tdim = dof_map.entity_dofs().len();
    let dims: Vec<usize> = (0..tdim).collect();
    let global_dimension = dims
        .iter()
        .filter(|d| dof_map.num_entity_dofs(**d) > 0)
        .map(|d| format!("{}*m.num_entities[{d}]", dof_map.num_entity_dofs(*d)))
        .join(" + ");
    let global_dimension = if global_dimension.is_empty() {
        "0".to_string()
    } else {
        global_dimension
    };
    let mut facet_dofs = vec![];
    let mut facet = 0;
    while let Ok(dofs) = dof_map.tabulate_facet_dofs(facet) {
        facet_dofs.push(dofs);
        facet += 1;
    }
    let tabulate_facet_dofs = if facet_dofs.is_empty() {
        vec!["throw std::runtime_error(\"Facet dofs are not available for this cell\");".to_string()]
    } else {
        let mut body = vec!["switch (facet)".to_string(), "{".to_string()];
        for (f, dofs) in facet_dofs.iter().enumerate() {
            body.push(format!("case {f}:"));
            body.extend(
                dofs.iter()
                    .enumerate()
                    .map(|(k, dof)| format!("  dofs[{k}] = {dof};")),
            );
            body.push("  break;".to_string());
        }
        body.push("}".to_string());
        body
    };
    let sub_dof_maps: Vec<(usize, String)> = if children.is_empty() {
        vec![(0, format!("new {name}()"))]
    } else {
        children
            .iter()
            .enumerate()
            .map(|(i, c)| (i, format!("new {c}()")))
            .collect()
    };

    let mut body = vec![
        "private:".to_string(),
        String::new(),
        "  unsigned int __global_dimension;".to_string(),
        String::new(),
        "public:".to_string(),
        String::new(),
    ];
    let mut members =
        constructor_and_destructor(name, "dof_map", &["__global_dimension = 0;".to_string()]);
    members.extend(function(
        "Return a string identifying the dof map",
        "virtual const char* signature() const",
        vec![format!("return \"{}\";", c_string(dof_map.signature()))],
    ));
    members.extend(function(
        "Return true iff mesh entities of topological dimension d are needed",
        "virtual bool needs_mesh_entities(unsigned int d) const",
        switch_return(
            "d",
            &dims
                .iter()
                .map(|d| (*d, dof_map.needs_mesh_entities(*d).to_string()))
                .collect::<Vec<_>>(),
            "false",
        ),
    ));
    members.extend(function(
        "Initialize dof map for mesh (return true iff init_cell() is needed)",
        "virtual bool init_mesh(const ufc::mesh& m)",
        vec![
            format!("__global_dimension = {global_dimension};"),
            "return false;".to_string(),
        ],
    ));
    members.extend(function(
        "Initialize dof map for given cell",
        "virtual void init_cell(const ufc::mesh& m,\n                       const ufc::cell& c)",
        vec!["// Do nothing".to_string()],
    ));
    members.extend(function(
        "Finish initialization of dof map for cells",
        "virtual void init_cell_finalize()",
        vec!["// Do nothing".to_string()],
    ));
    members.extend(function(
        "Return the dimension of the global finite element function space",
        "virtual unsigned int global_dimension() const",
        vec!["return __global_dimension;".to_string()],
    ));
    members.extend(function(
        "Return the dimension of the local finite element function space",
        "virtual unsigned int local_dimension() const",
        vec![format!("return {};", dof_map.local_dimension())],
    ));
    members.extend(function(
        "Return the number of dofs on each cell facet",
        "virtual unsigned int num_facet_dofs() const",
        vec![format!("return {};", dof_map.num_facet_dofs())],
    ));
    members.extend(function(
        "Return the number of dofs associated with each cell entity of dimension d",
        "virtual unsigned int num_entity_dofs(unsigned int d) const",
        switch_return(
            "d",
            &dims
                .iter()
                .map(|d| (*d, dof_map.num_entity_dofs(*d).to_string()))
                .collect::<Vec<_>>(),
            "0",
        ),
    ));
    members.extend(function(
        "Tabulate the local-to-global mapping of dofs on a cell",
        "virtual void tabulate_dofs(unsigned int* dofs,\n                           const ufc::mesh& m,\n                           const ufc::cell& c) const",
        tabulate_dofs_body(dof_map),
    ));
    members.extend(function(
        "Tabulate the local-to-local mapping from facet dofs to cell dofs",
        "virtual void tabulate_facet_dofs(unsigned int* dofs,\n                                 unsigned int facet) const",
        tabulate_facet_dofs,
    ));
    members.extend(function(
        "Return the number of sub dof maps (for a mixed element)",
        "virtual unsigned int num_sub_dof_maps() const",
        vec![format!("return {};", sub_dof_maps.len())],
    ));
    members.extend(function(
        "Create a new dof_map for sub dof map i (for a mixed element)",
        "virtual ufc::dof_map* create_sub_dof_map(unsigned int i) const",
        switch_return("i", &sub_dof_maps, "0"),
    ));
    body.extend(indent(members, 2));
    Ok(class(
        &["This class defines the interface for a local-to-global mapping of", "degrees of freedom (dofs)."],
        name,
        "dof_map",
        body,
    ))
}

/// The vertices at the unit points of the reference axes
fn axis_vertices(cell: &Cell) -> Result<Vec<usize>> {
    let tdim = cell.tdim();
    let vertices = cell.vertices();
    (0..tdim)
        .map(|r| {
            vertices
                .iter()
                .position(|v| v.iter().enumerate().all(|(k, x)| *x == if k == r { 1.0 } else { 0.0 }))
                .ok_or_else(|| Error::UnsupportedCell(format!("{cell} has no vertex on axis {r}")))
        })
        .collect()
}

/// The cofactor `(a, b)` of a 3 by 3 Jacobian
fn cofactor(a: usize, b: usize) -> String {
    let (a1, a2) = ((a + 1) % 3, (a + 2) % 3);
    let (b1, b2) = ((b + 1) % 3, (b + 2) % 3);
    format!("(J_{a1}{b1}*J_{a2}{b2} - J_{a1}{b2}*J_{a2}{b1})")
}

/// Code that computes the Jacobian of the affine map from the reference cell, its
/// determinant and its inverse
fn jacobian(cell: &Cell) -> Result<Vec<String>> {
    let tdim = cell.tdim();
    let mut code = vec![
        "// Extract vertex coordinates".to_string(),
        "const double * const * x = c.coordinates;".to_string(),
        String::new(),
    ];
    if tdim == 0 {
        code.push("const double detJ = 1.0;".to_string());
        return Ok(code);
    }
    code.push("// Compute Jacobian of affine map from reference cell".to_string());
    let axes = axis_vertices(cell)?;
    for i in 0..tdim {
        for (j, v) in axes.iter().enumerate() {
            code.push(format!("const double J_{i}{j} = x[{v}][{i}] - x[0][{i}];"));
        }
    }
    code.push(String::new());
    code.push("// Compute determinant of Jacobian".to_string());
    let (det, inverse) = match tdim {
        1 => ("J_00".to_string(), vec![("00", "1.0".to_string())]),
        2 => (
            "J_00*J_11 - J_01*J_10".to_string(),
            vec![
                ("00", "J_11".to_string()),
                ("01", "-J_01".to_string()),
                ("10", "-J_10".to_string()),
                ("11", "J_00".to_string()),
            ],
        ),
        3 => {
            let det = (0..3).map(|b| format!("J_0{b}*{}", cofactor(0, b))).join(" + ");
            code.push(format!("const double detJ = {det};"));
            code.push(String::new());
            code.push("// Compute inverse of Jacobian".to_string());
            for i in 0..3 {
                for j in 0..3 {
                    code.push(format!("const double K_{i}{j} = {}/detJ;", cofactor(j, i)));
                }
            }
            code.push(String::new());
            return Ok(code);
        }
        _ => {
            return Err(Error::UnsupportedCell(format!(
                "no Jacobian for cells of dimension {tdim}"
            )))
        }
    };
    code.push(format!("const double detJ = {det};"));
    code.push(String::new());
    code.push("// Compute inverse of Jacobian".to_string());
    for (entry, numerator) in inverse {
        code.push(format!("const double K_{entry} = {numerator} / detJ;"));
    }
    code.push(String::new());
    Ok(code)
}

fn constants(form: &Form) -> Vec<String> {
    if form.num_constants == 0 {
        return vec![];
    }
    let mut code = vec!["// Extract constants".to_string()];
    for n in 0..form.num_constants {
        code.push(format!(
            "const double c{n} = w[{}][0];",
            form.num_coefficients + n
        ));
    }
    code.push(String::new());
    code
}

fn geometry_name(t: usize, a: &[usize]) -> String {
    if a.is_empty() {
        format!("G{t}")
    } else {
        format!("G{t}_{}", index_string(a, "_"))
    }
}

fn geometry_tensors(tensor: &ElementTensor, precision: usize) -> Vec<String> {
    let mut code = vec!["// Compute geometry tensors".to_string()];
    for (t, term) in tensor.terms.iter().enumerate() {
        let GeometryTensor { entries, .. } = &term.g;
        if entries.is_empty() {
            continue;
        }
        for (a, monomials) in entries {
            code.push(format!(
                "const double {} = det*({});",
                geometry_name(t, &term.a0.a.indices[*a]),
                polynomial(monomials, precision)
            ));
        }
        code.push(format!(
            "const double G_{t}[{}] = {{{}}};",
            entries.len(),
            entries
                .iter()
                .map(|(a, _)| geometry_name(t, &term.a0.a.indices[*a]))
                .join(", ")
        ));
    }
    code.push(String::new());
    code
}

/// Wrap the rows of a C array initializer in braces
fn braced(rows: Vec<String>) -> Vec<String> {
    let n = rows.len();
    rows.into_iter()
        .enumerate()
        .map(|(k, row)| {
            let open = if k == 0 { "{" } else { " " };
            let close = if k + 1 == n { "};" } else { "," };
            format!("{open}{row}{close}")
        })
        .collect()
}

/// The static reference tensor of each term, restricted to the secondary indices where the
/// geometry tensor does not vanish
///
/// Boundary tensors carry a leading index over the facets.
fn reference_tables(tensor: &ElementTensor, precision: usize) -> Vec<String> {
    let boundary = tensor.integral == IntegralKind::Boundary;
    let mut code = vec!["// Reference tensors".to_string()];
    for (t, term) in tensor.terms.iter().enumerate() {
        let num_entries = term.g.entries.len();
        if num_entries == 0 {
            continue;
        }
        let num_indices = term.a0.i.size();
        let row = |r: usize, i: usize| {
            format!(
                "{{{}}}",
                term.g
                    .entries
                    .iter()
                    .map(|(a, _)| c_float(term.a0.value(r, i, *a), precision))
                    .join(", ")
            )
        };
        if boundary {
            let regions = term.a0.num_regions();
            code.push(format!(
                "static const double A0_{t}[{regions}][{num_indices}][{num_entries}] = \\"
            ));
            code.extend(braced(
                (0..regions)
                    .map(|r| format!("{{{}}}", (0..num_indices).map(|i| row(r, i)).join(", ")))
                    .collect(),
            ));
        } else {
            code.push(format!(
                "static const double A0_{t}[{num_indices}][{num_entries}] = \\"
            ));
            code.extend(braced((0..num_indices).map(|i| row(0, i)).collect()));
        }
        code.push(String::new());
    }
    code
}

/// The contraction `A_i = sum_a A0_{ia} G_a`, summed over the terms
fn element_tensor(form: &Form, tensor: &ElementTensor) -> Vec<String> {
    let size = form.tensor_size();
    let region = match tensor.integral {
        IntegralKind::Boundary => "[facet]",
        IntegralKind::Interior => "",
    };
    let mut code = vec![
        "// Compute element tensor".to_string(),
        format!("for (unsigned int i = 0; i < {size}; i++)"),
        "  A[i] = 0.0;".to_string(),
    ];
    for (t, term) in tensor.terms.iter().enumerate() {
        let num_entries = term.g.entries.len();
        if num_entries == 0 {
            continue;
        }
        code.push(format!("for (unsigned int i = 0; i < {size}; i++)"));
        code.push(format!("  for (unsigned int a = 0; a < {num_entries}; a++)"));
        code.push(format!("    A[i] += A0_{t}{region}[i][a]*G_{t}[a];"));
    }
    code
}

fn form_cell(form: &Form) -> Result<&Cell> {
    form.cell
        .as_ref()
        .ok_or_else(|| Error::UnsupportedIntegral(format!("form {} has no cell", form.name)))
}

fn cell_integral(form: &Form, options: &CodeGenOptions) -> Result<Vec<String>> {
    let precision = options.float_precision();
    let name = format!("{}_cell_integral_0", form.name);
    let mut tabulate = jacobian(form_cell(form)?)?;
    tabulate.push("// Set scale factor".to_string());
    tabulate.push("const double det = std::abs(detJ);".to_string());
    tabulate.push(String::new());
    tabulate.extend(constants(form));
    tabulate.extend(reference_tables(&form.interior, precision));
    tabulate.extend(geometry_tensors(&form.interior, precision));
    tabulate.extend(element_tensor(form, &form.interior));

    let mut body = vec!["public:".to_string(), String::new()];
    let mut members = constructor_and_destructor(&name, "cell_integral", &[]);
    members.extend(function(
        "Tabulate the tensor for the contribution from a local cell",
        "virtual void tabulate_tensor(double* A,\n                             const double * const * w,\n                             const ufc::cell& c) const",
        tabulate,
    ));
    body.extend(indent(members, 2));
    Ok(class(
        &[
            "This class defines the interface for the tabulation of the cell",
            "tensor corresponding to the local contribution to a form from",
            "the integral over a cell.",
        ],
        &name,
        "cell_integral",
        body,
    ))
}

/// Code that computes the ratio of the measure of a physical facet to the measure of the
/// reference facet, from the Gram determinant of the facet edges
fn facet_determinant(cell: &Cell) -> Result<Vec<String>> {
    let gdim = cell.tdim();
    let mut code = vec![
        "// Compute facet determinant".to_string(),
        "double det = 0.0;".to_string(),
        "switch (facet)".to_string(),
        "{".to_string(),
    ];
    for (region, (kind, f)) in boundary_regions(cell).into_iter().enumerate() {
        let vertices = facet_vertices(cell, kind, f)?;
        code.push(format!("case {region}:"));
        code.push("  {".to_string());
        let origin = vertices[0];
        let edges = &vertices[1..];
        for (k, v) in edges.iter().enumerate() {
            let components = (0..gdim)
                .map(|i| format!("x[{v}][{i}] - x[{origin}][{i}]"))
                .join(", ");
            code.push(format!("    const double e{k}[{gdim}] = {{{components}}};"));
        }
        let dot = |a: usize, b: usize| (0..gdim).map(|i| format!("e{a}[{i}]*e{b}[{i}]")).join(" + ");
        let value = match edges.len() {
            0 => "1.0".to_string(),
            1 => format!("std::sqrt({})", dot(0, 0)),
            2 => {
                code.push(format!("    const double g00 = {};", dot(0, 0)));
                code.push(format!("    const double g01 = {};", dot(0, 1)));
                code.push(format!("    const double g11 = {};", dot(1, 1)));
                "std::sqrt(g00*g11 - g01*g01)".to_string()
            }
            n => {
                return Err(Error::UnsupportedIntegral(format!(
                    "facets of dimension {n} on {cell}"
                )))
            }
        };
        code.push(format!("    det = {value};"));
        code.push("  }".to_string());
        code.push("  break;".to_string());
    }
    code.push("}".to_string());
    code.push(String::new());
    Ok(code)
}

fn exterior_facet_integral(form: &Form, options: &CodeGenOptions) -> Result<Vec<String>> {
    let precision = options.float_precision();
    let name = format!("{}_exterior_facet_integral_0", form.name);
    let cell = form_cell(form)?;
    let mut tabulate = jacobian(cell)?;
    tabulate.extend(facet_determinant(cell)?);
    tabulate.extend(constants(form));
    tabulate.extend(reference_tables(&form.boundary, precision));
    tabulate.extend(geometry_tensors(&form.boundary, precision));
    tabulate.extend(element_tensor(form, &form.boundary));

    let mut body = vec!["public:".to_string(), String::new()];
    let mut members = constructor_and_destructor(&name, "exterior_facet_integral", &[]);
    members.extend(function(
        "Tabulate the tensor for the contribution from a local exterior facet",
        "virtual void tabulate_tensor(double* A,\n                             const double * const * w,\n                             const ufc::cell& c,\n                             unsigned int facet) const",
        tabulate,
    ));
    body.extend(indent(members, 2));
    Ok(class(
        &[
            "This class defines the interface for the tabulation of the",
            "exterior facet tensor corresponding to the local contribution to",
            "a form from the integral over an exterior facet.",
        ],
        &name,
        "exterior_facet_integral",
        body,
    ))
}

fn form_class(form: &Form) -> Vec<String> {
    let name = &form.name;
    let numbers: Vec<usize> = form.elements().iter().map(|(n, _)| *n).collect();
    let create = |kind: &str| -> Vec<(usize, String)> {
        numbers
            .iter()
            .map(|n| (*n, format!("new {name}_{kind}_{n}()")))
            .collect()
    };
    let integral = |kind: IntegralKind, suffix: &str| -> Vec<String> {
        if form.tensor(kind).is_empty() {
            vec!["return 0;".to_string()]
        } else {
            vec![format!("return new {name}_{suffix}_0();")]
        }
    };
    let count = |kind: IntegralKind| -> Vec<String> {
        vec![format!("return {};", usize::from(!form.tensor(kind).is_empty()))]
    };

    let mut body = vec!["public:".to_string(), String::new()];
    let mut members = constructor_and_destructor(name, "form", &[]);
    members.extend(function(
        "Return a string identifying the form",
        "virtual const char* signature() const",
        vec![format!("return \"{}\";", c_string(&form.signature()))],
    ));
    members.extend(function(
        "Return the rank of the global tensor (r)",
        "virtual unsigned int rank() const",
        vec![format!("return {};", form.rank)],
    ));
    members.extend(function(
        "Return the number of coefficients (n)",
        "virtual unsigned int num_coefficients() const",
        vec![format!("return {};", form.num_coefficients + form.num_constants)],
    ));
    members.extend(function(
        "Return the number of cell integrals",
        "virtual unsigned int num_cell_integrals() const",
        count(IntegralKind::Interior),
    ));
    members.extend(function(
        "Return the number of exterior facet integrals",
        "virtual unsigned int num_exterior_facet_integrals() const",
        count(IntegralKind::Boundary),
    ));
    members.extend(function(
        "Return the number of interior facet integrals",
        "virtual unsigned int num_interior_facet_integrals() const",
        vec!["return 0;".to_string()],
    ));
    members.extend(function(
        "Create a new finite element for argument function i",
        "virtual ufc::finite_element* create_finite_element(unsigned int i) const",
        switch_return("i", &create("finite_element"), "0"),
    ));
    members.extend(function(
        "Create a new dof map for argument function i",
        "virtual ufc::dof_map* create_dof_map(unsigned int i) const",
        switch_return("i", &create("dof_map"), "0"),
    ));
    members.extend(function(
        "Create a new cell integral on sub domain i",
        "virtual ufc::cell_integral* create_cell_integral(unsigned int i) const",
        integral(IntegralKind::Interior, "cell_integral"),
    ));
    members.extend(function(
        "Create a new exterior facet integral on sub domain i",
        "virtual ufc::exterior_facet_integral* create_exterior_facet_integral(unsigned int i) const",
        integral(IntegralKind::Boundary, "exterior_facet_integral"),
    ));
    members.extend(function(
        "Create a new interior facet integral on sub domain i",
        "virtual ufc::interior_facet_integral* create_interior_facet_integral(unsigned int i) const",
        vec!["return 0;".to_string()],
    ));
    body.extend(indent(members, 2));
    class(
        &[
            "This class defines the interface for the assembly of the global",
            "tensor corresponding to a form with r + n arguments, that is, a",
            "mapping",
            "",
            "    a : V1 x V2 x ... Vr x W1 x W2 x ... x Wn -> R",
            "",
            "with arguments v1, v2, ..., vr, w1, w2, ..., wn. The rank r",
            "global tensor A is defined by",
            "",
            "    A = a(V1, V2, ..., Vr, w1, w2, ..., wn),",
            "",
            "where each argument Vj represents the application to the",
            "sequence of basis functions of Vj and w1, w2, ..., wn are given",
            "fixed functions (coefficients).",
        ],
        name,
        "form",
        body,
    )
}
