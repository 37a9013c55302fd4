//! Types shared across the compiler

/// Errors raised while resolving elements, building tensors or emitting code
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The family is not in the set of supported families
    #[error("Unsupported element family: {0}")]
    UnsupportedFamily(String),
    /// The descriptor is none of the known element kinds
    #[error("Unsupported element type: {0}")]
    UnsupportedElementType(String),
    /// Restriction of an element that cannot be restricted
    #[error("Unable to restrict element: {0}")]
    UnsupportedRestriction(String),
    /// Restriction to a domain that is neither \"interior\" nor a cell
    #[error("Restriction to domain {0} is not supported")]
    UnsupportedRestrictionDomain(String),
    /// A facet kind other than facet, horiz_facet or vert_facet
    #[error("Unknown facet kind: {0}")]
    UnknownFacetKind(String),
    /// An output format that has no backend
    #[error("Unknown target format: {0}")]
    UnknownTargetFormat(String),
    /// The terms of a form do not all share the same primary rank
    #[error("Form {form} must be linear in each of its arguments, found ranks {ranks:?}")]
    RankMismatch {
        /// Name of the form
        form: String,
        /// Rank of every term, interior terms first
        ranks: Vec<usize>,
    },
    /// A backend was handed an empty list of forms
    #[error("No forms specified")]
    EmptyFormList,
    /// A cell that an operation does not support
    #[error("Unsupported cell: {0}")]
    UnsupportedCell(String),
    /// A family that the reference tabulator cannot create
    #[error("Tabulator cannot create {family} of degree {degree} on {cell}")]
    TabulatorUnsupported {
        /// Family name
        family: String,
        /// Cell name
        cell: String,
        /// Polynomial degree
        degree: usize,
    },
    /// A facet index that does not exist for the facet kind
    #[error("Invalid facet {facet} for facet kind {kind}")]
    InvalidFacet {
        /// Facet index
        facet: usize,
        /// Facet kind
        kind: String,
    },
    /// A quadrature rule that cannot be created
    #[error("Invalid quadrature: {0}")]
    InvalidQuadrature(String),
    /// Elements that cannot be combined
    #[error("Incompatible elements: {0}")]
    IncompatibleElements(String),
    /// A request for values that an element cannot produce
    #[error("Invalid tabulation: {0}")]
    InvalidTabulation(String),
    /// An integral that the tensor representation cannot handle
    #[error("Unsupported integral: {0}")]
    UnsupportedIntegral(String),
    /// A free index that appears only once in a product, so it has nothing to be summed with
    #[error("Free index {index} appears only once in a product")]
    UnpairedIndex {
        /// The index
        index: String,
    },
    /// A form with products whose cell cannot be found, since none has a basis function
    #[error("Form {0} has products but no basis functions")]
    NoBasisFunctions(String),
    /// A matrix that should be invertible is not
    #[error("Singular matrix: {0}")]
    SingularMatrix(String),
    /// A code path that has not been written yet
    #[error("Not implemented: {0}")]
    NotImplemented(String),
    /// Failure while writing generated code
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Failure while formatting generated code
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
