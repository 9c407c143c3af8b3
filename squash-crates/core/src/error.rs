use thiserror::Error;

/// Errors which can occur when normalising a domain.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("the domain does not contain any value")]
    Empty,

    #[error("the domain mixes integer and symbolic values")]
    MixedKind,

    #[error("an interval requires its lower bound to be smaller than its upper bound, got {inf}..{sup}")]
    InvalidInterval { inf: i64, sup: i64 },

    #[error("variable '{variable}' has a symbolic domain and cannot be used in arithmetic")]
    NotNumeric { variable: String },

    #[error("variable '{variable}' must have the domain {{0, 1}}")]
    NotBinary { variable: String },
}

/// Errors which can occur when declaring an array of variables.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("an array needs at least one dimension")]
    NoDimensions,

    #[error("dimension {position} of the array has size zero")]
    ZeroDimension { position: usize },
}

/// Errors which occur when a constraint refers to a variable the model does not know.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("variable {variable} was declared in a different model")]
    ForeignVariable { variable: String },

    #[error("variable {variable} is not declared in this model")]
    UnknownVariable { variable: String },
}

/// Errors which occur when an expression or constraint receives the wrong number of arguments.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ArityError {
    #[error("operator '{operator}' expects {expected} operands, got {actual}")]
    InvalidOperandCount {
        operator: &'static str,
        expected: String,
        actual: usize,
    },

    #[error("the '{kind}' is incomplete; compare it to a value before posting it")]
    IncompletePartialConstraint { kind: &'static str },

    #[error("argument '{argument}' of '{constraint}' has length {actual}, expected {expected}")]
    MismatchedLengths {
        constraint: &'static str,
        argument: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("tuple of arity {actual} given to a table over {expected} variables")]
    TupleArity { expected: usize, actual: usize },

    #[error("'{constraint}' requires a non-empty list")]
    EmptyList { constraint: &'static str },

    #[error("argument '{argument}' of '{constraint}' needs at least {minimum} elements, got {actual}")]
    TooFew {
        constraint: &'static str,
        argument: &'static str,
        minimum: usize,
        actual: usize,
    },
}

/// Errors related to the objective of a model.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ObjectiveError {
    #[error("the model already has an objective")]
    AlreadySet,

    #[error("the objective must be an arithmetic expression")]
    NonNumeric,
}

/// Errors in the tuples of an extension constraint.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TableTypeError {
    #[error("tuple {tuple} mixes integer and symbolic values")]
    HeterogeneousTuple { tuple: String },

    #[error("the values in column {column} do not match the kind of its variable")]
    ColumnKind { column: usize },

    #[error("the range {inf}..{sup} is too wide to expand without a column domain")]
    RangeTooWide { inf: i64, sup: i64 },
}

/// Errors in the automata and decision diagrams of `regular` and `mdd` constraints.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("at least one transition is required")]
    NoTransitions,

    #[error("at least one final state is required")]
    NoFinalStates,

    #[error("'{state}' is not a valid state name")]
    InvalidState { state: String },
}

/// Errors in the names given to variables and arrays.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("'{name}' is not a valid name")]
    Invalid { name: String },

    #[error("the name '{name}' is already in use")]
    Duplicate { name: String },
}

/// The error type of all operations on a [`crate::Model`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Arity(#[from] ArityError),

    #[error(transparent)]
    Objective(#[from] ObjectiveError),

    #[error(transparent)]
    TableType(#[from] TableTypeError),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Automaton(#[from] AutomatonError),

    #[error("the coefficient {coefficient} of a sum overflows when scaled by {factor}")]
    CoefficientOverflow { coefficient: i64, factor: i64 },

    #[error("the model has been compiled and can no longer be modified")]
    Frozen,

    #[error("only predicates can be posted as constraints")]
    NotAPredicate,
}
