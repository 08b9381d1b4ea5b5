//! Fatal errors and invalid-construction errors.
//!
//! Recoverable situations (arity shortfall, implicit casts, out-of-range
//! indexing) travel as `rill_diagnostic::Diagnostic` beside a computed
//! value; only the conditions here abort evaluation. `EvalError` lives in
//! this crate, next to the value model, so host callables can return
//! `EvalResult` — the evaluator crate re-exports the constructors.

use std::fmt;

/// Structurally invalid type construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// Union with fewer than two distinct members.
    UnionTooSmall { count: usize },
    /// Union member that is top, bottom, or a nested union.
    NotUnitable,
    /// Optional boundary outside `[0, length]`.
    BoundaryOutOfRange { index: usize, len: usize },
    /// Optional key naming no declared entry.
    UnknownOptionalKey,
    /// Enum default that is not a member, or an empty member set.
    UnknownEnumMember,
    /// Struct constructed with the wrong number of items.
    StructArity { expected: usize, got: usize },
    /// Struct item that does not inhabit its declared type.
    StructItemMismatch { index: usize },
    /// `with_default` value that does not inhabit the type.
    DefaultMismatch,
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::UnionTooSmall { count } => {
                write!(f, "union requires at least 2 distinct members, got {count}")
            }
            TypeError::NotUnitable => {
                write!(f, "union members must not be all, never, or nested unions")
            }
            TypeError::BoundaryOutOfRange { index, len } => {
                write!(f, "optional boundary {index} out of range for length {len}")
            }
            TypeError::UnknownOptionalKey => {
                write!(f, "optional key does not name a declared entry")
            }
            TypeError::UnknownEnumMember => {
                write!(f, "enum default must name one of its members")
            }
            TypeError::StructArity { expected, got } => {
                write!(f, "struct expects {expected} items, got {got}")
            }
            TypeError::StructItemMismatch { index } => {
                write!(f, "struct item {index} does not inhabit its declared type")
            }
            TypeError::DefaultMismatch => {
                write!(f, "default value does not inhabit the type")
            }
        }
    }
}

impl std::error::Error for TypeError {}

/// A fatal evaluation failure.
///
/// Node-referencing variants carry the offending node's canonical printed
/// form, rendered at construction time where the interner is in scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    /// Symbol resolution exhausted every ancestor scope.
    UndefinedSymbol { symbol: String },
    /// A chain of symbol aliases revisited a symbol.
    CircularReference { symbol: String },
    /// A node's evaluation depends on its own evaluation.
    CircularEvaluation { node: String },
    /// The operator position of a call did not produce a callable.
    NotCallable { found: String },
    /// A function definition declared the same parameter name twice.
    DuplicateParameter { name: String },
    /// Structurally invalid type construction.
    Type(TypeError),
}

/// Result alias used throughout evaluation.
pub type EvalResult<T = crate::value::Value> = Result<T, EvalError>;

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UndefinedSymbol { symbol } => {
                write!(f, "undefined symbol `{symbol}`")
            }
            EvalError::CircularReference { symbol } => {
                write!(f, "circular reference through symbol `{symbol}`")
            }
            EvalError::CircularEvaluation { node } => {
                write!(f, "circular evaluation at `{node}`")
            }
            EvalError::NotCallable { found } => {
                write!(f, "`{found}` is not callable")
            }
            EvalError::DuplicateParameter { name } => {
                write!(f, "duplicate parameter name `{name}`")
            }
            EvalError::Type(inner) => inner.fmt(f),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<TypeError> for EvalError {
    fn from(inner: TypeError) -> Self {
        EvalError::Type(inner)
    }
}

/// Symbol resolution exhausted every ancestor scope.
pub fn undefined_symbol(symbol: impl Into<String>) -> EvalError {
    EvalError::UndefinedSymbol {
        symbol: symbol.into(),
    }
}

/// A chain of symbol aliases revisited a symbol.
pub fn circular_reference(symbol: impl Into<String>) -> EvalError {
    EvalError::CircularReference {
        symbol: symbol.into(),
    }
}

/// A node's evaluation depends on its own evaluation.
pub fn circular_evaluation(node: impl Into<String>) -> EvalError {
    EvalError::CircularEvaluation { node: node.into() }
}

/// The operator position of a call did not produce a callable.
pub fn not_callable(found: impl Into<String>) -> EvalError {
    EvalError::NotCallable {
        found: found.into(),
    }
}

/// A function definition declared the same parameter name twice.
pub fn duplicate_parameter(name: impl Into<String>) -> EvalError {
    EvalError::DuplicateParameter { name: name.into() }
}
