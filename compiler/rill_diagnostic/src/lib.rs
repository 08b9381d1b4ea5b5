//! Recoverable diagnostics.
//!
//! Diagnostics describe degraded-but-completed operations: a call that had
//! to cast an argument, an arity shortfall filled from type defaults, an
//! out-of-range index. They accompany a still-produced value and never
//! abort evaluation — only the explicitly fatal conditions use the error
//! channel (`rill_types::EvalError`).
//!
//! Constructors for every diagnostic the core emits live here, so message
//! wording has a single home.

mod diagnostic;

pub use diagnostic::{Diagnostic, Severity};

/// A call was given fewer arguments than the signature requires.
///
/// The missing positions are filled with the parameter types' defaults.
pub fn too_few_arguments(required: usize, supplied: usize) -> Diagnostic {
    Diagnostic::error(format!(
        "too few arguments: expected at least {required}, got {supplied}"
    ))
}

/// A call to a rest-free function was given surplus arguments.
pub fn too_many_arguments(expected: usize, supplied: usize) -> Diagnostic {
    Diagnostic::warning(format!(
        "too many arguments: expected at most {expected}, got {supplied}"
    ))
}

/// An argument's inferred type does not fit the declared parameter type.
///
/// The argument is coerced to the parameter type's default-shaped value.
pub fn cannot_assign(found: impl Into<String>, expected: impl Into<String>) -> Diagnostic {
    Diagnostic::error(format!(
        "cannot assign type {} to {}",
        found.into(),
        expected.into()
    ))
}

/// A sequence index fell outside the declared range.
pub fn index_out_of_range(index: i64, len: usize) -> Diagnostic {
    Diagnostic::warning(format!(
        "index {index} out of range for sequence of length {len}"
    ))
}
