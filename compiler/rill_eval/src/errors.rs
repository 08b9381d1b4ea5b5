//! Fatal error surface.
//!
//! `EvalError` lives in `rill_types`, next to the value model, so host
//! callables can return `EvalResult` without depending on this crate;
//! the constructors are re-exported here as the embedding-facing home.

pub use rill_types::{
    circular_evaluation, circular_reference, duplicate_parameter, not_callable, undefined_symbol,
    EvalError, EvalResult, TypeError,
};
