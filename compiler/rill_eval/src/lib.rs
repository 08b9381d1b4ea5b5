//! Parent-linked expression trees and the memoizing evaluator for Rill.
//!
//! An embedding builds nodes in an [`ExprArena`], binds top-level names
//! through an [`Interpreter`] session, and evaluates on demand. Results
//! are memoized per node and invalidated transitively when a binding
//! changes, so a long-lived session re-computes only what a
//! redefinition actually touched.
//!
//! # Architecture
//!
//! - `tree`: the flat node arena — kinds, parents, memo/resolution
//!   caches, dependents, invalidation, per-call instantiation
//! - `resolve`: lexical symbol resolution with alias-cycle detection
//! - `infer`: best-effort static typing of unevaluated nodes
//! - `assign`: type-directed mapping of operands onto parameter shapes
//! - `evaluator`: the memoizing, diagnostic-collecting walk itself
//! - `prelude`: canonical types and host primitives bound at the root
//! - `interpreter`: the embedding-facing session object

mod assign;
pub mod errors;
mod evaluator;
mod infer;
mod interpreter;
mod prelude;
mod resolve;
mod tree;

#[cfg(test)]
mod tests;

pub use errors::{EvalError, EvalResult};
pub use evaluator::Evaluator;
pub use interpreter::Interpreter;
pub use tree::{ExprArena, ExprKind, FnParam};

pub use rill_diagnostic::{Diagnostic, Severity};
pub use rill_types::{Arg, Caller, Func, FuncType, Param, Value};
