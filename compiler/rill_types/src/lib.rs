//! Value model and type engine for Rill.
//!
//! Every [`Value`] is simultaneously a runtime value and, in type
//! position, a type descriptor: `5` is an inhabitant of `num` and also the
//! singleton type of itself. The closed variant set covers bottom and top
//! (`Never`, `All`), primitives and their owning types, enums, functions,
//! sequences, structural records, nominal structs, unions, and interned
//! type variables.
//!
//! # Architecture
//!
//! - `value`: the `Value` enum, factory constructors, structural equality
//! - `func`: function values, signatures, host-callable plumbing
//! - `default`: lazy, once-cached canonical default values
//! - `subtype`: the structural subtyping relation
//! - `union`: the union constructor/normalizer (lattice join)
//! - `var`: type variables and the session-owned interning store
//! - `print`: canonical textual rendering
//! - `error`: `TypeError` (invalid construction) and `EvalError` (fatal
//!   evaluation failures); the evaluator crate re-exports the latter
//!
//! Fatal errors live here, next to the value model, so host callables can
//! return `EvalResult` without depending on the evaluator crate.

mod default;
mod error;
mod func;
mod print;
mod subtype;
mod union;
mod value;
mod var;

pub use error::{
    circular_evaluation, circular_reference, duplicate_parameter, not_callable, undefined_symbol,
    EvalError, EvalResult, TypeError,
};
pub use func::{Arg, Caller, FnBody, Func, FuncType, HostFn, Param};
pub use subtype::is_subtype;
pub use union::union_of;
pub use value::{
    AllType, Dict, EnumType, Lit, Member, Prim, PrimType, Seq, StructType, StructValue, UnionType,
    Value,
};
pub use var::{shadow_signature, TypeVar, TypeVarStore};
