//! Shared identifier types for the Rill core.
//!
//! The expression tree and the value model both refer to strings through
//! compact interned `Name` handles, and to tree nodes through `ExprId`
//! arena indices. Keeping these here lets `rill_types` talk about
//! expression nodes (function bodies) without depending on the tree crate.

mod expr_id;
mod interner;
mod name;

pub use expr_id::ExprId;
pub use interner::StringInterner;
pub use name::Name;
