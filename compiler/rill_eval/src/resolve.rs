//! Lexical symbol resolution.
//!
//! A symbol resolves by walking its ancestor chain and checking each
//! scope node's bindings, innermost first. A binding may itself be a
//! symbol (an alias); resolution follows the chain from the alias's own
//! lexical position, with a visited set to catch reference cycles.
//!
//! The resolved target is cached on the symbol node, and the symbol is
//! registered in the target's dependent set so a later rebinding can
//! invalidate every consumer.

use rill_ir::{ExprId, Name, StringInterner};
use rill_types::{circular_reference, undefined_symbol, EvalError};
use rustc_hash::FxHashSet;

use crate::tree::{ExprArena, ExprKind};

/// Resolve a symbol node to the non-symbol node it ultimately names.
#[tracing::instrument(level = "trace", skip(arena, interner))]
pub(crate) fn resolve(
    arena: &mut ExprArena,
    interner: &StringInterner,
    symbol: ExprId,
) -> Result<ExprId, EvalError> {
    if let Some(found) = arena.resolved(symbol) {
        return Ok(found);
    }
    let ExprKind::Symbol(first) = *arena.kind(symbol) else {
        return Err(undefined_symbol(arena.display(symbol, interner)));
    };

    let mut name = first;
    let mut cursor = symbol;
    let mut visited: FxHashSet<Name> = FxHashSet::default();
    visited.insert(name);
    loop {
        let bound = lookup(arena, cursor, name)
            .ok_or_else(|| undefined_symbol(interner.lookup(name)))?;
        match *arena.kind(bound) {
            ExprKind::Symbol(next) => {
                if !visited.insert(next) {
                    return Err(circular_reference(interner.lookup(next)));
                }
                name = next;
                cursor = bound;
            }
            _ => {
                arena.add_dependent(bound, symbol);
                arena.set_resolved(symbol, bound);
                return Ok(bound);
            }
        }
    }
}

/// Find `name` in the scopes enclosing `from`, innermost first.
fn lookup(arena: &ExprArena, from: ExprId, name: Name) -> Option<ExprId> {
    let mut ancestor = arena.parent(from);
    while let Some(scope) = ancestor {
        if let Some(bound) = arena.scope_lookup(scope, name) {
            return Some(bound);
        }
        ancestor = arena.parent(scope);
    }
    None
}
