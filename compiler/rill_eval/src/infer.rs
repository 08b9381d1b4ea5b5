//! Best-effort static typing of unevaluated nodes.
//!
//! Parameter assignment needs an argument's type *before* deciding
//! whether to evaluate it, so inference never runs a node: literals are
//! their own type, call nodes report their operator's declared output,
//! and anything opaque widens to `All`. A node that has already been
//! evaluated reports its memoized value, which is as precise as a type
//! gets here.

use rill_ir::{ExprId, StringInterner};
use rill_types::Value;
use rustc_hash::FxHashSet;

use crate::resolve::resolve;
use crate::tree::{ExprArena, ExprKind};

pub(crate) fn infer(arena: &mut ExprArena, interner: &StringInterner, node: ExprId) -> Value {
    infer_inner(arena, interner, node, &mut FxHashSet::default())
}

fn infer_inner(
    arena: &mut ExprArena,
    interner: &StringInterner,
    node: ExprId,
    seen: &mut FxHashSet<ExprId>,
) -> Value {
    if !seen.insert(node) {
        // Self-referential shape; evaluation will report the cycle.
        return Value::all();
    }
    if let Some(value) = arena.memo(node) {
        return value.clone();
    }
    match arena.kind(node).clone() {
        ExprKind::Literal(value) => value,
        ExprKind::Symbol(_) => match resolve(arena, interner, node) {
            Ok(target) => infer_inner(arena, interner, target, seen),
            Err(_) => Value::all(),
        },
        ExprKind::Call { operator, .. } => {
            match infer_inner(arena, interner, operator, seen) {
                Value::Func(f) => f.ty.output.clone(),
                Value::FuncType(t) => t.output.clone(),
                _ => Value::all(),
            }
        }
        ExprKind::Seq(items) => Value::seq(
            items
                .into_iter()
                .map(|item| infer_inner(arena, interner, item, seen))
                .collect(),
        ),
        ExprKind::Dict(entries) => Value::dict(
            entries
                .into_iter()
                .map(|(name, entry)| (name, infer_inner(arena, interner, entry, seen)))
                .collect(),
        ),
        ExprKind::Scope { body, .. } => infer_inner(arena, interner, body, seen),
        // The signature exists only once the definition is evaluated.
        ExprKind::FnDef { .. } => Value::all(),
    }
}
