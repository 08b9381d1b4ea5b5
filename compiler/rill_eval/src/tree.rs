//! The expression tree arena.
//!
//! Nodes are produced externally (by a parser or a host embedding) and
//! consumed here. Children, parents, and dependents are all `ExprId`
//! indices into one flat arena, so the bidirectional parent/dependent
//! graph is plain data — no ownership cycles, no lifetimes.
//!
//! Each node carries three caches populated during evaluation:
//! - `memo`: the node's evaluated value;
//! - `resolved`: for symbols, the node the symbol resolved to;
//! - `dependents`: symbol nodes that resolved to this node, walked when a
//!   binding changes to invalidate stale memos transitively.

use rill_ir::{ExprId, Name, StringInterner};
use rill_types::Value;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// One declared parameter of a function-definition node.
///
/// The type is an expression node: it is evaluated (to a type-position
/// value) when the definition itself is evaluated.
#[derive(Clone, Debug, PartialEq)]
pub struct FnParam {
    pub name: Name,
    pub ty: ExprId,
}

/// Expression node variants, as delivered by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// An already-evaluated value.
    Literal(Value),
    /// A symbol, resolved lexically through ancestor scopes.
    Symbol(Name),
    /// Application: operator plus ordered operands.
    Call {
        operator: ExprId,
        operands: Vec<ExprId>,
    },
    /// Sequence literal.
    Seq(Vec<ExprId>),
    /// Record literal.
    Dict(Vec<(Name, ExprId)>),
    /// Let binding: ordered name→node map plus a body.
    Scope {
        bindings: Vec<(Name, ExprId)>,
        body: ExprId,
    },
    /// Function definition: named, typed parameters plus a body.
    FnDef { params: Vec<FnParam>, body: ExprId },
}

#[derive(Debug)]
struct ExprNode {
    kind: ExprKind,
    parent: Option<ExprId>,
    memo: Option<Value>,
    resolved: Option<ExprId>,
    dependents: FxHashSet<ExprId>,
}

impl ExprNode {
    fn new(kind: ExprKind) -> Self {
        ExprNode {
            kind,
            parent: None,
            memo: None,
            resolved: None,
            dependents: FxHashSet::default(),
        }
    }
}

/// Flat arena of expression nodes.
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, adopting any not-yet-parented children.
    ///
    /// Children that already have a parent keep it: binding an existing
    /// node into a scope (or wrapping an argument in a cast call) must
    /// not steal the node from its lexical position.
    fn push(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::new(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(ExprNode::new(kind));
        for child in self.children(id) {
            if self.nodes[child.index()].parent.is_none() {
                self.nodes[child.index()].parent = Some(id);
            }
        }
        id
    }

    pub fn literal(&mut self, value: Value) -> ExprId {
        self.push(ExprKind::Literal(value))
    }

    pub fn symbol(&mut self, name: Name) -> ExprId {
        self.push(ExprKind::Symbol(name))
    }

    pub fn call(&mut self, operator: ExprId, operands: Vec<ExprId>) -> ExprId {
        self.push(ExprKind::Call { operator, operands })
    }

    pub fn seq(&mut self, items: Vec<ExprId>) -> ExprId {
        self.push(ExprKind::Seq(items))
    }

    pub fn dict(&mut self, entries: Vec<(Name, ExprId)>) -> ExprId {
        self.push(ExprKind::Dict(entries))
    }

    pub fn scope(&mut self, bindings: Vec<(Name, ExprId)>, body: ExprId) -> ExprId {
        self.push(ExprKind::Scope { bindings, body })
    }

    pub fn fn_def(&mut self, params: Vec<FnParam>, body: ExprId) -> ExprId {
        self.push(ExprKind::FnDef { params, body })
    }

    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: ExprId) -> Option<ExprId> {
        self.nodes[id.index()].parent
    }

    /// Assign a parent; used when attaching detached nodes under a scope.
    pub fn set_parent(&mut self, id: ExprId, parent: ExprId) {
        self.nodes[id.index()].parent = Some(parent);
    }

    pub fn memo(&self, id: ExprId) -> Option<&Value> {
        self.nodes[id.index()].memo.as_ref()
    }

    pub fn set_memo(&mut self, id: ExprId, value: Value) {
        self.nodes[id.index()].memo = Some(value);
    }

    pub fn resolved(&self, id: ExprId) -> Option<ExprId> {
        self.nodes[id.index()].resolved
    }

    pub fn set_resolved(&mut self, id: ExprId, target: ExprId) {
        self.nodes[id.index()].resolved = Some(target);
    }

    /// Record that `dependent` (a symbol node) resolved to `target`.
    pub fn add_dependent(&mut self, target: ExprId, dependent: ExprId) {
        self.nodes[target.index()].dependents.insert(dependent);
    }

    /// Direct children of a node, in declaration order.
    pub fn children(&self, id: ExprId) -> SmallVec<[ExprId; 4]> {
        let mut out = SmallVec::new();
        match &self.nodes[id.index()].kind {
            ExprKind::Literal(_) | ExprKind::Symbol(_) => {}
            ExprKind::Call { operator, operands } => {
                out.push(*operator);
                out.extend(operands.iter().copied());
            }
            ExprKind::Seq(items) => out.extend(items.iter().copied()),
            ExprKind::Dict(entries) => out.extend(entries.iter().map(|(_, node)| *node)),
            ExprKind::Scope { bindings, body } => {
                out.extend(bindings.iter().map(|(_, node)| *node));
                out.push(*body);
            }
            ExprKind::FnDef { params, body } => {
                out.extend(params.iter().map(|p| p.ty));
                out.push(*body);
            }
        }
        out
    }

    /// Bind `name` in a scope node, returning the previously bound node.
    ///
    /// The bound node is adopted by the scope if it has no parent yet.
    pub fn scope_bind(&mut self, scope: ExprId, name: Name, node: ExprId) -> Option<ExprId> {
        if self.nodes[node.index()].parent.is_none() {
            self.nodes[node.index()].parent = Some(scope);
        }
        match &mut self.nodes[scope.index()].kind {
            ExprKind::Scope { bindings, .. } => {
                if let Some(slot) = bindings.iter_mut().find(|(n, _)| *n == name) {
                    return Some(std::mem::replace(&mut slot.1, node));
                }
                bindings.push((name, node));
                None
            }
            _ => None,
        }
    }

    /// Look up a binding in a scope node.
    pub fn scope_lookup(&self, scope: ExprId, name: Name) -> Option<ExprId> {
        match &self.nodes[scope.index()].kind {
            ExprKind::Scope { bindings, .. } => bindings
                .iter()
                .find_map(|(n, node)| (*n == name).then_some(*node)),
            _ => None,
        }
    }

    /// Clear stale evaluation caches starting from `node`.
    ///
    /// Walks the node, its dependents (transitively), and every
    /// ancestor of each: any computed aggregate that transitively read
    /// the old value is stale. Symbol resolution caches along the way
    /// are dropped so symbols re-resolve against the new binding.
    pub fn invalidate(&mut self, node: ExprId) {
        let mut stack = vec![node];
        let mut seen: FxHashSet<ExprId> = FxHashSet::default();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let entry = &mut self.nodes[id.index()];
            entry.memo = None;
            entry.resolved = None;
            stack.extend(entry.dependents.iter().copied());
            if let Some(parent) = entry.parent {
                stack.push(parent);
            }
        }
    }

    /// Deep-copy a subtree with fresh caches.
    ///
    /// Used to re-enter an in-language function body per call, so one
    /// call's memoized results never leak into another.
    pub fn instantiate(&mut self, node: ExprId) -> ExprId {
        let kind = self.nodes[node.index()].kind.clone();
        let copied = match kind {
            ExprKind::Literal(value) => ExprKind::Literal(value),
            ExprKind::Symbol(name) => ExprKind::Symbol(name),
            ExprKind::Call { operator, operands } => ExprKind::Call {
                operator: self.instantiate(operator),
                operands: operands
                    .into_iter()
                    .map(|operand| self.instantiate(operand))
                    .collect(),
            },
            ExprKind::Seq(items) => ExprKind::Seq(
                items
                    .into_iter()
                    .map(|item| self.instantiate(item))
                    .collect(),
            ),
            ExprKind::Dict(entries) => ExprKind::Dict(
                entries
                    .into_iter()
                    .map(|(name, entry)| (name, self.instantiate(entry)))
                    .collect(),
            ),
            ExprKind::Scope { bindings, body } => ExprKind::Scope {
                bindings: bindings
                    .into_iter()
                    .map(|(name, bound)| (name, self.instantiate(bound)))
                    .collect(),
                body: self.instantiate(body),
            },
            ExprKind::FnDef { params, body } => ExprKind::FnDef {
                params: params
                    .into_iter()
                    .map(|p| FnParam {
                        name: p.name,
                        ty: self.instantiate(p.ty),
                    })
                    .collect(),
                body: self.instantiate(body),
            },
        };
        self.push(copied)
    }

    /// Canonical printed form of a node, for fatal error messages.
    pub fn display(&self, id: ExprId, interner: &StringInterner) -> String {
        match &self.nodes[id.index()].kind {
            ExprKind::Literal(value) => value.display(interner),
            ExprKind::Symbol(name) => interner.lookup(*name).to_string(),
            ExprKind::Call { operator, operands } => {
                let args: Vec<String> = operands
                    .iter()
                    .map(|operand| self.display(*operand, interner))
                    .collect();
                format!("{}({})", self.display(*operator, interner), args.join(", "))
            }
            ExprKind::Seq(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| self.display(*item, interner))
                    .collect();
                format!("[{}]", items.join(", "))
            }
            ExprKind::Dict(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(name, entry)| {
                        format!("{}: {}", interner.lookup(*name), self.display(*entry, interner))
                    })
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            ExprKind::Scope { bindings, body } => {
                let bindings: Vec<String> = bindings
                    .iter()
                    .map(|(name, bound)| {
                        format!("{} = {}", interner.lookup(*name), self.display(*bound, interner))
                    })
                    .collect();
                format!("let {} in {}", bindings.join(", "), self.display(*body, interner))
            }
            ExprKind::FnDef { params, body } => {
                let params: Vec<String> = params
                    .iter()
                    .map(|p| {
                        format!("{}: {}", interner.lookup(p.name), self.display(p.ty, interner))
                    })
                    .collect();
                format!("fn ({}) => {}", params.join(", "), self.display(*body, interner))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_types::Value;

    #[test]
    fn allocation_wires_child_parents() {
        let mut arena = ExprArena::new();
        let a = arena.literal(Value::Unit);
        let b = arena.literal(Value::Unit);
        let seq = arena.seq(vec![a, b]);
        assert_eq!(arena.parent(a), Some(seq));
        assert_eq!(arena.parent(b), Some(seq));
        assert_eq!(arena.parent(seq), None);
    }

    #[test]
    fn allocation_does_not_steal_parents() {
        let mut arena = ExprArena::new();
        let a = arena.literal(Value::Unit);
        let first = arena.seq(vec![a]);
        let second = arena.seq(vec![a]);
        assert_eq!(arena.parent(a), Some(first));
        assert_eq!(arena.parent(a), Some(first));
        assert_ne!(arena.parent(a), Some(second));
    }

    #[test]
    fn rebinding_returns_the_old_node() {
        let mut arena = ExprArena::new();
        let body = arena.literal(Value::Unit);
        let scope = arena.scope(vec![], body);
        let name = rill_ir::Name::from_raw(1);
        let old = arena.literal(Value::Unit);
        let new = arena.literal(Value::Unit);
        assert_eq!(arena.scope_bind(scope, name, old), None);
        assert_eq!(arena.scope_bind(scope, name, new), Some(old));
        assert_eq!(arena.scope_lookup(scope, name), Some(new));
    }

    #[test]
    fn invalidation_walks_dependents_and_ancestors() {
        let mut arena = ExprArena::new();
        let target = arena.literal(Value::Unit);
        let sym = arena.symbol(rill_ir::Name::from_raw(1));
        let aggregate = arena.seq(vec![sym]);
        arena.add_dependent(target, sym);
        arena.set_resolved(sym, target);
        arena.set_memo(sym, Value::Unit);
        arena.set_memo(aggregate, Value::seq(vec![Value::Unit]));

        arena.invalidate(target);
        assert!(arena.memo(sym).is_none());
        assert!(arena.memo(aggregate).is_none());
        assert!(arena.resolved(sym).is_none());
    }

    #[test]
    fn instantiate_copies_without_caches() {
        let mut arena = ExprArena::new();
        let item = arena.literal(Value::Unit);
        let seq = arena.seq(vec![item]);
        arena.set_memo(seq, Value::seq(vec![Value::Unit]));

        let copy = arena.instantiate(seq);
        assert_ne!(copy, seq);
        assert!(arena.memo(copy).is_none());
        let ExprKind::Seq(items) = arena.kind(copy) else {
            panic!("expected a seq");
        };
        assert_eq!(items.len(), 1);
        assert_ne!(items[0], item);
        assert_eq!(arena.parent(items[0]), Some(copy));
    }
}
