//! The interpreter session.
//!
//! Owns everything one embedding instance needs: the expression arena,
//! the string interner, the type-variable store, and a root scope
//! pre-populated with the prelude. Sessions are fully independent;
//! nothing here touches process-global state.

use rill_diagnostic::Diagnostic;
use rill_ir::{ExprId, Name, StringInterner};
use rill_types::{EnumType, EvalError, PrimType, TypeVarStore, Value};
use std::rc::Rc;

use crate::evaluator::Evaluator;
use crate::prelude::{self, Prelude};
use crate::tree::ExprArena;

/// One embedding session.
pub struct Interpreter {
    arena: ExprArena,
    interner: StringInterner,
    vars: TypeVarStore,
    prelude: Prelude,
    root: ExprId,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut arena = ExprArena::new();
        let mut interner = StringInterner::new();
        let body = arena.literal(Value::Unit);
        let root = arena.scope(Vec::new(), body);
        let prelude = prelude::install(&mut arena, &mut interner, root);
        Interpreter {
            arena,
            interner,
            vars: TypeVarStore::new(),
            prelude,
            root,
        }
    }

    /// The root scope every top-level definition hangs off.
    pub fn root(&self) -> ExprId {
        self.root
    }

    pub fn intern(&mut self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// Mutable arena access, for building expression nodes.
    pub fn arena_mut(&mut self) -> &mut ExprArena {
        &mut self.arena
    }

    /// The prelude's `num` type.
    pub fn num_type(&self) -> Rc<PrimType> {
        Rc::clone(&self.prelude.num)
    }

    /// The prelude's `str` type.
    pub fn str_type(&self) -> Rc<PrimType> {
        Rc::clone(&self.prelude.str_ty)
    }

    /// The prelude's `bool` enum.
    pub fn bool_type(&self) -> Rc<EnumType> {
        Rc::clone(&self.prelude.bool_ty)
    }

    pub fn truth(&self) -> Value {
        self.prelude.truth.clone()
    }

    pub fn falsehood(&self) -> Value {
        self.prelude.falsehood.clone()
    }

    /// Bind `name` to `node` in the root scope.
    ///
    /// Rebinding invalidates the old node's consumers transitively, so
    /// their next evaluation recomputes against the new binding.
    pub fn define(&mut self, name: Name, node: ExprId) {
        tracing::debug!(name = self.interner.lookup(name), ?node, "define");
        if let Some(old) = self.arena.scope_bind(self.root, name, node) {
            self.arena.invalidate(old);
        }
    }

    /// Evaluate a node, attaching it under the root scope if detached.
    ///
    /// Fatal failures abort with an [`EvalError`]; otherwise the value
    /// is returned with every diagnostic collected along the way.
    pub fn evaluate(&mut self, node: ExprId) -> Result<(Value, Vec<Diagnostic>), EvalError> {
        if self.arena.parent(node).is_none() && node != self.root {
            self.arena.set_parent(node, self.root);
        }
        let mut evaluator = Evaluator::new(&mut self.arena, &self.interner, &mut self.vars);
        let value = evaluator.evaluate(node)?;
        Ok((value, evaluator.into_diagnostics()))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
