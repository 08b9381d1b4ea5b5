//! The memoizing evaluator.
//!
//! Evaluation walks the tree demand-driven: a node's value is computed
//! once, cached in the node's memo slot, and returned from the cache on
//! every later visit until an invalidation clears it. Fatal conditions
//! abort through `EvalError`; everything recoverable degrades to a
//! value plus a collected [`Diagnostic`].
//!
//! The visitation trace doubles as the cycle detector: re-entering a
//! node that is already on the trace means its value depends on itself.

use std::rc::Rc;

use rill_diagnostic::Diagnostic;
use rill_ir::{ExprId, Name, StringInterner};
use rill_types::{
    circular_evaluation, duplicate_parameter, not_callable, shadow_signature, Arg, Caller, FnBody,
    Func, FuncType, Param, TypeVarStore, Value,
};
use rustc_hash::FxHashSet;

use crate::infer::infer;
use crate::resolve::resolve;
use crate::tree::{ExprArena, ExprKind, FnParam};

/// One evaluation pass over an arena.
///
/// Borrows the session's arena, interner, and type-variable store;
/// collects diagnostics for the duration of the pass.
pub struct Evaluator<'a> {
    pub(crate) arena: &'a mut ExprArena,
    pub(crate) interner: &'a StringInterner,
    pub(crate) vars: &'a mut TypeVarStore,
    pub(crate) diagnostics: Vec<Diagnostic>,
    trace: Vec<ExprId>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        arena: &'a mut ExprArena,
        interner: &'a StringInterner,
        vars: &'a mut TypeVarStore,
    ) -> Self {
        Evaluator {
            arena,
            interner,
            vars,
            diagnostics: Vec::new(),
            trace: Vec::new(),
        }
    }

    /// Diagnostics collected during this pass.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Evaluate a node, memoizing the result on it.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn evaluate(&mut self, node: ExprId) -> rill_types::EvalResult {
        if let Some(value) = self.arena.memo(node) {
            tracing::trace!(?node, "memo hit");
            return Ok(value.clone());
        }
        if self.trace.contains(&node) {
            // Cite the most recently entered node, not the re-entered one.
            let cited = self.trace.last().copied().unwrap_or(node);
            return Err(circular_evaluation(self.arena.display(cited, self.interner)));
        }
        let kind = self.arena.kind(node).clone();
        if let ExprKind::Literal(value) = kind {
            return Ok(value);
        }
        self.trace.push(node);
        let result = self.eval_kind(node, kind);
        self.trace.pop();
        let value = result?;
        self.arena.set_memo(node, value.clone());
        Ok(value)
    }

    fn eval_kind(&mut self, node: ExprId, kind: ExprKind) -> rill_types::EvalResult {
        match kind {
            // Handled by `evaluate` before the trace is entered.
            ExprKind::Literal(value) => Ok(value),
            ExprKind::Symbol(_) => {
                let target = resolve(self.arena, self.interner, node)?;
                self.evaluate(target)
            }
            ExprKind::Seq(items) => {
                let items = items
                    .into_iter()
                    .map(|item| self.evaluate(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::seq(items))
            }
            ExprKind::Dict(entries) => {
                let entries = entries
                    .into_iter()
                    .map(|(name, entry)| Ok((name, self.evaluate(entry)?)))
                    .collect::<rill_types::EvalResult<Vec<_>>>()?;
                Ok(Value::dict(entries))
            }
            ExprKind::Scope { body, .. } => self.evaluate(body),
            ExprKind::FnDef { params, body } => self.eval_fn_def(node, &params, body),
            ExprKind::Call { operator, operands } => self.eval_call(node, operator, &operands),
        }
    }

    fn eval_fn_def(&mut self, node: ExprId, params: &[FnParam], body: ExprId) -> rill_types::EvalResult {
        let mut seen: FxHashSet<Name> = FxHashSet::default();
        let mut declared = Vec::with_capacity(params.len());
        for param in params {
            if !seen.insert(param.name) {
                return Err(duplicate_parameter(self.interner.lookup(param.name)));
            }
            let ty = self.evaluate(param.ty)?;
            declared.push(Param::new(param.name, ty));
        }
        let output = infer(self.arena, self.interner, body);
        Ok(Value::Func(Rc::new(Func {
            ty: FuncType::strict(declared, output),
            body: FnBody::Expr(body),
            node: Some(node),
        })))
    }

    fn eval_call(
        &mut self,
        node: ExprId,
        operator: ExprId,
        operands: &[ExprId],
    ) -> rill_types::EvalResult {
        let callee = self.evaluate(operator)?;
        let Some(func) = callee.as_func().map(Rc::clone) else {
            return Err(not_callable(callee.display(self.interner)));
        };
        // Generic signatures get per-call shadows of their variables.
        let ty = shadow_signature(&func.ty, self.vars);
        let assigned = self.assign_params(&ty, operands, node);

        // Strict positions evaluate now, left to right; lazy positions
        // stay deferred for the body to force on demand.
        let mut args = Vec::with_capacity(assigned.len());
        for (index, &arg_node) in assigned.iter().enumerate() {
            let lazy = ty.params.get(index).is_some_and(|p| p.lazy);
            if lazy {
                args.push(Arg::Deferred(arg_node));
            } else {
                args.push(Arg::Val(self.evaluate(arg_node)?));
            }
        }

        match &func.body {
            FnBody::Host(host) => {
                let host = Rc::clone(host);
                host(self, &args)
            }
            FnBody::Expr(body) => {
                // Fresh body per call: memos from one invocation must
                // not leak into the next.
                let body = self.arena.instantiate(*body);
                let bindings = ty
                    .params
                    .iter()
                    .zip(&assigned)
                    .map(|(param, &bound)| (param.name, bound))
                    .collect();
                let scope = self.arena.scope(bindings, body);
                // The scope hangs off the definition site, so free
                // symbols in the body see the defining environment.
                if let Some(def) = func.node {
                    if let Some(parent) = self.arena.parent(def) {
                        self.arena.set_parent(scope, parent);
                    }
                }
                self.evaluate(scope)
            }
        }
    }
}

impl Caller for Evaluator<'_> {
    fn force(&mut self, node: ExprId) -> rill_types::EvalResult {
        self.evaluate(node)
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
