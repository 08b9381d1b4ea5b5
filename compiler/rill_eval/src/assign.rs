//! Type-directed parameter assignment.
//!
//! Maps supplied call operands onto a signature's parameter shape before
//! anything is evaluated. The output always has exactly the length the
//! (possibly rest-expanded) shape demands:
//!
//! - missing positions are filled with literal nodes carrying the
//!   parameter type's canonical default, after an arity diagnostic;
//! - surplus positions of a rest-free signature are dropped, with one
//!   warning for the whole call;
//! - operands whose inferred type does not fit the declared parameter
//!   type are wrapped in a coercion call, with a diagnostic, so the
//!   body still receives an inhabitant of the type it declared.
//!
//! Wrapping rather than evaluating keeps lazy parameters lazy: the
//! coercion runs if and when the body forces the argument.

use rill_ir::{ExprId, Name};
use rill_types::{Func, FuncType, Param, Value};

use crate::evaluator::Evaluator;
use crate::infer::infer;

impl Evaluator<'_> {
    /// Assign `operands` to the parameter shape of `ty`.
    ///
    /// Returns the argument node per parameter position; diagnostics for
    /// arity and type mismatches are collected on the evaluator.
    pub(crate) fn assign_params(
        &mut self,
        ty: &FuncType,
        operands: &[ExprId],
        call: ExprId,
    ) -> Vec<ExprId> {
        let fixed = ty.params.len();
        let supplied = operands.len();
        if supplied < ty.required {
            self.diagnostics
                .push(rill_diagnostic::too_few_arguments(ty.required, supplied));
        }
        if supplied > fixed && ty.rest.is_none() {
            self.diagnostics
                .push(rill_diagnostic::too_many_arguments(fixed, supplied));
        }

        let total = if ty.rest.is_some() {
            fixed.max(supplied)
        } else {
            fixed
        };
        let mut assigned = Vec::with_capacity(total);
        for index in 0..total {
            let declared = if index < fixed {
                ty.params[index].ty.clone()
            } else {
                ty.rest.clone().unwrap_or_else(Value::all)
            };
            match operands.get(index) {
                Some(&operand) => {
                    let found = infer(self.arena, self.interner, operand);
                    if found.is_subtype_of(&declared) {
                        assigned.push(operand);
                    } else {
                        self.diagnostics.push(rill_diagnostic::cannot_assign(
                            found.display(self.interner),
                            declared.display(self.interner),
                        ));
                        assigned.push(self.coerce(operand, declared, call));
                    }
                }
                None => {
                    let filler = self.arena.literal(declared.default_value());
                    self.arena.set_parent(filler, call);
                    assigned.push(filler);
                }
            }
        }
        assigned
    }

    /// Wrap an operand in a coercion call toward `target`.
    fn coerce(&mut self, operand: ExprId, target: Value, call: ExprId) -> ExprId {
        let operator = self.arena.literal(coercion(target));
        let wrapped = self.arena.call(operator, vec![operand]);
        self.arena.set_parent(wrapped, call);
        wrapped
    }
}

/// A coercion primitive for one target type: inhabitants pass through
/// unchanged, anything else becomes the target's canonical default.
fn coercion(target: Value) -> Value {
    let ty = FuncType::strict(
        vec![Param::new(Name::EMPTY, Value::all())],
        target.clone(),
    );
    Func::host(ty, move |caller, args| {
        let value = match args.first() {
            Some(arg) => arg.force(caller)?,
            None => Value::Unit,
        };
        if target.is_instance(&value) {
            Ok(value)
        } else {
            Ok(target.default_value())
        }
    })
}
