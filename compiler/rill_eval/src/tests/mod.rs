//! Evaluator scenarios, driven through a full [`Interpreter`] session.

mod eval;

use rill_ir::ExprId;
use rill_types::Value;

use crate::Interpreter;

/// Allocate a numeric literal node.
fn num_node(interp: &mut Interpreter, n: f64) -> ExprId {
    let num = interp.num_type();
    interp.arena_mut().literal(Value::num(&num, n))
}

fn num_value(interp: &Interpreter, n: f64) -> Value {
    Value::num(&interp.num_type(), n)
}

/// Allocate a call to a prelude (or previously defined) binding.
fn call_named(interp: &mut Interpreter, name: &str, operands: Vec<ExprId>) -> ExprId {
    let name = interp.intern(name);
    let operator = interp.arena_mut().symbol(name);
    interp.arena_mut().call(operator, operands)
}
