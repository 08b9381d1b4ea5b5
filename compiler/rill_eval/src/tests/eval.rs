use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rill_types::{Func, FuncType, Value};

use super::{call_named, num_node, num_value};
use crate::{EvalError, Interpreter};

#[test]
fn arithmetic_applies_prelude_primitives() {
    let mut interp = Interpreter::new();
    let a = num_node(&mut interp, 3.0);
    let b = num_node(&mut interp, 4.0);
    let call = call_named(&mut interp, "+", vec![a, b]);
    let (value, diagnostics) = interp.evaluate(call).unwrap();
    assert_eq!(value, num_value(&interp, 7.0));
    assert!(diagnostics.is_empty());
}

#[test]
fn evaluation_is_memoized_per_node() {
    let mut interp = Interpreter::new();
    let hits = Rc::new(Cell::new(0));
    let num = interp.num_type();
    let counted = {
        let hits = Rc::clone(&hits);
        let num = Rc::clone(&num);
        Func::host(
            FuncType::strict(vec![], Value::PrimType(Rc::clone(&num))),
            move |_caller, _args| {
                hits.set(hits.get() + 1);
                Ok(Value::num(&num, 1.0))
            },
        )
    };
    let tick = interp.intern("tick");
    let def = interp.arena_mut().literal(counted);
    interp.define(tick, def);

    let call = call_named(&mut interp, "tick", vec![]);
    let (first, _) = interp.evaluate(call).unwrap();
    let (second, _) = interp.evaluate(call).unwrap();
    assert_eq!(first, second);
    assert_eq!(hits.get(), 1);
}

#[test]
fn conditional_skips_the_untaken_branch() {
    let mut interp = Interpreter::new();
    let truthy = interp.intern("true");
    let cond = interp.arena_mut().symbol(truthy);
    let then = num_node(&mut interp, 1.0);
    // Evaluating the untaken branch would fail: the symbol is unbound.
    let boom = {
        let name = interp.intern("boom");
        interp.arena_mut().symbol(name)
    };
    let call = call_named(&mut interp, "if", vec![cond, then, boom]);
    let (value, diagnostics) = interp.evaluate(call).unwrap();
    assert_eq!(value, num_value(&interp, 1.0));
    assert!(diagnostics.is_empty());
}

#[test]
fn equality_yields_bool_members() {
    let mut interp = Interpreter::new();
    let a = num_node(&mut interp, 1.0);
    let b = num_node(&mut interp, 1.0);
    let same = call_named(&mut interp, "eq", vec![a, b]);
    let (value, _) = interp.evaluate(same).unwrap();
    assert_eq!(value, interp.truth());

    let c = num_node(&mut interp, 1.0);
    let d = num_node(&mut interp, 2.0);
    let differ = call_named(&mut interp, "eq", vec![c, d]);
    let (value, _) = interp.evaluate(differ).unwrap();
    assert_eq!(value, interp.falsehood());
}

#[test]
fn undefined_symbols_are_fatal() {
    let mut interp = Interpreter::new();
    let name = interp.intern("nope");
    let node = interp.arena_mut().symbol(name);
    let err = interp.evaluate(node).unwrap_err();
    assert_eq!(
        err,
        EvalError::UndefinedSymbol {
            symbol: "nope".into()
        }
    );
}

#[test]
fn alias_cycles_are_fatal() {
    let mut interp = Interpreter::new();
    let a = interp.intern("a");
    let b = interp.intern("b");
    let sym_b = interp.arena_mut().symbol(b);
    interp.define(a, sym_b);
    let sym_a = interp.arena_mut().symbol(a);
    interp.define(b, sym_a);

    let probe = interp.arena_mut().symbol(a);
    let err = interp.evaluate(probe).unwrap_err();
    assert!(matches!(err, EvalError::CircularReference { .. }));
}

#[test]
fn self_referential_evaluation_is_fatal() {
    let mut interp = Interpreter::new();
    let x = interp.intern("x");
    let sym = interp.arena_mut().symbol(x);
    let seq = interp.arena_mut().seq(vec![sym]);
    interp.define(x, seq);

    let err = interp.evaluate(seq).unwrap_err();
    // The error cites the most recently visited node of the cycle: the
    // symbol whose resolution re-entered the sequence.
    assert_eq!(
        err,
        EvalError::CircularEvaluation { node: "x".into() }
    );
}
