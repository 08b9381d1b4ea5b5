//! Built-in bindings installed into every session's root scope.
//!
//! The prelude owns the canonical primitive types (`num`, `str`, the
//! `bool` enum) and the small set of host primitives the core ships
//! with: arithmetic, structural equality, short-circuiting `if`, and
//! sequence indexing.

use std::rc::Rc;

use rill_ir::{ExprId, Name, StringInterner};
use rill_types::{
    Arg, EnumType, Func, FuncType, Lit, Member, Param, PrimType, Seq, Value,
};

use crate::tree::ExprArena;

/// Handles to the prelude's canonical types, kept by the session.
pub(crate) struct Prelude {
    pub num: Rc<PrimType>,
    pub str_ty: Rc<PrimType>,
    pub bool_ty: Rc<EnumType>,
    pub truth: Value,
    pub falsehood: Value,
}

/// Bind the prelude into `root`, returning the canonical-type handles.
pub(crate) fn install(
    arena: &mut ExprArena,
    interner: &mut StringInterner,
    root: ExprId,
) -> Prelude {
    let num = PrimType::new(interner.intern("num"), Lit::Num(0.0));
    let str_ty = PrimType::new(interner.intern("str"), Lit::Str("".into()));
    let true_name = interner.intern("true");
    let false_name = interner.intern("false");
    let bool_ty = EnumType::new(
        interner.intern("bool"),
        vec![true_name, false_name],
        false_name,
    )
    .expect("bool default names a member");
    let truth = Value::Member(Rc::new(Member {
        name: true_name,
        owner: Rc::clone(&bool_ty),
    }));
    let falsehood = Value::Member(Rc::new(Member {
        name: false_name,
        owner: Rc::clone(&bool_ty),
    }));

    let x = interner.intern("x");
    let y = interner.intern("y");

    bind(arena, root, interner.intern("num"), Value::PrimType(Rc::clone(&num)));
    bind(arena, root, interner.intern("str"), Value::PrimType(Rc::clone(&str_ty)));
    bind(arena, root, interner.intern("bool"), Value::EnumType(Rc::clone(&bool_ty)));
    bind(arena, root, true_name, truth.clone());
    bind(arena, root, false_name, falsehood.clone());
    bind(arena, root, interner.intern("never"), Value::Never);
    bind(arena, root, interner.intern("all"), Value::all());

    let ops: [(&str, fn(f64, f64) -> f64); 4] = [
        ("+", |a, b| a + b),
        ("-", |a, b| a - b),
        ("*", |a, b| a * b),
        ("/", |a, b| a / b),
    ];
    for (name, op) in ops {
        let name = interner.intern(name);
        bind(arena, root, name, arith(&num, x, y, op));
    }

    bind(arena, root, interner.intern("eq"), equality(&bool_ty, &truth, &falsehood, x, y));
    bind(
        arena,
        root,
        interner.intern("if"),
        conditional(
            &bool_ty,
            &truth,
            interner.intern("cond"),
            interner.intern("then"),
            interner.intern("else"),
        ),
    );
    bind(
        arena,
        root,
        interner.intern("at"),
        index(&num, interner.intern("items"), interner.intern("index")),
    );

    Prelude {
        num,
        str_ty,
        bool_ty,
        truth,
        falsehood,
    }
}

fn bind(arena: &mut ExprArena, root: ExprId, name: Name, value: Value) {
    let node = arena.literal(value);
    arena.scope_bind(root, name, node);
}

fn arg_num(args: &[Arg], index: usize) -> f64 {
    args.get(index)
        .and_then(Arg::value)
        .and_then(Value::as_num)
        .unwrap_or(0.0)
}

/// A strict binary numeric primitive.
fn arith(num: &Rc<PrimType>, x: Name, y: Name, op: fn(f64, f64) -> f64) -> Value {
    let num_ty = Value::PrimType(Rc::clone(num));
    let ty = FuncType::strict(
        vec![Param::new(x, num_ty.clone()), Param::new(y, num_ty.clone())],
        num_ty,
    );
    let num = Rc::clone(num);
    Func::host(ty, move |_caller, args| {
        Ok(Value::num(&num, op(arg_num(args, 0), arg_num(args, 1))))
    })
}

/// Structural equality over any two values.
fn equality(bool_ty: &Rc<EnumType>, truth: &Value, falsehood: &Value, x: Name, y: Name) -> Value {
    let ty = FuncType::strict(
        vec![Param::new(x, Value::all()), Param::new(y, Value::all())],
        Value::EnumType(Rc::clone(bool_ty)),
    );
    let truth = truth.clone();
    let falsehood = falsehood.clone();
    Func::host(ty, move |_caller, args| {
        let equal = match (
            args.first().and_then(Arg::value),
            args.get(1).and_then(Arg::value),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        Ok(if equal { truth.clone() } else { falsehood.clone() })
    })
}

/// Short-circuiting conditional: both branches are lazy, and only the
/// taken one is ever forced.
fn conditional(
    bool_ty: &Rc<EnumType>,
    truth: &Value,
    cond: Name,
    then_n: Name,
    else_n: Name,
) -> Value {
    let ty = FuncType::strict(
        vec![
            Param::new(cond, Value::EnumType(Rc::clone(bool_ty))),
            Param::lazy(then_n, Value::all()),
            Param::lazy(else_n, Value::all()),
        ],
        Value::all(),
    );
    let truth = truth.clone();
    Func::host(ty, move |caller, args| {
        let taken = args
            .first()
            .and_then(Arg::value)
            .is_some_and(|value| *value == truth);
        let branch = if taken { args.get(1) } else { args.get(2) };
        match branch {
            Some(arg) => arg.force(caller),
            None => Ok(Value::Unit),
        }
    })
}

/// Positional sequence indexing; out-of-range reads warn and produce
/// `Never`.
fn index(num: &Rc<PrimType>, items_n: Name, index_n: Name) -> Value {
    let items_ty = Value::Seq(
        Seq::new(vec![], 0, Some(Value::all())).expect("zero boundary is in range"),
    );
    let ty = FuncType::strict(
        vec![
            Param::new(items_n, items_ty),
            Param::new(index_n, Value::PrimType(Rc::clone(num))),
        ],
        Value::all(),
    );
    Func::host(ty, move |caller, args| {
        let Some(Value::Seq(seq)) = args.first().and_then(Arg::value) else {
            return Ok(Value::Never);
        };
        #[allow(clippy::cast_possible_truncation)]
        let index = arg_num(args, 1) as i64;
        let Ok(position) = usize::try_from(index) else {
            caller.emit(rill_diagnostic::index_out_of_range(index, seq.items.len()));
            return Ok(Value::Never);
        };
        match seq.items.get(position) {
            Some(item) => Ok(item.clone()),
            None => {
                caller.emit(rill_diagnostic::index_out_of_range(index, seq.items.len()));
                Ok(Value::Never)
            }
        }
    })
}
