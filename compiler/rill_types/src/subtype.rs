//! Structural subtyping.
//!
//! The relation is driven by the right-hand (candidate-supertype) operand
//! and short-circuits before any structural case analysis: `All` is a
//! universal supertype and `Never` a universal subtype, unconditionally.
//!
//! Variance summary:
//! - sequences are covariant per position (they model read access);
//! - records are covariant per key, with width subtyping;
//! - function parameters are contravariant (sequence comparison with
//!   swapped operands), outputs covariant;
//! - a union supertype needs *some* member to qualify, a union subtype
//!   needs *every* member to qualify.

use crate::func::FuncType;
use crate::value::{Dict, Seq, Value};

impl Value {
    /// Whether this value (read as a type) is a subtype of `other`.
    pub fn is_subtype_of(&self, other: &Value) -> bool {
        is_subtype(self, other)
    }
}

/// The structural subtyping relation.
pub fn is_subtype(sub: &Value, sup: &Value) -> bool {
    // Universal cases come before any structural analysis.
    if matches!(sup, Value::All(_)) {
        return true;
    }
    if matches!(sub, Value::Never) {
        return true;
    }
    // Union on the right: some member must subsume the candidate. A
    // union candidate distributes: every one of its members must find a
    // qualifying supertype member.
    if let Value::Union(sup_union) = sup {
        return match sub {
            Value::Union(sub_union) => sub_union
                .members
                .iter()
                .all(|m| sup_union.members.iter().any(|s| is_subtype(m, s))),
            _ => sup_union.members.iter().any(|s| is_subtype(sub, s)),
        };
    }
    // Union on the left against a non-union: all members must qualify.
    if let Value::Union(sub_union) = sub {
        return sub_union.members.iter().all(|m| is_subtype(m, sup));
    }
    // An unconstrained placeholder accepts any candidate; constraint
    // solving is out of scope, signatures are shadowed per call instead.
    if matches!(sup, Value::Var(_)) {
        return true;
    }

    match (sub, sup) {
        (Value::Unit, Value::Unit) => true,
        // A literal is the singleton type of itself.
        (Value::Prim(a), Value::Prim(b)) => a.ty.name == b.ty.name && a.lit == b.lit,
        (Value::Prim(a), Value::PrimType(t)) => a.ty.name == t.name,
        (Value::PrimType(a), Value::PrimType(b)) => a.name == b.name,
        (Value::Member(a), Value::Member(b)) => {
            a.owner.name == b.owner.name && a.name == b.name
        }
        (Value::Member(m), Value::EnumType(t)) => m.owner.name == t.name,
        (Value::EnumType(a), Value::EnumType(b)) => {
            a.name == b.name && a.members == b.members
        }
        (Value::Seq(a), Value::Seq(b)) => seq_subtype(a, b),
        (Value::Dict(a), Value::Dict(b)) => dict_subtype(a, b),
        (Value::Func(f), Value::FuncType(t)) => func_type_subtype(&f.ty, t),
        (Value::Func(a), Value::Func(b)) => Value::Func(a.clone()) == Value::Func(b.clone()),
        (Value::FuncType(a), Value::FuncType(b)) => func_type_subtype(a, b),
        // Structs are nominal.
        (Value::Struct(s), Value::StructType(t)) => s.ty.name == t.name,
        (Value::Struct(a), Value::Struct(b)) => {
            a.ty.name == b.ty.name && a.items == b.items
        }
        (Value::StructType(a), Value::StructType(b)) => a.name == b.name,
        _ => false,
    }
}

/// Positional sequence subtyping (covariant items).
///
/// The candidate must supply a fixed item for every required supertype
/// position: a candidate rest type never satisfies required positions
/// (the empty sequence inhabits `[..num]` but not `[num, num]`). Past
/// the boundary, a candidate rest must conform to the optional item
/// types it could populate. Candidate positions beyond the supertype's
/// fixed items must conform to the supertype's rest when one is
/// declared; without one the supertype constrains only the positions it
/// declares (width subtyping).
fn seq_subtype(sub: &Seq, sup: &Seq) -> bool {
    for (index, want) in sup.items.iter().enumerate() {
        match sub.items.get(index) {
            Some(have) => {
                if !is_subtype(have, want) {
                    return false;
                }
            }
            None => {
                if index < sup.required {
                    return false;
                }
                if let Some(rest) = &sub.rest {
                    if !is_subtype(rest, want) {
                        return false;
                    }
                }
            }
        }
    }
    if let Some(rest) = &sup.rest {
        for have in sub.items.iter().skip(sup.items.len()) {
            if !is_subtype(have, rest) {
                return false;
            }
        }
        if let Some(sub_rest) = &sub.rest {
            if !is_subtype(sub_rest, rest) {
                return false;
            }
        }
    }
    true
}

/// Keyed record subtyping (covariant values, width subtyping).
fn dict_subtype(sub: &Dict, sup: &Dict) -> bool {
    for (key, want) in &sup.entries {
        let required = !sup.optional.contains(key);
        match sub.get(*key) {
            Some(have) => {
                // An optional candidate key cannot satisfy a required
                // supertype key: the value might be absent.
                if required && sub.optional.contains(key) {
                    return false;
                }
                if !is_subtype(have, want) {
                    return false;
                }
            }
            None => {
                if required {
                    return false;
                }
                // If the candidate covers unnamed keys, that coverage
                // must fit the optional key's declared type.
                if let Some(rest) = &sub.rest {
                    if !is_subtype(rest, want) {
                        return false;
                    }
                }
            }
        }
    }
    if let Some(rest) = &sup.rest {
        for (key, have) in &sub.entries {
            if sup.get(*key).is_none() && !is_subtype(have, rest) {
                return false;
            }
        }
        if let Some(sub_rest) = &sub.rest {
            if !is_subtype(sub_rest, rest) {
                return false;
            }
        }
    }
    true
}

/// Function subtyping: parameters contravariant, output covariant.
fn func_type_subtype(sub: &FuncType, sup: &FuncType) -> bool {
    seq_subtype(&sup.param_seq(), &sub.param_seq()) && is_subtype(&sub.output, &sup.output)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use rill_ir::StringInterner;

    use super::*;
    use crate::func::Param;
    use crate::value::{Lit, PrimType, Seq};

    struct Fixture {
        interner: StringInterner,
        num: Rc<PrimType>,
        str_ty: Rc<PrimType>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut interner = StringInterner::new();
            let num = PrimType::new(interner.intern("num"), Lit::Num(0.0));
            let str_ty = PrimType::new(interner.intern("str"), Lit::Str("".into()));
            Fixture {
                interner,
                num,
                str_ty,
            }
        }

        fn num_ty(&self) -> Value {
            Value::PrimType(Rc::clone(&self.num))
        }

        fn str_type(&self) -> Value {
            Value::PrimType(Rc::clone(&self.str_ty))
        }
    }

    fn seq_of(items: Vec<Value>, required: usize, rest: Option<Value>) -> Value {
        Value::Seq(Seq::new(items, required, rest).unwrap())
    }

    #[test]
    fn reflexive_for_every_variant() {
        let f = Fixture::new();
        let values = vec![
            Value::Never,
            Value::all(),
            Value::Unit,
            Value::num(&f.num, 5.0),
            f.num_ty(),
            Value::seq(vec![Value::num(&f.num, 1.0)]),
            Value::dict(vec![]),
            crate::union_of([f.num_ty(), f.str_type()]).unwrap(),
        ];
        for v in &values {
            assert!(v.is_subtype_of(v), "not reflexive: {v:?}");
        }
    }

    #[test]
    fn never_below_everything_and_all_above_everything() {
        let f = Fixture::new();
        let values = vec![
            Value::Unit,
            Value::num(&f.num, 5.0),
            f.num_ty(),
            Value::seq(vec![]),
        ];
        for v in &values {
            assert!(Value::Never.is_subtype_of(v));
            assert!(v.is_subtype_of(&Value::all()));
        }
        // Top is a subtype of nothing but itself.
        assert!(Value::all().is_subtype_of(&Value::all()));
        assert!(!Value::all().is_subtype_of(&f.num_ty()));
    }

    #[test]
    fn prim_literal_inhabits_its_type_only() {
        let f = Fixture::new();
        assert!(Value::num(&f.num, 5.0).is_subtype_of(&f.num_ty()));
        assert!(!Value::num(&f.num, 5.0).is_subtype_of(&f.str_type()));
        assert!(!Value::str(&f.str_ty, "a").is_subtype_of(&f.num_ty()));
    }

    #[test]
    fn union_membership() {
        let mut fixture = Fixture::new();
        let union = crate::union_of([fixture.num_ty(), fixture.str_type()]).unwrap();
        assert!(Value::num(&fixture.num, 5.0).is_subtype_of(&union));
        assert!(Value::str(&fixture.str_ty, "a").is_subtype_of(&union));

        let yes = fixture.interner.intern("true");
        let no = fixture.interner.intern("false");
        let bool_ty = crate::value::EnumType::new(
            fixture.interner.intern("bool"),
            vec![yes, no],
            no,
        )
        .unwrap();
        let truth = bool_ty.member(yes).unwrap();
        assert!(!truth.is_subtype_of(&union));
    }

    #[test]
    fn union_on_the_left_requires_all_members() {
        let f = Fixture::new();
        let union = crate::union_of([f.num_ty(), f.str_type()]).unwrap();
        // num | str is not a subtype of num alone...
        assert!(!union.is_subtype_of(&f.num_ty()));
        // ...but is a subtype of a wider union.
        let wider = crate::union_of([f.num_ty(), f.str_type(), Value::Unit]).unwrap();
        assert!(union.is_subtype_of(&wider));
    }

    #[test]
    fn seq_extra_fixed_items_are_tolerated() {
        let f = Fixture::new();
        let pair = seq_of(vec![f.num_ty(), f.num_ty()], 2, None);
        let single = seq_of(vec![f.num_ty()], 1, None);
        // [num, num] <= [num]: the supertype constrains only position 0.
        assert!(pair.is_subtype_of(&single));
    }

    #[test]
    fn seq_required_positions_must_be_supplied() {
        let f = Fixture::new();
        let single = seq_of(vec![f.num_ty()], 1, None);
        let pair_optional = seq_of(vec![f.num_ty(), f.num_ty()], 0, None);
        let pair_required = seq_of(vec![f.num_ty(), f.num_ty()], 2, None);
        // Missing position 1 is fine when optional (boundary 0)...
        assert!(single.is_subtype_of(&pair_optional));
        // ...and fatal when required (boundary 2).
        assert!(!single.is_subtype_of(&pair_required));
    }

    #[test]
    fn seq_rest_covers_candidate_tail() {
        let f = Fixture::new();
        let open = seq_of(vec![], 0, Some(f.num_ty()));
        let nums = seq_of(vec![f.num_ty(), f.num_ty()], 2, None);
        let mixed = seq_of(vec![f.num_ty(), f.str_type()], 2, None);
        assert!(nums.is_subtype_of(&open));
        assert!(!mixed.is_subtype_of(&open));
        // The candidate's own rest must conform too.
        let open_str = seq_of(vec![], 0, Some(f.str_type()));
        assert!(!open_str.is_subtype_of(&open));
    }

    #[test]
    fn candidate_rest_never_satisfies_required_positions() {
        let f = Fixture::new();
        let open = seq_of(vec![], 0, Some(f.num_ty()));
        let two_required = seq_of(vec![f.num_ty(), f.num_ty()], 2, None);
        let two_optional = seq_of(vec![f.num_ty(), f.num_ty()], 0, None);
        let empty = Value::seq(vec![]);
        // [] inhabits [..num] but not [num, num], so [..num] must not be
        // below [num, num] or the relation loses transitivity.
        assert!(empty.is_subtype_of(&open));
        assert!(!empty.is_subtype_of(&two_required));
        assert!(!open.is_subtype_of(&two_required));
        // Optional positions are fair game for a conforming rest.
        assert!(open.is_subtype_of(&two_optional));
        let open_str = seq_of(vec![], 0, Some(f.str_type()));
        assert!(!open_str.is_subtype_of(&two_optional));
    }

    #[test]
    fn dict_structural_widening() {
        let mut f = Fixture::new();
        let a = f.interner.intern("a");
        let b = f.interner.intern("b");
        let narrow = Value::Dict(
            crate::value::Dict::new(vec![(a, f.num_ty())], Default::default(), None).unwrap(),
        );
        let mut optional = rustc_hash::FxHashSet::default();
        optional.insert(b);
        let wide = Value::Dict(
            crate::value::Dict::new(
                vec![(a, f.num_ty()), (b, f.str_type())],
                optional,
                None,
            )
            .unwrap(),
        );
        // {a: num} <= {a: num, b?: str}
        assert!(narrow.is_subtype_of(&wide));
        // A required key with no candidate entry fails.
        let required_b = Value::Dict(
            crate::value::Dict::new(
                vec![(a, f.num_ty()), (b, f.str_type())],
                Default::default(),
                None,
            )
            .unwrap(),
        );
        assert!(!narrow.is_subtype_of(&required_b));
    }

    #[test]
    fn dict_optional_candidate_key_cannot_satisfy_required() {
        let mut f = Fixture::new();
        let a = f.interner.intern("a");
        let mut optional = rustc_hash::FxHashSet::default();
        optional.insert(a);
        let maybe_a = Value::Dict(
            crate::value::Dict::new(vec![(a, f.num_ty())], optional, None).unwrap(),
        );
        let must_a = Value::Dict(
            crate::value::Dict::new(vec![(a, f.num_ty())], Default::default(), None).unwrap(),
        );
        assert!(!maybe_a.is_subtype_of(&must_a));
        assert!(must_a.is_subtype_of(&maybe_a));
    }

    #[test]
    fn dict_rest_covers_extra_candidate_keys() {
        let mut f = Fixture::new();
        let a = f.interner.intern("a");
        let b = f.interner.intern("b");
        let open = Value::Dict(
            crate::value::Dict::new(vec![(a, f.num_ty())], Default::default(), Some(f.num_ty()))
                .unwrap(),
        );
        let nums = Value::Dict(
            crate::value::Dict::new(
                vec![(a, f.num_ty()), (b, f.num_ty())],
                Default::default(),
                None,
            )
            .unwrap(),
        );
        let strs = Value::Dict(
            crate::value::Dict::new(
                vec![(a, f.num_ty()), (b, f.str_type())],
                Default::default(),
                None,
            )
            .unwrap(),
        );
        assert!(nums.is_subtype_of(&open));
        assert!(!strs.is_subtype_of(&open));
    }

    #[test]
    fn func_params_are_contravariant() {
        let mut f = Fixture::new();
        let x = f.interner.intern("x");
        let y = f.interner.intern("y");
        let two_nums = Value::FuncType(crate::func::FuncType::strict(
            vec![Param::new(x, f.num_ty()), Param::new(y, f.num_ty())],
            f.num_ty(),
        ));
        let one_never = Value::FuncType(crate::func::FuncType::strict(
            vec![Param::new(x, Value::Never)],
            f.num_ty(),
        ));
        let one_num = Value::FuncType(crate::func::FuncType::strict(
            vec![Param::new(x, f.num_ty())],
            f.num_ty(),
        ));
        // (num, num) -> num is not usable where (never) -> num is wanted:
        // the target promises a call with a single argument.
        assert!(!two_nums.is_subtype_of(&one_never));
        // (num) -> num accepts more than (never) -> num demands.
        assert!(one_num.is_subtype_of(&one_never));
        // The covariant reading is rejected.
        assert!(!one_never.is_subtype_of(&one_num));
    }

    #[test]
    fn func_output_is_covariant() {
        let mut f = Fixture::new();
        let x = f.interner.intern("x");
        let to_num = Value::FuncType(crate::func::FuncType::strict(
            vec![Param::new(x, f.num_ty())],
            f.num_ty(),
        ));
        let to_all = Value::FuncType(crate::func::FuncType::strict(
            vec![Param::new(x, f.num_ty())],
            Value::all(),
        ));
        assert!(to_num.is_subtype_of(&to_all));
        assert!(!to_all.is_subtype_of(&to_num));
    }

    #[test]
    fn union_join_laws() {
        let f = Fixture::new();
        let a = f.num_ty();
        let b = f.str_type();
        let join = crate::union_of([a.clone(), b.clone()]).unwrap();
        assert!(a.is_subtype_of(&join));
        assert!(b.is_subtype_of(&join));
    }
}
