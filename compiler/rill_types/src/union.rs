//! Union construction: the join of the type lattice.
//!
//! `union_of` normalizes arbitrary operands down to a canonical join:
//! nested unions are flattened, `Never` operands vanish (join identity),
//! `All` absorbs everything, and members already subsumed by another
//! member are dropped. The result collapses to a single type when at
//! most one distinct member remains.

use crate::error::TypeError;
use crate::value::{UnionType, Value};

/// Join the given types.
///
/// Returns `Never` for an empty join, the sole member when everything
/// collapses, and a flattened [`UnionType`] otherwise.
pub fn union_of<I>(parts: I) -> Result<Value, TypeError>
where
    I: IntoIterator<Item = Value>,
{
    let mut members: Vec<Value> = Vec::new();
    for part in parts {
        match part {
            Value::Never => {}
            all @ Value::All(_) => return Ok(all),
            Value::Union(u) => {
                for member in &u.members {
                    fold_member(&mut members, member.clone());
                }
            }
            other => fold_member(&mut members, other),
        }
    }
    if members.len() < 2 {
        return Ok(members.pop().unwrap_or(Value::Never));
    }
    Ok(Value::Union(UnionType::new(members)?))
}

/// Fold one member into the accumulated set.
///
/// A member already subsumed by an existing one is dropped; otherwise it
/// displaces every existing member it subsumes and is appended.
fn fold_member(members: &mut Vec<Value>, new: Value) {
    if members.iter().any(|existing| new.is_subtype_of(existing)) {
        return;
    }
    members.retain(|existing| !existing.is_subtype_of(&new));
    members.push(new);
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use rill_ir::StringInterner;

    use super::*;
    use crate::value::{Lit, PrimType};

    fn prims() -> (Rc<PrimType>, Rc<PrimType>) {
        let mut interner = StringInterner::new();
        (
            PrimType::new(interner.intern("num"), Lit::Num(0.0)),
            PrimType::new(interner.intern("str"), Lit::Str("".into())),
        )
    }

    #[test]
    fn operands_are_subtypes_of_the_join() {
        let (num, str_ty) = prims();
        let a = Value::PrimType(num);
        let b = Value::PrimType(str_ty);
        let join = union_of([a.clone(), b.clone()]).unwrap();
        assert!(a.is_subtype_of(&join));
        assert!(b.is_subtype_of(&join));
    }

    #[test]
    fn nested_unions_are_flattened() {
        let (num, str_ty) = prims();
        let a = Value::PrimType(num);
        let b = Value::PrimType(str_ty);
        let inner = union_of([a.clone(), b.clone()]).unwrap();
        let outer = union_of([inner, Value::Unit]).unwrap();
        match &outer {
            Value::Union(u) => {
                assert_eq!(u.members.len(), 3);
                assert!(u.members.iter().all(|m| !matches!(m, Value::Union(_))));
            }
            other => panic!("expected a union, got {other:?}"),
        }
    }

    #[test]
    fn subsumed_members_collapse() {
        let (num, _) = prims();
        let ty = Value::PrimType(Rc::clone(&num));
        let literal = Value::num(&num, 5.0);
        // 5 is subsumed by num: the join is just num.
        let join = union_of([literal.clone(), ty.clone()]).unwrap();
        assert_eq!(join, ty);
        // Order does not matter: num displaces the literal.
        let join = union_of([ty.clone(), literal]).unwrap();
        assert_eq!(join, ty);
    }

    #[test]
    fn join_identity_and_absorption() {
        let (num, _) = prims();
        let ty = Value::PrimType(num);
        assert_eq!(union_of([]).unwrap(), Value::Never);
        assert_eq!(union_of([Value::Never, ty.clone()]).unwrap(), ty);
        assert!(matches!(
            union_of([ty, Value::all()]).unwrap(),
            Value::All(_)
        ));
    }

    #[test]
    fn duplicate_members_collapse_to_single() {
        let (num, _) = prims();
        let ty = Value::PrimType(num);
        assert_eq!(union_of([ty.clone(), ty.clone()]).unwrap(), ty);
    }
}
