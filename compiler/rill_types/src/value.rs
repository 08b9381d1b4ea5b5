//! The `Value` enum and its composite payloads.
//!
//! Composite payloads sit behind `Rc` so values clone cheaply and share
//! structure; the evaluator is single-threaded by contract, so `Rc` (not
//! `Arc`) is intentional. Heap payloads are created through the factory
//! constructors here — external code never assembles the `Rc` wrappers
//! directly except through `new` constructors that validate invariants.
//!
//! Structural equality is hand-written: canonical-default caches are not
//! part of a value's identity, and functions compare by callable identity
//! plus structural signature (see `PartialEq` below).

use std::cell::OnceCell;
use std::rc::Rc;

use rill_ir::Name;
use rustc_hash::FxHashSet;

use crate::error::TypeError;
use crate::func::{FnBody, Func, FuncType};
use crate::var::TypeVar;

/// A Rill value, usable both as runtime data and as a type descriptor.
#[derive(Clone, Debug)]
pub enum Value {
    /// Bottom type: subtype of everything, no proper inhabitant.
    Never,
    /// Top type: supertype of everything, with a settable canonical
    /// inhabitant (defaults to `Unit`).
    All(Rc<AllType>),
    /// The single-inhabitant type, used for argument-less calls.
    Unit,
    /// Primitive literal carrying a link to its owning type.
    Prim(Rc<Prim>),
    /// Primitive type owning the canonical default literal.
    PrimType(Rc<PrimType>),
    /// A nullary enum constructor.
    Member(Rc<Member>),
    /// A closed set of named nullary constructors.
    EnumType(Rc<EnumType>),
    /// A callable paired with its signature.
    Func(Rc<Func>),
    /// A function signature.
    FuncType(Rc<FuncType>),
    /// Ordered sequence: fixed items, optional-position boundary,
    /// optional rest type (tuple/array unification).
    Seq(Rc<Seq>),
    /// Structural record: named items, optional keys, optional rest type
    /// covering unnamed keys (open records).
    Dict(Rc<Dict>),
    /// Nominal struct instance, constructed only through its type.
    Struct(Rc<StructValue>),
    /// Nominal struct type.
    StructType(Rc<StructType>),
    /// Flattened disjunction of at least two unitable member types.
    Union(Rc<UnionType>),
    /// Interned type variable (generic signatures).
    Var(Rc<TypeVar>),
}

/// Payload of the top type. Holds only the settable default cell.
#[derive(Debug, Default)]
pub struct AllType {
    pub(crate) cell: OnceCell<Value>,
}

/// A primitive literal payload.
#[derive(Clone, Debug)]
pub enum Lit {
    Num(f64),
    Str(Rc<str>),
}

impl PartialEq for Lit {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Lit::Num(a), Lit::Num(b)) => a == b,
            (Lit::Str(a), Lit::Str(b)) => a == b,
            _ => false,
        }
    }
}

/// A primitive type such as `num` or `str`.
#[derive(Debug)]
pub struct PrimType {
    pub name: Name,
    /// Canonical default literal, e.g. `0` for `num`.
    pub default: Lit,
    pub(crate) cell: OnceCell<Value>,
}

impl PrimType {
    pub fn new(name: Name, default: Lit) -> Rc<Self> {
        Rc::new(PrimType {
            name,
            default,
            cell: OnceCell::new(),
        })
    }

    /// Wrap a literal of this type into a value.
    pub fn literal(self: &Rc<Self>, lit: Lit) -> Value {
        Value::Prim(Rc::new(Prim {
            lit,
            ty: Rc::clone(self),
        }))
    }
}

/// A primitive value: literal plus owning-type link.
#[derive(Debug)]
pub struct Prim {
    pub lit: Lit,
    pub ty: Rc<PrimType>,
}

/// A closed enumeration type.
#[derive(Debug)]
pub struct EnumType {
    pub name: Name,
    /// Member names; members are materialized on demand to avoid an
    /// ownership cycle between the type and its members.
    pub members: Vec<Name>,
    /// Canonical default member.
    pub default: Name,
    pub(crate) cell: OnceCell<Value>,
}

impl EnumType {
    pub fn new(name: Name, members: Vec<Name>, default: Name) -> Result<Rc<Self>, TypeError> {
        if members.is_empty() || !members.contains(&default) {
            return Err(TypeError::UnknownEnumMember);
        }
        Ok(Rc::new(EnumType {
            name,
            members,
            default,
            cell: OnceCell::new(),
        }))
    }

    /// Materialize a member value, if the name belongs to this enum.
    pub fn member(self: &Rc<Self>, name: Name) -> Option<Value> {
        self.members.contains(&name).then(|| {
            Value::Member(Rc::new(Member {
                name,
                owner: Rc::clone(self),
            }))
        })
    }
}

/// A nullary enum constructor value.
#[derive(Debug)]
pub struct Member {
    pub name: Name,
    pub owner: Rc<EnumType>,
}

/// An ordered sequence value/type.
#[derive(Debug)]
pub struct Seq {
    pub items: Vec<Value>,
    /// Optional-position boundary: positions at or after this index may
    /// be omitted. Invariant: `required <= items.len()`.
    pub required: usize,
    /// Type of positions beyond the fixed items, if variadic.
    pub rest: Option<Value>,
    pub(crate) cell: OnceCell<Value>,
}

impl Seq {
    pub fn new(
        items: Vec<Value>,
        required: usize,
        rest: Option<Value>,
    ) -> Result<Rc<Self>, TypeError> {
        if required > items.len() {
            return Err(TypeError::BoundaryOutOfRange {
                index: required,
                len: items.len(),
            });
        }
        Ok(Rc::new(Seq {
            items,
            required,
            rest,
            cell: OnceCell::new(),
        }))
    }
}

/// A structural record value/type.
#[derive(Debug)]
pub struct Dict {
    /// Named items in declaration order.
    pub entries: Vec<(Name, Value)>,
    /// Keys that may be omitted. Invariant: every optional key is one of
    /// the declared entry keys.
    pub optional: FxHashSet<Name>,
    /// Type covering keys absent from `entries`, if the record is open.
    pub rest: Option<Value>,
    pub(crate) cell: OnceCell<Value>,
}

impl Dict {
    pub fn new(
        entries: Vec<(Name, Value)>,
        optional: FxHashSet<Name>,
        rest: Option<Value>,
    ) -> Result<Rc<Self>, TypeError> {
        if optional
            .iter()
            .any(|key| !entries.iter().any(|(k, _)| k == key))
        {
            return Err(TypeError::UnknownOptionalKey);
        }
        Ok(Rc::new(Dict {
            entries,
            optional,
            rest,
            cell: OnceCell::new(),
        }))
    }

    /// Look up a declared entry by key.
    pub fn get(&self, key: Name) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (*k == key).then_some(v))
    }
}

/// A nominal struct type.
#[derive(Debug)]
pub struct StructType {
    pub name: Name,
    /// Item types, in order.
    pub items: Vec<Value>,
    pub(crate) cell: OnceCell<Value>,
}

impl StructType {
    pub fn new(name: Name, items: Vec<Value>) -> Rc<Self> {
        Rc::new(StructType {
            name,
            items,
            cell: OnceCell::new(),
        })
    }

    /// Construct an instance, validating each item against its declared
    /// type. This is the only way to obtain a `Struct` value.
    pub fn construct(self: &Rc<Self>, items: Vec<Value>) -> Result<Value, TypeError> {
        if items.len() != self.items.len() {
            return Err(TypeError::StructArity {
                expected: self.items.len(),
                got: items.len(),
            });
        }
        for (index, (item, ty)) in items.iter().zip(&self.items).enumerate() {
            if !ty.is_instance(item) {
                return Err(TypeError::StructItemMismatch { index });
            }
        }
        Ok(Value::Struct(Rc::new(StructValue {
            ty: Rc::clone(self),
            items,
        })))
    }
}

/// A nominal struct instance.
#[derive(Debug)]
pub struct StructValue {
    pub ty: Rc<StructType>,
    pub items: Vec<Value>,
}

/// A flattened disjunction of unitable member types.
///
/// Prefer [`crate::union_of`], which normalizes arbitrary operands down to
/// the lattice join; direct construction enforces the raw invariants.
#[derive(Debug)]
pub struct UnionType {
    /// At least two structurally distinct members, none of them `All`,
    /// `Never`, or a nested union.
    pub members: Vec<Value>,
    pub(crate) cell: OnceCell<Value>,
}

impl UnionType {
    pub fn new(members: Vec<Value>) -> Result<Rc<Self>, TypeError> {
        if members
            .iter()
            .any(|m| matches!(m, Value::All(_) | Value::Never | Value::Union(_)))
        {
            return Err(TypeError::NotUnitable);
        }
        let mut distinct: Vec<Value> = Vec::with_capacity(members.len());
        for member in members {
            if !distinct.contains(&member) {
                distinct.push(member);
            }
        }
        if distinct.len() < 2 {
            return Err(TypeError::UnionTooSmall {
                count: distinct.len(),
            });
        }
        Ok(Rc::new(UnionType {
            members: distinct,
            cell: OnceCell::new(),
        }))
    }
}

impl Value {
    /// The top type with an unset default (falls back to `Unit`).
    pub fn all() -> Value {
        Value::All(Rc::new(AllType::default()))
    }

    /// A numeric literal of the given primitive type.
    pub fn num(ty: &Rc<PrimType>, n: f64) -> Value {
        ty.literal(Lit::Num(n))
    }

    /// A string literal of the given primitive type.
    pub fn str(ty: &Rc<PrimType>, s: &str) -> Value {
        ty.literal(Lit::Str(s.into()))
    }

    /// A concrete sequence literal: all positions required, no rest.
    pub fn seq(items: Vec<Value>) -> Value {
        let required = items.len();
        Value::Seq(Rc::new(Seq {
            items,
            required,
            rest: None,
            cell: OnceCell::new(),
        }))
    }

    /// A concrete record literal: all keys required, closed.
    pub fn dict(entries: Vec<(Name, Value)>) -> Value {
        Value::Dict(Rc::new(Dict {
            entries,
            optional: FxHashSet::default(),
            rest: None,
            cell: OnceCell::new(),
        }))
    }

    /// The numeric payload, if this is a `num`-like literal.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Prim(p) => match p.lit {
                Lit::Num(n) => Some(n),
                Lit::Str(_) => None,
            },
            _ => None,
        }
    }

    /// The string payload, if this is a `str`-like literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Prim(p) => match &p.lit {
                Lit::Str(s) => Some(s),
                Lit::Num(_) => None,
            },
            _ => None,
        }
    }

    /// The callable payload, if any.
    pub fn as_func(&self) -> Option<&Rc<Func>> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Whether `candidate` inhabits this value read as a type.
    pub fn is_instance(&self, candidate: &Value) -> bool {
        candidate.is_subtype_of(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Never, Value::Never)
            | (Value::All(_), Value::All(_))
            | (Value::Unit, Value::Unit) => true,
            (Value::Prim(a), Value::Prim(b)) => a.lit == b.lit && a.ty.name == b.ty.name,
            (Value::PrimType(a), Value::PrimType(b)) => {
                a.name == b.name && a.default == b.default
            }
            (Value::Member(a), Value::Member(b)) => {
                a.name == b.name && a.owner.name == b.owner.name
            }
            (Value::EnumType(a), Value::EnumType(b)) => {
                a.name == b.name && a.members == b.members && a.default == b.default
            }
            (Value::Func(a), Value::Func(b)) => {
                FnBody::same_callable(&a.body, &b.body) && func_type_eq(&a.ty, &b.ty)
            }
            (Value::FuncType(a), Value::FuncType(b)) => func_type_eq(a, b),
            (Value::Seq(a), Value::Seq(b)) => {
                a.items == b.items && a.required == b.required && a.rest == b.rest
            }
            (Value::Dict(a), Value::Dict(b)) => dict_eq(a, b),
            (Value::Struct(a), Value::Struct(b)) => {
                a.ty.name == b.ty.name && a.items == b.items
            }
            (Value::StructType(a), Value::StructType(b)) => {
                a.name == b.name && a.items == b.items
            }
            (Value::Union(a), Value::Union(b)) => {
                a.members.len() == b.members.len()
                    && a.members.iter().all(|m| b.members.contains(m))
            }
            (Value::Var(a), Value::Var(b)) => a.id == b.id,
            _ => false,
        }
    }
}

fn func_type_eq(a: &FuncType, b: &FuncType) -> bool {
    a.required == b.required
        && a.rest == b.rest
        && a.output == b.output
        && a.params.len() == b.params.len()
        && a
            .params
            .iter()
            .zip(&b.params)
            .all(|(p, q)| p.name == q.name && p.lazy == q.lazy && p.ty == q.ty)
}

fn dict_eq(a: &Dict, b: &Dict) -> bool {
    a.entries.len() == b.entries.len()
        && a.rest == b.rest
        && a.optional == b.optional
        && a
            .entries
            .iter()
            .all(|(key, value)| b.get(*key).is_some_and(|other| other == value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::{assert_eq, assert_ne};
    use rill_ir::StringInterner;

    use super::*;

    fn num(interner: &mut StringInterner) -> Rc<PrimType> {
        PrimType::new(interner.intern("num"), Lit::Num(0.0))
    }

    #[test]
    fn prim_equality_is_structural() {
        let mut interner = StringInterner::new();
        let num = num(&mut interner);
        assert_eq!(Value::num(&num, 5.0), Value::num(&num, 5.0));
        assert_ne!(Value::num(&num, 5.0), Value::num(&num, 6.0));
    }

    #[test]
    fn dict_equality_ignores_entry_order() {
        let mut interner = StringInterner::new();
        let num = num(&mut interner);
        let a = interner.intern("a");
        let b = interner.intern("b");
        let left = Value::dict(vec![(a, Value::num(&num, 1.0)), (b, Value::num(&num, 2.0))]);
        let right = Value::dict(vec![(b, Value::num(&num, 2.0)), (a, Value::num(&num, 1.0))]);
        assert_eq!(left, right);
    }

    #[test]
    fn seq_boundary_is_validated() {
        let mut interner = StringInterner::new();
        let num = num(&mut interner);
        let err = Seq::new(vec![Value::PrimType(num)], 2, None).unwrap_err();
        assert!(matches!(
            err,
            TypeError::BoundaryOutOfRange { index: 2, len: 1 }
        ));
    }

    #[test]
    fn union_rejects_fewer_than_two_distinct_members() {
        let mut interner = StringInterner::new();
        let num = num(&mut interner);
        let err =
            UnionType::new(vec![Value::PrimType(Rc::clone(&num)), Value::PrimType(num)])
                .unwrap_err();
        assert!(matches!(err, TypeError::UnionTooSmall { count: 1 }));
    }

    #[test]
    fn union_rejects_top_and_bottom_members() {
        let mut interner = StringInterner::new();
        let num = num(&mut interner);
        let err = UnionType::new(vec![Value::all(), Value::PrimType(num)]).unwrap_err();
        assert!(matches!(err, TypeError::NotUnitable));
    }

    #[test]
    fn struct_construction_validates_items() {
        let mut interner = StringInterner::new();
        let num = num(&mut interner);
        let point = StructType::new(
            interner.intern("Point"),
            vec![Value::PrimType(Rc::clone(&num)), Value::PrimType(Rc::clone(&num))],
        );
        let ok = point.construct(vec![Value::num(&num, 1.0), Value::num(&num, 2.0)]);
        assert!(ok.is_ok());
        let err = point.construct(vec![Value::num(&num, 1.0)]).unwrap_err();
        assert!(matches!(
            err,
            TypeError::StructArity {
                expected: 2,
                got: 1
            }
        ));
    }
}
