//! Canonical default values.
//!
//! Every type-position value designates a concrete inhabitant used to
//! fill missing data (arity shortfall, failed casts). Derivation is lazy
//! and cached once per instance: computing defaults eagerly at
//! construction can be circular while a type prelude is still being
//! built, so the shape is constructed first and the default cell is only
//! populated on first access.

use std::rc::Rc;

use std::cell::OnceCell;

use crate::error::TypeError;
use crate::func::Func;
use crate::value::{AllType, Dict, EnumType, PrimType, Seq, StructType, Value};

impl Value {
    /// The canonical concrete inhabitant of this value read as a type.
    ///
    /// Concrete values (literals, members, functions, struct instances)
    /// are their own default. Composite types derive recursively from
    /// their members, caching the result on first access.
    pub fn default_value(&self) -> Value {
        match self {
            Value::Never | Value::Unit => self.clone(),
            Value::All(t) => t.cell.get_or_init(|| Value::Unit).clone(),
            Value::Prim(_)
            | Value::Member(_)
            | Value::Func(_)
            | Value::Struct(_) => self.clone(),
            Value::PrimType(t) => t
                .cell
                .get_or_init(|| t.literal(t.default.clone()))
                .clone(),
            Value::EnumType(t) => t
                .cell
                .get_or_init(|| {
                    t.member(t.default).unwrap_or(Value::Never)
                })
                .clone(),
            Value::FuncType(t) => t
                .cell
                .get_or_init(|| {
                    // A function of this type whose body yields the
                    // output type's default.
                    let output = t.output.clone();
                    Func::host(Rc::clone(t), move |_, _| Ok(output.default_value()))
                })
                .clone(),
            Value::Seq(s) => s
                .cell
                .get_or_init(|| {
                    Value::seq(s.items.iter().map(Value::default_value).collect())
                })
                .clone(),
            Value::Dict(d) => d
                .cell
                .get_or_init(|| {
                    Value::dict(
                        d.entries
                            .iter()
                            .filter(|(key, _)| !d.optional.contains(key))
                            .map(|(key, value)| (*key, value.default_value()))
                            .collect(),
                    )
                })
                .clone(),
            Value::StructType(t) => t
                .cell
                .get_or_init(|| {
                    t.construct(t.items.iter().map(Value::default_value).collect())
                        .unwrap_or(Value::Never)
                })
                .clone(),
            Value::Union(u) => u
                .cell
                .get_or_init(|| {
                    u.members
                        .first()
                        .map_or(Value::Never, Value::default_value)
                })
                .clone(),
            // An unconstrained placeholder has no designated inhabitant.
            Value::Var(_) => Value::Never,
        }
    }

    /// A type with the same structural shape but `value` as its canonical
    /// inhabitant. Fails unless `value` inhabits the type.
    pub fn with_default(&self, value: Value) -> Result<Value, TypeError> {
        if !self.is_instance(&value) {
            return Err(TypeError::DefaultMismatch);
        }
        Ok(match self {
            Value::All(_) => Value::All(Rc::new(AllType {
                cell: OnceCell::from(value),
            })),
            Value::PrimType(t) => {
                let lit = match &value {
                    Value::Prim(p) => p.lit.clone(),
                    _ => t.default.clone(),
                };
                Value::PrimType(Rc::new(PrimType {
                    name: t.name,
                    default: lit,
                    cell: OnceCell::from(value),
                }))
            }
            Value::EnumType(t) => {
                let default = match &value {
                    Value::Member(m) => m.name,
                    _ => t.default,
                };
                Value::EnumType(Rc::new(EnumType {
                    name: t.name,
                    members: t.members.clone(),
                    default,
                    cell: OnceCell::from(value),
                }))
            }
            Value::FuncType(t) => Value::FuncType(Rc::new(crate::func::FuncType {
                params: t.params.clone(),
                required: t.required,
                rest: t.rest.clone(),
                output: t.output.clone(),
                cell: OnceCell::from(value),
            })),
            Value::Seq(s) => Value::Seq(Rc::new(Seq {
                items: s.items.clone(),
                required: s.required,
                rest: s.rest.clone(),
                cell: OnceCell::from(value),
            })),
            Value::Dict(d) => Value::Dict(Rc::new(Dict {
                entries: d.entries.clone(),
                optional: d.optional.clone(),
                rest: d.rest.clone(),
                cell: OnceCell::from(value),
            })),
            Value::StructType(t) => Value::StructType(Rc::new(StructType {
                name: t.name,
                items: t.items.clone(),
                cell: OnceCell::from(value),
            })),
            Value::Union(u) => Value::Union(Rc::new(crate::value::UnionType {
                members: u.members.clone(),
                cell: OnceCell::from(value),
            })),
            // Concrete values and placeholders have no default slot; the
            // instance check above already pinned `value` to them.
            _ => self.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rill_ir::StringInterner;

    use super::*;
    use crate::value::Lit;

    #[test]
    fn prim_type_default_is_its_literal() {
        let mut interner = StringInterner::new();
        let num = PrimType::new(interner.intern("num"), Lit::Num(0.0));
        let default = Value::PrimType(Rc::clone(&num)).default_value();
        assert_eq!(default, Value::num(&num, 0.0));
        // Cached: second access yields an equal value.
        assert_eq!(Value::PrimType(num).default_value(), default);
    }

    #[test]
    fn seq_type_default_maps_items() {
        let mut interner = StringInterner::new();
        let num = PrimType::new(interner.intern("num"), Lit::Num(0.0));
        let ty = Value::seq(vec![
            Value::PrimType(Rc::clone(&num)),
            Value::PrimType(Rc::clone(&num)),
        ]);
        assert_eq!(
            ty.default_value(),
            Value::seq(vec![Value::num(&num, 0.0), Value::num(&num, 0.0)])
        );
    }

    #[test]
    fn with_default_validates_inhabitant() {
        let mut interner = StringInterner::new();
        let num = PrimType::new(interner.intern("num"), Lit::Num(0.0));
        let str_ty = PrimType::new(interner.intern("str"), Lit::Str("".into()));
        let ty = Value::PrimType(Rc::clone(&num));

        let reseated = ty.with_default(Value::num(&num, 7.0)).unwrap();
        assert_eq!(reseated.default_value(), Value::num(&num, 7.0));

        let err = ty.with_default(Value::str(&str_ty, "x")).unwrap_err();
        assert_eq!(err, TypeError::DefaultMismatch);
    }

    #[test]
    fn func_type_default_yields_output_default() {
        let mut interner = StringInterner::new();
        let num = PrimType::new(interner.intern("num"), Lit::Num(0.0));
        let ty = crate::func::FuncType::strict(vec![], Value::PrimType(Rc::clone(&num)));
        let default = Value::FuncType(ty).default_value();
        assert!(matches!(default, Value::Func(_)));
    }
}
