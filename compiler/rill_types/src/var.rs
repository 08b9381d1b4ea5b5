//! Type variables and the session-owned interning store.
//!
//! Variables are name-identified and interned: asking the store for `A`
//! twice yields the same variable. Instantiating a generic signature for
//! a call *shadows* its variables — fresh instances tied back to their
//! origin — so nested invocations of the same function never capture each
//! other's variables. The store is owned by the interpreter session, not
//! by a process-wide global, so independent sessions stay independent.

use std::rc::Rc;

use rill_ir::Name;
use rustc_hash::FxHashMap;

use crate::func::{FuncType, Param};
use crate::value::Value;

/// An interned, name-identified type variable.
#[derive(Debug)]
pub struct TypeVar {
    pub name: Name,
    /// Identity: two variables are the same variable iff their ids match.
    pub id: u32,
    /// The variable this one shadows, if any.
    pub origin: Option<Rc<TypeVar>>,
}

impl TypeVar {
    /// Whether this is a per-call shadow of an interned variable.
    pub fn is_shadow(&self) -> bool {
        self.origin.is_some()
    }

    /// The shadowed origin, or the variable itself if not a shadow.
    pub fn unshadow(self: &Rc<Self>) -> Rc<TypeVar> {
        self.origin.clone().unwrap_or_else(|| Rc::clone(self))
    }
}

/// Interning store for type variables.
#[derive(Debug, Default)]
pub struct TypeVarStore {
    next: u32,
    by_name: FxHashMap<Name, Rc<TypeVar>>,
}

impl TypeVarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The interned variable for `name`, creating it on first use.
    pub fn var(&mut self, name: Name) -> Rc<TypeVar> {
        if let Some(var) = self.by_name.get(&name) {
            return Rc::clone(var);
        }
        let var = Rc::new(TypeVar {
            name,
            id: self.fresh_id(),
            origin: None,
        });
        self.by_name.insert(name, Rc::clone(&var));
        var
    }

    /// A fresh instance shadowing `origin`. Not interned by name: each
    /// call site gets its own.
    pub fn shadow(&mut self, origin: &Rc<TypeVar>) -> Rc<TypeVar> {
        Rc::new(TypeVar {
            name: origin.name,
            id: self.fresh_id(),
            origin: Some(Rc::clone(origin)),
        })
    }

    fn fresh_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Instantiate a generic signature for one call: every type variable in
/// the parameter list, rest, and output is consistently replaced by a
/// fresh shadow. Signatures without variables are returned unchanged.
pub fn shadow_signature(ty: &Rc<FuncType>, store: &mut TypeVarStore) -> Rc<FuncType> {
    let has_vars = ty.params.iter().any(|p| contains_var(&p.ty))
        || ty.rest.as_ref().is_some_and(contains_var)
        || contains_var(&ty.output);
    if !has_vars {
        return Rc::clone(ty);
    }

    let mut shadows: FxHashMap<u32, Rc<TypeVar>> = FxHashMap::default();
    let params = ty
        .params
        .iter()
        .map(|p| Param {
            name: p.name,
            ty: shadow_value(&p.ty, store, &mut shadows),
            lazy: p.lazy,
        })
        .collect();
    let rest = ty
        .rest
        .as_ref()
        .map(|r| shadow_value(r, store, &mut shadows));
    let output = shadow_value(&ty.output, store, &mut shadows);
    // The boundary was validated when `ty` was constructed.
    FuncType::new(params, ty.required, rest, output)
        .unwrap_or_else(|_| Rc::clone(ty))
}

fn contains_var(value: &Value) -> bool {
    match value {
        Value::Var(_) => true,
        Value::Seq(s) => {
            s.items.iter().any(contains_var) || s.rest.as_ref().is_some_and(contains_var)
        }
        Value::Dict(d) => {
            d.entries.iter().any(|(_, v)| contains_var(v))
                || d.rest.as_ref().is_some_and(contains_var)
        }
        Value::Union(u) => u.members.iter().any(contains_var),
        Value::FuncType(t) => {
            t.params.iter().any(|p| contains_var(&p.ty))
                || t.rest.as_ref().is_some_and(contains_var)
                || contains_var(&t.output)
        }
        _ => false,
    }
}

fn shadow_value(
    value: &Value,
    store: &mut TypeVarStore,
    shadows: &mut FxHashMap<u32, Rc<TypeVar>>,
) -> Value {
    if !contains_var(value) {
        return value.clone();
    }
    match value {
        Value::Var(var) => {
            let shadow = shadows
                .entry(var.id)
                .or_insert_with(|| store.shadow(var));
            Value::Var(Rc::clone(shadow))
        }
        Value::Seq(s) => {
            let items = s
                .items
                .iter()
                .map(|item| shadow_value(item, store, shadows))
                .collect();
            let rest = s.rest.as_ref().map(|r| shadow_value(r, store, shadows));
            crate::value::Seq::new(items, s.required, rest)
                .map_or_else(|_| value.clone(), Value::Seq)
        }
        Value::Dict(d) => {
            let entries = d
                .entries
                .iter()
                .map(|(key, v)| (*key, shadow_value(v, store, shadows)))
                .collect();
            let rest = d.rest.as_ref().map(|r| shadow_value(r, store, shadows));
            crate::value::Dict::new(entries, d.optional.clone(), rest)
                .map_or_else(|_| value.clone(), Value::Dict)
        }
        Value::Union(u) => {
            let members = u
                .members
                .iter()
                .map(|member| shadow_value(member, store, shadows))
                .collect();
            crate::value::UnionType::new(members)
                .map_or_else(|_| value.clone(), Value::Union)
        }
        Value::FuncType(t) => {
            let params = t
                .params
                .iter()
                .map(|p| Param {
                    name: p.name,
                    ty: shadow_value(&p.ty, store, shadows),
                    lazy: p.lazy,
                })
                .collect();
            let rest = t.rest.as_ref().map(|r| shadow_value(r, store, shadows));
            let output = shadow_value(&t.output, store, shadows);
            FuncType::new(params, t.required, rest, output)
                .map_or_else(|_| value.clone(), Value::FuncType)
        }
        _ => value.clone(),
    }
}
