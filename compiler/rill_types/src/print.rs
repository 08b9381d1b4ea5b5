//! Canonical textual rendering.
//!
//! Every value renders to a form sufficient to re-parse into an
//! equivalent literal node — the round-trip contract holds for literals
//! and atomics; function values render descriptively. Fatal errors quote
//! offending nodes through this same renderer.

use std::fmt::Write as _;

use rill_ir::StringInterner;

use crate::func::FuncType;
use crate::value::{Lit, Value};

impl Value {
    /// Render canonically, resolving names through `interner`.
    pub fn display(&self, interner: &StringInterner) -> String {
        let mut out = String::new();
        write_value(&mut out, self, interner);
        out
    }
}

impl Lit {
    pub fn display(&self) -> String {
        let mut out = String::new();
        write_lit(&mut out, self);
        out
    }
}

fn write_value(out: &mut String, value: &Value, interner: &StringInterner) {
    match value {
        Value::Never => out.push_str("never"),
        Value::All(_) => out.push_str("all"),
        Value::Unit => out.push_str("()"),
        Value::Prim(p) => write_lit(out, &p.lit),
        Value::PrimType(t) => out.push_str(interner.lookup(t.name)),
        Value::Member(m) => {
            out.push_str(interner.lookup(m.owner.name));
            out.push('.');
            out.push_str(interner.lookup(m.name));
        }
        Value::EnumType(t) => out.push_str(interner.lookup(t.name)),
        Value::Func(f) => {
            out.push_str("fn ");
            write_signature(out, &f.ty, interner);
        }
        Value::FuncType(t) => write_signature(out, t, interner),
        Value::Seq(s) => {
            out.push('[');
            for (index, item) in s.items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, interner);
                if index >= s.required {
                    out.push('?');
                }
            }
            if let Some(rest) = &s.rest {
                if !s.items.is_empty() {
                    out.push_str(", ");
                }
                out.push_str("..");
                write_value(out, rest, interner);
            }
            out.push(']');
        }
        Value::Dict(d) => {
            out.push('{');
            for (index, (key, item)) in d.entries.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                out.push_str(interner.lookup(*key));
                if d.optional.contains(key) {
                    out.push('?');
                }
                out.push_str(": ");
                write_value(out, item, interner);
            }
            if let Some(rest) = &d.rest {
                if !d.entries.is_empty() {
                    out.push_str(", ");
                }
                out.push_str("..");
                write_value(out, rest, interner);
            }
            out.push('}');
        }
        Value::Struct(s) => {
            out.push_str(interner.lookup(s.ty.name));
            out.push('(');
            for (index, item) in s.items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, interner);
            }
            out.push(')');
        }
        Value::StructType(t) => out.push_str(interner.lookup(t.name)),
        Value::Union(u) => {
            for (index, member) in u.members.iter().enumerate() {
                if index > 0 {
                    out.push_str(" | ");
                }
                write_value(out, member, interner);
            }
        }
        Value::Var(v) => {
            out.push_str(interner.lookup(v.name));
            if v.is_shadow() {
                out.push('\'');
            }
        }
    }
}

fn write_signature(out: &mut String, ty: &FuncType, interner: &StringInterner) {
    out.push('(');
    for (index, param) in ty.params.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(interner.lookup(param.name));
        if index >= ty.required {
            out.push('?');
        }
        out.push_str(": ");
        write_value(out, &param.ty, interner);
    }
    if let Some(rest) = &ty.rest {
        if !ty.params.is_empty() {
            out.push_str(", ");
        }
        out.push_str("..");
        write_value(out, rest, interner);
    }
    out.push_str(") -> ");
    write_value(out, &ty.output, interner);
}

fn write_lit(out: &mut String, lit: &Lit) {
    match lit {
        Lit::Num(n) => {
            // Integral numbers print without a fractional part.
            if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                let _ = write!(out, "{}", *n as i64);
            } else {
                let _ = write!(out, "{n}");
            }
        }
        Lit::Str(s) => {
            let _ = write!(out, "{s:?}");
        }
    }
}
