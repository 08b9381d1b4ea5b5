//! Function values, signatures, and host-callable plumbing.
//!
//! A [`Func`] pairs a [`FuncType`] with a body: either a host closure or
//! the id of an in-language body expression. Host closures receive a
//! [`Caller`] — the evaluator behind a narrow interface — so they can
//! force lazily-passed arguments and emit recoverable diagnostics without
//! this crate depending on the evaluator.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use rill_diagnostic::Diagnostic;
use rill_ir::{ExprId, Name};

use crate::error::{EvalResult, TypeError};
use crate::value::Value;

/// One declared parameter.
#[derive(Clone, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: Value,
    /// Lazy parameters are handed to the body unevaluated; the body
    /// forces them through [`Caller::force`] if and when it needs them.
    /// This is how short-circuiting forms skip the untaken branch.
    pub lazy: bool,
}

impl Param {
    /// A strict parameter.
    pub fn new(name: Name, ty: Value) -> Self {
        Param {
            name,
            ty,
            lazy: false,
        }
    }

    /// A lazily-evaluated parameter.
    pub fn lazy(name: Name, ty: Value) -> Self {
        Param {
            name,
            ty,
            lazy: true,
        }
    }
}

/// A function signature.
///
/// Mirrors the shape of a sequence type: fixed parameters, an
/// optional-parameter boundary, and an optional variadic rest type.
#[derive(Debug)]
pub struct FuncType {
    pub params: Vec<Param>,
    /// Parameters at or after this index may be omitted at the call site.
    /// Invariant: `required <= params.len()`.
    pub required: usize,
    /// Type replicated over argument positions beyond the fixed
    /// parameters, if variadic.
    pub rest: Option<Value>,
    pub output: Value,
    pub(crate) cell: OnceCell<Value>,
}

impl FuncType {
    pub fn new(
        params: Vec<Param>,
        required: usize,
        rest: Option<Value>,
        output: Value,
    ) -> Result<Rc<Self>, TypeError> {
        if required > params.len() {
            return Err(TypeError::BoundaryOutOfRange {
                index: required,
                len: params.len(),
            });
        }
        Ok(Rc::new(FuncType {
            params,
            required,
            rest,
            output,
            cell: OnceCell::new(),
        }))
    }

    /// Signature with every parameter required and no rest.
    pub fn strict(params: Vec<Param>, output: Value) -> Rc<Self> {
        let required = params.len();
        Rc::new(FuncType {
            params,
            required,
            rest: None,
            output,
            cell: OnceCell::new(),
        })
    }

    /// The parameter list read as a sequence type, for subtyping.
    pub fn param_seq(&self) -> crate::value::Seq {
        crate::value::Seq {
            items: self.params.iter().map(|p| p.ty.clone()).collect(),
            required: self.required,
            rest: self.rest.clone(),
            cell: OnceCell::new(),
        }
    }
}

/// Host callable signature.
///
/// Arguments arrive pre-assigned (see the evaluator's parameter
/// assignment): strict positions as values, lazy positions deferred.
pub type HostFn = dyn Fn(&mut dyn Caller, &[Arg]) -> EvalResult;

/// A function body.
#[derive(Clone)]
pub enum FnBody {
    /// Host-provided primitive.
    Host(Rc<HostFn>),
    /// In-language body expression; the evaluator instantiates a fresh
    /// copy per call and reduces it under a parameter-binding scope.
    Expr(ExprId),
}

impl FnBody {
    /// Callable identity: pointer identity for host closures, node
    /// identity for in-language bodies.
    pub fn same_callable(a: &FnBody, b: &FnBody) -> bool {
        match (a, b) {
            (FnBody::Host(x), FnBody::Host(y)) => Rc::ptr_eq(x, y),
            (FnBody::Expr(x), FnBody::Expr(y)) => x == y,
            _ => false,
        }
    }
}

impl fmt::Debug for FnBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FnBody::Host(_) => write!(f, "FnBody::Host(..)"),
            FnBody::Expr(id) => write!(f, "FnBody::Expr({id:?})"),
        }
    }
}

/// A function value.
#[derive(Debug)]
pub struct Func {
    pub ty: Rc<FuncType>,
    pub body: FnBody,
    /// The defining expression node for in-language functions; `None`
    /// for host-provided primitives.
    pub node: Option<ExprId>,
}

impl Func {
    /// A host primitive with the given signature.
    pub fn host<F>(ty: Rc<FuncType>, body: F) -> Value
    where
        F: Fn(&mut dyn Caller, &[Arg]) -> EvalResult + 'static,
    {
        Value::Func(Rc::new(Func {
            ty,
            body: FnBody::Host(Rc::new(body)),
            node: None,
        }))
    }
}

/// An assigned call argument.
#[derive(Clone, Debug)]
pub enum Arg {
    /// Strict position, already evaluated.
    Val(Value),
    /// Lazy position, still an expression node.
    Deferred(ExprId),
}

impl Arg {
    /// The value, evaluating deferred arguments through the caller.
    pub fn force(&self, caller: &mut dyn Caller) -> EvalResult {
        match self {
            Arg::Val(value) => Ok(value.clone()),
            Arg::Deferred(node) => caller.force(*node),
        }
    }

    /// The value, if already evaluated.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Arg::Val(value) => Some(value),
            Arg::Deferred(_) => None,
        }
    }
}

/// The evaluator, as seen by host callables.
pub trait Caller {
    /// Evaluate a deferred argument node.
    fn force(&mut self, node: ExprId) -> EvalResult;

    /// Emit a recoverable diagnostic alongside the computed value.
    fn emit(&mut self, diagnostic: Diagnostic);
}
