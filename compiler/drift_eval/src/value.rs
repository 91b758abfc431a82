//! Runtime values.
//!
//! A value is a kind plus its observation record. The record travels with
//! the value through clones and bindings; only the kind participates in
//! equality. Lists are shared handles, so binding a list to a second name
//! aliases it rather than copying it.

use std::fmt;
use std::rc::Rc;

use drift_ir::{Name, Stmt};

use crate::environment::Scope;
use crate::errors::EvalResult;
use crate::observer::Observation;
use crate::shared::Shared;

/// A runtime value with its observation record.
#[derive(Clone, Debug)]
pub struct Value {
    pub kind: ValueKind,
    pub obs: Observation,
}

/// The six runtime kinds.
#[derive(Clone, Debug)]
pub enum ValueKind {
    Null,
    Num(f64),
    Text(Rc<str>),
    List(Shared<Vec<Value>>),
    Function(Rc<FunctionValue>),
    Native(NativeFn),
}

/// A user-defined function: one parameter, a body, and the captured
/// definition scope.
pub struct FunctionValue {
    /// Resolved definition name, kept for rendering as `<fn name>`.
    pub name: Rc<str>,
    pub param: Name,
    pub body: Rc<[Stmt]>,
    pub closure: Shared<Scope>,
}

impl fmt::Debug for FunctionValue {
    // Shallow on purpose: the closure scope can contain this function,
    // so recursing into it would never terminate.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}

/// A host-registered native function.
#[derive(Clone)]
pub struct NativeFn(Rc<dyn Fn(Value) -> EvalResult<Value>>);

impl NativeFn {
    pub fn new(f: impl Fn(Value) -> EvalResult<Value> + 'static) -> Self {
        NativeFn(Rc::new(f))
    }

    pub fn call(&self, arg: Value) -> EvalResult<Value> {
        (self.0)(arg)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").finish_non_exhaustive()
    }
}

impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Value {
    pub fn null() -> Self {
        Value {
            kind: ValueKind::Null,
            obs: Observation::default(),
        }
    }

    pub fn num(n: f64) -> Self {
        Value {
            kind: ValueKind::Num(n),
            obs: Observation::default(),
        }
    }

    pub fn text(text: impl Into<Rc<str>>) -> Self {
        Value {
            kind: ValueKind::Text(text.into()),
            obs: Observation::default(),
        }
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value {
            kind: ValueKind::List(Shared::new(items)),
            obs: Observation::default(),
        }
    }

    pub fn function(function: FunctionValue) -> Self {
        Value {
            kind: ValueKind::Function(Rc::new(function)),
            obs: Observation::default(),
        }
    }

    pub fn native(f: impl Fn(Value) -> EvalResult<Value> + 'static) -> Self {
        Value {
            kind: ValueKind::Native(NativeFn::new(f)),
            obs: Observation::default(),
        }
    }

    /// Truthiness: null is false, numbers by non-zero, text and lists by
    /// non-emptiness, callables always true.
    pub fn is_truthy(&self) -> bool {
        match &self.kind {
            ValueKind::Null => false,
            ValueKind::Num(n) => *n != 0.0,
            ValueKind::Text(text) => !text.is_empty(),
            ValueKind::List(items) => !items.borrow().is_empty(),
            ValueKind::Function(_) | ValueKind::Native(_) => true,
        }
    }

    /// Type name as reported by the `type` native and used in errors.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ValueKind::Null => "none",
            ValueKind::Num(_) => "num",
            ValueKind::Text(_) => "str",
            ValueKind::List(_) => "list",
            ValueKind::Function(_) => "fn",
            ValueKind::Native(_) => "builtin",
        }
    }

    /// Render the value for printing and text concatenation.
    ///
    /// Text renders as-is at the top level but quoted inside lists, so
    /// `print of "hi"` gives `hi` while `print of ["hi"]` gives `["hi"]`.
    pub fn display_string(&self) -> String {
        match &self.kind {
            ValueKind::Null => "null".to_string(),
            ValueKind::Num(n) => format_num(*n),
            ValueKind::Text(text) => text.to_string(),
            ValueKind::List(items) => {
                let items = items.borrow();
                let mut out = String::from("[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if let ValueKind::Text(text) = &item.kind {
                        out.push('"');
                        out.push_str(text);
                        out.push('"');
                    } else {
                        out.push_str(&item.display_string());
                    }
                }
                out.push(']');
                out
            }
            ValueKind::Function(function) => format!("<fn {}>", function.name),
            ValueKind::Native(_) => "<native>".to_string(),
        }
    }
}

// Equality ignores observation state: two values compare by kind alone.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl PartialEq for ValueKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::Num(a), ValueKind::Num(b)) => a == b,
            (ValueKind::Text(a), ValueKind::Text(b)) => a == b,
            (ValueKind::List(a), ValueKind::List(b)) => {
                Shared::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (ValueKind::Function(a), ValueKind::Function(b)) => Rc::ptr_eq(a, b),
            (ValueKind::Native(a), ValueKind::Native(b)) => a == b,
            _ => false,
        }
    }
}

/// Render a number the way the original runtime's `%.6g` did: whole
/// numbers below 1e15 print without a decimal point, everything else uses
/// six significant digits, switching to scientific notation outside the
/// [1e-4, 1e6) magnitude window.
pub(crate) fn format_num(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    if !n.is_finite() {
        return format!("{n}");
    }
    let exp = n.abs().log10().floor() as i32;
    if (-4..6).contains(&exp) {
        let decimals = (5 - exp) as usize;
        let mut out = format!("{n:.decimals$}");
        if out.contains('.') {
            while out.ends_with('0') {
                out.pop();
            }
            if out.ends_with('.') {
                out.pop();
            }
        }
        out
    } else {
        let formatted = format!("{n:.5e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
                format!("{mantissa}e{exponent}")
            }
            None => formatted,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn truthiness_table() {
        assert!(!Value::null().is_truthy());
        assert!(!Value::num(0.0).is_truthy());
        assert!(Value::num(-0.5).is_truthy());
        assert!(!Value::text("").is_truthy());
        assert!(Value::text("x").is_truthy());
        assert!(!Value::list(vec![]).is_truthy());
        assert!(Value::list(vec![Value::num(0.0)]).is_truthy());
        assert!(Value::native(Ok).is_truthy());
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::null().type_name(), "none");
        assert_eq!(Value::num(1.0).type_name(), "num");
        assert_eq!(Value::text("").type_name(), "str");
        assert_eq!(Value::list(vec![]).type_name(), "list");
        assert_eq!(Value::native(Ok).type_name(), "builtin");
    }

    #[test]
    fn whole_numbers_render_without_decimals() {
        assert_eq!(format_num(42.0), "42");
        assert_eq!(format_num(-3.0), "-3");
        assert_eq!(format_num(0.0), "0");
        assert_eq!(format_num(100_000.0), "100000");
    }

    #[test]
    fn fractions_render_with_six_significant_digits() {
        assert_eq!(format_num(0.5), "0.5");
        assert_eq!(format_num(0.1), "0.1");
        assert_eq!(format_num(3.141_592_653_589_793), "3.14159");
        assert_eq!(format_num(0.721_928_094_887), "0.721928");
        assert_eq!(format_num(123.456), "123.456");
        assert_eq!(format_num(-0.25), "-0.25");
    }

    #[test]
    fn extreme_magnitudes_use_scientific_notation() {
        assert_eq!(format_num(1e20), "1e20");
        assert_eq!(format_num(2.5e-8), "2.5e-8");
        assert_eq!(format_num(1.5e16), "1.5e16");
    }

    #[test]
    fn list_rendering_quotes_text_elements() {
        let list = Value::list(vec![
            Value::text("a"),
            Value::num(5.0),
            Value::list(vec![Value::num(1.0)]),
        ]);
        assert_eq!(list.display_string(), "[\"a\", 5, [1]]");
        assert_eq!(Value::text("hi").display_string(), "hi");
        assert_eq!(Value::null().display_string(), "null");
    }

    #[test]
    fn equality_ignores_observation_state() {
        let mut observed = Value::num(4.0);
        crate::observer::observe(&mut observed);
        assert_ne!(observed.obs, Value::num(4.0).obs);
        assert_eq!(observed, Value::num(4.0));
    }

    #[test]
    fn list_equality_is_structural() {
        let a = Value::list(vec![Value::num(1.0), Value::text("x")]);
        let b = Value::list(vec![Value::num(1.0), Value::text("x")]);
        let alias = a.clone();
        assert_eq!(a, b);
        assert_eq!(a, alias);
        assert_ne!(a, Value::list(vec![Value::num(2.0)]));
    }
}
