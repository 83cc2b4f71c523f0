//! Runtime values shared by the reader, evaluator and simulated effects.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

/// A value produced or consumed by a program.
///
/// Builtins are referenced by name; the primitive table of the active
/// environment resolves the name at call time, which keeps `Value` free of
/// host-specific function types.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    List(Vec<Value>),
    Builtin(String),
    Lambda(Rc<Lambda>),
}

/// User-defined function closing over its lexical scope.
pub struct Lambda {
    pub params: Vec<String>,
    pub body: Vec<Value>,
    pub scope: Scope,
}

/// Top-level program bindings (the program environment).
pub type Bindings = BTreeMap<String, Value>;

/// Lexical scope chain for `let` and lambda parameters.
///
/// `None` is the empty scope; lookups fall through to [`Bindings`].
pub type Scope = Option<Rc<Frame>>;

pub struct Frame {
    vars: HashMap<String, Value>,
    parent: Scope,
}

impl Frame {
    /// Push a new frame holding `vars` on top of `parent`.
    pub fn extend(parent: &Scope, vars: HashMap<String, Value>) -> Scope {
        Some(Rc::new(Frame {
            vars,
            parent: parent.clone(),
        }))
    }

    pub fn lookup(scope: &Scope, name: &str) -> Option<Value> {
        let mut current = scope.as_ref();
        while let Some(frame) = current {
            if let Some(value) = frame.vars.get(name) {
                return Some(value.clone());
            }
            current = frame.parent.as_ref();
        }
        None
    }
}

impl Value {
    /// The empty sequence, returned by `send!` and by reads past the end of a log.
    pub fn empty() -> Self {
        Value::List(Vec::new())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Builtin(_) | Value::Lambda(_) => "function",
        }
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Human-facing rendering: strings print without quotes.
    pub fn display(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{x:.1}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "(")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Builtin(name) => write!(f, "#<builtin {name}>"),
            Value::Lambda(lambda) => write!(f, "#<fn/{}>", lambda.params.len()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}
