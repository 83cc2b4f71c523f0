//! Builtin functions: pure helpers and effect primitives.
//!
//! Effect primitives reach the outside world only through the capability
//! traits on the runtime, never directly.

use crate::capability::{ByteSource, FileReader, IdSource, LineSink, LineSource, Runtime};
use crate::core::error::EvalError;
use crate::core::value::Value;
use crate::eval::{EvalResult, Primitive};

/// Largest byte count a single `random-bytes!` call may request.
pub const MAX_DRAW_BYTES: usize = 1 << 20;

/// Primitives with no effects.
pub fn pure_primitives<H>() -> Vec<(&'static str, Primitive<H>)> {
    vec![
        ("+", add::<H> as Primitive<H>),
        ("-", sub::<H> as Primitive<H>),
        ("*", mul::<H> as Primitive<H>),
        ("/", div::<H> as Primitive<H>),
        ("=", equal::<H> as Primitive<H>),
        ("<", less::<H> as Primitive<H>),
        (">", greater::<H> as Primitive<H>),
        ("<=", less_eq::<H> as Primitive<H>),
        (">=", greater_eq::<H> as Primitive<H>),
        ("not", not::<H> as Primitive<H>),
        ("list", list::<H> as Primitive<H>),
        ("cons", cons::<H> as Primitive<H>),
        ("first", first::<H> as Primitive<H>),
        ("rest", rest::<H> as Primitive<H>),
        ("nth", nth::<H> as Primitive<H>),
        ("count", count::<H> as Primitive<H>),
        ("concat", concat::<H> as Primitive<H>),
        ("empty?", is_empty::<H> as Primitive<H>),
        ("str", str_join::<H> as Primitive<H>),
        ("error", raise::<H> as Primitive<H>),
    ]
}

/// Primitives performing console, file, randomness and id effects.
pub fn effect_primitives<H: Runtime>() -> Vec<(&'static str, Primitive<H>)> {
    vec![
        ("read-line!", read_line::<H> as Primitive<H>),
        ("print!", print::<H> as Primitive<H>),
        ("read-file!", read_file::<H> as Primitive<H>),
        ("random-bytes!", random_bytes::<H> as Primitive<H>),
        ("uuid!", uuid::<H> as Primitive<H>),
    ]
}

/// Bus primitives for runtimes with no message bus attached.
pub fn detached_bus_primitives<H>() -> Vec<(&'static str, Primitive<H>)> {
    vec![
        ("send!", send_detached::<H> as Primitive<H>),
        ("receive!", receive_detached::<H> as Primitive<H>),
    ]
}

pub fn expect_arity(callee: &str, args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() != expected {
        return Err(EvalError::arity(callee, expected.to_string(), args.len()));
    }
    Ok(())
}

fn expect_at_least(callee: &str, args: &[Value], min: usize) -> Result<(), EvalError> {
    if args.len() < min {
        return Err(EvalError::arity(callee, format!("at least {min}"), args.len()));
    }
    Ok(())
}

pub fn expect_str<'v>(callee: &str, value: &'v Value) -> Result<&'v str, EvalError> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(EvalError::type_error(callee, "string", other.type_name())),
    }
}

fn expect_list<'v>(callee: &str, value: &'v Value) -> Result<&'v [Value], EvalError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(EvalError::type_error(callee, "list", other.type_name())),
    }
}

/// A non-negative whole number usable as an index or count.
///
/// Non-numbers are type errors; fractional or negative numbers are domain
/// errors. Floats with no fractional part are accepted.
pub fn expect_index(callee: &str, value: &Value) -> Result<usize, EvalError> {
    let whole = match value {
        Value::Int(n) => *n,
        Value::Float(x) if x.is_finite() && x.fract() == 0.0 => *x as i64,
        Value::Float(_) => return Err(EvalError::domain(callee, "expecting int argument")),
        other => return Err(EvalError::type_error(callee, "int", other.type_name())),
    };
    usize::try_from(whole)
        .map_err(|_| EvalError::domain(callee, "expecting non-negative int argument"))
}

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(callee: &str, value: &Value) -> Result<Num, EvalError> {
        match value {
            Value::Int(n) => Ok(Num::Int(*n)),
            Value::Float(x) => Ok(Num::Float(*x)),
            other => Err(EvalError::type_error(callee, "number", other.type_name())),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(x) => x,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Num::Int(n) => Value::Int(n),
            Num::Float(x) => Value::Float(x),
        }
    }
}

fn arith(
    callee: &str,
    args: &[Value],
    identity: i64,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult {
    let nums = args
        .iter()
        .map(|arg| Num::of(callee, arg))
        .collect::<Result<Vec<_>, _>>()?;
    let (mut acc, rest) = match nums.as_slice() {
        [] => return Ok(Value::Int(identity)),
        [only] if callee == "-" => (Num::Int(identity), std::slice::from_ref(only)),
        [first, rest @ ..] => (*first, rest),
    };
    for &num in rest {
        acc = match (acc, num) {
            (Num::Int(a), Num::Int(b)) => Num::Int(
                int_op(a, b).ok_or_else(|| EvalError::domain(callee, "integer overflow"))?,
            ),
            (a, b) => Num::Float(float_op(a.as_f64(), b.as_f64())),
        };
    }
    Ok(acc.into_value())
}

fn add<H>(_: &mut H, args: &[Value]) -> EvalResult {
    arith("+", args, 0, i64::checked_add, |a, b| a + b)
}

fn sub<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_at_least("-", args, 1)?;
    arith("-", args, 0, i64::checked_sub, |a, b| a - b)
}

fn mul<H>(_: &mut H, args: &[Value]) -> EvalResult {
    arith("*", args, 1, i64::checked_mul, |a, b| a * b)
}

fn div<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_at_least("/", args, 2)?;
    for divisor in &args[1..] {
        if matches!(divisor, Value::Int(0)) {
            return Err(EvalError::domain("/", "division by zero"));
        }
    }
    arith("/", args, 1, i64::checked_div, |a, b| a / b)
}

fn equal<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_at_least("=", args, 1)?;
    Ok(Value::Bool(args.windows(2).all(|pair| pair[0] == pair[1])))
}

fn compare(callee: &str, args: &[Value], holds: fn(f64, f64) -> bool) -> EvalResult {
    expect_at_least(callee, args, 1)?;
    let nums = args
        .iter()
        .map(|arg| Num::of(callee, arg).map(Num::as_f64))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Bool(nums.windows(2).all(|pair| holds(pair[0], pair[1]))))
}

fn less<H>(_: &mut H, args: &[Value]) -> EvalResult {
    compare("<", args, |a, b| a < b)
}

fn greater<H>(_: &mut H, args: &[Value]) -> EvalResult {
    compare(">", args, |a, b| a > b)
}

fn less_eq<H>(_: &mut H, args: &[Value]) -> EvalResult {
    compare("<=", args, |a, b| a <= b)
}

fn greater_eq<H>(_: &mut H, args: &[Value]) -> EvalResult {
    compare(">=", args, |a, b| a >= b)
}

fn not<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("not", args, 1)?;
    Ok(Value::Bool(!args[0].is_truthy()))
}

fn list<H>(_: &mut H, args: &[Value]) -> EvalResult {
    Ok(Value::List(args.to_vec()))
}

fn cons<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("cons", args, 2)?;
    let tail = expect_list("cons", &args[1])?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(tail);
    Ok(Value::List(items))
}

fn first<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("first", args, 1)?;
    let items = expect_list("first", &args[0])?;
    Ok(items.first().cloned().unwrap_or(Value::Nil))
}

fn rest<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("rest", args, 1)?;
    let items = expect_list("rest", &args[0])?;
    Ok(Value::List(items.iter().skip(1).cloned().collect()))
}

fn nth<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("nth", args, 2)?;
    let items = expect_list("nth", &args[0])?;
    let index = expect_index("nth", &args[1])?;
    items
        .get(index)
        .cloned()
        .ok_or_else(|| EvalError::domain("nth", format!("index {index} out of range")))
}

fn count<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("count", args, 1)?;
    let len = match &args[0] {
        Value::List(items) => items.len(),
        Value::Str(s) => s.chars().count(),
        Value::Nil => 0,
        other => return Err(EvalError::type_error("count", "list", other.type_name())),
    };
    Ok(Value::Int(len as i64))
}

fn concat<H>(_: &mut H, args: &[Value]) -> EvalResult {
    let mut items = Vec::new();
    for arg in args {
        items.extend_from_slice(expect_list("concat", arg)?);
    }
    Ok(Value::List(items))
}

fn is_empty<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("empty?", args, 1)?;
    let empty = match &args[0] {
        Value::List(items) => items.is_empty(),
        Value::Str(s) => s.is_empty(),
        Value::Nil => true,
        other => return Err(EvalError::type_error("empty?", "list", other.type_name())),
    };
    Ok(Value::Bool(empty))
}

fn str_join<H>(_: &mut H, args: &[Value]) -> EvalResult {
    Ok(Value::Str(args.iter().map(Value::display).collect()))
}

fn raise<H>(_: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("error", args, 1)?;
    Err(EvalError::Raised(args[0].display()))
}

fn read_line<H: Runtime>(host: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("read-line!", args, 0)?;
    host.next_line()
        .map(Value::Str)
        .ok_or(EvalError::StdinExhausted)
}

/// Emit the arguments as one space-separated line; returns that line.
fn print<H: Runtime>(host: &mut H, args: &[Value]) -> EvalResult {
    expect_at_least("print!", args, 1)?;
    let line = args
        .iter()
        .map(Value::display)
        .collect::<Vec<_>>()
        .join(" ");
    host.emit_line(line.clone());
    Ok(Value::Str(line))
}

fn read_file<H: Runtime>(host: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("read-file!", args, 1)?;
    let path = expect_str("read-file!", &args[0])?;
    Ok(Value::Str(host.read_file(path)?))
}

fn random_bytes<H: Runtime>(host: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("random-bytes!", args, 1)?;
    let n = expect_index("random-bytes!", &args[0])?;
    if n > MAX_DRAW_BYTES {
        return Err(EvalError::domain(
            "random-bytes!",
            format!("cannot draw {n} bytes, limit is {MAX_DRAW_BYTES}"),
        ));
    }
    let bytes = host.draw_bytes(n);
    Ok(Value::List(
        bytes.into_iter().map(|b| Value::Int(i64::from(b))).collect(),
    ))
}

fn uuid<H: Runtime>(host: &mut H, args: &[Value]) -> EvalResult {
    expect_arity("uuid!", args, 0)?;
    Ok(Value::Str(host.next_id()))
}

fn send_detached<H>(_: &mut H, _: &[Value]) -> EvalResult {
    Err(EvalError::Unavailable("send!".to_string()))
}

fn receive_detached<H>(_: &mut H, _: &[Value]) -> EvalResult {
    Err(EvalError::Unavailable("receive!".to_string()))
}
