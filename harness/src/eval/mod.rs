//! Tree-walking evaluator for the embedded language.
//!
//! The evaluator is generic over its [`Runtime`], so the same code runs
//! against the simulated [`TestState`](crate::core::state::TestState) and
//! against real I/O. Builtins are looked up by name in a primitive table
//! supplied by the environment.

pub mod primitives;

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::trace;

use crate::capability::Runtime;
use crate::core::error::EvalError;
use crate::core::value::{Frame, Lambda, Scope, Value};

pub type EvalResult = Result<Value, EvalError>;

/// Native function bound into an environment under a name.
pub type Primitive<H> = fn(&mut H, &[Value]) -> EvalResult;

/// Name-indexed primitives available to a program.
pub type PrimitiveTable<H> = BTreeMap<String, Primitive<H>>;

/// Deepest form nesting the evaluator will enter before failing the run.
///
/// Each level costs native stack, so the limit must fit a 2 MiB thread.
pub const MAX_EVAL_DEPTH: usize = 300;

pub struct Evaluator<'e, H> {
    primitives: &'e PrimitiveTable<H>,
    depth: Cell<usize>,
}

impl<'e, H: Runtime> Evaluator<'e, H> {
    pub fn new(primitives: &'e PrimitiveTable<H>) -> Self {
        Self {
            primitives,
            depth: Cell::new(0),
        }
    }

    /// Evaluate top-level forms left to right, stopping at the first error.
    ///
    /// Returns the value of the last form, or `nil` for an empty program.
    pub fn eval_program(&self, host: &mut H, forms: &[Value]) -> EvalResult {
        let mut last = Value::Nil;
        for form in forms {
            last = self.eval(host, form, &None)?;
        }
        Ok(last)
    }

    pub fn eval(&self, host: &mut H, form: &Value, scope: &Scope) -> EvalResult {
        let depth = self.depth.get();
        if depth >= MAX_EVAL_DEPTH {
            return Err(EvalError::DepthExceeded {
                limit: MAX_EVAL_DEPTH,
            });
        }
        self.depth.set(depth + 1);
        let result = self.eval_form(host, form, scope);
        self.depth.set(depth);
        result
    }

    fn eval_form(&self, host: &mut H, form: &Value, scope: &Scope) -> EvalResult {
        match form {
            Value::Symbol(name) => self.resolve(host, name, scope),
            Value::List(items) => match items.split_first() {
                None => Ok(Value::empty()),
                Some((head, rest)) => self.eval_list(host, head, rest, scope),
            },
            other => Ok(other.clone()),
        }
    }

    fn resolve(&self, host: &H, name: &str, scope: &Scope) -> EvalResult {
        if let Some(value) = Frame::lookup(scope, name) {
            return Ok(value);
        }
        host.bindings()
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::Unbound(name.to_string()))
    }

    fn eval_list(&self, host: &mut H, head: &Value, rest: &[Value], scope: &Scope) -> EvalResult {
        if let Value::Symbol(name) = head {
            match name.as_str() {
                "quote" => return special_quote(rest),
                "if" => return self.special_if(host, rest, scope),
                "do" => return self.eval_body(host, rest, scope),
                "def" => return self.special_def(host, rest, scope),
                "let" => return self.special_let(host, rest, scope),
                "fn" => return special_fn(rest, scope),
                "and" => return self.special_and(host, rest, scope),
                "or" => return self.special_or(host, rest, scope),
                _ => {}
            }
        }
        let callee = self.eval(host, head, scope)?;
        let mut args = Vec::with_capacity(rest.len());
        for arg in rest {
            args.push(self.eval(host, arg, scope)?);
        }
        self.apply(host, &callee, &args)
    }

    /// Call a builtin or lambda with already-evaluated arguments.
    pub fn apply(&self, host: &mut H, callee: &Value, args: &[Value]) -> EvalResult {
        match callee {
            Value::Builtin(name) => {
                let primitive = self
                    .primitives
                    .get(name)
                    .ok_or_else(|| EvalError::NotCallable(name.clone()))?;
                trace!(primitive = %name, argc = args.len(), "apply builtin");
                primitive(host, args)
            }
            Value::Lambda(lambda) => {
                if lambda.params.len() != args.len() {
                    return Err(EvalError::arity(
                        "fn",
                        lambda.params.len().to_string(),
                        args.len(),
                    ));
                }
                let vars: HashMap<String, Value> = lambda
                    .params
                    .iter()
                    .cloned()
                    .zip(args.iter().cloned())
                    .collect();
                let scope = Frame::extend(&lambda.scope, vars);
                self.eval_body(host, &lambda.body, &scope)
            }
            other => Err(EvalError::NotCallable(other.to_string())),
        }
    }

    fn eval_body(&self, host: &mut H, body: &[Value], scope: &Scope) -> EvalResult {
        let mut last = Value::Nil;
        for form in body {
            last = self.eval(host, form, scope)?;
        }
        Ok(last)
    }

    fn special_if(&self, host: &mut H, rest: &[Value], scope: &Scope) -> EvalResult {
        let (test, then, otherwise) = match rest {
            [test, then] => (test, then, None),
            [test, then, otherwise] => (test, then, Some(otherwise)),
            _ => return Err(EvalError::arity("if", "2 or 3", rest.len())),
        };
        if self.eval(host, test, scope)?.is_truthy() {
            self.eval(host, then, scope)
        } else if let Some(otherwise) = otherwise {
            self.eval(host, otherwise, scope)
        } else {
            Ok(Value::Nil)
        }
    }

    fn special_def(&self, host: &mut H, rest: &[Value], scope: &Scope) -> EvalResult {
        let [name, expr] = rest else {
            return Err(EvalError::arity("def", "2", rest.len()));
        };
        let Value::Symbol(name) = name else {
            return Err(EvalError::type_error("def", "symbol", name.type_name()));
        };
        let value = self.eval(host, expr, scope)?;
        host.bindings_mut().insert(name.clone(), value.clone());
        Ok(value)
    }

    fn special_let(&self, host: &mut H, rest: &[Value], scope: &Scope) -> EvalResult {
        let Some((Value::List(pairs), body)) = rest.split_first() else {
            return Err(EvalError::type_error(
                "let",
                "binding list",
                rest.first().map(Value::type_name).unwrap_or("nothing"),
            ));
        };
        let mut current = scope.clone();
        for pair in pairs {
            let Value::List(pair) = pair else {
                return Err(EvalError::type_error("let", "(name value)", pair.type_name()));
            };
            let [Value::Symbol(name), expr] = pair.as_slice() else {
                return Err(EvalError::domain("let", "binding must be (name value)"));
            };
            let value = self.eval(host, expr, &current)?;
            current = Frame::extend(&current, HashMap::from([(name.clone(), value)]));
        }
        self.eval_body(host, body, &current)
    }

    fn special_and(&self, host: &mut H, rest: &[Value], scope: &Scope) -> EvalResult {
        let mut last = Value::Bool(true);
        for form in rest {
            last = self.eval(host, form, scope)?;
            if !last.is_truthy() {
                break;
            }
        }
        Ok(last)
    }

    fn special_or(&self, host: &mut H, rest: &[Value], scope: &Scope) -> EvalResult {
        let mut last = Value::Nil;
        for form in rest {
            last = self.eval(host, form, scope)?;
            if last.is_truthy() {
                break;
            }
        }
        Ok(last)
    }
}

fn special_quote(rest: &[Value]) -> EvalResult {
    match rest {
        [quoted] => Ok(quoted.clone()),
        _ => Err(EvalError::arity("quote", "1", rest.len())),
    }
}

fn special_fn(rest: &[Value], scope: &Scope) -> EvalResult {
    let Some((Value::List(params), body)) = rest.split_first() else {
        return Err(EvalError::type_error(
            "fn",
            "parameter list",
            rest.first().map(Value::type_name).unwrap_or("nothing"),
        ));
    };
    let params = params
        .iter()
        .map(|param| match param {
            Value::Symbol(name) => Ok(name.clone()),
            other => Err(EvalError::type_error("fn", "symbol", other.type_name())),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Lambda(Rc::new(Lambda {
        params,
        body: body.to_vec(),
        scope: scope.clone(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::read_program;
    use crate::core::state::{TestState, VirtualFiles};
    use crate::core::value::Bindings;

    fn eval_str(source: &str) -> EvalResult {
        let table = primitives::pure_primitives::<TestState>()
            .into_iter()
            .map(|(name, primitive)| (name.to_string(), primitive))
            .collect::<PrimitiveTable<TestState>>();
        let bindings: Bindings = table
            .keys()
            .map(|name| (name.clone(), Value::Builtin(name.clone())))
            .collect();
        let mut state = TestState::new(Vec::new(), VirtualFiles::new(), bindings);
        let forms = read_program(source)?;
        Evaluator::new(&table).eval_program(&mut state, &forms)
    }

    #[test]
    fn empty_program_is_nil() {
        assert_eq!(eval_str("").expect("eval"), Value::Nil);
    }

    #[test]
    fn last_form_is_the_result() {
        assert_eq!(eval_str("1 2 (+ 1 2)").expect("eval"), Value::Int(3));
    }

    #[test]
    fn def_binds_for_later_forms() {
        let result = eval_str("(def double (fn (x) (* x 2))) (double 21)").expect("eval");
        assert_eq!(result, Value::Int(42));
    }

    #[test]
    fn closures_capture_let_scope() {
        let source = "(def make (fn (n) (fn (x) (+ x n)))) (let ((add5 (make 5))) (add5 1))";
        assert_eq!(eval_str(source).expect("eval"), Value::Int(6));
    }

    #[test]
    fn recursion_through_global_binding() {
        let source = "(def fact (fn (n) (if (<= n 1) 1 (* n (fact (- n 1)))))) (fact 10)";
        assert_eq!(eval_str(source).expect("eval"), Value::Int(3_628_800));
    }

    #[test]
    fn and_or_short_circuit() {
        assert_eq!(eval_str("(and 1 false undefined)").expect("eval"), Value::Bool(false));
        assert_eq!(eval_str("(or nil 2 undefined)").expect("eval"), Value::Int(2));
    }

    #[test]
    fn unbound_symbol_is_an_error() {
        let err = eval_str("(missing 1)").unwrap_err();
        assert_eq!(err, EvalError::Unbound("missing".to_string()));
    }

    #[test]
    fn calling_a_number_is_not_callable() {
        let err = eval_str("(1 2)").unwrap_err();
        assert_eq!(err.kind(), "not_callable");
    }

    #[test]
    fn lambda_arity_is_checked() {
        let err = eval_str("((fn (a b) a) 1)").unwrap_err();
        assert_eq!(err.kind(), "arity");
    }

    #[test]
    fn evaluation_stops_at_first_error() {
        let err = eval_str("(def x 1) (error \"boom\") (def x 2)").unwrap_err();
        assert_eq!(err, EvalError::Raised("boom".to_string()));
    }

    #[test]
    fn unbounded_recursion_fails_with_depth_error() {
        let err = eval_str("(def f (fn (n) (+ 1 (f (+ n 1))))) (f 0)").unwrap_err();
        assert_eq!(
            err,
            EvalError::DepthExceeded {
                limit: MAX_EVAL_DEPTH
            }
        );
    }

    #[test]
    fn depth_is_released_after_each_call() {
        let source = "(def down (fn (n) (if (= n 0) 0 (down (- n 1))))) (down 60) (down 60) (down 60)";
        assert_eq!(eval_str(source).expect("eval"), Value::Int(0));
    }

    #[test]
    fn parse_errors_surface_as_eval_errors() {
        let err = eval_str("(+ 1").unwrap_err();
        assert_eq!(err.kind(), "parse");
    }
}
