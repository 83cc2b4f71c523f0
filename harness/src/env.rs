//! Assembly of base environments: primitive tables plus initial bindings.

use crate::bus::bus_primitives;
use crate::capability::Runtime;
use crate::core::state::TestState;
use crate::core::value::{Bindings, Value};
use crate::eval::primitives::{detached_bus_primitives, effect_primitives, pure_primitives};
use crate::eval::{Primitive, PrimitiveTable};

/// Reserved identifier bound to `true` in test environments.
pub const TEST_MODE_BINDING: &str = "*test-mode*";

/// Everything a run starts from: callable primitives and the initial bindings.
///
/// Every primitive is also bound under its own name, so programs can pass
/// builtins around as values.
pub struct BaseEnv<H> {
    primitives: PrimitiveTable<H>,
    bindings: Bindings,
}

impl<H> Clone for BaseEnv<H> {
    fn clone(&self) -> Self {
        Self {
            primitives: self.primitives.clone(),
            bindings: self.bindings.clone(),
        }
    }
}

impl<H> Default for BaseEnv<H> {
    fn default() -> Self {
        Self {
            primitives: PrimitiveTable::new(),
            bindings: Bindings::new(),
        }
    }
}

impl<H> BaseEnv<H> {
    /// Register `primitive` under `name`, replacing any previous definition.
    pub fn with_primitive(mut self, name: &str, primitive: Primitive<H>) -> Self {
        self.primitives.insert(name.to_string(), primitive);
        self.bindings
            .insert(name.to_string(), Value::Builtin(name.to_string()));
        self
    }

    pub fn with_primitives(self, entries: Vec<(&'static str, Primitive<H>)>) -> Self {
        entries
            .into_iter()
            .fold(self, |env, (name, primitive)| env.with_primitive(name, primitive))
    }

    pub fn with_binding(mut self, name: &str, value: Value) -> Self {
        self.bindings.insert(name.to_string(), value);
        self
    }

    pub fn primitives(&self) -> &PrimitiveTable<H> {
        &self.primitives
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn has_primitive(&self, name: &str) -> bool {
        self.primitives.contains_key(name)
    }
}

/// Environment with no effect primitives, for programs known to be pure.
pub fn pure_env<H>() -> BaseEnv<H> {
    BaseEnv::default().with_primitives(pure_primitives())
}

/// The production primitive set. `send!`/`receive!` have no bus attached.
pub fn production_env<H: Runtime>() -> BaseEnv<H> {
    pure_env()
        .with_primitives(effect_primitives())
        .with_primitives(detached_bus_primitives())
}

/// Production environment with the simulated bus and the test-mode flag set.
pub fn test_env() -> BaseEnv<TestState> {
    production_env::<TestState>()
        .with_primitives(bus_primitives())
        .with_binding(TEST_MODE_BINDING, Value::Bool(true))
}
