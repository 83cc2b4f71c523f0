//! Simulated message bus: `send!` and `receive!` over the chain logs.
//!
//! `receive!` is a polling read. It never consumes entries, so callers keep
//! their own offset and may re-read any suffix of an address's log.

use tracing::debug;

use crate::core::state::TestState;
use crate::core::value::Value;
use crate::eval::primitives::{expect_arity, expect_index, expect_str};
use crate::eval::{EvalResult, Primitive};

/// `(send! address value)`: append `value` to `address`'s log.
///
/// Returns the empty sequence.
pub fn send(state: &mut TestState, args: &[Value]) -> EvalResult {
    expect_arity("send!", args, 2)?;
    let address = expect_str("send!", &args[0])?;
    state.chain_logs_mut().append(address, args[1].clone());
    debug!(address, len = state.chain_logs().len(address), "send!");
    Ok(Value::empty())
}

/// `(receive! address offset)`: every entry of `address`'s log at or past `offset`.
pub fn receive(state: &mut TestState, args: &[Value]) -> EvalResult {
    expect_arity("receive!", args, 2)?;
    let address = expect_str("receive!", &args[0])?;
    let offset = expect_index("receive!", &args[1])?;
    let entries = state.chain_logs().read_from(address, offset);
    debug!(address, offset, returned = entries.len(), "receive!");
    Ok(Value::List(entries.to_vec()))
}

/// The simulated bus primitives, keyed by their program-visible names.
pub fn bus_primitives() -> Vec<(&'static str, Primitive<TestState>)> {
    vec![
        ("send!", send as Primitive<TestState>),
        ("receive!", receive as Primitive<TestState>),
    ]
}
