//! Address-keyed append-only logs backing the simulated message bus.

use std::collections::BTreeMap;

use crate::core::value::Value;

/// Per-address logs of sent values, in send order.
///
/// Entries are only ever appended; reads never consume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainLogs {
    logs: BTreeMap<String, Vec<Value>>,
}

impl ChainLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the log for `address`, creating the log if absent.
    pub fn append(&mut self, address: &str, value: Value) {
        self.logs.entry(address.to_string()).or_default().push(value);
    }

    /// Entries at index `offset` and beyond.
    ///
    /// Unknown addresses and offsets at or past the end yield an empty slice.
    pub fn read_from(&self, address: &str, offset: usize) -> &[Value] {
        self.logs
            .get(address)
            .and_then(|log| log.get(offset..))
            .unwrap_or(&[])
    }

    pub fn len(&self, address: &str) -> usize {
        self.logs.get(address).map(Vec::len).unwrap_or(0)
    }

    /// Addresses that have received at least one value, sorted.
    pub fn addresses(&self) -> impl Iterator<Item = &str> + '_ {
        self.logs.keys().map(String::as_str)
    }
}
