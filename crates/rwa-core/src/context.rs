//! # Execution Context & Audit Events
//!
//! Each transaction is applied against an [`ExecutionContext`] supplied by the
//! surrounding transaction-processing layer: the current block height, the
//! chain identifier, and a buffer of structured audit [`Event`]s the operation
//! appends to. Events exist for external indexing; correctness never depends
//! on them.
//!
//! Block height is a monotonic logical counter. It is the only clock in the
//! core — negotiation expiry is a height comparison, not wall time.

use serde::{Deserialize, Serialize};

/// A structured audit event with string key/value attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event kind, e.g. `"issue_asset"` or `"execute_order"`.
    pub kind: String,
    /// Ordered attribute pairs.
    pub attributes: Vec<(String, String)>,
}

impl Event {
    /// Start a new event of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute, builder-style.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Look up an attribute value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Per-transaction execution context.
///
/// Constructed by the dispatch layer once per submitted transaction. The
/// event buffer is drained by the caller after the transaction commits;
/// events from failed transactions are discarded along with the state.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    chain_id: String,
    block_height: i64,
    events: Vec<Event>,
}

impl ExecutionContext {
    /// Create a context for the given chain at the given block height.
    pub fn new(chain_id: impl Into<String>, block_height: i64) -> Self {
        Self {
            chain_id: chain_id.into(),
            block_height,
            events: Vec::new(),
        }
    }

    /// The chain identifier.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// The current block height.
    pub fn block_height(&self) -> i64 {
        self.block_height
    }

    /// Append an audit event.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events emitted so far, in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Remove and return all buffered events.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
