//! # rwa-negotiation — Bilateral Trade Negotiation
//!
//! Two parties agree on trade terms off the critical path: either side (with
//! the `negotiation` capability) proposes or updates a bid and expiry, then
//! each side confirms by signing the canonical tuple
//! `(buyer, seller, pegHash, bid, expiry)` with its registered Ed25519 key.
//!
//! A negotiation is identified deterministically by `(buyer, seller, pegHash)`
//! — there is no allocation step — and becomes immutable once both signatures
//! are present. Confirmation records the block height at which each side
//! signed; settlement deadlines are measured from those heights.

pub mod registry;
pub mod types;

// Re-export primary types.
pub use registry::NegotiationRegistry;
pub use types::{BidConfirmation, BidProposal, Negotiation, TradeSide};
