//! # rwa-core — Foundational Types for the RWA Settlement Core
//!
//! This crate provides the building blocks shared by every other crate in the
//! workspace:
//!
//! - **Addressing and identifiers** ([`address`], [`ids`]): account addresses
//!   derived from public keys, zone/organization identifiers, peg hashes, and
//!   deterministic negotiation identifiers.
//! - **Error taxonomy** ([`error`]): the single [`LedgerError`] enum every
//!   state-transition operation returns.
//! - **Execution context** ([`context`]): block height, chain identifier, and
//!   the audit event buffer each transaction writes into.
//! - **Collaborator traits** ([`directory`]): the account/key lookup and
//!   reputation sink capabilities the surrounding node injects.
//!
//! Nothing in this crate performs I/O or holds locks. The settlement core is
//! single-threaded per ledger state version; these types are plain data.

pub mod address;
pub mod context;
pub mod directory;
pub mod error;
pub mod ids;

// Re-export primary types.
pub use address::{AccountAddress, PublicKeyBytes};
pub use context::{Event, ExecutionContext};
pub use directory::{
    AccountDirectory, FeedbackKind, MemoryAccountDirectory, ReputationSink, TakerDirectory,
};
pub use error::LedgerError;
pub use ids::{NegotiationId, OrganizationId, PegHash, ZoneId};
