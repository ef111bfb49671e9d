//! # Ledger Error Taxonomy
//!
//! The single error type every state-transition operation returns. All
//! variants are terminal for the transaction that produced them and are never
//! retried by the core; callers decide whether to resubmit. A failing
//! transaction commits no effects — see the validate-then-mutate contract in
//! `rwa-settlement`.

use thiserror::Error;

/// Errors from settlement-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Capability missing or wrong caller.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Zone, organization, account, peg, or negotiation absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Zone or organization identifier collision.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Fiat or asset shortfall.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Negotiation signature failed verification.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The negotiation already carries a confirmation signature that forbids
    /// this mutation.
    #[error("negotiation is already confirmed")]
    AlreadyConfirmed,

    /// Moderated asset not yet released by its zone.
    #[error("asset {0} is locked")]
    AssetLocked(String),

    /// The negotiation deadline has elapsed.
    #[error("negotiation expired: deadline height {deadline}, current height {current}")]
    NegotiationExpired { deadline: i64, current: i64 },

    /// Malformed quantity, amount, or identifier.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
