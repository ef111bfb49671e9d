//! # rwa-crypto — Cryptographic Primitives for the Settlement Core
//!
//! This crate provides the cryptographic building blocks the core consumes:
//!
//! - **Ed25519 verification** for negotiation confirmations. The core never
//!   signs anything in production — it consumes signatures produced off-path
//!   by the parties' own key infrastructure.
//! - **Account address derivation** from Ed25519 public keys: the first 20
//!   bytes of `SHA-256(pubkey)`.
//! - **Canonical sign-doc encoding** for the negotiation tuple
//!   `(buyer, seller, pegHash, bid, expiry)`, so both parties sign byte-equal
//!   payloads.

pub mod ed25519;
pub mod error;
pub mod sign_doc;

// Re-export primary types.
pub use ed25519::{derive_account_address, verify_signature};
pub use error::CryptoError;
pub use sign_doc::NegotiationSignDoc;
