//! # Cryptographic Error Types
//!
//! Structured errors for the cryptographic operations in `rwa-crypto`.
//! Callers in the registry crates map these onto the shared ledger taxonomy
//! (`LedgerError::InvalidSignature`) at the operation boundary.

use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Ed25519 signature verification failed.
    #[error("Ed25519 verification failed: {0}")]
    VerificationFailed(String),

    /// Invalid Ed25519 signature length.
    #[error("invalid Ed25519 signature length: expected 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// Invalid Ed25519 public key.
    #[error("invalid Ed25519 public key: {0}")]
    InvalidPublicKey(String),

    /// Sign-doc serialization failure.
    #[error("sign-doc encoding failed: {0}")]
    Encoding(String),
}
