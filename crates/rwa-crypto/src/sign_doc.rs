//! # Negotiation Sign Doc
//!
//! Both parties to a negotiation sign the same canonical tuple
//! `(buyer, seller, pegHash, bid, expiry)`. The byte encoding is the JSON
//! serialization of [`NegotiationSignDoc`] in declaration order, with
//! identifiers hex-encoded — deterministic for a given tuple, so signer and
//! verifier always agree on the message bytes.

use serde::{Deserialize, Serialize};

use rwa_core::{AccountAddress, PegHash};

use crate::error::CryptoError;

/// The canonical payload a negotiation confirmation signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationSignDoc {
    pub buyer: AccountAddress,
    pub seller: AccountAddress,
    pub peg_hash: PegHash,
    pub bid: i64,
    pub expiry: i64,
}

impl NegotiationSignDoc {
    /// Canonical message bytes to sign and verify.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encoding`] if serialization fails.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        serde_json::to_vec(self).map_err(|e| CryptoError::Encoding(e.to_string()))
    }
}
