//! # Ed25519 Verification & Address Derivation
//!
//! The settlement core treats public keys and signatures as opaque bytes up
//! to this boundary. Verification parses them into `ed25519-dalek` types and
//! checks the signature over the caller-supplied message bytes.
//!
//! Account addresses are the first [`ADDRESS_LENGTH`](rwa_core::address::ADDRESS_LENGTH)
//! bytes of `SHA-256(pubkey)` — an opaque, collision-resistant handle with no
//! reverse mapping.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use rwa_core::address::ADDRESS_LENGTH;
use rwa_core::{AccountAddress, PublicKeyBytes};

use crate::error::CryptoError;

/// Derive the account address for an Ed25519 public key.
pub fn derive_account_address(public_key: &PublicKeyBytes) -> AccountAddress {
    let digest = Sha256::digest(public_key.as_bytes());
    AccountAddress::from_bytes(digest[..ADDRESS_LENGTH].to_vec())
        .expect("sha-256 digest prefix is non-empty")
}

/// Verify an Ed25519 signature over `message`.
///
/// # Errors
///
/// - [`CryptoError::InvalidPublicKey`] if the key bytes are not a valid
///   curve point.
/// - [`CryptoError::InvalidSignatureLength`] if the signature is not 64
///   bytes.
/// - [`CryptoError::VerificationFailed`] if the signature does not verify.
pub fn verify_signature(
    public_key: &PublicKeyBytes,
    signature: &[u8],
    message: &[u8],
) -> Result<(), CryptoError> {
    let verifying_key = VerifyingKey::from_bytes(public_key.as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    let signature_bytes: [u8; 64] = signature
        .try_into()
        .map_err(|_| CryptoError::InvalidSignatureLength(signature.len()))?;
    let signature = Signature::from_bytes(&signature_bytes);

    verifying_key
        .verify(message, &signature)
        .map_err(|e| CryptoError::VerificationFailed(e.to_string()))
}
