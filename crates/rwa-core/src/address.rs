//! # Account Addressing
//!
//! Accounts are addressed by an opaque byte value derived from an Ed25519
//! public key: the first 20 bytes of `SHA-256(pubkey)`. The derivation itself
//! lives in `rwa-crypto`; this module only defines the address and public-key
//! byte containers so that downstream crates can name them without pulling in
//! the cryptography stack.
//!
//! Addresses are hex-encodable and compare bytewise, which gives every keyed
//! store in the workspace a deterministic iteration order.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Number of bytes in an account address.
pub const ADDRESS_LENGTH: usize = 20;

/// An opaque account address.
///
/// The sole addressing scheme in the settlement core. There is no reverse
/// mapping to a human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountAddress(Vec<u8>);

impl AccountAddress {
    /// Create an address from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidArgument`] if `bytes` is empty.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, LedgerError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "account address must not be empty".to_string(),
            ));
        }
        Ok(Self(bytes))
    }

    /// Parse an address from a hex string.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidArgument`] on malformed hex or empty
    /// input.
    pub fn from_hex(value: &str) -> Result<Self, LedgerError> {
        let bytes = hex::decode(value)
            .map_err(|e| LedgerError::InvalidArgument(format!("invalid address hex: {e}")))?;
        Self::from_bytes(bytes)
    }

    /// Access the raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex encoding of the address.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for AccountAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Raw Ed25519 public key bytes.
///
/// Carried through the [`crate::directory::AccountDirectory`] lookup so the
/// negotiation registry can verify signatures without this crate depending on
/// the cryptography stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKeyBytes(pub [u8; 32]);

impl PublicKeyBytes {
    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex encoding of the key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for PublicKeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_from_bytes_roundtrip() {
        let addr = AccountAddress::from_bytes(vec![0xAB; ADDRESS_LENGTH]).unwrap();
        assert_eq!(addr.as_bytes().len(), ADDRESS_LENGTH);
        assert_eq!(AccountAddress::from_hex(&addr.to_hex()).unwrap(), addr);
    }

    #[test]
    fn address_rejects_empty() {
        assert!(AccountAddress::from_bytes(Vec::new()).is_err());
        assert!(AccountAddress::from_hex("").is_err());
    }

    #[test]
    fn address_rejects_bad_hex() {
        assert!(AccountAddress::from_hex("zz").is_err());
    }

    #[test]
    fn address_display_is_hex() {
        let addr = AccountAddress::from_bytes(vec![0x01, 0x02]).unwrap();
        assert_eq!(format!("{addr}"), "0102");
    }

    #[test]
    fn address_serde_roundtrip() {
        let addr = AccountAddress::from_bytes(vec![0x42; 4]).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"42424242\"");
        let back: AccountAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn address_ordering_is_bytewise() {
        let a = AccountAddress::from_bytes(vec![0x01]).unwrap();
        let b = AccountAddress::from_bytes(vec![0x02]).unwrap();
        assert!(a < b);
    }
}
