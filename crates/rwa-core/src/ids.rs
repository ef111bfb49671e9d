//! # Registry & Peg Identifiers
//!
//! Newtypes for the identifiers used across the settlement core. Each is a
//! distinct type — a [`ZoneId`] cannot be passed where an [`OrganizationId`]
//! is expected.
//!
//! [`PegHash`] values are assigned from per-ledger monotonic sequences and
//! encoded as 8 fixed bytes, big-endian, so bytewise comparison matches
//! numeric issuance order. [`NegotiationId`] is fully determined by its
//! `(buyer, seller, peg hash)` triple; there is no separate allocation step.

use serde::{Deserialize, Serialize};

use crate::address::AccountAddress;
use crate::error::LedgerError;

/// Implements hex-string `Serialize`/`Deserialize` and `Display` for a byte
/// newtype, routing deserialization through `from_hex` so malformed values
/// are rejected rather than silently accepted.
macro_rules! impl_hex_id {
    ($ty:ident) => {
        impl $ty {
            /// Parse the identifier from a hex string.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::InvalidArgument`] on malformed hex or
            /// empty input.
            pub fn from_hex(value: &str) -> Result<Self, LedgerError> {
                let bytes = hex::decode(value).map_err(|e| {
                    LedgerError::InvalidArgument(format!(
                        concat!("invalid ", stringify!($ty), " hex: {}"),
                        e
                    ))
                })?;
                Self::from_bytes(bytes)
            }

            /// Access the raw identifier bytes.
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// Hex encoding of the identifier.
            pub fn to_hex(&self) -> String {
                hex::encode(&self.0)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::from_hex(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Identifier of a zone, chosen by the defining authority.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneId(Vec<u8>);

impl ZoneId {
    /// Create a zone identifier from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidArgument`] if `bytes` is empty.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, LedgerError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "zone id must not be empty".to_string(),
            ));
        }
        Ok(Self(bytes))
    }
}

impl_hex_id!(ZoneId);

/// Identifier of an organization, chosen by its zone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrganizationId(Vec<u8>);

impl OrganizationId {
    /// Create an organization identifier from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidArgument`] if `bytes` is empty.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, LedgerError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "organization id must not be empty".to_string(),
            ));
        }
        Ok(Self(bytes))
    }
}

impl_hex_id!(OrganizationId);

/// Reference hash of an asset or fiat peg.
///
/// Assigned once at issuance from a monotonic per-ledger sequence and
/// immutable thereafter. The big-endian fixed-width encoding makes bytewise
/// order equal issuance order, which the sorted wallets rely on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PegHash(Vec<u8>);

impl PegHash {
    /// Number of bytes in a sequence-derived peg hash.
    pub const LENGTH: usize = 8;

    /// Derive the peg hash for the given sequence number.
    pub fn from_sequence(sequence: u64) -> Self {
        Self(sequence.to_be_bytes().to_vec())
    }

    /// Create a peg hash from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidArgument`] if `bytes` is empty.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, LedgerError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "peg hash must not be empty".to_string(),
            ));
        }
        Ok(Self(bytes))
    }
}

impl_hex_id!(PegHash);

/// Deterministic identifier of a bilateral negotiation and its escrow record:
/// the concatenation `buyer ‖ seller ‖ pegHash`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NegotiationId(Vec<u8>);

impl NegotiationId {
    /// Derive the identifier for a `(buyer, seller, peg hash)` triple.
    pub fn derive(buyer: &AccountAddress, seller: &AccountAddress, peg_hash: &PegHash) -> Self {
        let mut bytes =
            Vec::with_capacity(buyer.as_bytes().len() + seller.as_bytes().len() + peg_hash.as_bytes().len());
        bytes.extend_from_slice(buyer.as_bytes());
        bytes.extend_from_slice(seller.as_bytes());
        bytes.extend_from_slice(peg_hash.as_bytes());
        Self(bytes)
    }

    /// Create an identifier from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidArgument`] if `bytes` is empty.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, LedgerError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "negotiation id must not be empty".to_string(),
            ));
        }
        Ok(Self(bytes))
    }
}

impl_hex_id!(NegotiationId);
