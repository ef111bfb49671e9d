//! # External Collaborator Traits
//!
//! The settlement core consumes three capabilities from the surrounding node:
//!
//! - [`AccountDirectory`]: account-number and public-key lookup. The genesis
//!   account is the one whose account number is zero; public keys back
//!   negotiation signature verification.
//! - [`ReputationSink`]: one-way feedback recording. Calls never fail and
//!   never block.
//! - [`TakerDirectory`]: exclusivity lookup — whether an asset peg in a
//!   seller's wallet is reserved for a specific counterparty. Implemented by
//!   the wallet store; consumed by the negotiation registry so that it does
//!   not depend on wallet internals.
//!
//! [`MemoryAccountDirectory`] is the in-memory implementation used by tests
//! and by embedders that keep account metadata alongside the core.

use std::collections::BTreeMap;

use crate::address::{AccountAddress, PublicKeyBytes};
use crate::ids::PegHash;

/// Account metadata lookup.
pub trait AccountDirectory {
    /// The account number assigned by the account service, if the account
    /// exists. Account number zero designates the genesis account.
    fn account_number(&self, address: &AccountAddress) -> Option<u64>;

    /// The account's registered public key, if any.
    fn public_key(&self, address: &AccountAddress) -> Option<PublicKeyBytes>;
}

/// Operation kinds tracked by the reputation sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeedbackKind {
    SendAsset,
    SendFiat,
    BuyerExecuteOrder,
    SellerExecuteOrder,
    ChangeBid,
    ConfirmBid,
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SendAsset => "send_asset",
            Self::SendFiat => "send_fiat",
            Self::BuyerExecuteOrder => "buyer_execute_order",
            Self::SellerExecuteOrder => "seller_execute_order",
            Self::ChangeBid => "change_bid",
            Self::ConfirmBid => "confirm_bid",
        };
        write!(f, "{name}")
    }
}

/// One-way reputation feedback. Implementations must be infallible.
pub trait ReputationSink {
    /// Record a positive feedback event for `address`.
    fn record_positive(&mut self, kind: FeedbackKind, address: &AccountAddress);

    /// Record a negative feedback event for `address`.
    fn record_negative(&mut self, kind: FeedbackKind, address: &AccountAddress);
}

/// Lookup of asset-peg exclusivity reservations.
pub trait TakerDirectory {
    /// The taker reservation on the peg `peg_hash` held by `seller`, if the
    /// peg exists in the seller's wallet and carries one. `None` both when
    /// the peg is absent and when it is unreserved — absence of the peg is
    /// not this lookup's concern.
    fn taker_address(
        &self,
        seller: &AccountAddress,
        peg_hash: &PegHash,
    ) -> Option<AccountAddress>;
}

/// In-memory account directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountDirectory {
    accounts: BTreeMap<AccountAddress, AccountEntry>,
}

#[derive(Debug, Clone)]
struct AccountEntry {
    number: u64,
    public_key: Option<PublicKeyBytes>,
}

impl MemoryAccountDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account with its number and optional public key.
    /// Re-registering an address overwrites the previous entry.
    pub fn register(
        &mut self,
        address: AccountAddress,
        number: u64,
        public_key: Option<PublicKeyBytes>,
    ) {
        self.accounts
            .insert(address, AccountEntry { number, public_key });
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountDirectory for MemoryAccountDirectory {
    fn account_number(&self, address: &AccountAddress) -> Option<u64> {
        self.accounts.get(address).map(|entry| entry.number)
    }

    fn public_key(&self, address: &AccountAddress) -> Option<PublicKeyBytes> {
        self.accounts.get(address).and_then(|entry| entry.public_key)
    }
}
