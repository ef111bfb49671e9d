//! # Negotiation Records & Messages
//!
//! [`Negotiation`] is the stored record. [`BidProposal`] carries the terms a
//! party submits with change-bid, and [`BidConfirmation`] wraps a proposal
//! with one side's signature and optional contract hash.

use serde::{Deserialize, Serialize};

use rwa_core::{AccountAddress, NegotiationId, PegHash};
use rwa_crypto::NegotiationSignDoc;

/// Which party to the trade a message acts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buyer,
    Seller,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buyer => write!(f, "buyer"),
            Self::Seller => write!(f, "seller"),
        }
    }
}

/// Proposed trade terms for a `(buyer, seller, pegHash)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidProposal {
    pub buyer: AccountAddress,
    pub seller: AccountAddress,
    pub peg_hash: PegHash,
    pub bid: i64,
    pub expiry: i64,
}

impl BidProposal {
    /// The identifier of the negotiation these terms belong to.
    pub fn negotiation_id(&self) -> NegotiationId {
        NegotiationId::derive(&self.buyer, &self.seller, &self.peg_hash)
    }

    /// The canonical payload both parties sign.
    pub fn sign_doc(&self) -> NegotiationSignDoc {
        NegotiationSignDoc {
            buyer: self.buyer.clone(),
            seller: self.seller.clone(),
            peg_hash: self.peg_hash.clone(),
            bid: self.bid,
            expiry: self.expiry,
        }
    }
}

/// One side's confirmation of proposed terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidConfirmation {
    pub proposal: BidProposal,
    pub side: TradeSide,
    pub signature: Vec<u8>,
    pub contract_hash: Option<String>,
}

/// A stored bilateral negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Negotiation {
    pub id: NegotiationId,
    pub buyer: AccountAddress,
    pub seller: AccountAddress,
    pub peg_hash: PegHash,
    pub bid: i64,
    /// Expiry height of the agreed terms. Settlement deadlines add the
    /// per-side confirmation heights below.
    pub expiry: i64,
    pub buyer_signature: Option<Vec<u8>>,
    pub seller_signature: Option<Vec<u8>>,
    /// Block height at which the buyer confirmed (zero until then).
    pub buyer_block_height: i64,
    /// Block height at which the seller confirmed (zero until then).
    pub seller_block_height: i64,
    pub buyer_contract_hash: Option<String>,
    pub seller_contract_hash: Option<String>,
}

impl Negotiation {
    /// Create a fresh, unsigned negotiation for a trade triple.
    pub fn new(buyer: AccountAddress, seller: AccountAddress, peg_hash: PegHash) -> Self {
        Self {
            id: NegotiationId::derive(&buyer, &seller, &peg_hash),
            buyer,
            seller,
            peg_hash,
            bid: 0,
            expiry: 0,
            buyer_signature: None,
            seller_signature: None,
            buyer_block_height: 0,
            seller_block_height: 0,
            buyer_contract_hash: None,
            seller_contract_hash: None,
        }
    }

    /// Whether both parties have confirmed. A fully confirmed negotiation
    /// rejects every further mutation.
    pub fn is_fully_confirmed(&self) -> bool {
        self.buyer_signature.is_some() && self.seller_signature.is_some()
    }

    /// The confirmation height recorded for `side`.
    pub fn block_height(&self, side: TradeSide) -> i64 {
        match side {
            TradeSide::Buyer => self.buyer_block_height,
            TradeSide::Seller => self.seller_block_height,
        }
    }
}
