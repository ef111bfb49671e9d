//! # Negotiation Registry
//!
//! Stores negotiations and applies the two mutations the protocol allows:
//! bid/expiry updates while unsigned, and one confirmation per side. Records
//! are never deleted.
//!
//! Authorization reads the permission registry; signature verification reads
//! public keys through the account directory; taker exclusivity reads the
//! seller's asset reservation through the [`TakerDirectory`] capability — the
//! registry itself holds no wallet state.

use std::collections::BTreeMap;

use tracing::debug;

use rwa_acl::AclRegistry;
use rwa_core::{
    AccountAddress, AccountDirectory, Event, ExecutionContext, FeedbackKind, LedgerError,
    NegotiationId, PegHash, ReputationSink, TakerDirectory,
};
use rwa_crypto::verify_signature;

use crate::types::{BidConfirmation, BidProposal, Negotiation, TradeSide};

/// All bilateral negotiations, keyed by their deterministic identifier.
#[derive(Debug, Clone, Default)]
pub struct NegotiationRegistry {
    negotiations: BTreeMap<NegotiationId, Negotiation>,
}

impl NegotiationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The negotiation with the given identifier, if any.
    pub fn get(&self, id: &NegotiationId) -> Option<&Negotiation> {
        self.negotiations.get(id)
    }

    /// The negotiation for a trade triple.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no negotiation exists for the
    /// triple.
    pub fn details(
        &self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
    ) -> Result<&Negotiation, LedgerError> {
        let id = NegotiationId::derive(buyer, seller, peg_hash);
        self.negotiations
            .get(&id)
            .ok_or_else(|| LedgerError::NotFound(format!("negotiation {id}")))
    }

    /// Iterate all negotiations in identifier order.
    pub fn negotiations(&self) -> impl Iterator<Item = &Negotiation> {
        self.negotiations.values()
    }

    /// Create or update the bid and expiry of a negotiation.
    ///
    /// Both parties must hold the `negotiation` capability, the counterparty
    /// must match any taker reservation on the traded peg, and no signature
    /// may have been recorded yet.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Unauthorized`] on a missing capability or a taker
    ///   mismatch.
    /// - [`LedgerError::AlreadyConfirmed`] once either side has signed.
    pub fn change_bid(
        &mut self,
        ctx: &mut ExecutionContext,
        acl: &AclRegistry,
        takers: &dyn TakerDirectory,
        reputation: &mut dyn ReputationSink,
        proposal: BidProposal,
    ) -> Result<(), LedgerError> {
        validate_terms(&proposal)?;
        self.check_negotiate_capability(acl, &proposal)?;
        check_taker(takers, &proposal)?;

        let id = proposal.negotiation_id();
        let mut negotiation = self
            .negotiations
            .get(&id)
            .cloned()
            .unwrap_or_else(|| {
                Negotiation::new(
                    proposal.buyer.clone(),
                    proposal.seller.clone(),
                    proposal.peg_hash.clone(),
                )
            });

        if negotiation.buyer_signature.is_some() || negotiation.seller_signature.is_some() {
            return Err(LedgerError::AlreadyConfirmed);
        }

        negotiation.bid = proposal.bid;
        negotiation.expiry = proposal.expiry;

        debug!(negotiation = %id, bid = proposal.bid, expiry = proposal.expiry, "changing bid");
        self.negotiations.insert(id.clone(), negotiation);

        ctx.emit(
            Event::new("change_negotiation_bid")
                .attribute("negotiation_id", id.to_hex())
                .attribute("buyer_address", proposal.buyer.to_hex())
                .attribute("seller_address", proposal.seller.to_hex())
                .attribute("peg_hash", proposal.peg_hash.to_hex()),
        );
        reputation.record_positive(FeedbackKind::ChangeBid, &proposal.buyer);
        reputation.record_positive(FeedbackKind::ChangeBid, &proposal.seller);
        Ok(())
    }

    /// Record one side's confirmation of the stored terms.
    ///
    /// The submitted bid must match the stored bid, the signature must verify
    /// against the signer's registered public key over the canonical sign
    /// doc, and the negotiation must not already carry both signatures. On
    /// success the side's signature, contract hash, and the current block
    /// height are stored.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Unauthorized`] on missing capabilities or a taker
    ///   mismatch.
    /// - [`LedgerError::AlreadyConfirmed`] if both signatures already exist.
    /// - [`LedgerError::InvalidArgument`] on a bid mismatch.
    /// - [`LedgerError::NotFound`] if the signer has no registered key.
    /// - [`LedgerError::InvalidSignature`] if verification fails.
    pub fn confirm_bid(
        &mut self,
        ctx: &mut ExecutionContext,
        acl: &AclRegistry,
        takers: &dyn TakerDirectory,
        directory: &dyn AccountDirectory,
        reputation: &mut dyn ReputationSink,
        confirmation: BidConfirmation,
    ) -> Result<(), LedgerError> {
        let proposal = confirmation.proposal.clone();
        validate_terms(&proposal)?;
        self.check_confirm_capability(acl, &proposal)?;
        check_taker(takers, &proposal)?;

        let id = proposal.negotiation_id();
        let mut negotiation = self.negotiations.get(&id).cloned().unwrap_or_else(|| {
            let mut fresh = Negotiation::new(
                proposal.buyer.clone(),
                proposal.seller.clone(),
                proposal.peg_hash.clone(),
            );
            fresh.bid = proposal.bid;
            fresh
        });

        if negotiation.is_fully_confirmed() {
            return Err(LedgerError::AlreadyConfirmed);
        }
        if negotiation.bid != proposal.bid {
            return Err(LedgerError::InvalidArgument(format!(
                "bid mismatch: negotiation holds {}, confirmation carries {}",
                negotiation.bid, proposal.bid
            )));
        }

        negotiation.expiry = proposal.expiry;

        let signer = match confirmation.side {
            TradeSide::Buyer => &proposal.buyer,
            TradeSide::Seller => &proposal.seller,
        };
        let public_key = directory.public_key(signer).ok_or_else(|| {
            LedgerError::NotFound(format!("public key for account {signer}"))
        })?;
        let sign_bytes = proposal
            .sign_doc()
            .sign_bytes()
            .map_err(|e| LedgerError::InvalidArgument(e.to_string()))?;
        verify_signature(&public_key, &confirmation.signature, &sign_bytes).map_err(|e| {
            LedgerError::InvalidSignature(format!(
                "{} signature rejected: {e}",
                confirmation.side
            ))
        })?;

        match confirmation.side {
            TradeSide::Buyer => {
                negotiation.buyer_signature = Some(confirmation.signature);
                negotiation.buyer_block_height = ctx.block_height();
                negotiation.buyer_contract_hash = confirmation.contract_hash;
            }
            TradeSide::Seller => {
                negotiation.seller_signature = Some(confirmation.signature);
                negotiation.seller_block_height = ctx.block_height();
                negotiation.seller_contract_hash = confirmation.contract_hash;
            }
        }

        debug!(negotiation = %id, side = %confirmation.side, "confirming bid");
        self.negotiations.insert(id.clone(), negotiation);

        ctx.emit(
            Event::new("confirm_negotiation_bid")
                .attribute("negotiation_id", id.to_hex())
                .attribute("buyer_address", proposal.buyer.to_hex())
                .attribute("seller_address", proposal.seller.to_hex())
                .attribute("peg_hash", proposal.peg_hash.to_hex()),
        );
        reputation.record_positive(FeedbackKind::ConfirmBid, &proposal.buyer);
        reputation.record_positive(FeedbackKind::ConfirmBid, &proposal.seller);
        Ok(())
    }

    fn check_negotiate_capability(
        &self,
        acl: &AclRegistry,
        proposal: &BidProposal,
    ) -> Result<(), LedgerError> {
        let buyer_acl = acl
            .account_acl(&proposal.buyer)
            .map_err(|_| unauthorized(&proposal.buyer))?;
        let seller_acl = acl
            .account_acl(&proposal.seller)
            .map_err(|_| unauthorized(&proposal.seller))?;
        if !buyer_acl.acl.negotiation || !seller_acl.acl.negotiation {
            return Err(LedgerError::Unauthorized(
                "both parties must hold the negotiation capability".to_string(),
            ));
        }
        Ok(())
    }

    fn check_confirm_capability(
        &self,
        acl: &AclRegistry,
        proposal: &BidProposal,
    ) -> Result<(), LedgerError> {
        let buyer_acl = acl
            .account_acl(&proposal.buyer)
            .map_err(|_| unauthorized(&proposal.buyer))?;
        let seller_acl = acl
            .account_acl(&proposal.seller)
            .map_err(|_| unauthorized(&proposal.seller))?;
        if !buyer_acl.acl.confirm_buyer_bid || !seller_acl.acl.confirm_seller_bid {
            return Err(LedgerError::Unauthorized(
                "both parties must hold their confirm-bid capability".to_string(),
            ));
        }
        Ok(())
    }
}

fn unauthorized(address: &AccountAddress) -> LedgerError {
    LedgerError::Unauthorized(format!("no acl record for account {address}"))
}

/// Terms must carry a positive bid and a non-negative expiry height.
fn validate_terms(proposal: &BidProposal) -> Result<(), LedgerError> {
    if proposal.bid <= 0 {
        return Err(LedgerError::InvalidArgument(
            "bid must be positive".to_string(),
        ));
    }
    if proposal.expiry < 0 {
        return Err(LedgerError::InvalidArgument(
            "expiry height must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Reject the proposal when the traded peg carries a taker reservation for a
/// different counterparty.
fn check_taker(takers: &dyn TakerDirectory, proposal: &BidProposal) -> Result<(), LedgerError> {
    if let Some(taker) = takers.taker_address(&proposal.seller, &proposal.peg_hash) {
        if taker != proposal.buyer {
            return Err(LedgerError::Unauthorized(format!(
                "trade is reserved for counterparty {taker}"
            )));
        }
    }
    Ok(())
}
