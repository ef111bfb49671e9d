// SPDX-License-Identifier: BUSL-1.1
//! # Settlement Engine
//!
//! Owns every store of the settlement core and applies one message at a
//! time. Authorization always happens through the permission registry before
//! the first store write; wallet mutations operate on owned copies that are
//! only committed once the operation can no longer fail.
//!
//! ## Execution & reversal
//!
//! `buyer_execute` / `seller_execute` drive one shared exchange routine. The
//! moderated path is triggered by the zone mediating for the executing party;
//! the unmoderated path is self-execution under the party's own capability.
//! The routine checks what is missing from escrow, enforces the per-side
//! settlement deadlines, records the caller's proof, and then either
//! completes the exchange (asset to buyer, negotiated bid to seller, excess
//! fiat back to buyer) or reverses it in full (asset to seller, fiat to
//! buyer). Terminal states leave the escrow record empty, so replaying an
//! execute message has nothing left to move.

use tracing::debug;

use rwa_acl::AclRegistry;
use rwa_core::{
    AccountAddress, AccountDirectory, Event, ExecutionContext, FeedbackKind, LedgerError,
    OrganizationId, PegHash, ReputationSink, ZoneId,
};
use rwa_escrow::EscrowStore;
use rwa_negotiation::{BidConfirmation, BidProposal, NegotiationRegistry};
use rwa_peg::{AssetPeg, FiatPeg, FiatWallet, WalletStore};
use rwa_reputation::ReputationBook;

use crate::msg::Msg;

/// The deterministic state-transition core, one instance per ledger state
/// version.
#[derive(Debug, Clone)]
pub struct SettlementEngine<D> {
    directory: D,
    acl: AclRegistry,
    wallets: WalletStore,
    escrow: EscrowStore,
    negotiations: NegotiationRegistry,
    reputation: ReputationBook,
}

impl<D: AccountDirectory> SettlementEngine<D> {
    /// Create an engine with empty stores over the given account directory.
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            acl: AclRegistry::new(),
            wallets: WalletStore::new(),
            escrow: EscrowStore::new(),
            negotiations: NegotiationRegistry::new(),
            reputation: ReputationBook::new(),
        }
    }

    /// Apply one decoded operation against the current state.
    ///
    /// # Errors
    ///
    /// Propagates the typed failure of the operation; on error no state
    /// mutation has been committed.
    pub fn apply(&mut self, ctx: &mut ExecutionContext, msg: Msg) -> Result<(), LedgerError> {
        debug!(kind = msg.kind(), height = ctx.block_height(), "applying message");
        match msg {
            Msg::DefineZone { from, to, zone_id } => self.define_zone(ctx, &from, &to, zone_id),
            Msg::DefineOrganization {
                from,
                to,
                organization_id,
                zone_id,
            } => self.define_organization(ctx, &from, &to, organization_id, zone_id),
            Msg::DefineAcl { from, to, record } => {
                self.acl.define_acl(ctx, &self.directory, &from, &to, record)
            }
            Msg::IssueAsset { issuer, to, asset } => self.issue_asset(ctx, &issuer, &to, asset),
            Msg::IssueFiat {
                issuer,
                to,
                transaction_id,
                transaction_amount,
            } => self.issue_fiat(ctx, &issuer, &to, transaction_id, transaction_amount),
            Msg::RedeemAsset {
                issuer,
                redeemer,
                peg_hash,
            } => self.redeem_asset(ctx, &issuer, &redeemer, &peg_hash),
            Msg::RedeemFiat {
                issuer,
                redeemer,
                amount,
            } => self.redeem_fiat(ctx, &issuer, &redeemer, amount),
            Msg::SendAsset { from, to, peg_hash } => self.send_asset(ctx, &from, &to, &peg_hash),
            Msg::SendFiat {
                from,
                to,
                peg_hash,
                amount,
            } => self.send_fiat(ctx, &from, &to, &peg_hash, amount),
            Msg::BuyerExecuteOrder {
                mediator,
                buyer,
                seller,
                peg_hash,
                fiat_proof_hash,
            } => self.buyer_execute(ctx, &mediator, &buyer, &seller, &peg_hash, &fiat_proof_hash),
            Msg::SellerExecuteOrder {
                mediator,
                buyer,
                seller,
                peg_hash,
                awb_proof_hash,
            } => self.seller_execute(ctx, &mediator, &buyer, &seller, &peg_hash, &awb_proof_hash),
            Msg::ReleaseAsset {
                zone,
                owner,
                peg_hash,
            } => self.release_asset(ctx, &zone, &owner, &peg_hash),
            Msg::ChangeBid { proposal } => self.change_bid(ctx, proposal),
            Msg::ConfirmBid { confirmation } => self.confirm_bid(ctx, confirmation),
        }
    }

    // -- Permission registry passthroughs -------------------------------------

    fn define_zone(
        &mut self,
        ctx: &mut ExecutionContext,
        from: &AccountAddress,
        to: &AccountAddress,
        zone_id: ZoneId,
    ) -> Result<(), LedgerError> {
        self.acl.define_zone(ctx, &self.directory, from, to, zone_id)
    }

    fn define_organization(
        &mut self,
        ctx: &mut ExecutionContext,
        from: &AccountAddress,
        to: &AccountAddress,
        organization_id: OrganizationId,
        zone_id: ZoneId,
    ) -> Result<(), LedgerError> {
        self.acl
            .define_organization(ctx, from, to, organization_id, zone_id)
    }

    // -- Issuance -------------------------------------------------------------

    /// Issue a new asset peg into `to`'s wallet.
    ///
    /// A moderated issuance requires the issuer to be `to`'s zone; an
    /// unmoderated issuance requires `to`'s own `issue_asset` capability.
    /// The peg starts locked iff moderated.
    fn issue_asset(
        &mut self,
        ctx: &mut ExecutionContext,
        issuer: &AccountAddress,
        to: &AccountAddress,
        mut asset: AssetPeg,
    ) -> Result<(), LedgerError> {
        if asset.quantity <= 0 || asset.price <= 0 {
            return Err(LedgerError::InvalidArgument(
                "asset quantity and price must be positive".to_string(),
            ));
        }

        let acl = if asset.moderated {
            self.acl.check_zone_and_get_acl(issuer, to)?
        } else {
            self.acl.account_acl(to)?.acl
        };
        if !acl.issue_asset {
            return Err(LedgerError::Unauthorized(format!(
                "assets cannot be issued to account {to}"
            )));
        }

        asset.peg_hash = self.wallets.next_asset_peg_hash();
        asset.locked = asset.moderated;
        asset.owner = Some(to.clone());

        let mut wallet = self.wallets.asset_wallet(to);
        let peg_hash = asset.peg_hash.clone();
        wallet.add(asset);
        self.wallets.set_asset_wallet(to, wallet);

        ctx.emit(
            Event::new("issue_asset")
                .attribute("recipient", to.to_hex())
                .attribute("issuer", issuer.to_hex())
                .attribute("asset", peg_hash.to_hex()),
        );
        Ok(())
    }

    /// Issue a new fiat peg into `to`'s wallet. Always zone-mediated.
    fn issue_fiat(
        &mut self,
        ctx: &mut ExecutionContext,
        issuer: &AccountAddress,
        to: &AccountAddress,
        transaction_id: String,
        transaction_amount: i64,
    ) -> Result<(), LedgerError> {
        if transaction_amount <= 0 {
            return Err(LedgerError::InvalidArgument(
                "fiat transaction amount must be positive".to_string(),
            ));
        }

        let acl = self.acl.check_zone_and_get_acl(issuer, to)?;
        if !acl.issue_fiat {
            return Err(LedgerError::Unauthorized(format!(
                "fiats cannot be issued to account {to}"
            )));
        }

        let peg_hash = self.wallets.next_fiat_peg_hash();
        let mut wallet = self.wallets.fiat_wallet(to);
        wallet.add(FiatPeg::new(peg_hash.clone(), transaction_id, transaction_amount));
        self.wallets.set_fiat_wallet(to, wallet);

        ctx.emit(
            Event::new("issue_fiat")
                .attribute("recipient", to.to_hex())
                .attribute("issuer", issuer.to_hex())
                .attribute("fiat", peg_hash.to_hex()),
        );
        Ok(())
    }

    // -- Redemption -----------------------------------------------------------

    /// Redeem an asset peg: remove it from the redeemer's wallet and leave a
    /// spent placeholder with the same hash in the issuer's wallet.
    fn redeem_asset(
        &mut self,
        ctx: &mut ExecutionContext,
        issuer: &AccountAddress,
        redeemer: &AccountAddress,
        peg_hash: &PegHash,
    ) -> Result<(), LedgerError> {
        let acl = self.acl.check_zone_and_get_acl(issuer, redeemer)?;
        if !acl.redeem_asset {
            return Err(LedgerError::Unauthorized(format!(
                "assets cannot be redeemed from account {redeemer}"
            )));
        }

        let mut redeemer_wallet = self.wallets.asset_wallet(redeemer);
        let redeemed = redeemer_wallet.subtract(peg_hash).ok_or_else(|| {
            LedgerError::NotFound(format!("asset peg {peg_hash} in account {redeemer}"))
        })?;

        let mut issuer_wallet = self.wallets.asset_wallet(issuer);
        issuer_wallet.add(AssetPeg::placeholder(redeemed.peg_hash.clone()));

        self.wallets.set_asset_wallet(redeemer, redeemer_wallet);
        self.wallets.set_asset_wallet(issuer, issuer_wallet);

        ctx.emit(
            Event::new("redeem_asset")
                .attribute("redeemer", redeemer.to_hex())
                .attribute("issuer", issuer.to_hex())
                .attribute("asset", peg_hash.to_hex()),
        );
        Ok(())
    }

    /// Redeem `amount` of fiat from the redeemer's wallet, consuming pegs in
    /// hash order.
    fn redeem_fiat(
        &mut self,
        ctx: &mut ExecutionContext,
        issuer: &AccountAddress,
        redeemer: &AccountAddress,
        amount: i64,
    ) -> Result<(), LedgerError> {
        let acl = self.acl.check_zone_and_get_acl(issuer, redeemer)?;
        if !acl.redeem_fiat {
            return Err(LedgerError::Unauthorized(format!(
                "fiats cannot be redeemed from account {redeemer}"
            )));
        }

        let wallet = self.wallets.fiat_wallet(redeemer);
        let (_, remainder) = wallet.redeem_amount(amount).ok_or_else(|| {
            LedgerError::InsufficientFunds(
                "redeemed amount higher than the account balance".to_string(),
            )
        })?;
        self.wallets.set_fiat_wallet(redeemer, remainder);

        ctx.emit(
            Event::new("redeem_fiat")
                .attribute("redeemer", redeemer.to_hex())
                .attribute("issuer", issuer.to_hex())
                .attribute("amount", amount.to_string()),
        );
        Ok(())
    }

    // -- Send to escrow -------------------------------------------------------

    /// Seller commits the traded asset peg to escrow.
    fn send_asset(
        &mut self,
        ctx: &mut ExecutionContext,
        from: &AccountAddress,
        to: &AccountAddress,
        peg_hash: &PegHash,
    ) -> Result<(), LedgerError> {
        let acl = self.acl.account_acl(from)?.acl;
        if !acl.send_asset {
            return Err(LedgerError::Unauthorized(format!(
                "account {from} cannot send assets"
            )));
        }

        // The asset sender is the negotiation's seller.
        let negotiation = self.negotiations.details(to, from, peg_hash)?;
        let deadline = negotiation.expiry + negotiation.seller_block_height;
        if ctx.block_height() > deadline {
            return Err(LedgerError::NegotiationExpired {
                deadline,
                current: ctx.block_height(),
            });
        }
        if !negotiation.is_fully_confirmed() {
            return Err(LedgerError::Unauthorized(
                "negotiation is not confirmed by both parties".to_string(),
            ));
        }

        let mut wallet = self.wallets.asset_wallet(from);
        let peg = wallet.subtract(peg_hash).ok_or_else(|| {
            LedgerError::NotFound(format!("asset peg {peg_hash} in account {from}"))
        })?;
        if peg.locked {
            return Err(LedgerError::AssetLocked(peg_hash.to_hex()));
        }

        self.escrow.deposit_asset(to, from, peg);
        self.wallets.set_asset_wallet(from, wallet);

        ctx.emit(
            Event::new("send_asset")
                .attribute("recipient", to.to_hex())
                .attribute("sender", from.to_hex())
                .attribute("asset", peg_hash.to_hex()),
        );
        self.reputation.record_positive(FeedbackKind::SendAsset, from);
        Ok(())
    }

    /// Buyer commits fiat for the trade identified by `peg_hash` to escrow.
    fn send_fiat(
        &mut self,
        ctx: &mut ExecutionContext,
        from: &AccountAddress,
        to: &AccountAddress,
        peg_hash: &PegHash,
        amount: i64,
    ) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidArgument(
                "sent amount must be positive".to_string(),
            ));
        }

        let acl = self.acl.account_acl(from)?.acl;
        if !acl.send_fiat {
            return Err(LedgerError::Unauthorized(format!(
                "account {from} cannot send fiats"
            )));
        }

        // The fiat sender is the negotiation's buyer.
        let negotiation = self.negotiations.details(from, to, peg_hash)?;
        let deadline = negotiation.expiry + negotiation.buyer_block_height;
        if ctx.block_height() > deadline {
            return Err(LedgerError::NegotiationExpired {
                deadline,
                current: ctx.block_height(),
            });
        }
        if !negotiation.is_fully_confirmed() {
            return Err(LedgerError::Unauthorized(
                "negotiation is not confirmed by both parties".to_string(),
            ));
        }

        let wallet = self.wallets.fiat_wallet(from);
        let (sent, remainder) = wallet.subtract_amount(amount).ok_or_else(|| {
            LedgerError::InsufficientFunds(format!(
                "account {from} holds less than the sent amount {amount}"
            ))
        })?;

        self.escrow.deposit_fiat(from, to, peg_hash, sent);
        self.wallets.set_fiat_wallet(from, remainder);

        ctx.emit(
            Event::new("send_fiat")
                .attribute("recipient", to.to_hex())
                .attribute("sender", from.to_hex())
                .attribute("amount", amount.to_string()),
        );
        self.reputation.record_positive(FeedbackKind::SendFiat, from);
        Ok(())
    }

    // -- Execution ------------------------------------------------------------

    /// Buyer-side execution trigger, carrying the fiat payment proof.
    fn buyer_execute(
        &mut self,
        ctx: &mut ExecutionContext,
        mediator: &AccountAddress,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
        fiat_proof_hash: &str,
    ) -> Result<(), LedgerError> {
        let private = self.authorize_execute(
            mediator,
            buyer,
            seller,
            peg_hash,
            buyer,
            |acl| acl.buyer_execute_order,
        )?;
        self.exchange_order(ctx, buyer, seller, peg_hash, Some(fiat_proof_hash), None, private)
    }

    /// Seller-side execution trigger, carrying the air-waybill proof.
    fn seller_execute(
        &mut self,
        ctx: &mut ExecutionContext,
        mediator: &AccountAddress,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
        awb_proof_hash: &str,
    ) -> Result<(), LedgerError> {
        let private = self.authorize_execute(
            mediator,
            buyer,
            seller,
            peg_hash,
            seller,
            |acl| acl.seller_execute_order,
        )?;
        self.exchange_order(ctx, buyer, seller, peg_hash, None, Some(awb_proof_hash), private)
    }

    /// Resolve the execution path and authorize the caller. Returns whether
    /// the unmoderated (self-executed) path applies.
    ///
    /// The path follows the escrowed asset's `moderated` flag; when the asset
    /// never reached escrow the mediator's identity decides, so a missing
    /// side can still be pushed to reversal by either the party itself or its
    /// zone.
    fn authorize_execute(
        &self,
        mediator: &AccountAddress,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
        party: &AccountAddress,
        capability: impl Fn(&rwa_acl::Acl) -> bool,
    ) -> Result<bool, LedgerError> {
        let record = self.escrow.record(buyer, seller, peg_hash).ok_or_else(|| {
            LedgerError::NotFound(format!(
                "escrow record for buyer {buyer}, seller {seller}, peg {peg_hash}"
            ))
        })?;

        let private = match record.asset_wallet.get(peg_hash) {
            Some(peg) => !peg.moderated,
            None => mediator == party,
        };

        if private {
            if mediator != party {
                return Err(LedgerError::Unauthorized(format!(
                    "trade cannot be executed by account {mediator}"
                )));
            }
            let acl = self.acl.account_acl(party)?.acl;
            if !capability(&acl) {
                return Err(LedgerError::Unauthorized(format!(
                    "trade cannot be executed for account {party}"
                )));
            }
        } else {
            let acl = self.acl.check_zone_and_get_acl(mediator, party)?;
            if !capability(&acl) {
                return Err(LedgerError::Unauthorized(format!(
                    "trade cannot be executed for account {party}"
                )));
            }
        }
        Ok(private)
    }

    /// The shared exchange routine behind both execution triggers.
    ///
    /// Decides between completion and reversal, records the caller's proof,
    /// and moves every escrowed peg to its terminal owner. Replaying a
    /// message after a terminal state finds the escrow record empty and moves
    /// nothing.
    #[allow(clippy::too_many_arguments)]
    fn exchange_order(
        &mut self,
        ctx: &mut ExecutionContext,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
        fiat_proof: Option<&str>,
        awb_proof: Option<&str>,
        private: bool,
    ) -> Result<(), LedgerError> {
        let negotiation = self
            .negotiations
            .details(buyer, seller, peg_hash)?
            .clone();
        let record = self
            .escrow
            .record(buyer, seller, peg_hash)
            .cloned()
            .ok_or_else(|| {
                LedgerError::NotFound(format!(
                    "escrow record for buyer {buyer}, seller {seller}, peg {peg_hash}"
                ))
            })?;

        let current = ctx.block_height();
        let fiat_short = private && record.fiat_wallet.balance() < negotiation.bid;
        let asset_missing = !record.asset_wallet.contains(peg_hash);
        let terms_expired = negotiation.expiry < current;

        // A missing side is fatal once the agreed expiry height has passed;
        // before that it pushes the trade to reversal and marks the side that
        // failed to deliver.
        if fiat_short && terms_expired {
            return Err(LedgerError::InsufficientFunds(
                "fiat tokens not found in escrow".to_string(),
            ));
        }
        if asset_missing && terms_expired {
            return Err(LedgerError::NotFound(
                "asset token not found in escrow".to_string(),
            ));
        }

        let mut reverse = false;
        if fiat_short {
            reverse = true;
            self.reputation
                .record_negative(FeedbackKind::BuyerExecuteOrder, buyer);
        }
        if asset_missing {
            reverse = true;
            self.reputation
                .record_negative(FeedbackKind::SellerExecuteOrder, seller);
        }

        // Per-side settlement deadlines: expiry counted from each side's
        // confirmation height.
        if current > negotiation.expiry + negotiation.buyer_block_height
            || current > negotiation.expiry + negotiation.seller_block_height
        {
            reverse = true;
        }

        let mut executed = false;
        if !reverse {
            if let Some(proof) = fiat_proof.filter(|p| !p.is_empty()) {
                self.escrow
                    .set_fiat_proof_hash(buyer, seller, peg_hash, proof.to_string());
            }
            if let Some(proof) = awb_proof.filter(|p| !p.is_empty()) {
                self.escrow
                    .set_awb_proof_hash(buyer, seller, peg_hash, proof.to_string());
            }

            let record = self
                .escrow
                .record(buyer, seller, peg_hash)
                .cloned()
                .expect("escrow record existence checked above");
            match (&record.fiat_proof_hash, &record.awb_proof_hash) {
                (Some(_), Some(_)) => {
                    executed = true;
                    self.settle_executed(buyer, seller, peg_hash, &record, negotiation.bid);
                }
                (None, None) => {
                    // No proof on either side at this point forces reversal,
                    // even ahead of the expiry height.
                    reverse = true;
                }
                _ => {} // one side proven; escrow holds until the other acts
            }
        }

        if reverse {
            self.settle_reversed(buyer, seller, peg_hash);
        }

        debug!(
            buyer = %buyer,
            seller = %seller,
            peg = %peg_hash,
            executed,
            reversed = reverse,
            "exchange resolved"
        );
        ctx.emit(
            Event::new("execute_order")
                .attribute("buyer", buyer.to_hex())
                .attribute("seller", seller.to_hex())
                .attribute("asset_peg_hash", peg_hash.to_hex())
                .attribute("executed", executed.to_string())
                .attribute("asset_price", negotiation.bid.to_string())
                .attribute("reversed", reverse.to_string()),
        );
        Ok(())
    }

    /// Completion: asset to the buyer, the negotiated bid to the seller, any
    /// escrowed excess above the bid back to the buyer.
    fn settle_executed(
        &mut self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
        record: &rwa_escrow::EscrowRecord,
        bid: i64,
    ) {
        self.reputation
            .record_positive(FeedbackKind::SellerExecuteOrder, seller);
        self.reputation
            .record_positive(FeedbackKind::BuyerExecuteOrder, buyer);

        if let Some(mut asset) = self.escrow.withdraw_asset(buyer, seller, peg_hash) {
            asset.owner = Some(buyer.clone());
            let mut buyer_assets = self.wallets.asset_wallet(buyer);
            buyer_assets.add(asset);
            self.wallets.set_asset_wallet(buyer, buyer_assets);
        }

        if !record.fiat_wallet.is_empty() {
            let (for_seller, excess) = if record.fiat_wallet.balance() > bid {
                record
                    .fiat_wallet
                    .subtract_amount(bid)
                    .expect("balance exceeds the bid")
            } else {
                (record.fiat_wallet.clone(), FiatWallet::new())
            };
            self.escrow
                .withdraw_fiats(buyer, seller, peg_hash, &record.fiat_wallet);

            let mut seller_fiat = self.wallets.fiat_wallet(seller);
            seller_fiat.add_all(for_seller);
            self.wallets.set_fiat_wallet(seller, seller_fiat);

            if !excess.is_empty() {
                let mut buyer_fiat = self.wallets.fiat_wallet(buyer);
                buyer_fiat.add_all(excess);
                self.wallets.set_fiat_wallet(buyer, buyer_fiat);
            }
        }
    }

    /// Full reversal: the asset returns to the seller's own wallet and every
    /// escrowed fiat peg returns to the buyer.
    fn settle_reversed(
        &mut self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
    ) {
        if let Some(mut asset) = self.escrow.withdraw_asset(buyer, seller, peg_hash) {
            asset.owner = Some(seller.clone());
            let mut seller_assets = self.wallets.asset_wallet(seller);
            seller_assets.add(asset);
            self.wallets.set_asset_wallet(seller, seller_assets);
        }

        let remaining = self
            .escrow
            .record(buyer, seller, peg_hash)
            .map(|record| record.fiat_wallet.clone())
            .unwrap_or_default();
        if !remaining.is_empty() {
            self.escrow.withdraw_fiats(buyer, seller, peg_hash, &remaining);
            let mut buyer_fiat = self.wallets.fiat_wallet(buyer);
            buyer_fiat.add_all(remaining);
            self.wallets.set_fiat_wallet(buyer, buyer_fiat);
        }
    }

    // -- Release --------------------------------------------------------------

    /// Zone releases a moderated asset peg in `owner`'s wallet.
    fn release_asset(
        &mut self,
        ctx: &mut ExecutionContext,
        zone: &AccountAddress,
        owner: &AccountAddress,
        peg_hash: &PegHash,
    ) -> Result<(), LedgerError> {
        let acl = self.acl.check_zone_and_get_acl(zone, owner)?;
        if !acl.release_asset {
            return Err(LedgerError::Unauthorized(format!(
                "assets cannot be released for account {owner}"
            )));
        }

        let mut wallet = self.wallets.asset_wallet(owner);
        if !wallet.release(peg_hash) {
            return Err(LedgerError::NotFound(format!(
                "asset peg {peg_hash} in account {owner}"
            )));
        }
        self.wallets.set_asset_wallet(owner, wallet);

        ctx.emit(
            Event::new("release_asset")
                .attribute("zone", zone.to_hex())
                .attribute("owner", owner.to_hex())
                .attribute("asset", peg_hash.to_hex()),
        );
        Ok(())
    }

    // -- Negotiation passthroughs ---------------------------------------------

    fn change_bid(
        &mut self,
        ctx: &mut ExecutionContext,
        proposal: BidProposal,
    ) -> Result<(), LedgerError> {
        self.negotiations
            .change_bid(ctx, &self.acl, &self.wallets, &mut self.reputation, proposal)
    }

    fn confirm_bid(
        &mut self,
        ctx: &mut ExecutionContext,
        confirmation: BidConfirmation,
    ) -> Result<(), LedgerError> {
        self.negotiations.confirm_bid(
            ctx,
            &self.acl,
            &self.wallets,
            &self.directory,
            &mut self.reputation,
            confirmation,
        )
    }

    // -- State access ---------------------------------------------------------

    /// The account directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Mutable access to the account directory (genesis setup, tests).
    pub fn directory_mut(&mut self) -> &mut D {
        &mut self.directory
    }

    /// The permission registry.
    pub fn acl(&self) -> &AclRegistry {
        &self.acl
    }

    /// The wallet store.
    pub fn wallets(&self) -> &WalletStore {
        &self.wallets
    }

    /// The escrow store.
    pub fn escrow(&self) -> &EscrowStore {
        &self.escrow
    }

    /// The negotiation registry.
    pub fn negotiations(&self) -> &NegotiationRegistry {
        &self.negotiations
    }

    /// The reputation book.
    pub fn reputation(&self) -> &ReputationBook {
        &self.reputation
    }
}
