//! # Trade Reversal & Idempotency Tests
//!
//! The unhappy half of the settlement state machine:
//!
//! - Expired negotiations reject escrow funding before anything moves.
//! - A missing or short side pushes execution to reversal inside the expiry
//!   window, and fails fatally after it.
//! - An execution call with no proof recorded on either side forces reversal
//!   ahead of the expiry height. This mirrors the reference behavior on
//!   purpose — the test pins it so a refactor cannot silently "fix" it.
//! - Elapsed per-side deadlines force reversal regardless of escrow
//!   completeness.
//! - Reversal restores the identical asset peg to the seller, and replaying
//!   execution after a terminal state never moves value again.

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;

use rwa_acl::{Acl, AclRecord};
use rwa_core::{
    AccountAddress, ExecutionContext, LedgerError, MemoryAccountDirectory, OrganizationId,
    PegHash, PublicKeyBytes, ZoneId,
};
use rwa_negotiation::{BidConfirmation, BidProposal, TradeSide};
use rwa_peg::AssetPeg;
use rwa_settlement::{Msg, SettlementEngine};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn addr(byte: u8) -> AccountAddress {
    AccountAddress::from_bytes(vec![byte; 20]).unwrap()
}

struct Ledger {
    engine: SettlementEngine<MemoryAccountDirectory>,
    zone: AccountAddress,
    buyer: AccountAddress,
    seller: AccountAddress,
    buyer_key: SigningKey,
    seller_key: SigningKey,
}

impl Ledger {
    fn bootstrap() -> Self {
        let buyer_key = SigningKey::generate(&mut OsRng);
        let seller_key = SigningKey::generate(&mut OsRng);

        let mut directory = MemoryAccountDirectory::new();
        directory.register(addr(0), 0, None);
        directory.register(addr(1), 1, None);
        directory.register(addr(3), 3, Some(PublicKeyBytes(buyer_key.verifying_key().to_bytes())));
        directory.register(addr(4), 4, Some(PublicKeyBytes(seller_key.verifying_key().to_bytes())));

        let mut ledger = Self {
            engine: SettlementEngine::new(directory),
            zone: addr(1),
            buyer: addr(3),
            seller: addr(4),
            buyer_key,
            seller_key,
        };

        let zone_id = ZoneId::from_bytes(vec![0xA1]).unwrap();
        let organization_id = OrganizationId::from_bytes(vec![0xB1]).unwrap();
        ledger
            .apply(1, Msg::DefineZone {
                from: addr(0),
                to: ledger.zone.clone(),
                zone_id: zone_id.clone(),
            })
            .unwrap();
        for trader in [ledger.buyer.clone(), ledger.seller.clone()] {
            ledger
                .apply(1, Msg::DefineAcl {
                    from: ledger.zone.clone(),
                    to: trader.clone(),
                    record: AclRecord {
                        address: trader,
                        zone_id: zone_id.clone(),
                        organization_id: organization_id.clone(),
                        acl: Acl::all(),
                    },
                })
                .unwrap();
        }
        ledger
    }

    fn apply(&mut self, height: i64, msg: Msg) -> Result<ExecutionContext, LedgerError> {
        let mut ctx = ExecutionContext::new("rwa-test-1", height);
        self.engine.apply(&mut ctx, msg)?;
        Ok(ctx)
    }

    fn issue_asset(&mut self, height: i64) -> PegHash {
        let ctx = self
            .apply(height, Msg::IssueAsset {
                issuer: self.seller.clone(),
                to: self.seller.clone(),
                asset: AssetPeg {
                    peg_hash: PegHash::from_sequence(0),
                    document_hash: "warehouse-receipt-17".to_string(),
                    asset_type: "gold".to_string(),
                    quantity: 10,
                    price: 1_000,
                    quantity_unit: "kg".to_string(),
                    owner: None,
                    locked: false,
                    moderated: false,
                    taker: None,
                },
            })
            .unwrap();
        PegHash::from_hex(ctx.events()[0].get("asset").unwrap()).unwrap()
    }

    fn issue_fiat(&mut self, height: i64, amount: i64) {
        self.apply(height, Msg::IssueFiat {
            issuer: self.zone.clone(),
            to: self.buyer.clone(),
            transaction_id: "SWIFT-001".to_string(),
            transaction_amount: amount,
        })
        .unwrap();
    }

    fn negotiate(&mut self, height: i64, peg_hash: &PegHash, bid: i64, expiry: i64) {
        let proposal = BidProposal {
            buyer: self.buyer.clone(),
            seller: self.seller.clone(),
            peg_hash: peg_hash.clone(),
            bid,
            expiry,
        };
        self.apply(height, Msg::ChangeBid { proposal: proposal.clone() }).unwrap();
        let sign_bytes = proposal.sign_doc().sign_bytes().unwrap();
        let signatures = [
            (TradeSide::Buyer, self.buyer_key.sign(&sign_bytes)),
            (TradeSide::Seller, self.seller_key.sign(&sign_bytes)),
        ];
        for (side, signature) in signatures {
            let confirmation = BidConfirmation {
                proposal: proposal.clone(),
                side,
                signature: signature.to_bytes().to_vec(),
                contract_hash: None,
            };
            self.apply(height, Msg::ConfirmBid { confirmation }).unwrap();
        }
    }

    fn send_asset(&mut self, height: i64, peg_hash: &PegHash) -> Result<ExecutionContext, LedgerError> {
        self.apply(height, Msg::SendAsset {
            from: self.seller.clone(),
            to: self.buyer.clone(),
            peg_hash: peg_hash.clone(),
        })
    }

    fn send_fiat(&mut self, height: i64, peg_hash: &PegHash, amount: i64) -> Result<ExecutionContext, LedgerError> {
        self.apply(height, Msg::SendFiat {
            from: self.buyer.clone(),
            to: self.seller.clone(),
            peg_hash: peg_hash.clone(),
            amount,
        })
    }

    fn buyer_execute(&mut self, height: i64, peg_hash: &PegHash, proof: &str) -> Result<ExecutionContext, LedgerError> {
        self.apply(height, Msg::BuyerExecuteOrder {
            mediator: self.buyer.clone(),
            buyer: self.buyer.clone(),
            seller: self.seller.clone(),
            peg_hash: peg_hash.clone(),
            fiat_proof_hash: proof.to_string(),
        })
    }

    fn seller_execute(&mut self, height: i64, peg_hash: &PegHash, proof: &str) -> Result<ExecutionContext, LedgerError> {
        self.apply(height, Msg::SellerExecuteOrder {
            mediator: self.seller.clone(),
            buyer: self.buyer.clone(),
            seller: self.seller.clone(),
            peg_hash: peg_hash.clone(),
            awb_proof_hash: proof.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn expired_window_rejects_escrow_funding() {
    let mut ledger = Ledger::bootstrap();
    let peg_hash = ledger.issue_asset(3);
    ledger.issue_fiat(4, 500);

    // Confirmations land at height 10 with a 2-block window: the per-side
    // deadline is height 12.
    ledger.negotiate(10, &peg_hash, 500, 2);

    let err = ledger.send_asset(13, &peg_hash).unwrap_err();
    assert!(matches!(err, LedgerError::NegotiationExpired { deadline: 12, current: 13 }));
    let err = ledger.send_fiat(13, &peg_hash, 500).unwrap_err();
    assert!(matches!(err, LedgerError::NegotiationExpired { .. }));

    // Nothing entered escrow and nothing left the wallets.
    assert!(ledger.engine.escrow().record(&ledger.buyer, &ledger.seller, &peg_hash).is_none());
    assert_eq!(ledger.engine.wallets().asset_wallet(&ledger.seller).len(), 1);
    assert_eq!(ledger.engine.wallets().fiat_wallet(&ledger.buyer).balance(), 500);
}

#[test]
fn unconfirmed_negotiation_rejects_escrow_funding() {
    let mut ledger = Ledger::bootstrap();
    let peg_hash = ledger.issue_asset(3);

    let proposal = BidProposal {
        buyer: ledger.buyer.clone(),
        seller: ledger.seller.clone(),
        peg_hash: peg_hash.clone(),
        bid: 500,
        expiry: 100,
    };
    ledger.apply(10, Msg::ChangeBid { proposal: proposal.clone() }).unwrap();
    let sign_bytes = proposal.sign_doc().sign_bytes().unwrap();
    let confirmation = BidConfirmation {
        proposal,
        side: TradeSide::Seller,
        signature: ledger.seller_key.sign(&sign_bytes).to_bytes().to_vec(),
        contract_hash: None,
    };
    ledger.apply(10, Msg::ConfirmBid { confirmation }).unwrap();

    // Only one signature present: the asset may not move yet.
    let err = ledger.send_asset(11, &peg_hash).unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized(_)));
}

#[test]
fn fiat_shortfall_reverses_inside_the_window() {
    let mut ledger = Ledger::bootstrap();
    let peg_hash = ledger.issue_asset(3);
    ledger.issue_fiat(4, 300);
    ledger.negotiate(10, &peg_hash, 500, 100);

    ledger.send_asset(11, &peg_hash).unwrap();
    ledger.send_fiat(12, &peg_hash, 300).unwrap();

    let original = ledger.engine.escrow()
        .record(&ledger.buyer, &ledger.seller, &peg_hash)
        .unwrap()
        .asset_wallet
        .get(&peg_hash)
        .unwrap()
        .clone();

    let ctx = ledger.buyer_execute(13, &peg_hash, "fiat-proof").unwrap();
    let event = ctx.events().last().unwrap();
    assert_eq!(event.get("executed"), Some("false"));
    assert_eq!(event.get("reversed"), Some("true"));

    // Identical peg back with the seller; fiat back with the buyer.
    let returned = ledger.engine.wallets().asset_wallet(&ledger.seller);
    assert_eq!(returned.get(&peg_hash).unwrap(), &original);
    assert_eq!(ledger.engine.wallets().fiat_wallet(&ledger.buyer).balance(), 300);
    assert!(ledger.engine.escrow().record(&ledger.buyer, &ledger.seller, &peg_hash).unwrap().is_empty());

    // The short side took the negative mark.
    let feedback = ledger.engine.reputation().account(&ledger.buyer).unwrap().feedback;
    assert_eq!(feedback.buyer_execute_negative, 1);
}

#[test]
fn fiat_shortfall_after_expiry_is_fatal() {
    let mut ledger = Ledger::bootstrap();
    let peg_hash = ledger.issue_asset(3);
    ledger.negotiate(10, &peg_hash, 500, 20);
    ledger.send_asset(11, &peg_hash).unwrap();

    // Height 25 is past the expiry height 20: the missing fiat is no longer
    // recoverable and the call fails instead of reversing.
    let err = ledger.buyer_execute(25, &peg_hash, "fiat-proof").unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds(_)));

    // The failed transaction moved nothing.
    let record = ledger.engine.escrow().record(&ledger.buyer, &ledger.seller, &peg_hash).unwrap();
    assert_eq!(record.asset_wallet.len(), 1);
}

#[test]
fn missing_proofs_force_reversal_ahead_of_expiry() {
    let mut ledger = Ledger::bootstrap();
    let peg_hash = ledger.issue_asset(3);
    ledger.issue_fiat(4, 500);
    ledger.negotiate(10, &peg_hash, 500, 100);
    ledger.send_asset(11, &peg_hash).unwrap();
    ledger.send_fiat(12, &peg_hash, 500).unwrap();

    // Both sides fully escrowed, no deadline elapsed — but an execution call
    // that records no proof on either side reverses the trade immediately.
    let ctx = ledger.buyer_execute(13, &peg_hash, "").unwrap();
    let event = ctx.events().last().unwrap();
    assert_eq!(event.get("executed"), Some("false"));
    assert_eq!(event.get("reversed"), Some("true"));
    assert!(ledger.engine.wallets().asset_wallet(&ledger.seller).contains(&peg_hash));
    assert_eq!(ledger.engine.wallets().fiat_wallet(&ledger.buyer).balance(), 500);
}

#[test]
fn elapsed_deadlines_reverse_a_fully_escrowed_trade() {
    let mut ledger = Ledger::bootstrap();
    let peg_hash = ledger.issue_asset(3);
    ledger.issue_fiat(4, 500);
    ledger.negotiate(10, &peg_hash, 500, 20);
    ledger.send_asset(11, &peg_hash).unwrap();
    ledger.send_fiat(12, &peg_hash, 500).unwrap();

    // Confirmation heights are 10, expiry 20: both deadlines sit at height
    // 30. Height 31 is late even though both sides delivered in full.
    let ctx = ledger.seller_execute(31, &peg_hash, "awb-proof").unwrap();
    let event = ctx.events().last().unwrap();
    assert_eq!(event.get("executed"), Some("false"));
    assert_eq!(event.get("reversed"), Some("true"));
    assert!(ledger.engine.wallets().asset_wallet(&ledger.seller).contains(&peg_hash));
    assert_eq!(ledger.engine.wallets().fiat_wallet(&ledger.buyer).balance(), 500);
}

#[test]
fn replayed_execution_after_completion_moves_nothing() {
    let mut ledger = Ledger::bootstrap();
    let peg_hash = ledger.issue_asset(3);
    ledger.issue_fiat(4, 500);
    ledger.negotiate(10, &peg_hash, 500, 100);
    ledger.send_asset(11, &peg_hash).unwrap();
    ledger.send_fiat(12, &peg_hash, 500).unwrap();
    ledger.seller_execute(13, &peg_hash, "awb-proof").unwrap();
    ledger.buyer_execute(14, &peg_hash, "fiat-proof").unwrap();

    let buyer_assets = ledger.engine.wallets().asset_wallet(&ledger.buyer);
    let seller_fiat = ledger.engine.wallets().fiat_wallet(&ledger.seller);

    // Replaying either trigger finds the emptied escrow record and moves
    // nothing, terminal state or not.
    let _ = ledger.buyer_execute(15, &peg_hash, "fiat-proof");
    let _ = ledger.seller_execute(16, &peg_hash, "awb-proof");

    assert_eq!(ledger.engine.wallets().asset_wallet(&ledger.buyer), buyer_assets);
    assert_eq!(ledger.engine.wallets().fiat_wallet(&ledger.seller), seller_fiat);
    assert_eq!(ledger.engine.wallets().fiat_wallet(&ledger.buyer).balance(), 0);
    assert!(ledger.engine.escrow().record(&ledger.buyer, &ledger.seller, &peg_hash).unwrap().is_empty());
}

#[test]
fn replayed_execution_after_reversal_moves_nothing() {
    let mut ledger = Ledger::bootstrap();
    let peg_hash = ledger.issue_asset(3);
    ledger.issue_fiat(4, 500);
    ledger.negotiate(10, &peg_hash, 500, 100);
    ledger.send_asset(11, &peg_hash).unwrap();
    ledger.send_fiat(12, &peg_hash, 500).unwrap();
    ledger.buyer_execute(13, &peg_hash, "").unwrap(); // forced reversal

    let seller_assets = ledger.engine.wallets().asset_wallet(&ledger.seller);
    let buyer_fiat = ledger.engine.wallets().fiat_wallet(&ledger.buyer);

    let _ = ledger.buyer_execute(14, &peg_hash, "fiat-proof");
    let _ = ledger.seller_execute(15, &peg_hash, "awb-proof");

    assert_eq!(ledger.engine.wallets().asset_wallet(&ledger.seller), seller_assets);
    assert_eq!(ledger.engine.wallets().fiat_wallet(&ledger.buyer), buyer_fiat);
    assert_eq!(ledger.engine.wallets().fiat_wallet(&ledger.seller).balance(), 0);
}
