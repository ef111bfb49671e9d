// SPDX-License-Identifier: BUSL-1.1
//! # rwa-escrow — In-Flight Trade Escrow
//!
//! Holds the pegs committed to a specific pending trade. An [`EscrowRecord`]
//! is created implicitly the first time an asset or fiat peg is moved in for
//! a `(buyer, seller, peg hash)` triple, and is emptied — never deleted — when
//! settlement completes or reverses, so re-queries after a terminal state are
//! cheap no-ops.
//!
//! The two proof slots (`fiat_proof_hash` for buyer-side completion,
//! `awb_proof_hash` for seller-side completion) are write-once: the first
//! recorded proof sticks and later writes are ignored, which is what makes
//! execution calls idempotent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rwa_core::{AccountAddress, NegotiationId, PegHash};
use rwa_peg::{AssetPeg, AssetWallet, FiatWallet};

/// Pegs held for one pending trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    pub buyer: AccountAddress,
    pub seller: AccountAddress,
    pub peg_hash: PegHash,
    pub asset_wallet: AssetWallet,
    pub fiat_wallet: FiatWallet,
    pub fiat_proof_hash: Option<String>,
    pub awb_proof_hash: Option<String>,
}

impl EscrowRecord {
    fn new(buyer: AccountAddress, seller: AccountAddress, peg_hash: PegHash) -> Self {
        Self {
            buyer,
            seller,
            peg_hash,
            asset_wallet: AssetWallet::new(),
            fiat_wallet: FiatWallet::new(),
            fiat_proof_hash: None,
            awb_proof_hash: None,
        }
    }

    /// Whether both the asset side and the fiat side hold nothing.
    pub fn is_empty(&self) -> bool {
        self.asset_wallet.is_empty() && self.fiat_wallet.is_empty()
    }
}

/// All escrow records, keyed by the deterministic trade identifier.
#[derive(Debug, Clone, Default)]
pub struct EscrowStore {
    records: BTreeMap<NegotiationId, EscrowRecord>,
}

impl EscrowStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(buyer: &AccountAddress, seller: &AccountAddress, peg_hash: &PegHash) -> NegotiationId {
        NegotiationId::derive(buyer, seller, peg_hash)
    }

    /// The record for a trade triple, if one was ever created.
    pub fn record(
        &self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
    ) -> Option<&EscrowRecord> {
        self.records.get(&Self::key(buyer, seller, peg_hash))
    }

    fn record_mut(
        &mut self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
    ) -> &mut EscrowRecord {
        self.records
            .entry(Self::key(buyer, seller, peg_hash))
            .or_insert_with(|| EscrowRecord::new(buyer.clone(), seller.clone(), peg_hash.clone()))
    }

    /// Move an asset peg into escrow for the trade it belongs to, creating
    /// the record on first use.
    pub fn deposit_asset(
        &mut self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg: AssetPeg,
    ) {
        let peg_hash = peg.peg_hash.clone();
        self.record_mut(buyer, seller, &peg_hash).asset_wallet.add(peg);
    }

    /// Move fiat pegs into escrow for the trade identified by `peg_hash`,
    /// creating the record on first use.
    pub fn deposit_fiat(
        &mut self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
        fiat: FiatWallet,
    ) {
        self.record_mut(buyer, seller, peg_hash).fiat_wallet.add_all(fiat);
    }

    /// Record the buyer-side settlement proof. First write wins; later
    /// writes (same or different value) are ignored.
    pub fn set_fiat_proof_hash(
        &mut self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
        proof_hash: String,
    ) {
        let record = self.record_mut(buyer, seller, peg_hash);
        if record.fiat_proof_hash.is_none() {
            record.fiat_proof_hash = Some(proof_hash);
        }
    }

    /// Record the seller-side settlement proof (air waybill). First write
    /// wins; later writes are ignored.
    pub fn set_awb_proof_hash(
        &mut self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
        proof_hash: String,
    ) {
        let record = self.record_mut(buyer, seller, peg_hash);
        if record.awb_proof_hash.is_none() {
            record.awb_proof_hash = Some(proof_hash);
        }
    }

    /// Remove and return the escrowed asset peg with the given hash, if
    /// present.
    pub fn withdraw_asset(
        &mut self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
    ) -> Option<AssetPeg> {
        self.records
            .get_mut(&Self::key(buyer, seller, peg_hash))
            .and_then(|record| record.asset_wallet.subtract(peg_hash))
    }

    /// Remove the given fiat peg entries from escrow, whole, by hash.
    pub fn withdraw_fiats(
        &mut self,
        buyer: &AccountAddress,
        seller: &AccountAddress,
        peg_hash: &PegHash,
        fiat: &FiatWallet,
    ) {
        if let Some(record) = self.records.get_mut(&Self::key(buyer, seller, peg_hash)) {
            record.fiat_wallet.remove_by_hashes(fiat);
        }
    }

    /// Iterate all records in key order.
    pub fn records(&self) -> impl Iterator<Item = (&NegotiationId, &EscrowRecord)> {
        self.records.iter()
    }

    /// Total fiat amount currently held in escrow across all trades.
    pub fn total_fiat_balance(&self) -> i64 {
        self.records.values().map(|r| r.fiat_wallet.balance()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rwa_core::PegHash;
    use rwa_peg::FiatPeg;

    fn addr(byte: u8) -> AccountAddress {
        AccountAddress::from_bytes(vec![byte; 20]).unwrap()
    }

    fn asset(sequence: u64) -> AssetPeg {
        AssetPeg::placeholder(PegHash::from_sequence(sequence))
    }

    fn fiat(sequence: u64, amount: i64) -> FiatWallet {
        vec![FiatPeg::new(PegHash::from_sequence(sequence), "TX1", amount)]
            .into_iter()
            .collect()
    }

    #[test]
    fn deposit_creates_record_on_demand() {
        let mut store = EscrowStore::new();
        let peg = asset(0);
        assert!(store.record(&addr(1), &addr(2), &peg.peg_hash).is_none());
        store.deposit_asset(&addr(1), &addr(2), peg.clone());
        let record = store.record(&addr(1), &addr(2), &peg.peg_hash).unwrap();
        assert_eq!(record.asset_wallet.len(), 1);
        assert_eq!(record.buyer, addr(1));
        assert_eq!(record.seller, addr(2));
    }

    #[test]
    fn asset_and_fiat_share_one_record_per_trade() {
        let mut store = EscrowStore::new();
        let peg = asset(0);
        store.deposit_asset(&addr(1), &addr(2), peg.clone());
        store.deposit_fiat(&addr(1), &addr(2), &peg.peg_hash, fiat(0, 500));
        let record = store.record(&addr(1), &addr(2), &peg.peg_hash).unwrap();
        assert_eq!(record.asset_wallet.len(), 1);
        assert_eq!(record.fiat_wallet.balance(), 500);
    }

    #[test]
    fn proof_slots_are_write_once() {
        let mut store = EscrowStore::new();
        let hash = PegHash::from_sequence(0);
        store.set_fiat_proof_hash(&addr(1), &addr(2), &hash, "proof-a".to_string());
        store.set_fiat_proof_hash(&addr(1), &addr(2), &hash, "proof-b".to_string());
        let record = store.record(&addr(1), &addr(2), &hash).unwrap();
        assert_eq!(record.fiat_proof_hash.as_deref(), Some("proof-a"));
        assert_eq!(record.awb_proof_hash, None);
    }

    #[test]
    fn withdraw_asset_empties_but_keeps_the_record() {
        let mut store = EscrowStore::new();
        let peg = asset(0);
        store.deposit_asset(&addr(1), &addr(2), peg.clone());
        let withdrawn = store.withdraw_asset(&addr(1), &addr(2), &peg.peg_hash).unwrap();
        assert_eq!(withdrawn.peg_hash, peg.peg_hash);
        let record = store.record(&addr(1), &addr(2), &peg.peg_hash).unwrap();
        assert!(record.is_empty());
        // Withdrawing again is a no-op, not an error.
        assert!(store.withdraw_asset(&addr(1), &addr(2), &peg.peg_hash).is_none());
    }

    #[test]
    fn withdraw_fiats_removes_whole_entries() {
        let mut store = EscrowStore::new();
        let hash = PegHash::from_sequence(9);
        store.deposit_fiat(&addr(1), &addr(2), &hash, fiat(0, 300));
        let drained = fiat(0, 300);
        store.withdraw_fiats(&addr(1), &addr(2), &hash, &drained);
        assert!(store.record(&addr(1), &addr(2), &hash).unwrap().is_empty());
    }

    #[test]
    fn trades_are_isolated_by_triple() {
        let mut store = EscrowStore::new();
        store.deposit_asset(&addr(1), &addr(2), asset(0));
        store.deposit_asset(&addr(1), &addr(3), asset(1));
        assert!(store.record(&addr(1), &addr(2), &PegHash::from_sequence(1)).is_none());
        assert_eq!(store.records().count(), 2);
    }
}
