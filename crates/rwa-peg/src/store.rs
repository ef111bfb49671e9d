//! # Wallet Store
//!
//! Per-account asset and fiat wallets plus the two monotonic sequence cells
//! every peg hash is assigned from. Accessors hand out owned wallet values
//! and take them back on commit — operations mutate a copy and only write it
//! once every fallible check has passed, which is what gives the engine its
//! all-or-nothing behavior without a rollback mechanism.

use std::collections::BTreeMap;

use rwa_core::{AccountAddress, PegHash, TakerDirectory};

use crate::asset::AssetWallet;
use crate::fiat::FiatWallet;

/// All wallets and peg-hash sequences of the ledger.
#[derive(Debug, Clone, Default)]
pub struct WalletStore {
    asset_wallets: BTreeMap<AccountAddress, AssetWallet>,
    fiat_wallets: BTreeMap<AccountAddress, FiatWallet>,
    asset_sequence: u64,
    fiat_sequence: u64,
}

impl WalletStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The asset wallet of `address` (empty if none has been written yet).
    pub fn asset_wallet(&self, address: &AccountAddress) -> AssetWallet {
        self.asset_wallets.get(address).cloned().unwrap_or_default()
    }

    /// Commit the asset wallet of `address`.
    pub fn set_asset_wallet(&mut self, address: &AccountAddress, wallet: AssetWallet) {
        self.asset_wallets.insert(address.clone(), wallet);
    }

    /// The fiat wallet of `address` (empty if none has been written yet).
    pub fn fiat_wallet(&self, address: &AccountAddress) -> FiatWallet {
        self.fiat_wallets.get(address).cloned().unwrap_or_default()
    }

    /// Commit the fiat wallet of `address`.
    pub fn set_fiat_wallet(&mut self, address: &AccountAddress, wallet: FiatWallet) {
        self.fiat_wallets.insert(address.clone(), wallet);
    }

    /// Assign the next asset peg hash. Read-increment-write on the sequence
    /// cell; the single-threaded execution model makes this atomic.
    pub fn next_asset_peg_hash(&mut self) -> PegHash {
        let hash = PegHash::from_sequence(self.asset_sequence);
        self.asset_sequence += 1;
        hash
    }

    /// Assign the next fiat peg hash.
    pub fn next_fiat_peg_hash(&mut self) -> PegHash {
        let hash = PegHash::from_sequence(self.fiat_sequence);
        self.fiat_sequence += 1;
        hash
    }

    /// Iterate all asset wallets in address order.
    pub fn asset_wallets(&self) -> impl Iterator<Item = (&AccountAddress, &AssetWallet)> {
        self.asset_wallets.iter()
    }

    /// Iterate all fiat wallets in address order.
    pub fn fiat_wallets(&self) -> impl Iterator<Item = (&AccountAddress, &FiatWallet)> {
        self.fiat_wallets.iter()
    }

    /// Total fiat amount held across all wallets.
    pub fn total_fiat_balance(&self) -> i64 {
        self.fiat_wallets.values().map(FiatWallet::balance).sum()
    }
}

impl TakerDirectory for WalletStore {
    fn taker_address(
        &self,
        seller: &AccountAddress,
        peg_hash: &PegHash,
    ) -> Option<AccountAddress> {
        self.asset_wallets
            .get(seller)
            .and_then(|wallet| wallet.get(peg_hash))
            .and_then(|peg| peg.taker.clone())
    }
}
