//! # Asset Pegs & Asset Wallets
//!
//! An asset peg is indivisible: it is created at issuance, moves between
//! wallets and escrow whole, and is logically destroyed at redemption, where
//! an empty placeholder with the same hash takes its place in the issuer's
//! wallet to preserve hash uniqueness.
//!
//! A wallet holds its pegs sorted by peg hash. A given asset peg hash exists
//! in at most one wallet at a time; [`AssetWallet::add`] is a no-op on a
//! duplicate hash rather than an error, which makes escrow replays harmless.

use serde::{Deserialize, Serialize};

use rwa_core::{AccountAddress, PegHash};

/// A discrete tokenized claim on a real-world asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPeg {
    pub peg_hash: PegHash,
    pub document_hash: String,
    pub asset_type: String,
    pub quantity: i64,
    pub price: i64,
    pub quantity_unit: String,
    pub owner: Option<AccountAddress>,
    /// True iff the peg was issued moderated and its zone has not released it.
    pub locked: bool,
    pub moderated: bool,
    /// Exclusivity reservation: only this counterparty may negotiate for the
    /// peg when set.
    pub taker: Option<AccountAddress>,
}

impl AssetPeg {
    /// The spent marker left in the issuer's wallet after redemption: same
    /// hash, no content, no owner.
    pub fn placeholder(peg_hash: PegHash) -> Self {
        Self {
            peg_hash,
            document_hash: String::new(),
            asset_type: String::new(),
            quantity: 0,
            price: 0,
            quantity_unit: String::new(),
            owner: None,
            locked: false,
            moderated: false,
            taker: None,
        }
    }
}

/// An ordered collection of asset pegs, sorted by peg hash.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetWallet(Vec<AssetPeg>);

impl AssetWallet {
    /// Create an empty wallet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pegs held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the wallet holds no pegs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate pegs in hash order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetPeg> {
        self.0.iter()
    }

    fn position(&self, peg_hash: &PegHash) -> Result<usize, usize> {
        self.0.binary_search_by(|peg| peg.peg_hash.cmp(peg_hash))
    }

    /// The peg with the given hash, if held.
    pub fn get(&self, peg_hash: &PegHash) -> Option<&AssetPeg> {
        self.position(peg_hash).ok().map(|i| &self.0[i])
    }

    /// Whether the wallet holds the given hash.
    pub fn contains(&self, peg_hash: &PegHash) -> bool {
        self.position(peg_hash).is_ok()
    }

    /// Insert a peg, keeping hash order. No-op if the hash is already held.
    pub fn add(&mut self, peg: AssetPeg) {
        match self.position(&peg.peg_hash) {
            Ok(_) => {}
            Err(i) => self.0.insert(i, peg),
        }
    }

    /// Remove and return the peg with the given hash.
    pub fn subtract(&mut self, peg_hash: &PegHash) -> Option<AssetPeg> {
        match self.position(peg_hash) {
            Ok(i) => Some(self.0.remove(i)),
            Err(_) => None,
        }
    }

    /// Clear the `locked` flag on the peg with the given hash. Returns false
    /// if the peg is not held.
    pub fn release(&mut self, peg_hash: &PegHash) -> bool {
        match self.position(peg_hash) {
            Ok(i) => {
                self.0[i].locked = false;
                true
            }
            Err(_) => false,
        }
    }
}

impl FromIterator<AssetPeg> for AssetWallet {
    fn from_iter<T: IntoIterator<Item = AssetPeg>>(iter: T) -> Self {
        let mut wallet = Self::new();
        for peg in iter {
            wallet.add(peg);
        }
        wallet
    }
}
