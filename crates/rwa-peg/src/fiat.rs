//! # Fiat Pegs & Fiat Wallets
//!
//! A fiat peg is divisible: amount subtraction consumes pegs in hash order
//! and may split the last consumed peg into two records sharing the same peg
//! hash — one leaving the wallet, one staying. [`FiatWallet::add`] re-merges
//! split halves by hash, so the split is invisible once funds return.
//!
//! Conservation invariant: for every operation here except issuance and
//! redemption, the summed `transaction_amount` across the produced wallets
//! equals the sum across the inputs.

use serde::{Deserialize, Serialize};

use rwa_core::PegHash;

/// A tokenized claim on a fiat transaction amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiatPeg {
    pub peg_hash: PegHash,
    pub transaction_id: String,
    pub transaction_amount: i64,
    /// Cumulative amount burned out of this peg by redemption.
    pub redeemed_amount: i64,
}

impl FiatPeg {
    /// Create a fresh peg for a fiat transaction.
    pub fn new(peg_hash: PegHash, transaction_id: impl Into<String>, transaction_amount: i64) -> Self {
        Self {
            peg_hash,
            transaction_id: transaction_id.into(),
            transaction_amount,
            redeemed_amount: 0,
        }
    }
}

/// An ordered collection of fiat pegs, sorted by peg hash.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FiatWallet(Vec<FiatPeg>);

impl FiatWallet {
    /// Create an empty wallet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of peg entries held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the wallet holds no pegs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate pegs in hash order.
    pub fn iter(&self) -> impl Iterator<Item = &FiatPeg> {
        self.0.iter()
    }

    /// Total `transaction_amount` across all pegs.
    pub fn balance(&self) -> i64 {
        self.0.iter().map(|peg| peg.transaction_amount).sum()
    }

    fn position(&self, peg_hash: &PegHash) -> Result<usize, usize> {
        self.0.binary_search_by(|peg| peg.peg_hash.cmp(peg_hash))
    }

    /// The peg with the given hash, if held.
    pub fn get(&self, peg_hash: &PegHash) -> Option<&FiatPeg> {
        self.position(peg_hash).ok().map(|i| &self.0[i])
    }

    /// Insert a peg, merging by hash: a returning split half re-merges with
    /// its sibling by summing `transaction_amount`. The incoming entry's
    /// other fields win; both halves of a split carry the same metadata, so
    /// nothing is lost.
    pub fn add(&mut self, peg: FiatPeg) {
        match self.position(&peg.peg_hash) {
            Ok(i) => {
                let mut merged = peg;
                merged.transaction_amount += self.0[i].transaction_amount;
                self.0[i] = merged;
            }
            Err(i) => self.0.insert(i, peg),
        }
    }

    /// Insert every peg of `other`, merging by hash.
    pub fn add_all(&mut self, other: FiatWallet) {
        for peg in other.0 {
            self.add(peg);
        }
    }

    /// Remove the entries whose hashes appear in `other`, whole, regardless
    /// of amount. Used when draining escrowed pegs that were previously moved
    /// in as complete entries.
    pub fn remove_by_hashes(&mut self, other: &FiatWallet) {
        for peg in other.iter() {
            if let Ok(i) = self.position(&peg.peg_hash) {
                self.0.remove(i);
            }
        }
    }

    /// Subtract `amount` from the wallet, consuming pegs in hash order and
    /// splitting the last consumed peg when it only partially covers the
    /// remainder. Returns `(taken, remainder)`.
    ///
    /// Returns `None` when `amount` is negative or exceeds the balance; the
    /// wallet is never partially consumed. A zero `amount` yields an empty
    /// `taken` and the full wallet as remainder.
    pub fn subtract_amount(&self, amount: i64) -> Option<(FiatWallet, FiatWallet)> {
        if amount < 0 || self.balance() < amount {
            return None;
        }

        let mut taken = FiatWallet::new();
        let mut remainder = FiatWallet::new();
        let mut outstanding = amount;

        for peg in &self.0 {
            if outstanding == 0 {
                remainder.add(peg.clone());
            } else if peg.transaction_amount <= outstanding {
                outstanding -= peg.transaction_amount;
                taken.add(peg.clone());
            } else {
                let mut sent = peg.clone();
                sent.transaction_amount = outstanding;
                let mut kept = peg.clone();
                kept.transaction_amount = peg.transaction_amount - outstanding;
                taken.add(sent);
                remainder.add(kept);
                outstanding = 0;
            }
        }

        Some((taken, remainder))
    }

    /// Burn `amount` out of the wallet for redemption. Fully consumed pegs
    /// are removed and returned as `emptied`; a partially consumed peg stays
    /// in the remainder with its `transaction_amount` reduced and its
    /// `redeemed_amount` increased by the burned part.
    ///
    /// Returns `None` when `amount` is negative or exceeds the balance.
    pub fn redeem_amount(&self, amount: i64) -> Option<(FiatWallet, FiatWallet)> {
        if amount < 0 || self.balance() < amount {
            return None;
        }

        let mut emptied = FiatWallet::new();
        let mut remainder = FiatWallet::new();
        let mut outstanding = amount;

        for peg in &self.0 {
            if outstanding == 0 {
                remainder.add(peg.clone());
            } else if peg.transaction_amount <= outstanding {
                outstanding -= peg.transaction_amount;
                emptied.add(peg.clone());
            } else {
                let mut kept = peg.clone();
                kept.transaction_amount = peg.transaction_amount - outstanding;
                kept.redeemed_amount = peg.redeemed_amount + outstanding;
                remainder.add(kept);
                outstanding = 0;
            }
        }

        Some((emptied, remainder))
    }
}

impl FromIterator<FiatPeg> for FiatWallet {
    fn from_iter<T: IntoIterator<Item = FiatPeg>>(iter: T) -> Self {
        let mut wallet = Self::new();
        for peg in iter {
            wallet.add(peg);
        }
        wallet
    }
}
