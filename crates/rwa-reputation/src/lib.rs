//! # rwa-reputation — Trader Reputation Book
//!
//! One-way bookkeeping of transaction feedback. The settlement engine and
//! negotiation registry record positive and negative events through the
//! [`ReputationSink`] trait; nothing in the core ever reads reputation back
//! to make an authorization decision, and recording can never fail — a trade
//! must not abort because bookkeeping hiccuped.
//!
//! The derived rating starts at a neutral baseline and moves by one per
//! feedback event.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rwa_core::{AccountAddress, FeedbackKind, ReputationSink};

/// Neutral starting rating for an account with no feedback history.
const BASELINE_RATING: i64 = 100;

/// Positive/negative transaction counts per operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionFeedback {
    pub send_asset_positive: u64,
    pub send_asset_negative: u64,
    pub send_fiat_positive: u64,
    pub send_fiat_negative: u64,
    pub buyer_execute_positive: u64,
    pub buyer_execute_negative: u64,
    pub seller_execute_positive: u64,
    pub seller_execute_negative: u64,
    pub change_bid_positive: u64,
    pub change_bid_negative: u64,
    pub confirm_bid_positive: u64,
    pub confirm_bid_negative: u64,
}

impl TransactionFeedback {
    fn bump(&mut self, kind: FeedbackKind, positive: bool) {
        let counter = match (kind, positive) {
            (FeedbackKind::SendAsset, true) => &mut self.send_asset_positive,
            (FeedbackKind::SendAsset, false) => &mut self.send_asset_negative,
            (FeedbackKind::SendFiat, true) => &mut self.send_fiat_positive,
            (FeedbackKind::SendFiat, false) => &mut self.send_fiat_negative,
            (FeedbackKind::BuyerExecuteOrder, true) => &mut self.buyer_execute_positive,
            (FeedbackKind::BuyerExecuteOrder, false) => &mut self.buyer_execute_negative,
            (FeedbackKind::SellerExecuteOrder, true) => &mut self.seller_execute_positive,
            (FeedbackKind::SellerExecuteOrder, false) => &mut self.seller_execute_negative,
            (FeedbackKind::ChangeBid, true) => &mut self.change_bid_positive,
            (FeedbackKind::ChangeBid, false) => &mut self.change_bid_negative,
            (FeedbackKind::ConfirmBid, true) => &mut self.confirm_bid_positive,
            (FeedbackKind::ConfirmBid, false) => &mut self.confirm_bid_negative,
        };
        *counter += 1;
    }

    /// Sum of all positive counters.
    pub fn total_positive(&self) -> u64 {
        self.send_asset_positive
            + self.send_fiat_positive
            + self.buyer_execute_positive
            + self.seller_execute_positive
            + self.change_bid_positive
            + self.confirm_bid_positive
    }

    /// Sum of all negative counters.
    pub fn total_negative(&self) -> u64 {
        self.send_asset_negative
            + self.send_fiat_negative
            + self.buyer_execute_negative
            + self.seller_execute_negative
            + self.change_bid_negative
            + self.confirm_bid_negative
    }
}

/// Feedback history for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReputation {
    pub address: AccountAddress,
    pub feedback: TransactionFeedback,
}

impl AccountReputation {
    fn new(address: AccountAddress) -> Self {
        Self {
            address,
            feedback: TransactionFeedback::default(),
        }
    }

    /// The derived trader rating.
    pub fn rating(&self) -> i64 {
        BASELINE_RATING + self.feedback.total_positive() as i64
            - self.feedback.total_negative() as i64
    }
}

/// All account reputations.
#[derive(Debug, Clone, Default)]
pub struct ReputationBook {
    accounts: BTreeMap<AccountAddress, AccountReputation>,
}

impl ReputationBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feedback history for `address`, if any has been recorded.
    pub fn account(&self, address: &AccountAddress) -> Option<&AccountReputation> {
        self.accounts.get(address)
    }

    /// The derived rating for `address` (baseline when unseen).
    pub fn rating(&self, address: &AccountAddress) -> i64 {
        self.accounts
            .get(address)
            .map(AccountReputation::rating)
            .unwrap_or(BASELINE_RATING)
    }

    /// Iterate all histories in address order.
    pub fn accounts(&self) -> impl Iterator<Item = &AccountReputation> {
        self.accounts.values()
    }

    fn record(&mut self, kind: FeedbackKind, address: &AccountAddress, positive: bool) {
        self.accounts
            .entry(address.clone())
            .or_insert_with(|| AccountReputation::new(address.clone()))
            .feedback
            .bump(kind, positive);
    }
}

impl ReputationSink for ReputationBook {
    fn record_positive(&mut self, kind: FeedbackKind, address: &AccountAddress) {
        self.record(kind, address, true);
    }

    fn record_negative(&mut self, kind: FeedbackKind, address: &AccountAddress) {
        self.record(kind, address, false);
    }
}
