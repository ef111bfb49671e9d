//! # rwa-peg — Peg Store
//!
//! Discrete tokenized claims and their wallet-level algebra:
//!
//! - [`AssetPeg`]: a claim on a real-world asset. Indivisible — it moves
//!   between wallets whole, identified by its peg hash.
//! - [`FiatPeg`]: a claim on a fiat transaction amount. Divisible — amount
//!   subtraction may split a peg; the two halves share the peg hash and
//!   re-merge on add. Total outstanding amount is conserved except at
//!   issuance and redemption.
//! - [`AssetWallet`] / [`FiatWallet`]: collections kept sorted by peg hash
//!   for binary search and deterministic iteration.
//! - [`WalletStore`]: per-account wallets plus the two monotonic peg-hash
//!   sequence cells from which every peg hash is assigned at issuance.

pub mod asset;
pub mod fiat;
pub mod store;

// Re-export primary types.
pub use asset::{AssetPeg, AssetWallet};
pub use fiat::{FiatPeg, FiatWallet};
pub use store::WalletStore;
