// SPDX-License-Identifier: BUSL-1.1
//! # rwa-settlement — Trade Settlement Engine
//!
//! The state-transition entry point of the settlement core. A consensus
//! engine hands one decoded [`Msg`] per call to
//! [`SettlementEngine::apply`] together with an execution context; the engine
//! authorizes the operation against the permission registry, mutates wallet,
//! escrow, and negotiation state, and returns a typed result.
//!
//! Operations are all-or-nothing: every fallible check runs before the first
//! store write, so a failing transaction leaves no partial state behind. The
//! engine is single-threaded per ledger state version and never blocks or
//! performs I/O.
//!
//! The trade lifecycle per escrow record:
//!
//! ```text
//! empty ──send──▶ partial ──send──▶ both escrowed ──execute──▶ executed
//!                    │                    │
//!                    └──────execute───────┴──────────────────▶ reversed
//! ```
//!
//! Reversal is a *successful* outcome whose business result is "the trade did
//! not complete" — escrowed pegs return to their original owners and the
//! audit event carries `executed=false, reversed=true`.

pub mod engine;
pub mod msg;

// Re-export primary types.
pub use engine::SettlementEngine;
pub use msg::Msg;
