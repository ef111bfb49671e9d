//! # Permission Record Types
//!
//! The capability set is a fixed record of boolean flags attached to exactly
//! one account. There is deliberately no bitset or extensible map here — the
//! operation set of the ledger is closed, and a named flag per operation keeps
//! genesis files and audit output self-describing.

use serde::{Deserialize, Serialize};

use rwa_core::{AccountAddress, OrganizationId, ZoneId};

/// The fixed capability set attached to one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Acl {
    pub issue_asset: bool,
    pub issue_fiat: bool,
    pub send_asset: bool,
    pub send_fiat: bool,
    pub buyer_execute_order: bool,
    pub seller_execute_order: bool,
    pub change_buyer_bid: bool,
    pub change_seller_bid: bool,
    pub confirm_buyer_bid: bool,
    pub confirm_seller_bid: bool,
    pub negotiation: bool,
    pub redeem_fiat: bool,
    pub redeem_asset: bool,
    pub release_asset: bool,
}

impl Acl {
    /// All capabilities granted.
    pub fn all() -> Self {
        Self {
            issue_asset: true,
            issue_fiat: true,
            send_asset: true,
            send_fiat: true,
            buyer_execute_order: true,
            seller_execute_order: true,
            change_buyer_bid: true,
            change_seller_bid: true,
            confirm_buyer_bid: true,
            confirm_seller_bid: true,
            negotiation: true,
            redeem_fiat: true,
            redeem_asset: true,
            release_asset: true,
        }
    }

    /// No capabilities granted.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Per-account permission record. Every account with a record belongs to
/// exactly one zone and one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclRecord {
    pub address: AccountAddress,
    pub zone_id: ZoneId,
    pub organization_id: OrganizationId,
    pub acl: Acl,
}

/// An organization: an owning account within a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub address: AccountAddress,
    pub zone_id: ZoneId,
}
