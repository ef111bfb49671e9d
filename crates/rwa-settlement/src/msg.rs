// SPDX-License-Identifier: BUSL-1.1
//! # Ledger Messages
//!
//! The closed set of operations the settlement core accepts, one variant per
//! operation kind. Dispatch is a single match in
//! [`SettlementEngine::apply`](crate::engine::SettlementEngine::apply).

use serde::{Deserialize, Serialize};

use rwa_acl::AclRecord;
use rwa_core::{AccountAddress, OrganizationId, PegHash, ZoneId};
use rwa_negotiation::{BidConfirmation, BidProposal};
use rwa_peg::AssetPeg;

/// A decoded ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Msg {
    #[serde(rename = "define_zone")]
    DefineZone {
        from: AccountAddress,
        to: AccountAddress,
        zone_id: ZoneId,
    },

    #[serde(rename = "define_organization")]
    DefineOrganization {
        from: AccountAddress,
        to: AccountAddress,
        organization_id: OrganizationId,
        zone_id: ZoneId,
    },

    #[serde(rename = "define_acl")]
    DefineAcl {
        from: AccountAddress,
        to: AccountAddress,
        record: AclRecord,
    },

    /// Issue a new asset peg into `to`'s wallet. The peg hash, lock state,
    /// and owner of the carried template are assigned at issuance.
    #[serde(rename = "issue_asset")]
    IssueAsset {
        issuer: AccountAddress,
        to: AccountAddress,
        asset: AssetPeg,
    },

    #[serde(rename = "issue_fiat")]
    IssueFiat {
        issuer: AccountAddress,
        to: AccountAddress,
        transaction_id: String,
        transaction_amount: i64,
    },

    #[serde(rename = "redeem_asset")]
    RedeemAsset {
        issuer: AccountAddress,
        redeemer: AccountAddress,
        peg_hash: PegHash,
    },

    #[serde(rename = "redeem_fiat")]
    RedeemFiat {
        issuer: AccountAddress,
        redeemer: AccountAddress,
        amount: i64,
    },

    /// Seller moves the traded asset peg into escrow.
    #[serde(rename = "send_asset")]
    SendAsset {
        from: AccountAddress,
        to: AccountAddress,
        peg_hash: PegHash,
    },

    /// Buyer moves fiat for the trade identified by `peg_hash` into escrow.
    #[serde(rename = "send_fiat")]
    SendFiat {
        from: AccountAddress,
        to: AccountAddress,
        peg_hash: PegHash,
        amount: i64,
    },

    #[serde(rename = "buyer_execute_order")]
    BuyerExecuteOrder {
        mediator: AccountAddress,
        buyer: AccountAddress,
        seller: AccountAddress,
        peg_hash: PegHash,
        fiat_proof_hash: String,
    },

    #[serde(rename = "seller_execute_order")]
    SellerExecuteOrder {
        mediator: AccountAddress,
        buyer: AccountAddress,
        seller: AccountAddress,
        peg_hash: PegHash,
        awb_proof_hash: String,
    },

    #[serde(rename = "release_asset")]
    ReleaseAsset {
        zone: AccountAddress,
        owner: AccountAddress,
        peg_hash: PegHash,
    },

    #[serde(rename = "change_bid")]
    ChangeBid { proposal: BidProposal },

    #[serde(rename = "confirm_bid")]
    ConfirmBid { confirmation: BidConfirmation },
}

impl Msg {
    /// The operation kind string used in logs and event attribution.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DefineZone { .. } => "define_zone",
            Self::DefineOrganization { .. } => "define_organization",
            Self::DefineAcl { .. } => "define_acl",
            Self::IssueAsset { .. } => "issue_asset",
            Self::IssueFiat { .. } => "issue_fiat",
            Self::RedeemAsset { .. } => "redeem_asset",
            Self::RedeemFiat { .. } => "redeem_fiat",
            Self::SendAsset { .. } => "send_asset",
            Self::SendFiat { .. } => "send_fiat",
            Self::BuyerExecuteOrder { .. } => "buyer_execute_order",
            Self::SellerExecuteOrder { .. } => "seller_execute_order",
            Self::ReleaseAsset { .. } => "release_asset",
            Self::ChangeBid { .. } => "change_bid",
            Self::ConfirmBid { .. } => "confirm_bid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> AccountAddress {
        AccountAddress::from_bytes(vec![byte; 20]).unwrap()
    }

    #[test]
    fn kind_strings_match_serde_tags() {
        let msg = Msg::SendAsset {
            from: addr(1),
            to: addr(2),
            peg_hash: PegHash::from_sequence(0),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"kind\":\"send_asset\""));
        assert_eq!(msg.kind(), "send_asset");
    }

    #[test]
    fn msg_serde_roundtrip() {
        let msg = Msg::RedeemFiat {
            issuer: addr(1),
            redeemer: addr(2),
            amount: 750,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: Msg = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
