//! # rwa-acl — Hierarchical Permission Registry
//!
//! A three-level permission hierarchy rooted at the genesis account:
//!
//! ```text
//! genesis ── defines ──▶ zone ── defines ──▶ organization ── defines ──▶ account ACL
//! ```
//!
//! - **Zones** are defined only by the genesis account (account number zero)
//!   and are create-once.
//! - **Organizations** are defined only by their owning zone and are
//!   create-once.
//! - **Account capability records** ([`AclRecord`]) are upserts; authorization
//!   to write one cascades: genesis, or the owner of the record's zone, or the
//!   owner of the record's organization when that organization belongs to the
//!   record's zone.
//!
//! Every privileged operation elsewhere in the workspace routes through
//! [`AclRegistry::check_zone_and_get_acl`] or a plain capability read.

pub mod registry;
pub mod types;

// Re-export primary types.
pub use registry::AclRegistry;
pub use types::{Acl, AclRecord, Organization};
