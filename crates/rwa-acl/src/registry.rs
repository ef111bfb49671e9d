//! # Permission Registry
//!
//! Owns the zone, organization, and per-account capability records and
//! answers every authorization query in the workspace. Zone and organization
//! records are create-once; capability records are upserts. Nothing is ever
//! deleted.
//!
//! Storage is one ordered map per record kind, keyed by the typed
//! identifiers, giving deterministic iteration for genesis export and
//! queries.

use std::collections::BTreeMap;

use tracing::debug;

use rwa_core::{
    AccountAddress, AccountDirectory, Event, ExecutionContext, LedgerError, OrganizationId,
    ZoneId,
};

use crate::types::{Acl, AclRecord, Organization};

/// The account number the external account service assigns to genesis.
const GENESIS_ACCOUNT_NUMBER: u64 = 0;

/// Zone, organization, and capability records plus the authorization checks
/// over them.
#[derive(Debug, Clone, Default)]
pub struct AclRegistry {
    zones: BTreeMap<ZoneId, AccountAddress>,
    organizations: BTreeMap<OrganizationId, Organization>,
    accounts: BTreeMap<AccountAddress, AclRecord>,
}

impl AclRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Definition operations ------------------------------------------------

    /// Define a new zone owned by `to`.
    ///
    /// Only the genesis account may define zones, and a zone identifier is
    /// claimable exactly once.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Unauthorized`] if `from` is not the genesis account.
    /// - [`LedgerError::AlreadyExists`] if `zone_id` is already defined.
    pub fn define_zone(
        &mut self,
        ctx: &mut ExecutionContext,
        directory: &dyn AccountDirectory,
        from: &AccountAddress,
        to: &AccountAddress,
        zone_id: ZoneId,
    ) -> Result<(), LedgerError> {
        if !self.is_genesis_account(directory, from) {
            return Err(LedgerError::Unauthorized(format!(
                "account {from} is not the genesis account; zones can only be defined by genesis"
            )));
        }
        if self.zones.contains_key(&zone_id) {
            return Err(LedgerError::AlreadyExists(format!("zone {zone_id}")));
        }

        debug!(zone = %zone_id, owner = %to, "defining zone");
        self.zones.insert(zone_id.clone(), to.clone());

        ctx.emit(
            Event::new("define_zone")
                .attribute("zone_address", to.to_hex())
                .attribute("zone_id", zone_id.to_hex()),
        );
        Ok(())
    }

    /// Define a new organization owned by `to` within `zone_id`.
    ///
    /// Only the owning zone account may define organizations in its zone, and
    /// an organization identifier is claimable exactly once.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if `zone_id` is not defined.
    /// - [`LedgerError::Unauthorized`] if `from` does not own `zone_id`.
    /// - [`LedgerError::AlreadyExists`] if `organization_id` is already
    ///   defined.
    pub fn define_organization(
        &mut self,
        ctx: &mut ExecutionContext,
        from: &AccountAddress,
        to: &AccountAddress,
        organization_id: OrganizationId,
        zone_id: ZoneId,
    ) -> Result<(), LedgerError> {
        let zone_owner = self.zone_owner(&zone_id)?;
        if zone_owner != from {
            return Err(LedgerError::Unauthorized(format!(
                "account {from} is not the zone account; organizations can only be defined by the zone account"
            )));
        }
        if self.organizations.contains_key(&organization_id) {
            return Err(LedgerError::AlreadyExists(format!(
                "organization {organization_id}"
            )));
        }

        debug!(organization = %organization_id, zone = %zone_id, owner = %to, "defining organization");
        self.organizations.insert(
            organization_id.clone(),
            Organization {
                address: to.clone(),
                zone_id,
            },
        );

        ctx.emit(
            Event::new("define_organization")
                .attribute("organization_address", to.to_hex())
                .attribute("organization_id", organization_id.to_hex()),
        );
        Ok(())
    }

    /// Upsert the capability record for `to`.
    ///
    /// Authorization cascades: the genesis account may define any record; a
    /// zone account may define records in its zone; an organization account
    /// may define records in its organization when that organization belongs
    /// to the record's zone.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Unauthorized`] if `from` matches none of the
    /// three tiers for `record`.
    pub fn define_acl(
        &mut self,
        ctx: &mut ExecutionContext,
        directory: &dyn AccountDirectory,
        from: &AccountAddress,
        to: &AccountAddress,
        record: AclRecord,
    ) -> Result<(), LedgerError> {
        let authorized = self.is_genesis_account(directory, from)
            || self.is_zone_address(&record.zone_id, from)
            || self.is_organization_address(&record.zone_id, &record.organization_id, from);
        if !authorized {
            return Err(LedgerError::Unauthorized(format!(
                "account {from} does not have access to define an acl for account {to}"
            )));
        }

        debug!(account = %to, zone = %record.zone_id, "defining acl record");
        self.accounts.insert(to.clone(), record);

        ctx.emit(Event::new("define_acl").attribute("acl_account_address", to.to_hex()));
        Ok(())
    }

    // -- Authorization checks -------------------------------------------------

    /// Whether `address` is the genesis account (account number zero).
    pub fn is_genesis_account(
        &self,
        directory: &dyn AccountDirectory,
        address: &AccountAddress,
    ) -> bool {
        directory.account_number(address) == Some(GENESIS_ACCOUNT_NUMBER)
    }

    /// Whether `address` owns the zone `zone_id`.
    pub fn is_zone_address(&self, zone_id: &ZoneId, address: &AccountAddress) -> bool {
        self.zones.get(zone_id) == Some(address)
    }

    /// Whether `address` owns the organization `organization_id` and that
    /// organization belongs to `zone_id`.
    pub fn is_organization_address(
        &self,
        zone_id: &ZoneId,
        organization_id: &OrganizationId,
        address: &AccountAddress,
    ) -> bool {
        match self.organizations.get(organization_id) {
            Some(organization) => {
                organization.zone_id == *zone_id && organization.address == *address
            }
            None => false,
        }
    }

    /// Fetch `to`'s capability set, requiring that `from` is the owner of
    /// `to`'s zone.
    ///
    /// This is the check used whenever an operation requires proof that the
    /// governing *zone* — not the account itself — is acting.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if `to` has no capability record or its
    ///   zone is undefined.
    /// - [`LedgerError::Unauthorized`] if `from` does not own that zone.
    pub fn check_zone_and_get_acl(
        &self,
        from: &AccountAddress,
        to: &AccountAddress,
    ) -> Result<Acl, LedgerError> {
        let record = self.account_acl(to)?;
        let zone_owner = self.zone_owner(&record.zone_id)?;
        if zone_owner != from {
            return Err(LedgerError::Unauthorized(format!(
                "account {from} is not the zone account of {to}"
            )));
        }
        Ok(record.acl)
    }

    // -- Reads ----------------------------------------------------------------

    /// The owning account of `zone_id`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the zone is undefined.
    pub fn zone_owner(&self, zone_id: &ZoneId) -> Result<&AccountAddress, LedgerError> {
        self.zones
            .get(zone_id)
            .ok_or_else(|| LedgerError::NotFound(format!("zone {zone_id}")))
    }

    /// The organization record for `organization_id`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the organization is undefined.
    pub fn organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<&Organization, LedgerError> {
        self.organizations
            .get(organization_id)
            .ok_or_else(|| LedgerError::NotFound(format!("organization {organization_id}")))
    }

    /// The capability record for `address`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if no record is defined.
    pub fn account_acl(&self, address: &AccountAddress) -> Result<&AclRecord, LedgerError> {
        self.accounts
            .get(address)
            .ok_or_else(|| LedgerError::NotFound(format!("acl record for account {address}")))
    }

    /// All zones in identifier order.
    pub fn zones(&self) -> impl Iterator<Item = (&ZoneId, &AccountAddress)> {
        self.zones.iter()
    }

    /// All organizations in identifier order.
    pub fn organizations(&self) -> impl Iterator<Item = (&OrganizationId, &Organization)> {
        self.organizations.iter()
    }

    /// All capability records in address order.
    pub fn acl_records(&self) -> impl Iterator<Item = &AclRecord> {
        self.accounts.values()
    }
}
