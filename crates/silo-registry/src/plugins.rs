//! Plugin records and the tier registry.
//!
//! Registration is a two-step design: anyone may register a plugin (it lands
//! in the untrusted tier), and only the tier authority may promote it later.
//! This keeps listing permissionless while bounding systemic risk by
//! default. There is intentionally no "unregister": incident response
//! deactivates a record, it never deletes one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use silo_types::events::AuditEvent;
use silo_types::{Address, AssetId, SourceId, ZERO_ADDRESS};

use crate::tier::{
    default_tier_configs, effective_limits, EffectiveLimits, PluginCaps, Tier, TierConfig,
    UNTRUSTED_TIER,
};
use crate::{RegistryError, Result};

/// Identity interface a yield source must expose to register.
///
/// Implementors provide the actual source contract. The abstraction allows
/// registry and ledger logic to be tested without real plugin deployments.
pub trait YieldSource {
    /// Opaque unique id reported by the source.
    fn id(&self) -> SourceId;

    /// Assets the source is allowed to deposit.
    fn declared_assets(&self) -> Vec<AssetId>;

    /// The settlement-bound routing target the source reports.
    fn routing_target(&self) -> Address;
}

/// An immutable-identity record for a registered plugin.
///
/// Only `tier` and `active` ever change after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRecord {
    /// Opaque unique id, fixed at registration.
    pub id: SourceId,
    /// Bound source address, fixed at registration.
    pub address: Address,
    /// Current trust tier.
    pub tier: Tier,
    /// Assets this source may deposit.
    pub declared_assets: Vec<AssetId>,
    /// Settlement-bound routing target.
    pub routing_target: Address,
    /// Registration timestamp (unix seconds).
    pub registered_at: u64,
    /// Whether the plugin may currently submit yield.
    pub active: bool,
}

/// Source-of-truth for plugin identity, trust tiers, and risk limits.
#[derive(Debug)]
pub struct TierRegistry {
    tier_authority: Address,
    incident_authority: Address,
    plugins: BTreeMap<SourceId, PluginRecord>,
    by_address: BTreeMap<Address, SourceId>,
    tier_configs: BTreeMap<Tier, TierConfig>,
    caps: BTreeMap<SourceId, PluginCaps>,
    events: Vec<AuditEvent>,
}

impl TierRegistry {
    /// Create a registry seeded with the default tier configurations.
    pub fn new(tier_authority: Address, incident_authority: Address) -> Self {
        Self {
            tier_authority,
            incident_authority,
            plugins: BTreeMap::new(),
            by_address: BTreeMap::new(),
            tier_configs: default_tier_configs().into_iter().collect(),
            caps: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Register a new plugin. Permissionless, one-time per id/address.
    ///
    /// The new record is always placed in [`UNTRUSTED_TIER`]; promotion is a
    /// separate privileged action.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidIdentity`] if the reported id, address, or
    ///   routing target is zero
    /// - [`RegistryError::AlreadyRegistered`] if the id or address exists
    pub fn register_plugin(
        &mut self,
        address: Address,
        source: &dyn YieldSource,
        now: u64,
    ) -> Result<SourceId> {
        let id = source.id();
        if id == ZERO_ADDRESS {
            return Err(RegistryError::InvalidIdentity(
                "source reported a zero id".to_string(),
            ));
        }
        if address == ZERO_ADDRESS {
            return Err(RegistryError::InvalidIdentity(
                "source address is zero".to_string(),
            ));
        }
        if source.routing_target() == ZERO_ADDRESS {
            return Err(RegistryError::InvalidIdentity(
                "source reported a zero routing target".to_string(),
            ));
        }
        if self.plugins.contains_key(&id) || self.by_address.contains_key(&address) {
            return Err(RegistryError::AlreadyRegistered);
        }

        let record = PluginRecord {
            id,
            address,
            tier: UNTRUSTED_TIER,
            declared_assets: source.declared_assets(),
            routing_target: source.routing_target(),
            registered_at: now,
            active: true,
        };
        self.by_address.insert(address, id);
        self.plugins.insert(id, record);

        tracing::info!(
            id = %hex_prefix(&id),
            tier = UNTRUSTED_TIER,
            "plugin registered"
        );
        Ok(id)
    }

    /// Change a plugin's trust tier. Privileged.
    ///
    /// Already-settled accounting and quarantined balances held by the
    /// ledger are untouched by tier changes.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Unauthorized`] if the caller is not the tier authority
    /// - [`RegistryError::NotFound`] if the id is unknown
    /// - [`RegistryError::UnknownTier`] if no config exists for the tier
    pub fn set_tier(&mut self, caller: Address, id: SourceId, tier: Tier) -> Result<()> {
        if caller != self.tier_authority {
            return Err(RegistryError::Unauthorized);
        }
        if !self.tier_configs.contains_key(&tier) {
            return Err(RegistryError::UnknownTier { tier });
        }
        let record = self.plugins.get_mut(&id).ok_or(RegistryError::NotFound)?;
        record.tier = tier;

        self.events
            .push(AuditEvent::TierUpdated { source: id, tier });
        tracing::info!(id = %hex_prefix(&id), tier, "plugin tier updated");
        Ok(())
    }

    /// Install or replace the configuration for a tier. Privileged.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Unauthorized`] if the caller is not the tier authority
    /// - [`RegistryError::InvalidSlippage`] if the slippage bound exceeds 100%
    pub fn set_tier_config(
        &mut self,
        caller: Address,
        tier: Tier,
        config: TierConfig,
    ) -> Result<()> {
        if caller != self.tier_authority {
            return Err(RegistryError::Unauthorized);
        }
        config.validate()?;
        self.tier_configs.insert(tier, config);
        tracing::info!(tier, "tier config updated");
        Ok(())
    }

    /// Install or replace a per-plugin caps override. Privileged.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Unauthorized`] if the caller is not the tier authority
    /// - [`RegistryError::NotFound`] if the id is unknown
    /// - [`RegistryError::InvalidSlippage`] if the slippage bound exceeds 100%
    pub fn set_plugin_caps(
        &mut self,
        caller: Address,
        id: SourceId,
        caps: PluginCaps,
    ) -> Result<()> {
        if caller != self.tier_authority {
            return Err(RegistryError::Unauthorized);
        }
        caps.validate()?;
        if !self.plugins.contains_key(&id) {
            return Err(RegistryError::NotFound);
        }
        self.caps.insert(id, caps);
        tracing::info!(id = %hex_prefix(&id), "plugin caps updated");
        Ok(())
    }

    /// Reactivate a plugin. Privileged, idempotent.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Unauthorized`] if the caller is not the incident authority
    /// - [`RegistryError::NotFound`] if the id is unknown
    pub fn activate(&mut self, caller: Address, id: SourceId) -> Result<()> {
        self.set_active(caller, id, true)
    }

    /// Deactivate a plugin. Privileged, idempotent, never removes the record.
    ///
    /// This is the sole mechanism available to incident response.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Unauthorized`] if the caller is not the incident authority
    /// - [`RegistryError::NotFound`] if the id is unknown
    pub fn deactivate(&mut self, caller: Address, id: SourceId) -> Result<()> {
        self.set_active(caller, id, false)
    }

    fn set_active(&mut self, caller: Address, id: SourceId, active: bool) -> Result<()> {
        if caller != self.incident_authority {
            return Err(RegistryError::Unauthorized);
        }
        let record = self.plugins.get_mut(&id).ok_or(RegistryError::NotFound)?;
        if record.active != active {
            record.active = active;
            tracing::warn!(id = %hex_prefix(&id), active, "plugin active flag changed");
        }
        Ok(())
    }

    /// Look up a plugin record by id.
    pub fn plugin(&self, id: &SourceId) -> Option<&PluginRecord> {
        self.plugins.get(id)
    }

    /// Look up a plugin record by its bound source address.
    pub fn plugin_by_address(&self, address: &Address) -> Option<&PluginRecord> {
        self.by_address.get(address).and_then(|id| self.plugins.get(id))
    }

    /// The configuration for a tier, if one exists.
    pub fn tier_config(&self, tier: Tier) -> Option<&TierConfig> {
        self.tier_configs.get(&tier)
    }

    /// Resolve the effective limits for a plugin: the tighter of its tier
    /// config and any enabled caps override.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if the id is unknown
    /// - [`RegistryError::UnknownTier`] if the plugin's tier has no config
    pub fn effective_limits(&self, id: &SourceId) -> Result<EffectiveLimits> {
        let record = self.plugins.get(id).ok_or(RegistryError::NotFound)?;
        let tier_config = self
            .tier_configs
            .get(&record.tier)
            .ok_or(RegistryError::UnknownTier { tier: record.tier })?;
        Ok(effective_limits(tier_config, self.caps.get(id)))
    }

    /// Drain the pending audit events.
    pub fn drain_events(&mut self) -> Vec<AuditEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Short hex prefix for log lines.
fn hex_prefix(bytes: &[u8; 32]) -> String {
    bytes[..4].iter().map(|b| format!("{b:02x}")).collect()
}
