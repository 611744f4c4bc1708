//! Tier configuration and effective risk limits.
//!
//! Each trust tier carries a conversion cap, a slippage tolerance, and two
//! behavior flags (auto-convert, mandatory quarantine). A plugin may
//! additionally carry a [`PluginCaps`] override that can only *tighten* the
//! owning tier's limits, never loosen them.

use serde::{Deserialize, Serialize};

use silo_types::MAX_BPS;

use crate::{RegistryError, Result};

/// Trust tier identifier. Tier 0 is always "untrusted".
pub type Tier = u8;

/// The tier assigned unconditionally at registration.
pub const UNTRUSTED_TIER: Tier = 0;

/// Per-tier risk limits and routing behavior.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Maximum conversion amount per call, in the deposited asset's units.
    pub max_conversion_amount: u64,
    /// Maximum allowed slippage in basis points.
    pub max_slippage_bps: u16,
    /// Whether yield from this tier auto-converts on receipt.
    pub auto_convert: bool,
    /// Whether yield from this tier is placed under mandatory quarantine.
    pub quarantine: bool,
}

impl TierConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidSlippage`] if the slippage bound exceeds 100%
    pub fn validate(&self) -> Result<()> {
        if self.max_slippage_bps > MAX_BPS {
            return Err(RegistryError::InvalidSlippage {
                bps: self.max_slippage_bps,
            });
        }
        Ok(())
    }
}

/// Seed configurations for tiers 0..=2.
///
/// Tier 0 quarantines everything; tier 1 auto-converts with a tight cap and
/// 1% slippage; tier 2 auto-converts with a wide cap and 3% slippage. All of
/// these are mutable by the tier authority after init.
pub fn default_tier_configs() -> Vec<(Tier, TierConfig)> {
    vec![
        (
            0,
            TierConfig {
                max_conversion_amount: 0,
                max_slippage_bps: 0,
                auto_convert: false,
                quarantine: true,
            },
        ),
        (
            1,
            TierConfig {
                max_conversion_amount: 1_000_000,
                max_slippage_bps: 100,
                auto_convert: true,
                quarantine: false,
            },
        ),
        (
            2,
            TierConfig {
                max_conversion_amount: 100_000_000,
                max_slippage_bps: 300,
                auto_convert: true,
                quarantine: false,
            },
        ),
    ]
}

/// Optional per-plugin override that tightens the owning tier's limits.
///
/// A zero field means "no override for that limit".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCaps {
    /// Whether the override is active at all.
    pub enabled: bool,
    /// Override for the per-call conversion cap (0 = inherit tier).
    pub max_conversion_amount: u64,
    /// Override for the slippage bound (0 = inherit tier).
    pub max_slippage_bps: u16,
}

impl PluginCaps {
    /// Validate the override.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidSlippage`] if the slippage bound exceeds 100%
    pub fn validate(&self) -> Result<()> {
        if self.max_slippage_bps > MAX_BPS {
            return Err(RegistryError::InvalidSlippage {
                bps: self.max_slippage_bps,
            });
        }
        Ok(())
    }
}

/// The limits that actually apply to a plugin: the tighter of its tier
/// config and any enabled caps override.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveLimits {
    pub max_conversion_amount: u64,
    pub max_slippage_bps: u16,
    pub auto_convert: bool,
    pub quarantine: bool,
}

/// Resolve the effective limits for a tier config plus an optional override.
///
/// Overrides tighten only: a non-zero override field replaces the tier value
/// when it is strictly smaller. Behavior flags always come from the tier.
pub fn effective_limits(tier: &TierConfig, caps: Option<&PluginCaps>) -> EffectiveLimits {
    let mut limits = EffectiveLimits {
        max_conversion_amount: tier.max_conversion_amount,
        max_slippage_bps: tier.max_slippage_bps,
        auto_convert: tier.auto_convert,
        quarantine: tier.quarantine,
    };

    if let Some(caps) = caps.filter(|c| c.enabled) {
        if caps.max_conversion_amount > 0 {
            limits.max_conversion_amount =
                limits.max_conversion_amount.min(caps.max_conversion_amount);
        }
        if caps.max_slippage_bps > 0 {
            limits.max_slippage_bps = limits.max_slippage_bps.min(caps.max_slippage_bps);
        }
    }

    limits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier1() -> TierConfig {
        TierConfig {
            max_conversion_amount: 1_000_000,
            max_slippage_bps: 100,
            auto_convert: true,
            quarantine: false,
        }
    }

    #[test]
    fn test_default_configs_cover_tier_zero() {
        let configs = default_tier_configs();
        let (tier, config) = &configs[0];
        assert_eq!(*tier, UNTRUSTED_TIER);
        assert!(config.quarantine, "tier 0 must quarantine");
        assert!(!config.auto_convert);
    }

    #[test]
    fn test_default_configs_valid() {
        for (_, config) in default_tier_configs() {
            config.validate().expect("seed config must be valid");
        }
    }

    #[test]
    fn test_tier_config_rejects_excess_slippage() {
        let config = TierConfig {
            max_slippage_bps: 10_001,
            ..tier1()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSlippage { bps: 10_001 }));
    }

    #[test]
    fn test_caps_tighten_conversion_amount() {
        let caps = PluginCaps {
            enabled: true,
            max_conversion_amount: 500,
            max_slippage_bps: 0,
        };
        let limits = effective_limits(&tier1(), Some(&caps));
        assert_eq!(limits.max_conversion_amount, 500);
        assert_eq!(limits.max_slippage_bps, 100, "slippage inherits tier");
    }

    #[test]
    fn test_caps_cannot_loosen() {
        let caps = PluginCaps {
            enabled: true,
            max_conversion_amount: 2_000_000,
            max_slippage_bps: 5_000,
        };
        let limits = effective_limits(&tier1(), Some(&caps));
        assert_eq!(limits.max_conversion_amount, 1_000_000);
        assert_eq!(limits.max_slippage_bps, 100);
    }

    #[test]
    fn test_disabled_caps_ignored() {
        let caps = PluginCaps {
            enabled: false,
            max_conversion_amount: 1,
            max_slippage_bps: 1,
        };
        let limits = effective_limits(&tier1(), Some(&caps));
        assert_eq!(limits.max_conversion_amount, 1_000_000);
        assert_eq!(limits.max_slippage_bps, 100);
    }

    #[test]
    fn test_no_caps_inherits_tier() {
        let limits = effective_limits(&tier1(), None);
        assert_eq!(limits.max_conversion_amount, 1_000_000);
        assert_eq!(limits.max_slippage_bps, 100);
        assert!(limits.auto_convert);
        assert!(!limits.quarantine);
    }
}
