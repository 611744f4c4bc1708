//! # silo-registry
//!
//! Trust-tier registry: source-of-truth for plugin identity, trust tier,
//! and per-tier / per-source risk limits.
//!
//! Registration is permissionless and one-time; every new plugin lands in
//! the lowest ("untrusted") tier. Tier promotion, tier configuration, and
//! per-plugin cap overrides are privileged actions. Records are never
//! deleted, only deactivated.
//!
//! ## Modules
//!
//! - [`tier`] — Tier configuration, per-plugin caps, effective limits
//! - [`plugins`] — Plugin records and the [`TierRegistry`](plugins::TierRegistry)

pub mod plugins;
pub mod tier;

/// Error types for registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The source address or derived id is already registered.
    #[error("plugin already registered")]
    AlreadyRegistered,

    /// The source reported a zero/empty id, address, or routing target.
    #[error("invalid plugin identity: {0}")]
    InvalidIdentity(String),

    /// No plugin record exists for the given id.
    #[error("plugin not found")]
    NotFound,

    /// No configuration exists for the given tier.
    #[error("unknown tier {tier}")]
    UnknownTier {
        /// The tier that has no configuration.
        tier: u8,
    },

    /// A slippage bound exceeds 100%.
    #[error("invalid slippage bound: {bps} bps exceeds 10000")]
    InvalidSlippage {
        /// The offending bound in basis points.
        bps: u16,
    },

    /// The caller is not the required authority.
    #[error("caller is not authorized for this action")]
    Unauthorized,
}

/// Convenience result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
