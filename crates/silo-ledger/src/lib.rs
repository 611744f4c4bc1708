//! # silo-ledger
//!
//! The central yield-routing state machine.
//!
//! Registered sources funnel harvested yield through
//! [`YieldLedger::receive_yield`](ledger::YieldLedger::receive_yield), which
//! applies dev-share and quarantine rules, normalizes accepted assets into
//! the settlement asset, and keeps per-source/global accounting. An operator
//! periodically runs [`apply_policy`](ledger::YieldLedger::apply_policy) to
//! split the accumulated value between the staking-reward pool and the
//! treasury sink.
//!
//! ## Modules
//!
//! - [`splits`] — Distribution splits, models, and the timelocked change path
//! - [`sinks`] — Reward-sink collaborator trait and the engine adapter
//! - [`ledger`] — The [`YieldLedger`](ledger::YieldLedger) itself

pub mod ledger;
pub mod sinks;
pub mod splits;

use silo_registry::RegistryError;

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The deposited asset id is zero.
    #[error("asset id is zero")]
    ZeroAsset,

    /// The deposited amount is zero.
    #[error("amount is zero")]
    ZeroAmount,

    /// No plugin record exists for the submitting source.
    #[error("unknown yield source")]
    UnknownSource,

    /// The source record is deactivated.
    #[error("yield source is deactivated")]
    SourceInactive,

    /// The caller does not match the record's bound address, or is not
    /// permitted to perform the action.
    #[error("caller is not authorized")]
    UnauthorizedCaller,

    /// The asset is not among the source's declared assets.
    #[error("asset is not declared by this source")]
    InvalidAssetForSource,

    /// The dev share exceeds the global immutable ceiling.
    #[error("dev share {bps} bps exceeds maximum {max} bps")]
    DevShareExceedsMax {
        /// The requested share.
        bps: u16,
        /// The immutable ceiling.
        max: u16,
    },

    /// The conversion amount exceeds the source's effective cap.
    #[error("conversion amount {amount} exceeds cap {cap}")]
    ConversionCapExceeded {
        /// The amount that was to be converted.
        amount: u64,
        /// The effective per-call cap.
        cap: u64,
    },

    /// The converter rejected or failed the conversion, or returned an
    /// asset other than the settlement asset.
    #[error("conversion failed: {0}")]
    ConversionFailed(String),

    /// There is no pending accumulated yield to distribute.
    #[error("nothing to distribute")]
    NothingToDistribute,

    /// A staker amount is due but no reward sink is wired in.
    #[error("reward distributor is not configured")]
    DistributorNotConfigured,

    /// No quarantined balance exists for the (source, asset) pair.
    #[error("no quarantined yield for this source and asset")]
    NoQuarantinedYield,

    /// The release/sweep amount exceeds the quarantined balance.
    #[error("insufficient quarantined yield: requested {requested}, held {available}")]
    InsufficientQuarantinedYield {
        /// Amount requested.
        requested: u64,
        /// Amount actually quarantined.
        available: u64,
    },

    /// A mutating entry point was re-entered while an operation was active.
    #[error("reentrant call into the ledger")]
    ReentrantCall,

    /// Split shares do not sum to exactly 10000 bps.
    #[error("distribution splits must sum to 10000 bps, got {total}")]
    SplitsSumInvalid {
        /// The actual sum.
        total: u32,
    },

    /// The treasury share exceeds its fixed ceiling.
    #[error("treasury share {bps} bps exceeds ceiling {max} bps")]
    TreasuryShareTooHigh {
        /// The requested treasury share.
        bps: u16,
        /// The fixed ceiling.
        max: u16,
    },

    /// The standard path may not reduce the staker share to zero.
    #[error("staker share is floor-protected; use the timelocked path")]
    StakerFloorProtected,

    /// No splits-change proposal is pending.
    #[error("no pending splits change")]
    NoPendingSplitsChange,

    /// The splits-change timelock has not yet expired.
    #[error("timelock not expired: effective at {effective_at}, current time {now}")]
    TimelockNotExpired {
        /// When the proposal becomes executable.
        effective_at: u64,
        /// The current time.
        now: u64,
    },

    /// A registry lookup failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// An asset-transfer collaborator call failed.
    #[error("custody transfer failed: {0}")]
    Custody(String),

    /// The reward-sink collaborator failed.
    #[error("reward sink failed: {0}")]
    RewardSinkFailed(String),

    /// Arithmetic overflow in accounting.
    #[error("arithmetic overflow in ledger accounting")]
    Overflow,
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
