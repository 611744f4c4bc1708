//! # silo-rewards
//!
//! Epoch-based pro-rata staking rewards fed by the ledger.
//!
//! Stake changes are checkpointed per account and globally; a claim for a
//! fully elapsed epoch pays `pool * stake_at(epoch) / total_stake_at(epoch)`
//! with floor division. Epochs advance lazily on every call that touches the
//! engine, never from a background timer.
//!
//! ## Modules
//!
//! - [`checkpoints`] — Append-ordered stake checkpoint series
//! - [`engine`] — The [`RewardEngine`](engine::RewardEngine)

pub mod checkpoints;
pub mod engine;

/// Error types for reward operations.
#[derive(Debug, thiserror::Error)]
pub enum RewardError {
    /// The claimed epoch has not fully elapsed yet.
    #[error("epoch {epoch} is not finalized (current epoch {current})")]
    EpochNotFinalized {
        /// The epoch being claimed.
        epoch: u64,
        /// The engine's current epoch.
        current: u64,
    },

    /// The (account, epoch) pair was already claimed.
    #[error("rewards for epoch {epoch} already claimed")]
    AlreadyClaimed {
        /// The epoch that was double-claimed.
        epoch: u64,
    },

    /// The caller had no checkpointed stake at the claimed epoch.
    #[error("no stake at the claimed epoch")]
    NoStake,

    /// Unstake amount exceeds the caller's current stake.
    #[error("insufficient stake: requested {requested}, available {available}")]
    InsufficientStake {
        /// Amount requested.
        requested: u64,
        /// Amount actually staked.
        available: u64,
    },

    /// Amount is zero.
    #[error("amount is zero")]
    ZeroAmount,

    /// The caller is not the configured distributor (the ledger).
    #[error("caller is not authorized to distribute rewards")]
    UnauthorizedCaller,

    /// A checkpoint would be recorded behind the series head.
    #[error("checkpoint epoch {epoch} is behind series head {head}")]
    CheckpointOutOfOrder {
        /// The epoch being recorded.
        epoch: u64,
        /// The latest epoch already in the series.
        head: u64,
    },

    /// Arithmetic overflow.
    #[error("arithmetic overflow in reward calculation")]
    Overflow,
}

/// Convenience result type for reward operations.
pub type Result<T> = std::result::Result<T, RewardError>;
