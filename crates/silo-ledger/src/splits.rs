//! Distribution splits and the timelocked change path.
//!
//! Accumulated settlement-asset value is split according to three basis-point
//! shares (legacy buyback, staker, treasury) that must always sum to exactly
//! 10000. The staker share carries a governance-protected floor: the
//! standard privileged path may never reduce it from non-zero to zero; only
//! a slower propose-then-execute path behind a fixed timelock may.
//!
//! ## Timelock
//!
//! [`SPLITS_TIMELOCK_SECS`] = 48 * 3600 = 172,800 seconds (48 hours)

use serde::{Deserialize, Serialize};

use silo_types::bps_of;

use crate::{LedgerError, Result};

/// Timelock duration for the slow splits-change path (48 hours in seconds).
pub const SPLITS_TIMELOCK_SECS: u64 = 48 * 3600;

/// Fixed ceiling on the treasury share in basis points (50%).
pub const MAX_TREASURY_BPS: u16 = 5_000;

/// Default distribution: no buyback, 70% stakers, 30% treasury.
pub const DEFAULT_SPLITS: DistributionSplits = DistributionSplits {
    buyback_bps: 0,
    staker_bps: 7_000,
    treasury_bps: 3_000,
};

/// The active distribution model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionModel {
    /// Route the entire amount to the reward pool.
    StakersOnly,
    /// Identical to [`StakersOnly`](DistributionModel::StakersOnly); kept as
    /// a distinct label for backward compatibility.
    Legacy,
    /// Split per the configured shares. The deprecated buyback share is
    /// folded into the staker amount, never executed as a real buyback.
    Hybrid,
}

/// Basis-point shares for the hybrid model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSplits {
    /// Deprecated buyback share; folded into the staker amount.
    pub buyback_bps: u16,
    /// Staking-reward pool share.
    pub staker_bps: u16,
    /// Treasury sink share.
    pub treasury_bps: u16,
}

impl DistributionSplits {
    /// Validate the shares.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::SplitsSumInvalid`] if the shares do not sum to 10000
    /// - [`LedgerError::TreasuryShareTooHigh`] if the treasury share exceeds
    ///   [`MAX_TREASURY_BPS`]
    pub fn validate(&self) -> Result<()> {
        let total = self.buyback_bps as u32 + self.staker_bps as u32 + self.treasury_bps as u32;
        if total != 10_000 {
            return Err(LedgerError::SplitsSumInvalid { total });
        }
        if self.treasury_bps > MAX_TREASURY_BPS {
            return Err(LedgerError::TreasuryShareTooHigh {
                bps: self.treasury_bps,
                max: MAX_TREASURY_BPS,
            });
        }
        Ok(())
    }
}

/// A pending splits change, executable once the timelock elapses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SplitsChangeProposal {
    /// The proposed new shares.
    pub new_splits: DistributionSplits,
    /// Unix timestamp when the proposal was made.
    pub proposed_at: u64,
    /// Unix timestamp when the proposal becomes executable.
    pub effective_at: u64,
}

/// The settlement-asset amounts one policy application disburses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitAmounts {
    /// Routed to the reward pool (includes the folded-in buyback share).
    pub staker: u64,
    /// Routed to the treasury sink.
    pub treasury: u64,
}

/// Split `amount` according to the active model.
///
/// Models A/B send everything to the reward pool. The hybrid model computes
/// the buyback and staker cuts by basis points, folds the buyback cut into
/// the staker amount, and routes the exact remainder to the treasury so the
/// parts always sum to `amount`.
pub fn compute_split_amounts(
    amount: u64,
    model: DistributionModel,
    splits: &DistributionSplits,
) -> SplitAmounts {
    match model {
        DistributionModel::StakersOnly | DistributionModel::Legacy => SplitAmounts {
            staker: amount,
            treasury: 0,
        },
        DistributionModel::Hybrid => {
            let buyback = bps_of(amount, splits.buyback_bps);
            let staker_base = bps_of(amount, splits.staker_bps);
            SplitAmounts {
                staker: buyback + staker_base,
                treasury: amount - buyback - staker_base,
            }
        }
    }
}
