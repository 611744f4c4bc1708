//! The epoch-based pro-rata reward engine.
//!
//! Stake changes take effect one epoch after they are made: `stake` and
//! `unstake` write their checkpoint for the *next* epoch, so mid-epoch
//! staking cannot earn that epoch's already-accruing rewards. Reward
//! deposits land in the *current* epoch's pool and accumulate across calls.

use std::collections::{BTreeMap, BTreeSet};

use silo_types::Address;

use crate::checkpoints::CheckpointSeries;
use crate::{Result, RewardError};

/// Epoch accounting, stake checkpoints, and pull-based claims.
#[derive(Debug)]
pub struct RewardEngine {
    /// The only address allowed to deposit rewards (the ledger).
    distributor: Address,
    epoch_secs: u64,
    current_epoch: u64,
    /// Wall-clock boundary at which the current epoch ends.
    epoch_ends_at: u64,
    stakes: BTreeMap<Address, u64>,
    account_history: BTreeMap<Address, CheckpointSeries>,
    total_stake: u64,
    global_history: CheckpointSeries,
    epoch_rewards: BTreeMap<u64, u64>,
    claimed: BTreeSet<(Address, u64)>,
}

impl RewardEngine {
    /// Create an engine starting at epoch 0.
    ///
    /// `genesis` is the wall-clock start of epoch 0; `epoch_secs` is the
    /// fixed epoch duration.
    pub fn new(distributor: Address, genesis: u64, epoch_secs: u64) -> Self {
        Self {
            distributor,
            epoch_secs: epoch_secs.max(1),
            current_epoch: 0,
            epoch_ends_at: genesis.saturating_add(epoch_secs.max(1)),
            stakes: BTreeMap::new(),
            account_history: BTreeMap::new(),
            total_stake: 0,
            global_history: CheckpointSeries::new(),
            epoch_rewards: BTreeMap::new(),
            claimed: BTreeSet::new(),
        }
    }

    /// The epoch the engine currently sits in (as of the last touch).
    pub fn current_epoch(&self) -> u64 {
        self.current_epoch
    }

    /// The caller's live stake balance.
    pub fn stake_of(&self, account: &Address) -> u64 {
        self.stakes.get(account).copied().unwrap_or(0)
    }

    /// The live global stake.
    pub fn total_stake(&self) -> u64 {
        self.total_stake
    }

    /// The caller's checkpointed stake as of `epoch`.
    pub fn stake_at(&self, account: &Address, epoch: u64) -> u64 {
        self.account_history
            .get(account)
            .map(|s| s.value_at(epoch))
            .unwrap_or(0)
    }

    /// The checkpointed global stake as of `epoch`.
    pub fn total_stake_at(&self, epoch: u64) -> u64 {
        self.global_history.value_at(epoch)
    }

    /// The reward pool accumulated for `epoch`.
    pub fn epoch_reward(&self, epoch: u64) -> u64 {
        self.epoch_rewards.get(&epoch).copied().unwrap_or(0)
    }

    /// Lazily advance the epoch counter past every elapsed boundary.
    ///
    /// An epoch may advance by more than one step if several durations have
    /// passed since the engine was last touched.
    fn advance_if_due(&mut self, now: u64) {
        if now < self.epoch_ends_at {
            return;
        }
        // Jump over all elapsed boundaries in one step; the boundary clock
        // saturates at the end of representable time.
        let steps = (now - self.epoch_ends_at) / self.epoch_secs + 1;
        self.current_epoch = self.current_epoch.saturating_add(steps);
        self.epoch_ends_at = self
            .epoch_ends_at
            .saturating_add(steps.saturating_mul(self.epoch_secs));
        tracing::info!(epoch = self.current_epoch, steps, "epoch advanced");
    }

    /// Add `amount` to the caller's stake.
    ///
    /// The change is checkpointed for the next epoch.
    ///
    /// # Errors
    ///
    /// - [`RewardError::ZeroAmount`] if `amount` is zero
    /// - [`RewardError::Overflow`] on balance overflow
    pub fn stake(&mut self, caller: Address, amount: u64, now: u64) -> Result<()> {
        self.advance_if_due(now);
        if amount == 0 {
            return Err(RewardError::ZeroAmount);
        }

        let balance = self.stakes.entry(caller).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(RewardError::Overflow)?;
        let new_balance = *balance;
        self.total_stake = self
            .total_stake
            .checked_add(amount)
            .ok_or(RewardError::Overflow)?;

        self.checkpoint(caller, new_balance)?;
        tracing::info!(amount, balance = new_balance, "stake added");
        Ok(())
    }

    /// Remove `amount` from the caller's stake.
    ///
    /// The change is checkpointed for the next epoch; the caller keeps its
    /// checkpointed exposure for the epoch in progress.
    ///
    /// # Errors
    ///
    /// - [`RewardError::ZeroAmount`] if `amount` is zero
    /// - [`RewardError::InsufficientStake`] if `amount` exceeds the balance
    pub fn unstake(&mut self, caller: Address, amount: u64, now: u64) -> Result<()> {
        self.advance_if_due(now);
        if amount == 0 {
            return Err(RewardError::ZeroAmount);
        }

        let available = self.stakes.get(&caller).copied().unwrap_or(0);
        if available < amount {
            return Err(RewardError::InsufficientStake {
                requested: amount,
                available,
            });
        }
        let new_balance = available - amount;
        self.stakes.insert(caller, new_balance);
        self.total_stake -= amount;

        self.checkpoint(caller, new_balance)?;
        tracing::info!(amount, balance = new_balance, "stake removed");
        Ok(())
    }

    /// Deposit `amount` into the current epoch's reward pool.
    ///
    /// Restricted to the configured distributor. Multiple deposits within
    /// the same epoch accumulate.
    ///
    /// # Errors
    ///
    /// - [`RewardError::UnauthorizedCaller`] if the caller is not the distributor
    /// - [`RewardError::ZeroAmount`] if `amount` is zero
    /// - [`RewardError::Overflow`] on pool overflow
    pub fn distribute_rewards(&mut self, caller: Address, amount: u64, now: u64) -> Result<()> {
        if caller != self.distributor {
            return Err(RewardError::UnauthorizedCaller);
        }
        self.advance_if_due(now);
        if amount == 0 {
            return Err(RewardError::ZeroAmount);
        }

        let pool = self.epoch_rewards.entry(self.current_epoch).or_insert(0);
        *pool = pool.checked_add(amount).ok_or(RewardError::Overflow)?;

        tracing::info!(
            epoch = self.current_epoch,
            amount,
            pool = *pool,
            "rewards deposited"
        );
        Ok(())
    }

    /// Claim the caller's pro-rata share of a fully elapsed epoch's pool.
    ///
    /// Returns the reward amount; physically moving settlement asset to the
    /// claimant is the embedding layer's job. Floor division; the integer
    /// remainder is an accepted, bounded rounding loss.
    ///
    /// # Errors
    ///
    /// - [`RewardError::EpochNotFinalized`] if `epoch >= current_epoch`
    /// - [`RewardError::AlreadyClaimed`] on a second claim for the epoch
    /// - [`RewardError::NoStake`] if the caller's checkpointed stake is zero
    pub fn claim_rewards(&mut self, caller: Address, epoch: u64, now: u64) -> Result<u64> {
        self.advance_if_due(now);
        if epoch >= self.current_epoch {
            return Err(RewardError::EpochNotFinalized {
                epoch,
                current: self.current_epoch,
            });
        }
        if self.claimed.contains(&(caller, epoch)) {
            return Err(RewardError::AlreadyClaimed { epoch });
        }

        let stake = self.stake_at(&caller, epoch);
        if stake == 0 {
            return Err(RewardError::NoStake);
        }
        let total = self.total_stake_at(epoch);
        let pool = self.epoch_reward(epoch);

        // stake <= total, so the quotient fits in u64.
        let reward = (pool as u128 * stake as u128 / total as u128) as u64;

        self.claimed.insert((caller, epoch));
        tracing::info!(epoch, stake, total, reward, "rewards claimed");
        Ok(reward)
    }

    /// Write the one-epoch-lagged checkpoints for an account mutation.
    fn checkpoint(&mut self, account: Address, balance: u64) -> Result<()> {
        let effective = self.current_epoch + 1;
        self.account_history
            .entry(account)
            .or_default()
            .record(effective, balance)?;
        self.global_history.record(effective, self.total_stake)
    }
}
