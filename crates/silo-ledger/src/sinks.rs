//! Reward-sink collaborator.
//!
//! The ledger pushes staker-bound settlement funds to a reward pool account
//! and notifies the sink of the deposited amount. [`EngineSink`] adapts the
//! in-workspace [`RewardEngine`] to this interface; a deployment could just
//! as well wire in a remote pool.

use silo_convert::custody::CollabResult;
use silo_rewards::engine::RewardEngine;
use silo_types::Address;

/// Receiver for staker-bound distribution amounts.
pub trait RewardSink {
    /// The custody account staker funds are pushed to.
    fn pool_account(&self) -> Address;

    /// Record `amount` of settlement asset as distributed rewards.
    fn distribute_rewards(&mut self, amount: u64, now: u64) -> CollabResult<()>;
}

/// Adapts a [`RewardEngine`] to the [`RewardSink`] interface.
pub struct EngineSink<'a> {
    engine: &'a mut RewardEngine,
    /// The ledger's address; the engine only accepts deposits from it.
    ledger: Address,
    pool_account: Address,
}

impl<'a> EngineSink<'a> {
    /// Wrap an engine for one policy application.
    pub fn new(engine: &'a mut RewardEngine, ledger: Address, pool_account: Address) -> Self {
        Self {
            engine,
            ledger,
            pool_account,
        }
    }
}

impl RewardSink for EngineSink<'_> {
    fn pool_account(&self) -> Address {
        self.pool_account
    }

    fn distribute_rewards(&mut self, amount: u64, now: u64) -> CollabResult<()> {
        self.engine.distribute_rewards(self.ledger, amount, now)?;
        Ok(())
    }
}
