//! The yield-routing ledger state machine.
//!
//! Every submission ends in exactly one of three states: *rejected* (no
//! state change), *quarantined* (asset held, no conversion), or *settled*
//! (converted and counted). All entry points run checks first, then local
//! effects, then external collaborator calls, and hold an exclusive busy
//! flag for their duration so a re-entered call fails instead of observing
//! partial state. `apply_policy` zeroes the pending balance before any
//! disbursement so a failing transfer cannot be replayed against the same
//! funds.

use std::collections::BTreeMap;

use silo_convert::custody::AssetCustody;
use silo_convert::quote::PriceQuoter;
use silo_convert::router::Converter;
use silo_convert::swap::SwapExecutor;
use silo_registry::plugins::TierRegistry;
use silo_types::events::AuditEvent;
use silo_types::{bps_of, Address, AssetId, SourceId, MAX_DEV_SHARE_BPS, ZERO_ADDRESS, ZERO_ASSET};

use crate::sinks::RewardSink;
use crate::splits::{
    compute_split_amounts, DistributionModel, DistributionSplits, SplitAmounts,
    SplitsChangeProposal, DEFAULT_SPLITS, SPLITS_TIMELOCK_SECS,
};
use crate::{LedgerError, Result};

/// A source-nominated cut of incoming yield, paid in the deposited asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DevShare {
    pub recipient: Address,
    pub share_bps: u16,
}

/// Terminal state of one yield submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YieldOutcome {
    /// Converted and counted into settled totals.
    Settled {
        /// Settlement-asset amount added to the totals.
        amount: u64,
    },
    /// Held in custody in the deposited asset, excluded from settled totals.
    Quarantined {
        /// Deposited-asset amount quarantined.
        amount: u64,
    },
}

/// Central accounting state. Mutated exclusively through `receive_yield`,
/// `apply_policy`, and the quarantine release/sweep entry points.
#[derive(Debug)]
pub struct YieldLedger {
    governance: Address,
    /// The ledger's own identity and custody account.
    address: Address,
    settlement_asset: AssetId,
    treasury: Address,
    /// Per-source cumulative settled yield, in settlement-asset units.
    per_source: BTreeMap<SourceId, u64>,
    /// Global cumulative settled yield. Always the sum of `per_source`.
    global_total: u64,
    /// Undistributed accumulated yield. Always <= `global_total`.
    pending: u64,
    /// Quarantined balances, held in the asset they were received in.
    quarantined: BTreeMap<(SourceId, AssetId), u64>,
    /// Cumulative dev payouts per (recipient, asset).
    dev_payouts: BTreeMap<(Address, AssetId), u64>,
    model: DistributionModel,
    splits: DistributionSplits,
    pending_splits_change: Option<SplitsChangeProposal>,
    /// Exclusive operation flag; a re-entered entry point fails fast.
    busy: bool,
    events: Vec<AuditEvent>,
}

impl YieldLedger {
    /// Create a ledger with the default splits and the legacy single-sink
    /// distribution model.
    pub fn new(
        governance: Address,
        address: Address,
        settlement_asset: AssetId,
        treasury: Address,
    ) -> Self {
        Self {
            governance,
            address,
            settlement_asset,
            treasury,
            per_source: BTreeMap::new(),
            global_total: 0,
            pending: 0,
            quarantined: BTreeMap::new(),
            dev_payouts: BTreeMap::new(),
            model: DistributionModel::StakersOnly,
            splits: DEFAULT_SPLITS,
            pending_splits_change: None,
            busy: false,
            events: Vec::new(),
        }
    }

    /// The ledger's identity / custody account.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Cumulative settled yield for one source.
    pub fn source_total(&self, source: &SourceId) -> u64 {
        self.per_source.get(source).copied().unwrap_or(0)
    }

    /// Global cumulative settled yield.
    pub fn global_total(&self) -> u64 {
        self.global_total
    }

    /// Pending (undistributed) accumulated yield.
    pub fn pending_accumulated(&self) -> u64 {
        self.pending
    }

    /// Quarantined balance for a (source, asset) pair, in that asset's units.
    pub fn quarantined_balance(&self, source: &SourceId, asset: &AssetId) -> u64 {
        self.quarantined.get(&(*source, *asset)).copied().unwrap_or(0)
    }

    /// Cumulative dev payout for (recipient, asset).
    pub fn dev_payout(&self, recipient: &Address, asset: &AssetId) -> u64 {
        self.dev_payouts
            .get(&(*recipient, *asset))
            .copied()
            .unwrap_or(0)
    }

    /// The active distribution splits.
    pub fn splits(&self) -> &DistributionSplits {
        &self.splits
    }

    /// The active distribution model.
    pub fn model(&self) -> DistributionModel {
        self.model
    }

    /// Drain the pending audit events.
    pub fn drain_events(&mut self) -> Vec<AuditEvent> {
        std::mem::take(&mut self.events)
    }

    /// Accept yield from a registered source.
    ///
    /// Runs the full pipeline: validation, custody pull, dev-share cut,
    /// tier-based quarantine or conversion, and accounting. The operation is
    /// all-or-nothing: a failed conversion returns the pulled funds to the
    /// source before the error propagates.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ZeroAsset`] / [`LedgerError::ZeroAmount`] on degenerate input
    /// - [`LedgerError::UnknownSource`] / [`LedgerError::SourceInactive`] /
    ///   [`LedgerError::UnauthorizedCaller`] on identity failures
    /// - [`LedgerError::InvalidAssetForSource`] if the asset is undeclared
    /// - [`LedgerError::DevShareExceedsMax`] above the 20% ceiling
    /// - [`LedgerError::ConversionCapExceeded`] above the effective cap
    /// - [`LedgerError::ConversionFailed`] if the converter rejects or fails
    #[allow(clippy::too_many_arguments)]
    pub fn receive_yield<Q: PriceQuoter, X: SwapExecutor>(
        &mut self,
        caller: Address,
        registry: &TierRegistry,
        converter: &mut Converter<Q, X>,
        custody: &mut dyn AssetCustody,
        now: u64,
        source_id: SourceId,
        asset: AssetId,
        amount: u64,
        dev: Option<DevShare>,
    ) -> Result<YieldOutcome> {
        if self.busy {
            return Err(LedgerError::ReentrantCall);
        }
        self.busy = true;
        let result = self.receive_yield_inner(
            caller, registry, converter, custody, now, source_id, asset, amount, dev,
        );
        self.busy = false;
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn receive_yield_inner<Q: PriceQuoter, X: SwapExecutor>(
        &mut self,
        caller: Address,
        registry: &TierRegistry,
        converter: &mut Converter<Q, X>,
        custody: &mut dyn AssetCustody,
        now: u64,
        source_id: SourceId,
        asset: AssetId,
        amount: u64,
        dev: Option<DevShare>,
    ) -> Result<YieldOutcome> {
        // Checks. Nothing moves until all of these pass.
        if asset == ZERO_ASSET {
            return Err(LedgerError::ZeroAsset);
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let record = registry.plugin(&source_id).ok_or(LedgerError::UnknownSource)?;
        if !record.active {
            return Err(LedgerError::SourceInactive);
        }
        if caller != record.address {
            return Err(LedgerError::UnauthorizedCaller);
        }
        if !record.declared_assets.contains(&asset) {
            return Err(LedgerError::InvalidAssetForSource);
        }

        let dev = dev.filter(|d| d.share_bps > 0 && d.recipient != ZERO_ADDRESS);
        if let Some(d) = &dev {
            if d.share_bps > MAX_DEV_SHARE_BPS {
                return Err(LedgerError::DevShareExceedsMax {
                    bps: d.share_bps,
                    max: MAX_DEV_SHARE_BPS,
                });
            }
        }
        let dev_cut = dev.map(|d| bps_of(amount, d.share_bps)).unwrap_or(0);
        let dao_cut = amount - dev_cut;

        let limits = registry.effective_limits(&source_id)?;
        let quarantine_path = limits.quarantine || !limits.auto_convert;
        let needs_convert = asset != self.settlement_asset;
        if !quarantine_path && needs_convert && dao_cut > limits.max_conversion_amount {
            return Err(LedgerError::ConversionCapExceeded {
                amount: dao_cut,
                cap: limits.max_conversion_amount,
            });
        }

        // Effects and interactions. Pull the full amount into custody.
        custody
            .transfer(asset, record.address, self.address, amount)
            .map_err(|e| LedgerError::Custody(e.to_string()))?;

        // Unconditional, so observers have a complete inflow trail.
        self.events.push(AuditEvent::YieldReceived {
            source: source_id,
            asset,
            amount,
        });

        if quarantine_path {
            self.pay_dev_cut(custody, source_id, record.address, asset, dev, dev_cut)?;

            let held = self.quarantined.entry((source_id, asset)).or_insert(0);
            *held = held.checked_add(dao_cut).ok_or(LedgerError::Overflow)?;
            self.events.push(AuditEvent::YieldQuarantined {
                source: source_id,
                asset,
                amount: dao_cut,
            });
            tracing::warn!(amount = dao_cut, tier_quarantine = limits.quarantine, "yield quarantined");
            return Ok(YieldOutcome::Quarantined { amount: dao_cut });
        }

        let settled = if needs_convert {
            let out = self.convert_held(
                converter,
                custody,
                asset,
                dao_cut,
                limits.max_slippage_bps,
                now,
            );
            match out {
                Ok(settled) => {
                    self.events.push(AuditEvent::YieldConverted {
                        source: source_id,
                        asset,
                        amount_in: dao_cut,
                        amount_out: settled,
                    });
                    settled
                }
                Err(e) => {
                    // Roll the pull back so the whole operation is a no-op.
                    custody
                        .transfer(asset, self.address, record.address, amount)
                        .map_err(|e| LedgerError::Custody(e.to_string()))?;
                    self.events.pop();
                    return Err(e);
                }
            }
        } else {
            dao_cut
        };

        self.pay_dev_cut(custody, source_id, record.address, asset, dev, dev_cut)?;

        // Accounting: compute all three counters before writing any.
        let source_total = self.source_total(&source_id);
        let new_source = source_total.checked_add(settled).ok_or(LedgerError::Overflow)?;
        let new_global = self.global_total.checked_add(settled).ok_or(LedgerError::Overflow)?;
        let new_pending = self.pending.checked_add(settled).ok_or(LedgerError::Overflow)?;
        self.per_source.insert(source_id, new_source);
        self.global_total = new_global;
        self.pending = new_pending;

        tracing::info!(amount, settled, "yield settled");
        Ok(YieldOutcome::Settled { amount: settled })
    }

    /// Move `dao_cut` through the converter: hand it to the converter's
    /// custody account, convert, and pull the settlement output back.
    fn convert_held<Q: PriceQuoter, X: SwapExecutor>(
        &mut self,
        converter: &mut Converter<Q, X>,
        custody: &mut dyn AssetCustody,
        asset: AssetId,
        dao_cut: u64,
        max_slippage_bps: u16,
        now: u64,
    ) -> Result<u64> {
        custody
            .transfer(asset, self.address, converter.holder(), dao_cut)
            .map_err(|e| LedgerError::Custody(e.to_string()))?;

        let conversion =
            match converter.convert(self.address, custody, asset, dao_cut, max_slippage_bps, now) {
                Ok(c) if c.asset_out == self.settlement_asset => c,
                Ok(c) => {
                    custody
                        .transfer(asset, converter.holder(), self.address, dao_cut)
                        .map_err(|e| LedgerError::Custody(e.to_string()))?;
                    return Err(LedgerError::ConversionFailed(format!(
                        "converter returned unexpected asset {:02x?}",
                        &c.asset_out[..4]
                    )));
                }
                Err(e) => {
                    // The converter rolled its swap back; reclaim the input.
                    custody
                        .transfer(asset, converter.holder(), self.address, dao_cut)
                        .map_err(|e| LedgerError::Custody(e.to_string()))?;
                    return Err(LedgerError::ConversionFailed(e.to_string()));
                }
            };

        custody
            .transfer(
                self.settlement_asset,
                converter.holder(),
                self.address,
                conversion.amount_out,
            )
            .map_err(|e| LedgerError::Custody(e.to_string()))?;
        Ok(conversion.amount_out)
    }

    /// Pay the dev cut in the originally-deposited asset and record it.
    ///
    /// A refused payout does not abort the submission: by the time this runs
    /// the conversion cannot be unwound, so the cut is returned to the source
    /// instead and nothing is recorded.
    fn pay_dev_cut(
        &mut self,
        custody: &mut dyn AssetCustody,
        source_id: SourceId,
        source_addr: Address,
        asset: AssetId,
        dev: Option<DevShare>,
        dev_cut: u64,
    ) -> Result<()> {
        let Some(d) = dev else { return Ok(()) };
        if dev_cut == 0 {
            return Ok(());
        }
        if let Err(e) = custody.transfer(asset, self.address, d.recipient, dev_cut) {
            tracing::warn!(amount = dev_cut, error = %e, "dev payout refused; cut returned to source");
            custody
                .transfer(asset, self.address, source_addr, dev_cut)
                .map_err(|e| LedgerError::Custody(e.to_string()))?;
            return Ok(());
        }
        let paid = self.dev_payouts.entry((d.recipient, asset)).or_insert(0);
        *paid = paid.checked_add(dev_cut).ok_or(LedgerError::Overflow)?;
        self.events.push(AuditEvent::DevSharePaid {
            source: source_id,
            recipient: d.recipient,
            asset,
            amount: dev_cut,
        });
        Ok(())
    }

    /// Apply the distribution policy to the pending accumulated yield.
    ///
    /// Drains the pending counter first, then disburses leg by leg. The sink
    /// is notified only after every custody movement has landed; on a failed
    /// leg, funds the sink has not yet recorded are reclaimed and only the
    /// undelivered remainder returns to the pending counter, so delivered
    /// amounts are never counted twice.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NothingToDistribute`] if nothing is pending
    /// - [`LedgerError::DistributorNotConfigured`] if a staker amount is due
    ///   and no reward sink is wired in
    pub fn apply_policy(
        &mut self,
        custody: &mut dyn AssetCustody,
        reward_sink: Option<&mut dyn RewardSink>,
        now: u64,
    ) -> Result<SplitAmounts> {
        if self.busy {
            return Err(LedgerError::ReentrantCall);
        }
        self.busy = true;
        let result = self.apply_policy_inner(custody, reward_sink, now);
        self.busy = false;
        result
    }

    fn apply_policy_inner(
        &mut self,
        custody: &mut dyn AssetCustody,
        reward_sink: Option<&mut dyn RewardSink>,
        now: u64,
    ) -> Result<SplitAmounts> {
        if self.pending == 0 {
            return Err(LedgerError::NothingToDistribute);
        }
        let amounts = compute_split_amounts(self.pending, self.model, &self.splits);
        let mut sink = reward_sink;
        if amounts.staker > 0 && sink.is_none() {
            return Err(LedgerError::DistributorNotConfigured);
        }

        // Drain before spending so a failed disbursement cannot be replayed
        // against the same funds.
        let total = self.pending;
        self.pending = 0;

        // Custody legs first; the sink is notified last, so until then every
        // moved amount is still reclaimable.
        if amounts.staker > 0 {
            if let Some(sink) = sink.as_mut() {
                if let Err(e) =
                    custody.transfer(self.settlement_asset, self.address, sink.pool_account(), amounts.staker)
                {
                    self.pending = total;
                    return Err(LedgerError::Custody(e.to_string()));
                }
            }
        }
        if amounts.treasury > 0 {
            if let Err(e) =
                custody.transfer(self.settlement_asset, self.address, self.treasury, amounts.treasury)
            {
                self.pending = total;
                if amounts.staker > 0 {
                    if let Some(sink) = sink.as_ref() {
                        // The sink has not recorded the pool funds; pull them
                        // back so custody matches the restored counter.
                        custody
                            .transfer(self.settlement_asset, sink.pool_account(), self.address, amounts.staker)
                            .map_err(|e| LedgerError::Custody(e.to_string()))?;
                    }
                }
                return Err(LedgerError::Custody(e.to_string()));
            }
        }
        if amounts.staker > 0 {
            if let Some(sink) = sink.as_mut() {
                if let Err(e) = sink.distribute_rewards(amounts.staker, now) {
                    // The treasury leg is delivered and stays delivered; only
                    // the unrecorded staker share returns to pending.
                    self.pending = total - amounts.treasury;
                    custody
                        .transfer(self.settlement_asset, sink.pool_account(), self.address, amounts.staker)
                        .map_err(|e| LedgerError::Custody(e.to_string()))?;
                    return Err(LedgerError::RewardSinkFailed(e.to_string()));
                }
            }
        }

        self.events.push(AuditEvent::PolicyApplied {
            total,
            staker_amount: amounts.staker,
            treasury_amount: amounts.treasury,
        });
        tracing::info!(
            total,
            staker = amounts.staker,
            treasury = amounts.treasury,
            "distribution policy applied"
        );
        Ok(amounts)
    }

    /// Release part of a quarantined balance back into the conversion
    /// pipeline. Privileged.
    ///
    /// Conversion follows the same rules as settled receipt, evaluated
    /// against the source's *current* effective limits.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnauthorizedCaller`] if the caller is not governance
    /// - [`LedgerError::NoQuarantinedYield`] / [`LedgerError::InsufficientQuarantinedYield`]
    ///   on bad amounts
    /// - [`LedgerError::ConversionCapExceeded`] / [`LedgerError::ConversionFailed`]
    ///   per the conversion rules
    #[allow(clippy::too_many_arguments)]
    pub fn release_quarantined_yield<Q: PriceQuoter, X: SwapExecutor>(
        &mut self,
        caller: Address,
        registry: &TierRegistry,
        converter: &mut Converter<Q, X>,
        custody: &mut dyn AssetCustody,
        now: u64,
        source_id: SourceId,
        asset: AssetId,
        amount: u64,
    ) -> Result<u64> {
        if self.busy {
            return Err(LedgerError::ReentrantCall);
        }
        self.busy = true;
        let result = self.release_quarantined_inner(
            caller, registry, converter, custody, now, source_id, asset, amount,
        );
        self.busy = false;
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn release_quarantined_inner<Q: PriceQuoter, X: SwapExecutor>(
        &mut self,
        caller: Address,
        registry: &TierRegistry,
        converter: &mut Converter<Q, X>,
        custody: &mut dyn AssetCustody,
        now: u64,
        source_id: SourceId,
        asset: AssetId,
        amount: u64,
    ) -> Result<u64> {
        if caller != self.governance {
            return Err(LedgerError::UnauthorizedCaller);
        }
        let available = self.take_quarantined_checked(source_id, asset, amount)?;

        let limits = registry.effective_limits(&source_id)?;
        let needs_convert = asset != self.settlement_asset;
        if needs_convert && amount > limits.max_conversion_amount {
            return Err(LedgerError::ConversionCapExceeded {
                amount,
                cap: limits.max_conversion_amount,
            });
        }

        let settled = if needs_convert {
            self.convert_held(converter, custody, asset, amount, limits.max_slippage_bps, now)?
        } else {
            amount
        };

        self.quarantined.insert((source_id, asset), available - amount);
        let source_total = self.source_total(&source_id);
        let new_source = source_total.checked_add(settled).ok_or(LedgerError::Overflow)?;
        let new_global = self.global_total.checked_add(settled).ok_or(LedgerError::Overflow)?;
        let new_pending = self.pending.checked_add(settled).ok_or(LedgerError::Overflow)?;
        self.per_source.insert(source_id, new_source);
        self.global_total = new_global;
        self.pending = new_pending;

        self.events.push(AuditEvent::QuarantineReleased {
            source: source_id,
            asset,
            amount,
            settled,
        });
        tracing::info!(amount, settled, "quarantined yield released");
        Ok(settled)
    }

    /// Move part of a quarantined balance, unconverted, to the treasury
    /// sink. Privileged.
    ///
    /// Settled totals are untouched: swept yield is never counted.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnauthorizedCaller`] if the caller is not governance
    /// - [`LedgerError::NoQuarantinedYield`] / [`LedgerError::InsufficientQuarantinedYield`]
    ///   on bad amounts
    pub fn sweep_quarantined_yield_to_treasury(
        &mut self,
        caller: Address,
        custody: &mut dyn AssetCustody,
        source_id: SourceId,
        asset: AssetId,
        amount: u64,
    ) -> Result<()> {
        if self.busy {
            return Err(LedgerError::ReentrantCall);
        }
        self.busy = true;
        let result = self.sweep_quarantined_inner(caller, custody, source_id, asset, amount);
        self.busy = false;
        result
    }

    fn sweep_quarantined_inner(
        &mut self,
        caller: Address,
        custody: &mut dyn AssetCustody,
        source_id: SourceId,
        asset: AssetId,
        amount: u64,
    ) -> Result<()> {
        if caller != self.governance {
            return Err(LedgerError::UnauthorizedCaller);
        }
        let available = self.take_quarantined_checked(source_id, asset, amount)?;

        custody
            .transfer(asset, self.address, self.treasury, amount)
            .map_err(|e| LedgerError::Custody(e.to_string()))?;
        self.quarantined.insert((source_id, asset), available - amount);

        self.events.push(AuditEvent::QuarantineSwept {
            source: source_id,
            asset,
            amount,
        });
        tracing::info!(amount, "quarantined yield swept to treasury");
        Ok(())
    }

    /// Validate a quarantine withdrawal and return the current balance.
    fn take_quarantined_checked(
        &self,
        source_id: SourceId,
        asset: AssetId,
        amount: u64,
    ) -> Result<u64> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let available = self
            .quarantined
            .get(&(source_id, asset))
            .copied()
            .filter(|held| *held > 0)
            .ok_or(LedgerError::NoQuarantinedYield)?;
        if amount > available {
            return Err(LedgerError::InsufficientQuarantinedYield {
                requested: amount,
                available,
            });
        }
        Ok(available)
    }

    /// Switch the distribution model. Privileged.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnauthorizedCaller`] if the caller is not governance
    pub fn set_distribution_model(
        &mut self,
        caller: Address,
        model: DistributionModel,
    ) -> Result<()> {
        if caller != self.governance {
            return Err(LedgerError::UnauthorizedCaller);
        }
        self.model = model;
        tracing::info!(?model, "distribution model updated");
        Ok(())
    }

    /// Replace the distribution splits through the standard privileged path.
    ///
    /// The staker share is floor-protected here: reducing it from non-zero
    /// to zero requires the timelocked path.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnauthorizedCaller`] if the caller is not governance
    /// - [`LedgerError::SplitsSumInvalid`] / [`LedgerError::TreasuryShareTooHigh`]
    ///   on invalid shares
    /// - [`LedgerError::StakerFloorProtected`] if the staker share would drop
    ///   from non-zero to zero
    pub fn set_distribution_splits(
        &mut self,
        caller: Address,
        new: DistributionSplits,
    ) -> Result<()> {
        if caller != self.governance {
            return Err(LedgerError::UnauthorizedCaller);
        }
        new.validate()?;
        if self.splits.staker_bps > 0 && new.staker_bps == 0 {
            return Err(LedgerError::StakerFloorProtected);
        }
        self.apply_splits(new);
        Ok(())
    }

    /// Propose a splits change through the slow, timelocked path.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnauthorizedCaller`] if the caller is not governance
    /// - [`LedgerError::SplitsSumInvalid`] / [`LedgerError::TreasuryShareTooHigh`]
    ///   on invalid shares
    pub fn propose_splits_change(
        &mut self,
        caller: Address,
        new: DistributionSplits,
        now: u64,
    ) -> Result<()> {
        if caller != self.governance {
            return Err(LedgerError::UnauthorizedCaller);
        }
        new.validate()?;
        let effective_at = now.saturating_add(SPLITS_TIMELOCK_SECS);
        self.pending_splits_change = Some(SplitsChangeProposal {
            new_splits: new,
            proposed_at: now,
            effective_at,
        });
        tracing::info!(effective_at, "splits change proposed");
        Ok(())
    }

    /// Execute the pending splits change once its timelock has elapsed.
    ///
    /// This path bypasses the staker floor; the timelock is the protection.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnauthorizedCaller`] if the caller is not governance
    /// - [`LedgerError::NoPendingSplitsChange`] if nothing is pending
    /// - [`LedgerError::TimelockNotExpired`] before the effective time
    pub fn execute_splits_change(&mut self, caller: Address, now: u64) -> Result<()> {
        if caller != self.governance {
            return Err(LedgerError::UnauthorizedCaller);
        }
        let proposal = self
            .pending_splits_change
            .as_ref()
            .ok_or(LedgerError::NoPendingSplitsChange)?;
        if now < proposal.effective_at {
            return Err(LedgerError::TimelockNotExpired {
                effective_at: proposal.effective_at,
                now,
            });
        }
        let new = proposal.new_splits;
        self.pending_splits_change = None;
        self.apply_splits(new);
        Ok(())
    }

    fn apply_splits(&mut self, new: DistributionSplits) {
        self.splits = new;
        self.events.push(AuditEvent::DistributionSplitsUpdated {
            buyback_bps: new.buyback_bps,
            staker_bps: new.staker_bps,
            treasury_bps: new.treasury_bps,
        });
        tracing::info!(
            buyback = new.buyback_bps,
            staker = new.staker_bps,
            treasury = new.treasury_bps,
            "distribution splits updated"
        );
    }
}
