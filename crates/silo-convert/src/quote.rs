//! Price-quote collaborator.
//!
//! Quotes are untrusted and advisory: the converter uses them only to derive
//! a slippage floor, never to set accounting directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use silo_types::AssetId;

use crate::custody::CollabResult;

/// A rational exchange rate: `amount_out = amount_in * num / den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub num: u64,
    pub den: u64,
}

impl Rate {
    /// Apply the rate to an input amount with floor division, widened
    /// through `u128`. A zero denominator yields zero.
    pub fn apply(&self, amount_in: u64) -> u64 {
        if self.den == 0 {
            return 0;
        }
        let wide = amount_in as u128 * self.num as u128 / self.den as u128;
        u64::try_from(wide).unwrap_or(u64::MAX)
    }
}

/// Price-quote interface: expected output for a given input.
pub trait PriceQuoter {
    /// Expected `amount_out` for swapping `amount_in` of `asset_in` into
    /// `asset_out` on the given fee tier.
    fn quote(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        fee_tier: u32,
        amount_in: u64,
    ) -> CollabResult<u64>;
}

/// Fixed-rate quoter for v1 and testing.
///
/// A stand-in for real oracle infrastructure: rates are configured per
/// (asset_in, asset_out) pair and applied with integer math.
#[derive(Debug, Default)]
pub struct FixedRateQuoter {
    rates: BTreeMap<(AssetId, AssetId), Rate>,
}

impl FixedRateQuoter {
    /// Create an empty quoter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rate for a pair.
    pub fn set_rate(&mut self, asset_in: AssetId, asset_out: AssetId, rate: Rate) {
        self.rates.insert((asset_in, asset_out), rate);
    }
}

impl PriceQuoter for FixedRateQuoter {
    fn quote(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        _fee_tier: u32,
        amount_in: u64,
    ) -> CollabResult<u64> {
        let rate = self
            .rates
            .get(&(asset_in, asset_out))
            .ok_or("no quote available for route")?;
        Ok(rate.apply(amount_in))
    }
}
