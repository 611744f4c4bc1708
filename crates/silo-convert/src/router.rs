//! The converter: normalizes accepted assets into the settlement asset.
//!
//! Restricted to a single authorized caller (the ledger). Conversion runs
//! checks-first: the route allow-list, the slippage bound, and the quote are
//! all resolved before the external swap executes, and the converter
//! re-checks its own settlement-asset balance afterwards so a compromised
//! executor cannot silently under-deliver.

use std::collections::BTreeMap;

use silo_types::{Address, AssetId, BPS_DENOMINATOR, MAX_BPS};

use crate::custody::AssetCustody;
use crate::quote::PriceQuoter;
use crate::swap::{SwapExecutor, SwapRequest};
use crate::{ConvertError, Result};

/// Freshness bound handed to the swap executor, in seconds.
pub const SWAP_DEADLINE_SECS: u64 = 300;

/// The outcome of one conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    /// Always the settlement asset.
    pub asset_out: AssetId,
    /// Realized settlement-asset output.
    pub amount_out: u64,
}

/// Normalizes accepted assets into the settlement asset at bounded slippage.
#[derive(Debug)]
pub struct Converter<Q: PriceQuoter, X: SwapExecutor> {
    settlement_asset: AssetId,
    /// Custody account the converter trades from.
    holder: Address,
    /// The only address allowed to call [`convert`](Converter::convert).
    authorized_caller: Address,
    admin: Address,
    /// Allow-listed (asset -> settlement) routes, keyed by input asset,
    /// valued by fee tier.
    routes: BTreeMap<AssetId, u32>,
    quoter: Q,
    executor: X,
}

impl<Q: PriceQuoter, X: SwapExecutor> Converter<Q, X> {
    /// Create a converter bound to one settlement asset and one caller.
    pub fn new(
        settlement_asset: AssetId,
        holder: Address,
        authorized_caller: Address,
        admin: Address,
        quoter: Q,
        executor: X,
    ) -> Self {
        Self {
            settlement_asset,
            holder,
            authorized_caller,
            admin,
            routes: BTreeMap::new(),
            quoter,
            executor,
        }
    }

    /// The settlement asset every conversion lands in.
    pub fn settlement_asset(&self) -> AssetId {
        self.settlement_asset
    }

    /// The custody account the converter trades from.
    pub fn holder(&self) -> Address {
        self.holder
    }

    /// Allow-list a (asset -> settlement) route. Privileged.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::UnauthorizedCaller`] if the caller is not the admin
    pub fn whitelist_route(&mut self, caller: Address, asset: AssetId, fee_tier: u32) -> Result<()> {
        if caller != self.admin {
            return Err(ConvertError::UnauthorizedCaller);
        }
        self.routes.insert(asset, fee_tier);
        tracing::info!(fee_tier, "conversion route whitelisted");
        Ok(())
    }

    /// Remove a route from the allow-list. Privileged.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::UnauthorizedCaller`] if the caller is not the admin
    pub fn remove_route(&mut self, caller: Address, asset: AssetId) -> Result<()> {
        if caller != self.admin {
            return Err(ConvertError::UnauthorizedCaller);
        }
        self.routes.remove(&asset);
        Ok(())
    }

    /// Convert `amount` of `asset` into the settlement asset.
    ///
    /// If `asset` already is the settlement asset this is a no-op returning
    /// the input unchanged; it is the only path that bypasses the slippage
    /// machinery. Otherwise the route must be allow-listed, a quote is
    /// obtained, the floor `quoted * (10000 - max_slippage_bps) / 10000` is
    /// handed to the executor, and the delivered balance delta is verified
    /// against the reported output.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::UnauthorizedCaller`] if the caller is not the ledger
    /// - [`ConvertError::InvalidSlippage`] if the bound exceeds 100%
    /// - [`ConvertError::RouteNotWhitelisted`] if the pair is not allow-listed
    /// - [`ConvertError::QuoteUnavailable`] if no quote can be obtained
    /// - [`ConvertError::ZeroOutput`] if the quote or the swap yields zero
    /// - [`ConvertError::SwapFailed`] if execution fails or times out
    /// - [`ConvertError::SlippageExceeded`] if the output is below the floor
    /// - [`ConvertError::OutputMismatch`] if the balance delta is short
    pub fn convert(
        &mut self,
        caller: Address,
        custody: &mut dyn AssetCustody,
        asset: AssetId,
        amount: u64,
        max_slippage_bps: u16,
        now: u64,
    ) -> Result<Conversion> {
        if caller != self.authorized_caller {
            return Err(ConvertError::UnauthorizedCaller);
        }
        if asset == self.settlement_asset {
            return Ok(Conversion {
                asset_out: asset,
                amount_out: amount,
            });
        }
        // Re-validated here: the converter does not trust its caller's input.
        if max_slippage_bps > MAX_BPS {
            return Err(ConvertError::InvalidSlippage {
                bps: max_slippage_bps,
            });
        }

        let fee_tier = *self
            .routes
            .get(&asset)
            .ok_or(ConvertError::RouteNotWhitelisted)?;

        let quoted = self
            .quoter
            .quote(asset, self.settlement_asset, fee_tier, amount)
            .map_err(|e| ConvertError::QuoteUnavailable(e.to_string()))?;
        if quoted == 0 {
            return Err(ConvertError::ZeroOutput);
        }

        let min_amount_out = (quoted as u128 * (BPS_DENOMINATOR - max_slippage_bps as u64) as u128
            / BPS_DENOMINATOR as u128) as u64;

        let balance_before = custody.balance_of(self.settlement_asset, self.holder);

        let request = SwapRequest {
            asset_in: asset,
            asset_out: self.settlement_asset,
            fee_tier,
            amount_in: amount,
            min_amount_out,
            recipient: self.holder,
            deadline: now.saturating_add(SWAP_DEADLINE_SECS),
        };
        let amount_out = self
            .executor
            .swap(custody, &request)
            .map_err(|e| ConvertError::SwapFailed(e.to_string()))?;

        if amount_out == 0 {
            return Err(ConvertError::ZeroOutput);
        }
        if amount_out < min_amount_out {
            return Err(ConvertError::SlippageExceeded {
                minimum: min_amount_out,
                actual: amount_out,
            });
        }

        // Belt-and-suspenders: the settlement balance must have grown by at
        // least the reported output.
        let balance_after = custody.balance_of(self.settlement_asset, self.holder);
        let delivered = balance_after.saturating_sub(balance_before);
        if delivered < amount_out {
            return Err(ConvertError::OutputMismatch {
                reported: amount_out,
                delivered,
            });
        }

        tracing::info!(amount_in = amount, amount_out, quoted, "asset converted");
        Ok(Conversion {
            asset_out: self.settlement_asset,
            amount_out,
        })
    }
}
