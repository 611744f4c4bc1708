//! Swap-execution collaborator.
//!
//! The executor is handed an explicit minimum output and a freshness
//! deadline; it must fail rather than deliver below the floor or after the
//! deadline. The converter still re-checks everything it can observe.

use silo_types::{Address, AssetId};

use std::collections::BTreeMap;

use crate::custody::{AssetCustody, CollabResult};
use crate::quote::Rate;

/// Parameters for one swap execution.
#[derive(Clone, Debug)]
pub struct SwapRequest {
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub fee_tier: u32,
    pub amount_in: u64,
    /// Floor on the delivered output; the executor fails below it.
    pub min_amount_out: u64,
    /// Account debited for the input and credited with the output.
    pub recipient: Address,
    /// Unix timestamp after which the execution must not proceed.
    pub deadline: u64,
}

/// Swap-execution interface: exchanges the input and reports the realized
/// output.
pub trait SwapExecutor {
    /// Execute the swap against the given custody, returning the realized
    /// `amount_out`.
    fn swap(&mut self, custody: &mut dyn AssetCustody, request: &SwapRequest) -> CollabResult<u64>;
}

/// Fixed-rate swap venue for v1 and testing.
///
/// Holds a pool account in custody, executes at configured rates, and
/// enforces `min_amount_out` and `deadline` exactly as a real venue would.
#[derive(Debug)]
pub struct FixedRateSwapper {
    pool: Address,
    rates: BTreeMap<(AssetId, AssetId), Rate>,
    now: u64,
}

impl FixedRateSwapper {
    /// Create a venue backed by the `pool` custody account.
    pub fn new(pool: Address, now: u64) -> Self {
        Self {
            pool,
            rates: BTreeMap::new(),
            now,
        }
    }

    /// Set the execution rate for a pair.
    pub fn set_rate(&mut self, asset_in: AssetId, asset_out: AssetId, rate: Rate) {
        self.rates.insert((asset_in, asset_out), rate);
    }

    /// Advance the venue's clock (testing).
    pub fn set_now(&mut self, now: u64) {
        self.now = now;
    }
}

impl SwapExecutor for FixedRateSwapper {
    fn swap(&mut self, custody: &mut dyn AssetCustody, request: &SwapRequest) -> CollabResult<u64> {
        if self.now > request.deadline {
            return Err("swap deadline elapsed".into());
        }
        let rate = self
            .rates
            .get(&(request.asset_in, request.asset_out))
            .ok_or("no execution route")?;
        let amount_out = rate.apply(request.amount_in);
        if amount_out < request.min_amount_out {
            return Err(format!(
                "execution below floor: {amount_out} < {}",
                request.min_amount_out
            )
            .into());
        }
        custody.transfer(
            request.asset_in,
            request.recipient,
            self.pool,
            request.amount_in,
        )?;
        custody.transfer(request.asset_out, self.pool, request.recipient, amount_out)?;
        Ok(amount_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::InMemoryCustody;

    const A: AssetId = [0x10; 32];
    const B: AssetId = [0x20; 32];
    const POOL: Address = [0xF0; 32];
    const TRADER: Address = [0x02; 32];

    fn setup() -> (InMemoryCustody, FixedRateSwapper) {
        let mut custody = InMemoryCustody::new();
        custody.mint(A, TRADER, 10_000);
        custody.mint(B, POOL, 1_000_000);
        let mut venue = FixedRateSwapper::new(POOL, 1_000);
        venue.set_rate(A, B, Rate { num: 1, den: 2 });
        (custody, venue)
    }

    fn request(amount_in: u64, min_out: u64, deadline: u64) -> SwapRequest {
        SwapRequest {
            asset_in: A,
            asset_out: B,
            fee_tier: 3000,
            amount_in,
            min_amount_out: min_out,
            recipient: TRADER,
            deadline,
        }
    }

    #[test]
    fn test_swap_moves_both_legs() {
        let (mut custody, mut venue) = setup();
        let out = venue
            .swap(&mut custody, &request(1_000, 400, 2_000))
            .expect("swap");
        assert_eq!(out, 500);
        assert_eq!(custody.balance_of(A, TRADER), 9_000);
        assert_eq!(custody.balance_of(B, TRADER), 500);
        assert_eq!(custody.balance_of(A, POOL), 1_000);
    }

    #[test]
    fn test_swap_enforces_floor() {
        let (mut custody, mut venue) = setup();
        let err = venue
            .swap(&mut custody, &request(1_000, 501, 2_000))
            .unwrap_err();
        assert!(err.to_string().contains("below floor"));
        // No partial movement.
        assert_eq!(custody.balance_of(A, TRADER), 10_000);
    }

    #[test]
    fn test_swap_enforces_deadline() {
        let (mut custody, mut venue) = setup();
        venue.set_now(3_000);
        let err = venue
            .swap(&mut custody, &request(1_000, 400, 2_000))
            .unwrap_err();
        assert!(err.to_string().contains("deadline"));
    }

    #[test]
    fn test_swap_unknown_route() {
        let (mut custody, mut venue) = setup();
        let mut req = request(1_000, 0, 2_000);
        req.asset_out = [0x30; 32];
        let err = venue.swap(&mut custody, &req).unwrap_err();
        assert!(err.to_string().contains("no execution route"));
    }
}
