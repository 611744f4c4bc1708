//! Fungible-asset movement collaborator.
//!
//! The ledger and the converter never hold assets themselves; every unit
//! lives in an external custody collaborator with standard fungible-asset
//! movement semantics. Failure of any movement aborts the enclosing
//! operation.

use std::collections::BTreeMap;

use silo_types::{Address, AssetId};

/// Result type for collaborator calls.
pub type CollabResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Fungible-asset movement: transfers between accounts and balance queries.
///
/// Implementors provide the actual asset rails. The abstraction allows the
/// ledger and converter logic to be tested without real asset
/// infrastructure.
pub trait AssetCustody {
    /// Move `amount` of `asset` from `from` to `to`.
    fn transfer(
        &mut self,
        asset: AssetId,
        from: Address,
        to: Address,
        amount: u64,
    ) -> CollabResult<()>;

    /// The balance of `asset` held by `holder`.
    fn balance_of(&self, asset: AssetId, holder: Address) -> u64;
}

/// In-process custody: balances per (asset, holder).
///
/// Complete implementation of [`AssetCustody`] used in development and in
/// every integration test.
#[derive(Debug, Default)]
pub struct InMemoryCustody {
    balances: BTreeMap<(AssetId, Address), u64>,
}

impl InMemoryCustody {
    /// Create an empty custody ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `asset` to `holder` out of thin air (test seeding).
    pub fn mint(&mut self, asset: AssetId, holder: Address, amount: u64) {
        let balance = self.balances.entry((asset, holder)).or_insert(0);
        *balance = balance.saturating_add(amount);
    }
}

impl AssetCustody for InMemoryCustody {
    fn transfer(
        &mut self,
        asset: AssetId,
        from: Address,
        to: Address,
        amount: u64,
    ) -> CollabResult<()> {
        let from_balance = self.balances.get(&(asset, from)).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(format!(
                "insufficient balance: have {from_balance}, need {amount}"
            )
            .into());
        }
        self.balances.insert((asset, from), from_balance - amount);
        let to_balance = self.balances.entry((asset, to)).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        Ok(())
    }

    fn balance_of(&self, asset: AssetId, holder: Address) -> u64 {
        self.balances.get(&(asset, holder)).copied().unwrap_or(0)
    }
}
