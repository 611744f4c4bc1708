//! # silo-types
//!
//! Shared domain types used across the Silo workspace.
//!
//! Silo is a yield-routing ledger: independent yield sources register with a
//! trust tier and funnel harvested yield through one accounting engine, which
//! normalizes everything into a single settlement asset.
//!
//! ## Modules
//!
//! - [`events`] — Audit events emitted by the registry and the ledger

pub mod events;

/// Common type aliases.
pub type Address = [u8; 32];
pub type SourceId = [u8; 32];
pub type AssetId = [u8; 32];

/// The all-zero address, used as the "absent" sentinel.
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// The all-zero asset id; never a valid asset.
pub const ZERO_ASSET: AssetId = [0u8; 32];

/// Basis-point denominator (1 bps = 1/10,000).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Maximum basis-point value (100%).
pub const MAX_BPS: u16 = 10_000;

/// Immutable ceiling on the dev share of incoming yield (20%).
pub const MAX_DEV_SHARE_BPS: u16 = 2_000;

/// Default reward-engine epoch duration in seconds (24 hours).
pub const DEFAULT_EPOCH_SECS: u64 = 86_400;

/// Compute `amount * bps / 10_000` with floor division, widened through
/// `u128` so the product cannot overflow.
pub fn bps_of(amount: u64, bps: u16) -> u64 {
    let wide = amount as u128 * bps as u128 / BPS_DENOMINATOR as u128;
    // bps <= 10_000 keeps the quotient within u64 range.
    wide as u64
}
