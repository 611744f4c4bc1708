//! # silo-convert
//!
//! Asset normalization: converts an arbitrary accepted asset into the
//! settlement asset at a bounded slippage, through an external price-quote
//! collaborator and an external swap-execution collaborator.
//!
//! ## Modules
//!
//! - [`custody`] — Fungible-asset movement collaborator trait
//! - [`quote`] — Price-quote collaborator trait and fixed-rate stub
//! - [`swap`] — Swap-execution collaborator trait and fixed-rate stub
//! - [`router`] — The [`Converter`](router::Converter) itself

pub mod custody;
pub mod quote;
pub mod router;
pub mod swap;

/// Error types for conversion operations.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The caller is not the single authorized caller (the ledger).
    #[error("caller is not authorized to convert")]
    UnauthorizedCaller,

    /// A slippage bound exceeds 100%.
    #[error("invalid slippage bound: {bps} bps exceeds 10000")]
    InvalidSlippage {
        /// The offending bound in basis points.
        bps: u16,
    },

    /// The (asset, settlement asset) pair is not on the allow-list.
    #[error("conversion route is not whitelisted")]
    RouteNotWhitelisted,

    /// The price-quote collaborator failed.
    #[error("price quote unavailable: {0}")]
    QuoteUnavailable(String),

    /// The swap-execution collaborator failed or its deadline elapsed.
    #[error("swap execution failed: {0}")]
    SwapFailed(String),

    /// The realized output fell below the slippage floor.
    #[error("slippage exceeded: minimum {minimum}, realized {actual}")]
    SlippageExceeded {
        /// The minimum acceptable output.
        minimum: u64,
        /// The realized output.
        actual: u64,
    },

    /// The settlement-asset balance did not grow by the reported output.
    #[error("output mismatch: executor reported {reported}, delivered {delivered}")]
    OutputMismatch {
        /// Amount the executor claimed to deliver.
        reported: u64,
        /// Amount actually observed on the balance.
        delivered: u64,
    },

    /// The quote or the swap produced zero output.
    #[error("conversion produced zero output")]
    ZeroOutput,
}

/// Convenience result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
