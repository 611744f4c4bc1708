//! Audit events for off-chain observers.
//!
//! Every state transition worth auditing (yield receipt, conversion,
//! quarantine movements, policy application, tier and splits changes) emits
//! one of these events. The registry and the ledger keep an internal log
//! that an embedding process drains and ships to its anomaly-detection
//! pipeline (e.g., wash-yield pattern analysis).

use serde::{Deserialize, Serialize};

use crate::{Address, AssetId, SourceId};

/// All audit event types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEvent {
    /// Yield arrived at the ledger. Emitted unconditionally, including for
    /// quarantined submissions, so observers see the complete inflow trail.
    YieldReceived {
        source: SourceId,
        asset: AssetId,
        amount: u64,
    },

    /// An accepted asset was normalized into the settlement asset.
    YieldConverted {
        source: SourceId,
        asset: AssetId,
        amount_in: u64,
        amount_out: u64,
    },

    /// Yield was placed in custody instead of being converted.
    YieldQuarantined {
        source: SourceId,
        asset: AssetId,
        amount: u64,
    },

    /// A quarantined balance re-entered the conversion pipeline.
    QuarantineReleased {
        source: SourceId,
        asset: AssetId,
        amount: u64,
        settled: u64,
    },

    /// A quarantined balance was moved, unconverted, to the treasury.
    QuarantineSwept {
        source: SourceId,
        asset: AssetId,
        amount: u64,
    },

    /// A dev-share cut was paid out in the originally-deposited asset.
    DevSharePaid {
        source: SourceId,
        recipient: Address,
        asset: AssetId,
        amount: u64,
    },

    /// The distribution policy ran over the pending accumulated yield.
    PolicyApplied {
        total: u64,
        staker_amount: u64,
        treasury_amount: u64,
    },

    /// A plugin's trust tier changed.
    TierUpdated { source: SourceId, tier: u8 },

    /// The distribution split shares changed.
    DistributionSplitsUpdated {
        buyback_bps: u16,
        staker_bps: u16,
        treasury_bps: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serde_roundtrip() {
        let event = AuditEvent::YieldReceived {
            source: [1u8; 32],
            asset: [2u8; 32],
            amount: 1_000,
        };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("yield_received"));
        let back: AuditEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }
}
