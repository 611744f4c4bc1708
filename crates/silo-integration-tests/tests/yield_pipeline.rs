//! Integration test: full yield pipeline.
//!
//! Exercises the complete register -> promote -> route -> distribute -> claim
//! flow across all four components:
//! 1. Register a plugin (lands in the untrusted tier)
//! 2. Promote it to an auto-convert tier
//! 3. Route yield with a dev share through the converter
//! 4. Apply the hybrid distribution policy
//! 5. Stake, then claim the distributed epoch rewards pro-rata
//! 6. Verify conservation and custody balances at every step

use silo_convert::custody::{AssetCustody, InMemoryCustody};
use silo_convert::quote::{FixedRateQuoter, Rate};
use silo_convert::router::Converter;
use silo_convert::swap::FixedRateSwapper;
use silo_ledger::ledger::{DevShare, YieldLedger, YieldOutcome};
use silo_ledger::sinks::EngineSink;
use silo_ledger::splits::DistributionModel;
use silo_registry::plugins::{TierRegistry, YieldSource};
use silo_rewards::engine::RewardEngine;
use silo_types::{Address, AssetId, SourceId, DEFAULT_EPOCH_SECS};

const SETTLEMENT: AssetId = [0x01; 32];
const ASSET: AssetId = [0x10; 32];
const GOV: Address = [0xAA; 32];
const INCIDENT: Address = [0xAB; 32];
const LEDGER_ADDR: Address = [0x02; 32];
const CONV_HOLDER: Address = [0x03; 32];
const TREASURY: Address = [0x04; 32];
const SRC_ADDR: Address = [0x05; 32];
const DEV: Address = [0x06; 32];
const POOL: Address = [0xF0; 32];
const REWARD_POOL: Address = [0x07; 32];
const ALICE: Address = [0x11; 32];
const BOB: Address = [0x12; 32];

/// Simulated timestamp for deterministic testing.
const T0: u64 = 1_700_000_000;

struct Plugin;

impl YieldSource for Plugin {
    fn id(&self) -> SourceId {
        [0x42; 32]
    }
    fn declared_assets(&self) -> Vec<AssetId> {
        vec![ASSET]
    }
    fn routing_target(&self) -> Address {
        LEDGER_ADDR
    }
}

#[test]
fn full_pipeline_register_route_distribute_claim() {
    silo_integration_tests::init_tracing();

    // =========================================================
    // Step 1: Register the plugin; it lands in tier 0
    // =========================================================
    let mut registry = TierRegistry::new(GOV, INCIDENT);
    let source = registry
        .register_plugin(SRC_ADDR, &Plugin, T0)
        .expect("registration is permissionless");
    assert_eq!(registry.plugin(&source).expect("record").tier, 0);

    // =========================================================
    // Step 2: Promote to tier 1 (auto-convert, 1% slippage)
    // =========================================================
    registry.set_tier(GOV, source, 1).expect("promotion");

    // =========================================================
    // Step 3: Route 10,000 units with a 10% dev share
    // =========================================================
    let mut quoter = FixedRateQuoter::new();
    quoter.set_rate(ASSET, SETTLEMENT, Rate { num: 1, den: 2 });
    let mut venue = FixedRateSwapper::new(POOL, T0);
    venue.set_rate(ASSET, SETTLEMENT, Rate { num: 1, den: 2 });
    let mut converter = Converter::new(SETTLEMENT, CONV_HOLDER, LEDGER_ADDR, GOV, quoter, venue);
    converter.whitelist_route(GOV, ASSET, 3000).expect("route");

    let mut custody = InMemoryCustody::new();
    custody.mint(ASSET, SRC_ADDR, 100_000);
    custody.mint(SETTLEMENT, POOL, 10_000_000);

    let mut ledger = YieldLedger::new(GOV, LEDGER_ADDR, SETTLEMENT, TREASURY);
    let outcome = ledger
        .receive_yield(
            SRC_ADDR,
            &registry,
            &mut converter,
            &mut custody,
            T0,
            source,
            ASSET,
            10_000,
            Some(DevShare {
                recipient: DEV,
                share_bps: 1_000,
            }),
        )
        .expect("yield settles");

    // Dev gets 1,000 of the original asset; 9,000 convert at 0.5 -> 4,500.
    assert_eq!(outcome, YieldOutcome::Settled { amount: 4_500 });
    assert_eq!(custody.balance_of(ASSET, DEV), 1_000);
    assert_eq!(ledger.dev_payout(&DEV, &ASSET), 1_000);
    assert_eq!(ledger.source_total(&source), 4_500);
    assert_eq!(ledger.global_total(), 4_500);
    assert_eq!(ledger.pending_accumulated(), 4_500);
    assert_eq!(
        custody.balance_of(SETTLEMENT, LEDGER_ADDR),
        ledger.pending_accumulated(),
        "ledger retains exactly the pending balance"
    );

    // =========================================================
    // Step 4: Hybrid policy: 70% stakers, 30% treasury
    // =========================================================
    ledger
        .set_distribution_model(GOV, DistributionModel::Hybrid)
        .expect("model");

    // Stakes are placed during epoch 0 so they are exposed from epoch 1.
    let mut engine = RewardEngine::new(LEDGER_ADDR, T0, DEFAULT_EPOCH_SECS);
    engine.stake(ALICE, 1_000, T0).expect("alice stakes");
    engine.stake(BOB, 2_000, T0).expect("bob stakes");

    // Policy runs during epoch 1, so rewards land in epoch 1's pool.
    let t1 = T0 + DEFAULT_EPOCH_SECS;
    let mut sink = EngineSink::new(&mut engine, LEDGER_ADDR, REWARD_POOL);
    let amounts = ledger
        .apply_policy(&mut custody, Some(&mut sink), t1)
        .expect("policy");
    assert_eq!(amounts.staker, 3_150); // 70% of 4,500
    assert_eq!(amounts.treasury, 1_350);
    assert_eq!(ledger.pending_accumulated(), 0);
    assert_eq!(custody.balance_of(SETTLEMENT, REWARD_POOL), 3_150);
    assert_eq!(custody.balance_of(SETTLEMENT, TREASURY), 1_350);
    assert_eq!(custody.balance_of(SETTLEMENT, LEDGER_ADDR), 0);

    // =========================================================
    // Step 5: Claims open once epoch 1 has fully elapsed
    // =========================================================
    let t2 = T0 + 2 * DEFAULT_EPOCH_SECS;
    let alice_reward = engine.claim_rewards(ALICE, 1, t2).expect("alice claim");
    let bob_reward = engine.claim_rewards(BOB, 1, t2).expect("bob claim");
    assert_eq!(alice_reward, 1_050); // 3,150 / 3
    assert_eq!(bob_reward, 2_100);
    assert_eq!(alice_reward + bob_reward, 3_150, "no rounding loss here");

    // A second claim must fail without double payment.
    assert!(engine.claim_rewards(ALICE, 1, t2).is_err());

    // =========================================================
    // Step 6: Conservation held throughout
    // =========================================================
    assert_eq!(ledger.global_total(), ledger.source_total(&source));
    assert!(ledger.pending_accumulated() <= ledger.global_total());
}

#[test]
fn second_policy_run_has_nothing_to_distribute() {
    silo_integration_tests::init_tracing();

    let quoter = FixedRateQuoter::new();
    let venue = FixedRateSwapper::new(POOL, T0);
    let mut converter = Converter::new(SETTLEMENT, CONV_HOLDER, LEDGER_ADDR, GOV, quoter, venue);
    let mut custody = InMemoryCustody::new();
    let mut ledger = YieldLedger::new(GOV, LEDGER_ADDR, SETTLEMENT, TREASURY);

    // Nothing routed yet -> nothing pending.
    assert!(ledger.apply_policy(&mut custody, None, T0).is_err());

    // Settle some settlement-asset yield directly, distribute, then check
    // the drained counter refuses a replay.
    struct DirectPlugin;
    impl YieldSource for DirectPlugin {
        fn id(&self) -> SourceId {
            [0x43; 32]
        }
        fn declared_assets(&self) -> Vec<AssetId> {
            vec![SETTLEMENT]
        }
        fn routing_target(&self) -> Address {
            LEDGER_ADDR
        }
    }
    let mut registry = TierRegistry::new(GOV, INCIDENT);
    let direct = registry
        .register_plugin([0x08; 32], &DirectPlugin, T0)
        .expect("register");
    registry.set_tier(GOV, direct, 1).expect("promote");
    custody.mint(SETTLEMENT, [0x08; 32], 1_000);
    ledger
        .receive_yield(
            [0x08; 32],
            &registry,
            &mut converter,
            &mut custody,
            T0,
            direct,
            SETTLEMENT,
            1_000,
            None,
        )
        .expect("settle");

    let mut engine = RewardEngine::new(LEDGER_ADDR, T0, DEFAULT_EPOCH_SECS);
    let mut sink = EngineSink::new(&mut engine, LEDGER_ADDR, REWARD_POOL);
    ledger
        .apply_policy(&mut custody, Some(&mut sink), T0)
        .expect("first run");
    let mut sink = EngineSink::new(&mut engine, LEDGER_ADDR, REWARD_POOL);
    assert!(
        ledger.apply_policy(&mut custody, Some(&mut sink), T0).is_err(),
        "drained counter cannot be replayed"
    );
}
