//! Integration test: epoch accounting in the reward engine.
//!
//! Covers multi-epoch reward accrual against one-epoch-lagged stake
//! snapshots: stakes placed during an epoch only count from the next one,
//! claims open only after the epoch has fully elapsed, and pro-rata math
//! uses floor division so the pool can never be overdrawn.

use silo_rewards::engine::RewardEngine;
use silo_types::{Address, DEFAULT_EPOCH_SECS};

const DISTRIBUTOR: Address = [0x02; 32];
const ALICE: Address = [0x11; 32];
const BOB: Address = [0x12; 32];
const CAROL: Address = [0x13; 32];

const GENESIS: u64 = 1_700_000_000;

fn at_epoch(n: u64) -> u64 {
    GENESIS + n * DEFAULT_EPOCH_SECS
}

fn engine() -> RewardEngine {
    silo_integration_tests::init_tracing();
    RewardEngine::new(DISTRIBUTOR, GENESIS, DEFAULT_EPOCH_SECS)
}

#[test]
fn stake_lags_one_epoch_before_earning() {
    let mut engine = engine();

    // Alice stakes during epoch 0; her stake is exposed from epoch 1.
    engine.stake(ALICE, 1_000, GENESIS).expect("stake");
    assert_eq!(engine.stake_at(&ALICE, 0), 0);
    assert_eq!(engine.stake_at(&ALICE, 1), 1_000);

    // Rewards paid into epoch 0 are unclaimable by her.
    engine
        .distribute_rewards(DISTRIBUTOR, 500, GENESIS)
        .expect("fund epoch 0");
    let err = engine.claim_rewards(ALICE, 0, at_epoch(1));
    assert!(err.is_err(), "no epoch-0 exposure, no epoch-0 claim");

    // Rewards paid into epoch 1 are fully hers.
    engine
        .distribute_rewards(DISTRIBUTOR, 700, at_epoch(1))
        .expect("fund epoch 1");
    let claimed = engine.claim_rewards(ALICE, 1, at_epoch(2)).expect("claim");
    assert_eq!(claimed, 700);
}

#[test]
fn pro_rata_split_across_three_stakers() {
    let mut engine = engine();
    engine.stake(ALICE, 1_000, GENESIS).expect("alice");
    engine.stake(BOB, 2_000, GENESIS).expect("bob");
    engine.stake(CAROL, 7_000, GENESIS).expect("carol");

    engine
        .distribute_rewards(DISTRIBUTOR, 10_000, at_epoch(1))
        .expect("fund epoch 1");

    let t = at_epoch(2);
    assert_eq!(engine.claim_rewards(ALICE, 1, t).expect("alice"), 1_000);
    assert_eq!(engine.claim_rewards(BOB, 1, t).expect("bob"), 2_000);
    assert_eq!(engine.claim_rewards(CAROL, 1, t).expect("carol"), 7_000);
}

#[test]
fn floor_division_never_overdraws_the_pool() {
    let mut engine = engine();
    engine.stake(ALICE, 1, GENESIS).expect("alice");
    engine.stake(BOB, 1, GENESIS).expect("bob");
    engine.stake(CAROL, 1, GENESIS).expect("carol");

    // 100 units over 3 equal stakes: each claim floors to 33 and one unit
    // stays in the pool rather than being over-paid.
    engine
        .distribute_rewards(DISTRIBUTOR, 100, at_epoch(1))
        .expect("fund");
    let t = at_epoch(2);
    let total = engine.claim_rewards(ALICE, 1, t).expect("a")
        + engine.claim_rewards(BOB, 1, t).expect("b")
        + engine.claim_rewards(CAROL, 1, t).expect("c");
    assert_eq!(total, 99);
    assert!(total <= engine.epoch_reward(1));
}

#[test]
fn running_epoch_is_not_claimable() {
    let mut engine = engine();
    engine.stake(ALICE, 1_000, GENESIS).expect("stake");
    engine
        .distribute_rewards(DISTRIBUTOR, 500, at_epoch(1))
        .expect("fund");

    // Midway through epoch 1 the pool is still accumulating.
    let mid = at_epoch(1) + DEFAULT_EPOCH_SECS / 2;
    assert!(engine.claim_rewards(ALICE, 1, mid).is_err());

    // Once epoch 2 begins, epoch 1 is finalized.
    assert!(engine.claim_rewards(ALICE, 1, at_epoch(2)).is_ok());
}

#[test]
fn mid_epoch_join_shares_only_from_the_next_epoch() {
    let mut engine = engine();
    engine.stake(ALICE, 1_000, GENESIS).expect("alice");

    // Bob joins during epoch 1, so epoch 1's pool belongs entirely to Alice.
    engine
        .stake(BOB, 1_000, at_epoch(1) + 100)
        .expect("bob joins late");
    engine
        .distribute_rewards(DISTRIBUTOR, 600, at_epoch(1) + 200)
        .expect("fund epoch 1");

    let t2 = at_epoch(2);
    assert_eq!(engine.claim_rewards(ALICE, 1, t2).expect("alice"), 600);
    assert!(engine.claim_rewards(BOB, 1, t2).is_err());

    // From epoch 2 they split evenly.
    engine
        .distribute_rewards(DISTRIBUTOR, 600, t2)
        .expect("fund epoch 2");
    let t3 = at_epoch(3);
    assert_eq!(engine.claim_rewards(ALICE, 2, t3).expect("alice"), 300);
    assert_eq!(engine.claim_rewards(BOB, 2, t3).expect("bob"), 300);
}

#[test]
fn unstake_reduces_exposure_from_the_next_epoch() {
    let mut engine = engine();
    engine.stake(ALICE, 1_000, GENESIS).expect("alice");
    engine.stake(BOB, 1_000, GENESIS).expect("bob");

    // Alice exits during epoch 1; her epoch-1 exposure is unchanged but
    // epoch 2 onward belongs to Bob alone.
    engine
        .unstake(ALICE, 1_000, at_epoch(1) + 50)
        .expect("alice exits");
    assert_eq!(engine.stake_at(&ALICE, 1), 1_000);
    assert_eq!(engine.stake_at(&ALICE, 2), 0);

    engine
        .distribute_rewards(DISTRIBUTOR, 400, at_epoch(1) + 100)
        .expect("fund epoch 1");
    let t2 = at_epoch(2);
    assert_eq!(engine.claim_rewards(ALICE, 1, t2).expect("alice"), 200);
    assert_eq!(engine.claim_rewards(BOB, 1, t2).expect("bob"), 200);

    engine
        .distribute_rewards(DISTRIBUTOR, 400, t2)
        .expect("fund epoch 2");
    let t3 = at_epoch(3);
    assert!(engine.claim_rewards(ALICE, 2, t3).is_err());
    assert_eq!(engine.claim_rewards(BOB, 2, t3).expect("bob"), 400);
}

#[test]
fn idle_gap_epochs_advance_without_per_epoch_work() {
    let mut engine = engine();
    engine.stake(ALICE, 1_000, GENESIS).expect("stake");

    // Nothing touches the engine for 50 epochs; the next call catches up
    // in one step and the old snapshot still answers historical queries.
    let t50 = at_epoch(50);
    engine
        .distribute_rewards(DISTRIBUTOR, 900, t50)
        .expect("fund epoch 50");
    assert_eq!(engine.current_epoch(), 50);
    assert_eq!(engine.stake_at(&ALICE, 50), 1_000);
    assert_eq!(engine.total_stake_at(50), 1_000);

    let claimed = engine
        .claim_rewards(ALICE, 50, at_epoch(51))
        .expect("claim epoch 50");
    assert_eq!(claimed, 900);
}

#[test]
fn only_the_distributor_can_fund_epochs() {
    let mut engine = engine();
    assert!(engine.distribute_rewards(ALICE, 100, GENESIS).is_err());
    assert_eq!(engine.epoch_reward(0), 0);
}
