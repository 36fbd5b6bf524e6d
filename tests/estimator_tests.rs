use beachhead::combat::{
    AttackingForce, DefendingPosition, InputPolicy, InvasionSnapshot, RawSnapshot, Rng, Side,
    StrengthTuning, TrialRng,
};
use beachhead::estimator::{preview_invasion, Estimate, InvasionEstimator};
use beachhead::parallel::WorkerPool;
use beachhead::EstimateError;
use proptest::prelude::*;

fn estimator(
    attacker_troops: u64,
    attacker_tech: u32,
    defender_troops: u64,
    defender_tech: u32,
    morale: u8,
    bunkers: u32,
) -> InvasionEstimator {
    InvasionEstimator::new(
        InvasionSnapshot::new(
            AttackingForce { troops: attacker_troops, weapons_tech: attacker_tech },
            DefendingPosition {
                troops: defender_troops,
                weapons_tech: defender_tech,
                morale,
                bunkers,
            },
        ),
        StrengthTuning::default(),
    )
    .expect("default tuning is valid")
}

#[test]
fn superior_attacker_wins_most_trials() {
    let est = estimator(1000, 3, 500, 1, 50, 0);
    let estimate = est.simulate_seeded(1000, 7);
    assert!(
        estimate.win_rate() > 0.9,
        "expected a lopsided attacker win rate, got {}",
        estimate.win_rate()
    );
}

#[test]
fn symmetric_forces_are_roughly_balanced() {
    let est = estimator(500, 2, 500, 2, 100, 0);
    assert_eq!(est.strength(Side::Attacker), est.strength(Side::Defender));
    let estimate = est.simulate_seeded(1000, 7);
    let rate = estimate.win_rate();
    assert!(rate < 0.95 && rate > 0.05, "unbalanced symmetric win rate: {rate}");
}

#[test]
fn win_rate_never_drops_as_attacker_troops_grow() {
    let mut previous = 0;
    for troops in (300..=700).step_by(50) {
        let wins = estimator(troops, 2, 500, 2, 100, 0)
            .simulate_seeded(10_000, 1234)
            .attacker_win_count;
        assert!(wins >= previous, "troops {troops}: {wins} < {previous}");
        previous = wins;
    }
}

#[test]
fn win_rate_never_drops_as_attacker_tech_grows() {
    let mut previous = 0;
    for tech in 0..=6 {
        let wins = estimator(500, tech, 500, 3, 80, 1)
            .simulate_seeded(10_000, 99)
            .attacker_win_count;
        assert!(wins >= previous, "tech {tech}: {wins} < {previous}");
        previous = wins;
    }
}

#[test]
fn bunkers_and_morale_favour_the_defender() {
    let weak = estimator(500, 2, 500, 2, 20, 0).simulate_seeded(5000, 5).attacker_win_count;
    let fortified = estimator(500, 2, 500, 2, 100, 6).simulate_seeded(5000, 5).attacker_win_count;
    assert!(fortified < weak, "fortified {fortified} vs weak {weak}");
}

#[test]
fn zero_attacking_troops_never_win() {
    let est = estimator(0, 9, 10, 0, 0, 0);
    for trials in [1, 10, 1000] {
        let estimate = est.simulate_seeded(trials, 3);
        assert_eq!(estimate.attacker_win_count, 0);
        assert_eq!(estimate.attacker_casualties, 0);
    }
}

#[test]
fn zero_trials_return_zeroes() {
    let estimate = estimator(10, 1, 10, 1, 50, 0).simulate_seeded(0, 3);
    assert_eq!(estimate, Estimate::default());
    assert_eq!(estimate.avg_defender_casualties(), 0.0);
}

#[test]
fn strength_is_deterministic() {
    let a = estimator(10, 4, 10, 2, 60, 2);
    let b = estimator(10, 4, 10, 2, 60, 2);
    assert_eq!(a.strength(Side::Attacker), b.strength(Side::Attacker));
    assert_eq!(a.strength(Side::Defender), a.strength(Side::Defender));
    assert_eq!(a.strength(Side::Defender), b.strength(Side::Defender));
}

/// Draws that push the attacker's noise far below zero, the defender's to the mean.
struct AttackerAmbushed;

impl TrialRng for AttackerAmbushed {
    fn next_u64(&mut self) -> u64 {
        0
    }
    fn standard_normal_pair(&mut self) -> (f64, f64) {
        (-10.0, 0.0)
    }
}

#[test]
fn injected_rng_controls_each_trial() {
    let est = estimator(10_000, 9, 1, 0, 0, 0);
    let estimate = est.simulate(50, &mut AttackerAmbushed);
    assert_eq!(estimate.attacker_win_count, 0);
    assert_eq!(estimate.attacker_casualties, 50 * 10_000);
}

#[test]
fn parallel_estimate_matches_itself_and_counts_all_trials() {
    let est = estimator(600, 2, 500, 2, 90, 1);
    let a = est.simulate_parallel(9000, 17, &WorkerPool::default_workers()).unwrap();
    let b = est.simulate_parallel(9000, 17, &WorkerPool::with_workers(3)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.trials, 9000);
    assert!(a.attacker_win_count <= 9000);
}

#[test]
fn clamped_preview_accepts_negative_input() {
    let raw = RawSnapshot {
        attacker_troops: 100,
        attacker_weapons_tech: -3,
        defender_troops: -50,
        defender_weapons_tech: 1,
        defender_morale: 50,
        defender_bunkers: 0,
    };
    assert!(matches!(
        preview_invasion(&raw, InputPolicy::Reject, StrengthTuning::default(), 10, 1),
        Err(EstimateError::Input(_))
    ));
    let preview = preview_invasion(&raw, InputPolicy::Clamp, StrengthTuning::default(), 10, 1)
        .expect("clamped input should estimate");
    assert_eq!(preview.strengths.attacker, 10);
    assert_eq!(preview.estimate.defender_casualties, 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn outcomes_stay_within_bounds(
        attacker_troops in 0u64..5_000,
        attacker_tech in 0u32..20,
        defender_troops in 0u64..5_000,
        defender_tech in 0u32..20,
        morale in 0u8..=100,
        bunkers in 0u32..10,
        seed in any::<u64>(),
        trials in 0u32..200,
    ) {
        let est = estimator(attacker_troops, attacker_tech, defender_troops, defender_tech, morale, bunkers);
        prop_assert!(est.strength(Side::Attacker) > 0);

        let mut rng = Rng::new(seed);
        let mut total = Estimate::default();
        for _ in 0..trials {
            let outcome = est.run_trial(&mut rng);
            prop_assert!(outcome.attacker_casualties <= attacker_troops);
            prop_assert!(outcome.defender_casualties <= defender_troops);
            total.record(outcome);
        }

        prop_assert!(total.attacker_win_count <= trials);
        prop_assert!(total.avg_attacker_casualties() <= attacker_troops as f64);
        prop_assert!(total.avg_defender_casualties() <= defender_troops as f64);
        prop_assert_eq!(total, est.simulate_seeded(trials, seed));
    }
}
