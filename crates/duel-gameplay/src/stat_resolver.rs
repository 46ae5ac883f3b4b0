//! Strike-count derivation.
//!
//! Each side needs a number of landed strikes to take the other from full to
//! zero health. The counts come from the attack-power differential:
//! a much stronger attacker needs very few strikes, a much weaker one still
//! needs at least one.

use duel_common::{DuelResult, PerSide, Side};

use crate::combatant::CombatStats;

/// Strikes needed when both sides have equal attack power.
pub const BASE_STRIKES: i64 = 10;

/// Landed strikes each side needs to defeat the other.
pub type StrikeCounts = PerSide<u32>;

/// Derive strike counts from both sides' attack power and max health.
///
/// With `delta = player_ap - opponent_ap`:
/// - `raw_player = 10 - 10 * |delta| / opponent_ap`
/// - `raw_opponent = 10 - 10 * |delta| / player_ap`
///
/// Both are floored. When `raw_player` is not positive the stronger side is
/// given a single strike. Both counts are finally held at one or more.
///
/// Fails with `InvalidStats` for non-positive attack power or max health.
pub fn resolve(
    player_ap: i32,
    opponent_ap: i32,
    player_max_hp: i32,
    opponent_max_hp: i32,
) -> DuelResult<StrikeCounts> {
    CombatStats::new(player_max_hp, player_ap, 0).validate(Side::Player)?;
    CombatStats::new(opponent_max_hp, opponent_ap, 0).validate(Side::Opponent)?;

    let player_ap = i64::from(player_ap);
    let opponent_ap = i64::from(opponent_ap);
    let delta = player_ap - opponent_ap;

    let raw_player = floored_strikes(delta.abs(), opponent_ap);
    let raw_opponent = floored_strikes(delta.abs(), player_ap);

    // raw_player > 0 in the continuous form is equivalent to |delta| < opponent_ap.
    let (player, opponent) = if delta.abs() < opponent_ap {
        (raw_player, raw_opponent)
    } else if delta > 0 {
        (1, raw_opponent)
    } else {
        (raw_player, 1)
    };

    Ok(PerSide::new(clamp_strikes(player), clamp_strikes(opponent)))
}

/// Derive strike counts from two stat blocks.
pub fn resolve_stats(player: &CombatStats, opponent: &CombatStats) -> DuelResult<StrikeCounts> {
    resolve(
        player.attack_power,
        opponent.attack_power,
        player.max_hp,
        opponent.max_hp,
    )
}

/// Damage one landed strike deals: `round(target_max_hp / attacker_strikes)`.
#[must_use]
pub fn strike_damage(target_max_hp: i32, attacker_strikes: u32) -> i32 {
    let strikes = f64::from(attacker_strikes.max(1));
    (f64::from(target_max_hp.max(0)) / strikes).round() as i32
}

/// `floor(10 - 10 * diff / divisor)` in exact integer arithmetic.
fn floored_strikes(diff: i64, divisor: i64) -> i64 {
    (BASE_STRIKES * divisor - BASE_STRIKES * diff).div_euclid(divisor)
}

fn clamp_strikes(raw: i64) -> u32 {
    raw.clamp(1, BASE_STRIKES) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_common::DuelError;
    use proptest::prelude::*;

    #[test]
    fn test_equal_power_is_symmetric() {
        let counts = resolve(500, 500, 200, 200).expect("valid stats");
        assert_eq!(counts.player, 10);
        assert_eq!(counts.opponent, 10);
    }

    #[test]
    fn test_stronger_player_needs_fewer_strikes() {
        let counts = resolve(1000, 600, 200, 200).expect("valid stats");
        assert_eq!(counts.player, 3);
        assert_eq!(counts.opponent, 6);
    }

    #[test]
    fn test_stronger_opponent_mirrors() {
        let counts = resolve(600, 1000, 200, 200).expect("valid stats");
        assert_eq!(counts.player, 6);
        assert_eq!(counts.opponent, 3);
    }

    #[test]
    fn test_overwhelming_player_advantage() {
        let counts = resolve(3000, 1000, 200, 200).expect("valid stats");
        assert_eq!(counts.player, 1);
        assert_eq!(counts.opponent, 3);
    }

    #[test]
    fn test_overwhelming_opponent_advantage() {
        let counts = resolve(1000, 3000, 200, 200).expect("valid stats");
        assert_eq!(counts.player, 3);
        assert_eq!(counts.opponent, 1);
    }

    #[test]
    fn test_zero_attack_power_rejected() {
        assert_eq!(
            resolve(0, 600, 200, 200),
            Err(DuelError::InvalidStats {
                side: Side::Player,
                attack_power: 0,
                max_hp: 200,
            })
        );
        assert!(matches!(
            resolve(600, 0, 200, 200),
            Err(DuelError::InvalidStats {
                side: Side::Opponent,
                ..
            })
        ));
    }

    #[test]
    fn test_negative_attack_power_rejected() {
        assert!(matches!(
            resolve(-5, 600, 200, 200),
            Err(DuelError::InvalidStats {
                side: Side::Player,
                attack_power: -5,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_max_hp_rejected() {
        assert!(resolve(600, 600, 0, 200).is_err());
        assert!(resolve(600, 600, 200, -5).is_err());
    }

    #[test]
    fn test_strike_damage_rounds() {
        assert_eq!(strike_damage(200, 3), 67);
        assert_eq!(strike_damage(200, 6), 33);
        assert_eq!(strike_damage(200, 0), 200);
    }

    proptest! {
        #[test]
        fn prop_counts_at_least_one(
            player_ap in 1i32..100_000,
            opponent_ap in 1i32..100_000,
            player_hp in 1i32..10_000,
            opponent_hp in 1i32..10_000,
        ) {
            let counts = resolve(player_ap, opponent_ap, player_hp, opponent_hp).expect("valid stats");
            prop_assert!(counts.player >= 1);
            prop_assert!(counts.opponent >= 1);
            prop_assert!(counts.player <= 10);
            prop_assert!(counts.opponent <= 10);
        }

        #[test]
        fn prop_equal_power_symmetric(ap in 1i32..100_000, hp in 1i32..10_000) {
            let counts = resolve(ap, ap, hp, hp).expect("valid stats");
            prop_assert_eq!(counts.player, counts.opponent);
        }

        #[test]
        fn prop_overwhelming_advantage_single_strike(
            opponent_ap in 1i32..1_000,
            factor in 2i32..50,
        ) {
            let counts = resolve(opponent_ap * factor, opponent_ap, 100, 100).expect("valid stats");
            prop_assert_eq!(counts.player, 1);
            prop_assert!(counts.opponent >= 1);
        }

        #[test]
        fn prop_stronger_side_never_needs_more(
            weaker in 1i32..10_000,
            bonus in 0i32..10_000,
        ) {
            let counts = resolve(weaker + bonus, weaker, 100, 100).expect("valid stats");
            prop_assert!(counts.player <= counts.opponent);
        }
    }
}
