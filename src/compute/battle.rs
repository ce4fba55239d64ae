//! Stochastic lane-battle resolution.
//!
//! A lane battle is a sequence of probabilistic 1v1 duels: both rosters act
//! as FIFO queues, the duel loser leaves play, and the winner fights on at
//! reduced power until one side runs out of units.

use rand::Rng;

use crate::schema::{BattleConfig, Power};

/// Probability that the first unit wins a duel, from the power gap.
///
/// Logistic in the power difference; `k_factor` controls how decisive a
/// given gap is.
pub fn duel_win_probability(my_power: f64, enemy_power: f64, k_factor: f64) -> f64 {
    1.0 / (1.0 + (-k_factor * (my_power - enemy_power)).exp())
}

/// Resolve one lane battle between two ordered rosters.
///
/// Returns `true` when `my_roster` holds the lane. Rosters are consumed
/// front to back in the order given; callers pass lanes sorted ascending by
/// convention. An empty roster loses immediately, my side checked first.
pub fn simulate_lane_battle<R: Rng>(
    my_roster: &[Power],
    enemy_roster: &[Power],
    config: &BattleConfig,
    rng: &mut R,
) -> bool {
    let mut mine = my_roster.iter().copied();
    let mut theirs = enemy_roster.iter().copied();

    let Some(first_mine) = mine.next() else {
        return false;
    };
    let Some(first_theirs) = theirs.next() else {
        return true;
    };

    let mut my_power = f64::from(first_mine);
    let mut enemy_power = f64::from(first_theirs);
    let (min_loss, max_loss) = config.degradation_range;

    loop {
        let p = duel_win_probability(my_power, enemy_power, config.k_factor);
        if rng.r#gen::<f64>() < p {
            my_power *= 1.0 - rng.gen_range(min_loss..=max_loss);
            match theirs.next() {
                Some(next) => enemy_power = f64::from(next),
                None => return true,
            }
        } else {
            enemy_power *= 1.0 - rng.gen_range(min_loss..=max_loss);
            match mine.next() {
                Some(next) => my_power = f64::from(next),
                None => return false,
            }
        }
    }
}
