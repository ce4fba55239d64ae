//! Monte Carlo estimation of lane-vs-lane win probabilities.

use std::collections::HashMap;
use std::sync::RwLock;

use rand::Rng;

use crate::schema::{BattleConfig, LaneId, Power};

use super::simulate_lane_battle;

/// Generation-scoped cache of estimated lane win probabilities.
///
/// Keyed by the exact ascending-sorted lane composition and the adversary
/// lane it fights. Interior mutability lets parallel evaluators share one
/// cache; two workers racing on the same miss both compute the estimate and
/// the last write wins.
#[derive(Debug, Default)]
pub struct MatchupCache {
    entries: RwLock<[HashMap<Vec<Power>, f64>; 3]>,
}

impl MatchupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored estimate for a lane against an adversary lane, if present.
    pub fn get(&self, my_lane: &[Power], enemy: LaneId) -> Option<f64> {
        let entries = self.entries.read().expect("matchup cache poisoned");
        entries[enemy.index()].get(my_lane).copied()
    }

    /// Store an estimate, replacing any racing earlier write.
    pub fn insert(&self, my_lane: Vec<Power>, enemy: LaneId, probability: f64) {
        let mut entries = self.entries.write().expect("matchup cache poisoned");
        entries[enemy.index()].insert(my_lane, probability);
    }

    /// Number of cached matchups.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().expect("matchup cache poisoned");
        entries.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Estimates lane win probabilities by repeated battle simulation.
#[derive(Debug, Clone)]
pub struct LaneEstimator {
    config: BattleConfig,
}

impl LaneEstimator {
    pub fn new(config: BattleConfig) -> Self {
        Self { config }
    }

    /// Estimated probability that `my_lane` (sorted ascending) takes the
    /// adversary lane `enemy_id`.
    ///
    /// A cache hit returns the stored estimate. A miss runs
    /// `trials_per_matchup` independent battles, each with fresh queues, and
    /// caches wins / trials.
    pub fn win_probability<R: Rng>(
        &self,
        my_lane: &[Power],
        enemy_lane: &[Power],
        enemy_id: LaneId,
        cache: &MatchupCache,
        rng: &mut R,
    ) -> f64 {
        if let Some(p) = cache.get(my_lane, enemy_id) {
            return p;
        }

        let trials = self.config.trials_per_matchup;
        let mut wins = 0usize;
        for _ in 0..trials {
            if simulate_lane_battle(my_lane, enemy_lane, &self.config, rng) {
                wins += 1;
            }
        }
        let probability = wins as f64 / trials as f64;
        cache.insert(my_lane.to_vec(), enemy_id, probability);
        probability
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn estimator(trials: usize) -> LaneEstimator {
        LaneEstimator::new(BattleConfig {
            trials_per_matchup: trials,
            ..BattleConfig::default()
        })
    }

    #[test]
    fn test_estimate_within_bounds() {
        let estimator = estimator(100);
        let cache = MatchupCache::new();
        let mut rng = StdRng::seed_from_u64(3);
        let p = estimator.win_probability(
            &[1400, 1500, 1600],
            &[1450, 1550, 1650],
            LaneId::Left,
            &cache,
            &mut rng,
        );
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_dominant_lane_approaches_one() {
        let estimator = estimator(300);
        let cache = MatchupCache::new();
        let mut rng = StdRng::seed_from_u64(5);
        let p = estimator.win_probability(
            &[5000, 5500, 6000],
            &[100, 110, 120],
            LaneId::Right,
            &cache,
            &mut rng,
        );
        assert!(p > 0.99, "p = {p}");
    }

    #[test]
    fn test_cache_hit_returns_stored_estimate() {
        let estimator = estimator(200);
        let cache = MatchupCache::new();
        let lane = [1400, 1500, 1600];
        let enemy = [1390, 1490, 1590];

        let mut rng = StdRng::seed_from_u64(9);
        let first = estimator.win_probability(&lane, &enemy, LaneId::Middle, &cache, &mut rng);
        assert_eq!(cache.len(), 1);

        // Different RNG state: a hit must not re-simulate
        let mut other_rng = StdRng::seed_from_u64(12345);
        let second =
            estimator.win_probability(&lane, &enemy, LaneId::Middle, &cache, &mut other_rng);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_keys_by_lane_identity() {
        let cache = MatchupCache::new();
        cache.insert(vec![1, 2, 3], LaneId::Left, 0.25);
        cache.insert(vec![1, 2, 3], LaneId::Right, 0.75);
        assert_eq!(cache.get(&[1, 2, 3], LaneId::Left), Some(0.25));
        assert_eq!(cache.get(&[1, 2, 3], LaneId::Right), Some(0.75));
        assert_eq!(cache.get(&[1, 2, 4], LaneId::Left), None);
        assert_eq!(cache.len(), 2);
    }
}
