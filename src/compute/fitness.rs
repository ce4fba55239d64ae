//! Fitness evaluation: worst-case robustness plus universal-lane bonuses.
//!
//! The adversary assigns its three lanes to our three slots after seeing
//! nothing of our draw order, so the score that drives the search is the
//! minimum P(win >= 2 of 3) over every possible assignment. The maximum
//! assignment is tracked separately, purely for reporting.

use rand::Rng;

use crate::schema::{AdversaryTeam, BattleConfig, FitnessConfig, LaneId, Power};

use super::{LaneEstimator, MatchupCache, Partition};

/// All six bijective assignments of adversary lanes to my three slots.
const ASSIGNMENTS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Scores for one evaluated partition.
#[derive(Debug, Clone)]
pub struct FitnessRecord {
    /// Optimization target: worst-case P(win >= 2 of 3) plus bonuses.
    pub total: f64,
    /// Minimum P(win >= 2 of 3) over every adversary assignment.
    pub worst_case_win2: f64,
    /// Lanes clearing the universal threshold against all adversary lanes.
    pub universal_lanes: usize,
    /// Maximum P(win >= 2 of 3) over assignments, for reporting.
    pub best_case_win2: f64,
    /// P(win all 3) under that best-case assignment.
    pub best_case_win_all: f64,
    /// Per-slot detail of the best-case assignment.
    pub best_case_detail: [LaneMatch; 3],
}

/// One slot-versus-lane pairing in a reported assignment.
#[derive(Debug, Clone)]
pub struct LaneMatch {
    /// My slot index (0-2).
    pub slot: usize,
    /// The adversary lane this slot fights.
    pub enemy: LaneId,
    /// Estimated win probability of the pairing.
    pub win_probability: f64,
    /// My slot's roster, sorted ascending.
    pub roster: Vec<Power>,
}

/// Probability of winning at least two of three independent lane battles.
pub fn prob_win_two_of_three(p: [f64; 3]) -> f64 {
    let [p0, p1, p2] = p;
    p0 * p1 * (1.0 - p2) + p0 * (1.0 - p1) * p2 + (1.0 - p0) * p1 * p2 + p0 * p1 * p2
}

fn assignment_probs(matrix: &[[f64; 3]; 3], assignment: [usize; 3]) -> [f64; 3] {
    [
        matrix[0][assignment[0]],
        matrix[1][assignment[1]],
        matrix[2][assignment[2]],
    ]
}

/// Minimum P(win >= 2 of 3) over every adversary-to-slot assignment.
///
/// `matrix[slot][enemy]` indexes enemies in [`LaneId::ALL`] order. Ties keep
/// the first assignment in enumeration order.
pub fn worst_case_score(matrix: &[[f64; 3]; 3]) -> f64 {
    ASSIGNMENTS
        .iter()
        .map(|&a| prob_win_two_of_three(assignment_probs(matrix, a)))
        .fold(f64::INFINITY, f64::min)
}

/// The assignment maximizing P(win >= 2 of 3), with its P(win all 3).
///
/// Reporting only; the search never optimizes this.
pub fn best_case_assignment(matrix: &[[f64; 3]; 3]) -> ([usize; 3], f64, f64) {
    let mut best = ASSIGNMENTS[0];
    let mut best_win2 = f64::NEG_INFINITY;
    for &a in &ASSIGNMENTS {
        let win2 = prob_win_two_of_three(assignment_probs(matrix, a));
        if win2 > best_win2 {
            best_win2 = win2;
            best = a;
        }
    }
    let p = assignment_probs(matrix, best);
    (best, best_win2, p[0] * p[1] * p[2])
}

/// Count lanes whose win probability meets `threshold` against every
/// adversary lane.
pub fn universal_lane_count(matrix: &[[f64; 3]; 3], threshold: f64) -> usize {
    matrix
        .iter()
        .filter(|row| row.iter().all(|&p| p >= threshold))
        .count()
}

/// Evaluates partitions against the adversary's three lanes.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    estimator: LaneEstimator,
    config: FitnessConfig,
    lane_size: usize,
}

impl FitnessEvaluator {
    pub fn new(battle: BattleConfig, config: FitnessConfig, lane_size: usize) -> Self {
        Self {
            estimator: LaneEstimator::new(battle),
            config,
            lane_size,
        }
    }

    /// Score one partition: fill the 3x3 matchup matrix via the estimator,
    /// then add universal-lane bonuses to the worst-case robustness score.
    pub fn evaluate<R: Rng>(
        &self,
        partition: &Partition,
        adversary: &AdversaryTeam,
        cache: &MatchupCache,
        rng: &mut R,
    ) -> FitnessRecord {
        let lanes = partition.lanes_sorted(self.lane_size);

        let mut matrix = [[0.0f64; 3]; 3];
        for (slot, lane) in lanes.iter().enumerate() {
            for (j, id) in LaneId::ALL.into_iter().enumerate() {
                matrix[slot][j] =
                    self.estimator
                        .win_probability(lane, adversary.lane(id), id, cache, rng);
            }
        }

        let universal_lanes = universal_lane_count(&matrix, self.config.universal_threshold);
        let mut bonus = universal_lanes as f64 * self.config.universal_lane_bonus;
        if universal_lanes == 3 {
            bonus += self.config.all_universal_bonus;
        }

        let worst_case_win2 = worst_case_score(&matrix);
        let (assignment, best_case_win2, best_case_win_all) = best_case_assignment(&matrix);
        let best_case_detail = [0, 1, 2].map(|slot| LaneMatch {
            slot,
            enemy: LaneId::ALL[assignment[slot]],
            win_probability: matrix[slot][assignment[slot]],
            roster: lanes[slot].clone(),
        });

        FitnessRecord {
            total: worst_case_win2 + bonus,
            worst_case_win2,
            universal_lanes,
            best_case_win2,
            best_case_win_all,
            best_case_detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_two_of_three_degenerate() {
        assert!((prob_win_two_of_three([1.0, 1.0, 1.0]) - 1.0).abs() < 1e-12);
        assert!((prob_win_two_of_three([1.0, 1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!((prob_win_two_of_three([1.0, 0.0, 0.0])).abs() < 1e-12);
        assert!((prob_win_two_of_three([0.0, 0.0, 0.0])).abs() < 1e-12);
    }

    #[test]
    fn test_two_of_three_even() {
        // Three fair coins: P(at least two heads) = 1/2
        assert!((prob_win_two_of_three([0.5, 0.5, 0.5]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_worst_case_one_strong_two_weak() {
        // Slot 0 beats everything at 0.9, slots 1 and 2 beat nothing at 0.1.
        // Every assignment yields probabilities (0.9, 0.1, 0.1):
        //   0.9*0.1*0.9 + 0.9*0.9*0.1 + 0.1*0.1*0.1 + 0.9*0.1*0.1 = 0.172
        let matrix = [[0.9; 3], [0.1; 3], [0.1; 3]];
        assert!((worst_case_score(&matrix) - 0.172).abs() < 1e-12);
        let (_, best_win2, win_all) = best_case_assignment(&matrix);
        assert!((best_win2 - 0.172).abs() < 1e-12);
        assert!((win_all - 0.009).abs() < 1e-12);
    }

    #[test]
    fn test_worst_case_constant_rows() {
        // Rows constant across enemies, so every assignment gives
        // (0.9, 0.8, 0.7):
        //   0.9*0.8*0.3 + 0.9*0.2*0.7 + 0.1*0.8*0.7 + 0.9*0.8*0.7 = 0.902
        let matrix = [[0.9; 3], [0.8; 3], [0.7; 3]];
        assert!((worst_case_score(&matrix) - 0.902).abs() < 1e-12);
    }

    #[test]
    fn test_worst_case_is_minimum_over_assignments() {
        let matrix = [[0.9, 0.2, 0.5], [0.3, 0.8, 0.4], [0.6, 0.1, 0.7]];
        let worst = worst_case_score(&matrix);
        let (_, best, _) = best_case_assignment(&matrix);
        for assignment in ASSIGNMENTS {
            let win2 = prob_win_two_of_three(assignment_probs(&matrix, assignment));
            assert!(worst <= win2 + 1e-12);
            assert!(best >= win2 - 1e-12);
        }
        assert!((0.0..=1.0).contains(&worst));
    }

    #[test]
    fn test_universal_lane_threshold_inclusive() {
        let matrix = [[0.6, 0.6, 0.6], [0.6, 0.59, 0.9], [0.1, 0.2, 0.3]];
        // Meeting the threshold exactly counts; one sub-threshold cell
        // disqualifies the whole lane
        assert_eq!(universal_lane_count(&matrix, 0.6), 1);
        assert_eq!(universal_lane_count(&matrix, 0.05), 3);
        assert_eq!(universal_lane_count(&matrix, 0.95), 0);
    }

    #[test]
    fn test_evaluate_dominant_partition_gets_all_bonuses() {
        let battle = BattleConfig {
            trials_per_matchup: 100,
            k_factor: 1.0,
            ..BattleConfig::default()
        };
        let fitness = FitnessConfig::default();
        let evaluator = FitnessEvaluator::new(battle, fitness.clone(), 2);

        let partition = Partition::new(vec![9000, 9100, 9200, 9300, 9400, 9500]);
        let adversary = AdversaryTeam {
            left: vec![100, 110],
            middle: vec![120, 130],
            right: vec![140, 150],
        };
        let cache = MatchupCache::new();
        let mut rng = StdRng::seed_from_u64(21);

        let record = evaluator.evaluate(&partition, &adversary, &cache, &mut rng);
        assert_eq!(record.universal_lanes, 3);
        assert!(record.worst_case_win2 > 0.99);
        let expected_bonus = 3.0 * fitness.universal_lane_bonus + fitness.all_universal_bonus;
        assert!((record.total - record.worst_case_win2 - expected_bonus).abs() < 1e-12);
        assert!(record.best_case_win2 >= record.worst_case_win2);
        // Detail rosters come out sorted ascending
        for detail in &record.best_case_detail {
            assert!(detail.roster.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
