//! Roster types: the unit pool to partition and the adversary's fixed lanes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ConfigError, SearchConfig};

/// Combat strength of a single unit. Units carry no other attributes.
pub type Power = u32;

/// Identifier for one of the adversary's three lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneId {
    Left,
    Middle,
    Right,
}

impl LaneId {
    /// All lanes in a fixed enumeration order.
    pub const ALL: [LaneId; 3] = [LaneId::Left, LaneId::Middle, LaneId::Right];

    /// Position of this lane in [`LaneId::ALL`].
    pub fn index(self) -> usize {
        match self {
            LaneId::Left => 0,
            LaneId::Middle => 1,
            LaneId::Right => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LaneId::Left => "left",
            LaneId::Middle => "middle",
            LaneId::Right => "right",
        }
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The adversary's deployment: one ordered roster per lane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdversaryTeam {
    pub left: Vec<Power>,
    pub middle: Vec<Power>,
    pub right: Vec<Power>,
}

impl AdversaryTeam {
    /// Roster of a single lane.
    pub fn lane(&self, id: LaneId) -> &[Power] {
        match id {
            LaneId::Left => &self.left,
            LaneId::Middle => &self.middle,
            LaneId::Right => &self.right,
        }
    }

    /// All rosters paired with their lane identifiers.
    pub fn lanes(&self) -> [(LaneId, &[Power]); 3] {
        LaneId::ALL.map(|id| (id, self.lane(id)))
    }
}

/// Complete search input: the pool, the adversary, and the tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Units available for partitioning; must hold exactly `3 * lane_size`.
    pub pool: Vec<Power>,
    /// The adversary's three fixed lanes of `lane_size` units each.
    pub adversary: AdversaryTeam,
    /// Search parameters.
    #[serde(default)]
    pub search: SearchConfig,
}

impl Scenario {
    /// Validate roster shapes and search parameters.
    ///
    /// Violations are fatal configuration errors; no search is attempted on
    /// a scenario that fails here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;

        let lane_size = self.search.lane_size;
        if self.pool.len() != 3 * lane_size {
            return Err(ConfigError::PoolSize {
                expected: 3 * lane_size,
                got: self.pool.len(),
            });
        }
        if self.pool.iter().any(|&p| p == 0) {
            return Err(ConfigError::ZeroPower);
        }
        for (lane, roster) in self.adversary.lanes() {
            if roster.len() != lane_size {
                return Err(ConfigError::AdversaryLaneSize {
                    lane,
                    expected: lane_size,
                    got: roster.len(),
                });
            }
            if roster.iter().any(|&p| p == 0) {
                return Err(ConfigError::ZeroPower);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_scenario() -> Scenario {
        let mut search = SearchConfig::default();
        search.lane_size = 2;
        Scenario {
            pool: vec![100, 200, 300, 400, 500, 600],
            adversary: AdversaryTeam {
                left: vec![150, 250],
                middle: vec![350, 450],
                right: vec![550, 650],
            },
            search,
        }
    }

    #[test]
    fn test_valid_scenario() {
        assert!(small_scenario().validate().is_ok());
    }

    #[test]
    fn test_pool_size_mismatch() {
        let mut scenario = small_scenario();
        scenario.pool.pop();
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::PoolSize { expected: 6, got: 5 })
        ));
    }

    #[test]
    fn test_adversary_lane_size_mismatch() {
        let mut scenario = small_scenario();
        scenario.adversary.middle.push(999);
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::AdversaryLaneSize {
                lane: LaneId::Middle,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_power_rejected() {
        let mut scenario = small_scenario();
        scenario.pool[3] = 0;
        assert!(matches!(scenario.validate(), Err(ConfigError::ZeroPower)));
    }

    #[test]
    fn test_lane_id_roundtrip() {
        for id in LaneId::ALL {
            assert_eq!(LaneId::ALL[id.index()], id);
        }
        let parsed: LaneId = serde_json::from_str("\"middle\"").unwrap();
        assert_eq!(parsed, LaneId::Middle);
    }
}
