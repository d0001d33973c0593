//! # Agent Config
//!
//! Every knob an agent reads, with the documented defaults. Distances are in
//! cells, times in seconds.

use serde::{Deserialize, Serialize};

use burrow_core::{BurrowError, BurrowResult, MaterialClass};

/// What an agent prefers to dig.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigMode {
    /// Nearest diggable cell of any kind.
    #[default]
    Balanced,
    /// Stone first, then mud.
    Materials,
    /// Ore first.
    Ores,
}

impl DigMode {
    /// Parses a lowercase mode name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "balanced" => Some(Self::Balanced),
            "materials" => Some(Self::Materials),
            "ores" => Some(Self::Ores),
            _ => None,
        }
    }

    /// Lowercase mode name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Materials => "materials",
            Self::Ores => "ores",
        }
    }
}

/// How a sensed ore goal is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OreGoalPreference {
    /// Highest gem value, nearest on ties.
    #[default]
    MostValuable,
    /// Nearest, highest gem value on ties.
    Nearest,
}

/// Goal weight per preferred class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeWeights {
    /// Weight of stone/mud goals.
    pub materials: f32,
    /// Weight of ore goals.
    pub ores: f32,
}

impl ModeWeights {
    /// Weight applied when steering toward a goal of `class`.
    #[must_use]
    pub const fn for_class(&self, class: MaterialClass) -> f32 {
        match class {
            MaterialClass::Ore => self.ores,
            MaterialClass::Hard | MaterialClass::Soft => self.materials,
        }
    }
}

impl Default for ModeWeights {
    fn default() -> Self {
        Self {
            materials: 1.0,
            ores: 1.5,
        }
    }
}

/// Per-agent tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Travel speed, cells per second.
    pub move_speed: f32,
    /// Distance at which a waypoint counts as reached.
    pub arrival_tolerance: f32,
    /// Offset from the stand cell toward the target while digging.
    pub dig_stance_offset: f32,
    /// Speed multiplier while recovering.
    pub recovery_speed_multiplier: f32,
    /// Arrival distance while recovering.
    pub recovery_tolerance: f32,
    /// Ring-scan radius for the recovery cell.
    pub recovery_radius: u32,
    /// Manhattan radius for frontier candidates.
    pub search_radius: u32,
    /// Minimum time between planning attempts.
    pub replan_cooldown: f32,
    /// Frontier candidates evaluated per attempt.
    pub max_candidates: usize,
    /// Hits landed per second while digging.
    pub hits_per_second: f32,
    /// Damage per hit.
    pub hit_damage: u32,
    /// Disc radius of the sensing scan.
    pub sensing_radius: u32,
    /// Time between sensing scans.
    pub sensing_interval: f32,
    /// Dig preference.
    pub mode: DigMode,
    /// Sensed ore goal rule.
    pub ore_goal_preference: OreGoalPreference,
    /// Goal weights by class.
    pub mode_weights: ModeWeights,
    /// Weight of progress toward a goal.
    pub improvement_weight: f32,
    /// Weight of path length against a candidate.
    pub path_cost_weight: f32,
    /// Extra path steps a goal-biased candidate may cost over the shortest.
    pub extra_travel_allowance: u32,
    /// Grace period before a new plan can be invalidated.
    pub plan_lock_duration: f32,
    /// Score bonus for continuing the last dig direction.
    pub direction_bonus: f32,
    /// How long the last dig direction stays relevant.
    pub direction_window: f32,
    /// Node budget of every path search.
    pub max_path_expansions: usize,
    /// Goal cells path-tested by the full-map fallback.
    pub full_scan_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            arrival_tolerance: 0.05,
            dig_stance_offset: 0.3,
            recovery_speed_multiplier: 2.0,
            recovery_tolerance: 0.02,
            recovery_radius: 6,
            search_radius: 24,
            replan_cooldown: 0.25,
            max_candidates: 32,
            hits_per_second: 4.0,
            hit_damage: 1,
            sensing_radius: 12,
            sensing_interval: 1.0,
            mode: DigMode::Balanced,
            ore_goal_preference: OreGoalPreference::MostValuable,
            mode_weights: ModeWeights::default(),
            improvement_weight: 1.0,
            path_cost_weight: 0.5,
            extra_travel_allowance: 6,
            plan_lock_duration: 0.5,
            direction_bonus: 2.0,
            direction_window: 3.0,
            max_path_expansions: 4096,
            full_scan_limit: 64,
        }
    }
}

impl AgentConfig {
    /// Default config with a different mode.
    #[must_use]
    pub fn with_mode(mode: DigMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Seconds between hits.
    #[inline]
    #[must_use]
    pub fn hit_interval(&self) -> f32 {
        1.0 / self.hits_per_second
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// `BurrowError::InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> BurrowResult<()> {
        let positive = [
            ("move_speed", self.move_speed),
            ("hits_per_second", self.hits_per_second),
            ("recovery_speed_multiplier", self.recovery_speed_multiplier),
            ("arrival_tolerance", self.arrival_tolerance),
            ("recovery_tolerance", self.recovery_tolerance),
            ("sensing_interval", self.sensing_interval),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(BurrowError::InvalidConfig(format!(
                    "agent.{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("replan_cooldown", self.replan_cooldown),
            ("plan_lock_duration", self.plan_lock_duration),
            ("direction_window", self.direction_window),
            ("improvement_weight", self.improvement_weight),
            ("path_cost_weight", self.path_cost_weight),
            ("direction_bonus", self.direction_bonus),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(BurrowError::InvalidConfig(format!(
                    "agent.{name} must be non-negative, got {value}"
                )));
            }
        }
        if !(0.0..0.5).contains(&self.dig_stance_offset) {
            return Err(BurrowError::InvalidConfig(
                "agent.dig_stance_offset must stay inside the stand cell (0 <= offset < 0.5)".into(),
            ));
        }
        if self.max_candidates == 0 || self.max_path_expansions == 0 {
            return Err(BurrowError::InvalidConfig(
                "agent.max_candidates and agent.max_path_expansions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AgentConfig::default().validate().is_ok());
        assert!((AgentConfig::default().hit_interval() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_zero_speed() {
        let config = AgentConfig {
            move_speed: 0.0,
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stance_must_stay_in_cell() {
        let config = AgentConfig {
            dig_stance_offset: 0.6,
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mode_names() {
        for mode in [DigMode::Balanced, DigMode::Materials, DigMode::Ores] {
            assert_eq!(DigMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(DigMode::from_name("gold"), None);
    }
}
