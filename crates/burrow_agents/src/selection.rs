//! # Target Selection
//!
//! One pipeline shared by every dig mode. A mode is an ordered list of
//! [`Preference`] steps; the first step that yields a reachable target wins.
//!
//! ```text
//! Balanced  : [Balanced]
//! Materials : [Direct(Hard), Goal(Hard), Direct(Soft), Balanced]
//! Ores      : [Direct(Ore),  Goal(Ore),  Balanced]
//! ```
//!
//! ## Cost
//!
//! Bounded candidates are costed with a single shortest-path tree from the
//! agent's cell. The full-map scan runs only when a `Goal` step has no
//! sensed goal, and it path-tests at most `full_scan_limit` cells.

use burrow_core::{CellCoord, Direction, MaterialClass, PathTree, World};

use crate::config::{AgentConfig, DigMode};
use crate::plan::{GoalSource, PlanOrigin};
use crate::sensing::SensedResources;

// ============================================================================
// PIPELINE
// ============================================================================

/// One step of a mode's selection pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preference {
    /// Nearest-by-path bounded candidate of this class.
    Direct(MaterialClass),
    /// Bounded candidate that best advances toward a known cell of this class.
    Goal(MaterialClass),
    /// Nearest-by-path bounded candidate of any class.
    Balanced,
}

impl Preference {
    /// Steps a mode runs, in order.
    #[must_use]
    pub const fn pipeline(mode: DigMode) -> &'static [Self] {
        match mode {
            DigMode::Balanced => &[Self::Balanced],
            DigMode::Materials => &[
                Self::Direct(MaterialClass::Hard),
                Self::Goal(MaterialClass::Hard),
                Self::Direct(MaterialClass::Soft),
                Self::Balanced,
            ],
            DigMode::Ores => &[
                Self::Direct(MaterialClass::Ore),
                Self::Goal(MaterialClass::Ore),
                Self::Balanced,
            ],
        }
    }
}

/// A chosen target with its stand cell and path.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    /// Solid cell to dig.
    pub target: CellCoord,
    /// Walkable cell adjacent to the target.
    pub stand: CellCoord,
    /// Agent cell to stand cell, both included.
    pub path: Vec<CellCoord>,
    /// Step that produced the selection.
    pub origin: PlanOrigin,
}

/// A frontier cell with its cheapest reachable stand cell.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    target: CellCoord,
    class: MaterialClass,
    stand: CellCoord,
    distance: u32,
}

/// A goal found by the full-map scan, with the path to its stand cell.
#[derive(Clone, Debug)]
struct FullMapHit {
    goal: CellCoord,
    stand: CellCoord,
    path: Vec<CellCoord>,
}

// ============================================================================
// SELECTOR
// ============================================================================

/// Target selection for one planning attempt.
pub struct Selector<'a> {
    world: &'a World,
    config: &'a AgentConfig,
    sensed: &'a SensedResources,
    from: CellCoord,
    /// Direction of the last successful dig, if still inside its window.
    recent_direction: Option<Direction>,
}

impl<'a> Selector<'a> {
    /// Creates a selector for an agent standing on `from`.
    #[must_use]
    pub const fn new(
        world: &'a World,
        config: &'a AgentConfig,
        sensed: &'a SensedResources,
        from: CellCoord,
        recent_direction: Option<Direction>,
    ) -> Self {
        Self {
            world,
            config,
            sensed,
            from,
            recent_direction,
        }
    }

    /// Runs the pipeline of `mode`.
    #[must_use]
    pub fn select(&self, mode: DigMode) -> Option<Selection> {
        let tree = self
            .world
            .reachable_from(self.from, self.config.max_path_expansions);
        let candidates = self.evaluate_candidates(&tree);

        for step in Preference::pipeline(mode) {
            let chosen = match *step {
                Preference::Direct(class) => nearest(candidates.iter().filter(|c| c.class == class))
                    .map(|c| (c, PlanOrigin::Direct(class))),
                Preference::Goal(class) => {
                    if let Some(selection) = self.goal_step(class, &candidates, &tree) {
                        return Some(selection);
                    }
                    None
                }
                Preference::Balanced => nearest(candidates.iter()).map(|c| (c, PlanOrigin::Balanced)),
            };
            if let Some((candidate, origin)) = chosen {
                return self.finish(candidate, origin, &tree);
            }
        }
        None
    }

    /// Bounded frontier candidates that have a reachable stand cell.
    fn evaluate_candidates(&self, tree: &PathTree) -> Vec<Candidate> {
        self.world
            .frontier_candidates(self.from, self.config.search_radius, self.config.max_candidates)
            .into_iter()
            .filter_map(|target| {
                let class = self.world.class_of(target)?;
                let (stand, distance) = best_stand(self.world, tree, target)?;
                Some(Candidate {
                    target,
                    class,
                    stand,
                    distance,
                })
            })
            .collect()
    }

    fn goal_step(&self, class: MaterialClass, candidates: &[Candidate], tree: &PathTree) -> Option<Selection> {
        let sensed_goal = match class {
            MaterialClass::Ore => self
                .sensed
                .ore_goal(self.world, self.from, self.config.ore_goal_preference),
            MaterialClass::Hard => self.sensed.stone_goal(self.world, self.from),
            MaterialClass::Soft => None,
        };

        let mut full_map = None;
        let (goal, source) = if let Some(goal) = sensed_goal {
            (goal, GoalSource::Sensed)
        } else {
            let hit = self.full_map_goal(class)?;
            let goal = hit.goal;
            full_map = Some(hit);
            (goal, GoalSource::FullMap)
        };

        if let Some(candidate) = self.best_toward(goal, class, candidates) {
            return self.finish(candidate, PlanOrigin::Goal { class, source }, tree);
        }

        let hit = match full_map {
            Some(hit) => hit,
            None => self.full_map_goal(class)?,
        };
        tracing::trace!(goal = %hit.goal, "no bounded candidate, heading straight for full-map goal");
        Some(Selection {
            target: hit.goal,
            stand: hit.stand,
            path: hit.path,
            origin: PlanOrigin::FullMapDirect(class),
        })
    }

    /// Goal-biased scoring over the bounded candidates.
    fn best_toward(&self, goal: CellCoord, class: MaterialClass, candidates: &[Candidate]) -> Option<Candidate> {
        let shortest = candidates.iter().map(|c| c.distance).min()?;
        let cap = shortest.saturating_add(self.config.extra_travel_allowance);
        let weight = self.config.mode_weights.for_class(class);

        let mut best: Option<(Candidate, f32)> = None;
        for candidate in candidates.iter().filter(|c| c.distance <= cap) {
            let score = score_candidate(self.config, weight, self.from, goal, candidate, self.recent_direction);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((*candidate, score));
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    /// Shortest reachable cell of `class` anywhere in the world.
    ///
    /// Buried cells are dropped before the scan limit applies.
    fn full_map_goal(&self, class: MaterialClass) -> Option<FullMapHit> {
        let mut cells: Vec<CellCoord> = self
            .world
            .solids()
            .filter(|(_, kind)| kind.class() == class)
            .map(|(cell, _)| cell)
            .filter(|cell| cell.neighbors4().into_iter().any(|n| self.world.is_walkable(n)))
            .collect();
        // grid iteration order is arbitrary
        cells.sort_unstable_by_key(|c| (c.manhattan(self.from), c.y, c.x));
        cells.truncate(self.config.full_scan_limit);

        let mut best: Option<(FullMapHit, u32)> = None;
        for goal in cells {
            let value = self.world.value(goal);
            for stand in goal.neighbors4() {
                if !self.world.is_walkable(stand) {
                    continue;
                }
                let Some(path) = self
                    .world
                    .find_path(self.from, stand, self.config.max_path_expansions)
                else {
                    continue;
                };
                let better = match &best {
                    None => true,
                    Some((current, current_value)) => {
                        path.len() < current.path.len()
                            || (class == MaterialClass::Ore
                                && path.len() == current.path.len()
                                && value > *current_value)
                    }
                };
                if better {
                    best = Some((FullMapHit { goal, stand, path }, value));
                }
            }
        }
        best.map(|(hit, _)| hit)
    }

    fn finish(&self, candidate: Candidate, origin: PlanOrigin, tree: &PathTree) -> Option<Selection> {
        let path = tree.path_to(candidate.stand)?;
        Some(Selection {
            target: candidate.target,
            stand: candidate.stand,
            path,
            origin,
        })
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Walkable neighbor of `target` closest to the tree origin.
fn best_stand(world: &World, tree: &PathTree, target: CellCoord) -> Option<(CellCoord, u32)> {
    let mut best: Option<(CellCoord, u32)> = None;
    for stand in target.neighbors4() {
        if !world.is_walkable(stand) {
            continue;
        }
        let Some(distance) = tree.distance(stand) else {
            continue;
        };
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((stand, distance));
        }
    }
    best
}

/// First candidate with the shortest path.
fn nearest<'c>(candidates: impl Iterator<Item = &'c Candidate>) -> Option<Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        if best.map_or(true, |b| candidate.distance < b.distance) {
            best = Some(candidate);
        }
    }
    best.copied()
}

fn score_candidate(
    config: &AgentConfig,
    goal_weight: f32,
    from: CellCoord,
    goal: CellCoord,
    candidate: &Candidate,
    recent_direction: Option<Direction>,
) -> f32 {
    let improvement = from.manhattan(goal) as f32 - candidate.target.manhattan(goal) as f32;
    let mut score = goal_weight * config.improvement_weight * improvement
        - config.path_cost_weight * candidate.distance as f32;
    if recent_direction.is_some() && Direction::between(candidate.stand, candidate.target) == recent_direction {
        score += config.direction_bonus;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::AsciiTerrain;

    fn world(map: &str) -> World {
        World::builder()
            .terrain_source(AsciiTerrain::parse(map).expect("valid map"))
            .build()
            .expect("world builds")
    }

    fn select(world: &World, config: &AgentConfig, sensed: &SensedResources, from: CellCoord) -> Option<Selection> {
        Selector::new(world, config, sensed, from, None).select(config.mode)
    }

    const MIXED: &str = "
        .m....c
        .......
    ";

    #[test]
    fn test_balanced_picks_nearest() {
        let w = world(MIXED);
        let config = AgentConfig::default();
        let pick = select(&w, &config, &SensedResources::default(), CellCoord::new(0, 0)).expect("target");
        assert_eq!(pick.target, CellCoord::new(1, 0));
        assert_eq!(pick.stand, CellCoord::new(0, 0));
        assert_eq!(pick.path, vec![CellCoord::new(0, 0)]);
        assert_eq!(pick.origin, PlanOrigin::Balanced);
    }

    #[test]
    fn test_ores_mode_skips_closer_mud() {
        let w = world(MIXED);
        let config = AgentConfig::with_mode(DigMode::Ores);
        let pick = select(&w, &config, &SensedResources::default(), CellCoord::new(0, 0)).expect("target");
        assert_eq!(pick.target, CellCoord::new(6, 0));
        assert_eq!(pick.origin, PlanOrigin::Direct(MaterialClass::Ore));
        assert_eq!(pick.stand, CellCoord::new(6, 1), "Down is tried before Left on a tie");
        assert_eq!(pick.path.len(), 8);
    }

    #[test]
    fn test_materials_mode_falls_to_soft() {
        let w = world(MIXED);
        let config = AgentConfig::with_mode(DigMode::Materials);
        let pick = select(&w, &config, &SensedResources::default(), CellCoord::new(0, 0)).expect("target");
        assert_eq!(pick.target, CellCoord::new(1, 0));
        assert_eq!(pick.origin, PlanOrigin::Direct(MaterialClass::Soft));
    }

    const BURIED: &str = "
        ........
        ########
        ######c#
    ";

    #[test]
    fn test_goal_bias_respects_travel_allowance() {
        let w = world(BURIED);
        let from = CellCoord::new(0, 0);
        let sensed = SensedResources::scan(&w, from, 12);
        assert_eq!(sensed.ores, vec![CellCoord::new(6, 2)]);

        let config = AgentConfig::with_mode(DigMode::Ores);
        let pick = select(&w, &config, &sensed, from).expect("target");
        assert_eq!(pick.target, CellCoord::new(6, 1), "straight above the ore");
        assert_eq!(
            pick.origin,
            PlanOrigin::Goal {
                class: MaterialClass::Ore,
                source: GoalSource::Sensed
            }
        );

        let tight = AgentConfig {
            extra_travel_allowance: 2,
            ..config
        };
        let pick = select(&w, &tight, &sensed, from).expect("target");
        assert_eq!(pick.target, CellCoord::new(2, 1), "detours past the allowance are dropped");
    }

    #[test]
    fn test_full_map_goal_outside_search_radius() {
        let w = world(
            "
            ..............................
            ####################c#########
            ",
        );
        let config = AgentConfig {
            search_radius: 4,
            ..AgentConfig::with_mode(DigMode::Ores)
        };
        let pick = select(&w, &config, &SensedResources::default(), CellCoord::new(0, 0)).expect("target");
        assert_eq!(pick.target, CellCoord::new(3, 1), "furthest bounded step toward the ore");
        assert_eq!(
            pick.origin,
            PlanOrigin::Goal {
                class: MaterialClass::Ore,
                source: GoalSource::FullMap
            }
        );
    }

    #[test]
    fn test_full_map_scan_skips_buried_cells() {
        let w = world(
            "
            ...........c
            ############
            cccccccccccc
            cccccccccccc
            ",
        );
        let config = AgentConfig {
            search_radius: 4,
            full_scan_limit: 4,
            ..AgentConfig::with_mode(DigMode::Ores)
        };
        let from = CellCoord::new(0, 0);
        let sensed = SensedResources::default();
        let selector = Selector::new(&w, &config, &sensed, from, None);

        let hit = selector.full_map_goal(MaterialClass::Ore).expect("exposed ore");
        assert_eq!(hit.goal, CellCoord::new(11, 0), "closer buried ore does not use up the limit");
        assert_eq!(hit.stand, CellCoord::new(10, 0));

        let pick = selector.select(DigMode::Ores).expect("target");
        assert_eq!(pick.target, CellCoord::new(3, 1));
        assert_eq!(
            pick.origin,
            PlanOrigin::Goal {
                class: MaterialClass::Ore,
                source: GoalSource::FullMap
            }
        );
    }

    #[test]
    fn test_full_map_direct_without_bounded_candidates() {
        let w = world(
            "
            ..............................
            .........................c....
            ",
        );
        let config = AgentConfig {
            search_radius: 4,
            ..AgentConfig::with_mode(DigMode::Ores)
        };
        let pick = select(&w, &config, &SensedResources::default(), CellCoord::new(0, 0)).expect("target");
        assert_eq!(pick.target, CellCoord::new(25, 1));
        assert_eq!(pick.origin, PlanOrigin::FullMapDirect(MaterialClass::Ore));
        assert!(pick.stand.is_adjacent4(pick.target));
        assert_eq!(pick.path.first(), Some(&CellCoord::new(0, 0)));
        assert_eq!(pick.path.last(), Some(&pick.stand));
    }

    #[test]
    fn test_nothing_to_dig() {
        let w = world("....\n....");
        let config = AgentConfig::with_mode(DigMode::Materials);
        assert!(select(&w, &config, &SensedResources::default(), CellCoord::new(0, 0)).is_none());
    }

    #[test]
    fn test_direction_bonus_breaks_ties() {
        let config = AgentConfig::default();
        let from = CellCoord::new(0, 0);
        let goal = CellCoord::new(0, 4);
        let left = Candidate {
            target: CellCoord::new(-1, 1),
            class: MaterialClass::Hard,
            stand: CellCoord::new(0, 1),
            distance: 1,
        };
        let right = Candidate {
            target: CellCoord::new(1, 1),
            class: MaterialClass::Hard,
            stand: CellCoord::new(0, 1),
            distance: 1,
        };
        let plain = score_candidate(&config, 1.0, from, goal, &left, None);
        assert!((plain - score_candidate(&config, 1.0, from, goal, &right, None)).abs() < f32::EPSILON);

        let boosted = score_candidate(&config, 1.0, from, goal, &right, Some(Direction::Right));
        assert!((boosted - plain - config.direction_bonus).abs() < 1e-5);
        let other = score_candidate(&config, 1.0, from, goal, &left, Some(Direction::Right));
        assert!((other - plain).abs() < f32::EPSILON);
    }
}
