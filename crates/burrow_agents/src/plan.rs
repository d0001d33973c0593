//! # Plan
//!
//! An agent's committed target, stand cell and path, plus the timers that
//! drive its execution.

use burrow_core::{CellCoord, MaterialClass};

/// Where a goal cell came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GoalSource {
    /// The last sensing scan.
    Sensed,
    /// The full-map reachability scan.
    FullMap,
}

/// Which selection step produced a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanOrigin {
    /// Nearest bounded candidate of the preferred class.
    Direct(MaterialClass),
    /// Bounded candidate that best advances toward a goal cell.
    Goal {
        /// Class of the goal.
        class: MaterialClass,
        /// How the goal was found.
        source: GoalSource,
    },
    /// Straight to a full-map goal, no bounded candidate was reachable.
    FullMapDirect(MaterialClass),
    /// Nearest bounded candidate of any class.
    Balanced,
}

/// Why a plan was dropped before its target broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// The target is no longer solid.
    TargetGone,
    /// The next path cell stopped being walkable.
    PathBlocked,
    /// The agent lost adjacency to the target.
    LostAdjacency,
    /// The agent stands in a non-walkable cell.
    Displaced,
}

/// A committed dig plan.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    /// Solid cell to dig.
    pub target: CellCoord,
    /// Walkable cell adjacent to the target.
    pub stand: CellCoord,
    /// Walkable cells from the agent's cell to `stand`, both included.
    pub path: Vec<CellCoord>,
    /// Index of the next path cell to reach.
    pub cursor: usize,
    /// Time banked toward the next hit.
    pub hit_accumulator: f32,
    /// Remaining plan-lock time.
    pub lock_remaining: f32,
    /// Selection step that produced the plan.
    pub origin: PlanOrigin,
}

impl Plan {
    /// Fresh plan: cursor past the starting cell, accumulator empty, lock
    /// armed.
    #[must_use]
    pub fn new(target: CellCoord, stand: CellCoord, path: Vec<CellCoord>, origin: PlanOrigin, lock: f32) -> Self {
        Self {
            target,
            stand,
            path,
            cursor: 1,
            hit_accumulator: 0.0,
            lock_remaining: lock,
            origin,
        }
    }

    /// Next path cell to reach, or `None` once at the stand cell.
    #[inline]
    #[must_use]
    pub fn next_waypoint(&self) -> Option<CellCoord> {
        self.path.get(self.cursor).copied()
    }

    /// True while the plan may not be invalidated.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_remaining > 0.0
    }

    /// Path steps, start cell excluded.
    #[must_use]
    pub fn path_len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}
