//! # Digging Agent
//!
//! Per-agent state machine, advanced by an explicit `tick(dt, world)`.
//!
//! ```text
//!            cooldown + selection
//!   NoPlan ───────────────────────▶ Traveling ──arrive──▶ Digging
//!     ▲  ▲                              │                    │
//!     │  └──── discard / break ─────────┴────────────────────┘
//!     │
//!   Recovering ◀── own cell not walkable (from any state)
//! ```
//!
//! Positions are continuous, in cell units, with cell centres on integer
//! coordinates. The agent's cell is its rounded position.

use burrow_core::{BurrowResult, CellCoord, Direction, HitOutcome, MaterialKind, World};

use crate::config::{AgentConfig, DigMode};
use crate::plan::{DiscardReason, Plan, PlanOrigin};
use crate::selection::Selector;
use crate::sensing::SensedResources;

// ============================================================================
// STATE
// ============================================================================

/// Agent behavior states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AgentState {
    /// No plan; selection runs once the cooldown expires.
    #[default]
    NoPlan,
    /// Heading straight for the nearest walkable cell.
    Recovering {
        /// Walkable cell being recovered to.
        target: CellCoord,
    },
    /// Following the plan's path to the stand cell.
    Traveling,
    /// At the stand cell, hitting the target.
    Digging {
        /// Adjacency was lost and the plan lock is holding the plan.
        waiting: bool,
    },
}

/// Running totals for one agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AgentStats {
    /// Cells this agent broke.
    pub tiles_broken: u32,
    /// Hits that landed on a solid cell.
    pub hits_landed: u32,
    /// Material yield of broken cells.
    pub material_yield: u64,
    /// Gem value of broken cells.
    pub gem_value: u64,
    /// Plans committed to.
    pub plans_started: u32,
    /// Plans dropped before their target broke.
    pub plans_discarded: u32,
}

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Origin of a plan chosen this tick.
    pub planned: Option<PlanOrigin>,
    /// Reason a plan was dropped this tick.
    pub discarded: Option<DiscardReason>,
    /// Hits landed this tick.
    pub hits: u32,
    /// Cell broken this tick.
    pub broken: Option<(CellCoord, MaterialKind)>,
    /// Recovery started this tick.
    pub recovering: Option<CellCoord>,
}

/// Successful dig remembered for direction continuity.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LastDig {
    direction: Direction,
    at: f32,
}

// ============================================================================
// AGENT
// ============================================================================

/// An autonomous digger.
#[derive(Clone, Debug)]
pub struct Agent {
    id: u32,
    config: AgentConfig,
    position: [f32; 2],
    state: AgentState,
    plan: Option<Plan>,
    cooldown: f32,
    sensing_timer: f32,
    sensed: SensedResources,
    last_dig: Option<LastDig>,
    clock: f32,
    stats: AgentStats,
}

impl Agent {
    /// Creates an agent centred on `cell`.
    ///
    /// `config` is taken as is; it must pass [`AgentConfig::validate`] or
    /// hit timing and movement are undefined. Use [`Agent::try_new`] for
    /// configs that come from outside.
    #[must_use]
    pub fn new(id: u32, cell: CellCoord, config: AgentConfig) -> Self {
        Self {
            id,
            config,
            position: cell_center(cell),
            state: AgentState::NoPlan,
            plan: None,
            cooldown: 0.0,
            sensing_timer: 0.0,
            sensed: SensedResources::default(),
            last_dig: None,
            clock: 0.0,
            stats: AgentStats::default(),
        }
    }

    /// Creates an agent after validating `config`.
    ///
    /// # Errors
    ///
    /// `BurrowError::InvalidConfig` naming the first bad value.
    pub fn try_new(id: u32, cell: CellCoord, config: AgentConfig) -> BurrowResult<Self> {
        config.validate()?;
        Ok(Self::new(id, cell, config))
    }

    /// Agent id.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Agent config.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Dig mode.
    #[must_use]
    pub const fn mode(&self) -> DigMode {
        self.config.mode
    }

    /// Switches dig mode. Takes effect at the next planning attempt.
    pub fn set_mode(&mut self, mode: DigMode) {
        self.config.mode = mode;
    }

    /// Continuous position.
    #[must_use]
    pub const fn position(&self) -> [f32; 2] {
        self.position
    }

    /// Cell the agent occupies.
    #[must_use]
    pub fn cell(&self) -> CellCoord {
        CellCoord::new(self.position[0].round() as i32, self.position[1].round() as i32)
    }

    /// Moves the agent without touching its plan, e.g. when something
    /// external pushes it.
    pub fn teleport(&mut self, position: [f32; 2]) {
        self.position = position;
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Current plan.
    #[must_use]
    pub const fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// Memory from the last sensing scan.
    #[must_use]
    pub const fn sensed(&self) -> &SensedResources {
        &self.sensed
    }

    /// Remaining replanning cooldown.
    #[must_use]
    pub const fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Running totals.
    #[must_use]
    pub const fn stats(&self) -> &AgentStats {
        &self.stats
    }

    /// Advances the agent by `dt` seconds.
    ///
    /// At most one planning attempt happens per call.
    pub fn tick(&mut self, dt: f32, world: &mut World) -> TickEvents {
        let mut events = TickEvents::default();
        if !(dt.is_finite() && dt >= 0.0) {
            return events;
        }

        self.clock += dt;
        self.sensing_timer -= dt;
        if self.sensing_timer <= 0.0 {
            self.refresh_sensing(world);
        }
        self.cooldown = (self.cooldown - dt).max(0.0);

        if !world.is_walkable(self.cell()) && !matches!(self.state, AgentState::Recovering { .. }) {
            if self.plan.is_some() {
                self.discard(DiscardReason::Displaced, &mut events);
            }
            if !self.start_recovery(world, &mut events) {
                return events;
            }
        }

        match self.state {
            AgentState::Recovering { target } => self.recover(dt, target, world, &mut events),
            AgentState::NoPlan => self.try_plan(world, &mut events),
            AgentState::Traveling => self.travel(dt, world, &mut events),
            AgentState::Digging { .. } => self.dig(dt, world, &mut events),
        }
        events
    }

    // ------------------------------------------------------------------
    // Sensing
    // ------------------------------------------------------------------

    fn refresh_sensing(&mut self, world: &World) {
        self.sensed = SensedResources::scan(world, self.cell(), self.config.sensing_radius);
        self.sensing_timer = self.config.sensing_interval;
        tracing::debug!(
            agent = self.id,
            ores = self.sensed.ores.len(),
            stones = self.sensed.stones.len(),
            "sensing refreshed"
        );
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    fn start_recovery(&mut self, world: &World, events: &mut TickEvents) -> bool {
        let here = self.cell();
        match world.nearest_walkable(here, self.config.recovery_radius) {
            Some(target) => {
                tracing::debug!(agent = self.id, from = %here, to = %target, "recovering");
                self.state = AgentState::Recovering { target };
                events.recovering = Some(target);
                true
            }
            None => {
                tracing::warn!(
                    agent = self.id,
                    cell = %here,
                    radius = self.config.recovery_radius,
                    "no walkable cell to recover to"
                );
                self.state = AgentState::NoPlan;
                false
            }
        }
    }

    fn recover(&mut self, dt: f32, target: CellCoord, world: &World, events: &mut TickEvents) {
        if !world.is_walkable(target) {
            // filled in while we were heading there
            if !self.start_recovery(world, events) {
                return;
            }
            let AgentState::Recovering { target } = self.state else {
                return;
            };
            return self.recover(dt, target, world, events);
        }
        let mut budget = self.config.move_speed * self.config.recovery_speed_multiplier * dt;
        let goal = cell_center(target);
        if move_toward(&mut self.position, goal, &mut budget, self.config.recovery_tolerance) {
            self.position = goal;
            self.state = AgentState::NoPlan;
        }
    }

    // ------------------------------------------------------------------
    // Planning
    // ------------------------------------------------------------------

    fn try_plan(&mut self, world: &World, events: &mut TickEvents) {
        if self.cooldown > 0.0 {
            return;
        }
        self.cooldown = self.config.replan_cooldown;

        let recent = self
            .last_dig
            .filter(|last| self.clock - last.at <= self.config.direction_window)
            .map(|last| last.direction);
        let from = self.cell();
        let Some(selection) =
            Selector::new(world, &self.config, &self.sensed, from, recent).select(self.config.mode)
        else {
            return;
        };

        tracing::debug!(
            agent = self.id,
            mode = self.config.mode.name(),
            target = %selection.target,
            stand = %selection.stand,
            path_len = selection.path.len().saturating_sub(1),
            origin = ?selection.origin,
            "plan chosen"
        );
        events.planned = Some(selection.origin);
        self.plan = Some(Plan::new(
            selection.target,
            selection.stand,
            selection.path,
            selection.origin,
            self.config.plan_lock_duration,
        ));
        self.state = AgentState::Traveling;
        self.stats.plans_started += 1;
    }

    fn discard(&mut self, reason: DiscardReason, events: &mut TickEvents) {
        if let Some(plan) = self.plan.take() {
            tracing::debug!(agent = self.id, target = %plan.target, ?reason, "plan discarded");
            self.stats.plans_discarded += 1;
            events.discarded = Some(reason);
        }
        self.state = AgentState::NoPlan;
    }

    // ------------------------------------------------------------------
    // Travel
    // ------------------------------------------------------------------

    fn travel(&mut self, dt: f32, world: &World, events: &mut TickEvents) {
        let Some(plan) = self.plan.as_mut() else {
            self.state = AgentState::NoPlan;
            return;
        };
        plan.lock_remaining = (plan.lock_remaining - dt).max(0.0);
        if !world.is_solid(plan.target) {
            return self.discard(DiscardReason::TargetGone, events);
        }

        let mut budget = self.config.move_speed * dt;
        let tolerance = self.config.arrival_tolerance;
        let mut arrived = false;
        let mut blocked = false;
        while let Some(next) = plan.next_waypoint() {
            if !world.is_walkable(next) {
                blocked = !plan.is_locked();
                break;
            }
            if !move_toward(&mut self.position, cell_center(next), &mut budget, tolerance) {
                break;
            }
            self.position = cell_center(next);
            plan.cursor += 1;
        }
        if plan.next_waypoint().is_none() && !blocked {
            let stance = stance_point(plan.stand, plan.target, self.config.dig_stance_offset);
            arrived = move_toward(&mut self.position, stance, &mut budget, tolerance);
        }
        let (target, locked) = (plan.target, plan.is_locked());

        if blocked {
            return self.discard(DiscardReason::PathBlocked, events);
        }
        if !arrived {
            return;
        }
        if self.cell().is_adjacent4(target) {
            self.state = AgentState::Digging { waiting: false };
        } else if !locked {
            tracing::trace!(agent = self.id, cell = %self.cell(), "arrived off the stand cell");
            self.discard(DiscardReason::LostAdjacency, events);
        }
    }

    // ------------------------------------------------------------------
    // Digging
    // ------------------------------------------------------------------

    fn dig(&mut self, dt: f32, world: &mut World, events: &mut TickEvents) {
        let here = self.cell();
        let interval = self.config.hit_interval();
        let damage = self.config.hit_damage;
        let Some(plan) = self.plan.as_mut() else {
            self.state = AgentState::NoPlan;
            return;
        };
        plan.lock_remaining = (plan.lock_remaining - dt).max(0.0);
        let target = plan.target;
        if !world.is_solid(target) {
            return self.discard(DiscardReason::TargetGone, events);
        }
        if !here.is_adjacent4(target) {
            if plan.is_locked() {
                self.state = AgentState::Digging { waiting: true };
                return;
            }
            return self.discard(DiscardReason::LostAdjacency, events);
        }
        self.state = AgentState::Digging { waiting: false };

        plan.hit_accumulator += dt;
        while plan.hit_accumulator >= interval {
            plan.hit_accumulator -= interval;
            match world.apply_hit(target, damage) {
                HitOutcome::Ignored => return self.discard(DiscardReason::TargetGone, events),
                HitOutcome::Damaged { remaining, .. } => {
                    self.stats.hits_landed += 1;
                    events.hits += 1;
                    tracing::trace!(agent = self.id, cell = %target, remaining = remaining.current, "hit");
                }
                HitOutcome::Broken { kind } => {
                    self.stats.hits_landed += 1;
                    events.hits += 1;
                    return self.on_broken(here, target, kind, world, events);
                }
            }
        }
    }

    fn on_broken(
        &mut self,
        stand: CellCoord,
        target: CellCoord,
        kind: MaterialKind,
        world: &World,
        events: &mut TickEvents,
    ) {
        let props = world.catalog().props(kind);
        self.stats.tiles_broken += 1;
        self.stats.material_yield += u64::from(props.material_yield);
        self.stats.gem_value += u64::from(props.gem_value);
        if let Some(direction) = Direction::between(stand, target) {
            self.last_dig = Some(LastDig {
                direction,
                at: self.clock,
            });
        }
        tracing::debug!(agent = self.id, cell = %target, kind = kind.name(), "cell broken");
        events.broken = Some((target, kind));
        self.plan = None;
        self.state = AgentState::NoPlan;
    }
}

// ============================================================================
// MOVEMENT
// ============================================================================

fn cell_center(cell: CellCoord) -> [f32; 2] {
    [cell.x as f32, cell.y as f32]
}

/// Where the agent stands while digging: nudged from the stand cell toward
/// the target.
fn stance_point(stand: CellCoord, target: CellCoord, offset: f32) -> [f32; 2] {
    let (dx, dy) = Direction::between(stand, target).map_or((0, 0), Direction::delta);
    [stand.x as f32 + dx as f32 * offset, stand.y as f32 + dy as f32 * offset]
}

/// Moves `position` toward `goal`, spending at most `budget`.
///
/// Returns true once within `tolerance` of the goal.
fn move_toward(position: &mut [f32; 2], goal: [f32; 2], budget: &mut f32, tolerance: f32) -> bool {
    let dx = goal[0] - position[0];
    let dy = goal[1] - position[1];
    let distance = (dx * dx + dy * dy).sqrt();
    if distance <= tolerance {
        return true;
    }
    if *budget <= 0.0 {
        return false;
    }
    let step = budget.min(distance);
    position[0] += dx / distance * step;
    position[1] += dy / distance * step;
    *budget -= step;
    distance - step <= tolerance
}
