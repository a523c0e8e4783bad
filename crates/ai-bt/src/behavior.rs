//! Per-agent tree driver.
//!
//! A [`Behavior`] binds one agent to a shared [`BehaviorGraph`] and owns everything that changes
//! while the tree runs: the node state table, the agent's blackboard, the shuffle stream and the
//! scheduling flags.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use ai_core::{Blackboard, SplitMix64, TickContext, WorldMut};
use ai_tools::{emit as trace_emit, TraceEvent};
use thiserror::Error;

use crate::exec::{self, Exec};
use crate::graph::BehaviorGraph;
use crate::node::NodeKey;
use crate::state::{NodeState, StateTable};
use crate::status::Return;

/// RNG stream id for random composite shuffles.
pub const SHUFFLE_STREAM: u64 = 0xB7_5A0F_F1E5;

/// Lowest and highest accepted `UpdateMode::Frequency` rate, in evaluations per second.
pub const MIN_FREQUENCY: u8 = 1;
pub const MAX_FREQUENCY: u8 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("update frequency {0} Hz is outside 1..=30")]
    FrequencyOutOfRange(u8),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpdateMode {
    #[default]
    EveryFrame,
    /// Evaluations per second of unscaled time. Clamped to `1..=30` when scheduling.
    Frequency(u8),
}

impl UpdateMode {
    /// Seconds of accumulated `dt` between evaluations. Zero for `EveryFrame`.
    pub fn interval_seconds(self) -> f32 {
        match self {
            UpdateMode::EveryFrame => 0.0,
            UpdateMode::Frequency(hz) => 1.0 / f32::from(hz.clamp(MIN_FREQUENCY, MAX_FREQUENCY)),
        }
    }
}

/// What the driver does once the tree reports a terminal result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RepeatPolicy {
    #[default]
    RepeatForever,
    RepeatWhileSuccess,
    RepeatWhileFail,
    Stop,
}

impl RepeatPolicy {
    pub fn should_restart(self, result: Return) -> bool {
        match self {
            RepeatPolicy::RepeatForever => true,
            RepeatPolicy::RepeatWhileSuccess => result == Return::Success,
            RepeatPolicy::RepeatWhileFail => result == Return::Fail,
            RepeatPolicy::Stop => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorConfig {
    pub update_mode: UpdateMode,
    pub repeat: RepeatPolicy,
    /// Start executing on the first `tick`; evaluation then begins on the tick after.
    pub run_on_start: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            update_mode: UpdateMode::EveryFrame,
            repeat: RepeatPolicy::RepeatForever,
            run_on_start: true,
        }
    }
}

impl BehaviorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.update_mode {
            UpdateMode::Frequency(hz) if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&hz) => {
                Err(ConfigError::FrequencyOutOfRange(hz))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Startup {
    /// `run_on_start` has not been honoured yet.
    Pending,
    Done,
}

/// Runs one agent's copy of a behavior graph.
pub struct Behavior<W>
where
    W: WorldMut + 'static,
{
    pub agent: W::Agent,
    pub config: BehaviorConfig,
    pub blackboard: Blackboard,
    graph: Option<Arc<BehaviorGraph<W>>>,
    states: StateTable<W>,
    executing: bool,
    pending_reset: bool,
    startup: Startup,
    since_update: f32,
    rng: Option<SplitMix64>,
    last_result: Return,
    completed_runs: u64,
}

impl<W> Behavior<W>
where
    W: WorldMut + 'static,
{
    pub fn new(agent: W::Agent, graph: Arc<BehaviorGraph<W>>) -> Self {
        let mut behavior = Self::without_graph(agent);
        behavior.graph = Some(graph);
        behavior
    }

    /// A driver with no graph assigned. It evaluates to `Return::None` until one is set.
    pub fn without_graph(agent: W::Agent) -> Self {
        Self {
            agent,
            config: BehaviorConfig::default(),
            blackboard: Blackboard::new(),
            graph: None,
            states: StateTable::new(),
            executing: false,
            pending_reset: false,
            startup: Startup::Pending,
            since_update: 0.0,
            rng: None,
            last_result: Return::None,
            completed_runs: 0,
        }
    }

    pub fn with_config(mut self, config: BehaviorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn graph(&self) -> Option<&Arc<BehaviorGraph<W>>> {
        self.graph.as_ref()
    }

    pub fn is_executing(&self) -> bool {
        self.executing
    }

    /// Result of the latest evaluation.
    pub fn last_result(&self) -> Return {
        self.last_result
    }

    /// Evaluations that ended in a terminal result.
    pub fn completed_runs(&self) -> u64 {
        self.completed_runs
    }

    pub fn states(&self) -> &StateTable<W> {
        &self.states
    }

    pub fn node_state(&self, key: NodeKey) -> Option<&NodeState<W>> {
        self.states.get(key)
    }

    pub fn result_of(&self, key: NodeKey) -> Return {
        self.states.result(key)
    }

    /// Begin executing. The state table is wiped lazily at the start of the next evaluation,
    /// which happens on the next `tick` regardless of the update frequency.
    ///
    /// Does nothing while already executing.
    pub fn start_executing(&mut self) {
        if self.executing {
            return;
        }
        self.arm();
        self.since_update = f32::INFINITY;
        tracing::debug!(agent = ?self.agent, "behavior start");
    }

    /// Wipe the state table before the next evaluation without touching the executing flag.
    pub fn reset_state(&mut self) {
        self.pending_reset = true;
    }

    /// Abort the whole tree, cancelling every started action, and stop executing.
    pub fn stop_executing(&mut self, ctx: &TickContext, world: &mut W) {
        if let Some(graph) = self.graph.clone() {
            self.with_exec(ctx, world, |table, exec| {
                exec::abort_node(&graph, graph.root(), table, exec);
            });
        }
        if self.executing {
            tracing::debug!(agent = ?self.agent, "behavior stop");
        }
        self.executing = false;
    }

    /// Abort every child of `key` while leaving `key`'s own record in place.
    pub fn reset_output_states(&mut self, key: NodeKey, ctx: &TickContext, world: &mut W) {
        if let Some(graph) = self.graph.clone() {
            self.with_exec(ctx, world, |table, exec| {
                exec::reset_output_states(&graph, key, table, exec);
            });
        }
    }

    /// Swap the graph. The current tree is stopped and the table wiped before the next
    /// evaluation; call [`Behavior::start_executing`] to run the new one.
    pub fn set_graph(&mut self, ctx: &TickContext, world: &mut W, graph: Arc<BehaviorGraph<W>>) {
        self.stop_executing(ctx, world);
        self.graph = Some(graph);
        self.pending_reset = true;
    }

    /// Host entry point, called once per frame.
    ///
    /// Returns `Some` with the tree's result when an evaluation happened on this call and `None`
    /// when the behavior is idle or throttled.
    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) -> Option<Return> {
        if self.startup == Startup::Pending {
            self.startup = Startup::Done;
            if self.config.run_on_start {
                self.start_executing();
                return None;
            }
        }

        if !self.executing || !self.ready(ctx.dt_seconds) {
            return None;
        }
        Some(self.execute(ctx, world))
    }

    /// Evaluate the tree once now, bypassing the update schedule.
    ///
    /// Yields `Return::None` when not executing or when no graph is assigned.
    pub fn execute(&mut self, ctx: &TickContext, world: &mut W) -> Return {
        if !self.executing {
            return Return::None;
        }

        if self.pending_reset {
            self.pending_reset = false;
            self.with_exec(ctx, world, |table, exec| exec::discard_table(table, exec));
            trace_emit(
                &mut self.blackboard,
                TraceEvent::new(ctx.tick, "bt.behavior.start"),
            );
        }

        let Some(graph) = self.graph.clone() else {
            self.last_result = Return::None;
            return Return::None;
        };

        let result = self.with_exec(ctx, world, |table, exec| graph.execute(table, exec));
        self.last_result = result;

        if result.is_terminal() {
            self.executing = false;
            self.completed_runs += 1;
            trace_emit(
                &mut self.blackboard,
                TraceEvent::new(ctx.tick, "bt.behavior.finish").with_value(result.code()),
            );
            tracing::debug!(agent = ?self.agent, ?result, runs = self.completed_runs, "behavior finished");

            if self.config.repeat.should_restart(result) {
                tracing::debug!(agent = ?self.agent, "behavior restart");
                self.arm();
            }
        }
        result
    }

    fn arm(&mut self) {
        self.executing = true;
        self.pending_reset = true;
    }

    fn ready(&mut self, dt_seconds: f32) -> bool {
        let interval = self.config.update_mode.interval_seconds();
        if interval <= 0.0 {
            return true;
        }
        self.since_update += dt_seconds;
        if self.since_update >= interval {
            self.since_update = 0.0;
            true
        } else {
            false
        }
    }

    fn with_exec<R>(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        f: impl FnOnce(&mut StateTable<W>, &mut Exec<'_, W>) -> R,
    ) -> R {
        let agent = self.agent;
        let rng = self
            .rng
            .get_or_insert_with(|| ctx.rng_for_agent(agent, SHUFFLE_STREAM));
        let mut exec = Exec {
            ctx,
            agent,
            world,
            blackboard: &mut self.blackboard,
            rng,
        };
        f(&mut self.states, &mut exec)
    }
}

impl<W> std::fmt::Debug for Behavior<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Behavior")
            .field("agent", &self.agent)
            .field("config", &self.config)
            .field("executing", &self.executing)
            .field("last_result", &self.last_result)
            .field("completed_runs", &self.completed_runs)
            .field("states", &self.states.len())
            .finish_non_exhaustive()
    }
}
