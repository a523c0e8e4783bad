#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use ai_bt::{Behavior, BehaviorConfig, BehaviorGraph, NodeDef, RepeatPolicy};
use ai_core::{Action, ActionStatus, Blackboard, TickContext, WorldMut, WorldView};

pub const AGENT: u64 = 1;
pub const SEED: u64 = 123;

pub type Def = NodeDef<RecordingWorld>;

/// World that records every action call and lets tests script outcomes and condition flags.
#[derive(Debug, Default)]
pub struct RecordingWorld {
    pub log: Vec<String>,
    pub outcomes: BTreeMap<&'static str, ActionStatus>,
    pub flags: BTreeMap<&'static str, bool>,
}

impl WorldView for RecordingWorld {
    type Agent = u64;
}

impl WorldMut for RecordingWorld {}

impl RecordingWorld {
    pub fn finish(&mut self, name: &'static str, status: ActionStatus) {
        self.outcomes.insert(name, status);
    }

    pub fn set_flag(&mut self, name: &'static str, value: bool) {
        self.flags.insert(name, value);
    }

    pub fn count(&self, entry: &str) -> usize {
        self.log.iter().filter(|e| e.as_str() == entry).count()
    }

    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }
}

/// Runs until the world scripts an outcome for it.
#[derive(Debug)]
pub struct RecordAction {
    name: &'static str,
    started: bool,
}

impl Action<RecordingWorld> for RecordAction {
    fn tick(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut RecordingWorld,
        _blackboard: &mut Blackboard,
    ) -> ActionStatus {
        if !self.started {
            self.started = true;
            world.log.push(format!("start:{}", self.name));
        }
        world.log.push(format!("tick:{}", self.name));
        world
            .outcomes
            .get(self.name)
            .copied()
            .unwrap_or(ActionStatus::Running)
    }

    fn cancel(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut RecordingWorld,
        _blackboard: &mut Blackboard,
    ) {
        world.log.push(format!("cancel:{}", self.name));
    }
}

/// A task node spawning a [`RecordAction`] called `name`.
pub fn task(name: &'static str) -> NodeDef<RecordingWorld> {
    Def::task().named(name).run(move |_ctx, _agent, _world, _bb| {
        Box::new(RecordAction {
            name,
            started: false,
        }) as Box<dyn Action<RecordingWorld>>
    })
}

/// Condition reading a world flag; unset flags are false.
pub fn flag(
    name: &'static str,
) -> impl Fn(&TickContext, u64, &RecordingWorld, &Blackboard) -> bool + 'static {
    move |_ctx, _agent, world, _bb| world.flags.get(name).copied().unwrap_or(false)
}

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.1, SEED)
}

/// A driver that is already executing and stops after one terminal result.
pub fn driver(graph: BehaviorGraph<RecordingWorld>) -> Behavior<RecordingWorld> {
    let mut behavior = Behavior::new(AGENT, Arc::new(graph)).with_config(BehaviorConfig {
        repeat: RepeatPolicy::Stop,
        run_on_start: false,
        ..BehaviorConfig::default()
    });
    behavior.start_executing();
    behavior
}

/// Tick `behavior` once with the context for `tick`, returning the evaluated result.
pub fn step(
    behavior: &mut Behavior<RecordingWorld>,
    world: &mut RecordingWorld,
    tick: u64,
) -> ai_bt::Return {
    behavior
        .tick(&ctx(tick), world)
        .unwrap_or(ai_bt::Return::None)
}
