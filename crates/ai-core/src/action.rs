use crate::{Blackboard, TickContext, WorldMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Running,
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    Failure,
}

impl From<ActionOutcome> for ActionStatus {
    fn from(value: ActionOutcome) -> Self {
        match value {
            ActionOutcome::Success => ActionStatus::Success,
            ActionOutcome::Failure => ActionStatus::Failure,
        }
    }
}

impl ActionStatus {
    pub fn outcome(self) -> Option<ActionOutcome> {
        match self {
            ActionStatus::Running => None,
            ActionStatus::Success => Some(ActionOutcome::Success),
            ActionStatus::Failure => Some(ActionOutcome::Failure),
        }
    }
}

/// A live, spawned instance of an action list.
///
/// The first `tick` call is the instance's execution start; every following call polls it.
/// Once `tick` reports a terminal status the owner drops the instance without cancelling it.
pub trait Action<W>: 'static
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus;

    /// Stop a started instance before it finished on its own.
    fn cancel(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) {
    }
}

/// Immutable, shareable template that spawns [`Action`] instances.
///
/// Templates live inside read-only graph definitions shared by many agents, so spawning takes
/// `&self` and a read-only view of the world.
pub trait ActionList<W>: 'static
where
    W: WorldMut + 'static,
{
    fn spawn(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &Blackboard,
    ) -> Box<dyn Action<W>>;
}

impl<W, F> ActionList<W> for F
where
    W: WorldMut + 'static,
    F: Fn(&TickContext, W::Agent, &W, &Blackboard) -> Box<dyn Action<W>> + 'static,
{
    fn spawn(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &Blackboard,
    ) -> Box<dyn Action<W>> {
        self(ctx, agent, world, blackboard)
    }
}
