use crate::{Blackboard, TickContext, WorldView};

/// A list of conditions gating a tree node.
///
/// Implementations must be side-effect free with respect to the world: they only see a
/// read-only view and may be checked several times per tick by different agents.
pub trait ConditionList<W>: 'static
where
    W: WorldView + 'static,
{
    fn check(&self, ctx: &TickContext, agent: W::Agent, world: &W, blackboard: &Blackboard)
        -> bool;
}

impl<W, F> ConditionList<W> for F
where
    W: WorldView + 'static,
    F: Fn(&TickContext, W::Agent, &W, &Blackboard) -> bool + 'static,
{
    fn check(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &Blackboard,
    ) -> bool {
        self(ctx, agent, world, blackboard)
    }
}

/// All conditions must hold. An empty list holds.
pub struct AllOf<W>
where
    W: WorldView + 'static,
{
    conditions: Vec<Box<dyn ConditionList<W>>>,
}

impl<W> AllOf<W>
where
    W: WorldView + 'static,
{
    pub fn new(conditions: Vec<Box<dyn ConditionList<W>>>) -> Self {
        Self { conditions }
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<W> ConditionList<W> for AllOf<W>
where
    W: WorldView + 'static,
{
    fn check(
        &self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &Blackboard,
    ) -> bool {
        self.conditions
            .iter()
            .all(|c| c.check(ctx, agent, world, blackboard))
    }
}
