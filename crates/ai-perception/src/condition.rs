use ai_core::{BbKey, Blackboard, ConditionList, TickContext};

use crate::perception::Perception;
use crate::world::SightWorld;

/// A world that owns the perception of its agents.
pub trait PerceptionWorld: SightWorld {
    fn perception(&self, agent: Self::Agent) -> Option<&Perception<Self>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SightTarget<O: 'static> {
    Object(O),
    /// Read from the invoking agent's blackboard on every check.
    Blackboard(BbKey<O>),
}

/// Condition that holds while the invoking agent can see its target.
///
/// Fails when the agent has no perception or the blackboard target is unset.
pub struct CanSee<W>
where
    W: SightWorld,
{
    target: SightTarget<W::Object>,
}

impl<W> CanSee<W>
where
    W: SightWorld,
{
    pub fn object(target: W::Object) -> Self {
        Self {
            target: SightTarget::Object(target),
        }
    }

    pub fn from_blackboard(key: BbKey<W::Object>) -> Self {
        Self {
            target: SightTarget::Blackboard(key),
        }
    }

    pub fn target(&self) -> SightTarget<W::Object> {
        self.target
    }
}

impl<W> ConditionList<W> for CanSee<W>
where
    W: PerceptionWorld,
{
    fn check(&self, _ctx: &TickContext, agent: W::Agent, world: &W, blackboard: &Blackboard) -> bool {
        let target = match self.target {
            SightTarget::Object(target) => target,
            SightTarget::Blackboard(key) => match blackboard.get(key) {
                Some(&target) => target,
                None => return false,
            },
        };
        world
            .perception(agent)
            .is_some_and(|perception| perception.can_see(world, target))
    }
}
