use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use ai_core::TickContext;

use crate::sight::{PerceptronSight, SightConfig};
use crate::tracker::{Listener, ListenerId};
use crate::world::SightWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PerceptronKind {
    Sight,
}

impl PerceptronKind {
    pub const ALL: [PerceptronKind; 1] = [PerceptronKind::Sight];

    fn index(self) -> usize {
        match self {
            PerceptronKind::Sight => 0,
        }
    }
}

/// One sense of an agent.
pub enum Perceptron<W>
where
    W: SightWorld,
{
    Sight(PerceptronSight<W>),
}

impl<W> Perceptron<W>
where
    W: SightWorld,
{
    pub fn kind(&self) -> PerceptronKind {
        match self {
            Perceptron::Sight(_) => PerceptronKind::Sight,
        }
    }

    pub fn as_sight(&self) -> Option<&PerceptronSight<W>> {
        match self {
            Perceptron::Sight(sight) => Some(sight),
        }
    }

    pub fn as_sight_mut(&mut self) -> Option<&mut PerceptronSight<W>> {
        match self {
            Perceptron::Sight(sight) => Some(sight),
        }
    }

    fn update(&mut self, ctx: &TickContext, observer: W::Agent, world: &W) {
        match self {
            Perceptron::Sight(sight) => sight.update(ctx, observer, world),
        }
    }

    fn fixed_update(&mut self, ctx: &TickContext, observer: W::Agent, world: &W) {
        match self {
            Perceptron::Sight(sight) => sight.fixed_update(ctx, observer, world),
        }
    }

    fn start_listen(&mut self, target: W::Object, listener: Listener<W::Object>) -> ListenerId {
        match self {
            Perceptron::Sight(sight) => sight.start_listen(target, listener),
        }
    }

    fn stop_listen(&mut self, target: W::Object, id: ListenerId) -> bool {
        match self {
            Perceptron::Sight(sight) => sight.stop_listen(target, id),
        }
    }
}

impl<W> fmt::Debug for Perceptron<W>
where
    W: SightWorld,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Perceptron::Sight(sight) => f.debug_tuple("Sight").field(sight).finish(),
        }
    }
}

/// All senses of one observing agent, one perceptron per [`PerceptronKind`].
///
/// The host calls [`Perception::update`] every frame and [`Perception::fixed_update`] on every
/// physics step. Listener callbacks run synchronously inside `fixed_update`.
pub struct Perception<W>
where
    W: SightWorld,
{
    observer: W::Agent,
    perceptrons: [Perceptron<W>; 1],
}

impl<W> Perception<W>
where
    W: SightWorld,
{
    pub fn new(observer: W::Agent, sight: SightConfig) -> Self {
        Self {
            observer,
            perceptrons: [Perceptron::Sight(PerceptronSight::new(sight))],
        }
    }

    pub fn observer(&self) -> W::Agent {
        self.observer
    }

    pub fn update(&mut self, ctx: &TickContext, world: &W) {
        for perceptron in &mut self.perceptrons {
            perceptron.update(ctx, self.observer, world);
        }
    }

    pub fn fixed_update(&mut self, ctx: &TickContext, world: &W) {
        for perceptron in &mut self.perceptrons {
            perceptron.fixed_update(ctx, self.observer, world);
        }
    }

    pub fn start_listen_perceptron(
        &mut self,
        kind: PerceptronKind,
        target: W::Object,
        listener: impl FnMut(bool, W::Object) + 'static,
    ) -> ListenerId {
        self.get_perceptron_mut(kind)
            .start_listen(target, Box::new(listener))
    }

    pub fn stop_listen_perceptron(
        &mut self,
        kind: PerceptronKind,
        target: W::Object,
        id: ListenerId,
    ) -> bool {
        self.get_perceptron_mut(kind).stop_listen(target, id)
    }

    pub fn get_perceptron(&self, kind: PerceptronKind) -> &Perceptron<W> {
        &self.perceptrons[kind.index()]
    }

    pub fn get_perceptron_mut(&mut self, kind: PerceptronKind) -> &mut Perceptron<W> {
        &mut self.perceptrons[kind.index()]
    }

    pub fn sight(&self) -> &PerceptronSight<W> {
        match &self.perceptrons[PerceptronKind::Sight.index()] {
            Perceptron::Sight(sight) => sight,
        }
    }

    /// Whether the observer sees `target`.
    ///
    /// A target with a listener reports the state sampled by the last [`Perception::fixed_update`],
    /// so a freshly listened target reads `false` until the next fixed step even when it is in
    /// plain view. Other targets are tested against the world right away.
    pub fn can_see(&self, world: &W, target: W::Object) -> bool {
        self.sight().can_see(self.observer, world, target)
    }
}

impl<W> fmt::Debug for Perception<W>
where
    W: SightWorld,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Perception")
            .field("observer", &self.observer)
            .field("perceptrons", &self.perceptrons)
            .finish()
    }
}
