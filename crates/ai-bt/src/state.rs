use std::collections::BTreeMap;
use std::fmt;

use ai_core::{Action, WorldMut};

use crate::node::NodeKey;
use crate::status::Return;

/// Lifecycle of a task's spawned action instance.
///
/// Spawning and starting are one scheduling tick apart: the instance is created on the tick the
/// task activates and first ticked on the following evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Spawned,
    Started,
}

pub struct ActionHandle<W>
where
    W: WorldMut + 'static,
{
    pub(crate) action: Box<dyn Action<W>>,
    pub(crate) phase: ActionPhase,
}

impl<W> ActionHandle<W>
where
    W: WorldMut + 'static,
{
    pub(crate) fn spawned(action: Box<dyn Action<W>>) -> Self {
        Self {
            action,
            phase: ActionPhase::Spawned,
        }
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }
}

impl<W> fmt::Debug for ActionHandle<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandle")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// Per-agent execution record of one node.
pub struct NodeState<W>
where
    W: WorldMut + 'static,
{
    pub(crate) result: Return,
    pub(crate) actions: Option<ActionHandle<W>>,
    pub(crate) shuffled_order: Vec<usize>,
    pub(crate) pass_count: u32,
    pub(crate) subgraph: Option<Box<StateTable<W>>>,
}

impl<W> NodeState<W>
where
    W: WorldMut + 'static,
{
    /// Result recorded by the node's last evaluation.
    pub fn result(&self) -> Return {
        self.result
    }

    /// The live action instance of a task node.
    pub fn actions(&self) -> Option<&ActionHandle<W>> {
        self.actions.as_ref()
    }

    /// Cached traversal order of a random composite.
    pub fn shuffled_order(&self) -> &[usize] {
        &self.shuffled_order
    }

    /// Terminal child results counted by a repeating decorator.
    pub fn pass_count(&self) -> u32 {
        self.pass_count
    }

    /// State of the nested graph referenced by a sub-graph node.
    pub fn subgraph(&self) -> Option<&StateTable<W>> {
        self.subgraph.as_deref()
    }
}

impl<W> Default for NodeState<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            result: Return::None,
            actions: None,
            shuffled_order: Vec::new(),
            pass_count: 0,
            subgraph: None,
        }
    }
}

impl<W> fmt::Debug for NodeState<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeState")
            .field("result", &self.result)
            .field("actions", &self.actions)
            .field("shuffled_order", &self.shuffled_order)
            .field("pass_count", &self.pass_count)
            .field("subgraph", &self.subgraph.as_ref().map(|t| t.len()))
            .finish()
    }
}

/// Node identity → execution record, owned by exactly one `Behavior`.
///
/// Records are created lazily on first write; reading an absent record yields `Return::None`.
pub struct StateTable<W>
where
    W: WorldMut + 'static,
{
    states: BTreeMap<NodeKey, NodeState<W>>,
}

impl<W> StateTable<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self {
            states: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: NodeKey) -> Option<&NodeState<W>> {
        self.states.get(&key)
    }

    pub fn result(&self, key: NodeKey) -> Return {
        self.states.get(&key).map_or(Return::None, |s| s.result)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &NodeState<W>)> {
        self.states.iter().map(|(k, s)| (*k, s))
    }

    pub(crate) fn entry(&mut self, key: NodeKey) -> &mut NodeState<W> {
        self.states.entry(key).or_default()
    }

    pub(crate) fn reset(&mut self, key: NodeKey) {
        self.states.remove(&key);
    }

    /// Remove every record, handing them to the caller.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = NodeState<W>> {
        std::mem::take(&mut self.states).into_values()
    }
}

impl<W> Default for StateTable<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> fmt::Debug for StateTable<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.states.iter()).finish()
    }
}
