use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use ai_core::{Action, ActionList, Blackboard, ConditionList, TickContext, WorldMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decorator::DecoratorKind;
use crate::graph::BehaviorGraph;

/// Arena index of a node inside its [`BehaviorGraph`].
///
/// Assigned by the builder and stable for the lifetime of the graph. Per-agent runtime state is
/// keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeKey(pub(crate) u32);

impl NodeKey {
    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompositeKind {
    Selector,
    Sequence,
    RandomSelector,
    RandomSequence,
    Parallel,
}

impl CompositeKind {
    /// Traversal order is a cached per-agent shuffle instead of declaration order.
    pub fn is_random(self) -> bool {
        matches!(self, CompositeKind::RandomSelector | CompositeKind::RandomSequence)
    }
}

/// How a false condition list affects a node that is already `Running`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConditionMode {
    /// Conditions are checked on every evaluation; false aborts the node.
    #[default]
    FailImmediately,
    /// Conditions are only checked when the node is not already `Running`.
    AllowToComplete,
}

pub enum NodeKind<W>
where
    W: WorldMut + 'static,
{
    Root,
    Composite(CompositeKind),
    /// `None` is an unconfigured decorator; it evaluates to `Fail`.
    Decorator(Option<DecoratorKind>),
    Task,
    /// `None` is a missing graph reference; it evaluates to `Fail`.
    SubGraph(Option<Arc<BehaviorGraph<W>>>),
}

impl<W> NodeKind<W>
where
    W: WorldMut + 'static,
{
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Composite(CompositeKind::Selector) => "selector",
            NodeKind::Composite(CompositeKind::Sequence) => "sequence",
            NodeKind::Composite(CompositeKind::RandomSelector) => "random-selector",
            NodeKind::Composite(CompositeKind::RandomSequence) => "random-sequence",
            NodeKind::Composite(CompositeKind::Parallel) => "parallel",
            NodeKind::Decorator(_) => "decorator",
            NodeKind::Task => "task",
            NodeKind::SubGraph(_) => "subgraph",
        }
    }
}

impl<W> fmt::Debug for NodeKind<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Decorator(kind) => f.debug_tuple("Decorator").field(kind).finish(),
            NodeKind::SubGraph(graph) => f
                .debug_tuple("SubGraph")
                .field(&graph.as_ref().map(|g| g.len()))
                .finish(),
            other => f.write_str(other.label()),
        }
    }
}

/// Immutable definition of one tree node.
pub struct Node<W>
where
    W: WorldMut + 'static,
{
    pub(crate) key: NodeKey,
    pub(crate) name: Option<Cow<'static, str>>,
    pub(crate) input: Option<NodeKey>,
    pub(crate) outputs: Vec<NodeKey>,
    pub(crate) kind: NodeKind<W>,
    pub(crate) conditions: Option<Arc<dyn ConditionList<W>>>,
    pub(crate) condition_mode: ConditionMode,
    pub(crate) actions: Option<Arc<dyn ActionList<W>>>,
}

impl<W> Node<W>
where
    W: WorldMut + 'static,
{
    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parent, if linked.
    pub fn input(&self) -> Option<NodeKey> {
        self.input
    }

    /// Children in declaration order.
    pub fn outputs(&self) -> &[NodeKey] {
        &self.outputs
    }

    pub fn kind(&self) -> &NodeKind<W> {
        &self.kind
    }

    pub fn condition_mode(&self) -> ConditionMode {
        self.condition_mode
    }

    pub fn has_conditions(&self) -> bool {
        self.conditions.is_some()
    }

    pub fn has_actions(&self) -> bool {
        self.actions.is_some()
    }
}

impl<W> fmt::Debug for Node<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("outputs", &self.outputs)
            .field("conditions", &self.conditions.is_some())
            .field("actions", &self.actions.is_some())
            .finish()
    }
}

/// Authoring-time description of a node, consumed by [`crate::GraphBuilder::add`].
pub struct NodeDef<W>
where
    W: WorldMut + 'static,
{
    kind: NodeKind<W>,
    name: Option<Cow<'static, str>>,
    conditions: Option<Arc<dyn ConditionList<W>>>,
    condition_mode: ConditionMode,
    actions: Option<Arc<dyn ActionList<W>>>,
}

impl<W> NodeDef<W>
where
    W: WorldMut + 'static,
{
    pub fn new(kind: NodeKind<W>) -> Self {
        Self {
            kind,
            name: None,
            conditions: None,
            condition_mode: ConditionMode::default(),
            actions: None,
        }
    }

    pub fn composite(kind: CompositeKind) -> Self {
        Self::new(NodeKind::Composite(kind))
    }

    pub fn selector() -> Self {
        Self::composite(CompositeKind::Selector)
    }

    pub fn sequence() -> Self {
        Self::composite(CompositeKind::Sequence)
    }

    pub fn random_selector() -> Self {
        Self::composite(CompositeKind::RandomSelector)
    }

    pub fn random_sequence() -> Self {
        Self::composite(CompositeKind::RandomSequence)
    }

    pub fn parallel() -> Self {
        Self::composite(CompositeKind::Parallel)
    }

    pub fn decorator(kind: DecoratorKind) -> Self {
        Self::new(NodeKind::Decorator(Some(kind)))
    }

    pub fn task() -> Self {
        Self::new(NodeKind::Task)
    }

    pub fn subgraph(graph: Arc<BehaviorGraph<W>>) -> Self {
        Self::new(NodeKind::SubGraph(Some(graph)))
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn conditions(mut self, conditions: impl ConditionList<W>) -> Self {
        self.conditions = Some(Arc::new(conditions));
        self
    }

    /// Reuse a condition list shared with other nodes or graphs.
    pub fn shared_conditions(mut self, conditions: Arc<dyn ConditionList<W>>) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Closure form of [`NodeDef::conditions`].
    pub fn when(
        self,
        condition: impl Fn(&TickContext, W::Agent, &W, &Blackboard) -> bool + 'static,
    ) -> Self {
        self.conditions(condition)
    }

    pub fn condition_mode(mut self, mode: ConditionMode) -> Self {
        self.condition_mode = mode;
        self
    }

    /// Attach the action list a task spawns. Ignored by every other node kind.
    pub fn actions(mut self, actions: impl ActionList<W>) -> Self {
        self.actions = Some(Arc::new(actions));
        self
    }

    pub fn shared_actions(mut self, actions: Arc<dyn ActionList<W>>) -> Self {
        self.actions = Some(actions);
        self
    }

    /// Closure form of [`NodeDef::actions`].
    pub fn run(
        self,
        spawn: impl Fn(&TickContext, W::Agent, &W, &Blackboard) -> Box<dyn Action<W>> + 'static,
    ) -> Self {
        self.actions(spawn)
    }

    pub(crate) fn into_node(self, key: NodeKey) -> Node<W> {
        Node {
            key,
            name: self.name,
            input: None,
            outputs: Vec::new(),
            kind: self.kind,
            conditions: self.conditions,
            condition_mode: self.condition_mode,
            actions: self.actions,
        }
    }
}
