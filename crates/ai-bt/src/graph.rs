use std::borrow::Cow;
use std::fmt;

use ai_core::{BlackboardSchema, DataType, WorldMut};
use thiserror::Error;

use crate::exec::{self, Exec};
use crate::node::{Node, NodeDef, NodeKey, NodeKind};
use crate::state::StateTable;
use crate::status::Return;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} does not exist in this graph")]
    UnknownNode(NodeKey),

    #[error("node {0} cannot be linked to itself")]
    SelfLink(NodeKey),

    #[error("the root node cannot be the child of {0}")]
    RootAsChild(NodeKey),

    #[error("node {child} already has parent {parent}")]
    AlreadyParented { child: NodeKey, parent: NodeKey },

    #[error("linking {child} under {parent} would create a cycle")]
    Cycle { parent: NodeKey, child: NodeKey },
}

/// Stateless tree definition: one root, the arena of nodes, and a blackboard schema.
///
/// A graph is never mutated by evaluation. Share it behind an `Arc` between any number of
/// `Behavior`s; each keeps its own state table.
pub struct BehaviorGraph<W>
where
    W: WorldMut + 'static,
{
    nodes: Vec<Node<W>>,
    root: NodeKey,
    schema: BlackboardSchema,
}

impl<W> BehaviorGraph<W>
where
    W: WorldMut + 'static,
{
    pub fn builder() -> GraphBuilder<W> {
        GraphBuilder::new()
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node<W>> {
        self.nodes.get(key.index())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node<W>> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node carrying `name`.
    pub fn find(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|n| n.name() == Some(name))
            .map(|n| n.key)
    }

    /// Variables declared on this graph only.
    pub fn own_blackboard(&self) -> &BlackboardSchema {
        &self.schema
    }

    /// Variables declared on this graph followed by those of every nested sub-graph, depth
    /// first. The first declaration of a name wins.
    pub fn blackboard(&self) -> BlackboardSchema {
        let mut schema = self.schema.clone();
        for node in &self.nodes {
            if let NodeKind::SubGraph(Some(sub)) = &node.kind {
                schema.merge(&sub.blackboard());
            }
        }
        schema
    }

    /// Nodes reachable from the root, depth first in child order.
    pub fn reachable(&self) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(key) = stack.pop() {
            out.push(key);
            if let Some(node) = self.node(key) {
                stack.extend(node.outputs.iter().rev().copied());
            }
        }
        out
    }

    pub(crate) fn execute(&self, table: &mut StateTable<W>, exec: &mut Exec<'_, W>) -> Return {
        exec::execute(self, self.root, table, exec)
    }
}

impl<W> fmt::Debug for BehaviorGraph<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorGraph")
            .field("root", &self.root)
            .field("nodes", &self.nodes)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Assembles a [`BehaviorGraph`]. The root node exists from the start.
pub struct GraphBuilder<W>
where
    W: WorldMut + 'static,
{
    nodes: Vec<Node<W>>,
    schema: BlackboardSchema,
}

impl<W> GraphBuilder<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        let root = NodeDef::new(NodeKind::Root).into_node(NodeKey(0));
        Self {
            nodes: vec![root],
            schema: BlackboardSchema::new(),
        }
    }

    pub fn root(&self) -> NodeKey {
        NodeKey(0)
    }

    /// Add an unlinked node.
    pub fn add(&mut self, def: NodeDef<W>) -> NodeKey {
        let key = NodeKey(self.nodes.len() as u32);
        self.nodes.push(def.into_node(key));
        key
    }

    /// Add a node and append it to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeKey, def: NodeDef<W>) -> Result<NodeKey, GraphError> {
        self.check(parent)?;
        let child = self.add(def);
        self.connect(parent, child)?;
        Ok(child)
    }

    /// Append `child` to `parent`'s children.
    pub fn connect(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), GraphError> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child {
            return Err(GraphError::SelfLink(child));
        }
        if child == self.root() {
            return Err(GraphError::RootAsChild(parent));
        }
        if let Some(existing) = self.nodes[child.index()].input {
            return Err(GraphError::AlreadyParented {
                child,
                parent: existing,
            });
        }

        // Every node has at most one parent, so a cycle means `child` is an ancestor of `parent`.
        let mut cursor = Some(parent);
        while let Some(key) = cursor {
            if key == child {
                return Err(GraphError::Cycle { parent, child });
            }
            cursor = self.nodes[key.index()].input;
        }

        self.nodes[child.index()].input = Some(parent);
        self.nodes[parent.index()].outputs.push(child);
        Ok(())
    }

    pub fn declare(&mut self, name: impl Into<Cow<'static, str>>, data_type: DataType) -> &mut Self {
        self.schema.declare(name, data_type);
        self
    }

    pub fn build(self) -> BehaviorGraph<W> {
        let graph = BehaviorGraph {
            nodes: self.nodes,
            root: NodeKey(0),
            schema: self.schema,
        };

        let reachable = graph.reachable().len();
        if reachable != graph.len() {
            tracing::warn!(
                total = graph.len(),
                reachable,
                "behavior graph contains nodes unreachable from the root"
            );
        }
        graph
    }

    fn check(&self, key: NodeKey) -> Result<(), GraphError> {
        if key.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(key))
        }
    }
}

impl<W> Default for GraphBuilder<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
