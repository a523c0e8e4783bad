//! Behavior tree engine built on `ai-core`.
//!
//! A [`BehaviorGraph`] is an immutable arena of nodes assembled with [`GraphBuilder`]. Any number
//! of [`Behavior`] drivers share one graph behind an `Arc`; each keeps its own [`StateTable`]
//! keyed by [`NodeKey`], so per-agent runtime state never leaks into the definition.
//!
//! Evaluation is synchronous and single-threaded. `Return::Running` is the only suspension
//! mechanism: a running node is simply evaluated again on the next tick.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod behavior;
pub mod decorator;
mod exec;
pub mod graph;
pub mod node;
pub mod state;
pub mod status;

pub use behavior::{
    Behavior, BehaviorConfig, ConfigError, RepeatPolicy, UpdateMode, MAX_FREQUENCY, MIN_FREQUENCY,
    SHUFFLE_STREAM,
};
pub use decorator::DecoratorKind;
pub use graph::{BehaviorGraph, GraphBuilder, GraphError};
pub use node::{CompositeKind, ConditionMode, Node, NodeDef, NodeKey, NodeKind};
pub use state::{ActionHandle, ActionPhase, NodeState, StateTable};
pub use status::Return;
