//! Deterministic, engine-agnostic AI kernel primitives.
//!
//! Everything here is shared by the behavior-tree engine and the perception crate: the tick
//! context handed down by the host, the world/agent traits, the blackboard store and schema, and
//! the collaborator traits (actions and conditions) that trees drive.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod blackboard;
pub mod condition;
pub mod rng;
pub mod tick;
pub mod world;

pub use action::{Action, ActionList, ActionOutcome, ActionStatus};
pub use blackboard::{BbKey, Blackboard, BlackboardSchema, DataType, Variable};
pub use condition::{AllOf, ConditionList};
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use world::{AgentId, WorldMut, WorldView};
