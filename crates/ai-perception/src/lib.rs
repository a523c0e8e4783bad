//! Agent senses for behavior trees.
//!
//! A [`Perception`] holds one perceptron per sense. The sight perceptron tracks targets that
//! listeners subscribed to, samples them on every fixed step and reports visibility changes
//! through edge-triggered callbacks. [`CanSee`] exposes the same test as a tree condition.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod condition;
pub mod error;
pub mod math;
pub mod perception;
pub mod sight;
pub mod tracker;
pub mod world;

pub use condition::{CanSee, PerceptionWorld, SightTarget};
pub use error::ConfigError;
pub use math::{Pose, Quat, Vec3};
pub use perception::{Perception, Perceptron, PerceptronKind};
pub use sight::{check_can_see, eyes, PerceptronSight, SightConfig};
pub use tracker::{Listener, ListenerId, Tracker};
pub use world::{LayerMask, RayHit, RayQuery, SightWorld};
