use core::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use ai_core::WorldView;

use crate::math::{Pose, Vec3};

/// Physics layers a ray may collide with, one bit per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    pub fn layer(layer: u8) -> Self {
        Self(1u32.checked_shl(u32::from(layer)).unwrap_or(0))
    }

    pub fn with(self, layer: u8) -> Self {
        Self(self.0 | Self::layer(layer).0)
    }

    pub fn contains(self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
    pub max_distance: f32,
    pub layer_mask: LayerMask,
    pub hit_triggers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<O> {
    /// Object owning the collider that was hit.
    pub object: O,
    pub point: Vec3,
    pub distance: f32,
}

/// World queries the sight perceptron needs.
///
/// `Object` identifies anything that can be seen, agents included. An object whose pose is
/// `None` no longer exists.
pub trait SightWorld: WorldView + Sized + 'static {
    type Object: Copy + Ord + Debug + 'static;

    fn object_pose(&self, object: Self::Object) -> Option<Pose>;

    fn agent_pose(&self, agent: Self::Agent) -> Option<Pose>;

    /// Pose of the agent's head bone, when it is rigged.
    fn head_pose(&self, _agent: Self::Agent) -> Option<Pose> {
        None
    }

    /// Local offset of the object's collider center from its pose.
    fn center_offset(&self, _object: Self::Object) -> Option<Vec3> {
        None
    }

    /// First collider hit along the ray.
    fn raycast(&self, query: &RayQuery) -> Option<RayHit<Self::Object>>;
}
