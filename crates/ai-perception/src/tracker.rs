use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::{Pose, Quat, Vec3};

/// Handle returned when a listener is registered, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ListenerId(pub u64);

/// Called with the new visibility and the target whenever the visibility flips.
pub type Listener<O> = Box<dyn FnMut(bool, O)>;

/// One observed target: its pose sampled once per fixed step and an edge-triggered flag.
pub struct Tracker<O>
where
    O: Copy,
{
    target: O,
    position: Vec3,
    rotation: Quat,
    visible: bool,
    listeners: Vec<(ListenerId, Listener<O>)>,
}

impl<O> Tracker<O>
where
    O: Copy,
{
    pub fn new(target: O) -> Self {
        Self {
            target,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            visible: false,
            listeners: Vec::new(),
        }
    }

    pub fn target(&self) -> O {
        self.target
    }

    /// Collider center at the last snapshot.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Record the target's pose, shifted to its collider center.
    pub fn snapshot(&mut self, pose: Pose, center_offset: Option<Vec3>) {
        let offset = center_offset.map_or(Vec3::ZERO, |o| pose.rotation * o);
        self.position = pose.position + offset;
        self.rotation = pose.rotation;
    }

    /// Store `visible`, invoking every listener in registration order if it changed.
    ///
    /// Returns whether a transition happened.
    pub fn set_state(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        let target = self.target;
        for (_, listener) in &mut self.listeners {
            listener(visible, target);
        }
        true
    }

    pub fn add_listener(&mut self, id: ListenerId, listener: Listener<O>) {
        self.listeners.push((id, listener));
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}

impl<O> fmt::Debug for Tracker<O>
where
    O: Copy + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("target", &self.target)
            .field("position", &self.position)
            .field("visible", &self.visible)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
