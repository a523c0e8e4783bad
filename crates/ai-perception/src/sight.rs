//! Line-of-sight perceptron.
//!
//! A target is visible when it is within the vision distance of the observer's eyes, inside half
//! the field of view of the observer's forward axis, and the first collider a ray from the eyes
//! hits belongs to the target.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use ai_core::TickContext;

use crate::error::ConfigError;
use crate::math::{Pose, Vec3};
use crate::tracker::{Listener, ListenerId, Tracker};
use crate::world::{LayerMask, RayQuery, SightWorld};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SightConfig {
    /// Maximum distance from the eyes, in world units.
    pub vision_distance: f32,
    /// Full cone angle in degrees, `(0, 360]`.
    pub field_of_view: f32,
    pub layer_mask: LayerMask,
}

impl Default for SightConfig {
    fn default() -> Self {
        Self {
            vision_distance: 20.0,
            field_of_view: 120.0,
            layer_mask: LayerMask::ALL,
        }
    }
}

impl SightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.vision_distance.is_finite() || self.vision_distance < 0.0 {
            return Err(ConfigError::VisionDistance(self.vision_distance));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view <= 360.0) {
            return Err(ConfigError::FieldOfView(self.field_of_view));
        }
        Ok(())
    }

    /// Copy with out-of-range values pulled back into range.
    pub fn clamped(self) -> Self {
        let vision_distance = if self.vision_distance.is_finite() {
            self.vision_distance.max(0.0)
        } else {
            0.0
        };
        let field_of_view = if self.field_of_view.is_nan() {
            0.0
        } else {
            self.field_of_view.clamp(0.0, 360.0)
        };
        Self {
            vision_distance,
            field_of_view,
            layer_mask: self.layer_mask,
        }
    }
}

pub struct PerceptronSight<W>
where
    W: SightWorld,
{
    config: SightConfig,
    trackers: BTreeMap<W::Object, Tracker<W::Object>>,
    next_listener: u64,
}

impl<W> PerceptronSight<W>
where
    W: SightWorld,
{
    pub fn new(config: SightConfig) -> Self {
        Self {
            config: config.clamped(),
            trackers: BTreeMap::new(),
            next_listener: 0,
        }
    }

    pub fn config(&self) -> &SightConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SightConfig) {
        self.config = config.clamped();
    }

    pub fn tracker(&self, target: W::Object) -> Option<&Tracker<W::Object>> {
        self.trackers.get(&target)
    }

    /// Targets with at least one listener, in `Object` order.
    pub fn tracked(&self) -> impl Iterator<Item = W::Object> + '_ {
        self.trackers.keys().copied()
    }

    /// Per-frame hook. Sight samples on the fixed step only.
    pub fn update(&mut self, _ctx: &TickContext, _observer: W::Agent, _world: &W) {}

    /// Re-sample every tracked target and fire listeners on visibility changes.
    pub fn fixed_update(&mut self, ctx: &TickContext, observer: W::Agent, world: &W) {
        let config = self.config;
        let mut destroyed = Vec::new();

        for (&target, tracker) in &mut self.trackers {
            let Some(pose) = world.object_pose(target) else {
                if tracker.set_state(false) {
                    tracing::trace!(tick = ctx.tick, ?observer, ?target, "sight lost (destroyed)");
                }
                destroyed.push(target);
                continue;
            };

            tracker.snapshot(pose, world.center_offset(target));
            let visible = check_can_see(&config, observer, world, target, tracker.position());
            if tracker.set_state(visible) {
                tracing::trace!(tick = ctx.tick, ?observer, ?target, visible, "sight changed");
            }
        }

        for target in destroyed {
            self.trackers.remove(&target);
            tracing::trace!(?observer, ?target, "tracker dropped");
        }
    }

    /// Whether `target` is currently visible.
    ///
    /// Tracked targets report the state of their last fixed step, which is `false` between
    /// [`PerceptronSight::start_listen`] and the first fixed step. Untracked targets are tested
    /// once against their current pose without creating a tracker.
    pub fn can_see(&self, observer: W::Agent, world: &W, target: W::Object) -> bool {
        if let Some(tracker) = self.trackers.get(&target) {
            return tracker.is_visible();
        }
        let Some(pose) = world.object_pose(target) else {
            return false;
        };
        let mut probe = Tracker::new(target);
        probe.snapshot(pose, world.center_offset(target));
        check_can_see(&self.config, observer, world, target, probe.position())
    }

    /// Track `target` (if not tracked yet) and register `listener` for its visibility changes.
    pub fn start_listen(&mut self, target: W::Object, listener: Listener<W::Object>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;

        let tracker = self.trackers.entry(target).or_insert_with(|| {
            tracing::trace!(?target, "tracker created");
            Tracker::new(target)
        });
        tracker.add_listener(id, listener);
        id
    }

    /// Remove a listener. The tracker is dropped together with its last listener.
    pub fn stop_listen(&mut self, target: W::Object, id: ListenerId) -> bool {
        let Some(tracker) = self.trackers.get_mut(&target) else {
            return false;
        };
        let removed = tracker.remove_listener(id);
        if tracker.listener_count() == 0 {
            self.trackers.remove(&target);
            tracing::trace!(?target, "tracker dropped");
        }
        removed
    }
}

impl<W> fmt::Debug for PerceptronSight<W>
where
    W: SightWorld,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerceptronSight")
            .field("config", &self.config)
            .field("trackers", &self.trackers)
            .finish()
    }
}

/// Eyes of `observer`: its head bone when rigged, otherwise its own pose.
pub fn eyes<W: SightWorld>(world: &W, observer: W::Agent) -> Option<Pose> {
    world
        .head_pose(observer)
        .or_else(|| world.agent_pose(observer))
}

/// The three-part visibility test against a target centered at `target_position`.
pub fn check_can_see<W: SightWorld>(
    config: &SightConfig,
    observer: W::Agent,
    world: &W,
    target: W::Object,
    target_position: Vec3,
) -> bool {
    let (Some(body), Some(eyes)) = (world.agent_pose(observer), eyes(world, observer)) else {
        return false;
    };

    let to_target = target_position - eyes.position;
    if to_target.length() > config.vision_distance {
        return false;
    }

    let direction = to_target.normalize_or_zero();
    if direction == Vec3::ZERO {
        return false;
    }
    if body.forward().angle_degrees(direction) > config.field_of_view * 0.5 {
        return false;
    }

    let query = RayQuery {
        origin: eyes.position,
        direction,
        max_distance: config.vision_distance,
        layer_mask: config.layer_mask,
        hit_triggers: false,
    };
    world
        .raycast(&query)
        .is_some_and(|hit| hit.object == target)
}
