#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use ai_core::{WorldMut, WorldView};
use ai_perception::{
    Perception, PerceptionWorld, Pose, Quat, RayHit, RayQuery, SightWorld, Vec3,
};

pub const OBSERVER: u64 = 1;
pub const TARGET: u32 = 7;
pub const WALL: u32 = 9;

#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub radius: f32,
    pub layer: u8,
    pub trigger: bool,
}

/// Flat test arena: sphere colliders, agents facing along their yaw.
#[derive(Debug, Default)]
pub struct Field {
    pub objects: BTreeMap<u32, (Pose, Collider)>,
    pub agents: BTreeMap<u64, Pose>,
    pub heads: BTreeMap<u64, Pose>,
    pub offsets: BTreeMap<u32, Vec3>,
    pub perceptions: BTreeMap<u64, Perception<Field>>,
}

impl Field {
    /// Observer at the origin looking down `+z`.
    pub fn new() -> Self {
        let mut field = Self::default();
        field.agents.insert(OBSERVER, Pose::at(Vec3::ZERO));
        field
    }

    pub fn place(&mut self, object: u32, position: Vec3) {
        self.place_with(
            object,
            position,
            Collider {
                radius: 0.5,
                layer: 0,
                trigger: false,
            },
        );
    }

    pub fn place_with(&mut self, object: u32, position: Vec3, collider: Collider) {
        self.objects.insert(object, (Pose::at(position), collider));
    }

    pub fn destroy(&mut self, object: u32) {
        self.objects.remove(&object);
    }
}

impl WorldView for Field {
    type Agent = u64;
}

impl WorldMut for Field {}

impl SightWorld for Field {
    type Object = u32;

    fn object_pose(&self, object: u32) -> Option<Pose> {
        self.objects.get(&object).map(|(pose, _)| *pose)
    }

    fn agent_pose(&self, agent: u64) -> Option<Pose> {
        self.agents.get(&agent).copied()
    }

    fn head_pose(&self, agent: u64) -> Option<Pose> {
        self.heads.get(&agent).copied()
    }

    fn center_offset(&self, object: u32) -> Option<Vec3> {
        self.offsets.get(&object).copied()
    }

    fn raycast(&self, query: &RayQuery) -> Option<RayHit<u32>> {
        self.objects
            .iter()
            .filter(|(_, (_, c))| query.layer_mask.contains(c.layer))
            .filter(|(_, (_, c))| query.hit_triggers || !c.trigger)
            .filter_map(|(&object, (pose, c))| {
                let center = pose.position + self.center_offset(object).unwrap_or(Vec3::ZERO);
                let oc = center - query.origin;
                let along = oc.dot(query.direction);
                if along < 0.0 {
                    return None;
                }
                let miss_sq = oc.length_squared() - along * along;
                let r_sq = c.radius * c.radius;
                if miss_sq > r_sq {
                    return None;
                }
                let distance = (along - (r_sq - miss_sq).sqrt()).max(0.0);
                if distance > query.max_distance {
                    return None;
                }
                Some(RayHit {
                    object,
                    point: query.origin + query.direction * distance,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl PerceptionWorld for Field {
    fn perception(&self, agent: u64) -> Option<&Perception<Self>> {
        self.perceptions.get(&agent)
    }
}

/// Point `distance` away from the origin, `degrees` of yaw off `+z`.
pub fn at_angle(distance: f32, degrees: f32) -> Vec3 {
    Quat::from_yaw_degrees(degrees) * Vec3::new(0.0, 0.0, distance)
}

pub type Events = Rc<RefCell<Vec<(bool, u32)>>>;

pub fn recorder() -> (Events, impl FnMut(bool, u32) + 'static) {
    let events: Events = Rc::default();
    let sink = Rc::clone(&events);
    (events, move |visible, target| {
        sink.borrow_mut().push((visible, target))
    })
}
