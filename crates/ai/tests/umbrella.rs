#![cfg(feature = "full")]

use std::sync::Arc;

use ai::bt::{Behavior, BehaviorConfig, GraphBuilder, NodeDef, Return};
use ai::core::{TickContext, WorldMut, WorldView};
use ai::tools::{TraceLog, TRACE_LOG};

struct World;

impl WorldView for World {
    type Agent = u64;
}

impl WorldMut for World {}

#[test]
fn reexports_drive_a_traced_tree() {
    let mut b = GraphBuilder::<World>::new();
    b.add_child(b.root(), NodeDef::task()).unwrap();

    let mut behavior = Behavior::new(1, Arc::new(b.build())).with_config(BehaviorConfig {
        run_on_start: false,
        ..BehaviorConfig::default()
    });
    behavior.blackboard.set(TRACE_LOG, TraceLog::default());
    behavior.start_executing();

    let result = behavior.tick(&TickContext::new(0, 0.1, 0), &mut World);
    assert_eq!(result, Some(Return::Success));
    assert_eq!(
        behavior.blackboard.get(TRACE_LOG).map(|log| log.count("bt.behavior.finish")),
        Some(1)
    );
}

#[test]
fn perception_defaults_are_reachable() {
    let config = ai::perception::SightConfig::default();
    assert_eq!(config.vision_distance, 20.0);
    assert!(config.validate().is_ok());
}
