mod common;

use std::sync::Arc;

use ai_bt::{BehaviorGraph, GraphBuilder, NodeKind, Return};
use ai_core::{ActionStatus, DataType};
use common::{driver, flag, step, task, Def, RecordingWorld};

fn inner() -> Arc<BehaviorGraph<RecordingWorld>> {
    let mut b = GraphBuilder::new();
    b.add_child(b.root(), task("inner")).unwrap();
    b.declare("target", DataType::Object)
        .declare("speed", DataType::Float);
    Arc::new(b.build())
}

#[test]
fn subgraph_executes_nested_root() {
    let mut b = GraphBuilder::<RecordingWorld>::new();
    let seq = b.add_child(b.root(), Def::sequence()).unwrap();
    let sub = b.add_child(seq, Def::subgraph(inner())).unwrap();
    b.add_child(seq, task("after")).unwrap();

    let mut world = RecordingWorld::default();
    world.finish("inner", ActionStatus::Success);
    let mut bt = driver(b.build());

    assert_eq!(step(&mut bt, &mut world, 1), Return::Running);
    assert_eq!(bt.result_of(sub), Return::Running);
    let nested = bt.node_state(sub).and_then(|s| s.subgraph()).unwrap();
    assert!(!nested.is_empty());

    assert_eq!(step(&mut bt, &mut world, 2), Return::Running);
    assert_eq!(bt.result_of(sub), Return::Success);
    assert_eq!(world.log, vec!["start:inner", "tick:inner"]);
}

#[test]
fn two_references_to_one_graph_keep_separate_state() {
    let shared = inner();
    let mut b = GraphBuilder::<RecordingWorld>::new();
    let par = b.add_child(b.root(), Def::parallel()).unwrap();
    b.add_child(par, Def::subgraph(Arc::clone(&shared))).unwrap();
    b.add_child(par, Def::subgraph(shared)).unwrap();

    let mut world = RecordingWorld::default();
    let mut bt = driver(b.build());

    step(&mut bt, &mut world, 1);
    step(&mut bt, &mut world, 2);
    assert_eq!(world.count("start:inner"), 2);
    assert_eq!(world.count("tick:inner"), 2);
}

#[test]
fn missing_or_gated_subgraph_fails() {
    let mut b = GraphBuilder::<RecordingWorld>::new();
    b.add_child(b.root(), Def::new(NodeKind::SubGraph(None)))
        .unwrap();
    let mut world = RecordingWorld::default();
    let mut bt = driver(b.build());
    assert_eq!(step(&mut bt, &mut world, 1), Return::Fail);

    let mut b = GraphBuilder::<RecordingWorld>::new();
    b.add_child(b.root(), Def::subgraph(inner()).when(flag("enabled")))
        .unwrap();
    let mut bt = driver(b.build());
    assert_eq!(step(&mut bt, &mut world, 1), Return::Fail);
    assert!(world.log.is_empty());
}

#[test]
fn aborting_subgraph_cancels_nested_actions() {
    let mut b = GraphBuilder::<RecordingWorld>::new();
    let sel = b.add_child(b.root(), Def::selector()).unwrap();
    b.add_child(sel, Def::task().when(flag("stop"))).unwrap();
    let sub = b.add_child(sel, Def::subgraph(inner())).unwrap();

    let mut world = RecordingWorld::default();
    let mut bt = driver(b.build());
    step(&mut bt, &mut world, 1);
    step(&mut bt, &mut world, 2);

    world.set_flag("stop", true);
    assert_eq!(step(&mut bt, &mut world, 3), Return::Success);
    assert_eq!(world.count("cancel:inner"), 1);
    assert!(bt.node_state(sub).is_none());
}

#[test]
fn blackboard_schema_includes_nested_graphs() {
    let mut b = GraphBuilder::<RecordingWorld>::new();
    b.declare("speed", DataType::Int);
    b.add_child(b.root(), Def::subgraph(inner())).unwrap();
    let graph = b.build();

    assert_eq!(graph.own_blackboard().len(), 1);

    let schema = graph.blackboard();
    let names: Vec<&str> = schema.iter().map(|v| v.name.as_ref()).collect();
    assert_eq!(names, vec!["speed", "target"]);
    assert_eq!(schema.get("speed").map(|v| &v.data_type), Some(&DataType::Int));
}
