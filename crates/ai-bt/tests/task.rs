mod common;

use ai_bt::{ActionPhase, GraphBuilder, Return};
use ai_core::ActionStatus;
use ai_tools::{TraceLog, TRACE_LOG};
use common::{driver, flag, step, task, Def, RecordingWorld};

fn phase(bt: &ai_bt::Behavior<RecordingWorld>, key: ai_bt::NodeKey) -> Option<ActionPhase> {
    bt.node_state(key)
        .and_then(|s| s.actions())
        .map(|h| h.phase())
}

#[test]
fn action_starts_one_tick_after_spawn() {
    let mut b = GraphBuilder::<RecordingWorld>::new();
    let a = b.add_child(b.root(), task("a")).unwrap();

    let mut world = RecordingWorld::default();
    let mut bt = driver(b.build());

    assert_eq!(step(&mut bt, &mut world, 1), Return::Running);
    assert!(world.log.is_empty());
    assert_eq!(phase(&bt, a), Some(ActionPhase::Spawned));

    assert_eq!(step(&mut bt, &mut world, 2), Return::Running);
    assert_eq!(world.log, vec!["start:a", "tick:a"]);
    assert_eq!(phase(&bt, a), Some(ActionPhase::Started));

    world.finish("a", ActionStatus::Success);
    assert_eq!(step(&mut bt, &mut world, 3), Return::Success);
    assert_eq!(phase(&bt, a), None);
    assert_eq!(world.count("start:a"), 1);
}

#[test]
fn succeeded_task_is_not_respawned_but_failed_one_is() {
    let mut b = GraphBuilder::<RecordingWorld>::new();
    let par = b.add_child(b.root(), Def::parallel()).unwrap();
    let won = b.add_child(par, task("won")).unwrap();
    let lost = b.add_child(par, task("lost")).unwrap();
    b.add_child(par, task("keepalive")).unwrap();

    let mut world = RecordingWorld::default();
    world.finish("won", ActionStatus::Success);
    world.finish("lost", ActionStatus::Failure);
    let mut bt = driver(b.build());
    bt.blackboard.set(TRACE_LOG, TraceLog::default());

    assert_eq!(step(&mut bt, &mut world, 1), Return::Running);
    assert_eq!(step(&mut bt, &mut world, 2), Return::Running);
    assert_eq!(bt.result_of(won), Return::Success);
    assert_eq!(bt.result_of(lost), Return::Fail);

    assert_eq!(step(&mut bt, &mut world, 3), Return::Running);
    assert_eq!(bt.result_of(won), Return::Success);
    assert_eq!(bt.result_of(lost), Return::Running);

    let log = bt.blackboard.get(TRACE_LOG).unwrap();
    let spawns = |key: ai_bt::NodeKey| {
        log.for_node(key.raw())
            .filter(|e| e.tag == "bt.task.spawn")
            .count()
    };
    assert_eq!(spawns(won), 1);
    assert_eq!(spawns(lost), 2);
}

#[test]
fn false_condition_cancels_started_action() {
    let mut b = GraphBuilder::<RecordingWorld>::new();
    let a = b
        .add_child(b.root(), task("a").when(flag("go")))
        .unwrap();

    let mut world = RecordingWorld::default();
    world.set_flag("go", true);
    let mut bt = driver(b.build());

    assert_eq!(step(&mut bt, &mut world, 1), Return::Running);
    assert_eq!(step(&mut bt, &mut world, 2), Return::Running);

    world.set_flag("go", false);
    assert_eq!(step(&mut bt, &mut world, 3), Return::Fail);
    assert_eq!(world.count("cancel:a"), 1);
    assert_eq!(phase(&bt, a), None);
}

#[test]
fn unstarted_action_is_released_without_cancel() {
    let mut b = GraphBuilder::<RecordingWorld>::new();
    b.add_child(b.root(), task("a").when(flag("go"))).unwrap();

    let mut world = RecordingWorld::default();
    world.set_flag("go", true);
    let mut bt = driver(b.build());

    assert_eq!(step(&mut bt, &mut world, 1), Return::Running);
    world.set_flag("go", false);
    assert_eq!(step(&mut bt, &mut world, 2), Return::Fail);
    assert!(world.log.is_empty());
}

#[test]
fn task_lifecycle_is_traced() {
    let mut b = GraphBuilder::<RecordingWorld>::new();
    let a = b.add_child(b.root(), task("a")).unwrap();

    let mut world = RecordingWorld::default();
    world.finish("a", ActionStatus::Success);
    let mut bt = driver(b.build());
    bt.blackboard.set(TRACE_LOG, TraceLog::default());

    step(&mut bt, &mut world, 1);
    step(&mut bt, &mut world, 2);

    let log = bt.blackboard.get(TRACE_LOG).unwrap();
    let tags: Vec<(&str, u64)> = log
        .for_node(a.raw())
        .map(|e| (e.tag.as_ref(), e.tick))
        .collect();
    assert_eq!(
        tags,
        vec![
            ("bt.task.spawn", 1),
            ("bt.node.result", 1),
            ("bt.task.start", 2),
            ("bt.task.finish", 2),
            ("bt.node.result", 2),
        ]
    );

    let finish = log.tagged("bt.task.finish").next().unwrap();
    assert_eq!(finish.value, 1);
    assert_eq!(log.count("bt.behavior.start"), 1);
    assert_eq!(log.count("bt.behavior.finish"), 1);
}
