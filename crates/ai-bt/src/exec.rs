//! Tree evaluation.
//!
//! Every node kind is dispatched from `update_node`. Evaluation reads the graph immutably and
//! records results into the caller's [`StateTable`], so one graph can drive many agents.

use ai_core::{ActionOutcome, Blackboard, DeterministicRng, SplitMix64, TickContext, WorldMut};
use ai_tools::{emit as trace_emit, TraceEvent};

use crate::decorator::DecoratorKind;
use crate::graph::BehaviorGraph;
use crate::node::{CompositeKind, ConditionMode, Node, NodeKey, NodeKind};
use crate::state::{ActionHandle, ActionPhase, StateTable};
use crate::status::Return;

/// Everything a node may touch while it is evaluated, besides the state table.
pub(crate) struct Exec<'a, W>
where
    W: WorldMut + 'static,
{
    pub ctx: &'a TickContext,
    pub agent: W::Agent,
    pub world: &'a mut W,
    pub blackboard: &'a mut Blackboard,
    pub rng: &'a mut SplitMix64,
}

impl<W> Exec<'_, W>
where
    W: WorldMut + 'static,
{
    fn trace(&mut self, tag: &'static str, node: NodeKey, value: u64) {
        trace_emit(
            self.blackboard,
            TraceEvent::new(self.ctx.tick, tag)
                .with_node(node.raw())
                .with_value(value),
        );
    }
}

/// Evaluate `key` and record the result under its identity.
pub(crate) fn execute<W>(
    graph: &BehaviorGraph<W>,
    key: NodeKey,
    table: &mut StateTable<W>,
    exec: &mut Exec<'_, W>,
) -> Return
where
    W: WorldMut + 'static,
{
    let Some(node) = graph.node(key) else {
        return Return::None;
    };

    let previous = table.result(key);
    let result = update_node(graph, node, table, exec);
    table.entry(key).result = result;
    if result != previous {
        exec.trace("bt.node.result", key, result.code());
    }
    result
}

/// Stop `key` and its whole subtree and forget their state.
///
/// A node whose state is already `None` is left alone, which makes repeated aborts free.
pub(crate) fn abort_node<W>(
    graph: &BehaviorGraph<W>,
    key: NodeKey,
    table: &mut StateTable<W>,
    exec: &mut Exec<'_, W>,
) where
    W: WorldMut + 'static,
{
    let Some(node) = graph.node(key) else {
        return;
    };
    if table.result(key) == Return::None {
        return;
    }

    let mut discarded = 0;
    match &node.kind {
        NodeKind::Decorator(Some(kind)) => {
            discarded = u64::from(kind.on_abort(table.entry(key)));
        }
        NodeKind::Task => {
            if let Some(handle) = table.entry(key).actions.take() {
                cancel_handle(handle, exec);
            }
        }
        NodeKind::SubGraph(Some(sub)) => {
            if let Some(mut nested) = table.entry(key).subgraph.take() {
                abort_node(sub, sub.root(), &mut nested, exec);
            }
        }
        _ => {}
    }

    for &child in &node.outputs {
        abort_node(graph, child, table, exec);
    }

    table.reset(key);
    exec.trace("bt.node.abort", key, discarded);
}

/// Empty `table`, cancelling every started action it still holds, nested sub-graph tables
/// included.
///
/// Works on the records alone, so it is safe after the graph that produced them was swapped.
pub(crate) fn discard_table<W>(table: &mut StateTable<W>, exec: &mut Exec<'_, W>)
where
    W: WorldMut + 'static,
{
    for mut state in table.drain() {
        if let Some(handle) = state.actions.take() {
            cancel_handle(handle, exec);
        }
        if let Some(mut nested) = state.subgraph.take() {
            discard_table(&mut nested, exec);
        }
    }
}

fn cancel_handle<W>(mut handle: ActionHandle<W>, exec: &mut Exec<'_, W>)
where
    W: WorldMut + 'static,
{
    // A handle that never started has nothing to stop.
    if handle.phase == ActionPhase::Started {
        handle
            .action
            .cancel(exec.ctx, exec.agent, &mut *exec.world, &mut *exec.blackboard);
    }
}

/// Abort every child of `key`, leaving `key`'s own record intact.
pub(crate) fn reset_output_states<W>(
    graph: &BehaviorGraph<W>,
    key: NodeKey,
    table: &mut StateTable<W>,
    exec: &mut Exec<'_, W>,
) where
    W: WorldMut + 'static,
{
    let Some(node) = graph.node(key) else {
        return;
    };
    for &child in &node.outputs {
        abort_node(graph, child, table, exec);
    }
}

fn update_node<W>(
    graph: &BehaviorGraph<W>,
    node: &Node<W>,
    table: &mut StateTable<W>,
    exec: &mut Exec<'_, W>,
) -> Return
where
    W: WorldMut + 'static,
{
    match &node.kind {
        NodeKind::Root => match node.outputs.as_slice() {
            [child] => execute(graph, *child, table, exec),
            _ => Return::None,
        },
        NodeKind::Composite(kind) => update_composite(graph, node, *kind, table, exec),
        NodeKind::Decorator(kind) => update_decorator(graph, node, *kind, table, exec),
        NodeKind::Task => update_task(graph, node, table, exec),
        NodeKind::SubGraph(sub) => {
            if !conditions_hold(node, table, exec) {
                abort_node(graph, node.key, table, exec);
                return Return::Fail;
            }
            let Some(sub) = sub.as_deref() else {
                return Return::Fail;
            };

            let mut nested = table.entry(node.key).subgraph.take().unwrap_or_default();
            let result = sub.execute(&mut nested, exec);
            table.entry(node.key).subgraph = Some(nested);
            result
        }
    }
}

fn conditions_hold<W>(node: &Node<W>, table: &StateTable<W>, exec: &Exec<'_, W>) -> bool
where
    W: WorldMut + 'static,
{
    let Some(conditions) = node.conditions.as_ref() else {
        return true;
    };
    if node.condition_mode == ConditionMode::AllowToComplete
        && table.result(node.key).is_running()
    {
        return true;
    }
    conditions.check(exec.ctx, exec.agent, &*exec.world, &*exec.blackboard)
}

fn update_composite<W>(
    graph: &BehaviorGraph<W>,
    node: &Node<W>,
    kind: CompositeKind,
    table: &mut StateTable<W>,
    exec: &mut Exec<'_, W>,
) -> Return
where
    W: WorldMut + 'static,
{
    if !conditions_hold(node, table, exec) {
        abort_node(graph, node.key, table, exec);
        return Return::Fail;
    }

    if kind == CompositeKind::Parallel {
        return run_parallel(graph, node, table, exec);
    }

    let order = traversal_order(node, kind, table, exec);
    match kind {
        CompositeKind::Selector | CompositeKind::RandomSelector => {
            for (pos, &index) in order.iter().enumerate() {
                let result = execute(graph, node.outputs[index], table, exec);
                if matches!(result, Return::Success | Return::Running) {
                    abort_children(graph, node, &order[pos + 1..], table, exec);
                    return result;
                }
            }
            Return::Fail
        }
        CompositeKind::Sequence | CompositeKind::RandomSequence => {
            for (pos, &index) in order.iter().enumerate() {
                match execute(graph, node.outputs[index], table, exec) {
                    Return::Success => {}
                    Return::Running => {
                        abort_children(graph, node, &order[pos + 1..], table, exec);
                        return Return::Running;
                    }
                    Return::Fail | Return::None => {
                        // The failing child is aborted along with everything after it.
                        abort_children(graph, node, &order[pos..], table, exec);
                        return Return::Fail;
                    }
                }
            }
            Return::Success
        }
        CompositeKind::Parallel => unreachable!("parallel handled above"),
    }
}

/// Child indices in evaluation order.
///
/// Random composites draw a fresh permutation whenever they start a new activation (the last
/// recorded result is not `Running`) or the cached order no longer matches the child count.
fn traversal_order<W>(
    node: &Node<W>,
    kind: CompositeKind,
    table: &mut StateTable<W>,
    exec: &mut Exec<'_, W>,
) -> Vec<usize>
where
    W: WorldMut + 'static,
{
    let count = node.outputs.len();
    if !kind.is_random() {
        return (0..count).collect();
    }

    let state = table.entry(node.key);
    if !state.result.is_running() || state.shuffled_order.len() != count {
        state.shuffled_order = exec.rng.permutation(count);
    }
    state.shuffled_order.clone()
}

fn abort_children<W>(
    graph: &BehaviorGraph<W>,
    node: &Node<W>,
    indices: &[usize],
    table: &mut StateTable<W>,
    exec: &mut Exec<'_, W>,
) where
    W: WorldMut + 'static,
{
    for &index in indices {
        abort_node(graph, node.outputs[index], table, exec);
    }
}

fn run_parallel<W>(
    graph: &BehaviorGraph<W>,
    node: &Node<W>,
    table: &mut StateTable<W>,
    exec: &mut Exec<'_, W>,
) -> Return
where
    W: WorldMut + 'static,
{
    if node.outputs.is_empty() {
        return Return::Success;
    }

    let mut running = false;
    let mut succeeded = false;
    for &child in &node.outputs {
        match execute(graph, child, table, exec) {
            Return::Running => running = true,
            Return::Success => succeeded = true,
            Return::Fail | Return::None => {}
        }
    }

    if running {
        Return::Running
    } else if succeeded {
        Return::Success
    } else {
        Return::Fail
    }
}

fn update_decorator<W>(
    graph: &BehaviorGraph<W>,
    node: &Node<W>,
    kind: Option<DecoratorKind>,
    table: &mut StateTable<W>,
    exec: &mut Exec<'_, W>,
) -> Return
where
    W: WorldMut + 'static,
{
    let Some(kind) = kind else {
        return Return::Fail;
    };
    let &[child] = node.outputs.as_slice() else {
        return Return::Fail;
    };

    match kind {
        DecoratorKind::Invert => execute(graph, child, table, exec).invert(),
        DecoratorKind::AlwaysFail => match execute(graph, child, table, exec) {
            Return::Running => Return::Running,
            _ => Return::Fail,
        },
        DecoratorKind::AlwaysSuccess => match execute(graph, child, table, exec) {
            Return::Running => Return::Running,
            _ => Return::Success,
        },
        DecoratorKind::AlwaysRunning => {
            execute(graph, child, table, exec);
            Return::Running
        }
        DecoratorKind::Once => {
            let previous = table.result(node.key);
            if previous.is_terminal() {
                return previous;
            }
            execute(graph, child, table, exec)
        }
        DecoratorKind::Repeater { count } => {
            let passes = table.get(node.key).map_or(0, |s| s.pass_count);
            if count > 0 && passes >= count {
                return Return::Success;
            }

            match execute(graph, child, table, exec) {
                Return::Success | Return::Fail => {
                    let passes = count_pass(node.key, table);
                    if count > 0 && passes >= count {
                        Return::Success
                    } else {
                        reset_output_states(graph, node.key, table, exec);
                        Return::Running
                    }
                }
                other => other,
            }
        }
        DecoratorKind::RepeatWhileFail => match execute(graph, child, table, exec) {
            Return::Fail => {
                count_pass(node.key, table);
                reset_output_states(graph, node.key, table, exec);
                Return::Running
            }
            other => other,
        },
        DecoratorKind::RepeatWhileSuccess => match execute(graph, child, table, exec) {
            Return::Success => {
                count_pass(node.key, table);
                reset_output_states(graph, node.key, table, exec);
                Return::Running
            }
            other => other,
        },
    }
}

fn count_pass<W>(key: NodeKey, table: &mut StateTable<W>) -> u32
where
    W: WorldMut + 'static,
{
    let state = table.entry(key);
    state.pass_count = state.pass_count.saturating_add(1);
    state.pass_count
}

fn update_task<W>(
    graph: &BehaviorGraph<W>,
    node: &Node<W>,
    table: &mut StateTable<W>,
    exec: &mut Exec<'_, W>,
) -> Return
where
    W: WorldMut + 'static,
{
    if !conditions_hold(node, table, exec) {
        abort_node(graph, node.key, table, exec);
        return Return::Fail;
    }
    let Some(template) = node.actions.as_ref() else {
        return Return::Success;
    };

    let state = table.entry(node.key);
    if state.result == Return::Success {
        return Return::Success;
    }

    let Some(handle) = state.actions.as_mut() else {
        let action = template.spawn(exec.ctx, exec.agent, &*exec.world, &*exec.blackboard);
        state.actions = Some(ActionHandle::spawned(action));
        exec.trace("bt.task.spawn", node.key, 0);
        return Return::Running;
    };

    if handle.phase == ActionPhase::Spawned {
        handle.phase = ActionPhase::Started;
        exec.trace("bt.task.start", node.key, 0);
    }

    let status = handle
        .action
        .tick(exec.ctx, exec.agent, &mut *exec.world, &mut *exec.blackboard);
    let Some(outcome) = status.outcome() else {
        return Return::Running;
    };

    state.actions = None;
    exec.trace("bt.task.finish", node.key, u64::from(outcome == ActionOutcome::Success));
    match outcome {
        ActionOutcome::Success => Return::Success,
        ActionOutcome::Failure => Return::Fail,
    }
}
