//! Decorator strategies.
//!
//! A decorator wraps exactly one child and transforms or gates its result. The strategies are a
//! closed set evaluated in one place (`exec::update_decorator`); this module only describes them
//! and the bookkeeping they need when their node is aborted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use ai_core::WorldMut;

use crate::state::NodeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DecoratorKind {
    /// Swap `Success` and `Fail`; `Running` passes through.
    Invert,
    /// Any terminal child result becomes `Fail`.
    AlwaysFail,
    /// Any terminal child result becomes `Success`.
    AlwaysSuccess,
    /// Execute the child for its side effects and always report `Running`.
    AlwaysRunning,
    /// Replay the first terminal result without executing the child again.
    Once,
    /// Re-run the child until it reached a terminal result `count` times. `0` repeats forever.
    Repeater { count: u32 },
    /// Re-run the child while it fails; succeed once it succeeds.
    RepeatWhileFail,
    /// Re-run the child while it succeeds; fail once it fails.
    RepeatWhileSuccess,
}

impl DecoratorKind {
    pub fn repeat(count: u32) -> Self {
        DecoratorKind::Repeater { count }
    }

    pub fn repeat_forever() -> Self {
        DecoratorKind::Repeater { count: 0 }
    }

    /// Whether the strategy re-runs its child and tracks passes.
    pub fn is_repeating(self) -> bool {
        matches!(
            self,
            DecoratorKind::Repeater { .. }
                | DecoratorKind::RepeatWhileFail
                | DecoratorKind::RepeatWhileSuccess
        )
    }

    /// Called before the node's subtree is aborted and its state reset. Returns the passes the
    /// abort discards.
    pub(crate) fn on_abort<W>(self, state: &mut NodeState<W>) -> u32
    where
        W: WorldMut + 'static,
    {
        if self.is_repeating() {
            std::mem::take(&mut state.pass_count)
        } else {
            0
        }
    }
}
