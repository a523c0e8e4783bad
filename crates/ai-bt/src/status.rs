#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of evaluating a node.
///
/// `None` means "never evaluated" or "structurally invalid" and is kept distinct from `Fail` so
/// abort logic can tell an untouched node from one that explicitly failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Return {
    #[default]
    None,
    Fail,
    Success,
    Running,
}

impl Return {
    /// `Success` or `Fail`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Return::Success | Return::Fail)
    }

    pub fn is_running(self) -> bool {
        self == Return::Running
    }

    /// Swap `Success` and `Fail`; everything else passes through.
    pub fn invert(self) -> Self {
        match self {
            Return::Success => Return::Fail,
            Return::Fail => Return::Success,
            other => other,
        }
    }

    /// Stable numeric code used in trace events.
    pub fn code(self) -> u64 {
        match self {
            Return::None => 0,
            Return::Fail => 1,
            Return::Success => 2,
            Return::Running => 3,
        }
    }
}
