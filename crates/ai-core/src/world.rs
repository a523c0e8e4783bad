use core::fmt::Debug;

/// Stable identifier for the agent that invokes a tree or owns a perception.
///
/// Deterministic simulation requires:
/// - stable ordering (`Ord`), so per-agent containers iterate the same way every run
/// - a stable numeric ID (`stable_id`) for seeding RNG streams and traces
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        u64::from(self)
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Read-only world access.
///
/// The kernel does not prescribe which queries a world must expose; subsystems (perception,
/// behavior trees, etc.) define extension traits on top of this one.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink. Actions receive the world mutably, conditions never do.
pub trait WorldMut: WorldView {}
