use ai_core::{AgentId, DeterministicRng, SplitMix64, TickContext};
use proptest::prelude::*;

#[test]
fn same_seed_same_stream() {
    let mut a = SplitMix64::new(42);
    let mut b = SplitMix64::new(42);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn agent_streams_differ() {
    let ctx = TickContext::new(0, 0.1, 7);
    let mut a = ctx.rng_for_agent(1u64, 0);
    let mut b = ctx.rng_for_agent(2u64, 0);
    assert_ne!(a.next_u64(), b.next_u64());
    assert_eq!(3u32.stable_id(), 3);
}

#[test]
fn next_below_degenerate_bounds() {
    let mut rng = SplitMix64::new(1);
    assert_eq!(rng.next_below(0), 0);
    assert_eq!(rng.next_below(1), 0);
}

#[test]
fn permutations_vary_across_draws() {
    let mut rng = SplitMix64::new(99);
    let first = rng.permutation(6);
    let differs = (0..32).any(|_| rng.permutation(6) != first);
    assert!(differs);
}

proptest! {
    #[test]
    fn permutation_covers_every_index_once(seed in any::<u64>(), len in 0usize..32) {
        let mut rng = SplitMix64::new(seed);
        let mut order = rng.permutation(len);
        prop_assert_eq!(order.len(), len);
        order.sort_unstable();
        prop_assert_eq!(order, (0..len).collect::<Vec<_>>());
    }

    #[test]
    fn next_below_stays_in_range(seed in any::<u64>(), bound in 1u64..1000) {
        let mut rng = SplitMix64::new(seed);
        prop_assert!(rng.next_below(bound) < bound);
    }
}
