//! Property tests for frame-index arithmetic

use faultline_runtime::{FaultSnapshot, NativeTable, Runtime};
use proptest::prelude::*;

fn runtime(cip: u32, stack: Vec<u32>) -> Runtime {
    Runtime::new("prop.smx", NativeTable::new()).with_context(FaultSnapshot::new(cip, stack))
}

/// Expected address at `level >= 1`, straight from the definition
fn expected_at(stack: &[u32], start_marker: usize, level: usize) -> Option<u32> {
    let depth = stack.len() as i64;
    if depth <= 0 {
        return None;
    }
    let index = (depth - 1) - (level as i64 - 1);
    if index < start_marker as i64 {
        return None;
    }
    Some(stack[index as usize])
}

proptest! {
    #[test]
    fn level_zero_is_always_cip(
        cip in any::<u32>(),
        stack in prop::collection::vec(any::<u32>(), 0..16),
        start_marker in 0usize..20,
    ) {
        let rt = runtime(cip, stack);
        let mut walker = rt.trace(0, None, start_marker);
        prop_assert_eq!(walker.next_frame().map(|f| f.address), Some(cip));
    }

    #[test]
    fn steps_follow_index_rule(
        stack in prop::collection::vec(any::<u32>(), 0..16),
        start_marker in 0usize..20,
    ) {
        let rt = runtime(0, stack.clone());
        let mut walker = rt.trace(0, None, start_marker);
        prop_assert!(walker.skip_frame());

        for level in 1..stack.len() + 3 {
            let expected = expected_at(&stack, start_marker, level);
            let frame = walker.next_frame();
            prop_assert_eq!(frame.map(|f| f.address), expected);
            if expected.is_none() {
                break;
            }
        }
    }

    #[test]
    fn frame_count_is_bounded_by_marker(
        stack in prop::collection::vec(any::<u32>(), 0..16),
        start_marker in 0usize..20,
    ) {
        let depth = stack.len();
        let rt = runtime(0, stack);
        let walker = rt.trace(0, None, start_marker);
        prop_assert_eq!(walker.frame_count(), 1 + depth.saturating_sub(start_marker));
    }

    #[test]
    fn probing_matches_resolving(
        stack in prop::collection::vec(any::<u32>(), 0..16),
        start_marker in 0usize..20,
    ) {
        let rt = runtime(7, stack);
        let mut probe = rt.trace(0, None, start_marker);
        let mut resolve = rt.trace(0, None, start_marker);
        loop {
            let a = probe.skip_frame();
            let b = resolve.next_frame().is_some();
            prop_assert_eq!(a, b);
            prop_assert_eq!(probe.level(), resolve.level());
            if !a {
                break;
            }
        }
    }

    #[test]
    fn reset_replays_the_same_frames(
        stack in prop::collection::vec(any::<u32>(), 0..16),
        start_marker in 0usize..20,
        partial in 0usize..8,
    ) {
        let rt = runtime(3, stack);
        let mut walker = rt.trace(0, None, start_marker);
        let full: Vec<_> = walker.by_ref().collect();

        walker.reset_trace();
        for _ in 0..partial {
            walker.skip_frame();
        }
        walker.reset_trace();
        let replay: Vec<_> = walker.by_ref().collect();
        prop_assert_eq!(full, replay);
    }
}
