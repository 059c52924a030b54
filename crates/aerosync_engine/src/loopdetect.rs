//! Loop detection and window recovery.

use aerosync_store::SyncState;

/// Watches planning outcomes and shrinks the window when a session
/// stops making natural progress.
///
/// A "zero progress" observation is a plan where items were available
/// but none fit the byte budget (the planner's forced single-item batch
/// counts as zero natural progress). After a threshold of consecutive
/// such observations the window shrinks by a fixed step, down to a
/// floor of one, guaranteeing the next plans eventually converge on
/// batches the budget can carry.
#[derive(Debug, Clone, Copy)]
pub struct LoopDetector {
    threshold: u32,
    shrink_step: u32,
}

/// The window never shrinks below a single item.
pub const WINDOW_FLOOR: u32 = 1;

impl LoopDetector {
    /// Creates a detector with the given threshold and shrink step.
    pub fn new(threshold: u32, shrink_step: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            shrink_step: shrink_step.max(1),
        }
    }

    /// Records one planning outcome against the session state and
    /// returns the window size the *next* plan should use.
    ///
    /// `selected` is the naturally selected count: callers pass zero for
    /// a forced batch. Counters reset whenever natural progress is made
    /// (or nothing was available to select).
    pub fn observe(&self, state: &mut SyncState, available: usize, selected: usize) -> u32 {
        if available > 0 && selected == 0 {
            state.zero_progress_count += 1;
            if state.zero_progress_count >= self.threshold {
                let shrunk = state
                    .window_size
                    .saturating_sub(self.shrink_step)
                    .max(WINDOW_FLOOR);
                tracing::warn!(
                    window = state.window_size,
                    shrunk,
                    "zero-progress threshold reached, shrinking window"
                );
                state.window_size = shrunk;
                state.zero_progress_count = 0;
            }
        } else {
            state.zero_progress_count = 0;
        }
        state.window_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(window: u32) -> SyncState {
        SyncState::initial(window)
    }

    #[test]
    fn progress_resets_counter() {
        let detector = LoopDetector::new(3, 5);
        let mut s = state(50);

        detector.observe(&mut s, 10, 0);
        detector.observe(&mut s, 10, 0);
        assert_eq!(s.zero_progress_count, 2);

        detector.observe(&mut s, 10, 4);
        assert_eq!(s.zero_progress_count, 0);
        assert_eq!(s.window_size, 50);
    }

    #[test]
    fn nothing_available_is_not_zero_progress() {
        let detector = LoopDetector::new(3, 5);
        let mut s = state(50);
        for _ in 0..10 {
            detector.observe(&mut s, 0, 0);
        }
        assert_eq!(s.zero_progress_count, 0);
        assert_eq!(s.window_size, 50);
    }

    #[test]
    fn threshold_shrinks_window_and_resets_counter() {
        let detector = LoopDetector::new(3, 5);
        let mut s = state(50);

        assert_eq!(detector.observe(&mut s, 2, 0), 50);
        assert_eq!(detector.observe(&mut s, 2, 0), 50);
        // Third consecutive observation crosses the threshold.
        assert_eq!(detector.observe(&mut s, 2, 0), 45);
        assert_eq!(s.zero_progress_count, 0);
    }

    #[test]
    fn window_shrinks_strictly_down_to_floor() {
        let detector = LoopDetector::new(1, 5);
        let mut s = state(12);

        let mut previous = s.window_size;
        loop {
            let next = detector.observe(&mut s, 1, 0);
            if next == WINDOW_FLOOR {
                break;
            }
            assert!(next < previous);
            previous = next;
        }
        // Once at the floor, it stays there.
        assert_eq!(detector.observe(&mut s, 1, 0), WINDOW_FLOOR);
    }

    #[test]
    fn shrink_applies_to_the_next_plan() {
        let detector = LoopDetector::new(2, 5);
        let mut s = state(20);

        detector.observe(&mut s, 3, 0);
        // The first observation leaves the current window in place.
        assert_eq!(s.window_size, 20);
        let next = detector.observe(&mut s, 3, 0);
        assert_eq!(next, 15);
        assert_eq!(s.window_size, 15);
    }
}
