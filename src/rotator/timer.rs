use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Recurring timers driven by the host's event loop.
///
/// Instead of invoking callbacks, `advance` reports which handles fired
/// so the owner can dispatch on the same thread.
pub trait TimerService {
    fn schedule(&mut self, period: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
    /// Moves time forward by `dt` and returns every firing, in order.
    /// A handle appears once per elapsed period.
    fn advance(&mut self, dt: Duration) -> Vec<TimerHandle>;
}

struct Interval {
    handle: TimerHandle,
    period: Duration,
    elapsed: Duration, // time since the last firing
}

// --- Frame-time accumulating timer ---
#[derive(Default)]
pub struct IntervalTimer {
    next_id: u64,
    intervals: Vec<Interval>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerService for IntervalTimer {
    fn schedule(&mut self, period: Duration) -> TimerHandle {
        assert!(!period.is_zero(), "interval period must be non-zero");
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.intervals.push(Interval { handle, period, elapsed: Duration::ZERO });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.intervals.retain(|i| i.handle != handle);
    }

    fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        let mut fired = Vec::new();
        for interval in self.intervals.iter_mut() {
            interval.elapsed += dt;
            // Keep the remainder so ticks don't drift with the frame rate
            while interval.elapsed >= interval.period {
                interval.elapsed -= interval.period;
                fired.push(interval.handle);
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_elapsed_period() {
        let mut timer = IntervalTimer::new();
        let handle = timer.schedule(Duration::from_millis(100));

        assert!(timer.advance(Duration::from_millis(60)).is_empty());
        assert_eq!(timer.advance(Duration::from_millis(60)), vec![handle]);
        // 20ms carried over from the previous frame
        assert_eq!(timer.advance(Duration::from_millis(280)), vec![handle, handle, handle]);
    }

    #[test]
    fn cancelled_handles_never_fire() {
        let mut timer = IntervalTimer::new();
        let kept = timer.schedule(Duration::from_millis(10));
        let cancelled = timer.schedule(Duration::from_millis(10));
        timer.cancel(cancelled);

        assert_eq!(timer.advance(Duration::from_millis(10)), vec![kept]);
    }

    #[test]
    fn cancelling_twice_is_harmless() {
        let mut timer = IntervalTimer::new();
        let handle = timer.schedule(Duration::from_millis(10));
        timer.cancel(handle);
        timer.cancel(handle);
        assert!(timer.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn handles_are_unique() {
        let mut timer = IntervalTimer::new();
        let a = timer.schedule(Duration::from_millis(5));
        timer.cancel(a);
        let b = timer.schedule(Duration::from_millis(5));
        assert_ne!(a, b);
    }
}
