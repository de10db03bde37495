use std::time::{Duration, Instant};

/// Fixed frame-rate pacing.
///
/// Each frame records its start time; the next frame is due once the target
/// frame duration has elapsed since then. The runtime sleeps in the event loop
/// (`ControlFlow::WaitUntil`) until [`deadline`](Self::deadline).
#[derive(Debug, Clone)]
pub struct FramePacer {
    target: Duration,
    deadline: Instant,
}

impl FramePacer {
    /// Paces to `fps` frames per second. `0` is treated as `1`.
    pub fn new(fps: u32) -> Self {
        Self::with_target(Duration::from_secs(1) / fps.max(1))
    }

    pub fn with_target(target: Duration) -> Self {
        Self {
            target,
            deadline: Instant::now(),
        }
    }

    /// Target duration of one frame.
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Marks the start of a frame at `now`; the next frame is due at `now + target`.
    pub fn begin_frame(&mut self, now: Instant) {
        self.deadline = now + self.target;
    }

    /// Earliest instant at which the next frame should start.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Time left in the current frame budget (zero once due).
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_fps_budget() {
        let pacer = FramePacer::new(60);
        assert_eq!(pacer.target(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn zero_fps_does_not_divide_by_zero() {
        assert_eq!(FramePacer::new(0).target(), Duration::from_secs(1));
    }

    #[test]
    fn frame_is_due_after_target_elapsed() {
        let mut pacer = FramePacer::with_target(Duration::from_millis(16));
        let start = Instant::now();
        pacer.begin_frame(start);

        let early = start + Duration::from_millis(5);
        assert!(!pacer.is_due(early));
        assert_eq!(pacer.remaining(early), Duration::from_millis(11));

        let late = start + Duration::from_millis(20);
        assert!(pacer.is_due(late));
        assert_eq!(pacer.remaining(late), Duration::ZERO);
    }
}
