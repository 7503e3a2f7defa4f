use std::time::{Duration, Instant};

/// Frame limiter, keeps the redraw loop from running faster than the target frame time.
pub struct Sleeper {
    pub target_delta_time: Duration,
    pub last_instant: Option<Instant>,
}

impl Sleeper {
    pub fn new(target_delta_time: Duration) -> Self {
        Self {
            target_delta_time,
            last_instant: None,
        }
    }

    /// Sleeps for whatever is left of the frame time since the last call.
    /// Returns whether it slept at all, we're late otherwise.
    pub fn sleep(&mut self) -> bool {
        let remaining = self
            .last_instant
            .map(|last_instant| self.target_delta_time.saturating_sub(last_instant.elapsed()))
            .unwrap_or_default();

        if !remaining.is_zero() {
            spin_sleep::sleep(remaining);
        }

        self.last_instant = Some(Instant::now());
        !remaining.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_doesnt_sleep() {
        let mut sleeper = Sleeper::new(Duration::from_millis(20));
        assert!(!sleeper.sleep());
    }

    #[test]
    fn fast_frames_are_throttled() {
        let mut sleeper = Sleeper::new(Duration::from_millis(20));
        sleeper.sleep();

        let start = Instant::now();
        assert!(sleeper.sleep());
        assert!(start.elapsed() >= Duration::from_millis(15));
    }
}
