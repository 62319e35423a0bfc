use std::time::{Duration, Instant};

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    /// Creates a new time sample.
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where time values originate from.
pub trait TimeSource: Send {
    /// Seconds elapsed since the source was created.
    fn elapsed_seconds(&mut self) -> f32;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    /// Creates a system time source initialised to `Instant::now()`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn elapsed_seconds(&mut self) -> f32 {
        self.origin.elapsed().as_secs_f32()
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Frame clock handed to every tick.
///
/// Never resets and never reports the same value twice: `f32` seconds lose
/// sub-frame resolution after a few days of uptime, so a sample that fails to
/// move forward is bumped to the next representable value.
pub struct FrameClock {
    source: BoxedTimeSource,
    last: Option<f32>,
    frame: u64,
}

impl FrameClock {
    pub fn new(source: BoxedTimeSource) -> Self {
        Self {
            source,
            last: None,
            frame: 0,
        }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemTimeSource::new()))
    }

    pub fn tick(&mut self) -> TimeSample {
        let mut seconds = self.source.elapsed_seconds().max(0.0);
        if let Some(last) = self.last {
            if seconds <= last {
                seconds = next_up(last);
            }
        }
        self.last = Some(seconds);

        let sample = TimeSample::new(seconds, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Smallest `f32` strictly greater than a non-negative finite `value`.
fn next_up(value: f32) -> f32 {
    if value == 0.0 {
        f32::from_bits(1)
    } else {
        f32::from_bits(value.to_bits() + 1)
    }
}

/// Host-side cadence cap.
///
/// Without a target the renderer draws on every display refresh (the
/// swapchain's Fifo present mode is the throttle). With a target, redraws
/// are only requested once the next deadline has passed.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Option<Duration>,
    last_frame: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));
        Self {
            interval,
            last_frame: None,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match self.next_deadline() {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.interval, self.last_frame) {
            (Some(interval), Some(last)) => Some(last + interval),
            _ => None,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedSource {
        values: Vec<f32>,
        cursor: usize,
    }

    impl TimeSource for ScriptedSource {
        fn elapsed_seconds(&mut self) -> f32 {
            let value = self.values[self.cursor.min(self.values.len() - 1)];
            self.cursor += 1;
            value
        }
    }

    fn scripted(values: &[f32]) -> FrameClock {
        FrameClock::new(Box::new(ScriptedSource {
            values: values.to_vec(),
            cursor: 0,
        }))
    }

    #[test]
    fn clock_strictly_increases_even_when_source_stalls() {
        let mut clock = scripted(&[0.0, 0.0, 0.5, 0.5, 0.25, 1.0]);
        let mut previous = clock.tick().seconds;
        for _ in 0..5 {
            let next = clock.tick().seconds;
            assert!(next > previous, "{next} should exceed {previous}");
            previous = next;
        }
        assert_eq!(previous, 1.0);
    }

    #[test]
    fn clock_counts_frames() {
        let mut clock = scripted(&[0.1, 0.2, 0.3]);
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        let last = clock.tick();
        assert_eq!(last.frame_index, 2);
        assert_eq!(last.seconds, 0.3);
    }

    #[test]
    fn clock_bumps_large_stalled_values() {
        let day = 86_400.0_f32;
        let mut clock = scripted(&[day, day]);
        let first = clock.tick().seconds;
        let second = clock.tick().seconds;
        assert!(second > first);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = FrameClock::system();
        let first = clock.tick();
        let second = clock.tick();
        assert!(second.seconds > first.seconds);
    }

    #[test]
    fn uncapped_scheduler_is_always_ready() {
        let mut scheduler = FrameScheduler::new(None);
        let now = Instant::now();
        scheduler.mark_rendered(now);
        assert!(scheduler.ready_for_frame(now));
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn zero_fps_means_uncapped() {
        assert_eq!(FrameScheduler::new(Some(0.0)).interval(), None);
        assert_eq!(FrameScheduler::new(Some(f32::NAN)).interval(), None);
    }

    #[test]
    fn capped_scheduler_waits_for_deadline() {
        let mut scheduler = FrameScheduler::new(Some(10.0));
        let start = Instant::now();
        assert!(scheduler.ready_for_frame(start));

        scheduler.mark_rendered(start);
        assert!(!scheduler.ready_for_frame(start + Duration::from_millis(50)));
        assert!(scheduler.ready_for_frame(start + Duration::from_millis(101)));

        let deadline = scheduler.next_deadline().expect("deadline");
        let wait = deadline.duration_since(start);
        assert!((wait.as_secs_f32() - 0.1).abs() < 1e-3);
    }
}
