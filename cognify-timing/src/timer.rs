use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic clock the trial engine reads deadlines and reaction times from.
///
/// Timestamps are nanoseconds since the timer was created.
pub trait Timer: Clone + Send + Sync {
    fn now(&self) -> u64;
    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
    fn sleep(&self, d: Duration);
    fn record_tick(&mut self, d: Duration);
    fn tick_stats(&self) -> TickStats;
}

/// Summary of recorded tick durations, used to report scheduling jitter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickStats {
    pub samples: usize,
    pub average_tick_ns: f64,
    pub jitter_ns: f64,
    pub min_tick_ns: f64,
    pub max_tick_ns: f64,
}

impl TickStats {
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return TickStats::default();
        }
        let times: Vec<f64> = samples.iter().map(|d| d.as_nanos() as f64).collect();
        let avg = times.iter().sum::<f64>() / times.len() as f64;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / times.len() as f64;
        TickStats {
            samples: times.len(),
            average_tick_ns: avg,
            jitter_ns: var.sqrt(),
            min_tick_ns: times.iter().cloned().fold(f64::INFINITY, f64::min),
            max_tick_ns: times.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

fn push_bounded(buf: &mut Vec<Duration>, max: usize, d: Duration) {
    if max == 0 {
        return;
    }
    if buf.len() >= max {
        buf.remove(0);
    }
    buf.push(d);
}

/// Wall-clock timer backed by `Instant`, with a platform precise sleep.
#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    pub start: Instant,
    pub tick_times: Vec<Duration>,
    pub max_samples: usize,
}

impl Timer for HighPrecisionTimer {
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
    fn sleep(&self, d: Duration) {
        self.high_precision_sleep(d)
    }
    fn record_tick(&mut self, d: Duration) {
        push_bounded(&mut self.tick_times, self.max_samples, d);
    }
    fn tick_stats(&self) -> TickStats {
        TickStats::from_samples(&self.tick_times)
    }
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            tick_times: Vec::with_capacity(1000),
            max_samples: 1000,
        }
    }

    pub fn high_precision_sleep(&self, duration: Duration) {
        #[cfg(target_os = "linux")]
        self.linux_sleep(duration);
        #[cfg(not(target_os = "linux"))]
        std::thread::sleep(duration);
    }

    #[cfg(target_os = "linux")]
    fn linux_sleep(&self, duration: Duration) {
        use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

        let req = timespec {
            tv_sec: duration.as_secs() as libc::time_t,
            tv_nsec: duration.subsec_nanos() as libc::c_long,
        };

        // SAFETY: `req` is a valid timespec and the remainder pointer may be null.
        unsafe {
            clock_nanosleep(CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
        }
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock that only moves when told to. Clones share the same time.
///
/// `sleep` advances the clock instead of blocking, so whole sessions can be
/// simulated instantly.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    now_ns: Arc<AtomicU64>,
    tick_times: Vec<Duration>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        self.now_ns
            .fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn set_ns(&self, ns: u64) {
        self.now_ns.store(ns, Ordering::SeqCst);
    }
}

impl Timer for ManualTimer {
    fn now(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }
    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
    fn record_tick(&mut self, d: Duration) {
        push_bounded(&mut self.tick_times, 1000, d);
    }
    fn tick_stats(&self) -> TickStats {
        TickStats::from_samples(&self.tick_times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timer_clones_share_clock() {
        let timer = ManualTimer::new();
        let view = timer.clone();
        timer.advance_ms(250);
        assert_eq!(view.now(), 250_000_000);
        view.sleep(Duration::from_millis(50));
        assert_eq!(timer.now(), 300_000_000);
        assert_eq!(timer.elapsed(100_000_000), Duration::from_millis(200));
    }

    #[test]
    fn tick_stats_report_spread() {
        let mut timer = ManualTimer::new();
        timer.record_tick(Duration::from_millis(1));
        timer.record_tick(Duration::from_millis(3));
        let stats = timer.tick_stats();
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.average_tick_ns, 2_000_000.0);
        assert_eq!(stats.jitter_ns, 1_000_000.0);
        assert_eq!(stats.min_tick_ns, 1_000_000.0);
        assert_eq!(stats.max_tick_ns, 3_000_000.0);
    }

    #[test]
    fn empty_stats_are_zeroed() {
        assert_eq!(HighPrecisionTimer::new().tick_stats(), TickStats::default());
    }

    #[test]
    fn zero_sample_budget_keeps_nothing() {
        let mut timer = HighPrecisionTimer::new();
        timer.max_samples = 0;
        timer.record_tick(Duration::from_millis(1));
        assert_eq!(timer.tick_stats().samples, 0);
    }

    #[test]
    fn high_precision_timer_is_monotonic() {
        let timer = HighPrecisionTimer::new();
        let a = timer.now();
        timer.sleep(Duration::from_millis(2));
        assert!(timer.now() >= a + 2_000_000);
    }
}
