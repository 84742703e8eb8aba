use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Seconds left after this tick.
    Running(u32),
    /// The counter went below zero on this tick.
    Expired,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: i64,
    finished: bool,
}

impl Countdown {
    pub fn new(total_seconds: u32) -> Self {
        Self {
            remaining: i64::from(total_seconds),
            finished: false,
        }
    }

    pub fn tick(&mut self) -> Tick {
        if self.finished {
            return Tick::Finished;
        }
        self.remaining -= 1;
        if self.remaining < 0 {
            self.remaining = 0;
            self.finished = true;
            return Tick::Expired;
        }
        Tick::Running(self.remaining())
    }

    pub fn remaining(&self) -> u32 {
        u32::try_from(self.remaining.max(0)).unwrap_or(u32::MAX)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// `MM:SS`, both fields zero-padded. No hour component.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug)]
pub struct CountdownHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Tick once per [`TICK_PERIOD`], handing every tick to `on_tick` until the
/// countdown expires or `on_tick` returns `false`.
pub fn spawn_countdown<F>(total_seconds: u32, generation: u64, mut on_tick: F) -> CountdownHandle
where
    F: FnMut(Tick) -> bool + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut countdown = Countdown::new(total_seconds);
        let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        loop {
            ticker.tick().await;
            let tick = countdown.tick();
            tracing::trace!(generation, ?tick, "countdown tick");
            if !on_tick(tick) || countdown.is_finished() {
                break;
            }
        }
    });
    CountdownHandle { generation, task }
}
