use std::{
    fmt,
    time::{Duration, Instant},
};

/// Steps of a conversion that report how long they took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ReadChunks,
    Inflate,
    Reconstruct,
    Isolate,
    Deflate,
    Assemble,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::ReadChunks,
        Stage::Inflate,
        Stage::Reconstruct,
        Stage::Isolate,
        Stage::Deflate,
        Stage::Assemble,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadChunks => "read_chunks",
            Self::Inflate => "inflate",
            Self::Reconstruct => "reconstruct",
            Self::Isolate => "isolate",
            Self::Deflate => "deflate",
            Self::Assemble => "assemble",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives stage timings from the decode and encode pipelines.
pub trait Instrument {
    fn record(&mut self, stage: Stage, elapsed: Duration);
}

/// Discards timings.
impl Instrument for () {
    fn record(&mut self, _stage: Stage, _elapsed: Duration) {}
}

/// Keeps every timing in the order it was recorded.
#[derive(Debug, Default, Clone)]
pub struct Timings {
    entries: Vec<(Stage, Duration)>,
}

impl Timings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[(Stage, Duration)] {
        &self.entries
    }

    /// Sum of all recordings of `stage`.
    pub fn total(&self, stage: Stage) -> Duration {
        self.entries
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, d)| *d)
            .sum()
    }
}

impl Instrument for Timings {
    fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.entries.push((stage, elapsed));
    }
}

/// Runs `f` and reports its duration to `hook` as `stage`.
pub(crate) fn timed<T, I: Instrument + ?Sized>(
    hook: &mut I,
    stage: Stage,
    f: impl FnOnce() -> T,
) -> T {
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    log::debug!("{stage} took {:.5} seconds", elapsed.as_secs_f64());
    hook.record(stage, elapsed);
    result
}
