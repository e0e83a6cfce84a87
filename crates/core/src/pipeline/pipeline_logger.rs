use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for load events: per-frame progress, stage timings and
/// point-in-time metrics.
///
/// Keeps the use case free of any particular output mechanism.
pub trait PipelineLogger: Send {
    /// Report acquisition progress against the expected frame count.
    fn progress(&mut self, current: usize, expected: usize);

    /// Record how long a named stage (`open`, `plan`, `acquire`, `resize`)
    /// took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. sampling step, output fps).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-load summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events. Used when embedding the core and
/// in tests.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _expected: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI logger that accumulates stage timings and metrics across loads and
/// reports them in one summary.
///
/// Progress lines are throttled to every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, Vec<f64>>,
    metrics: BTreeMap<String, Vec<f64>>,
    start_time: Instant,
    frames_loaded: usize,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            frames_loaded: 0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames_loaded;
        let mut lines = vec![format!(
            "Load summary ({frames} frames, {:.2}s total):",
            elapsed_ms / 1000.0
        )];

        for (stage, durations) in &self.timings {
            let total_ms: f64 = durations.iter().sum();
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!("  {stage:8}: {total_ms:8.1}ms  ({pct:4.1}%)"));
        }

        for (name, values) in &self.metrics {
            if let Some(last) = values.last() {
                lines.push(format!("  {name}: {last}"));
            }
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let rate = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {rate:.1} frames/s"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, expected: usize) {
        self.frames_loaded = current;
        if current % self.throttle_frames == 0 || current == expected {
            if expected > 0 {
                log::info!("Loaded {current}/{expected} frames");
            } else {
                log::info!("Loaded {current} frames");
            }
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
