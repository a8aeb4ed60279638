//! Progress tracking and callbacks for stack registration.
//!
//! This module provides progress tracking, callbacks, and monitoring
//! for the frame loop of stack registration.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Progress information for one processed frame.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Number of frames processed so far.
    pub frame: usize,
    /// Total number of frames to process (if known).
    pub total_frames: Option<usize>,
    /// Time elapsed since start.
    pub elapsed: Duration,
    /// Estimated remaining time.
    pub estimated_remaining: Option<Duration>,
}

impl ProgressInfo {
    /// Create new progress information.
    pub fn new(frame: usize, total_frames: Option<usize>, elapsed: Duration) -> Self {
        Self {
            frame,
            total_frames,
            elapsed,
            estimated_remaining: None,
        }
    }

    /// Calculate progress percentage.
    pub fn progress_percent(&self) -> Option<f64> {
        self.total_frames.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.frame as f64 / total as f64) * 100.0
            }
        })
    }

    /// Calculate estimated remaining time.
    pub fn calculate_remaining(&mut self) {
        if let Some(total) = self.total_frames {
            if self.frame > 0 {
                let avg_time_per_frame = self.elapsed.as_secs_f64() / self.frame as f64;
                let remaining = total.saturating_sub(self.frame);
                self.estimated_remaining = Some(Duration::from_secs_f64(
                    avg_time_per_frame * remaining as f64,
                ));
            }
        }
    }
}

/// Progress callback trait for monitoring stack registration.
pub trait ProgressCallback: Send + Sync {
    /// Called after each processed frame.
    fn on_progress(&self, info: &ProgressInfo);

    /// Called when the frame loop starts.
    fn on_start(&self) {}

    /// Called when the frame loop completes successfully.
    fn on_complete(&self, _info: &ProgressInfo) {}

    /// Called when the frame loop aborts.
    fn on_error(&self, _error: &str) {}
}

/// Console progress callback that logs to tracing.
#[derive(Debug, Clone)]
pub struct ConsoleProgressCallback {
    /// Log interval (frames).
    pub log_interval: usize,
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self { log_interval: 10 }
    }
}

impl ConsoleProgressCallback {
    /// Create a new console progress callback.
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval: log_interval.max(1),
        }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        if info.frame % self.log_interval == 0 || info.total_frames == Some(info.frame) {
            let remaining = info
                .estimated_remaining
                .map(|d| format!("{:.2}s", d.as_secs_f64()))
                .unwrap_or_else(|| "N/A".to_string());

            tracing::info!(
                "Frame {}/{} ({:.1}%) | Elapsed: {:.2}s | ETA: {}",
                info.frame,
                info.total_frames.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string()),
                info.progress_percent().unwrap_or(0.0),
                info.elapsed.as_secs_f64(),
                remaining
            );
        }
    }

    fn on_start(&self) {
        tracing::info!("Stack registration started");
    }

    fn on_complete(&self, info: &ProgressInfo) {
        tracing::info!(
            "Stack registration completed: {} frames in {:.2}s",
            info.frame,
            info.elapsed.as_secs_f64()
        );
    }

    fn on_error(&self, error: &str) {
        tracing::error!("Stack registration failed: {}", error);
    }
}

/// History callback that records all progress information.
#[derive(Debug, Clone, Default)]
pub struct HistoryCallback {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl HistoryCallback {
    /// Create a new history callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded history.
    pub fn get_history(&self) -> Vec<ProgressInfo> {
        lock(&self.history).clone()
    }

    /// Get the recorded errors.
    pub fn get_errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }

    /// Clear the history.
    pub fn clear(&self) {
        lock(&self.history).clear();
        lock(&self.errors).clear();
    }
}

impl ProgressCallback for HistoryCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        lock(&self.history).push(info.clone());
    }

    fn on_error(&self, error: &str) {
        lock(&self.errors).push(error.to_string());
    }
}

/// Progress tracker that manages multiple callbacks.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    callbacks: Vec<Arc<dyn ProgressCallback>>,
    start_time: Arc<Mutex<Option<Instant>>>,
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("callbacks", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

impl ProgressTracker {
    /// Create a new progress tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback.
    pub fn add_callback(&mut self, callback: Arc<dyn ProgressCallback>) {
        self.callbacks.push(callback);
    }

    /// Add a callback, builder style.
    pub fn with_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.add_callback(callback);
        self
    }

    /// Start tracking.
    pub fn start(&self) {
        *lock(&self.start_time) = Some(Instant::now());
        for callback in &self.callbacks {
            callback.on_start();
        }
    }

    /// Report a processed frame.
    pub fn update(&self, frame: usize, total_frames: Option<usize>) {
        let mut info = ProgressInfo::new(frame, total_frames, self.elapsed());
        info.calculate_remaining();

        for callback in &self.callbacks {
            callback.on_progress(&info);
        }
    }

    /// Complete tracking.
    pub fn complete(&self, frames: usize) {
        let info = ProgressInfo::new(frames, Some(frames), self.elapsed());
        for callback in &self.callbacks {
            callback.on_complete(&info);
        }
    }

    /// Report error.
    pub fn error(&self, error: &str) {
        for callback in &self.callbacks {
            callback.on_error(error);
        }
    }

    fn elapsed(&self) -> Duration {
        let start_time = *lock(&self.start_time);
        start_time.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
