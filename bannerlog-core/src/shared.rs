use std::{
    io::{self, Write},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU8, Ordering},
    },
};

use chrono::Local;

use crate::{
    Level,
    format::{DateTracker, PendingLine},
    sink::{FanOut, Sink},
};

/// Everything guarded by the write lock.
struct Output {
    sink: FanOut,
    dates: DateTracker,
}

/// Control plane shared by every logger handle: one minimum level, one output.
pub struct SharedState {
    level: AtomicU8,
    output: Mutex<Output>,
}

impl SharedState {
    pub fn new(level: Level, sink: FanOut) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
            output: Mutex::new(Output {
                sink,
                dates: DateTracker::new(),
            }),
        }
    }

    /// Shared state writing to `writer`, letting every level through.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Arc<Self> {
        Arc::new(Self::new(Level::Trace, FanOut::new(Box::new(writer))))
    }

    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Sets the minimum level let through. There is no level above `Panic`, so Panic lines
    /// are always written: the state can be made quiet but never fully silent.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether a line of severity `level` passes the gate.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    fn lock(&self) -> MutexGuard<'_, Output> {
        self.output.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces every destination by `sink`.
    pub fn set_output(&self, sink: Sink) {
        self.lock().sink.replace(sink);
    }

    /// Adds `sink` next to the destinations already in use.
    pub fn add_output(&self, sink: Sink) {
        self.lock().sink.push(sink);
    }

    /// Writes raw bytes to every destination, reporting the first failure.
    pub fn try_write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut output = self.lock();
        let written = output.sink.write_all(bytes);
        let flushed = output.sink.flush();
        written.and(flushed)
    }

    /// Writes raw bytes to every destination. Failures are dropped.
    pub fn write(&self, bytes: &[u8]) {
        let _ = self.try_write(bytes);
    }

    /// Stamps `pending` with the current time and writes it, both under the lock so
    /// the timestamp precision follows the order lines reach the sink.
    pub fn write_line(&self, pending: &PendingLine) -> io::Result<()> {
        let mut output = self.lock();
        let timestamp = output.dates.stamp(&Local::now());
        let line = pending.finish(&timestamp);
        let written = output.sink.write_all(line.as_bytes());
        let flushed = output.sink.flush();
        written.and(flushed)
    }

    /// Renders `pending` into a full line, advancing the date tracker without writing.
    pub fn render_line(&self, pending: &PendingLine) -> String {
        let timestamp = self.lock().dates.stamp(&Local::now());
        pending.finish(&timestamp)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.lock().sink.flush()
    }
}
