//! # bannerlog-core
//! Core utilities for bannerlog - shared level, sinks and line formatting.

pub mod format;
mod level;
mod shared;
mod sink;

pub use level::{Level, ParseLevelError};
pub use shared::SharedState;
pub use sink::{FanOut, LogFile, MemoryWriter, Sink};
