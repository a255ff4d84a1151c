//! # bannerlog
//! Leveled logger handles sharing one minimum level and one output, each with its own banner.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! bannerlog = "0.1.0"
//! ```
//!
//! ```rust
//! use bannerlog::{Level, Logger};
//!
//! let mut logger = Logger::new("", false, false);
//! logger.set_banner("main").set_escape_newline(true);
//! logger.set_level(Level::Info);
//! logger.debug("skipped, below the shared level");
//! logger.info("Hello, world!");
//! bannerlog::warn!(logger, "{} handles share the level", 2);
//! ```
//!
//! ## Sharing the level and output
//! Every handle built with [`Logger::new`] points to the same process-wide state, so a level or
//! output change made through one handle is seen by all of them. Banner, color and newline
//! escaping stay per handle.
//!
//! ```rust
//! use bannerlog::{Level, Logger, MemoryWriter, SharedState};
//!
//! let memory = MemoryWriter::new();
//! let shared = SharedState::with_writer(memory.clone());
//! let db = Logger::with_shared(shared.clone(), "[db]", false, false);
//! let http = Logger::with_shared(shared, "[http]", false, false);
//!
//! db.set_level(Level::Warn);
//! http.info("not written");
//! http.warn("written");
//! assert!(memory.contents().ends_with("[http] written\n"));
//! ```
//!
//! ## Logging to files
//! The log file is created if it does not exist and appended to if it does.
//!
//! ```rust
//! use bannerlog::{LogFile, Logger, MemoryWriter, SharedState};
//!
//! std::fs::remove_file("/tmp/bannerlog_doc.log").ok();
//! let logger = Logger::with_shared(SharedState::with_writer(MemoryWriter::new()), "[app]", false, false)
//!     .with_added_output(LogFile::new("/tmp/bannerlog_doc.log").expect("Unable to create log file"));
//! logger.info("Hello, world!");
//! assert!(std::fs::read_to_string("/tmp/bannerlog_doc.log").unwrap().ends_with("[app] Hello, world!\n"));
//! ```
//!
//! ## Environment
//! - `BANNERLOG_LEVEL`: initial level of the process-wide state (`trace` by default).
//! - `BANNERLOG_COLOR`, `BANNERLOG_ESCAPE_NEWLINE`: flags used by [`Logger::from_env`].

mod config;
mod logger;
mod macros;

pub use bannerlog_core::{
    FanOut, Level, LogFile, MemoryWriter, ParseLevelError, SharedState, Sink, format,
};
pub use config::{BANNERLOG_CONFIG, BannerLogConfig, global_shared};
pub use logger::{Logger, normalize_banner};
