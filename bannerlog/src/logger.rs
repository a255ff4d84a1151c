use std::{backtrace::Backtrace, fmt, io::Write, sync::Arc};

use bannerlog_core::{Level, SharedState, format::PendingLine};
use log::{LevelFilter, Log};

use crate::config::{BANNERLOG_CONFIG, global_shared};

/// Wraps `banner` in square brackets, adding only the ones missing. An empty banner stays empty.
pub fn normalize_banner(banner: &str) -> String {
    if banner.is_empty() {
        return String::new();
    }
    let mut normalized = String::with_capacity(banner.len() + 2);
    if !banner.starts_with('[') {
        normalized.push('[');
    }
    normalized.push_str(banner);
    if !banner.ends_with(']') {
        normalized.push(']');
    }
    normalized
}

/// A logger handle. Level and output live in the [`SharedState`] the handle points to and
/// are seen by every handle sharing it; banner, color and newline escaping belong to the handle.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<SharedState>,
    banner: String,
    color: bool,
    escape_newline: bool,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("banner", &self.banner)
            .field("color", &self.color)
            .field("escape_newline", &self.escape_newline)
            .field("level", &self.shared.level())
            .finish()
    }
}

macro_rules! severity_methods {
    ($($level:ident => $name:ident, $name_args:ident;)+) => {
        $(
            #[doc = concat!("Logs `message` at ", stringify!($level), " level.")]
            pub fn $name(&self, message: impl fmt::Display) {
                if self.shared.enabled(Level::$level) {
                    self.emit(Level::$level, &message.to_string());
                }
            }

            #[doc = concat!("Logs preformatted arguments at ", stringify!($level), " level.")]
            pub fn $name_args(&self, args: fmt::Arguments<'_>) {
                if self.shared.enabled(Level::$level) {
                    self.emit(Level::$level, &args.to_string());
                }
            }
        )+
    };
}

impl Logger {
    /// Creates a handle on the process-wide shared state. The banner is kept as given;
    /// use [`Logger::set_banner`] to get it bracketed.
    pub fn new(banner: &str, color: bool, escape_newline: bool) -> Self {
        Self::with_shared(global_shared(), banner, color, escape_newline)
    }

    /// Creates a handle on an explicit shared state.
    pub fn with_shared(
        shared: Arc<SharedState>,
        banner: &str,
        color: bool,
        escape_newline: bool,
    ) -> Self {
        Self {
            shared,
            banner: banner.into(),
            color,
            escape_newline,
        }
    }

    /// Creates a handle on the process-wide shared state with color and newline escaping
    /// taken from `BANNERLOG_COLOR` and `BANNERLOG_ESCAPE_NEWLINE`.
    pub fn from_env(banner: &str) -> Self {
        Self::new(
            &normalize_banner(banner),
            BANNERLOG_CONFIG.COLOR,
            BANNERLOG_CONFIG.ESCAPE_NEWLINE,
        )
    }

    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    pub fn banner(&self) -> &str {
        &self.banner
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn escape_newline(&self) -> bool {
        self.escape_newline
    }

    pub fn level(&self) -> Level {
        self.shared.level()
    }

    /// Replaces the shared output. Affects every handle on the same shared state.
    pub fn set_output<W: Write + Send + 'static>(&self, writer: W) -> &Self {
        self.shared.set_output(Box::new(writer));
        self
    }

    /// Adds a destination to the shared output. Affects every handle on the same shared state.
    pub fn add_output<W: Write + Send + 'static>(&self, writer: W) -> &Self {
        self.shared.add_output(Box::new(writer));
        self
    }

    /// Sets the shared minimum level. Affects every handle on the same shared state.
    pub fn set_level(&self, level: Level) -> &Self {
        self.shared.set_level(level);
        self
    }

    pub fn set_banner(&mut self, banner: &str) -> &mut Self {
        self.banner = normalize_banner(banner);
        self
    }

    pub fn set_color(&mut self, color: bool) -> &mut Self {
        self.color = color;
        self
    }

    pub fn set_escape_newline(&mut self, escape_newline: bool) -> &mut Self {
        self.escape_newline = escape_newline;
        self
    }

    pub fn with_output<W: Write + Send + 'static>(self, writer: W) -> Self {
        self.set_output(writer);
        self
    }

    pub fn with_added_output<W: Write + Send + 'static>(self, writer: W) -> Self {
        self.add_output(writer);
        self
    }

    pub fn with_level(self, level: Level) -> Self {
        self.set_level(level);
        self
    }

    pub fn with_banner(self, banner: &str) -> Self {
        Self {
            banner: normalize_banner(banner),
            ..self
        }
    }

    pub fn with_color(self, color: bool) -> Self {
        Self { color, ..self }
    }

    pub fn with_escape_newline(self, escape_newline: bool) -> Self {
        Self {
            escape_newline,
            ..self
        }
    }

    fn pending(&self, level: Level, message: &str) -> PendingLine {
        PendingLine::new(level, self.color, self.escape_newline, &self.banner, message)
    }

    fn emit(&self, level: Level, message: &str) {
        let _ = self.shared.write_line(&self.pending(level, message));
    }

    /// Renders the full line this handle would write for `message`, including the trailing newline.
    /// Advances the shared date tracker like a written line would.
    pub fn format(&self, level: Level, message: &str) -> String {
        self.shared.render_line(&self.pending(level, message))
    }

    /// Writes `message` at `level` whatever the shared level.
    pub fn print(&self, level: Level, message: impl fmt::Display) {
        self.emit(level, &message.to_string());
    }

    /// Writes preformatted arguments at `level` whatever the shared level.
    pub fn print_args(&self, level: Level, args: fmt::Arguments<'_>) {
        self.emit(level, &args.to_string());
    }

    severity_methods! {
        Trace => trace, trace_args;
        Debug => debug, debug_args;
        Info => info, info_args;
        Warn => warn, warn_args;
        Error => error, error_args;
    }

    /// Logs `message` at Fatal level, then exits the process with status 1.
    pub fn fatal(&self, message: impl fmt::Display) {
        if self.shared.enabled(Level::Fatal) {
            self.emit(Level::Fatal, &message.to_string());
            std::process::exit(1);
        }
    }

    pub fn fatal_args(&self, args: fmt::Arguments<'_>) {
        self.fatal(args)
    }

    /// Logs `message` at Panic level, then panics with `message` as payload.
    pub fn panic(&self, message: impl fmt::Display) {
        if self.shared.enabled(Level::Panic) {
            let message = message.to_string();
            self.emit(Level::Panic, &message);
            panic!("{message}");
        }
    }

    pub fn panic_args(&self, args: fmt::Arguments<'_>) {
        self.panic(args)
    }

    /// Logs `message` at Panic level followed by a backtrace of the caller. Does not unwind.
    pub fn fake_panic(&self, message: impl fmt::Display) {
        if self.shared.enabled(Level::Panic) {
            self.emit(Level::Panic, &message.to_string());
            let mut backtrace = Backtrace::force_capture().to_string();
            if !backtrace.ends_with('\n') {
                backtrace.push('\n');
            }
            self.shared.write(backtrace.as_bytes());
        }
    }

    pub fn fake_panic_args(&self, args: fmt::Arguments<'_>) {
        self.fake_panic(args)
    }

    /// Installs this handle as the [`log`] crate's logger. The shared level stays the only gate.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.shared.enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let level = record.level().into();
        if self.shared.enabled(level) {
            self.emit(level, &record.args().to_string());
        }
    }

    fn flush(&self) {
        let _ = self.shared.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bannerlog_core::MemoryWriter;
    use regex::Regex;
    use std::{
        panic::{AssertUnwindSafe, catch_unwind},
        sync::atomic::{AtomicUsize, Ordering},
    };

    fn memory_logger(banner: &str) -> (Logger, MemoryWriter) {
        let memory = MemoryWriter::new();
        let logger = Logger::with_shared(
            SharedState::with_writer(memory.clone()),
            banner,
            false,
            false,
        );
        (logger, memory)
    }

    /// Display impl counting how many times it gets rendered.
    struct Counted<'a>(&'a AtomicUsize);

    impl fmt::Display for Counted<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fetch_add(1, Ordering::SeqCst);
            f.write_str("counted")
        }
    }

    #[test]
    fn test_normalize_banner() {
        assert_eq!(normalize_banner("x"), "[x]");
        assert_eq!(normalize_banner("[x]"), "[x]");
        assert_eq!(normalize_banner("[x"), "[x]");
        assert_eq!(normalize_banner("x]"), "[x]");
        assert_eq!(normalize_banner(""), "");
    }

    #[test]
    fn test_banner_kept_verbatim_by_constructor() {
        let (mut logger, _) = memory_logger("svc");
        assert_eq!(logger.banner(), "svc");
        logger.set_banner("svc");
        assert_eq!(logger.banner(), "[svc]");
    }

    #[test]
    fn test_gated_calls_do_nothing() {
        let (logger, memory) = memory_logger("[svc]");
        let renders = AtomicUsize::new(0);
        logger.set_level(Level::Panic);
        logger.trace(Counted(&renders));
        logger.debug(Counted(&renders));
        logger.info(Counted(&renders));
        logger.warn(Counted(&renders));
        logger.error(Counted(&renders));
        logger.fatal(Counted(&renders));
        logger.info_args(format_args!("{}", Counted(&renders)));
        assert_eq!(renders.load(Ordering::SeqCst), 0);
        assert_eq!(memory.contents(), "");
    }

    #[test]
    fn test_one_line_per_allowed_call() {
        let (logger, memory) = memory_logger("[svc]");
        logger.set_level(Level::Warn);
        logger.info("hidden");
        logger.warn("one");
        logger.error_args(format_args!("two {}", 2));
        logger.fake_panic("three");
        let contents = memory.contents();
        assert!(contents.ends_with('\n'));
        let lines: Vec<_> = contents.lines().filter(|l| l.contains("[svc]")).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(" [WARN]"));
        assert!(lines[1].ends_with("[svc] two 2"));
        assert!(lines[2].starts_with("[PANIC]"));
        assert!(!contents.contains("hidden"));
    }

    #[test]
    fn test_info_line_layout() {
        let (logger, memory) = memory_logger("[svc]");
        logger.set_level(Level::Info);
        logger.warn("warm up the date tracker");
        memory.clear();
        logger.debug("x");
        assert_eq!(memory.contents(), "");
        logger.info("ready");
        let pattern =
            Regex::new(r"^ \[INFO\]\[\d{2}:\d{2}:\d{2}\.\d{3}\]\[svc\] ready\n$").unwrap();
        assert!(pattern.is_match(&memory.contents()), "{:?}", memory.contents());
    }

    #[test]
    fn test_escape_newline() {
        let (mut logger, memory) = memory_logger("");
        logger.set_escape_newline(true);
        logger.info("a\nb");
        let contents = memory.contents();
        assert!(contents.contains("a\x1b[97m\\n\x1b[mb"));
        assert_eq!(contents.matches('\n').count(), 1);
        memory.clear();
        logger.set_escape_newline(false);
        logger.info("a\nb");
        assert_eq!(memory.contents().matches('\n').count(), 2);
    }

    #[test]
    fn test_color_flag() {
        let (mut logger, memory) = memory_logger("[c]");
        logger.set_color(true);
        logger.error("red");
        assert!(memory.contents().starts_with("\x1b[91m[ERROR]\x1b[m["));
    }

    #[test]
    fn test_handles_share_level_and_output_but_not_banner() {
        let (a, memory) = memory_logger("[a]");
        let b = Logger::with_shared(Arc::clone(a.shared()), "[b]", true, true);
        a.set_level(Level::Error);
        assert_eq!(b.level(), Level::Error);
        b.set_level(Level::Debug);
        assert_eq!(a.level(), Level::Debug);
        a.debug("from a");
        b.debug("from b");
        let contents = memory.contents();
        assert!(contents.contains("[a] from a"));
        assert!(contents.contains("[b] from b"));
        assert_eq!(a.banner(), "[a]");
        assert_eq!(b.banner(), "[b]");
    }

    #[test]
    fn test_escape_flag_is_per_handle() {
        let (mut a, memory) = memory_logger("[a]");
        let b = a.clone();
        a.set_escape_newline(true);
        assert!(!b.escape_newline());
        b.info("x\ny");
        assert_eq!(memory.contents().matches('\n').count(), 2);
    }

    #[test]
    fn test_add_output_fans_out() {
        let (logger, original) = memory_logger("[fan]");
        let second = MemoryWriter::new();
        let third = MemoryWriter::new();
        logger.add_output(second.clone()).add_output(third.clone());
        logger.info("everywhere");
        for memory in [&original, &second, &third] {
            assert!(memory.contents().ends_with("[fan] everywhere\n"));
        }
    }

    #[test]
    fn test_set_output_replaces_destinations() {
        let (logger, original) = memory_logger("");
        let replacement = MemoryWriter::new();
        logger.set_output(replacement.clone()).info("moved");
        assert_eq!(original.contents(), "");
        assert!(replacement.contents().ends_with(" moved\n"));
    }

    #[test]
    fn test_builder_style() {
        let memory = MemoryWriter::new();
        let shared = SharedState::with_writer(MemoryWriter::new());
        let logger = Logger::with_shared(shared, "", true, false)
            .with_output(memory.clone())
            .with_level(Level::Warn)
            .with_banner("built")
            .with_color(false)
            .with_escape_newline(true);
        assert_eq!(logger.banner(), "[built]");
        assert_eq!(logger.level(), Level::Warn);
        assert!(logger.escape_newline());
        logger.warn("done");
        assert!(memory.contents().starts_with(" [WARN]"));
    }

    #[test]
    fn test_print_ignores_level() {
        let (logger, memory) = memory_logger("[p]");
        logger.set_level(Level::Panic);
        logger.print(Level::Trace, "always");
        logger.print_args(Level::Debug, format_args!("{}", "also"));
        let contents = memory.contents();
        assert!(contents.contains("[TRACE]"));
        assert!(contents.contains("[p] also"));
    }

    #[test]
    fn test_format_matches_written_line_layout() {
        let (logger, memory) = memory_logger("[f]");
        let line = logger.format(Level::Debug, "shape");
        assert!(line.starts_with("[DEBUG]["));
        assert!(line.ends_with("][f] shape\n"));
        assert_eq!(memory.contents(), "");
    }

    #[test]
    fn test_panic_unwinds_after_emitting() {
        let (logger, memory) = memory_logger("[p]");
        let result = catch_unwind(AssertUnwindSafe(|| logger.panic("boom")));
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().unwrap(), "boom");
        assert!(memory.contents().contains("[PANIC]"));
        assert!(memory.contents().contains("[p] boom"));
    }

    #[test]
    #[should_panic(expected = "code 7")]
    fn test_panic_args() {
        let (logger, _) = memory_logger("");
        logger.panic_args(format_args!("code {}", 7));
    }

    #[test]
    fn test_fake_panic_writes_backtrace_without_unwinding() {
        let (logger, memory) = memory_logger("[fp]");
        logger.fake_panic_args(format_args!("not {}", "fatal"));
        let contents = memory.contents();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().ends_with("[fp] not fatal"));
        assert!(lines.next().is_some());
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn test_log_bridge() {
        let (logger, memory) = memory_logger("[bridge]");
        logger.set_level(Level::Info);
        let metadata = log::Metadata::builder().level(log::Level::Debug).build();
        assert!(!Log::enabled(&logger, &metadata));
        Log::log(
            &logger,
            &log::Record::builder()
                .level(log::Level::Debug)
                .args(format_args!("dropped"))
                .build(),
        );
        Log::log(
            &logger,
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("kept {}", 1))
                .build(),
        );
        let contents = memory.contents();
        assert!(!contents.contains("dropped"));
        assert!(contents.contains(" [WARN]"));
        assert!(contents.contains("[bridge] kept 1"));
    }

    #[test]
    fn test_concurrent_handles_write_whole_lines() {
        let (logger, memory) = memory_logger("");
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let mut logger = logger.clone();
                logger.set_banner(&format!("thread {i}"));
                std::thread::spawn(move || {
                    for j in 0..50 {
                        logger.info_args(format_args!("message {j}"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let contents = memory.contents();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 400);
        assert!(lines.iter().all(|l| l.starts_with(" [INFO][")));
    }
}
