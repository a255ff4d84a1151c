/// Logs a formatted message at Trace level: `trace!(logger, "x = {}", x)`.
/// Arguments are only formatted when the shared level lets Trace through.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace_args(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug_args(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info_args(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn_args(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error_args(::std::format_args!($($arg)+))
    };
}

/// Logs at Fatal level then exits the process with status 1.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal_args(::std::format_args!($($arg)+))
    };
}

/// Logs at Panic level then panics with the formatted message.
#[macro_export]
macro_rules! panic_log {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panic_args(::std::format_args!($($arg)+))
    };
}

/// Logs at Panic level followed by a backtrace, without panicking.
#[macro_export]
macro_rules! fake_panic {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fake_panic_args(::std::format_args!($($arg)+))
    };
}

/// Logs at an explicit level, bypassing the shared level.
#[macro_export]
macro_rules! print_log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.print_args($level, ::std::format_args!($($arg)+))
    };
}
