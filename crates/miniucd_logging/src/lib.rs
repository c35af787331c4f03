use core::fmt::{Display, Arguments};
use std::{
    fmt::Write as _,
    io::{self, IsTerminal, Write},
    sync::atomic::{AtomicU8, AtomicBool, self},
    time::Instant,
};
use miniucd_macros::{EnumCount, EnumFromName};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

static LOGGER : OnceCell<Logger> = OnceCell::new();

/// Install the process logger.
///
/// Returns the logger back if one was already installed, either explicitly or by an earlier call to [`get_logger`].
pub fn set_logger(logger: Logger) -> Result<(), Logger> {
    LOGGER.set(logger)
}

/// Get the process logger, installing a default one when none was set
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(Logger::new)
}

/// Logging level
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, EnumCount, EnumFromName)]
pub enum LogLevel {
    /// Severe error: the run cannot continue
    #[parse_name("severe")]
    Severe,
    /// Error: the current stage fails
    #[parse_name("error")]
    Error,
    /// Warning: output is still produced, but the input looked suspicious
    #[parse_name("warning")]
    #[parse_name("warn")]
    Warning,
    /// General info
    #[parse_name("info")]
    Info,
    /// Verbose info
    #[parse_name("verbose")]
    Verbose,
    /// Debug info (includes verbose info)
    #[parse_name("debug")]
    Debug,
}

impl LogLevel {
    const fn tag(self) -> &'static str {
        match self {
            LogLevel::Severe  => "[SEVERE ]",
            LogLevel::Error   => "[ERROR  ]",
            LogLevel::Warning => "[WARNING]",
            LogLevel::Info    => "[INFO   ]",
            LogLevel::Verbose => "[VERBOSE]",
            LogLevel::Debug   => "[DEBUG  ]",
        }
    }

    const fn color(self) -> &'static str {
        match self {
            LogLevel::Severe  => "\x1B[1m\x1B[41m\x1B[30m",
            LogLevel::Error   => "\x1B[91m",
            LogLevel::Warning => "\x1B[93m",
            LogLevel::Info    => "\x1B[37m",
            LogLevel::Verbose => "\x1B[90m",
            LogLevel::Debug   => "\x1B[94m",
        }
    }

    /// Whether a message at this level also records where it was logged from
    const fn shows_location(self) -> bool {
        matches!(self, LogLevel::Severe | LogLevel::Error | LogLevel::Debug)
    }

    fn from_u8(val: u8) -> Self {
        match val {
            0 => LogLevel::Severe,
            1 => LogLevel::Error,
            2 => LogLevel::Warning,
            3 => LogLevel::Info,
            4 => LogLevel::Verbose,
            _ => LogLevel::Debug,
        }
    }
}

struct LevelFormatter {
    level : LogLevel,
    color : bool,
}

impl Display for LevelFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.color {
            write!(f, "{}{}\x1B[0m", self.level.color(), self.level.tag())
        } else {
            f.write_str(self.level.tag())
        }
    }
}

/// Log category
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LogCategory {
    category     : &'static str,
    sub_category : Option<&'static str>
}

impl LogCategory {
    pub const fn new(name: &'static str) -> Self {
        Self { category: name, sub_category: None }
    }

    pub const fn new_with_sub(name: &'static str, sub_name: &'static str) -> Self {
        Self { category: name, sub_category: Some(sub_name) }
    }
}

impl Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.sub_category {
            Some(sub) => write!(f, "{}({sub})", self.category),
            None => f.write_str(self.category),
        }
    }
}

/// Additional info about where the log occured
pub struct LogLocation {
    file : &'static str,
    line : u32,
    func : &'static str,
}

impl LogLocation {
    /// Creates a new log location
    pub const fn new(file: &'static str, line: u32, func: &'static str) -> Self {
        Self { file, line, func }
    }

    /// Get the file name where the log occured
    pub const fn file(&self) -> &str {
        self.file
    }

    /// Get the line where the log occurred
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Get the function where the log occurred
    pub const fn function(&self) -> &str {
        self.func
    }
}

struct LogLocationFormatter<'a> {
    loc   : &'a LogLocation,
    level : LogLevel
}

impl Display for LogLocationFormatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.level.shows_location() {
            return Ok(());
        }
        if self.loc.function().is_empty() {
            write!(f, " ({}:{})", self.loc.file(), self.loc.line())
        } else {
            write!(f, " ({}:{}: {})", self.loc.file(), self.loc.line(), self.loc.function())
        }
    }
}

pub fn get_func_name<F>(_: F) -> &'static str {
    core::any::type_name::<F>()
}

#[macro_export]
macro_rules! log_location {
    () => {
        $crate::LogLocation::new(file!(), line!(), "")
    };
    ($func: expr) => {
        $crate::LogLocation::new(file!(), line!(), $crate::get_func_name($func))
    };
}

type BoxedWriter = Box<dyn Write + Send>;

struct LoggerState {
    writers:        Vec<Option<BoxedWriter>>,
    cache:          String,
    always_flush:   bool,
    log_to_console: bool,
    use_color:      bool,
}

impl LoggerState {
    const MAX_WRITERS: usize = 8;
    const CACHE_FLUSH_LIMIT: usize = 4 * 1024;

    fn new() -> Self {
        Self {
            writers: (0..Self::MAX_WRITERS).map(|_| None).collect(),
            cache: String::new(),
            always_flush: false,
            log_to_console: true,
            use_color: io::stderr().is_terminal(),
        }
    }

    fn format_message(&mut self, fmt_args: Arguments) {
        _ = self.cache.write_fmt(fmt_args);
    }

    fn flush_when_needed(&mut self, level: LogLevel) {
        if self.always_flush || level <= LogLevel::Warning || self.cache.len() > Self::CACHE_FLUSH_LIMIT {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.cache.is_empty() {
            return;
        }

        if self.log_to_console {
            let mut stderr = io::stderr().lock();
            _ = stderr.write_all(self.cache.as_bytes());
            _ = stderr.flush();
        }

        for writer in self.writers.iter_mut().flatten() {
            _ = writer.write_all(self.cache.as_bytes());
            _ = writer.flush();
        }
        self.cache.clear();
    }
}

/// Logger
///
/// Writes to the terminal (stderr) and up to 8 additional writers, e.g. a log file
pub struct Logger {
    state:         Mutex<LoggerState>,
    max_log_level: AtomicU8,
    has_errors:    AtomicBool,
    start:         Instant,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LoggerState::new()),
            max_log_level: AtomicU8::new(LogLevel::Info as u8),
            has_errors: AtomicBool::new(false),
            start: Instant::now(),
        }
    }

    /// Set the maximum log level (severe == lowest, debug == highest)
    pub fn set_max_level(&self, level: LogLevel) {
        self.max_log_level.store(level as u8, atomic::Ordering::Relaxed)
    }

    /// Get the maximum log level
    pub fn max_level(&self) -> LogLevel {
        LogLevel::from_u8(self.max_log_level.load(atomic::Ordering::Relaxed))
    }

    /// Check if a message at `level` would be written
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.max_level()
    }

    /// Check if an error or severe message was logged at any point
    pub fn has_errors(&self) -> bool {
        self.has_errors.load(atomic::Ordering::Relaxed)
    }

    /// Set whether the logger should flush after each write
    pub fn set_always_flush(&self, always_flush: bool) {
        self.state.lock().always_flush = always_flush;
    }

    /// Set whether the logger should log it's output to console
    pub fn set_log_to_console(&self, log_to_console: bool) {
        let mut state = self.state.lock();

        // Messages cached so far were logged under the previous setting
        state.flush();
        state.log_to_console = log_to_console;
    }

    /// Set whether level tags are wrapped in ANSI color codes
    pub fn set_use_color(&self, use_color: bool) {
        self.state.lock().use_color = use_color;
    }

    /// Add a writer.
    ///
    /// Returns `Ok(index)` if space was available. This index can be used to remove the writer later on.
    ///
    /// Otherwise returns an `Err` with the provided writer
    pub fn add_writer(&self, writer: BoxedWriter) -> Result<usize, BoxedWriter> {
        let mut state = self.state.lock();

        let empty = state.writers.iter_mut().enumerate().find(|(_, slot)| slot.is_none());
        match empty {
            Some((id, slot)) => {
                *slot = Some(writer);
                Ok(id)
            },
            None => Err(writer),
        }
    }

    /// Remove a writer from the logger
    pub fn remove_writer(&self, index: usize) -> Option<BoxedWriter> {
        let mut state = self.state.lock();
        state.flush();
        state.writers.get_mut(index).and_then(Option::take)
    }

    /// Log a preformatted message
    pub fn log(&self, category: LogCategory, level: LogLevel, loc: LogLocation, text: &str) {
        self.log_fmt(category, level, loc, format_args!("{text}"));
    }

    pub fn log_fmt(&self, category: LogCategory, level: LogLevel, loc: LogLocation, format: Arguments) {
        if level <= LogLevel::Error {
            self.has_errors.store(true, atomic::Ordering::Relaxed);
        }
        if !self.enabled(level) {
            return;
        }

        let elapsed = self.start.elapsed().as_secs_f64();
        let loc_formatter = LogLocationFormatter { loc: &loc, level };
        let mut state = self.state.lock();
        let level = LevelFormatter { level, color: state.use_color };
        state.format_message(format_args!("{elapsed:>9.3}s {level} [{category}]{loc_formatter}: "));
        state.format_message(format);
        state.cache.push('\n');
        state.flush_when_needed(level.level);
    }

    pub fn flush(&self) {
        self.state.lock().flush()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}

#[macro_export]
macro_rules! log {
    ($category:expr, $level:expr, $func:expr, $($arg:tt)+) => {
        $crate::get_logger().log_fmt($category, $level, $crate::log_location!($func), format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_severe {
    ($category:expr, $func:expr, $($arg:tt)+) => {
        $crate::get_logger().log_fmt($category, $crate::LogLevel::Severe, $crate::log_location!($func), format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_error {
    ($category:expr, $func:expr, $($arg:tt)+) => {
        $crate::get_logger().log_fmt($category, $crate::LogLevel::Error, $crate::log_location!($func), format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($category:expr, $($arg:tt)+) => {
        $crate::get_logger().log_fmt($category, $crate::LogLevel::Warning, $crate::log_location!(), format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_info {
    ($category:expr, $($arg:tt)+) => {
        $crate::get_logger().log_fmt($category, $crate::LogLevel::Info, $crate::log_location!(), format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_verbose {
    ($category:expr, $($arg:tt)+) => {
        $crate::get_logger().log_fmt($category, $crate::LogLevel::Verbose, $crate::log_location!(), format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($category:expr, $func:expr, $($arg:tt)+) => {
        $crate::get_logger().log_fmt($category, $crate::LogLevel::Debug, $crate::log_location!($func), format_args!($($arg)+))
    };
}
