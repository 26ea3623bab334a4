//! Logging errors as they are returned
//!
//! Errors are not logged unless `log(..)` is called on the domain or the
//! builder. A log setting names a [`Logger`] and optionally a [`Filter`]
//! that lets a subset of records through; settings without a filter use the
//! one from `default_log_filter(..)`, or log everything when there is none.
//! The last `log`/`no_log` wins, and so does the last `default_log_filter`.
//!
//! ```
//! use faultline_core::Domain;
//! use faultline_domain::logging::{logging, Filter, Logger, LoggingConfig};
//! use std::time::Duration;
//!
//! let domain = Domain::new()
//!     .with(logging())
//!     .default_log_filter(Filter::Every(Duration::from_secs(60)))
//!     .log(Logger::Tracing(tracing::Level::WARN), None);
//! # let _ = domain;
//! ```
//!
//! Filter state is kept per call site and per filter kind for the lifetime
//! of the process.

use crate::message::{format_message, MessageStyle};
use faultline_core::{Annotated, BuilderLayer, Contains, Domain, ErrorMaker, Key, LocationId};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};
use tracing::level_filters::{LevelFilter, STATIC_MAX_LEVEL};
use tracing::Level;

/// Rate limit applied to log records from one call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Accept every record
    #[default]
    NoFilter,
    /// Accept the first `n` records; rejects everything when `n <= 0`
    FirstN(i64),
    /// Accept every `n`th record starting from the first
    ///
    /// The sign of `n` is ignored. Zero rejects everything.
    EveryN(i64),
    /// Accept records whose one-based index is a power of two
    EveryPow2,
    /// Accept one record per period starting from the first; zero accepts all
    Every(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FilterKind {
    FirstN,
    EveryN,
    EveryPow2,
    Every,
}

#[derive(Debug, Default)]
struct FilterState {
    count: AtomicI64,
    pow2: AtomicU64,
    logged: Mutex<Option<Instant>>,
}

type FilterMap = HashMap<(LocationId, FilterKind), Arc<FilterState>>;

static FILTERS: LazyLock<Mutex<FilterMap>> = LazyLock::new(|| Mutex::new(HashMap::new()));

impl Filter {
    fn kind(self) -> Option<FilterKind> {
        match self {
            Filter::NoFilter => None,
            Filter::FirstN(_) => Some(FilterKind::FirstN),
            Filter::EveryN(_) => Some(FilterKind::EveryN),
            Filter::EveryPow2 => Some(FilterKind::EveryPow2),
            Filter::Every(_) => Some(FilterKind::Every),
        }
    }

    /// Whether the filter accepts every record without keeping state
    ///
    /// Call sites with such filters never allocate filter state. A call site
    /// whose `EveryN` argument changes at runtime from 1 to something else
    /// therefore starts counting from zero.
    pub fn always_true(self) -> bool {
        match self {
            Filter::NoFilter => true,
            Filter::EveryN(n) => n == 1 || n == -1,
            Filter::Every(period) => period.is_zero(),
            Filter::FirstN(_) | Filter::EveryPow2 => false,
        }
    }

    /// Count one record at `location` and decide whether it is logged
    pub fn should_log(self, location: LocationId) -> bool {
        if self.always_true() {
            return true;
        }
        let Some(kind) = self.kind() else {
            return true;
        };
        let state = FILTERS
            .lock()
            .entry((location, kind))
            .or_default()
            .clone();
        state.test(self)
    }
}

impl FilterState {
    fn test(&self, filter: Filter) -> bool {
        match filter {
            Filter::NoFilter => true,
            Filter::FirstN(n) => self.count.fetch_add(1, Ordering::Relaxed) < n,
            Filter::EveryN(n) => {
                let i = self.count.fetch_add(1, Ordering::Relaxed);
                n != 0 && i % n == 0
            }
            Filter::EveryPow2 => {
                let i = self.pow2.fetch_add(1, Ordering::Relaxed) + 1;
                i & (i - 1) == 0
            }
            Filter::Every(period) => {
                let now = Instant::now();
                let mut logged = self.logged.lock();
                match *logged {
                    Some(last) if now.duration_since(last) < period => false,
                    _ => {
                        *logged = Some(now);
                        true
                    }
                }
            }
        }
    }
}

/// Number of call-site filter states allocated so far
pub fn filter_states() -> usize {
    FILTERS.lock().len()
}

/// One log record
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Source file of the call site
    pub file: &'a str,
    /// Line of the call site
    pub line: u32,
    /// Path of the enclosing function
    pub function: &'a str,
    /// Formatted error message
    pub message: &'a str,
}

type LogFn = Arc<dyn Fn(&Record<'_>) + Send + Sync>;

/// Where log records go
#[derive(Clone, Default)]
pub enum Logger {
    /// Discard records
    #[default]
    Null,
    /// Emit a `tracing` event at the given level
    Tracing(Level),
    /// Hand records to a callback
    Callback(LogFn),
}

impl Logger {
    /// Logger that hands records to `f`
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&Record<'_>) + Send + Sync + 'static,
    {
        Logger::Callback(Arc::new(f))
    }

    /// Whether a record would go anywhere
    pub fn enabled(&self) -> bool {
        match self {
            Logger::Null => false,
            Logger::Tracing(level) => {
                *level <= STATIC_MAX_LEVEL && *level <= LevelFilter::current()
            }
            Logger::Callback(_) => true,
        }
    }

    /// Write one record
    pub fn log(&self, record: &Record<'_>) {
        match self {
            Logger::Null => {}
            Logger::Callback(f) => f(record),
            Logger::Tracing(level) => emit(*level, record),
        }
    }
}

macro_rules! emit_at {
    ($mac:ident, $record:expr) => {
        tracing::$mac!(
            target: "faultline",
            file = $record.file,
            line = $record.line,
            function = $record.function,
            "{}",
            $record.message
        )
    };
}

fn emit(level: Level, record: &Record<'_>) {
    match level {
        Level::ERROR => emit_at!(error, record),
        Level::WARN => emit_at!(warn, record),
        Level::INFO => emit_at!(info, record),
        Level::DEBUG => emit_at!(debug, record),
        _ => emit_at!(trace, record),
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logger::Null => f.write_str("Null"),
            Logger::Tracing(level) => f.debug_tuple("Tracing").field(level).finish(),
            Logger::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// A logger with an optional filter of its own
#[derive(Debug, Clone, Default)]
pub struct LogSetting {
    /// Destination
    pub logger: Logger,
    /// Filter; `None` falls back to the default filter
    pub filter: Option<Filter>,
}

/// Annotation holding the active log setting
pub struct LogKey;

impl Key for LogKey {
    type Value = LogSetting;
}

/// Annotation holding the filter used by settings without one
pub struct DefaultLogFilterKey;

impl Key for DefaultLogFilterKey {
    type Value = Filter;
}

/// Builder layer that logs returned errors
#[derive(Debug, Clone, Copy, Default)]
pub struct Logging;

impl BuilderLayer for Logging {
    fn observe(&self, maker: &dyn ErrorMaker, _ret: &dyn Any) {
        let annotations = maker.annotations();
        let Some(setting) = annotations.get::<LogKey>() else {
            return;
        };
        if !setting.logger.enabled() {
            return;
        }
        let filter = setting
            .filter
            .or_else(|| annotations.get::<DefaultLogFilterKey>().copied())
            .unwrap_or_default();
        let location = maker.context().location;
        if !filter.should_log(location.id) {
            return;
        }
        let message = format_message(maker, MessageStyle::log());
        setting.logger.log(&Record {
            file: location.file,
            line: location.line,
            function: maker.context().function,
            message: &message,
        });
    }
}

/// Extension: logging
pub fn logging() -> Domain<(), Logging> {
    Domain::builder(Logging)
}

/// Logging knobs
pub trait LoggingConfig<I>: Annotated {
    /// Log errors to `logger`, rate limited by `filter`
    fn log(self, logger: Logger, filter: Option<Filter>) -> Self {
        self.annotate::<LogKey>(LogSetting { logger, filter })
    }

    /// Stop logging
    fn no_log(self) -> Self {
        self.annotate::<LogKey>(LogSetting::default())
    }

    /// Filter for log settings that do not name one
    fn default_log_filter(self, filter: Filter) -> Self {
        self.annotate::<DefaultLogFilterKey>(filter)
    }
}

impl<D, I> LoggingConfig<I> for D
where
    D: Annotated,
    D::Builder: Contains<Logging, I>,
{
}
