//! Standard extensions for faultline error domains
//!
//! Each module provides one extension: a [`Domain`](faultline_core::Domain)
//! fragment to pass to `with(..)`, plus a configuration trait whose methods
//! appear on domains and builders that have the fragment installed.
//!
//! | Extension | Fragment | Knobs |
//! |---|---|---|
//! | status codes | [`status()`] | [`StatusConfig`] |
//! | pass-through | [`passthrough()`] | |
//! | fan-out sinks | [`tee()`] | [`TeeConfig`] |
//! | descriptions | [`description()`] | [`DescribeConfig`] |
//! | culprit rendering | [`print()`] | [`PrintConfig`] |
//! | operand decomposition | [`print_operands()`] | [`PrintOperandsConfig`] |
//! | logging | [`logging()`] | [`LoggingConfig`] |
//! | forwarding `attempt!` | [`forward()`] | [`ForwardConfig`] |
//!
//! [`standard()`] installs all of them.
//!
//! ```
//! use faultline_domain::{standard, Code, Status, StatusConfig};
//!
//! let domain = standard().default_error_code(Code::Internal);
//! assert!(!domain.verify(&Status::ok()).is_error());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod defaults;
pub mod description;
pub mod error;
pub mod forward;
pub mod logging;
pub mod message;
pub mod passthrough;
pub mod print;
pub mod print_operands;
pub mod status;
pub mod tee;

#[cfg(test)]
mod testing;

pub use config::{DomainConfig, FilterConfig, LogConfig};
pub use defaults::{standard, Standard, StandardBuilder, StandardPolicy};
pub use description::{description, Describe, DescribeConfig};
pub use error::{ConfigError, DomainError, Result};
pub use forward::{forward, Forward, ForwardConfig, Forwarding};
pub use logging::{logging, Filter, LogSetting, Logger, Logging, LoggingConfig, Record};
pub use message::{format_message, MessageStyle};
pub use passthrough::{passthrough, Passthrough};
pub use print::{print, Print, PrintConfig, Printer};
pub use print_operands::{print_operands, PrintOperands, PrintOperandsConfig};
pub use status::{status, Code, MakeStatus, Status, StatusConfig};
pub use tee::{tee, IntoSink, Sink, Tee, TeeConfig};
