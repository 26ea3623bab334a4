//! Canonical status codes
//!
//! [`Status`] is a code plus a message. Both [`Status`] and [`Code`] can be
//! verified (anything but [`Code::Ok`] is an error) and returned from a failed
//! check. The code of a returned status comes from, in order:
//!
//! 1. `error_code(..)`, when set
//! 2. the culprit's own code, when the culprit is a `Status` or `Code`
//! 3. `default_error_code(..)`
//! 4. [`Code::Unknown`], with a warning for `Status` targets

use crate::description::{builder_description, policy_description};
use crate::error::DomainError;
use crate::message::{format_message, MessageStyle};
use faultline_core::{
    Acceptor, Annotated, BuilderLayer, Contains, Domain, ErrorMaker, Hook, Key, Target, Verify,
};
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;
use std::str::FromStr;

/// Canonical error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Code {
    /// Not an error
    #[default]
    Ok,
    /// The operation was cancelled
    Cancelled,
    /// Unknown error
    Unknown,
    /// The caller passed an invalid argument
    InvalidArgument,
    /// The deadline expired before the operation completed
    DeadlineExceeded,
    /// A requested entity was not found
    NotFound,
    /// The entity the caller tried to create already exists
    AlreadyExists,
    /// The caller may not perform the operation
    PermissionDenied,
    /// Some resource has been exhausted
    ResourceExhausted,
    /// The system is not in a state required for the operation
    FailedPrecondition,
    /// The operation was aborted
    Aborted,
    /// The operation was attempted past the valid range
    OutOfRange,
    /// The operation is not implemented
    Unimplemented,
    /// Internal invariant broken
    Internal,
    /// The service is currently unavailable
    Unavailable,
    /// Unrecoverable data loss or corruption
    DataLoss,
    /// The request lacks valid credentials
    Unauthenticated,
}

impl Code {
    /// Every code, in numeric order
    pub const ALL: [Code; 17] = [
        Code::Ok,
        Code::Cancelled,
        Code::Unknown,
        Code::InvalidArgument,
        Code::DeadlineExceeded,
        Code::NotFound,
        Code::AlreadyExists,
        Code::PermissionDenied,
        Code::ResourceExhausted,
        Code::FailedPrecondition,
        Code::Aborted,
        Code::OutOfRange,
        Code::Unimplemented,
        Code::Internal,
        Code::Unavailable,
        Code::DataLoss,
        Code::Unauthenticated,
    ];

    /// Canonical upper-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::Cancelled => "CANCELLED",
            Code::Unknown => "UNKNOWN",
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::PermissionDenied => "PERMISSION_DENIED",
            Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Aborted => "ABORTED",
            Code::OutOfRange => "OUT_OF_RANGE",
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
            Code::Unavailable => "UNAVAILABLE",
            Code::DataLoss => "DATA_LOSS",
            Code::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// Whether this is [`Code::Ok`]
    pub fn is_ok(self) -> bool {
        self == Code::Ok
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Code {
    type Err = DomainError;

    /// Parse a canonical name; case and `-`/`_` are not significant
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Code::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| DomainError::UnknownCode { name: s.to_string() })
    }
}

/// A code and a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    /// Status with the given code and message
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The OK status
    pub fn ok() -> Self {
        Self::default()
    }

    /// Whether the code is [`Code::Ok`]
    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }

    /// Status code
    pub fn code(&self) -> Code {
        self.code
    }

    /// Message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for Status {}

/// Acceptor for a borrowed [`Status`]
#[derive(Debug)]
pub struct StatusAcceptor<'a>(&'a Status);

impl Acceptor for StatusAcceptor<'_> {
    type Culprit = Status;

    fn is_error(&self) -> bool {
        !self.0.is_ok()
    }

    fn culprit(self) -> Status {
        self.0.clone()
    }
}

impl Verify for Status {
    type Acceptor<'a> = StatusAcceptor<'a>;

    fn verify(&self) -> StatusAcceptor<'_> {
        StatusAcceptor(self)
    }
}

/// Acceptor for a [`Code`]
#[derive(Debug, Clone, Copy)]
pub struct CodeAcceptor(Code);

impl Acceptor for CodeAcceptor {
    type Culprit = Code;

    fn is_error(&self) -> bool {
        !self.0.is_ok()
    }

    fn culprit(self) -> Code {
        self.0
    }
}

impl Verify for Code {
    type Acceptor<'a> = CodeAcceptor;

    fn verify(&self) -> CodeAcceptor {
        CodeAcceptor(*self)
    }
}

/// Annotation overriding the code of every returned status
pub struct ErrorCodeKey;

impl Key for ErrorCodeKey {
    type Value = Code;
}

/// Annotation with the code used when nothing else provides one
pub struct DefaultErrorCodeKey;

impl Key for DefaultErrorCodeKey {
    type Value = Code;
}

fn fallback_code(maker: &dyn ErrorMaker) -> Option<Code> {
    let annotations = maker.annotations();
    annotations
        .get::<ErrorCodeKey>()
        .or_else(|| annotations.get::<DefaultErrorCodeKey>())
        .copied()
}

impl Target for Status {
    fn make_error(maker: &dyn ErrorMaker) -> Self {
        let code = fallback_code(maker).unwrap_or_else(|| {
            tracing::warn!(
                location = %maker.context().location,
                "no error code configured; use .error_code() or .default_error_code() to set one"
            );
            Code::Unknown
        });
        Status::new(code, format_message(maker, MessageStyle::status()))
    }
}

impl Target for Code {
    fn make_error(maker: &dyn ErrorMaker) -> Self {
        fallback_code(maker).unwrap_or(Code::Unknown)
    }
}

/// Builder layer that makes statuses from `Status` and `Code` culprits
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeStatus;

impl MakeStatus {
    fn from_status(maker: &dyn ErrorMaker, culprit: &Status) -> Status {
        let annotations = maker.annotations();
        let code = annotations.get::<ErrorCodeKey>().copied();
        let policy = policy_description(maker);
        let builder = builder_description(maker);
        if policy.is_empty() && builder.is_empty() {
            return match code {
                Some(code) => Status::new(code, culprit.message()),
                None => culprit.clone(),
            };
        }
        let message = [culprit.message(), policy.as_str(), builder.as_str()]
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        Status::new(code.unwrap_or(culprit.code()), message)
    }
}

impl BuilderLayer for MakeStatus {
    fn make_error(&self, maker: &dyn ErrorMaker, target: TypeId) -> Hook<Box<dyn Any>> {
        let culprit = maker.culprit();
        let status = culprit.downcast_ref::<Status>();
        let Some(culprit_code) = status
            .map(Status::code)
            .or_else(|| culprit.downcast_ref::<Code>().copied())
        else {
            return Hook::Pass(());
        };
        let code = maker
            .annotations()
            .get::<ErrorCodeKey>()
            .copied()
            .unwrap_or(culprit_code);

        if target == TypeId::of::<Code>() {
            return Hook::Handled(Box::new(code));
        }
        if target != TypeId::of::<Status>() {
            return Hook::Pass(());
        }
        let made = match status {
            Some(status) => Self::from_status(maker, status),
            None => Status::new(
                code,
                format_message(maker, MessageStyle::status().without_culprit()),
            ),
        };
        Hook::Handled(Box::new(made))
    }
}

/// Extension: status codes and their knobs
pub fn status() -> Domain<(), MakeStatus> {
    Domain::builder(MakeStatus)
}

/// Error code knobs; the last call wins
pub trait StatusConfig<I>: Annotated {
    /// Use `code` for every returned status
    fn error_code(self, code: Code) -> Self {
        self.annotate::<ErrorCodeKey>(code)
    }

    /// Cancel earlier `error_code` calls
    fn no_error_code(self) -> Self {
        self.unannotate::<ErrorCodeKey>()
    }

    /// Use `code` when neither `error_code` nor the culprit provides one
    fn default_error_code(self, code: Code) -> Self {
        self.annotate::<DefaultErrorCodeKey>(code)
    }

    /// Cancel earlier `default_error_code` calls
    fn no_default_error_code(self) -> Self {
        self.unannotate::<DefaultErrorCodeKey>()
    }
}

impl<D, I> StatusConfig<I> for D
where
    D: Annotated,
    D::Builder: Contains<MakeStatus, I>,
{
}
