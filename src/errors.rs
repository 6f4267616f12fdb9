//! Error types shared by the parser and the accessor layer
use std::fmt::{Display, Formatter};

use crate::value::{Tag, Value};

/// Global result type used throughout the crate
pub type JsonResult<T> = Result<T, JsonError>;

/// A global enumeration of fault classes
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetails {
    /// Any grammar violation found while parsing; carries a one-line reason
    Syntax(&'static str),
    /// A conversion was applied to a value of the wrong type
    BadType { expected: Tag },
    /// An integer lay outside the requested range
    BadIntRange { lo: i64, hi: i64 },
    /// A float lay outside the requested range
    BadFloatRange { lo: f64, hi: f64 },
    /// A required object member was absent
    MemberNotFound,
    /// An object member was never read, from [Value::reject_unknown_members]
    UnknownMember,
    /// A positional lookup fell outside the container
    OutOfRange { len: usize },
    /// A string matched none of the candidate enumeration strings
    BadEnum,
}

impl ErrorDetails {
    /// The short human-readable reason for this class of fault
    fn message(&self) -> &'static str {
        match self {
            ErrorDetails::Syntax(msg) => msg,
            ErrorDetails::BadType { .. } => "bad type",
            ErrorDetails::BadIntRange { .. } => "bad integer range",
            ErrorDetails::BadFloatRange { .. } => "bad float range",
            ErrorDetails::MemberNotFound => "member not found",
            ErrorDetails::UnknownMember => "unknown member",
            ErrorDetails::OutOfRange { .. } => "index out of range",
            ErrorDetails::BadEnum => "unsupported value",
        }
    }
}

/// The general error structure
///
/// Every error carries the 1-based source line it is attributed to. Errors
/// raised against a specific value additionally carry that value's member
/// name (or positional index) and tag, so the operator can locate the
/// offending entry in the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonError {
    /// The fault class along with any expected-set information
    pub details: ErrorDetails,
    /// 1-based line number within the source document
    pub line: u32,
    /// Member name of the offending value, or the requested name for
    /// [ErrorDetails::MemberNotFound]; empty when not applicable
    pub name: String,
    /// Position of the offending value within its container, -1 when not
    /// applicable
    pub idx: i32,
    /// Tag of the offending value, when one exists
    pub tag: Option<Tag>,
}

impl JsonError {
    /// Construct an error for a grammar violation at a given line
    pub fn syntax(msg: &'static str, line: u32) -> Self {
        JsonError {
            details: ErrorDetails::Syntax(msg),
            line,
            name: String::new(),
            idx: -1,
            tag: None,
        }
    }

    /// Construct an error scoped to an offending value
    pub fn for_value(details: ErrorDetails, value: &Value<'_>) -> Self {
        JsonError {
            details,
            line: value.line(),
            name: value.name().to_owned(),
            idx: value.idx(),
            tag: Some(value.tag()),
        }
    }

    /// Construct an error for a member that was looked up on an object but
    /// not found; the line cited is the object's own
    pub fn member_not_found(obj: &Value<'_>, name: &str) -> Self {
        JsonError {
            details: ErrorDetails::MemberNotFound,
            line: obj.line(),
            name: name.to_owned(),
            idx: -1,
            tag: None,
        }
    }

    /// True when the error was raised by the parser rather than by the
    /// accessor layer
    pub fn is_syntax(&self) -> bool {
        matches!(self.details, ErrorDetails::Syntax(_))
    }
}

impl Display for JsonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "({}): {}", self.line, self.details.message())?;
        if !self.name.is_empty() {
            writeln!(f, "  value name: {}", self.name)?;
        } else if self.idx >= 0 {
            writeln!(f, "  value index: {}", self.idx)?;
        }
        if let Some(tag) = self.tag {
            writeln!(f, "  value type: {tag}")?;
        }
        match &self.details {
            ErrorDetails::BadType { expected } => {
                writeln!(f, "  expected type: {expected}")?;
            }
            ErrorDetails::BadIntRange { lo, hi } if lo <= hi => {
                writeln!(f, "  expected range: {lo} ... {hi}")?;
            }
            ErrorDetails::BadFloatRange { lo, hi } if lo <= hi => {
                writeln!(f, "  expected range: {lo} ... {hi}")?;
            }
            ErrorDetails::OutOfRange { len } => {
                writeln!(f, "  container length: {len}")?;
            }
            _ => (),
        }
        Ok(())
    }
}

impl std::error::Error for JsonError {}

/// Convenience macro for raising a syntax error from within the parser
#[macro_export]
macro_rules! syntax_error {
    ($msg:expr, $line:expr) => {
        Err($crate::errors::JsonError::syntax($msg, $line))
    };
}

/// Convenience macro for raising an error scoped to an offending [Value]
#[macro_export]
macro_rules! value_error {
    ($details:expr, $value:expr) => {
        Err($crate::errors::JsonError::for_value($details, $value))
    };
}
