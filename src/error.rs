//! Error types for sentrule.

use thiserror::Error;

/// Error type for sentrule operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule string of an endpoint failed to lex or parse
    #[error("invalid rule {rule:?} for endpoint {endpoint}: {source}")]
    InvalidRule {
        endpoint: String,
        rule: String,
        #[source]
        source: RuleError,
    },

    /// Unknown context name in a `$ctx` value
    #[error("unknown context: {0:?}")]
    UnknownContext(String),

    /// A count or string length does not fit the 16-bit wire field
    #[error("{what} too long for the sentinel format: {len} (max 65535)")]
    LengthOverflow { what: &'static str, len: usize },

    /// Unsupported binary format version
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// Input ended in the middle of a value
    #[error("truncated sentinel data: need {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// Unknown field, operator or value-kind code
    #[error("invalid {what} code: {code}")]
    InvalidCode { what: &'static str, code: u8 },

    /// Numeric `$ctx` payload carries bits of no known context
    #[error("invalid context mask: {0:#x}")]
    InvalidContextMask(u64),

    /// String payload is not valid UTF-8
    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// Offset table and sentinel count disagree
    #[error("offset count {offsets} does not match sentinel count {sentinels}")]
    CountMismatch { offsets: u16, sentinels: u16 },

    /// A sentinel record does not start at its recorded offset
    #[error("sentinel {index} recorded at offset {recorded} but found at {actual}")]
    OffsetMismatch {
        index: usize,
        recorded: u64,
        actual: u64,
    },
}

/// Result type alias for sentrule operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for lexing and parsing a single rule string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Input ended inside a quoted or regex literal
    #[error("unterminated literal: missing closing {delimiter:?}")]
    UnterminatedLiteral { delimiter: char },

    /// `$` token that names no known field
    #[error("unknown variable: {0}")]
    UnknownField(String),

    /// Bare word that is neither an operator nor an action
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// `$ctx` value naming no known context
    #[error("unknown context: {0:?}")]
    UnknownContext(String),
}
