//! sentrule - Compiler for per-endpoint HTTP filtering rules.
//!
//! This crate turns a JSON list of endpoints, each carrying rule strings in a
//! small filtering language, into the positional binary "sentinel" format read
//! by a request-time filtering engine.
//!
//! # Rule Language
//!
//! ```text
//! $ctx == 'json_obj' $key == 'role' $val == 'admin' : block
//! ```
//!
//! - Clauses are separated by `:` and evaluated in order
//! - Statements inside a clause are conjoined
//! - Fields: `$ctx`, `$key`, `$val`, `$depth`
//! - Operators: `==`, `!=`; actions: `block`, `pass`
//! - Values: `'literal'` or `/regex/` (the regex is compiled by the engine)
//! - `$ctx` values are `|`-separated context names, e.g. `'json_obj|json_array'`
//!
//! # Quick Start
//!
//! ```ignore
//! use sentrule::converter::EndpointConverter;
//! use sentrule::{build_sentinels, SentinelWriter};
//! use std::path::Path;
//!
//! let endpoints = EndpointConverter::load(Path::new("endpoints.json"))?;
//! let sentinels = build_sentinels(&endpoints)?;
//! SentinelWriter::new().write_file(&sentinels, Path::new("sentinels.bin"))?;
//! ```
//!
//! # Pipeline
//!
//! 1. [`rule::tokenize`] splits a rule string into token groups
//! 2. [`rule::parse_clause`] turns each group into statements
//! 3. [`build_sentinels`] assembles one [`Sentinel`] per endpoint
//! 4. [`SentinelWriter`] encodes the header, offset table and records
//!
//! Any error aborts the whole run and no output file is touched.

mod context;
mod error;
mod field;
mod operator;
mod sentinel;

pub mod binary;
pub mod converter;
pub mod rule;

use std::path::Path;

// Re-export core types
pub use context::{Context, ContextSet};
pub use error::{Error, Result, RuleError};
pub use field::Field;
pub use operator::Operator;
pub use rule::{Clause, Rule, Statement, Value};
pub use sentinel::{build_sentinels, split_path, Sentinel};

// Re-export binary types
pub use binary::{SentinelReader, SentinelWriter};

use converter::{Endpoint, EndpointConverter};

/// Compile endpoints into a sentinel byte stream.
pub fn compile(endpoints: &[Endpoint]) -> Result<Vec<u8>> {
    let sentinels = build_sentinels(endpoints)?;
    SentinelWriter::new().write(&sentinels)
}

/// Compile an endpoint file into a sentinel file.
///
/// The output is replaced atomically and only after compilation succeeded.
/// Returns the number of bytes written.
pub fn compile_file(input: &Path, output: &Path) -> Result<usize> {
    let endpoints = EndpointConverter::load(input)?;
    let sentinels = build_sentinels(&endpoints)?;
    SentinelWriter::new().write_file(&sentinels, output)
}
