//! Binary sentinel format consumed by the filtering engine.
//!
//! All integers are little-endian. Strings are a u16 byte length followed by
//! the raw bytes.
//!
//! # File Structure
//!
//! ```text
//! +---------------------+
//! | version        u32  |  FORMAT_VERSION
//! +---------------------+
//! | offset_count   u16  |
//! | offsets   u64 x n   |  absolute offset of each sentinel record
//! | sentinel_count u16  |  same as offset_count
//! +---------------------+
//! | SENTINEL 0          |  method, path segments, rules
//! +---------------------+
//! | SENTINEL 1          |
//! +---------------------+
//! |      ...            |
//! +---------------------+
//! ```
//!
//! A sentinel record is laid out as:
//!
//! ```text
//! method: str
//! segment_count: u16, segments: str x segment_count
//! rule_count: u16
//!   clause_count: u16
//!     statement_count: u16
//!       field: u8, operator: u8, kind: u8, payload (u64 mask | str)
//! ```

mod format;
mod reader;
mod sink;
pub mod writer;


pub use format::*;
pub use reader::SentinelReader;
pub use sink::{ByteCounter, WireWrite};
pub use writer::{encode_sentinel, offset_table, persist, write_sentinels, SentinelWriter};
