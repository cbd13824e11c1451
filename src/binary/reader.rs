//! Sentinel file reader.
//!
//! Mirrors the writer: it decodes the header and offset table and rebuilds
//! [`Sentinel`] values, either by random access through the offset table or
//! by a sequential scan that checks every recorded offset.

use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

use super::format::*;
use crate::rule::{Clause, Rule, Statement, Value};
use crate::{ContextSet, Error, Field, Operator, Result, Sentinel};

enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Backing {
    fn as_slice(&self) -> &[u8] {
        match self {
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Owned(data) => &data[..],
        }
    }
}

/// Binary sentinel file reader.
pub struct SentinelReader {
    data: Backing,
    version: u32,
    offsets: Vec<u64>,
}

impl SentinelReader {
    /// Open a sentinel file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Err(Error::Truncated {
                offset: 0,
                needed: VERSION_SIZE,
            });
        }

        let mmap = unsafe { Mmap::map(&file)? };
        Self::with_backing(Backing::Mapped(mmap))
    }

    /// Read sentinels from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::with_backing(Backing::Owned(data))
    }

    fn with_backing(data: Backing) -> Result<Self> {
        let mut cursor = Cursor::new(data.as_slice(), 0);

        let version = cursor.u32()?;
        if version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let offset_count = cursor.u16()?;
        let offsets = (0..offset_count)
            .map(|_| cursor.u64())
            .collect::<Result<Vec<_>>>()?;

        let sentinel_count = cursor.u16()?;
        if sentinel_count != offset_count {
            return Err(Error::CountMismatch {
                offsets: offset_count,
                sentinels: sentinel_count,
            });
        }

        Ok(Self {
            data,
            version,
            offsets,
        })
    }

    /// Format version of the file.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Recorded offset of each sentinel.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Number of sentinels.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Raw file contents.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Decode the sentinel at `index` by seeking to its recorded offset.
    ///
    /// Returns `None` when `index` is out of range.
    pub fn sentinel(&self, index: usize) -> Option<Result<Sentinel>> {
        let offset = *self.offsets.get(index)?;
        let mut cursor = Cursor::new(self.as_bytes(), offset as usize);
        Some(cursor.sentinel())
    }

    /// Decode all sentinels in file order.
    ///
    /// Fails if any record does not start at the offset recorded for it.
    pub fn sentinels(&self) -> Result<Vec<Sentinel>> {
        let mut cursor = Cursor::new(self.as_bytes(), header_size(self.len()));
        let mut sentinels = Vec::with_capacity(self.len());

        for (index, recorded) in self.offsets.iter().enumerate() {
            let actual = cursor.pos as u64;
            if actual != *recorded {
                return Err(Error::OffsetMismatch {
                    index,
                    recorded: *recorded,
                    actual,
                });
            }
            sentinels.push(cursor.sentinel()?);
        }

        Ok(sentinels)
    }
}

/// Bounds-checked little-endian reader over a byte slice.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(needed)
            .filter(|end| *end <= self.data.len())
            .ok_or(Error::Truncated {
                offset: self.pos,
                needed,
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    fn string(&mut self) -> Result<String> {
        let len = self.u16()? as usize;
        let offset = self.pos;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| Error::InvalidUtf8 { offset })
    }

    fn sentinel(&mut self) -> Result<Sentinel> {
        let method = self.string()?;

        let segments = self.u16()?;
        let path = (0..segments)
            .map(|_| self.string())
            .collect::<Result<Vec<_>>>()?;

        let rule_count = self.u16()?;
        let mut rules = Vec::with_capacity(rule_count as usize);
        for _ in 0..rule_count {
            let clause_count = self.u16()?;
            let mut clauses = Vec::with_capacity(clause_count as usize);
            for _ in 0..clause_count {
                let stmt_count = self.u16()?;
                let statements = (0..stmt_count)
                    .map(|_| self.statement())
                    .collect::<Result<Vec<_>>>()?;
                clauses.push(Clause::new(statements));
            }
            rules.push(Rule::new(clauses));
        }

        Ok(Sentinel {
            method,
            path,
            rules,
        })
    }

    fn statement(&mut self) -> Result<Statement> {
        let field = match self.u8()? {
            NO_FIELD => None,
            code => Some(Field::from_u8(code).ok_or(Error::InvalidCode { what: "field", code })?),
        };

        let code = self.u8()?;
        let op = Operator::from_u8(code).ok_or(Error::InvalidCode {
            what: "operator",
            code,
        })?;

        let code = self.u8()?;
        let kind = ValueKind::from_u8(code).ok_or(Error::InvalidCode {
            what: "value kind",
            code,
        })?;

        let value = match kind {
            ValueKind::Numeric => {
                let bits = self.u64()?;
                let contexts =
                    ContextSet::from_bits(bits).ok_or(Error::InvalidContextMask(bits))?;
                Some(Value::Literal(contexts.to_list()))
            }
            ValueKind::Regexp => Some(Value::Pattern(self.string()?)),
            ValueKind::String => {
                let literal = self.string()?;
                // Bare actions are written with an empty string payload.
                if op.is_terminal() && literal.is_empty() {
                    None
                } else {
                    Some(Value::Literal(literal))
                }
            }
        };

        Ok(Statement { field, op, value })
    }
}
