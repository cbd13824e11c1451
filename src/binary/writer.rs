//! Sentinel file writer.

use std::io::Write;
use std::path::Path;

use super::format::*;
use super::sink::{ByteCounter, WireWrite};
use crate::rule::{Statement, Value};
use crate::{ContextSet, Field, Result, Sentinel};

/// Binary sentinel file writer.
pub struct SentinelWriter {
    buffer: Vec<u8>,
}

impl SentinelWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(64 * 1024),
        }
    }

    /// Encode sentinels into a complete binary stream.
    pub fn write(&mut self, sentinels: &[Sentinel]) -> Result<Vec<u8>> {
        self.buffer.clear();
        write_sentinels(&mut self.buffer, sentinels)?;
        Ok(std::mem::take(&mut self.buffer))
    }

    /// Encode sentinels and atomically replace the file at `path`.
    ///
    /// Nothing is written to disk unless encoding succeeds. Returns the number
    /// of bytes written.
    pub fn write_file(&mut self, sentinels: &[Sentinel], path: &Path) -> Result<usize> {
        let data = self.write(sentinels)?;
        persist(path, &data)?;
        log::info!(
            "Wrote {} sentinels to {:?} ({} bytes)",
            sentinels.len(),
            path,
            data.len()
        );
        Ok(data.len())
    }
}

impl Default for SentinelWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the header, offset table and all sentinel records.
pub fn write_sentinels<W: Write>(w: &mut W, sentinels: &[Sentinel]) -> Result<()> {
    let offsets = offset_table(sentinels)?;
    write_header(w, &offsets)?;

    for sentinel in sentinels {
        encode_sentinel(w, sentinel)?;
    }

    w.flush()?;
    Ok(())
}

/// Absolute offset of each sentinel record.
///
/// Runs the real encoder into a [`ByteCounter`], so the table cannot drift
/// from the bytes [`write_sentinels`] produces.
pub fn offset_table(sentinels: &[Sentinel]) -> Result<Vec<u64>> {
    let mut counter = ByteCounter::new();
    write_header(&mut counter, &vec![0; sentinels.len()])?;

    let mut offsets = Vec::with_capacity(sentinels.len());
    for sentinel in sentinels {
        offsets.push(counter.offset());
        encode_sentinel(&mut counter, sentinel)?;
    }

    log::debug!(
        "Computed offset table for {} sentinels ({} bytes total)",
        sentinels.len(),
        counter.offset()
    );
    Ok(offsets)
}

/// Version tag, offset table and the redundant sentinel count.
fn write_header<W: Write>(w: &mut W, offsets: &[u64]) -> Result<()> {
    w.put_u32(FORMAT_VERSION)?;
    w.put_count("offset table", offsets.len())?;
    for offset in offsets {
        w.put_u64(*offset)?;
    }
    w.put_count("sentinel count", offsets.len())
}

/// Encode one sentinel record.
pub fn encode_sentinel<W: Write>(w: &mut W, sentinel: &Sentinel) -> Result<()> {
    w.put_str("method", &sentinel.method)?;

    w.put_count("path segments", sentinel.path.len())?;
    for segment in &sentinel.path {
        w.put_str("path segment", segment)?;
    }

    w.put_count("rules", sentinel.rules.len())?;
    for rule in &sentinel.rules {
        w.put_count("clauses", rule.clauses.len())?;
        for clause in &rule.clauses {
            w.put_count("statements", clause.statements.len())?;
            for stmt in &clause.statements {
                encode_statement(w, stmt)?;
            }
        }
    }

    Ok(())
}

fn encode_statement<W: Write>(w: &mut W, stmt: &Statement) -> Result<()> {
    w.put_u8(stmt.field.map_or(NO_FIELD, Field::as_u8))?;
    w.put_u8(stmt.op.as_u8())?;

    match (&stmt.field, &stmt.value) {
        (Some(Field::Ctx), value) => {
            let list = value.as_ref().and_then(Value::literal).unwrap_or("");
            let contexts = ContextSet::parse_list(list)?;
            w.put_u8(ValueKind::Numeric.as_u8())?;
            w.put_u64(contexts.bits())
        }
        (_, Some(Value::Pattern(pattern))) => {
            w.put_u8(ValueKind::Regexp.as_u8())?;
            w.put_str("regex pattern", pattern)
        }
        (_, Some(Value::Literal(literal))) => {
            w.put_u8(ValueKind::String.as_u8())?;
            w.put_str("string value", literal)
        }
        (_, None) => {
            w.put_u8(ValueKind::String.as_u8())?;
            w.put_str("string value", "")
        }
    }
}

/// Atomically replace `path` with `data`.
///
/// The bytes go to a temporary file in the destination directory which is
/// then renamed over the target.
pub fn persist(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
    temp_file.write_all(data)?;
    temp_file.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
