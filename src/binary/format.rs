//! Binary format constants.

/// Format revision checked by the filtering engine.
pub const FORMAT_VERSION: u32 = 4;

/// Field code written for statements without a field (bare actions).
pub const NO_FIELD: u8 = 0;

/// Size of the version tag.
pub const VERSION_SIZE: usize = 4;

/// Size of each u16 count (`offset_count`, `sentinel_count`, ...).
pub const COUNT_SIZE: usize = 2;

/// Size of one offset table entry.
pub const OFFSET_SIZE: usize = 8;

/// Byte length of everything before the first sentinel record.
pub fn header_size(sentinel_count: usize) -> usize {
    VERSION_SIZE + COUNT_SIZE + sentinel_count * OFFSET_SIZE + COUNT_SIZE
}

/// Value-kind tag preceding each statement payload.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// u64 context bitmask
    Numeric = 1,
    /// Length-prefixed literal
    String = 2,
    /// Length-prefixed regex source, delimiters included
    Regexp = 3,
}

impl ValueKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Numeric),
            2 => Some(Self::String),
            3 => Some(Self::Regexp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size() {
        assert_eq!(header_size(0), 8);
        assert_eq!(header_size(1), 16);
        assert_eq!(header_size(3), 32);
    }

    #[test]
    fn test_value_kind_codes() {
        assert_eq!(ValueKind::Numeric.as_u8(), 1);
        assert_eq!(ValueKind::String.as_u8(), 2);
        assert_eq!(ValueKind::Regexp.as_u8(), 3);
        assert_eq!(ValueKind::from_u8(0), None);
        assert_eq!(ValueKind::from_u8(4), None);
    }
}
