//! Statement field definitions.

use std::fmt;

/// Field is the request facet a statement inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Field {
    /// Context selector (`$ctx`), value is a `|`-separated context list
    Ctx = 1,
    /// Key of the current element (`$key`)
    Key = 2,
    /// Value of the current element (`$val`)
    Val = 3,
    /// Nesting depth of the current element (`$depth`)
    Depth = 4,
}

impl Field {
    /// Parse a field reference, including its `$` sigil.
    ///
    /// Matching is exact: `$CTX` is not a field.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "$ctx" => Some(Field::Ctx),
            "$key" => Some(Field::Key),
            "$val" => Some(Field::Val),
            "$depth" => Some(Field::Depth),
            _ => None,
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Ctx => "$ctx",
            Field::Key => "$key",
            Field::Val => "$val",
            Field::Depth => "$depth",
        }
    }

    /// Convert to a u8 value for binary serialization.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert from a u8 value.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Field::Ctx),
            2 => Some(Field::Key),
            3 => Some(Field::Val),
            4 => Some(Field::Depth),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_parse() {
        assert_eq!(Field::parse("$ctx"), Some(Field::Ctx));
        assert_eq!(Field::parse("$key"), Some(Field::Key));
        assert_eq!(Field::parse("$val"), Some(Field::Val));
        assert_eq!(Field::parse("$depth"), Some(Field::Depth));
        assert_eq!(Field::parse("$CTX"), None);
        assert_eq!(Field::parse("ctx"), None);
        assert_eq!(Field::parse("$"), None);
    }

    #[test]
    fn test_field_codes() {
        assert_eq!(Field::Ctx.as_u8(), 1);
        assert_eq!(Field::Key.as_u8(), 2);
        assert_eq!(Field::Val.as_u8(), 3);
        assert_eq!(Field::Depth.as_u8(), 4);
        assert_eq!(Field::from_u8(0), None);
        assert_eq!(Field::from_u8(5), None);
    }

    #[test]
    fn test_field_roundtrip() {
        for field in [Field::Ctx, Field::Key, Field::Val, Field::Depth] {
            assert_eq!(Field::from_u8(field.as_u8()), Some(field));
            assert_eq!(Field::parse(field.as_str()), Some(field));
        }
    }
}
