//! Comparison operators and terminal actions.

use std::fmt;

/// Operator is either a comparison or a terminal action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Operator {
    /// Reject the request
    Block = 1,
    /// Let the request through
    Pass = 2,
    /// Field equals value
    Eq = 3,
    /// Field differs from value
    Neq = 4,
}

impl Operator {
    /// Parse an operator or action keyword (exact match).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "block" => Some(Operator::Block),
            "pass" => Some(Operator::Pass),
            "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Neq),
            _ => None,
        }
    }

    /// Whether this operator ends a rule instead of comparing.
    pub fn is_terminal(self) -> bool {
        matches!(self, Operator::Block | Operator::Pass)
    }

    /// Convert to a u8 value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert from a u8 value.
    ///
    /// Returns `None` for invalid values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Operator::Block),
            2 => Some(Operator::Pass),
            3 => Some(Operator::Eq),
            4 => Some(Operator::Neq),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Block => "block",
            Operator::Pass => "pass",
            Operator::Eq => "==",
            Operator::Neq => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
