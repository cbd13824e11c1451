//! Rule language model.
//!
//! A rule is written as clauses separated by `:`:
//!
//! ```text
//! $ctx == 'json_obj' $key == 'role' $val == 'admin' : block
//! ```
//!
//! Each clause is a conjunction of statements. Clauses before the last narrow
//! the inspected context; the last one ends in `block` or `pass`. Evaluation
//! happens in the filtering engine, so order is kept exactly as written.

pub mod lexer;
pub mod parser;

use std::fmt;
use std::str::FromStr;

use crate::error::RuleError;
use crate::{Field, Operator};

pub use lexer::tokenize;
pub use parser::{parse_clause, StatementBuilder, Step};

/// Statement value as written in rule text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Quoted literal, quotes removed and escapes resolved
    Literal(String),
    /// Regex literal including its `/` delimiters, escapes kept
    Pattern(String),
}

impl Value {
    /// Literal text, if this is a literal.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Value::Literal(s) => Some(s),
            Value::Pattern(_) => None,
        }
    }
}

/// A single predicate (`$key == 'role'`) or terminal action (`block`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    pub field: Option<Field>,
    pub op: Operator,
    pub value: Option<Value>,
}

impl Statement {
    /// Create a predicate statement.
    pub fn predicate(field: Field, op: Operator, value: Value) -> Self {
        Self {
            field: Some(field),
            op,
            value: Some(value),
        }
    }

    /// Create a bare terminal action.
    pub fn terminal(op: Operator) -> Self {
        Self {
            field: None,
            op,
            value: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.op.is_terminal()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(field) = self.field {
            parts.push(field.to_string());
        }
        parts.push(self.op.to_string());
        match &self.value {
            Some(Value::Literal(s)) => parts.push(format!("'{}'", escape_literal(s))),
            Some(Value::Pattern(p)) => parts.push(p.clone()),
            None => {}
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Backslash-escape quotes and backslashes so the literal reads back as is.
fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Conjunction of statements, one per `:`-separated group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Clause {
    pub statements: Vec<Statement>,
}

impl Clause {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.statements.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Ordered clauses of one rule string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rule {
    pub clauses: Vec<Clause>,
}

impl Rule {
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    /// Tokenize and parse a rule string.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let clauses = tokenize(text)?
            .iter()
            .map(|group| parse_clause(group))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { clauses })
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::parse(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(" : "))
    }
}
