//! Clause parser: turns one token group into statements.

use super::{Clause, Statement, Value};
use crate::error::RuleError;
use crate::{Field, Operator};

/// Statement under construction.
///
/// Tokens may arrive in any order. The builder is complete once it holds a
/// field, an operator and a value, or as soon as its operator is a terminal
/// action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementBuilder {
    field: Option<Field>,
    op: Option<Operator>,
    value: Option<Value>,
}

/// Outcome of feeding one token to a [`StatementBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// More tokens are needed.
    Pending(StatementBuilder),
    /// The statement is finished; start a fresh builder.
    Complete(Statement),
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one raw token.
    ///
    /// A later value token replaces an earlier one, so the finished statement
    /// always carries a single value. An empty literal (`''`) clears a held
    /// literal but never counts as a value.
    pub fn accept(mut self, token: &str) -> Result<Step, RuleError> {
        if token.starts_with('\'') {
            let text = unescape(strip_quotes(token));
            if !text.is_empty() {
                self.value = Some(Value::Literal(text));
            } else if matches!(self.value, Some(Value::Literal(_))) {
                self.value = None;
            }
        } else if token.starts_with('/') {
            self.value = Some(Value::Pattern(token.to_string()));
        } else if token.starts_with('$') {
            let field =
                Field::parse(token).ok_or_else(|| RuleError::UnknownField(token.to_string()))?;
            self.field = Some(field);
        } else {
            let op = Operator::parse(token)
                .ok_or_else(|| RuleError::UnknownOperator(token.to_string()))?;
            self.op = Some(op);
        }

        Ok(match self.finish() {
            Ok(stmt) => Step::Complete(stmt),
            Err(pending) => Step::Pending(pending),
        })
    }

    pub fn is_complete(&self) -> bool {
        match self.op {
            Some(op) if op.is_terminal() => true,
            Some(_) => self.field.is_some() && self.value.is_some(),
            None => false,
        }
    }

    /// Whether any token has been applied since the last reset.
    pub fn is_empty(&self) -> bool {
        self.field.is_none() && self.op.is_none() && self.value.is_none()
    }

    /// Convert into a statement, or hand the builder back if incomplete.
    pub fn finish(self) -> Result<Statement, Self> {
        if !self.is_complete() {
            return Err(self);
        }
        match self.op {
            Some(op) => Ok(Statement {
                field: self.field,
                op,
                value: self.value,
            }),
            None => Err(self),
        }
    }
}

/// Parse one token group into a clause.
///
/// Tokens left over after the last complete statement are dropped with a
/// warning.
pub fn parse_clause(tokens: &[&str]) -> Result<Clause, RuleError> {
    let mut statements = Vec::new();
    let mut builder = StatementBuilder::new();

    for token in tokens {
        builder = match builder.accept(token)? {
            Step::Complete(stmt) => {
                statements.push(stmt);
                StatementBuilder::new()
            }
            Step::Pending(pending) => pending,
        };
    }

    if !builder.is_empty() {
        log::warn!("discarding incomplete statement {:?} in clause {:?}", builder, tokens);
    }

    Ok(Clause { statements })
}

/// Remove one quote from each end of a raw literal token.
fn strip_quotes(token: &str) -> &str {
    let inner = token.strip_prefix('\'').unwrap_or(token);
    inner.strip_suffix('\'').unwrap_or(inner)
}

/// Drop each escaping backslash and keep the character after it.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            // A lone trailing backslash is kept as is.
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(s: &str) -> Option<Value> {
        Some(Value::Literal(s.to_string()))
    }

    #[test]
    fn test_builder_completes_on_field_op_value() {
        let b = StatementBuilder::new();
        let b = match b.accept("$key").unwrap() {
            Step::Pending(b) => b,
            other => panic!("unexpected: {:?}", other),
        };
        let b = match b.accept("==").unwrap() {
            Step::Pending(b) => b,
            other => panic!("unexpected: {:?}", other),
        };
        assert!(!b.is_complete());

        match b.accept("'role'").unwrap() {
            Step::Complete(stmt) => {
                assert_eq!(stmt.field, Some(Field::Key));
                assert_eq!(stmt.op, Operator::Eq);
                assert_eq!(stmt.value, literal("role"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_builder_completes_on_terminal_action() {
        match StatementBuilder::new().accept("block").unwrap() {
            Step::Complete(stmt) => assert_eq!(stmt, Statement::terminal(Operator::Block)),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_builder_token_order_is_free() {
        let clause = parse_clause(&["'admin'", "$val", "!="]).unwrap();
        assert_eq!(clause.statements.len(), 1);
        assert_eq!(clause.statements[0].field, Some(Field::Val));
        assert_eq!(clause.statements[0].op, Operator::Neq);
        assert_eq!(clause.statements[0].value, literal("admin"));
    }

    #[test]
    fn test_incomplete_builder_does_not_finish() {
        let b = StatementBuilder {
            field: Some(Field::Key),
            op: None,
            value: literal("x"),
        };
        assert!(b.clone().finish().is_err());
        assert!(!b.is_empty());
        assert!(StatementBuilder::new().is_empty());
    }

    #[test]
    fn test_parse_conjunction() {
        let clause =
            parse_clause(&["$ctx", "==", "'json_obj'", "$key", "==", "'role'", "$val", "==", "/^a/"])
                .unwrap();
        assert_eq!(clause.statements.len(), 3);
        assert_eq!(clause.statements[0].field, Some(Field::Ctx));
        assert_eq!(clause.statements[1].value, literal("role"));
        assert_eq!(
            clause.statements[2].value,
            Some(Value::Pattern("/^a/".to_string()))
        );
    }

    #[test]
    fn test_literal_escapes_are_resolved() {
        let clause = parse_clause(&["$val", "==", r"'it\'s'"]).unwrap();
        assert_eq!(clause.statements[0].value, literal("it's"));

        let clause = parse_clause(&["$val", "==", r"'a\\b\:c'"]).unwrap();
        assert_eq!(clause.statements[0].value, literal(r"a\b:c"));
    }

    #[test]
    fn test_pattern_escapes_are_kept() {
        let clause = parse_clause(&["$val", "==", r"/a\/b\.c/"]).unwrap();
        assert_eq!(
            clause.statements[0].value,
            Some(Value::Pattern(r"/a\/b\.c/".to_string()))
        );
    }

    #[test]
    fn test_empty_literal_is_not_a_value() {
        let clause = parse_clause(&["$key", "==", "''"]).unwrap();
        assert!(clause.statements.is_empty());

        // The pending field is replaced and the next literal completes it.
        let clause = parse_clause(&["$val", "==", "''", "$key", "==", "'x'"]).unwrap();
        assert_eq!(
            clause.statements,
            vec![Statement::predicate(Field::Key, Operator::Eq, Value::Literal("x".to_string()))]
        );
    }

    #[test]
    fn test_empty_literal_clears_held_literal() {
        let clause = parse_clause(&["'a'", "''", "$key", "=="]).unwrap();
        assert!(clause.statements.is_empty());

        let clause = parse_clause(&["/a/", "''", "$key", "=="]).unwrap();
        assert_eq!(
            clause.statements[0].value,
            Some(Value::Pattern("/a/".to_string()))
        );
    }

    #[test]
    fn test_terminal_mid_group() {
        // A terminal completes immediately, even with tokens after it.
        let clause = parse_clause(&["block", "$key", "==", "'a'"]).unwrap();
        assert_eq!(clause.statements.len(), 2);
        assert_eq!(clause.statements[0], Statement::terminal(Operator::Block));
        assert_eq!(clause.statements[1].field, Some(Field::Key));
    }

    #[test]
    fn test_terminal_keeps_pending_field() {
        let clause = parse_clause(&["$key", "pass"]).unwrap();
        assert_eq!(clause.statements[0].field, Some(Field::Key));
        assert_eq!(clause.statements[0].op, Operator::Pass);
        assert_eq!(clause.statements[0].value, None);
    }

    #[test]
    fn test_dangling_tokens_are_dropped() {
        let clause = parse_clause(&["$key", "==", "'a'", "$val", "=="]).unwrap();
        assert_eq!(clause.statements.len(), 1);
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(
            parse_clause(&["$body", "==", "'x'"]),
            Err(RuleError::UnknownField("$body".to_string()))
        );
        assert_eq!(
            parse_clause(&["$key", "=", "'x'"]),
            Err(RuleError::UnknownOperator("=".to_string()))
        );
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'abc'"), "abc");
        assert_eq!(strip_quotes("''"), "");
        assert_eq!(strip_quotes("'a''"), "a'");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"it\'s"), "it's");
        assert_eq!(unescape(r"\\"), r"\");
        assert_eq!(unescape(r"a\"), r"a\");
        assert_eq!(unescape("plain"), "plain");
    }
}
