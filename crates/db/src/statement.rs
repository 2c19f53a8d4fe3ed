//! Named placeholder binding for PostgreSQL.
//!
//! Rewrites `:name` placeholders as `$1`, `$2`, ... and collects the values
//! in positional order. Casts (`::numeric`), string literals, quoted
//! identifiers and comments are copied through untouched.

use std::collections::HashMap;

use sea_orm::{DbBackend, Statement, Value};

use crate::templates::{TemplateError, TemplateParams};

/// Builds a positional statement from SQL with named placeholders.
///
/// A name used several times maps to a single positional slot. Parameters
/// that the SQL never references are ignored.
pub fn bind_named(sql: &str, params: &TemplateParams) -> Result<Statement, TemplateError> {
    let mut out = String::with_capacity(sql.len());
    let mut values: Vec<Value> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                for q in chars.by_ref() {
                    out.push(q);
                    if q == c {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                out.push(c);
                for l in chars.by_ref() {
                    out.push(l);
                    if l == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                out.push(c);
                let mut prev = '\0';
                for b in chars.by_ref() {
                    out.push(b);
                    if prev == '*' && b == '/' {
                        break;
                    }
                    prev = b;
                }
            }
            ':' if chars.peek() == Some(&':') => {
                out.push_str("::");
                chars.next();
            }
            ':' if chars
                .peek()
                .is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') =>
            {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }

                let slot = if let Some(&slot) = slots.get(&name) {
                    slot
                } else {
                    let value = params
                        .get(&name)
                        .cloned()
                        .ok_or_else(|| TemplateError::MissingParameter(name.clone()))?;
                    values.push(value);
                    slots.insert(name, values.len());
                    values.len()
                };
                out.push('$');
                out.push_str(&slot.to_string());
            }
            _ => out.push(c),
        }
    }

    Ok(Statement::from_sql_and_values(
        DbBackend::Postgres,
        out,
        values,
    ))
}
