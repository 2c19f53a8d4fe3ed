//! SQL template store.
//!
//! Templates are plain `.sql` files addressed by logical name. Optional
//! filters are spliced in at the `/*:filtros*/` marker, and parameters are
//! merged from the store's fixed set and the caller's values.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use sea_orm::{Statement, Value};
use thiserror::Error;

use crate::statement::bind_named;

/// Marker replaced by the optional filter clauses.
pub const FILTER_MARKER: &str = "/*:filtros*/";

/// Errors raised while loading or binding a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template with this logical name.
    #[error("SQL template not found: {0}")]
    NotFound(String),

    /// A placeholder has no bound value.
    #[error("missing value for parameter :{0}")]
    MissingParameter(String),

    /// The template file exists but could not be read.
    #[error("failed to read SQL template {name}: {source}")]
    Io {
        /// Logical template name.
        name: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Named parameter values.
pub type TemplateParams = BTreeMap<String, Value>;

/// Caller-supplied parameters and optional filters for one template.
#[derive(Debug, Clone, Default)]
pub struct TemplateArgs {
    params: TemplateParams,
    filters: Vec<OptionalFilter>,
}

#[derive(Debug, Clone)]
struct OptionalFilter {
    clause: String,
    param: String,
    value: Option<Value>,
}

impl TemplateArgs {
    /// Empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a value to `:name`.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Adds a conjunctive clause (e.g. `AND coug = :ug`) that is applied
    /// only when `value` is present. The value is bound to `:param`.
    #[must_use]
    pub fn filter<V: Into<Value>>(
        mut self,
        clause: impl Into<String>,
        param: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        self.filters.push(OptionalFilter {
            clause: clause.into(),
            param: param.into(),
            value: value.map(Into::into),
        });
        self
    }
}

/// Template text with its merged parameters, ready to bind.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuery {
    /// Name the query was loaded from.
    pub name: String,
    /// SQL text with `:name` placeholders.
    pub sql: String,
    /// Parameter values by name.
    pub params: TemplateParams,
}

impl PreparedQuery {
    /// Converts the named placeholders into a positional statement.
    pub fn into_statement(self) -> Result<Statement, TemplateError> {
        bind_named(&self.sql, &self.params)
    }
}

/// Loads SQL templates from a directory.
#[derive(Debug, Clone)]
pub struct SqlTemplateStore {
    dir: PathBuf,
    fixed: TemplateParams,
}

impl SqlTemplateStore {
    /// Creates a store reading `<dir>/<name>.sql`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fixed: TemplateParams::new(),
        }
    }

    /// Adds parameters bound into every prepared template.
    #[must_use]
    pub fn with_fixed_parameters<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fixed
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Template directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads the raw text of a template.
    ///
    /// Names other than `[A-Za-z0-9_]+` are reported as not found.
    pub async fn load(&self, name: &str) -> Result<String, TemplateError> {
        if !is_valid_name(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }

        let path = self.dir.join(format!("{name}.sql"));
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(TemplateError::NotFound(name.to_string()))
            }
            Err(source) => Err(TemplateError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }

    /// Loads a template, applies the present optional filters and merges
    /// parameters. Caller values override fixed ones.
    pub async fn prepare(
        &self,
        name: &str,
        args: TemplateArgs,
    ) -> Result<PreparedQuery, TemplateError> {
        let text = self.load(name).await?;

        let mut params = self.fixed.clone();
        params.extend(args.params);

        let mut clauses = Vec::new();
        for filter in args.filters {
            if let Some(value) = filter.value {
                clauses.push(filter.clause);
                params.insert(filter.param, value);
            }
        }

        Ok(PreparedQuery {
            name: name.to_string(),
            sql: apply_filters(&text, &clauses),
            params,
        })
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn apply_filters(text: &str, clauses: &[String]) -> String {
    let joined = clauses.join(" ");

    if text.contains(FILTER_MARKER) {
        return text.replace(FILTER_MARKER, &joined);
    }
    if joined.is_empty() {
        return text.to_string();
    }

    let body = text.trim_end().trim_end_matches(';').trim_end();
    format!("{body} {joined}")
}
