//! Request extractors.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Query-string filters shared by the cash endpoints.
///
/// Values are coerced best-effort: anything that does not parse (including
/// an empty string) is treated as absent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CashQuery {
    /// Fiscal year.
    #[serde(default, deserialize_with = "lenient")]
    pub ano: Option<i32>,
    /// Accounting unit code.
    #[serde(default, deserialize_with = "lenient")]
    pub ug: Option<i64>,
    /// Month ceiling.
    #[serde(default, deserialize_with = "lenient")]
    pub mes: Option<u32>,
    /// Maximum number of rows.
    #[serde(default, deserialize_with = "lenient")]
    pub limite: Option<u64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}
