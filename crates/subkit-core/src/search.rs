//! Search query builder for the provider's search endpoint.

use crate::subscription::USER_ID_METADATA_KEY;
use std::fmt;

/// A search expression made of clauses joined with `AND`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    clauses: Vec<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match subscriptions whose metadata `key` equals `value` exactly.
    pub fn metadata(key: &str, value: &str) -> Self {
        Self::new().and_metadata(key, value)
    }

    /// Match subscriptions tagged with the given application user id.
    pub fn user_id(user_id: &str) -> Self {
        Self::metadata(USER_ID_METADATA_KEY, user_id)
    }

    pub fn and_metadata(mut self, key: &str, value: &str) -> Self {
        self.clauses
            .push(format!("metadata[\"{}\"]:\"{}\"", escape(key), escape(value)));
        self
    }

    pub fn and_status(mut self, status: &str) -> Self {
        self.clauses.push(format!("status:\"{}\"", escape(status)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clauses.join(" AND "))
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
