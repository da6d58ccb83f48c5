use std::collections::BTreeMap;

use serde::Serialize;

/// Query parameters for `GET /events`.
///
/// The server defines which parameters it understands; this is an ordered
/// bag of string pairs with helpers for the common ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventQuery(BTreeMap<String, String>);

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    pub fn status(self, status: impl ToString) -> Self {
        self.param("status", status)
    }

    pub fn page(self, page: u32) -> Self {
        self.param("page", page)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_values_replace_earlier_ones() {
        let query = EventQuery::new().status("active").page(1).page(2);
        assert_eq!(query.get("status"), Some("active"));
        assert_eq!(query.get("page"), Some("2"));
        assert!(!query.is_empty());
        assert!(EventQuery::new().is_empty());
    }
}
