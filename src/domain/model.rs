use crate::utils::error::{Result, TrackingError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque order identifier as issued by the order platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_control) {
            return Err(TrackingError::InvalidOrderId {
                value: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered tracking numbers attached to one order. Position is the delete key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingCollection(Vec<String>);

impl TrackingCollection {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub(crate) fn push(&mut self, number: String) {
        self.0.push(number);
    }

    pub(crate) fn remove(&mut self, index: usize) -> String {
        self.0.remove(index)
    }
}

impl<'a> FromIterator<&'a str> for TrackingCollection {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// Outcome counts for one bulk add. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAddResult {
    pub added: usize,
    pub skipped: usize,
    pub invalid: usize,
    pub errors: Vec<String>,
}

impl BulkAddResult {
    pub fn processed(&self) -> usize {
        self.added + self.skipped + self.invalid
    }
}

/// A tracking number paired with its current position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEntry {
    pub index: usize,
    pub number: String,
}

/// What the customer-facing list shows for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingView {
    pub index: usize,
    pub number: String,
    pub tracking_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AddOne,
    AddBulk,
    DeleteAt,
    List,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::AddOne, Action::AddBulk, Action::DeleteAt, Action::List];

    /// Name used by the request transport.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddOne => "add_tracking_number",
            Action::AddBulk => "bulk_add_tracking_numbers",
            Action::DeleteAt => "delete_tracking_number",
            Action::List => "list_tracking_numbers",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Action::List)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The authenticated party behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Caller {
    pub fn new(id: impl Into<String>, roles: &[&str]) -> Self {
        Self {
            id: id.into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_rejects_blank() {
        assert!(OrderId::parse("  ").is_err());
        assert!(OrderId::parse("12\n3").is_err());
        assert_eq!(OrderId::parse(" 1042 ").unwrap().as_str(), "1042");
    }

    #[test]
    fn test_collection_serializes_as_plain_array() {
        let collection: TrackingCollection = ["A1", "B2"].into_iter().collect();
        let json = serde_json::to_string(&collection).unwrap();
        assert_eq!(json, r#"["A1","B2"]"#);
    }

    #[test]
    fn test_only_list_is_read_only() {
        let mutations: Vec<Action> = Action::ALL.into_iter().filter(Action::is_mutation).collect();
        assert_eq!(mutations, vec![Action::AddOne, Action::AddBulk, Action::DeleteAt]);
    }
}
