use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields covered by the list-search convention.
pub const SEARCHABLE_FIELDS: [&str; 6] = ["nom", "adresse", "ville", "tel", "email", "code_postal"];

/// Default sort spec: descending by name.
pub const DEFAULT_SORT: &str = "-nom";

/// Conventional parameters for the `GET clients` list call: the comma-joined
/// searchable field list, a sort spec and an optional record limit.
#[derive(Debug, Clone)]
pub struct ClientQuery {
    pub fields: Vec<String>,
    pub sort: String,
    pub limit: Option<u32>,
}

impl Default for ClientQuery {
    fn default() -> Self {
        Self {
            fields: SEARCHABLE_FIELDS.iter().map(|f| f.to_string()).collect(),
            sort: DEFAULT_SORT.to_string(),
            limit: None,
        }
    }
}

impl ClientQuery {
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query pairs as sent on the wire.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("fields".to_string(), self.fields.join(",")),
            ("sort".to_string(), self.sort.clone()),
        ];
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// A client record as returned by the API.
///
/// Only the fields the search and update flows touch are typed; anything
/// else the server sends is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_postal: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClientRecord {
    /// Case-insensitive substring match across the searchable fields.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [
            &self.nom,
            &self.adresse,
            &self.ville,
            &self.tel,
            &self.email,
            &self.code_postal,
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Narrow a record list to entries matching `term`; a blank term keeps all.
pub fn filter_clients(records: &[ClientRecord], term: &str) -> Vec<ClientRecord> {
    if term.trim().is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| record.matches(term))
        .cloned()
        .collect()
}
