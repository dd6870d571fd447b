//! Cloud Firestore REST wire format for leaderboard documents.
//!
//! Values are externally tagged by kind (`{"stringValue": "bol"}`) and 64-bit integers travel as decimal
//! strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::*;

pub const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(#[serde(with = "int64")] i64),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
}

mod int64 {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(i64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text.parse().map_err(de::Error::custom),
            Repr::Number(number) => Ok(number),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Full resource name, only present on documents read back from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Document {
    fn string_field(&self, field: &'static str) -> Result<&str, DecodeError> {
        match self.fields.get(field) {
            Some(Value::StringValue(value)) => Ok(value),
            Some(_) => Err(DecodeError::WrongType(field)),
            None => Err(DecodeError::MissingField(field)),
        }
    }

    fn score_field(&self, field: &'static str) -> Result<u32, DecodeError> {
        let raw = match self.fields.get(field) {
            Some(Value::IntegerValue(value)) => *value,
            Some(Value::DoubleValue(value)) if value.fract() == 0.0 => *value as i64,
            Some(_) => return Err(DecodeError::WrongType(field)),
            None => return Err(DecodeError::MissingField(field)),
        };
        u32::try_from(raw).map_err(|_| DecodeError::ScoreOutOfRange(raw))
    }
}

impl From<&LeaderboardEntry> for Document {
    fn from(entry: &LeaderboardEntry) -> Self {
        let fields = BTreeMap::from([
            ("uid".to_string(), Value::StringValue(entry.uid.clone())),
            ("name".to_string(), Value::StringValue(entry.name.clone())),
            ("score".to_string(), Value::IntegerValue(entry.score.into())),
        ]);
        Self { name: None, fields }
    }
}

impl TryFrom<&Document> for LeaderboardEntry {
    type Error = DecodeError;

    fn try_from(document: &Document) -> Result<Self, Self::Error> {
        Ok(Self {
            uid: document.string_field("uid")?.to_string(),
            name: document.string_field("name")?.to_string(),
            score: document.score_field("score")?,
        })
    }
}

/// URLs of one project's default database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabasePaths {
    documents_root: String,
}

impl DatabasePaths {
    pub fn new(project_id: &str) -> Self {
        Self {
            documents_root: format!("{FIRESTORE_BASE}/projects/{project_id}/databases/(default)/documents"),
        }
    }

    pub fn document(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_root, collection, id)
    }

    pub fn leaderboard_entry(&self, uid: &str) -> String {
        self.document(LEADERBOARD_COLLECTION, uid)
    }

    pub fn run_query(&self) -> String {
        format!("{}:runQuery", self.documents_root)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    pub order_by: Vec<Order>,
    pub limit: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Order {
    pub field: FieldReference,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Ascending,
    Descending,
}

impl RunQueryRequest {
    /// Best `limit` leaderboard entries by descending score.
    pub fn top_scores(limit: u32) -> Self {
        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: LEADERBOARD_COLLECTION.to_string(),
                }],
                order_by: vec![Order {
                    field: FieldReference {
                        field_path: "score".to_string(),
                    },
                    direction: Direction::Descending,
                }],
                limit,
            },
        }
    }
}

/// One element of a `runQuery` response. Results without a document only report progress.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RunQueryItem {
    #[serde(default)]
    pub document: Option<Document>,
}

pub fn decode_query(items: &[RunQueryItem]) -> Result<Vec<LeaderboardEntry>, DecodeError> {
    items
        .iter()
        .filter_map(|item| item.document.as_ref())
        .map(LeaderboardEntry::try_from)
        .collect()
}

/// Error body shared by the Google REST APIs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorStatus {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub status: String,
}
