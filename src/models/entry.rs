use serde::{Deserialize, Serialize};

/// An article as stored by the feed service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Body of `GET /v1/entries`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedFetchResult {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub summary: String,
    pub translation: String,
}
