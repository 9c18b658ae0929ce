use serde::{Deserialize, Serialize};

/// Placeholder stored when a listing entry has no author element.
pub const DEFAULT_AUTHOR: &str = "Author not found";
/// Placeholder stored when a listing entry has no date element.
pub const DEFAULT_DATE: &str = "Date not found";

/// One scraped article listing entry. Records are rebuilt from scratch every
/// cycle; `index` is the entry's position on the page (plus the source's
/// offset), not a durable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub index: i64,
    pub site: String,
    pub headline: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub author: String,
    pub date: String,
}
