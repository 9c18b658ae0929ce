use crate::model::{ArticleRecord, DEFAULT_AUTHOR, DEFAULT_DATE};
use newswire_scraper::Extraction;

/// Zip per-field sequences into records positionally. The headline sequence
/// is the reference field: its length alone decides how many records come
/// out. Shorter fields are padded with their defaults, longer fields lose
/// their trailing values. Real listings produce ragged field counts and this
/// asymmetry matches how the monitored sites actually render; do not "fix"
/// it by taking the longest field.
pub fn map_records(extraction: &Extraction, site: &str, start_index: i64) -> Vec<ArticleRecord> {
    (0..extraction.headlines.len())
        .map(|i| ArticleRecord {
            index: start_index + i as i64 + 1,
            site: site.to_string(),
            headline: extraction.headlines[i].clone(),
            description: extraction.descriptions.get(i).cloned().unwrap_or_default(),
            image: extraction.images.get(i).cloned().flatten(),
            author: extraction
                .authors
                .get(i)
                .cloned()
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            date: extraction
                .dates
                .get(i)
                .cloned()
                .unwrap_or_else(|| DEFAULT_DATE.to_string()),
        })
        .collect()
}
