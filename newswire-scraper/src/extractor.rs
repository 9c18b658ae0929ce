use crate::error::ExtractError;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// One CSS selector per article field. Selectors are applied document-wide;
/// each field's matches are collected independently in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorSet {
    pub headline: String,
    pub description: String,
    pub author: String,
    pub image: String,
    pub date: String,
}

/// Parsed form of a [`SelectorSet`]. Compiling up front means a malformed
/// selector fails configuration loading instead of a scrape cycle.
#[derive(Debug)]
pub struct CompiledSelectors {
    headline: Selector,
    description: Selector,
    author: Selector,
    image: Selector,
    date: Selector,
}

impl SelectorSet {
    pub fn compile(&self) -> Result<CompiledSelectors, ExtractError> {
        Ok(CompiledSelectors {
            headline: compile_one("headline", &self.headline)?,
            description: compile_one("description", &self.description)?,
            author: compile_one("author", &self.author)?,
            image: compile_one("image", &self.image)?,
            date: compile_one("date", &self.date)?,
        })
    }
}

fn compile_one(field: &'static str, selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Per-field value sequences pulled from one page. Lengths are independent:
/// a malformed listing can yield more headlines than authors, and nothing
/// here tries to reconcile that. The mapper decides how to zip them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
    pub authors: Vec<String>,
    /// One entry per matched image element, `None` when it has no `src`.
    /// The placeholder keeps later images positionally aligned.
    pub images: Vec<Option<String>>,
    pub dates: Vec<String>,
}

/// Run every field selector against `html`. Text fields take trimmed text
/// content; the image field takes the `src` attribute. A selector with zero
/// matches yields an empty sequence, not an error.
pub fn extract(html: &str, selectors: &CompiledSelectors) -> Extraction {
    let document = Html::parse_document(html);

    Extraction {
        headlines: select_text(&document, &selectors.headline),
        descriptions: select_text(&document, &selectors.description),
        authors: select_text(&document, &selectors.author),
        images: select_attr(&document, &selectors.image, "src"),
        dates: select_text(&document, &selectors.date),
    }
}

fn select_text(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect()
}

fn select_attr(document: &Html, selector: &Selector, attr: &str) -> Vec<Option<String>> {
    document
        .select(selector)
        .map(|el| el.value().attr(attr).map(str::to_string))
        .collect()
}
