pub mod error;
pub mod extractor;
pub mod fetcher;

pub use error::{ExtractError, FetchError};
pub use extractor::{CompiledSelectors, Extraction, SelectorSet, extract};
pub use fetcher::Fetcher;
