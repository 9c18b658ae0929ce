use thiserror::Error;

/// Errors raised while retrieving a page. All variants are recoverable from
/// the pipeline's point of view: the source is skipped for the current cycle.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
}

/// Errors raised by selector handling. Selectors are compiled when the
/// configuration is loaded, so these surface at startup rather than mid-cycle.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid selector '{selector}' for field '{field}': {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },
}
