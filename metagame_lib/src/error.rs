//! Error types for the extraction pipeline.

use std::path::PathBuf;

/// Hard failures that abort the enclosing unit of work (a card, a set, a
/// tournament) and fail the batch it belongs to.
///
/// Transient network and cache problems never surface here: the fetcher
/// degrades them to an absent page and the caller decides what absence means.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("invalid selector `{0}`")]
    Selector(String),
    #[error("element `{selector}` not found")]
    MissingElement { selector: String },
    #[error("attribute `{attribute}` missing on `{element}`")]
    MissingAttribute { element: String, attribute: String },
    #[error("cannot parse {field} from {value:?}")]
    InvalidValue { field: String, value: String },
    #[error("failed to fetch {url}")]
    FetchFailed { url: String },
    #[error("unrecognized pairings layout")]
    UnrecognizedPairings,
    #[error("set {code} has no extracted cards")]
    IncompleteSet { code: String },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{url}: {source}")]
    Page {
        url: String,
        #[source]
        source: Box<ExtractError>,
    },
}

impl ExtractError {
    pub(crate) fn missing(selector: &str) -> Self {
        Self::MissingElement {
            selector: selector.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, value: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Attaches the URL of the page being parsed. Already-attributed errors
    /// keep their innermost URL.
    pub fn in_page(self, url: &str) -> Self {
        match self {
            Self::Page { .. } | Self::FetchFailed { .. } => self,
            other => Self::Page {
                url: url.to_string(),
                source: Box::new(other),
            },
        }
    }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;
