//! Error types shared across the feed pipeline.

use std::time::Duration;
use thiserror::Error;

use crate::session::ImageId;

/// Malformed color encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Invalid hex color '{0}': expected '#' followed by 6 hex digits")]
    Format(String),
}

/// Failure to turn an ingested file into pixel data.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that went wrong talking to the remote captioning service.
///
/// These never reach the caller of the pipeline; every variant is recovered
/// by the local caption synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteServiceError {
    #[error("Caption request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Caption request failed: {0}")]
    Transport(String),

    #[error("Caption service returned {0}")]
    Status(u16),

    #[error("Unexpected caption response: {0}")]
    BadResponse(String),

    #[error("Caption service returned no text")]
    Empty,
}

/// Errors surfaced by the feed session and the ordering engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("{0}")]
    Validation(String),

    #[error("No feed entry for {0}")]
    UnknownEntry(ImageId),

    #[error("No stored image with id {0}")]
    UnknownImage(ImageId),
}

impl FeedError {
    pub fn empty_theme() -> Self {
        FeedError::Validation("Please enter a theme for your captions".to_string())
    }

    pub fn no_candidates() -> Self {
        FeedError::Validation("Please add a folder of images first".to_string())
    }
}
