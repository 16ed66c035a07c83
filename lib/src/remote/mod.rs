//! The server boundary: the `RemoteService` trait, its error type and the
//! HTTP implementation.

pub mod dto;
pub mod http;

pub use dto::{BookmarkDto, BookmarkRequest};
pub use http::HttpRemote;

use crate::models::{BookmarkId, CollectionId};

/// Failure of a single remote call
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Transport failure: connect, timeout, TLS, body read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{message} (Status: {status})")]
    Status { status: u16, message: String },

    /// The body could not be decoded into the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RemoteError::Http(e) if e.is_timeout())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            RemoteError::Http(e) => e.status().map(|s| s.as_u16()),
            RemoteError::Decode(_) => None,
        }
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Bookmark endpoints of the server API
pub trait RemoteService: Send + Sync {
    /// Full remote contents of one collection
    fn list(&self, collection_id: CollectionId) -> RemoteResult<Vec<BookmarkDto>>;

    /// Create a bookmark; the response carries the server-assigned id
    fn create(&self, request: &BookmarkRequest) -> RemoteResult<BookmarkDto>;

    fn update(&self, id: BookmarkId, request: &BookmarkRequest) -> RemoteResult<BookmarkDto>;

    fn delete(&self, id: BookmarkId) -> RemoteResult<()>;

    /// Send only the new favorite flag
    fn update_favorite(&self, id: BookmarkId, value: bool) -> RemoteResult<()>;

    /// Send only the new archive flag
    fn update_archive(&self, id: BookmarkId, value: bool) -> RemoteResult<()>;
}
