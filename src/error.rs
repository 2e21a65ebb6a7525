use thiserror::Error;

/// Failures of the on-disk save file, on the service side.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Save file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Saved document must be a JSON object")]
    NotAnObject,
}

/// Failures talking to the persistence service, on the client side.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },
}

pub type StorageResult<T> = Result<T, StorageError>;
pub type TransportResult<T> = Result<T, TransportError>;
