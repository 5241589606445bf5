/// Error types shared by the whole crate
///
/// Persistence problems (I/O, corrupt documents) are absorbed at the
/// store boundary by callers that need a fallback; everything else is
/// propagated with `?`.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("album document is corrupt: {}: {source}", .path.display())]
    CorruptData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("trip not found: {0}")]
    TripNotFound(uuid::Uuid),

    #[error("album not found: {0}")]
    AlbumNotFound(uuid::Uuid),

    #[error("places API error ({status}): {body}")]
    PlacesApi { status: u16, body: String },

    #[error("no driving route: {0}")]
    Directions(String),

    #[error("places API key not configured (set TRAVELER_PLACES_API_KEY)")]
    MissingApiKey,

    #[error("location unavailable: {0}")]
    Location(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not determine a data directory for this user")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, Error>;
