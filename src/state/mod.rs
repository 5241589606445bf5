/// State management module
///
/// This module handles all application state, including:
/// - Trip, album and photo records (data.rs)
/// - Ordered CRUD/search lists with confirmed deletion (collection.rs)
/// - The SQLite catalog of trips and albums (library.rs)
/// - Per-album photo documents and photo files (album_store.rs)
/// - The journal state store and the open-album session (journal.rs, session.rs)

pub mod album_store;
pub mod collection;
pub mod data;
pub mod journal;
pub mod library;
pub mod notice;
pub mod session;

pub use album_store::PhotoStore;
pub use collection::{Collection, DeleteRequest};
pub use data::{Album, AlbumId, Entry, ImageItem, PhotoId, Trip, TripDraft, TripId};
pub use journal::{Journal, TripRemoval};
pub use library::Library;
pub use notice::Notice;
pub use session::AlbumSession;
