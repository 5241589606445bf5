/// Traveler: a travel journal.
///
/// Trips own albums, albums own an ordered list of photos. Trips and albums
/// are kept in a SQLite catalog ([`state::Library`]); each album's photo list
/// is a small JSON document next to the photo files ([`state::PhotoStore`]).
/// [`state::Journal`] and [`state::AlbumSession`] are the only ways to change
/// any of it. [`media`] brings new photos in, [`discover`] finds places to
/// visit nearby.

pub mod config;
pub mod discover;
pub mod error;
pub mod media;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
