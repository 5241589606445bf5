/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog, the album documents and whatever front end drives them.
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

pub type TripId = Uuid;
pub type AlbumId = Uuid;
pub type PhotoId = Uuid;

/// Albums every new trip starts with
pub const STARTER_ALBUMS: [&str; 8] = [
    "Airport",
    "Outfit",
    "Hotel",
    "Food and Beverages",
    "Natural Sights",
    "Special Landmarks and Attractions",
    "Events",
    "Shopping Centers",
];

/// Generate a fresh entity identifier
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Today's date in the user's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Compact local timestamp for diagnostic file names (e.g. "20241115T093012")
pub fn timestamp_suffix() -> String {
    Local::now().format("%Y%m%dT%H%M%S").to_string()
}

/// Anything the journal keeps in an ordered, searchable list
pub trait Entry: Clone {
    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
    /// Copy the mutable fields of `updated` onto `self`. The id never changes.
    fn apply_edit(&mut self, updated: &Self);
}

/// A user-defined travel period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
    pub description: String,
    pub begin_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Free text, e.g. "Tokyo"
    pub location: String,
}

/// User-entered fields for a trip that does not exist yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDraft {
    pub name: String,
    pub description: String,
    pub begin_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
}

impl TripDraft {
    /// Draft with today's date for both ends of the trip
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        let today = today();
        Self {
            name: name.into(),
            description: String::new(),
            begin_date: today,
            end_date: today,
            location: location.into(),
        }
    }

    pub fn into_trip(self) -> Trip {
        Trip {
            id: new_id(),
            name: self.name,
            description: self.description,
            begin_date: self.begin_date,
            end_date: self.end_date,
            location: self.location,
        }
    }
}

impl Entry for Trip {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn apply_edit(&mut self, updated: &Self) {
        self.name = updated.name.clone();
        self.description = updated.description.clone();
        self.begin_date = updated.begin_date;
        self.end_date = updated.end_date;
        self.location = updated.location.clone();
    }
}

/// A named photo album scoped to one trip
///
/// The ordered photo list lives in the album's own document
/// (see `album_store`) and is materialised by an `AlbumSession`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub trip_id: TripId,
    pub name: String,
}

impl Album {
    pub fn new(trip_id: TripId, name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            trip_id,
            name: name.into(),
        }
    }
}

impl Entry for Album {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn apply_edit(&mut self, updated: &Self) {
        self.name = updated.name.clone();
    }
}

/// Metadata record for one stored photo
///
/// This is exactly what goes into an album document: the image bytes
/// themselves live in a separate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    pub id: PhotoId,
    pub image_path: PathBuf,
}

impl ImageItem {
    pub fn new(image_path: PathBuf) -> Self {
        Self {
            id: new_id(),
            image_path,
        }
    }

    /// A missing file is a display fault, not a broken record
    pub fn is_displayable(&self) -> bool {
        self.image_path.is_file()
    }
}

impl Entry for ImageItem {
    fn id(&self) -> Uuid {
        self.id
    }

    // Photos are named after their stored file
    fn name(&self) -> &str {
        self.image_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    fn apply_edit(&mut self, updated: &Self) {
        self.image_path = updated.image_path.clone();
    }
}
