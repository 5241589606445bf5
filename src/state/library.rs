use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data::{Album, AlbumId, Trip, TripId};
use crate::error::Result;

/// How long a write waits for another connection's lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The Library manages the SQLite catalog of trips and albums.
/// Photo lists are not stored here: each album keeps its own
/// document in the `PhotoStore`.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open or create the catalog at `db_path` and make sure the schema exists.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        tracing::debug!(path = %db_path.display(), "catalog opened");

        let mut library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;

        Ok(library)
    }

    /// Initialize the database schema.
    /// Creates all necessary tables and indexes if they don't exist.
    fn init_schema(&mut self) -> Result<()> {
        // Album rows only make sense under their trip
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS trips (
                id              BLOB PRIMARY KEY,
                name            TEXT NOT NULL,
                description     TEXT NOT NULL,
                begin_date      TEXT NOT NULL,
                end_date        TEXT NOT NULL,
                location        TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS albums (
                id              BLOB PRIMARY KEY,
                trip_id         BLOB NOT NULL,
                name            TEXT NOT NULL,
                FOREIGN KEY(trip_id) REFERENCES trips(id) ON DELETE CASCADE
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_albums_trip_id
             ON albums(trip_id)",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS meta (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Change how long writes wait on a locked database
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// True until `mark_seeded` has been called on this catalog
    pub fn needs_seed(&self) -> Result<bool> {
        let seeded: Option<String> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'seeded'", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(seeded.is_none())
    }

    pub fn mark_seeded(&self) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('seeded', '1')",
            [],
        )?;
        Ok(())
    }

    /// All trips in the order they were added
    pub fn list_trips(&self) -> Result<Vec<Trip>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, begin_date, end_date, location
             FROM trips ORDER BY rowid",
        )?;

        let trips = stmt
            .query_map([], |row| {
                Ok(Trip {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    begin_date: row.get(3)?,
                    end_date: row.get(4)?,
                    location: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(trips)
    }

    /// Insert a trip, or update every mutable field of an existing one
    pub fn save_trip(&self, trip: &Trip) -> Result<()> {
        self.conn.execute(
            "INSERT INTO trips (id, name, description, begin_date, end_date, location)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                begin_date = excluded.begin_date,
                end_date = excluded.end_date,
                location = excluded.location",
            params![
                trip.id,
                trip.name,
                trip.description,
                trip.begin_date,
                trip.end_date,
                trip.location
            ],
        )?;
        Ok(())
    }

    /// Delete a trip. Its album rows go with it; the ids of those albums
    /// are returned so the caller can decide what to do with their storage.
    pub fn delete_trip(&self, trip_id: TripId) -> Result<Vec<AlbumId>> {
        let album_ids = self
            .list_albums(trip_id)?
            .into_iter()
            .map(|album| album.id)
            .collect();
        self.conn
            .execute("DELETE FROM trips WHERE id = ?1", params![trip_id])?;
        Ok(album_ids)
    }

    /// A trip's albums in the order they were added
    pub fn list_albums(&self, trip_id: TripId) -> Result<Vec<Album>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, trip_id, name FROM albums WHERE trip_id = ?1 ORDER BY rowid",
        )?;

        let albums = stmt
            .query_map(params![trip_id], |row| {
                Ok(Album {
                    id: row.get(0)?,
                    trip_id: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(albums)
    }

    /// Find an album by id, whichever trip it belongs to
    pub fn find_album(&self, album_id: AlbumId) -> Result<Option<Album>> {
        let album = self
            .conn
            .query_row(
                "SELECT id, trip_id, name FROM albums WHERE id = ?1",
                params![album_id],
                |row| {
                    Ok(Album {
                        id: row.get(0)?,
                        trip_id: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(album)
    }

    pub fn save_album(&self, album: &Album) -> Result<()> {
        self.conn.execute(
            "INSERT INTO albums (id, trip_id, name) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![album.id, album.trip_id, album.name],
        )?;
        Ok(())
    }

    pub fn delete_album(&self, album_id: AlbumId) -> Result<()> {
        self.conn
            .execute("DELETE FROM albums WHERE id = ?1", params![album_id])?;
        Ok(())
    }

    /// Every album id in the catalog, across all trips
    pub fn all_album_ids(&self) -> Result<Vec<AlbumId>> {
        let mut stmt = self.conn.prepare("SELECT id FROM albums")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<AlbumId>>>()?;
        Ok(ids)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::TripDraft;
    use tempfile::TempDir;

    fn library() -> (TempDir, Library) {
        let dir = TempDir::new().unwrap();
        let library = Library::open(&dir.path().join("traveler.db")).unwrap();
        (dir, library)
    }

    #[test]
    fn test_trip_upsert_and_order() {
        let (_dir, library) = library();
        let mut japan = TripDraft::new("Japan", "Tokyo").into_trip();
        let peru = TripDraft::new("Peru", "Cusco").into_trip();
        library.save_trip(&japan).unwrap();
        library.save_trip(&peru).unwrap();

        japan.location = "Kyoto".to_string();
        library.save_trip(&japan).unwrap();

        let trips = library.list_trips().unwrap();
        assert_eq!(trips, vec![japan, peru]);
    }

    #[test]
    fn test_deleting_trip_drops_its_album_rows() {
        let (_dir, library) = library();
        let trip = TripDraft::new("Japan", "Tokyo").into_trip();
        library.save_trip(&trip).unwrap();
        let airport = Album::new(trip.id, "Airport");
        library.save_album(&airport).unwrap();

        let orphaned = library.delete_trip(trip.id).unwrap();
        assert_eq!(orphaned, vec![airport.id]);
        assert!(library.list_albums(trip.id).unwrap().is_empty());
        assert!(library.find_album(airport.id).unwrap().is_none());
    }

    #[test]
    fn test_album_rename_and_lookup() {
        let (_dir, library) = library();
        let trip = TripDraft::new("Japan", "Tokyo").into_trip();
        library.save_trip(&trip).unwrap();
        let mut album = Album::new(trip.id, "Hotel");
        library.save_album(&album).unwrap();

        album.name = "Ryokan".to_string();
        library.save_album(&album).unwrap();

        assert_eq!(library.find_album(album.id).unwrap(), Some(album.clone()));
        assert_eq!(library.all_album_ids().unwrap(), vec![album.id]);
    }

    #[test]
    fn test_seed_flag_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("traveler.db");
        {
            let library = Library::open(&path).unwrap();
            assert!(library.needs_seed().unwrap());
            library.mark_seeded().unwrap();
        }
        let reopened = Library::open(&path).unwrap();
        assert!(!reopened.needs_seed().unwrap());
    }
}
