/// The journal: trips and their albums as one application-state store
///
/// Every change goes through a method here. The in-memory lists are
/// updated first, then written through to the catalog. A catalog failure
/// never undoes the change; it is kept as a `Notice` and the write is
/// remembered until `retry_save` gets it into the catalog.
use std::collections::HashMap;

use super::collection::{Collection, DeleteRequest};
use super::data::{Album, AlbumId, Trip, TripDraft, TripId, STARTER_ALBUMS};
use super::library::Library;
use super::notice::Notice;
use crate::error::Result;

/// Result of a confirmed trip deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRemoval {
    pub trips: Vec<Trip>,
    /// Albums that belonged to the removed trips. Their photo documents and
    /// files are still on disk until someone purges them.
    pub orphaned_albums: Vec<AlbumId>,
}

/// A catalog write that has not reached the disk yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingWrite {
    Trip(TripId),
    TripDeletion(TripId),
    Album(AlbumId),
    AlbumDeletion(AlbumId),
}

#[derive(Debug)]
pub struct Journal {
    library: Library,
    trips: Collection<Trip>,
    albums: HashMap<TripId, Collection<Album>>,
    notices: Vec<Notice>,
    /// Failed writes in the order they were attempted
    pending: Vec<PendingWrite>,
}

impl Journal {
    /// Load every trip and album from the catalog.
    ///
    /// A brand-new catalog gets a "Local Area" trip to start from.
    pub fn open(library: Library) -> Result<Self> {
        let trips = library.list_trips()?;
        let mut albums = HashMap::with_capacity(trips.len());
        for trip in &trips {
            albums.insert(trip.id, Collection::from_vec(library.list_albums(trip.id)?));
        }

        let mut journal = Self {
            library,
            trips: Collection::from_vec(trips),
            albums,
            notices: Vec::new(),
            pending: Vec::new(),
        };

        if journal.library.needs_seed()? {
            let mut local = TripDraft::new("Local Area", "Home");
            local.description = "Explore your local area".to_string();
            journal.add_trip(local);
            journal.library.mark_seeded()?;
        }

        tracing::info!(trips = journal.trips.len(), "journal loaded");
        Ok(journal)
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Failures from write-through saves, oldest first
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// True while some change is only in memory
    pub fn has_pending_writes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Write every change that failed to reach the catalog, oldest first.
    ///
    /// Stops at the first failure and keeps it (and everything after it)
    /// for the next attempt. Once all writes are through, the retryable
    /// notices are cleared.
    pub fn retry_save(&mut self) -> Result<()> {
        while let Some(&write) = self.pending.first() {
            self.apply(write)?;
            self.pending.remove(0);
        }
        self.notices.retain(|notice| !notice.retryable);
        tracing::info!("catalog caught up");
        Ok(())
    }

    // ---- trips ----

    /// Trips whose name matches `query` (empty = all), in insertion order
    pub fn trips(&self, query: &str) -> Vec<&Trip> {
        self.trips.filter(query)
    }

    pub fn trip(&self, trip_id: TripId) -> Option<&Trip> {
        self.trips.get(trip_id)
    }

    /// Create a trip with the starter albums. `None` if the name is empty.
    pub fn add_trip(&mut self, draft: TripDraft) -> Option<TripId> {
        let trip = draft.into_trip();
        if trip.name.is_empty() {
            return None;
        }
        let saved = self.library.save_trip(&trip);
        let trip_id = self.trips.add(trip)?;
        self.write_through("trip", PendingWrite::Trip(trip_id), saved);

        self.albums.insert(trip_id, Collection::new());
        for name in STARTER_ALBUMS {
            self.add_album(trip_id, name);
        }

        tracing::info!(trip = %trip_id, "trip added");
        Some(trip_id)
    }

    /// Replace a trip's fields. Unknown ids are ignored.
    pub fn edit_trip(&mut self, updated: &Trip) -> bool {
        if !self.trips.edit(updated) {
            tracing::debug!(trip = %updated.id, "edit ignored, trip not found");
            return false;
        }
        if let Some(trip) = self.trips.get(updated.id) {
            let saved = self.library.save_trip(trip);
            self.write_through("trip", PendingWrite::Trip(updated.id), saved);
        }
        true
    }

    pub fn request_trip_deletion(&self, ids: &[TripId]) -> DeleteRequest {
        self.trips.request_delete(ids)
    }

    /// Deletion by row offsets in the list currently shown for `query`
    pub fn request_trip_deletion_at(&self, query: &str, offsets: &[usize]) -> DeleteRequest {
        self.trips.request_delete_at(query, offsets)
    }

    pub fn confirm_trip_deletion(&mut self, request: DeleteRequest) -> TripRemoval {
        let trips = self.trips.confirm_delete(request);
        let mut orphaned_albums = Vec::new();

        for trip in &trips {
            if let Some(albums) = self.albums.remove(&trip.id) {
                orphaned_albums.extend(albums.items().iter().map(|album| album.id));
            }
            let deleted = self.library.delete_trip(trip.id).map(|_| ());
            self.write_through("trip deletion", PendingWrite::TripDeletion(trip.id), deleted);
            tracing::info!(trip = %trip.id, "trip deleted");
        }

        TripRemoval {
            trips,
            orphaned_albums,
        }
    }

    // ---- albums ----

    /// A trip's albums matching `query`; empty if the trip is unknown
    pub fn albums(&self, trip_id: TripId, query: &str) -> Vec<&Album> {
        self.albums
            .get(&trip_id)
            .map(|albums| albums.filter(query))
            .unwrap_or_default()
    }

    /// Find an album by id in any trip
    pub fn album(&self, album_id: AlbumId) -> Option<&Album> {
        self.albums.values().find_map(|albums| albums.get(album_id))
    }

    /// Add an album to a trip. `None` if the name is empty or the trip unknown.
    pub fn add_album(&mut self, trip_id: TripId, name: &str) -> Option<AlbumId> {
        let albums = self.albums.get_mut(&trip_id)?;
        let album = Album::new(trip_id, name);
        if album.name.is_empty() {
            return None;
        }
        let saved = self.library.save_album(&album);
        let album_id = albums.add(album)?;
        self.write_through("album", PendingWrite::Album(album_id), saved);
        Some(album_id)
    }

    /// Rename an album. Unknown ids are ignored.
    pub fn rename_album(&mut self, updated: &Album) -> bool {
        let Some(albums) = self.albums.get_mut(&updated.trip_id) else {
            return false;
        };
        if !albums.edit(updated) {
            return false;
        }
        let saved = self.library.save_album(updated);
        self.write_through("album", PendingWrite::Album(updated.id), saved);
        true
    }

    pub fn request_album_deletion(&self, trip_id: TripId, ids: &[AlbumId]) -> DeleteRequest {
        match self.albums.get(&trip_id) {
            Some(albums) => albums.request_delete(ids),
            None => Collection::<Album>::new().request_delete(ids),
        }
    }

    pub fn request_album_deletion_at(
        &self,
        trip_id: TripId,
        query: &str,
        offsets: &[usize],
    ) -> DeleteRequest {
        match self.albums.get(&trip_id) {
            Some(albums) => albums.request_delete_at(query, offsets),
            None => Collection::<Album>::new().request_delete_at(query, offsets),
        }
    }

    /// Remove confirmed albums from the trip and the catalog.
    /// Photo documents and files are left alone.
    pub fn confirm_album_deletion(&mut self, trip_id: TripId, request: DeleteRequest) -> Vec<Album> {
        let Some(albums) = self.albums.get_mut(&trip_id) else {
            return Vec::new();
        };
        let removed = albums.confirm_delete(request);
        for album in &removed {
            let deleted = self.library.delete_album(album.id);
            self.write_through("album deletion", PendingWrite::AlbumDeletion(album.id), deleted);
        }
        removed
    }

    fn write_through(&mut self, action: &str, write: PendingWrite, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!(action, error = %e, "catalog write failed");
            self.notices.push(Notice::persistence(action, &e));
            if !self.pending.contains(&write) {
                self.pending.push(write);
            }
        }
    }

    /// Write the current in-memory state behind `write`.
    /// Records removed in the meantime need nothing.
    fn apply(&self, write: PendingWrite) -> Result<()> {
        match write {
            PendingWrite::Trip(id) => match self.trips.get(id) {
                Some(trip) => self.library.save_trip(trip),
                None => Ok(()),
            },
            PendingWrite::TripDeletion(id) => self.library.delete_trip(id).map(|_| ()),
            PendingWrite::Album(id) => match self.album(id) {
                Some(album) => self.library.save_album(album),
                None => Ok(()),
            },
            PendingWrite::AlbumDeletion(id) => self.library.delete_album(id),
        }
    }
}
