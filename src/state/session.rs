/// One album while it is open
///
/// The photo list is loaded when the session is activated and written back
/// after every structural change (append, delete, move) and once more on
/// deactivation. A failed write keeps the change in memory, marks the
/// session dirty and records a `Notice`; `retry_save` tries again.
///
/// A document that exists but cannot be read opens as an empty album and
/// is left untouched until the user actually changes the album.
use std::collections::HashSet;

use super::album_store::PhotoStore;
use super::collection::{Collection, DeleteRequest};
use super::data::{AlbumId, ImageItem, PhotoId};
use super::notice::Notice;
use crate::error::Result;

#[derive(Debug)]
pub struct AlbumSession {
    store: PhotoStore,
    album_id: AlbumId,
    photos: Collection<ImageItem>,
    selection: HashSet<PhotoId>,
    dirty: bool,
    /// False while the stored document could not be read and nothing has changed
    writable: bool,
    notices: Vec<Notice>,
}

impl AlbumSession {
    /// Open an album, loading its photo list (empty if never saved or unreadable)
    pub fn activate(store: PhotoStore, album_id: AlbumId) -> Self {
        let mut notices = Vec::new();
        let (photos, writable) = match store.load_or_set_aside(album_id) {
            Ok(photos) => (photos, true),
            Err(e) => {
                tracing::warn!(album = %album_id, error = %e, "album document unreadable");
                notices.push(Notice::unreadable("album photos", &e));
                (Vec::new(), false)
            }
        };
        tracing::debug!(album = %album_id, photos = photos.len(), "album activated");
        Self {
            store,
            album_id,
            photos: Collection::from_vec(photos),
            selection: HashSet::new(),
            dirty: false,
            writable,
            notices,
        }
    }

    pub fn album_id(&self) -> AlbumId {
        self.album_id
    }

    pub fn store(&self) -> &PhotoStore {
        &self.store
    }

    pub fn photos(&self) -> &[ImageItem] {
        self.photos.items()
    }

    /// True while the last write did not reach the disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Append a whole picker batch as a single update and save once
    pub fn append_batch(&mut self, items: Vec<ImageItem>) {
        if items.is_empty() {
            return;
        }
        let count = items.len();
        self.photos.extend(items);
        tracing::info!(album = %self.album_id, count, "photos added");
        self.persist("photos");
    }

    pub fn toggle_selection(&mut self, photo_id: PhotoId) {
        if !self.selection.remove(&photo_id) && self.photos.get(photo_id).is_some() {
            self.selection.insert(photo_id);
        }
    }

    pub fn selection(&self) -> &HashSet<PhotoId> {
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Ask to delete the selected photos. `None` when nothing is selected.
    pub fn request_delete_selected(&self) -> Option<DeleteRequest> {
        if self.selection.is_empty() {
            return None;
        }
        let ids: Vec<PhotoId> = self
            .photos
            .items()
            .iter()
            .map(|photo| photo.id)
            .filter(|id| self.selection.contains(id))
            .collect();
        Some(self.photos.request_delete(&ids))
    }

    pub fn request_delete(&self, ids: &[PhotoId]) -> DeleteRequest {
        self.photos.request_delete(ids)
    }

    /// Remove confirmed photos: records, image files, then save.
    /// A file that cannot be removed does not keep its record alive.
    pub fn confirm_delete(&mut self, request: DeleteRequest) -> Vec<ImageItem> {
        let removed = self.photos.confirm_delete(request);
        for photo in &removed {
            self.store.delete_photo_file(&photo.image_path);
            self.selection.remove(&photo.id);
        }
        if !removed.is_empty() {
            tracing::info!(album = %self.album_id, count = removed.len(), "photos deleted");
            self.persist("photo deletion");
        }
        removed
    }

    /// Reorder: move the photo at `from` to index `to`
    pub fn move_photo(&mut self, from: usize, to: usize) -> bool {
        if !self.photos.move_item(from, to) {
            return false;
        }
        if from != to {
            self.persist("photo order");
        }
        true
    }

    /// Try the last failed save again
    pub fn retry_save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.store.save(self.album_id, self.photos.items())?;
        self.dirty = false;
        self.notices.clear();
        Ok(())
    }

    /// Close the album, saving its photo list one last time
    pub fn deactivate(mut self) -> Result<()> {
        if !self.writable {
            tracing::debug!(album = %self.album_id, "unreadable album left as it was");
            return Ok(());
        }
        self.dirty = true;
        self.retry_save()
    }

    fn persist(&mut self, action: &str) {
        self.writable = true;
        match self.store.save(self.album_id, self.photos.items()) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                tracing::warn!(album = %self.album_id, action, error = %e, "album save failed");
                self.dirty = true;
                self.notices.push(Notice::persistence(action, &e));
            }
        }
    }
}
