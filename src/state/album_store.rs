/// On-disk storage for album photo documents and photo files
///
/// Layout under the store root:
/// - `albums/<album-id>_images.json`: ordered `[{id, image_path}]` per album
/// - `photos/<photo-id>.png`: image bytes, one file per photo
///
/// Metadata and bytes are kept apart so that every mutation only
/// rewrites a small JSON document.
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use super::data::{new_id, timestamp_suffix, AlbumId, ImageItem};
use crate::error::{Error, Result};

const DOCUMENT_SUFFIX: &str = "_images.json";
const PHOTO_EXTENSION: &str = "png";

#[derive(Debug, Clone)]
pub struct PhotoStore {
    documents_dir: PathBuf,
    photos_dir: PathBuf,
}

impl PhotoStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn open(root: &Path) -> Result<Self> {
        let documents_dir = root.join("albums");
        let photos_dir = root.join("photos");
        fs::create_dir_all(&documents_dir)?;
        fs::create_dir_all(&photos_dir)?;

        tracing::debug!(root = %root.display(), "photo store opened");

        Ok(Self {
            documents_dir,
            photos_dir,
        })
    }

    pub fn photos_dir(&self) -> &Path {
        &self.photos_dir
    }

    /// Where the document for `album_id` lives (whether or not it exists yet)
    pub fn document_path(&self, album_id: AlbumId) -> PathBuf {
        self.documents_dir
            .join(format!("{}{}", album_id, DOCUMENT_SUFFIX))
    }

    /// Write the album's photo list, replacing any previous document.
    ///
    /// The document is written to a temporary file next to the target and
    /// renamed over it, so a failed write leaves the last good document in place.
    pub fn save(&self, album_id: AlbumId, photos: &[ImageItem]) -> Result<()> {
        let path = self.document_path(album_id);
        let mut tmp = NamedTempFile::new_in(&self.documents_dir)?;
        serde_json::to_writer_pretty(&mut tmp, photos)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(album = %album_id, photos = photos.len(), "album document saved");
        Ok(())
    }

    /// Read the album's photo list.
    ///
    /// An album that was never saved has no document and loads as empty.
    pub fn load(&self, album_id: AlbumId) -> Result<Vec<ImageItem>> {
        let path = self.document_path(album_id);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&data).map_err(|source| Error::CorruptData { path, source })
    }

    /// Load, setting a corrupt document aside and starting empty.
    ///
    /// The corrupt file is renamed to `<name>.corrupt-<timestamp>` so the
    /// next save cannot overwrite it. Any other read failure is returned.
    pub fn load_or_set_aside(&self, album_id: AlbumId) -> Result<Vec<ImageItem>> {
        match self.load(album_id) {
            Err(Error::CorruptData { path, source }) => {
                let mut preserved = path.clone().into_os_string();
                preserved.push(format!(".corrupt-{}", timestamp_suffix()));
                let preserved = PathBuf::from(preserved);
                match fs::rename(&path, &preserved) {
                    Ok(()) => tracing::warn!(
                        album = %album_id,
                        error = %source,
                        preserved = %preserved.display(),
                        "corrupt album document set aside"
                    ),
                    Err(e) => tracing::error!(
                        album = %album_id,
                        error = %e,
                        "corrupt album document could not be set aside"
                    ),
                }
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Like `load_or_set_aside`, but an unreadable document also loads as empty
    pub fn load_or_recover(&self, album_id: AlbumId) -> Vec<ImageItem> {
        self.load_or_set_aside(album_id).unwrap_or_else(|e| {
            tracing::warn!(album = %album_id, error = %e, "album document unreadable");
            Vec::new()
        })
    }

    /// Remove a photo's image file. Failures are logged and otherwise ignored.
    pub fn delete_photo_file(&self, image_path: &Path) {
        if let Err(e) = fs::remove_file(image_path) {
            tracing::warn!(path = %image_path.display(), error = %e, "could not delete photo file");
        }
    }

    /// Remove an album's document. A missing document is not an error.
    pub fn delete_document(&self, album_id: AlbumId) -> Result<()> {
        match fs::remove_file(self.document_path(album_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an album's photo files and then its document
    pub fn purge_album(&self, album_id: AlbumId) -> Result<usize> {
        let photos = self.load_or_recover(album_id);
        for photo in &photos {
            self.delete_photo_file(&photo.image_path);
        }
        self.delete_document(album_id)?;
        tracing::info!(album = %album_id, photos = photos.len(), "album storage purged");
        Ok(photos.len())
    }

    /// Store PNG bytes as a new photo file and return its path
    pub async fn write_photo(&self, png: Vec<u8>) -> Result<PathBuf> {
        let path = self
            .photos_dir
            .join(format!("{}.{}", new_id(), PHOTO_EXTENSION));
        tokio::fs::write(&path, png).await?;
        Ok(path)
    }

    /// Album ids that currently have a document on disk
    pub fn list_documents(&self) -> Vec<AlbumId> {
        WalkDir::new(&self.documents_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                let id = name.strip_suffix(DOCUMENT_SUFFIX)?;
                id.parse().ok()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn store() -> (TempDir, PhotoStore) {
        let dir = TempDir::new().unwrap();
        let store = PhotoStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn sample_photos(store: &PhotoStore, n: usize) -> Vec<ImageItem> {
        (0..n)
            .map(|i| ImageItem::new(store.photos_dir().join(format!("{i}.png"))))
            .collect()
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let (_dir, store) = store();
        let album = new_id();
        let photos = sample_photos(&store, 3);

        store.save(album, &photos).unwrap();
        assert_eq!(store.load(album).unwrap(), photos);
    }

    #[test]
    fn test_never_saved_album_loads_empty() {
        let (_dir, store) = store();
        assert!(store.load(new_id()).unwrap().is_empty());
    }

    #[test]
    fn test_save_overwrites_previous_document() {
        let (_dir, store) = store();
        let album = new_id();
        store.save(album, &sample_photos(&store, 3)).unwrap();
        let fewer = sample_photos(&store, 1);
        store.save(album, &fewer).unwrap();
        assert_eq!(store.load(album).unwrap(), fewer);
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let (dir, store) = store();
        let album = new_id();
        store.save(album, &sample_photos(&store, 2)).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path().join("albums"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].to_str().unwrap(),
            format!("{album}_images.json")
        );
    }

    #[test]
    fn test_corrupt_document_is_reported() {
        let (_dir, store) = store();
        let album = new_id();
        fs::write(store.document_path(album), b"{ not json").unwrap();
        assert_matches!(store.load(album), Err(Error::CorruptData { .. }));
        // Plain reads never move the document
        assert!(store.document_path(album).exists());
    }

    #[test]
    fn test_recovery_preserves_corrupt_document() {
        let (dir, store) = store();
        let album = new_id();
        fs::write(store.document_path(album), b"[{\"id\": 42}]").unwrap();

        assert!(store.load_or_recover(album).is_empty());
        assert!(!store.document_path(album).exists());

        let preserved: Vec<_> = fs::read_dir(dir.path().join("albums"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.contains(".corrupt-"))
            .collect();
        assert_eq!(preserved.len(), 1);

        // A later save must not touch the preserved copy
        store.save(album, &sample_photos(&store, 1)).unwrap();
        let preserved_path = dir.path().join("albums").join(&preserved[0]);
        assert_eq!(fs::read(preserved_path).unwrap(), b"[{\"id\": 42}]");
    }

    #[test]
    fn test_unreadable_document_is_returned_not_moved() {
        let (_dir, store) = store();
        let album = new_id();
        // A directory in place of the document cannot be read as a file
        fs::create_dir(store.document_path(album)).unwrap();

        assert_matches!(store.load_or_set_aside(album), Err(Error::Io(_)));
        assert!(store.document_path(album).is_dir());
    }

    #[test]
    fn test_delete_missing_photo_file_is_ignored() {
        let (_dir, store) = store();
        store.delete_photo_file(&store.photos_dir().join("gone.png"));
    }

    #[tokio::test]
    async fn test_write_photo_uses_fresh_names() {
        let (_dir, store) = store();
        let a = store.write_photo(vec![1, 2, 3]).await.unwrap();
        let b = store.write_photo(vec![4, 5, 6]).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(a.extension().unwrap(), "png");
        assert_eq!(fs::read(&b).unwrap(), vec![4, 5, 6]);
    }

    #[tokio::test]
    async fn test_purge_album_removes_files_and_document() {
        let (_dir, store) = store();
        let album = new_id();
        let path = store.write_photo(vec![0; 4]).await.unwrap();
        store.save(album, &[ImageItem::new(path.clone())]).unwrap();

        assert_eq!(store.purge_album(album).unwrap(), 1);
        assert!(!path.exists());
        assert!(!store.document_path(album).exists());
    }

    #[test]
    fn test_list_documents() {
        let (_dir, store) = store();
        let a = new_id();
        let b = new_id();
        store.save(a, &[]).unwrap();
        store.save(b, &[]).unwrap();

        let mut listed = store.list_documents();
        listed.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(listed, expected);
    }
}
