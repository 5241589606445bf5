/// Import picked images into an album
///
/// Each picked image is loaded, converted and written in its own task.
/// The album only changes after every task has finished, and then in a
/// single `append_batch`, so a batch is never half-visible.
use tokio::task::JoinSet;

use super::encode::normalize_to_png;
use super::source::{ImageSource, PickedImage};
use crate::error::Result;
use crate::state::{AlbumSession, ImageItem, PhotoStore};

/// Load, convert and store every picked image concurrently.
///
/// Returns the new records in selection order. Images that fail to load
/// or decode are logged and left out.
pub async fn import_picked(store: &PhotoStore, picked: Vec<PickedImage>) -> Vec<ImageItem> {
    let mut tasks = JoinSet::new();
    for (index, image) in picked.into_iter().enumerate() {
        let store = store.clone();
        tasks.spawn(async move { (index, import_one(&store, image).await) });
    }

    let mut imported = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(item))) => imported.push((index, item)),
            Ok((index, Err(e))) => {
                tracing::warn!(index, error = %e, "picked image could not be imported")
            }
            Err(e) => tracing::warn!(error = %e, "image import task failed"),
        }
    }

    imported.sort_by_key(|(index, _)| *index);
    imported.into_iter().map(|(_, item)| item).collect()
}

async fn import_one(store: &PhotoStore, image: PickedImage) -> Result<ImageItem> {
    let bytes = image.load().await?;
    // Decoding is CPU-bound
    let png = tokio::task::spawn_blocking(move || normalize_to_png(&bytes)).await??;
    let path = store.write_photo(png).await?;
    Ok(ImageItem::new(path))
}

/// Run the source's picker and add the whole selection to the album.
/// Returns how many photos were added; a cancelled picker adds none.
pub async fn pick_into<S: ImageSource>(source: &S, session: &mut AlbumSession) -> Result<usize> {
    let picked = source.pick().await?;
    if picked.is_empty() {
        tracing::debug!("picker dismissed without a selection");
        return Ok(0);
    }

    let items = import_picked(session.store(), picked).await;
    let count = items.len();
    session.append_batch(items);
    Ok(count)
}

/// Capture one picture and add it to the album
pub async fn capture_into<S: ImageSource>(
    source: &S,
    session: &mut AlbumSession,
) -> Result<usize> {
    let Some(captured) = source.capture().await? else {
        tracing::debug!("camera dismissed without a picture");
        return Ok(0);
    };

    let items = import_picked(session.store(), vec![captured]).await;
    let count = items.len();
    session.append_batch(items);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::encode::sample_jpeg;
    use crate::state::data::new_id;
    use std::future::Future;
    use tempfile::TempDir;

    /// Source handing out in-memory images
    struct MemorySource {
        images: Vec<Vec<u8>>,
    }

    impl ImageSource for MemorySource {
        fn pick(&self) -> impl Future<Output = Result<Vec<PickedImage>>> {
            let picked: Vec<PickedImage> =
                self.images.iter().cloned().map(PickedImage::Bytes).collect();
            std::future::ready(Ok(picked))
        }

        fn capture(&self) -> impl Future<Output = Result<Option<PickedImage>>> {
            std::future::ready(Ok(self.images.first().cloned().map(PickedImage::Bytes)))
        }
    }

    fn session() -> (TempDir, AlbumSession) {
        let dir = TempDir::new().unwrap();
        let store = PhotoStore::open(dir.path()).unwrap();
        (dir, AlbumSession::activate(store, new_id()))
    }

    #[tokio::test]
    async fn test_batch_is_appended_whole_and_in_order() {
        let (_dir, mut session) = session();
        let source = MemorySource {
            images: vec![sample_jpeg(4, 4), sample_jpeg(5, 5), sample_jpeg(6, 6)],
        };

        let added = pick_into(&source, &mut session).await.unwrap();
        assert_eq!(added, 3);
        assert_eq!(session.photos().len(), 3);

        // Selection order survives concurrent import
        let widths: Vec<u32> = session
            .photos()
            .iter()
            .map(|p| image::open(&p.image_path).unwrap().width())
            .collect();
        assert_eq!(widths, vec![4, 5, 6]);

        let saved = session.store().load(session.album_id()).unwrap();
        assert_eq!(saved, session.photos());
    }

    #[tokio::test]
    async fn test_unreadable_images_are_skipped() {
        let (_dir, mut session) = session();
        let source = MemorySource {
            images: vec![sample_jpeg(4, 4), b"garbage".to_vec(), sample_jpeg(6, 6)],
        };

        assert_eq!(pick_into(&source, &mut session).await.unwrap(), 2);
        assert_eq!(session.photos().len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_picker_is_noop() {
        let (_dir, mut session) = session();
        let source = MemorySource { images: vec![] };

        assert_eq!(pick_into(&source, &mut session).await.unwrap(), 0);
        assert_eq!(capture_into(&source, &mut session).await.unwrap(), 0);
        assert!(session.photos().is_empty());
        assert!(!session.store().document_path(session.album_id()).exists());
    }

    #[tokio::test]
    async fn test_capture_adds_one_photo() {
        let (_dir, mut session) = session();
        let source = MemorySource {
            images: vec![sample_jpeg(3, 3), sample_jpeg(4, 4)],
        };

        assert_eq!(capture_into(&source, &mut session).await.unwrap(), 1);
        assert_eq!(session.photos().len(), 1);
        assert!(session.photos()[0].is_displayable());
    }
}
