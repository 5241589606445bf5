/// Where new photos come from
///
/// Platform pickers and cameras sit behind `ImageSource`. Each
/// implementation returns the user's selection without loading it; loading
/// happens concurrently during import. Cancelling yields an empty selection.
use std::future::Future;
use std::path::PathBuf;

use rfd::AsyncFileDialog;

use super::encode::IMAGE_EXTENSIONS;
use crate::error::Result;

/// One selected image, not yet loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickedImage {
    File(PathBuf),
    Bytes(Vec<u8>),
}

impl PickedImage {
    pub async fn load(self) -> Result<Vec<u8>> {
        match self {
            PickedImage::File(path) => Ok(tokio::fs::read(&path).await?),
            PickedImage::Bytes(bytes) => Ok(bytes),
        }
    }
}

/// Capability contract for picking and capturing images
pub trait ImageSource {
    /// Let the user choose any number of images. Cancel = empty vec.
    fn pick(&self) -> impl Future<Output = Result<Vec<PickedImage>>>;

    /// Take a single picture. Cancel = `None`.
    fn capture(&self) -> impl Future<Output = Result<Option<PickedImage>>>;
}

/// Native file dialog
///
/// Desktops have no camera capture, so `capture` falls back to picking a
/// single file from the library.
#[derive(Debug, Clone)]
pub struct FileDialogSource {
    title: String,
}

impl FileDialogSource {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    fn dialog(&self) -> AsyncFileDialog {
        AsyncFileDialog::new()
            .set_title(self.title.as_str())
            .add_filter("Images", &IMAGE_EXTENSIONS)
    }
}

impl Default for FileDialogSource {
    fn default() -> Self {
        Self::new("Select Photos")
    }
}

impl ImageSource for FileDialogSource {
    fn pick(&self) -> impl Future<Output = Result<Vec<PickedImage>>> {
        pick_files(self.dialog())
    }

    fn capture(&self) -> impl Future<Output = Result<Option<PickedImage>>> {
        tracing::info!("camera not available; falling back to photo library");
        pick_file(self.dialog())
    }
}

async fn pick_files(dialog: AsyncFileDialog) -> Result<Vec<PickedImage>> {
    let files = dialog.pick_files().await.unwrap_or_default();
    Ok(files
        .into_iter()
        .map(|file| PickedImage::File(file.path().to_path_buf()))
        .collect())
}

async fn pick_file(dialog: AsyncFileDialog) -> Result<Option<PickedImage>> {
    Ok(dialog
        .pick_file()
        .await
        .map(|file| PickedImage::File(file.path().to_path_buf())))
}

/// Images named up front, e.g. on the command line
#[derive(Debug, Clone, Default)]
pub struct PathSource {
    paths: Vec<PathBuf>,
}

impl PathSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl ImageSource for PathSource {
    fn pick(&self) -> impl Future<Output = Result<Vec<PickedImage>>> {
        let picked: Vec<PickedImage> = self.paths.iter().cloned().map(PickedImage::File).collect();
        std::future::ready(Ok(picked))
    }

    fn capture(&self) -> impl Future<Output = Result<Option<PickedImage>>> {
        let first = self.paths.first().cloned().map(PickedImage::File);
        std::future::ready(Ok(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_path_source_picks_everything_in_order() {
        let source = PathSource::new(vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);
        let picked = source.pick().await.unwrap();
        assert_eq!(
            picked,
            vec![
                PickedImage::File(PathBuf::from("a.jpg")),
                PickedImage::File(PathBuf::from("b.jpg"))
            ]
        );
        assert_eq!(
            source.capture().await.unwrap(),
            Some(PickedImage::File(PathBuf::from("a.jpg")))
        );
    }

    #[tokio::test]
    async fn test_empty_path_source_is_a_cancel() {
        let source = PathSource::default();
        assert!(source.pick().await.unwrap().is_empty());
        assert!(source.capture().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bytes_load_without_io() {
        let bytes = PickedImage::Bytes(vec![1, 2, 3]).load().await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }
}
