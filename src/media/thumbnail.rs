use image::{imageops::FilterType, DynamicImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::state::{ImageItem, PhotoId};

/// Size of generated thumbnails (square)
const THUMBNAIL_SIZE: u32 = 256;

/// What to draw for a photo
#[derive(Debug, Clone)]
pub enum DisplayImage {
    Photo(DynamicImage),
    /// The photo's file is missing or unreadable
    Placeholder(DynamicImage),
}

impl DisplayImage {
    pub fn image(&self) -> &DynamicImage {
        match self {
            DisplayImage::Photo(img) | DisplayImage::Placeholder(img) => img,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, DisplayImage::Placeholder(_))
    }
}

/// Neutral grey square shown in place of a missing photo
pub fn placeholder() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        THUMBNAIL_SIZE,
        THUMBNAIL_SIZE,
        Rgba([200, 200, 200, 255]),
    ))
}

/// Load a photo for display, substituting the placeholder when its file
/// cannot be read. Never fails.
pub fn load_for_display(item: &ImageItem) -> DisplayImage {
    match image::open(&item.image_path) {
        Ok(img) => DisplayImage::Photo(img),
        Err(e) => {
            tracing::debug!(photo = %item.id, error = %e, "showing placeholder");
            DisplayImage::Placeholder(placeholder())
        }
    }
}

/// Get (and create) the thumbnail cache directory under `cache_root`
pub fn thumbnail_cache_dir(cache_root: &Path) -> Result<PathBuf> {
    let path = cache_root.join("thumbnails");
    fs::create_dir_all(&path)?;
    Ok(path)
}

/// Get the thumbnail path for a photo (doesn't generate, just returns the expected path)
pub fn thumbnail_path(cache_dir: &Path, photo_id: PhotoId) -> PathBuf {
    cache_dir.join(format!("{}.png", photo_id))
}

/// Check if a thumbnail exists for a photo
pub fn thumbnail_exists(cache_dir: &Path, photo_id: PhotoId) -> bool {
    thumbnail_path(cache_dir, photo_id).exists()
}

/// Thumbnail for a photo, generated on first use.
///
/// Returns `None` when the photo itself cannot be displayed; the caller
/// shows the placeholder instead.
pub fn generate_thumbnail(item: &ImageItem, cache_dir: &Path) -> Option<PathBuf> {
    let path = thumbnail_path(cache_dir, item.id);
    if path.exists() {
        return Some(path);
    }

    let DisplayImage::Photo(img) = load_for_display(item) else {
        return None;
    };
    let thumbnail = img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);

    match thumbnail.save(&path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "thumbnail generated");
            Some(path)
        }
        Err(e) => {
            tracing::warn!(photo = %item.id, error = %e, "thumbnail could not be saved");
            None
        }
    }
}

/// Remove a photo's cached thumbnail, if any
pub fn remove_thumbnail(cache_dir: &Path, photo_id: PhotoId) {
    let _ = fs::remove_file(thumbnail_path(cache_dir, photo_id));
}
