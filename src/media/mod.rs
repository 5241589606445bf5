/// Photo media handling
///
/// This module handles:
/// - Where picked and captured images come from (source.rs)
/// - Normalising image bytes to PNG (encode.rs)
/// - Importing a picker batch into an album (ingest.rs)
/// - Thumbnails and the placeholder for missing files (thumbnail.rs)

pub mod encode;
pub mod ingest;
pub mod source;
pub mod thumbnail;

pub use ingest::{capture_into, import_picked, pick_into};
pub use source::{FileDialogSource, ImageSource, PathSource, PickedImage};
pub use thumbnail::DisplayImage;
