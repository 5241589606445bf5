use image::ImageFormat;
use std::io::Cursor;

use crate::error::Result;

/// File extensions offered by pickers
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tiff"];

/// Decode any supported image and re-encode it as PNG.
///
/// Every stored photo is a PNG, whatever the picker handed us.
pub fn normalize_to_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
pub(crate) fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([200, 120, 40]),
    ));
    let mut jpeg = Vec::new();
    img.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .unwrap();
    jpeg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use assert_matches::assert_matches;

    #[test]
    fn test_jpeg_becomes_png() {
        let png = normalize_to_png(&sample_jpeg(8, 6)).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_matches!(normalize_to_png(b"not an image"), Err(Error::Image(_)));
    }
}
