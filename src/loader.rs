use image::{DynamicImage, ImageReader};
use log::warn;
use std::path::Path;

/// A decoded raster image, as read from disk.
pub type Bitmap = DynamicImage;

pub(crate) fn decode(path: &Path) -> Result<Bitmap, image::ImageError> {
    // Sniff the format from the file's content so misnamed files still decode.
    Ok(ImageReader::open(path)?.with_guessed_format()?.decode()?)
}

/// Decodes the image at `path`, logging and returning `None` if that isn't possible.
pub fn load(path: impl AsRef<Path>) -> Option<Bitmap> {
    let path = path.as_ref();
    match decode(path) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!("Can't load image {}: {e}", path.display());
            None
        },
    }
}

/// Decodes every path that can be decoded, preserving their order.
pub fn load_all<I, P>(paths: I) -> Vec<Bitmap>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().filter_map(load).collect()
}
