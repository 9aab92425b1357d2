use crate::{config::DetectionParams, error::DetectError, loader::Bitmap};
use image::{imageops::FilterType, GrayImage};
use imageproc::contrast::equalize_histogram;

/// Converts `image` into what the cascade classifies: a grayscale copy, shrunk by
/// `params.downscale` with linear interpolation, with its histogram equalized.
///
/// Grayscale and equalization make the cascade find more faces; shrinking trades some recall of
/// small faces for speed.
pub fn preprocess(image: &Bitmap, params: &DetectionParams) -> Result<GrayImage, DetectError> {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    let downscale = params.downscale.max(1);
    let (small_width, small_height) = (width / downscale, height / downscale);
    if small_width == 0 || small_height == 0 {
        return Err(DetectError::ImageTooSmall { width, height });
    }

    let small = image::imageops::resize(&gray, small_width, small_height, FilterType::Triangle);
    Ok(equalize_histogram(&small))
}
