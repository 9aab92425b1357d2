use crate::loader::Bitmap;
use image::GenericImageView;
use serde::{Serialize, Serializer};

/// Axis-aligned face region in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Maps a rectangle on an image of size `from` onto the same content at size `to`, each axis
    /// by its own ratio. Downscaling floors odd dimensions, so the ratio isn't always the
    /// integer factor that was divided by. Results are rounded to the nearest pixel.
    pub fn rescaled(self, from: (u32, u32), to: (u32, u32)) -> Self {
        let x_ratio = f64::from(to.0) / f64::from(from.0.max(1));
        let y_ratio = f64::from(to.1) / f64::from(from.1.max(1));
        // `as` saturates out-of-range floats, which can only happen for absurd image sizes.
        let scale = |value: i32, ratio: f64| (f64::from(value) * ratio).round() as i32;
        Self {
            x: scale(self.x, x_ratio),
            y: scale(self.y, y_ratio),
            width: scale(self.width, x_ratio),
            height: scale(self.height, y_ratio),
        }
    }
}

/// Faces found in one image.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult<'a> {
    /// The image as it was loaded, before any preprocessing.
    #[serde(rename = "image_dimensions", serialize_with = "serialize_dimensions")]
    image: &'a Bitmap,
    /// Face regions in the order the classifier reported them.
    rectangles: Vec<Rect>,
}

impl<'a> DetectionResult<'a> {
    pub fn new(image: &'a Bitmap, rectangles: Vec<Rect>) -> Self {
        Self { image, rectangles }
    }

    pub fn image(&self) -> &'a Bitmap {
        self.image
    }

    pub fn face_count(&self) -> usize {
        self.rectangles.len()
    }

    pub fn rectangles(&self) -> &[Rect] {
        &self.rectangles
    }
}

fn serialize_dimensions<S: Serializer>(image: &&Bitmap, serializer: S) -> Result<S::Ok, S::Error> {
    image.dimensions().serialize(serializer)
}
