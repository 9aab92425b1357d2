//! The seam between this crate and the vision library that does the actual classification.

use crate::{config::DetectionParams, error::DetectError, result::Rect};
use image::GrayImage;
use std::path::Path;

#[cfg(feature = "opencv")]
mod haar;
#[cfg(feature = "opencv")]
pub use self::haar::{HaarCascade, OpenCvBackend};

/// A loaded, immutable classifier model.
pub trait Cascade: Send + Sync {
    /// Finds faces in a preprocessed image. Rectangles are in `image`'s coordinates.
    fn detect(&self, image: &GrayImage, params: &DetectionParams) -> Result<Vec<Rect>, DetectError>;
}

/// Loads classifier models from disk.
pub trait CascadeBackend: Send + Sync {
    fn load_cascade(&self, model: &Path) -> Result<Box<dyn Cascade>, DetectError>;
}

/// Whatever native back-end this build was compiled with.
///
/// Without the `opencv` feature there is none, and every load fails with
/// [`DetectError::BackendUnavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBackend;

impl CascadeBackend for NativeBackend {
    #[cfg(feature = "opencv")]
    fn load_cascade(&self, model: &Path) -> Result<Box<dyn Cascade>, DetectError> {
        OpenCvBackend.load_cascade(model)
    }

    #[cfg(not(feature = "opencv"))]
    fn load_cascade(&self, _model: &Path) -> Result<Box<dyn Cascade>, DetectError> {
        Err(DetectError::BackendUnavailable(
            "built without the `opencv` feature, no cascade classifier is available".to_string(),
        ))
    }
}
