use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Cascade model does not exist: {0}")]
    ModelMissing(PathBuf),
    #[error("Could not load cascade model {path}: {reason}")]
    CascadeLoad { path: PathBuf, reason: String },
    /// The native vision back-end is missing from this build or platform.
    #[error("Vision back-end unavailable: {0}")]
    BackendUnavailable(String),
    #[error("Image of {width}x{height} is too small to preprocess")]
    ImageTooSmall { width: u32, height: u32 },
    #[error("Face classification failed: {0}")]
    Classification(String),
    #[error("Image error")]
    Image(#[from] image::ImageError),
}

impl DetectError {
    /// Errors that no amount of per-image skipping can recover from. The batch driver handles
    /// these at its outermost boundary.
    pub fn is_environment(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}

#[cfg(feature = "opencv")]
impl From<opencv::Error> for DetectError {
    fn from(err: opencv::Error) -> Self {
        Self::Classification(format!("OpenCV error: {err}"))
    }
}
