#![warn(clippy::all, clippy::clone_on_ref_ptr, clippy::mod_module_files)]

//! Batch face detection with a Haar cascade.
//!
//! Images are found with [`listing`], decoded with [`loader`], and handed to a
//! [`FaceDetector`], which shrinks and equalizes each one before running the cascade classifier
//! of a [`CascadeBackend`]. The classifier itself comes from OpenCV when the `opencv` feature is
//! enabled.
//!
//! The `opencv` feature is off by default because it needs OpenCV's system libraries at build
//! time. A default build therefore cannot detect anything: [`NativeBackend`] fails every load
//! with [`DetectError::BackendUnavailable`], and the binary logs that and exits. Build with
//! `--features opencv` for real detection.

pub mod backend;
pub mod batch;
pub mod config;
pub mod detector;
pub mod listing;
pub mod loader;
pub mod preprocess;

mod error;
mod result;
#[cfg(test)]
mod test_log;

pub use backend::{Cascade, CascadeBackend, NativeBackend};
pub use batch::{run_batch, BatchSummary};
pub use config::{Config, ConfigError, DetectionParams};
pub use detector::FaceDetector;
pub use error::DetectError;
pub use loader::Bitmap;
pub use result::{DetectionResult, Rect};
