use crate::{
    backend::CascadeBackend, config::Config, detector::FaceDetector, error::DetectError, listing,
    loader,
};
use log::{debug, info};
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Images that could be decoded.
    pub images: usize,
    /// Images the detector produced a result for.
    pub results: usize,
    pub faces: usize,
    pub elapsed: Duration,
}

/// Loads every image under the configured test image directory and detects faces in all of them.
///
/// Missing resources and undecodable images only shrink the batch. The error case is reserved for
/// a back-end that can't run at all.
pub fn run_batch(
    config: &Config,
    backend: impl CascadeBackend + 'static,
) -> Result<BatchSummary, DetectError> {
    let paths = config
        .resolve_resource(&config.test_images)
        .map(|dir| listing::flatten([dir]))
        .unwrap_or_default();
    let images = loader::load_all(&paths);
    debug!("Loaded {} of {} files under {}", images.len(), paths.len(), config.test_images.display());

    let detector = FaceDetector::new(backend, config.cascade_path(), config.detection.clone());
    let start = Instant::now();
    let results = detector.detect_faces(&images)?;
    let elapsed = start.elapsed();

    let faces: usize = results.iter().map(|result| result.face_count()).sum();
    info!("Detecting {faces} faces in {} images took {elapsed:?}", images.len());

    Ok(BatchSummary { images: images.len(), results: results.len(), faces, elapsed })
}
