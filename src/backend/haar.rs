use super::{Cascade, CascadeBackend};
use crate::{config::DetectionParams, error::DetectError, result::Rect};
use image::GrayImage;
use log::debug;
use opencv::{
    core::{Mat, Size, Vector},
    objdetect::{self, CascadeClassifier},
    prelude::*,
};
use std::{path::Path, sync::Mutex};

/// Haar cascades through OpenCV's `objdetect` module.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenCvBackend;

impl CascadeBackend for OpenCvBackend {
    fn load_cascade(&self, model: &Path) -> Result<Box<dyn Cascade>, DetectError> {
        if !model.exists() {
            return Err(DetectError::ModelMissing(model.to_path_buf()));
        }
        let load_error =
            |reason: String| DetectError::CascadeLoad { path: model.to_path_buf(), reason };

        let filename =
            model.to_str().ok_or_else(|| load_error("path is not valid UTF-8".to_string()))?;
        let classifier = CascadeClassifier::new(filename).map_err(|e| load_error(e.to_string()))?;
        if classifier.empty().map_err(|e| load_error(e.to_string()))? {
            return Err(load_error("OpenCV loaded an empty classifier".to_string()));
        }
        debug!("Loaded Haar cascade from {}", model.display());
        Ok(Box::new(HaarCascade { classifier: Mutex::new(classifier) }))
    }
}

pub struct HaarCascade {
    /// `detect_multi_scale` takes `&mut self` even though it doesn't change the model.
    classifier: Mutex<CascadeClassifier>,
}

impl Cascade for HaarCascade {
    fn detect(&self, image: &GrayImage, params: &DetectionParams) -> Result<Vec<Rect>, DetectError> {
        let (width, height) = image.dimensions();
        let mat = Mat::from_slice_rows_cols(image.as_raw(), height as usize, width as usize)?;

        let flags = if params.canny_pruning { objdetect::CASCADE_DO_CANNY_PRUNING } else { 0 };
        let mut faces = Vector::<opencv::core::Rect>::new();
        let mut classifier = self
            .classifier
            .lock()
            .map_err(|_| DetectError::Classification("cascade lock poisoned".to_string()))?;
        classifier.detect_multi_scale(
            &mat,
            &mut faces,
            params.scale_factor,
            params.min_neighbors,
            flags,
            Size::default(),
            Size::default(),
        )?;

        Ok(faces.iter().map(|face| Rect::new(face.x, face.y, face.width, face.height)).collect())
    }
}
