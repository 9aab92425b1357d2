use crate::{
    backend::{Cascade, CascadeBackend},
    config::DetectionParams,
    error::DetectError,
    loader::{self, Bitmap},
    preprocess::preprocess,
    result::{DetectionResult, Rect},
};
use image::GenericImageView;
use log::{debug, warn};
use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

enum CascadeState {
    Ready(Box<dyn Cascade>),
    /// The model couldn't be loaded. Already logged, detection is off for good.
    Disabled,
    /// The back-end itself is missing, which callers have to hear about.
    Unavailable(String),
}

/// Runs a cascade classifier over images.
///
/// The model is loaded on first use and kept for the detector's lifetime. A failed load is
/// never retried.
pub struct FaceDetector {
    backend: Box<dyn CascadeBackend>,
    model: PathBuf,
    params: DetectionParams,
    cascade: OnceLock<CascadeState>,
}

impl FaceDetector {
    pub fn new(
        backend: impl CascadeBackend + 'static,
        model: impl Into<PathBuf>,
        params: DetectionParams,
    ) -> Self {
        Self { backend: Box::new(backend), model: model.into(), params, cascade: OnceLock::new() }
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    fn cascade(&self) -> &CascadeState {
        self.cascade.get_or_init(|| match self.backend.load_cascade(&self.model) {
            Ok(cascade) => CascadeState::Ready(cascade),
            Err(DetectError::BackendUnavailable(reason)) => CascadeState::Unavailable(reason),
            Err(e) => {
                warn!("Can't load face cascade, face detection is disabled: {e}");
                CascadeState::Disabled
            },
        })
    }

    /// Detects faces in each of `images`, independently.
    ///
    /// Images that fail preprocessing or classification are logged and left out. If the model
    /// couldn't be loaded the result is empty. Only a missing back-end is an error.
    pub fn detect_faces<'a>(
        &self,
        images: &'a [Bitmap],
    ) -> Result<Vec<DetectionResult<'a>>, DetectError> {
        let cascade = match self.cascade() {
            CascadeState::Ready(cascade) => cascade.as_ref(),
            CascadeState::Disabled => return Ok(Vec::new()),
            CascadeState::Unavailable(reason) => {
                return Err(DetectError::BackendUnavailable(reason.clone()))
            },
        };

        let mut results = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            match self.detect_one(cascade, image) {
                Ok(result) => {
                    debug!(
                        "Image {index}: {} face(s) at {:?}",
                        result.face_count(),
                        result.rectangles()
                    );
                    results.push(result);
                },
                Err(e) => warn!("Skipping image {index}, face detection failed: {e}"),
            }
        }
        Ok(results)
    }

    /// Loads the image at `path` and detects faces in it.
    pub fn detect_faces_in_file(&self, path: impl AsRef<Path>) -> Result<Vec<Rect>, DetectError> {
        let image = loader::decode(path.as_ref())?;
        Ok(self
            .detect_faces(std::slice::from_ref(&image))?
            .into_iter()
            .flat_map(|result| result.rectangles().to_vec())
            .collect())
    }

    fn detect_one<'a>(
        &self,
        cascade: &dyn Cascade,
        image: &'a Bitmap,
    ) -> Result<DetectionResult<'a>, DetectError> {
        let preprocessed = preprocess(image, &self.params)?;
        let mut rectangles = cascade.detect(&preprocessed, &self.params)?;
        if self.params.rescale_to_original {
            let (from, to) = (preprocessed.dimensions(), image.dimensions());
            rectangles.iter_mut().for_each(|rect| *rect = rect.rescaled(from, to));
        }
        Ok(DetectionResult::new(image, rectangles))
    }
}
