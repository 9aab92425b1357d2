//! Configuration for the batch run.
//!
//! Everything has a default, so a missing config file is the same as an empty one.

use log::warn;
use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Config file looked up in the working directory when `CONFIG_ENV_VAR` isn't set.
pub const DEFAULT_CONFIG_FILE: &str = "cascade-faces.toml";
pub const CONFIG_ENV_VAR: &str = "CASCADE_FACES_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Tuning of the cascade classifier and the preprocessing in front of it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// How much the search window grows between scales.
    pub scale_factor: f64,
    /// How many overlapping candidates a region needs to be reported as a face.
    pub min_neighbors: i32,
    /// Both image dimensions are divided by this before classification.
    pub downscale: u32,
    /// Skip regions with too few edges to hold a face.
    pub canny_pruning: bool,
    /// Report rectangles in the coordinates of the loaded image rather than those of the
    /// downscaled image the classifier actually saw.
    pub rescale_to_original: bool,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.5,
            min_neighbors: 3,
            downscale: 2,
            canny_pruning: true,
            rescale_to_original: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory that `test_images` and `cascade` are relative to.
    pub resources: PathBuf,
    pub test_images: PathBuf,
    pub cascade: PathBuf,
    pub detection: DetectionParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resources: PathBuf::from("resources"),
            test_images: PathBuf::from("testImages"),
            cascade: PathBuf::from("haarcascade_frontalface_default.xml"),
            detection: DetectionParams::default(),
        }
    }
}

impl Config {
    /// Reads the config at `path`, falling back to defaults if there is no such file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Path of the config file: `$CASCADE_FACES_CONFIG` or `cascade-faces.toml`.
    pub fn default_path() -> PathBuf {
        env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Locates `resource` under the resource directory. A missing resource is logged along with
    /// the working directory, since relative resource roots are the usual culprit.
    pub fn resolve_resource(&self, resource: &Path) -> Option<PathBuf> {
        let path = self.resources.join(resource);
        if path.exists() {
            Some(path)
        } else {
            warn!(
                "Did not find resource at {} (current dir: {})",
                path.display(),
                env::current_dir().map(|d| d.display().to_string()).unwrap_or_default()
            );
            None
        }
    }

    pub fn cascade_path(&self) -> PathBuf {
        self.resources.join(&self.cascade)
    }
}
