//! Picker and editor options, loadable from JSON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MediaType;

/// Failure while loading options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid options document: {0}")]
    Json(#[from] serde_json::Error),
    /// A value was out of its accepted range.
    #[error("invalid option `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Human readable reason.
        reason: String,
    },
}

/// Media kinds the user may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOptions {
    /// Plain photos.
    pub photo: bool,
    /// Videos.
    pub video: bool,
    /// Animated GIFs, classified separately from plain photos.
    pub photo_gif: bool,
    /// Live photos, classified separately from plain photos.
    pub photo_live: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            photo: true,
            video: false,
            photo_gif: false,
            photo_live: false,
        }
    }
}

impl SelectOptions {
    /// Every media type enabled.
    pub fn all() -> Self {
        Self {
            photo: true,
            video: true,
            photo_gif: true,
            photo_live: true,
        }
    }

    /// True when `media_type` may be selected.
    pub fn allows(&self, media_type: MediaType) -> bool {
        match media_type {
            MediaType::Photo => self.photo,
            MediaType::PhotoGif => self.photo_gif,
            MediaType::PhotoLive => self.photo_live,
            MediaType::Video => self.video,
        }
    }
}

/// Policy for one picking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerOptions {
    /// Maximum number of selected assets.
    pub select_limit: usize,
    /// Selectable media types.
    pub select_options: SelectOptions,
    /// Shortest accepted video, in seconds.
    pub min_video_duration: f64,
    /// Longest accepted video, in seconds.
    pub max_video_duration: f64,
    /// Largest accepted resource, in bytes. `None` disables the check.
    pub max_file_bytes: Option<u64>,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            select_limit: 9,
            select_options: SelectOptions::default(),
            min_video_duration: 1.0,
            max_video_duration: 600.0,
            max_file_bytes: None,
        }
    }
}

impl PickerOptions {
    /// Parses options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serializes the options to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.select_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "select_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.min_video_duration > self.max_video_duration {
            return Err(ConfigError::Invalid {
                field: "min_video_duration",
                reason: format!(
                    "{} exceeds max_video_duration {}",
                    self.min_video_duration, self.max_video_duration
                ),
            });
        }
        Ok(())
    }
}

/// Mosaic fill offered in the editor's style picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MosaicStyle {
    /// Pixelated copy of the photo being edited.
    Pixelated,
    /// Flat RGBA fill.
    Solid {
        /// Fill colour.
        rgba: [u8; 4],
    },
}

/// Where and how edit snapshots are cached.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Scratch directory. Defaults to a per-session directory under the user cache dir.
    pub root: Option<PathBuf>,
    /// Keep a decoded copy of the latest snapshot alongside the disk file.
    pub keep_in_memory: bool,
}

/// Options for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Pen stroke width in view points.
    pub pen_width: f32,
    /// Mosaic brush width in view points.
    pub mosaic_width: f32,
    /// Pixelation block size.
    pub mosaic_level: u32,
    /// Style shown when the mosaic tool first opens.
    pub default_mosaic_index: usize,
    /// Styles offered by the mosaic tool.
    pub mosaic_styles: Vec<MosaicStyle>,
    /// Snapshot cache settings shared by pen and mosaic undo.
    pub cache: CacheConfig,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            pen_width: 5.0,
            mosaic_width: 15.0,
            mosaic_level: 30,
            default_mosaic_index: 0,
            mosaic_styles: vec![MosaicStyle::Pixelated],
            cache: CacheConfig::default(),
        }
    }
}

impl EditorOptions {
    /// Parses options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mosaic_styles.is_empty() {
            return Err(ConfigError::Invalid {
                field: "mosaic_styles",
                reason: "at least one style is required".to_string(),
            });
        }
        if self.default_mosaic_index >= self.mosaic_styles.len() {
            return Err(ConfigError::Invalid {
                field: "default_mosaic_index",
                reason: format!("{} is out of range", self.default_mosaic_index),
            });
        }
        Ok(())
    }
}
