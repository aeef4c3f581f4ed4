//! Capability set the picker needs from a media-library resource.

use std::path::{Path, PathBuf};

use crate::{
    config::SelectOptions,
    types::{MediaType, ResourceKind},
};

/// A media-library resource the picker can wrap in an [`crate::core::asset::Asset`].
///
/// Platform adapters implement this; the asset and rule logic never touch
/// the platform type directly.
pub trait ResourceIdentifiable {
    /// Stable identifier, used for asset equality and hashing.
    fn identifier(&self) -> &str;

    /// Kind reported by the library.
    fn kind(&self) -> ResourceKind;

    /// Playback length in seconds; `0.0` for stills.
    fn duration(&self) -> f64 {
        0.0
    }

    /// Size of the original file, when the library knows it.
    fn byte_size(&self) -> Option<u64> {
        None
    }

    /// True for animated GIF images.
    fn is_gif(&self) -> bool {
        false
    }

    /// True for live photos.
    fn is_live_photo(&self) -> bool {
        false
    }
}

impl MediaType {
    /// Classifies `resource` given the media types the session accepts.
    ///
    /// GIF and live photos only get their own type when the session selects
    /// them separately; otherwise they are plain photos.
    pub fn classify<R: ResourceIdentifiable + ?Sized>(resource: &R, options: &SelectOptions) -> Self {
        match resource.kind() {
            ResourceKind::Video => MediaType::Video,
            ResourceKind::Image if options.photo_gif && resource.is_gif() => MediaType::PhotoGif,
            ResourceKind::Image if options.photo_live && resource.is_live_photo() => MediaType::PhotoLive,
            _ => MediaType::Photo,
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic", "heif", "webp", "bmp", "tiff", "gif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "avi", "mkv", "webm"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "wav", "flac"];

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Local files, identified by their path.
impl ResourceIdentifiable for PathBuf {
    fn identifier(&self) -> &str {
        self.to_str().unwrap_or_default()
    }

    fn kind(&self) -> ResourceKind {
        let Some(ext) = extension_of(self) else {
            return ResourceKind::Unknown;
        };
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            ResourceKind::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            ResourceKind::Video
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            ResourceKind::Audio
        } else {
            ResourceKind::Unknown
        }
    }

    fn byte_size(&self) -> Option<u64> {
        std::fs::metadata(self).ok().map(|m| m.len())
    }

    fn is_gif(&self) -> bool {
        extension_of(self).as_deref() == Some("gif")
    }
}
