//! Shared primitive IDs, geometry, and media enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// In-memory bitmap used for every image variant and edit snapshot.
pub type Bitmap = image::RgbaImage;

/// Opaque per-request identifier handed out by an asset library.
///
/// `0` is reserved for requests that were rejected without reaching the library.
pub type RequestId = i32;

/// Position of an asset inside the enumerated album.
pub type AssetIdx = i64;

/// Kind reported by the underlying media-library resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Still or animated image.
    Image,
    /// Video clip.
    Video,
    /// Audio-only item.
    Audio,
    /// Anything the library could not classify.
    Unknown,
}

/// Media type as seen by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    /// Plain photo.
    Photo,
    /// Animated GIF.
    PhotoGif,
    /// Live photo.
    PhotoLive,
    /// Video clip.
    Video,
}

impl MediaType {
    /// True for every still/animated image variant.
    pub fn is_image(self) -> bool {
        !matches!(self, MediaType::Video)
    }

    /// True for [`MediaType::Video`].
    pub fn is_video(self) -> bool {
        matches!(self, MediaType::Video)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaType::Photo => "PHOTO",
            MediaType::PhotoGif => "PHOTO/GIF",
            MediaType::PhotoLive => "PHOTO/LIVE",
            MediaType::Video => "VIDEO",
        };
        f.write_str(name)
    }
}

/// Slot under which an asset keeps a cached bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageKey {
    /// First image loaded from the library.
    Initial,
    /// Result produced by the editor.
    Edited,
    /// Result produced by export.
    Output,
}

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Builds a size from width and height.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dimensions of `bitmap`.
    pub fn of(bitmap: &Bitmap) -> Self {
        Self::new(bitmap.width(), bitmap.height())
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Point in view or content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Builds a point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Divides both coordinates by `scale`; non-positive scales leave the point unchanged.
    pub fn unscaled(self, scale: f32) -> Self {
        if scale <= 0.0 {
            return self;
        }
        Self::new(self.x / scale, self.y / scale)
    }
}
